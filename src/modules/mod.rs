//! Feature modules that act on loaded dashboard data
//!
//! - export: CSV/JSON export of loaded views, PNG save of the word cloud

pub mod export;
