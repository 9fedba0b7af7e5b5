pub mod action;
pub mod command;
pub mod context;

pub use action::{Action, NotifyLevel};
pub use command::{parse_command, Command, ExportFormat};
pub use context::{SearchContext, Session, ValidationError, DEFAULT_MAX_PAGES};
