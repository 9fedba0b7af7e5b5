//! Job crawl backend API
//!
//! `DashboardApi` is the seam the runtime worker talks to; `HttpApi` is the
//! reqwest implementation used in production.

mod client;
mod endpoints;
mod error;

pub use client::{DashboardApi, HttpApi, ImageBody};
pub use endpoints::{CacheBuster, Endpoints, JOBS_LIMIT};
pub use error::ApiError;
