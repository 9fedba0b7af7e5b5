//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - The reqwest client for the job crawl backend
//! - Tokio runtime bridge for async operations

pub mod api;
pub mod runtime;

pub use api::{ApiError, DashboardApi, Endpoints, HttpApi};
pub use runtime::{RuntimeBridge, RuntimeCommand, RuntimeEvent, ViewPayload, WorkerSettings};
