//! Runtime infrastructure - Tokio runtime bridge for async operations

mod bridge;
mod worker;

pub use bridge::{
    RequestId, RuntimeBridge, RuntimeCommand, RuntimeEvent, ViewPayload, WorkerSettings,
};
pub use worker::run_async_worker;
