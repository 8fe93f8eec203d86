//! Scheduler errors.

use super::handle::TaskHandle;
use thiserror::Error;

/// Error type returned by task callbacks.
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur when scheduling or ticking tasks.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Repeating task interval must be greater than zero")]
    ZeroInterval,

    /// A callback failed. The task's bookkeeping was already applied and the
    /// rest of the tick was skipped.
    #[error("Callback of {handle} failed: {source}")]
    Callback {
        handle: TaskHandle,
        #[source]
        source: CallbackError,
    },
}
