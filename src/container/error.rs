//! State container errors.

use thiserror::Error;

/// Errors raised by [`StateContainer`](super::StateContainer).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StateError {
    /// The requested state is not a member of the closed set.
    #[error("State '{state}' is not in the valid state set")]
    InvalidState { state: String },
}
