//! Core state types.
//!
//! - State definitions via the `State` trait, including the closed set of legal values
//! - Transition records and their ordered history
//!
//! Nothing in this module performs I/O or logging.

mod history;
mod state;

pub use history::{StateHistory, StateTransition};
pub use state::State;
