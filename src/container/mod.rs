//! Closed-set state container.
//!
//! [`StateContainer`] guards a single state value so it can only move between
//! members of `S::variants()`. Transitions are observable through `tracing`
//! and an in-memory [`StateHistory`] when the debug toggle is on.

pub mod error;
pub mod macros;

pub use error::StateError;

use crate::config::Diagnostics;
use crate::core::{State, StateHistory, StateTransition};
use chrono::Utc;

/// A state variable restricted to a closed set of values.
///
/// # Example
///
/// ```rust
/// use framekit::container::{StateContainer, StateError};
/// use framekit::state_enum;
///
/// state_enum! {
///     pub enum Phase {
///         Idle,
///         Running,
///         Done,
///     }
/// }
///
/// let mut phase = StateContainer::new(Phase::Idle);
/// phase.swap_state(Phase::Running)?;
/// assert_eq!(phase.state(), &Phase::Running);
/// # Ok::<(), StateError>(())
/// ```
#[derive(Clone, Debug)]
pub struct StateContainer<S: State> {
    current: S,
    valid_states: Vec<S>,
    diagnostics: Diagnostics,
    history: StateHistory<S>,
    transitions: usize,
}

impl<S: State> StateContainer<S> {
    /// Create a container with diagnostics off.
    ///
    /// `initial` is stored as-is; it is not checked against the valid set.
    /// Use [`StateContainer::try_new`] to reject an out-of-set initial value.
    pub fn new(initial: S) -> Self {
        Self::with_diagnostics(initial, Diagnostics::default())
    }

    /// Create a container with an explicit debug toggle.
    pub fn with_diagnostics(initial: S, diagnostics: Diagnostics) -> Self {
        Self {
            current: initial,
            valid_states: S::variants().to_vec(),
            diagnostics,
            history: StateHistory::new(),
            transitions: 0,
        }
    }

    /// Create a container, failing if `initial` is outside the valid set.
    pub fn try_new(initial: S, diagnostics: Diagnostics) -> Result<Self, StateError> {
        let container = Self::with_diagnostics(initial, diagnostics);
        if container.is_valid(&container.current) {
            Ok(container)
        } else {
            Err(StateError::InvalidState {
                state: container.current.name().to_string(),
            })
        }
    }

    /// Check whether `candidate` belongs to the closed set (pure).
    pub fn is_valid(&self, candidate: &S) -> bool {
        self.valid_states.contains(candidate)
    }

    /// Move to `new_state`.
    ///
    /// Swapping to the current state does nothing. Swapping to a value outside
    /// the valid set fails and leaves the current state untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StateError::InvalidState`] when `new_state` is not a member of
    /// `S::variants()`.
    pub fn swap_state(&mut self, new_state: S) -> Result<(), StateError> {
        if !self.is_valid(&new_state) {
            return Err(StateError::InvalidState {
                state: new_state.name().to_string(),
            });
        }

        if new_state == self.current {
            return Ok(());
        }

        let from = std::mem::replace(&mut self.current, new_state);
        self.transitions = self.transitions.wrapping_add(1);

        if self.diagnostics.debug {
            tracing::debug!(
                from = from.name(),
                to = self.current.name(),
                "state transition"
            );
            self.history.record(StateTransition {
                from,
                to: self.current.clone(),
                timestamp: Utc::now(),
            });
        }

        Ok(())
    }

    /// Get current state (pure)
    pub fn state(&self) -> &S {
        &self.current
    }

    /// Check if the current state is final (pure)
    pub fn is_final(&self) -> bool {
        self.current.is_final()
    }

    pub fn valid_states(&self) -> &[S] {
        &self.valid_states
    }

    /// Number of transitions that changed the state. Self-swaps are not counted.
    pub fn transitions(&self) -> usize {
        self.transitions
    }

    /// Trace records captured while diagnostics were on.
    pub fn history(&self) -> &StateHistory<S> {
        &self.history
    }

    pub fn diagnostics(&self) -> Diagnostics {
        self.diagnostics
    }
}
