//! Core State trait for closed-set state values.
//!
//! Every state type guarded by a [`StateContainer`](crate::container::StateContainer)
//! implements this trait. The legal values are declared statically through
//! [`State::variants`], so membership is decided without any runtime reflection.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Trait for values that form a closed, statically known set of states.
///
/// # Required Traits
///
/// - `Clone`: states are copied into transition records
/// - `PartialEq`: membership and self-transition checks compare states
/// - `Debug`: states appear in errors and diagnostics
/// - `Serialize` + `Deserialize`: transition history can be exported
///
/// # Example
///
/// ```rust
/// use framekit::core::State;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
/// enum DoorState {
///     Open,
///     Closed,
///     Locked,
/// }
///
/// impl State for DoorState {
///     fn name(&self) -> &str {
///         match self {
///             Self::Open => "Open",
///             Self::Closed => "Closed",
///             Self::Locked => "Locked",
///         }
///     }
///
///     fn variants() -> &'static [Self] {
///         &[Self::Open, Self::Closed, Self::Locked]
///     }
/// }
///
/// assert_eq!(DoorState::variants().len(), 3);
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync + 'static
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// The complete set of legal values for this state type.
    ///
    /// A value that compares unequal to every entry is outside the set and is
    /// rejected by [`StateContainer::swap_state`](crate::container::StateContainer::swap_state).
    fn variants() -> &'static [Self];

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}
