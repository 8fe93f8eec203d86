//! Explicit configuration passed into containers and schedulers.
//!
//! There is no process-wide debug switch: each [`StateContainer`] and
//! [`TaskScheduler`] receives its own [`Diagnostics`] value at construction.
//!
//! [`StateContainer`]: crate::container::StateContainer
//! [`TaskScheduler`]: crate::scheduler::TaskScheduler

use serde::{Deserialize, Serialize};

/// Debug toggle gating transition traces.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Diagnostics {
    /// Emit a trace record for every state transition.
    pub debug: bool,
}

impl Diagnostics {
    pub const fn enabled() -> Self {
        Self { debug: true }
    }

    pub const fn disabled() -> Self {
        Self { debug: false }
    }
}

/// Construction options for a [`TaskScheduler`](crate::scheduler::TaskScheduler).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub diagnostics: Diagnostics,

    /// Number of task slots reserved up front.
    pub capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            diagnostics: Diagnostics::default(),
            capacity: 16,
        }
    }
}

impl SchedulerConfig {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
