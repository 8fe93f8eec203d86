//! Monotonic frame time supplied by the host loop.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A point on the host's monotonic clock, measured from the host's epoch.
///
/// The scheduler never reads a clock itself; every `FrameTime` comes from the
/// caller of [`TaskScheduler::tick`](super::TaskScheduler::tick).
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FrameTime(Duration);

impl FrameTime {
    pub const ZERO: Self = Self(Duration::ZERO);

    pub const fn from_duration(offset: Duration) -> Self {
        Self(offset)
    }

    pub const fn from_millis(millis: u64) -> Self {
        Self(Duration::from_millis(millis))
    }

    /// Convert from fractional seconds. Negative, NaN or overflowing input maps to zero.
    pub fn from_secs_f64(secs: f64) -> Self {
        Self(Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO))
    }

    pub const fn as_duration(self) -> Duration {
        self.0
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0.as_secs_f64()
    }

    /// Time elapsed since `earlier`, or zero if `earlier` is later than `self`.
    pub fn saturating_since(self, earlier: FrameTime) -> Duration {
        self.0.saturating_sub(earlier.0)
    }

    pub fn saturating_add(self, span: Duration) -> Self {
        Self(self.0.saturating_add(span))
    }
}

impl From<Duration> for FrameTime {
    fn from(offset: Duration) -> Self {
        Self(offset)
    }
}

impl fmt::Display for FrameTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0.as_secs_f64())
    }
}
