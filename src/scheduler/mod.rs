//! Cooperative, tick-driven task scheduling.
//!
//! The host loop calls [`TaskScheduler::tick`] once per frame with the current
//! [`FrameTime`]. Due callbacks run synchronously inside that call.
//!
//! # Key Concepts
//!
//! - **One-shot tasks** fire once after a delay, then retire
//! - **Repeating tasks** fire every interval, can be paused, and may expire
//! - **Handles** are generation-checked; stale handles are silently ignored
//! - **Hosts** allocate and release one resource per active task
//!
//! Nothing here is thread-safe. Share a scheduler across threads only behind
//! external synchronisation.

mod error;
mod executor;
mod handle;
mod host;
mod task;
mod time;

pub use error::{CallbackError, SchedulerError};
pub use executor::{TaskScheduler, TickReport};
pub use handle::TaskHandle;
pub use host::{CountingHost, DetachedHost, HostResource, TaskHost};
pub use task::{TaskKind, TaskResult};
pub use time::FrameTime;
