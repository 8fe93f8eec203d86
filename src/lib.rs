//! Framekit: tick-driven task scheduling and closed-set state containers.
//!
//! Framekit provides the two stateful primitives a frame-based application
//! needs around its main loop. Both are single-threaded and cooperative: the
//! host drives them, they never spawn threads or block.
//!
//! # Core Concepts
//!
//! - **State**: a closed, statically declared set of legal values via the `State` trait
//! - **StateContainer**: a state variable that rejects values outside its set
//! - **TaskScheduler**: one-shot and repeating callbacks advanced by `tick`
//! - **Diagnostics**: an explicit debug toggle, injected at construction
//!
//! # Example
//!
//! ```rust
//! use framekit::container::StateContainer;
//! use framekit::scheduler::{FrameTime, TaskScheduler};
//! use framekit::state_enum;
//! use std::time::Duration;
//!
//! state_enum! {
//!     enum Round {
//!         Waiting,
//!         Playing,
//!         Over,
//!     }
//!     final: [Over]
//! }
//!
//! let mut round = StateContainer::new(Round::Waiting);
//! let mut scheduler = TaskScheduler::new();
//! let spawner = scheduler
//!     .schedule_repeating(Duration::from_secs(1), None, |_| Ok(()))
//!     .unwrap();
//!
//! round.swap_state(Round::Playing).unwrap();
//! scheduler.tick(FrameTime::from_millis(1_000)).unwrap();
//! assert_eq!(scheduler.fired_count(spawner), Some(1));
//! ```

pub mod config;
pub mod container;
pub mod core;
pub mod scheduler;

// Re-export commonly used types
pub use config::{Diagnostics, SchedulerConfig};
pub use container::{StateContainer, StateError};
pub use crate::core::{State, StateHistory, StateTransition};
pub use scheduler::{FrameTime, SchedulerError, TaskHandle, TaskHost, TaskScheduler};
