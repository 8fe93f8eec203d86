//! Scheduled task records and their timing rules.

use super::error::CallbackError;
use super::executor::TaskScheduler;
use super::host::{HostResource, TaskHost};
use super::time::FrameTime;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

/// Result returned by task callbacks.
pub type TaskResult = Result<(), CallbackError>;

pub(crate) type OnceCallback<H> = Box<dyn FnOnce(&mut TaskScheduler<H>) -> TaskResult>;
/// Shared so an in-flight call survives self-cancellation, and mutably borrowed
/// exactly while it runs. The borrow is released on unwind.
pub(crate) type RepeatingCallback<H> =
    Rc<RefCell<dyn FnMut(&mut TaskScheduler<H>) -> TaskResult>>;

/// Kind of a scheduled task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskKind {
    /// Fires once after its delay, then retires.
    Once,
    /// Fires every interval until expired or cancelled.
    Repeating,
}

/// What a task should do on the current tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Wait,
    Fire,
    Expire,
}

pub(crate) struct Task<H: TaskHost> {
    pub(crate) created_at: FrameTime,
    pub(crate) resource: HostResource,
    pub(crate) schedule: Schedule<H>,
}

pub(crate) enum Schedule<H: TaskHost> {
    Once {
        delay: Duration,
        callback: OnceCallback<H>,
    },
    Repeating(Repeating<H>),
}

pub(crate) struct Repeating<H: TaskHost> {
    pub(crate) interval: Duration,
    pub(crate) last_fired: FrameTime,
    pub(crate) paused_at: Option<FrameTime>,
    pub(crate) expires_at: Option<FrameTime>,
    pub(crate) fired_count: u32,
    pub(crate) callback: RepeatingCallback<H>,
}

impl<H: TaskHost> Task<H> {
    pub(crate) fn kind(&self) -> TaskKind {
        match self.schedule {
            Schedule::Once { .. } => TaskKind::Once,
            Schedule::Repeating(_) => TaskKind::Repeating,
        }
    }

    /// Decide this tick's step. Expiry is checked before pause or due time.
    pub(crate) fn step(&self, now: FrameTime) -> Step {
        match &self.schedule {
            Schedule::Once { delay, .. } => {
                if now.saturating_since(self.created_at) >= *delay {
                    Step::Fire
                } else {
                    Step::Wait
                }
            }
            Schedule::Repeating(repeating) => {
                if repeating.is_expired(now) {
                    Step::Expire
                } else if repeating.paused_at.is_none()
                    && !repeating.is_firing()
                    && repeating.is_due(now)
                {
                    Step::Fire
                } else {
                    Step::Wait
                }
            }
        }
    }
}

impl<H: TaskHost> Repeating<H> {
    pub(crate) fn is_expired(&self, now: FrameTime) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// True while the callback is running, e.g. during a nested tick.
    pub(crate) fn is_firing(&self) -> bool {
        self.callback.try_borrow_mut().is_err()
    }

    pub(crate) fn is_due(&self, now: FrameTime) -> bool {
        now.saturating_since(self.last_fired) >= self.interval
    }

    /// Advance `last_fired` by one interval and count the firing.
    ///
    /// A task that is still a whole interval behind after advancing (the host
    /// stalled) is re-anchored to `now`, so a stall yields one firing.
    pub(crate) fn rearm(&mut self, now: FrameTime) {
        self.last_fired = self.last_fired.saturating_add(self.interval);
        if now.saturating_since(self.last_fired) >= self.interval {
            self.last_fired = now;
        }
        self.fired_count = self.fired_count.wrapping_add(1);
    }

    pub(crate) fn pause(&mut self, now: FrameTime) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now);
        }
    }

    /// Resume, excluding the paused span from the interval.
    pub(crate) fn resume(&mut self, now: FrameTime) {
        if let Some(paused_at) = self.paused_at.take() {
            self.last_fired = self
                .last_fired
                .saturating_add(now.saturating_since(paused_at));
        }
    }
}
