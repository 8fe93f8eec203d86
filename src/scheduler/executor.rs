//! The tick-driven task scheduler.

use super::error::SchedulerError;
use super::handle::{Slots, TaskHandle};
use super::host::{DetachedHost, TaskHost};
use super::task::{Repeating, Schedule, Step, Task, TaskKind, TaskResult};
use super::time::FrameTime;
use crate::config::{Diagnostics, SchedulerConfig};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::time::Duration;

/// Counts for a single [`TaskScheduler::tick`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Callbacks invoked, one-shot and repeating.
    pub fired: usize,
    /// One-shot tasks that fired and were removed.
    pub retired: usize,
    /// Repeating tasks removed because they reached their expiry.
    pub expired: usize,
}

/// Runs one-shot and repeating callbacks from an externally driven tick.
///
/// Callbacks receive the scheduler itself, so they may schedule new tasks or
/// pause, resume and cancel existing ones, including their own. Tasks
/// scheduled during a tick are first considered on the following tick.
///
/// # Example
///
/// ```rust
/// use framekit::scheduler::{FrameTime, TaskScheduler};
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use std::time::Duration;
///
/// let fired = Rc::new(Cell::new(0));
/// let mut scheduler = TaskScheduler::new();
///
/// let counter = Rc::clone(&fired);
/// scheduler.schedule_once(Duration::from_millis(100), move |_| {
///     counter.set(counter.get() + 1);
///     Ok(())
/// });
///
/// scheduler.tick(FrameTime::from_millis(50))?;
/// assert_eq!(fired.get(), 0);
/// scheduler.tick(FrameTime::from_millis(100))?;
/// assert_eq!(fired.get(), 1);
/// assert!(scheduler.is_empty());
/// # Ok::<(), framekit::scheduler::SchedulerError>(())
/// ```
pub struct TaskScheduler<H: TaskHost = DetachedHost> {
    tasks: Slots<Task<H>>,
    host: H,
    now: FrameTime,
    diagnostics: Diagnostics,
}

impl TaskScheduler<DetachedHost> {
    pub fn new() -> Self {
        Self::with_host(DetachedHost::default(), SchedulerConfig::default())
    }
}

impl Default for TaskScheduler<DetachedHost> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: TaskHost> TaskScheduler<H> {
    pub fn with_host(host: H, config: SchedulerConfig) -> Self {
        Self {
            tasks: Slots::with_capacity(config.capacity),
            host,
            now: FrameTime::ZERO,
            diagnostics: config.diagnostics,
        }
    }

    /// Run `callback` once, on the first tick at least `delay` after now.
    ///
    /// Never fires from inside this call, even with a zero delay.
    pub fn schedule_once<F>(&mut self, delay: Duration, callback: F) -> TaskHandle
    where
        F: FnOnce(&mut TaskScheduler<H>) -> TaskResult + 'static,
    {
        self.insert(Schedule::Once {
            delay,
            callback: Box::new(callback),
        })
    }

    /// Run `callback` every `interval`, measured from its previous firing.
    ///
    /// With `expire_after` set the task is removed on the first tick at or past
    /// `now + expire_after`, paused or not, without a final firing.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::ZeroInterval`] when `interval` is zero.
    pub fn schedule_repeating<F>(
        &mut self,
        interval: Duration,
        expire_after: Option<Duration>,
        callback: F,
    ) -> Result<TaskHandle, SchedulerError>
    where
        F: FnMut(&mut TaskScheduler<H>) -> TaskResult + 'static,
    {
        if interval.is_zero() {
            return Err(SchedulerError::ZeroInterval);
        }

        let now = self.now;
        Ok(self.insert(Schedule::Repeating(Repeating {
            interval,
            last_fired: now,
            paused_at: None,
            expires_at: expire_after.map(|span| now.saturating_add(span)),
            fired_count: 0,
            callback: Rc::new(RefCell::new(callback)),
        })))
    }

    /// Pause a repeating task. No-op for one-shot tasks and stale handles.
    pub fn pause(&mut self, handle: TaskHandle) {
        let now = self.now;
        if let Some(repeating) = self.repeating_mut(handle) {
            repeating.pause(now);
        }
    }

    /// Resume a paused repeating task. No-op for one-shot tasks and stale handles.
    pub fn resume(&mut self, handle: TaskHandle) {
        let now = self.now;
        if let Some(repeating) = self.repeating_mut(handle) {
            repeating.resume(now);
        }
    }

    /// Remove a task and release its host resource. Stale handles are ignored.
    ///
    /// Cancelling a task from inside its own callback lets the callback finish
    /// and prevents any later firing.
    pub fn cancel(&mut self, handle: TaskHandle) {
        if let Some(task) = self.tasks.remove(handle) {
            self.host.release(task.resource);
            self.log_event(handle, "cancelled");
        }
    }

    /// Cancel every active task.
    pub fn cancel_all(&mut self) {
        for handle in self.tasks.handles() {
            self.cancel(handle);
        }
    }

    /// Advance all tasks to `now`.
    ///
    /// Tasks are visited in slot order. Each visit re-checks the handle, so a
    /// task cancelled by an earlier callback in the same tick is skipped.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Callback`] as soon as a callback fails. The
    /// failing task has already been retired or re-armed; tasks after it in
    /// this tick are left for the next tick.
    pub fn tick(&mut self, now: FrameTime) -> Result<TickReport, SchedulerError> {
        if now < self.now {
            tracing::warn!(
                previous = %self.now,
                requested = %now,
                "tick time went backwards, clamping"
            );
        } else {
            self.now = now;
        }

        let now = self.now;
        let mut report = TickReport::default();
        for handle in self.tasks.handles() {
            self.advance(handle, now, &mut report)?;
        }
        Ok(report)
    }

    fn advance(
        &mut self,
        handle: TaskHandle,
        now: FrameTime,
        report: &mut TickReport,
    ) -> Result<(), SchedulerError> {
        let Some(step) = self.tasks.get(handle).map(|task| task.step(now)) else {
            return Ok(());
        };

        match step {
            Step::Wait => Ok(()),
            Step::Expire => {
                if let Some(task) = self.tasks.remove(handle) {
                    self.host.release(task.resource);
                    report.expired += 1;
                    self.log_event(handle, "expired");
                }
                Ok(())
            }
            Step::Fire => self.fire(handle, now, report),
        }
    }

    fn fire(
        &mut self,
        handle: TaskHandle,
        now: FrameTime,
        report: &mut TickReport,
    ) -> Result<(), SchedulerError> {
        let result = match self.tasks.get(handle).map(Task::kind) {
            Some(TaskKind::Once) => {
                let Some(task) = self.tasks.remove(handle) else {
                    return Ok(());
                };
                self.host.release(task.resource);
                let Schedule::Once { callback, .. } = task.schedule else {
                    return Ok(());
                };
                report.fired += 1;
                report.retired += 1;
                self.log_event(handle, "retired");
                callback(self)
            }
            Some(TaskKind::Repeating) => {
                let Some(repeating) = self.repeating_mut(handle) else {
                    return Ok(());
                };
                repeating.rearm(now);
                let callback = Rc::clone(&repeating.callback);
                let Ok(mut running) = callback.try_borrow_mut() else {
                    return Ok(());
                };
                report.fired += 1;
                self.log_event(handle, "fired");

                // `running` is dropped on unwind too, so a panicking callback
                // stays armed for its next interval.
                let result = (&mut *running)(self);
                drop(running);
                result
            }
            None => return Ok(()),
        };

        result.map_err(|source| SchedulerError::Callback { handle, source })
    }

    fn insert(&mut self, schedule: Schedule<H>) -> TaskHandle {
        let resource = self.host.allocate();
        let handle = self.tasks.insert(Task {
            created_at: self.now,
            resource,
            schedule,
        });
        self.log_event(handle, "scheduled");
        handle
    }

    fn repeating_mut(&mut self, handle: TaskHandle) -> Option<&mut Repeating<H>> {
        match self.tasks.get_mut(handle) {
            Some(Task {
                schedule: Schedule::Repeating(repeating),
                ..
            }) => Some(repeating),
            _ => None,
        }
    }

    fn repeating(&self, handle: TaskHandle) -> Option<&Repeating<H>> {
        match self.tasks.get(handle) {
            Some(Task {
                schedule: Schedule::Repeating(repeating),
                ..
            }) => Some(repeating),
            _ => None,
        }
    }

    fn log_event(&self, handle: TaskHandle, event: &'static str) {
        if self.diagnostics.debug {
            tracing::debug!(task = %handle, now = %self.now, "task {event}");
        }
    }

    /// Time of the most recent tick, zero before the first one.
    pub fn now(&self) -> FrameTime {
        self.now
    }

    /// Number of active tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.len() == 0
    }

    pub fn is_active(&self, handle: TaskHandle) -> bool {
        self.tasks.get(handle).is_some()
    }

    pub fn kind(&self, handle: TaskHandle) -> Option<TaskKind> {
        self.tasks.get(handle).map(Task::kind)
    }

    /// `None` for one-shot tasks and stale handles.
    pub fn is_paused(&self, handle: TaskHandle) -> Option<bool> {
        self.repeating(handle)
            .map(|repeating| repeating.paused_at.is_some())
    }

    /// Number of firings of a repeating task, wrapping at `u32::MAX`.
    pub fn fired_count(&self, handle: TaskHandle) -> Option<u32> {
        self.repeating(handle).map(|repeating| repeating.fired_count)
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: TaskHost> Drop for TaskScheduler<H> {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

impl<H: TaskHost> fmt::Debug for TaskScheduler<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskScheduler")
            .field("now", &self.now)
            .field("tasks", &self.tasks.len())
            .field("diagnostics", &self.diagnostics)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::host::CountingHost;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn at(millis: u64) -> FrameTime {
        FrameTime::from_millis(millis)
    }

    fn counter() -> (Rc<Cell<u32>>, Rc<Cell<u32>>) {
        let count = Rc::new(Cell::new(0));
        (Rc::clone(&count), count)
    }

    fn counting_scheduler() -> TaskScheduler<CountingHost> {
        TaskScheduler::with_host(CountingHost::new(), SchedulerConfig::default())
    }

    #[test]
    fn zero_delay_fires_on_next_tick_not_on_schedule() {
        let (hits, seen) = counter();
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule_once(Duration::ZERO, move |_| {
            hits.set(hits.get() + 1);
            Ok(())
        });

        assert_eq!(seen.get(), 0);
        scheduler.tick(at(0)).unwrap();
        assert_eq!(seen.get(), 1);
        scheduler.tick(at(10)).unwrap();
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn once_releases_its_resource_after_firing() {
        let mut scheduler = counting_scheduler();
        let handle = scheduler.schedule_once(ms(100), |_| Ok(()));
        assert_eq!(scheduler.host().live(), 1);

        let report = scheduler.tick(at(100)).unwrap();
        assert_eq!(
            report,
            TickReport {
                fired: 1,
                retired: 1,
                expired: 0
            }
        );
        assert!(!scheduler.is_active(handle));
        assert_eq!(scheduler.host().live(), 0);
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut scheduler = counting_scheduler();
        let result = scheduler.schedule_repeating(Duration::ZERO, None, |_| Ok(()));
        assert!(matches!(result, Err(SchedulerError::ZeroInterval)));
        assert_eq!(scheduler.host().live(), 0);
    }

    #[test]
    fn repeating_fires_until_expiry() {
        let (hits, seen) = counter();
        let mut scheduler = counting_scheduler();
        let handle = scheduler
            .schedule_repeating(ms(1_000), Some(ms(2_500)), move |_| {
                hits.set(hits.get() + 1);
                Ok(())
            })
            .unwrap();

        let mut fired_at = Vec::new();
        for t in [500, 1_000, 1_500, 2_000, 2_500, 3_000] {
            let before = seen.get();
            scheduler.tick(at(t)).unwrap();
            if seen.get() > before {
                fired_at.push(t);
            }
            if t == 2_500 {
                assert!(!scheduler.is_active(handle));
            }
        }

        assert_eq!(fired_at, vec![1_000, 2_000]);
        assert_eq!(scheduler.host().live(), 0);
    }

    #[test]
    fn paused_task_still_expires() {
        let (hits, seen) = counter();
        let mut scheduler = TaskScheduler::new();
        let handle = scheduler
            .schedule_repeating(ms(100), Some(ms(250)), move |_| {
                hits.set(hits.get() + 1);
                Ok(())
            })
            .unwrap();

        scheduler.tick(at(100)).unwrap();
        assert_eq!(seen.get(), 1);

        scheduler.pause(handle);
        assert_eq!(scheduler.is_paused(handle), Some(true));
        scheduler.tick(at(200)).unwrap();
        assert_eq!(seen.get(), 1);

        let report = scheduler.tick(at(300)).unwrap();
        assert_eq!(report.expired, 1);
        assert_eq!(seen.get(), 1);
        assert!(!scheduler.is_active(handle));
    }

    #[test]
    fn pause_and_resume_ignore_one_shot_tasks() {
        let mut scheduler = TaskScheduler::new();
        let handle = scheduler.schedule_once(ms(10), |_| Ok(()));

        scheduler.pause(handle);
        assert_eq!(scheduler.is_paused(handle), None);
        assert_eq!(scheduler.kind(handle), Some(TaskKind::Once));

        let report = scheduler.tick(at(10)).unwrap();
        assert_eq!(report.fired, 1);
    }

    #[test]
    fn cancel_is_idempotent() {
        let (hits, seen) = counter();
        let mut scheduler = counting_scheduler();
        let handle = scheduler
            .schedule_repeating(ms(10), None, move |_| {
                hits.set(hits.get() + 1);
                Ok(())
            })
            .unwrap();

        scheduler.cancel(handle);
        scheduler.cancel(handle);
        scheduler.pause(handle);
        scheduler.resume(handle);
        scheduler.tick(at(100)).unwrap();

        assert_eq!(seen.get(), 0);
        assert_eq!(scheduler.host().released(), 1);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn callback_can_cancel_itself() {
        let mut scheduler = counting_scheduler();
        let own = Rc::new(Cell::new(None));
        let slot = Rc::clone(&own);
        let handle = scheduler
            .schedule_repeating(ms(10), None, move |s: &mut TaskScheduler<CountingHost>| {
                if let Some(me) = slot.get() {
                    s.cancel(me);
                }
                Ok(())
            })
            .unwrap();
        own.set(Some(handle));

        let report = scheduler.tick(at(10)).unwrap();
        assert_eq!(report.fired, 1);
        assert!(!scheduler.is_active(handle));
        assert_eq!(scheduler.host().live(), 0);

        assert_eq!(scheduler.tick(at(20)).unwrap(), TickReport::default());
    }

    #[test]
    fn callback_cancelling_a_later_task_prevents_its_firing() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = TaskScheduler::new();
        let victim_handle = Rc::new(Cell::new(None));

        let first_log = Rc::clone(&log);
        let target = Rc::clone(&victim_handle);
        scheduler.schedule_once(ms(10), move |s: &mut TaskScheduler| {
            first_log.borrow_mut().push("first");
            if let Some(victim) = target.get() {
                s.cancel(victim);
            }
            Ok(())
        });

        let second_log = Rc::clone(&log);
        let victim = scheduler.schedule_once(ms(10), move |_| {
            second_log.borrow_mut().push("victim");
            Ok(())
        });
        victim_handle.set(Some(victim));

        scheduler.tick(at(10)).unwrap();
        assert_eq!(*log.borrow(), vec!["first"]);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn task_scheduled_inside_callback_waits_for_next_tick() {
        let (hits, seen) = counter();
        let mut scheduler = TaskScheduler::new();
        scheduler.schedule_once(Duration::ZERO, move |s: &mut TaskScheduler| {
            let hits = Rc::clone(&hits);
            s.schedule_once(Duration::ZERO, move |_| {
                hits.set(hits.get() + 1);
                Ok(())
            });
            Ok(())
        });

        scheduler.tick(at(0)).unwrap();
        assert_eq!(seen.get(), 0);
        assert_eq!(scheduler.len(), 1);

        scheduler.tick(at(0)).unwrap();
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn failing_callback_aborts_tick_after_bookkeeping() {
        let (hits, seen) = counter();
        let mut scheduler = counting_scheduler();
        let failing = scheduler
            .schedule_repeating(ms(100), None, |_| Err("boom".into()))
            .unwrap();
        scheduler.schedule_once(ms(100), move |_| {
            hits.set(hits.get() + 1);
            Ok(())
        });

        let err = scheduler.tick(at(100)).unwrap_err();
        match err {
            SchedulerError::Callback { handle, source } => {
                assert_eq!(handle, failing);
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(seen.get(), 0);
        assert_eq!(scheduler.fired_count(failing), Some(1));

        // The one-shot runs on the next tick; the failing task was re-armed.
        assert!(scheduler.tick(at(150)).is_ok());
        assert_eq!(seen.get(), 1);
        assert!(scheduler.tick(at(200)).is_err());
        assert_eq!(scheduler.fired_count(failing), Some(2));
    }

    #[test]
    fn panicking_callback_fires_again_after_unwind() {
        let (calls, seen) = counter();
        let mut scheduler = counting_scheduler();
        let handle = scheduler
            .schedule_repeating(ms(100), None, move |_| {
                calls.set(calls.get() + 1);
                if calls.get() == 1 {
                    panic!("first frame blew up");
                }
                Ok(())
            })
            .unwrap();

        let unwound = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            scheduler.tick(at(100))
        }));
        assert!(unwound.is_err());
        assert_eq!(seen.get(), 1);
        assert_eq!(scheduler.fired_count(handle), Some(1));

        scheduler.tick(at(150)).unwrap();
        assert_eq!(seen.get(), 1);
        scheduler.tick(at(200)).unwrap();
        assert_eq!(seen.get(), 2);
        assert_eq!(scheduler.fired_count(handle), Some(2));

        scheduler.cancel(handle);
        assert_eq!(scheduler.host().live(), 0);
    }

    #[test]
    fn nested_tick_skips_running_task_but_fires_others() {
        let (outer_calls, outer_seen) = counter();
        let (peer_calls, peer_seen) = counter();
        let nested = Rc::new(Cell::new(false));
        let mut scheduler = TaskScheduler::new();

        let entered = Rc::clone(&nested);
        let outer = scheduler
            .schedule_repeating(ms(100), None, move |s: &mut TaskScheduler| {
                outer_calls.set(outer_calls.get() + 1);
                if !entered.replace(true) {
                    let report = s.tick(FrameTime::from_duration(
                        s.now().as_duration() + Duration::from_millis(100),
                    ))?;
                    assert_eq!(report.fired, 1);
                }
                Ok(())
            })
            .unwrap();
        let peer = scheduler
            .schedule_repeating(ms(100), None, move |_| {
                peer_calls.set(peer_calls.get() + 1);
                Ok(())
            })
            .unwrap();

        let report = scheduler.tick(at(100)).unwrap();
        assert_eq!(report.fired, 1);
        assert_eq!(outer_seen.get(), 1);
        assert_eq!(peer_seen.get(), 1);
        assert_eq!(scheduler.now(), at(200));
        assert_eq!(scheduler.fired_count(outer), Some(1));
        assert_eq!(scheduler.fired_count(peer), Some(1));

        scheduler.tick(at(300)).unwrap();
        assert_eq!(outer_seen.get(), 2);
        assert_eq!(peer_seen.get(), 2);
    }

    #[test]
    fn failing_one_shot_is_still_retired() {
        let mut scheduler = counting_scheduler();
        let handle = scheduler.schedule_once(ms(5), |_| Err("nope".into()));

        assert!(scheduler.tick(at(5)).is_err());
        assert!(!scheduler.is_active(handle));
        assert_eq!(scheduler.host().live(), 0);
        assert!(scheduler.tick(at(10)).is_ok());
    }

    #[test]
    fn backwards_time_is_clamped() {
        let (hits, seen) = counter();
        let mut scheduler = TaskScheduler::new();
        scheduler.tick(at(500)).unwrap();
        scheduler.schedule_once(ms(100), move |_| {
            hits.set(hits.get() + 1);
            Ok(())
        });

        scheduler.tick(at(100)).unwrap();
        assert_eq!(scheduler.now(), at(500));
        assert_eq!(seen.get(), 0);

        scheduler.tick(at(600)).unwrap();
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn cancel_all_releases_resources() {
        let mut scheduler = counting_scheduler();
        scheduler.schedule_once(ms(100), |_| Ok(()));
        scheduler
            .schedule_repeating(ms(100), None, |_| Ok(()))
            .unwrap();

        scheduler.cancel_all();
        assert_eq!(scheduler.host().live(), 0);
        assert_eq!(scheduler.host().released(), 2);
    }
}
