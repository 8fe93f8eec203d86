//! Frame Loop
//!
//! This example drives a scheduler and a state container from a simulated
//! 30 Hz frame loop.
//!
//! Key concepts:
//! - One tick per frame with host-supplied time
//! - Repeating task with expiry
//! - One-shot task moving a state container
//! - Transition traces through `tracing`
//!
//! Run with: RUST_LOG=debug cargo run --example frame_loop

use framekit::container::StateContainer;
use framekit::scheduler::{CountingHost, FrameTime, TaskScheduler};
use framekit::{state_enum, Diagnostics, SchedulerConfig};
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

state_enum! {
    enum Match {
        Lobby,
        Playing,
        Finished,
    }
    final: [Finished]
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = SchedulerConfig {
        diagnostics: Diagnostics::enabled(),
        ..SchedulerConfig::default()
    };
    let mut scheduler = TaskScheduler::with_host(CountingHost::new(), config);
    let state = Rc::new(RefCell::new(StateContainer::with_diagnostics(
        Match::Lobby,
        Diagnostics::enabled(),
    )));

    let start = Rc::clone(&state);
    scheduler.schedule_once(Duration::from_millis(500), move |_| {
        start.borrow_mut().swap_state(Match::Playing)?;
        Ok(())
    });

    let heartbeat = scheduler.schedule_repeating(
        Duration::from_millis(250),
        Some(Duration::from_secs(2)),
        |s: &mut TaskScheduler<CountingHost>| {
            tracing::info!(now = %s.now(), "heartbeat");
            Ok(())
        },
    )?;

    let finish = Rc::clone(&state);
    scheduler.schedule_once(Duration::from_millis(2_500), move |_| {
        finish.borrow_mut().swap_state(Match::Finished)?;
        Ok(())
    });

    let frame = Duration::from_micros(33_333);
    let mut now = FrameTime::ZERO;
    while !state.borrow().is_final() {
        now = now.saturating_add(frame);
        let report = scheduler.tick(now)?;
        if report.fired > 0 {
            tracing::debug!(?report, "frame");
        }
    }

    println!("Match finished at {now}");
    println!("Heartbeat still active: {}", scheduler.is_active(heartbeat));
    println!("Transitions: {}", state.borrow().transitions());
    println!("Live host resources: {}", scheduler.host().live());

    Ok(())
}
