//! Owned periodic tokio task.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// A cancellable periodic callback running on the tokio runtime.
///
/// The first call happens one full period after spawning. Periods missed
/// while the runtime was busy are replayed back to back, so the number of
/// calls always tracks the time elapsed since spawning. Dropping the
/// ticker aborts the task, so a ticker can never outlive its owner.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Spawn a task calling `on_tick` once per `period`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        // Anchored here, not inside the task, so the schedule starts at spawn
        // time rather than at the task's first poll.
        let mut interval = tokio::time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
        let handle = tokio::spawn(async move {
            loop {
                interval.tick().await;
                on_tick();
            }
        });
        Self { handle }
    }

    /// Stop the ticker. No further callbacks run after this returns
    /// control to the runtime.
    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
