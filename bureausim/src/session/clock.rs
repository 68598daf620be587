//! Elapsed-seconds counter for a running session.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use super::ticker::Ticker;

/// Counts whole seconds while running.
///
/// At most one ticker exists at a time: `start` on a running clock is a
/// no-op.
#[derive(Debug)]
pub struct SessionClock {
    elapsed: Arc<AtomicU64>,
    ticker: Option<Ticker>,
    period: Duration,
}

impl Default for SessionClock {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl SessionClock {
    /// A stopped clock at zero that advances once per `period`.
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            elapsed: Arc::new(AtomicU64::new(0)),
            ticker: None,
            period,
        }
    }

    /// Begin counting. Does nothing if already running.
    pub fn start(&mut self) {
        if self.ticker.is_some() {
            return;
        }
        let elapsed = Arc::clone(&self.elapsed);
        self.ticker = Some(Ticker::spawn(self.period, move || {
            elapsed.fetch_add(1, Ordering::Relaxed);
        }));
    }

    /// Stop counting, keeping the current value.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    /// Stop and zero the clock.
    pub fn reset(&mut self) {
        self.stop();
        self.rewind();
    }

    /// Zero the value without touching the running state.
    pub fn rewind(&self) {
        self.elapsed.store(0, Ordering::Relaxed);
    }

    /// Seconds counted so far.
    #[must_use]
    pub fn elapsed(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }

    /// Whether a ticker is active.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.ticker.is_some()
    }
}
