//! Cosmetic chatbot line rotation.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::seq::IndexedRandom;

use super::ticker::Ticker;

/// Line shown before any messages are loaded.
pub const DEFAULT_MESSAGE: &str = "Welcome!";

/// Picks a random chatbot line every rotation period.
#[derive(Debug)]
pub struct MessageRotator {
    messages: Arc<Vec<String>>,
    current: Arc<Mutex<String>>,
    ticker: Option<Ticker>,
    period: Duration,
}

impl Default for MessageRotator {
    fn default() -> Self {
        Self::new(Duration::from_secs(8))
    }
}

impl MessageRotator {
    /// An idle rotator showing [`DEFAULT_MESSAGE`].
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self {
            messages: Arc::new(Vec::new()),
            current: Arc::new(Mutex::new(DEFAULT_MESSAGE.to_string())),
            ticker: None,
            period,
        }
    }

    /// Replace the message list and start rotating through it.
    ///
    /// An empty list leaves the current line untouched and stops rotation.
    pub fn start(&mut self, messages: Vec<String>) {
        self.stop();
        self.messages = Arc::new(messages);
        if self.messages.is_empty() {
            return;
        }

        if let Some(first) = self.messages.choose(&mut rand::rng()) {
            (*self.current.lock()).clone_from(first);
        }

        let messages = Arc::clone(&self.messages);
        let current = Arc::clone(&self.current);
        self.ticker = Some(Ticker::spawn(self.period, move || {
            if let Some(next) = messages.choose(&mut rand::rng()) {
                (*current.lock()).clone_from(next);
            }
        }));
    }

    /// Stop rotating; the current line stays.
    pub fn stop(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.cancel();
        }
    }

    /// Stop, drop all messages, and show [`DEFAULT_MESSAGE`] again.
    pub fn reset(&mut self) {
        self.stop();
        self.messages = Arc::new(Vec::new());
        *self.current.lock() = DEFAULT_MESSAGE.to_string();
    }

    /// The line currently on display.
    #[must_use]
    pub fn current(&self) -> String {
        self.current.lock().clone()
    }

    /// All loaded lines.
    #[must_use]
    pub fn messages(&self) -> &[String] {
        &self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines() -> Vec<String> {
        vec!["one".to_string(), "two".to_string(), "three".to_string()]
    }

    #[tokio::test]
    async fn starts_on_default() {
        let rotator = MessageRotator::default();
        assert_eq!(rotator.current(), DEFAULT_MESSAGE);
    }

    #[tokio::test]
    async fn start_picks_a_loaded_line() {
        let mut rotator = MessageRotator::default();
        rotator.start(lines());
        assert!(lines().contains(&rotator.current()));
    }

    #[tokio::test]
    async fn empty_list_keeps_current() {
        let mut rotator = MessageRotator::default();
        rotator.start(Vec::new());
        assert_eq!(rotator.current(), DEFAULT_MESSAGE);
        assert!(rotator.messages().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn rotation_stays_within_list() {
        let mut rotator = MessageRotator::new(Duration::from_secs(1));
        rotator.start(lines());
        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(1)).await;
            tokio::task::yield_now().await;
            assert!(lines().contains(&rotator.current()));
        }
    }

    #[tokio::test]
    async fn reset_restores_default() {
        let mut rotator = MessageRotator::default();
        rotator.start(lines());
        rotator.reset();
        assert_eq!(rotator.current(), DEFAULT_MESSAGE);
        assert!(rotator.messages().is_empty());
    }
}
