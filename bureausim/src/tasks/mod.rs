//! Per-department task flows.
//!
//! Every flow is a synchronous state machine. Player input and backend
//! replies go in through methods; anything that needs the outside world
//! comes back out as a [`FlowEffect`] for the application to carry out.
//! Delayed transitions are deadlines checked by `tick`.

pub mod captcha;
pub mod coffee;
pub mod display;
pub mod form;
pub mod generic;
pub mod practice;
pub mod puzzle;
pub mod queue;
pub mod route;
pub mod signature;

use std::time::{Duration, Instant};

use bureausim_proto::payload::{
    CaptchaChallenge, FormInput, FormSchema, PuzzleAnswer, PuzzleSet, TaskInput,
};

pub use route::{Flow, FlowKey, OpenTask};

/// Something a flow needs done on its behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowEffect {
    /// Load the task's content (challenge, form header, or puzzles).
    FetchContent,
    /// Ask the backend to judge a submission.
    Check(CheckPayload),
    /// Ask whether the coffee bribe went through.
    CheckPayment,
    /// Mark the task completed in the session.
    Complete,
    /// Leave the task screen.
    ReturnToOffice,
}

/// What gets judged, and by which endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckPayload {
    /// Generic task check.
    Task(TaskInput),
    /// Form check.
    Form(FormInput),
    /// One puzzle answer.
    Puzzle(PuzzleAnswer),
}

/// Content delivered to a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowContent {
    /// Captcha tiles.
    Captcha(CaptchaChallenge),
    /// Form header.
    Form(FormSchema),
    /// Puzzle review.
    Puzzles(PuzzleSet),
}

/// Colour of an inline message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Neutral hint.
    Info,
    /// Accepted.
    Success,
    /// Rejected or failed.
    Error,
}

/// Inline message under a flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Text shown to the player.
    pub text: String,
    /// How to colour it.
    pub tone: Tone,
}

impl Notice {
    /// A neutral message.
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Info,
        }
    }

    /// A success message.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Success,
        }
    }

    /// A failure message.
    pub fn error(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::Error,
        }
    }
}

/// Tunables shared by all flows.
#[derive(Debug, Clone)]
pub struct FlowSettings {
    /// Quick captcha reloads that force completion.
    pub captcha_reload_limit: u32,
    /// Longest gap between reloads that still counts as "quick".
    pub captcha_reload_window: Duration,
    /// Queue counter step in the coffee department.
    pub coffee_queue_step: Duration,
    /// Queue counter step in the signature department.
    pub signature_queue_step: Duration,
    /// Inked pad cells needed for a good signature (strictly more than).
    pub signature_min_ink: usize,
    /// Pause after success before returning to the office.
    pub return_delay: Duration,
    /// Pause between solved puzzles.
    pub puzzle_advance_delay: Duration,
    /// How long the payment portal is shown before moving on.
    pub portal_wait: Duration,
    /// Time spent being escorted out of the signature office.
    pub kicked_out_delay: Duration,
    /// Pause before a rejected signature starts over.
    pub signature_retry_delay: Duration,
}

impl Default for FlowSettings {
    fn default() -> Self {
        Self {
            captcha_reload_limit: 3,
            captcha_reload_window: Duration::from_secs(10),
            coffee_queue_step: Duration::from_millis(200),
            signature_queue_step: Duration::from_millis(100),
            signature_min_ink: 12,
            return_delay: Duration::from_secs(2),
            puzzle_advance_delay: Duration::from_millis(1200),
            portal_wait: Duration::from_secs(3),
            kicked_out_delay: Duration::from_secs(2),
            signature_retry_delay: Duration::from_secs(2),
        }
    }
}

/// A one-shot timer resolved by polling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// Fire `delay` after `now`, replacing any earlier arming.
    pub fn arm(&mut self, now: Instant, delay: Duration) {
        self.0 = Some(now + delay);
    }

    /// Disarm without firing.
    pub fn clear(&mut self) {
        self.0 = None;
    }

    /// Whether the deadline is pending.
    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.0.is_some()
    }

    /// Returns true exactly once, on the first poll at or after the deadline.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.0 {
            Some(at) if now >= at => {
                self.0 = None;
                true
            }
            _ => false,
        }
    }
}

/// Single-line text input shared by the typing flows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    value: String,
    max_len: Option<usize>,
}

impl TextInput {
    /// An empty input limited to `max_len` characters.
    #[must_use]
    pub const fn with_limit(max_len: usize) -> Self {
        Self {
            value: String::new(),
            max_len: Some(max_len),
        }
    }

    /// Append a character unless the limit is reached.
    pub fn push(&mut self, c: char) {
        if self.max_len.is_none_or(|max| self.value.chars().count() < max) {
            self.value.push(c);
        }
    }

    /// Remove the last character.
    pub fn pop(&mut self) {
        self.value.pop();
    }

    /// Empty the input.
    pub fn clear(&mut self) {
        self.value.clear();
    }

    /// Current text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Current text, trimmed.
    #[must_use]
    pub fn trimmed(&self) -> &str {
        self.value.trim()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_fires_once() {
        let start = Instant::now();
        let mut d = Deadline::default();
        d.arm(start, Duration::from_secs(2));
        assert!(!d.fire(start + Duration::from_secs(1)));
        assert!(d.fire(start + Duration::from_secs(2)));
        assert!(!d.fire(start + Duration::from_secs(3)));
        assert!(!d.is_armed());
    }

    #[test]
    fn text_input_respects_limit() {
        let mut input = TextInput::with_limit(3);
        for c in "abcd".chars() {
            input.push(c);
        }
        assert_eq!(input.as_str(), "abc");
        input.pop();
        assert_eq!(input.as_str(), "ab");
    }
}
