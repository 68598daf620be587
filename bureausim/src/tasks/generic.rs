//! Fallback flow for task types this client has no screen for.

use std::time::{Duration, Instant};

use bureausim_proto::payload::TaskInput;

use super::{CheckPayload, Deadline, FlowEffect, FlowKey, FlowSettings, Notice, TextInput};

const INPUT_MAX_LEN: usize = 120;

/// Free-text answer judged by the backend.
#[derive(Debug, Clone)]
pub struct GenericFlow {
    input: TextInput,
    return_delay: Duration,
    pending: bool,
    done: bool,
    notice: Option<Notice>,
    return_at: Deadline,
}

impl GenericFlow {
    /// An empty answer box.
    #[must_use]
    pub const fn new(settings: &FlowSettings) -> Self {
        Self {
            input: TextInput::with_limit(INPUT_MAX_LEN),
            return_delay: settings.return_delay,
            pending: false,
            done: false,
            notice: None,
            return_at: Deadline(None),
        }
    }

    /// Send the answer.
    pub fn submit(&mut self) -> Vec<FlowEffect> {
        if self.done || self.pending {
            return Vec::new();
        }
        self.pending = true;
        vec![FlowEffect::Check(CheckPayload::Task(TaskInput::Text {
            input: self.input.as_str().to_string(),
        }))]
    }

    /// The backend's verdict.
    pub fn apply_verdict(&mut self, verdict: Result<bool, String>, now: Instant) -> Vec<FlowEffect> {
        self.pending = false;
        if self.done {
            return Vec::new();
        }
        match verdict {
            Ok(true) => {
                self.done = true;
                self.notice = Some(Notice::success("✓ Task completed successfully!"));
                self.return_at.arm(now, self.return_delay);
                return vec![FlowEffect::Complete];
            }
            Ok(false) => {
                self.notice = Some(Notice::error("Please try again with different input."));
            }
            Err(_) => self.notice = Some(Notice::error("Error submitting. Please try again.")),
        }
        Vec::new()
    }

    /// Resolve the return-to-office delay.
    pub fn tick(&mut self, now: Instant) -> Vec<FlowEffect> {
        if self.return_at.fire(now) {
            vec![FlowEffect::ReturnToOffice]
        } else {
            Vec::new()
        }
    }

    /// Map a key press to an action.
    pub fn on_key(&mut self, key: FlowKey, _now: Instant) -> Vec<FlowEffect> {
        if self.done {
            return Vec::new();
        }
        match key {
            FlowKey::Char(c) => self.input.push(c),
            FlowKey::Backspace => self.input.pop(),
            FlowKey::Enter => return self.submit(),
            _ => {}
        }
        Vec::new()
    }

    /// Text typed so far.
    #[must_use]
    pub fn input(&self) -> &str {
        self.input.as_str()
    }

    /// Inline message, if any.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Whether the task was completed.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }
}
