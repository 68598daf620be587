//! Secretary of Bored and Shady Individuals: the mental coherence review.

use std::time::{Duration, Instant};

use bureausim_proto::payload::{Puzzle, PuzzleAnswer, PuzzleSet};

use super::{CheckPayload, Deadline, FlowEffect, FlowKey, FlowSettings, Notice, TextInput};

/// Page heading.
pub const TITLE: &str = "Mental Coherence Review";

/// Preamble shown above every puzzle.
pub const PREAMBLE: &str = "In accordance with Regulation 14-R on Authorized Thought Patterns, \
    all participants must undergo a brief cognitive alignment check. Complete the following \
    puzzles to proceed.";

const ANSWER_MAX_LEN: usize = 40;

/// Sequential puzzles; each must be answered before the next appears.
#[derive(Debug, Clone)]
pub struct PuzzleFlow {
    puzzles: Option<Vec<Puzzle>>,
    index: usize,
    answer: TextInput,
    advance_delay: Duration,
    return_delay: Duration,
    pending: bool,
    load_failed: bool,
    done: bool,
    notice: Option<Notice>,
    advance_at: Deadline,
    return_at: Deadline,
}

impl PuzzleFlow {
    /// A flow waiting for its puzzles.
    #[must_use]
    pub fn new(settings: &FlowSettings) -> Self {
        Self {
            puzzles: None,
            index: 0,
            answer: TextInput::with_limit(ANSWER_MAX_LEN),
            advance_delay: settings.puzzle_advance_delay,
            return_delay: settings.return_delay,
            pending: false,
            load_failed: false,
            done: false,
            notice: None,
            advance_at: Deadline::default(),
            return_at: Deadline::default(),
        }
    }

    /// Effects to run when the screen opens.
    #[must_use]
    pub fn open(&self) -> Vec<FlowEffect> {
        vec![FlowEffect::FetchContent]
    }

    /// Puzzles arrived.
    pub fn apply_content(&mut self, set: PuzzleSet) {
        if set.puzzles.is_empty() {
            self.notice = Some(Notice::info("No puzzles are scheduled for review today."));
        }
        self.puzzles = Some(set.puzzles);
        self.index = 0;
        self.load_failed = false;
    }

    /// Puzzles could not be loaded.
    pub fn content_failed(&mut self) {
        if self.puzzles.is_none() {
            self.load_failed = true;
            self.notice = Some(Notice::error("Error loading puzzles. Press r to retry."));
        }
    }

    /// Whether the last load failed and `r` will fetch again.
    #[must_use]
    pub const fn can_retry(&self) -> bool {
        self.load_failed
    }

    fn retry(&mut self) -> Vec<FlowEffect> {
        self.load_failed = false;
        self.notice = Some(Notice::info("Loading puzzles…"));
        vec![FlowEffect::FetchContent]
    }

    /// Puzzle currently on screen.
    #[must_use]
    pub fn current(&self) -> Option<&Puzzle> {
        self.puzzles.as_ref()?.get(self.index)
    }

    /// Whether the puzzles are still loading.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.puzzles.is_none()
    }

    /// 1-based position and total, for the progress line.
    #[must_use]
    pub fn progress(&self) -> (usize, usize) {
        let total = self.puzzles.as_ref().map_or(0, Vec::len);
        ((self.index + 1).min(total), total)
    }

    /// Send the current answer.
    pub fn submit(&mut self) -> Vec<FlowEffect> {
        if self.done || self.pending || self.advance_at.is_armed() {
            return Vec::new();
        }
        let Some(puzzle) = self.current() else {
            return Vec::new();
        };
        let answer = PuzzleAnswer {
            puzzle_number: puzzle.id,
            puzzle_key: puzzle.puzzle_key.clone(),
            answer: self.answer.trimmed().to_string(),
        };
        if answer.answer.is_empty() {
            self.notice = Some(Notice::info("Please enter an answer."));
            return Vec::new();
        }
        self.pending = true;
        vec![FlowEffect::Check(CheckPayload::Puzzle(answer))]
    }

    /// The backend's verdict on the current puzzle.
    pub fn apply_verdict(&mut self, verdict: Result<bool, String>, now: Instant) -> Vec<FlowEffect> {
        self.pending = false;
        if self.done {
            return Vec::new();
        }
        match verdict {
            Ok(true) => {
                let (position, total) = self.progress();
                if position >= total {
                    self.done = true;
                    self.notice = Some(Notice::success("✓ All puzzles completed! Returning…"));
                    self.return_at.arm(now, self.return_delay);
                    return vec![FlowEffect::Complete];
                }
                let id = self.current().map_or(0, |p| p.id);
                self.notice = Some(Notice::success(format!("✓ Puzzle {id} complete!")));
                self.advance_at.arm(now, self.advance_delay);
            }
            Ok(false) => self.notice = Some(Notice::error("Incorrect answer. Try again.")),
            Err(_) => self.notice = Some(Notice::error("Error submitting answer.")),
        }
        Vec::new()
    }

    /// Resolve the advance and return delays.
    pub fn tick(&mut self, now: Instant) -> Vec<FlowEffect> {
        if self.advance_at.fire(now) {
            self.index += 1;
            self.answer.clear();
            self.notice = None;
        }
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
            FlowKey::Char('r') if self.load_failed => return self.retry(),
            FlowKey::Char(c) => self.answer.push(c),
            FlowKey::Backspace => self.answer.pop(),
            FlowKey::Enter => return self.submit(),
            _ => {}
        }
        Vec::new()
    }

    /// Answer typed so far.
    #[must_use]
    pub fn answer(&self) -> &str {
        self.answer.as_str()
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
