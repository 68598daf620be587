//! CAPTCHA Complaints Unit: pick the matching tiles.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use bureausim_proto::payload::{CaptchaChallenge, TaskInput};

use super::{CheckPayload, Deadline, FlowEffect, FlowKey, FlowSettings, Notice};

/// Tiles per side of the grid.
pub const GRID_SIDE: u8 = 3;

/// Tile selection flow with the quick-reload escape hatch.
#[derive(Debug, Clone)]
pub struct CaptchaFlow {
    challenge: Option<CaptchaChallenge>,
    selected: BTreeSet<u8>,
    cursor: u8,
    reloads: u32,
    last_reload: Option<Instant>,
    reload_limit: u32,
    reload_window: Duration,
    return_delay: Duration,
    pending: bool,
    done: bool,
    notice: Option<Notice>,
    return_at: Deadline,
}

impl CaptchaFlow {
    /// A flow waiting for its first challenge.
    #[must_use]
    pub fn new(settings: &FlowSettings) -> Self {
        Self {
            challenge: None,
            selected: BTreeSet::new(),
            cursor: 0,
            reloads: 0,
            last_reload: None,
            reload_limit: settings.captcha_reload_limit,
            reload_window: settings.captcha_reload_window,
            return_delay: settings.return_delay,
            pending: false,
            done: false,
            notice: None,
            return_at: Deadline::default(),
        }
    }

    /// Effects to run when the screen opens.
    #[must_use]
    pub fn open(&self) -> Vec<FlowEffect> {
        vec![FlowEffect::FetchContent]
    }

    /// A new challenge arrived; the selection starts over.
    pub fn apply_content(&mut self, challenge: CaptchaChallenge) {
        self.challenge = Some(challenge);
        self.selected.clear();
        self.cursor = 0;
        self.pending = false;
    }

    /// The challenge could not be loaded.
    pub fn content_failed(&mut self) {
        self.pending = false;
        if self.challenge.is_none() {
            self.notice = Some(Notice::error("Could not load the challenge. Press r to retry."));
        }
    }

    /// Move the grid cursor, clamped to the grid.
    pub fn move_cursor(&mut self, dx: i8, dy: i8) {
        let side = i16::from(GRID_SIDE);
        let col = (i16::from(self.cursor % GRID_SIDE) + i16::from(dx)).clamp(0, side - 1);
        let row = (i16::from(self.cursor / GRID_SIDE) + i16::from(dy)).clamp(0, side - 1);
        self.cursor = u8::try_from(row * side + col).unwrap_or(0);
    }

    /// Select or unselect the tile under the cursor.
    pub fn toggle(&mut self) {
        if self.done || self.challenge.is_none() {
            return;
        }
        if !self.selected.remove(&self.cursor) {
            self.selected.insert(self.cursor);
        }
    }

    /// Send the selection for judgement.
    pub fn submit(&mut self) -> Vec<FlowEffect> {
        if self.done || self.pending || self.challenge.is_none() {
            return Vec::new();
        }
        if self.selected.is_empty() {
            self.notice = Some(Notice::info("Select at least one image!"));
            return Vec::new();
        }
        self.pending = true;
        vec![FlowEffect::Check(CheckPayload::Task(TaskInput::Captcha {
            selected_images: self.selected.iter().copied().collect(),
        }))]
    }

    /// Ask for a different challenge.
    ///
    /// Enough reloads in quick succession complete the task outright.
    pub fn reload(&mut self, now: Instant) -> Vec<FlowEffect> {
        if self.done {
            return Vec::new();
        }
        let quick = self
            .last_reload
            .is_some_and(|prev| now.duration_since(prev) <= self.reload_window);
        self.reloads = if quick { self.reloads + 1 } else { 1 };
        self.last_reload = Some(now);

        if self.reloads >= self.reload_limit {
            tracing::info!(reloads = self.reloads, "captcha reload escape triggered");
            return self.complete(now);
        }
        self.notice = None;
        self.pending = true;
        vec![FlowEffect::FetchContent]
    }

    /// The backend's verdict on the last submission.
    pub fn apply_verdict(&mut self, verdict: Result<bool, String>, now: Instant) -> Vec<FlowEffect> {
        self.pending = false;
        if self.done {
            return Vec::new();
        }
        match verdict {
            Ok(true) => self.complete(now),
            Ok(false) => {
                self.notice = Some(Notice::error("Incorrect! Please try again."));
                vec![FlowEffect::FetchContent]
            }
            Err(reason) => {
                tracing::debug!(%reason, "captcha check failed, refreshing challenge");
                vec![FlowEffect::FetchContent]
            }
        }
    }

    fn complete(&mut self, now: Instant) -> Vec<FlowEffect> {
        self.done = true;
        self.notice = Some(Notice::success("✓ Task Completed!"));
        self.return_at.arm(now, self.return_delay);
        vec![FlowEffect::Complete]
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
    pub fn on_key(&mut self, key: FlowKey, now: Instant) -> Vec<FlowEffect> {
        match key {
            FlowKey::Left => self.move_cursor(-1, 0),
            FlowKey::Right => self.move_cursor(1, 0),
            FlowKey::Up => self.move_cursor(0, -1),
            FlowKey::Down => self.move_cursor(0, 1),
            FlowKey::Char(' ') => self.toggle(),
            FlowKey::Enter => return self.submit(),
            FlowKey::Char('r' | 'R') => return self.reload(now),
            _ => {}
        }
        Vec::new()
    }

    /// Current challenge.
    #[must_use]
    pub const fn challenge(&self) -> Option<&CaptchaChallenge> {
        self.challenge.as_ref()
    }

    /// Whether tile `index` is selected.
    #[must_use]
    pub fn is_selected(&self, index: u8) -> bool {
        self.selected.contains(&index)
    }

    /// Tile under the cursor.
    #[must_use]
    pub const fn cursor(&self) -> u8 {
        self.cursor
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

#[cfg(test)]
mod tests {
    use super::*;

    fn challenge() -> CaptchaChallenge {
        CaptchaChallenge {
            prompt: "Select all stamps".to_string(),
            images: vec!["x".to_string(); 9],
        }
    }

    fn loaded() -> CaptchaFlow {
        let mut flow = CaptchaFlow::new(&FlowSettings::default());
        flow.apply_content(challenge());
        flow
    }

    #[test]
    fn opening_fetches_a_challenge() {
        let flow = CaptchaFlow::new(&FlowSettings::default());
        assert_eq!(flow.open(), vec![FlowEffect::FetchContent]);
    }

    #[test]
    fn submit_needs_a_selection() {
        let mut flow = loaded();
        assert!(flow.submit().is_empty());
        assert_eq!(flow.notice().unwrap().text, "Select at least one image!");
    }

    #[test]
    fn submit_sends_sorted_selection() {
        let mut flow = loaded();
        flow.move_cursor(2, 2);
        flow.toggle();
        flow.move_cursor(-2, -2);
        flow.toggle();
        let effects = flow.submit();
        assert_eq!(
            effects,
            vec![FlowEffect::Check(CheckPayload::Task(TaskInput::Captcha {
                selected_images: vec![0, 8],
            }))]
        );
    }

    #[test]
    fn cursor_is_clamped() {
        let mut flow = loaded();
        flow.move_cursor(-1, -1);
        assert_eq!(flow.cursor(), 0);
        flow.move_cursor(5, 5);
        assert_eq!(flow.cursor(), 8);
    }

    #[test]
    fn wrong_answer_refreshes() {
        let mut flow = loaded();
        flow.toggle();
        flow.submit();
        let effects = flow.apply_verdict(Ok(false), Instant::now());
        assert_eq!(effects, vec![FlowEffect::FetchContent]);
        assert_eq!(flow.notice().unwrap().text, "Incorrect! Please try again.");
        assert!(!flow.is_done());
    }

    #[test]
    fn check_error_refreshes_silently() {
        let mut flow = loaded();
        flow.toggle();
        flow.submit();
        let effects = flow.apply_verdict(Err("boom".to_string()), Instant::now());
        assert_eq!(effects, vec![FlowEffect::FetchContent]);
        assert!(flow.notice().is_none());
    }

    #[test]
    fn correct_answer_completes_then_returns() {
        let mut flow = loaded();
        flow.toggle();
        flow.submit();
        let now = Instant::now();
        assert_eq!(flow.apply_verdict(Ok(true), now), vec![FlowEffect::Complete]);
        assert!(flow.tick(now + Duration::from_secs(1)).is_empty());
        assert_eq!(
            flow.tick(now + Duration::from_secs(2)),
            vec![FlowEffect::ReturnToOffice]
        );
    }

    #[test]
    fn three_quick_reloads_complete() {
        let mut flow = loaded();
        let now = Instant::now();
        assert_eq!(flow.reload(now), vec![FlowEffect::FetchContent]);
        assert_eq!(
            flow.reload(now + Duration::from_secs(3)),
            vec![FlowEffect::FetchContent]
        );
        assert_eq!(
            flow.reload(now + Duration::from_secs(6)),
            vec![FlowEffect::Complete]
        );
        assert!(flow.is_done());
    }

    #[test]
    fn slow_reloads_start_counting_again() {
        let mut flow = loaded();
        let now = Instant::now();
        flow.reload(now);
        flow.reload(now + Duration::from_secs(5));
        let effects = flow.reload(now + Duration::from_secs(30));
        assert_eq!(effects, vec![FlowEffect::FetchContent]);
        assert!(!flow.is_done());
    }
}
