//! Unjustified Audit Office: the screen is almost too dark to read.

use std::time::{Duration, Instant};

use bureausim_proto::payload::TaskInput;

use super::{CheckPayload, Deadline, FlowEffect, FlowKey, FlowSettings, Notice};

/// Lowest brightness, in percent.
pub const MIN_BRIGHTNESS: u8 = 5;
/// Highest brightness, in percent.
pub const MAX_BRIGHTNESS: u8 = 100;
/// Change per key press.
pub const BRIGHTNESS_STEP: u8 = 10;

/// Brightness-gated audit. Completing is never actually blocked.
#[derive(Debug, Clone)]
pub struct DisplayFlow {
    brightness: u8,
    return_delay: Duration,
    done: bool,
    notice: Option<Notice>,
    return_at: Deadline,
}

impl DisplayFlow {
    /// A flow at minimum brightness.
    #[must_use]
    pub const fn new(settings: &FlowSettings) -> Self {
        Self {
            brightness: MIN_BRIGHTNESS,
            return_delay: settings.return_delay,
            done: false,
            notice: None,
            return_at: Deadline(None),
        }
    }

    /// Turn the screen up.
    pub fn brighten(&mut self) {
        self.brightness = self
            .brightness
            .saturating_add(BRIGHTNESS_STEP)
            .min(MAX_BRIGHTNESS);
    }

    /// Turn the screen down.
    pub fn dim(&mut self) {
        self.brightness = self
            .brightness
            .saturating_sub(BRIGHTNESS_STEP)
            .max(MIN_BRIGHTNESS);
    }

    /// Complete the audit. The report to the backend is fire-and-forget.
    pub fn complete(&mut self, now: Instant) -> Vec<FlowEffect> {
        if self.done {
            return Vec::new();
        }
        self.done = true;
        self.notice = Some(Notice::success("✓ Audit complete! Approval stamp granted!"));
        self.return_at.arm(now, self.return_delay);
        vec![
            FlowEffect::Complete,
            FlowEffect::Check(CheckPayload::Task(TaskInput::Audit { audited: true })),
        ]
    }

    /// Audit reports need no follow-up.
    pub fn apply_verdict(&mut self, verdict: Result<bool, String>) {
        if let Err(reason) = verdict {
            tracing::debug!(%reason, "audit report failed");
        }
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
            FlowKey::Char('+' | '=') => self.brighten(),
            FlowKey::Char('-' | '_') => self.dim(),
            FlowKey::Enter => return self.complete(now),
            _ => {}
        }
        Vec::new()
    }

    /// Brightness in percent.
    #[must_use]
    pub const fn brightness(&self) -> u8 {
        self.brightness
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

    #[test]
    fn brightness_is_clamped() {
        let mut flow = DisplayFlow::new(&FlowSettings::default());
        flow.dim();
        assert_eq!(flow.brightness(), MIN_BRIGHTNESS);
        for _ in 0..20 {
            flow.brighten();
        }
        assert_eq!(flow.brightness(), MAX_BRIGHTNESS);
        flow.dim();
        assert_eq!(flow.brightness(), 90);
    }

    #[test]
    fn keyboard_shortcuts() {
        let mut flow = DisplayFlow::new(&FlowSettings::default());
        let now = Instant::now();
        flow.on_key(FlowKey::Char('='), now);
        flow.on_key(FlowKey::Char('+'), now);
        assert_eq!(flow.brightness(), 25);
        flow.on_key(FlowKey::Char('_'), now);
        assert_eq!(flow.brightness(), 15);
    }

    #[test]
    fn completes_at_any_brightness() {
        let mut flow = DisplayFlow::new(&FlowSettings::default());
        let now = Instant::now();
        let effects = flow.complete(now);
        assert_eq!(effects[0], FlowEffect::Complete);
        assert!(matches!(
            effects[1],
            FlowEffect::Check(CheckPayload::Task(TaskInput::Audit { audited: true }))
        ));
        assert!(flow.complete(now).is_empty());
        assert_eq!(
            flow.tick(now + Duration::from_secs(2)),
            vec![FlowEffect::ReturnToOffice]
        );
    }
}
