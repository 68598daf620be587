//! Dispatch from a task type to its flow.

use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;

use bureausim_proto::task::{TaskId, TaskType};

use super::captcha::CaptchaFlow;
use super::coffee::CoffeeFlow;
use super::display::DisplayFlow;
use super::form::FormFlow;
use super::generic::GenericFlow;
use super::puzzle::PuzzleFlow;
use super::signature::SignatureFlow;
use super::{FlowContent, FlowEffect, FlowSettings, Notice};

/// Terminal-independent key press handed to flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowKey {
    /// A printable character.
    Char(char),
    /// Enter / Return.
    Enter,
    /// Backspace.
    Backspace,
    /// Arrow up.
    Up,
    /// Arrow down.
    Down,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Tab.
    Tab,
    /// Shift+Tab.
    BackTab,
}

/// The flow for one open task screen.
#[derive(Debug, Clone)]
pub enum Flow {
    /// Tile selection.
    Captcha(CaptchaFlow),
    /// Six-field form.
    Form(FormFlow),
    /// Puzzle sequence.
    Puzzle(PuzzleFlow),
    /// Queue or coffee bribe, then upload.
    Coffee(CoffeeFlow),
    /// Queue or bribe, then forge.
    Signature(SignatureFlow),
    /// Brightness audit.
    Display(DisplayFlow),
    /// Free-text fallback.
    Generic(GenericFlow),
}

impl Flow {
    /// Build the flow for `kind`; unknown types fall back to [`Flow::Generic`].
    #[must_use]
    pub fn for_type(kind: TaskType, settings: &FlowSettings) -> Self {
        match kind {
            TaskType::Captcha => Self::Captcha(CaptchaFlow::new(settings)),
            TaskType::Form => Self::Form(FormFlow::new(settings)),
            TaskType::Puzzle => Self::Puzzle(PuzzleFlow::new(settings)),
            TaskType::Coffee => Self::Coffee(CoffeeFlow::new(settings, StdRng::from_os_rng())),
            TaskType::Signature => {
                Self::Signature(SignatureFlow::new(settings, StdRng::from_os_rng()))
            }
            TaskType::Display => Self::Display(DisplayFlow::new(settings)),
            TaskType::Misc => Self::Generic(GenericFlow::new(settings)),
        }
    }

    /// Effects to run when the screen opens.
    #[must_use]
    pub fn open(&self) -> Vec<FlowEffect> {
        match self {
            Self::Captcha(f) => f.open(),
            Self::Form(f) => f.open(),
            Self::Puzzle(f) => f.open(),
            Self::Coffee(_) | Self::Signature(_) | Self::Display(_) | Self::Generic(_) => {
                Vec::new()
            }
        }
    }

    /// Deliver loaded content. Content of the wrong shape is ignored.
    pub fn apply_content(&mut self, content: FlowContent) {
        match (self, content) {
            (Self::Captcha(f), FlowContent::Captcha(c)) => f.apply_content(c),
            (Self::Form(f), FlowContent::Form(s)) => f.apply_content(s),
            (Self::Puzzle(f), FlowContent::Puzzles(p)) => f.apply_content(p),
            (flow, content) => {
                tracing::warn!(flow = flow.name(), ?content, "content does not fit flow");
            }
        }
    }

    /// Content could not be loaded.
    pub fn content_failed(&mut self, reason: &str) {
        tracing::warn!(flow = self.name(), reason, "task content unavailable");
        match self {
            Self::Captcha(f) => f.content_failed(),
            Self::Form(f) => f.content_failed(),
            Self::Puzzle(f) => f.content_failed(),
            Self::Coffee(_) | Self::Signature(_) | Self::Display(_) | Self::Generic(_) => {}
        }
    }

    /// Deliver a check verdict (or the reason the check failed).
    pub fn apply_verdict(&mut self, verdict: Result<bool, String>, now: Instant) -> Vec<FlowEffect> {
        match self {
            Self::Captcha(f) => f.apply_verdict(verdict, now),
            Self::Form(f) => f.apply_verdict(verdict, now),
            Self::Puzzle(f) => f.apply_verdict(verdict, now),
            Self::Coffee(f) => f.apply_verdict(verdict, now),
            Self::Signature(f) => f.apply_verdict(verdict, now),
            Self::Display(f) => {
                f.apply_verdict(verdict);
                Vec::new()
            }
            Self::Generic(f) => f.apply_verdict(verdict, now),
        }
    }

    /// Deliver a payment status. Only the coffee flow asks for one.
    pub fn apply_payment(&mut self, status: Result<bool, String>, now: Instant) {
        if let Self::Coffee(f) = self {
            f.apply_payment(status, now);
        }
    }

    /// Handle a key press.
    pub fn on_key(&mut self, key: FlowKey, now: Instant) -> Vec<FlowEffect> {
        match self {
            Self::Captcha(f) => f.on_key(key, now),
            Self::Form(f) => f.on_key(key, now),
            Self::Puzzle(f) => f.on_key(key, now),
            Self::Coffee(f) => f.on_key(key, now),
            Self::Signature(f) => f.on_key(key, now),
            Self::Display(f) => f.on_key(key, now),
            Self::Generic(f) => f.on_key(key, now),
        }
    }

    /// Advance timers.
    pub fn tick(&mut self, now: Instant) -> Vec<FlowEffect> {
        match self {
            Self::Captcha(f) => f.tick(now),
            Self::Form(f) => f.tick(now),
            Self::Puzzle(f) => f.tick(now),
            Self::Coffee(f) => f.tick(now),
            Self::Signature(f) => f.tick(now),
            Self::Display(f) => f.tick(now),
            Self::Generic(f) => f.tick(now),
        }
    }

    /// Inline message of the active flow.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        match self {
            Self::Captcha(f) => f.notice(),
            Self::Form(f) => f.notice(),
            Self::Puzzle(f) => f.notice(),
            Self::Coffee(f) => f.notice(),
            Self::Signature(f) => f.notice(),
            Self::Display(f) => f.notice(),
            Self::Generic(f) => f.notice(),
        }
    }

    /// Whether the flow reached its success state.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        match self {
            Self::Captcha(f) => f.is_done(),
            Self::Form(f) => f.is_done(),
            Self::Puzzle(f) => f.is_done(),
            Self::Coffee(f) => f.is_done(),
            Self::Signature(f) => f.is_done(),
            Self::Display(f) => f.is_done(),
            Self::Generic(f) => f.is_done(),
        }
    }

    /// Short name for logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Captcha(_) => "captcha",
            Self::Form(_) => "form",
            Self::Puzzle(_) => "puzzle",
            Self::Coffee(_) => "coffee",
            Self::Signature(_) => "signature",
            Self::Display(_) => "display",
            Self::Generic(_) => "generic",
        }
    }
}

/// A task screen: which task it is for and the flow driving it.
#[derive(Debug, Clone)]
pub struct OpenTask {
    /// Routed task id; [`TaskId::SENTINEL`] for practice runs.
    pub task_id: TaskId,
    /// Declared task type.
    pub kind: TaskType,
    /// Department display name.
    pub department: &'static str,
    /// The flow.
    pub flow: Flow,
}

impl OpenTask {
    /// Open the flow for `kind` on behalf of `task_id`.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        kind: TaskType,
        department: &'static str,
        settings: &FlowSettings,
    ) -> Self {
        Self {
            task_id,
            kind,
            department,
            flow: Flow::for_type(kind, settings),
        }
    }

    /// Whether this is an unassigned department visited for practice.
    #[must_use]
    pub const fn is_practice(&self) -> bool {
        self.task_id.is_sentinel()
    }
}
