//! Secretariat of Drowsiness: wait in line, or bribe with coffee.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use bureausim_proto::payload::TaskInput;

use super::queue::QueueCounter;
use super::{CheckPayload, Deadline, FlowEffect, FlowKey, FlowSettings, Notice, TextInput};

/// Where a declined payment sends the player.
pub const PAYMENT_PORTAL_URL: &str = "https://www.buymeacoffee.com/bureaucracy";

const FILE_NAME_MAX_LEN: usize = 80;

/// Stages of the coffee department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoffeeStage {
    /// Take a number and wait.
    Queue,
    /// Offered to skip the line for a coffee.
    CoffeePrompt,
    /// The clerk accepted the coffee.
    BriberySuccess,
    /// Hand in the document.
    Upload,
}

/// Queue-or-bribe flow ending in an `.epub` upload.
#[derive(Debug, Clone)]
pub struct CoffeeFlow {
    stage: CoffeeStage,
    queue: QueueCounter,
    rng: StdRng,
    portal_open: bool,
    portal_at: Deadline,
    portal_wait: Duration,
    file_name: TextInput,
    return_delay: Duration,
    pending: bool,
    done: bool,
    notice: Option<Notice>,
    return_at: Deadline,
}

impl CoffeeFlow {
    /// A flow at the back of the queue.
    #[must_use]
    pub fn new(settings: &FlowSettings, mut rng: StdRng) -> Self {
        Self {
            stage: CoffeeStage::Queue,
            queue: QueueCounter::new(settings.coffee_queue_step, &mut rng),
            rng,
            portal_open: false,
            portal_at: Deadline::default(),
            portal_wait: settings.portal_wait,
            file_name: TextInput::with_limit(FILE_NAME_MAX_LEN),
            return_delay: settings.return_delay,
            pending: false,
            done: false,
            notice: None,
            return_at: Deadline::default(),
        }
    }

    /// Draw a ticket.
    pub fn take_number(&mut self, now: Instant) {
        if self.stage == CoffeeStage::Queue {
            self.queue.take_number(now, &mut self.rng);
        }
    }

    /// Leave the line for the coffee offer.
    pub fn skip_queue(&mut self) {
        if self.stage == CoffeeStage::Queue {
            self.stage = CoffeeStage::CoffeePrompt;
        }
    }

    /// Back from the coffee offer to the line.
    pub fn go_back(&mut self) {
        if self.stage == CoffeeStage::CoffeePrompt && !self.pending && !self.portal_open {
            self.stage = CoffeeStage::Queue;
        }
    }

    /// Try to pay for the coffee.
    pub fn buy_coffee(&mut self) -> Vec<FlowEffect> {
        if self.stage != CoffeeStage::CoffeePrompt || self.pending || self.portal_open {
            return Vec::new();
        }
        self.pending = true;
        vec![FlowEffect::CheckPayment]
    }

    /// Outcome of the payment check.
    ///
    /// An unpaid coffee opens the portal and is waved through after a
    /// short wait; a failed check is waved through at once.
    pub fn apply_payment(&mut self, status: Result<bool, String>, now: Instant) {
        self.pending = false;
        if self.stage != CoffeeStage::CoffeePrompt {
            return;
        }
        match status {
            Ok(true) => self.stage = CoffeeStage::BriberySuccess,
            Ok(false) => {
                self.portal_open = true;
                self.portal_at.arm(now, self.portal_wait);
            }
            Err(reason) => {
                tracing::debug!(%reason, "payment check failed, proceeding");
                self.stage = CoffeeStage::BriberySuccess;
            }
        }
    }

    /// Move on to the upload desk.
    pub fn proceed(&mut self) {
        let allowed = match self.stage {
            CoffeeStage::Queue => self.queue.reached(),
            CoffeeStage::BriberySuccess => true,
            CoffeeStage::CoffeePrompt | CoffeeStage::Upload => false,
        };
        if allowed {
            self.stage = CoffeeStage::Upload;
            self.notice = None;
        }
    }

    /// Hand in the named file.
    pub fn submit_file(&mut self) -> Vec<FlowEffect> {
        if self.stage != CoffeeStage::Upload || self.done || self.pending {
            return Vec::new();
        }
        let name = self.file_name.trimmed();
        if name.is_empty() {
            self.notice = Some(Notice::error("Please select a file!"));
            return Vec::new();
        }
        if !name.ends_with(".epub") {
            self.notice = Some(Notice::error("File must be in *.epub format!"));
            return Vec::new();
        }
        self.pending = true;
        vec![FlowEffect::Check(CheckPayload::Task(TaskInput::Document {
            file_name: name.to_string(),
            file_type: "application/epub+zip".to_string(),
        }))]
    }

    /// The backend's verdict on the document.
    pub fn apply_verdict(&mut self, verdict: Result<bool, String>, now: Instant) -> Vec<FlowEffect> {
        self.pending = false;
        if self.done {
            return Vec::new();
        }
        match verdict {
            Ok(true) => {
                self.done = true;
                self.notice = Some(Notice::success("✓ File accepted! Approval stamp granted!"));
                self.return_at.arm(now, self.return_delay);
                return vec![FlowEffect::Complete];
            }
            Ok(false) => self.notice = Some(Notice::error("File rejected. Please try again.")),
            Err(_) => self.notice = Some(Notice::error("Error submitting file.")),
        }
        Vec::new()
    }

    /// Advance the queue and resolve delays.
    pub fn tick(&mut self, now: Instant) -> Vec<FlowEffect> {
        self.queue.tick(now);
        if self.portal_at.fire(now) {
            self.portal_open = false;
            self.stage = CoffeeStage::BriberySuccess;
        }
        if self.return_at.fire(now) {
            vec![FlowEffect::ReturnToOffice]
        } else {
            Vec::new()
        }
    }

    /// Map a key press to an action for the current stage.
    pub fn on_key(&mut self, key: FlowKey, now: Instant) -> Vec<FlowEffect> {
        match (self.stage, key) {
            (CoffeeStage::Queue, FlowKey::Char('t' | 'T')) => self.take_number(now),
            (CoffeeStage::Queue, FlowKey::Char('s' | 'S')) => self.skip_queue(),
            (CoffeeStage::Queue | CoffeeStage::BriberySuccess, FlowKey::Enter) => self.proceed(),
            (CoffeeStage::CoffeePrompt, FlowKey::Char('b' | 'B')) => return self.buy_coffee(),
            (CoffeeStage::CoffeePrompt, FlowKey::Char('g' | 'G')) => self.go_back(),
            (CoffeeStage::Upload, FlowKey::Enter) => return self.submit_file(),
            (CoffeeStage::Upload, FlowKey::Backspace) if !self.done => self.file_name.pop(),
            (CoffeeStage::Upload, FlowKey::Char(c)) if !self.done => self.file_name.push(c),
            _ => {}
        }
        Vec::new()
    }

    /// Type a file name.
    pub fn type_file_name(&mut self, name: &str) {
        for c in name.chars() {
            self.file_name.push(c);
        }
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> CoffeeStage {
        self.stage
    }

    /// The queue counter.
    #[must_use]
    pub const fn queue(&self) -> &QueueCounter {
        &self.queue
    }

    /// Whether the payment portal link is being shown.
    #[must_use]
    pub const fn portal_open(&self) -> bool {
        self.portal_open
    }

    /// File name typed so far.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.file_name.as_str()
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
