//! Serious Headquarters of Seriousness: forge the director's signature.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;

use bureausim_proto::payload::{SignatureQuality, TaskInput};

use super::queue::QueueCounter;
use super::{CheckPayload, Deadline, FlowEffect, FlowKey, FlowSettings, Notice};

/// Pad width in cells.
pub const PAD_WIDTH: usize = 40;
/// Pad height in cells.
pub const PAD_HEIGHT: usize = 8;

/// Stages of the signature department.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureStage {
    /// Take a number and wait.
    Queue,
    /// Offered to skip the line.
    CoffeePrompt,
    /// Caught bribing; being shown out.
    KickedOut,
    /// Drawing on the pad.
    Forge,
}

/// A terminal drawing surface. Each inked cell counts once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignaturePad {
    cells: Vec<bool>,
    cursor: (usize, usize),
    pen_down: bool,
}

impl Default for SignaturePad {
    fn default() -> Self {
        Self {
            cells: vec![false; PAD_WIDTH * PAD_HEIGHT],
            cursor: (0, PAD_HEIGHT / 2),
            pen_down: false,
        }
    }
}

impl SignaturePad {
    /// Move the cursor, inking the new cell when the pen is down.
    pub fn move_by(&mut self, dx: isize, dy: isize) {
        let (x, y) = self.cursor;
        let nx = x.saturating_add_signed(dx).min(PAD_WIDTH - 1);
        let ny = y.saturating_add_signed(dy).min(PAD_HEIGHT - 1);
        self.cursor = (nx, ny);
        if self.pen_down {
            self.ink_at_cursor();
        }
    }

    /// Lift or lower the pen. Lowering inks the current cell.
    pub fn toggle_pen(&mut self) {
        self.pen_down = !self.pen_down;
        if self.pen_down {
            self.ink_at_cursor();
        }
    }

    /// Ink the cell under the cursor.
    pub fn ink_at_cursor(&mut self) {
        let (x, y) = self.cursor;
        self.cells[y * PAD_WIDTH + x] = true;
    }

    /// Wipe the pad and lift the pen.
    pub fn clear(&mut self) {
        self.cells.fill(false);
        self.pen_down = false;
    }

    /// Number of inked cells.
    #[must_use]
    pub fn ink(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// Whether the cell at `(x, y)` is inked.
    #[must_use]
    pub fn is_inked(&self, x: usize, y: usize) -> bool {
        x < PAD_WIDTH && y < PAD_HEIGHT && self.cells[y * PAD_WIDTH + x]
    }

    /// Cursor position.
    #[must_use]
    pub const fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Whether the pen is down.
    #[must_use]
    pub const fn pen_down(&self) -> bool {
        self.pen_down
    }
}

/// Queue-or-bribe flow ending at the forgery pad.
#[derive(Debug, Clone)]
pub struct SignatureFlow {
    stage: SignatureStage,
    queue: QueueCounter,
    queue_step: Duration,
    rng: StdRng,
    pad: SignaturePad,
    min_ink: usize,
    local_good: bool,
    kicked_out_delay: Duration,
    retry_delay: Duration,
    return_delay: Duration,
    forge_at: Deadline,
    retry_at: Deadline,
    return_at: Deadline,
    pending: bool,
    done: bool,
    notice: Option<Notice>,
}

impl SignatureFlow {
    /// A flow at the back of the queue.
    #[must_use]
    pub fn new(settings: &FlowSettings, mut rng: StdRng) -> Self {
        Self {
            stage: SignatureStage::Queue,
            queue: QueueCounter::new(settings.signature_queue_step, &mut rng),
            queue_step: settings.signature_queue_step,
            rng,
            pad: SignaturePad::default(),
            min_ink: settings.signature_min_ink,
            local_good: false,
            kicked_out_delay: settings.kicked_out_delay,
            retry_delay: settings.signature_retry_delay,
            return_delay: settings.return_delay,
            forge_at: Deadline::default(),
            retry_at: Deadline::default(),
            return_at: Deadline::default(),
            pending: false,
            done: false,
            notice: None,
        }
    }

    /// Draw a ticket.
    pub fn take_number(&mut self, now: Instant) {
        if self.stage == SignatureStage::Queue {
            self.queue.take_number(now, &mut self.rng);
        }
    }

    /// Leave the line for the coffee offer.
    pub fn skip_queue(&mut self) {
        if self.stage == SignatureStage::Queue {
            self.stage = SignatureStage::CoffeePrompt;
        }
    }

    /// Back from the coffee offer to the line.
    pub fn go_back(&mut self) {
        if self.stage == SignatureStage::CoffeePrompt {
            self.stage = SignatureStage::Queue;
        }
    }

    /// Offer the bribe. This department does not approve.
    pub fn bribe(&mut self) {
        if self.stage == SignatureStage::CoffeePrompt {
            self.stage = SignatureStage::KickedOut;
        }
    }

    /// Leave quietly; the pad is reachable again after a short walk.
    pub fn get_out(&mut self, now: Instant) {
        if self.stage == SignatureStage::KickedOut && !self.forge_at.is_armed() {
            self.forge_at.arm(now, self.kicked_out_delay);
        }
    }

    /// Go to the pad once the number has been called.
    pub fn forge(&mut self) {
        if self.stage == SignatureStage::Queue && self.queue.reached() {
            self.stage = SignatureStage::Forge;
        }
    }

    /// Signature quality judged from the ink count.
    #[must_use]
    pub fn quality(&self) -> SignatureQuality {
        if self.pad.ink() > self.min_ink {
            SignatureQuality::Good
        } else {
            SignatureQuality::Poor
        }
    }

    /// Hand in the signature.
    pub fn submit(&mut self) -> Vec<FlowEffect> {
        if self.stage != SignatureStage::Forge
            || self.done
            || self.pending
            || self.retry_at.is_armed()
        {
            return Vec::new();
        }
        let quality = self.quality();
        self.local_good = quality == SignatureQuality::Good;
        self.pending = true;
        vec![FlowEffect::Check(CheckPayload::Task(TaskInput::Signature {
            signature_quality: quality,
        }))]
    }

    /// The backend's verdict. A signature that looks good locally passes
    /// regardless of what the backend says.
    pub fn apply_verdict(&mut self, verdict: Result<bool, String>, now: Instant) -> Vec<FlowEffect> {
        self.pending = false;
        if self.done {
            return Vec::new();
        }
        match verdict {
            Ok(accepted) if accepted || self.local_good => {
                self.done = true;
                self.notice = Some(Notice::success("✓ Signature accepted! Task completed!"));
                self.return_at.arm(now, self.return_delay);
                return vec![FlowEffect::Complete];
            }
            Ok(_) => {
                self.notice = Some(Notice::error(
                    "❌ Signature detected as fake! You must start over.",
                ));
                self.retry_at.arm(now, self.retry_delay);
            }
            Err(_) => self.notice = Some(Notice::error("Error submitting signature.")),
        }
        Vec::new()
    }

    fn start_over(&mut self) {
        self.stage = SignatureStage::Queue;
        self.queue = QueueCounter::new(self.queue_step, &mut self.rng);
        self.pad.clear();
        self.local_good = false;
        self.notice = None;
    }

    /// Advance the queue and resolve delays.
    pub fn tick(&mut self, now: Instant) -> Vec<FlowEffect> {
        self.queue.tick(now);
        if self.forge_at.fire(now) {
            self.stage = SignatureStage::Forge;
        }
        if self.retry_at.fire(now) {
            self.start_over();
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
            (SignatureStage::Queue, FlowKey::Char('t' | 'T')) => self.take_number(now),
            (SignatureStage::Queue, FlowKey::Char('s' | 'S')) => self.skip_queue(),
            (SignatureStage::Queue, FlowKey::Enter) => self.forge(),
            (SignatureStage::CoffeePrompt, FlowKey::Char('b' | 'B')) => self.bribe(),
            (SignatureStage::CoffeePrompt, FlowKey::Char('g' | 'G')) => self.go_back(),
            (SignatureStage::KickedOut, FlowKey::Enter) => self.get_out(now),
            (SignatureStage::Forge, _) if self.done || self.retry_at.is_armed() => {}
            (SignatureStage::Forge, FlowKey::Left) => self.pad.move_by(-1, 0),
            (SignatureStage::Forge, FlowKey::Right) => self.pad.move_by(1, 0),
            (SignatureStage::Forge, FlowKey::Up) => self.pad.move_by(0, -1),
            (SignatureStage::Forge, FlowKey::Down) => self.pad.move_by(0, 1),
            (SignatureStage::Forge, FlowKey::Char(' ')) => self.pad.toggle_pen(),
            (SignatureStage::Forge, FlowKey::Char('c' | 'C')) => self.pad.clear(),
            (SignatureStage::Forge, FlowKey::Enter) => return self.submit(),
            _ => {}
        }
        Vec::new()
    }

    /// Mutable access to the pad.
    pub const fn pad_mut(&mut self) -> &mut SignaturePad {
        &mut self.pad
    }

    /// The pad.
    #[must_use]
    pub const fn pad(&self) -> &SignaturePad {
        &self.pad
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> SignatureStage {
        self.stage
    }

    /// The queue counter.
    #[must_use]
    pub const fn queue(&self) -> &QueueCounter {
        &self.queue
    }

    /// Whether the escort out is under way.
    #[must_use]
    pub const fn leaving(&self) -> bool {
        self.forge_at.is_armed()
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
    use rand::SeedableRng;

    use super::*;

    fn flow() -> SignatureFlow {
        SignatureFlow::new(&FlowSettings::default(), StdRng::seed_from_u64(5))
    }

    fn at_pad() -> (SignatureFlow, Instant) {
        let mut flow = flow();
        let now = Instant::now();
        flow.skip_queue();
        flow.bribe();
        flow.get_out(now);
        flow.tick(now + Duration::from_secs(2));
        (flow, now)
    }

    fn scribble(flow: &mut SignatureFlow, cells: usize) {
        let pad = flow.pad_mut();
        pad.toggle_pen();
        for _ in 1..cells {
            pad.move_by(1, 0);
        }
        pad.toggle_pen();
    }

    #[test]
    fn bribe_gets_player_kicked_out_then_forging() {
        let mut flow = flow();
        let now = Instant::now();
        flow.skip_queue();
        flow.bribe();
        assert_eq!(flow.stage(), SignatureStage::KickedOut);
        flow.get_out(now);
        flow.tick(now + Duration::from_secs(1));
        assert_eq!(flow.stage(), SignatureStage::KickedOut);
        flow.tick(now + Duration::from_secs(2));
        assert_eq!(flow.stage(), SignatureStage::Forge);
    }

    #[test]
    fn queue_route_reaches_pad() {
        let mut flow = flow();
        let now = Instant::now();
        flow.take_number(now);
        flow.forge();
        assert_eq!(flow.stage(), SignatureStage::Queue);
        flow.tick(now + Duration::from_secs(300));
        flow.forge();
        assert_eq!(flow.stage(), SignatureStage::Forge);
    }

    #[test]
    fn ink_counts_distinct_cells() {
        let mut pad = SignaturePad::default();
        pad.toggle_pen();
        pad.move_by(1, 0);
        pad.move_by(-1, 0);
        assert_eq!(pad.ink(), 2);
        pad.clear();
        assert_eq!(pad.ink(), 0);
    }

    #[test]
    fn pad_cursor_stays_inside() {
        let mut pad = SignaturePad::default();
        pad.move_by(-5, -50);
        assert_eq!(pad.cursor(), (0, 0));
        pad.move_by(500, 500);
        assert_eq!(pad.cursor(), (PAD_WIDTH - 1, PAD_HEIGHT - 1));
    }

    #[test]
    fn good_signature_passes_even_if_server_declines() {
        let (mut flow, now) = at_pad();
        scribble(&mut flow, 20);
        let effects = flow.submit();
        assert_eq!(
            effects,
            vec![FlowEffect::Check(CheckPayload::Task(TaskInput::Signature {
                signature_quality: SignatureQuality::Good,
            }))]
        );
        assert_eq!(flow.apply_verdict(Ok(false), now), vec![FlowEffect::Complete]);
    }

    #[test]
    fn poor_signature_passes_on_server_verdict() {
        let (mut flow, now) = at_pad();
        scribble(&mut flow, 3);
        flow.submit();
        assert_eq!(flow.apply_verdict(Ok(true), now), vec![FlowEffect::Complete]);
    }

    #[test]
    fn fake_signature_starts_over() {
        let (mut flow, now) = at_pad();
        scribble(&mut flow, 3);
        flow.submit();
        assert!(flow.apply_verdict(Ok(false), now).is_empty());
        assert_eq!(
            flow.notice().unwrap().text,
            "❌ Signature detected as fake! You must start over."
        );
        flow.tick(now + Duration::from_secs(2));
        assert_eq!(flow.stage(), SignatureStage::Queue);
        assert_eq!(flow.pad().ink(), 0);
        assert!(flow.queue().ticket().is_none());
    }

    #[test]
    fn check_error_keeps_pad() {
        let (mut flow, now) = at_pad();
        scribble(&mut flow, 20);
        flow.submit();
        assert!(flow.apply_verdict(Err("down".to_string()), now).is_empty());
        assert_eq!(flow.stage(), SignatureStage::Forge);
        assert_eq!(flow.notice().unwrap().text, "Error submitting signature.");
    }
}
