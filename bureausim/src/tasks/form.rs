//! Department of Unreadable Forms.

use std::time::{Duration, Instant};

use bureausim_proto::payload::{FormInput, FormSchema};

use super::{CheckPayload, Deadline, FlowEffect, FlowKey, FlowSettings, Notice, TextInput};

/// Field labels in tab order.
pub const FIELD_LABELS: [&str; 6] = [
    "Full Name",
    "ID Number",
    "Date of Birth",
    "Purpose of Request",
    "Address",
    "Signature",
];

const FIELD_MAX_LEN: usize = 64;

/// Six-field form, submitted once everything is filled.
#[derive(Debug, Clone)]
pub struct FormFlow {
    schema: Option<FormSchema>,
    fields: [TextInput; 6],
    focus: usize,
    return_delay: Duration,
    pending: bool,
    done: bool,
    notice: Option<Notice>,
    return_at: Deadline,
}

impl FormFlow {
    /// An empty form waiting for its header.
    #[must_use]
    pub fn new(settings: &FlowSettings) -> Self {
        Self {
            schema: None,
            fields: std::array::from_fn(|_| TextInput::with_limit(FIELD_MAX_LEN)),
            focus: 0,
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

    /// Header copy arrived.
    pub fn apply_content(&mut self, schema: FormSchema) {
        self.schema = Some(schema);
    }

    /// Header could not be loaded; the form still works without it.
    pub fn content_failed(&mut self) {
        tracing::debug!("form header unavailable");
    }

    /// Snapshot of the field values.
    #[must_use]
    pub fn input(&self) -> FormInput {
        let [full_name, id_number, date_of_birth, purpose, address, signature] =
            self.fields.each_ref().map(|f| f.trimmed().to_string());
        FormInput {
            full_name,
            id_number,
            date_of_birth,
            purpose,
            address,
            signature,
        }
    }

    /// Submit if every field is filled.
    pub fn submit(&mut self) -> Vec<FlowEffect> {
        if self.done || self.pending {
            return Vec::new();
        }
        let input = self.input();
        if !input.all_filled() {
            self.notice = Some(Notice::error("Please fill out all fields!"));
            return Vec::new();
        }
        self.pending = true;
        self.notice = None;
        vec![FlowEffect::Check(CheckPayload::Form(input))]
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
                self.notice = Some(Notice::success("✓ Form accepted! Task completed!"));
                self.return_at.arm(now, self.return_delay);
                vec![FlowEffect::Complete]
            }
            Ok(false) => {
                self.notice = Some(Notice::error(
                    "It seems like the form is filled out incorrectly. Please try again.",
                ));
                Vec::new()
            }
            Err(_) => {
                self.notice = Some(Notice::error("Error submitting form. Please try again."));
                Vec::new()
            }
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
    pub fn on_key(&mut self, key: FlowKey, _now: Instant) -> Vec<FlowEffect> {
        if self.done {
            return Vec::new();
        }
        match key {
            FlowKey::Tab | FlowKey::Down => self.focus = (self.focus + 1) % self.fields.len(),
            FlowKey::BackTab | FlowKey::Up => {
                self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
            }
            FlowKey::Backspace => self.fields[self.focus].pop(),
            FlowKey::Char(c) => self.fields[self.focus].push(c),
            FlowKey::Enter => return self.submit(),
            _ => {}
        }
        Vec::new()
    }

    /// Type into the focused field.
    pub fn type_str(&mut self, text: &str) {
        for c in text.chars() {
            self.fields[self.focus].push(c);
        }
    }

    /// Focus field `index` (wrapping).
    pub fn focus_field(&mut self, index: usize) {
        self.focus = index % self.fields.len();
    }

    /// Header copy, once loaded.
    #[must_use]
    pub const fn schema(&self) -> Option<&FormSchema> {
        self.schema.as_ref()
    }

    /// Raw field values in tab order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(TextInput::as_str)
    }

    /// Index of the focused field.
    #[must_use]
    pub const fn focus(&self) -> usize {
        self.focus
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
