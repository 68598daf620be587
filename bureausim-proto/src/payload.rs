//! Request and response bodies for every backend operation.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// `GET /startscreen/` - cosmetic start-screen assets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartScreenAssets {
    /// Song URLs for the background music player.
    #[serde(default)]
    pub songlist: Vec<String>,
}

/// `POST /user/` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartRequest {
    /// Player nickname (trimmed, at most 20 characters).
    pub nickname: String,
    /// Random session seed chosen by the client.
    pub seed: u32,
}

/// A line the office chatbot may say.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatbotMessage {
    /// Message text.
    pub text: String,
}

/// `POST /user/` response: the to-do list and chatbot lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartResponse {
    /// Tasks assigned to the player, in display order.
    #[serde(default)]
    pub to_do_list: Vec<Task>,
    /// Lines for the rotating chat widget.
    #[serde(default)]
    pub chatbot_messages: Vec<ChatbotMessage>,
}

impl StartResponse {
    /// Chatbot lines as plain strings.
    #[must_use]
    pub fn message_texts(&self) -> Vec<String> {
        self.chatbot_messages.iter().map(|m| m.text.clone()).collect()
    }
}

/// `GET /user/homescreen/tasks/{id}/` for captcha tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptchaChallenge {
    /// What the player has to pick.
    pub prompt: String,
    /// Nine tile labels, row-major.
    #[serde(default)]
    pub images: Vec<String>,
}

/// `GET /user/homescreen/tasks/{id}/form` - form header copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Form title, e.g. "Official Form 27B-6".
    pub title: String,
    /// Instructions shown under the title.
    #[serde(default)]
    pub instructions: String,
}

/// A single item of a puzzle review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    /// Position of the puzzle in its set (1-based).
    pub id: u32,
    /// Opaque key echoed back on submission.
    pub puzzle_key: String,
    /// Short heading.
    pub title: String,
    /// The question to answer.
    pub question: String,
    /// Optional number/letter sequence shown under the question.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sequence: Option<String>,
    /// Optional answer options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    /// Hint shown in the empty answer box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_placeholder: Option<String>,
}

/// `GET /user/homescreen/tasks/{id}/puzzle` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleSet {
    /// Puzzles in the order they must be solved.
    #[serde(default)]
    pub puzzles: Vec<Puzzle>,
}

/// `PUT /user/homescreen/tasks/{id}/puzzle-check` body (sent unwrapped).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleAnswer {
    /// Which puzzle is being answered.
    pub puzzle_number: u32,
    /// Key echoed from [`Puzzle::puzzle_key`].
    pub puzzle_key: String,
    /// Trimmed answer text.
    pub answer: String,
}

/// Filled-in form fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormInput {
    /// Full legal name.
    pub full_name: String,
    /// Identification number (`000-000-0000`).
    pub id_number: String,
    /// Date of birth.
    pub date_of_birth: String,
    /// Purpose of request.
    pub purpose: String,
    /// Residential address.
    pub address: String,
    /// Typed signature.
    pub signature: String,
}

impl FormInput {
    /// Whether every field is non-empty after trimming.
    #[must_use]
    pub fn all_filled(&self) -> bool {
        [
            &self.full_name,
            &self.id_number,
            &self.date_of_birth,
            &self.purpose,
            &self.address,
            &self.signature,
        ]
        .iter()
        .all(|v| !v.trim().is_empty())
    }
}

/// Self-assessed quality of a forged signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignatureQuality {
    /// Enough ink to pass.
    Good,
    /// Not enough ink.
    Poor,
}

/// Per-type player input for `PUT /user/homescreen/tasks/{id}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskInput {
    /// Captcha tile selection.
    Captcha {
        /// Selected tile indices (0..9).
        #[serde(rename = "selectedImages")]
        selected_images: Vec<u8>,
    },
    /// Coffee department document upload.
    Document {
        /// Uploaded file name.
        #[serde(rename = "fileName")]
        file_name: String,
        /// MIME type guessed from the extension.
        #[serde(rename = "fileType")]
        file_type: String,
    },
    /// Forged signature verdict.
    Signature {
        /// Quality computed from the ink count.
        #[serde(rename = "signatureQuality")]
        signature_quality: SignatureQuality,
    },
    /// Display audit confirmation.
    Audit {
        /// Always true when sent.
        audited: bool,
    },
    /// Free-text answer for the generic flow.
    Text {
        /// Player text.
        input: String,
    },
}

/// Wrapper sent to check endpoints: `{ "userInput": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest<T> {
    /// Task-specific input.
    pub user_input: T,
}

/// Verdict returned by every check endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckVerdict {
    /// Whether the submission completes the task (or puzzle item).
    #[serde(default)]
    pub is_task_completed: bool,
}

/// `GET /user/homescreen/tasks/9/payment-portal/` response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    /// Whether a "coffee" has been paid for.
    #[serde(default)]
    pub payment_accepted: bool,
}

/// `POST /endscreen/?nickname=...` body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreSubmission {
    /// Final elapsed time in whole seconds.
    pub elapsed_time: u64,
}

/// `POST /endscreen/` response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    /// Echo of the recorded time, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_time: Option<u64>,
    /// Share of players this run beat, 0 to 100.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percentile: Option<f64>,
}

/// `GET /about-us/` response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AboutUs {
    /// Credits paragraph.
    #[serde(default)]
    pub paragraph: String,
}
