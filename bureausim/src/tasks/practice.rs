//! Offline stand-ins for departments not on the player's list.
//!
//! A flow opened with the sentinel task id never reaches the backend:
//! content comes from here and submissions are judged locally.

use bureausim_proto::payload::{
    CaptchaChallenge, FormSchema, Puzzle, PuzzleAnswer, PuzzleSet, SignatureQuality, TaskInput,
};
use bureausim_proto::task::TaskType;

use super::{CheckPayload, FlowContent};

const CAPTCHA_ANSWER: [u8; 3] = [0, 4, 8];

/// Practice content for a task type, if that type loads any.
#[must_use]
pub fn content(kind: TaskType) -> Option<FlowContent> {
    match kind {
        TaskType::Captcha => Some(FlowContent::Captcha(CaptchaChallenge {
            prompt: "Select all rubber stamps (practice)".to_string(),
            images: [
                "stamp", "pen", "mug", "folder", "stamp", "clock", "chair", "lamp", "stamp",
            ]
            .iter()
            .map(ToString::to_string)
            .collect(),
        })),
        TaskType::Form => Some(FlowContent::Form(FormSchema {
            title: "Practice Form 00-0".to_string(),
            instructions: "This department has not summoned you. Fill it in anyway.".to_string(),
        })),
        TaskType::Puzzle => Some(FlowContent::Puzzles(PuzzleSet {
            puzzles: vec![Puzzle {
                id: 1,
                puzzle_key: "PRACTICE-1".to_string(),
                title: "Warm-up".to_string(),
                question: "Which number continues the sequence?".to_string(),
                sequence: Some("1, 1, 2, 3, 5, ?".to_string()),
                options: None,
                input_placeholder: Some("Enter a number".to_string()),
            }],
        })),
        TaskType::Coffee
        | TaskType::Signature
        | TaskType::Display
        | TaskType::Misc => None,
    }
}

/// Judge a submission without the backend.
#[must_use]
pub fn judge(payload: &CheckPayload) -> bool {
    match payload {
        CheckPayload::Form(form) => form.all_filled(),
        CheckPayload::Puzzle(PuzzleAnswer { answer, .. }) => answer.trim() == "8",
        CheckPayload::Task(input) => match input {
            TaskInput::Captcha { selected_images } => {
                let mut picked = selected_images.clone();
                picked.sort_unstable();
                picked.dedup();
                picked == CAPTCHA_ANSWER
            }
            TaskInput::Document { file_name, .. } => {
                file_name.to_ascii_lowercase().ends_with(".epub")
            }
            TaskInput::Signature { signature_quality } => {
                *signature_quality == SignatureQuality::Good
            }
            TaskInput::Audit { audited } => *audited,
            TaskInput::Text { input } => !input.trim().is_empty(),
        },
    }
}

/// Practice bribes are never paid.
pub const PAYMENT_ACCEPTED: bool = false;

#[cfg(test)]
mod tests {
    use bureausim_proto::payload::FormInput;

    use super::*;

    #[test]
    fn loading_types_have_content() {
        assert!(matches!(
            content(TaskType::Captcha),
            Some(FlowContent::Captcha(c)) if c.images.len() == 9
        ));
        assert!(matches!(content(TaskType::Form), Some(FlowContent::Form(_))));
        assert!(matches!(
            content(TaskType::Puzzle),
            Some(FlowContent::Puzzles(p)) if p.puzzles.len() == 1
        ));
        assert!(content(TaskType::Display).is_none());
    }

    #[test]
    fn captcha_order_does_not_matter() {
        let payload = CheckPayload::Task(TaskInput::Captcha {
            selected_images: vec![8, 0, 4],
        });
        assert!(judge(&payload));
    }

    #[test]
    fn empty_form_fails() {
        assert!(!judge(&CheckPayload::Form(FormInput::default())));
    }

    #[test]
    fn puzzle_answer_is_trimmed() {
        let payload = CheckPayload::Puzzle(PuzzleAnswer {
            puzzle_number: 1,
            puzzle_key: "PRACTICE-1".to_string(),
            answer: " 8 ".to_string(),
        });
        assert!(judge(&payload));
    }

    #[test]
    fn poor_signature_fails() {
        let payload = CheckPayload::Task(TaskInput::Signature {
            signature_quality: SignatureQuality::Poor,
        });
        assert!(!judge(&payload));
    }
}
