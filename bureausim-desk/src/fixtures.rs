//! Canned task content and the rules that judge player submissions.

use bureausim_proto::payload::{
    CaptchaChallenge, FormInput, FormSchema, Puzzle, PuzzleAnswer, PuzzleSet, SignatureQuality,
};
use bureausim_proto::task::TaskType;

/// Lines the office chatbot cycles through.
pub const CHATBOT_LINES: [&str; 5] = [
    "Welcome! Complete all your assigned tasks.",
    "Have you tried taking a number?",
    "Forms must be filled out in triplicate. Or once. Nobody checks.",
    "The audit office apologizes for the lighting.",
    "Your patience has been noted in your permanent record.",
];

/// Credits paragraph for `GET /about-us/`.
pub const ABOUT_US: &str = "Bureausim was assembled by a committee that is still \
    awaiting approval to exist. Any resemblance to actual administrative procedures \
    is entirely intentional.";

/// Background songs advertised on the start screen.
pub const SONGS: [&str; 2] = ["/audio/hold-music.mp3", "/audio/waiting-room.mp3"];

struct CaptchaFixture {
    prompt: &'static str,
    images: [&'static str; 9],
    answer: &'static [u8],
}

const CAPTCHAS: [CaptchaFixture; 3] = [
    CaptchaFixture {
        prompt: "Select all rubber stamps",
        images: [
            "stamp", "stapler", "stamp", "coffee", "folder", "stamp", "pen", "clock", "chair",
        ],
        answer: &[0, 2, 5],
    },
    CaptchaFixture {
        prompt: "Select all filing cabinets",
        images: [
            "desk", "cabinet", "lamp", "cabinet", "plant", "cabinet", "cabinet", "mug", "queue",
        ],
        answer: &[1, 3, 5, 6],
    },
    CaptchaFixture {
        prompt: "Select every clerk who is on a break",
        images: [
            "clerk (break)",
            "clerk (break)",
            "clerk (break)",
            "clerk (break)",
            "clerk (working)",
            "clerk (break)",
            "clerk (break)",
            "clerk (break)",
            "clerk (break)",
        ],
        answer: &[0, 1, 2, 3, 5, 6, 7, 8],
    },
];

/// The captcha challenge for a given round.
#[must_use]
pub fn captcha(round: usize) -> CaptchaChallenge {
    let fixture = &CAPTCHAS[round % CAPTCHAS.len()];
    CaptchaChallenge {
        prompt: fixture.prompt.to_string(),
        images: fixture.images.iter().map(ToString::to_string).collect(),
    }
}

/// Whether `selected` is exactly the answer set for `round`, in any order.
#[must_use]
pub fn captcha_matches(round: usize, selected: &[u8]) -> bool {
    let mut picked = selected.to_vec();
    picked.sort_unstable();
    picked.dedup();
    picked == CAPTCHAS[round % CAPTCHAS.len()].answer
}

/// Form header copy.
#[must_use]
pub fn form_schema() -> FormSchema {
    FormSchema {
        title: "Official Form 27B-6".to_string(),
        instructions: "Please complete this form with accurate information.".to_string(),
    }
}

/// Every field filled and the id number shaped `NNN-NNN-NNNN`.
#[must_use]
pub fn form_acceptable(form: &FormInput) -> bool {
    form.all_filled() && id_number_valid(form.id_number.trim())
}

fn id_number_valid(raw: &str) -> bool {
    let groups: Vec<&str> = raw.split('-').collect();
    groups.len() == 3
        && [3, 3, 4]
            .iter()
            .zip(&groups)
            .all(|(len, g)| g.len() == *len && g.bytes().all(|b| b.is_ascii_digit()))
}

struct PuzzleFixture {
    title: &'static str,
    question: &'static str,
    sequence: Option<&'static str>,
    options: Option<&'static [&'static str]>,
    placeholder: &'static str,
    answer: &'static str,
}

const PUZZLES: [PuzzleFixture; 3] = [
    PuzzleFixture {
        title: "Sequence Compliance",
        question: "Which number continues the approved sequence?",
        sequence: Some("2, 4, 8, 16, ?"),
        options: None,
        placeholder: "Enter a number",
        answer: "32",
    },
    PuzzleFixture {
        title: "Departmental Logic",
        question: "All clerks are tired. Some tired people are asleep. Is every clerk asleep?",
        sequence: None,
        options: Some(&["yes", "no", "pending review"]),
        placeholder: "yes / no / pending review",
        answer: "no",
    },
    PuzzleFixture {
        title: "Form Arithmetic",
        question: "Form 27B-6 requires three copies of each of its four pages. How many sheets?",
        sequence: None,
        options: None,
        placeholder: "Enter a number",
        answer: "12",
    },
];

fn puzzle_key(index: usize) -> String {
    format!("R14-{:03}", index + 1)
}

/// The full puzzle review.
#[must_use]
pub fn puzzle_set() -> PuzzleSet {
    PuzzleSet {
        puzzles: PUZZLES
            .iter()
            .enumerate()
            .map(|(i, p)| Puzzle {
                id: u32::try_from(i + 1).unwrap_or(u32::MAX),
                puzzle_key: puzzle_key(i),
                title: p.title.to_string(),
                question: p.question.to_string(),
                sequence: p.sequence.map(ToString::to_string),
                options: p.options.map(|o| o.iter().map(ToString::to_string).collect()),
                input_placeholder: Some(p.placeholder.to_string()),
            })
            .collect(),
    }
}

/// Case-insensitive answer check keyed by puzzle key.
#[must_use]
pub fn puzzle_correct(answer: &PuzzleAnswer) -> bool {
    PUZZLES
        .iter()
        .enumerate()
        .find(|(i, _)| puzzle_key(*i) == answer.puzzle_key)
        .is_some_and(|(_, p)| p.answer.eq_ignore_ascii_case(answer.answer.trim()))
}

/// Judge a `PUT /user/homescreen/tasks/{id}` submission by task type.
///
/// `user_input` is the raw `userInput` object; shapes that do not match the
/// task type are rejected rather than treated as errors.
#[must_use]
pub fn check_generic(kind: TaskType, user_input: &serde_json::Value, captcha_round: usize) -> bool {
    match kind {
        TaskType::Captcha => user_input
            .get("selectedImages")
            .and_then(serde_json::Value::as_array)
            .map(|arr| {
                arr.iter()
                    .filter_map(serde_json::Value::as_u64)
                    .filter_map(|n| u8::try_from(n).ok())
                    .collect::<Vec<_>>()
            })
            .is_some_and(|picked| captcha_matches(captcha_round, &picked)),
        TaskType::Coffee => user_input
            .get("fileName")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|name| name.to_ascii_lowercase().ends_with(".epub")),
        TaskType::Signature => user_input
            .get("signatureQuality")
            .cloned()
            .and_then(|v| serde_json::from_value::<SignatureQuality>(v).ok())
            == Some(SignatureQuality::Good),
        TaskType::Display => user_input
            .get("audited")
            .and_then(serde_json::Value::as_bool)
            .unwrap_or(false),
        TaskType::Form => serde_json::from_value::<FormInput>(user_input.clone())
            .is_ok_and(|form| form_acceptable(&form)),
        TaskType::Puzzle => false,
        TaskType::Misc => user_input
            .get("input")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|s| !s.trim().is_empty()),
    }
}
