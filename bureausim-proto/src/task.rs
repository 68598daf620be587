//! Task model: one administrative chore assigned to a player.
//!
//! Tasks are created by the backend when a session starts and delivered as
//! an ordered to-do list. The only mutation a client ever performs is
//! flipping `completed` from false to true.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a task, unique within one session's to-do list.
///
/// [`TaskId::SENTINEL`] marks a department the player may visit even
/// though it is not part of their assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(pub u32);

impl TaskId {
    /// Reachable-but-unassigned marker.
    pub const SENTINEL: Self = Self(0);

    /// Whether this id is the unassigned sentinel.
    #[must_use]
    pub const fn is_sentinel(self) -> bool {
        self.0 == Self::SENTINEL.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of interactive flow a task routes to.
///
/// Unknown strings from the backend map to [`TaskType::Misc`], which the
/// client serves with its generic fallback flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskType {
    /// Paperwork form.
    Form,
    /// Sequential puzzle review.
    Puzzle,
    /// Identification challenge.
    Captcha,
    /// Queue with an optional coffee bribe.
    Coffee,
    /// Queue followed by a forged signature.
    Signature,
    /// Broken display audit.
    Display,
    /// Anything else.
    Misc,
}

impl TaskType {
    /// Wire name of the type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Form => "FORM",
            Self::Puzzle => "PUZZLE",
            Self::Captcha => "CAPTCHA",
            Self::Coffee => "COFFEE",
            Self::Signature => "SIGNATURE",
            Self::Display => "DISPLAY",
            Self::Misc => "MISC",
        }
    }

    /// Parse a wire name, case-insensitively. Never fails.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "FORM" => Self::Form,
            "PUZZLE" => Self::Puzzle,
            "CAPTCHA" => Self::Captcha,
            "COFFEE" => Self::Coffee,
            "SIGNATURE" => Self::Signature,
            "DISPLAY" => Self::Display,
            _ => Self::Misc,
        }
    }
}

impl From<String> for TaskType {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<TaskType> for String {
    fn from(kind: TaskType) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the player's to-do list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Backend-assigned identifier.
    pub id: TaskId,
    /// Which flow handles this task.
    #[serde(alias = "type")]
    pub task_type: TaskType,
    /// Routing key shared with the department directory (e.g. `form-task`).
    #[serde(default)]
    pub page_name: String,
    /// Whether the player has finished this task.
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Create an incomplete task.
    pub fn new(id: u32, task_type: TaskType, page_name: impl Into<String>) -> Self {
        Self {
            id: TaskId(id),
            task_type,
            page_name: page_name.into(),
            completed: false,
        }
    }

    /// Page name with dashes turned into spaces, for to-do list display.
    #[must_use]
    pub fn display_label(&self) -> String {
        self.page_name.replace('-', " ")
    }
}
