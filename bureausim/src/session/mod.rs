//! The single game session shared by every screen.
//!
//! A [`GameSession`] owns the player's nickname, the assigned tasks, the
//! elapsed-time clock, and the chatbot rotator. It is constructed once by
//! the application root and handed to screens by reference; returning to
//! the start screen must go through [`GameSession::reset`].

pub mod clock;
pub mod rotator;
pub mod ticker;

use std::time::Duration;

use rand::Rng;

use bureausim_proto::department;
use bureausim_proto::task::{Task, TaskId};

pub use clock::SessionClock;
pub use rotator::{DEFAULT_MESSAGE, MessageRotator};

/// Longest nickname accepted at the start screen.
pub const MAX_NICKNAME_LEN: usize = 20;

/// Exclusive upper bound for session seeds.
pub const SEED_RANGE: u32 = 10_000;

/// Why a nickname was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NicknameError {
    /// Empty after trimming.
    #[error("Please enter a nickname!")]
    Empty,
    /// More than [`MAX_NICKNAME_LEN`] characters.
    #[error("Nickname must be at most {MAX_NICKNAME_LEN} characters")]
    TooLong,
}

/// Trim and check a nickname before any backend call is made.
///
/// # Errors
///
/// Returns [`NicknameError`] when the trimmed name is empty or too long.
pub fn validate_nickname(raw: &str) -> Result<String, NicknameError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(NicknameError::Empty);
    }
    if trimmed.chars().count() > MAX_NICKNAME_LEN {
        return Err(NicknameError::TooLong);
    }
    Ok(trimmed.to_string())
}

/// Draw a fresh session seed.
#[must_use]
pub fn random_seed() -> u32 {
    rand::rng().random_range(0..SEED_RANGE)
}

/// Tick periods for the session's background tasks.
#[derive(Debug, Clone, Copy)]
pub struct SessionTiming {
    /// Clock period (one second in play).
    pub tick: Duration,
    /// Chatbot rotation period.
    pub rotate_every: Duration,
}

impl Default for SessionTiming {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            rotate_every: Duration::from_secs(8),
        }
    }
}

/// One play-through, from nickname entry to results.
#[derive(Debug)]
pub struct GameSession {
    nickname: String,
    seed: Option<u32>,
    tasks: Vec<Task>,
    clock: SessionClock,
    rotator: MessageRotator,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(SessionTiming::default())
    }
}

impl GameSession {
    /// An empty, stopped session.
    #[must_use]
    pub fn new(timing: SessionTiming) -> Self {
        Self {
            nickname: String::new(),
            seed: None,
            tasks: Vec::new(),
            clock: SessionClock::new(timing.tick),
            rotator: MessageRotator::new(timing.rotate_every),
        }
    }

    /// Begin a play-through.
    ///
    /// Replaces the task and message lists wholesale, draws a new seed,
    /// zeroes the clock and starts it. The nickname is expected to have
    /// passed [`validate_nickname`] already. Calling this on a running
    /// session restarts the count without spawning a second ticker.
    pub fn start(&mut self, nickname: &str, tasks: Vec<Task>, messages: Vec<String>) {
        self.start_seeded(nickname, random_seed(), tasks, messages);
    }

    /// [`GameSession::start`] with the seed that was sent at registration.
    pub fn start_seeded(
        &mut self,
        nickname: &str,
        seed: u32,
        tasks: Vec<Task>,
        messages: Vec<String>,
    ) {
        self.nickname = nickname.to_string();
        self.tasks = tasks;
        self.seed = Some(seed);
        self.rotator.start(messages);
        self.clock.rewind();
        self.clock.start();
        tracing::info!(nickname, tasks = self.tasks.len(), "session started");
    }

    /// Stop the clock; everything else is kept for the results screen.
    pub fn stop(&mut self) {
        self.clock.stop();
        self.rotator.stop();
        tracing::info!(elapsed = self.clock.elapsed(), "session stopped");
    }

    /// Restart the clock of a stopped session without zeroing it.
    ///
    /// Does nothing for a session that was never started or is already
    /// running.
    pub fn resume_clock(&mut self) {
        if self.seed.is_some() && !self.tasks.is_empty() {
            self.clock.start();
        }
    }

    /// Clear every field back to its initial state.
    pub fn reset(&mut self) {
        self.nickname.clear();
        self.seed = None;
        self.tasks.clear();
        self.clock.reset();
        self.rotator.reset();
        tracing::debug!("session reset");
    }

    /// Flag the task with `id` as completed.
    ///
    /// Returns whether a task with that id exists. Unknown ids (including
    /// the sentinel) change nothing.
    pub fn mark_task_complete(&mut self, id: TaskId) -> bool {
        match self.tasks.iter_mut().find(|t| t.id == id) {
            Some(task) => {
                task.completed = true;
                tracing::info!(task = %id, "task completed");
                true
            }
            None => false,
        }
    }

    /// True iff there is at least one task and every task is completed.
    #[must_use]
    pub fn all_tasks_completed(&self) -> bool {
        all_completed(&self.tasks)
    }

    /// The task behind a department page, or [`TaskId::SENTINEL`] when the
    /// department is not on this player's list.
    #[must_use]
    pub fn task_for_page(&self, page_name: &str) -> TaskId {
        self.tasks
            .iter()
            .find(|t| t.page_name == page_name)
            .map_or(TaskId::SENTINEL, |t| t.id)
    }

    /// Whether the department at `page_name` counts toward completion and
    /// is already done.
    #[must_use]
    pub fn page_completed(&self, page_name: &str) -> bool {
        self.tasks
            .iter()
            .any(|t| t.page_name == page_name && t.completed)
    }

    /// Elapsed time as `MM:SS`.
    #[must_use]
    pub fn format_elapsed(&self) -> String {
        bureausim_proto::score::format_elapsed(self.elapsed_secs())
    }

    /// Whole seconds played.
    #[must_use]
    pub fn elapsed_secs(&self) -> u64 {
        self.clock.elapsed()
    }

    /// Whether the clock is ticking.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Player nickname (empty before start).
    #[must_use]
    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// Seed drawn at start, if any.
    #[must_use]
    pub const fn seed(&self) -> Option<u32> {
        self.seed
    }

    /// Assigned tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Chatbot line currently shown.
    #[must_use]
    pub fn current_message(&self) -> String {
        self.rotator.current()
    }

    /// Departments in sidebar order with their routed task ids.
    pub fn departments(&self) -> impl Iterator<Item = (&'static department::Department, TaskId)> {
        department::DEPARTMENTS
            .iter()
            .map(|d| (d, self.task_for_page(d.page_name)))
    }
}

/// The completion gate over a task list.
#[must_use]
pub fn all_completed(tasks: &[Task]) -> bool {
    !tasks.is_empty() && tasks.iter().all(|t| t.completed)
}

#[cfg(test)]
mod tests {
    use bureausim_proto::task::TaskType;

    use super::*;

    fn tasks() -> Vec<Task> {
        vec![
            Task::new(2, TaskType::Form, "form-task"),
            Task::new(3, TaskType::Captcha, "captcha-task"),
        ]
    }

    #[test]
    fn nickname_is_trimmed() {
        assert_eq!(validate_nickname("  ada  ").unwrap(), "ada");
    }

    #[test]
    fn whitespace_nickname_rejected() {
        assert_eq!(validate_nickname("   "), Err(NicknameError::Empty));
        assert_eq!(
            NicknameError::Empty.to_string(),
            "Please enter a nickname!"
        );
    }

    #[test]
    fn long_nickname_rejected() {
        let name = "x".repeat(MAX_NICKNAME_LEN + 1);
        assert_eq!(validate_nickname(&name), Err(NicknameError::TooLong));
        assert!(validate_nickname(&"x".repeat(MAX_NICKNAME_LEN)).is_ok());
    }

    #[tokio::test]
    async fn start_populates_session() {
        let mut session = GameSession::default();
        session.start("ada", tasks(), vec!["hi".to_string()]);
        assert_eq!(session.nickname(), "ada");
        assert_eq!(session.tasks(), tasks().as_slice());
        assert_eq!(session.elapsed_secs(), 0);
        assert!(session.is_running());
        assert!(session.seed().is_some_and(|s| s < SEED_RANGE));
        assert_eq!(session.current_message(), "hi");
    }

    #[tokio::test]
    async fn empty_session_is_not_complete() {
        let session = GameSession::default();
        assert!(!session.all_tasks_completed());
    }

    #[tokio::test]
    async fn gate_opens_after_every_task() {
        let mut session = GameSession::default();
        session.start("ada", tasks(), Vec::new());
        assert!(session.mark_task_complete(TaskId(2)));
        assert!(!session.all_tasks_completed());
        assert!(session.mark_task_complete(TaskId(3)));
        assert!(session.all_tasks_completed());
    }

    #[tokio::test]
    async fn unknown_id_changes_nothing() {
        let mut session = GameSession::default();
        session.start("ada", tasks(), Vec::new());
        assert!(!session.mark_task_complete(TaskId(42)));
        assert!(!session.mark_task_complete(TaskId::SENTINEL));
        assert_eq!(session.tasks(), tasks().as_slice());
    }

    #[tokio::test]
    async fn unassigned_page_routes_to_sentinel() {
        let mut session = GameSession::default();
        session.start("ada", tasks(), Vec::new());
        assert_eq!(session.task_for_page("form-task"), TaskId(2));
        assert_eq!(session.task_for_page("coffee-task"), TaskId::SENTINEL);
    }

    #[tokio::test]
    async fn reset_clears_everything() {
        let mut session = GameSession::default();
        session.start("ada", tasks(), vec!["hi".to_string()]);
        session.mark_task_complete(TaskId(2));
        session.reset();
        assert_eq!(session.nickname(), "");
        assert!(session.seed().is_none());
        assert!(session.tasks().is_empty());
        assert_eq!(session.elapsed_secs(), 0);
        assert!(!session.is_running());
        assert_eq!(session.current_message(), DEFAULT_MESSAGE);
    }

    #[tokio::test]
    async fn resume_only_restarts_started_sessions() {
        let mut session = GameSession::default();
        session.resume_clock();
        assert!(!session.is_running());

        session.start("ada", tasks(), Vec::new());
        session.stop();
        session.resume_clock();
        assert!(session.is_running());
    }

    #[tokio::test]
    async fn departments_cover_directory() {
        let mut session = GameSession::default();
        session.start("ada", tasks(), Vec::new());
        let routed: Vec<_> = session.departments().map(|(_, id)| id).collect();
        assert_eq!(routed.len(), 6);
        assert_eq!(routed.iter().filter(|id| !id.is_sentinel()).count(), 2);
    }
}
