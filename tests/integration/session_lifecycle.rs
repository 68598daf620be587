//! Integration tests for the game session lifecycle under paused time.
//!
//! These tests validate:
//! - The clock counts whole seconds from `start` and freezes on `stop`
//! - A second `start` restarts the count without a second ticker
//! - `resume_clock` continues a stopped session from where it left off
//! - `reset` returns every field to its initial state
//! - The chatbot rotates through the session's messages

use std::time::Duration;

use bureausim::session::{DEFAULT_MESSAGE, GameSession, SessionTiming};
use bureausim_proto::task::{Task, TaskId, TaskType};

async fn advance_secs(secs: u64) {
    tokio::time::advance(Duration::from_secs(secs)).await;
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

fn tasks() -> Vec<Task> {
    vec![
        Task::new(1, TaskType::Puzzle, "puzzle-task"),
        Task::new(3, TaskType::Captcha, "captcha-task"),
    ]
}

#[tokio::test(start_paused = true)]
async fn full_play_through() {
    let mut session = GameSession::default();
    session.start("ada", tasks(), vec!["Form 9 is lost.".to_string()]);
    assert!(session.is_running());
    assert!(session.seed().is_some());

    advance_secs(65).await;
    assert_eq!(session.format_elapsed(), "01:05");

    assert!(session.mark_task_complete(TaskId(1)));
    assert!(!session.all_tasks_completed());
    assert!(session.mark_task_complete(TaskId(3)));
    assert!(session.all_tasks_completed());

    session.stop();
    advance_secs(30).await;
    assert_eq!(session.elapsed_secs(), 65);

    session.reset();
    assert_eq!(session.elapsed_secs(), 0);
    assert!(session.tasks().is_empty());
    assert!(session.nickname().is_empty());
    assert!(session.seed().is_none());
    assert_eq!(session.current_message(), DEFAULT_MESSAGE);
}

#[tokio::test(start_paused = true)]
async fn restart_zeroes_without_doubling() {
    let mut session = GameSession::default();
    session.start("ada", tasks(), Vec::new());
    advance_secs(10).await;

    session.start("ada", tasks(), Vec::new());
    assert_eq!(session.elapsed_secs(), 0);
    advance_secs(3).await;
    assert_eq!(session.elapsed_secs(), 3);
}

#[tokio::test(start_paused = true)]
async fn resume_continues_count() {
    let mut session = GameSession::default();
    session.start("ada", tasks(), Vec::new());
    advance_secs(4).await;
    session.stop();

    session.resume_clock();
    session.resume_clock();
    advance_secs(2).await;
    assert_eq!(session.elapsed_secs(), 6);
}

#[tokio::test(start_paused = true)]
async fn resume_ignores_unstarted_session() {
    let mut session = GameSession::default();
    session.resume_clock();
    advance_secs(5).await;
    assert!(!session.is_running());
    assert_eq!(session.elapsed_secs(), 0);
}

#[tokio::test(start_paused = true)]
async fn sentinel_never_completes() {
    let mut session = GameSession::default();
    session.start("ada", tasks(), Vec::new());
    assert!(!session.mark_task_complete(TaskId::SENTINEL));
    assert_eq!(session.task_for_page("form-task"), TaskId::SENTINEL);
    assert!(session.tasks().iter().all(|t| !t.completed));
}

#[tokio::test(start_paused = true)]
async fn chatbot_rotates_through_messages() {
    let timing = SessionTiming {
        tick: Duration::from_secs(1),
        rotate_every: Duration::from_secs(2),
    };
    let messages = vec!["Take a number.".to_string(), "Please hold.".to_string()];
    let mut session = GameSession::new(timing);
    session.start("ada", tasks(), messages.clone());

    for _ in 0..5 {
        assert!(messages.contains(&session.current_message()));
        advance_secs(2).await;
    }
}
