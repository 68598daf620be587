//! Integration tests for the client when the backend misbehaves.
//!
//! These tests validate:
//! - A failed score submission still yields a results screen ("top 50%")
//! - A failed leaderboard fetch renders as an empty board
//! - A failed about-us fetch falls back to the default credits text
//! - A failed registration keeps the player on the start screen
//! - A whitespace nickname never reaches the backend
//! - An unreachable backend behaves like a failing one

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use bureausim::api::client::BackendConfig;
use bureausim::api::{ApiError, ApiResult, Backend, HttpBackend};
use bureausim::app::{App, Results, Screen};
use bureausim::net::{self, ApiCommand, ApiEvent, DEFAULT_ABOUT_US};
use bureausim::session::SessionTiming;
use bureausim::tasks::FlowSettings;
use bureausim_proto::leaderboard::Leaderboard;
use bureausim_proto::payload::{
    AboutUs, CaptchaChallenge, CheckVerdict, FormInput, FormSchema, PaymentStatus, PuzzleAnswer,
    PuzzleSet, ScoreResult, StartRequest, StartResponse, StartScreenAssets, TaskInput,
};
use bureausim_proto::score::DEFAULT_PERCENTILE;
use bureausim_proto::task::{Task, TaskId, TaskType};
use reqwest::StatusCode;

/// A backend that answers every call with a 500 and counts the calls.
#[derive(Clone, Default)]
struct BrokenDesk {
    calls: Arc<AtomicUsize>,
}

impl BrokenDesk {
    fn fail<T>(&self, path: &str) -> ApiResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ApiError::Status {
            path: path.to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: Some("the clerk is on a break".to_string()),
        })
    }
}

impl Backend for BrokenDesk {
    async fn start_screen(&self) -> ApiResult<StartScreenAssets> {
        self.fail("/startscreen/")
    }

    async fn start_session(&self, _request: &StartRequest) -> ApiResult<StartResponse> {
        self.fail("/user/")
    }

    async fn task_content(&self, _id: TaskId) -> ApiResult<CaptchaChallenge> {
        self.fail("/user/homescreen/tasks/")
    }

    async fn form_content(&self, _id: TaskId) -> ApiResult<FormSchema> {
        self.fail("/form")
    }

    async fn puzzle_content(&self, _id: TaskId) -> ApiResult<PuzzleSet> {
        self.fail("/puzzle")
    }

    async fn check_task(&self, _id: TaskId, _input: &TaskInput) -> ApiResult<CheckVerdict> {
        self.fail("/user/homescreen/tasks/")
    }

    async fn check_form(&self, _id: TaskId, _input: &FormInput) -> ApiResult<CheckVerdict> {
        self.fail("/form-check")
    }

    async fn check_puzzle(&self, _id: TaskId, _answer: &PuzzleAnswer) -> ApiResult<CheckVerdict> {
        self.fail("/puzzle-check")
    }

    async fn payment_status(&self) -> ApiResult<PaymentStatus> {
        self.fail("/payment-portal/")
    }

    async fn submit_score(&self, _nickname: &str, _elapsed_secs: u64) -> ApiResult<ScoreResult> {
        self.fail("/endscreen/")
    }

    async fn leaderboard(&self) -> ApiResult<Leaderboard> {
        self.fail("/leaderboard/")
    }

    async fn about_us(&self) -> ApiResult<AboutUs> {
        self.fail("/about-us/")
    }
}

async fn next_event(rx: &mut tokio::sync::mpsc::Receiver<ApiEvent>) -> ApiEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timeout waiting for event")
        .expect("channel closed")
}

#[tokio::test]
async fn score_failure_falls_back_to_median() {
    let (tx, mut rx) = net::spawn_api(BrokenDesk::default(), 8);
    tx.send(ApiCommand::SubmitScore {
        nickname: "ada".to_string(),
        elapsed_secs: 120,
    })
    .await
    .unwrap();

    match next_event(&mut rx).await {
        ApiEvent::ScoreRecorded {
            percentile,
            fallback,
        } => {
            assert_eq!(percentile, DEFAULT_PERCENTILE);
            assert_eq!(percentile.top_percent(), 50);
            assert!(fallback);
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[tokio::test]
async fn listing_failures_degrade_to_defaults() {
    let (tx, mut rx) = net::spawn_api(BrokenDesk::default(), 8);

    tx.send(ApiCommand::LoadLeaderboard).await.unwrap();
    assert!(matches!(
        next_event(&mut rx).await,
        ApiEvent::LeaderboardLoaded(entries) if entries.is_empty()
    ));

    tx.send(ApiCommand::LoadAboutUs).await.unwrap();
    assert!(matches!(
        next_event(&mut rx).await,
        ApiEvent::AboutUsLoaded(text) if text == DEFAULT_ABOUT_US
    ));

    tx.send(ApiCommand::LoadStartScreen).await.unwrap();
    assert!(matches!(
        next_event(&mut rx).await,
        ApiEvent::StartScreenLoaded { songs } if songs.is_empty()
    ));
}

#[tokio::test]
async fn registration_failure_reports_reason() {
    let (tx, mut rx) = net::spawn_api(BrokenDesk::default(), 8);
    tx.send(ApiCommand::StartSession {
        nickname: "ada".to_string(),
        seed: 1,
    })
    .await
    .unwrap();

    let event = next_event(&mut rx).await;
    let ApiEvent::StartFailed(reason) = event else {
        panic!("unexpected event: {event:?}");
    };
    assert!(reason.contains("the clerk is on a break"));

    let mut app = App::new(FlowSettings::default(), SessionTiming::default());
    app.nickname.push('a');
    app.begin();
    app.apply_event(ApiEvent::StartFailed(reason), Instant::now());
    assert_eq!(app.screen, Screen::Start);
    assert!(!app.starting);
}

#[tokio::test]
async fn check_failures_carry_the_task() {
    let (tx, mut rx) = net::spawn_api(BrokenDesk::default(), 8);
    tx.send(ApiCommand::CheckPayment { task_id: TaskId(4) })
        .await
        .unwrap();
    assert!(matches!(
        next_event(&mut rx).await,
        ApiEvent::PaymentResult { task_id: TaskId(4), status: Err(_) }
    ));

    tx.send(ApiCommand::FetchContent {
        task_id: TaskId(3),
        kind: TaskType::Captcha,
    })
    .await
    .unwrap();
    assert!(matches!(
        next_event(&mut rx).await,
        ApiEvent::ContentLoaded { task_id: TaskId(3), content: Err(_) }
    ));
}

#[tokio::test]
async fn whitespace_nickname_makes_no_call() {
    let desk = BrokenDesk::default();
    let calls = Arc::clone(&desk.calls);
    let (tx, _rx) = net::spawn_api(desk, 8);

    let mut app = App::new(FlowSettings::default(), SessionTiming::default());
    app.take_commands();
    for c in "   \t".chars() {
        app.nickname.push(c);
    }
    app.begin();

    for cmd in app.take_commands() {
        tx.send(cmd).await.unwrap();
    }
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert_eq!(app.screen, Screen::Start);
}

#[tokio::test]
async fn results_screen_survives_score_failure() {
    let mut app = App::new(FlowSettings::default(), SessionTiming::default());
    app.session.start(
        "ada",
        vec![Task::new(3, TaskType::Captcha, "captcha-task")],
        Vec::new(),
    );
    app.session.mark_task_complete(TaskId(3));
    app.finish();
    let commands = app.take_commands();
    assert!(matches!(commands.last(), Some(ApiCommand::SubmitScore { .. })));

    let (tx, mut rx) = net::spawn_api(BrokenDesk::default(), 8);
    for cmd in commands {
        tx.send(cmd).await.unwrap();
    }
    // The initial start-screen fetch answers first or second; skip it.
    loop {
        let event = next_event(&mut rx).await;
        let score = matches!(event, ApiEvent::ScoreRecorded { .. });
        app.apply_event(event, Instant::now());
        if score {
            break;
        }
    }

    assert_eq!(app.screen, Screen::Results);
    assert!(matches!(
        &app.results,
        Results::Ready { percentile, fallback: true, .. } if percentile.top_percent() == 50
    ));
}

#[tokio::test]
async fn unreachable_backend_degrades_like_a_broken_one() {
    let backend = HttpBackend::new(BackendConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        username: "admin".to_string(),
        password: "supersecret".to_string(),
        timeout: Some(Duration::from_secs(2)),
    })
    .unwrap();
    let (tx, mut rx) = net::spawn_api(backend, 8);

    tx.send(ApiCommand::SubmitScore {
        nickname: "ada".to_string(),
        elapsed_secs: 60,
    })
    .await
    .unwrap();
    assert!(matches!(
        next_event(&mut rx).await,
        ApiEvent::ScoreRecorded { fallback: true, .. }
    ));
}
