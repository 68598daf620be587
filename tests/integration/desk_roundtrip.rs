//! Integration tests for the REST client against the in-process front desk.
//!
//! Tests that `HttpBackend` and the API worker speak the same contract as
//! `bureausim-desk` over real HTTP.
//!
//! These tests validate:
//! - Basic auth is required and wrong credentials surface as a 401
//! - Registration returns a non-empty to-do list and chatbot lines
//! - Content and check endpoints judge submissions correctly
//! - The first score is ranked at percentile 100 and shows on the leaderboard
//! - The worker turns commands into the matching events

use std::time::Duration;

use bureausim::api::client::BackendConfig;
use bureausim::api::{ApiError, Backend, HttpBackend};
use bureausim::net::{self, ApiCommand, ApiEvent};
use bureausim::tasks::{CheckPayload, FlowContent};
use bureausim_proto::payload::{FormInput, PuzzleAnswer, StartRequest, TaskInput};
use bureausim_proto::task::{TaskId, TaskType};

/// Start the desk in-process and return its base URL.
async fn start_desk() -> (String, tokio::task::JoinHandle<()>) {
    let (addr, handle) = bureausim_desk::desk::start_server("127.0.0.1:0")
        .await
        .expect("failed to start desk");
    (format!("http://{addr}"), handle)
}

fn backend(url: &str, password: &str) -> HttpBackend {
    HttpBackend::new(BackendConfig {
        base_url: url.to_string(),
        username: "admin".to_string(),
        password: password.to_string(),
        timeout: Some(Duration::from_secs(5)),
    })
    .expect("valid backend config")
}

fn filled_form(id_number: &str) -> FormInput {
    FormInput {
        full_name: "Ada Lovelace".to_string(),
        id_number: id_number.to_string(),
        date_of_birth: "1815-12-10".to_string(),
        purpose: "Renewal of the renewal".to_string(),
        address: "12 Analytical Lane".to_string(),
        signature: "A. L.".to_string(),
    }
}

#[tokio::test]
async fn wrong_password_is_rejected() {
    let (url, _handle) = start_desk().await;
    let result = backend(&url, "wrong").leaderboard().await;
    match result {
        Err(ApiError::Status { status, .. }) => assert_eq!(status.as_u16(), 401),
        other => panic!("expected 401, got {other:?}"),
    }
}

#[tokio::test]
async fn registration_assigns_tasks() {
    let (url, _handle) = start_desk().await;
    let api = backend(&url, "supersecret");

    let assets = api.start_screen().await.unwrap();
    assert!(!assets.songlist.is_empty());

    let response = api
        .start_session(&StartRequest {
            nickname: "ada".to_string(),
            seed: 42,
        })
        .await
        .unwrap();
    assert!((3..=6).contains(&response.to_do_list.len()));
    assert!(response.to_do_list.iter().all(|t| !t.completed));
    assert!(!response.message_texts().is_empty());
}

#[tokio::test]
async fn form_and_puzzle_checks() {
    let (url, _handle) = start_desk().await;
    let api = backend(&url, "supersecret");

    let schema = api.form_content(TaskId(2)).await.unwrap();
    assert!(!schema.title.is_empty());
    let accepted = api
        .check_form(TaskId(2), &filled_form("123-456-7890"))
        .await
        .unwrap();
    assert!(accepted.is_task_completed);
    let rejected = api
        .check_form(TaskId(2), &filled_form("12-34"))
        .await
        .unwrap();
    assert!(!rejected.is_task_completed);

    let set = api.puzzle_content(TaskId(1)).await.unwrap();
    let first = &set.puzzles[0];
    let wrong = api
        .check_puzzle(
            TaskId(1),
            &PuzzleAnswer {
                puzzle_number: first.id,
                puzzle_key: first.puzzle_key.clone(),
                answer: "31".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(!wrong.is_task_completed);
    let right = api
        .check_puzzle(
            TaskId(1),
            &PuzzleAnswer {
                puzzle_number: first.id,
                puzzle_key: first.puzzle_key.clone(),
                answer: "32".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(right.is_task_completed);
}

#[tokio::test]
async fn captcha_and_task_checks() {
    let (url, _handle) = start_desk().await;
    let api = backend(&url, "supersecret");

    let challenge = api.task_content(TaskId(3)).await.unwrap();
    assert_eq!(challenge.images.len(), 9);
    assert!(challenge.prompt.contains("cabinets"));
    let selected_images: Vec<u8> = challenge
        .images
        .iter()
        .enumerate()
        .filter(|(_, image)| image.as_str() == "cabinet")
        .filter_map(|(i, _)| u8::try_from(i).ok())
        .collect();
    let verdict = api
        .check_task(TaskId(3), &TaskInput::Captcha { selected_images })
        .await
        .unwrap();
    assert!(verdict.is_task_completed);

    let pdf = api
        .check_task(
            TaskId(4),
            &TaskInput::Document {
                file_name: "request.pdf".to_string(),
                file_type: "application/pdf".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(!pdf.is_task_completed);

    let audit = api
        .check_task(TaskId(6), &TaskInput::Audit { audited: true })
        .await
        .unwrap();
    assert!(audit.is_task_completed);

    assert!(!api.payment_status().await.unwrap().payment_accepted);
}

#[tokio::test]
async fn first_score_tops_the_board() {
    let (url, _handle) = start_desk().await;
    let api = backend(&url, "supersecret");

    let result = api.submit_score("ada", 90).await.unwrap();
    assert_eq!(result.percentile, Some(100.0));

    let slower = api.submit_score("bob", 300).await.unwrap();
    assert_eq!(slower.percentile, Some(0.0));

    let entries = api.leaderboard().await.unwrap().entries();
    assert_eq!(entries[0].name.as_deref(), Some("ada"));
    assert_eq!(entries[0].score.as_deref(), Some("1.50"));

    assert!(!api.about_us().await.unwrap().paragraph.is_empty());
}

#[tokio::test]
async fn worker_round_trip() {
    let (url, _handle) = start_desk().await;
    let (tx, mut rx) = net::spawn_api(backend(&url, "supersecret"), 8);

    tx.send(ApiCommand::StartSession {
        nickname: "ada".to_string(),
        seed: 7,
    })
    .await
    .unwrap();
    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timeout waiting for session")
        .expect("channel closed");
    match event {
        ApiEvent::SessionStarted { nickname, response } => {
            assert_eq!(nickname, "ada");
            assert!(!response.to_do_list.is_empty());
        }
        other => panic!("unexpected event: {other:?}"),
    }

    tx.send(ApiCommand::FetchContent {
        task_id: TaskId(2),
        kind: TaskType::Form,
    })
    .await
    .unwrap();
    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timeout waiting for content")
        .expect("channel closed");
    assert!(matches!(
        event,
        ApiEvent::ContentLoaded { task_id: TaskId(2), content: Ok(FlowContent::Form(_)) }
    ));

    tx.send(ApiCommand::Check {
        task_id: TaskId(2),
        payload: CheckPayload::Form(filled_form("123-456-7890")),
    })
    .await
    .unwrap();
    let event = tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timeout waiting for verdict")
        .expect("channel closed");
    assert!(matches!(
        event,
        ApiEvent::CheckResult { task_id: TaskId(2), verdict: Ok(true) }
    ));

    tx.send(ApiCommand::Shutdown).await.unwrap();
}
