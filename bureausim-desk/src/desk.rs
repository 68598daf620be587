//! Desk server core: shared state, basic-auth guard, and REST handlers.
//!
//! The desk speaks the same envelope contract as the production backend so
//! the client can be played and tested without it. All state is in memory
//! and lost on restart.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::Json;
use axum::extract::{Path, Query, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post, put};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::Deserialize;

use bureausim_proto::department::{self, DEPARTMENTS};
use bureausim_proto::envelope::ApiEnvelope;
use bureausim_proto::leaderboard::Leaderboard;
use bureausim_proto::payload::{
    AboutUs, ChatbotMessage, CheckRequest, CheckVerdict, FormInput, PaymentStatus, PuzzleAnswer,
    ScoreResult, ScoreSubmission, StartRequest, StartResponse, StartScreenAssets,
};
use bureausim_proto::task::{Task, TaskId, TaskType};

use crate::config::DeskConfig;
use crate::fixtures;
use crate::store::ScoreStore;

/// Longest nickname the desk accepts.
const MAX_NICKNAME_LEN: usize = 20;

/// Reply type shared by every handler.
type Reply<T> = (StatusCode, Json<ApiEnvelope<T>>);

fn ok<T>(data: T) -> Reply<T> {
    (StatusCode::OK, Json(ApiEnvelope::ok(data)))
}

fn fail<T>(status: StatusCode, message: impl Into<String>) -> Reply<T> {
    let label = status.canonical_reason().unwrap_or("Error");
    (status, Json(ApiEnvelope::failure(label, message)))
}

/// Shared desk state.
pub struct DeskState {
    /// Finished runs.
    pub scores: ScoreStore,
    /// Expected `Authorization` header value.
    expected_auth: String,
    /// Fewest departments assigned per player.
    min_tasks: usize,
    /// Which captcha fixture is currently on screen.
    captcha_round: AtomicUsize,
}

impl Default for DeskState {
    fn default() -> Self {
        Self::with_config(&DeskConfig::default())
    }
}

impl DeskState {
    /// Creates desk state from a resolved configuration.
    #[must_use]
    pub fn with_config(config: &DeskConfig) -> Self {
        let token = STANDARD.encode(format!("{}:{}", config.username, config.password));
        Self {
            scores: ScoreStore::new(),
            expected_auth: format!("Basic {token}"),
            min_tasks: config.min_tasks.clamp(1, DEPARTMENTS.len()),
            captcha_round: AtomicUsize::new(0),
        }
    }

    /// Deterministically assign departments for a seed.
    ///
    /// The same seed always yields the same to-do list, in shuffled order.
    #[must_use]
    pub fn assign_tasks(&self, seed: u32) -> Vec<Task> {
        let mut rng = StdRng::seed_from_u64(u64::from(seed));
        let mut picks: Vec<_> = DEPARTMENTS.iter().collect();
        picks.shuffle(&mut rng);
        let count = rng.random_range(self.min_tasks..=DEPARTMENTS.len());
        picks
            .into_iter()
            .take(count)
            .map(|d| Task::new(d.id, d.task_type, d.page_name))
            .collect()
    }

    fn current_captcha_round(&self) -> usize {
        self.captcha_round.load(Ordering::Relaxed)
    }

    fn next_captcha_round(&self) -> usize {
        self.captcha_round.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
    }
}

fn task_type_of(id: TaskId) -> TaskType {
    department::by_id(id.0).map_or(TaskType::Misc, |d| d.task_type)
}

/// Rejects requests without the configured basic-auth credentials.
async fn require_basic_auth(
    State(state): State<Arc<DeskState>>,
    request: Request,
    next: Next,
) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == state.expected_auth);

    if authorized {
        next.run(request).await
    } else {
        tracing::warn!(path = %request.uri().path(), "rejected unauthenticated request");
        fail::<()>(StatusCode::UNAUTHORIZED, "missing or invalid credentials").into_response()
    }
}

async fn start_screen() -> Reply<StartScreenAssets> {
    ok(StartScreenAssets {
        songlist: fixtures::SONGS.iter().map(ToString::to_string).collect(),
    })
}

async fn register_player(
    State(state): State<Arc<DeskState>>,
    Json(body): Json<StartRequest>,
) -> Reply<StartResponse> {
    let nickname = body.nickname.trim();
    if nickname.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "nickname is required");
    }
    if nickname.chars().count() > MAX_NICKNAME_LEN {
        return fail(StatusCode::BAD_REQUEST, "nickname is too long");
    }

    let to_do_list = state.assign_tasks(body.seed);
    tracing::info!(nickname, seed = body.seed, tasks = to_do_list.len(), "player registered");

    ok(StartResponse {
        to_do_list,
        chatbot_messages: fixtures::CHATBOT_LINES
            .iter()
            .map(|line| ChatbotMessage {
                text: (*line).to_string(),
            })
            .collect(),
    })
}

async fn task_content(
    State(state): State<Arc<DeskState>>,
    Path(id): Path<u32>,
) -> Response {
    match task_type_of(TaskId(id)) {
        TaskType::Captcha => ok(fixtures::captcha(state.next_captcha_round())).into_response(),
        other => fail::<()>(
            StatusCode::NOT_FOUND,
            format!("task {id} ({other}) has no challenge content"),
        )
        .into_response(),
    }
}

async fn form_content(Path(id): Path<u32>) -> Response {
    match task_type_of(TaskId(id)) {
        TaskType::Form => ok(fixtures::form_schema()).into_response(),
        _ => fail::<()>(StatusCode::NOT_FOUND, format!("task {id} is not a form")).into_response(),
    }
}

async fn puzzle_content(Path(id): Path<u32>) -> Response {
    match task_type_of(TaskId(id)) {
        TaskType::Puzzle => ok(fixtures::puzzle_set()).into_response(),
        _ => {
            fail::<()>(StatusCode::NOT_FOUND, format!("task {id} is not a puzzle")).into_response()
        }
    }
}

async fn check_task(
    State(state): State<Arc<DeskState>>,
    Path(id): Path<u32>,
    Json(body): Json<CheckRequest<serde_json::Value>>,
) -> Reply<CheckVerdict> {
    let kind = task_type_of(TaskId(id));
    let passed = fixtures::check_generic(kind, &body.user_input, state.current_captcha_round());
    tracing::debug!(task = id, %kind, passed, "task check");
    ok(CheckVerdict {
        is_task_completed: passed,
    })
}

async fn check_form(
    Path(id): Path<u32>,
    Json(body): Json<CheckRequest<FormInput>>,
) -> Reply<CheckVerdict> {
    let passed = fixtures::form_acceptable(&body.user_input);
    tracing::debug!(task = id, passed, "form check");
    ok(CheckVerdict {
        is_task_completed: passed,
    })
}

async fn check_puzzle(Path(id): Path<u32>, Json(body): Json<PuzzleAnswer>) -> Reply<CheckVerdict> {
    let passed = fixtures::puzzle_correct(&body);
    tracing::debug!(task = id, puzzle = body.puzzle_number, passed, "puzzle check");
    ok(CheckVerdict {
        is_task_completed: passed,
    })
}

async fn payment_portal(Path(_id): Path<u32>) -> Reply<PaymentStatus> {
    // Nobody ever actually pays.
    ok(PaymentStatus {
        payment_accepted: false,
    })
}

/// `?nickname=` on the score submission.
#[derive(Debug, Deserialize)]
struct NicknameQuery {
    nickname: Option<String>,
}

async fn submit_score(
    State(state): State<Arc<DeskState>>,
    Query(query): Query<NicknameQuery>,
    Json(body): Json<ScoreSubmission>,
) -> Reply<ScoreResult> {
    let nickname = query
        .nickname
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("Anonymous");
    let percentile = state.scores.record(nickname, body.elapsed_time).await;
    tracing::info!(nickname, seconds = body.elapsed_time, percentile, "score recorded");

    ok(ScoreResult {
        elapsed_time: Some(body.elapsed_time),
        percentile: Some(percentile),
    })
}

async fn leaderboard(State(state): State<Arc<DeskState>>) -> Reply<Leaderboard> {
    ok(Leaderboard {
        leaderboard: Some(state.scores.leaderboard().await),
    })
}

async fn about_us() -> Reply<AboutUs> {
    ok(AboutUs {
        paragraph: fixtures::ABOUT_US.to_string(),
    })
}

/// Builds the desk router with every endpoint behind basic auth.
pub fn router(state: Arc<DeskState>) -> axum::Router {
    axum::Router::new()
        .route("/startscreen/", get(start_screen))
        .route("/user/", post(register_player))
        .route("/user/homescreen/tasks/{id}/", get(task_content))
        .route("/user/homescreen/tasks/{id}", put(check_task))
        .route("/user/homescreen/tasks/{id}/form", get(form_content))
        .route("/user/homescreen/tasks/{id}/form-check", put(check_form))
        .route("/user/homescreen/tasks/{id}/puzzle", get(puzzle_content))
        .route("/user/homescreen/tasks/{id}/puzzle-check", put(check_puzzle))
        .route(
            "/user/homescreen/tasks/{id}/payment-portal/",
            get(payment_portal),
        )
        .route("/endscreen/", post(submit_score))
        .route("/leaderboard/", get(leaderboard))
        .route("/about-us/", get(about_us))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            require_basic_auth,
        ))
        .with_state(state)
}

/// Starts the desk with default state on `addr`.
///
/// Returns the actual bound address (useful when binding to port 0) and a
/// [`tokio::task::JoinHandle`] for the server task.
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server(
    addr: &str,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    start_server_with_state(addr, Arc::new(DeskState::default())).await
}

/// Starts the desk with a pre-configured [`DeskState`].
///
/// # Errors
///
/// Returns an error if the TCP listener cannot bind to the given address.
pub async fn start_server_with_state(
    addr: &str,
    state: Arc<DeskState>,
) -> Result<
    (std::net::SocketAddr, tokio::task::JoinHandle<()>),
    Box<dyn std::error::Error + Send + Sync>,
> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "desk server error");
        }
    });

    Ok((bound_addr, handle))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn start() -> (String, tokio::task::JoinHandle<()>) {
        let (addr, handle) = start_server("127.0.0.1:0").await.unwrap();
        (format!("http://{addr}"), handle)
    }

    fn client() -> reqwest::Client {
        reqwest::Client::new()
    }

    #[test]
    fn same_seed_same_tasks() {
        let state = DeskState::default();
        let a = state.assign_tasks(42);
        let b = state.assign_tasks(42);
        assert_eq!(a, b);
        assert!(a.len() >= 3 && a.len() <= 6);
        assert!(a.iter().all(|t| !t.completed));
    }

    #[test]
    fn assigned_tasks_are_distinct_departments() {
        let state = DeskState::default();
        for seed in 0..50 {
            let tasks = state.assign_tasks(seed);
            let mut ids: Vec<_> = tasks.iter().map(|t| t.id).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), tasks.len());
        }
    }

    #[tokio::test]
    async fn missing_credentials_are_rejected() {
        let (base, _handle) = start().await;
        let resp = client()
            .get(format!("{base}/leaderboard/"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn blank_nickname_is_bad_request() {
        let (base, _handle) = start().await;
        let resp = client()
            .post(format!("{base}/user/"))
            .basic_auth("admin", Some("supersecret"))
            .json(&StartRequest {
                nickname: "   ".to_string(),
                seed: 7,
            })
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn score_submission_records_and_ranks() {
        let (base, _handle) = start().await;
        let resp: ApiEnvelope<ScoreResult> = client()
            .post(format!("{base}/endscreen/?nickname=alice"))
            .basic_auth("admin", Some("supersecret"))
            .json(&ScoreSubmission { elapsed_time: 180 })
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let result = resp.into_result().unwrap();
        assert_eq!(result.elapsed_time, Some(180));
        assert_eq!(result.percentile, Some(100.0));

        let board: ApiEnvelope<Leaderboard> = client()
            .get(format!("{base}/leaderboard/"))
            .basic_auth("admin", Some("supersecret"))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let entries = board.into_result().unwrap().entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].score.as_deref(), Some("3.00"));
    }

    #[tokio::test]
    async fn non_captcha_task_has_no_challenge() {
        let (base, _handle) = start().await;
        let resp = client()
            .get(format!("{base}/user/homescreen/tasks/2/"))
            .basic_auth("admin", Some("supersecret"))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
    }
}
