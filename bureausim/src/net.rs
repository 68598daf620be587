//! Background worker bridging the TUI loop to the backend.
//!
//! The main thread sends [`ApiCommand`]s and drains [`ApiEvent`]s on every
//! pass of its poll loop. Each command runs on its own tokio task, so a
//! slow call never holds up the UI or the calls behind it.
//!
//! ```text
//! TUI (main thread)  ←── ApiEvent ───  per-command tokio tasks
//!                     ─── ApiCommand →
//! ```
//!
//! Failure policy lives here: score and leaderboard failures are replaced
//! by defaults so the screens behind them always render.

use std::sync::Arc;

use tokio::sync::mpsc;

use bureausim_proto::leaderboard::LeaderboardEntry;
use bureausim_proto::payload::{StartRequest, StartResponse};
use bureausim_proto::score::{DEFAULT_PERCENTILE, Percentile};
use bureausim_proto::task::{TaskId, TaskType};

use crate::api::{ApiResult, Backend};
use crate::tasks::{CheckPayload, FlowContent};

/// Credits text used when the backend has none to give.
pub const DEFAULT_ABOUT_US: &str = "Welcome to Bureaucracy Simulator!";

/// Default channel capacity for commands and events.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Requests from the TUI.
#[derive(Debug, Clone)]
pub enum ApiCommand {
    /// Fetch the start-screen song list.
    LoadStartScreen,
    /// Register the player.
    StartSession {
        /// Validated nickname.
        nickname: String,
        /// Random seed sent along.
        seed: u32,
    },
    /// Load a task's content.
    FetchContent {
        /// Task the content is for.
        task_id: TaskId,
        /// Decides which endpoint is used.
        kind: TaskType,
    },
    /// Judge a submission.
    Check {
        /// Task being judged.
        task_id: TaskId,
        /// What to judge.
        payload: CheckPayload,
    },
    /// Ask whether the coffee was paid for.
    CheckPayment {
        /// Task that asked.
        task_id: TaskId,
    },
    /// Record the finished run.
    SubmitScore {
        /// Player nickname.
        nickname: String,
        /// Final time in seconds.
        elapsed_secs: u64,
    },
    /// Fetch the leaderboard.
    LoadLeaderboard,
    /// Fetch the credits paragraph.
    LoadAboutUs,
    /// Stop accepting commands.
    Shutdown,
}

/// Replies for the TUI.
#[derive(Debug, Clone)]
pub enum ApiEvent {
    /// Song list arrived.
    StartScreenLoaded {
        /// Song URLs.
        songs: Vec<String>,
    },
    /// Registration succeeded.
    SessionStarted {
        /// Nickname that was registered.
        nickname: String,
        /// Tasks and chatbot lines.
        response: StartResponse,
    },
    /// Registration failed; the player stays on the start screen.
    StartFailed(String),
    /// Task content arrived (or could not be loaded).
    ContentLoaded {
        /// Task the content is for.
        task_id: TaskId,
        /// Content or failure reason.
        content: Result<FlowContent, String>,
    },
    /// A verdict arrived (or the check failed).
    CheckResult {
        /// Task that was judged.
        task_id: TaskId,
        /// Verdict or failure reason.
        verdict: Result<bool, String>,
    },
    /// Payment status arrived (or the check failed).
    PaymentResult {
        /// Task that asked.
        task_id: TaskId,
        /// Whether payment was accepted, or failure reason.
        status: Result<bool, String>,
    },
    /// The run's percentile.
    ScoreRecorded {
        /// Percentile to show.
        percentile: Percentile,
        /// True when the backend failed and the default was substituted.
        fallback: bool,
    },
    /// Leaderboard rows; empty when loading failed.
    LeaderboardLoaded(Vec<LeaderboardEntry>),
    /// Credits paragraph, or [`DEFAULT_ABOUT_US`].
    AboutUsLoaded(String),
}

/// Spawn the worker and return its channel handles.
///
/// Must be called from within a tokio runtime. The worker stops on
/// [`ApiCommand::Shutdown`] or when the command sender is dropped.
pub fn spawn_api<B: Backend>(
    backend: B,
    capacity: usize,
) -> (mpsc::Sender<ApiCommand>, mpsc::Receiver<ApiEvent>) {
    let (cmd_tx, cmd_rx) = mpsc::channel::<ApiCommand>(capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<ApiEvent>(capacity);

    let backend = Arc::new(backend);
    tokio::spawn(async move {
        command_loop(backend, cmd_rx, evt_tx).await;
    });

    (cmd_tx, evt_rx)
}

async fn command_loop<B: Backend>(
    backend: Arc<B>,
    mut cmd_rx: mpsc::Receiver<ApiCommand>,
    evt_tx: mpsc::Sender<ApiEvent>,
) {
    while let Some(cmd) = cmd_rx.recv().await {
        if matches!(cmd, ApiCommand::Shutdown) {
            tracing::info!("api worker shutting down");
            break;
        }
        let backend = Arc::clone(&backend);
        let evt_tx = evt_tx.clone();
        tokio::spawn(async move {
            let event = execute(backend.as_ref(), cmd).await;
            if let Some(event) = event
                && evt_tx.send(event).await.is_err()
            {
                tracing::debug!("event receiver dropped");
            }
        });
    }
}

/// Run one command against the backend and turn the outcome into an event.
///
/// Returns `None` for [`ApiCommand::Shutdown`].
pub async fn execute<B: Backend>(backend: &B, cmd: ApiCommand) -> Option<ApiEvent> {
    let event = match cmd {
        ApiCommand::LoadStartScreen => {
            let songs = backend
                .start_screen()
                .await
                .map(|assets| assets.songlist)
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "start screen assets unavailable");
                    Vec::new()
                });
            ApiEvent::StartScreenLoaded { songs }
        }
        ApiCommand::StartSession { nickname, seed } => {
            let request = StartRequest {
                nickname: nickname.clone(),
                seed,
            };
            match backend.start_session(&request).await {
                Ok(response) => ApiEvent::SessionStarted { nickname, response },
                Err(e) => {
                    tracing::warn!(error = %e, "session start failed");
                    ApiEvent::StartFailed(e.summary())
                }
            }
        }
        ApiCommand::FetchContent { task_id, kind } => ApiEvent::ContentLoaded {
            task_id,
            content: fetch_content(backend, task_id, kind).await,
        },
        ApiCommand::Check { task_id, payload } => {
            let verdict = match &payload {
                CheckPayload::Task(input) => backend.check_task(task_id, input).await,
                CheckPayload::Form(input) => backend.check_form(task_id, input).await,
                CheckPayload::Puzzle(answer) => backend.check_puzzle(task_id, answer).await,
            };
            ApiEvent::CheckResult {
                task_id,
                verdict: summarize(verdict.map(|v| v.is_task_completed)),
            }
        }
        ApiCommand::CheckPayment { task_id } => ApiEvent::PaymentResult {
            task_id,
            status: summarize(backend.payment_status().await.map(|p| p.payment_accepted)),
        },
        ApiCommand::SubmitScore {
            nickname,
            elapsed_secs,
        } => match backend.submit_score(&nickname, elapsed_secs).await {
            Ok(result) => ApiEvent::ScoreRecorded {
                percentile: result
                    .percentile
                    .map_or(DEFAULT_PERCENTILE, Percentile::from_wire),
                fallback: false,
            },
            Err(e) => {
                tracing::warn!(error = %e, "score submission failed, using default percentile");
                ApiEvent::ScoreRecorded {
                    percentile: DEFAULT_PERCENTILE,
                    fallback: true,
                }
            }
        },
        ApiCommand::LoadLeaderboard => {
            let entries = backend
                .leaderboard()
                .await
                .map(bureausim_proto::leaderboard::Leaderboard::entries)
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "leaderboard unavailable");
                    Vec::new()
                });
            ApiEvent::LeaderboardLoaded(entries)
        }
        ApiCommand::LoadAboutUs => {
            let paragraph = backend
                .about_us()
                .await
                .ok()
                .map(|a| a.paragraph)
                .filter(|p| !p.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ABOUT_US.to_string());
            ApiEvent::AboutUsLoaded(paragraph)
        }
        ApiCommand::Shutdown => return None,
    };
    Some(event)
}

async fn fetch_content<B: Backend>(
    backend: &B,
    task_id: TaskId,
    kind: TaskType,
) -> Result<FlowContent, String> {
    let content = match kind {
        TaskType::Form => backend.form_content(task_id).await.map(FlowContent::Form),
        TaskType::Puzzle => backend
            .puzzle_content(task_id)
            .await
            .map(FlowContent::Puzzles),
        TaskType::Captcha
        | TaskType::Coffee
        | TaskType::Signature
        | TaskType::Display
        | TaskType::Misc => backend
            .task_content(task_id)
            .await
            .map(FlowContent::Captcha),
    };
    summarize(content)
}

fn summarize<T>(result: ApiResult<T>) -> Result<T, String> {
    result.map_err(|e| {
        tracing::debug!(error = %e, "backend call failed");
        e.summary()
    })
}
