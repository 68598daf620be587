//! The REST boundary the game talks to.
//!
//! [`Backend`] has one method per backend operation. [`HttpBackend`] is the
//! real implementation; tests substitute their own.

pub mod client;
pub mod error;

use std::future::Future;

use bureausim_proto::leaderboard::Leaderboard;
use bureausim_proto::payload::{
    AboutUs, CaptchaChallenge, CheckVerdict, FormInput, FormSchema, PaymentStatus, PuzzleAnswer,
    PuzzleSet, ScoreResult, StartRequest, StartResponse, StartScreenAssets, TaskInput,
};
use bureausim_proto::task::TaskId;

pub use client::HttpBackend;
pub use error::{ApiError, ApiResult};

/// Async access to every backend operation.
///
/// All calls are independent; none retry or time out on their own unless
/// the implementation was configured to.
pub trait Backend: Send + Sync + 'static {
    /// Song list for the start screen.
    fn start_screen(&self) -> impl Future<Output = ApiResult<StartScreenAssets>> + Send;

    /// Register a player and receive the to-do list.
    fn start_session(
        &self,
        request: &StartRequest,
    ) -> impl Future<Output = ApiResult<StartResponse>> + Send;

    /// Captcha challenge for a task.
    fn task_content(&self, id: TaskId)
    -> impl Future<Output = ApiResult<CaptchaChallenge>> + Send;

    /// Form header for a form task.
    fn form_content(&self, id: TaskId) -> impl Future<Output = ApiResult<FormSchema>> + Send;

    /// Puzzle list for a puzzle task.
    fn puzzle_content(&self, id: TaskId) -> impl Future<Output = ApiResult<PuzzleSet>> + Send;

    /// Judge a task-specific submission.
    fn check_task(
        &self,
        id: TaskId,
        input: &TaskInput,
    ) -> impl Future<Output = ApiResult<CheckVerdict>> + Send;

    /// Judge a filled-in form.
    fn check_form(
        &self,
        id: TaskId,
        input: &FormInput,
    ) -> impl Future<Output = ApiResult<CheckVerdict>> + Send;

    /// Judge one puzzle answer.
    fn check_puzzle(
        &self,
        id: TaskId,
        answer: &PuzzleAnswer,
    ) -> impl Future<Output = ApiResult<CheckVerdict>> + Send;

    /// Whether the coffee bribe was paid.
    fn payment_status(&self) -> impl Future<Output = ApiResult<PaymentStatus>> + Send;

    /// Record a finished run and get its percentile.
    fn submit_score(
        &self,
        nickname: &str,
        elapsed_secs: u64,
    ) -> impl Future<Output = ApiResult<ScoreResult>> + Send;

    /// Current leaderboard, unranked.
    fn leaderboard(&self) -> impl Future<Output = ApiResult<Leaderboard>> + Send;

    /// Credits paragraph.
    fn about_us(&self) -> impl Future<Output = ApiResult<AboutUs>> + Send;
}
