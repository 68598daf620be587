//! reqwest implementation of [`Backend`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Method};
use serde::Serialize;
use serde::de::DeserializeOwned;

use bureausim_proto::envelope::ApiEnvelope;
use bureausim_proto::leaderboard::Leaderboard;
use bureausim_proto::payload::{
    AboutUs, CaptchaChallenge, CheckRequest, CheckVerdict, FormInput, FormSchema, PaymentStatus,
    PuzzleAnswer, PuzzleSet, ScoreResult, ScoreSubmission, StartRequest, StartResponse,
    StartScreenAssets, TaskInput,
};
use bureausim_proto::task::TaskId;

use super::Backend;
use super::error::{ApiError, ApiResult};

/// Task id the payment portal lives under.
const PAYMENT_TASK_ID: u32 = 9;

/// Connection settings for [`HttpBackend`].
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// Base URL, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Basic-auth user name.
    pub username: String,
    /// Basic-auth password.
    pub password: String,
    /// Per-request timeout; `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

/// Talks to the backend over HTTP with basic auth on every request.
#[derive(Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: Arc<str>,
    auth: (Arc<str>, Arc<str>),
}

impl std::fmt::Debug for HttpBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpBackend")
            .field("base_url", &self.base_url)
            .field("username", &self.auth.0)
            .finish_non_exhaustive()
    }
}

impl HttpBackend {
    /// Validate the base URL and build the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::InvalidBaseUrl`] for an unparseable URL and
    /// [`ApiError::ClientBuilder`] if the TLS stack cannot be set up.
    pub fn new(config: BackendConfig) -> ApiResult<Self> {
        url::Url::parse(&config.base_url).map_err(|source| ApiError::InvalidBaseUrl {
            url: config.base_url.clone(),
            source,
        })?;

        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|source| ApiError::ClientBuilder { source })?;

        Ok(Self {
            client,
            base_url: Arc::from(config.base_url.trim_end_matches('/')),
            auth: (Arc::from(config.username), Arc::from(config.password)),
        })
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let (user, pass) = &self.auth;
        self.client
            .request(method, url)
            .basic_auth(user.as_ref(), Some(pass.as_ref()))
    }

    async fn send<T>(&self, path: &str, builder: reqwest::RequestBuilder) -> ApiResult<T>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(path, "backend request");
        let response = builder.send().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are envelopes too when the backend is healthy.
            let detail = response
                .json::<ApiEnvelope<serde_json::Value>>()
                .await
                .ok()
                .and_then(|env| env.message.or(env.error));
            tracing::warn!(path, %status, "backend returned error status");
            return Err(ApiError::Status {
                path: path.to_string(),
                status,
                detail,
            });
        }

        let envelope =
            response
                .json::<ApiEnvelope<T>>()
                .await
                .map_err(|source| ApiError::Decode {
                    path: path.to_string(),
                    source,
                })?;

        envelope.into_result().map_err(|source| ApiError::Envelope {
            path: path.to_string(),
            source,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        self.send(path, self.request(Method::GET, path)).await
    }

    async fn with_body<B, T>(&self, method: Method, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        self.send(path, self.request(method, path).json(body)).await
    }
}

fn task_path(id: TaskId, suffix: &str) -> String {
    format!("/user/homescreen/tasks/{id}{suffix}")
}

impl Backend for HttpBackend {
    async fn start_screen(&self) -> ApiResult<StartScreenAssets> {
        self.get("/startscreen/").await
    }

    async fn start_session(&self, request: &StartRequest) -> ApiResult<StartResponse> {
        self.with_body(Method::POST, "/user/", request).await
    }

    async fn task_content(&self, id: TaskId) -> ApiResult<CaptchaChallenge> {
        self.get(&task_path(id, "/")).await
    }

    async fn form_content(&self, id: TaskId) -> ApiResult<FormSchema> {
        self.get(&task_path(id, "/form")).await
    }

    async fn puzzle_content(&self, id: TaskId) -> ApiResult<PuzzleSet> {
        self.get(&task_path(id, "/puzzle")).await
    }

    async fn check_task(&self, id: TaskId, input: &TaskInput) -> ApiResult<CheckVerdict> {
        let body = CheckRequest { user_input: input };
        self.with_body(Method::PUT, &task_path(id, ""), &body).await
    }

    async fn check_form(&self, id: TaskId, input: &FormInput) -> ApiResult<CheckVerdict> {
        let body = CheckRequest { user_input: input };
        self.with_body(Method::PUT, &task_path(id, "/form-check"), &body)
            .await
    }

    async fn check_puzzle(&self, id: TaskId, answer: &PuzzleAnswer) -> ApiResult<CheckVerdict> {
        self.with_body(Method::PUT, &task_path(id, "/puzzle-check"), answer)
            .await
    }

    async fn payment_status(&self) -> ApiResult<PaymentStatus> {
        self.get(&task_path(TaskId(PAYMENT_TASK_ID), "/payment-portal/"))
            .await
    }

    async fn submit_score(&self, nickname: &str, elapsed_secs: u64) -> ApiResult<ScoreResult> {
        let path = "/endscreen/";
        let builder = self
            .request(Method::POST, path)
            .query(&[("nickname", nickname)])
            .json(&ScoreSubmission {
                elapsed_time: elapsed_secs,
            });
        self.send(path, builder).await
    }

    async fn leaderboard(&self) -> ApiResult<Leaderboard> {
        self.get("/leaderboard/").await
    }

    async fn about_us(&self) -> ApiResult<AboutUs> {
        self.get("/about-us/").await
    }
}
