//! Failures at the REST boundary.

use bureausim_proto::envelope::EnvelopeError;
use reqwest::StatusCode;

/// Result alias for backend calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Everything that can go wrong talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The configured base URL does not parse.
    #[error("invalid backend URL `{url}`")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// Building the HTTP client failed.
    #[error("failed to build HTTP client")]
    ClientBuilder {
        #[source]
        source: reqwest::Error,
    },
    /// The request never got a response (connection refused, timeout).
    #[error("request to `{path}` failed")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The backend answered with a non-2xx status.
    #[error("backend returned {status} for `{path}`")]
    Status {
        path: String,
        status: StatusCode,
        detail: Option<String>,
    },
    /// The body was not the expected JSON envelope.
    #[error("failed to decode response from `{path}`")]
    Decode {
        path: String,
        #[source]
        source: reqwest::Error,
    },
    /// The envelope reported failure or carried no data.
    #[error("backend rejected `{path}`: {source}")]
    Envelope {
        path: String,
        #[source]
        source: EnvelopeError,
    },
}

impl ApiError {
    /// Short text suitable for an inline message.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Status {
                status,
                detail: Some(detail),
                ..
            } => format!("server answered {status}: {detail}"),
            Self::Status { status, .. } => format!("server answered {status}"),
            Self::Transport { .. } => "backend unreachable".to_string(),
            Self::Envelope { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }
}
