//! The uniform response envelope wrapped around every backend reply.
//!
//! The backend answers `{ success, data, error, message }` for every
//! endpoint. Callers only care about `data`, so [`ApiEnvelope::into_result`]
//! collapses the envelope into a `Result`.

use serde::{Deserialize, Serialize};

/// Errors produced when an envelope does not carry usable data.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EnvelopeError {
    /// The backend reported `success: false`.
    #[error("backend reported failure: {0}")]
    Rejected(String),
    /// The backend reported success but sent no `data`.
    #[error("backend response carried no data")]
    MissingData,
}

/// Response envelope: `{ success, data, error, message }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the backend considers the request successful.
    pub success: bool,
    /// Operation-specific payload. A missing field reads as `None`.
    pub data: Option<T>,
    /// Short error label (e.g. "Internal Server Error").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Human-readable detail.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Successful envelope carrying `data`.
    #[must_use]
    pub const fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Failed envelope with an error label and detail message.
    #[must_use]
    pub fn failure(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: Some(message.into()),
        }
    }

    /// Collapse the envelope into its payload.
    ///
    /// # Errors
    ///
    /// Returns [`EnvelopeError::Rejected`] when `success` is false and
    /// [`EnvelopeError::MissingData`] when `data` is absent.
    pub fn into_result(self) -> Result<T, EnvelopeError> {
        if !self.success {
            let reason = match (self.error, self.message) {
                (Some(error), Some(message)) => format!("{error}: {message}"),
                (Some(text), None) | (None, Some(text)) => text,
                (None, None) => "unspecified error".to_string(),
            };
            return Err(EnvelopeError::Rejected(reason));
        }
        self.data.ok_or(EnvelopeError::MissingData)
    }
}
