//! Uniform error envelope of the key-lending API.
//!
//! The backend answers every failure with the same JSON shape. Anything else
//! that goes wrong on the way (transport, decoding, a body that is not an
//! envelope) is folded into the same shape under `UNEXPECTED_ERROR`, so callers
//! only ever handle one error type when reporting to the operator.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNEXPECTED_ERROR: &str = "UNEXPECTED_ERROR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorResponse {
    pub status_code: u16,
    #[serde(default)]
    pub identifier: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}", .0.description)]
pub struct ApiError(pub ApiErrorResponse);

impl ApiError {
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        self.0.status_code
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.0.identifier
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.0.description
    }

    #[must_use]
    pub const fn details(&self) -> Option<&serde_json::Value> {
        self.0.details.as_ref()
    }

    #[must_use]
    pub fn is_unexpected(&self) -> bool {
        self.0.identifier == UNEXPECTED_ERROR
    }

    /// Wraps an arbitrary failure message under `UNEXPECTED_ERROR`.
    #[must_use]
    pub fn unexpected(description: impl Into<String>) -> Self {
        Self(ApiErrorResponse {
            status_code: 500,
            identifier: UNEXPECTED_ERROR.to_string(),
            description: description.into(),
            timestamp: Utc::now().to_rfc3339(),
            path: String::new(),
            method: String::new(),
            details: None,
        })
    }

    /// Parses a response body as an error envelope.
    ///
    /// Returns `None` when the body is not JSON or has no `identifier`.
    #[must_use]
    pub fn from_body(body: &str) -> Option<Self> {
        let envelope: ApiErrorResponse = serde_json::from_str(body).ok()?;
        if envelope.identifier.is_empty() {
            return None;
        }
        Some(Self(envelope))
    }
}

/// Normalises any failure into an [`ApiError`].
///
/// Recognises an envelope produced by the HTTP layer anywhere in the error
/// chain; otherwise synthesises `UNEXPECTED_ERROR` whose description is the
/// whole chain, so the underlying cause stays visible.
#[must_use]
pub fn handle_api_error(err: &anyhow::Error) -> ApiError {
    if let Some(api) = err.chain().find_map(|e| e.downcast_ref::<ApiError>()) {
        return api.clone();
    }

    tracing::debug!(error = ?err, "Unclassified error wrapped as UNEXPECTED_ERROR");
    ApiError::unexpected(format!("{err:#}"))
}
