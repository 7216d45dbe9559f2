//! Error taxonomy for API calls.

use thiserror::Error;
use wlms_session::SessionError;

/// Anything that can go wrong between a terminal and the backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No usable credentials: refresh failed or nothing was signed in.
    /// The session has already been cleared when this surfaces.
    #[error("unauthorized")]
    Unauthorized,

    /// The backend answered with a non-success status.
    #[error("request failed ({status}): {message}")]
    RequestFailed { status: u16, message: String },

    /// Connection, DNS or protocol-level failure.
    #[error("network: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected shape.
    #[error("decode: {0}")]
    Decode(String),

    /// Credential storage failed underneath the client.
    #[error("session: {0}")]
    Session(#[from] SessionError),

    /// A catalog call named a resource the backend does not expose.
    #[error("unknown resource type: {0}")]
    UnknownResource(String),
}

impl ApiError {
    /// Status code of a server rejection, if that is what this is.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Pulls a human-readable message out of an error response body.
///
/// The backend reports failures as JSON with a `detail` field (FastAPI
/// convention) and occasionally `message`. Non-JSON bodies are passed
/// through as-is so proxy error pages stay visible.
pub fn extract_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "message"] {
            match value.get(key) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => return s.clone(),
                Some(serde_json::Value::String(_)) | Some(serde_json::Value::Null) | None => {}
                // Validation errors arrive as structured detail; keep the JSON.
                Some(other) => return other.to_string(),
            }
        }
    }
    body.trim().to_string()
}
