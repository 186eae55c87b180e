// SPDX-License-Identifier: MIT

//! Application error types and failure-response classification.
//!
//! All classification of backend failure responses happens here, once, at the
//! HTTP boundary. Downstream code (session store, views) only ever sees the
//! tagged [`ErrorPayload`] and never inspects raw response bodies.

use std::collections::BTreeMap;

use serde_json::Value;

/// Fallback text shown when a failure carries no usable message.
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong. Please try again.";

/// Fallback text for transport-level failures (no response at all).
pub const TRANSPORT_FAILURE_MESSAGE: &str = "Could not reach the server. Check your connection.";

/// Client-side error type covering the full failure taxonomy.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No response: DNS, connect, TLS, or mid-body failures.
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The backend rejected the credential (401).
    ///
    /// Carries the classified body (e.g. "No active account found…" from the
    /// login endpoint). On authenticated requests this is fatal to the
    /// session regardless of the payload.
    #[error("Authorization failure")]
    Unauthorized(ErrorPayload),

    /// Structured validation failure (4xx with a recognizable body).
    #[error("Validation failure")]
    Validation(ErrorPayload),

    /// Any other non-success response.
    #[error("Server failure (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    /// Local persistence failure (token / snapshot store).
    #[error("Local storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Human-readable payload for display.
    ///
    /// Transport and generic server failures collapse to fixed fallback
    /// strings; validation failures keep their per-field text. The raw error
    /// is always logged before this conversion discards it.
    pub fn display_payload(&self) -> ErrorPayload {
        match self {
            ApiError::Transport(_) => ErrorPayload::Message(TRANSPORT_FAILURE_MESSAGE.to_string()),
            ApiError::Unauthorized(payload) | ApiError::Validation(payload) => payload.clone(),
            ApiError::Server { .. } | ApiError::Storage(_) | ApiError::Internal(_) => {
                ErrorPayload::Message(GENERIC_FAILURE_MESSAGE.to_string())
            }
        }
    }
}

/// Tagged error payload surfaced to the UI.
///
/// Decided once when the failure response is classified; view code matches on
/// the variant instead of shape-sniffing a duck-typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorPayload {
    /// A single human-readable message.
    Message(String),
    /// Per-field validation text, e.g. `username -> "This username is already taken"`.
    FieldErrors(BTreeMap<String, String>),
}

impl ErrorPayload {
    /// Classify a failure response body into a tagged payload.
    ///
    /// Recognized shapes (from the backend's DRF-style responses):
    /// - `{"detail": "..."}` — a single message
    /// - `{"field": "msg"}` or `{"field": ["msg", ...]}` — field errors
    /// - a bare JSON string — a single message
    /// - anything else — the generic fallback message
    pub fn classify(body: &str) -> Self {
        let Ok(value) = serde_json::from_str::<Value>(body) else {
            // Not JSON at all; show the fallback rather than raw HTML or text.
            return ErrorPayload::Message(GENERIC_FAILURE_MESSAGE.to_string());
        };

        match value {
            Value::String(msg) if !msg.is_empty() => ErrorPayload::Message(msg),
            Value::Object(map) => {
                if let Some(Value::String(detail)) = map.get("detail") {
                    return ErrorPayload::Message(detail.clone());
                }

                let mut fields = BTreeMap::new();
                for (key, val) in &map {
                    if let Some(msg) = first_message(val) {
                        fields.insert(key.clone(), msg);
                    }
                }

                if fields.is_empty() {
                    ErrorPayload::Message(GENERIC_FAILURE_MESSAGE.to_string())
                } else {
                    ErrorPayload::FieldErrors(fields)
                }
            }
            _ => ErrorPayload::Message(GENERIC_FAILURE_MESSAGE.to_string()),
        }
    }

    /// Flatten to a single display string (error banners, logs).
    pub fn to_display_string(&self) -> String {
        match self {
            ErrorPayload::Message(msg) => msg.clone(),
            ErrorPayload::FieldErrors(fields) => fields
                .iter()
                .map(|(field, msg)| format!("{}: {}", field, msg))
                .collect::<Vec<_>>()
                .join("; "),
        }
    }
}

/// Extract the first message from a DRF-style field error value
/// (either a string or an array of strings).
fn first_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.iter().find_map(|v| match v {
            Value::String(s) => Some(s.clone()),
            _ => None,
        }),
        _ => None,
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;
