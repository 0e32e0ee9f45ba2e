//! Core result and error types for flow execution.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of a successful flow run.
///
/// `data` is the raw response body as delivered by the server; no schema is
/// assumed beyond "valid JSON". `session_id` is lifted out of the body when
/// present so callers can thread it into the next turn of a conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunOutcome {
    pub data: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Errors that can occur when talking to a workflow server.
#[derive(thiserror::Error, Debug)]
pub enum FlowError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("cannot connect to workflow server: {0}")]
    Connect(String),

    #[error("HTTP error {status}: {body}")]
    Http { status: u16, body: String },

    #[error("invalid response body: {0}")]
    Body(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type FlowResult<T> = Result<T, FlowError>;
