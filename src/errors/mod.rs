use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

/// A single schema violation reported by the validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    pub instance_path: String,
    pub schema_path: String,
    pub message: String,
}

/// Error taxonomy shared by every harness component.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Invalid or missing configuration. Fix the configuration, do not retry.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Token endpoint unreachable, non-success status or token field missing.
    #[error("auth error: {0}")]
    Auth(String),

    #[error("{message}")]
    Validation {
        message: String,
        violations: Vec<SchemaViolation>,
    },

    #[error("assertion failed: {0}")]
    Assertion(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),
}

impl HarnessError {
    pub fn configuration(message: impl Into<String>) -> Self {
        HarnessError::Configuration(message.into())
    }

    pub fn auth(message: impl Into<String>) -> Self {
        HarnessError::Auth(message.into())
    }

    pub fn assertion(message: impl Into<String>) -> Self {
        HarnessError::Assertion(message.into())
    }

    /// Transport failures are the only errors the retry policy acts on.
    pub fn is_retryable(&self) -> bool {
        matches!(self, HarnessError::Transport(_) | HarnessError::Timeout(_))
    }
}
