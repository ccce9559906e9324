//! Error types returned to reconfiguration callers.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error class reported to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request was malformed.
    InvalidArgument,

    /// The addressed board does not exist.
    NotFound,

    /// The endpoint failed while handling a valid request.
    Internal,
}

impl ErrorCode {
    /// Returns true for errors caused by the caller rather than the system.
    pub fn is_client_error(self) -> bool {
        matches!(self, Self::InvalidArgument | Self::NotFound)
    }
}

/// An error returned by a status endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code:?}: {message}")]
pub struct RpcError {
    pub code: ErrorCode,
    pub message: String,
}

impl RpcError {
    /// Create a new error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Shorthand for an `InvalidArgument` error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidArgument, message)
    }

    /// Shorthand for a `NotFound` error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }
}
