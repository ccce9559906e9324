//! Error types for the engine.

use thiserror::Error;

use crate::context::Cancelled;

/// Errors raised by the scheduler and the output surface.
#[derive(Debug, Error)]
pub enum MatrixError {
    /// Nothing to rotate.
    #[error("no boards configured")]
    NoBoards,

    /// The display could not be initialized or written.
    #[error("output surface error: {0}")]
    Surface(String),
}

/// Errors returned from `Board::render`.
#[derive(Debug, Error)]
pub enum BoardError {
    /// The render context was cancelled.
    #[error("render cancelled")]
    Cancelled,

    /// The render failed.
    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

impl BoardError {
    /// Returns true if this error only reports cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<Cancelled> for BoardError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}
