//! Error types for the sport board.

use matrix_engine::{BoardError, Cancelled};
use thiserror::Error;

/// Errors that can occur while rendering a league's games.
#[derive(Debug, Error)]
pub enum SportError {
    /// The render context was cancelled.
    #[error("context canceled")]
    Cancelled,

    /// The data source failed.
    #[error("data source error: {0:#}")]
    Api(#[from] anyhow::Error),

    /// Every attempt to fetch a live game failed.
    #[error("failed API call {0} times")]
    RetriesExhausted(u32),

    /// A layout branch failed to draw.
    #[error("render failed: {0}")]
    Render(String),

    /// Invalid board configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl From<Cancelled> for SportError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

impl From<SportError> for BoardError {
    fn from(err: SportError) -> Self {
        match err {
            SportError::Cancelled => BoardError::Cancelled,
            other => BoardError::Failed(anyhow::Error::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancel_maps_to_board_cancel() {
        let err: BoardError = SportError::Cancelled.into();
        assert!(err.is_cancelled());

        let err: BoardError = SportError::RetriesExhausted(3).into();
        assert!(!err.is_cancelled());
        assert_eq!(err.to_string(), "failed API call 3 times");
    }
}
