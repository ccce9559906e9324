//! Commands sent from a transport to the board endpoints.

use serde::{Deserialize, Serialize};

use crate::status::SetStatusRequest;

/// Commands that a transport can send to the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixCommand {
    /// Apply a status snapshot to the named board.
    SetStatus {
        board: String,
        request: SetStatusRequest,
    },

    /// Read the current status of the named board.
    GetStatus { board: String },

    /// List the registered board names.
    ListBoards,

    /// Stop the matrix.
    Shutdown,
}

impl MatrixCommand {
    /// The board this command addresses, if any.
    pub fn board(&self) -> Option<&str> {
        match self {
            Self::SetStatus { board, .. } | Self::GetStatus { board } => Some(board),
            Self::ListBoards | Self::Shutdown => None,
        }
    }
}
