//! Events sent from the board endpoints back to a transport.

use serde::{Deserialize, Serialize};

use crate::error::RpcError;
use crate::status::{StatusAck, StatusResponse};

/// Responses and notifications produced by the matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatrixEvent {
    /// A `SetStatus` was applied.
    Ack { board: String, ack: StatusAck },

    /// Current status of a board.
    Status {
        board: String,
        response: StatusResponse,
    },

    /// Registered board names.
    Boards(Vec<String>),

    /// A request failed.
    Error(RpcError),

    /// The matrix has shut down.
    Shutdown,
}
