//! Runtime reconfiguration endpoint for a sport board.

use std::sync::Arc;

use matrix_ipc::{
    MatrixCommand, MatrixEvent, RpcError, SetStatusRequest, StatusAck, StatusResponse,
};
use tracing::{debug, info, instrument};

use crate::board::SportBoard;
use crate::config::Flag;

/// Serves status reads and writes for one board.
#[derive(Clone)]
pub struct StatusServer {
    board: Arc<SportBoard>,
}

impl StatusServer {
    pub fn new(board: Arc<SportBoard>) -> Self {
        Self { board }
    }

    pub fn board(&self) -> &Arc<SportBoard> {
        &self.board
    }

    /// Name commands are routed by.
    pub fn name(&self) -> &str {
        self.board.league()
    }

    /// Route prefix for this board's endpoint.
    pub fn path_prefix(&self) -> String {
        format!("/{}/sportboard.v1.Sport/", self.board.league().to_lowercase())
    }

    /// Apply a desired status.
    ///
    /// Only flags whose value differs are swapped. Any change cancels the
    /// in-flight render; changes to layout flags also clear the draw cache.
    #[instrument(name = "set_status", skip_all, fields(board = %self.name()))]
    pub fn set_status(&self, request: SetStatusRequest) -> Result<StatusAck, RpcError> {
        let status = request
            .status
            .ok_or_else(|| RpcError::invalid_argument("nil status sent"))?;

        let config = self.board.config();
        let mut ack = StatusAck::default();

        for flag in Flag::ALL {
            let desired = flag.value_in(&status);
            if config.get(flag) == desired || !config.swap(flag, desired) {
                continue;
            }
            debug!(flag = flag.name(), value = desired, "flag changed");
            ack.cancel_board = true;
            if flag.clears_draw_cache() {
                ack.clear_draw_cache = true;
            }
        }

        if ack.clear_draw_cache {
            self.board.clear_draw_cache();
        }
        if ack.cancel_board {
            info!(clear_draw_cache = ack.clear_draw_cache, "status changed, restarting render");
            self.board.cancel_render();
        }

        Ok(ack)
    }

    /// Snapshot of every flag.
    pub fn get_status(&self) -> StatusResponse {
        StatusResponse {
            status: self.board.config().status(),
        }
    }

    /// Answer a routed command. Commands that are not board scoped are
    /// rejected.
    pub fn handle(&self, command: MatrixCommand) -> MatrixEvent {
        let board = self.name().to_string();
        match command {
            MatrixCommand::SetStatus { request, .. } => match self.set_status(request) {
                Ok(ack) => MatrixEvent::Ack { board, ack },
                Err(e) => MatrixEvent::Error(e),
            },
            MatrixCommand::GetStatus { .. } => MatrixEvent::Status {
                board,
                response: self.get_status(),
            },
            other => MatrixEvent::Error(RpcError::invalid_argument(format!(
                "{:?} is not a board command",
                other
            ))),
        }
    }
}
