//! Command routing between the transport and the board endpoints.

use std::time::Duration;

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};
use matrix_engine::Context;
use matrix_ipc::{MatrixCommand, MatrixEvent, RpcError};
use sportboard::StatusServer;
use tracing::{debug, info, instrument, warn};

/// Dispatches transport commands to the board status endpoints.
pub struct CommandRouter {
    command_rx: Receiver<MatrixCommand>,
    event_tx: Sender<MatrixEvent>,
    servers: Vec<StatusServer>,
    root: Context,
}

impl CommandRouter {
    pub fn new(
        command_rx: Receiver<MatrixCommand>,
        event_tx: Sender<MatrixEvent>,
        servers: Vec<StatusServer>,
        root: Context,
    ) -> Self {
        Self {
            command_rx,
            event_tx,
            servers,
            root,
        }
    }

    /// Route commands until shutdown (blocking).
    #[instrument(name = "router_run", skip(self))]
    pub fn run(&self) {
        for server in &self.servers {
            info!(board = server.name(), path = %server.path_prefix(), "Status endpoint ready");
        }

        loop {
            match self.command_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(command) => {
                    if !self.handle_command(command) {
                        break;
                    }
                }
                Err(RecvTimeoutError::Timeout) => {
                    if self.root.is_cancelled() {
                        break;
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("Command channel disconnected");
                    break;
                }
            }
        }

        info!("Router stopped");
    }

    /// Handle a command. Returns false if the router should stop.
    fn handle_command(&self, command: MatrixCommand) -> bool {
        debug!(?command, "Handling command");

        let event = match command {
            MatrixCommand::ListBoards => {
                MatrixEvent::Boards(self.servers.iter().map(|s| s.name().to_string()).collect())
            }
            MatrixCommand::Shutdown => {
                info!("Shutdown requested");
                self.root.cancel();
                self.send_event(MatrixEvent::Shutdown);
                return false;
            }
            command => match command.board().and_then(|b| self.server(b)) {
                Some(server) => server.handle(command),
                None => {
                    let board = command.board().unwrap_or_default();
                    MatrixEvent::Error(RpcError::not_found(format!("no board named {:?}", board)))
                }
            },
        };

        self.send_event(event);
        true
    }

    fn server(&self, board: &str) -> Option<&StatusServer> {
        self.servers
            .iter()
            .find(|s| s.name().eq_ignore_ascii_case(board))
    }

    fn send_event(&self, event: MatrixEvent) {
        if let Err(e) = self.event_tx.send(event) {
            warn!("Failed to send event: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use matrix_engine::Rect;
    use matrix_ipc::{ErrorCode, SetStatusRequest};
    use sportboard::{SportBoard, SportConfig};

    use crate::display::BlockTextWriter;
    use crate::fixture::{FixtureApi, FixtureData};

    fn server(league: &str) -> StatusServer {
        let data: FixtureData = serde_json::from_str(&format!(
            r#"{{"league": "{}", "teams": [{{"id": 1, "abbreviation": "AAA", "name": "A"}}]}}"#,
            league
        ))
        .unwrap();
        let board = SportBoard::new(
            &Context::new(),
            Arc::new(FixtureApi::from_data(data)),
            Arc::new(BlockTextWriter),
            Rect::sized(64, 32),
            Arc::new(SportConfig::default()),
        )
        .unwrap();
        StatusServer::new(Arc::new(board))
    }

    fn router() -> (Sender<MatrixCommand>, Receiver<MatrixEvent>, Context, CommandRouter) {
        let (command_tx, command_rx) = matrix_ipc::command_channel();
        let (event_tx, event_rx) = matrix_ipc::event_channel();
        let root = Context::new();
        let router = CommandRouter::new(
            command_rx,
            event_tx,
            vec![server("NHL"), server("MLB")],
            root.clone(),
        );
        (command_tx, event_rx, root, router)
    }

    #[test]
    fn test_routes_by_board_name() {
        let (_tx, event_rx, _root, router) = router();

        assert!(router.handle_command(MatrixCommand::ListBoards));
        assert_eq!(
            event_rx.try_recv().unwrap(),
            MatrixEvent::Boards(vec!["NHL".to_string(), "MLB".to_string()])
        );

        let mut status = router.servers[1].get_status().status;
        status.odds_enabled = true;
        router.handle_command(MatrixCommand::SetStatus {
            board: "mlb".to_string(),
            request: SetStatusRequest::new(status),
        });
        match event_rx.try_recv().unwrap() {
            MatrixEvent::Ack { board, ack } => {
                assert_eq!(board, "MLB");
                assert!(ack.clear_draw_cache);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(!router.servers[0].get_status().status.odds_enabled);
    }

    #[test]
    fn test_unknown_board_is_not_found() {
        let (_tx, event_rx, _root, router) = router();

        router.handle_command(MatrixCommand::GetStatus {
            board: "NBA".to_string(),
        });
        match event_rx.try_recv().unwrap() {
            MatrixEvent::Error(e) => assert_eq!(e.code, ErrorCode::NotFound),
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[test]
    fn test_shutdown_cancels_root() {
        let (tx, event_rx, root, router) = router();

        tx.send(MatrixCommand::Shutdown).unwrap();
        router.run();

        assert!(root.is_cancelled());
        assert_eq!(event_rx.try_recv().unwrap(), MatrixEvent::Shutdown);
    }
}
