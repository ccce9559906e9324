//! JSON-lines command transport over stdin/stdout.
//!
//! Each input line is one serialized [`MatrixCommand`]; each output line is
//! one serialized [`MatrixEvent`].

use std::io::{self, BufRead, Write};
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use matrix_ipc::{MatrixCommand, MatrixEvent, RpcError};
use tracing::{debug, error, warn};

/// Parse one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<MatrixCommand>, RpcError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    serde_json::from_str(line)
        .map(Some)
        .map_err(|e| RpcError::invalid_argument(format!("invalid command: {}", e)))
}

/// Read commands from stdin until EOF.
pub fn spawn_stdin_reader(
    command_tx: Sender<MatrixCommand>,
    event_tx: Sender<MatrixEvent>,
) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdin-commands".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        error!("Failed to read command: {}", e);
                        break;
                    }
                };

                match parse_command(&line) {
                    Ok(Some(command)) => {
                        if command_tx.send(command).is_err() {
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!("{}", e.message);
                        if event_tx.send(MatrixEvent::Error(e)).is_err() {
                            break;
                        }
                    }
                }
            }
            debug!("Command input closed");
        })
}

/// Write events to stdout until every sender is gone.
pub fn spawn_event_writer(event_rx: Receiver<MatrixEvent>) -> io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("stdout-events".to_string())
        .spawn(move || {
            for event in event_rx.iter() {
                let line = match serde_json::to_string(&event) {
                    Ok(line) => line,
                    Err(e) => {
                        error!("Failed to encode event: {}", e);
                        continue;
                    }
                };
                let mut stdout = io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", line).and_then(|_| stdout.flush()) {
                    error!("Failed to write event: {}", e);
                    break;
                }
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use matrix_ipc::ErrorCode;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("  ").unwrap(), None);
        assert_eq!(parse_command(r#""ListBoards""#).unwrap(), Some(MatrixCommand::ListBoards));
        assert_eq!(
            parse_command(r#"{"GetStatus": {"board": "NHL"}}"#).unwrap(),
            Some(MatrixCommand::GetStatus {
                board: "NHL".to_string()
            })
        );

        let cmd = parse_command(r#"{"SetStatus": {"board": "NHL", "request": {"status": {"oddsEnabled": true}}}}"#)
            .unwrap()
            .unwrap();
        match cmd {
            MatrixCommand::SetStatus { board, request } => {
                assert_eq!(board, "NHL");
                let status = request.status.unwrap();
                assert!(status.odds_enabled);
                assert!(!status.enabled);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_is_invalid_argument() {
        let err = parse_command("{not json").unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidArgument);
    }
}
