//! Typed reconfiguration messages for the sports matrix.
//!
//! This crate defines the request/response types exchanged between a
//! command transport and the board status endpoints.

mod commands;
mod error;
mod events;
mod status;

pub use commands::MatrixCommand;
pub use error::{ErrorCode, RpcError};
pub use events::MatrixEvent;
pub use status::{BoardStatus, SetStatusRequest, StatusAck, StatusResponse};

use crossbeam_channel::{Receiver, Sender};

/// Channel capacity for commands (transport → endpoint).
pub const COMMAND_CHANNEL_CAPACITY: usize = 64;

/// Channel capacity for events (endpoint → transport).
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Creates a bounded command channel.
pub fn command_channel() -> (Sender<MatrixCommand>, Receiver<MatrixCommand>) {
    crossbeam_channel::bounded(COMMAND_CHANNEL_CAPACITY)
}

/// Creates a bounded event channel.
pub fn event_channel() -> (Sender<MatrixEvent>, Receiver<MatrixEvent>) {
    crossbeam_channel::bounded(EVENT_CHANNEL_CAPACITY)
}
