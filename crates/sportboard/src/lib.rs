//! League game board for the sports matrix.
//!
//! A [`SportBoard`] rotates through today's games for one league, fetching
//! the next game's live state in the background while the current game is
//! on display. A [`StatusServer`] exposes the board's behavior flags for
//! runtime reconfiguration.

mod api;
mod board;
mod config;
mod draw_cache;
mod error;
mod layout;
mod preloader;
mod retry;
mod server;

pub use api::{Api, Game, GameId, GameState, Team};
pub use board::SportBoard;
pub use config::{BoardSettings, Flag, FontConfig, SportConfig};
pub use draw_cache::{DrawCache, SharedDrawCache};
pub use error::SportError;
pub use preloader::{LivePreloader, PreloadSlot, ReadySignal};
pub use retry::RetryPolicy;
pub use server::StatusServer;

/// Result type for board operations.
pub type SportResult<T> = Result<T, SportError>;

/// Maximum attempts to fetch a game's live state.
pub const MAX_API_TRIES: u32 = 3;

/// Delay between failed live state fetches, in seconds.
pub const API_RETRY_DELAY_SECS: u64 = 10;
