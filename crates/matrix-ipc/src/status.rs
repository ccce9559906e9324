//! Board status snapshots.

use serde::{Deserialize, Serialize};

/// The runtime behavior flags of a sport board.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardStatus {
    /// Whether the board takes part in the rotation.
    pub enabled: bool,

    /// Hide scores of games involving a favorite team.
    pub favorite_hidden: bool,

    /// Stick to a favorite team's game while it is live.
    pub favorite_sticky: bool,

    /// Scroll games across the display instead of paging.
    pub scroll_enabled: bool,

    /// Tighter spacing between games in scroll mode.
    pub tight_scroll_enabled: bool,

    /// Show team records and rankings.
    pub record_rank_enabled: bool,

    /// Show betting odds.
    pub odds_enabled: bool,

    /// Fade logos into the background with a gradient.
    pub use_gradient: bool,

    /// Only display games that are currently live.
    pub live_only: bool,
}

/// Request body for `SetStatus`.
///
/// `status` is optional on the wire; an absent status is rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetStatusRequest {
    #[serde(default)]
    pub status: Option<BoardStatus>,
}

impl SetStatusRequest {
    /// Wrap a status snapshot into a request.
    pub fn new(status: BoardStatus) -> Self {
        Self {
            status: Some(status),
        }
    }
}

/// Response body for `GetStatus`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: BoardStatus,
}

/// Acknowledgement of an applied `SetStatus`.
///
/// Reports which side effects the change triggered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusAck {
    /// The in-flight render was cancelled.
    pub cancel_board: bool,

    /// The draw cache was replaced with an empty one.
    pub clear_draw_cache: bool,
}
