//! Data source capabilities consumed by the board.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate};
use matrix_engine::{Context, Fragment, Rect};
use tracing::error;

/// Identifier of a game within a league.
pub type GameId = i64;

/// A team snapshot.
///
/// Teams are compared by `id`, never by display name.
pub trait Team: Send + Sync {
    fn id(&self) -> i64;
    fn name(&self) -> String;
    fn abbreviation(&self) -> String;
    fn score(&self) -> i32;
}

/// A scheduled game.
///
/// Games are immutable snapshots; `update` returns a fresh one.
pub trait Game: Send + Sync {
    fn id(&self) -> GameId;
    fn link(&self) -> anyhow::Result<String>;
    fn is_live(&self) -> anyhow::Result<bool>;
    fn is_complete(&self) -> anyhow::Result<bool>;
    fn home_team(&self) -> anyhow::Result<Arc<dyn Team>>;
    fn away_team(&self) -> anyhow::Result<Arc<dyn Team>>;

    /// Current period (quarter, inning, ...).
    fn period(&self) -> anyhow::Result<u32>;

    fn clock(&self) -> anyhow::Result<String>;

    /// Fetch the game's current state.
    fn update(&self, ctx: &Context) -> anyhow::Result<Arc<dyn Game>>;

    fn start_time(&self, ctx: &Context) -> anyhow::Result<DateTime<Local>>;
}

/// A league's data source.
pub trait Api: Send + Sync {
    fn teams(&self, ctx: &Context) -> anyhow::Result<Vec<Arc<dyn Team>>>;

    fn team_from_abbreviation(&self, ctx: &Context, abbreviation: &str)
        -> anyhow::Result<Arc<dyn Team>>;

    fn scheduled_games(&self, ctx: &Context, date: NaiveDate)
        -> anyhow::Result<Vec<Arc<dyn Game>>>;

    /// Format a date the way the source expects it.
    fn date_str(&self, date: NaiveDate) -> String;

    /// League identifier, e.g. `NHL`.
    fn league(&self) -> &str;

    /// Team logo scaled to fit `bounds`.
    fn logo(&self, logo_key: &str, bounds: Rect) -> anyhow::Result<Fragment>;

    fn all_team_abbreviations(&self) -> Vec<String>;
}

/// Display state of a game, derived fresh on every pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Upcoming,
    Live,
    Complete,
}

impl GameState {
    /// Derive the state from the game's predicates.
    ///
    /// Live wins over Complete. Predicate errors are logged and read as
    /// `false`, so a game with no usable state is Upcoming.
    pub fn of(game: &dyn Game) -> Self {
        let is_live = game.is_live().unwrap_or_else(|e| {
            error!(game_id = game.id(), "failed to determine if game is live: {:#}", e);
            false
        });
        let is_complete = game.is_complete().unwrap_or_else(|e| {
            error!(game_id = game.id(), "failed to determine if game is complete: {:#}", e);
            false
        });

        if is_live {
            Self::Live
        } else if is_complete {
            Self::Complete
        } else {
            Self::Upcoming
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Live => "live",
            Self::Complete => "complete",
        }
    }
}
