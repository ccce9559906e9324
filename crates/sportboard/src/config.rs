//! Board settings and the live behavior flag store.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use matrix_ipc::BoardStatus;
use serde::{Deserialize, Serialize};

/// Font sizing for one text role.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FontConfig {
    pub size: f64,
    #[serde(default)]
    pub line_space: f64,
}

impl FontConfig {
    pub const fn new(size: f64) -> Self {
        Self {
            size,
            line_space: 0.0,
        }
    }
}

/// Board settings as read from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BoardSettings {
    pub enabled: bool,
    pub favorite_hidden: bool,
    pub favorite_sticky: bool,
    pub scroll_enabled: bool,
    pub tight_scroll_enabled: bool,
    pub record_rank_enabled: bool,
    pub odds_enabled: bool,
    pub use_gradient: bool,
    pub live_only: bool,

    /// How long each game stays on the display.
    #[serde(with = "humantime_serde")]
    pub board_delay: Duration,

    pub score_font: FontConfig,
    pub time_font: FontConfig,

    /// Team abbreviations whose games are shown. `ALL` expands to every team.
    pub watch_teams: Vec<String>,
    pub favorite_teams: Vec<String>,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            favorite_hidden: false,
            favorite_sticky: false,
            scroll_enabled: false,
            tight_scroll_enabled: false,
            record_rank_enabled: false,
            odds_enabled: false,
            use_gradient: true,
            live_only: false,
            board_delay: Duration::from_secs(20),
            score_font: FontConfig::new(16.0),
            time_font: FontConfig::new(8.0),
            watch_teams: Vec::new(),
            favorite_teams: Vec::new(),
        }
    }
}

/// One runtime behavior flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    Enabled,
    FavoriteHidden,
    FavoriteSticky,
    ScrollEnabled,
    TightScrollEnabled,
    RecordRankEnabled,
    OddsEnabled,
    UseGradient,
    LiveOnly,
}

impl Flag {
    /// Every flag, in status order.
    pub const ALL: [Flag; 9] = [
        Flag::Enabled,
        Flag::FavoriteHidden,
        Flag::FavoriteSticky,
        Flag::ScrollEnabled,
        Flag::TightScrollEnabled,
        Flag::RecordRankEnabled,
        Flag::OddsEnabled,
        Flag::UseGradient,
        Flag::LiveOnly,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Enabled => "enabled",
            Self::FavoriteHidden => "favoriteHidden",
            Self::FavoriteSticky => "favoriteSticky",
            Self::ScrollEnabled => "scrollEnabled",
            Self::TightScrollEnabled => "tightScrollEnabled",
            Self::RecordRankEnabled => "recordRankEnabled",
            Self::OddsEnabled => "oddsEnabled",
            Self::UseGradient => "useGradient",
            Self::LiveOnly => "liveOnly",
        }
    }

    /// Whether changing this flag invalidates rendered fragments.
    pub fn clears_draw_cache(self) -> bool {
        matches!(
            self,
            Self::OddsEnabled
                | Self::ScrollEnabled
                | Self::TightScrollEnabled
                | Self::RecordRankEnabled
                | Self::UseGradient
        )
    }

    /// The value of this flag in a status snapshot.
    pub fn value_in(self, status: &BoardStatus) -> bool {
        match self {
            Self::Enabled => status.enabled,
            Self::FavoriteHidden => status.favorite_hidden,
            Self::FavoriteSticky => status.favorite_sticky,
            Self::ScrollEnabled => status.scroll_enabled,
            Self::TightScrollEnabled => status.tight_scroll_enabled,
            Self::RecordRankEnabled => status.record_rank_enabled,
            Self::OddsEnabled => status.odds_enabled,
            Self::UseGradient => status.use_gradient,
            Self::LiveOnly => status.live_only,
        }
    }
}

/// Live board configuration.
///
/// Each flag is an independent atomic. A reader may observe a partially
/// applied multi-flag update.
#[derive(Debug)]
pub struct SportConfig {
    enabled: AtomicBool,
    favorite_hidden: AtomicBool,
    favorite_sticky: AtomicBool,
    scroll_enabled: AtomicBool,
    tight_scroll_enabled: AtomicBool,
    record_rank_enabled: AtomicBool,
    odds_enabled: AtomicBool,
    use_gradient: AtomicBool,
    live_only: AtomicBool,
    board_delay: Duration,
    score_font: FontConfig,
    time_font: FontConfig,
    watch_teams: Vec<String>,
    favorite_teams: Vec<String>,
}

impl SportConfig {
    fn atomic(&self, flag: Flag) -> &AtomicBool {
        match flag {
            Flag::Enabled => &self.enabled,
            Flag::FavoriteHidden => &self.favorite_hidden,
            Flag::FavoriteSticky => &self.favorite_sticky,
            Flag::ScrollEnabled => &self.scroll_enabled,
            Flag::TightScrollEnabled => &self.tight_scroll_enabled,
            Flag::RecordRankEnabled => &self.record_rank_enabled,
            Flag::OddsEnabled => &self.odds_enabled,
            Flag::UseGradient => &self.use_gradient,
            Flag::LiveOnly => &self.live_only,
        }
    }

    /// Read a flag.
    pub fn get(&self, flag: Flag) -> bool {
        self.atomic(flag).load(Ordering::SeqCst)
    }

    /// Compare-and-swap `flag` from `!desired` to `desired`.
    ///
    /// Returns true if the value changed.
    pub fn swap(&self, flag: Flag, desired: bool) -> bool {
        self.atomic(flag)
            .compare_exchange(!desired, desired, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn is_enabled(&self) -> bool {
        self.get(Flag::Enabled)
    }

    /// Enable the board. Returns true if it was disabled.
    pub fn enable(&self) -> bool {
        self.swap(Flag::Enabled, true)
    }

    /// Disable the board. Returns true if it was enabled.
    pub fn disable(&self) -> bool {
        self.swap(Flag::Enabled, false)
    }

    /// Snapshot of every flag.
    pub fn status(&self) -> BoardStatus {
        BoardStatus {
            enabled: self.get(Flag::Enabled),
            favorite_hidden: self.get(Flag::FavoriteHidden),
            favorite_sticky: self.get(Flag::FavoriteSticky),
            scroll_enabled: self.get(Flag::ScrollEnabled),
            tight_scroll_enabled: self.get(Flag::TightScrollEnabled),
            record_rank_enabled: self.get(Flag::RecordRankEnabled),
            odds_enabled: self.get(Flag::OddsEnabled),
            use_gradient: self.get(Flag::UseGradient),
            live_only: self.get(Flag::LiveOnly),
        }
    }

    /// Dwell time per game.
    pub fn board_delay(&self) -> Duration {
        self.board_delay
    }

    pub fn score_font(&self) -> FontConfig {
        self.score_font
    }

    pub fn time_font(&self) -> FontConfig {
        self.time_font
    }

    /// Configured watch list, before expansion.
    pub fn watch_teams(&self) -> &[String] {
        &self.watch_teams
    }

    pub fn favorite_teams(&self) -> &[String] {
        &self.favorite_teams
    }
}

impl From<BoardSettings> for SportConfig {
    fn from(s: BoardSettings) -> Self {
        let board_delay = if s.board_delay.is_zero() {
            BoardSettings::default().board_delay
        } else {
            s.board_delay
        };

        Self {
            enabled: AtomicBool::new(s.enabled),
            favorite_hidden: AtomicBool::new(s.favorite_hidden),
            favorite_sticky: AtomicBool::new(s.favorite_sticky),
            scroll_enabled: AtomicBool::new(s.scroll_enabled),
            tight_scroll_enabled: AtomicBool::new(s.tight_scroll_enabled),
            record_rank_enabled: AtomicBool::new(s.record_rank_enabled),
            odds_enabled: AtomicBool::new(s.odds_enabled),
            use_gradient: AtomicBool::new(s.use_gradient),
            live_only: AtomicBool::new(s.live_only),
            board_delay,
            score_font: s.score_font,
            time_font: s.time_font,
            watch_teams: s.watch_teams,
            favorite_teams: s.favorite_teams,
        }
    }
}

impl Default for SportConfig {
    fn default() -> Self {
        BoardSettings::default().into()
    }
}
