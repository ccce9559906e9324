//! Process configuration.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use matrix_engine::SchedulerConfig;
use serde::{Deserialize, Serialize};
use sportboard::BoardSettings;
use tracing::warn;

/// Default config file name.
pub const DEFAULT_CONFIG_PATH: &str = "sportsmatrix.json";

/// One league board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueConfig {
    /// League identifier, e.g. `NHL`.
    pub league: String,

    /// Fixture file backing this league's data source.
    pub fixture: PathBuf,

    #[serde(default)]
    pub board: BoardSettings,
}

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub matrix: SchedulerConfig,
    pub sports: Vec<LeagueConfig>,
}

impl AppConfig {
    /// Load from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let mut config = if path.exists() {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            serde_json::from_str::<Self>(&raw)
                .with_context(|| format!("failed to parse config {}", path.display()))?
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Self::default()
        };

        // Fixture paths are relative to the config file.
        if let Some(dir) = path.parent() {
            for sport in &mut config.sports {
                if sport.fixture.is_relative() {
                    sport.fixture = dir.join(&sport.fixture);
                }
            }
        }

        config.matrix.apply_defaults();
        Ok(config)
    }
}
