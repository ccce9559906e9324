//! JSON fixture data source.
//!
//! A fixture file describes one league's teams and today's slate. Game
//! updates re-read the file, so editing it while the process runs changes
//! what the board shows on its next pass.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, Context as _};
use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use matrix_engine::{Context, Fragment, Rect, Rgb};
use serde::{Deserialize, Serialize};
use sportboard::{Api, Game, GameId, Team};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamData {
    pub id: i64,
    pub abbreviation: String,
    pub name: String,
    /// Primary color used for the logo.
    #[serde(default)]
    pub color: [u8; 3],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FixtureState {
    Upcoming,
    Live,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameData {
    pub id: GameId,
    pub home: String,
    pub away: String,
    pub state: FixtureState,
    #[serde(default)]
    pub home_score: i32,
    #[serde(default)]
    pub away_score: i32,
    #[serde(default)]
    pub period: u32,
    #[serde(default)]
    pub clock: String,
    /// Local start time, `HH:MM`.
    pub start: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixtureData {
    pub league: String,
    pub teams: Vec<TeamData>,
    #[serde(default)]
    pub games: Vec<GameData>,
}

impl FixtureData {
    fn team(&self, abbreviation: &str) -> anyhow::Result<&TeamData> {
        self.teams
            .iter()
            .find(|t| t.abbreviation.eq_ignore_ascii_case(abbreviation))
            .ok_or_else(|| anyhow!("unknown team {}", abbreviation))
    }
}

enum Source {
    File(PathBuf),
    Static(FixtureData),
}

impl Source {
    fn load(&self) -> anyhow::Result<FixtureData> {
        match self {
            Self::File(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read fixture {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("failed to parse fixture {}", path.display()))
            }
            Self::Static(data) => Ok(data.clone()),
        }
    }
}

struct FixtureTeam {
    data: TeamData,
    score: i32,
}

impl Team for FixtureTeam {
    fn id(&self) -> i64 {
        self.data.id
    }

    fn name(&self) -> String {
        self.data.name.clone()
    }

    fn abbreviation(&self) -> String {
        self.data.abbreviation.clone()
    }

    fn score(&self) -> i32 {
        self.score
    }
}

fn team(data: &TeamData, score: i32) -> Arc<dyn Team> {
    Arc::new(FixtureTeam {
        data: data.clone(),
        score,
    })
}

struct FixtureGame {
    data: GameData,
    home: Arc<dyn Team>,
    away: Arc<dyn Team>,
    date: NaiveDate,
    source: Arc<Source>,
}

impl FixtureGame {
    fn build(
        fixture: &FixtureData,
        data: GameData,
        date: NaiveDate,
        source: Arc<Source>,
    ) -> anyhow::Result<Self> {
        let home = team(fixture.team(&data.home)?, data.home_score);
        let away = team(fixture.team(&data.away)?, data.away_score);
        Ok(Self {
            data,
            home,
            away,
            date,
            source,
        })
    }
}

impl Game for FixtureGame {
    fn id(&self) -> GameId {
        self.data.id
    }

    fn link(&self) -> anyhow::Result<String> {
        Ok(format!("fixture://games/{}", self.data.id))
    }

    fn is_live(&self) -> anyhow::Result<bool> {
        Ok(self.data.state == FixtureState::Live)
    }

    fn is_complete(&self) -> anyhow::Result<bool> {
        Ok(self.data.state == FixtureState::Complete)
    }

    fn home_team(&self) -> anyhow::Result<Arc<dyn Team>> {
        Ok(self.home.clone())
    }

    fn away_team(&self) -> anyhow::Result<Arc<dyn Team>> {
        Ok(self.away.clone())
    }

    fn period(&self) -> anyhow::Result<u32> {
        Ok(self.data.period)
    }

    fn clock(&self) -> anyhow::Result<String> {
        Ok(self.data.clock.clone())
    }

    fn update(&self, ctx: &Context) -> anyhow::Result<Arc<dyn Game>> {
        ctx.check()?;
        let fixture = self.source.load()?;
        let data = fixture
            .games
            .iter()
            .find(|g| g.id == self.data.id)
            .cloned()
            .ok_or_else(|| anyhow!("game {} no longer scheduled", self.data.id))?;
        let game = Self::build(&fixture, data, self.date, self.source.clone())?;
        Ok(Arc::new(game))
    }

    fn start_time(&self, _ctx: &Context) -> anyhow::Result<DateTime<Local>> {
        let time = NaiveTime::parse_from_str(&self.data.start, "%H:%M")
            .with_context(|| format!("invalid start time {:?}", self.data.start))?;
        Local
            .from_local_datetime(&self.date.and_time(time))
            .earliest()
            .ok_or_else(|| anyhow!("start time {} does not exist locally", self.data.start))
    }
}

/// A data source backed by a fixture file. The fixture is treated as the
/// schedule for whatever date is requested.
pub struct FixtureApi {
    league: String,
    source: Arc<Source>,
    teams: Vec<TeamData>,
    colors: HashMap<String, Rgb>,
}

impl FixtureApi {
    /// Load a fixture file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = Source::File(path.to_path_buf());
        let data = source.load()?;
        Ok(Self::with_source(data, source))
    }

    /// Serve fixed data.
    pub fn from_data(data: FixtureData) -> Self {
        Self::with_source(data.clone(), Source::Static(data))
    }

    fn with_source(data: FixtureData, source: Source) -> Self {
        let colors = data
            .teams
            .iter()
            .map(|t| {
                let [r, g, b] = t.color;
                (t.abbreviation.to_uppercase(), Rgb::new(r, g, b))
            })
            .collect();
        Self {
            league: data.league,
            source: Arc::new(source),
            teams: data.teams,
            colors,
        }
    }
}

impl Api for FixtureApi {
    fn teams(&self, ctx: &Context) -> anyhow::Result<Vec<Arc<dyn Team>>> {
        ctx.check()?;
        Ok(self.teams.iter().map(|t| team(t, 0)).collect())
    }

    fn team_from_abbreviation(&self, ctx: &Context, abbreviation: &str) -> anyhow::Result<Arc<dyn Team>> {
        ctx.check()?;
        self.teams
            .iter()
            .find(|t| t.abbreviation.eq_ignore_ascii_case(abbreviation))
            .map(|t| team(t, 0))
            .ok_or_else(|| anyhow!("unknown {} team {}", self.league, abbreviation))
    }

    fn scheduled_games(&self, ctx: &Context, date: NaiveDate) -> anyhow::Result<Vec<Arc<dyn Game>>> {
        ctx.check()?;
        let fixture = self.source.load()?;
        debug!(league = %self.league, date = %self.date_str(date), games = fixture.games.len(), "loaded schedule");

        fixture
            .games
            .iter()
            .cloned()
            .map(|g| -> anyhow::Result<Arc<dyn Game>> {
                let game = FixtureGame::build(&fixture, g, date, self.source.clone())?;
                Ok(Arc::new(game))
            })
            .collect()
    }

    fn date_str(&self, date: NaiveDate) -> String {
        date.format("%Y%m%d").to_string()
    }

    fn league(&self) -> &str {
        &self.league
    }

    /// A solid block in the team color. Keys are `<ABBR>_<side>`.
    fn logo(&self, logo_key: &str, bounds: Rect) -> anyhow::Result<Fragment> {
        let abbreviation = logo_key.split('_').next().unwrap_or(logo_key).to_uppercase();
        let color = self
            .colors
            .get(&abbreviation)
            .copied()
            .ok_or_else(|| anyhow!("no logo for {}", logo_key))?;
        let (w, h) = (bounds.width(), bounds.height());
        Ok(Fragment::from_fn(w, h, |x, y| {
            if x == 0 || y == 0 || x + 1 == w || y + 1 == h {
                color.dim(0.5)
            } else {
                color
            }
        }))
    }

    fn all_team_abbreviations(&self) -> Vec<String> {
        self.teams.iter().map(|t| t.abbreviation.clone()).collect()
    }
}
