//! In-memory data source, text writer and display for board tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use chrono::{DateTime, Local, NaiveDate, TimeZone};
use matrix_engine::{Canvas, Context, Fragment, Matrix, MatrixResult, Rect, Rgb, TextWriter};
use parking_lot::Mutex;
use sportboard::{
    Api, BoardSettings, Game, GameId, GameState, RetryPolicy, SportBoard, SportConfig, Team,
};

pub struct MockTeam {
    pub id: i64,
    pub abbreviation: &'static str,
    pub score: i32,
}

impl MockTeam {
    pub fn new(id: i64, abbreviation: &'static str, score: i32) -> Arc<Self> {
        Arc::new(Self {
            id,
            abbreviation,
            score,
        })
    }
}

impl Team for MockTeam {
    fn id(&self) -> i64 {
        self.id
    }
    fn name(&self) -> String {
        self.abbreviation.to_string()
    }
    fn abbreviation(&self) -> String {
        self.abbreviation.to_string()
    }
    fn score(&self) -> i32 {
        self.score
    }
}

pub struct MockGame {
    pub id: GameId,
    pub home: Arc<MockTeam>,
    pub away: Arc<MockTeam>,
    pub live: bool,
    pub complete: bool,
    failures: u32,
    update_delay: Duration,
    pub updates: AtomicU32,
}

impl MockGame {
    pub fn new(id: GameId, home: &Arc<MockTeam>, away: &Arc<MockTeam>, state: GameState) -> Self {
        Self {
            id,
            home: home.clone(),
            away: away.clone(),
            live: state == GameState::Live,
            complete: state == GameState::Complete,
            failures: 0,
            update_delay: Duration::ZERO,
            updates: AtomicU32::new(0),
        }
    }

    /// Both state predicates false.
    pub fn stateless(id: GameId, home: &Arc<MockTeam>, away: &Arc<MockTeam>) -> Self {
        Self::new(id, home, away, GameState::Upcoming)
    }

    /// Fail this many updates before succeeding.
    pub fn failing(mut self, failures: u32) -> Self {
        self.failures = failures;
        self
    }

    /// Take this long to answer an update.
    pub fn slow(mut self, delay: Duration) -> Self {
        self.update_delay = delay;
        self
    }

    pub fn update_count(&self) -> u32 {
        self.updates.load(Ordering::SeqCst)
    }
}

impl Game for MockGame {
    fn id(&self) -> GameId {
        self.id
    }
    fn link(&self) -> anyhow::Result<String> {
        Ok(format!("/games/{}", self.id))
    }
    fn is_live(&self) -> anyhow::Result<bool> {
        Ok(self.live)
    }
    fn is_complete(&self) -> anyhow::Result<bool> {
        Ok(self.complete)
    }
    fn home_team(&self) -> anyhow::Result<Arc<dyn Team>> {
        Ok(self.home.clone())
    }
    fn away_team(&self) -> anyhow::Result<Arc<dyn Team>> {
        Ok(self.away.clone())
    }
    fn period(&self) -> anyhow::Result<u32> {
        Ok(2)
    }
    fn clock(&self) -> anyhow::Result<String> {
        Ok("05:00".to_string())
    }

    fn update(&self, ctx: &Context) -> anyhow::Result<Arc<dyn Game>> {
        let n = self.updates.fetch_add(1, Ordering::SeqCst);
        if !self.update_delay.is_zero() && ctx.sleep(self.update_delay).is_err() {
            return Err(anyhow!("update cancelled"));
        }
        if n < self.failures {
            return Err(anyhow!("upstream timeout"));
        }
        Ok(Arc::new(Self {
            id: self.id,
            home: self.home.clone(),
            away: self.away.clone(),
            live: self.live,
            complete: self.complete,
            failures: 0,
            update_delay: Duration::ZERO,
            updates: AtomicU32::new(0),
        }))
    }

    fn start_time(&self, _ctx: &Context) -> anyhow::Result<DateTime<Local>> {
        Local
            .with_ymd_and_hms(2024, 4, 1, 19, 5, 0)
            .single()
            .ok_or_else(|| anyhow!("ambiguous start time"))
    }
}

pub struct MockApi {
    pub teams: Vec<Arc<MockTeam>>,
    pub games: Vec<Arc<MockGame>>,
}

impl MockApi {
    pub fn new(teams: &[&Arc<MockTeam>], games: &[&Arc<MockGame>]) -> Arc<Self> {
        Arc::new(Self {
            teams: teams.iter().map(|t| Arc::clone(*t)).collect(),
            games: games.iter().map(|g| Arc::clone(*g)).collect(),
        })
    }
}

impl Api for MockApi {
    fn teams(&self, _ctx: &Context) -> anyhow::Result<Vec<Arc<dyn Team>>> {
        Ok(self
            .teams
            .iter()
            .map(|t| t.clone() as Arc<dyn Team>)
            .collect())
    }

    fn team_from_abbreviation(&self, _ctx: &Context, abbreviation: &str) -> anyhow::Result<Arc<dyn Team>> {
        self.teams
            .iter()
            .find(|t| t.abbreviation.eq_ignore_ascii_case(abbreviation))
            .map(|t| t.clone() as Arc<dyn Team>)
            .ok_or_else(|| anyhow!("unknown team {}", abbreviation))
    }

    fn scheduled_games(&self, _ctx: &Context, _date: NaiveDate) -> anyhow::Result<Vec<Arc<dyn Game>>> {
        Ok(self
            .games
            .iter()
            .map(|g| g.clone() as Arc<dyn Game>)
            .collect())
    }

    fn date_str(&self, date: NaiveDate) -> String {
        date.format("%Y%m%d").to_string()
    }

    fn league(&self) -> &str {
        "MLB"
    }

    fn logo(&self, _logo_key: &str, bounds: Rect) -> anyhow::Result<Fragment> {
        Ok(Fragment::solid(bounds.width(), bounds.height(), Rgb::new(0, 0, 200)))
    }

    fn all_team_abbreviations(&self) -> Vec<String> {
        self.teams.iter().map(|t| t.abbreviation.to_string()).collect()
    }
}

/// Records every line written.
#[derive(Default)]
pub struct RecordingText {
    lines: Mutex<Vec<String>>,
}

impl RecordingText {
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    pub fn contains(&self, line: &str) -> bool {
        self.lines.lock().iter().any(|l| l == line)
    }
}

impl TextWriter for RecordingText {
    fn write(&self, _canvas: &mut Canvas, _bounds: Rect, lines: &[String], _color: Rgb) -> anyhow::Result<()> {
        self.lines.lock().extend_from_slice(lines);
        Ok(())
    }
}

/// 64x32 display counting committed frames.
pub struct CountingMatrix {
    pub frames: Arc<AtomicUsize>,
}

impl Matrix for CountingMatrix {
    fn geometry(&self) -> (u32, u32) {
        (64, 32)
    }
    fn render(&mut self, _pixels: &[Rgb]) -> MatrixResult<()> {
        self.frames.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
    fn close(&mut self) -> MatrixResult<()> {
        Ok(())
    }
}

pub fn canvas() -> (Canvas, Arc<AtomicUsize>) {
    let frames = Arc::new(AtomicUsize::new(0));
    let matrix = CountingMatrix {
        frames: frames.clone(),
    };
    (Canvas::new(Box::new(matrix)).unwrap(), frames)
}

pub fn settings(watch: &[&str], board_delay: Duration) -> BoardSettings {
    BoardSettings {
        watch_teams: watch.iter().map(|s| s.to_string()).collect(),
        board_delay,
        ..Default::default()
    }
}

pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(5))
}

pub fn board(api: Arc<MockApi>, settings: BoardSettings) -> (Arc<SportBoard>, Arc<RecordingText>) {
    let text = Arc::new(RecordingText::default());
    let board = SportBoard::new(
        &Context::new(),
        api,
        text.clone(),
        Rect::sized(64, 32),
        Arc::new(SportConfig::from(settings)),
    )
    .unwrap()
    .with_retry_policy(fast_retry());
    (Arc::new(board), text)
}
