//! The league game board.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use crossbeam_channel::select;
use matrix_engine::{Board, BoardResult, Canvas, Context, Rect, TextWriter};
use parking_lot::Mutex;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{Api, Game, GameState, Team};
use crate::config::{Flag, SportConfig};
use crate::draw_cache::{DrawCache, SharedDrawCache};
use crate::error::SportError;
use crate::layout::{Layout, Matchup};
use crate::preloader::{LivePreloader, PreloadSlot};
use crate::retry::RetryPolicy;
use crate::SportResult;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Expand the configured watch list.
///
/// An empty list falls back to the favorites, then to every team. Any `ALL`
/// entry selects every team.
fn expand_watch_list(config: &SportConfig, api: &dyn Api) -> Vec<String> {
    let configured = if !config.watch_teams().is_empty() {
        config.watch_teams().to_vec()
    } else if !config.favorite_teams().is_empty() {
        config.favorite_teams().to_vec()
    } else {
        return api.all_team_abbreviations();
    };

    if configured.iter().any(|t| t.eq_ignore_ascii_case("ALL")) {
        return api.all_team_abbreviations();
    }
    configured
}

/// Rotates through today's games for one league.
pub struct SportBoard {
    config: Arc<SportConfig>,
    api: Arc<dyn Api>,
    text: Arc<dyn TextWriter>,
    draw_cache: SharedDrawCache,
    watch_teams: Vec<String>,
    retry: RetryPolicy,
    bounds: Rect,
    render_ctx: Mutex<Option<Context>>,
}

impl SportBoard {
    /// Create a board, expanding the watch list and pre-warming the data
    /// source's team list and today's schedule.
    #[instrument(name = "sport_board_new", skip_all, fields(league = %api.league()))]
    pub fn new(
        ctx: &Context,
        api: Arc<dyn Api>,
        text: Arc<dyn TextWriter>,
        bounds: Rect,
        config: Arc<SportConfig>,
    ) -> SportResult<Self> {
        if bounds.is_empty() {
            return Err(SportError::Config(format!("empty board bounds {:?}", bounds)));
        }

        let watch_teams = expand_watch_list(&config, api.as_ref());

        api.teams(ctx)?;
        api.scheduled_games(ctx, today())?;

        info!(watching = watch_teams.len(), "sport board ready");

        Ok(Self {
            config,
            api,
            text,
            draw_cache: SharedDrawCache::new(),
            watch_teams,
            retry: RetryPolicy::default(),
            bounds,
            render_ctx: Mutex::new(None),
        })
    }

    /// Override the live game fetch retry policy.
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// The live behavior flags.
    pub fn config(&self) -> &Arc<SportConfig> {
        &self.config
    }

    /// League name, also used as the board name.
    pub fn league(&self) -> &str {
        self.api.league()
    }

    /// The expanded watch list.
    pub fn watch_teams(&self) -> &[String] {
        &self.watch_teams
    }

    /// The current draw cache.
    pub fn draw_cache(&self) -> Arc<DrawCache> {
        self.draw_cache.load()
    }

    /// Drop every memoized fragment.
    pub fn clear_draw_cache(&self) {
        self.draw_cache.clear();
    }

    /// Cancel the in-flight render, if any. The scheduler keeps running.
    pub fn cancel_render(&self) {
        if let Some(ctx) = self.render_ctx.lock().as_ref() {
            debug!(league = self.league(), "cancelling in-flight render");
            ctx.cancel();
        }
    }

    fn is_favorite(&self, team: &dyn Team) -> bool {
        let abbreviation = team.abbreviation();
        self.config
            .favorite_teams()
            .iter()
            .any(|f| f.eq_ignore_ascii_case(&abbreviation))
    }

    /// Check whether either participant is on the watch list, by team id.
    fn is_watched(&self, ctx: &Context, home: &dyn Team, away: &dyn Team) -> SportResult<bool> {
        for abbreviation in &self.watch_teams {
            ctx.check()?;
            let team = match self.api.team_from_abbreviation(ctx, abbreviation) {
                Ok(team) => team,
                Err(e) => {
                    warn!(team = %abbreviation, "failed to resolve watched team: {:#}", e);
                    continue;
                }
            };
            if team.id() == home.id() || team.id() == away.id() {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn render_games(&self, ctx: &Context, canvas: &mut Canvas) -> SportResult<()> {
        if !self.config.is_enabled() {
            warn!(league = self.league(), "board is not enabled, rendering anyway");
        }

        let games = self.api.scheduled_games(ctx, today())?;
        debug!(league = self.league(), count = games.len(), "scheduled games today");
        if games.is_empty() {
            return Ok(());
        }

        // The first game is fetched once, inline. Its failure fails the pass.
        let slot = Arc::new(PreloadSlot::new());
        let first = &games[0];
        if let Some(_signal) = slot.register(first.id()) {
            ctx.check()?;
            match first.update(ctx) {
                Ok(live) => slot.store(first.id(), live),
                Err(e) => {
                    ctx.check()?;
                    return Err(SportError::Api(e));
                }
            }
        }

        let delay = self.config.board_delay();
        let mut visited = HashSet::new();

        for (i, game) in games.iter().enumerate() {
            let game_id = game.id();

            // Preload the next game even when this one repeats.
            if let Some(next) = games.get(i + 1) {
                if let Some(preloader) =
                    LivePreloader::new(next.clone(), slot.clone(), self.retry.clone())
                {
                    if let Err(e) = preloader.spawn(ctx.clone()) {
                        error!(game_id = next.id(), "failed to start preload: {}", e);
                    }
                }
            }

            if !visited.insert(game_id) {
                debug!(game_id, "game already shown this pass");
                continue;
            }

            if let Some(ready) = slot.ready(game_id) {
                select! {
                    recv(ctx.done()) -> _ => return Err(SportError::Cancelled),
                    recv(ready) -> _ => {}
                    default(delay) => warn!(game_id, "timed out waiting for live game"),
                }
            }

            let Some(live) = slot.game(game_id) else {
                debug!(game_id, "no live game data, skipping");
                continue;
            };

            match self.render_game(ctx, canvas, live.as_ref(), games.len(), i) {
                Ok(true) => {
                    canvas
                        .commit()
                        .map_err(|e| SportError::Render(e.to_string()))?;
                    ctx.sleep(delay)?;
                }
                Ok(false) => {}
                Err(SportError::Cancelled) => return Err(SportError::Cancelled),
                Err(e) => error!(game_id, "failed to render game: {}", e),
            }
        }

        Ok(())
    }

    /// Draw one game. Returns false if the game is filtered out.
    fn render_game(
        &self,
        ctx: &Context,
        canvas: &mut Canvas,
        game: &dyn Game,
        total: usize,
        index: usize,
    ) -> SportResult<bool> {
        let home = game.home_team()?;
        let away = game.away_team()?;

        if !self.is_watched(ctx, home.as_ref(), away.as_ref())? {
            debug!(game_id = game.id(), "no watched team playing, skipping");
            return Ok(false);
        }

        let state = GameState::of(game);
        if self.config.get(Flag::LiveOnly) && state != GameState::Live {
            debug!(game_id = game.id(), state = state.name(), "live only, skipping");
            return Ok(false);
        }

        let hide_score = self.config.get(Flag::FavoriteHidden)
            && (self.is_favorite(home.as_ref()) || self.is_favorite(away.as_ref()));
        let matchup = Matchup {
            home,
            away,
            hide_score,
        };

        let cache = self.draw_cache.load();
        let layout = Layout {
            config: &self.config,
            api: self.api.as_ref(),
            text: self.text.as_ref(),
            cache: &cache,
            bounds: self.bounds,
        };

        canvas.clear();
        let drawn = layout.counter(canvas, total, index).and_then(|_| match state {
            GameState::Live => layout.live(canvas, game, &matchup),
            GameState::Complete => layout.complete(canvas, &matchup),
            GameState::Upcoming => layout.upcoming(ctx, canvas, game, &matchup),
        });
        drawn.map_err(|e| SportError::Render(format!("{} layout: {:#}", state.name(), e)))?;

        debug!(game_id = game.id(), state = state.name(), "rendered game");
        Ok(true)
    }
}

impl Board for SportBoard {
    fn name(&self) -> String {
        self.league().to_string()
    }

    #[instrument(name = "sport_render", skip_all, fields(league = %self.league()))]
    fn render(&self, ctx: &Context, canvas: &mut Canvas) -> BoardResult<()> {
        let render_ctx = ctx.child();
        *self.render_ctx.lock() = Some(render_ctx.clone());

        let result = self.render_games(&render_ctx, canvas);

        render_ctx.cancel();
        self.render_ctx.lock().take();
        result.map_err(Into::into)
    }

    fn has_priority(&self) -> bool {
        false
    }

    fn cleanup(&self) {}
}
