//! Per-state game layouts.
//!
//! The away logo sits on the left edge and the home logo on the right, with
//! text in the gap between them. Logos and the game counter are memoized in
//! the draw cache under keys that include every layout flag.

use std::sync::Arc;

use anyhow::Context as _;
use matrix_engine::{Canvas, Context, Fragment, Rect, Rgb, TextWriter};

use crate::api::{Api, Game, Team};
use crate::config::{Flag, SportConfig};
use crate::draw_cache::DrawCache;

const COUNTER_ON: Rgb = Rgb::WHITE;
const COUNTER_OFF: Rgb = Rgb::new(64, 64, 64);
const SCORE_COLOR: Rgb = Rgb::WHITE;
const INFO_COLOR: Rgb = Rgb::new(255, 200, 0);

/// Which side of the display a team is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Home,
    Away,
}

impl Side {
    fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Away => "away",
        }
    }
}

/// The two participants of a game being drawn.
pub(crate) struct Matchup {
    pub home: Arc<dyn Team>,
    pub away: Arc<dyn Team>,
    pub hide_score: bool,
}

impl Matchup {
    fn score(&self) -> String {
        if self.hide_score {
            return "-".to_string();
        }
        format!("{}-{}", self.away.score(), self.home.score())
    }
}

/// Draws one game onto a canvas.
pub(crate) struct Layout<'a> {
    pub config: &'a SportConfig,
    pub api: &'a dyn Api,
    pub text: &'a dyn TextWriter,
    pub cache: &'a DrawCache,
    pub bounds: Rect,
}

impl Layout<'_> {
    /// Suffix encoding every flag that changes how fragments look.
    fn flag_suffix(&self) -> String {
        let bit = |flag| if self.config.get(flag) { '1' } else { '0' };
        [
            ('s', bit(Flag::ScrollEnabled)),
            ('t', bit(Flag::TightScrollEnabled)),
            ('r', bit(Flag::RecordRankEnabled)),
            ('o', bit(Flag::OddsEnabled)),
            ('g', bit(Flag::UseGradient)),
        ]
        .iter()
        .flat_map(|(k, v)| [*k, *v])
        .collect()
    }

    fn logo_width(&self) -> i32 {
        let width = self.bounds.width() as i32;
        if self.config.get(Flag::TightScrollEnabled) {
            width * 3 / 10
        } else {
            width / 4
        }
    }

    fn logo_bounds(&self, side: Side) -> Rect {
        let w = self.logo_width();
        let b = self.bounds;
        match side {
            Side::Away => Rect::new(b.min_x, b.min_y, b.min_x + w, b.max_y),
            Side::Home => Rect::new(b.max_x - w, b.min_y, b.max_x, b.max_y),
        }
    }

    /// Area between the logos.
    fn center(&self) -> Rect {
        let w = self.logo_width();
        Rect::new(
            self.bounds.min_x + w,
            self.bounds.min_y,
            self.bounds.max_x - w,
            self.bounds.max_y,
        )
    }

    /// Split the center into an info band and a score band sized by font.
    fn bands(&self) -> (Rect, Rect) {
        let center = self.center();
        let info_height = (self.config.time_font().size.round() as i32).min(center.height() as i32);
        let info = Rect::new(center.min_x, center.min_y, center.max_x, center.min_y + info_height);

        let score_height = self.config.score_font().size.round() as i32;
        let score_top = (center.max_y - score_height).max(info.max_y);
        let score = Rect::new(center.min_x, score_top, center.max_x, center.max_y);
        (info, score)
    }

    fn logo(&self, team: &dyn Team, side: Side) -> anyhow::Result<Fragment> {
        let abbreviation = team.abbreviation();
        let key = format!("{}_{}_{}", abbreviation, side.as_str(), self.flag_suffix());
        let bounds = self.logo_bounds(side);
        let gradient = self.config.get(Flag::UseGradient);

        self.cache.get_or_try_insert_with(&key, || {
            let logo_key = format!("{}_{}", abbreviation, side.as_str());
            let logo = self
                .api
                .logo(&logo_key, bounds)
                .with_context(|| format!("failed to get logo {}", logo_key))?;
            if !gradient {
                return Ok(logo);
            }
            Ok(fade_inner_edge(&logo, side))
        })
    }

    /// Draw both logos.
    pub fn logos(&self, canvas: &mut Canvas, matchup: &Matchup) -> anyhow::Result<()> {
        for (team, side) in [(&matchup.away, Side::Away), (&matchup.home, Side::Home)] {
            let fragment = self.logo(team.as_ref(), side)?;
            let area = self.logo_bounds(side);
            let x = match side {
                Side::Away => area.min_x,
                Side::Home => area.max_x - fragment.width() as i32,
            };
            canvas.draw(&fragment, x, area.min_y);
        }
        Ok(())
    }

    /// Draw a row of dots along the bottom marking game `index` of `total`.
    pub fn counter(&self, canvas: &mut Canvas, total: usize, index: usize) -> anyhow::Result<()> {
        if total < 2 {
            return Ok(());
        }
        let key = format!("counter_{}_{}", total, index);
        let fragment = self.cache.get_or_try_insert_with(&key, || {
            let width = (total * 2 - 1) as u32;
            Ok(Fragment::from_fn(width, 1, |x, _| {
                if x % 2 == 1 {
                    Rgb::BLACK
                } else if (x / 2) as usize == index {
                    COUNTER_ON
                } else {
                    COUNTER_OFF
                }
            }))
        })?;

        let x = self.bounds.min_x + (self.bounds.width() as i32 - fragment.width() as i32) / 2;
        canvas.draw(&fragment, x, self.bounds.max_y - 1);
        Ok(())
    }

    pub fn live(&self, canvas: &mut Canvas, game: &dyn Game, matchup: &Matchup) -> anyhow::Result<()> {
        self.logos(canvas, matchup)?;

        let period = game.period().context("failed to get period")?;
        let clock = game.clock().context("failed to get clock")?;
        let (info, score) = self.bands();

        self.text
            .write(canvas, info, &[format!("P{} {}", period, clock)], INFO_COLOR)?;
        self.text.write(canvas, score, &[matchup.score()], SCORE_COLOR)
    }

    pub fn complete(&self, canvas: &mut Canvas, matchup: &Matchup) -> anyhow::Result<()> {
        self.logos(canvas, matchup)?;

        let (info, score) = self.bands();
        self.text.write(canvas, info, &["FINAL".to_string()], INFO_COLOR)?;
        self.text.write(canvas, score, &[matchup.score()], SCORE_COLOR)
    }

    pub fn upcoming(
        &self,
        ctx: &Context,
        canvas: &mut Canvas,
        game: &dyn Game,
        matchup: &Matchup,
    ) -> anyhow::Result<()> {
        self.logos(canvas, matchup)?;

        let start = game.start_time(ctx).context("failed to get start time")?;
        let (info, score) = self.bands();
        self.text
            .write(canvas, info, &[start.format("%-I:%M%p").to_string()], INFO_COLOR)?;
        self.text.write(canvas, score, &["VS".to_string()], SCORE_COLOR)
    }
}

/// Dim a logo toward the edge that faces the center of the display.
fn fade_inner_edge(logo: &Fragment, side: Side) -> Fragment {
    let width = logo.width().max(1) as f32;
    Fragment::from_fn(logo.width(), logo.height(), |x, y| {
        let color = logo.pixel(x, y).unwrap_or_default();
        let from_outer = match side {
            Side::Away => x as f32,
            Side::Home => width - 1.0 - x as f32,
        };
        color.dim(1.0 - 0.6 * (from_outer / width))
    })
}
