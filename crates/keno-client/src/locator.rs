//! Game-number search: finds the game closest to a point in time.
//!
//! Upstream lists draws by calendar date plus a game number that cycles
//! through `0..1000`, so a date alone does not say which game numbers belong
//! to it. The search probes for any game on the date, then repeatedly turns
//! the time error between that game and the target into an estimated number
//! of games (using the configured average game duration) and moves the game
//! number by that estimate, until the estimate reaches zero or repeats.
//!
//! [`KenoClient::locate`] aims at midnight and then settles on the first game
//! that closed at or after it; [`KenoClient::game_at`] aims at an arbitrary
//! instant.

use chrono::NaiveDate;
use keno_core::{KenoTimestamp, GAME_NUMBER_SPACE};
use serde::Serialize;

use crate::client::KenoClient;
use crate::error::KenoError;
use crate::normalize::Draw;

/// Which way the last adjustment moved the game number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// The probed game closed after the target; the search moved back.
    Earlier,
    /// The probed game closed before the target; the search moved forward.
    Later,
    /// The first probe already landed within one game of the target.
    Exact,
}

/// Starting point for paginating one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayAnchor {
    /// The day being anchored.
    pub date: NaiveDate,
    /// The date upstream lists the anchor game under. Usually `date`; the day
    /// before when the game closed before midnight or upstream lists by a
    /// date other than the UTC one.
    pub indexed_date: NaiveDate,
    pub game_number: u16,
    pub closed: KenoTimestamp,
    /// Signed distance from midnight in whole games (negative: before).
    pub offset_games: i64,
    pub direction: Direction,
    /// Lookups spent on probing, converging and settling.
    pub iterations: u32,
}

impl DayAnchor {
    /// Whether the anchor game is listed under a date other than `date`.
    #[must_use]
    pub fn crossed_boundary(&self) -> bool {
        self.indexed_date != self.date
    }
}

/// Outcome of the convergence loop before settling.
#[derive(Debug)]
struct Converged {
    draw: Draw,
    indexed_date: NaiveDate,
    direction: Direction,
    iterations: u32,
}

/// Wraps a game-number computation into `0..1000`.
///
/// The flag is `true` when `value` had to be wrapped.
#[must_use]
pub fn wrap_game_number(value: i64) -> (u16, bool) {
    let space = i64::from(GAME_NUMBER_SPACE);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let wrapped = value.rem_euclid(space) as u16;
    (wrapped, !(0..space).contains(&value))
}

/// Whole games between `closed` and `target`; positive when `closed` is
/// after `target`. Truncates toward zero, so a residual under one game
/// duration estimates to zero.
#[must_use]
pub fn estimate_games(closed: KenoTimestamp, target: KenoTimestamp, game_duration_secs: u32) -> i64 {
    closed.seconds_since(target) / i64::from(game_duration_secs.max(1))
}

impl KenoClient {
    /// Finds the first game of `date` (midnight UTC).
    ///
    /// # Errors
    ///
    /// - [`KenoError::LocatorExhausted`] if no game is found on the date, an
    ///   estimated game is not listed on or beside the date, or the search
    ///   does not converge within `max_locator_iterations`.
    /// - Transport and schema errors from the underlying requests, unchanged.
    pub async fn locate(&self, date: NaiveDate) -> Result<DayAnchor, KenoError> {
        let target = KenoTimestamp::midnight(date);
        let converged = self.converge(target, date).await?;
        let anchor = self.settle(date, target, converged).await?;
        tracing::debug!(
            date = %anchor.date,
            indexed_date = %anchor.indexed_date,
            game_number = anchor.game_number,
            offset_games = anchor.offset_games,
            iterations = anchor.iterations,
            "located first game"
        );
        Ok(anchor)
    }

    /// Returns the draw closest to `at`, within about one game duration.
    ///
    /// # Errors
    ///
    /// As [`KenoClient::locate`], without the settle step.
    pub async fn game_at(&self, at: KenoTimestamp) -> Result<Draw, KenoError> {
        Ok(self.converge(at, at.date()).await?.draw)
    }

    /// Probes from the configured seed until some game listed on `date` is
    /// found. Each empty probe advances the seed by `seed_step`, wrapping at
    /// the game-number ceiling, until every distinct seed has been tried.
    async fn probe_seed(&self, date: NaiveDate) -> Result<(Draw, u32), KenoError> {
        let cfg = &self.history;
        let attempts = u32::from(GAME_NUMBER_SPACE.div_ceil(cfg.seed_step));
        let mut seed = cfg.seed_game_number;

        for attempt in 1..=attempts {
            if let Some(draw) = self.game_on(seed, date).await? {
                return Ok((draw, attempt));
            }
            let (next, wrapped) = wrap_game_number(i64::from(seed) + i64::from(cfg.seed_step));
            tracing::debug!(date = %date, seed, next, wrapped, "empty probe; advancing seed");
            seed = next;
        }

        Err(KenoError::LocatorExhausted {
            date,
            reason: format!("no game listed after {attempts} probes"),
        })
    }

    /// Looks `game_number` up under `date`, then the day before, then the day
    /// after. Returns the draw and the date it was listed under.
    async fn game_near(
        &self,
        game_number: u16,
        date: NaiveDate,
    ) -> Result<Option<(Draw, NaiveDate)>, KenoError> {
        let candidates = [Some(date), date.pred_opt(), date.succ_opt()];
        for candidate in candidates.into_iter().flatten() {
            if let Some(draw) = self.game_on(game_number, candidate).await? {
                return Ok(Some((draw, candidate)));
            }
        }
        Ok(None)
    }

    async fn converge(&self, target: KenoTimestamp, date: NaiveDate) -> Result<Converged, KenoError> {
        let cfg = &self.history;
        let (mut draw, mut iterations) = self.probe_seed(date).await?;
        let mut indexed_date = date;
        let mut previous = 0i64;
        let mut direction = Direction::Exact;

        for _ in 0..cfg.max_locator_iterations {
            let games = estimate_games(draw.closed, target, cfg.game_duration_secs);
            tracing::debug!(
                aim = %target,
                game_number = draw.game_number,
                closed = %draw.closed,
                games,
                "locator estimate"
            );
            if games == 0 || games.abs() == previous {
                return Ok(Converged {
                    draw,
                    indexed_date,
                    direction,
                    iterations,
                });
            }
            previous = games.abs();
            direction = if games > 0 {
                Direction::Earlier
            } else {
                Direction::Later
            };

            let (seed, wrapped) = wrap_game_number(i64::from(draw.game_number) - games);
            if wrapped {
                tracing::debug!(seed, "seed wrapped past the game-number ceiling");
            }
            iterations += 1;
            let (next, listed) = self.game_near(seed, date).await?.ok_or_else(|| {
                KenoError::LocatorExhausted {
                    date,
                    reason: format!("game {seed} is not listed on or beside {date}"),
                }
            })?;
            draw = next;
            indexed_date = listed;
        }

        Err(KenoError::LocatorExhausted {
            date,
            reason: format!(
                "estimate did not converge within {} iterations",
                cfg.max_locator_iterations
            ),
        })
    }

    /// Turns a converged draw into a [`DayAnchor`].
    ///
    /// A draw that closed at or after midnight may not be the day's first
    /// game, so the search widens backwards (1, 2, 4, ... games) until it
    /// reaches a game that closed before midnight or is not listed, then
    /// bisects that gap. Listing dates play no part: upstream may list a day
    /// under a local date or pause across midnight. Running out of
    /// `max_settle_steps` lookups keeps the earliest game found so far.
    async fn settle(
        &self,
        date: NaiveDate,
        target: KenoTimestamp,
        converged: Converged,
    ) -> Result<DayAnchor, KenoError> {
        let cfg = &self.history;
        let Converged {
            draw: origin,
            indexed_date: origin_listed,
            mut direction,
            mut iterations,
        } = converged;
        let mut first = (origin.clone(), origin_listed);

        if origin.closed >= target {
            let mut lookups = 0u32;
            let mut good = 0u16;
            let mut bad = None;
            let mut step = 1u16;

            while bad.is_none() && step <= MAX_SETTLE_SPAN && lookups < cfg.max_settle_steps {
                lookups += 1;
                match self.game_before(&origin, origin_listed, step).await? {
                    Some(earlier) if earlier.0.closed >= target => {
                        good = step;
                        first = earlier;
                        step = step.saturating_mul(2);
                    }
                    _ => bad = Some(step),
                }
            }

            if let Some(mut bad) = bad {
                while bad - good > 1 && lookups < cfg.max_settle_steps {
                    lookups += 1;
                    let mid = good + (bad - good) / 2;
                    match self.game_before(&origin, origin_listed, mid).await? {
                        Some(earlier) if earlier.0.closed >= target => {
                            good = mid;
                            first = earlier;
                        }
                        _ => bad = mid,
                    }
                }
                if bad - good > 1 {
                    warn_unsettled(date, &first.0, lookups);
                }
            } else {
                warn_unsettled(date, &first.0, lookups);
            }

            iterations += lookups;
            if good > 0 {
                direction = Direction::Earlier;
            }
        }

        let (draw, indexed_date) = first;
        Ok(DayAnchor {
            date,
            indexed_date,
            game_number: draw.game_number,
            closed: draw.closed,
            offset_games: estimate_games(draw.closed, target, cfg.game_duration_secs),
            direction,
            iterations,
        })
    }

    /// The game `offset` games before `from`, looked up under `listed` and
    /// then the day before. A lookup that answers with a game closing after
    /// `from` belongs to another cycle of game numbers and is skipped.
    async fn game_before(
        &self,
        from: &Draw,
        listed: NaiveDate,
        offset: u16,
    ) -> Result<Option<(Draw, NaiveDate)>, KenoError> {
        let (game_number, _) = wrap_game_number(i64::from(from.game_number) - i64::from(offset));
        for candidate in [Some(listed), listed.pred_opt()].into_iter().flatten() {
            if let Some(draw) = self.game_on(game_number, candidate).await? {
                if draw.closed < from.closed {
                    return Ok(Some((draw, candidate)));
                }
            }
        }
        Ok(None)
    }
}

/// Furthest the settle search looks back from the converged game.
const MAX_SETTLE_SPAN: u16 = 512;

fn warn_unsettled(date: NaiveDate, anchor: &Draw, lookups: u32) {
    tracing::warn!(
        date = %date,
        game_number = anchor.game_number,
        closed = %anchor.closed,
        lookups,
        "first game of day not pinned down; anchoring on earliest game found"
    );
}
