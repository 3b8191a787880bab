//! Multi-day history reconstruction.
//!
//! Each day is anchored with [`KenoClient::locate`] and then paginated
//! forward in windows of `window_size` games until the day runs out.
//! Windows that would run past game 999 are split at the rollover.

use std::fmt;

use chrono::NaiveDate;
use keno_core::GAME_NUMBER_SPACE;

use crate::client::KenoClient;
use crate::error::KenoError;
use crate::frame::DrawFrame;
use crate::history::HistoryQuery;
use crate::locator::{wrap_game_number, DayAnchor};
use crate::normalize::Draw;

/// Where a day's fetch stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Locate,
    Paginate,
}

impl fmt::Display for FetchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FetchStage::Locate => "locate",
            FetchStage::Paginate => "paginate",
        })
    }
}

/// A day that could not be fetched in full.
#[derive(Debug)]
pub struct DayFailure {
    pub date: NaiveDate,
    pub stage: FetchStage,
    pub error: KenoError,
    /// Draws of this day that made it into the frame before the failure.
    pub draws_kept: usize,
}

/// Result of [`KenoClient::fetch_range`].
#[derive(Debug, Default)]
pub struct HistoryRange {
    pub draws: DrawFrame,
    pub failures: Vec<DayFailure>,
}

impl HistoryRange {
    /// Whether every day in the range was fetched without error.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Splits a window of `count` games starting at `start` into request
/// segments that stay inside `0..1000`.
///
/// `(900, 180)` becomes `[(900, 100), (0, 80)]`.
#[must_use]
pub fn window_segments(start: u16, count: u16) -> Vec<(u16, u16)> {
    let room = GAME_NUMBER_SPACE.saturating_sub(start);
    if count <= room {
        vec![(start, count)]
    } else {
        vec![(start, room), (0, count - room)]
    }
}

impl KenoClient {
    /// Fetches every draw that closed on a date in `[start, end]`, in closing
    /// order.
    ///
    /// A day that cannot be located or paginated is recorded in
    /// [`HistoryRange::failures`] and the range carries on with the next day;
    /// draws fetched before a pagination failure are kept.
    ///
    /// # Errors
    ///
    /// Returns [`KenoError::InvalidRange`] if `start` is after `end`. Every
    /// other failure is reported per day.
    pub async fn fetch_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<HistoryRange, KenoError> {
        if start > end {
            return Err(KenoError::InvalidRange { start, end });
        }

        let mut range = HistoryRange::default();
        for date in start.iter_days().take_while(|d| *d <= end) {
            let anchor = match self.locate(date).await {
                Ok(anchor) => anchor,
                Err(error) => {
                    tracing::warn!(date = %date, error = %error, "skipping day: first game not found");
                    range.failures.push(DayFailure {
                        date,
                        stage: FetchStage::Locate,
                        error,
                        draws_kept: 0,
                    });
                    continue;
                }
            };

            let before = range.draws.len();
            match self.fetch_day(&anchor, &mut range.draws).await {
                Ok(()) => {
                    tracing::debug!(date = %date, draws = range.draws.len() - before, "day fetched");
                }
                Err(error) => {
                    let draws_kept = range.draws.len() - before;
                    tracing::warn!(
                        date = %date,
                        draws_kept,
                        error = %error,
                        "day interrupted during pagination"
                    );
                    range.failures.push(DayFailure {
                        date,
                        stage: FetchStage::Paginate,
                        error,
                        draws_kept,
                    });
                }
            }
        }
        Ok(range)
    }

    /// Paginates one day from its anchor into `frame`.
    ///
    /// Only draws that closed on `anchor.date` are kept. When the anchor is
    /// listed under the previous date, that date's tail is read first and
    /// pagination then moves to the anchor date. Upstream may list the end of
    /// a day under the following date, so a short window on the anchor date
    /// looks the next game up there and carries on if it still belongs to
    /// the day. A window reaching past the day ends it.
    async fn fetch_day(&self, anchor: &DayAnchor, frame: &mut DrawFrame) -> Result<(), KenoError> {
        let cfg = &self.history;
        let mut query_date = anchor.indexed_date;
        let mut next = anchor.game_number;

        for _ in 0..cfg.max_windows_per_day {
            let draws = self.fetch_window(next, query_date).await?;
            let full = draws.len() >= usize::from(cfg.window_size);
            let day_over = draws.iter().any(|d| d.closed.date() > anchor.date);
            if let Some(last) = draws.last() {
                next = wrap_game_number(i64::from(last.game_number) + 1).0;
            }
            frame.extend_unique(draws.into_iter().filter(|d| d.closed.date() == anchor.date));

            if day_over {
                return Ok(());
            }
            if full {
                continue;
            }
            if query_date < anchor.date {
                tracing::debug!(
                    from = %query_date,
                    to = %anchor.date,
                    next,
                    "previous day exhausted; continuing on target date"
                );
                query_date = anchor.date;
                continue;
            }

            let Some(following) = query_date.succ_opt() else {
                return Ok(());
            };
            match self.game_on(next, following).await? {
                Some(draw) if draw.closed.date() == anchor.date => {
                    tracing::debug!(
                        from = %query_date,
                        to = %following,
                        next,
                        "day continues under the following listing date"
                    );
                    query_date = following;
                }
                _ => return Ok(()),
            }
        }

        Err(KenoError::PaginationLimit {
            date: anchor.date,
            max_windows: cfg.max_windows_per_day,
        })
    }

    /// Fetches up to `window_size` consecutive games listed on `date`,
    /// starting at `start`. Stops early on a short segment.
    async fn fetch_window(&self, start: u16, date: NaiveDate) -> Result<Vec<Draw>, KenoError> {
        let segments = window_segments(start, self.history.window_size);
        if segments.len() > 1 {
            tracing::debug!(start, segments = ?segments, "window split at game-number rollover");
        }

        let mut draws = Vec::with_capacity(usize::from(self.history.window_size));
        for (segment_start, count) in segments {
            let segment = self.fetch_segment(segment_start, count, date).await?;
            let short = segment.len() < usize::from(count);
            draws.extend(segment);
            if short {
                break;
            }
        }
        Ok(draws)
    }

    /// Reads one `(start, count)` request page by page.
    async fn fetch_segment(
        &self,
        start: u16,
        count: u16,
        date: NaiveDate,
    ) -> Result<Vec<Draw>, KenoError> {
        let page_size = self.history.page_size;
        let wanted = usize::from(count);
        let mut draws = Vec::with_capacity(wanted);
        let mut page_number = 1u16;

        while draws.len() < wanted {
            let query = HistoryQuery {
                starting_game_number: start,
                number_of_games: count,
                date,
                page_size,
                page_number,
            };
            let page = self.history_page(&query).await?;
            let short = page.is_short();
            draws.extend(page.draws);
            if short {
                break;
            }
            page_number += 1;
        }
        Ok(draws)
    }
}
