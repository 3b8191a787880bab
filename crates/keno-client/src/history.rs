//! The paginated `/v2/info/history` endpoint.

use chrono::NaiveDate;
use keno_core::config::{MAX_GAMES_PER_REQUEST, MAX_PAGE_NUMBER, MAX_PAGE_SIZE};
use keno_core::GAME_NUMBER_SPACE;

use crate::client::KenoClient;
use crate::endpoint::HISTORY_PATH;
use crate::error::KenoError;
use crate::normalize::{normalize, Draw};
use crate::types::HistoryResponse;

/// Parameters of one history request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryQuery {
    pub starting_game_number: u16,
    pub number_of_games: u16,
    pub date: NaiveDate,
    pub page_size: u16,
    pub page_number: u16,
}

impl HistoryQuery {
    /// A one-game probe for `game_number` on `date`.
    #[must_use]
    pub fn single(game_number: u16, date: NaiveDate) -> Self {
        Self {
            starting_game_number: game_number,
            number_of_games: 1,
            date,
            page_size: 1,
            page_number: 1,
        }
    }

    /// Checks every parameter against the endpoint's accepted range.
    ///
    /// # Errors
    ///
    /// Returns [`KenoError::OutOfBounds`] for the first parameter out of range.
    pub fn validate(&self) -> Result<(), KenoError> {
        check("starting_game_number", self.starting_game_number, 0, GAME_NUMBER_SPACE - 1)?;
        check("number_of_games", self.number_of_games, 1, MAX_GAMES_PER_REQUEST)?;
        check("page_size", self.page_size, 1, MAX_PAGE_SIZE)?;
        check("page_number", self.page_number, 1, MAX_PAGE_NUMBER)?;
        Ok(())
    }

    fn params(&self) -> [(&'static str, String); 5] {
        [
            ("starting_game_number", self.starting_game_number.to_string()),
            ("number_of_games", self.number_of_games.to_string()),
            ("date", self.date.format("%Y-%m-%d").to_string()),
            ("page_size", self.page_size.to_string()),
            ("page_number", self.page_number.to_string()),
        ]
    }
}

fn check(param: &'static str, value: u16, min: u16, max: u16) -> Result<(), KenoError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(KenoError::OutOfBounds {
            param,
            value: i64::from(value),
            min: i64::from(min),
            max: i64::from(max),
        })
    }
}

/// One history response, normalized.
#[derive(Debug, Clone)]
pub struct HistoryPage {
    pub query: HistoryQuery,
    pub draws: Vec<Draw>,
}

impl HistoryPage {
    /// Whether the page came back with fewer draws than it could hold. The
    /// last page of a query holds only what `number_of_games` leaves over.
    #[must_use]
    pub fn is_short(&self) -> bool {
        let q = &self.query;
        let before = usize::from(q.page_size) * usize::from(q.page_number.saturating_sub(1));
        let room = usize::from(q.number_of_games)
            .saturating_sub(before)
            .min(usize::from(q.page_size));
        self.draws.len() < room
    }
}

impl KenoClient {
    /// Fetches and normalizes one page of historical draws.
    ///
    /// # Errors
    ///
    /// - [`KenoError::OutOfBounds`] if a parameter is outside the endpoint's
    ///   range (checked before any request is sent).
    /// - [`KenoError::Http`] / [`KenoError::UnexpectedStatus`] on transport
    ///   failure.
    /// - [`KenoError::Deserialize`] / [`KenoError::Schema`] if the body or any
    ///   draw breaks the expected shape.
    pub async fn history_page(&self, query: &HistoryQuery) -> Result<HistoryPage, KenoError> {
        query.validate()?;
        let url = self.url(HISTORY_PATH, &query.params());
        let body: HistoryResponse = self.get_json(&url).await?;
        let draws = body
            .items
            .iter()
            .map(normalize)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(
            start = query.starting_game_number,
            count = query.number_of_games,
            date = %query.date,
            page = query.page_number,
            returned = draws.len(),
            "history page"
        );
        Ok(HistoryPage {
            query: *query,
            draws,
        })
    }

    /// Fetches the single game listed as `game_number` on `date`, if any.
    pub(crate) async fn game_on(
        &self,
        game_number: u16,
        date: NaiveDate,
    ) -> Result<Option<Draw>, KenoError> {
        let page = self
            .history_page(&HistoryQuery::single(game_number, date))
            .await?;
        Ok(page.draws.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 10, 30).unwrap()
    }

    fn query() -> HistoryQuery {
        HistoryQuery {
            starting_game_number: 60,
            number_of_games: 20,
            date: date(),
            page_size: 20,
            page_number: 1,
        }
    }

    fn assert_out_of_bounds(q: HistoryQuery, expected: &str) {
        let result = q.validate();
        assert!(
            matches!(result, Err(KenoError::OutOfBounds { param, .. }) if param == expected),
            "expected OutOfBounds({expected}), got: {result:?}"
        );
    }

    #[test]
    fn accepts_query_within_bounds() {
        assert!(query().validate().is_ok());
        assert!(HistoryQuery::single(999, date()).validate().is_ok());
    }

    #[test]
    fn rejects_game_number_past_ceiling() {
        assert_out_of_bounds(
            HistoryQuery {
                starting_game_number: 1000,
                ..query()
            },
            "starting_game_number",
        );
    }

    #[test]
    fn rejects_zero_games() {
        assert_out_of_bounds(
            HistoryQuery {
                number_of_games: 0,
                ..query()
            },
            "number_of_games",
        );
    }

    #[test]
    fn rejects_oversized_page() {
        assert_out_of_bounds(
            HistoryQuery {
                page_size: 201,
                ..query()
            },
            "page_size",
        );
    }

    #[test]
    fn rejects_page_number_past_limit() {
        assert_out_of_bounds(
            HistoryQuery {
                page_number: 101,
                ..query()
            },
            "page_number",
        );
        assert_out_of_bounds(
            HistoryQuery {
                page_number: 0,
                ..query()
            },
            "page_number",
        );
    }

    fn page(query: HistoryQuery, len: usize) -> HistoryPage {
        let numbers: [u8; 20] = std::array::from_fn(|i| u8::try_from(i + 1).unwrap());
        let draw = Draw {
            game_number: query.starting_game_number,
            closed: keno_core::time::parse("2020-10-30T00:00:00Z").unwrap(),
            numbers,
            result: crate::normalize::HeadsOrTails::Heads,
            heads: 20,
            tails: 0,
            roulette: None,
            bonus: None,
        };
        HistoryPage {
            query,
            draws: vec![draw; len],
        }
    }

    #[test]
    fn short_page_allows_for_last_page_remainder() {
        let q = HistoryQuery {
            number_of_games: 180,
            page_size: 100,
            ..query()
        };
        assert!(!page(q, 100).is_short());
        assert!(page(q, 99).is_short());

        let last = HistoryQuery { page_number: 2, ..q };
        assert!(!page(last, 80).is_short());
        assert!(page(last, 79).is_short());
        assert!(!page(HistoryQuery { page_number: 3, ..q }, 0).is_short());
    }

    #[test]
    fn params_follow_upstream_names() {
        let params = query().params();
        let names: Vec<&str> = params.iter().map(|(k, _)| *k).collect();
        assert_eq!(
            names,
            vec![
                "starting_game_number",
                "number_of_games",
                "date",
                "page_size",
                "page_number"
            ]
        );
        assert_eq!(params[2].1, "2020-10-30");
    }
}
