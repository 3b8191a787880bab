//! Shared fixtures for the integration tests: a simulated history endpoint
//! backed by a regular draw schedule, and client/tracing setup.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use keno_client::KenoClient;
use keno_core::{ClientConfig, HistoryConfig};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const HISTORY_PATH: &str = "/v2/info/history";

/// Installs a test-writer subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("test date should parse")
}

pub fn config_with_duration(game_duration_secs: u32) -> ClientConfig {
    ClientConfig {
        timeout_secs: 5,
        history: HistoryConfig {
            game_duration_secs,
            ..HistoryConfig::default()
        },
        ..ClientConfig::default()
    }
}

pub fn test_client(server: &MockServer, config: ClientConfig) -> KenoClient {
    KenoClient::with_base_url("ACT", config, &server.uri())
        .expect("client construction should not fail")
}

/// One scheduled game.
#[derive(Debug, Clone)]
pub struct Game {
    pub game_number: u16,
    pub closed: DateTime<Utc>,
}

/// A run of games at a fixed interval, listed by calendar date the way
/// upstream lists them. Listing is by UTC date unless shifted with
/// [`Schedule::listed_at_utc_offset`].
#[derive(Debug, Clone)]
pub struct Schedule {
    games: Vec<Game>,
    listing_offset: Duration,
    by_date: BTreeMap<NaiveDate, Vec<Game>>,
}

fn parse_instant(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .expect("schedule instant should parse")
        .with_timezone(&Utc)
}

impl Schedule {
    /// `count` games, the first closing at `first_closed` (RFC 3339) with
    /// number `first_game`, then every `interval_secs`.
    pub fn new(first_closed: &str, first_game: u16, interval_secs: i64, count: usize) -> Self {
        let start = parse_instant(first_closed);
        let games = (0..count)
            .map(|i| {
                let offset = i64::try_from(i).expect("count fits i64");
                Game {
                    game_number: u16::try_from((usize::from(first_game) + i) % 1000)
                        .expect("game number fits u16"),
                    closed: start + Duration::seconds(offset * interval_secs),
                }
            })
            .collect();
        Self::from_games(games, Duration::zero())
    }

    fn from_games(games: Vec<Game>, listing_offset: Duration) -> Self {
        let mut by_date: BTreeMap<NaiveDate, Vec<Game>> = BTreeMap::new();
        for game in &games {
            by_date
                .entry((game.closed + listing_offset).date_naive())
                .or_default()
                .push(game.clone());
        }
        Self {
            games,
            listing_offset,
            by_date,
        }
    }

    /// Lists each game under its local date at `hours` from UTC.
    pub fn listed_at_utc_offset(self, hours: i64) -> Self {
        Self::from_games(self.games, Duration::hours(hours))
    }

    /// Suspends play from `from` until `until` (RFC 3339). Games due in the
    /// pause close that much later; numbering carries on unbroken.
    pub fn paused(self, from: &str, until: &str) -> Self {
        let (from, until) = (parse_instant(from), parse_instant(until));
        let games = self
            .games
            .into_iter()
            .map(|game| Game {
                closed: if game.closed >= from {
                    game.closed + (until - from)
                } else {
                    game.closed
                },
                ..game
            })
            .collect();
        Self::from_games(games, self.listing_offset)
    }

    /// Games listed under `date`.
    pub fn games_on(&self, date: NaiveDate) -> &[Game] {
        self.by_date.get(&date).map_or(&[], Vec::as_slice)
    }

    /// Every game that closed on a UTC date in `[start, end]`, in order.
    pub fn closed_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<Game> {
        self.games
            .iter()
            .filter(|g| (start..=end).contains(&g.closed.date_naive()))
            .cloned()
            .collect()
    }
}

/// Parsed history query, as the simulated upstream sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryParams {
    pub starting_game_number: u16,
    pub number_of_games: usize,
    pub date: NaiveDate,
    pub page_size: usize,
    pub page_number: usize,
}

impl HistoryParams {
    pub fn from_request(request: &Request) -> Self {
        let pairs: BTreeMap<String, String> = request.url.query_pairs().into_owned().collect();
        let get = |name: &str| {
            pairs
                .get(name)
                .unwrap_or_else(|| panic!("history request missing {name}"))
                .clone()
        };
        Self {
            starting_game_number: get("starting_game_number").parse().expect("numeric"),
            number_of_games: get("number_of_games").parse().expect("numeric"),
            date: date(&get("date")),
            page_size: get("page_size").parse().expect("numeric"),
            page_number: get("page_number").parse().expect("numeric"),
        }
    }
}

/// Serves `/v2/info/history` from a [`Schedule`].
///
/// The requested game is looked up among the games listed on the requested
/// date; the following `number_of_games` games of that date are then paged
/// with `page_size` and `page_number`.
pub struct SimulatedUpstream {
    schedule: Schedule,
    /// Multi-game requests for these `(date, starting_game_number)` pairs
    /// answer 500.
    failing_windows: HashSet<(NaiveDate, u16)>,
}

impl SimulatedUpstream {
    pub fn new(schedule: Schedule) -> Self {
        Self {
            schedule,
            failing_windows: HashSet::new(),
        }
    }

    pub fn failing_window(mut self, date: NaiveDate, starting_game_number: u16) -> Self {
        self.failing_windows.insert((date, starting_game_number));
        self
    }

    pub async fn mount(self, server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(HISTORY_PATH))
            .respond_with(self)
            .mount(server)
            .await;
    }

    fn items(&self, params: &HistoryParams) -> Vec<Value> {
        let games = self.schedule.games_on(params.date);
        let Some(first) = games
            .iter()
            .position(|g| g.game_number == params.starting_game_number)
        else {
            return Vec::new();
        };
        games[first..]
            .iter()
            .take(params.number_of_games)
            .skip(params.page_size * (params.page_number - 1))
            .take(params.page_size)
            .map(draw_json)
            .collect()
    }
}

impl Respond for SimulatedUpstream {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let params = HistoryParams::from_request(request);
        if params.number_of_games > 1
            && self
                .failing_windows
                .contains(&(params.date, params.starting_game_number))
        {
            return ResponseTemplate::new(500);
        }
        ResponseTemplate::new(200).set_body_json(json!({ "items": self.items(&params) }))
    }
}

/// Twenty distinct numbers in 1..=80 that vary with the game number.
pub fn numbers_for(game_number: u16) -> Vec<u8> {
    (0..20u16)
        .map(|k| u8::try_from((game_number * 7 + k * 4) % 80 + 1).expect("fits u8"))
        .collect()
}

pub fn draw_json(game: &Game) -> Value {
    let numbers = numbers_for(game.game_number);
    let heads = numbers.iter().filter(|&&n| n <= 40).count();
    let tails = numbers.len() - heads;
    let result = match heads.cmp(&tails) {
        std::cmp::Ordering::Greater => "heads",
        std::cmp::Ordering::Less => "tails",
        std::cmp::Ordering::Equal => "evens",
    };
    json!({
        "_type": "application/vnd.tabcorp.keno.game.complete",
        "game-number": game.game_number,
        "closed": game.closed.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
        "draw": numbers,
        "variants": {
            "heads-or-tails": { "heads": heads, "tails": tails, "result": result },
            "bonus": "reg"
        }
    })
}

/// History requests the server received, in order.
pub async fn history_requests(server: &MockServer) -> Vec<HistoryParams> {
    server
        .received_requests()
        .await
        .expect("request recording is enabled")
        .iter()
        .filter(|r| r.url.path() == HISTORY_PATH)
        .map(HistoryParams::from_request)
        .collect()
}
