//! Keno info API response types.
//!
//! These model the JSON returned by upstream and are decoded once at the
//! transport boundary. Fields whose absence is a contract break for one
//! record (rather than for the whole response) are `Option`, so the
//! normalizer can report them per draw instead of failing the page.

use std::collections::BTreeMap;

use serde::Deserialize;

// ---------------------------------------------------------------------------
// history
// ---------------------------------------------------------------------------

/// Body of `/v2/info/history`.
#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    #[serde(default)]
    pub items: Vec<RawDraw>,
}

/// One draw as returned by the history and game-status endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDraw {
    /// Media type, e.g. `application/vnd.tabcorp.keno.game.complete`.
    #[serde(rename = "_type", default)]
    pub kind: Option<String>,
    #[serde(rename = "game-number")]
    pub game_number: u16,
    /// Closed time in API format (`2021-06-01T00:02:41.000Z`).
    pub closed: String,
    #[serde(default)]
    pub draw: Option<Vec<u8>>,
    #[serde(default)]
    pub variants: Option<RawVariants>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawVariants {
    #[serde(rename = "heads-or-tails", default)]
    pub heads_or_tails: Option<RawHeadsOrTails>,
    #[serde(default)]
    pub bonus: Option<serde_json::Value>,
    #[serde(default)]
    pub roulette: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHeadsOrTails {
    #[serde(default)]
    pub heads: Option<u8>,
    #[serde(default)]
    pub tails: Option<u8>,
    pub result: String,
}

// ---------------------------------------------------------------------------
// games/kds
// ---------------------------------------------------------------------------

/// Body of `/v2/games/kds`: the game being drawn and the game on sale.
#[derive(Debug, Deserialize)]
pub struct GameStatusResponse {
    pub current: RawCurrentGame,
    pub selling: RawSellingGame,
}

#[derive(Debug, Deserialize)]
pub struct RawCurrentGame {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(rename = "game-number")]
    pub game_number: u16,
    pub closed: String,
    #[serde(default)]
    pub draw: Option<Vec<u8>>,
    #[serde(default)]
    pub variants: Option<RawVariants>,
    #[serde(rename = "receivedDrawingAt", default)]
    pub received_drawing_at: Option<String>,
    #[serde(rename = "receivedCompleteAt", default)]
    pub received_complete_at: Option<String>,
}

/// The upcoming game. Its embedded `jackpots` block is not modelled; the
/// dedicated jackpots endpoint carries the same figures.
#[derive(Debug, Deserialize)]
pub struct RawSellingGame {
    #[serde(rename = "game-number")]
    pub game_number: u16,
    pub closing: String,
    #[serde(default)]
    pub opened: Option<String>,
    #[serde(rename = "receivedSellingAt", default)]
    pub received_selling_at: Option<String>,
}

// ---------------------------------------------------------------------------
// info/jackpots, info/hotCold
// ---------------------------------------------------------------------------

/// Body of `/v2/info/jackpots`, keyed by prize name (`ten-spot`,
/// `ten-spot-mm`, ...).
#[derive(Debug, Deserialize)]
pub struct JackpotsResponse {
    pub jackpots: BTreeMap<String, RawJackpot>,
}

#[derive(Debug, Deserialize)]
pub struct RawJackpot {
    pub base: f64,
    #[serde(default)]
    pub next: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotColdResponse {
    pub hot_numbers: Vec<u8>,
    pub cold_numbers: Vec<u8>,
    #[serde(default)]
    pub seconds_since_last_received: Option<u64>,
}
