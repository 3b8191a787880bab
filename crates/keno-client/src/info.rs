//! Live game status and the informational endpoints.

use std::collections::BTreeMap;

use keno_core::KenoTimestamp;
use serde::Serialize;
use serde_json::Value;

use crate::client::KenoClient;
use crate::endpoint::{GAME_STATUS_PATH, HOT_COLD_PATH, JACKPOTS_PATH, TRENDS_PATH};
use crate::error::KenoError;
use crate::normalize::{check_numbers, parse_closed, summarize, HeadsOrTailsSummary};
use crate::types::{
    GameStatusResponse, HotColdResponse, JackpotsResponse, RawCurrentGame, RawSellingGame,
};

const DRAWING_TYPE: &str = "application/vnd.tabcorp.keno.game.drawing";
const COMPLETE_TYPE: &str = "application/vnd.tabcorp.keno.game.complete";

/// Suffix upstream puts on MegaMillions (leveraged) jackpot keys.
const MEGA_MILLIONS_SUFFIX: &str = "-mm";
/// Prize prefix dropped from the jackpot maps.
const ZERO_SPOT: &str = "zero-spot";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStage {
    /// Numbers are still being drawn.
    Drawing,
    Complete,
    /// A media type this client does not recognise, kept verbatim.
    Other(String),
}

impl GameStage {
    fn from_type(kind: &str) -> Self {
        match kind {
            DRAWING_TYPE => GameStage::Drawing,
            COMPLETE_TYPE => GameStage::Complete,
            other => GameStage::Other(other.to_owned()),
        }
    }
}

/// The game currently being drawn, or the one just completed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveDraw {
    pub stage: GameStage,
    pub game_number: u16,
    pub closed: KenoTimestamp,
    /// Numbers drawn so far, in draw order. Fewer than 20 while drawing.
    pub numbers: Vec<u8>,
    pub heads_or_tails: Option<HeadsOrTailsSummary>,
    /// `receivedDrawingAt` while drawing, `receivedCompleteAt` once complete.
    pub completed_at: Option<KenoTimestamp>,
}

/// The game currently on sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextDraw {
    pub game_number: u16,
    pub closing: KenoTimestamp,
    pub opened: Option<KenoTimestamp>,
    pub selling_at: Option<KenoTimestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameStatus {
    pub current: LiveDraw,
    pub next: NextDraw,
}

/// Current jackpot figures keyed `ten_spot` ... `seven_spot`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Jackpots {
    pub regular: BTreeMap<String, f64>,
    pub mega_millions: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotCold {
    pub hot_numbers: Vec<u8>,
    pub cold_numbers: Vec<u8>,
    pub seconds_since_update: Option<u64>,
}

impl KenoClient {
    /// Fetches the current and next game from `/v2/games/kds`.
    ///
    /// # Errors
    ///
    /// Transport and decoding errors, or [`KenoError::Schema`] if a timestamp
    /// or the drawn numbers are malformed.
    pub async fn game_status(&self) -> Result<GameStatus, KenoError> {
        let url = self.url(GAME_STATUS_PATH, &[]);
        let body: GameStatusResponse = self.get_json(&url).await?;
        Ok(GameStatus {
            current: live_draw(&body.current)?,
            next: next_draw(&body.selling)?,
        })
    }

    /// The game currently being drawn.
    ///
    /// # Errors
    ///
    /// As [`KenoClient::game_status`].
    pub async fn live_draw(&self) -> Result<LiveDraw, KenoError> {
        Ok(self.game_status().await?.current)
    }

    /// The game currently on sale.
    ///
    /// # Errors
    ///
    /// As [`KenoClient::game_status`].
    pub async fn next_draw(&self) -> Result<NextDraw, KenoError> {
        Ok(self.game_status().await?.next)
    }

    /// Current regular and MegaMillions jackpots.
    ///
    /// # Errors
    ///
    /// Transport and decoding errors.
    pub async fn jackpots(&self) -> Result<Jackpots, KenoError> {
        let url = self.url(JACKPOTS_PATH, &[]);
        let body: JackpotsResponse = self.get_json(&url).await?;
        Ok(split_jackpots(&body))
    }

    /// The jurisdiction's hot and cold numbers.
    ///
    /// # Errors
    ///
    /// Transport and decoding errors.
    pub async fn hot_cold(&self) -> Result<HotCold, KenoError> {
        let url = self.url(HOT_COLD_PATH, &[]);
        let body: HotColdResponse = self.get_json(&url).await?;
        Ok(HotCold {
            hot_numbers: body.hot_numbers,
            cold_numbers: body.cold_numbers,
            seconds_since_update: body.seconds_since_last_received,
        })
    }

    /// Recent-game trends, passed through unchanged.
    ///
    /// # Errors
    ///
    /// Transport errors, or [`KenoError::Deserialize`] if the body is not JSON.
    pub async fn trends(&self) -> Result<Value, KenoError> {
        let url = self.url(TRENDS_PATH, &[]);
        self.get_json(&url).await
    }
}

fn live_draw(raw: &RawCurrentGame) -> Result<LiveDraw, KenoError> {
    let game_number = raw.game_number;
    let stage = GameStage::from_type(&raw.kind);
    let numbers = raw.draw.clone().unwrap_or_default();
    check_numbers(game_number, &numbers)?;

    let heads_or_tails = match raw
        .variants
        .as_ref()
        .and_then(|v| v.heads_or_tails.as_ref())
    {
        Some(summary) => Some(summarize(game_number, Some(summary), &numbers)?),
        None => None,
    };

    let received = match stage {
        GameStage::Drawing => raw.received_drawing_at.as_deref(),
        GameStage::Complete => raw.received_complete_at.as_deref(),
        GameStage::Other(_) => None,
    };

    Ok(LiveDraw {
        closed: parse_closed(game_number, &raw.closed)?,
        completed_at: optional_time(game_number, received)?,
        stage,
        game_number,
        numbers,
        heads_or_tails,
    })
}

fn next_draw(raw: &RawSellingGame) -> Result<NextDraw, KenoError> {
    let game_number = raw.game_number;
    Ok(NextDraw {
        game_number,
        closing: parse_closed(game_number, &raw.closing)?,
        opened: optional_time(game_number, raw.opened.as_deref())?,
        selling_at: optional_time(game_number, raw.received_selling_at.as_deref())?,
    })
}

fn optional_time(game_number: u16, raw: Option<&str>) -> Result<Option<KenoTimestamp>, KenoError> {
    raw.map(|s| parse_closed(game_number, s)).transpose()
}

/// Splits upstream jackpot keys into regular and MegaMillions maps, keeping
/// only the `base` figure. `ten-spot-mm` lands in `mega_millions` as
/// `ten_spot`; zero-spot entries are dropped.
fn split_jackpots(body: &JackpotsResponse) -> Jackpots {
    let mut jackpots = Jackpots::default();
    for (key, figure) in &body.jackpots {
        if key.starts_with(ZERO_SPOT) {
            continue;
        }
        let (target, prize) = match key.strip_suffix(MEGA_MILLIONS_SUFFIX) {
            Some(prize) => (&mut jackpots.mega_millions, prize),
            None => (&mut jackpots.regular, key.as_str()),
        };
        target.insert(prize.replace('-', "_"), figure.base);
    }
    jackpots
}
