//! Normalization of raw draws into flat [`Draw`] records.

use std::fmt;

use keno_core::{time, KenoTimestamp, MAX_NUMBER, NUMBERS_PER_DRAW};
use serde::Serialize;

use crate::error::KenoError;
use crate::types::{RawDraw, RawHeadsOrTails};

/// Numbers up to and including this value count as heads; the rest as tails.
pub const HEADS_CEILING: u8 = 40;

/// Declared winner of the heads-or-tails side game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadsOrTails {
    Heads,
    Tails,
    Evens,
}

impl HeadsOrTails {
    /// Parses the upstream `result` string, ignoring ASCII case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_lowercase().as_str() {
            "heads" => Some(HeadsOrTails::Heads),
            "tails" => Some(HeadsOrTails::Tails),
            "evens" => Some(HeadsOrTails::Evens),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HeadsOrTails::Heads => "heads",
            HeadsOrTails::Tails => "tails",
            HeadsOrTails::Evens => "evens",
        }
    }
}

impl fmt::Display for HeadsOrTails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Draw {
    pub game_number: u16,
    pub closed: KenoTimestamp,
    /// Drawn numbers in draw order.
    pub numbers: [u8; NUMBERS_PER_DRAW],
    pub result: HeadsOrTails,
    pub heads: u8,
    pub tails: u8,
    /// `variants.roulette`, verbatim.
    pub roulette: Option<serde_json::Value>,
    /// `variants.bonus`, verbatim.
    pub bonus: Option<serde_json::Value>,
}

/// Heads-or-tails summary shared by completed and in-progress games.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeadsOrTailsSummary {
    pub heads: u8,
    pub tails: u8,
    pub result: HeadsOrTails,
}

/// Counts heads (1–40) and tails (41–80) among `numbers`.
#[must_use]
pub fn count_heads_tails(numbers: &[u8]) -> (u8, u8) {
    numbers.iter().fold((0u8, 0u8), |(heads, tails), &n| {
        if n <= HEADS_CEILING {
            (heads.saturating_add(1), tails)
        } else {
            (heads, tails.saturating_add(1))
        }
    })
}

/// Converts a raw draw into a [`Draw`].
///
/// # Errors
///
/// Returns [`KenoError::Schema`] when the numbers array is missing, not
/// exactly 20 long, holds a number outside 1–80 or a repeat, when the
/// heads-or-tails variant is missing or carries an unknown result, or when
/// `closed` is not a valid timestamp.
pub fn normalize(raw: &RawDraw) -> Result<Draw, KenoError> {
    let game_number = raw.game_number;
    let closed = parse_closed(game_number, &raw.closed)?;
    let numbers = complete_numbers(game_number, raw.draw.as_deref())?;

    let variants = raw
        .variants
        .as_ref()
        .ok_or_else(|| schema(game_number, "missing variants"))?;
    let summary = summarize(
        game_number,
        variants.heads_or_tails.as_ref(),
        &numbers,
    )?;

    Ok(Draw {
        game_number,
        closed,
        numbers,
        result: summary.result,
        heads: summary.heads,
        tails: summary.tails,
        roulette: variants.roulette.clone(),
        bonus: variants.bonus.clone(),
    })
}

pub(crate) fn parse_closed(game_number: u16, raw: &str) -> Result<KenoTimestamp, KenoError> {
    time::parse(raw).map_err(|e| schema(game_number, format!("closed: {e}")))
}

/// Extracts the heads-or-tails summary, deriving counts from `numbers` when
/// upstream omits them.
pub(crate) fn summarize(
    game_number: u16,
    raw: Option<&RawHeadsOrTails>,
    numbers: &[u8],
) -> Result<HeadsOrTailsSummary, KenoError> {
    let raw = raw.ok_or_else(|| schema(game_number, "missing heads-or-tails variant"))?;
    let result = HeadsOrTails::parse(&raw.result).ok_or_else(|| {
        schema(
            game_number,
            format!("unknown heads-or-tails result '{}'", raw.result),
        )
    })?;
    let (derived_heads, derived_tails) = count_heads_tails(numbers);
    Ok(HeadsOrTailsSummary {
        heads: raw.heads.unwrap_or(derived_heads),
        tails: raw.tails.unwrap_or(derived_tails),
        result,
    })
}

pub(crate) fn check_numbers(game_number: u16, numbers: &[u8]) -> Result<(), KenoError> {
    let mut seen = [false; MAX_NUMBER as usize + 1];
    for &n in numbers {
        if n == 0 || n > MAX_NUMBER {
            return Err(schema(
                game_number,
                format!("drawn number {n} outside 1..={MAX_NUMBER}"),
            ));
        }
        if std::mem::replace(&mut seen[usize::from(n)], true) {
            return Err(schema(game_number, format!("drawn number {n} repeated")));
        }
    }
    Ok(())
}

fn complete_numbers(
    game_number: u16,
    draw: Option<&[u8]>,
) -> Result<[u8; NUMBERS_PER_DRAW], KenoError> {
    let draw = draw.ok_or_else(|| schema(game_number, "missing draw numbers"))?;
    let numbers: [u8; NUMBERS_PER_DRAW] = draw.try_into().map_err(|_| {
        schema(
            game_number,
            format!("expected {NUMBERS_PER_DRAW} drawn numbers, got {}", draw.len()),
        )
    })?;
    check_numbers(game_number, &numbers)?;
    Ok(numbers)
}

fn schema(game_number: u16, reason: impl Into<String>) -> KenoError {
    KenoError::Schema {
        game_number,
        reason: reason.into(),
    }
}
