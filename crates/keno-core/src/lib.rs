//! Domain types shared by the Keno client: the jurisdiction set, the upstream
//! timestamp codec, and client configuration.

pub mod config;
pub mod error;
pub mod jurisdiction;
pub mod time;

pub use config::{ClientConfig, HistoryConfig};
pub use error::{ConfigError, TimeError};
pub use jurisdiction::{canonicalize, Canonical, Jurisdiction};
pub use time::KenoTimestamp;

/// Size of the upstream game-number space; game numbers run `0..GAME_NUMBER_SPACE`.
pub const GAME_NUMBER_SPACE: u16 = 1000;

/// Numbers drawn in every Keno game.
pub const NUMBERS_PER_DRAW: usize = 20;

/// Highest number that can be drawn. Numbers run `1..=MAX_NUMBER`.
pub const MAX_NUMBER: u8 = 80;
