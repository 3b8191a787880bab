//! Client for the Keno info API (`api-info-<state>.keno.com.au`).
//!
//! Besides the live and informational endpoints, the client reconstructs
//! complete daily draw history from an endpoint that only indexes games by
//! date and a cycling `0..1000` game number. See [`KenoClient::locate`] and
//! [`KenoClient::fetch_range`].

pub mod client;
pub mod endpoint;
pub mod error;
pub mod frame;
pub mod history;
pub mod info;
pub mod locator;
pub mod normalize;
pub mod range;
pub mod types;

pub use client::KenoClient;
pub use error::KenoError;
pub use frame::{DrawFrame, COLUMNS};
pub use history::{HistoryPage, HistoryQuery};
pub use info::{GameStage, GameStatus, HotCold, Jackpots, LiveDraw, NextDraw};
pub use locator::{DayAnchor, Direction};
pub use normalize::{normalize, Draw, HeadsOrTails, HeadsOrTailsSummary};
pub use range::{window_segments, DayFailure, FetchStage, HistoryRange};
