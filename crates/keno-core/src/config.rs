//! Client and historical-search configuration.
//!
//! Configuration is built in code (there is no environment or file lookup)
//! and checked with [`ClientConfig::validate`] before a client is constructed.

use crate::{ConfigError, GAME_NUMBER_SPACE};

/// Upper bound on `number_of_games` accepted by the history endpoint.
pub const MAX_GAMES_PER_REQUEST: u16 = 200;

/// Upper bound on `page_size` accepted by the history endpoint.
pub const MAX_PAGE_SIZE: u16 = 200;

/// Upper bound on `page_number` accepted by the history endpoint.
pub const MAX_PAGE_NUMBER: u16 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Whole-request timeout applied by the HTTP client.
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub user_agent: String,
    pub history: HistoryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            connect_timeout_secs: 10,
            user_agent: "keno-client/0.1 (historical-draws)".to_owned(),
            history: HistoryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Checks every setting against the limits the upstream API accepts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] naming the first offending
    /// setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", "must be at least 1 second"));
        }
        if self.connect_timeout_secs == 0 {
            return Err(invalid("connect_timeout_secs", "must be at least 1 second"));
        }
        if self.user_agent.trim().is_empty() {
            return Err(invalid("user_agent", "must be non-empty"));
        }
        self.history.validate()
    }
}

/// Tuning for the game-number search and the per-day pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Average seconds between consecutive games, used to turn a time error
    /// into a game-number delta. Observed values range from 160 to 213.
    pub game_duration_secs: u32,
    /// Game number the search starts probing from.
    pub seed_game_number: u16,
    /// Increment applied to the seed while probes return empty pages.
    pub seed_step: u16,
    /// Games requested per window when paginating a day.
    pub window_size: u16,
    /// Games per upstream page within a window.
    pub page_size: u16,
    pub max_locator_iterations: u32,
    /// Lookups allowed when narrowing a converged game down to the first game
    /// of a day. Zero keeps the converged game as it is.
    pub max_settle_steps: u32,
    pub max_windows_per_day: u32,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            game_duration_secs: 160,
            seed_game_number: 100,
            seed_step: 200,
            window_size: 180,
            page_size: 100,
            max_locator_iterations: 20,
            max_settle_steps: 24,
            max_windows_per_day: 16,
        }
    }
}

impl HistoryConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSetting`] naming the first offending
    /// setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.game_duration_secs == 0 {
            return Err(invalid("game_duration_secs", "must be at least 1 second"));
        }
        if self.seed_game_number >= GAME_NUMBER_SPACE {
            return Err(invalid(
                "seed_game_number",
                format!("must be below {GAME_NUMBER_SPACE}"),
            ));
        }
        if self.seed_step == 0 || self.seed_step >= GAME_NUMBER_SPACE {
            return Err(invalid(
                "seed_step",
                format!("must be between 1 and {}", GAME_NUMBER_SPACE - 1),
            ));
        }
        if self.window_size == 0 || self.window_size > MAX_GAMES_PER_REQUEST {
            return Err(invalid(
                "window_size",
                format!("must be between 1 and {MAX_GAMES_PER_REQUEST}"),
            ));
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(invalid(
                "page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        if self.pages_per_window() > MAX_PAGE_NUMBER {
            return Err(invalid(
                "page_size",
                format!(
                    "a window of {} games needs more than {MAX_PAGE_NUMBER} pages",
                    self.window_size
                ),
            ));
        }
        if self.max_locator_iterations == 0 {
            return Err(invalid("max_locator_iterations", "must be at least 1"));
        }
        if self.max_windows_per_day == 0 {
            return Err(invalid("max_windows_per_day", "must be at least 1"));
        }
        Ok(())
    }

    /// Number of upstream pages needed to cover one window.
    #[must_use]
    pub fn pages_per_window(&self) -> u16 {
        self.window_size.div_ceil(self.page_size.max(1))
    }
}

fn invalid(setting: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidSetting {
        setting,
        reason: reason.into(),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
