use anyhow::Result;
use config::Config;
use serde::Deserialize;

use crate::constants::{
    DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CACHE_TTL_SECONDS, DEFAULT_LOOKAHEAD_DAYS,
    DEFAULT_LOOKBACK_DAYS, DEFAULT_MAX_ITERATIONS,
};
use crate::error::{CoreError, CoreResult};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub expansion: ExpansionConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Window policy and generator limits applied when a feed is expanded.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExpansionConfig {
    pub lookback_days: i64,
    pub lookahead_days: i64,
    pub max_iterations: usize,
    pub skip_cancelled: bool,
}

impl Default for ExpansionConfig {
    fn default() -> Self {
        Self {
            lookback_days: DEFAULT_LOOKBACK_DAYS,
            lookahead_days: DEFAULT_LOOKAHEAD_DAYS,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            skip_cancelled: true,
        }
    }
}

impl ExpansionConfig {
    /// ## Summary
    /// Checks that the window and iteration ceiling are usable.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` for negative day counts or a
    /// zero iteration ceiling.
    pub fn validate(&self) -> CoreResult<()> {
        if self.lookback_days < 0 {
            return Err(CoreError::InvalidConfiguration(format!(
                "expansion.lookback_days must not be negative, got {}",
                self.lookback_days
            )));
        }
        if self.lookahead_days < 0 {
            return Err(CoreError::InvalidConfiguration(format!(
                "expansion.lookahead_days must not be negative, got {}",
                self.lookahead_days
            )));
        }
        if self.max_iterations == 0 {
            return Err(CoreError::InvalidConfiguration(
                "expansion.max_iterations must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_seconds: u64,
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}

impl CacheConfig {
    /// ## Summary
    /// Returns the configured time-to-live as a `Duration`.
    #[must_use]
    pub const fn ttl(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.ttl_seconds)
    }

    /// ## Summary
    /// Checks that the cache can hold at least one expansion.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if `max_entries` is zero.
    pub fn validate(&self) -> CoreResult<()> {
        if self.max_entries == 0 {
            return Err(CoreError::InvalidConfiguration(
                "cache.max_entries must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and `config.toml` into a `Settings`.
    /// Environment variables take precedence over file values; anything unset
    /// falls back to the defaults in [`crate::constants`].
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating the expansion or cache section fails.
    pub fn load() -> Result<Self> {
        let settings = Config::builder()
            .set_default("logging.level", "info")?
            // TOML file
            .add_source(config::File::with_name("config.toml").required(false))
            // Env overrides
            .add_source(
                config::Environment::with_prefix("ALMANAC")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.expansion.validate()?;
        settings.cache.validate()?;
        tracing::debug!(settings = ?settings, "Settings loaded");

        Ok(settings)
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
