//! YAML configuration
//!
//! One file configures the whole process: the markets to ingest, the stream
//! connection, writer batching, and log output. Loaded once at startup and
//! treated as immutable afterwards.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use common::Market;

/// Fixed-point amounts cap out well before this; higher precisions indicate
/// a configuration mistake.
pub const MAX_PRECISION: u8 = 18;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("no markets configured")]
    NoMarkets,

    #[error("duplicate market id: {0}")]
    DuplicateMarket(String),

    #[error("market {market}: precision {precision} exceeds the maximum of {MAX_PRECISION}")]
    PrecisionTooLarge { market: String, precision: u8 },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub markets: Vec<Market>,
    #[serde(default)]
    pub stream: StreamConfig,
    #[serde(default)]
    pub writer: WriterSettings,
    #[serde(default)]
    pub log: LogConfig,
}

/// Connection settings for the external log.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct StreamConfig {
    #[serde(default)]
    pub brokers: Vec<String>,
    #[serde(rename = "use_tls")]
    #[serde(default)]
    pub use_tls: bool,
}

/// Writer batching tunables.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WriterSettings {
    #[serde(rename = "queue_capacity")]
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    #[serde(rename = "batch_size")]
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(rename = "batch_timeout_ms")]
    #[serde(default = "default_batch_timeout_ms")]
    pub batch_timeout_ms: u64,
}

impl WriterSettings {
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            batch_size: default_batch_size(),
            batch_timeout_ms: default_batch_timeout_ms(),
        }
    }
}

fn default_queue_capacity() -> usize {
    100
}

fn default_batch_size() -> usize {
    20_000
}

fn default_batch_timeout_ms() -> u64 {
    100
}

/// Log output settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LogConfig {
    #[serde(default)]
    pub format: LogFormat,
    #[serde(default)]
    pub level: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

impl Config {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    /// Parse and validate configuration from YAML text.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.markets.is_empty() {
            return Err(ConfigError::NoMarkets);
        }
        let mut seen = std::collections::HashSet::new();
        for market in &self.markets {
            if !seen.insert(market.id.as_str()) {
                return Err(ConfigError::DuplicateMarket(market.id.clone()));
            }
            for precision in [market.market_precision, market.quote_precision] {
                if precision > MAX_PRECISION {
                    return Err(ConfigError::PrecisionTooLarge {
                        market: market.id.clone(),
                        precision,
                    });
                }
            }
        }
        Ok(())
    }
}
