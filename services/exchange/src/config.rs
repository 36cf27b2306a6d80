//! Engine configuration
//!
//! Loaded from TOML. Missing sections fall back to the defaults below, which
//! describe a DAI-quoted exchange listing BAT, REP and ZRX.
//!
//! ```toml
//! queue_capacity = 1024
//! event_capacity = 65536
//!
//! [reference_asset]
//! ticker = "DAI"
//! handle = "dai"
//!
//! [[assets]]
//! ticker = "BAT"
//! handle = "bat"
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use types::asset::{InvalidTicker, Ticker, TokenHandle};
use types::errors::ExchangeError;

/// One asset entry: ticker plus external token handle
///
/// Kept as plain strings; [`EngineConfig::from_toml_str`] checks every ticker
/// and [`AssetConfig::ticker`] hands out the validated form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub ticker: String,
    pub handle: String,
}

impl AssetConfig {
    pub fn new(ticker: &str, handle: &str) -> Self {
        Self {
            ticker: ticker.to_string(),
            handle: handle.to_string(),
        }
    }

    pub fn ticker(&self) -> Result<Ticker, InvalidTicker> {
        Ticker::try_new(self.ticker.as_str())
    }

    pub fn handle(&self) -> TokenHandle {
        TokenHandle::new(self.handle.as_str())
    }
}

/// Configuration for the exchange engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Quote asset every market is priced in
    pub reference_asset: AssetConfig,
    /// Tradable assets registered at startup, in order
    pub assets: Vec<AssetConfig>,
    /// Maximum number of pending requests in the actor queue.
    pub queue_capacity: usize,
    /// Events kept for `drain_events`; the oldest are dropped past this
    pub event_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reference_asset: AssetConfig::new("DAI", "dai"),
            assets: vec![
                AssetConfig::new("BAT", "bat"),
                AssetConfig::new("REP", "rep"),
                AssetConfig::new("ZRX", "zrx"),
            ],
            queue_capacity: 1024,
            event_capacity: 65_536,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::Invalid("queue_capacity must be positive".to_string()));
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::Invalid("event_capacity must be positive".to_string()));
        }
        self.reference_asset.ticker()?;
        for asset in &self.assets {
            asset.ticker()?;
        }
        Ok(())
    }
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),

    #[error("Invalid config: {0}")]
    Ticker(#[from] InvalidTicker),

    #[error("Asset listing rejected: {0}")]
    Listing(#[from] ExchangeError),
}
