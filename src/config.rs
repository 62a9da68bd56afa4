//! Configuration file parser for newswire.toml.
//!
//! The config file is optional — a missing file yields `Config::default()`
//! (which has no feeds, so an aggregation pass over it is empty). Unknown
//! keys are ignored by serde, though we log a warning when the file
//! contains potential typos.
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::feed::FeedSource;
use crate::util::validate_url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("config file too large: {0}")]
    TooLarge(String),
}

/// Top-level application configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be
/// specified; missing keys fall back to `Default::default()`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ordered list of feed source URLs. The list itself is the only
    /// configuration surface the aggregation contract depends on.
    pub feeds: Vec<String>,

    /// Per-source fetch deadline in seconds.
    pub timeout_secs: u64,

    /// Upper bound on concurrently in-flight fetches.
    pub max_concurrent_fetches: usize,

    /// User-Agent header sent with every fetch.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: Vec::new(),
            timeout_secs: 30,
            max_concurrent_fetches: 8,
            user_agent: concat!("newswire/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // Race: file deleted between metadata and read
                tracing::debug!(path = %path.display(), "Config file disappeared, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        // Scan the raw table first to warn about likely typos
        if let Ok(raw) = content.parse::<toml::Table>() {
            let known_keys = [
                "feeds",
                "timeout_secs",
                "max_concurrent_fetches",
                "user_agent",
            ];
            for key in raw.keys() {
                if !known_keys.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), feeds = config.feeds.len(), "Loaded configuration");
        Ok(config)
    }

    /// The configured feed list as [`FeedSource`]s, in configured order.
    ///
    /// URLs that fail validation (bad scheme, localhost, private IP) are
    /// skipped with a warning rather than aborting the run; a source list
    /// full of junk degrades to an empty aggregation, per the pipeline's
    /// failure model.
    pub fn sources(&self) -> Vec<FeedSource> {
        self.feeds
            .iter()
            .filter_map(|url| match validate_url(url) {
                Ok(_) => Some(FeedSource::new(url.clone())),
                Err(e) => {
                    tracing::warn!(url = %url, error = %e, "Skipping invalid feed URL");
                    None
                }
            })
            .collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
