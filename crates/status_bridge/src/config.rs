//! Bridge configuration loaded from TOML.
//!
//! Feature flags drive the listener reconciliation; cache settings are
//! translated into the favicon cache's eviction policy on every reload.

use std::fs;
use std::path::Path;
use std::time::Duration;

use favicon_cache::EvictionPolicy;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;

fn default_true() -> bool {
    true
}

/// Default for cache max_entries
fn default_cache_capacity() -> usize {
    128
}

/// Default for cache ttl_seconds (10 minutes)
fn default_cache_ttl() -> u64 {
    600
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Boolean configuration facets driving the feature reconciler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Track inbound client connections into the core.
    #[serde(default = "default_true")]
    pub player_tracking: bool,
    /// Run the host-side statistics reporter.
    #[serde(default = "default_true")]
    pub stats_reporting: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            player_tracking: true,
            stats_reporting: true,
        }
    }
}

/// Favicon cache bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Whether favicon rendering results are cached at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum number of cached favicons (0 = unbounded).
    #[serde(default = "default_cache_capacity")]
    pub max_entries: usize,
    /// Entry lifetime in seconds (0 = never expires).
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_cache_capacity(),
            ttl_seconds: default_cache_ttl(),
        }
    }
}

impl CacheSettings {
    /// Translates these settings into the cache's policy; `None` means
    /// caching is disabled and the cache should be torn down.
    pub fn to_eviction_policy(&self) -> Option<EvictionPolicy> {
        self.enabled.then(|| EvictionPolicy {
            max_entries: (self.max_entries > 0).then_some(self.max_entries),
            ttl: (self.ttl_seconds > 0).then(|| Duration::from_secs(self.ttl_seconds)),
        })
    }
}

/// Logging output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Log level filter (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Whether to output logs in JSON format
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

/// Top-level bridge configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub favicon_cache: CacheSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl BridgeConfig {
    /// Loads configuration from a TOML file.
    ///
    /// If the file doesn't exist, writes a default configuration file at
    /// the given path and returns the defaults.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content =
                fs::read_to_string(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
            let config: BridgeConfig = toml::from_str(&content)
                .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
            Ok(config)
        } else {
            let default_config = BridgeConfig::default();
            let toml_content = toml::to_string_pretty(&default_config)?;
            fs::write(path, toml_content)
                .map_err(|e| ConfigError::Write(path.to_path_buf(), e))?;
            info!("Created default configuration file: {}", path.display());
            Ok(default_config)
        }
    }

    /// Validates the configuration for consistency and correctness.
    pub fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(format!(
                "Invalid log level: {}. Must be one of: {valid_levels:?}",
                &self.logging.level
            ));
        }

        Ok(())
    }
}
