//! Error types for the bridge layer.

use std::io::Error as IoError;
use std::path::PathBuf;
use thiserror::Error;

/// Bridge-level failures.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The external decision core could not be initialized. Fatal: the
    /// bridge stays inert and never registers a listener.
    #[error("core initialization failed: {0}")]
    InitializationFailed(String),

    /// The stats reporter failed to start or stop. Non-fatal: logged as a
    /// warning, other listener reconciliation is unaffected.
    #[error("stats reporter error: {0}")]
    Reporter(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration loading and validation failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    Read(PathBuf, IoError),

    #[error("failed to write config file {0}: {1}")]
    Write(PathBuf, IoError),

    #[error("failed to parse config file {0}: {1}")]
    Parse(PathBuf, toml::de::Error),

    #[error("failed to encode default configuration: {0}")]
    Encode(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
