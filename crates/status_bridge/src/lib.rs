//! Integration layer between a host proxy and the status customization core.
//!
//! The host delivers inbound connection events and outbound status pings;
//! the external decision core computes what to change about each ping. This
//! crate sits between them: it wraps pings in a lazy [`ResponseFetcher`],
//! overlays the computed [`Response`] onto the outbound structure, resolves
//! favicons through the concurrent render cache, and keeps the host's event
//! listeners reconciled with the current configuration.
//!
//! [`ResponseFetcher`]: status_model::ResponseFetcher
//! [`Response`]: status_model::Response

mod bridge;
mod config;
mod error;
mod host;
mod logging;
mod reconciler;

pub use bridge::StatusBridge;
pub use config::{BridgeConfig, CacheSettings, FeatureFlags, LoggingSettings};
pub use error::{BridgeError, ConfigError};
pub use host::{EventRegistry, ListenerHandle, ListenerKind, StatsReporter, StatusCore};
pub use logging::setup_logging;
pub use reconciler::FeatureReconciler;
