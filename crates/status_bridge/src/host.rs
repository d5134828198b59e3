//! Capability interfaces implemented by the host and the decision core.
//!
//! The bridge never touches a concrete event bus or plugin manager; the
//! host adapts its native registration mechanics behind [`EventRegistry`]
//! and [`StatsReporter`], and the external decision engine sits behind
//! [`StatusCore`].

use std::net::IpAddr;

use favicon_cache::{FaviconError, FaviconSource};
use status_model::{Response, ResponseFetcher};

use crate::config::FeatureFlags;
use crate::error::BridgeError;

/// The listener kinds the reconciler manages on the host side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    /// Inbound connection events, feeding player tracking.
    PlayerTracking,
    /// Outbound status ping events.
    Ping,
}

/// Opaque registration token handed out by the host.
///
/// The reconciler holds at most one live handle per [`ListenerKind`] and is
/// the sole writer of their lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle(u64);

impl ListenerHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Host-side event listener registration.
pub trait EventRegistry: Send + Sync {
    /// Starts delivering events of `kind` to the bridge and returns the
    /// registration token.
    fn register(&self, kind: ListenerKind) -> ListenerHandle;

    /// Stops the registration behind `handle`.
    fn unregister(&self, handle: ListenerHandle);
}

/// Host-side statistics reporter; starting and stopping may perform I/O
/// and fail.
pub trait StatsReporter: Send + Sync {
    fn start(&self) -> Result<(), BridgeError>;
    fn stop(&self) -> Result<(), BridgeError>;
}

/// The external decision engine the bridge integrates with.
pub trait StatusCore: Send + Sync {
    /// Computes the sparse customization overlay for one outbound ping.
    ///
    /// Called once per ping. The fetcher is the core's only channel to the
    /// host's live player counts and must not be drained eagerly.
    fn compute_response(&self, client: IpAddr, fetcher: &ResponseFetcher) -> Response;

    /// Records one inbound client connection for player tracking.
    fn record_client_connection(&self, name: &str, address: IpAddr);

    /// Whether any status customization is currently active; queried on
    /// every status-change notification to decide if the ping listener is
    /// worth keeping registered.
    fn has_active_customizations(&self) -> bool;

    /// Current configuration facets; queried on every configuration reload.
    fn current_feature_flags(&self) -> FeatureFlags;

    /// The icon the core wants on this ping, if any.
    fn favicon_source(&self, client: IpAddr) -> Option<FaviconSource>;

    /// Produces raw image bytes for a favicon source; the cache's loader.
    fn load_favicon_bytes(&self, source: &FaviconSource) -> Result<Vec<u8>, FaviconError>;
}
