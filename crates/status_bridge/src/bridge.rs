//! The top-level integration object wiring core, cache and reconciler.

use std::net::IpAddr;
use std::sync::{Arc, Mutex, PoisonError};

use favicon_cache::{
    EvictionPolicy, Favicon, FaviconCache, FaviconError, FaviconLoader, FaviconSource,
};
use status_model::{ResponseFetcher, StatusPing};
use tracing::{error, warn};

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::host::{EventRegistry, StatsReporter, StatusCore};
use crate::reconciler::FeatureReconciler;

/// Cache loader delegating to the core's pluggable source resolution.
struct CoreLoader<C>(Arc<C>);

impl<C: StatusCore> FaviconLoader for CoreLoader<C> {
    fn load_bytes(&self, source: &FaviconSource) -> Result<Vec<u8>, FaviconError> {
        self.0.load_favicon_bytes(source)
    }
}

/// Integration layer instance.
///
/// Owns the favicon cache and the reconciler state; shared by the host's
/// networking threads. Ping and login handling only read immutable
/// snapshots (the current cache generation, the core reference), while
/// reconciliation passes are serialized through one mutex-guarded entry
/// point.
pub struct StatusBridge<C, R, S>
where
    C: StatusCore,
    R: EventRegistry,
    S: StatsReporter,
{
    core: Arc<C>,
    cache: FaviconCache<CoreLoader<C>>,
    reconciler: Mutex<FeatureReconciler<R, S>>,
}

impl<C, R, S> StatusBridge<C, R, S>
where
    C: StatusCore,
    R: EventRegistry,
    S: StatsReporter,
{
    /// Wires an already-initialized core to the host capabilities.
    ///
    /// `cache_policy` is the initial favicon cache policy; `None` starts
    /// with caching torn down. No listeners are registered yet; run
    /// [`config_reloaded`](Self::config_reloaded) and
    /// [`status_changed`](Self::status_changed) for the initial pass.
    pub fn new(
        core: Arc<C>,
        registry: Arc<R>,
        reporter: Arc<S>,
        cache_policy: Option<EvictionPolicy>,
    ) -> Self {
        let loader = CoreLoader(core.clone());
        let cache = match cache_policy {
            Some(policy) => FaviconCache::new(loader, policy),
            None => FaviconCache::disabled(loader),
        };
        Self {
            core,
            cache,
            reconciler: Mutex::new(FeatureReconciler::new(registry, reporter)),
        }
    }

    /// Runs the fallible core initializer and brings the bridge up.
    ///
    /// On success the initial reconciliation pass runs against the core's
    /// current flags and status state. On failure the error is logged once
    /// and `None` is returned: no listeners are ever registered and the
    /// whole customization layer stays inert.
    pub fn enable<F>(
        init: F,
        registry: Arc<R>,
        reporter: Arc<S>,
        cache_policy: Option<EvictionPolicy>,
    ) -> Option<Arc<Self>>
    where
        F: FnOnce() -> Result<Arc<C>, BridgeError>,
    {
        let core = match init() {
            Ok(core) => core,
            Err(err) => {
                error!("Failed to initialize the status core, customization disabled: {err}");
                return None;
            }
        };

        let bridge = Arc::new(Self::new(core, registry, reporter, cache_policy));
        bridge.config_reloaded();
        bridge.status_changed();
        Some(bridge)
    }

    /// Handles one outbound status ping.
    ///
    /// Wraps the ping's players section in a lazy fetcher, asks the core
    /// for its sparse response, overlays it, then resolves the core's
    /// favicon choice through the cache. A favicon load failure only means
    /// no icon is attached this cycle.
    pub fn handle_ping(&self, client: IpAddr, ping: &mut StatusPing) {
        let fetcher = match &ping.players {
            Some(players) => {
                let (online, max) = (players.online, players.max);
                ResponseFetcher::live(move || online, move || max)
            }
            None => ResponseFetcher::no_players(),
        };

        let response = self.core.compute_response(client, &fetcher);
        response.apply_to(ping);

        if let Some(source) = self.core.favicon_source(client) {
            match self.cache.get(&source) {
                Ok(favicon) => ping.favicon = Some(favicon.data_uri().to_string()),
                Err(err) => {
                    warn!("Failed to load favicon, this ping goes out without an icon: {err}")
                }
            }
        }
    }

    /// Handles one inbound client connection.
    pub fn handle_login(&self, name: &str, address: IpAddr) {
        self.core.record_client_connection(name, address);
    }

    /// Applies a freshly loaded configuration: rebuilds the favicon cache
    /// under the new cache settings, then runs the flags pass.
    pub fn apply_config(&self, config: &BridgeConfig) {
        self.cache.rebuild(config.favicon_cache.to_eviction_policy());
        self.config_reloaded();
    }

    /// Configuration-reload trigger: re-reads the core's feature flags and
    /// reconciles the tracking listener and the stats reporter.
    pub fn config_reloaded(&self) {
        let flags = self.core.current_feature_flags();
        self.lock_reconciler().apply_flags(&flags);
    }

    /// Status-change trigger: reconciles the ping listener against whether
    /// the core currently has any active customization.
    pub fn status_changed(&self) {
        let has_changes = self.core.has_active_customizations();
        self.lock_reconciler().apply_status(has_changes);
    }

    /// Cache control surface for the core: resolves one source through the
    /// cache (loading on miss).
    pub fn favicon(&self, source: &FaviconSource) -> Result<Arc<Favicon>, FaviconError> {
        self.cache.get(source)
    }

    /// Cache control surface for the core: swaps in a fresh cache under the
    /// new policy, or tears caching down when given `None`.
    pub fn rebuild_favicon_cache(&self, policy: Option<EvictionPolicy>) {
        self.cache.rebuild(policy);
    }

    /// Whether the tracking listener is currently registered.
    pub fn tracking_registered(&self) -> bool {
        self.lock_reconciler().tracking_handle().is_some()
    }

    /// Whether the ping listener is currently registered.
    pub fn ping_registered(&self) -> bool {
        self.lock_reconciler().ping_handle().is_some()
    }

    fn lock_reconciler(&self) -> std::sync::MutexGuard<'_, FeatureReconciler<R, S>> {
        self.reconciler
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
