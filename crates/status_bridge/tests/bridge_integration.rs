//! End-to-end tests for the bridge: fake core + recording host capabilities.

use std::net::{IpAddr, Ipv4Addr};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use favicon_cache::{EvictionPolicy, FaviconError, FaviconSource, SourceKind};
use status_bridge::{
    BridgeConfig, BridgeError, EventRegistry, FeatureFlags, ListenerHandle, ListenerKind,
    StatsReporter, StatusBridge, StatusCore,
};
use status_model::{Players, Response, ResponseFetcher, ServerVersion, StatusPing};

const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

fn client() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7))
}

fn ping_with_sections() -> StatusPing {
    StatusPing {
        description: "Old".to_string(),
        players: Some(Players {
            max: 3,
            online: 3,
            sample: vec![],
        }),
        version: Some(ServerVersion {
            name: "1.21".to_string(),
            protocol: 767,
        }),
        favicon: None,
    }
}

/// Scriptable decision core standing in for the external engine.
#[derive(Default)]
struct FakeCore {
    response: Mutex<Response>,
    flags: Mutex<FeatureFlags>,
    has_changes: AtomicBool,
    favicon: Mutex<Option<FaviconSource>>,
    fail_loads: AtomicBool,
    loads: AtomicUsize,
    connections: Mutex<Vec<(String, IpAddr)>>,
    fetched_online: Mutex<Vec<Option<i32>>>,
}

impl FakeCore {
    fn with_response(response: Response) -> Self {
        Self {
            response: Mutex::new(response),
            ..Default::default()
        }
    }

    fn serve_favicon(&self, name: &str) {
        *self.favicon.lock().unwrap() = Some(FaviconSource::new(SourceKind::File, name));
    }
}

impl StatusCore for FakeCore {
    fn compute_response(&self, _client: IpAddr, fetcher: &ResponseFetcher) -> Response {
        self.fetched_online
            .lock()
            .unwrap()
            .push(fetcher.players_online());
        self.response.lock().unwrap().clone()
    }

    fn record_client_connection(&self, name: &str, address: IpAddr) {
        self.connections
            .lock()
            .unwrap()
            .push((name.to_string(), address));
    }

    fn has_active_customizations(&self) -> bool {
        self.has_changes.load(Ordering::SeqCst)
    }

    fn current_feature_flags(&self) -> FeatureFlags {
        *self.flags.lock().unwrap()
    }

    fn favicon_source(&self, _client: IpAddr) -> Option<FaviconSource> {
        self.favicon.lock().unwrap().clone()
    }

    fn load_favicon_bytes(&self, source: &FaviconSource) -> Result<Vec<u8>, FaviconError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(FaviconError::Load(format!("unreachable: {}", source.source)));
        }
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(source.source.as_bytes());
        Ok(bytes)
    }
}

#[derive(Default)]
struct RecordingRegistry {
    next_handle: AtomicU64,
    registered: Mutex<Vec<ListenerKind>>,
    unregistered: AtomicUsize,
}

impl EventRegistry for RecordingRegistry {
    fn register(&self, kind: ListenerKind) -> ListenerHandle {
        self.registered.lock().unwrap().push(kind);
        ListenerHandle::new(self.next_handle.fetch_add(1, Ordering::SeqCst))
    }

    fn unregister(&self, _handle: ListenerHandle) {
        self.unregistered.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct OkReporter;

impl StatsReporter for OkReporter {
    fn start(&self) -> Result<(), BridgeError> {
        Ok(())
    }

    fn stop(&self) -> Result<(), BridgeError> {
        Ok(())
    }
}

fn bridge(
    core: Arc<FakeCore>,
) -> (
    Arc<RecordingRegistry>,
    StatusBridge<FakeCore, RecordingRegistry, OkReporter>,
) {
    let registry = Arc::new(RecordingRegistry::default());
    let bridge = StatusBridge::new(
        core,
        registry.clone(),
        Arc::new(OkReporter),
        Some(EvictionPolicy::default()),
    );
    (registry, bridge)
}

#[test]
fn ping_is_overlaid_and_favicon_attached_from_cache() {
    let core = Arc::new(FakeCore::with_response(Response {
        description: Some("Hi".to_string()),
        max_players: Some(5),
        ..Default::default()
    }));
    core.serve_favicon("icon.png");
    let (_, bridge) = bridge(core.clone());

    let mut ping = ping_with_sections();
    bridge.handle_ping(client(), &mut ping);

    assert_eq!(ping.description, "Hi");
    let players = ping.players.as_ref().unwrap();
    assert_eq!(players.online, 3);
    assert_eq!(players.max, 5);
    assert!(ping
        .favicon
        .as_deref()
        .unwrap()
        .starts_with("data:image/png;base64,"));

    // The second ping reuses the cached render.
    let mut second = ping_with_sections();
    bridge.handle_ping(client(), &mut second);
    assert_eq!(core.loads.load(Ordering::SeqCst), 1);
    assert_eq!(second.favicon, ping.favicon);
}

#[test]
fn fetcher_reflects_presence_of_players_section() {
    let core = Arc::new(FakeCore::default());
    let (_, bridge) = bridge(core.clone());

    let mut with_players = ping_with_sections();
    bridge.handle_ping(client(), &mut with_players);

    let mut without_players = StatusPing::new("Old");
    bridge.handle_ping(client(), &mut without_players);

    let seen = core.fetched_online.lock().unwrap().clone();
    assert_eq!(seen, vec![Some(3), None]);
}

#[test]
fn favicon_load_failure_leaves_ping_without_icon() {
    let core = Arc::new(FakeCore::default());
    core.serve_favicon("icon.png");
    core.fail_loads.store(true, Ordering::SeqCst);
    let (_, bridge) = bridge(core.clone());

    let mut ping = ping_with_sections();
    bridge.handle_ping(client(), &mut ping);
    assert!(ping.favicon.is_none());

    // Failures are not cached; the next cycle retries and succeeds.
    core.fail_loads.store(false, Ordering::SeqCst);
    let mut retry = ping_with_sections();
    bridge.handle_ping(client(), &mut retry);
    assert!(retry.favicon.is_some());
    assert_eq!(core.loads.load(Ordering::SeqCst), 2);
}

#[test]
fn cache_teardown_degrades_to_per_ping_loads() {
    let core = Arc::new(FakeCore::default());
    core.serve_favicon("icon.png");
    let (_, bridge) = bridge(core.clone());

    bridge.rebuild_favicon_cache(None);

    let mut first = ping_with_sections();
    bridge.handle_ping(client(), &mut first);
    let mut second = ping_with_sections();
    bridge.handle_ping(client(), &mut second);

    assert!(first.favicon.is_some());
    assert_eq!(first.favicon, second.favicon);
    assert_eq!(core.loads.load(Ordering::SeqCst), 2);
}

#[test]
fn favicon_control_surface_resolves_and_rebuilds_for_the_core() {
    let core = Arc::new(FakeCore::default());
    let (_, bridge) = bridge(core.clone());
    let source = FaviconSource::new(SourceKind::File, "icon.png");

    // Direct resolution through the cache, loading once on the cold miss.
    let first = bridge.favicon(&source).unwrap();
    let second = bridge.favicon(&source).unwrap();
    assert!(first.data_uri().starts_with("data:image/png;base64,"));
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(core.loads.load(Ordering::SeqCst), 1);

    // A rebuild discards the entry; the next resolution loads afresh.
    bridge.rebuild_favicon_cache(Some(EvictionPolicy::default()));
    let fresh = bridge.favicon(&source).unwrap();
    assert!(!Arc::ptr_eq(&first, &fresh));
    assert_eq!(core.loads.load(Ordering::SeqCst), 2);
}

#[test]
fn apply_config_rebuilds_the_cache_under_new_settings() {
    let core = Arc::new(FakeCore::default());
    core.serve_favicon("icon.png");
    let (_, bridge) = bridge(core.clone());

    let mut ping = ping_with_sections();
    bridge.handle_ping(client(), &mut ping);
    assert_eq!(core.loads.load(Ordering::SeqCst), 1);

    // Reload with caching switched off: entries are discarded and every
    // ping pays its own load.
    let mut config = BridgeConfig::default();
    config.favicon_cache.enabled = false;
    bridge.apply_config(&config);

    let mut next = ping_with_sections();
    bridge.handle_ping(client(), &mut next);
    assert!(next.favicon.is_some());
    assert_eq!(core.loads.load(Ordering::SeqCst), 2);
}

#[test]
fn login_is_recorded_into_the_core() {
    let core = Arc::new(FakeCore::default());
    let (_, bridge) = bridge(core.clone());

    bridge.handle_login("Steve", client());

    let connections = core.connections.lock().unwrap();
    assert_eq!(connections.as_slice(), &[("Steve".to_string(), client())]);
}

#[test]
fn failed_core_init_leaves_the_bridge_inert() {
    let registry = Arc::new(RecordingRegistry::default());
    let result = StatusBridge::<FakeCore, _, _>::enable(
        || Err(BridgeError::InitializationFailed("bad config".to_string())),
        registry.clone(),
        Arc::new(OkReporter),
        Some(EvictionPolicy::default()),
    );

    assert!(result.is_none());
    assert!(registry.registered.lock().unwrap().is_empty());
}

#[test]
fn enable_runs_the_initial_reconciliation_pass() {
    let core = Arc::new(FakeCore::default());
    *core.flags.lock().unwrap() = FeatureFlags {
        player_tracking: true,
        stats_reporting: false,
    };
    core.has_changes.store(true, Ordering::SeqCst);

    let registry = Arc::new(RecordingRegistry::default());
    let bridge = StatusBridge::enable(
        || Ok(core.clone()),
        registry.clone(),
        Arc::new(OkReporter),
        Some(EvictionPolicy::default()),
    )
    .unwrap();

    assert!(bridge.tracking_registered());
    assert!(bridge.ping_registered());
    let registered = registry.registered.lock().unwrap().clone();
    assert_eq!(
        registered,
        vec![ListenerKind::PlayerTracking, ListenerKind::Ping]
    );
}

#[test]
fn reload_and_status_triggers_toggle_listeners() {
    let core = Arc::new(FakeCore::default());
    *core.flags.lock().unwrap() = FeatureFlags {
        player_tracking: true,
        stats_reporting: false,
    };
    core.has_changes.store(true, Ordering::SeqCst);

    let (registry, bridge) = bridge(core.clone());
    bridge.config_reloaded();
    bridge.status_changed();
    assert!(bridge.tracking_registered());
    assert!(bridge.ping_registered());

    // Flip both desired states and notify again.
    core.flags.lock().unwrap().player_tracking = false;
    core.has_changes.store(false, Ordering::SeqCst);
    bridge.config_reloaded();
    bridge.status_changed();

    assert!(!bridge.tracking_registered());
    assert!(!bridge.ping_registered());
    assert_eq!(registry.unregistered.load(Ordering::SeqCst), 2);

    // Repeating the same notifications changes nothing.
    bridge.config_reloaded();
    bridge.status_changed();
    assert_eq!(registry.unregistered.load(Ordering::SeqCst), 2);
    assert_eq!(registry.registered.lock().unwrap().len(), 2);
}
