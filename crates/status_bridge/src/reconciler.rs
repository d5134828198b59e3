//! Listener reconciliation against configuration and status state.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::FeatureFlags;
use crate::host::{EventRegistry, ListenerHandle, ListenerKind, StatsReporter};

/// Moves the host's listener registrations to the desired,
/// configuration-derived state.
///
/// Owns the listener handles and the reporter-running flag; nothing else
/// writes them. Passes are expected to be serialized by the caller (the
/// bridge holds the reconciler behind a mutex), and every transition is
/// guarded, so repeating a pass with the same desired state is a no-op.
///
/// The three kinds are reconciled independently: a stats reporter failure
/// never aborts the tracking or ping branch.
pub struct FeatureReconciler<R: EventRegistry, S: StatsReporter> {
    registry: Arc<R>,
    reporter: Arc<S>,
    tracking: Option<ListenerHandle>,
    ping: Option<ListenerHandle>,
    reporter_running: bool,
}

impl<R: EventRegistry, S: StatsReporter> FeatureReconciler<R, S> {
    pub fn new(registry: Arc<R>, reporter: Arc<S>) -> Self {
        Self {
            registry,
            reporter,
            tracking: None,
            ping: None,
            reporter_running: false,
        }
    }

    /// Reconciles the configuration-driven kinds: the player tracking
    /// listener and the stats reporter. Invoked on every configuration
    /// (re)load.
    pub fn apply_flags(&mut self, flags: &FeatureFlags) {
        self.reconcile_tracking(flags.player_tracking);
        self.reconcile_reporter(flags.stats_reporting);
    }

    /// Reconciles the ping listener against the core's current
    /// customization state. Invoked on every status-change notification;
    /// the registration then stays as it is until the next notification,
    /// it is not re-derived per ping.
    pub fn apply_status(&mut self, has_changes: bool) {
        if has_changes {
            if self.ping.is_none() {
                self.ping = Some(self.registry.register(ListenerKind::Ping));
                info!("Registered proxy ping listener");
            }
        } else if let Some(handle) = self.ping.take() {
            self.registry.unregister(handle);
            info!("Unregistered proxy ping listener");
        }
    }

    fn reconcile_tracking(&mut self, desired: bool) {
        if desired {
            if self.tracking.is_none() {
                self.tracking = Some(self.registry.register(ListenerKind::PlayerTracking));
                info!("Registered proxy player tracking listener");
            }
        } else if let Some(handle) = self.tracking.take() {
            self.registry.unregister(handle);
            info!("Unregistered proxy player tracking listener");
        }
    }

    fn reconcile_reporter(&mut self, desired: bool) {
        if desired {
            if !self.reporter_running {
                match self.reporter.start() {
                    Ok(()) => {
                        self.reporter_running = true;
                        info!("Started plugin statistics reporter");
                    }
                    // Left as not running; the next pass retries.
                    Err(err) => warn!("Failed to enable plugin statistics: {err}"),
                }
            }
        } else if self.reporter_running {
            self.reporter_running = false;
            match self.reporter.stop() {
                Ok(()) => info!("Stopped plugin statistics reporter"),
                Err(err) => warn!("Failed to disable plugin statistics: {err}"),
            }
        }
    }

    /// Live tracking listener handle, if registered.
    pub fn tracking_handle(&self) -> Option<ListenerHandle> {
        self.tracking
    }

    /// Live ping listener handle, if registered.
    pub fn ping_handle(&self) -> Option<ListenerHandle> {
        self.ping
    }

    /// Whether the stats reporter is currently recorded as running.
    pub fn reporter_running(&self) -> bool {
        self.reporter_running
    }
}
