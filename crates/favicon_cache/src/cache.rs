//! Keyed single-flight cache with atomic rebuild.

use std::sync::{Arc, Mutex, OnceLock, PoisonError, RwLock};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::{debug, info};

use crate::source::{Favicon, FaviconError, FaviconLoader, FaviconSource};

/// Externally supplied bounds for cached favicon artifacts.
///
/// `None` in either field means unbounded on that axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvictionPolicy {
    /// Maximum number of cached entries; enforced after each insert.
    pub max_entries: Option<usize>,
    /// Entry lifetime; expired entries are reloaded on access and dropped
    /// during capacity enforcement.
    pub ttl: Option<Duration>,
}

impl EvictionPolicy {
    fn is_expired(&self, loaded_at: Instant) -> bool {
        self.ttl.is_some_and(|ttl| loaded_at.elapsed() > ttl)
    }
}

/// One rendered entry, timestamped for TTL checks.
#[derive(Clone)]
struct CachedEntry {
    favicon: Arc<Favicon>,
    loaded_at: Instant,
}

/// Per-key slot carrying the single-flight lock and the rendered result.
///
/// The mutex serializes loads for this key only; the cell makes the result
/// visible to racers without taking the lock again. A slot whose cell is
/// never filled (failed load) is removed so the next request retries.
#[derive(Default)]
struct Slot {
    lock: Mutex<()>,
    cell: OnceLock<CachedEntry>,
}

/// One cache generation; replaced wholesale by [`FaviconCache::rebuild`].
struct Generation {
    entries: DashMap<FaviconSource, Arc<Slot>>,
    policy: EvictionPolicy,
}

impl Generation {
    fn new(policy: EvictionPolicy) -> Self {
        Self {
            entries: DashMap::new(),
            policy,
        }
    }

    /// Drops entries until the capacity bound holds again, sparing `keep`.
    ///
    /// Expired entries go first; after that victims are arbitrary. Slots
    /// with loads still in flight may be removed too, which only orphans
    /// the eventual result, never the load itself.
    fn enforce_capacity(&self, keep: &FaviconSource) {
        let Some(max) = self.policy.max_entries else {
            return;
        };
        if self.entries.len() <= max {
            return;
        }

        if self.policy.ttl.is_some() {
            let policy = self.policy;
            self.entries.retain(|_, slot| match slot.cell.get() {
                Some(entry) => !policy.is_expired(entry.loaded_at),
                None => true,
            });
        }

        while self.entries.len() > max {
            let victim = self
                .entries
                .iter()
                .map(|entry| entry.key().clone())
                .find(|key| key != keep);
            match victim {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }
}

/// Concurrent favicon cache with per-key single-flight loads.
///
/// `get` is safe to call from any number of host networking threads.
/// `rebuild` atomically swaps the current generation: readers that already
/// cloned the old generation finish against it, readers arriving afterwards
/// only ever see the new one.
pub struct FaviconCache<L: FaviconLoader> {
    loader: L,
    generation: RwLock<Option<Arc<Generation>>>,
}

impl<L: FaviconLoader> FaviconCache<L> {
    /// Creates a cache under the given policy.
    pub fn new(loader: L, policy: EvictionPolicy) -> Self {
        Self {
            loader,
            generation: RwLock::new(Some(Arc::new(Generation::new(policy)))),
        }
    }

    /// Creates a cache with caching torn down; every `get` loads directly.
    pub fn disabled(loader: L) -> Self {
        Self {
            loader,
            generation: RwLock::new(None),
        }
    }

    /// Whether a live generation is accepting entries.
    pub fn is_enabled(&self) -> bool {
        self.current().is_some()
    }

    /// Number of entries in the current generation (0 when disabled).
    pub fn len(&self) -> usize {
        self.current().map_or(0, |generation| generation.entries.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the rendered favicon for `source`, loading it on a miss.
    ///
    /// Concurrent requests for the same cold key run exactly one load; the
    /// racers block on the per-key lock and then observe the shared result.
    /// Requests for different keys never serialize against each other. A
    /// failed load is surfaced to this caller only and is not cached, so
    /// the next request retries.
    pub fn get(&self, source: &FaviconSource) -> Result<Arc<Favicon>, FaviconError> {
        let Some(generation) = self.current() else {
            // Caching disabled: pass straight through to the loader.
            return self.render(source).map(Arc::new);
        };

        loop {
            let slot = generation
                .entries
                .entry(source.clone())
                .or_default()
                .value()
                .clone();

            if let Some(entry) = slot.cell.get() {
                if !generation.policy.is_expired(entry.loaded_at) {
                    return Ok(entry.favicon.clone());
                }
                Self::remove_slot(&generation, source, &slot);
                continue;
            }

            let guard = slot.lock.lock().unwrap_or_else(PoisonError::into_inner);

            // A racer may have finished the load while we waited.
            if let Some(entry) = slot.cell.get() {
                if !generation.policy.is_expired(entry.loaded_at) {
                    return Ok(entry.favicon.clone());
                }
                drop(guard);
                Self::remove_slot(&generation, source, &slot);
                continue;
            }

            match self.render(source) {
                Ok(favicon) => {
                    let entry = CachedEntry {
                        favicon: Arc::new(favicon),
                        loaded_at: Instant::now(),
                    };
                    let _ = slot.cell.set(entry.clone());
                    drop(guard);
                    generation.enforce_capacity(source);
                    debug!(source = ?source.source, "rendered favicon");
                    return Ok(entry.favicon);
                }
                Err(err) => {
                    drop(guard);
                    Self::remove_slot(&generation, source, &slot);
                    return Err(err);
                }
            }
        }
    }

    /// Atomically replaces the cache with a fresh, empty generation under
    /// `policy`, or tears caching down entirely when given `None`.
    ///
    /// In-flight `get` calls holding the old generation complete normally;
    /// their results become unobservable once the swap lands. The old
    /// generation's entries are drained and discarded.
    pub fn rebuild(&self, policy: Option<EvictionPolicy>) {
        let next = policy.map(|policy| Arc::new(Generation::new(policy)));
        match &next {
            Some(generation) => {
                info!(policy = ?generation.policy, "rebuilt favicon cache")
            }
            None => info!("favicon caching disabled"),
        }

        let old = {
            let mut current = self
                .generation
                .write()
                .unwrap_or_else(PoisonError::into_inner);
            std::mem::replace(&mut *current, next)
        };

        // Drain outside the swap lock so new readers never wait on the
        // teardown of the discarded generation.
        if let Some(old) = old {
            old.entries.clear();
        }
    }

    fn current(&self) -> Option<Arc<Generation>> {
        self.generation
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn render(&self, source: &FaviconSource) -> Result<Favicon, FaviconError> {
        let bytes = self.loader.load_bytes(source)?;
        Favicon::from_png_bytes(&bytes)
    }

    /// Removes `slot` only if it is still the slot registered for `source`;
    /// a concurrent rebuild or eviction may already have replaced it.
    fn remove_slot(generation: &Generation, source: &FaviconSource, slot: &Arc<Slot>) {
        generation
            .entries
            .remove_if(source, |_, current| Arc::ptr_eq(current, slot));
    }
}
