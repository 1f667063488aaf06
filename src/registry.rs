//! Keyed interning registry.
//!
//! A [`Registry`] maps keys to shared objects and guarantees that, for each key,
//! the constructor runs exactly once no matter how many threads ask for it at the
//! same time. Every caller receives the same `Arc`.
//!
//! Each key owns a one-time initialization cell. The map lock is only held to
//! look a cell up or to insert an empty one; constructors run outside it, inside
//! the cell, so a slow constructor for one key never blocks lookups of another.
//!
//! # Examples
//!
//! ```
//! use intern_registry::Registry;
//! use std::convert::Infallible;
//! use std::sync::Arc;
//!
//! let registry: Registry<&str, String> = Registry::new();
//!
//! let a = registry.get_or_create("Oak", || Ok::<_, Infallible>("Quercus".to_string())).unwrap();
//! let b = registry.get_or_create("Oak", || Ok::<_, Infallible>("Pinus".to_string())).unwrap();
//!
//! assert!(Arc::ptr_eq(&a, &b));
//! assert_eq!(&*b, "Quercus");
//! assert_eq!(registry.size(), 1);
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use once_cell::sync::OnceCell;
use tracing::{debug, info, trace, warn};

use crate::{BoxError, RegistryConfig, RegistryError, RegistryEvent, RegistryKey};

/// Type alias for the user-supplied tracing callback.
///
/// The callback receives every [`RegistryEvent`] emitted by the registry it is
/// installed on. It must be thread-safe because registries are shared between
/// threads.
pub type TraceCallback = dyn Fn(&RegistryEvent) + Send + Sync + 'static;

/// Per-key entry. Empty means ABSENT (or UNDER_CONSTRUCTION while a caller is
/// inside `get_or_try_init`), filled means READY.
type Slot<V> = Arc<OnceCell<Arc<V>>>;

/// Thread-safe registry producing exactly one shared object per key.
pub struct Registry<K, V: ?Sized> {
    name: Cow<'static, str>,
    entries: RwLock<HashMap<K, Slot<V>>>,
    ready: AtomicUsize,
    trace: RwLock<Option<Arc<TraceCallback>>>,
}

impl<K, V> Registry<K, V>
where
    K: RegistryKey,
    V: ?Sized + Send + Sync + 'static,
{
    /// Creates an empty registry with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Creates an empty registry named and sized by `config`.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            name: config.name,
            entries: RwLock::new(HashMap::with_capacity(config.initial_capacity)),
            ready: AtomicUsize::new(0),
            trace: RwLock::new(None),
        }
    }

    /// Name used in log records for this registry.
    pub fn name(&self) -> &str {
        &self.name
    }

    // -------------------------------------------------------------------------------------------------
    // Tracing
    // -------------------------------------------------------------------------------------------------

    /// Set a tracing callback for registry operations.
    ///
    /// The callback is invoked for hits, constructions, publications and
    /// construction failures. It runs without the map lock held, so it may call
    /// back into the registry, with one exception: [`RegistryEvent::Construct`]
    /// is emitted while the key's initialization is in progress, so a callback
    /// handling it must not call [`get_or_create`](Self::get_or_create) for that
    /// same key (it would wait on itself forever). [`get`](Self::get) and
    /// [`contains`](Self::contains) are fine there and report the key as absent.
    ///
    /// # Lock Poisoning Recovery
    ///
    /// If the trace lock is poisoned, this method recovers the inner value.
    pub fn set_trace_callback(&self, callback: impl Fn(&RegistryEvent) + Send + Sync + 'static) {
        let mut guard = self.trace.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Arc::new(callback));
    }

    /// Clear the tracing callback.
    ///
    /// Does not affect stored objects.
    pub fn clear_trace_callback(&self) {
        let mut guard = self.trace.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }

    /// Builds and emits an event if a callback is installed.
    fn emit_with(&self, event: impl FnOnce() -> RegistryEvent) {
        let callback = self
            .trace
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback(&event());
        }
    }

    // -------------------------------------------------------------------------------------------------
    // Registry
    // -------------------------------------------------------------------------------------------------

    /// Returns the shared object for `key`, constructing it on first demand.
    ///
    /// If the key is ready, the stored object is returned and `constructor` is
    /// never called. Otherwise exactly one of the callers racing on `key` runs its
    /// constructor; the others block until it finishes and then receive the same
    /// object. Waiting is unbounded: a constructor that never returns keeps every
    /// other caller of the same key waiting.
    ///
    /// The constructor, and a trace callback handling
    /// [`RegistryEvent::Construct`], must not request `key` itself. Doing so
    /// deadlocks. Requesting other keys is allowed.
    ///
    /// # Errors
    ///
    /// [`RegistryError::ConstructionFailed`] if the constructor fails. The key is
    /// left absent, and one of the blocked callers (if any) runs its own
    /// constructor next.
    pub fn get_or_create<F, E>(&self, key: K, constructor: F) -> Result<Arc<V>, RegistryError>
    where
        V: Sized,
        F: FnOnce() -> Result<V, E>,
        E: Into<BoxError>,
    {
        self.get_or_create_arc(key, || constructor().map(Arc::new))
    }

    /// Like [`get_or_create`](Self::get_or_create), for constructors that already
    /// produce an `Arc`. This is also the entry point for unsized values such as
    /// `dyn Trait` objects.
    pub fn get_or_create_arc<F, E>(&self, key: K, constructor: F) -> Result<Arc<V>, RegistryError>
    where
        F: FnOnce() -> Result<Arc<V>, E>,
        E: Into<BoxError>,
    {
        let slot = match self.slot(&key) {
            Some(slot) => {
                if let Some(value) = slot.get() {
                    self.record_hit(&key);
                    return Ok(Arc::clone(value));
                }
                slot
            }
            None => self.insert_slot(&key),
        };

        // Counted before the cell is filled, so `size()` never trails `contains()`.
        let mut published = None;
        let result = slot.get_or_try_init(|| {
            debug!(registry = %self.name, key = ?key, "constructing shared object");
            self.emit_with(|| RegistryEvent::Construct {
                key: format!("{key:?}"),
            });
            let value = constructor().map_err(Into::into)?;
            published = Some(self.ready.fetch_add(1, Ordering::AcqRel) + 1);
            Ok::<_, BoxError>(value)
        });

        match (result, published) {
            (Ok(value), Some(size)) => {
                info!(registry = %self.name, key = ?key, size, "published shared object");
                self.emit_with(|| RegistryEvent::Publish {
                    key: format!("{key:?}"),
                    size,
                });
                Ok(Arc::clone(value))
            }
            (Ok(value), None) => {
                self.record_hit(&key);
                Ok(Arc::clone(value))
            }
            (Err(source), _) => {
                warn!(
                    registry = %self.name,
                    key = ?key,
                    error = %source,
                    "shared object construction failed"
                );
                self.emit_with(|| RegistryEvent::ConstructionFailed {
                    key: format!("{key:?}"),
                });
                Err(RegistryError::construction_failed(&key, source))
            }
        }
    }

    /// Retrieve a ready object without constructing anything.
    pub fn get(&self, key: &K) -> Option<Arc<V>> {
        self.slot(key).and_then(|slot| slot.get().cloned())
    }

    /// Check if `key` has a ready object.
    pub fn contains(&self, key: &K) -> bool {
        self.slot(key).is_some_and(|slot| slot.get().is_some())
    }

    /// Number of ready objects. Keys whose construction failed are not counted.
    ///
    /// A key is counted just before it becomes visible, so a thread that sees
    /// [`contains`](Self::contains) return `true` also sees it in `size()`.
    pub fn size(&self) -> usize {
        self.ready.load(Ordering::Acquire)
    }

    /// `true` if no key is ready.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn record_hit(&self, key: &K) {
        trace!(registry = %self.name, key = ?key, "registry hit");
        self.emit_with(|| RegistryEvent::Hit {
            key: format!("{key:?}"),
        });
    }

    /// Shared-lock lookup of the cell for `key`.
    fn slot(&self, key: &K) -> Option<Slot<V>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Inserts an empty cell for `key` unless another thread already did, and
    /// returns whichever cell is in the map.
    fn insert_slot(&self, key: &K) -> Slot<V> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(entries.entry(key.clone()).or_default())
    }
}

impl<K, V> Default for Registry<K, V>
where
    K: RegistryKey,
    V: ?Sized + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V: ?Sized> fmt::Debug for Registry<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("name", &self.name)
            .field("size", &self.ready.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}

// -------------------------------------------------------------------------------------------------
// Tests
// -------------------------------------------------------------------------------------------------
