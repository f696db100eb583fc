//! Time-to-live cache for fetched market data.
//!
//! Each entry remembers when it was stored. A lookup older than the TTL counts as a
//! miss, and `get_or_try_insert_with` refetches it; `purge_expired` drops such
//! entries in bulk. The age check reads an injected `Clock`, so tests move time by
//! hand with `ManualClock` instead of sleeping.
//!
//! A failed fetch stores nothing, which means the next lookup for that key asks the
//! provider again. Cached values are handed out as clones.

use std::cell::Cell;
use std::collections::HashMap;
use std::hash::Hash;
use std::rc::Rc;
use std::time::{Duration, Instant};

use log::debug;

/// Source of monotonic time.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> Instant;
}

/// Wall-clock backed by `Instant::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<Instant>>,
}

impl ManualClock {
    /// Start at the current instant.
    pub fn new() -> Self {
        ManualClock {
            now: Rc::new(Cell::new(Instant::now())),
        }
    }

    /// Move time forward by `by`.
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Internal bookkeeping for a cached value.
struct CacheEntry<V> {
    stored_at: Instant,
    value: V,
}

/// Map from key to the last value fetched for it, valid for `ttl`.
pub struct TtlCache<K, V, C = SystemClock> {
    /// Cached values with their insertion time.
    entries: HashMap<K, CacheEntry<V>>,
    /// Age after which an entry is considered stale.
    ttl: Duration,
    clock: C,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V, SystemClock> {
    /// Create a cache on the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K: Eq + Hash + Clone, V: Clone, C: Clock> TtlCache<K, V, C> {
    /// Create a cache driven by `clock`.
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
            clock,
        }
    }

    fn is_fresh(&self, entry: &CacheEntry<V>) -> bool {
        self.clock.now().duration_since(entry.stored_at) < self.ttl
    }

    /// Fresh value for `key`, if any.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries
            .get(key)
            .filter(|entry| self.is_fresh(entry))
            .map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: K, value: V) {
        let stored_at = self.clock.now();
        self.entries.insert(key, CacheEntry { stored_at, value });
    }

    /// Return the fresh value for `key` or fetch, store and return a new one.
    ///
    /// Errors from `fetch` are returned unchanged and nothing is stored.
    pub fn get_or_try_insert_with<E, F>(&mut self, key: &K, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if let Some(value) = self.get(key) {
            debug!("cache hit");
            return Ok(value);
        }
        let value = fetch()?;
        self.insert(key.clone(), value.clone());
        Ok(value)
    }

    /// Remove expired entries and return their keys.
    pub fn purge_expired(&mut self) -> Vec<K> {
        let now = self.clock.now();
        let ttl = self.ttl;
        let mut expired = Vec::new();

        self.entries.retain(|key, entry| {
            if now.duration_since(entry.stored_at) >= ttl {
                expired.push(key.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of stored entries, fresh or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
