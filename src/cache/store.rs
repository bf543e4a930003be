//! Cache Store Module
//!
//! Main cache engine combining a lock-protected HashMap with TTL expiration
//! and a background sweeper.

use std::collections::hash_map;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::stats::StatsCounters;
use crate::cache::{CacheEntry, CacheStats, Expiration};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::tasks::Sweeper;

type EntryMap<V> = HashMap<String, CacheEntry<V>>;

// == Store Inner ==
/// State shared between the store handle and its sweeper task.
#[derive(Debug)]
struct StoreInner<V> {
    /// Key-value storage, guarded by a single reader/writer lock
    entries: RwLock<EntryMap<V>>,
    /// TTL applied for `Expiration::Default`
    default_ttl: Duration,
    /// Hit/miss/sweep counters
    stats: StatsCounters,
}

impl<V> StoreInner<V> {
    // A panic while holding the lock cannot leave the map half-updated:
    // every mutation is a single HashMap call.
    fn read(&self) -> RwLockReadGuard<'_, EntryMap<V>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, EntryMap<V>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn new_entry(&self, value: V, ttl: Expiration) -> CacheEntry<V> {
        CacheEntry::new(value, ttl.deadline(self.default_ttl, Instant::now()))
    }

    fn delete_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.write();
        let before = entries.len();

        entries.retain(|_, entry| !entry.is_expired_at(now));

        let removed = before - entries.len();
        self.stats.record_sweep(removed);
        removed
    }
}

// == Cache Store ==
/// Thread-safe in-memory cache with per-entry TTL.
///
/// Every store owns an expiration sweeper spawned on the Tokio runtime it
/// was created in. Reads take a shared lock; writes and sweeps take the
/// exclusive lock, so all mutations are linearized.
///
/// Values are opaque to the store. It guards the map, not the values: a
/// value with interior mutability is the caller's responsibility.
///
/// # Example
/// ```ignore
/// let cache = CacheStore::new(Duration::from_secs(1800), Duration::from_secs(1))?;
/// cache.set("k1", "qwertyuiop".to_string(), Duration::from_secs(5));
/// assert_eq!(cache.get("k1").as_deref(), Some("qwertyuiop"));
/// ```
#[derive(Debug)]
pub struct CacheStore<V> {
    inner: Arc<StoreInner<V>>,
    sweeper: Sweeper,
}

impl<V> CacheStore<V>
where
    V: Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a new CacheStore and starts its sweeper.
    ///
    /// # Arguments
    /// * `default_ttl` - TTL used for `Expiration::Default`; zero means never expire
    /// * `sweep_interval` - Period between background sweeps, must be non-zero
    ///
    /// # Errors
    /// - `CacheError::InvalidInterval` if `sweep_interval` is zero
    /// - `CacheError::RuntimeUnavailable` if called outside a Tokio runtime
    pub fn new(default_ttl: Duration, sweep_interval: Duration) -> Result<Self> {
        let inner = Arc::new(StoreInner {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
            stats: StatsCounters::default(),
        });

        let sweep_inner = Arc::clone(&inner);
        let sweeper = Sweeper::spawn(sweep_interval, move || sweep_inner.delete_expired())?;

        Ok(Self { inner, sweeper })
    }

    /// Creates a new CacheStore from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.default_ttl, config.sweep_interval)
    }

    // == Set ==
    /// Stores a value, replacing any existing entry and its expiration.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The value to store; a replaced value is dropped
    /// * `ttl` - Expiration policy, or a `Duration` for an explicit TTL
    pub fn set(&self, key: impl Into<String>, value: V, ttl: impl Into<Expiration>) {
        let key = key.into();
        let ttl = ttl.into();

        let mut entries = self.inner.write();
        let entry = self.inner.new_entry(value, ttl);
        debug!(key = %key, ?ttl, "set");
        entries.insert(key, entry);
    }

    // == Add ==
    /// Stores a value only if the key is not present.
    ///
    /// An entry that has expired but not yet been swept still counts as
    /// present.
    ///
    /// # Errors
    /// Returns `CacheError::AlreadyExists` if the key is present; the stored
    /// entry is left untouched and `value` is dropped.
    pub fn add(&self, key: impl Into<String>, value: V, ttl: impl Into<Expiration>) -> Result<()> {
        let key = key.into();
        let ttl = ttl.into();

        let mut entries = self.inner.write();
        match entries.entry(key) {
            hash_map::Entry::Occupied(occupied) => {
                debug!(key = %occupied.key(), "add rejected, key exists");
                Err(CacheError::AlreadyExists(occupied.key().clone()))
            }
            hash_map::Entry::Vacant(vacant) => {
                debug!(key = %vacant.key(), ?ttl, "add");
                vacant.insert(self.inner.new_entry(value, ttl));
                Ok(())
            }
        }
    }

    // == Get ==
    /// Retrieves a clone of the value stored under `key`.
    ///
    /// Returns None if the key is absent or its entry has expired. Expired
    /// entries are left in place for the sweeper or `delete`.
    pub fn get(&self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let entries = self.inner.read();
        match entries.get(key) {
            Some(entry) if !entry.is_expired() => {
                self.inner.stats.record_hit();
                Some(entry.value.clone())
            }
            _ => {
                self.inner.stats.record_miss();
                None
            }
        }
    }

    /// Returns true if `key` holds an unexpired entry.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner
            .read()
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Returns the remaining TTL of a live entry.
    ///
    /// - `None` if the key is absent or expired
    /// - `Some(None)` if the entry never expires
    /// - `Some(Some(remaining))` otherwise
    pub fn ttl(&self, key: &str) -> Option<Option<Duration>> {
        let entries = self.inner.read();
        let entry = entries.get(key).filter(|entry| !entry.is_expired())?;
        Some(entry.ttl_remaining())
    }

    // == Delete ==
    /// Removes the entry for `key`. Absent keys are a no-op.
    pub fn delete(&self, key: &str) {
        if self.inner.write().remove(key).is_some() {
            debug!(key = %key, "delete");
        }
    }

    // == Delete Expired ==
    /// Removes every entry whose deadline has passed.
    ///
    /// The whole scan runs under one exclusive lock against a single clock
    /// reading. Entries without expiration are never removed.
    ///
    /// Returns the number of entries removed.
    pub fn delete_expired(&self) -> usize {
        self.inner.delete_expired()
    }

    // == Sweeper Control ==
    /// Stops the background sweeper. It cannot be restarted.
    pub fn stop_sweeper(&self) {
        self.sweeper.stop();
    }

    /// Returns true while the background sweeper task is alive.
    pub fn is_sweeper_running(&self) -> bool {
        self.sweeper.is_running()
    }

    /// Waits for the sweeper to exit after `stop_sweeper`.
    pub async fn join_sweeper(&self) {
        self.sweeper.join().await;
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.stats.snapshot(self.len())
    }

    // == Length ==
    /// Returns the number of entries in the map, including expired entries
    /// the sweeper has not reclaimed yet.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    // == Is Empty ==
    /// Returns true if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Returns the TTL applied for `Expiration::Default`.
    pub fn default_ttl(&self) -> Duration {
        self.inner.default_ttl
    }

    /// Returns the period between background sweeps.
    pub fn sweep_interval(&self) -> Duration {
        self.sweeper.interval()
    }
}
