use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use time::{Duration, OffsetDateTime};
use tracing::debug;
use crate::models::place::PlaceDocument;

pub const DEFAULT_TTL: Duration = Duration::seconds(600);

pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// What a loader hands to the cache.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CachePayload {
    pub places: Vec<PlaceDocument>,
    pub pages_loaded: u32,
    pub raw_count: usize,
}

#[derive(Clone, Debug)]
pub struct CacheEntry {
    pub places: Arc<Vec<PlaceDocument>>,
    pub expires_at: OffsetDateTime,
    pub pages_loaded: u32,
    pub raw_count: usize,
}

/// In-memory expiring store of deduplicated places per geo bucket.
///
/// Entries are only dropped when read after expiry; nothing bounds the size.
/// Misses on the same key are single-flighted through a per-key async lock.
pub struct GeoCache {
    ttl: Duration,
    clock: Arc<dyn Clock>,
    entries: Mutex<HashMap<String, CacheEntry>>,
    in_flight: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl GeoCache {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let now = self.clock.now();
        let mut entries = lock(&self.entries);

        match entries.get(key) {
            Some(entry) if entry.expires_at <= now => {
                debug!("Cache entry {} expired, evicting", key);
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.clone()),
            None => None,
        }
    }

    pub fn put(&self, key: &str, payload: CachePayload) -> CacheEntry {
        let entry = CacheEntry {
            places: Arc::new(payload.places),
            expires_at: self.clock.now() + self.ttl,
            pages_loaded: payload.pages_loaded,
            raw_count: payload.raw_count,
        };

        lock(&self.entries).insert(key.to_string(), entry.clone());
        entry
    }

    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached entry for `key`, running `loader` on a miss. Concurrent misses
    /// on one key wait for the first loader instead of fetching again. A
    /// failed load stores nothing.
    pub async fn get_or_load<F, Fut, E>(&self, key: &str, loader: F) -> Result<CacheEntry, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<CachePayload, E>>,
    {
        if let Some(entry) = self.get(key) {
            debug!("Cache hit for {}", key);
            return Ok(entry);
        }

        let key_lock = lock(&self.in_flight)
            .entry(key.to_string())
            .or_default()
            .clone();
        let guard = key_lock.lock().await;

        // someone else may have filled the bucket while we waited
        let result = match self.get(key) {
            Some(entry) => {
                debug!("Cache filled by a concurrent request for {}", key);
                Ok(entry)
            }
            None => loader().await.map(|payload| self.put(key, payload)),
        };

        self.release(key, &key_lock);
        drop(guard);
        result
    }

    /// Drops the per-key lock from the map once no other request holds or
    /// waits on it. Waiters keep it alive, so newcomers queue behind them
    /// instead of creating a second lock.
    fn release(&self, key: &str, key_lock: &Arc<tokio::sync::Mutex<()>>) {
        let mut in_flight = lock(&self.in_flight);
        let unused = in_flight
            .get(key)
            .map(|current| Arc::ptr_eq(current, key_lock) && Arc::strong_count(key_lock) == 2)
            .unwrap_or(false);

        if unused {
            in_flight.remove(key);
        }
    }

    #[cfg(test)]
    fn in_flight_len(&self) -> usize {
        lock(&self.in_flight).len()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
