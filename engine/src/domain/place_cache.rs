//! Two-layer place cache: an in-memory working set over a durable store.
//!
//! Every cache is an explicit instance; nothing here is global. The memory
//! layer answers repeat lookups within a session, the [`PlaceStore`] layer
//! carries resolutions across sessions. Store failures are logged and
//! absorbed so a broken durable layer degrades the cache to memory-only
//! instead of failing resolution.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::TimeDelta;
use mockable::Clock;
use tracing::{debug, warn};

use crate::domain::config::CachePolicy;
use crate::domain::place::{CachedPlace, PlaceId, PlaceRecord};
use crate::domain::ports::{PlaceStore, PlaceStoreError};

/// Explicit place cache instance.
///
/// Reads check memory first, then hydrate from the durable store. Writes
/// replace entries wholesale and write through. When [`CachePolicy`]
/// configures a TTL, an entry whose age has reached it is treated as a miss
/// and pruned from both layers on observation; when it configures
/// `max_entries`, the least recently used resident entry is evicted from
/// memory (the store keeps it for later rehydration).
pub struct PlaceCache<S> {
    store: Arc<S>,
    policy: CachePolicy,
    clock: Arc<dyn Clock>,
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    entries: HashMap<PlaceId, CachedPlace>,
    // Resident ids ordered least to most recently used.
    recency: Vec<PlaceId>,
}

impl<S> std::fmt::Debug for PlaceCache<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceCache")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<S: PlaceStore> PlaceCache<S> {
    /// Build a cache over the given store with an injected clock.
    pub fn new(store: Arc<S>, policy: CachePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policy,
            clock,
            inner: Mutex::new(CacheInner {
                entries: HashMap::new(),
                recency: Vec::new(),
            }),
        }
    }

    /// Build a cache that reads the system clock.
    pub fn with_system_clock(store: Arc<S>, policy: CachePolicy) -> Self {
        Self::new(store, policy, Arc::new(mockable::DefaultClock))
    }

    /// Look up a resolved place.
    ///
    /// Returns `None` on a genuine miss, an expired entry, or a durable
    /// store read failure (which is logged and treated as a miss).
    pub fn get(&self, id: &PlaceId) -> Option<PlaceRecord> {
        let now = self.clock.utc();
        let mut inner = self.lock_inner();

        let resident = inner
            .entries
            .get(id)
            .map(|entry| (entry.record.clone(), self.is_expired(entry, now)));
        if let Some((record, expired)) = resident {
            if expired {
                debug!(place_id = %id, "cached place expired; pruning");
                inner.drop_resident(id);
                self.remove_from_store(id);
                return None;
            }
            inner.touch(id);
            debug!(place_id = %id, "place cache memory hit");
            return Some(record);
        }

        match self.store.load(id) {
            Ok(Some(entry)) => {
                if self.is_expired(&entry, now) {
                    debug!(place_id = %id, "stored place expired; pruning");
                    self.remove_from_store(id);
                    return None;
                }
                debug!(place_id = %id, "place cache store hit");
                let record = entry.record.clone();
                self.insert_resident(&mut inner, id.clone(), entry);
                Some(record)
            }
            Ok(None) => {
                debug!(place_id = %id, "place cache miss");
                None
            }
            Err(err) => {
                warn!(place_id = %id, error = %err, "place store read failed; treating as miss");
                None
            }
        }
    }

    /// Cache a resolved place, stamping the resolution instant.
    ///
    /// The entry replaces any previous one wholesale. A durable store write
    /// failure is logged and absorbed; the entry still serves from memory.
    pub fn put(&self, record: &PlaceRecord) {
        let entry = CachedPlace::new(record.clone(), self.clock.utc());
        let id = record.id().clone();

        if let Err(err) = self.store.save(&id, &entry) {
            warn!(place_id = %id, error = %err, "place store write failed; caching in memory only");
        }

        let mut inner = self.lock_inner();
        self.insert_resident(&mut inner, id, entry);
    }

    /// Drop a place from both layers.
    pub fn remove(&self, id: &PlaceId) {
        let mut inner = self.lock_inner();
        inner.drop_resident(id);
        drop(inner);
        self.remove_from_store(id);
    }

    /// Hydrate the memory layer from the durable store.
    ///
    /// Expired entries are skipped and pruned. Returns how many entries
    /// became resident.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceStoreError`] when the store cannot be enumerated.
    pub fn warm(&self) -> Result<usize, PlaceStoreError> {
        let now = self.clock.utc();
        let stored = self.store.load_all()?;
        let mut loaded = 0;

        let mut inner = self.lock_inner();
        for entry in stored {
            if self.is_expired(&entry, now) {
                self.remove_from_store(entry.record.id());
                continue;
            }
            let id = entry.record.id().clone();
            self.insert_resident(&mut inner, id, entry);
            loaded += 1;
        }

        debug!(count = loaded, "place cache warmed from store");
        Ok(loaded)
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.lock_inner().entries.len()
    }

    /// Whether the memory layer is empty.
    pub fn is_empty(&self) -> bool {
        self.lock_inner().entries.is_empty()
    }

    /// Whether a non-expired entry for `id` is resident in memory.
    ///
    /// Does not consult the store and does not count as a use for
    /// least-recently-used ordering.
    pub fn contains(&self, id: &PlaceId) -> bool {
        let now = self.clock.utc();
        self.lock_inner()
            .entries
            .get(id)
            .is_some_and(|entry| !self.is_expired(entry, now))
    }

    fn is_expired(&self, entry: &CachedPlace, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.policy.time_to_live().is_some_and(|ttl| {
            let lifetime = TimeDelta::from_std(ttl).unwrap_or(TimeDelta::max_value());
            now.signed_duration_since(entry.resolved_at) >= lifetime
        })
    }

    fn insert_resident(&self, inner: &mut CacheInner, id: PlaceId, entry: CachedPlace) {
        inner.entries.insert(id.clone(), entry);
        inner.touch(&id);

        if let Some(max_entries) = self.policy.max_entries() {
            while inner.entries.len() > max_entries.get() {
                let Some(evicted) = inner.evict_least_recent() else {
                    break;
                };
                debug!(place_id = %evicted, "evicted least recently used place from memory");
            }
        }
    }

    fn remove_from_store(&self, id: &PlaceId) {
        if let Err(err) = self.store.remove(id) {
            warn!(place_id = %id, error = %err, "place store removal failed");
        }
    }

    fn lock_inner(&self) -> MutexGuard<'_, CacheInner> {
        // The cache stays coherent across a panicking writer; recover the
        // guard rather than poisoning every later call.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl CacheInner {
    /// Mark `id` as most recently used.
    fn touch(&mut self, id: &PlaceId) {
        self.recency.retain(|resident| resident != id);
        self.recency.push(id.clone());
    }

    fn drop_resident(&mut self, id: &PlaceId) {
        self.entries.remove(id);
        self.recency.retain(|resident| resident != id);
    }

    fn evict_least_recent(&mut self) -> Option<PlaceId> {
        if self.recency.is_empty() {
            return None;
        }
        let evicted = self.recency.remove(0);
        self.entries.remove(&evicted);
        Some(evicted)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use std::num::NonZeroUsize;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use chrono::{DateTime, Local, TimeZone, Utc};
    use rstest::{fixture, rstest};

    use super::*;
    use crate::domain::ports::MockPlaceStore;

    fn fixture_timestamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 5, 10, 0, 0)
            .single()
            .expect("valid fixture timestamp")
    }

    /// Test clock that can be advanced between cache calls.
    struct SteppingClock {
        now: StdMutex<DateTime<Utc>>,
    }

    impl SteppingClock {
        fn starting_at(now: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self {
                now: StdMutex::new(now),
            })
        }

        fn advance(&self, delta: TimeDelta) {
            let mut now = self.now.lock().expect("clock lock");
            *now = *now + delta;
        }
    }

    impl Clock for SteppingClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            *self.now.lock().expect("clock lock")
        }
    }

    fn place(id: &str) -> PlaceRecord {
        PlaceRecord::new(PlaceId::new(id).expect("valid place id"), 40.7, -74.0)
            .expect("finite coordinates")
    }

    fn place_id(id: &str) -> PlaceId {
        PlaceId::new(id).expect("valid place id")
    }

    #[fixture]
    fn quiet_store() -> MockPlaceStore {
        let mut store = MockPlaceStore::new();
        store.expect_save().returning(|_, _| Ok(()));
        store.expect_remove().returning(|_| Ok(()));
        store
    }

    #[rstest]
    fn put_then_get_serves_from_memory(mut quiet_store: MockPlaceStore) {
        // A resident entry must not touch the store on read.
        quiet_store.expect_load().times(0);
        let cache = PlaceCache::new(
            Arc::new(quiet_store),
            CachePolicy::default(),
            SteppingClock::starting_at(fixture_timestamp()),
        );

        cache.put(&place("p1"));
        let found = cache.get(&place_id("p1"));

        assert_eq!(found, Some(place("p1")));
        assert_eq!(cache.len(), 1);
    }

    #[rstest]
    fn miss_hydrates_from_the_store_once() {
        let mut store = MockPlaceStore::new();
        store
            .expect_load()
            .times(1)
            .returning(|id| Ok(Some(CachedPlace::new(place(id.as_ref()), fixture_timestamp()))));
        let cache = PlaceCache::new(
            Arc::new(store),
            CachePolicy::default(),
            SteppingClock::starting_at(fixture_timestamp()),
        );

        let first = cache.get(&place_id("p1"));
        let second = cache.get(&place_id("p1"));

        assert_eq!(first, Some(place("p1")));
        assert_eq!(second, Some(place("p1")));
    }

    #[rstest]
    fn expired_entries_read_as_misses_and_are_pruned(quiet_store: MockPlaceStore) {
        let clock = SteppingClock::starting_at(fixture_timestamp());
        let policy = CachePolicy::default().with_time_to_live(Duration::from_secs(1800));
        let cache = PlaceCache::new(Arc::new(quiet_store), policy, clock.clone());

        cache.put(&place("p1"));
        clock.advance(TimeDelta::try_minutes(30).expect("valid delta"));

        assert_eq!(cache.get(&place_id("p1")), None);
        assert!(cache.is_empty());
    }

    #[rstest]
    fn entries_younger_than_the_ttl_still_serve(quiet_store: MockPlaceStore) {
        let clock = SteppingClock::starting_at(fixture_timestamp());
        let policy = CachePolicy::default().with_time_to_live(Duration::from_secs(1800));
        let cache = PlaceCache::new(Arc::new(quiet_store), policy, clock.clone());

        cache.put(&place("p1"));
        clock.advance(TimeDelta::try_minutes(29).expect("valid delta"));

        assert_eq!(cache.get(&place_id("p1")), Some(place("p1")));
    }

    #[rstest]
    fn capacity_evicts_the_least_recently_used_entry(quiet_store: MockPlaceStore) {
        let policy = CachePolicy::default()
            .with_max_entries(NonZeroUsize::new(2).expect("non-zero"));
        let cache = PlaceCache::new(
            Arc::new(quiet_store),
            policy,
            SteppingClock::starting_at(fixture_timestamp()),
        );

        cache.put(&place("a"));
        cache.put(&place("b"));
        // Reading `a` makes `b` the eviction candidate.
        let _ = cache.get(&place_id("a"));
        cache.put(&place("c"));

        assert_eq!(cache.len(), 2);
        assert!(cache.contains(&place_id("a")));
        assert!(cache.contains(&place_id("c")));
        assert!(!cache.contains(&place_id("b")));
    }

    #[rstest]
    fn store_write_failure_degrades_to_memory_only() {
        let mut store = MockPlaceStore::new();
        store
            .expect_save()
            .times(1)
            .returning(|_, _| Err(PlaceStoreError::backend("disk full")));
        store.expect_load().times(0);
        let cache = PlaceCache::new(
            Arc::new(store),
            CachePolicy::default(),
            SteppingClock::starting_at(fixture_timestamp()),
        );

        cache.put(&place("p1"));

        assert_eq!(cache.get(&place_id("p1")), Some(place("p1")));
    }

    #[rstest]
    fn store_read_failure_reads_as_a_miss() {
        let mut store = MockPlaceStore::new();
        store
            .expect_load()
            .returning(|_| Err(PlaceStoreError::backend("corrupt index")));
        let cache = PlaceCache::new(
            Arc::new(store),
            CachePolicy::default(),
            SteppingClock::starting_at(fixture_timestamp()),
        );

        assert_eq!(cache.get(&place_id("p1")), None);
    }

    #[rstest]
    fn remove_clears_both_layers() {
        let mut store = MockPlaceStore::new();
        store.expect_save().returning(|_, _| Ok(()));
        store.expect_remove().times(1).returning(|_| Ok(()));
        store.expect_load().returning(|_| Ok(None));
        let cache = PlaceCache::new(
            Arc::new(store),
            CachePolicy::default(),
            SteppingClock::starting_at(fixture_timestamp()),
        );

        cache.put(&place("p1"));
        cache.remove(&place_id("p1"));

        assert_eq!(cache.get(&place_id("p1")), None);
    }

    #[rstest]
    fn warm_skips_expired_entries() {
        let mut store = MockPlaceStore::new();
        let fresh = CachedPlace::new(place("fresh"), fixture_timestamp());
        let stale = CachedPlace::new(
            place("stale"),
            fixture_timestamp() - TimeDelta::try_hours(2).expect("valid delta"),
        );
        store
            .expect_load_all()
            .times(1)
            .return_once(move || Ok(vec![fresh, stale]));
        store.expect_remove().times(1).returning(|_| Ok(()));
        let policy = CachePolicy::default().with_time_to_live(Duration::from_secs(3600));
        let cache = PlaceCache::new(
            Arc::new(store),
            policy,
            SteppingClock::starting_at(fixture_timestamp()),
        );

        let loaded = cache.warm().expect("warm succeeds");

        assert_eq!(loaded, 1);
        assert!(cache.contains(&place_id("fresh")));
        assert!(!cache.contains(&place_id("stale")));
    }
}
