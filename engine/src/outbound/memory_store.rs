//! Session-scoped place store with no durability.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::domain::place::{CachedPlace, PlaceId};
use crate::domain::ports::{PlaceStore, PlaceStoreError};

/// Place store keeping entries in process memory.
///
/// Useful for hosts without durable storage and for preloading fixture
/// data; entries vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryPlaceStore {
    entries: Mutex<HashMap<PlaceId, CachedPlace>>,
}

impl MemoryPlaceStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store preloaded with entries.
    #[must_use]
    pub fn preloaded(entries: impl IntoIterator<Item = CachedPlace>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.record.id().clone(), entry))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock_entries(&self) -> MutexGuard<'_, HashMap<PlaceId, CachedPlace>> {
        // A panicking writer leaves the map usable; recover the guard
        // rather than poisoning every later call.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PlaceStore for MemoryPlaceStore {
    fn load(&self, id: &PlaceId) -> Result<Option<CachedPlace>, PlaceStoreError> {
        Ok(self.lock_entries().get(id).cloned())
    }

    fn save(&self, id: &PlaceId, entry: &CachedPlace) -> Result<(), PlaceStoreError> {
        self.lock_entries().insert(id.clone(), entry.clone());
        Ok(())
    }

    fn remove(&self, id: &PlaceId) -> Result<(), PlaceStoreError> {
        self.lock_entries().remove(id);
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<CachedPlace>, PlaceStoreError> {
        Ok(self.lock_entries().values().cloned().collect())
    }
}
