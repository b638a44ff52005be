//! Port for durable place storage beneath the cache.

use thiserror::Error;

use crate::domain::place::{CachedPlace, PlaceId};

/// Errors raised by durable place store adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceStoreError {
    /// The backing storage is unavailable or rejected the operation.
    #[error("place store backend failure: {message}")]
    Backend {
        /// Description of the backend failure.
        message: String,
    },

    /// A stored entry could not be encoded or decoded.
    #[error("place store serialisation failed: {message}")]
    Serialization {
        /// Description of the serialisation failure.
        message: String,
    },
}

impl PlaceStoreError {
    /// Helper for backend-level failures.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Helper for serialisation problems.
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }
}

/// Port for persisting resolved places across sessions.
///
/// The contract is synchronous: implementations are local and fast (files,
/// in-process maps, browser-style key/value storage), never a network hop.
/// The cache treats every call as best-effort and keeps serving from memory
/// when the store fails.
#[cfg_attr(test, mockall::automock)]
pub trait PlaceStore: Send + Sync {
    /// Load the entry stored under `id`, if any.
    fn load(&self, id: &PlaceId) -> Result<Option<CachedPlace>, PlaceStoreError>;

    /// Store `entry` under `id`, replacing any previous entry wholesale.
    fn save(&self, id: &PlaceId, entry: &CachedPlace) -> Result<(), PlaceStoreError>;

    /// Remove the entry stored under `id`. Absent entries are not an error.
    fn remove(&self, id: &PlaceId) -> Result<(), PlaceStoreError>;

    /// Load every stored entry, for cache warm-up.
    fn load_all(&self) -> Result<Vec<CachedPlace>, PlaceStoreError>;
}

/// Fixture store that persists nothing.
///
/// Backing a cache with this store yields a purely session-scoped cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePlaceStore;

impl PlaceStore for FixturePlaceStore {
    fn load(&self, _id: &PlaceId) -> Result<Option<CachedPlace>, PlaceStoreError> {
        Ok(None)
    }

    fn save(&self, _id: &PlaceId, _entry: &CachedPlace) -> Result<(), PlaceStoreError> {
        Ok(())
    }

    fn remove(&self, _id: &PlaceId) -> Result<(), PlaceStoreError> {
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<CachedPlace>, PlaceStoreError> {
        Ok(Vec::new())
    }
}
