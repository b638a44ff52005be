//! Port for invalidating the host's query-result cache.
//!
//! Hosts typically cache record-store reads (stops, favorites, trip
//! metadata) behind scoped keys. After a successful mutation the engine
//! signals which scope went stale; the host refetches on its own schedule.

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::trip::TripId;

/// Scoped key naming a cached read that a mutation made stale.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    /// The trip list.
    Trips,
    /// One trip's metadata.
    Trip(TripId),
    /// One trip's scheduled stops.
    Stops(TripId),
    /// One trip's favorited places.
    Favorites(TripId),
}

impl QueryKey {
    /// Key for a trip's scheduled stops.
    pub fn stops(trip: &TripId) -> Self {
        Self::Stops(trip.clone())
    }

    /// Key for a trip's favorited places.
    pub fn favorites(trip: &TripId) -> Self {
        Self::Favorites(trip.clone())
    }

    /// Key for one trip's metadata.
    pub fn trip(trip: &TripId) -> Self {
        Self::Trip(trip.clone())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Trips => f.write_str("trips"),
            Self::Trip(trip) => write!(f, "trips/{trip}"),
            Self::Stops(trip) => write!(f, "trips/{trip}/stops"),
            Self::Favorites(trip) => write!(f, "trips/{trip}/favorites"),
        }
    }
}

/// Errors raised by query cache adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryCacheError {
    /// The invalidation signal could not be delivered.
    #[error("query cache invalidation failed: {message}")]
    Dispatch {
        /// Description of the dispatch failure.
        message: String,
    },
}

impl QueryCacheError {
    /// Helper for dispatch failures.
    pub fn dispatch(message: impl Into<String>) -> Self {
        Self::Dispatch {
            message: message.into(),
        }
    }
}

/// Port for signalling staleness to the host's query-result cache.
///
/// Callers treat failures as advisory: the mutation that triggered the
/// invalidation has already succeeded, so a failed signal degrades read
/// freshness without being propagated.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QueryCache: Send + Sync {
    /// Mark the reads behind `key` as stale.
    async fn invalidate(&self, key: &QueryKey) -> Result<(), QueryCacheError>;
}

/// Fixture implementation for hosts without a query-result cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureQueryCache;

#[async_trait]
impl QueryCache for FixtureQueryCache {
    async fn invalidate(&self, _key: &QueryKey) -> Result<(), QueryCacheError> {
        Ok(())
    }
}
