//! Port for persisting scheduled stops.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::stop::{StopId, StopRecord};
use crate::domain::trip::TripId;

/// Errors raised by stop repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StopRepositoryError {
    /// Repository connection could not be established.
    #[error("stop repository connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// Query or mutation failed during execution.
    #[error("stop repository query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
}

impl StopRepositoryError {
    /// Helper for connection related adapter errors.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Port for reading and writing a trip's scheduled stops.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StopRepository: Send + Sync {
    /// Read every stop scheduled on the trip.
    async fn list_for_trip(&self, trip: &TripId) -> Result<Vec<StopRecord>, StopRepositoryError>;

    /// Insert or replace a stop. Writing an id that already exists
    /// overwrites the previous stop rather than duplicating it.
    async fn upsert(&self, trip: &TripId, stop: &StopRecord) -> Result<(), StopRepositoryError>;

    /// Delete a stop by id.
    async fn delete(&self, trip: &TripId, stop: &StopId) -> Result<(), StopRepositoryError>;
}

/// Fixture implementation for tests that do not exercise stop persistence.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStopRepository;

#[async_trait]
impl StopRepository for FixtureStopRepository {
    async fn list_for_trip(&self, _trip: &TripId) -> Result<Vec<StopRecord>, StopRepositoryError> {
        Ok(Vec::new())
    }

    async fn upsert(&self, _trip: &TripId, _stop: &StopRecord) -> Result<(), StopRepositoryError> {
        Ok(())
    }

    async fn delete(&self, _trip: &TripId, _stop: &StopId) -> Result<(), StopRepositoryError> {
        Ok(())
    }
}
