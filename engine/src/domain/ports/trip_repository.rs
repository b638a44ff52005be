//! Port for reading trips from the record store.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::trip::{TripId, TripRecord};

/// Errors raised by trip repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripRepositoryError {
    /// Repository connection could not be established.
    #[error("trip repository connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// Query failed during execution.
    #[error("trip repository query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
}

impl TripRepositoryError {
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

/// Port for reading trip records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TripRepository: Send + Sync {
    /// Find a trip by id.
    async fn find_by_id(&self, trip: &TripId) -> Result<Option<TripRecord>, TripRepositoryError>;
}

/// Fixture implementation for tests that do not exercise trip reads.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureTripRepository;

#[async_trait]
impl TripRepository for FixtureTripRepository {
    async fn find_by_id(&self, _trip: &TripId) -> Result<Option<TripRecord>, TripRepositoryError> {
        Ok(None)
    }
}
