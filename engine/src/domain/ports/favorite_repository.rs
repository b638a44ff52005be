//! Port for persisting a trip's favorited places.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::place::PlaceId;
use crate::domain::trip::TripId;

/// Errors raised by favorite repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FavoriteRepositoryError {
    /// Repository connection could not be established.
    #[error("favorite repository connection failed: {message}")]
    Connection {
        /// Description of the connection failure.
        message: String,
    },

    /// Query or mutation failed during execution.
    #[error("favorite repository query failed: {message}")]
    Query {
        /// Description of the query failure.
        message: String,
    },
}

impl FavoriteRepositoryError {
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

/// Port for reading and writing the favorited places of a trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    /// Read the place ids favorited on the trip.
    async fn list_for_trip(&self, trip: &TripId) -> Result<Vec<PlaceId>, FavoriteRepositoryError>;

    /// Favorite a place. Adding an existing favorite is a no-op for the
    /// adapter, not an error.
    async fn add(&self, trip: &TripId, place: &PlaceId) -> Result<(), FavoriteRepositoryError>;

    /// Remove a favorited place.
    async fn remove(&self, trip: &TripId, place: &PlaceId) -> Result<(), FavoriteRepositoryError>;
}

/// Fixture implementation for tests that do not exercise favorites.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureFavoriteRepository;

#[async_trait]
impl FavoriteRepository for FixtureFavoriteRepository {
    async fn list_for_trip(&self, _trip: &TripId) -> Result<Vec<PlaceId>, FavoriteRepositoryError> {
        Ok(Vec::new())
    }

    async fn add(&self, _trip: &TripId, _place: &PlaceId) -> Result<(), FavoriteRepositoryError> {
        Ok(())
    }

    async fn remove(&self, _trip: &TripId, _place: &PlaceId) -> Result<(), FavoriteRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use rstest::rstest;

    use super::*;

    #[rstest]
    #[tokio::test]
    async fn fixture_list_returns_empty() {
        let repo = FixtureFavoriteRepository;
        let trip = TripId::new("t1").expect("valid trip id");

        let favorites = repo
            .list_for_trip(&trip)
            .await
            .expect("fixture list succeeds");
        assert!(favorites.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn fixture_mutations_succeed() {
        let repo = FixtureFavoriteRepository;
        let trip = TripId::new("t1").expect("valid trip id");
        let place = PlaceId::new("p1").expect("valid place id");

        repo.add(&trip, &place).await.expect("fixture add succeeds");
        repo.remove(&trip, &place)
            .await
            .expect("fixture remove succeeds");
    }

    #[rstest]
    fn connection_error_formats_message() {
        let err = FavoriteRepositoryError::connection("refused");
        assert!(err.to_string().contains("refused"));
    }
}
