//! Favorite places scoped to one trip.
//!
//! Favorites are bare place ids; rendering them goes through the batch
//! loader. Mutations write through the repository and then invalidate the
//! trip's favorite reads so cached queries catch up.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::place::PlaceId;
use crate::domain::ports::{
    FavoriteRepository, FavoriteRepositoryError, QueryCache, QueryKey,
};
use crate::domain::trip::TripId;

/// Errors raised by favorite reads and mutations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FavoritesError {
    /// The favorite repository rejected a read or mutation.
    #[error("favorite repository error: {0}")]
    Repository(#[from] FavoriteRepositoryError),
}

/// Favorite membership for one trip.
#[derive(Clone)]
pub struct FavoritesService<F, Q> {
    repo: Arc<F>,
    query_cache: Arc<Q>,
    trip: TripId,
}

impl<F, Q> FavoritesService<F, Q> {
    /// Create a favorites service scoped to the given trip.
    pub fn new(repo: Arc<F>, query_cache: Arc<Q>, trip: TripId) -> Self {
        Self {
            repo,
            query_cache,
            trip,
        }
    }
}

impl<F, Q> FavoritesService<F, Q>
where
    F: FavoriteRepository,
    Q: QueryCache,
{
    /// The trip's favorited place ids, ready for batch resolution.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::Repository`] when the read fails.
    pub async fn list(&self) -> Result<Vec<PlaceId>, FavoritesError> {
        Ok(self.repo.list_for_trip(&self.trip).await?)
    }

    /// Mark a place as a favorite. Adding an existing favorite is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::Repository`] when the write fails; the
    /// invalidation that follows a successful write is best-effort.
    pub async fn add(&self, place: &PlaceId) -> Result<(), FavoritesError> {
        self.repo.add(&self.trip, place).await?;
        self.invalidate_favorites().await;
        debug!(place_id = %place, trip_id = %self.trip, "favorite added");
        Ok(())
    }

    /// Remove a place from the favorites.
    ///
    /// # Errors
    ///
    /// Returns [`FavoritesError::Repository`] when the write fails.
    pub async fn remove(&self, place: &PlaceId) -> Result<(), FavoritesError> {
        self.repo.remove(&self.trip, place).await?;
        self.invalidate_favorites().await;
        debug!(place_id = %place, trip_id = %self.trip, "favorite removed");
        Ok(())
    }

    async fn invalidate_favorites(&self) {
        let key = QueryKey::favorites(&self.trip);
        if let Err(err) = self.query_cache.invalidate(&key).await {
            warn!(key = %key, error = %err, "favorite invalidation failed; readers may serve stale favorites");
        }
    }
}
