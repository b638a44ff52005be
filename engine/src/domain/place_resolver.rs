//! Place resolution: cache first, provider second.
//!
//! The resolver turns opaque place ids into validated [`PlaceRecord`]s. A
//! cache hit never touches the provider; a miss costs exactly one provider
//! round trip, after which the normalized record is cached for everyone
//! sharing the cache instance. Provider payload shapes stop here: nothing
//! downstream ever sees a [`SourcePlace`].

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::place::{PlaceId, PlaceRecord, PlaceValidationError, SourcePlace};
use crate::domain::place_cache::PlaceCache;
use crate::domain::ports::{DETAIL_FIELDS, PlaceSource, PlaceSourceError, PlaceStore, SEARCH_FIELDS};

/// Errors surfaced by place resolution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The provider does not know the requested id.
    #[error("place '{id}' was not found")]
    NotFound {
        /// The id that failed to resolve.
        id: String,
    },

    /// The provider answered without a usable coordinate pair. Incomplete
    /// payloads are never cached.
    #[error("place '{id}' payload lacked a usable {missing}")]
    Incomplete {
        /// The id that failed to resolve.
        id: String,
        /// The field that was absent or unusable.
        missing: &'static str,
    },

    /// The provider could not be reached.
    #[error("place resolution failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },
}

impl ResolveError {
    /// Helper for unknown ids.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Helper for unusable payloads.
    pub fn incomplete(id: impl Into<String>, missing: &'static str) -> Self {
        Self::Incomplete {
            id: id.into(),
            missing,
        }
    }

    /// Helper for transport failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

fn map_source_error(error: PlaceSourceError) -> ResolveError {
    match error {
        PlaceSourceError::NotFound { id } => ResolveError::NotFound { id },
        PlaceSourceError::Transport { message } => ResolveError::Transport { message },
    }
}

/// Resolves place ids through a shared cache and a places provider.
pub struct PlaceResolver<P, S> {
    source: Arc<P>,
    cache: Arc<PlaceCache<S>>,
}

impl<P, S> PlaceResolver<P, S> {
    /// Create a resolver over the provider and the shared cache.
    pub fn new(source: Arc<P>, cache: Arc<PlaceCache<S>>) -> Self {
        Self { source, cache }
    }
}

impl<P, S> PlaceResolver<P, S>
where
    P: PlaceSource,
    S: PlaceStore,
{
    /// Resolve a place id to a validated record.
    ///
    /// Cache hits return without provider traffic. A miss performs one
    /// provider round trip with the detail field set, validates that the
    /// payload carries finite coordinates, normalizes it, caches the
    /// record, and returns it. There are no retries; concurrent misses for
    /// the same id may each fetch, and the idempotent cache writes
    /// converge.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] for unknown ids,
    /// [`ResolveError::Incomplete`] for payloads without usable
    /// coordinates (never cached), and [`ResolveError::Transport`] when
    /// the provider cannot be reached.
    pub async fn resolve(&self, id: &PlaceId) -> Result<PlaceRecord, ResolveError> {
        if let Some(record) = self.cache.get(id) {
            debug!(place_id = %id, "place resolved from cache");
            return Ok(record);
        }

        let payload = self
            .source
            .fetch_details(id, DETAIL_FIELDS)
            .await
            .map_err(map_source_error)?;

        let record = normalize(id.clone(), payload)?;
        self.cache.put(&record);
        debug!(place_id = %id, "place resolved from provider");

        Ok(record)
    }

    /// Run a free-text search and return the usable candidates.
    ///
    /// Candidates are normalized with the same coordinate validation as
    /// [`PlaceResolver::resolve`]; unusable candidates are dropped with a
    /// warning rather than failing the search. Usable candidates are
    /// cached, so selecting one afterwards costs no further provider
    /// traffic. A blank query short-circuits to no candidates.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::Transport`] when the provider cannot be
    /// reached.
    pub async fn search(&self, query: &str) -> Result<Vec<PlaceRecord>, ResolveError> {
        if query.trim().is_empty() {
            debug!("blank place search skipped");
            return Ok(Vec::new());
        }

        let payloads = self
            .source
            .search(query, SEARCH_FIELDS)
            .await
            .map_err(map_source_error)?;

        let mut records = Vec::with_capacity(payloads.len());
        for payload in payloads {
            match normalize_candidate(payload) {
                Ok(record) => {
                    self.cache.put(&record);
                    records.push(record);
                }
                Err(err) => {
                    warn!(error = %err, "dropping unusable search candidate");
                }
            }
        }

        debug!(query, count = records.len(), "place search resolved");
        Ok(records)
    }
}

/// Promote a detail payload to a record keyed by the requested id.
fn normalize(id: PlaceId, payload: SourcePlace) -> Result<PlaceRecord, ResolveError> {
    let raw_id = id.to_string();
    let latitude = payload
        .latitude
        .ok_or_else(|| ResolveError::incomplete(&raw_id, "latitude"))?;
    let longitude = payload
        .longitude
        .ok_or_else(|| ResolveError::incomplete(&raw_id, "longitude"))?;

    let mut record = PlaceRecord::new(id, latitude, longitude).map_err(|err| match err {
        PlaceValidationError::NonFiniteCoordinate { axis } => {
            ResolveError::incomplete(&raw_id, axis)
        }
        PlaceValidationError::EmptyId | PlaceValidationError::UntrimmedId => {
            ResolveError::incomplete(&raw_id, "id")
        }
    })?;

    if let Some(display_name) = payload.display_name {
        record = record.with_display_name(display_name);
    }
    if let Some(formatted_address) = payload.formatted_address {
        record = record.with_formatted_address(formatted_address);
    }
    if let Some(rating) = payload.rating {
        record = record.with_rating(rating);
    }
    if let Some(count) = payload.user_rating_count {
        record = record.with_user_rating_count(count);
    }
    if let Some(photo_reference) = payload.photo_reference {
        record = record.with_photo_reference(photo_reference);
    }

    Ok(record)
}

/// Promote a search candidate, which must carry its own id.
fn normalize_candidate(mut payload: SourcePlace) -> Result<PlaceRecord, ResolveError> {
    let raw_id = payload
        .id
        .take()
        .ok_or_else(|| ResolveError::incomplete("<unidentified>", "id"))?;
    let id = PlaceId::new(raw_id.clone())
        .map_err(|_| ResolveError::incomplete(raw_id.clone(), "id"))?;

    normalize(id, payload)
}
