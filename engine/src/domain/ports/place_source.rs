//! Port for the external places provider.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::place::{PlaceId, SourcePlace};

/// Fields the engine asks the provider to return.
///
/// Provider-specific field names live in the adapter; the engine only names
/// fields in these neutral terms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceField {
    /// Human-readable name.
    DisplayName,
    /// Single-line postal address.
    FormattedAddress,
    /// Coordinates.
    Location,
    /// Average visitor rating.
    Rating,
    /// Number of ratings behind the average.
    UserRatingCount,
    /// Photo handles.
    Photos,
}

/// Field set requested when resolving a single place id.
pub const DETAIL_FIELDS: &[PlaceField] = &[
    PlaceField::DisplayName,
    PlaceField::FormattedAddress,
    PlaceField::Location,
    PlaceField::Rating,
    PlaceField::UserRatingCount,
];

/// Field set requested for free-text search, which additionally surfaces
/// photos for result previews.
pub const SEARCH_FIELDS: &[PlaceField] = &[
    PlaceField::DisplayName,
    PlaceField::FormattedAddress,
    PlaceField::Location,
    PlaceField::Rating,
    PlaceField::UserRatingCount,
    PlaceField::Photos,
];

/// Errors raised by places provider adapters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceSourceError {
    /// The provider does not know the requested id.
    #[error("place '{id}' was not found by the provider")]
    NotFound {
        /// The id the provider rejected.
        id: String,
    },

    /// The request could not be completed.
    #[error("places provider request failed: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },
}

impl PlaceSourceError {
    /// Helper for unknown-id responses.
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Helper for transport-level failures.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Port for fetching place payloads from the provider.
///
/// Implementations perform exactly one provider round trip per call and
/// return payloads as-is; completeness judgements belong to the resolver.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlaceSource: Send + Sync {
    /// Fetch the payload for a single place id with the given field set.
    async fn fetch_details(
        &self,
        id: &PlaceId,
        fields: &[PlaceField],
    ) -> Result<SourcePlace, PlaceSourceError>;

    /// Run a free-text search and return candidate payloads.
    async fn search(
        &self,
        query: &str,
        fields: &[PlaceField],
    ) -> Result<Vec<SourcePlace>, PlaceSourceError>;
}

/// Fixture implementation for tests that do not exercise resolution.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePlaceSource;

#[async_trait]
impl PlaceSource for FixturePlaceSource {
    async fn fetch_details(
        &self,
        id: &PlaceId,
        _fields: &[PlaceField],
    ) -> Result<SourcePlace, PlaceSourceError> {
        Err(PlaceSourceError::not_found(id.as_ref()))
    }

    async fn search(
        &self,
        _query: &str,
        _fields: &[PlaceField],
    ) -> Result<Vec<SourcePlace>, PlaceSourceError> {
        Ok(Vec::new())
    }
}
