//! Place data model.
//!
//! A place travels through three shapes: [`SourcePlace`] is the all-optional
//! payload a provider adapter hands back, [`PlaceRecord`] is the validated
//! form the rest of the engine consumes (coordinates present and finite, by
//! construction), and [`CachedPlace`] is the record plus resolution
//! provenance as the cache and durable store hold it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors raised when constructing place identifiers and records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaceValidationError {
    /// The provider identifier was empty.
    #[error("place id must not be empty")]
    EmptyId,

    /// The provider identifier carried surrounding whitespace.
    #[error("place id must not have surrounding whitespace")]
    UntrimmedId,

    /// A coordinate was not a finite number.
    #[error("place {axis} must be a finite number")]
    NonFiniteCoordinate {
        /// Which coordinate failed, `"latitude"` or `"longitude"`.
        axis: &'static str,
    },
}

/// Opaque provider identifier for a place.
///
/// The engine never interprets the contents; it only requires the id to be
/// non-empty and free of surrounding whitespace so it can serve as a cache
/// and URL key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlaceId(String);

impl PlaceId {
    /// Validate and construct a [`PlaceId`].
    ///
    /// # Errors
    ///
    /// Returns [`PlaceValidationError`] when the id is empty or carries
    /// surrounding whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, PlaceValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(PlaceValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(PlaceValidationError::UntrimmedId);
        }

        Ok(Self(id))
    }
}

impl AsRef<str> for PlaceId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<PlaceId> for String {
    fn from(value: PlaceId) -> Self {
        value.0
    }
}

impl TryFrom<String> for PlaceId {
    type Error = PlaceValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Provider-shaped place payload.
///
/// Every descriptive field is optional: adapters map whatever the provider
/// returned without judging completeness. The resolver decides whether the
/// payload is usable when it promotes it to a [`PlaceRecord`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourcePlace {
    /// Provider identifier, when the payload carried one.
    pub id: Option<String>,
    /// Human-readable name.
    pub display_name: Option<String>,
    /// Single-line postal address.
    pub formatted_address: Option<String>,
    /// Latitude in decimal degrees.
    pub latitude: Option<f64>,
    /// Longitude in decimal degrees.
    pub longitude: Option<f64>,
    /// Average visitor rating.
    pub rating: Option<f64>,
    /// Number of ratings behind the average.
    pub user_rating_count: Option<u32>,
    /// Opaque provider photo handle.
    pub photo_reference: Option<String>,
}

/// A resolved place.
///
/// ## Invariants
/// - `latitude` and `longitude` are finite; the constructor rejects NaN and
///   infinities, so a record that exists can always be placed on a map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlaceRecordDto", into = "PlaceRecordDto")]
pub struct PlaceRecord {
    id: PlaceId,
    latitude: f64,
    longitude: f64,
    display_name: Option<String>,
    formatted_address: Option<String>,
    rating: Option<f64>,
    user_rating_count: Option<u32>,
    photo_reference: Option<String>,
}

impl PlaceRecord {
    /// Construct a record from its required parts.
    ///
    /// # Errors
    ///
    /// Returns [`PlaceValidationError::NonFiniteCoordinate`] when either
    /// coordinate is NaN or infinite.
    pub fn new(id: PlaceId, latitude: f64, longitude: f64) -> Result<Self, PlaceValidationError> {
        if !latitude.is_finite() {
            return Err(PlaceValidationError::NonFiniteCoordinate { axis: "latitude" });
        }
        if !longitude.is_finite() {
            return Err(PlaceValidationError::NonFiniteCoordinate { axis: "longitude" });
        }

        Ok(Self {
            id,
            latitude,
            longitude,
            display_name: None,
            formatted_address: None,
            rating: None,
            user_rating_count: None,
            photo_reference: None,
        })
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    /// Attach a formatted address.
    #[must_use]
    pub fn with_formatted_address(mut self, formatted_address: impl Into<String>) -> Self {
        self.formatted_address = Some(formatted_address.into());
        self
    }

    /// Attach a visitor rating.
    #[must_use]
    pub const fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    /// Attach the rating sample size.
    #[must_use]
    pub const fn with_user_rating_count(mut self, count: u32) -> Self {
        self.user_rating_count = Some(count);
        self
    }

    /// Attach a provider photo handle.
    #[must_use]
    pub fn with_photo_reference(mut self, photo_reference: impl Into<String>) -> Self {
        self.photo_reference = Some(photo_reference.into());
        self
    }

    /// Provider identifier.
    pub const fn id(&self) -> &PlaceId {
        &self.id
    }

    /// Latitude in decimal degrees. Always finite.
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees. Always finite.
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Human-readable name, when the provider supplied one.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Single-line postal address, when the provider supplied one.
    pub fn formatted_address(&self) -> Option<&str> {
        self.formatted_address.as_deref()
    }

    /// Average visitor rating, when the provider supplied one.
    pub const fn rating(&self) -> Option<f64> {
        self.rating
    }

    /// Number of ratings behind the average, when supplied.
    pub const fn user_rating_count(&self) -> Option<u32> {
        self.user_rating_count
    }

    /// Opaque provider photo handle, when supplied.
    pub fn photo_reference(&self) -> Option<&str> {
        self.photo_reference.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaceRecordDto {
    id: String,
    latitude: f64,
    longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    formatted_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    user_rating_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    photo_reference: Option<String>,
}

impl From<PlaceRecord> for PlaceRecordDto {
    fn from(value: PlaceRecord) -> Self {
        let PlaceRecord {
            id,
            latitude,
            longitude,
            display_name,
            formatted_address,
            rating,
            user_rating_count,
            photo_reference,
        } = value;
        Self {
            id: id.into(),
            latitude,
            longitude,
            display_name,
            formatted_address,
            rating,
            user_rating_count,
            photo_reference,
        }
    }
}

impl TryFrom<PlaceRecordDto> for PlaceRecord {
    type Error = PlaceValidationError;

    fn try_from(value: PlaceRecordDto) -> Result<Self, Self::Error> {
        let record = PlaceRecord::new(PlaceId::new(value.id)?, value.latitude, value.longitude)?;

        Ok(Self {
            display_name: value.display_name,
            formatted_address: value.formatted_address,
            rating: value.rating,
            user_rating_count: value.user_rating_count,
            photo_reference: value.photo_reference,
            ..record
        })
    }
}

/// A resolved place together with its resolution provenance.
///
/// This is the envelope the cache holds and the durable store persists.
/// Entries are replaced wholesale on refresh, never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedPlace {
    /// The resolved record.
    pub record: PlaceRecord,
    /// When the resolution that produced the record completed.
    pub resolved_at: DateTime<Utc>,
}

impl CachedPlace {
    /// Wrap a record with its resolution instant.
    pub const fn new(record: PlaceRecord, resolved_at: DateTime<Utc>) -> Self {
        Self {
            record,
            resolved_at,
        }
    }
}
