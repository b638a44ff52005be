//! Trip data model.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validation errors raised when constructing trip identifiers and ranges.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TripValidationError {
    /// The trip identifier was empty.
    #[error("trip id must not be empty")]
    EmptyId,

    /// The trip identifier carried surrounding whitespace.
    #[error("trip id must not have surrounding whitespace")]
    UntrimmedId,

    /// The range ended before it started.
    #[error("trip range must not end ({end}) before it starts ({start})")]
    EndBeforeStart {
        /// First day of the trip.
        start: NaiveDate,
        /// Last day of the trip.
        end: NaiveDate,
    },
}

/// Opaque identifier for a trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TripId(String);

impl TripId {
    /// Validate and construct a [`TripId`].
    ///
    /// # Errors
    ///
    /// Returns [`TripValidationError`] when the id is empty or carries
    /// surrounding whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, TripValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TripValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(TripValidationError::UntrimmedId);
        }

        Ok(Self(id))
    }
}

impl AsRef<str> for TripId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TripId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<TripId> for String {
    fn from(value: TripId) -> Self {
        value.0
    }
}

impl TryFrom<String> for TripId {
    type Error = TripValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Inclusive range of calendar days a trip spans.
///
/// ## Invariants
/// - `start <= end`; a one-day trip has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DateRangeDto", into = "DateRangeDto")]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Construct a range, rejecting an end that precedes the start.
    ///
    /// # Errors
    ///
    /// Returns [`TripValidationError::EndBeforeStart`] when `end < start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, TripValidationError> {
        if end < start {
            return Err(TripValidationError::EndBeforeStart { start, end });
        }

        Ok(Self { start, end })
    }

    /// First day of the trip.
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the trip.
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether the given day falls inside the trip.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DateRangeDto {
    start: NaiveDate,
    end: NaiveDate,
}

impl From<DateRange> for DateRangeDto {
    fn from(value: DateRange) -> Self {
        Self {
            start: value.start,
            end: value.end,
        }
    }
}

impl TryFrom<DateRangeDto> for DateRange {
    type Error = TripValidationError;

    fn try_from(value: DateRangeDto) -> Result<Self, Self::Error> {
        Self::new(value.start, value.end)
    }
}

/// A trip as the record store returns it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripRecord {
    id: TripId,
    name: String,
    range: DateRange,
}

impl TripRecord {
    /// Assemble a trip record from validated components.
    pub const fn new(id: TripId, name: String, range: DateRange) -> Self {
        Self { id, name, range }
    }

    /// Trip identifier.
    pub const fn id(&self) -> &TripId {
        &self.id
    }

    /// Human-readable trip name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Days the trip spans.
    pub const fn range(&self) -> &DateRange {
        &self.range
    }
}
