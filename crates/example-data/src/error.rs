//! Error types for the example-data crate.
//!
//! This module defines semantic error enums for registry parsing and place
//! generation, following the project's error handling conventions with
//! `thiserror`.

use thiserror::Error;

/// Errors that can occur when parsing or querying a landmark registry.
///
/// These errors cover JSON parsing, schema validation, and seed lookup
/// failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The registry JSON is malformed or missing required fields.
    #[error("invalid registry JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The registry version is not supported.
    #[error("unsupported registry version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the registry.
        actual: u32,
    },

    /// A landmark has a blank identifier.
    #[error("landmark at index {index} has a blank id")]
    BlankLandmarkId {
        /// Index of the landmark in the array.
        index: usize,
    },

    /// Two landmarks share the same identifier.
    #[error("duplicate landmark id '{id}'")]
    DuplicateLandmarkId {
        /// The identifier that appears more than once.
        id: String,
    },

    /// A landmark's coordinates fall outside the valid degree ranges.
    #[error("landmark '{id}' has coordinates outside the valid degree ranges")]
    InvalidCoordinates {
        /// Identifier of the landmark with invalid coordinates.
        id: String,
    },

    /// The registry contains no landmarks.
    #[error("registry contains no landmarks")]
    EmptyLandmarks,

    /// The registry contains no seed definitions.
    #[error("registry contains no seed definitions")]
    EmptySeeds,

    /// The requested seed name was not found in the registry.
    #[error("seed '{name}' not found in registry")]
    SeedNotFound {
        /// The seed name that was not found.
        name: String,
    },
}

/// Errors that can occur during place or trip generation.
///
/// These errors indicate failures in the generation process itself, such as
/// missing registry data or generated values that fall outside the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The registry contains no landmarks to anchor generated places.
    #[error("registry contains no landmarks for anchor selection")]
    NoLandmarks,

    /// Generated trip dates could not be placed on the calendar.
    #[error("generated trip dates fall outside the supported calendar range")]
    TripDatesOutOfRange,

    /// A generated stop time was not a valid time of day.
    #[error("generated stop time {hour:02}:{minute:02} is not a valid clock time")]
    StopTimeOutOfRange {
        /// Hour component of the invalid time.
        hour: u32,
        /// Minute component of the invalid time.
        minute: u32,
    },
}
