//! Generated place and trip types.
//!
//! This module defines the output types from place and trip generation. These
//! types are independent of engine domain types to avoid circular
//! dependencies.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A generated example place record.
///
/// This type carries the fields the engine needs to build a cached place
/// record. It is designed to be converted into engine domain types at the
/// point of use.
///
/// # Example
///
/// ```
/// use example_data::ExamplePlace;
///
/// let place = ExamplePlace {
///     id: "central-park".to_owned(),
///     display_name: "Central Park".to_owned(),
///     formatted_address: "New York, NY 10024".to_owned(),
///     latitude: 40.785091,
///     longitude: -73.968285,
///     photo_reference: None,
/// };
///
/// assert_eq!(place.display_name, "Central Park");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamplePlace {
    /// Opaque place identifier.
    pub id: String,
    /// Human-readable place name.
    pub display_name: String,
    /// Formatted street address.
    pub formatted_address: String,
    /// Latitude in decimal degrees.
    pub latitude: f64,
    /// Longitude in decimal degrees.
    pub longitude: f64,
    /// Provider photo reference, when the place carries one.
    pub photo_reference: Option<String>,
}

/// A generated stop scheduled on the demo trip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleStop {
    /// Unique identifier for the stop.
    pub id: Uuid,
    /// Identifier of the linked place, when the stop is anchored to one.
    pub place_id: Option<String>,
    /// Stop title shown on the calendar.
    pub title: String,
    /// Calendar day the stop occupies.
    pub date: NaiveDate,
    /// Start of the occupied slot.
    pub start: NaiveTime,
    /// End of the occupied slot.
    pub end: NaiveTime,
}

/// A generated demo trip with favourites and pre-scheduled stops.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExampleTrip {
    /// Trip identifier.
    pub id: String,
    /// Trip name.
    pub name: String,
    /// First day of the trip.
    pub start: NaiveDate,
    /// Last day of the trip (inclusive).
    pub end: NaiveDate,
    /// Identifiers of the places saved as favourites.
    pub favorite_place_ids: Vec<String>,
    /// Stops already scheduled within the trip range.
    pub stops: Vec<ExampleStop>,
}
