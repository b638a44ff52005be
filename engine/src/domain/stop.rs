//! Scheduled stop data model.
//!
//! A stop is one dated, timed visit on the trip calendar. [`StopRecord`] is
//! the persisted form with the end-after-start invariant baked in;
//! [`EventDraft`] is the scheduler's transient editing buffer, which only
//! re-checks that invariant when it is promoted back to a record.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::place::PlaceId;
use crate::domain::slot_time::SlotTime;

/// Validation errors raised when constructing stop identifiers and records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StopValidationError {
    /// The stop identifier was empty.
    #[error("stop id must not be empty")]
    EmptyId,

    /// The stop identifier carried surrounding whitespace.
    #[error("stop id must not have surrounding whitespace")]
    UntrimmedId,

    /// The stop would not end strictly after it starts.
    #[error("stop must end strictly after it starts (start {start}, end {end})")]
    EndNotAfterStart {
        /// Scheduled start.
        start: SlotTime,
        /// Rejected end.
        end: SlotTime,
    },

    /// The attached place identifier failed validation.
    #[error("stop place id is invalid: {message}")]
    InvalidPlaceId {
        /// Why the place id was rejected.
        message: String,
    },
}

/// Identifier for a scheduled stop.
///
/// Persisted stops carry store-assigned ids; fresh drafts mint a random one
/// so the calendar widget can track the entry before it is saved.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Validate and construct a [`StopId`].
    ///
    /// # Errors
    ///
    /// Returns [`StopValidationError`] when the id is empty or carries
    /// surrounding whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, StopValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(StopValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(StopValidationError::UntrimmedId);
        }

        Ok(Self(id))
    }

    /// Mint a fresh random identifier for a new draft.
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl AsRef<str> for StopId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<StopId> for String {
    fn from(value: StopId) -> Self {
        value.0
    }
}

impl TryFrom<String> for StopId {
    type Error = StopValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// A scheduled visit as the record store holds it.
///
/// ## Invariants
/// - `end` is strictly after `start`; zero-length and inverted stops cannot
///   be constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StopRecordDto", into = "StopRecordDto")]
pub struct StopRecord {
    id: StopId,
    place: Option<PlaceId>,
    title: String,
    start: SlotTime,
    end: SlotTime,
}

impl StopRecord {
    /// Construct a stop, enforcing the end-after-start invariant.
    ///
    /// # Errors
    ///
    /// Returns [`StopValidationError::EndNotAfterStart`] when `end` is not
    /// strictly after `start`.
    pub fn new(
        id: StopId,
        place: Option<PlaceId>,
        title: impl Into<String>,
        start: SlotTime,
        end: SlotTime,
    ) -> Result<Self, StopValidationError> {
        if end <= start {
            return Err(StopValidationError::EndNotAfterStart { start, end });
        }

        Ok(Self {
            id,
            place,
            title: title.into(),
            start,
            end,
        })
    }

    /// Stop identifier.
    pub const fn id(&self) -> &StopId {
        &self.id
    }

    /// Place this stop visits, when one has been attached.
    pub const fn place(&self) -> Option<&PlaceId> {
        self.place.as_ref()
    }

    /// Title shown on the calendar.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Scheduled start.
    pub const fn start(&self) -> SlotTime {
        self.start
    }

    /// Scheduled end. Strictly after [`StopRecord::start`].
    pub const fn end(&self) -> SlotTime {
        self.end
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StopRecordDto {
    id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    place: Option<String>,
    title: String,
    start: SlotTime,
    end: SlotTime,
}

impl From<StopRecord> for StopRecordDto {
    fn from(value: StopRecord) -> Self {
        let StopRecord {
            id,
            place,
            title,
            start,
            end,
        } = value;
        Self {
            id: id.into(),
            place: place.map(String::from),
            title,
            start,
            end,
        }
    }
}

impl TryFrom<StopRecordDto> for StopRecord {
    type Error = StopValidationError;

    fn try_from(value: StopRecordDto) -> Result<Self, Self::Error> {
        let place = value
            .place
            .map(PlaceId::new)
            .transpose()
            .map_err(|err| StopValidationError::InvalidPlaceId {
                message: err.to_string(),
            })?;

        Self::new(
            StopId::new(value.id)?,
            place,
            value.title,
            value.start,
            value.end,
        )
    }
}

/// The scheduler's transient editing buffer.
///
/// Field edits land here without re-validation so the popup can hold
/// intermediate states; [`EventDraft::to_record`] re-checks the record
/// invariants on promotion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub(crate) id: StopId,
    pub(crate) place: Option<PlaceId>,
    pub(crate) title: String,
    pub(crate) start: SlotTime,
    pub(crate) end: SlotTime,
}

impl EventDraft {
    /// Draft identifier. Stable across edits.
    pub const fn id(&self) -> &StopId {
        &self.id
    }

    /// Place attached to the draft, if any.
    pub const fn place(&self) -> Option<&PlaceId> {
        self.place.as_ref()
    }

    /// Working title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Working start.
    pub const fn start(&self) -> SlotTime {
        self.start
    }

    /// Working end.
    pub const fn end(&self) -> SlotTime {
        self.end
    }

    /// Promote the draft to a persistable record.
    ///
    /// # Errors
    ///
    /// Returns [`StopValidationError::EndNotAfterStart`] when the edits left
    /// the end at or before the start.
    pub fn to_record(&self) -> Result<StopRecord, StopValidationError> {
        StopRecord::new(
            self.id.clone(),
            self.place.clone(),
            self.title.clone(),
            self.start,
            self.end,
        )
    }
}

impl From<StopRecord> for EventDraft {
    fn from(value: StopRecord) -> Self {
        let StopRecord {
            id,
            place,
            title,
            start,
            end,
        } = value;
        Self {
            id,
            place,
            title,
            start,
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn slot(value: &str) -> SlotTime {
        SlotTime::parse(value).expect("valid slot time")
    }

    fn stop_id(raw: &str) -> StopId {
        StopId::new(raw).expect("valid stop id")
    }

    #[rstest]
    #[case::inverted("2025-01-05 10:00", "2025-01-05 09:00")]
    #[case::zero_length("2025-01-05 10:00", "2025-01-05 10:00")]
    fn record_rejects_non_positive_spans(#[case] start: &str, #[case] end: &str) {
        let result = StopRecord::new(stop_id("s1"), None, "Lunch", slot(start), slot(end));
        assert!(matches!(
            result,
            Err(StopValidationError::EndNotAfterStart { .. })
        ));
    }

    #[test]
    fn record_accepts_a_positive_span() {
        let record = StopRecord::new(
            stop_id("s1"),
            None,
            "Lunch",
            slot("2025-01-05 12:00"),
            slot("2025-01-05 13:00"),
        )
        .expect("valid stop");

        assert_eq!(record.title(), "Lunch");
        assert!(record.end() > record.start());
    }

    #[test]
    fn random_ids_are_distinct() {
        assert_ne!(StopId::random(), StopId::random());
    }

    #[test]
    fn draft_round_trips_through_a_record() {
        let record = StopRecord::new(
            stop_id("s1"),
            Some(PlaceId::new("p1").expect("valid place id")),
            "Museum",
            slot("2025-01-05 10:00"),
            slot("2025-01-05 11:30"),
        )
        .expect("valid stop");

        let draft = EventDraft::from(record.clone());
        assert_eq!(draft.to_record().expect("still valid"), record);
    }

    #[test]
    fn draft_promotion_rechecks_the_span() {
        let record = StopRecord::new(
            stop_id("s1"),
            None,
            "Museum",
            slot("2025-01-05 10:00"),
            slot("2025-01-05 11:30"),
        )
        .expect("valid stop");

        let mut draft = EventDraft::from(record);
        draft.end = draft.start;
        assert!(matches!(
            draft.to_record(),
            Err(StopValidationError::EndNotAfterStart { .. })
        ));
    }

    #[test]
    fn record_deserialization_truncates_store_seconds() {
        let json = r#"{
            "id": "s1",
            "title": "Lunch",
            "start": "2025-01-05 12:00:00",
            "end": "2025-01-05 13:00:00"
        }"#;
        let record: StopRecord = serde_json::from_str(json).expect("deserializes");

        assert_eq!(record.start().to_string(), "2025-01-05 12:00");
        assert_eq!(record.end().to_string(), "2025-01-05 13:00");
    }
}
