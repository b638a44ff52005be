//! Port for the sharable URL's engine-owned query parameters.
//!
//! Two independent parameters belong to the engine: the selected place id
//! and the selected calendar date. Writes go through the host's routing
//! layer, which cannot fail in-process, so the port is synchronous and
//! infallible.

use std::sync::Mutex;

use chrono::NaiveDate;

use crate::domain::place::PlaceId;

/// Port over the host's URL query parameters.
#[cfg_attr(test, mockall::automock)]
pub trait UrlState: Send + Sync {
    /// Write or clear the selected-place parameter.
    fn set_place_param<'a>(&self, place: Option<&'a PlaceId>);

    /// Write or clear the selected-date parameter.
    fn set_date_param(&self, date: Option<NaiveDate>);
}

/// Fixture implementation for hosts without URL synchronisation.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUrlState;

impl UrlState for FixtureUrlState {
    fn set_place_param(&self, _place: Option<&PlaceId>) {}

    fn set_date_param(&self, _date: Option<NaiveDate>) {}
}

/// Recording implementation that captures every write for assertions.
///
/// Used throughout the engine's own tests; hosts may also find it useful
/// when verifying their wiring.
#[derive(Debug, Default)]
pub struct RecordingUrlState {
    place_writes: Mutex<Vec<Option<PlaceId>>>,
    date_writes: Mutex<Vec<Option<NaiveDate>>>,
}

impl RecordingUrlState {
    /// Every selected-place write, oldest first.
    pub fn place_writes(&self) -> Vec<Option<PlaceId>> {
        self.place_writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    /// The most recent selected-place write, if any write happened.
    pub fn last_place_write(&self) -> Option<Option<PlaceId>> {
        self.place_writes().pop()
    }

    /// Every selected-date write, oldest first.
    pub fn date_writes(&self) -> Vec<Option<NaiveDate>> {
        self.date_writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    /// The most recent selected-date write, if any write happened.
    pub fn last_date_write(&self) -> Option<Option<NaiveDate>> {
        self.date_writes().pop()
    }
}

impl UrlState for RecordingUrlState {
    fn set_place_param(&self, place: Option<&PlaceId>) {
        if let Ok(mut writes) = self.place_writes.lock() {
            writes.push(place.cloned());
        }
    }

    fn set_date_param(&self, date: Option<NaiveDate>) {
        if let Ok(mut writes) = self.date_writes.lock() {
            writes.push(date);
        }
    }
}
