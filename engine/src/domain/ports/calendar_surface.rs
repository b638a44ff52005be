//! Port for the calendar widget's imperative event API.
//!
//! The widget lives in the host process and its API cannot fail, so this
//! port is synchronous and infallible. The scheduler drives it to keep the
//! rendered calendar in step with persisted stops.

use crate::domain::stop::{StopId, StopRecord};

/// Port over the calendar widget's event collection.
#[cfg_attr(test, mockall::automock)]
pub trait CalendarSurface: Send + Sync {
    /// Ids of the events currently rendered on the calendar.
    fn event_ids(&self) -> Vec<StopId>;

    /// Render a stop as a calendar event.
    fn add_event(&self, stop: &StopRecord);

    /// Remove the event with the given id. Unknown ids are ignored.
    fn remove_event(&self, id: &StopId);
}

/// Fixture implementation for tests that do not inspect the widget.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCalendarSurface;

impl CalendarSurface for FixtureCalendarSurface {
    fn event_ids(&self) -> Vec<StopId> {
        Vec::new()
    }

    fn add_event(&self, _stop: &StopRecord) {}

    fn remove_event(&self, _id: &StopId) {}
}
