//! Calendar event drafting and remote stop reconciliation.
//!
//! One `SchedulerService` instance owns the draft lifecycle for one trip:
//! opening a draft from an empty slot or an existing stop, editing its
//! place and times with snap-aware arithmetic, and reconciling Save and
//! Delete outcomes with the stop repository, the calendar widget, and the
//! query cache. Drag and resize completions from the widget bypass the
//! draft entirely; the widget already displays the moved event, so only
//! the remote record and the cached reads need to catch up.
//!
//! Save and Delete for the same stop must not race. The engine performs
//! no locking across those round trips; hosts are expected to disable the
//! triggering affordances while a mutation is in flight.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::config::SchedulerConfig;
use crate::domain::place::PlaceRecord;
use crate::domain::ports::{
    CalendarSurface, QueryCache, QueryKey, StopRepository, StopRepositoryError, UrlState,
};
use crate::domain::slot_time::{SlotTime, TimeError, duration_between, extract_hours_minutes};
use crate::domain::stop::{EventDraft, StopId, StopRecord, StopValidationError};
use crate::domain::trip::{DateRange, TripId, TripRecord};

/// Title carried by drafts until a place names them.
pub const DEFAULT_EVENT_TITLE: &str = "Untitled Event";

/// Errors raised by scheduling operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// The requested date falls outside the trip's range.
    #[error("{date} is outside the trip's date range")]
    OutOfRange {
        /// The rejected date.
        date: NaiveDate,
    },

    /// The operation needs an open draft and none exists.
    #[error("no draft is open")]
    NoDraft,

    /// The requested duration leaves the end at or before the start.
    #[error("event duration must leave the end after the start")]
    EmptyDuration,

    /// Delete was requested for a draft that was never persisted.
    #[error("draft has never been saved; nothing to delete")]
    NothingPersisted,

    /// Time arithmetic on the draft failed.
    #[error("time arithmetic failed: {0}")]
    Time(#[from] TimeError),

    /// The draft cannot form a valid stop record.
    #[error("draft cannot form a valid stop: {0}")]
    Validation(#[from] StopValidationError),

    /// The stop repository rejected a read or mutation.
    #[error("stop repository error: {0}")]
    Repository(#[from] StopRepositoryError),
}

/// Phase of the draft lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DraftState {
    /// No draft is open.
    #[default]
    NoDraft,
    /// A new event that has never been persisted.
    Unsaved(EventDraft),
    /// A persisted stop loaded for editing.
    Editing(EventDraft),
}

impl DraftState {
    /// The open draft, if any.
    #[must_use]
    pub const fn draft(&self) -> Option<&EventDraft> {
        match self {
            Self::NoDraft => None,
            Self::Unsaved(draft) | Self::Editing(draft) => Some(draft),
        }
    }
}

struct SchedulerInner {
    draft: DraftState,
    selected_date: Option<NaiveDate>,
}

fn draft_mut(inner: &mut SchedulerInner) -> Result<&mut EventDraft, SchedulerError> {
    match &mut inner.draft {
        DraftState::NoDraft => Err(SchedulerError::NoDraft),
        DraftState::Unsaved(draft) | DraftState::Editing(draft) => Ok(draft),
    }
}

/// Draft lifecycle and stop reconciliation for one trip.
pub struct SchedulerService<R, Q, C, U> {
    stop_repo: Arc<R>,
    query_cache: Arc<Q>,
    surface: Arc<C>,
    url: Arc<U>,
    trip: TripId,
    range: DateRange,
    config: SchedulerConfig,
    inner: Mutex<SchedulerInner>,
}

impl<R, Q, C, U> SchedulerService<R, Q, C, U> {
    /// Create a scheduler scoped to the given trip.
    pub fn new(
        stop_repo: Arc<R>,
        query_cache: Arc<Q>,
        surface: Arc<C>,
        url: Arc<U>,
        trip: &TripRecord,
        config: SchedulerConfig,
    ) -> Self {
        Self {
            stop_repo,
            query_cache,
            surface,
            url,
            trip: trip.id().clone(),
            range: trip.range().clone(),
            config,
            inner: Mutex::new(SchedulerInner {
                draft: DraftState::NoDraft,
                selected_date: None,
            }),
        }
    }

    fn lock_inner(&self) -> MutexGuard<'_, SchedulerInner> {
        // A panicking writer leaves the draft usable; recover the guard
        // rather than poisoning every later call.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The trip this scheduler is scoped to.
    #[must_use]
    pub const fn trip(&self) -> &TripId {
        &self.trip
    }

    /// The scheduling configuration in effect.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// The current draft phase.
    #[must_use]
    pub fn draft(&self) -> DraftState {
        self.lock_inner().draft.clone()
    }

    /// The currently selected calendar date, if any.
    #[must_use]
    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.lock_inner().selected_date
    }

    /// Open a fresh draft from an empty calendar slot.
    ///
    /// The start snaps down to the configured increment and the end sits
    /// one default duration later. The draft gets a fresh random id, no
    /// place, and the placeholder title.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::OutOfRange`] when the clicked slot falls
    /// outside the trip's dates, and [`SchedulerError::Time`] when the
    /// default duration cannot be applied.
    pub fn open_slot(&self, clicked: SlotTime) -> Result<EventDraft, SchedulerError> {
        if !self.range.contains(clicked.date()) {
            return Err(SchedulerError::OutOfRange {
                date: clicked.date(),
            });
        }

        let start = clicked.floor_to(self.config.snap);
        let end = start.shift(
            i64::from(self.config.default_duration_hours),
            i64::from(self.config.default_duration_minutes),
        )?;
        let draft = EventDraft {
            id: StopId::random(),
            place: None,
            title: DEFAULT_EVENT_TITLE.to_owned(),
            start,
            end,
        };
        self.lock_inner().draft = DraftState::Unsaved(draft.clone());
        debug!(stop_id = %draft.id(), start = %start, "opened draft from empty slot");

        Ok(draft)
    }

    /// Load an existing stop into an editing draft.
    pub fn open_stop(&self, record: &StopRecord) -> EventDraft {
        let draft = EventDraft::from(record.clone());
        self.lock_inner().draft = DraftState::Editing(draft.clone());
        debug!(stop_id = %draft.id(), "opened draft from existing stop");
        draft
    }

    /// Set or clear the draft's place, titling it from the record.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NoDraft`] when no draft is open.
    pub fn assign_place(&self, place: Option<&PlaceRecord>) -> Result<EventDraft, SchedulerError> {
        let mut inner = self.lock_inner();
        let draft = draft_mut(&mut inner)?;
        match place {
            Some(record) => {
                draft.place = Some(record.id().clone());
                draft.title = record
                    .display_name()
                    .unwrap_or(DEFAULT_EVENT_TITLE)
                    .to_owned();
            }
            None => {
                draft.place = None;
                draft.title = DEFAULT_EVENT_TITLE.to_owned();
            }
        }
        Ok(draft.clone())
    }

    /// Move the draft's start, preserving its duration.
    ///
    /// `time_text` is an `HH:MM` wall-clock time on the draft's current
    /// date. The new start snaps down to the configured increment and the
    /// end is recomputed so the event keeps the same length.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NoDraft`] when no draft is open and
    /// [`SchedulerError::Time`] when the time text does not parse or the
    /// arithmetic over- or underflows.
    pub fn reschedule_start(&self, time_text: &str) -> Result<EventDraft, SchedulerError> {
        let (hours, minutes) = extract_hours_minutes(time_text)?;
        let mut inner = self.lock_inner();
        let draft = draft_mut(&mut inner)?;

        let duration_text = duration_between(&draft.start, &draft.end)?;
        let (duration_hours, duration_minutes) = extract_hours_minutes(&duration_text)?;

        let start =
            SlotTime::from_date_time(draft.start.date(), hours, minutes)?.floor_to(self.config.snap);
        let end = start.shift(i64::from(duration_hours), i64::from(duration_minutes))?;
        draft.start = start;
        draft.end = end;

        Ok(draft.clone())
    }

    /// Recompute the draft's end from a free-text `HH:MM` duration.
    ///
    /// The end lands on `start + duration` snapped down to the configured
    /// increment.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NoDraft`] when no draft is open,
    /// [`SchedulerError::Time`] when the duration does not parse, and
    /// [`SchedulerError::EmptyDuration`] when the snapped end would not
    /// land strictly after the start.
    pub fn set_duration(&self, duration_text: &str) -> Result<EventDraft, SchedulerError> {
        let (hours, minutes) = extract_hours_minutes(duration_text)?;
        let mut inner = self.lock_inner();
        let draft = draft_mut(&mut inner)?;

        let end = draft
            .start
            .shift(i64::from(hours), i64::from(minutes))?
            .floor_to(self.config.snap);
        if end <= draft.start {
            return Err(SchedulerError::EmptyDuration);
        }
        draft.end = end;

        Ok(draft.clone())
    }

    /// Discard the open draft, if any.
    pub fn cancel(&self) {
        self.lock_inner().draft = DraftState::NoDraft;
        debug!("draft discarded");
    }

    /// Select a calendar date, mirroring it into the URL.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::OutOfRange`] when the date falls outside
    /// the trip's range.
    pub fn select_date(&self, date: NaiveDate) -> Result<(), SchedulerError>
    where
        U: UrlState,
    {
        if !self.range.contains(date) {
            return Err(SchedulerError::OutOfRange { date });
        }
        self.lock_inner().selected_date = Some(date);
        self.url.set_date_param(Some(date));
        Ok(())
    }

    /// Clear the selected calendar date and its URL parameter.
    pub fn clear_date(&self)
    where
        U: UrlState,
    {
        self.lock_inner().selected_date = None;
        self.url.set_date_param(None);
    }
}

impl<R, Q, C, U> SchedulerService<R, Q, C, U>
where
    R: StopRepository,
    Q: QueryCache,
    C: CalendarSurface,
    U: UrlState,
{
    /// Persist the open draft and reconcile the calendar surface.
    ///
    /// Upserts through the repository, replaces any surface entry with
    /// the same id rather than duplicating it, invalidates the trip's
    /// stop reads, and closes the draft. The persisted record is
    /// returned.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NoDraft`] when no draft is open,
    /// [`SchedulerError::Validation`] when the draft cannot form a stop
    /// record, and [`SchedulerError::Repository`] when the upsert fails.
    /// On failure the draft is kept so the caller can retry or cancel.
    pub async fn save(&self) -> Result<StopRecord, SchedulerError> {
        let draft = match self.lock_inner().draft.draft() {
            Some(draft) => draft.clone(),
            None => return Err(SchedulerError::NoDraft),
        };
        let record = draft.to_record()?;

        self.stop_repo.upsert(&self.trip, &record).await?;

        if self.surface.event_ids().contains(record.id()) {
            self.surface.remove_event(record.id());
        }
        self.surface.add_event(&record);
        self.invalidate_stops().await;
        self.lock_inner().draft = DraftState::NoDraft;
        debug!(stop_id = %record.id(), trip_id = %self.trip, "stop saved");

        Ok(record)
    }

    /// Delete the persisted stop behind an editing draft.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::NoDraft`] when no draft is open,
    /// [`SchedulerError::NothingPersisted`] when the draft was never
    /// saved (no remote call is made), and
    /// [`SchedulerError::Repository`] when the remote delete fails. On
    /// failure the draft is kept.
    pub async fn delete(&self) -> Result<(), SchedulerError> {
        let id = {
            let inner = self.lock_inner();
            match &inner.draft {
                DraftState::NoDraft => return Err(SchedulerError::NoDraft),
                DraftState::Unsaved(_) => return Err(SchedulerError::NothingPersisted),
                DraftState::Editing(draft) => draft.id().clone(),
            }
        };

        self.stop_repo.delete(&self.trip, &id).await?;

        self.surface.remove_event(&id);
        self.invalidate_stops().await;
        self.lock_inner().draft = DraftState::NoDraft;
        debug!(stop_id = %id, trip_id = %self.trip, "stop deleted");

        Ok(())
    }

    /// Persist a drag or resize completion reported by the widget.
    ///
    /// The widget already displays the moved event, so only the remote
    /// record is upserted and the trip's stop reads invalidated; no draft
    /// or surface bookkeeping happens.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Repository`] when the upsert fails.
    pub async fn apply_move(&self, record: &StopRecord) -> Result<(), SchedulerError> {
        self.stop_repo.upsert(&self.trip, record).await?;
        self.invalidate_stops().await;
        debug!(stop_id = %record.id(), start = %record.start(), "stop moved from widget");
        Ok(())
    }

    /// Read the trip's stops for calendar population.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Repository`] when the read fails.
    pub async fn load_stops(&self) -> Result<Vec<StopRecord>, SchedulerError> {
        Ok(self.stop_repo.list_for_trip(&self.trip).await?)
    }

    async fn invalidate_stops(&self) {
        let key = QueryKey::stops(&self.trip);
        if let Err(err) = self.query_cache.invalidate(&key).await {
            warn!(key = %key, error = %err, "stop invalidation failed; readers may serve stale stops");
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
