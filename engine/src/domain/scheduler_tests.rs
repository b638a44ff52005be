//! Regression coverage for draft scheduling and stop reconciliation.

use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rstest::rstest;

use super::*;
use crate::domain::place::{PlaceId, PlaceRecord};
use crate::domain::ports::{
    MockQueryCache, MockStopRepository, QueryCacheError, RecordingUrlState,
};

/// Calendar widget double that records every imperative call in order.
#[derive(Debug, Default)]
struct RecordingSurface {
    events: Mutex<Vec<StopId>>,
    ops: Mutex<Vec<SurfaceOp>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SurfaceOp {
    Added(StopId),
    Removed(StopId),
}

impl RecordingSurface {
    fn seed(&self, id: StopId) {
        self.events.lock().expect("surface lock").push(id);
    }

    fn ops(&self) -> Vec<SurfaceOp> {
        self.ops.lock().expect("surface lock").clone()
    }
}

impl CalendarSurface for RecordingSurface {
    fn event_ids(&self) -> Vec<StopId> {
        self.events.lock().expect("surface lock").clone()
    }

    fn add_event(&self, stop: &StopRecord) {
        self.events.lock().expect("surface lock").push(stop.id().clone());
        self.ops
            .lock()
            .expect("surface lock")
            .push(SurfaceOp::Added(stop.id().clone()));
    }

    fn remove_event(&self, id: &StopId) {
        self.events.lock().expect("surface lock").retain(|event| event != id);
        self.ops
            .lock()
            .expect("surface lock")
            .push(SurfaceOp::Removed(id.clone()));
    }
}

type TestScheduler =
    SchedulerService<MockStopRepository, MockQueryCache, RecordingSurface, RecordingUrlState>;

struct Harness {
    scheduler: TestScheduler,
    surface: Arc<RecordingSurface>,
    url: Arc<RecordingUrlState>,
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

fn trip_id() -> TripId {
    TripId::new("trip-1").expect("valid trip id")
}

fn trip() -> TripRecord {
    let range = DateRange::new(date(2025, 1, 1), date(2025, 1, 7)).expect("valid range");
    TripRecord::new(trip_id(), "New York week".to_owned(), range)
}

fn slot(text: &str) -> SlotTime {
    SlotTime::parse(text).expect("valid slot time")
}

fn quiet_cache() -> MockQueryCache {
    let mut cache = MockQueryCache::new();
    cache.expect_invalidate().returning(|_| Ok(()));
    cache
}

fn landmark() -> PlaceRecord {
    let id = PlaceId::new("empire-state").expect("valid place id");
    PlaceRecord::new(id, 40.748_817, -73.985_428)
        .expect("valid record")
        .with_display_name("Empire State Building")
}

fn persisted_stop() -> StopRecord {
    StopRecord::new(
        StopId::new("stop-1").expect("valid stop id"),
        Some(landmark().id().clone()),
        "Observation deck",
        slot("2025-01-05 10:00"),
        slot("2025-01-05 12:00"),
    )
    .expect("valid stop")
}

fn harness(repo: MockStopRepository, cache: MockQueryCache) -> Harness {
    let surface = Arc::new(RecordingSurface::default());
    let url = Arc::new(RecordingUrlState::default());
    let scheduler = SchedulerService::new(
        Arc::new(repo),
        Arc::new(cache),
        Arc::clone(&surface),
        Arc::clone(&url),
        &trip(),
        SchedulerConfig::default(),
    );
    Harness {
        scheduler,
        surface,
        url,
    }
}

fn draft_harness() -> Harness {
    harness(MockStopRepository::new(), MockQueryCache::new())
}

#[rstest]
fn opening_a_slot_snaps_the_start_and_applies_the_default_duration() {
    let h = draft_harness();

    let draft = h
        .scheduler
        .open_slot(slot("2025-01-05 10:47"))
        .expect("slot is inside the trip");

    assert_eq!(draft.start(), slot("2025-01-05 10:30"));
    assert_eq!(draft.end(), slot("2025-01-05 11:30"));
    assert_eq!(draft.title(), DEFAULT_EVENT_TITLE);
    assert!(draft.place().is_none());
    assert!(matches!(h.scheduler.draft(), DraftState::Unsaved(_)));
}

#[rstest]
fn slots_outside_the_trip_are_rejected() {
    let h = draft_harness();

    let result = h.scheduler.open_slot(slot("2025-02-01 10:00"));

    assert_eq!(
        result,
        Err(SchedulerError::OutOfRange {
            date: date(2025, 2, 1)
        })
    );
    assert_eq!(h.scheduler.draft(), DraftState::NoDraft);
}

#[rstest]
fn fresh_drafts_mint_distinct_ids() {
    let h = draft_harness();

    let first = h.scheduler.open_slot(slot("2025-01-05 09:00")).expect("opens");
    let second = h.scheduler.open_slot(slot("2025-01-06 09:00")).expect("opens");

    assert_ne!(first.id(), second.id());
}

#[rstest]
fn assigning_a_place_titles_the_draft_from_its_display_name() {
    let h = draft_harness();
    h.scheduler.open_slot(slot("2025-01-05 10:00")).expect("opens");

    let titled = h
        .scheduler
        .assign_place(Some(&landmark()))
        .expect("draft is open");
    assert_eq!(titled.title(), "Empire State Building");
    assert_eq!(titled.place(), Some(landmark().id()));

    let cleared = h.scheduler.assign_place(None).expect("draft is open");
    assert_eq!(cleared.title(), DEFAULT_EVENT_TITLE);
    assert!(cleared.place().is_none());
}

#[rstest]
fn editing_without_a_draft_is_rejected() {
    let h = draft_harness();

    assert_eq!(
        h.scheduler.assign_place(Some(&landmark())),
        Err(SchedulerError::NoDraft)
    );
    assert_eq!(
        h.scheduler.reschedule_start("14:00"),
        Err(SchedulerError::NoDraft)
    );
    assert_eq!(h.scheduler.set_duration("01:00"), Err(SchedulerError::NoDraft));
}

#[rstest]
fn rescheduling_the_start_preserves_the_duration() {
    let h = draft_harness();
    h.scheduler.open_slot(slot("2025-01-05 10:00")).expect("opens");
    h.scheduler.set_duration("01:30").expect("duration applies");

    let moved = h
        .scheduler
        .reschedule_start("14:47")
        .expect("start reschedules");

    assert_eq!(moved.start(), slot("2025-01-05 14:30"));
    assert_eq!(moved.end(), slot("2025-01-05 16:00"));
}

#[rstest]
fn durations_that_snap_to_nothing_are_rejected() {
    let h = draft_harness();
    h.scheduler.open_slot(slot("2025-01-05 10:00")).expect("opens");

    let result = h.scheduler.set_duration("00:10");

    assert_eq!(result, Err(SchedulerError::EmptyDuration));
    let draft = h.scheduler.draft();
    let draft = draft.draft().expect("draft survives the rejection");
    assert_eq!(draft.end(), slot("2025-01-05 11:00"));
}

#[rstest]
fn durations_crossing_midnight_land_on_the_next_date() {
    let h = draft_harness();
    h.scheduler.open_slot(slot("2025-01-05 23:00")).expect("opens");

    let draft = h.scheduler.set_duration("02:00").expect("duration applies");

    assert_eq!(draft.start(), slot("2025-01-05 23:00"));
    assert_eq!(draft.end(), slot("2025-01-06 01:00"));
}

#[rstest]
#[tokio::test]
async fn saving_replaces_the_surface_entry_rather_than_duplicating_it() {
    let mut repo = MockStopRepository::new();
    let expected_trip = trip_id();
    repo.expect_upsert()
        .withf(move |trip, _| trip == &expected_trip)
        .times(1)
        .returning(|_, _| Ok(()));
    let mut cache = MockQueryCache::new();
    let expected_key = QueryKey::stops(&trip_id());
    cache
        .expect_invalidate()
        .withf(move |key| key == &expected_key)
        .times(1)
        .returning(|_| Ok(()));
    let h = harness(repo, cache);

    let draft = h.scheduler.open_slot(slot("2025-01-05 10:00")).expect("opens");
    h.surface.seed(draft.id().clone());

    let record = h.scheduler.save().await.expect("save succeeds");

    assert_eq!(
        h.surface.ops(),
        vec![
            SurfaceOp::Removed(record.id().clone()),
            SurfaceOp::Added(record.id().clone())
        ]
    );
    assert_eq!(h.scheduler.draft(), DraftState::NoDraft);
}

#[rstest]
#[tokio::test]
async fn saving_a_new_stop_only_adds_to_the_surface() {
    let mut repo = MockStopRepository::new();
    repo.expect_upsert().times(1).returning(|_, _| Ok(()));
    let h = harness(repo, quiet_cache());

    h.scheduler.open_slot(slot("2025-01-05 10:00")).expect("opens");
    let record = h.scheduler.save().await.expect("save succeeds");

    assert_eq!(h.surface.ops(), vec![SurfaceOp::Added(record.id().clone())]);
}

#[rstest]
#[tokio::test]
async fn a_failed_save_keeps_the_draft_for_retry() {
    let mut repo = MockStopRepository::new();
    repo.expect_upsert()
        .returning(|_, _| Err(StopRepositoryError::connection("store offline")));
    let mut cache = MockQueryCache::new();
    cache.expect_invalidate().times(0);
    let h = harness(repo, cache);

    h.scheduler.open_slot(slot("2025-01-05 10:00")).expect("opens");
    let result = h.scheduler.save().await;

    assert!(matches!(result, Err(SchedulerError::Repository(_))));
    assert!(matches!(h.scheduler.draft(), DraftState::Unsaved(_)));
    assert!(h.surface.ops().is_empty());
}

#[rstest]
#[tokio::test]
async fn invalidation_failures_do_not_fail_the_save() {
    let mut repo = MockStopRepository::new();
    repo.expect_upsert().returning(|_, _| Ok(()));
    let mut cache = MockQueryCache::new();
    cache
        .expect_invalidate()
        .returning(|_| Err(QueryCacheError::dispatch("listener panicked")));
    let h = harness(repo, cache);

    h.scheduler.open_slot(slot("2025-01-05 10:00")).expect("opens");

    assert!(h.scheduler.save().await.is_ok());
    assert_eq!(h.scheduler.draft(), DraftState::NoDraft);
}

#[rstest]
#[tokio::test]
async fn deleting_an_unsaved_draft_is_rejected_without_a_remote_call() {
    let mut repo = MockStopRepository::new();
    repo.expect_delete().times(0);
    let h = harness(repo, MockQueryCache::new());

    h.scheduler.open_slot(slot("2025-01-05 10:00")).expect("opens");
    let result = h.scheduler.delete().await;

    assert_eq!(result, Err(SchedulerError::NothingPersisted));
    assert!(matches!(h.scheduler.draft(), DraftState::Unsaved(_)));
}

#[rstest]
#[tokio::test]
async fn deleting_an_editing_draft_clears_the_stop_everywhere() {
    let stop = persisted_stop();
    let expected_id = stop.id().clone();
    let mut repo = MockStopRepository::new();
    repo.expect_delete()
        .withf(move |_, id| id == &expected_id)
        .times(1)
        .returning(|_, _| Ok(()));
    let h = harness(repo, quiet_cache());
    h.surface.seed(stop.id().clone());

    h.scheduler.open_stop(&stop);
    h.scheduler.delete().await.expect("delete succeeds");

    assert_eq!(h.surface.ops(), vec![SurfaceOp::Removed(stop.id().clone())]);
    assert!(h.surface.event_ids().is_empty());
    assert_eq!(h.scheduler.draft(), DraftState::NoDraft);
}

#[rstest]
#[tokio::test]
async fn a_failed_delete_keeps_the_editing_draft() {
    let mut repo = MockStopRepository::new();
    repo.expect_delete()
        .returning(|_, _| Err(StopRepositoryError::query("row locked")));
    let h = harness(repo, MockQueryCache::new());

    h.scheduler.open_stop(&persisted_stop());
    let result = h.scheduler.delete().await;

    assert!(matches!(result, Err(SchedulerError::Repository(_))));
    assert!(matches!(h.scheduler.draft(), DraftState::Editing(_)));
}

#[rstest]
#[tokio::test]
async fn widget_moves_upsert_and_invalidate_without_draft_bookkeeping() {
    let mut repo = MockStopRepository::new();
    repo.expect_upsert().times(1).returning(|_, _| Ok(()));
    let mut cache = MockQueryCache::new();
    cache.expect_invalidate().times(1).returning(|_| Ok(()));
    let h = harness(repo, cache);

    h.scheduler
        .apply_move(&persisted_stop())
        .await
        .expect("move persists");

    assert!(h.surface.ops().is_empty());
    assert_eq!(h.scheduler.draft(), DraftState::NoDraft);
}

#[rstest]
#[tokio::test]
async fn load_stops_reads_through_the_repository() {
    let mut repo = MockStopRepository::new();
    repo.expect_list_for_trip()
        .times(1)
        .returning(|_| Ok(vec![persisted_stop()]));
    let h = harness(repo, MockQueryCache::new());

    let stops = h.scheduler.load_stops().await.expect("read succeeds");

    assert_eq!(stops, vec![persisted_stop()]);
}

#[rstest]
fn selected_dates_are_validated_and_mirrored_into_the_url() {
    let h = draft_harness();

    h.scheduler
        .select_date(date(2025, 1, 3))
        .expect("date is inside the trip");
    assert_eq!(h.scheduler.selected_date(), Some(date(2025, 1, 3)));
    assert_eq!(h.url.last_date_write(), Some(Some(date(2025, 1, 3))));

    assert_eq!(
        h.scheduler.select_date(date(2025, 3, 1)),
        Err(SchedulerError::OutOfRange {
            date: date(2025, 3, 1)
        })
    );
    assert_eq!(h.scheduler.selected_date(), Some(date(2025, 1, 3)));

    h.scheduler.clear_date();
    assert_eq!(h.scheduler.selected_date(), None);
    assert_eq!(h.url.last_date_write(), Some(None));
}

#[rstest]
fn cancel_discards_the_draft_from_either_phase() {
    let h = draft_harness();

    h.scheduler.open_slot(slot("2025-01-05 10:00")).expect("opens");
    h.scheduler.cancel();
    assert_eq!(h.scheduler.draft(), DraftState::NoDraft);

    h.scheduler.open_stop(&persisted_stop());
    h.scheduler.cancel();
    assert_eq!(h.scheduler.draft(), DraftState::NoDraft);
}
