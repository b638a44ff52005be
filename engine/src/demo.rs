//! Demo data wiring for in-memory hosting.
//!
//! Converts deterministic example-data output into domain records and
//! preloads an in-memory place store, so a host can exercise the engine
//! without a provider key or a durable cache directory.

use chrono::{DateTime, Timelike, Utc};
use example_data::{
    ExamplePlace, ExampleStop, ExampleTrip, GenerationError, Landmark, PlaceRegistry,
    RegistryError, generate_demo_trip, generate_example_places,
};
use thiserror::Error;

use crate::domain::{
    CachedPlace, DateRange, PlaceId, PlaceRecord, PlaceValidationError, SlotTime, StopId,
    StopRecord, StopValidationError, TimeError, TripId, TripRecord, TripValidationError,
};
use crate::outbound::MemoryPlaceStore;

/// Seed used when a host does not pick one.
pub const DEFAULT_DEMO_SEED: &str = "manhattan-week";

/// Errors raised while assembling demo data.
#[derive(Debug, Error)]
pub enum DemoDataError {
    /// Landmark registry parsing or lookup failed.
    #[error("demo registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Place or trip generation failed.
    #[error("demo data generation failed: {0}")]
    Generation(#[from] GenerationError),
    /// A generated place failed domain validation.
    #[error("generated place failed validation: {0}")]
    Place(#[from] PlaceValidationError),
    /// The generated trip failed domain validation.
    #[error("generated trip failed validation: {0}")]
    Trip(#[from] TripValidationError),
    /// A generated stop failed domain validation.
    #[error("generated stop failed validation: {0}")]
    Stop(#[from] StopValidationError),
    /// A generated stop time could not be placed on the planner grid.
    #[error("generated stop time is not plannable: {0}")]
    Time(#[from] TimeError),
}

/// Demo data ready for engine wiring.
#[derive(Debug, Clone)]
pub struct DemoBundle {
    /// Trip covering the generated schedule.
    pub trip: TripRecord,
    /// Stops already scheduled on the trip.
    pub stops: Vec<StopRecord>,
    /// Places saved as favourites.
    pub favorites: Vec<PlaceId>,
    /// Every place the demo can resolve, landmarks and filler alike.
    pub places: Vec<PlaceRecord>,
}

/// Builds the demo bundle for a named seed in the embedded registry.
///
/// The bundle carries the demo trip, its pre-scheduled stops, the favourite
/// place ids, and every place record the demo can resolve. Output is fully
/// determined by the seed, so repeated calls yield identical bundles.
///
/// # Errors
///
/// Returns [`DemoDataError`] if the seed is unknown or a generated value
/// fails domain validation.
pub fn demo_bundle(seed_name: &str) -> Result<DemoBundle, DemoDataError> {
    let registry = PlaceRegistry::builtin()?;
    let seed_def = registry.find_seed(seed_name)?;

    let mut places = Vec::new();
    for landmark in registry.landmarks() {
        places.push(convert_landmark(landmark)?);
    }
    for example in generate_example_places(&registry, seed_def)? {
        places.push(convert_place(example)?);
    }

    let example_trip = generate_demo_trip(&registry, seed_def)?;
    let trip = convert_trip(&example_trip)?;

    let mut stops = Vec::with_capacity(example_trip.stops.len());
    for stop in &example_trip.stops {
        stops.push(convert_stop(stop)?);
    }

    let mut favorites = Vec::with_capacity(example_trip.favorite_place_ids.len());
    for id in &example_trip.favorite_place_ids {
        favorites.push(PlaceId::new(id.clone())?);
    }

    Ok(DemoBundle {
        trip,
        stops,
        favorites,
        places,
    })
}

/// Preloads an in-memory place store with every place in the bundle.
///
/// Entries are stamped with `resolved_at` so cache freshness decisions treat
/// them as just resolved.
pub fn preloaded_store(bundle: &DemoBundle, resolved_at: DateTime<Utc>) -> MemoryPlaceStore {
    MemoryPlaceStore::preloaded(
        bundle
            .places
            .iter()
            .map(|record| CachedPlace::new(record.clone(), resolved_at)),
    )
}

fn convert_landmark(landmark: &Landmark) -> Result<PlaceRecord, PlaceValidationError> {
    let id = PlaceId::new(landmark.id())?;
    Ok(PlaceRecord::new(id, landmark.latitude(), landmark.longitude())?
        .with_display_name(landmark.name())
        .with_formatted_address(landmark.address()))
}

fn convert_place(example: ExamplePlace) -> Result<PlaceRecord, PlaceValidationError> {
    let id = PlaceId::new(example.id)?;
    let mut record = PlaceRecord::new(id, example.latitude, example.longitude)?
        .with_display_name(example.display_name)
        .with_formatted_address(example.formatted_address);
    if let Some(photo) = example.photo_reference {
        record = record.with_photo_reference(photo);
    }
    Ok(record)
}

fn convert_trip(example: &ExampleTrip) -> Result<TripRecord, DemoDataError> {
    let id = TripId::new(example.id.clone())?;
    let range = DateRange::new(example.start, example.end)?;
    Ok(TripRecord::new(id, example.name.clone(), range))
}

fn convert_stop(example: &ExampleStop) -> Result<StopRecord, DemoDataError> {
    let id = StopId::new(example.id.to_string())?;
    let place = example
        .place_id
        .as_ref()
        .map(|raw| PlaceId::new(raw.clone()))
        .transpose()?;
    let start = SlotTime::from_date_time(example.date, example.start.hour(), example.start.minute())?;
    let end = SlotTime::from_date_time(example.date, example.end.hour(), example.end.minute())?;

    Ok(StopRecord::new(
        id,
        place,
        example.title.clone(),
        start,
        end,
    )?)
}
