//! Deterministic place and trip generation from seed definitions.
//!
//! This module provides the generation functions that produce reproducible
//! demo data from a landmark registry. The same seed value always produces
//! identical output.

use chrono::{Days, NaiveDate, NaiveTime};
use fake::Fake;
use fake::faker::address::raw::{BuildingNumber, StreetName, StreetSuffix};
use fake::faker::company::raw::CompanyName;
use fake::locales::EN;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use uuid::Uuid;

use crate::error::GenerationError;
use crate::registry::{Landmark, PlaceRegistry, SeedDefinition};
use crate::seed::{ExamplePlace, ExampleStop, ExampleTrip};

/// Maximum coordinate jitter applied around a landmark centre, in degrees.
const COORDINATE_JITTER_DEGREES: f64 = 0.009;

/// Probability numerator for a generated place carrying a photo reference.
const PHOTO_PROBABILITY_NUMERATOR: u32 = 3;

/// Probability denominator for photo reference selection.
const PHOTO_PROBABILITY_DENOMINATOR: u32 = 4;

/// Minimum number of favourite places on the demo trip.
const MIN_FAVORITES: usize = 2;

/// Maximum number of favourite places on the demo trip.
const MAX_FAVORITES: usize = 4;

/// Number of consecutive days the demo trip spans.
const TRIP_DAYS: u64 = 5;

/// Calendar year demo trips are placed in.
const TRIP_YEAR: i32 = 2025;

/// Earliest hour a generated stop may start.
const EARLIEST_STOP_HOUR: u32 = 9;

/// Latest hour a generated stop may start.
const LATEST_STOP_HOUR: u32 = 16;

/// Minimum duration of a generated stop, in hours.
const MIN_STOP_HOURS: u32 = 1;

/// Maximum duration of a generated stop, in hours.
const MAX_STOP_HOURS: u32 = 3;

/// Name of the generated demo trip.
const DEMO_TRIP_NAME: &str = "New York demo trip";

/// Generates example places from a seed definition.
///
/// Uses the seed's `seed` value to initialise a deterministic RNG, ensuring
/// identical output for the same seed definition. The generated places have:
///
/// - Unique demo identifiers (deterministically generated)
/// - Venue-style names and street addresses
/// - Coordinates jittered around registry landmark centres
/// - A photo reference on roughly three quarters of the records
///
/// # Errors
///
/// Returns [`GenerationError::NoLandmarks`] if the registry has no landmarks
/// to anchor generated places.
///
/// # Example
///
/// ```
/// use example_data::{PlaceRegistry, generate_example_places};
///
/// let registry = PlaceRegistry::builtin().expect("valid registry");
/// let seed_def = registry.find_seed("manhattan-week").expect("found");
/// let places = generate_example_places(&registry, seed_def).expect("generated");
///
/// assert_eq!(places.len(), seed_def.place_count());
/// // Same seed produces identical places
/// let places2 = generate_example_places(&registry, seed_def).expect("generated");
/// assert_eq!(places, places2);
/// ```
pub fn generate_example_places(
    registry: &PlaceRegistry,
    seed_def: &SeedDefinition,
) -> Result<Vec<ExamplePlace>, GenerationError> {
    // Require at least one landmark to anchor coordinates
    if registry.landmarks().is_empty() {
        return Err(GenerationError::NoLandmarks);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed_def.seed());
    let mut places = Vec::with_capacity(seed_def.place_count());

    for _ in 0..seed_def.place_count() {
        let place = generate_single_place(&mut rng, registry.landmarks())?;
        places.push(place);
    }

    Ok(places)
}

/// Generates the demo trip for a seed definition.
///
/// The trip spans [`TRIP_DAYS`] consecutive days, marks a subset of registry
/// landmarks as favourites, and schedules one stop per favourite on
/// consecutive trip days. Output is fully determined by the seed value.
///
/// # Errors
///
/// Returns [`GenerationError`] if the registry has no landmarks or a
/// generated date or time cannot be placed on the calendar.
///
/// # Example
///
/// ```
/// use example_data::{PlaceRegistry, generate_demo_trip};
///
/// let registry = PlaceRegistry::builtin().expect("valid registry");
/// let seed_def = registry.find_seed("manhattan-week").expect("found");
/// let trip = generate_demo_trip(&registry, seed_def).expect("generated");
///
/// assert_eq!(trip.stops.len(), trip.favorite_place_ids.len());
/// ```
pub fn generate_demo_trip(
    registry: &PlaceRegistry,
    seed_def: &SeedDefinition,
) -> Result<ExampleTrip, GenerationError> {
    if registry.landmarks().is_empty() {
        return Err(GenerationError::NoLandmarks);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed_def.seed());

    let month = rng.random_range(4..=9);
    let day = rng.random_range(1..=28);
    let start = NaiveDate::from_ymd_opt(TRIP_YEAR, month, day)
        .ok_or(GenerationError::TripDatesOutOfRange)?;
    let end = start
        .checked_add_days(Days::new(TRIP_DAYS.saturating_sub(1)))
        .ok_or(GenerationError::TripDatesOutOfRange)?;

    let landmark_ids: Vec<String> = registry
        .landmarks()
        .iter()
        .map(|landmark| landmark.id().to_owned())
        .collect();
    let favorite_place_ids = select_subset(&mut rng, &landmark_ids, MIN_FAVORITES, MAX_FAVORITES);

    let mut stops = Vec::with_capacity(favorite_place_ids.len());
    for (offset, place_id) in (0u64..).zip(favorite_place_ids.iter()) {
        let stop = generate_stop(&mut rng, registry, place_id, start, offset)?;
        stops.push(stop);
    }

    Ok(ExampleTrip {
        id: format!("demo-{}", seed_def.name()),
        name: DEMO_TRIP_NAME.to_owned(),
        start,
        end,
        favorite_place_ids,
        stops,
    })
}

/// Generates a single place anchored near a registry landmark.
fn generate_single_place(
    rng: &mut ChaCha8Rng,
    landmarks: &[Landmark],
) -> Result<ExamplePlace, GenerationError> {
    let anchor = landmarks.choose(rng).ok_or(GenerationError::NoLandmarks)?;

    // Generate a deterministic demo identifier from the RNG
    let id = format!("demo-{}", Uuid::from_u128(rng.random()).simple());

    let display_name: String = CompanyName(EN).fake_with_rng(rng);
    let building: String = BuildingNumber(EN).fake_with_rng(rng);
    let street: String = StreetName(EN).fake_with_rng(rng);
    let suffix: String = StreetSuffix(EN).fake_with_rng(rng);
    let formatted_address = format!("{building} {street} {suffix}, New York, NY");

    let latitude = jitter_coordinate(rng, anchor.latitude());
    let longitude = jitter_coordinate(rng, anchor.longitude());

    // Roughly three quarters of the generated places carry a photo reference
    let photo_reference = rng
        .random_ratio(PHOTO_PROBABILITY_NUMERATOR, PHOTO_PROBABILITY_DENOMINATOR)
        .then(|| {
            format!(
                "places/{id}/photos/{}",
                Uuid::from_u128(rng.random()).simple()
            )
        });

    Ok(ExamplePlace {
        id,
        display_name,
        formatted_address,
        latitude,
        longitude,
        photo_reference,
    })
}

/// Generates a stop for a favourite place on the given trip day.
fn generate_stop(
    rng: &mut ChaCha8Rng,
    registry: &PlaceRegistry,
    place_id: &str,
    trip_start: NaiveDate,
    day_offset: u64,
) -> Result<ExampleStop, GenerationError> {
    let date = trip_start
        .checked_add_days(Days::new(day_offset))
        .ok_or(GenerationError::TripDatesOutOfRange)?;

    let start_hour = rng.random_range(EARLIEST_STOP_HOUR..=LATEST_STOP_HOUR);
    let start_minute = if rng.random_ratio(1, 2) { 0 } else { 30 };
    let duration_hours = rng.random_range(MIN_STOP_HOURS..=MAX_STOP_HOURS);

    let start = clock_time(start_hour, start_minute)?;
    let end = clock_time(start_hour + duration_hours, start_minute)?;

    let title = registry
        .landmarks()
        .iter()
        .find(|landmark| landmark.id() == place_id)
        .map_or_else(|| place_id.to_owned(), |landmark| landmark.name().to_owned());

    Ok(ExampleStop {
        id: Uuid::from_u128(rng.random()),
        place_id: Some(place_id.to_owned()),
        title,
        date,
        start,
        end,
    })
}

/// Offsets a landmark coordinate by a bounded deterministic jitter.
#[expect(
    clippy::float_arithmetic,
    reason = "coordinate jitter is inherently floating point"
)]
fn jitter_coordinate(rng: &mut ChaCha8Rng, centre: f64) -> f64 {
    centre + rng.random_range(-COORDINATE_JITTER_DEGREES..=COORDINATE_JITTER_DEGREES)
}

/// Builds a clock time, mapping invalid components to a generation error.
fn clock_time(hour: u32, minute: u32) -> Result<NaiveTime, GenerationError> {
    NaiveTime::from_hms_opt(hour, minute, 0)
        .ok_or(GenerationError::StopTimeOutOfRange { hour, minute })
}

/// Selects a deterministic subset of ids from the provided slice.
///
/// The selection count is determined by the RNG state, bounded by `min_count`
/// and `max_count`. If the source slice has fewer elements than `max_count`,
/// all elements may be selected.
fn select_subset(
    rng: &mut ChaCha8Rng,
    ids: &[String],
    min_count: usize,
    max_count: usize,
) -> Vec<String> {
    if ids.is_empty() {
        return Vec::new();
    }

    // Clamp bounds to available ids
    let clamped_min = min_count.min(ids.len());
    let clamped_max = max_count.min(ids.len());

    // Determine count (handle case where min == max)
    let count = if clamped_min == clamped_max {
        clamped_min
    } else {
        rng.random_range(clamped_min..=clamped_max)
    };

    // Shuffle and take the first `count` elements
    let mut shuffled = ids.to_vec();
    shuffled.shuffle(rng);
    shuffled.truncate(count);
    shuffled
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::{fixture, rstest};

    use super::*;

    /// Generates places from the named seed and asserts a predicate holds for all places.
    ///
    /// # Panics
    ///
    /// Panics if the seed is not found, generation fails, or the predicate
    /// returns `false` for any place.
    fn assert_all_places<F>(registry: &PlaceRegistry, seed_name: &str, predicate: F)
    where
        F: Fn(&ExamplePlace) -> bool,
    {
        let seed_def = registry.find_seed(seed_name).expect("seed should be found");
        let places =
            generate_example_places(registry, seed_def).expect("generation should succeed");

        for place in &places {
            assert!(predicate(place), "Predicate failed for place: {place:?}");
        }
    }

    const TEST_REGISTRY_JSON: &str = r#"{
        "version": 1,
        "landmarks": [
            {
                "id": "empire-state-building",
                "name": "Empire State Building",
                "address": "20 W 34th St, New York, NY 10001",
                "latitude": 40.748817,
                "longitude": -73.985428
            },
            {
                "id": "central-park",
                "name": "Central Park",
                "address": "New York, NY 10024",
                "latitude": 40.785091,
                "longitude": -73.968285
            },
            {
                "id": "chelsea-market",
                "name": "Chelsea Market",
                "address": "75 9th Ave, New York, NY 10011",
                "latitude": 40.742054,
                "longitude": -74.004821
            }
        ],
        "seeds": [
            {"name": "test-seed", "seed": 42, "placeCount": 10},
            {"name": "small-seed", "seed": 123, "placeCount": 2}
        ]
    }"#;

    #[fixture]
    fn test_registry() -> PlaceRegistry {
        PlaceRegistry::from_json(TEST_REGISTRY_JSON).expect("valid test registry")
    }

    #[rstest]
    fn generates_correct_place_count(test_registry: PlaceRegistry) {
        let seed_def = test_registry.find_seed("test-seed").expect("seed found");
        let places = generate_example_places(&test_registry, seed_def).expect("generated");

        assert_eq!(places.len(), 10);
    }

    #[rstest]
    fn generation_is_deterministic(test_registry: PlaceRegistry) {
        let seed_def = test_registry.find_seed("test-seed").expect("seed found");

        let places1 = generate_example_places(&test_registry, seed_def).expect("generated");
        let places2 = generate_example_places(&test_registry, seed_def).expect("generated");

        assert_eq!(places1, places2);
    }

    #[rstest]
    fn different_seeds_produce_different_places(test_registry: PlaceRegistry) {
        let seed1 = test_registry.find_seed("test-seed").expect("seed found");
        let seed2 = test_registry.find_seed("small-seed").expect("seed found");

        let places1 = generate_example_places(&test_registry, seed1).expect("generated");
        let places2 = generate_example_places(&test_registry, seed2).expect("generated");

        // Different seeds should produce different first place ids
        assert_ne!(
            places1.first().map(|p| p.id.clone()),
            places2.first().map(|p| p.id.clone())
        );
    }

    #[rstest]
    fn place_ids_are_unique(test_registry: PlaceRegistry) {
        let seed_def = test_registry.find_seed("test-seed").expect("seed found");
        let places = generate_example_places(&test_registry, seed_def).expect("generated");

        let ids: HashSet<_> = places.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), places.len());
    }

    #[rstest]
    fn coordinates_stay_near_a_landmark(test_registry: PlaceRegistry) {
        let tolerance = COORDINATE_JITTER_DEGREES + 1e-9;

        assert_all_places(&test_registry, "test-seed", |place| {
            test_registry.landmarks().iter().any(|landmark| {
                (place.latitude - landmark.latitude()).abs() <= tolerance
                    && (place.longitude - landmark.longitude()).abs() <= tolerance
            })
        });
    }

    #[rstest]
    fn photo_references_appear(test_registry: PlaceRegistry) {
        let seed_def = test_registry.find_seed("test-seed").expect("seed found");
        let places = generate_example_places(&test_registry, seed_def).expect("generated");

        // With ten places at a 3/4 rate, at least one photo is near certain
        assert!(places.iter().any(|p| p.photo_reference.is_some()));
    }

    #[rstest]
    fn demo_trip_is_deterministic(test_registry: PlaceRegistry) {
        let seed_def = test_registry.find_seed("test-seed").expect("seed found");

        let trip1 = generate_demo_trip(&test_registry, seed_def).expect("generated");
        let trip2 = generate_demo_trip(&test_registry, seed_def).expect("generated");

        assert_eq!(trip1, trip2);
    }

    #[rstest]
    fn demo_trip_spans_configured_days(test_registry: PlaceRegistry) {
        let seed_def = test_registry.find_seed("test-seed").expect("seed found");
        let trip = generate_demo_trip(&test_registry, seed_def).expect("generated");

        let span = trip.end.signed_duration_since(trip.start).num_days();
        assert_eq!(span, 4);
    }

    #[rstest]
    fn demo_trip_favourites_come_from_registry(test_registry: PlaceRegistry) {
        let seed_def = test_registry.find_seed("test-seed").expect("seed found");
        let trip = generate_demo_trip(&test_registry, seed_def).expect("generated");

        let landmark_ids: HashSet<_> = test_registry
            .landmarks()
            .iter()
            .map(Landmark::id)
            .collect();

        assert!(trip.favorite_place_ids.len() >= MIN_FAVORITES.min(landmark_ids.len()));
        assert!(trip.favorite_place_ids.len() <= MAX_FAVORITES);
        assert!(
            trip.favorite_place_ids
                .iter()
                .all(|id| landmark_ids.contains(id.as_str()))
        );
    }

    #[rstest]
    fn demo_trip_schedules_one_stop_per_favourite(test_registry: PlaceRegistry) {
        let seed_def = test_registry.find_seed("test-seed").expect("seed found");
        let trip = generate_demo_trip(&test_registry, seed_def).expect("generated");

        assert_eq!(trip.stops.len(), trip.favorite_place_ids.len());
        for stop in &trip.stops {
            let place_id = stop.place_id.as_deref().expect("stop is anchored");
            assert!(trip.favorite_place_ids.iter().any(|id| id == place_id));
            assert!(stop.date >= trip.start && stop.date <= trip.end);
            assert!(stop.start < stop.end);
        }
    }

    #[rstest]
    fn demo_trip_stop_titles_use_landmark_names(test_registry: PlaceRegistry) {
        let seed_def = test_registry.find_seed("test-seed").expect("seed found");
        let trip = generate_demo_trip(&test_registry, seed_def).expect("generated");

        for stop in &trip.stops {
            let place_id = stop.place_id.as_deref().expect("stop is anchored");
            let landmark = test_registry
                .landmarks()
                .iter()
                .find(|l| l.id() == place_id)
                .expect("favourite is a landmark");
            assert_eq!(stop.title, landmark.name());
        }
    }

    #[test]
    fn select_subset_respects_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let ids: Vec<String> = (0..10).map(|i| format!("place-{i}")).collect();

        for _ in 0..100 {
            let subset = select_subset(&mut rng, &ids, 2, 5);
            assert!(subset.len() >= 2, "Subset too small: {}", subset.len());
            assert!(subset.len() <= 5, "Subset too large: {}", subset.len());
        }
    }

    #[test]
    fn select_subset_handles_empty_slice() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let ids: Vec<String> = vec![];

        let subset = select_subset(&mut rng, &ids, 1, 3);
        assert!(subset.is_empty());
    }

    #[test]
    fn select_subset_clamps_to_available() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let ids: Vec<String> = vec!["a".to_owned(), "b".to_owned()];

        // Request more than available
        let subset = select_subset(&mut rng, &ids, 5, 10);
        assert!(subset.len() <= 2);
    }
}
