//! Landmark registry types and JSON parsing.
//!
//! This module defines the registry structure that holds anchor landmarks and
//! named seed definitions. The registry is parsed from JSON and provides
//! deterministic seed lookups for place and trip generation.

use std::collections::HashSet;

use serde::Deserialize;

use crate::error::RegistryError;

/// Current supported registry version.
const SUPPORTED_VERSION: u32 = 1;

/// Embedded registry of well-known New York City landmarks.
///
/// Used by [`PlaceRegistry::builtin`] so demo hosts need no registry file.
const BUILTIN_REGISTRY_JSON: &str = r#"{
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
            "id": "statue-of-liberty",
            "name": "Statue of Liberty",
            "address": "Liberty Island, New York, NY 10004",
            "latitude": 40.689247,
            "longitude": -74.044502
        },
        {
            "id": "brooklyn-bridge",
            "name": "Brooklyn Bridge",
            "address": "Brooklyn Bridge, New York, NY 10038",
            "latitude": 40.706086,
            "longitude": -73.996864
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
        {"name": "manhattan-week", "seed": 2025, "placeCount": 12},
        {"name": "harbor-weekend", "seed": 404, "placeCount": 4}
    ]
}"#;

/// A landmark registry containing anchor places and named seeds.
///
/// The registry is parsed from JSON and provides access to landmark records
/// and the seed definitions that drive deterministic generation.
///
/// # Example
///
/// ```
/// use example_data::PlaceRegistry;
///
/// let json = r#"{
///     "version": 1,
///     "landmarks": [{
///         "id": "central-park",
///         "name": "Central Park",
///         "address": "New York, NY 10024",
///         "latitude": 40.785091,
///         "longitude": -73.968285
///     }],
///     "seeds": [{"name": "test", "seed": 42, "placeCount": 5}]
/// }"#;
///
/// let registry = PlaceRegistry::from_json(json).expect("valid registry");
/// assert_eq!(registry.landmarks().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PlaceRegistry {
    version: u32,
    landmarks: Vec<Landmark>,
    seeds: Vec<SeedDefinition>,
}

impl PlaceRegistry {
    /// Parses a landmark registry from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if:
    /// - The JSON is malformed
    /// - Required fields are missing
    /// - The version is unsupported
    /// - Any landmark has a blank or duplicate id, or invalid coordinates
    /// - The landmarks or seeds array is empty
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let raw: RawPlaceRegistry =
            serde_json::from_str(json).map_err(|e| RegistryError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Returns the embedded registry of New York City landmarks.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] if the embedded JSON fails validation.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_json(BUILTIN_REGISTRY_JSON)
    }

    fn from_raw(raw: RawPlaceRegistry) -> Result<Self, RegistryError> {
        // Validate version
        if raw.version != SUPPORTED_VERSION {
            return Err(RegistryError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        // Require at least one landmark for anchor selection
        if raw.landmarks.is_empty() {
            return Err(RegistryError::EmptyLandmarks);
        }

        let mut seen = HashSet::new();
        let mut landmarks = Vec::with_capacity(raw.landmarks.len());
        for (index, raw_landmark) in raw.landmarks.into_iter().enumerate() {
            let landmark = Landmark::from_raw(index, raw_landmark)?;
            if !seen.insert(landmark.id.clone()) {
                return Err(RegistryError::DuplicateLandmarkId { id: landmark.id });
            }
            landmarks.push(landmark);
        }

        // Validate seeds
        if raw.seeds.is_empty() {
            return Err(RegistryError::EmptySeeds);
        }

        let seeds = raw
            .seeds
            .into_iter()
            .map(|s| SeedDefinition {
                name: s.name,
                seed: s.seed,
                place_count: s.place_count,
            })
            .collect();

        Ok(Self {
            version: raw.version,
            landmarks,
            seeds,
        })
    }

    /// Returns the registry version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the anchor landmarks.
    #[must_use]
    pub fn landmarks(&self) -> &[Landmark] {
        &self.landmarks
    }

    /// Returns all seed definitions.
    #[must_use]
    pub fn seeds(&self) -> &[SeedDefinition] {
        &self.seeds
    }

    /// Finds a seed definition by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::SeedNotFound`] if no seed with the given name
    /// exists.
    pub fn find_seed(&self, name: &str) -> Result<&SeedDefinition, RegistryError> {
        self.seeds
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| RegistryError::SeedNotFound {
                name: name.to_owned(),
            })
    }
}

/// A well-known anchor place that generated data clusters around.
///
/// Landmarks carry the identifier, name, address, and coordinates that the
/// demo trip and generated places reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Landmark {
    id: String,
    name: String,
    address: String,
    latitude: f64,
    longitude: f64,
}

impl Landmark {
    fn from_raw(index: usize, raw: RawLandmark) -> Result<Self, RegistryError> {
        if raw.id.trim().is_empty() {
            return Err(RegistryError::BlankLandmarkId { index });
        }

        // NaN fails both range checks, so non-finite values are rejected too.
        let in_range = (-90.0..=90.0).contains(&raw.latitude)
            && (-180.0..=180.0).contains(&raw.longitude);
        if !in_range {
            return Err(RegistryError::InvalidCoordinates { id: raw.id });
        }

        Ok(Self {
            id: raw.id,
            name: raw.name,
            address: raw.address,
            latitude: raw.latitude,
            longitude: raw.longitude,
        })
    }

    /// Returns the landmark identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the landmark name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the formatted street address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the latitude in decimal degrees.
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in decimal degrees.
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// A named seed definition for deterministic place generation.
///
/// Each seed has a unique name, an RNG seed value, and a place count that
/// determines how many filler places to generate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedDefinition {
    name: String,
    seed: u64,
    place_count: usize,
}

impl SeedDefinition {
    /// Returns the seed name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the RNG seed value.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    /// Returns the number of filler places to generate.
    #[must_use]
    pub const fn place_count(&self) -> usize {
        self.place_count
    }
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlaceRegistry {
    version: u32,
    landmarks: Vec<RawLandmark>,
    seeds: Vec<RawSeedDefinition>,
}

/// Raw JSON representation of a landmark.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLandmark {
    id: String,
    name: String,
    address: String,
    latitude: f64,
    longitude: f64,
}

/// Raw JSON representation of a seed definition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedDefinition {
    name: String,
    seed: u64,
    place_count: usize,
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    const VALID_JSON: &str = r#"{
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
                "id": "chelsea-market",
                "name": "Chelsea Market",
                "address": "75 9th Ave, New York, NY 10011",
                "latitude": 40.742054,
                "longitude": -74.004821
            }
        ],
        "seeds": [
            {"name": "manhattan-week", "seed": 2025, "placeCount": 12},
            {"name": "harbor-weekend", "seed": 404, "placeCount": 4}
        ]
    }"#;

    #[test]
    fn parses_valid_registry() {
        let registry = PlaceRegistry::from_json(VALID_JSON).expect("valid registry");

        assert_eq!(registry.version(), 1);
        assert_eq!(registry.landmarks().len(), 2);
        assert_eq!(registry.seeds().len(), 2);
    }

    #[test]
    fn finds_seed_by_name() {
        let registry = PlaceRegistry::from_json(VALID_JSON).expect("valid registry");
        let seed = registry.find_seed("manhattan-week").expect("seed found");

        assert_eq!(seed.name(), "manhattan-week");
        assert_eq!(seed.seed(), 2025);
        assert_eq!(seed.place_count(), 12);
    }

    #[test]
    fn returns_error_for_unknown_seed() {
        let registry = PlaceRegistry::from_json(VALID_JSON).expect("valid registry");
        let result = registry.find_seed("unknown");

        assert_eq!(
            result,
            Err(RegistryError::SeedNotFound {
                name: "unknown".to_owned()
            })
        );
    }

    #[test]
    fn landmark_getters_work() {
        let registry = PlaceRegistry::from_json(VALID_JSON).expect("valid registry");
        let landmark = registry.landmarks().first().expect("landmark present");

        assert_eq!(landmark.id(), "empire-state-building");
        assert_eq!(landmark.name(), "Empire State Building");
        assert_eq!(landmark.address(), "20 W 34th St, New York, NY 10001");
        assert!((landmark.latitude() - 40.748_817).abs() < f64::EPSILON);
        assert!((landmark.longitude() + 73.985_428).abs() < f64::EPSILON);
    }

    /// Tests that use pattern matching for parse errors (message content varies).
    #[rstest]
    #[case::malformed_json("not valid json")]
    #[case::missing_version(
        r#"{"landmarks": [], "seeds": [{"name": "a", "seed": 1, "placeCount": 1}]}"#
    )]
    fn rejects_json_with_parse_error(#[case] json: &str) {
        let result = PlaceRegistry::from_json(json);
        assert!(matches!(result, Err(RegistryError::ParseError { .. })));
    }

    /// Tests that check exact error variants.
    #[rstest]
    #[case::unsupported_version(
        r#"{"version": 99, "landmarks": [{"id": "a", "name": "A", "address": "1 A St", "latitude": 40.0, "longitude": -73.0}], "seeds": [{"name": "a", "seed": 1, "placeCount": 1}]}"#,
        RegistryError::UnsupportedVersion { expected: 1, actual: 99 }
    )]
    #[case::blank_landmark_id(
        r#"{"version": 1, "landmarks": [{"id": "  ", "name": "A", "address": "1 A St", "latitude": 40.0, "longitude": -73.0}], "seeds": [{"name": "a", "seed": 1, "placeCount": 1}]}"#,
        RegistryError::BlankLandmarkId { index: 0 }
    )]
    #[case::duplicate_landmark_id(
        r#"{"version": 1, "landmarks": [{"id": "a", "name": "A", "address": "1 A St", "latitude": 40.0, "longitude": -73.0}, {"id": "a", "name": "B", "address": "2 B St", "latitude": 41.0, "longitude": -72.0}], "seeds": [{"name": "a", "seed": 1, "placeCount": 1}]}"#,
        RegistryError::DuplicateLandmarkId { id: "a".to_owned() }
    )]
    #[case::latitude_out_of_range(
        r#"{"version": 1, "landmarks": [{"id": "a", "name": "A", "address": "1 A St", "latitude": 91.0, "longitude": -73.0}], "seeds": [{"name": "a", "seed": 1, "placeCount": 1}]}"#,
        RegistryError::InvalidCoordinates { id: "a".to_owned() }
    )]
    #[case::longitude_out_of_range(
        r#"{"version": 1, "landmarks": [{"id": "a", "name": "A", "address": "1 A St", "latitude": 40.0, "longitude": -181.0}], "seeds": [{"name": "a", "seed": 1, "placeCount": 1}]}"#,
        RegistryError::InvalidCoordinates { id: "a".to_owned() }
    )]
    #[case::empty_landmarks(
        r#"{"version": 1, "landmarks": [], "seeds": [{"name": "a", "seed": 1, "placeCount": 1}]}"#,
        RegistryError::EmptyLandmarks
    )]
    #[case::empty_seeds(
        r#"{"version": 1, "landmarks": [{"id": "a", "name": "A", "address": "1 A St", "latitude": 40.0, "longitude": -73.0}], "seeds": []}"#,
        RegistryError::EmptySeeds
    )]
    fn rejects_invalid_registry(#[case] json: &str, #[case] expected: RegistryError) {
        let result = PlaceRegistry::from_json(json);
        assert_eq!(result, Err(expected));
    }

    #[test]
    fn builtin_registry_is_valid() {
        let registry = PlaceRegistry::builtin().expect("builtin registry parses");

        assert_eq!(registry.landmarks().len(), 5);
        assert_eq!(registry.seeds().len(), 2);
        assert!(registry.find_seed("manhattan-week").is_ok());
        assert!(registry.find_seed("harbor-weekend").is_ok());
    }

    #[test]
    fn builtin_landmarks_have_unique_ids() {
        let registry = PlaceRegistry::builtin().expect("builtin registry parses");
        let ids: std::collections::HashSet<_> =
            registry.landmarks().iter().map(Landmark::id).collect();

        assert_eq!(ids.len(), registry.landmarks().len());
    }

    #[test]
    fn seed_definition_getters_work() {
        let registry = PlaceRegistry::from_json(VALID_JSON).expect("valid registry");
        let seed = registry.find_seed("harbor-weekend").expect("seed found");

        assert_eq!(seed.name(), "harbor-weekend");
        assert_eq!(seed.seed(), 404);
        assert_eq!(seed.place_count(), 4);
    }
}
