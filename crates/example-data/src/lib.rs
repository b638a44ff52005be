//! Deterministic example place and trip data generation for demonstration
//! purposes.
//!
//! This crate provides tools for generating believable, reproducible place
//! and trip data from a landmark registry. It is designed to be independent
//! of engine domain types to avoid circular dependencies.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Parsing landmark registries from JSON, with an embedded New York City
//!   registry for zero-configuration demos
//! - Deterministic place generation using named seeds
//! - A demo trip with favourite places and pre-scheduled stops
//!
//! # Example
//!
//! ```
//! use example_data::{PlaceRegistry, generate_demo_trip, generate_example_places};
//!
//! let registry = PlaceRegistry::builtin().expect("valid registry");
//! let seed_def = registry.find_seed("manhattan-week").expect("seed exists");
//!
//! let places = generate_example_places(&registry, seed_def).expect("generation succeeds");
//! let trip = generate_demo_trip(&registry, seed_def).expect("generation succeeds");
//!
//! assert_eq!(places.len(), seed_def.place_count());
//! assert_eq!(trip.stops.len(), trip.favorite_place_ids.len());
//! ```

mod error;
mod generator;
mod registry;
mod seed;

pub use error::{GenerationError, RegistryError};
pub use generator::{generate_demo_trip, generate_example_places};
pub use registry::{Landmark, PlaceRegistry, SeedDefinition};
pub use seed::{ExamplePlace, ExampleStop, ExampleTrip};
