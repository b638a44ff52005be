//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! This module follows the hexagonal architecture pattern, providing
//! concrete implementations of domain port traits:
//!
//! - **places**: HTTP adapter for the external places provider
//! - **json_store**: durable place storage as JSON files under a
//!   capability-scoped directory
//! - **memory_store**: process-memory place storage for sessions and tests
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod json_store;
pub mod memory_store;
pub mod places;

pub use json_store::JsonFilePlaceStore;
pub use memory_store::MemoryPlaceStore;
pub use places::{DEFAULT_PLACES_ENDPOINT, HttpPlaceSource, PlacesClientError};
