//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Ports describe how the engine expects to interact with its
//! collaborators: the places provider, durable place storage, the record
//! store, the host's query-result cache, the calendar widget, and the
//! routing layer. Each trait exposes strongly typed errors so adapters map
//! their failures into predictable variants, ships a `Fixture*`
//! implementation for wiring without the real collaborator, and carries a
//! mockall automock for unit tests.

mod calendar_surface;
mod favorite_repository;
mod place_source;
mod place_store;
mod query_cache;
mod stop_repository;
mod trip_repository;
mod url_state;

#[cfg(test)]
pub use calendar_surface::MockCalendarSurface;
pub use calendar_surface::{CalendarSurface, FixtureCalendarSurface};
#[cfg(test)]
pub use favorite_repository::MockFavoriteRepository;
pub use favorite_repository::{
    FavoriteRepository, FavoriteRepositoryError, FixtureFavoriteRepository,
};
#[cfg(test)]
pub use place_source::MockPlaceSource;
pub use place_source::{
    DETAIL_FIELDS, FixturePlaceSource, PlaceField, PlaceSource, PlaceSourceError, SEARCH_FIELDS,
};
#[cfg(test)]
pub use place_store::MockPlaceStore;
pub use place_store::{FixturePlaceStore, PlaceStore, PlaceStoreError};
#[cfg(test)]
pub use query_cache::MockQueryCache;
pub use query_cache::{FixtureQueryCache, QueryCache, QueryCacheError, QueryKey};
#[cfg(test)]
pub use stop_repository::MockStopRepository;
pub use stop_repository::{FixtureStopRepository, StopRepository, StopRepositoryError};
#[cfg(test)]
pub use trip_repository::MockTripRepository;
pub use trip_repository::{FixtureTripRepository, TripRepository, TripRepositoryError};
#[cfg(test)]
pub use url_state::MockUrlState;
pub use url_state::{FixtureUrlState, RecordingUrlState, UrlState};
