//! Domain model and services for place resolution and trip scheduling.
//!
//! Purpose: Define the strongly typed records the engine trades in and the
//! services that keep them consistent across the place provider, the
//! durable cache, the record store, and the host's calendar and URL
//! surfaces. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - `PlaceRecord`, `PlaceId`, `CachedPlace` — resolved place data.
//! - `TripRecord`, `StopRecord`, `EventDraft` — trip scheduling data.
//! - `SlotTime`, `SnapIncrement` — minute-precision calendar arithmetic.
//! - `PlaceCache`, `PlaceResolver`, `BatchLoader` — the resolution path.
//! - `SelectionSync`, `SchedulerService`, `FavoritesService` — the
//!   interaction services hosts drive.
//! - `ports` — the driven-side traits hosts implement.

pub mod batch_loader;
pub mod config;
pub mod favorites;
pub mod place;
pub mod place_cache;
pub mod place_resolver;
pub mod ports;
pub mod scheduler;
pub mod selection;
pub mod slot_time;
pub mod stop;
pub mod trip;

pub use self::batch_loader::BatchLoader;
pub use self::config::{CachePolicy, SchedulerConfig};
pub use self::favorites::{FavoritesError, FavoritesService};
pub use self::place::{CachedPlace, PlaceId, PlaceRecord, PlaceValidationError, SourcePlace};
pub use self::place_cache::PlaceCache;
pub use self::place_resolver::{PlaceResolver, ResolveError};
pub use self::scheduler::{DEFAULT_EVENT_TITLE, DraftState, SchedulerError, SchedulerService};
pub use self::selection::{NavigationOutcome, SelectionState, SelectionSync};
pub use self::slot_time::{SlotTime, SnapIncrement, TimeError};
pub use self::stop::{EventDraft, StopId, StopRecord, StopValidationError};
pub use self::trip::{DateRange, TripId, TripRecord, TripValidationError};
