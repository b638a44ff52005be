//! Engine tuning knobs.
//!
//! Hosts construct these directly or deserialize them from their own
//! configuration layer. Defaults reproduce the observed product behaviour:
//! no cache eviction, half-hour calendar rows, one-hour new events, and a
//! 06:00 to 24:00 visible day.

use std::num::NonZeroUsize;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::slot_time::SnapIncrement;

/// Retention policy for the place cache.
///
/// Both knobs default to off: the cache then grows with the working set and
/// entries never expire, which matches a single planning session. Hosts
/// running long-lived processes opt into bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CachePolicy {
    max_entries: Option<NonZeroUsize>,
    time_to_live: Option<Duration>,
}

impl CachePolicy {
    /// Bound the resident set; the least recently used entry is evicted
    /// from memory once the bound is exceeded.
    #[must_use]
    pub const fn with_max_entries(mut self, max_entries: NonZeroUsize) -> Self {
        self.max_entries = Some(max_entries);
        self
    }

    /// Treat entries older than `time_to_live` as misses, pruning them from
    /// memory and the durable store when observed.
    #[must_use]
    pub const fn with_time_to_live(mut self, time_to_live: Duration) -> Self {
        self.time_to_live = Some(time_to_live);
        self
    }

    /// Resident-set bound, when configured.
    pub const fn max_entries(&self) -> Option<NonZeroUsize> {
        self.max_entries
    }

    /// Entry lifetime, when configured.
    pub const fn time_to_live(&self) -> Option<Duration> {
        self.time_to_live
    }
}

/// Calendar behaviour shared by the scheduler and its host widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchedulerConfig {
    /// Snapping grid for user-entered times.
    pub snap: SnapIncrement,
    /// Hours component of the span given to a freshly opened slot.
    pub default_duration_hours: u32,
    /// Minutes component of the span given to a freshly opened slot.
    pub default_duration_minutes: u32,
    /// First visible calendar minute, counted from midnight. Display
    /// guidance for the widget; the engine does not enforce it.
    pub day_start_minute: u32,
    /// End of the visible calendar in minutes from midnight (1440 shows
    /// through the end of the day). Display guidance, not enforced.
    pub day_end_minute: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            snap: SnapIncrement::Half,
            default_duration_hours: 1,
            default_duration_minutes: 0,
            day_start_minute: 6 * 60,
            day_end_minute: 24 * 60,
        }
    }
}
