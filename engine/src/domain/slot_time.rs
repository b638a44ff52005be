//! Minute-granularity calendar slot times.
//!
//! Scheduled visits are keyed by composite `"YYYY-MM-DD HH:MM"` values: the
//! calendar date and the wall-clock minute joined by a single space. This
//! module owns parsing, splitting, snapping, shifting, and duration
//! formatting for those composites. All functions are pure; malformed input
//! yields a [`TimeError`], never a panic.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced by slot-time parsing and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeError {
    /// The input was not a `"YYYY-MM-DD HH:MM"` composite.
    #[error("expected 'YYYY-MM-DD HH:MM' datetime, got '{value}'")]
    MalformedDateTime {
        /// The rejected input.
        value: String,
    },

    /// The input was not an `"HH:MM"` pair of base-10 integers.
    #[error("expected 'HH:MM' time, got '{value}'")]
    MalformedTime {
        /// The rejected input.
        value: String,
    },

    /// The hours/minutes pair does not name a wall-clock time.
    #[error("{hours:02}:{minutes:02} is not a valid time of day")]
    InvalidTimeOfDay {
        /// Hour component.
        hours: u32,
        /// Minute component.
        minutes: u32,
    },

    /// Shifting left the range of representable datetimes.
    #[error("datetime arithmetic left the supported range")]
    OutOfRange,

    /// A duration was requested for an end that precedes its start.
    #[error("end must not precede start")]
    EndBeforeStart,
}

impl TimeError {
    /// Build a [`TimeError::MalformedDateTime`] from the rejected input.
    pub fn malformed_date_time(value: impl Into<String>) -> Self {
        Self::MalformedDateTime {
            value: value.into(),
        }
    }

    /// Build a [`TimeError::MalformedTime`] from the rejected input.
    pub fn malformed_time(value: impl Into<String>) -> Self {
        Self::MalformedTime {
            value: value.into(),
        }
    }
}

/// Snapping granularity for calendar slots.
///
/// The calendar widget renders quarter- or half-hour rows; user-entered
/// times are floored onto that grid before they reach a stop record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SnapIncrement {
    /// Fifteen-minute rows.
    Quarter,
    /// Thirty-minute rows.
    #[default]
    Half,
}

impl SnapIncrement {
    /// Width of one calendar row in minutes.
    pub const fn minutes(self) -> u32 {
        match self {
            Self::Quarter => 15,
            Self::Half => 30,
        }
    }
}

/// A calendar slot time with minute precision.
///
/// ## Invariants
/// - The wrapped datetime always carries zero seconds; parsing truncates a
///   trailing `:SS` (record stores round-trip `HH:MM:SS`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime(NaiveDateTime);

impl SlotTime {
    /// Parse a `"YYYY-MM-DD HH:MM"` composite.
    ///
    /// A trailing seconds component (`HH:MM:SS`) is accepted and truncated.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::MalformedDateTime`] when the input does not
    /// split into a calendar date and a wall-clock time.
    pub fn parse(value: impl AsRef<str>) -> Result<Self, TimeError> {
        let raw = value.as_ref();
        let (date_text, time_text) = split_composite(raw)?;

        let date = NaiveDate::parse_from_str(date_text, "%Y-%m-%d")
            .map_err(|_| TimeError::malformed_date_time(raw))?;
        let time = NaiveTime::parse_from_str(time_text, "%H:%M:%S")
            .or_else(|_| NaiveTime::parse_from_str(time_text, "%H:%M"))
            .map_err(|_| TimeError::malformed_date_time(raw))?;

        Self::from_date_time(date, time.hour(), time.minute())
    }

    /// Build a slot time from a date and a wall-clock hours/minutes pair.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::InvalidTimeOfDay`] when the pair does not name a
    /// time of day.
    pub fn from_date_time(date: NaiveDate, hours: u32, minutes: u32) -> Result<Self, TimeError> {
        NaiveTime::from_hms_opt(hours, minutes, 0)
            .map(|time| Self(date.and_time(time)))
            .ok_or(TimeError::InvalidTimeOfDay { hours, minutes })
    }

    /// The calendar date half of the composite.
    pub const fn date(&self) -> NaiveDate {
        self.0.date()
    }

    /// The `"HH:MM"` half of the composite.
    pub fn time_text(&self) -> String {
        self.0.format("%H:%M").to_string()
    }

    /// Shift by a signed hours/minutes delta, rolling over day, month, and
    /// year boundaries as needed.
    ///
    /// The delta is not required to be normalized: `(0, 90)` and `(1, 30)`
    /// shift by the same amount, and either component may be negative.
    ///
    /// # Errors
    ///
    /// Returns [`TimeError::OutOfRange`] when the result cannot be
    /// represented.
    pub fn shift(&self, hours: i64, minutes: i64) -> Result<Self, TimeError> {
        let total_minutes = hours
            .checked_mul(60)
            .and_then(|h| h.checked_add(minutes))
            .ok_or(TimeError::OutOfRange)?;
        let delta = TimeDelta::try_minutes(total_minutes).ok_or(TimeError::OutOfRange)?;

        self.0
            .checked_add_signed(delta)
            .map(Self)
            .ok_or(TimeError::OutOfRange)
    }

    /// Floor the minute component onto the snapping grid.
    ///
    /// `10:47` floors to `10:30` on half-hour rows and to `10:45` on
    /// quarter-hour rows; a value already on the grid is unchanged.
    pub fn floor_to(&self, increment: SnapIncrement) -> Self {
        let minute = self.0.minute();
        let floored = minute - (minute % increment.minutes());

        // `floored` never exceeds the original minute, so this stays in range.
        self.0.with_minute(floored).map_or(*self, Self)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d %H:%M"))
    }
}

impl From<SlotTime> for String {
    fn from(value: SlotTime) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for SlotTime {
    type Error = TimeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

/// Split a composite into its date and time halves on the single space
/// separator.
///
/// # Errors
///
/// Returns [`TimeError::MalformedDateTime`] when the separator is absent or
/// either half is empty.
pub fn split_composite(value: &str) -> Result<(&str, &str), TimeError> {
    match value.split_once(' ') {
        Some((date, time)) if !date.is_empty() && !time.is_empty() && !time.contains(' ') => {
            Ok((date, time))
        }
        _ => Err(TimeError::malformed_date_time(value)),
    }
}

/// Extract the hours and minutes components of an `"HH:MM"` value.
///
/// Both components must be base-10 integers. The minutes component is
/// deliberately not range-checked: duration fields such as `"01:90"` are
/// legal and normalize when applied through [`SlotTime::shift`].
///
/// # Errors
///
/// Returns [`TimeError::MalformedTime`] when the separator is absent or a
/// component fails to parse.
pub fn extract_hours_minutes(value: &str) -> Result<(u32, u32), TimeError> {
    let (hours_text, minutes_text) = value
        .split_once(':')
        .ok_or_else(|| TimeError::malformed_time(value))?;

    let hours = hours_text
        .parse::<u32>()
        .map_err(|_| TimeError::malformed_time(value))?;
    let minutes = minutes_text
        .parse::<u32>()
        .map_err(|_| TimeError::malformed_time(value))?;

    Ok((hours, minutes))
}

/// Format the whole-minute span between two slot times as zero-padded
/// `"HH:MM"`.
///
/// Spans longer than a day keep accumulating hours (`"25:30"`).
///
/// # Errors
///
/// Returns [`TimeError::EndBeforeStart`] when `end` precedes `start`.
/// Callers that uphold the end-after-start stop invariant never observe it.
pub fn duration_between(start: &SlotTime, end: &SlotTime) -> Result<String, TimeError> {
    let span = end.0.signed_duration_since(start.0);
    if span < TimeDelta::zero() {
        return Err(TimeError::EndBeforeStart);
    }

    let total_minutes = span.num_minutes();
    Ok(format!(
        "{:02}:{:02}",
        total_minutes / 60,
        total_minutes % 60
    ))
}
