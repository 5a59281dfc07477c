//! Release dates and event windows
//!
//! - `TimeSource` - where "now" comes from when filtering unreleased entities
//! - `EventWindow` - a half-open `[start, end)` span of calendar time
//! - `from_unix` - conversion of the dump's unix-second timestamps

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Days in a weekly event
pub const WEEK_DAYS: i64 = 7;

/// Length of a weekly event
pub fn week() -> Duration {
    Duration::days(WEEK_DAYS)
}

/// Source of the current time
pub trait TimeSource: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTime;

impl TimeSource for SystemTime {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedTime(pub DateTime<Utc>);

impl TimeSource for FixedTime {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Convert unix seconds to a UTC timestamp
pub fn from_unix(secs: i64) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(secs, 0)
}

/// A span of time an event runs for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl EventWindow {
    /// Create a window; an inverted range is clamped to zero length
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end: end.max(start),
        }
    }

    /// A seven day window starting at `start`
    pub fn week_from(start: DateTime<Utc>) -> Self {
        Self::new(start, start + week())
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn is_weekly(&self) -> bool {
        self.duration() == week()
    }

    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

impl fmt::Display for EventWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}
