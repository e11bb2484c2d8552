//! Daily scan window (`HH:MM-HH:MM`).

use chrono::{NaiveTime, Timelike};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error type for scan window parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("invalid scan window '{0}': expected HH:MM-HH:MM")]
    InvalidFormat(String),
    #[error("invalid time of day '{0}'")]
    InvalidTime(String),
}

/// The daily interval during which probing is permitted.
///
/// Both bounds are inclusive, at minute resolution: `09:00-17:00` is open
/// from 09:00:00 through 17:00:59. Only the time of day is compared. A window
/// whose start is after its end never opens; overnight windows are not wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanWindow {
    start: NaiveTime,
    end: NaiveTime,
}

impl ScanWindow {
    /// Create a window from two times of day.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self { start, end }
    }

    /// A window covering the whole day, `00:00-23:59`.
    pub fn always() -> Self {
        Self {
            start: NaiveTime::default(),
            end: NaiveTime::from_hms_opt(23, 59, 0).unwrap_or_default(),
        }
    }

    pub fn start(&self) -> NaiveTime {
        self.start
    }

    pub fn end(&self) -> NaiveTime {
        self.end
    }

    /// Whether `now` lies inside the window, bounds included.
    pub fn contains(&self, now: NaiveTime) -> bool {
        let minute = now.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(now);
        self.start <= minute && minute <= self.end
    }

    /// True when start is after end, so the window can never open.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

impl Default for ScanWindow {
    fn default() -> Self {
        Self::always()
    }
}

impl FromStr for ScanWindow {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (start, end) = s
            .split_once('-')
            .ok_or_else(|| WindowError::InvalidFormat(s.to_string()))?;
        Ok(Self::new(parse_time(start)?, parse_time(end)?))
    }
}

impl fmt::Display for ScanWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}-{:02}:{:02}",
            self.start.hour(),
            self.start.minute(),
            self.end.hour(),
            self.end.minute()
        )
    }
}

impl Serialize for ScanWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

fn parse_time(s: &str) -> Result<NaiveTime, WindowError> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M").map_err(|_| WindowError::InvalidTime(s.to_string()))
}
