//! Forecast cycles and the frames selected from them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A forecast model run, identified by its Unix start time in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cycle(i64);

impl Cycle {
    pub fn from_unix(secs: i64) -> Self {
        Self(secs)
    }

    pub fn unix(self) -> i64 {
        self.0
    }

    /// Start time of the run in UTC.
    pub fn start_time(self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.0, 0).single()
    }

    /// Hour of day (UTC) the run started.
    pub fn hour_utc(self) -> Option<u32> {
        self.start_time().map(|t| t.hour())
    }
}

impl FromStr for Cycle {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(Self)
    }
}

impl fmt::Display for Cycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single forecast image for one lead time within a cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Where the image bytes are fetched from.
    pub url: String,

    /// Valid time of the forecast image.
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_parse_and_hour() {
        let cycle: Cycle = "1675425600".parse().unwrap();
        assert_eq!(cycle.unix(), 1_675_425_600);
        assert_eq!(cycle.hour_utc(), Some(12));
        assert_eq!(cycle.to_string(), "1675425600");
    }

    #[test]
    fn test_cycle_rejects_garbage() {
        assert!("24fs".parse::<Cycle>().is_err());
        assert!("".parse::<Cycle>().is_err());
    }
}
