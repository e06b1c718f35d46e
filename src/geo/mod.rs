//! Sun geometry for the configured location.
//!
//! ## Module Structure
//!
//! - [`solar`]: sunrise/sunset lookup through the `sunrise` crate, converted
//!   to minutes of the local day
//!
//! The lookup is pure per date and location. Anything that prevents a usable
//! window (bad coordinates, polar day or night, a window crossing midnight)
//! is an error and aborts the tick before any device is touched.

pub mod solar;

pub use solar::sun_window;

#[cfg(test)]
mod tests;

use chrono::{DateTime, Local, NaiveDate};
use chrono_tz::Tz;
use std::fmt;

use crate::core::period::TimeOfDay;

/// Which solar event marks the edges of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Twilight {
    /// Sun 6° below the horizon: dawn and dusk.
    Civil,
    /// Upper limb on the horizon: sunrise and sunset proper.
    Official,
}

impl Twilight {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "civil" => Some(Self::Civil),
            "official" => Some(Self::Official),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Civil => "civil",
            Self::Official => "official",
        }
    }
}

impl fmt::Display for Twilight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed observer position.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Zone the lamps live in; `None` means the system local zone.
    pub timezone: Option<Tz>,
    pub twilight: Twilight,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            timezone: None,
            twilight: Twilight::Civil,
        }
    }

    /// Calendar date and minute of the day of `now`, seen from this location.
    pub fn local_date_and_minute(&self, now: DateTime<Local>) -> (NaiveDate, TimeOfDay) {
        match self.timezone {
            Some(tz) => {
                let local = now.with_timezone(&tz);
                (local.date_naive(), TimeOfDay::from_time(local.time()))
            }
            None => (now.date_naive(), TimeOfDay::from_time(now.time())),
        }
    }

    /// Name of the zone used for display.
    pub fn timezone_name(&self) -> String {
        match self.timezone {
            Some(tz) => tz.to_string(),
            None => "system local".to_string(),
        }
    }
}
