//! Command-line command handlers for lampor.
//!
//! Each command lives in its own submodule. They share the same start-up:
//! load and validate the configuration, then resolve what the command needs
//! from it (location, schedule, gateway).

pub mod devices;
pub mod help;
pub mod preview;
pub mod run;
pub mod sun;

use anyhow::{Context, Result};
use chrono::NaiveDate;

use crate::config::Config;
use crate::core::schedule::Schedule;
use crate::geo::Location;

/// Configuration plus the pieces every sun-aware command needs.
pub(crate) struct Setup {
    pub config: Config,
    pub location: Location,
    pub schedule: Schedule,
}

impl Setup {
    pub fn load(debug_enabled: bool) -> Result<Self> {
        let config = Config::load()?;
        if debug_enabled {
            config.log_config();
        }
        let location = config.location()?;
        let schedule = config.schedule()?;
        Ok(Self {
            config,
            location,
            schedule,
        })
    }
}

/// Parse an optional `YYYY-MM-DD` argument, defaulting to today at `location`.
pub(crate) fn resolve_date(date: Option<&str>, location: &Location) -> Result<NaiveDate> {
    match date {
        Some(value) => NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{value}'. Use YYYY-MM-DD")),
        None => Ok(location
            .local_date_and_minute(crate::time_source::now())
            .0),
    }
}
