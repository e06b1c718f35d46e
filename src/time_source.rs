//! Time source abstraction for real and pinned clocks.
//!
//! A tick reads the clock exactly once. Normally that is the system clock;
//! with `--at` the whole process runs against a fixed instant instead, which
//! makes it possible to check what a tick *would* do at 06:45 without waiting
//! for 06:45.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone};
use chrono_tz::Tz;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Global time source instance, defaults to RealTimeSource
static TIME_SOURCE: OnceCell<Arc<dyn TimeSource>> = OnceCell::new();

/// Trait for abstracting time operations
pub trait TimeSource: Send + Sync {
    /// Get the current time
    fn now(&self) -> DateTime<Local>;

    /// Check if this is a pinned (non-wall-clock) source
    fn is_simulated(&self) -> bool;
}

/// Real-time implementation that uses actual system time
pub struct RealTimeSource;

impl TimeSource for RealTimeSource {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }

    fn is_simulated(&self) -> bool {
        false
    }
}

/// A clock that always reports the same instant.
pub struct FixedTimeSource {
    instant: DateTime<Local>,
}

impl FixedTimeSource {
    pub fn new(instant: DateTime<Local>) -> Self {
        Self { instant }
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> DateTime<Local> {
        self.instant
    }

    fn is_simulated(&self) -> bool {
        true
    }
}

/// Initialize the global time source (call once at startup, before logging)
pub fn init_time_source(source: Arc<dyn TimeSource>) {
    TIME_SOURCE.set(source).ok();
}

/// Check if the time source has been initialized
pub fn is_initialized() -> bool {
    TIME_SOURCE.get().is_some()
}

/// Get the current time from the global time source
pub fn now() -> DateTime<Local> {
    TIME_SOURCE.get_or_init(|| Arc::new(RealTimeSource)).now()
}

/// Check if we're running against a pinned clock
pub fn is_simulated() -> bool {
    TIME_SOURCE
        .get_or_init(|| Arc::new(RealTimeSource))
        .is_simulated()
}

/// Parse an `--at` value.
///
/// Accepts `YYYY-MM-DD HH:MM` or a bare `HH:MM`, which means that time on
/// `today`. The wall time is interpreted in `tz` when the location has an
/// explicit timezone, otherwise in the system timezone.
pub fn parse_at(s: &str, today: NaiveDate, tz: Option<Tz>) -> Result<DateTime<Local>> {
    let s = s.trim();
    let naive = match NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M") {
        Ok(naive) => naive,
        Err(_) => {
            let time = NaiveTime::parse_from_str(s, "%H:%M").with_context(|| {
                format!("Invalid time '{s}'. Use \"YYYY-MM-DD HH:MM\" or \"HH:MM\"")
            })?;
            today.and_time(time)
        }
    };

    match tz {
        Some(tz) => tz
            .from_local_datetime(&naive)
            .single()
            .map(|dt| dt.with_timezone(&Local))
            .ok_or_else(|| anyhow::anyhow!("Ambiguous or invalid time '{s}' in timezone {tz}")),
        None => Local
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(|| anyhow::anyhow!("Ambiguous or invalid local time '{s}'")),
    }
}
