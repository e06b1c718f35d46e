//! Sunrise and sunset as minutes of the local day.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate, Utc};
use sunrise::{Coordinates, DawnType, SolarDay, SolarEvent};

use super::{Location, Twilight};
use crate::core::period::{SunWindow, TimeOfDay};

/// Compute the sun window for `date` at `location`.
///
/// Both events are converted to the location's zone and truncated to the
/// minute. The window must satisfy `sunrise < sunset` on `date` itself.
pub fn sun_window(date: NaiveDate, location: &Location) -> Result<SunWindow> {
    let coordinates = Coordinates::new(location.latitude, location.longitude).ok_or_else(|| {
        anyhow::anyhow!(
            "Invalid coordinates: lat={:.4}, lon={:.4}",
            location.latitude,
            location.longitude
        )
    })?;

    let (rise_event, set_event) = match location.twilight {
        Twilight::Civil => (
            SolarEvent::Dawn(DawnType::Civil),
            SolarEvent::Dusk(DawnType::Civil),
        ),
        Twilight::Official => (SolarEvent::Sunrise, SolarEvent::Sunset),
    };

    let solar_day = SolarDay::new(coordinates, date);
    let sunrise_utc = solar_day.event_time(rise_event);
    let sunset_utc = solar_day.event_time(set_event);

    window_from_events(date, sunrise_utc, sunset_utc, location).with_context(|| {
        format!(
            "No usable sun window on {date} at lat={:.4}, lon={:.4}",
            location.latitude, location.longitude
        )
    })
}

/// Convert two UTC event instants into a same-day window.
///
/// Near the poles the solar equations have no solution and the events land on
/// unrelated dates; those and midnight-crossing windows are rejected.
pub(crate) fn window_from_events(
    date: NaiveDate,
    sunrise_utc: DateTime<Utc>,
    sunset_utc: DateTime<Utc>,
    location: &Location,
) -> Result<SunWindow> {
    let sunrise = local_minute(date, sunrise_utc, location).context("Sunrise")?;
    let sunset = local_minute(date, sunset_utc, location).context("Sunset")?;

    if sunrise >= sunset {
        anyhow::bail!("sunrise {sunrise} is not before sunset {sunset}");
    }
    Ok(SunWindow::new(sunrise, sunset))
}

fn local_minute(date: NaiveDate, event: DateTime<Utc>, location: &Location) -> Result<TimeOfDay> {
    let (event_date, minute) = match location.timezone {
        Some(tz) => {
            let local = event.with_timezone(&tz);
            (local.date_naive(), TimeOfDay::from_time(local.time()))
        }
        None => {
            let local = event.with_timezone(&Local);
            (local.date_naive(), TimeOfDay::from_time(local.time()))
        }
    };

    if event_date != date {
        anyhow::bail!("event falls on {event_date}, not {date} (polar day or night?)");
    }
    Ok(minute)
}
