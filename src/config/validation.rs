//! Configuration validation functionality.
//!
//! Rejects values outside their hard limits and schedules whose phase
//! boundaries cannot be ordered.

use anyhow::{Context, Result};

use super::Config;
use crate::backend::{GatewayAddress, GatewayKind};
use crate::common::constants::*;
use crate::core::period::TimeOfDay;
use crate::core::schedule::ColorStrategy;
use crate::geo::Twilight;

/// Validate a whole configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_location(config)?;
    validate_gateway(config)?;
    validate_schedule(config)
}

fn validate_location(config: &Config) -> Result<()> {
    if let Some(lat) = config.latitude
        && !(-90.0..=90.0).contains(&lat)
    {
        anyhow::bail!("latitude must be between -90 and 90 degrees (got {})", lat);
    }

    if let Some(lon) = config.longitude
        && !(-180.0..=180.0).contains(&lon)
    {
        anyhow::bail!(
            "longitude must be between -180 and 180 degrees (got {})",
            lon
        );
    }

    if config.latitude.is_some() != config.longitude.is_some() {
        anyhow::bail!("latitude and longitude must be set together");
    }

    if let Some(name) = config.timezone.as_deref()
        && name.parse::<chrono_tz::Tz>().is_err()
    {
        anyhow::bail!("Unknown timezone '{}' (expected an IANA name like \"Europe/Stockholm\")", name);
    }

    if let Some(twilight) = config.twilight.as_deref()
        && Twilight::parse(twilight).is_none()
    {
        anyhow::bail!(
            "twilight must be \"civil\" or \"official\" (got \"{}\")",
            twilight
        );
    }

    Ok(())
}

fn validate_gateway(config: &Config) -> Result<()> {
    if let Some(kind) = config.gateway.as_deref()
        && GatewayKind::parse(kind).is_none()
    {
        anyhow::bail!("gateway must be \"socket\" or \"memory\" (got \"{}\")", kind);
    }

    if let Some(address) = config.gateway_address.as_deref() {
        GatewayAddress::parse(address).context("Invalid gateway_address")?;
    }

    if let Some(timeout) = config.gateway_timeout_ms
        && !(MINIMUM_GATEWAY_TIMEOUT_MS..=MAXIMUM_GATEWAY_TIMEOUT_MS).contains(&timeout)
    {
        anyhow::bail!(
            "gateway_timeout_ms ({} ms) must be between {} and {} milliseconds",
            timeout,
            MINIMUM_GATEWAY_TIMEOUT_MS,
            MAXIMUM_GATEWAY_TIMEOUT_MS
        );
    }

    Ok(())
}

fn validate_schedule(config: &Config) -> Result<()> {
    let min_temp = config.min_color_temp.unwrap_or(DEFAULT_MIN_COLOR_TEMP);
    let max_temp = config.max_color_temp.unwrap_or(DEFAULT_MAX_COLOR_TEMP);
    validate_range(min_temp, MINIMUM_TEMP, MAXIMUM_TEMP, "min_color_temp", "Kelvin")?;
    validate_range(max_temp, MINIMUM_TEMP, MAXIMUM_TEMP, "max_color_temp", "Kelvin")?;
    if min_temp >= max_temp {
        anyhow::bail!(
            "min_color_temp ({}) must be lower than max_color_temp ({})",
            min_temp,
            max_temp
        );
    }

    let min_brightness = config.min_brightness.unwrap_or(DEFAULT_MIN_BRIGHTNESS);
    let max_brightness = config.max_brightness.unwrap_or(DEFAULT_MAX_BRIGHTNESS);
    validate_range(
        min_brightness,
        MINIMUM_BRIGHTNESS,
        MAXIMUM_BRIGHTNESS,
        "min_brightness",
        "",
    )?;
    validate_range(
        max_brightness,
        MINIMUM_BRIGHTNESS,
        MAXIMUM_BRIGHTNESS,
        "max_brightness",
        "",
    )?;
    if min_brightness >= max_brightness {
        anyhow::bail!(
            "min_brightness ({}) must be lower than max_brightness ({})",
            min_brightness,
            max_brightness
        );
    }

    let color_ramp = config
        .color_ramp_minutes
        .unwrap_or(DEFAULT_COLOR_RAMP_MINUTES);
    let brightness_ramp = config
        .brightness_ramp_minutes
        .unwrap_or(DEFAULT_BRIGHTNESS_RAMP_MINUTES);
    let morning_ramp = config
        .morning_ramp_minutes
        .unwrap_or(DEFAULT_MORNING_RAMP_MINUTES);
    for (value, name) in [
        (color_ramp, "color_ramp_minutes"),
        (brightness_ramp, "brightness_ramp_minutes"),
        (morning_ramp, "morning_ramp_minutes"),
    ] {
        validate_range(
            value,
            MINIMUM_RAMP_MINUTES,
            MAXIMUM_RAMP_MINUTES,
            name,
            "minutes",
        )?;
    }

    let morning_start = TimeOfDay::parse(
        config
            .morning_start
            .as_deref()
            .unwrap_or(DEFAULT_MORNING_START),
    )
    .context("Invalid morning_start (expected HH:MM)")?;
    let night_start = TimeOfDay::parse(
        config
            .night_start
            .as_deref()
            .unwrap_or(DEFAULT_NIGHT_START),
    )
    .context("Invalid night_start (expected HH:MM)")?;

    validate_phase_order(night_start, morning_start, morning_ramp)?;

    if let Some(strategy) = config.day_color_strategy.as_deref()
        && ColorStrategy::parse(strategy).is_none()
    {
        anyhow::bail!(
            "day_color_strategy must be \"set\" or \"hint\" (got \"{}\")",
            strategy
        );
    }

    Ok(())
}

/// Night must end where the morning ramp begins, on the same day.
pub(crate) fn validate_phase_order(
    night_start: TimeOfDay,
    morning_start: TimeOfDay,
    morning_ramp_minutes: u32,
) -> Result<()> {
    if morning_ramp_minutes > morning_start.minutes() {
        anyhow::bail!(
            "morning_ramp_minutes ({}) would start the morning ramp before midnight (morning_start is {})",
            morning_ramp_minutes,
            morning_start
        );
    }

    let ramp_start = morning_start.minutes() - morning_ramp_minutes;
    if night_start.minutes() >= ramp_start {
        anyhow::bail!(
            "night_start ({}) must be before the morning ramp starts ({})",
            night_start,
            TimeOfDay::from_hm(0, ramp_start)
        );
    }

    Ok(())
}

fn validate_range(value: u32, min: u32, max: u32, name: &str, unit: &str) -> Result<()> {
    if !(min..=max).contains(&value) {
        let unit = if unit.is_empty() {
            String::new()
        } else {
            format!(" {unit}")
        };
        anyhow::bail!("{name} ({value}) must be between {min} and {max}{unit}");
    }
    Ok(())
}
