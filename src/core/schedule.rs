//! The immutable schedule that drives every engine function.
//!
//! A `Schedule` is resolved once from the validated [`Config`] at process
//! start and then passed by reference into phase classification, ramp
//! evaluation and the update policy. Nothing in the engine reads globals,
//! so tests can build schedules with whatever boundaries they need.

use anyhow::{Context, Result};

use crate::backend::Rgb;
use crate::common::constants::*;
use crate::config::Config;
use crate::core::period::TimeOfDay;
use crate::core::period::calculations::Ramp;

/// How the Day phase writes color temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorStrategy {
    /// Always write the ramp value.
    Set,
    /// Only write when the device is cooler than the ramp value.
    Hint,
}

impl ColorStrategy {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "set" => Some(Self::Set),
            "hint" => Some(Self::Hint),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Set => "set",
            Self::Hint => "hint",
        }
    }
}

/// Fixed boundaries and ranges for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule {
    pub min_color_temp: f64,
    pub max_color_temp: f64,
    pub color_ramp_minutes: u32,
    pub min_brightness: f64,
    pub max_brightness: f64,
    pub brightness_ramp_minutes: u32,
    /// End of the forced pre-dawn ramp.
    pub morning_start: TimeOfDay,
    /// Length of the forced pre-dawn ramp that ends at `morning_start`.
    pub morning_ramp_minutes: u32,
    pub night_start: TimeOfDay,
    /// Color sent to color-capable devices during the night.
    pub night_rgb: Rgb,
    pub day_color_strategy: ColorStrategy,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            min_color_temp: f64::from(DEFAULT_MIN_COLOR_TEMP),
            max_color_temp: f64::from(DEFAULT_MAX_COLOR_TEMP),
            color_ramp_minutes: DEFAULT_COLOR_RAMP_MINUTES,
            min_brightness: f64::from(DEFAULT_MIN_BRIGHTNESS),
            max_brightness: f64::from(DEFAULT_MAX_BRIGHTNESS),
            brightness_ramp_minutes: DEFAULT_BRIGHTNESS_RAMP_MINUTES,
            morning_start: TimeOfDay::from_hm(7, 0),
            morning_ramp_minutes: DEFAULT_MORNING_RAMP_MINUTES,
            night_start: TimeOfDay::from_hm(1, 0),
            night_rgb: Rgb::from(DEFAULT_NIGHT_RGB),
            day_color_strategy: ColorStrategy::Set,
        }
    }
}

impl Schedule {
    /// Resolve a schedule from a configuration that already passed validation.
    pub fn from_config(config: &Config) -> Result<Self> {
        let morning_start = TimeOfDay::parse(
            config
                .morning_start
                .as_deref()
                .unwrap_or(DEFAULT_MORNING_START),
        )
        .context("Invalid morning_start")?;
        let night_start = TimeOfDay::parse(
            config
                .night_start
                .as_deref()
                .unwrap_or(DEFAULT_NIGHT_START),
        )
        .context("Invalid night_start")?;

        let strategy_str = config
            .day_color_strategy
            .as_deref()
            .unwrap_or(DEFAULT_DAY_COLOR_STRATEGY);
        let day_color_strategy = ColorStrategy::parse(strategy_str).ok_or_else(|| {
            anyhow::anyhow!("day_color_strategy must be \"set\" or \"hint\" (got \"{strategy_str}\")")
        })?;

        Ok(Self {
            min_color_temp: f64::from(config.min_color_temp.unwrap_or(DEFAULT_MIN_COLOR_TEMP)),
            max_color_temp: f64::from(config.max_color_temp.unwrap_or(DEFAULT_MAX_COLOR_TEMP)),
            color_ramp_minutes: config
                .color_ramp_minutes
                .unwrap_or(DEFAULT_COLOR_RAMP_MINUTES),
            min_brightness: f64::from(config.min_brightness.unwrap_or(DEFAULT_MIN_BRIGHTNESS)),
            max_brightness: f64::from(config.max_brightness.unwrap_or(DEFAULT_MAX_BRIGHTNESS)),
            brightness_ramp_minutes: config
                .brightness_ramp_minutes
                .unwrap_or(DEFAULT_BRIGHTNESS_RAMP_MINUTES),
            morning_start,
            morning_ramp_minutes: config
                .morning_ramp_minutes
                .unwrap_or(DEFAULT_MORNING_RAMP_MINUTES),
            night_start,
            night_rgb: Rgb::from(config.night_rgb.unwrap_or(DEFAULT_NIGHT_RGB)),
            day_color_strategy,
        })
    }

    pub fn brightness_ramp(&self) -> Ramp {
        Ramp::new(
            self.min_brightness,
            self.max_brightness,
            self.brightness_ramp_minutes,
        )
    }

    pub fn color_ramp(&self) -> Ramp {
        Ramp::new(
            self.min_color_temp,
            self.max_color_temp,
            self.color_ramp_minutes,
        )
    }

    /// First minute of the forced pre-dawn ramp.
    pub fn morning_ramp_start(&self) -> u32 {
        self.morning_start
            .minutes()
            .saturating_sub(self.morning_ramp_minutes)
    }
}
