//! Phase classification and target computation.
//!
//! Every tick maps the current minute of the day and the sun window onto one
//! of three phases and a single [`LightTarget`]. Nothing is remembered
//! between ticks: the phase is recomputed from scratch each time.
//!
//! ## Phases
//! - **Night** `[night_start, morning_start - morning_ramp)`: warmest and
//!   dimmest, regardless of the sun.
//! - **MorningTransition** `[morning_start - morning_ramp, morning_start]`:
//!   a forced ramp over a synthetic window that opens at the start of the
//!   ramp and closes at 24:00, so the lights are fully up by `morning_start`
//!   even when the real sunrise is later.
//! - **Day** (everything else): color follows the real sun window; the
//!   brightness target is the ceiling and dimming is left to the hint policy.

pub mod calculations;

pub use calculations::{Ramp, ramp_brightness, ramp_color_temperature};

use anyhow::{Context, Result};
use chrono::{NaiveTime, Timelike};
use std::fmt;

use crate::common::constants::MINUTES_PER_DAY;
use crate::core::schedule::Schedule;

/// Minutes since local midnight, always in `[0, 1440)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u32);

impl TimeOfDay {
    /// Build from a minute count, rejecting values past 23:59.
    pub fn from_minutes(minutes: u32) -> Option<Self> {
        (minutes < MINUTES_PER_DAY).then_some(Self(minutes))
    }

    /// Build from an hour and minute, wrapping past midnight.
    pub fn from_hm(hour: u32, minute: u32) -> Self {
        Self((hour * 60 + minute) % MINUTES_PER_DAY)
    }

    /// Truncate a wall-clock time to the minute.
    pub fn from_time(time: NaiveTime) -> Self {
        Self::from_hm(time.hour(), time.minute())
    }

    /// Parse `HH:MM`.
    pub fn parse(value: &str) -> Result<Self> {
        let time = NaiveTime::parse_from_str(value.trim(), "%H:%M")
            .with_context(|| format!("'{value}' is not a valid HH:MM time"))?;
        Ok(Self::from_time(time))
    }

    pub fn minutes(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Sunrise and sunset for one calendar day at the configured location.
///
/// Normally `sunrise < sunset`. A degenerate window is not rejected here:
/// the ramp functions treat it as "floor all day".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunWindow {
    pub sunrise: TimeOfDay,
    pub sunset: TimeOfDay,
}

impl SunWindow {
    pub fn new(sunrise: TimeOfDay, sunset: TimeOfDay) -> Self {
        Self { sunrise, sunset }
    }

    /// True when the rise and fall ramps cannot both complete inside the window.
    pub fn is_degenerate(&self, schedule: &Schedule) -> bool {
        let longest_ramp = schedule
            .brightness_ramp_minutes
            .max(schedule.color_ramp_minutes);
        self.sunset.minutes() <= self.sunrise.minutes()
            || self.sunset.minutes() - self.sunrise.minutes() <= 2 * longest_ramp
    }
}

/// Desired device state for one tick, not tied to any device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightTarget {
    /// Dimmer level in `[min_brightness, max_brightness]`.
    pub brightness: f64,
    /// Kelvin in `[min_color_temp, max_color_temp]`.
    pub color_temperature: f64,
}

/// Mutually exclusive classification of a minute of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Night,
    MorningTransition,
    Day,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl Phase {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Night => "Night",
            Self::MorningTransition => "Morning",
            Self::Day => "Day",
        }
    }
}

/// Classify `now`. First match wins: Night, then MorningTransition, then Day.
pub fn classify_phase(now: TimeOfDay, schedule: &Schedule) -> Phase {
    let t = now.minutes();
    let ramp_start = schedule.morning_ramp_start();

    if t >= schedule.night_start.minutes() && t < ramp_start {
        Phase::Night
    } else if t >= ramp_start && t <= schedule.morning_start.minutes() {
        Phase::MorningTransition
    } else {
        Phase::Day
    }
}

/// Compute the target for `now` in the given phase.
pub fn compute_target(
    phase: Phase,
    now: TimeOfDay,
    window: SunWindow,
    schedule: &Schedule,
) -> LightTarget {
    let t = now.minutes();
    match phase {
        Phase::Night => LightTarget {
            brightness: schedule.min_brightness,
            color_temperature: schedule.min_color_temp,
        },
        Phase::MorningTransition => {
            let start = schedule.morning_ramp_start();
            LightTarget {
                brightness: ramp_brightness(schedule, t, start, MINUTES_PER_DAY),
                color_temperature: ramp_color_temperature(schedule, t, start, MINUTES_PER_DAY),
            }
        }
        Phase::Day => LightTarget {
            brightness: schedule.max_brightness,
            color_temperature: ramp_color_temperature(
                schedule,
                t,
                window.sunrise.minutes(),
                window.sunset.minutes(),
            ),
        },
    }
}

/// The device-independent outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub now: TimeOfDay,
    pub window: SunWindow,
    pub phase: Phase,
    pub target: LightTarget,
}

/// Classify `now` and compute its target in one step.
pub fn decide(now: TimeOfDay, window: SunWindow, schedule: &Schedule) -> Decision {
    let phase = classify_phase(now, schedule);
    Decision {
        now,
        window,
        phase,
        target: compute_target(phase, now, window, schedule),
    }
}

/// Announce the decision at the top of the tick output.
pub fn log_decision(decision: &Decision) {
    log_block_start!(
        "{} phase at {} (sunrise {}, sunset {})",
        decision.phase,
        decision.now,
        decision.window.sunrise,
        decision.window.sunset
    );
    log_indented!(
        "Target: {}% brightness, {}K",
        brightness_percent(decision.target.brightness),
        decision.target.color_temperature.round()
    );
}

/// Brightness as a percentage of the 255-step dimmer scale.
pub fn brightness_percent(level: f64) -> i64 {
    (100.0 * level / 255.0).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> SunWindow {
        SunWindow::new(TimeOfDay::from_hm(6, 30), TimeOfDay::from_hm(20, 30))
    }

    #[test]
    fn test_time_of_day_parsing_and_display() {
        assert_eq!(TimeOfDay::parse("07:00").unwrap().minutes(), 420);
        assert_eq!(TimeOfDay::parse(" 23:59 ").unwrap().minutes(), 1439);
        assert!(TimeOfDay::parse("24:00").is_err());
        assert!(TimeOfDay::parse("7am").is_err());
        assert_eq!(TimeOfDay::from_hm(6, 5).to_string(), "06:05");
        assert_eq!(TimeOfDay::from_minutes(1440), None);
        assert_eq!(TimeOfDay::from_minutes(0), Some(TimeOfDay::from_hm(0, 0)));
    }

    #[test]
    fn test_phase_boundaries() {
        let schedule = Schedule::default();
        let phase = |m| classify_phase(TimeOfDay::from_minutes(m).unwrap(), &schedule);

        // Before night_start it is still "day" in the classification sense
        assert_eq!(phase(30), Phase::Day);
        assert_eq!(phase(59), Phase::Day);
        // night_start is inclusive
        assert_eq!(phase(60), Phase::Night);
        assert_eq!(phase(389), Phase::Night);
        // morning ramp start is inclusive, morning_start is inclusive
        assert_eq!(phase(390), Phase::MorningTransition);
        assert_eq!(phase(420), Phase::MorningTransition);
        assert_eq!(phase(421), Phase::Day);
        assert_eq!(phase(1439), Phase::Day);
    }

    #[test]
    fn test_night_target_ignores_sun() {
        let schedule = Schedule::default();
        let now = TimeOfDay::from_hm(3, 0);
        let target = compute_target(Phase::Night, now, window(), &schedule);
        assert_eq!(target.brightness, 1.0);
        assert_eq!(target.color_temperature, 2000.0);
    }

    #[test]
    fn test_morning_target_uses_synthetic_window() {
        let schedule = Schedule::default();
        // A very late sunrise must not delay the morning ramp
        let late = SunWindow::new(TimeOfDay::from_hm(9, 0), TimeOfDay::from_hm(15, 0));

        let start = compute_target(
            Phase::MorningTransition,
            TimeOfDay::from_hm(6, 30),
            late,
            &schedule,
        );
        assert_eq!(start.brightness, 1.0);
        assert_eq!(start.color_temperature, 2000.0);

        let mid = compute_target(
            Phase::MorningTransition,
            TimeOfDay::from_hm(6, 45),
            late,
            &schedule,
        );
        assert_eq!(mid.brightness, 128.0);
        assert_eq!(mid.color_temperature, 3750.0);

        let end = compute_target(
            Phase::MorningTransition,
            TimeOfDay::from_hm(7, 0),
            late,
            &schedule,
        );
        assert_eq!(end.brightness, 255.0);
        assert_eq!(end.color_temperature, 5500.0);
    }

    #[test]
    fn test_day_target_brightness_is_ceiling() {
        let schedule = Schedule::default();
        // 20:15, in the evening ramp: color falls, brightness stays at the ceiling
        let decision = decide(TimeOfDay::from_hm(20, 15), window(), &schedule);
        assert_eq!(decision.phase, Phase::Day);
        assert_eq!(decision.target.brightness, 255.0);
        assert_eq!(decision.target.color_temperature, 3750.0);

        // After sunset but before night_start
        let late = decide(TimeOfDay::from_hm(23, 0), window(), &schedule);
        assert_eq!(late.phase, Phase::Day);
        assert_eq!(late.target.brightness, 255.0);
        assert_eq!(late.target.color_temperature, 2000.0);
    }

    #[test]
    fn test_degenerate_window_detection() {
        let schedule = Schedule::default();
        assert!(!window().is_degenerate(&schedule));
        let short = SunWindow::new(TimeOfDay::from_hm(11, 0), TimeOfDay::from_hm(11, 50));
        assert!(short.is_degenerate(&schedule));
        let inverted = SunWindow::new(TimeOfDay::from_hm(18, 0), TimeOfDay::from_hm(6, 0));
        assert!(inverted.is_degenerate(&schedule));
    }

    #[test]
    fn test_brightness_percent() {
        assert_eq!(brightness_percent(255.0), 100);
        assert_eq!(brightness_percent(1.0), 0);
        assert_eq!(brightness_percent(128.0), 50);
    }
}
