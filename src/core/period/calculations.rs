//! Piecewise-linear ramp functions for brightness and color temperature.
//!
//! Both quantities follow the same trapezoid over a day: floor before the
//! window opens, a linear rise right after it opens, a plateau, a linear fall
//! right before it closes, and the floor again afterwards.
//!
//! ```text
//!  max ┤        ┌───────────────────┐
//!      │       ╱                     ╲
//!  min ┼──────┘                       └──────
//!           start  +ramp       -ramp   end
//! ```
//!
//! Window bounds are plain minute counts rather than [`TimeOfDay`] values
//! because the morning ramp uses a synthetic window that closes at 24:00.
//!
//! [`TimeOfDay`]: super::TimeOfDay

use crate::core::schedule::Schedule;

/// A linear ramp between two levels over a fixed number of minutes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ramp {
    pub min: f64,
    pub max: f64,
    pub minutes: u32,
}

impl Ramp {
    pub fn new(min: f64, max: f64, minutes: u32) -> Self {
        Self { min, max, minutes }
    }

    /// Evaluate the trapezoid at minute `t` for the window `[start, end]`.
    ///
    /// Conditions are checked in a fixed order and the first one that holds
    /// decides the value. When the window is shorter than two ramps, the rise
    /// and the fall overlap and the rise wins, because it is checked first.
    /// A window with `start >= end` yields `min` everywhere.
    pub fn value_at(&self, t: u32, start: u32, end: u32) -> f64 {
        let (t, start, end) = (i64::from(t), i64::from(start), i64::from(end));
        let ramp = i64::from(self.minutes.max(1));

        if t <= start || t >= end {
            return self.min;
        }

        // Scale before dividing so the ramp ends land exactly on min/max
        let span = self.max - self.min;
        let ramp_f = ramp as f64;

        if t <= start + ramp {
            let x = (t - start) as f64;
            return self.min + span * x / ramp_f;
        }

        if t >= end - ramp {
            let x = (ramp - (end - t)) as f64;
            return self.max - span * x / ramp_f;
        }

        self.max
    }
}

/// Brightness at minute `t` for the window `[sunrise, sunset]`.
pub fn ramp_brightness(schedule: &Schedule, t: u32, sunrise: u32, sunset: u32) -> f64 {
    schedule.brightness_ramp().value_at(t, sunrise, sunset)
}

/// Color temperature at minute `t` for the window `[sunrise, sunset]`.
pub fn ramp_color_temperature(schedule: &Schedule, t: u32, sunrise: u32, sunset: u32) -> f64 {
    schedule.color_ramp().value_at(t, sunrise, sunset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants::test_constants::{TEST_SUNRISE, TEST_SUNSET};

    fn brightness(t: u32) -> f64 {
        ramp_brightness(&Schedule::default(), t, TEST_SUNRISE, TEST_SUNSET)
    }

    fn temperature(t: u32) -> f64 {
        ramp_color_temperature(&Schedule::default(), t, TEST_SUNRISE, TEST_SUNSET)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_brightness_floor_outside_window() {
        assert_eq!(brightness(0), 1.0);
        assert_eq!(brightness(TEST_SUNRISE), 1.0);
        assert_eq!(brightness(TEST_SUNSET), 1.0);
        assert_eq!(brightness(1439), 1.0);
    }

    #[test]
    fn test_brightness_rise_after_sunrise() {
        // 06:35, five minutes into the rise
        let expected = 1.0 + (255.0 - 1.0) / 30.0 * 5.0;
        assert_close(brightness(395), expected);
        assert!((brightness(395) - 43.333).abs() < 0.001);
        assert_eq!(brightness(TEST_SUNRISE + 30), 255.0);
    }

    #[test]
    fn test_brightness_plateau_and_fall() {
        assert_eq!(brightness(720), 255.0);
        assert_eq!(brightness(TEST_SUNSET - 30), 255.0);

        // 20:15, halfway down
        let expected = 255.0 - (255.0 - 1.0) / 30.0 * 15.0;
        assert_close(brightness(TEST_SUNSET - 15), expected);
    }

    #[test]
    fn test_color_temperature_shape() {
        assert_eq!(temperature(TEST_SUNRISE), 2000.0);
        assert_close(temperature(TEST_SUNRISE + 15), 3750.0);
        assert_eq!(temperature(TEST_SUNRISE + 30), 5500.0);
        assert_eq!(temperature(900), 5500.0);
        assert_close(temperature(TEST_SUNSET - 15), 3750.0);
        assert_eq!(temperature(TEST_SUNSET), 2000.0);
    }

    #[test]
    fn test_overlapping_ramps_prefer_rise() {
        let ramp = Ramp::new(0.0, 100.0, 30);
        // 40-minute window: rise covers 10..=40, fall covers 20..50
        assert_close(ramp.value_at(30, 10, 50), 200.0 / 3.0);
        // Past the rise, the fall takes over
        assert_close(ramp.value_at(45, 10, 50), 100.0 - 100.0 / 30.0 * 25.0);
    }

    #[test]
    fn test_inverted_window_is_floor() {
        let ramp = Ramp::new(1.0, 255.0, 30);
        for t in [0, 500, 700, 900, 1439] {
            assert_eq!(ramp.value_at(t, 900, 500), 1.0);
        }
    }

    #[test]
    fn test_synthetic_morning_window_reaches_midnight() {
        let ramp = Ramp::new(1.0, 255.0, 30);
        assert_eq!(ramp.value_at(390, 390, 24 * 60), 1.0);
        assert_eq!(ramp.value_at(420, 390, 24 * 60), 255.0);
        // A window closing at 24:00 never starts falling before 23:30
        assert_eq!(ramp.value_at(1409, 390, 24 * 60), 255.0);
    }
}
