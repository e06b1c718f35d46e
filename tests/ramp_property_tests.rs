use lampor::backend::DeviceState;
use lampor::core::period::{
    Phase, TimeOfDay, classify_phase, ramp_brightness, ramp_color_temperature,
};
use lampor::core::policy::{hint_brightness_down, hint_color_down};
use lampor::core::schedule::Schedule;
use proptest::prelude::*;

/// Generate a minute of the day
fn minute_strategy() -> impl Strategy<Value = u32> {
    0u32..1440
}

/// Generate a sun window wide enough for both ramps of the default schedule
fn window_strategy() -> impl Strategy<Value = (u32, u32)> {
    (0u32..700).prop_flat_map(|sunrise| (Just(sunrise), (sunrise + 61)..1440))
}

/// Generate any ordered or inverted pair of minutes
fn any_window_strategy() -> impl Strategy<Value = (u32, u32)> {
    (minute_strategy(), minute_strategy())
}

/// Property tests for the brightness and color temperature trapezoids
#[cfg(test)]
mod ramp_tests {
    use super::*;

    proptest! {
        /// Values never leave the configured range, whatever the window
        #[test]
        fn test_ramps_stay_in_range(t in minute_strategy(), (sunrise, sunset) in any_window_strategy()) {
            let schedule = Schedule::default();
            let b = ramp_brightness(&schedule, t, sunrise, sunset);
            let k = ramp_color_temperature(&schedule, t, sunrise, sunset);
            prop_assert!((1.0..=255.0).contains(&b), "brightness {b}");
            prop_assert!((2000.0..=5500.0).contains(&k), "temperature {k}");
        }

        /// Outside the window both ramps sit on the floor
        #[test]
        fn test_floor_outside_window(t in minute_strategy(), (sunrise, sunset) in window_strategy()) {
            prop_assume!(t <= sunrise || t >= sunset);
            let schedule = Schedule::default();
            prop_assert_eq!(ramp_brightness(&schedule, t, sunrise, sunset), 1.0);
            prop_assert_eq!(ramp_color_temperature(&schedule, t, sunrise, sunset), 2000.0);
        }

        /// The rise starts at the floor and ends exactly at the ceiling
        #[test]
        fn test_ramp_endpoints((sunrise, sunset) in window_strategy()) {
            let schedule = Schedule::default();
            prop_assert_eq!(ramp_brightness(&schedule, sunrise, sunrise, sunset), 1.0);
            prop_assert_eq!(ramp_brightness(&schedule, sunrise + 30, sunrise, sunset), 255.0);
            prop_assert_eq!(ramp_brightness(&schedule, sunset - 30, sunrise, sunset), 255.0);
            prop_assert_eq!(ramp_color_temperature(&schedule, sunrise + 30, sunrise, sunset), 5500.0);
            prop_assert_eq!(ramp_color_temperature(&schedule, sunset - 30, sunrise, sunset), 5500.0);
        }

        /// Non-decreasing through the rise, non-increasing through the fall
        #[test]
        fn test_ramp_monotonicity((sunrise, sunset) in window_strategy(), step in 0u32..30) {
            let schedule = Schedule::default();
            let rise = |t| ramp_brightness(&schedule, t, sunrise, sunset);
            prop_assert!(rise(sunrise + step) <= rise(sunrise + step + 1));

            let fall = |t| ramp_color_temperature(&schedule, t, sunrise, sunset);
            prop_assert!(fall(sunset - 30 + step) >= fall(sunset - 30 + step + 1));
        }

        /// Same inputs, same outputs: nothing is remembered between calls
        #[test]
        fn test_ramps_are_pure(t in minute_strategy(), (sunrise, sunset) in any_window_strategy()) {
            let schedule = Schedule::default();
            prop_assert_eq!(
                ramp_brightness(&schedule, t, sunrise, sunset),
                ramp_brightness(&schedule, t, sunrise, sunset)
            );
        }
    }
}

/// Property tests for phase classification
#[cfg(test)]
mod phase_tests {
    use super::*;

    /// Generate schedules whose night ends before the morning ramp begins
    fn schedule_strategy() -> impl Strategy<Value = Schedule> {
        (61u32..900, 1u32..=60).prop_flat_map(|(morning_start, ramp)| {
            let ramp_start = morning_start - ramp;
            (Just(morning_start), Just(ramp), 0u32..ramp_start)
        })
        .prop_map(|(morning_start, ramp, night_start)| Schedule {
            morning_start: TimeOfDay::from_minutes(morning_start).unwrap(),
            morning_ramp_minutes: ramp,
            night_start: TimeOfDay::from_minutes(night_start).unwrap(),
            ..Schedule::default()
        })
    }

    proptest! {
        /// Each phase only ever covers its own interval of the day
        #[test]
        fn test_phase_lies_within_its_interval(
            schedule in schedule_strategy(),
            t in minute_strategy()
        ) {
            let night_start = schedule.night_start.minutes();
            let ramp_start = schedule.morning_ramp_start();
            let morning_start = schedule.morning_start.minutes();

            match classify_phase(TimeOfDay::from_minutes(t).unwrap(), &schedule) {
                Phase::Night => {
                    prop_assert!((night_start..ramp_start).contains(&t));
                }
                Phase::MorningTransition => {
                    prop_assert!((ramp_start..=morning_start).contains(&t));
                }
                Phase::Day => {
                    prop_assert!(t < night_start || t > morning_start);
                }
            }
        }

        /// The boundaries land in the phase they open or close
        #[test]
        fn test_phase_boundaries(schedule in schedule_strategy()) {
            let at = |minutes: u32| classify_phase(TimeOfDay::from_minutes(minutes).unwrap(), &schedule);
            let night_start = schedule.night_start.minutes();
            let ramp_start = schedule.morning_ramp_start();
            let morning_start = schedule.morning_start.minutes();

            prop_assert_eq!(at(night_start), Phase::Night);
            prop_assert_eq!(at(ramp_start - 1), Phase::Night);
            prop_assert_eq!(at(ramp_start), Phase::MorningTransition);
            prop_assert_eq!(at(morning_start), Phase::MorningTransition);
            prop_assert_eq!(at(morning_start + 1), Phase::Day);
            prop_assert_eq!(at(1439), Phase::Day);
            if night_start > 0 {
                prop_assert_eq!(at(night_start - 1), Phase::Day);
            }
        }
    }
}

/// Property tests for the hint strategies
#[cfg(test)]
mod policy_tests {
    use super::*;

    proptest! {
        /// A lamp that is off never gets a brightness hint
        #[test]
        fn test_no_brightness_hint_when_off(brightness in 0u8..=255, target in 1.0f64..=255.0) {
            let state = DeviceState { power: false, brightness, color_temperature: 4000 };
            prop_assert!(hint_brightness_down(&state, target).is_none());
        }

        /// After one hint write lands, the same hint is a no-op
        #[test]
        fn test_hints_converge_after_one_write(
            brightness in 0u8..=255,
            kelvin in 2000u32..=5500,
            target_brightness in 1.0f64..=255.0,
            target_kelvin in 2000.0f64..=5500.0
        ) {
            let mut state = DeviceState { power: true, brightness, color_temperature: kelvin };
            if let Some(action) = hint_brightness_down(&state, target_brightness) {
                state.brightness = match action.write {
                    lampor::core::policy::Write::Brightness(level) => level,
                    _ => unreachable!(),
                };
            }
            if let Some(action) = hint_color_down(&state, target_kelvin) {
                state.color_temperature = match action.write {
                    lampor::core::policy::Write::ColorTemperature(k) => k,
                    _ => unreachable!(),
                };
            }

            // Rounding may land a hair above the target; at most one more write
            let again_b = hint_brightness_down(&state, target_brightness);
            let again_k = hint_color_down(&state, target_kelvin);
            if let Some(action) = again_b {
                prop_assert_eq!(action.write, lampor::core::policy::Write::Brightness(state.brightness));
            }
            if let Some(action) = again_k {
                prop_assert_eq!(action.write, lampor::core::policy::Write::ColorTemperature(state.color_temperature));
            }
        }
    }
}
