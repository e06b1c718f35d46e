//! Show the sun window and the resulting phase boundaries for a date.

use anyhow::Result;

use super::{Setup, resolve_date};
use crate::core::period::TimeOfDay;
use crate::geo::sun_window;

pub fn handle_sun_command(date: Option<&str>, debug_enabled: bool) -> Result<()> {
    let setup = Setup::load(debug_enabled)?;
    let date = resolve_date(date, &setup.location)?;
    let window = sun_window(date, &setup.location)?;
    let schedule = &setup.schedule;

    let at = |minutes: u32| TimeOfDay::from_hm(0, minutes);
    let color_ramp = schedule.color_ramp_minutes;
    let brightness_ramp = schedule.brightness_ramp_minutes;

    log_block_start!(
        "Sun on {} ({} twilight, {})",
        date,
        setup.location.twilight,
        setup.location.timezone_name()
    );
    log_decorated!("Sunrise: {}", window.sunrise);
    log_decorated!("Sunset:  {}", window.sunset);

    log_block_start!("Phases:");
    log_indented!(
        "Night:   {} - {}",
        schedule.night_start,
        at(schedule.morning_ramp_start())
    );
    log_indented!(
        "Morning: {} - {}",
        at(schedule.morning_ramp_start()),
        schedule.morning_start
    );
    log_indented!(
        "Day:     {} - {}",
        at(schedule.morning_start.minutes() + 1),
        schedule.night_start
    );

    log_block_start!("Ramps:");
    log_indented!(
        "Color rises {} - {}, falls {} - {}",
        window.sunrise,
        at(window.sunrise.minutes() + color_ramp),
        at(window.sunset.minutes().saturating_sub(color_ramp)),
        window.sunset
    );
    log_indented!(
        "Brightness rises {} - {}, falls {} - {}",
        window.sunrise,
        at(window.sunrise.minutes() + brightness_ramp),
        at(window.sunset.minutes().saturating_sub(brightness_ramp)),
        window.sunset
    );

    if window.is_degenerate(schedule) {
        log_pipe!();
        log_warning!("The window is shorter than its ramps; the rise takes precedence");
    }

    log_end!();
    Ok(())
}
