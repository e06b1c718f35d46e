//! Print the phase and target for every step across one day.
//!
//! Nothing is read from or written to a lamp. The table shows the raw
//! targets; the Day brightness is the ceiling that the hint policy only ever
//! dims towards.

use anyhow::Result;

use super::{Setup, resolve_date};
use crate::common::constants::MINUTES_PER_DAY;
use crate::common::utils::brightness_bar;
use crate::core::period::{Decision, SunWindow, TimeOfDay, brightness_percent, decide};
use crate::core::schedule::Schedule;
use crate::geo::sun_window;

pub fn handle_preview_command(
    date: Option<&str>,
    step_minutes: u32,
    debug_enabled: bool,
) -> Result<()> {
    let setup = Setup::load(debug_enabled)?;
    let date = resolve_date(date, &setup.location)?;
    let window = sun_window(date, &setup.location)?;

    log_block_start!(
        "Preview for {} (sunrise {}, sunset {})",
        date,
        window.sunrise,
        window.sunset
    );
    for decision in preview_rows(&setup.schedule, window, step_minutes) {
        log_indented!(
            "{}  {:<7} {} {:>3}%  {:>4}K",
            decision.now,
            decision.phase.display_name(),
            brightness_bar(decision.target.brightness, 10),
            brightness_percent(decision.target.brightness),
            decision.target.color_temperature.round()
        );
    }
    log_end!();
    Ok(())
}

/// One decision every `step_minutes`, starting at midnight.
pub(crate) fn preview_rows(schedule: &Schedule, window: SunWindow, step_minutes: u32) -> Vec<Decision> {
    let step = step_minutes.max(1) as usize;
    (0..MINUTES_PER_DAY)
        .step_by(step)
        .filter_map(TimeOfDay::from_minutes)
        .map(|now| decide(now, window, schedule))
        .collect()
}
