//! One control-loop tick: the default command.
//!
//! Loads the configuration, pins the clock if `--at` was given, computes the
//! sun window for today and runs the tick driver against the configured
//! gateway. With `--dry-run` the real lamps are read once into a
//! [`MemoryGateway`] and the tick writes to that copy instead.

use anyhow::{Context, Result};
use chrono::Local;
use std::sync::Arc;

use super::Setup;
use crate::backend::{MemoryGateway, create_gateway};
use crate::core::{TickReport, run_tick};
use crate::geo::sun_window;
use crate::time_source::{self, FixedTimeSource};

/// Settings for a single tick.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub debug_enabled: bool,
    pub at: Option<String>,
    pub dry_run: bool,
}

/// Run one tick.
///
/// An `Err` means no target could be computed or no lamp could be reached.
/// Failures on individual lamps are returned inside the report.
pub fn handle_run_command(options: &RunOptions) -> Result<TickReport> {
    let setup = Setup::load(options.debug_enabled)?;

    if let Some(at) = options.at.as_deref() {
        // Wall clock here: reading the global source would install it unpinned
        let today = setup.location.local_date_and_minute(Local::now()).0;
        let instant = time_source::parse_at(at, today, setup.location.timezone)?;
        time_source::init_time_source(Arc::new(FixedTimeSource::new(instant)));
        log_pipe!();
        log_info!("Clock pinned to {}", instant.format("%Y-%m-%d %H:%M"));
    }

    let (date, now) = setup
        .location
        .local_date_and_minute(time_source::now());
    let window = sun_window(date, &setup.location)?;

    let settings = setup.config.gateway_settings()?;
    let mut gateway = create_gateway(&settings, options.debug_enabled);

    if options.debug_enabled {
        log_pipe!();
        log_debug!(
            "Using {} gateway at {}",
            gateway.backend_name(),
            settings.address
        );
    }

    let report = if options.dry_run {
        let mut rehearsal = MemoryGateway::snapshot(gateway.as_mut())
            .context("Device discovery for a dry run failed")?;
        drop(gateway);
        log_pipe!();
        log_info!("Dry run: writes below are not sent to any lamp");
        run_tick(&mut rehearsal, &setup.schedule, now, window)?
    } else {
        run_tick(gateway.as_mut(), &setup.schedule, now, window)?
    };

    log_summary(&report);
    Ok(report)
}

fn log_summary(report: &TickReport) {
    log_pipe!();
    if report.all_failed() {
        log_critical!(
            "All {} lamp(s) failed; check that the gateway bridge can reach them",
            report.devices_seen
        );
    } else if report.is_clean() {
        log_info!(
            "{} lamp(s), {} write(s)",
            report.devices_seen,
            report.writes.len()
        );
    } else {
        log_warning!(
            "{} lamp(s), {} write(s), {} lamp(s) skipped after errors",
            report.devices_seen,
            report.writes.len(),
            report.failures.len()
        );
    }
}
