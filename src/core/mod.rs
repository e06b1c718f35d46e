//! The tick driver.
//!
//! One tick is one read-decide-write pass over every lamp:
//!
//! 1. classify the current minute and compute the target (pure)
//! 2. discover the lamps through the gateway
//! 3. for each lamp in turn: read its state, plan the writes, issue them
//!
//! Nothing is kept between ticks. A lamp that cannot be read or written is
//! recorded in the [`TickReport`] and skipped; the next lamp is still
//! processed. Only a failed discovery aborts the tick, since then no lamp can
//! be reached at all.

pub mod period;
pub mod policy;
pub mod schedule;

use anyhow::{Context, Result};

use crate::backend::{DeviceGateway, DeviceHandle, GatewayOperation};
use crate::core::period::{Decision, SunWindow, TimeOfDay, decide, log_decision};
use crate::core::policy::{Action, apply_action, plan_device};
use crate::core::schedule::Schedule;

/// A write that reached a lamp during this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedWrite {
    pub device: DeviceHandle,
    pub action: Action,
}

/// A lamp that was skipped, and why.
#[derive(Debug)]
pub struct DeviceFailure {
    pub device: DeviceHandle,
    pub operation: GatewayOperation,
    pub error: anyhow::Error,
}

/// Outcome of one tick.
#[derive(Debug)]
pub struct TickReport {
    pub decision: Decision,
    pub devices_seen: usize,
    pub writes: Vec<AppliedWrite>,
    pub failures: Vec<DeviceFailure>,
}

impl TickReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    /// Lamps were found but not one of them got through the tick.
    pub fn all_failed(&self) -> bool {
        self.devices_seen > 0 && self.failures.len() == self.devices_seen
    }
}

/// Run one pass over every lamp the gateway reports.
///
/// Returns an error only when discovery fails. Per-lamp failures are in the
/// report.
pub fn run_tick(
    gateway: &mut dyn DeviceGateway,
    schedule: &Schedule,
    now: TimeOfDay,
    window: SunWindow,
) -> Result<TickReport> {
    let decision = decide(now, window, schedule);
    log_decision(&decision);

    if window.is_degenerate(schedule) {
        log_warning!(
            "Sun window {}-{} is shorter than its ramps; the rise takes precedence where they overlap",
            window.sunrise,
            window.sunset
        );
    }

    let devices = gateway.list_devices().with_context(|| {
        format!(
            "Device discovery through the {} gateway failed",
            gateway.backend_name()
        )
    })?;

    if devices.is_empty() {
        log_warning!("No lamps with light control were found");
    }

    let mut report = TickReport {
        decision,
        devices_seen: devices.len(),
        writes: Vec::new(),
        failures: Vec::new(),
    };

    for device in devices {
        process_device(gateway, schedule, &device, &mut report);
    }

    Ok(report)
}

fn process_device(
    gateway: &mut dyn DeviceGateway,
    schedule: &Schedule,
    device: &DeviceHandle,
    report: &mut TickReport,
) {
    let state = match gateway.read_state(device) {
        Ok(state) => state,
        Err(error) => {
            record_failure(report, device, GatewayOperation::Read, error);
            return;
        }
    };

    let actions = plan_device(&report.decision, device, &state, schedule);
    if actions.is_empty() {
        log_indented!("{}: unchanged", device.name);
        return;
    }

    for action in actions {
        match apply_action(gateway, device, &action) {
            Ok(()) => report.writes.push(AppliedWrite {
                device: device.clone(),
                action,
            }),
            Err(error) => {
                // Remaining writes for this lamp are skipped
                record_failure(report, device, action.write.operation(), error);
                return;
            }
        }
    }
}

fn record_failure(
    report: &mut TickReport,
    device: &DeviceHandle,
    operation: GatewayOperation,
    error: anyhow::Error,
) {
    log_error!("{}: {} failed: {:#}", device.name, operation, error);
    report.failures.push(DeviceFailure {
        device: device.clone(),
        operation,
        error,
    });
}
