//! Update policy: whether and how a target reaches a device.
//!
//! Deciding is pure. [`plan_device`] turns a tick's [`Decision`] and one
//! device's observed state into an ordered list of [`Action`]s, and the four
//! strategy functions below encode the preconditions:
//!
//! | strategy               | writes when                                   |
//! |------------------------|-----------------------------------------------|
//! | `force_*`              | always, power state ignored (night, morning)  |
//! | `set_color_temperature`| always                                        |
//! | `hint_color_down`      | device is cooler than the target              |
//! | `hint_brightness_down` | device is on and brighter than the target     |
//!
//! Hints compare the unrounded target against the device's integer reading
//! and only ever move a device toward dim and warm. Once a device has
//! converged, repeating the same tick produces no hint writes.
//!
//! Applying is effectful: [`apply_action`] issues one gateway write and logs
//! it with the device name, the value and the strategy that fired.

use anyhow::Result;
use std::fmt;

use crate::backend::{DeviceGateway, DeviceHandle, DeviceState, GatewayOperation, Rgb};
use crate::core::period::{Decision, Phase, brightness_percent};
use crate::core::schedule::{ColorStrategy, Schedule};

/// Which rule produced a write; shown in the log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Force,
    Set,
    Hint,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Force => "forced",
            Self::Set => "set",
            Self::Hint => "hint",
        };
        f.write_str(label)
    }
}

/// A single device command with its value already rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    ColorTemperature(u32),
    Brightness(u8),
    Rgb(Rgb),
}

impl Write {
    pub fn operation(&self) -> GatewayOperation {
        match self {
            Self::ColorTemperature(_) => GatewayOperation::ColorTemperature,
            Self::Brightness(_) => GatewayOperation::Brightness,
            Self::Rgb(_) => GatewayOperation::Rgb,
        }
    }
}

impl fmt::Display for Write {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ColorTemperature(kelvin) => write!(f, "{kelvin}K"),
            Self::Brightness(level) => write!(f, "{}%", brightness_percent(f64::from(*level))),
            Self::Rgb(color) => write!(f, "RGB {color}"),
        }
    }
}

/// A write together with the strategy that decided it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Action {
    pub write: Write,
    pub strategy: Strategy,
}

/// Nearest dimmer level, clamped to the device scale.
pub fn round_brightness(level: f64) -> u8 {
    level.round().clamp(0.0, 255.0) as u8
}

/// Nearest whole Kelvin.
pub fn round_color_temperature(kelvin: f64) -> u32 {
    kelvin.round().max(0.0) as u32
}

pub fn force_brightness(target: f64) -> Action {
    Action {
        write: Write::Brightness(round_brightness(target)),
        strategy: Strategy::Force,
    }
}

pub fn set_color_temperature(target: f64) -> Action {
    Action {
        write: Write::ColorTemperature(round_color_temperature(target)),
        strategy: Strategy::Set,
    }
}

pub fn force_color_temperature(target: f64) -> Action {
    Action {
        write: Write::ColorTemperature(round_color_temperature(target)),
        strategy: Strategy::Force,
    }
}

pub fn force_rgb(color: Rgb) -> Action {
    Action {
        write: Write::Rgb(color),
        strategy: Strategy::Force,
    }
}

/// Write iff the device is currently cooler than `target`.
pub fn hint_color_down(state: &DeviceState, target: f64) -> Option<Action> {
    (f64::from(state.color_temperature) > target).then(|| Action {
        write: Write::ColorTemperature(round_color_temperature(target)),
        strategy: Strategy::Hint,
    })
}

/// Write iff the device is on and currently brighter than `target`.
pub fn hint_brightness_down(state: &DeviceState, target: f64) -> Option<Action> {
    (state.power && f64::from(state.brightness) > target).then(|| Action {
        write: Write::Brightness(round_brightness(target)),
        strategy: Strategy::Hint,
    })
}

/// Everything one device should receive this tick, in write order.
pub fn plan_device(
    decision: &Decision,
    device: &DeviceHandle,
    state: &DeviceState,
    schedule: &Schedule,
) -> Vec<Action> {
    let target = decision.target;
    match decision.phase {
        Phase::Night => {
            let color = if device.supports_color {
                force_rgb(schedule.night_rgb)
            } else {
                force_color_temperature(target.color_temperature)
            };
            vec![color, force_brightness(target.brightness)]
        }
        Phase::MorningTransition => vec![
            set_color_temperature(target.color_temperature),
            force_brightness(target.brightness),
        ],
        Phase::Day => {
            let color = match schedule.day_color_strategy {
                ColorStrategy::Set => Some(set_color_temperature(target.color_temperature)),
                ColorStrategy::Hint => hint_color_down(state, target.color_temperature),
            };
            color
                .into_iter()
                .chain(hint_brightness_down(state, target.brightness))
                .collect()
        }
    }
}

/// Issue one planned write and log it.
pub fn apply_action(
    gateway: &mut dyn DeviceGateway,
    device: &DeviceHandle,
    action: &Action,
) -> Result<()> {
    match action.write {
        Write::ColorTemperature(kelvin) => gateway.write_color_temperature(device, kelvin)?,
        Write::Brightness(level) => gateway.write_brightness(device, level)?,
        Write::Rgb(color) => gateway.write_rgb(device, color)?,
    }
    log_indented!("{}: {} {}", device.name, action.write, action.strategy);
    Ok(())
}
