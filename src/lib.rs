//! # Lampor Library
//!
//! Internal library for the lampor binary: daylight-following brightness and
//! color temperature for networked lamps.
//!
//! This library exists to enable testing of the engine and the tick driver
//! and to keep CLI dispatch (main.rs) separate from application logic.
//!
//! ## Architecture
//!
//! - **Engine**: `core::period` classifies the minute of the day into a phase
//!   and computes the brightness and color temperature target
//! - **Policy**: `core::policy` decides per lamp whether a target is written
//!   (force, set, or a hint that only moves toward dim and warm)
//! - **Tick driver**: `core::run_tick` runs one pass over every lamp
//! - **Gateways**: `backend` with the socket bridge and the in-memory gateway
//! - **Geographic**: `geo` for sunrise/sunset at the configured location
//! - **Configuration**: `config` for the TOML settings and their validation
//! - **Commands**: `commands` for the CLI subcommands
//! - **Infrastructure**: logging, constants and the clock abstraction

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod common;

pub mod args;
pub mod backend;
pub mod commands;
pub mod config;
pub mod core;
pub mod geo;
pub mod time_source;

pub use crate::core::{TickReport, run_tick};
