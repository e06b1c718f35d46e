//! Configuration system for lampor.
//!
//! The configuration lives in a single flat TOML file, `lampor.toml`, in
//! `$XDG_CONFIG_HOME/lampor/` (or the directory given with `--config`). A
//! commented default file is written on first run.
//!
//! ```toml
//! #[Location]
//! latitude = 59.329300             # Geographic latitude (-90 to 90)
//! longitude = 18.068600            # Geographic longitude (-180 to 180)
//! timezone = "Europe/Stockholm"    # IANA zone of the lamps (omit for system local)
//! twilight = "civil"               # Day boundaries: "civil" (dawn/dusk) or "official"
//!
//! #[Gateway]
//! gateway = "socket"               # Device gateway: "socket" or "memory"
//! gateway_address = "/run/user/1000/lampor/gateway.sock"
//! gateway_timeout_ms = 5000        # Per-request timeout (100-60000)ms
//!
//! #[Schedule]
//! min_color_temp = 2000            # Warmest white (1000-10000) Kelvin
//! max_color_temp = 5500            # Coolest white (1000-10000) Kelvin
//! color_ramp_minutes = 30          # Color ramp around sunrise and sunset (1-180)
//! min_brightness = 1               # Dimmest level (1-255)
//! max_brightness = 255             # Brightest level (1-255)
//! brightness_ramp_minutes = 30     # Brightness ramp around sunrise and sunset (1-180)
//! morning_start = "07:00"          # Lights fully up by this time (HH:MM)
//! morning_ramp_minutes = 30        # Length of the forced wake-up ramp (1-180)
//! night_start = "01:00"            # Night light from this time (HH:MM)
//! night_rgb = [255, 0, 0]          # Night color for color-capable lamps
//! day_color_strategy = "set"       # Daytime color writes: "set" or "hint"
//! ```
//!
//! Values are validated as a whole after parsing (see [`validation`]), so a
//! loaded `Config` can be turned into a [`Location`], [`GatewaySettings`]
//! and [`Schedule`] without further checks failing in practice.

pub mod builder;
pub mod loading;
pub mod validation;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;

use crate::backend::{GatewayAddress, GatewayKind, GatewaySettings};
use crate::common::constants::*;
use crate::core::schedule::Schedule;
use crate::geo::{Location, Twilight};

// Re-export public API
pub use builder::create_default_config;
pub use loading::{get_config_path, get_custom_config_dir, load, load_from_path, set_config_dir};

/// Configuration structure for lampor, loaded from `lampor.toml`.
///
/// Every field is optional in the file. `latitude` and `longitude` are the
/// only values without a default and are required to compute a sun window.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
pub struct Config {
    // Location
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>, // IANA name, e.g. "Europe/Stockholm"
    pub twilight: Option<String>, // "civil" or "official"

    // Gateway
    pub gateway: Option<String>,         // "socket" or "memory"
    pub gateway_address: Option<String>, // socket path or host:port
    pub gateway_timeout_ms: Option<u64>,

    // Schedule
    pub min_color_temp: Option<u32>,
    pub max_color_temp: Option<u32>,
    pub color_ramp_minutes: Option<u32>,
    pub min_brightness: Option<u32>,
    pub max_brightness: Option<u32>,
    pub brightness_ramp_minutes: Option<u32>,
    pub morning_start: Option<String>, // HH:MM
    pub morning_ramp_minutes: Option<u32>,
    pub night_start: Option<String>, // HH:MM
    pub night_rgb: Option<[u8; 3]>,
    pub day_color_strategy: Option<String>, // "set" or "hint"
}

impl Config {
    /// Load configuration using the module's load function
    pub fn load() -> Result<Self> {
        load()
    }

    /// Observer position for the sun window.
    pub fn location(&self) -> Result<Location> {
        let (latitude, longitude) = match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => anyhow::bail!(
                "latitude and longitude must be set in the configuration to compute sunrise and sunset"
            ),
        };

        let timezone = self
            .timezone
            .as_deref()
            .map(|name| {
                name.parse::<chrono_tz::Tz>()
                    .map_err(|_| anyhow::anyhow!("Unknown timezone '{name}'"))
            })
            .transpose()?;

        let twilight_str = self.twilight.as_deref().unwrap_or(DEFAULT_TWILIGHT);
        let twilight = Twilight::parse(twilight_str).ok_or_else(|| {
            anyhow::anyhow!("twilight must be \"civil\" or \"official\" (got \"{twilight_str}\")")
        })?;

        Ok(Location {
            latitude,
            longitude,
            timezone,
            twilight,
        })
    }

    /// Gateway selection, address and timeout.
    pub fn gateway_settings(&self) -> Result<GatewaySettings> {
        let kind_str = self.gateway.as_deref().unwrap_or(DEFAULT_GATEWAY);
        let kind = GatewayKind::parse(kind_str).ok_or_else(|| {
            anyhow::anyhow!("gateway must be \"socket\" or \"memory\" (got \"{kind_str}\")")
        })?;

        let address = match self.gateway_address.as_deref() {
            Some(value) => GatewayAddress::parse(value).context("Invalid gateway_address")?,
            None => GatewayAddress::default_socket(),
        };

        Ok(GatewaySettings {
            kind,
            address,
            timeout: Duration::from_millis(
                self.gateway_timeout_ms
                    .unwrap_or(DEFAULT_GATEWAY_TIMEOUT_MS),
            ),
        })
    }

    /// The immutable schedule the engine runs on.
    pub fn schedule(&self) -> Result<Schedule> {
        Schedule::from_config(self)
    }

    pub fn log_config(&self) {
        log_block_start!("Loaded configuration");

        if let (Some(lat), Some(lon)) = (self.latitude, self.longitude) {
            let lat_dir = if lat >= 0.0 { "N" } else { "S" };
            let lon_dir = if lon >= 0.0 { "E" } else { "W" };
            log_indented!(
                "Location: {:.3}°{}, {:.3}°{}",
                lat.abs(),
                lat_dir,
                lon.abs(),
                lon_dir
            );
        }
        log_indented!(
            "Timezone: {}",
            self.timezone.as_deref().unwrap_or("system local")
        );
        log_indented!(
            "Twilight: {}",
            self.twilight.as_deref().unwrap_or(DEFAULT_TWILIGHT)
        );
        log_indented!(
            "Gateway: {}",
            self.gateway.as_deref().unwrap_or(DEFAULT_GATEWAY)
        );
        log_indented!(
            "Color: {}K to {}K over {} minutes",
            self.min_color_temp.unwrap_or(DEFAULT_MIN_COLOR_TEMP),
            self.max_color_temp.unwrap_or(DEFAULT_MAX_COLOR_TEMP),
            self.color_ramp_minutes.unwrap_or(DEFAULT_COLOR_RAMP_MINUTES)
        );
        log_indented!(
            "Brightness: {} to {} over {} minutes",
            self.min_brightness.unwrap_or(DEFAULT_MIN_BRIGHTNESS),
            self.max_brightness.unwrap_or(DEFAULT_MAX_BRIGHTNESS),
            self.brightness_ramp_minutes
                .unwrap_or(DEFAULT_BRIGHTNESS_RAMP_MINUTES)
        );
        log_indented!(
            "Morning: {} ({} minute ramp), night: {}",
            self.morning_start.as_deref().unwrap_or(DEFAULT_MORNING_START),
            self.morning_ramp_minutes
                .unwrap_or(DEFAULT_MORNING_RAMP_MINUTES),
            self.night_start.as_deref().unwrap_or(DEFAULT_NIGHT_START)
        );
    }
}
