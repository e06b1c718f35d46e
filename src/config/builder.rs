//! Default config creation.
//!
//! The default file lists every key with its default value and an aligned
//! comment describing the accepted range. Location keys are written commented
//! out since there is no sensible default position.

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::common::constants::*;

/// Write a commented default `lampor.toml` to `path`.
pub fn create_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    fs::write(path, default_config_content())
        .with_context(|| format!("Failed to write default config to {}", path.display()))
}

pub(crate) fn default_config_content() -> String {
    let [red, green, blue] = DEFAULT_NIGHT_RGB;

    ConfigBuilder::new()
        .add_section("Location")
        .add_placeholder(
            "latitude",
            "59.329300",
            "Geographic latitude (-90 to 90), required",
        )
        .add_placeholder(
            "longitude",
            "18.068600",
            "Geographic longitude (-180 to 180), required",
        )
        .add_placeholder(
            "timezone",
            "\"Europe/Stockholm\"",
            "IANA zone of the lamps (omit for system local)",
        )
        .add_setting(
            "twilight",
            &format!("\"{DEFAULT_TWILIGHT}\""),
            "Day boundaries: \"civil\" (dawn/dusk) or \"official\"",
        )
        .add_section("Gateway")
        .add_setting(
            "gateway",
            &format!("\"{DEFAULT_GATEWAY}\""),
            "Device gateway: \"socket\" or \"memory\"",
        )
        .add_placeholder(
            "gateway_address",
            "\"192.168.1.20:7000\"",
            "Bridge socket path or host:port (default: $XDG_RUNTIME_DIR/lampor/gateway.sock)",
        )
        .add_setting(
            "gateway_timeout_ms",
            &DEFAULT_GATEWAY_TIMEOUT_MS.to_string(),
            &format!(
                "Per-request timeout ({MINIMUM_GATEWAY_TIMEOUT_MS}-{MAXIMUM_GATEWAY_TIMEOUT_MS})ms"
            ),
        )
        .add_section("Schedule")
        .add_setting(
            "min_color_temp",
            &DEFAULT_MIN_COLOR_TEMP.to_string(),
            &format!("Warmest white ({MINIMUM_TEMP}-{MAXIMUM_TEMP}) Kelvin"),
        )
        .add_setting(
            "max_color_temp",
            &DEFAULT_MAX_COLOR_TEMP.to_string(),
            &format!("Coolest white ({MINIMUM_TEMP}-{MAXIMUM_TEMP}) Kelvin"),
        )
        .add_setting(
            "color_ramp_minutes",
            &DEFAULT_COLOR_RAMP_MINUTES.to_string(),
            &format!(
                "Color ramp around sunrise and sunset ({MINIMUM_RAMP_MINUTES}-{MAXIMUM_RAMP_MINUTES})"
            ),
        )
        .add_setting(
            "min_brightness",
            &DEFAULT_MIN_BRIGHTNESS.to_string(),
            &format!("Dimmest level ({MINIMUM_BRIGHTNESS}-{MAXIMUM_BRIGHTNESS})"),
        )
        .add_setting(
            "max_brightness",
            &DEFAULT_MAX_BRIGHTNESS.to_string(),
            &format!("Brightest level ({MINIMUM_BRIGHTNESS}-{MAXIMUM_BRIGHTNESS})"),
        )
        .add_setting(
            "brightness_ramp_minutes",
            &DEFAULT_BRIGHTNESS_RAMP_MINUTES.to_string(),
            &format!(
                "Brightness ramp around sunrise and sunset ({MINIMUM_RAMP_MINUTES}-{MAXIMUM_RAMP_MINUTES})"
            ),
        )
        .add_setting(
            "morning_start",
            &format!("\"{DEFAULT_MORNING_START}\""),
            "Lights fully up by this time (HH:MM)",
        )
        .add_setting(
            "morning_ramp_minutes",
            &DEFAULT_MORNING_RAMP_MINUTES.to_string(),
            &format!(
                "Length of the forced wake-up ramp ({MINIMUM_RAMP_MINUTES}-{MAXIMUM_RAMP_MINUTES})"
            ),
        )
        .add_setting(
            "night_start",
            &format!("\"{DEFAULT_NIGHT_START}\""),
            "Night light from this time (HH:MM)",
        )
        .add_setting(
            "night_rgb",
            &format!("[{red}, {green}, {blue}]"),
            "Night color for color-capable lamps",
        )
        .add_setting(
            "day_color_strategy",
            &format!("\"{DEFAULT_DAY_COLOR_STRATEGY}\""),
            "Daytime color writes: \"set\" or \"hint\" (only ever warmer)",
        )
        .build()
}

/// Builder for properly formatted configuration files
struct ConfigBuilder {
    entries: Vec<ConfigEntry>,
}

enum ConfigEntry {
    Section(String),
    Setting { line: String, comment: String },
}

impl ConfigBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn add_section(mut self, title: &str) -> Self {
        self.entries.push(ConfigEntry::Section(format!("#[{title}]")));
        self
    }

    fn add_setting(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    /// A setting written commented out, as an example value.
    fn add_placeholder(mut self, key: &str, value: &str, comment: &str) -> Self {
        self.entries.push(ConfigEntry::Setting {
            line: format!("#{key} = {value}"),
            comment: format!("# {comment}"),
        });
        self
    }

    fn build(self) -> String {
        // Align every comment one space past the longest setting line
        let max_width = self
            .entries
            .iter()
            .filter_map(|entry| match entry {
                ConfigEntry::Setting { line, .. } => Some(line.len()),
                ConfigEntry::Section(_) => None,
            })
            .max()
            .unwrap_or(0)
            + 1;

        let mut result = Vec::new();
        let mut first_section = true;

        for entry in self.entries {
            match entry {
                ConfigEntry::Section(title) => {
                    if !first_section {
                        result.push(String::new());
                    }
                    result.push(title);
                    first_section = false;
                }
                ConfigEntry::Setting { line, comment } => {
                    let padding = " ".repeat(max_width - line.len());
                    result.push(format!("{line}{padding}{comment}"));
                }
            }
        }

        result.push(String::new());
        result.join("\n")
    }
}
