//! List the lamps the gateway reports and their live state.

use anyhow::{Context, Result};

use crate::backend::create_gateway;
use crate::config::Config;
use crate::core::period::brightness_percent;

pub fn handle_devices_command(debug_enabled: bool) -> Result<()> {
    let config = Config::load()?;
    let settings = config.gateway_settings()?;
    let mut gateway = create_gateway(&settings, debug_enabled);

    let devices = gateway
        .list_devices()
        .with_context(|| format!("Device discovery through {} failed", settings.address))?;

    log_block_start!(
        "{} lamp(s) via the {} gateway",
        devices.len(),
        gateway.backend_name()
    );

    for device in &devices {
        let kind = if device.supports_color {
            "color"
        } else {
            "white spectrum"
        };
        match gateway.read_state(device) {
            Ok(state) => log_indented!(
                "{} [{}] {}: {}, {}%, {}K",
                device.name,
                device.id,
                kind,
                if state.power { "on" } else { "off" },
                brightness_percent(f64::from(state.brightness)),
                state.color_temperature
            ),
            Err(e) => log_error!("{} [{}]: read state failed: {:#}", device.name, device.id, e),
        }
    }

    log_end!();
    Ok(())
}
