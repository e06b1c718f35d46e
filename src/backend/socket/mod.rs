//! Gateway that talks to a bridge process over a socket.
//!
//! The bridge owns the real lighting protocol (CoAP/DTLS, Zigbee, a vendor
//! cloud) and exposes the small JSON-lines protocol in [`protocol`]. lampor
//! holds one connection per tick and closes it when the gateway is dropped.

pub mod client;
pub mod protocol;

use anyhow::{Context, Result};
use std::time::Duration;

use super::{DeviceGateway, DeviceHandle, DeviceState, GatewayAddress, Rgb};
use client::GatewayClient;
use protocol::Request;

pub struct SocketGateway {
    client: GatewayClient,
}

impl SocketGateway {
    pub fn new(address: GatewayAddress, timeout: Duration, debug_enabled: bool) -> Self {
        Self {
            client: GatewayClient::new(address, timeout, debug_enabled),
        }
    }
}

impl DeviceGateway for SocketGateway {
    fn backend_name(&self) -> &'static str {
        "Socket"
    }

    fn list_devices(&mut self) -> Result<Vec<DeviceHandle>> {
        let response = self
            .client
            .request(&Request::List)
            .with_context(|| format!("Device discovery via {} failed", self.client.address()))?;

        Ok(response
            .devices
            .into_iter()
            .filter(|record| record.light_control)
            .map(DeviceHandle::from)
            .collect())
    }

    fn read_state(&mut self, device: &DeviceHandle) -> Result<DeviceState> {
        let response = self.client.request(&Request::Read { id: &device.id })?;
        response
            .state
            .ok_or_else(|| anyhow::anyhow!("Gateway returned no state for '{}'", device.name))
    }

    fn write_color_temperature(&mut self, device: &DeviceHandle, kelvin: u32) -> Result<()> {
        self.client.request(&Request::ColorTemperature {
            id: &device.id,
            kelvin,
        })?;
        Ok(())
    }

    fn write_brightness(&mut self, device: &DeviceHandle, level: u8) -> Result<()> {
        self.client.request(&Request::Brightness {
            id: &device.id,
            level,
        })?;
        Ok(())
    }

    fn write_rgb(&mut self, device: &DeviceHandle, color: Rgb) -> Result<()> {
        self.client.request(&Request::Rgb {
            id: &device.id,
            red: color.red,
            green: color.green,
            blue: color.blue,
        })?;
        Ok(())
    }
}
