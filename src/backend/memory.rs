//! In-process gateway holding lamps in memory.
//!
//! Writes mutate the stored state the way a real lamp would report it on the
//! next read, and every successful write is recorded in order. Individual
//! operations can be made to fail per lamp to exercise the tick driver's
//! skip-and-continue path.

use anyhow::Result;
use std::collections::HashMap;

use super::{DeviceGateway, DeviceHandle, DeviceState, GatewayOperation, Rgb};

/// A write that reached a memory lamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedWrite {
    ColorTemperature { id: String, kelvin: u32 },
    Brightness { id: String, level: u8 },
    Rgb { id: String, color: Rgb },
}

#[derive(Debug, Clone)]
struct MemoryDevice {
    handle: DeviceHandle,
    state: DeviceState,
    light_control: bool,
    rgb: Option<Rgb>,
}

/// Gateway backed by a list of in-memory lamps.
#[derive(Debug, Default)]
pub struct MemoryGateway {
    devices: Vec<MemoryDevice>,
    // Error text returned for each injected failure
    failures: HashMap<(String, GatewayOperation), String>,
    writes: Vec<RecordedWrite>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a lamp with light control.
    pub fn with_device(mut self, handle: DeviceHandle, state: DeviceState) -> Self {
        self.devices.push(MemoryDevice {
            handle,
            state,
            light_control: true,
            rgb: None,
        });
        self
    }

    /// Add a device without light control (a remote or sensor); discovery hides it.
    pub fn with_accessory(mut self, handle: DeviceHandle) -> Self {
        self.devices.push(MemoryDevice {
            handle,
            state: DeviceState::default(),
            light_control: false,
            rgb: None,
        });
        self
    }

    /// Make `operation` fail for the lamp with `id`.
    pub fn fail_on(self, id: &str, operation: GatewayOperation) -> Self {
        self.fail_with(id, operation, format!("simulated transport failure during {operation}"))
    }

    /// Make discovery itself fail.
    pub fn fail_discovery(self) -> Self {
        self.fail_on("", GatewayOperation::List)
    }

    fn fail_with(mut self, id: &str, operation: GatewayOperation, message: String) -> Self {
        self.failures.insert((id.to_string(), operation), message);
        self
    }

    /// Copy every lamp and its current state out of another gateway.
    ///
    /// Used by `--dry-run`: the real gateway is only read, and the tick then
    /// runs against the copy. Only a failed discovery is an error. A lamp
    /// whose state cannot be read is copied with that read failure attached,
    /// so the tick reports it like any other per-lamp failure.
    pub fn snapshot(source: &mut dyn DeviceGateway) -> Result<Self> {
        let mut snapshot = Self::new();
        for handle in source.list_devices()? {
            snapshot = match source.read_state(&handle) {
                Ok(state) => snapshot.with_device(handle, state),
                Err(error) => {
                    let id = handle.id.clone();
                    snapshot
                        .with_device(handle, DeviceState::default())
                        .fail_with(&id, GatewayOperation::Read, format!("{error:#}"))
                }
            };
        }
        Ok(snapshot)
    }

    /// Writes accepted so far, oldest first.
    pub fn writes(&self) -> &[RecordedWrite] {
        &self.writes
    }

    /// Current state of the lamp with `id`.
    pub fn state_of(&self, id: &str) -> Option<DeviceState> {
        self.devices
            .iter()
            .find(|device| device.handle.id == id)
            .map(|device| device.state)
    }

    /// Last RGB color written to the lamp with `id`.
    pub fn rgb_of(&self, id: &str) -> Option<Rgb> {
        self.devices
            .iter()
            .find(|device| device.handle.id == id)
            .and_then(|device| device.rgb)
    }

    fn check(&self, id: &str, operation: GatewayOperation) -> Result<()> {
        if let Some(message) = self.failures.get(&(id.to_string(), operation)) {
            anyhow::bail!("{message}");
        }
        Ok(())
    }

    fn device_mut(&mut self, id: &str) -> Result<&mut MemoryDevice> {
        self.devices
            .iter_mut()
            .find(|device| device.handle.id == id && device.light_control)
            .ok_or_else(|| anyhow::anyhow!("unknown device '{id}'"))
    }
}

impl DeviceGateway for MemoryGateway {
    fn backend_name(&self) -> &'static str {
        "Memory"
    }

    fn list_devices(&mut self) -> Result<Vec<DeviceHandle>> {
        self.check("", GatewayOperation::List)?;
        Ok(self
            .devices
            .iter()
            .filter(|device| device.light_control)
            .map(|device| device.handle.clone())
            .collect())
    }

    fn read_state(&mut self, device: &DeviceHandle) -> Result<DeviceState> {
        self.check(&device.id, GatewayOperation::Read)?;
        Ok(self.device_mut(&device.id)?.state)
    }

    fn write_color_temperature(&mut self, device: &DeviceHandle, kelvin: u32) -> Result<()> {
        self.check(&device.id, GatewayOperation::ColorTemperature)?;
        self.device_mut(&device.id)?.state.color_temperature = kelvin;
        self.writes.push(RecordedWrite::ColorTemperature {
            id: device.id.clone(),
            kelvin,
        });
        Ok(())
    }

    fn write_brightness(&mut self, device: &DeviceHandle, level: u8) -> Result<()> {
        self.check(&device.id, GatewayOperation::Brightness)?;
        self.device_mut(&device.id)?.state.brightness = level;
        self.writes.push(RecordedWrite::Brightness {
            id: device.id.clone(),
            level,
        });
        Ok(())
    }

    fn write_rgb(&mut self, device: &DeviceHandle, color: Rgb) -> Result<()> {
        self.check(&device.id, GatewayOperation::Rgb)?;
        self.device_mut(&device.id)?.rgb = Some(color);
        self.writes.push(RecordedWrite::Rgb {
            id: device.id.clone(),
            color,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lamp(id: &str) -> DeviceHandle {
        DeviceHandle::new(id, format!("Lamp {id}"), false)
    }

    fn on(brightness: u8, color_temperature: u32) -> DeviceState {
        DeviceState {
            power: true,
            brightness,
            color_temperature,
        }
    }

    #[test]
    fn test_discovery_hides_accessories() {
        let mut gateway = MemoryGateway::new()
            .with_device(lamp("1"), on(200, 4000))
            .with_accessory(DeviceHandle::new("r", "Remote", false));
        let devices = gateway.list_devices().unwrap();
        assert_eq!(devices, vec![lamp("1")]);
    }

    #[test]
    fn test_writes_update_state_and_are_recorded() {
        let mut gateway = MemoryGateway::new().with_device(lamp("1"), on(200, 4000));
        gateway.write_brightness(&lamp("1"), 10).unwrap();
        gateway.write_color_temperature(&lamp("1"), 2200).unwrap();

        assert_eq!(gateway.read_state(&lamp("1")).unwrap(), on(10, 2200));
        assert_eq!(
            gateway.writes(),
            &[
                RecordedWrite::Brightness {
                    id: "1".to_string(),
                    level: 10
                },
                RecordedWrite::ColorTemperature {
                    id: "1".to_string(),
                    kelvin: 2200
                },
            ]
        );
    }

    #[test]
    fn test_injected_failure_leaves_state_untouched() {
        let mut gateway = MemoryGateway::new()
            .with_device(lamp("1"), on(200, 4000))
            .fail_on("1", GatewayOperation::Brightness);
        assert!(gateway.write_brightness(&lamp("1"), 10).is_err());
        assert_eq!(gateway.state_of("1"), Some(on(200, 4000)));
        assert!(gateway.writes().is_empty());
    }

    #[test]
    fn test_snapshot_copies_devices_and_state() {
        let mut source = MemoryGateway::new()
            .with_device(lamp("1"), on(200, 4000))
            .with_device(lamp("2"), on(30, 2700));
        let mut copy = MemoryGateway::snapshot(&mut source).unwrap();
        copy.write_brightness(&lamp("1"), 1).unwrap();

        assert_eq!(copy.list_devices().unwrap().len(), 2);
        assert_eq!(copy.state_of("2"), Some(on(30, 2700)));
        // The source is never written
        assert_eq!(source.state_of("1"), Some(on(200, 4000)));
        assert!(source.writes().is_empty());
    }

    #[test]
    fn test_snapshot_keeps_unreadable_lamp_as_read_failure() {
        let mut source = MemoryGateway::new()
            .with_device(lamp("1"), on(200, 4000))
            .with_device(lamp("2"), on(30, 2700))
            .fail_on("1", GatewayOperation::Read);
        let mut copy = MemoryGateway::snapshot(&mut source).unwrap();

        assert_eq!(copy.list_devices().unwrap().len(), 2);
        let err = copy.read_state(&lamp("1")).unwrap_err();
        assert!(err.to_string().contains("read state"));
        assert_eq!(copy.read_state(&lamp("2")).unwrap(), on(30, 2700));
    }

    #[test]
    fn test_snapshot_fails_only_on_discovery() {
        let mut source = MemoryGateway::new()
            .with_device(lamp("1"), on(200, 4000))
            .fail_discovery();
        assert!(MemoryGateway::snapshot(&mut source).is_err());
    }

    #[test]
    fn test_unknown_device_is_an_error() {
        let mut gateway = MemoryGateway::new();
        assert!(gateway.read_state(&lamp("ghost")).is_err());
    }
}
