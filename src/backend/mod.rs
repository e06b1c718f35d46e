//! Device gateway abstraction for networked lamps.
//!
//! The tick driver never talks to hardware directly. It goes through the
//! `DeviceGateway` trait, which covers exactly what one pass needs:
//! discover the lamps, read each lamp's live state, and issue color
//! temperature, brightness and RGB writes.
//!
//! ## Implementations
//!
//! - **Socket gateway** (`socket`): newline-delimited JSON over a Unix socket
//!   or TCP connection to a bridge process that owns the real radio protocol.
//! - **Memory gateway** (`memory`): in-process lamps, used by tests and by
//!   `--dry-run`, where it holds a snapshot of the real lamps so a tick can be
//!   rehearsed without touching them.
//!
//! Every call is a blocking round-trip. Timeouts are the transport's business;
//! the core has no timeout logic of its own.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::common::constants::*;

pub mod memory;
pub mod socket;

pub use memory::MemoryGateway;
pub use socket::SocketGateway;

/// Descriptor for one discovered lamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceHandle {
    /// Gateway-assigned identifier used in every request.
    pub id: String,
    /// Human-readable name used in log lines.
    pub name: String,
    /// Whether the lamp can show arbitrary RGB colors (not just white spectrum).
    pub supports_color: bool,
}

impl DeviceHandle {
    pub fn new(id: impl Into<String>, name: impl Into<String>, supports_color: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            supports_color,
        }
    }
}

/// A lamp's live state as reported at tick time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceState {
    /// `true` when the lamp is switched on.
    pub power: bool,
    /// Current dimmer level.
    pub brightness: u8,
    /// Current color temperature in Kelvin.
    pub color_temperature: u32,
}

/// An RGB triple for color-capable lamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl Rgb {
    pub fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([red, green, blue]: [u8; 3]) -> Self {
        Self { red, green, blue }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.red, self.green, self.blue)
    }
}

/// The gateway call that was being attempted, for failure reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    List,
    Read,
    ColorTemperature,
    Brightness,
    Rgb,
}

impl fmt::Display for GatewayOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list devices",
            Self::Read => "read state",
            Self::ColorTemperature => "write color temperature",
            Self::Brightness => "write brightness",
            Self::Rgb => "write RGB",
        };
        f.write_str(name)
    }
}

/// Trait for gateways that can enumerate lamps and read or write their state.
///
/// Implementations return only lamps with light control; other devices the
/// underlying system knows about (remotes, sensors, plugs) are filtered out.
#[cfg_attr(test, mockall::automock)]
pub trait DeviceGateway {
    /// Get a human-readable name for this gateway.
    fn backend_name(&self) -> &'static str;

    /// Enumerate the lamps the gateway can control.
    fn list_devices(&mut self) -> Result<Vec<DeviceHandle>>;

    /// Read the live state of one lamp.
    fn read_state(&mut self, device: &DeviceHandle) -> Result<DeviceState>;

    /// Set the color temperature in Kelvin.
    fn write_color_temperature(&mut self, device: &DeviceHandle, kelvin: u32) -> Result<()>;

    /// Set the dimmer level.
    fn write_brightness(&mut self, device: &DeviceHandle, level: u8) -> Result<()>;

    /// Set an RGB color.
    fn write_rgb(&mut self, device: &DeviceHandle, color: Rgb) -> Result<()>;
}

/// Gateway selection from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayKind {
    Socket,
    Memory,
}

impl GatewayKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "socket" => Some(Self::Socket),
            "memory" => Some(Self::Memory),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Socket => "socket",
            Self::Memory => "memory",
        }
    }
}

/// Where and how to reach the gateway.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewaySettings {
    pub kind: GatewayKind,
    pub address: GatewayAddress,
    pub timeout: Duration,
}

/// Socket endpoint of a gateway bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayAddress {
    Unix(PathBuf),
    Tcp(String),
}

impl GatewayAddress {
    /// Interpret a configured address: anything containing a `/` is a Unix
    /// socket path, anything else is a `host:port` pair.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();
        if value.is_empty() {
            anyhow::bail!("gateway_address must not be empty");
        }
        if value.contains('/') {
            return Ok(Self::Unix(PathBuf::from(value)));
        }
        match value.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() && port.parse::<u16>().is_ok() => {
                Ok(Self::Tcp(value.to_string()))
            }
            _ => anyhow::bail!(
                "gateway_address '{value}' is neither a socket path nor a host:port pair"
            ),
        }
    }

    /// Default bridge socket: `$XDG_RUNTIME_DIR/lampor/gateway.sock`.
    pub fn default_socket() -> Self {
        let runtime_dir = std::env::var("XDG_RUNTIME_DIR")
            .unwrap_or_else(|_| format!("/run/user/{}", nix::unistd::getuid()));
        Self::Unix(
            PathBuf::from(runtime_dir)
                .join("lampor")
                .join(GATEWAY_SOCKET_NAME),
        )
    }
}

impl fmt::Display for GatewayAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix(path) => write!(f, "{}", path.display()),
            Self::Tcp(addr) => write!(f, "tcp://{addr}"),
        }
    }
}

impl Default for GatewaySettings {
    fn default() -> Self {
        Self {
            kind: GatewayKind::Socket,
            address: GatewayAddress::default_socket(),
            timeout: Duration::from_millis(DEFAULT_GATEWAY_TIMEOUT_MS),
        }
    }
}

/// Create the gateway described by `settings`.
///
/// The socket gateway connects lazily on its first request, so creating it
/// never fails on an unreachable bridge; discovery does.
pub fn create_gateway(settings: &GatewaySettings, debug_enabled: bool) -> Box<dyn DeviceGateway> {
    match settings.kind {
        GatewayKind::Socket => Box::new(SocketGateway::new(
            settings.address.clone(),
            settings.timeout,
            debug_enabled,
        )),
        GatewayKind::Memory => Box::new(MemoryGateway::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_address_parsing() {
        assert_eq!(
            GatewayAddress::parse("/run/lampor/gateway.sock").unwrap(),
            GatewayAddress::Unix(PathBuf::from("/run/lampor/gateway.sock"))
        );
        assert_eq!(
            GatewayAddress::parse("192.168.1.20:5684").unwrap(),
            GatewayAddress::Tcp("192.168.1.20:5684".to_string())
        );
        assert_eq!(
            GatewayAddress::parse("bridge.local:7000").unwrap(),
            GatewayAddress::Tcp("bridge.local:7000".to_string())
        );
        assert!(GatewayAddress::parse("").is_err());
        assert!(GatewayAddress::parse("bridge.local").is_err());
        assert!(GatewayAddress::parse("bridge.local:http").is_err());
        assert!(GatewayAddress::parse(":7000").is_err());
    }

    #[test]
    fn test_gateway_kind_round_trip_names() {
        for kind in [GatewayKind::Socket, GatewayKind::Memory] {
            assert_eq!(GatewayKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(GatewayKind::parse("coap"), None);
    }

    #[test]
    fn test_rgb_from_array_and_display() {
        let red = Rgb::from([255, 0, 0]);
        assert_eq!(red, Rgb::new(255, 0, 0));
        assert_eq!(red.to_string(), "255 0 0");
    }
}
