//! Wire format spoken with the gateway bridge.
//!
//! One JSON object per line in each direction. Every request carries an
//! `op` tag; every response carries `ok` and, on failure, an `error` string.
//!
//! ```text
//! → {"op":"list"}
//! ← {"ok":true,"devices":[{"id":"65537","name":"Hallway","light_control":true,"color":false}]}
//! → {"op":"read","id":"65537"}
//! ← {"ok":true,"state":{"power":true,"brightness":254,"color_temperature":4000}}
//! → {"op":"brightness","id":"65537","level":43}
//! ← {"ok":true}
//! → {"op":"rgb","id":"65538","red":255,"green":0,"blue":0}
//! ← {"ok":false,"error":"device unreachable"}
//! ```

use serde::{Deserialize, Serialize};

use crate::backend::{DeviceHandle, DeviceState};

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Request<'a> {
    List,
    Read {
        id: &'a str,
    },
    ColorTemperature {
        id: &'a str,
        kelvin: u32,
    },
    Brightness {
        id: &'a str,
        level: u8,
    },
    Rgb {
        id: &'a str,
        red: u8,
        green: u8,
        blue: u8,
    },
}

#[derive(Debug, Deserialize, PartialEq)]
pub struct Response {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub devices: Vec<DeviceRecord>,
    #[serde(default)]
    pub state: Option<DeviceState>,
}

/// One entry of a `list` response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct DeviceRecord {
    pub id: String,
    pub name: String,
    /// Remotes, sensors and plugs report `false` and are skipped.
    #[serde(default)]
    pub light_control: bool,
    #[serde(default)]
    pub color: bool,
}

impl From<DeviceRecord> for DeviceHandle {
    fn from(record: DeviceRecord) -> Self {
        DeviceHandle::new(record.id, record.name, record.color)
    }
}
