//! Device-library side of the bridge.
//!
//! A [`DeviceHandle`] is a connected Homematic unit owned by whatever talks to
//! the hardware. The switch entities only ever see this trait.

pub mod mqtt;
pub mod registry;
pub mod value;

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::EnumString;

pub use registry::DeviceRegistry;
pub use value::DataValue;

/// Sensor nodes reported by a switch actor with power metering.
pub const POWERMETER_SENSOR_NODES: [&str; 5] =
    ["POWER", "CURRENT", "VOLTAGE", "FREQUENCY", "ENERGY_COUNTER"];

/// Kind of actor a handle represents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DeviceCategory {
    Switch,
    Dimmer,
    #[strum(serialize = "switch_powermeter", serialize = "switchpowermeter")]
    SwitchPowermeter,
    /// Anything else the device library knows about (thermostats, shutters, ...).
    #[strum(default)]
    Other(String),
}

impl DeviceCategory {
    /// Reports a binary `STATE` node.
    pub fn is_switch(&self) -> bool {
        matches!(self, DeviceCategory::Switch | DeviceCategory::SwitchPowermeter)
    }

    /// Reports a continuous `LEVEL` node.
    pub fn is_dimmer(&self) -> bool {
        matches!(self, DeviceCategory::Dimmer)
    }

    pub fn has_power_meter(&self) -> bool {
        matches!(self, DeviceCategory::SwitchPowermeter)
    }

    /// Sensor nodes a device of this category reports by default.
    pub fn default_sensor_nodes(&self) -> Vec<String> {
        if self.has_power_meter() {
            POWERMETER_SENSOR_NODES.iter().map(|n| n.to_string()).collect()
        } else {
            Vec::new()
        }
    }
}

impl fmt::Display for DeviceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceCategory::Switch => write!(f, "switch"),
            DeviceCategory::Dimmer => write!(f, "dimmer"),
            DeviceCategory::SwitchPowermeter => write!(f, "switch_powermeter"),
            DeviceCategory::Other(name) => write!(f, "{}", name),
        }
    }
}

impl From<String> for DeviceCategory {
    fn from(value: String) -> Self {
        // EnumString falls back to Other, parsing can't fail
        value.parse().unwrap_or(DeviceCategory::Other(value))
    }
}

impl From<DeviceCategory> for String {
    fn from(value: DeviceCategory) -> Self {
        value.to_string()
    }
}

/// A connected device as seen by the entities.
///
/// Commands are fire-and-forget: a successful return only means the command
/// was handed to the device library, the new state arrives later as a push.
pub trait DeviceHandle: Send + Sync {
    /// Homematic address, e.g. `JEQ0123456`.
    fn address(&self) -> &str;

    fn category(&self) -> DeviceCategory;

    /// Names of the sensor data nodes this device reports.
    fn sensor_nodes(&self) -> Vec<String>;

    fn on(&self, channel: u8) -> Result<()>;

    fn off(&self, channel: u8) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parsing() {
        assert_eq!(
            "switch".parse::<DeviceCategory>().unwrap(),
            DeviceCategory::Switch
        );
        assert_eq!(
            "Dimmer".parse::<DeviceCategory>().unwrap(),
            DeviceCategory::Dimmer
        );
        assert_eq!(
            "SwitchPowermeter".parse::<DeviceCategory>().unwrap(),
            DeviceCategory::SwitchPowermeter
        );
        assert_eq!(
            DeviceCategory::from("thermostat".to_string()),
            DeviceCategory::Other("thermostat".into())
        );
    }

    #[test]
    fn test_category_predicates() {
        assert!(DeviceCategory::Switch.is_switch());
        assert!(DeviceCategory::SwitchPowermeter.is_switch());
        assert!(DeviceCategory::SwitchPowermeter.has_power_meter());
        assert!(!DeviceCategory::Switch.has_power_meter());
        assert!(DeviceCategory::Dimmer.is_dimmer());
        assert!(!DeviceCategory::Dimmer.is_switch());

        let other = DeviceCategory::Other("thermostat".into());
        assert!(!other.is_switch());
        assert!(!other.is_dimmer());
        assert!(!other.has_power_meter());
    }

    #[test]
    fn test_category_serde() {
        let category: DeviceCategory = serde_json::from_str("\"switch_powermeter\"").unwrap();
        assert_eq!(category, DeviceCategory::SwitchPowermeter);
        assert_eq!(
            serde_json::to_string(&DeviceCategory::Dimmer).unwrap(),
            "\"dimmer\""
        );
    }

    #[test]
    fn test_default_sensor_nodes() {
        let nodes = DeviceCategory::SwitchPowermeter.default_sensor_nodes();
        assert!(nodes.contains(&"ENERGY_COUNTER".to_string()));
        assert_eq!(nodes.len(), 5);
        assert!(DeviceCategory::Switch.default_sensor_nodes().is_empty());
    }
}
