//! Host-facing view of a switch entity.

use super::switch::HmSwitch;
use crate::device::DataValue;
use serde::Serialize;
use std::collections::BTreeMap;

/// What gets published for an entity whenever it changes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityState {
    pub name: String,
    /// `"on"` or `"off"`.
    pub state: &'static str,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_power_mwh: Option<f64>,
    /// Tracked nodes other than the state node.
    pub attributes: BTreeMap<String, DataValue>,
    /// Change counter of the entity.
    pub version: u32,
}

impl From<&HmSwitch> for EntityState {
    fn from(switch: &HmSwitch) -> Self {
        Self {
            name: switch.name().to_string(),
            state: if switch.is_on() { "on" } else { "off" },
            available: switch.available(),
            current_power_mwh: switch.current_power_mwh(),
            attributes: switch.state_attributes(),
            version: switch.version(),
        }
    }
}
