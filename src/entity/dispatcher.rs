//! Routes state pushes from the device library to the switch entities.

use super::switch::HmSwitch;
use crate::device::DataValue;
use std::collections::HashMap;
use std::sync::Arc;

/// A single node update pushed for a device channel.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceEvent {
    pub address: String,
    pub channel: u8,
    pub node: String,
    pub value: DataValue,
}

impl DeviceEvent {
    pub fn new(
        address: impl Into<String>,
        channel: u8,
        node: impl Into<String>,
        value: impl Into<DataValue>,
    ) -> Self {
        Self {
            address: address.into(),
            channel,
            node: node.into(),
            value: value.into(),
        }
    }
}

/// Switch entities indexed by device address.
///
/// Several entities may share an address (one per channel).
#[derive(Default)]
pub struct Dispatcher {
    switches: HashMap<String, Vec<Arc<HmSwitch>>>,
}

impl Dispatcher {
    pub fn new(switches: impl IntoIterator<Item = Arc<HmSwitch>>) -> Self {
        let mut dispatcher = Self::default();
        for switch in switches {
            dispatcher.add(switch);
        }
        dispatcher
    }

    pub fn add(&mut self, switch: Arc<HmSwitch>) {
        self.switches
            .entry(switch.address().to_string())
            .or_default()
            .push(switch);
    }

    /// Addresses with at least one entity.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.switches.keys().map(String::as_str)
    }

    pub fn switches(&self) -> impl Iterator<Item = &Arc<HmSwitch>> {
        self.switches.values().flatten()
    }

    /// Entity bound to a specific device channel.
    pub fn find(&self, address: &str, channel: u8) -> Option<&Arc<HmSwitch>> {
        self.switches
            .get(address)?
            .iter()
            .find(|switch| switch.channel() == channel)
    }

    /// Apply an event to every entity bound to its address.
    /// Returns the entities that changed.
    pub fn dispatch(&self, event: &DeviceEvent) -> Vec<Arc<HmSwitch>> {
        let Some(switches) = self.switches.get(&event.address) else {
            return Vec::new();
        };
        switches
            .iter()
            .filter(|switch| switch.apply_event(event.channel, &event.node, event.value.clone()))
            .cloned()
            .collect()
    }
}
