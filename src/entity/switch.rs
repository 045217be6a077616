//! Switch entity backed by a Homematic switch or dimmer actor.
//!
//! Construction classifies the device and derives which data nodes to track.
//! After that the entity only reads its data map (updated by state pushes)
//! and forwards on/off commands to the device handle.

use super::context::EntityContext;
use crate::device::{DataValue, DeviceCategory, DeviceHandle};
use crate::error::{AdapterError, Result};
use log::{debug, error, info, warn};
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Binary on/off node of switch actors.
pub const STATE_NODE: &str = "STATE";
/// Brightness node of dimmer actors, `0.0..=1.0`.
pub const LEVEL_NODE: &str = "LEVEL";
/// Accumulated energy of power-metering actors, in Wh.
pub const ENERGY_COUNTER_NODE: &str = "ENERGY_COUNTER";
/// Pushed by the gateway when it loses contact with the device.
pub const UNREACH_NODE: &str = "UNREACH";

/// Result of checking whether a device can act as a switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Compatible(DeviceCategory),
    Incompatible(DeviceCategory),
}

/// Decide whether `device` can be represented as a switch.
pub fn classify(device: &dyn DeviceHandle) -> Classification {
    let category = device.category();
    if category.is_switch() || category.is_dimmer() {
        Classification::Compatible(category)
    } else {
        Classification::Incompatible(category)
    }
}

/// Tracked data nodes of one switch entity.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSchema {
    pub state_key: String,
    pub data: HashMap<String, DataValue>,
}

impl StateSchema {
    /// Build the initial data map for a device of `category`.
    ///
    /// Every tracked node starts out as [`DataValue::Unknown`].
    pub fn derive(name: &str, category: &DeviceCategory, sensor_nodes: &[String]) -> Result<Self> {
        let mut state_key = None;
        let mut data = HashMap::new();

        if category.is_switch() {
            state_key = Some(STATE_NODE);
        }
        // Checked after the switch predicate, so a dimmer match wins
        if category.is_dimmer() {
            state_key = Some(LEVEL_NODE);
        }

        if category.has_power_meter() {
            for node in sensor_nodes {
                data.insert(node.clone(), DataValue::Unknown);
            }
        }

        let Some(state_key) = state_key else {
            error!("[Switch] Can't correctly init switch {}", name);
            return Err(AdapterError::SchemaInit(name.to_string()));
        };

        debug!(
            "[Switch] {} init data dict with main node '{}'",
            name, state_key
        );
        data.insert(state_key.to_string(), DataValue::Unknown);

        Ok(Self {
            state_key: state_key.to_string(),
            data,
        })
    }
}

/// A Homematic switch or dimmer exposed as an on/off entity.
pub struct HmSwitch {
    ctx: EntityContext,
    device: Arc<dyn DeviceHandle>,
    state_key: String,
    data: RwLock<HashMap<String, DataValue>>,
    version: AtomicU32,
}

impl HmSwitch {
    /// Bind an entity to a device handle.
    ///
    /// Fails when the device isn't switch-compatible; such an entity must
    /// not be registered.
    pub fn new(ctx: EntityContext, device: Arc<dyn DeviceHandle>) -> Result<Self> {
        let category = match classify(device.as_ref()) {
            Classification::Compatible(category) => category,
            Classification::Incompatible(category) => {
                error!("[Switch] This {} can't be used as switch!", ctx.name());
                return Err(AdapterError::Incompatible {
                    name: ctx.name().to_string(),
                    category: category.to_string(),
                });
            }
        };

        let schema = StateSchema::derive(ctx.name(), &category, &device.sensor_nodes())?;

        Ok(Self {
            ctx,
            device,
            state_key: schema.state_key,
            data: RwLock::new(schema.data),
            version: AtomicU32::new(0),
        })
    }

    pub fn name(&self) -> &str {
        self.ctx.name()
    }

    pub fn address(&self) -> &str {
        self.ctx.address()
    }

    pub fn channel(&self) -> u8 {
        self.ctx.channel()
    }

    pub fn available(&self) -> bool {
        self.ctx.available()
    }

    /// Node the on/off state is derived from.
    pub fn state_key(&self) -> &str {
        &self.state_key
    }

    /// Snapshot of all tracked nodes.
    pub fn data(&self) -> HashMap<String, DataValue> {
        self.data.read().clone()
    }

    /// Tracked nodes other than the state node, for display.
    pub fn state_attributes(&self) -> BTreeMap<String, DataValue> {
        self.data
            .read()
            .iter()
            .filter(|(node, _)| node.as_str() != self.state_key)
            .map(|(node, value)| (node.clone(), value.clone()))
            .collect()
    }

    /// Incremented on every push that changes a tracked value.
    pub fn version(&self) -> u32 {
        self.version.load(Ordering::SeqCst)
    }

    /// Whether the switch is on. Unknown or non-numeric state reads as off.
    pub fn is_on(&self) -> bool {
        match self.data.read().get(&self.state_key).and_then(DataValue::as_number) {
            Some(value) => value > 0.0,
            None => false,
        }
    }

    /// Current power usage in mWh, `None` if the device has no energy counter.
    pub fn current_power_mwh(&self) -> Option<f64> {
        let data = self.data.read();
        let counter = data.get(ENERGY_COUNTER_NODE)?;

        match counter.as_number().map(|wh| wh / 1000.0) {
            Some(power) if power.is_finite() => Some(power),
            _ => Some(0.0),
        }
    }

    pub fn turn_on(&self) {
        self.send(true);
    }

    pub fn turn_off(&self) {
        self.send(false);
    }

    fn send(&self, on: bool) {
        if !self.ctx.available() {
            debug!(
                "[Switch] {} unavailable, ignoring turn {}",
                self.name(),
                if on { "on" } else { "off" }
            );
            return;
        }

        let channel = self.ctx.channel();
        let result = if on {
            self.device.on(channel)
        } else {
            self.device.off(channel)
        };

        if let Err(e) = result {
            warn!(
                "[Switch] {} failed to turn {}: {}",
                self.name(),
                if on { "on" } else { "off" },
                e
            );
        }
    }

    /// Apply a pushed node value.
    ///
    /// The state node is only taken from this entity's channel; sensor nodes
    /// are accepted from any channel of the device. Untracked nodes are
    /// ignored. Returns whether anything changed.
    pub fn apply_event(&self, channel: u8, node: &str, value: DataValue) -> bool {
        if node == UNREACH_NODE {
            let reachable = !value.as_flag().unwrap_or(false);
            let was = self.ctx.set_available(reachable);
            if was != reachable {
                info!(
                    "[Switch] {} is now {}",
                    self.name(),
                    if reachable { "available" } else { "unavailable" }
                );
                self.version.fetch_add(1, Ordering::SeqCst);
                return true;
            }
            return false;
        }

        if node == self.state_key && channel != self.ctx.channel() {
            return false;
        }

        let mut data = self.data.write();
        let Some(slot) = data.get_mut(node) else {
            return false;
        };
        if *slot == value {
            return false;
        }

        debug!("[Switch] {} {} = {}", self.name(), node, value);
        *slot = value;
        self.version.fetch_add(1, Ordering::SeqCst);
        true
    }
}
