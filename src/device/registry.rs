//! Lookup of connected device handles by Homematic address.

use super::DeviceHandle;
use crate::error::{AdapterError, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

/// Connected devices, keyed by address.
///
/// Filled by the device library when it connects; read by platform setup
/// to bind entities to their handles.
#[derive(Default)]
pub struct DeviceRegistry {
    devices: RwLock<HashMap<String, Arc<dyn DeviceHandle>>>,
}

impl DeviceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handle. Replaces any previous handle for the same address.
    pub fn register(&self, handle: Arc<dyn DeviceHandle>) {
        let address = handle.address().to_string();
        if self
            .devices
            .write()
            .insert(address.clone(), handle)
            .is_some()
        {
            log::debug!("[Registry] Replaced handle for {}", address);
        }
    }

    pub fn get(&self, address: &str) -> Result<Arc<dyn DeviceHandle>> {
        self.devices
            .read()
            .get(address)
            .cloned()
            .ok_or_else(|| AdapterError::UnknownDevice(address.to_string()))
    }

    pub fn len(&self) -> usize {
        self.devices.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.read().is_empty()
    }
}
