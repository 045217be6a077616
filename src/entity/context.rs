//! Identity and availability of an entity.

use crate::config::SwitchConfig;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// What the host knows about an entity independent of its device type.
///
/// Clones share the availability flag.
#[derive(Debug, Clone)]
pub struct EntityContext {
    name: String,
    address: String,
    channel: u8,
    available: Arc<AtomicBool>,
}

impl EntityContext {
    pub fn new(name: impl Into<String>, address: impl Into<String>, channel: u8) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            channel,
            available: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn from_config(config: &SwitchConfig) -> Self {
        Self::new(config.display_name(), config.address.clone(), config.channel())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    pub fn available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    /// Returns the previous value.
    pub fn set_available(&self, available: bool) -> bool {
        self.available.swap(available, Ordering::SeqCst)
    }
}
