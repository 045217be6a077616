//! Platform setup: turn switch configuration into registered entities.

use super::context::EntityContext;
use super::switch::HmSwitch;
use crate::config::SwitchConfig;
use crate::device::DeviceRegistry;
use crate::error::Result;
use log::{error, info};
use std::sync::Arc;

/// Create the switch entity for one configuration entry.
///
/// Discovery info, when present, replaces the configured entry.
pub fn setup_platform(
    config: &SwitchConfig,
    discovery_info: Option<&SwitchConfig>,
    registry: &DeviceRegistry,
) -> Result<HmSwitch> {
    let config = discovery_info.unwrap_or(config);
    let device = registry.get(&config.address)?;
    HmSwitch::new(EntityContext::from_config(config), device)
}

/// Create entities for every entry, skipping the ones that can't be set up.
pub fn setup_switches(configs: &[SwitchConfig], registry: &DeviceRegistry) -> Vec<Arc<HmSwitch>> {
    let switches: Vec<Arc<HmSwitch>> = configs
        .iter()
        .filter_map(|config| match setup_platform(config, None, registry) {
            Ok(switch) => {
                info!(
                    "[Setup] Switch '{}' bound to {}:{} via {}",
                    switch.name(),
                    switch.address(),
                    switch.channel(),
                    switch.state_key()
                );
                Some(Arc::new(switch))
            }
            Err(e) => {
                error!("[Setup] Skipping switch {}: {}", config.address, e);
                None
            }
        })
        .collect();

    info!(
        "[Setup] {} of {} switch(es) registered",
        switches.len(),
        configs.len()
    );
    switches
}
