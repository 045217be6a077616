//! Device handle that drives an actor through the MQTT gateway.

use super::{DeviceCategory, DeviceHandle};
use crate::config::DeviceConfig;
use crate::entity::switch::{LEVEL_NODE, STATE_NODE};
use crate::error::Result;
use crate::input::mqtt::topics::set_topic;
use log::debug;
use rumqttc::{AsyncClient, QoS};

/// Node and payload that switch a device of `category` on or off.
///
/// Dimmers are driven through their level, everything else through `STATE`.
pub fn command_payload(category: &DeviceCategory, on: bool) -> (&'static str, &'static str) {
    match (category.is_dimmer(), on) {
        (true, true) => (LEVEL_NODE, "1.0"),
        (true, false) => (LEVEL_NODE, "0.0"),
        (false, true) => (STATE_NODE, "true"),
        (false, false) => (STATE_NODE, "false"),
    }
}

pub struct MqttDevice {
    address: String,
    category: DeviceCategory,
    sensor_nodes: Vec<String>,
    topic_prefix: String,
    client: AsyncClient,
}

impl MqttDevice {
    pub fn new(config: &DeviceConfig, topic_prefix: impl Into<String>, client: AsyncClient) -> Self {
        Self {
            address: config.address.clone(),
            category: config.category.clone(),
            sensor_nodes: config.sensor_nodes(),
            topic_prefix: topic_prefix.into(),
            client,
        }
    }

    fn command(&self, channel: u8, on: bool) -> Result<()> {
        let (node, payload) = command_payload(&self.category, on);
        let topic = set_topic(&self.topic_prefix, &self.address, channel, node);
        debug!("[MQTT] Publishing to {}: {}", topic, payload);
        // Non-blocking: entity commands are called from synchronous contexts
        self.client
            .try_publish(topic, QoS::AtLeastOnce, false, payload.as_bytes())?;
        Ok(())
    }
}

impl DeviceHandle for MqttDevice {
    fn address(&self) -> &str {
        &self.address
    }

    fn category(&self) -> DeviceCategory {
        self.category.clone()
    }

    fn sensor_nodes(&self) -> Vec<String> {
        self.sensor_nodes.clone()
    }

    fn on(&self, channel: u8) -> Result<()> {
        self.command(channel, true)
    }

    fn off(&self, channel: u8) -> Result<()> {
        self.command(channel, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_payload() {
        assert_eq!(
            command_payload(&DeviceCategory::Switch, true),
            ("STATE", "true")
        );
        assert_eq!(
            command_payload(&DeviceCategory::SwitchPowermeter, false),
            ("STATE", "false")
        );
        assert_eq!(command_payload(&DeviceCategory::Dimmer, true), ("LEVEL", "1.0"));
        assert_eq!(command_payload(&DeviceCategory::Dimmer, false), ("LEVEL", "0.0"));
    }

    #[tokio::test]
    async fn test_mqtt_device_queues_commands() {
        let options = rumqttc::MqttOptions::new("test", "localhost", 1883);
        let (client, _event_loop) = AsyncClient::new(options, 10);
        let config = DeviceConfig {
            address: "JEQ0000001".into(),
            category: DeviceCategory::SwitchPowermeter,
            sensor_nodes: None,
        };
        let device = MqttDevice::new(&config, "homematic", client);

        assert_eq!(device.address(), "JEQ0000001");
        assert_eq!(device.sensor_nodes().len(), 5);
        // The request queue accepts commands while the event loop is idle
        assert!(device.on(1).is_ok());
        assert!(device.off(1).is_ok());
    }
}
