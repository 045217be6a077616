//! MQTT input source for the Homematic gateway.
//!
//! The gateway publishes every data node change of its devices and accepts
//! commands on a parallel `set` tree.

mod client;
mod integration;
pub mod topics;

pub use client::{MqttClient, MqttMessage};
pub use integration::{IntegrationTasks, MqttIntegration};
