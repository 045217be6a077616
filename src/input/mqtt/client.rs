//! MQTT client wrapper for the Homematic gateway.

use crate::config::MqttConfig;
use log::{debug, error, info, warn};
use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS};
use std::time::Duration;
use tokio::sync::mpsc;

/// Message received from MQTT broker.
#[derive(Debug, Clone)]
pub struct MqttMessage {
    pub topic: String,
    pub payload: String,
}

/// MQTT client for the gateway's topic tree.
pub struct MqttClient {
    client: AsyncClient,
    event_loop: EventLoop,
    subscriptions: Vec<String>,
}

impl MqttClient {
    /// Create a new MQTT client from configuration.
    pub fn new(config: &MqttConfig) -> Self {
        let mut options =
            MqttOptions::new(&config.client_id, &config.broker_host, config.broker_port);
        options.set_keep_alive(Duration::from_secs(30));

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            options.set_credentials(username, password);
        }

        let (client, event_loop) = AsyncClient::new(options, 100);

        Self {
            client,
            event_loop,
            subscriptions: Vec::new(),
        }
    }

    /// Topic filter to (re)subscribe to on every connection.
    pub fn subscribe_on_connect(&mut self, topic: impl Into<String>) {
        self.subscriptions.push(topic.into());
    }

    /// Run the MQTT event loop and forward messages to the provided channel.
    ///
    /// Runs until the receiving side of the channel is dropped. Connection
    /// errors are retried after a delay.
    pub async fn run(mut self, tx: mpsc::Sender<MqttMessage>) {
        info!("[MQTT] Starting event loop");

        loop {
            match self.event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(_))) => {
                    info!("[MQTT] Connected");
                    for topic in &self.subscriptions {
                        if let Err(e) = self.client.try_subscribe(topic, QoS::AtLeastOnce) {
                            warn!("[MQTT] Failed to subscribe to {}: {:?}", topic, e);
                        } else {
                            info!("[MQTT] Subscribed to {}", topic);
                        }
                    }
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    let topic = publish.topic.clone();
                    let payload = match String::from_utf8(publish.payload.to_vec()) {
                        Ok(s) => s,
                        Err(e) => {
                            warn!("[MQTT] Invalid UTF-8 in payload on {}: {}", topic, e);
                            continue;
                        }
                    };

                    debug!("[MQTT] Received on {}: {}", topic, payload);

                    if tx.send(MqttMessage { topic, payload }).await.is_err() {
                        error!("[MQTT] Message channel closed");
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    error!("[MQTT] Connection error: {:?}", e);
                    tokio::time::sleep(Duration::from_secs(5)).await;
                }
            }
        }
    }

    /// Get a clone of the async client for publishing from other tasks.
    pub fn client(&self) -> AsyncClient {
        self.client.clone()
    }
}
