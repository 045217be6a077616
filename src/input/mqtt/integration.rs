//! MQTT integration: connects the switch entities to the gateway.
//!
//! State pushes from the gateway update the entities, on/off commands on the
//! entity tree are forwarded to them, and every entity change is published
//! back as a retained JSON state.

use super::client::{MqttClient, MqttMessage};
use super::topics;
use crate::entity::{Dispatcher, EntityState, HmSwitch};
use log::{debug, info, warn};
use rumqttc::{AsyncClient, QoS};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Routes gateway and entity traffic.
pub struct MqttIntegration {
    topic_prefix: String,
    dispatcher: Dispatcher,
    publisher: Option<AsyncClient>,
}

/// Tasks spawned by [`MqttIntegration::start`].
pub struct IntegrationTasks {
    router: JoinHandle<()>,
    mqtt_loop: JoinHandle<()>,
}

impl IntegrationTasks {
    /// Stop both the message router and the MQTT event loop.
    pub fn abort(&self) {
        self.router.abort();
        self.mqtt_loop.abort();
    }
}

impl MqttIntegration {
    pub fn new(topic_prefix: impl Into<String>, dispatcher: Dispatcher) -> Self {
        Self {
            topic_prefix: topic_prefix.into(),
            dispatcher,
            publisher: None,
        }
    }

    /// Publish entity state through `client`.
    pub fn with_publisher(mut self, client: AsyncClient) -> Self {
        self.publisher = Some(client);
        self
    }

    /// Handle one message. Returns how many entities it reached.
    pub fn process_message(&self, msg: &MqttMessage) -> usize {
        if let Some(event) = topics::parse_status(&self.topic_prefix, &msg.topic, &msg.payload) {
            let changed = self.dispatcher.dispatch(&event);
            for switch in &changed {
                self.publish_state(switch);
            }
            return changed.len();
        }

        if let Some(command) =
            topics::parse_entity_command(&self.topic_prefix, &msg.topic, &msg.payload)
        {
            let Some(switch) = self.dispatcher.find(&command.address, command.channel) else {
                warn!(
                    "[MQTT] No switch for {}:{}, ignoring command",
                    command.address, command.channel
                );
                return 0;
            };
            info!(
                "[MQTT] Turning {} {}",
                switch.name(),
                if command.on { "on" } else { "off" }
            );
            if command.on {
                switch.turn_on();
            } else {
                switch.turn_off();
            }
            return 1;
        }

        debug!("[MQTT] Ignoring message on {}", msg.topic);
        0
    }

    /// Publish the retained state of every entity.
    pub fn publish_all(&self) {
        for switch in self.dispatcher.switches() {
            self.publish_state(switch);
        }
    }

    fn publish_state(&self, switch: &HmSwitch) {
        let Some(client) = &self.publisher else {
            return;
        };

        let topic = topics::entity_state_topic(&self.topic_prefix, switch.address(), switch.channel());
        let payload = match serde_json::to_vec(&EntityState::from(switch)) {
            Ok(payload) => payload,
            Err(e) => {
                warn!("[MQTT] Failed to encode state of {}: {}", switch.name(), e);
                return;
            }
        };
        if let Err(e) = client.try_publish(topic, QoS::AtLeastOnce, true, payload) {
            warn!("[MQTT] Failed to publish state of {}: {:?}", switch.name(), e);
        }
    }

    /// Start the integration.
    ///
    /// Spawns the client's event loop and a task routing its messages.
    /// Abort the returned tasks on shutdown.
    pub fn start(self, mut mqtt_client: MqttClient) -> IntegrationTasks {
        mqtt_client.subscribe_on_connect(topics::status_filter(&self.topic_prefix));
        mqtt_client.subscribe_on_connect(topics::entity_command_filter(&self.topic_prefix));

        let (msg_tx, msg_rx) = mpsc::channel::<MqttMessage>(64);
        let mqtt_loop = tokio::spawn(mqtt_client.run(msg_tx));

        let router = tokio::spawn(async move {
            info!(
                "[MQTT] Integration started for {} device(s)",
                self.dispatcher.addresses().count()
            );
            self.publish_all();
            self.run(msg_rx).await;
        });

        IntegrationTasks { router, mqtt_loop }
    }

    async fn run(&self, mut msg_rx: mpsc::Receiver<MqttMessage>) {
        while let Some(msg) = msg_rx.recv().await {
            self.process_message(&msg);
        }
    }
}
