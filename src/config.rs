use crate::device::DeviceCategory;
use crate::error::{AdapterError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Channel used when a switch entry doesn't name one.
pub const DEFAULT_CHANNEL: u8 = 1;

/// Load environment variables from a .env file in the working directory.
/// Must run before any other thread is started.
/// Values may contain spaces without quotes; surrounding quotes are stripped.
pub fn load_dotenv() {
    load_dotenv_from(Path::new(".env"));
}

fn load_dotenv_from(env_path: &Path) {
    let Ok(content) = fs::read_to_string(env_path) else {
        return;
    };

    for (key, value) in parse_dotenv(&content) {
        // Existing env vars win
        if std::env::var(&key).is_err() {
            // SAFETY: only called from main before the tokio runtime is built,
            // while the process is still single-threaded
            unsafe { std::env::set_var(key, value) };
        }
    }
}

fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            let mut value = value.trim();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }
            Some((key.trim().to_string(), value.to_string()))
        })
        .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub mqtt: MqttConfig,
    /// Devices known to the gateway.
    #[serde(default)]
    pub devices: Vec<DeviceConfig>,
    /// Switch entities to expose.
    #[serde(default)]
    pub switches: Vec<SwitchConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MqttConfig {
    pub broker_host: String,
    pub broker_port: u16,
    pub client_id: String,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Root of the gateway's topic tree.
    pub topic_prefix: String,
}

impl Default for MqttConfig {
    fn default() -> Self {
        Self {
            broker_host: "localhost".to_string(),
            broker_port: 1883,
            client_id: "hm-switch-bridge".to_string(),
            username: None,
            password: None,
            topic_prefix: "homematic".to_string(),
        }
    }
}

/// A device as reported by the gateway.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub address: String,
    pub category: DeviceCategory,
    /// Overrides the category's default sensor nodes.
    #[serde(default)]
    pub sensor_nodes: Option<Vec<String>>,
}

impl DeviceConfig {
    pub fn sensor_nodes(&self) -> Vec<String> {
        self.sensor_nodes
            .clone()
            .unwrap_or_else(|| self.category.default_sensor_nodes())
    }
}

/// One switch entity.
///
/// ```json
/// { "address": "JEQ0123456", "name": "Kitchen", "button": 1 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwitchConfig {
    pub address: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Channel to map; device-dependent.
    #[serde(default)]
    pub button: Option<u8>,
}

impl SwitchConfig {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            name: None,
            button: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_button(mut self, button: u8) -> Self {
        self.button = Some(button);
        self
    }

    pub fn channel(&self) -> u8 {
        self.button.unwrap_or(DEFAULT_CHANNEL)
    }

    /// Display name, falling back to the address.
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| self.address.clone())
    }
}

impl Config {
    /// Default configuration file location.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("hm-switch-bridge")
            .join("config.json")
    }

    /// Parse a JSON configuration document.
    pub fn from_json(content: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file, then apply environment overrides.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let mut config = Self::from_json(&content)?;
        config.apply_env();
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if let Some(switch) = self.switches.iter().find(|s| s.address.trim().is_empty()) {
            return Err(AdapterError::InvalidConfig(format!(
                "switch entry {:?} has an empty address",
                switch.name
            )));
        }
        if let Some(device) = self.devices.iter().find(|d| d.address.trim().is_empty()) {
            return Err(AdapterError::InvalidConfig(format!(
                "{} device entry has an empty address",
                device.category
            )));
        }
        Ok(())
    }

    /// Override MQTT settings from the environment.
    pub fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("MQTT_BROKER_HOST") {
            self.mqtt.broker_host = host;
        }
        if let Ok(port) = std::env::var("MQTT_BROKER_PORT")
            && let Ok(p) = port.parse()
        {
            self.mqtt.broker_port = p;
        }
        if let Ok(client_id) = std::env::var("MQTT_CLIENT_ID") {
            self.mqtt.client_id = client_id;
        }
        if let Ok(username) = std::env::var("MQTT_USERNAME") {
            self.mqtt.username = Some(username);
        }
        if let Ok(password) = std::env::var("MQTT_PASSWORD") {
            self.mqtt.password = Some(password);
        }
        if let Ok(prefix) = std::env::var("MQTT_TOPIC_PREFIX") {
            self.mqtt.topic_prefix = prefix;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dotenv() {
        let content = r#"
# comment
MQTT_BROKER_HOST = 10.0.0.2
MQTT_USERNAME="bridge user"
MQTT_PASSWORD='secret'
not a pair
"#;
        let pairs = parse_dotenv(content);
        assert_eq!(
            pairs,
            vec![
                ("MQTT_BROKER_HOST".to_string(), "10.0.0.2".to_string()),
                ("MQTT_USERNAME".to_string(), "bridge user".to_string()),
                ("MQTT_PASSWORD".to_string(), "secret".to_string()),
            ]
        );
    }

    #[test]
    fn test_from_json() {
        let config = Config::from_json(
            r#"{
                "mqtt": { "broker_host": "10.0.0.2" },
                "devices": [
                    { "address": "JEQ0000001", "category": "switch_powermeter" },
                    { "address": "JEQ0000002", "category": "dimmer" }
                ],
                "switches": [
                    { "address": "JEQ0000001", "name": "Washer" },
                    { "address": "JEQ0000002", "button": 3 }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.mqtt.broker_host, "10.0.0.2");
        assert_eq!(config.mqtt.broker_port, 1883);
        assert_eq!(config.mqtt.topic_prefix, "homematic");
        assert_eq!(config.devices[0].category, DeviceCategory::SwitchPowermeter);
        assert_eq!(config.devices[0].sensor_nodes().len(), 5);
        assert_eq!(config.switches[0].channel(), DEFAULT_CHANNEL);
        assert_eq!(config.switches[0].display_name(), "Washer");
        assert_eq!(config.switches[1].channel(), 3);
        assert_eq!(config.switches[1].display_name(), "JEQ0000002");
    }

    #[test]
    fn test_empty_address_rejected() {
        let result = Config::from_json(r#"{ "switches": [ { "address": " " } ] }"#);
        assert!(matches!(result, Err(AdapterError::InvalidConfig(_))));
    }

    #[test]
    fn test_sensor_node_override() {
        let device = DeviceConfig {
            address: "JEQ0000001".into(),
            category: DeviceCategory::SwitchPowermeter,
            sensor_nodes: Some(vec!["POWER".into()]),
        };
        assert_eq!(device.sensor_nodes(), vec!["POWER".to_string()]);
    }
}
