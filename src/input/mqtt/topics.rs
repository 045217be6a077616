//! Topic layout of the Homematic gateway.
//!
//! Device side, owned by the gateway:
//! - state pushes: `{prefix}/status/{address}/{channel}/{NODE}`
//! - commands:     `{prefix}/set/{address}/{channel}/{NODE}`
//!
//! Entity side, owned by the bridge:
//! - entity state: `{prefix}/entity/{address}/{channel}/state` (JSON, retained)
//! - on/off:       `{prefix}/entity/{address}/{channel}/set` (`true`/`false`)

use crate::device::DataValue;
use crate::entity::DeviceEvent;

/// Wildcard filter covering every state push.
pub fn status_filter(prefix: &str) -> String {
    format!("{}/status/#", prefix)
}

pub fn set_topic(prefix: &str, address: &str, channel: u8, node: &str) -> String {
    format!("{}/set/{}/{}/{}", prefix, address, channel, node)
}

/// Wildcard filter covering every entity command.
pub fn entity_command_filter(prefix: &str) -> String {
    format!("{}/entity/+/+/set", prefix)
}

pub fn entity_state_topic(prefix: &str, address: &str, channel: u8) -> String {
    format!("{}/entity/{}/{}/state", prefix, address, channel)
}

/// On/off command addressed to an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityCommand {
    pub address: String,
    pub channel: u8,
    pub on: bool,
}

/// Parse an entity command. Payloads that aren't a recognizable flag are
/// rejected.
pub fn parse_entity_command(prefix: &str, topic: &str, payload: &str) -> Option<EntityCommand> {
    let rest = topic.strip_prefix(prefix)?.strip_prefix("/entity/")?;
    let mut parts = rest.split('/');
    let address = parts.next().filter(|a| !a.is_empty())?;
    let channel = parts.next()?.parse().ok()?;
    if parts.next()? != "set" || parts.next().is_some() {
        return None;
    }

    Some(EntityCommand {
        address: address.to_string(),
        channel,
        on: DataValue::from_payload(payload).as_flag()?,
    })
}

/// Turn a state push into a device event. Returns `None` for topics outside
/// the status tree or with a malformed channel.
pub fn parse_status(prefix: &str, topic: &str, payload: &str) -> Option<DeviceEvent> {
    let rest = topic.strip_prefix(prefix)?.strip_prefix("/status/")?;
    let mut parts = rest.split('/');
    let address = parts.next().filter(|a| !a.is_empty())?;
    let channel = parts.next()?.parse().ok()?;
    let node = parts.next().filter(|n| !n.is_empty())?;
    if parts.next().is_some() {
        return None;
    }

    Some(DeviceEvent::new(
        address,
        channel,
        node,
        DataValue::from_payload(payload),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics() {
        assert_eq!(status_filter("homematic"), "homematic/status/#");
        assert_eq!(
            set_topic("homematic", "JEQ0000001", 1, "STATE"),
            "homematic/set/JEQ0000001/1/STATE"
        );
    }

    #[test]
    fn test_entity_topics() {
        assert_eq!(entity_command_filter("homematic"), "homematic/entity/+/+/set");
        assert_eq!(
            entity_state_topic("homematic", "JEQ0000001", 1),
            "homematic/entity/JEQ0000001/1/state"
        );
    }

    #[test]
    fn test_parse_entity_command() {
        assert_eq!(
            parse_entity_command("homematic", "homematic/entity/JEQ0000001/2/set", "ON"),
            Some(EntityCommand {
                address: "JEQ0000001".into(),
                channel: 2,
                on: true,
            })
        );
        assert_eq!(
            parse_entity_command("homematic", "homematic/entity/JEQ0000001/1/set", "false")
                .map(|c| c.on),
            Some(false)
        );
        assert!(parse_entity_command("homematic", "homematic/entity/JEQ0000001/1/set", "dim").is_none());
        assert!(
            parse_entity_command("homematic", "homematic/entity/JEQ0000001/1/state", "true")
                .is_none()
        );
        assert!(
            parse_entity_command("homematic", "homematic/status/JEQ0000001/1/STATE", "true")
                .is_none()
        );
    }

    #[test]
    fn test_parse_status() {
        let event = parse_status("homematic", "homematic/status/JEQ0000001/2/ENERGY_COUNTER", "4500")
            .unwrap();
        assert_eq!(
            event,
            DeviceEvent::new("JEQ0000001", 2, "ENERGY_COUNTER", 4500.0)
        );
    }

    #[test]
    fn test_parse_status_rejects_malformed() {
        assert!(parse_status("homematic", "homematic/set/JEQ0000001/1/STATE", "true").is_none());
        assert!(parse_status("homematic", "other/status/JEQ0000001/1/STATE", "true").is_none());
        assert!(parse_status("homematic", "homematic/status/JEQ0000001/x/STATE", "true").is_none());
        assert!(parse_status("homematic", "homematic/status/JEQ0000001/1", "true").is_none());
        assert!(
            parse_status("homematic", "homematic/status/JEQ0000001/1/STATE/extra", "true")
                .is_none()
        );
    }
}
