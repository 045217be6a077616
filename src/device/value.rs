//! Values reported by device data nodes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Last known value of a data node.
///
/// Deserializes untagged from a JSON scalar, so `true`, `42`, `0.5` and
/// `"LOW"` all map to the matching variant. `null` maps to [`DataValue::Unknown`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    #[default]
    Unknown,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl DataValue {
    /// Numeric interpretation of the value.
    ///
    /// Booleans count as `1`/`0`. Text and the unknown sentinel have no
    /// numeric meaning and return `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            DataValue::Number(n) => Some(*n),
            DataValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            DataValue::Text(_) | DataValue::Unknown => None,
        }
    }

    /// Boolean interpretation for flag nodes and commands.
    ///
    /// Text is matched case-insensitively against `true`/`on`/`1` and
    /// `false`/`off`/`0`, for gateways that publish flags as strings.
    pub fn as_flag(&self) -> Option<bool> {
        match self {
            DataValue::Bool(b) => Some(*b),
            DataValue::Number(n) => Some(*n > 0.0),
            DataValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "1" => Some(true),
                "false" | "off" | "0" => Some(false),
                _ => None,
            },
            DataValue::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, DataValue::Unknown)
    }

    /// Parse an MQTT payload. Anything that isn't valid JSON is kept as text.
    pub fn from_payload(payload: &str) -> Self {
        let payload = payload.trim();
        if payload.is_empty() {
            return DataValue::Unknown;
        }
        serde_json::from_str(payload).unwrap_or_else(|_| DataValue::Text(payload.to_string()))
    }
}

impl fmt::Display for DataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataValue::Unknown => write!(f, "unknown"),
            DataValue::Bool(b) => write!(f, "{}", b),
            DataValue::Number(n) => write!(f, "{}", n),
            DataValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<f64> for DataValue {
    fn from(value: f64) -> Self {
        DataValue::Number(value)
    }
}

impl From<bool> for DataValue {
    fn from(value: bool) -> Self {
        DataValue::Bool(value)
    }
}

impl From<&str> for DataValue {
    fn from(value: &str) -> Self {
        DataValue::Text(value.to_string())
    }
}
