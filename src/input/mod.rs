//! Input sources for the bridge.
//!
//! Each input source handles a specific transport and turns its data into
//! device events for the entities.
//!
//! Current input sources:
//! - `mqtt`: Homematic gateway publishing over MQTT

pub mod mqtt;
