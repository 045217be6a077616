//! Homematic switch bridge library.
//!
//! Exposes Homematic switch and dimmer actors as on/off entities, with
//! optional energy metering for power-meter actors.

pub mod config;
pub mod device;
pub mod entity;
pub mod error;
pub mod input;
