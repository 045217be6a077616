//! Host side of the bridge: switch entities and their lifecycle.

pub mod context;
pub mod dispatcher;
pub mod setup;
pub mod state;
pub mod switch;

pub use context::EntityContext;
pub use dispatcher::{DeviceEvent, Dispatcher};
pub use setup::{setup_platform, setup_switches};
pub use state::EntityState;
pub use switch::{Classification, HmSwitch, StateSchema, classify};
