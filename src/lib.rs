pub mod config;
pub mod error;
pub mod sim;
pub mod testutil;

pub use config::SimConfig;
pub use error::{ConfigError, SimError};
pub use sim::{Message, MessageBus, MessageKind, SimSystem, Simulation, Tier};
