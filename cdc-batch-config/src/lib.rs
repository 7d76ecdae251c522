//! Configuration for the change-event batching handler.
//!
//! Holds the serde types describing which tables are handled, the column filters applied to
//! their update batches and the recovery behavior on action failures, together with the layered
//! file and environment loader used by services embedding the handler.

mod environment;
mod load;
pub mod shared;

pub use environment::Environment;
pub use load::{Config, LoadConfigError, load_config, load_config_from};
