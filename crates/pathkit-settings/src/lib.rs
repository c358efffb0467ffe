//! PathKit Settings Crate
//!
//! Handles engine configuration: profiling fidelity, collision options, and
//! optimizer tuning, plus loading and saving them as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{CollisionSettings, Config, OptimizerSettings, ProfilerSettings};
pub use error::{SettingsError, SettingsResult};
