//! gcodegen Settings Crate
//!
//! Handles the run configuration: defaults, TOML/JSON config files and
//! validation.

pub mod config;
pub mod error;

pub use config::RunConfig;
pub use error::{ConfigError, SettingsError, SettingsResult};
