//! slidemap Settings Crate
//!
//! Handles conversion configuration and its persistence as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{Config, GeometrySettings, OutputFormat, OutputSettings, CONFIG_FILE_NAME};
pub use error::{SettingsError, SettingsResult};
