//! Rosetta Settings Crate
//!
//! Handles the panel configuration file: dispatch timeouts, index rounding,
//! start-up values for every axis and spindle, and help links.

pub mod config;
pub mod error;

pub use config::{
    Config, DispatchSettings, HelpLinks, HelpResource, IndexSettings, LinearAxisDefaults,
    PanelDefaults, RotaryAxisDefaults, SpindleDefaults,
};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
