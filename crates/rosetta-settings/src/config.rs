//! Configuration for the Rosetta panel
//!
//! Provides configuration file handling and validation.
//! Supports JSON and TOML file formats, by file extension.
//!
//! Configuration is organized into logical sections:
//! - Dispatch timeouts for controller waits
//! - Index rounding for resolved angles
//! - Start-up values for every axis and spindle
//! - Help links shown on the panel

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
use rosetta_core::{round_to, IndexMode, LinearAxis};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR_NAME: &str = "rosetta";
const CONFIG_FILE_NAME: &str = "config.toml";
const MAX_INDEX_PRECISION: u32 = 12;

/// Controller wait limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DispatchSettings {
    /// Maximum wait for the switch into MDI mode, in milliseconds
    pub mode_timeout_ms: u64,
    /// Maximum wait for a single command to complete, in milliseconds
    pub command_timeout_ms: u64,
}

impl DispatchSettings {
    pub fn mode_timeout(&self) -> Duration {
        Duration::from_millis(self.mode_timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            mode_timeout_ms: 5_000,
            command_timeout_ms: 120_000,
        }
    }
}

/// Rounding applied to resolved index angles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    /// Round resolved angles at all
    pub round_degrees: bool,
    /// Decimal places kept when rounding
    pub precision: u32,
}

impl IndexSettings {
    /// Decimal places to round to, `None` when rounding is off
    pub fn precision(&self) -> Option<u32> {
        self.round_degrees.then_some(self.precision)
    }
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            round_degrees: true,
            precision: 1,
        }
    }
}

/// Start-up values for a linear axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LinearAxisDefaults {
    pub feed_rate: f64,
    pub index_distance: f64,
    pub move_distance: f64,
}

impl Default for LinearAxisDefaults {
    fn default() -> Self {
        Self {
            feed_rate: 1.0,
            index_distance: 0.0,
            move_distance: 0.0,
        }
    }
}

/// Start-up values for the rotary B axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotaryAxisDefaults {
    pub feed_rate: f64,
    pub index_distance: f64,
    pub index_mode: IndexMode,
    pub move_distance: f64,
}

impl Default for RotaryAxisDefaults {
    fn default() -> Self {
        Self {
            feed_rate: 10.0,
            index_distance: 90.0,
            index_mode: IndexMode::Degrees,
            move_distance: 0.0,
        }
    }
}

/// Start-up values for the two spindles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpindleDefaults {
    /// Primary spindle speed
    pub speed: f64,
    /// Primary spindle index distance
    pub index_distance: f64,
    /// Index mode shared by both spindles
    pub index_mode: IndexMode,
    /// Secondary spindle index distance
    pub secondary_index_distance: f64,
    /// Secondary spindle speed as a percentage of the primary
    pub secondary_percent: f64,
}

impl Default for SpindleDefaults {
    fn default() -> Self {
        Self {
            speed: 1.0,
            index_distance: 90.0,
            index_mode: IndexMode::Degrees,
            secondary_index_distance: 90.0,
            secondary_percent: 100.0,
        }
    }
}

/// Start-up values for the whole panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PanelDefaults {
    pub u: LinearAxisDefaults,
    pub v: LinearAxisDefaults,
    pub x: LinearAxisDefaults,
    pub y: LinearAxisDefaults,
    pub z: LinearAxisDefaults,
    pub b: RotaryAxisDefaults,
    pub spindle: SpindleDefaults,
}

impl PanelDefaults {
    /// Defaults for one linear axis
    pub fn linear(&self, axis: LinearAxis) -> &LinearAxisDefaults {
        match axis {
            LinearAxis::U => &self.u,
            LinearAxis::V => &self.v,
            LinearAxis::X => &self.x,
            LinearAxis::Y => &self.y,
            LinearAxis::Z => &self.z,
        }
    }

    pub fn linear_mut(&mut self, axis: LinearAxis) -> &mut LinearAxisDefaults {
        match axis {
            LinearAxis::U => &mut self.u,
            LinearAxis::V => &mut self.v,
            LinearAxis::X => &mut self.x,
            LinearAxis::Y => &mut self.y,
            LinearAxis::Z => &mut self.z,
        }
    }
}

/// Panel help links
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HelpResource {
    GcodeLibrary,
    Library,
    UserManual,
}

/// URLs opened by the panel's help buttons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HelpLinks {
    pub gcode_library: String,
    pub library: String,
    pub user_manual: String,
}

impl HelpLinks {
    pub fn url(&self, resource: HelpResource) -> &str {
        match resource {
            HelpResource::GcodeLibrary => &self.gcode_library,
            HelpResource::Library => &self.library,
            HelpResource::UserManual => &self.user_manual,
        }
    }
}

impl Default for HelpLinks {
    fn default() -> Self {
        Self {
            gcode_library: "https://gcode.RoseEngineButler.com".to_string(),
            library: "https://www.RoseEngineButler.com".to_string(),
            user_manual: "https://manual.RoseEngineButler.com".to_string(),
        }
    }
}

/// Complete panel configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub dispatch: DispatchSettings,
    pub index: IndexSettings,
    pub defaults: PanelDefaults,
    pub links: HelpLinks,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config file location, e.g. `~/.config/rosetta/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".into())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = FileFormat::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        tracing::debug!("Loaded settings from {}", path.display());
        Ok(config)
    }

    /// Load config from file, falling back to defaults when the file does not exist
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::info!("No settings at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;
        let format = FileFormat::from_path(path)?;

        let content = match format {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.dispatch.mode_timeout_ms == 0 {
            return Err(out_of_range("dispatch.mode_timeout_ms", self.dispatch.mode_timeout_ms));
        }
        if self.dispatch.command_timeout_ms == 0 {
            return Err(out_of_range(
                "dispatch.command_timeout_ms",
                self.dispatch.command_timeout_ms,
            ));
        }
        if self.index.precision > MAX_INDEX_PRECISION {
            return Err(out_of_range("index.precision", self.index.precision));
        }

        for axis in LinearAxis::ALL {
            let defaults = self.defaults.linear(axis);
            let key = axis.letter().to_ascii_lowercase();
            check_feed(&format!("defaults.{}.feed_rate", key), defaults.feed_rate)?;
            check_finite(&format!("defaults.{}.index_distance", key), defaults.index_distance)?;
            check_finite(&format!("defaults.{}.move_distance", key), defaults.move_distance)?;
        }

        let b = &self.defaults.b;
        check_feed("defaults.b.feed_rate", b.feed_rate)?;
        check_finite("defaults.b.move_distance", b.move_distance)?;
        let precision = self.index.precision();
        check_index("defaults.b.index_distance", b.index_distance, b.index_mode, precision)?;

        let spindle = &self.defaults.spindle;
        check_feed("defaults.spindle.speed", spindle.speed)?;
        check_feed("defaults.spindle.secondary_percent", spindle.secondary_percent)?;
        check_index(
            "defaults.spindle.index_distance",
            spindle.index_distance,
            spindle.index_mode,
            precision,
        )?;
        check_index(
            "defaults.spindle.secondary_index_distance",
            spindle.secondary_index_distance,
            spindle.index_mode,
            precision,
        )?;

        Ok(())
    }
}

enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

fn out_of_range(key: &str, value: impl ToString) -> ConfigError {
    ConfigError::ValueOutOfRange {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn check_finite(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}

fn check_feed(key: &str, value: f64) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(out_of_range(key, value))
    }
}

/// The distance must give a usable angle once rounded
fn check_index(
    key: &str,
    value: f64,
    mode: IndexMode,
    precision: Option<u32>,
) -> ConfigResult<()> {
    let degrees = mode
        .resolve_degrees(value)
        .map(|degrees| precision.map_or(degrees, |places| round_to(degrees, places)));
    match degrees {
        Some(degrees) if mode == IndexMode::Degrees || degrees != 0.0 => Ok(()),
        _ => Err(out_of_range(key, value)),
    }
}
