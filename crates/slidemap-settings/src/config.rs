//! Configuration for slidemap conversions
//!
//! Provides configuration file handling and validation. Supports JSON and
//! TOML files, picked by extension, with a default location in the
//! platform configuration directory.
//!
//! Configuration is organized into sections:
//! - Geometry (curve sampling, world scale)
//! - Output (format, coordinate precision, formatting)

pub use slidemap_core::units::LengthUnit;
use serde::{Deserialize, Serialize};
use slidemap_geometry::projection::DEFAULT_METRES_PER_EMU;
use slidemap_geometry::DEFAULT_CURVE_SAMPLES;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{SettingsError, SettingsResult};

/// File name looked up in the platform configuration directory.
pub const CONFIG_FILE_NAME: &str = "config.toml";

const MAX_CURVE_SAMPLES: usize = 100_000;
const MAX_COORDINATE_PRECISION: u32 = 15;

/// Output target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One GeoJSON feature collection per layer
    #[default]
    GeoJson,
    /// One SVG document per slide
    Svg,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GeoJson => write!(f, "geojson"),
            Self::Svg => write!(f, "svg"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = SettingsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "geojson" | "json" => Ok(Self::GeoJson),
            "svg" => Ok(Self::Svg),
            other => Err(SettingsError::invalid("output.format", format!("unknown format '{}'", other))),
        }
    }
}

/// Geometry pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometrySettings {
    /// Samples per curve segment when flattening
    pub curve_samples: usize,
    /// World metres per EMU for geographic output
    pub metres_per_emu: f64,
}

impl Default for GeometrySettings {
    fn default() -> Self {
        Self {
            curve_samples: DEFAULT_CURVE_SAMPLES,
            metres_per_emu: DEFAULT_METRES_PER_EMU,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSettings {
    pub format: OutputFormat,
    /// Decimal places kept in longitude/latitude; unset keeps full precision
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coordinate_precision: Option<u32>,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Unit used when logging slide dimensions
    pub report_unit: LengthUnit,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            coordinate_precision: None,
            pretty: true,
            report_unit: LengthUnit::Cm,
        }
    }
}

/// Complete conversion configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub geometry: GeometrySettings,
    pub output: OutputSettings,
}

enum FileFormat {
    Json,
    Toml,
}

fn file_format(path: &Path) -> SettingsResult<FileFormat> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(FileFormat::Json),
        Some("toml") => Ok(FileFormat::Toml),
        other => Err(SettingsError::UnsupportedFormat(
            other.unwrap_or("<none>").to_string(),
        )),
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Default config file location, `<config dir>/slidemap/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("slidemap").join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no configuration directory on this platform".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = file_format(path)?;
        let content = std::fs::read_to_string(path)?;

        let config: Self = match format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match file_format(path)? {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        debug!("Saved config to {}", path.display());
        Ok(())
    }

    /// Load `path` if given, else the default file if it exists, else
    /// defaults.
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Ok(default) if default.is_file() => {
                info!("Using config {}", default.display());
                Self::load_from_file(&default)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        let samples = self.geometry.curve_samples;
        if samples == 0 || samples > MAX_CURVE_SAMPLES {
            return Err(SettingsError::invalid(
                "geometry.curve_samples",
                format!("must be between 1 and {}", MAX_CURVE_SAMPLES),
            ));
        }

        let scale = self.geometry.metres_per_emu;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(SettingsError::invalid(
                "geometry.metres_per_emu",
                "must be a finite value > 0",
            ));
        }

        if let Some(precision) = self.output.coordinate_precision {
            if precision > MAX_COORDINATE_PRECISION {
                return Err(SettingsError::invalid(
                    "output.coordinate_precision",
                    format!("must be at most {}", MAX_COORDINATE_PRECISION),
                ));
            }
        }

        Ok(())
    }
}
