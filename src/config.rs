use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::TrackerError;
use crate::logging::LogConfig;
use crate::models::BodyParameters;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application metadata
    pub metadata: ConfigMetadata,

    /// Formula constants
    #[serde(default)]
    pub constants: TrackerConstants,

    /// Body parameters used when none are given on the command line
    #[serde(default)]
    pub body: BodyDefaults,

    /// Daily step summary settings
    #[serde(default)]
    pub day: DaySettings,

    /// Logging settings
    #[serde(default)]
    pub logging: LogConfig,
}

/// Configuration metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigMetadata {
    /// Configuration format version
    pub version: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

/// Numeric constants shared by every formula.
///
/// Loaded once and handed to the calculator, which never mutates them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackerConstants {
    /// Fixed step length in meters
    pub step_length_m: f64,

    pub meters_per_km: f64,

    pub minutes_per_hour: f64,

    /// Step length as a fraction of height
    pub step_length_coefficient: f64,

    /// Share of the running calorie formula spent while walking
    pub walking_calories_coefficient: f64,
}

impl Default for TrackerConstants {
    fn default() -> Self {
        Self {
            step_length_m: 0.65,
            meters_per_km: 1000.0,
            minutes_per_hour: 60.0,
            step_length_coefficient: 0.45,
            walking_calories_coefficient: 0.5,
        }
    }
}

/// Default body parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDefaults {
    /// Weight in kilograms
    pub weight_kg: f64,

    /// Height in centimeters
    pub height_cm: f64,
}

impl Default for BodyDefaults {
    fn default() -> Self {
        Self {
            weight_kg: 75.0,
            height_cm: 175.0,
        }
    }
}

impl From<BodyDefaults> for BodyParameters {
    fn from(defaults: BodyDefaults) -> Self {
        BodyParameters::new(defaults.weight_kg, defaults.height_cm)
    }
}

/// How the daily summary turns steps into distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStride {
    /// Step length derived from height
    #[default]
    Height,
    /// Fixed step length from the constants
    Fixed,
}

/// Daily step summary settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DaySettings {
    #[serde(default)]
    pub stride: DayStride,
}

impl Default for AppConfig {
    fn default() -> Self {
        let now = Utc::now();

        AppConfig {
            metadata: ConfigMetadata {
                version: "1.0".to_string(),
                created_at: now,
                updated_at: now,
            },
            constants: TrackerConstants::default(),
            body: BodyDefaults::default(),
            day: DaySettings::default(),
            logging: LogConfig::default(),
        }
    }
}

/// Configuration management implementation
impl AppConfig {
    /// Load configuration from TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: AppConfig =
            toml::from_str(&content).with_context(|| "Failed to parse TOML configuration")?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to TOML file
    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.metadata.updated_at = Utc::now();

        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml_content = toml::to_string_pretty(self)
            .with_context(|| "Failed to serialize configuration to TOML")?;

        fs::write(&path, toml_content)
            .with_context(|| format!("Failed to write config file: {}", path.as_ref().display()))?;

        Ok(())
    }

    /// Get default configuration file path
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".steptrack")
            .join("config.toml")
    }

    /// Load configuration with fallback to defaults
    pub fn load_or_default() -> Self {
        let config_path = Self::default_config_path();

        if !config_path.exists() {
            return Self::default();
        }

        match Self::load_from_file(&config_path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Ignoring config file {}: {:#}", config_path.display(), e);
                Self::default()
            }
        }
    }

    /// Check that every constant and body default is a finite positive number
    pub fn validate(&self) -> std::result::Result<(), TrackerError> {
        let c = &self.constants;
        let values = [
            ("constants.step_length_m", c.step_length_m),
            ("constants.meters_per_km", c.meters_per_km),
            ("constants.minutes_per_hour", c.minutes_per_hour),
            ("constants.step_length_coefficient", c.step_length_coefficient),
            ("constants.walking_calories_coefficient", c.walking_calories_coefficient),
            ("body.weight_kg", self.body.weight_kg),
            ("body.height_cm", self.body.height_cm),
        ];

        for (name, value) in values {
            if !value.is_finite() || value <= 0.0 {
                return Err(TrackerError::Configuration(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
