//! Configuration management for deepblue.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "deepblue";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "records.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `DEEPBLUE_`)
/// 2. TOML config file at `~/.config/deepblue/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Record store configuration.
    pub storage: StorageConfig,
    /// Assistant client configuration.
    pub assistant: AssistantConfig,
    /// Compliance policy knobs.
    pub compliance: ComplianceConfig,
    /// Image analysis knobs.
    pub analysis: AnalysisConfig,
}

/// Record-store-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the record database file.
    /// Defaults to `~/.local/share/deepblue/records.db`
    pub database_path: Option<PathBuf>,
}

/// Assistant-client-related configuration.
///
/// The provider endpoint and model live in the record store (`ai_settings`
/// slot); only the ambient transport knobs live here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    /// Bearer token sent with provider requests, if any.
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

/// Compliance policy constants.
///
/// The defaults mirror shipboard practice but carry no demonstrated
/// derivation from the convention text; operators may align them with the
/// applicable rules here without a code change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceConfig {
    /// Minimum daily rest hours before a day is flagged.
    pub min_rest_hours: u32,
}

/// Image analysis tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Sensitivity multiplier applied to the rust-pixel ratio.
    pub sensitivity: f64,
    /// Cap on the longer image dimension before scanning.
    pub max_dimension: u32,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl Default for ComplianceConfig {
    fn default() -> Self {
        Self {
            min_rest_hours: crate::calc::MIN_REST_HOURS,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sensitivity: crate::analysis::RUST_SENSITIVITY,
            max_dimension: crate::analysis::MAX_ANALYSIS_DIMENSION,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `DEEPBLUE_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("DEEPBLUE_").split("_"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.compliance.min_rest_hours > 24 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "min_rest_hours ({}) cannot exceed the 24 hours in a day",
                    self.compliance.min_rest_hours
                ),
            });
        }

        if !self.analysis.sensitivity.is_finite() || self.analysis.sensitivity <= 0.0 {
            return Err(Error::ConfigValidation {
                message: "analysis sensitivity must be a positive number".to_string(),
            });
        }

        if self.analysis.max_dimension == 0 {
            return Err(Error::ConfigValidation {
                message: "analysis max_dimension must be greater than 0".to_string(),
            });
        }

        if self.assistant.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "assistant timeout_secs must be greater than 0".to_string(),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the assistant request timeout as a Duration.
    #[must_use]
    pub fn assistant_timeout(&self) -> Duration {
        Duration::from_secs(self.assistant.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert!(config.storage.database_path.is_none());
        assert!(config.assistant.api_key.is_none());
        assert_eq!(config.assistant.timeout_secs, 30);
        assert_eq!(config.compliance.min_rest_hours, 10);
        assert!((config.analysis.sensitivity - 600.0).abs() < f64::EPSILON);
        assert_eq!(config.analysis.max_dimension, 200);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_min_rest_hours_over_day() {
        let mut config = Config::default();
        config.compliance.min_rest_hours = 25;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("min_rest_hours"));
    }

    #[test]
    fn test_validate_zero_sensitivity() {
        let mut config = Config::default();
        config.analysis.sensitivity = 0.0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sensitivity"));
    }

    #[test]
    fn test_validate_nan_sensitivity() {
        let mut config = Config::default();
        config.analysis.sensitivity = f64::NAN;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_zero_max_dimension() {
        let mut config = Config::default();
        config.analysis.max_dimension = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_dimension"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let mut config = Config::default();
        config.assistant.timeout_secs = 0;

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_secs"));
    }

    #[test]
    fn test_database_path_default() {
        let config = Config::default();
        assert!(config
            .database_path()
            .to_string_lossy()
            .contains("records.db"));
    }

    #[test]
    fn test_database_path_custom() {
        let mut config = Config::default();
        config.storage.database_path = Some(PathBuf::from("/custom/path/records.db"));

        assert_eq!(
            config.database_path(),
            PathBuf::from("/custom/path/records.db")
        );
    }

    #[test]
    fn test_assistant_timeout() {
        let config = Config::default();
        assert_eq!(config.assistant_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_default_config_path() {
        let path = Config::default_config_path();
        assert!(path.to_string_lossy().contains("deepblue"));
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_default_data_dir() {
        let path = Config::default_data_dir();
        assert!(path.to_string_lossy().contains("deepblue"));
    }

    #[test]
    fn test_load_nonexistent_config() {
        // Loading from a nonexistent path should work (uses defaults)
        let result = Config::load_from(Some(PathBuf::from("/nonexistent/config.toml")));
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_config_serialize() {
        let json = serde_json::to_string(&Config::default()).unwrap();
        assert!(json.contains("min_rest_hours"));
        assert!(json.contains("sensitivity"));
    }

    #[test]
    fn test_analysis_config_deserialize() {
        let json = r#"{"sensitivity": 450.0, "max_dimension": 128}"#;
        let analysis: AnalysisConfig = serde_json::from_str(json).unwrap();
        assert!((analysis.sensitivity - 450.0).abs() < f64::EPSILON);
        assert_eq!(analysis.max_dimension, 128);
    }

    #[test]
    fn test_config_clone() {
        let config = Config::default();
        assert_eq!(config, config.clone());
    }
}
