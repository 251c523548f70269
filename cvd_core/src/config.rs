//! Configuration file support for PRIME CVD.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/prime-cvd/config.toml`.

use crate::treatment::DEFAULT_MAX_TOTAL_REDUCTION_PERCENT;
use crate::{Error, Result, TherapyEntry};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub treatment: TreatmentConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default)]
    pub therapies: TherapiesConfig,
}

/// Treatment model parameters
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TreatmentConfig {
    /// Ceiling on the combined statin + add-on LDL reduction, in percent
    #[serde(default = "default_max_total_reduction_percent")]
    pub max_total_reduction_percent: f64,

    /// LDL-C goal used when none is given, in mmol/L
    #[serde(default = "default_target_ldl")]
    pub default_target_ldl: f64,
}

impl Default for TreatmentConfig {
    fn default() -> Self {
        Self {
            max_total_reduction_percent: default_max_total_reduction_percent(),
            default_target_ldl: default_target_ldl(),
        }
    }
}

/// Report output configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_report_dir")]
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_report_dir(),
        }
    }
}

/// Additional catalog entries
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct TherapiesConfig {
    #[serde(default)]
    pub custom: Vec<TherapyEntry>,
}

// Default value functions
fn default_max_total_reduction_percent() -> f64 {
    DEFAULT_MAX_TOTAL_REDUCTION_PERCENT
}

fn default_target_ldl() -> f64 {
    1.4
}

fn default_report_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));
    base.join("prime-cvd").join("reports")
}

impl Config {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join("prime-cvd").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }

    /// Check values that the treatment model depends on
    pub fn validate(&self) -> Result<()> {
        let ceiling = self.treatment.max_total_reduction_percent;
        if !(ceiling > 0.0 && ceiling < 100.0) {
            return Err(Error::Config(format!(
                "treatment.max_total_reduction_percent must be in (0, 100), got {}",
                ceiling
            )));
        }

        let target = self.treatment.default_target_ldl;
        if !(target.is_finite() && target > 0.0) {
            return Err(Error::Config(format!(
                "treatment.default_target_ldl must be positive, got {}",
                target
            )));
        }

        Ok(())
    }
}
