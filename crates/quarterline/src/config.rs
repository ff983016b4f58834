//! Configuration management for quarterline.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::quarter::LabelStyle;
use crate::trend::{Palette, DEFAULT_PRECISION};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "quarterline";

/// Environment variable prefix.
const ENV_PREFIX: &str = "QUARTERLINE_";

/// Largest accepted number of decimal places.
const MAX_PRECISION: u8 = 6;

static HEX_COLOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("hex color regex is valid")
});

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `QUARTERLINE_`, sections split on `__`)
/// 2. TOML config file at `~/.config/quarterline/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Quarter label configuration.
    pub labels: LabelsConfig,
    /// Trend label and color configuration.
    pub trend: TrendConfig,
    /// Headline value configuration.
    pub summary: SummaryConfig,
}

/// Quarter label configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelsConfig {
    /// Style used for generated labels.
    pub style: LabelStyle,
}

/// Trend-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// Decimal places kept in trend labels.
    pub precision: u8,
    /// Colors for positive, negative and neutral trends.
    pub palette: Palette,
}

/// Headline and tooltip value configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Decimal places for averages.
    pub precision: u8,
    /// Text shown in place of a zero or missing average.
    pub empty_value: String,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            palette: Palette::default(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            precision: 1,
            empty_value: "-".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from all sources.
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
        Self::from_figment(Self::figment(&config_file))
    }

    /// The layered provider stack for `config_file`.
    #[must_use]
    pub fn figment(config_file: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Extract and validate a configuration from `figment`.
    ///
    /// # Errors
    ///
    /// Returns an error if extraction or validation fails.
    pub fn from_figment(figment: Figment) -> Result<Self> {
        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        for (name, precision) in [
            ("trend.precision", self.trend.precision),
            ("summary.precision", self.summary.precision),
        ] {
            if precision > MAX_PRECISION {
                return Err(Error::ConfigValidation {
                    message: format!("{name} ({precision}) cannot exceed {MAX_PRECISION}"),
                });
            }
        }

        let palette = &self.trend.palette;
        for (name, color) in [
            ("positive", &palette.positive),
            ("negative", &palette.negative),
            ("neutral", &palette.neutral),
        ] {
            if !HEX_COLOR.is_match(color) {
                return Err(Error::ConfigValidation {
                    message: format!("invalid {name} color: {color}"),
                });
            }
        }

        Ok(())
    }
}
