use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{error::LookupError, model::Units};

pub const DEFAULT_WEATHER_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_DATASET_URL: &str = "https://public.opendatasoft.com/api/records/1.0";
pub const DEFAULT_DATASET: &str = "geonames-all-cities-with-a-population-1000";
pub const DEFAULT_PAGE_SIZE: u64 = 5;

/// Weather endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    pub base_url: String,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_WEATHER_URL.to_string(),
        }
    }
}

/// City dataset endpoint settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub base_url: String,
    /// Dataset id passed as the `dataset` query parameter.
    pub name: String,
    pub page_size: u64,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_DATASET_URL.to_string(),
            name: DEFAULT_DATASET.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// units = "metric"
///
/// [weather]
/// api_key = "..."
///
/// [dataset]
/// page_size = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub units: Units,
    pub weather: WeatherConfig,
    pub dataset: DatasetConfig,
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            // First run: no config file, return defaults.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<()> {
        if self.dataset.page_size == 0 {
            return Err(anyhow!("dataset.page_size must be greater than zero"));
        }
        Ok(())
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "city-weather", "city-weather-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace the stored API key. Blank keys clear it.
    pub fn set_api_key(&mut self, api_key: impl Into<String>) {
        let key = api_key.into().trim().to_string();
        self.weather.api_key = (!key.is_empty()).then_some(key);
    }

    /// Apply a key supplied on the command line or environment; it wins over the file.
    pub fn with_api_key_override(mut self, api_key: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.set_api_key(key);
        }
        self
    }

    pub fn api_key(&self) -> Result<&str, LookupError> {
        self.weather.api_key.as_deref().ok_or(LookupError::MissingApiKey)
    }
}
