use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::render::DisplayZone;

pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";
pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_UNITS: &str = "imperial";
pub const DEFAULT_REGION: &str = "us";

/// Everything the OpenWeather client needs to build a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    pub units: String,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// default_region = "us"
/// timezone = "America/New_York"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// OpenWeather credential. Never compiled in; see [`Config::with_env_overrides`].
    pub api_key: Option<String>,
    pub base_url: String,
    pub units: String,
    /// Region appended to queries that do not name one.
    pub default_region: String,
    /// `"local"`, `"location"` or an IANA zone name. Unset means local.
    pub timezone: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            units: DEFAULT_UNITS.to_string(),
            default_region: DEFAULT_REGION.to_string(),
            timezone: None,
        }
    }
}

impl Config {
    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-widget", "weather-widget")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Apply `OPENWEATHER_API_KEY` from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|name| std::env::var(name).ok())
    }

    pub fn with_overrides_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(key) = lookup(API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key.trim().to_string());
        }
        self
    }

    pub fn provider_settings(&self) -> Result<ProviderSettings> {
        let api_key = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                anyhow!(
                    "No OpenWeather API key configured.\n\
                     Hint: run `weather-widget configure` or set {API_KEY_ENV}."
                )
            })?;

        Ok(ProviderSettings {
            api_key: api_key.to_string(),
            base_url: self.base_url.clone(),
            units: self.units.clone(),
        })
    }

    pub fn display_zone(&self) -> Result<DisplayZone> {
        match self.timezone.as_deref() {
            None => Ok(DisplayZone::Local),
            Some(s) => s
                .parse()
                .map_err(|e| anyhow!("Invalid timezone in config: {e}")),
        }
    }
}
