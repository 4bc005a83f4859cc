use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// City shown when neither the command line nor the config names one.
pub const DEFAULT_CITY: &str = "Bangalore";

pub const GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const AIR_QUALITY_URL: &str = "https://air-quality-api.open-meteo.com/v1/air-quality";

/// Upstream endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocoding: String,
    pub forecast: String,
    pub air_quality: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocoding: GEOCODING_URL.to_string(),
            forecast: FORECAST_URL.to_string(),
            air_quality: AIR_QUALITY_URL.to_string(),
        }
    }
}

impl Endpoints {
    /// All three endpoints under one base URL, using the upstream paths.
    pub fn with_base_url(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            geocoding: format!("{base}/v1/search"),
            forecast: format!("{base}/v1/forecast"),
            air_quality: format!("{base}/v1/air-quality"),
        }
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// City loaded when none is given, e.g. "Lisbon".
    pub default_city: Option<String>,

    /// Request timeout in seconds. Unset means requests may wait indefinitely.
    pub timeout_secs: Option<u64>,

    /// Example TOML:
    /// [endpoints]
    /// forecast = "https://api.open-meteo.com/v1/forecast"
    pub endpoints: Endpoints,
}

impl Config {
    /// Pick the city to load: explicit argument, then configured default, then built-in.
    pub fn effective_city(&self, arg: Option<&str>) -> String {
        arg.map(str::trim)
            .filter(|s| !s.is_empty())
            .or_else(|| {
                self.default_city
                    .as_deref()
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
            })
            .unwrap_or(DEFAULT_CITY)
            .to_string()
    }

    pub fn set_default_city(&mut self, city: &str) {
        let city = city.trim();
        self.default_city = if city.is_empty() {
            None
        } else {
            Some(city.to_string())
        };
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.filter(|s| *s > 0).map(Duration::from_secs)
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
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
        self.save_to(&Self::config_file_path()?)
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
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_city_falls_back_to_builtin_default() {
        let cfg = Config::default();
        assert_eq!(cfg.effective_city(None), DEFAULT_CITY);
        assert_eq!(cfg.effective_city(Some("   ")), DEFAULT_CITY);
    }

    #[test]
    fn argument_overrides_configured_default() {
        let mut cfg = Config::default();
        cfg.set_default_city("Lisbon");

        assert_eq!(cfg.effective_city(None), "Lisbon");
        assert_eq!(cfg.effective_city(Some(" Oslo ")), "Oslo");
    }

    #[test]
    fn blank_default_city_is_cleared() {
        let mut cfg = Config::default();
        cfg.set_default_city("Lisbon");
        cfg.set_default_city("  ");

        assert!(cfg.default_city.is_none());
    }

    #[test]
    fn zero_timeout_means_no_timeout() {
        let mut cfg = Config::default();
        assert!(cfg.timeout().is_none());

        cfg.timeout_secs = Some(0);
        assert!(cfg.timeout().is_none());

        cfg.timeout_secs = Some(15);
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(15)));
    }

    #[test]
    fn save_then_load_preserves_values() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_default_city("Nairobi");
        cfg.timeout_secs = Some(20);
        cfg.endpoints = Endpoints::with_base_url("http://localhost:9000/");
        cfg.save_to(&path).expect("save");

        let loaded = Config::load_from(&path).expect("load");
        assert_eq!(loaded.default_city.as_deref(), Some("Nairobi"));
        assert_eq!(loaded.timeout_secs, Some(20));
        assert_eq!(loaded.endpoints.forecast, "http://localhost:9000/v1/forecast");
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = Config::load_from(&dir.path().join("absent.toml")).expect("load");

        assert!(cfg.default_city.is_none());
        assert_eq!(cfg.endpoints, Endpoints::default());
    }

    #[test]
    fn partial_file_keeps_default_endpoints() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        fs::write(&path, "default_city = \"Quito\"\n").expect("write");

        let cfg = Config::load_from(&path).expect("load");
        assert_eq!(cfg.default_city.as_deref(), Some("Quito"));
        assert_eq!(cfg.endpoints.air_quality, AIR_QUALITY_URL);
    }
}
