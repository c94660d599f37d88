use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf, time::Duration};

/// Environment variable that overrides the stored weather API key.
pub const WEATHER_API_KEY_ENV: &str = "COUNTRIES_WEATHER_API_KEY";

pub const DEFAULT_COUNTRIES_BASE_URL: &str = "https://restcountries.com/v3.1";
pub const DEFAULT_WEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Country data provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CountriesConfig {
    #[serde(default = "default_countries_base_url")]
    pub base_url: String,
}

/// Weather data provider settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default = "default_weather_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout applied to both providers.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// [weather]
/// api_key = "..."
///
/// [http]
/// timeout_secs = 10
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub countries: CountriesConfig,
    #[serde(default)]
    pub weather: WeatherConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

fn default_countries_base_url() -> String {
    DEFAULT_COUNTRIES_BASE_URL.to_string()
}

fn default_weather_base_url() -> String {
    DEFAULT_WEATHER_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for CountriesConfig {
    fn default() -> Self {
        Self { base_url: default_countries_base_url() }
    }
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self { api_key: None, base_url: default_weather_base_url() }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self { timeout_secs: default_timeout_secs() }
    }
}

impl Config {
    /// Load config from the platform config dir, or defaults on first run.
    /// A non-empty `COUNTRIES_WEATHER_API_KEY` replaces the stored key.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = Self::load_from(&path)?;

        if let Ok(key) = std::env::var(WEATHER_API_KEY_ENV) {
            cfg.apply_api_key_override(&key);
        }

        Ok(cfg)
    }

    /// Load config from an explicit path; a missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to the platform config dir.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Save config to `path`, creating parent directories as needed.
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
        let dirs = ProjectDirs::from("dev", "country-lookup", "countries")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn validate(&self) -> Result<()> {
        for (what, url) in [
            ("countries.base_url", &self.countries.base_url),
            ("weather.base_url", &self.weather.base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(anyhow!("{what} must be an HTTP or HTTPS URL, got '{url}'"));
            }
        }

        if self.http.timeout_secs == 0 {
            return Err(anyhow!("http.timeout_secs must be greater than zero"));
        }

        Ok(())
    }

    fn apply_api_key_override(&mut self, key: &str) {
        let key = key.trim();
        if !key.is_empty() {
            self.weather.api_key = Some(key.to_string());
        }
    }

    pub fn set_weather_api_key(&mut self, api_key: String) {
        self.weather.api_key = Some(api_key);
    }

    /// Returns the weather API key, if present and non-blank.
    pub fn weather_api_key(&self) -> Option<&str> {
        self.weather.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn is_weather_configured(&self) -> bool {
        self.weather_api_key().is_some()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}
