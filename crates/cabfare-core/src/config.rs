use anyhow::{Context, Result};
use cabfare_pricing::PricingParams;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const GOOGLE_API_KEY_ENV: &str = "CABFARE_GOOGLE_API_KEY";
pub const OPENWEATHER_API_KEY_ENV: &str = "CABFARE_OPENWEATHER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// All errors joined into one line
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address lookup settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,

    /// Weather lookup settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Fare model artifact
    #[serde(default)]
    pub model: ModelConfig,

    /// Surcharge heuristics
    #[serde(default)]
    pub pricing: PricingParams,

    /// Outbound HTTP settings
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum GeocodingProvider {
    Google,
    #[default]
    Nominatim,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    pub provider: GeocodingProvider,

    /// Override the provider's default endpoint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Required for Google. Can also be set via CABFARE_GOOGLE_API_KEY.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Sent to Nominatim, whose usage policy requires identifying clients
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_user_agent() -> String {
    cabfare_geocode::nominatim::DEFAULT_USER_AGENT.to_string()
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            provider: GeocodingProvider::default(),
            base_url: None,
            api_key: None,
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeatherProvider {
    #[serde(rename = "openweathermap")]
    OpenWeatherMap,
    #[default]
    OpenMeteo,
}

/// Whose weather drives the surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeatherMode {
    /// Pickup conditions only
    Single,
    /// Pickup and dropoff, weighted by trip distance
    #[default]
    Blended,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WeatherConfig {
    #[serde(default)]
    pub provider: WeatherProvider,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Required for OpenWeatherMap. Can also be set via CABFARE_OPENWEATHER_API_KEY.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default)]
    pub mode: WeatherMode,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// JSON model artifact
    pub path: PathBuf,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: Config::config_dir().join("model.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout for geocoding and weather calls
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geocoding: GeocodingConfig::default(),
            weather: WeatherConfig::default(),
            model: ModelConfig::default(),
            pricing: PricingParams::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save_to(&config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            return Ok(config.with_env_overrides());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config.with_env_overrides())
    }

    /// Load configuration and validate it
    ///
    /// Uses `path` when given, the default location otherwise. Warnings are
    /// logged; any error fails the load.
    pub fn load_validated(path: Option<&Path>) -> Result<(Self, ValidationResult)> {
        let config = match path {
            Some(p) => Self::load_from(p)?,
            None => Self::load()?,
        };
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// API keys from the environment take precedence over the file
    fn with_env_overrides(mut self) -> Self {
        if let Some(key) = env_key(GOOGLE_API_KEY_ENV) {
            self.geocoding.api_key = Some(key);
        }
        if let Some(key) = env_key(OPENWEATHER_API_KEY_ENV) {
            self.weather.api_key = Some(key);
        }
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if let Some(url) = &self.geocoding.base_url {
            validate_url(url, "geocoding.base_url", &mut result);
        }
        match self.geocoding.provider {
            GeocodingProvider::Google if !has_key(&self.geocoding.api_key) => {
                result.add_error(
                    "geocoding.api_key",
                    format!("Google geocoding needs an API key (or set {})", GOOGLE_API_KEY_ENV),
                );
            }
            GeocodingProvider::Nominatim if self.geocoding.user_agent.trim().is_empty() => {
                result.add_warning(
                    "geocoding.user_agent",
                    "Nominatim asks clients to send an identifying User-Agent",
                );
            }
            _ => {}
        }

        if let Some(url) = &self.weather.base_url {
            validate_url(url, "weather.base_url", &mut result);
        }
        if self.weather.provider == WeatherProvider::OpenWeatherMap
            && !has_key(&self.weather.api_key)
        {
            result.add_error(
                "weather.api_key",
                format!(
                    "OpenWeatherMap needs an API key (or set {})",
                    OPENWEATHER_API_KEY_ENV
                ),
            );
        }

        if self.http.timeout_secs == 0 {
            result.add_error("http.timeout_secs", "Timeout must be greater than 0");
        } else if self.http.timeout_secs > 60 {
            result.add_warning("http.timeout_secs", "Timeout is unusually long (>60s)");
        }

        let surcharge = self.pricing.passenger_surcharge;
        if !surcharge.is_finite() || surcharge < 0.0 {
            result.add_error(
                "pricing.passenger_surcharge",
                "Passenger surcharge must be a non-negative number",
            );
        }
        let radius = self.pricing.blend_radius_miles;
        if !radius.is_finite() || radius < 0.0 {
            result.add_error(
                "pricing.blend_radius_miles",
                "Blend radius must be a non-negative number",
            );
        }

        if !self.model.path.exists() {
            result.add_warning(
                "model.path",
                format!("Model file does not exist: {}", self.model.path.display()),
            );
        } else if !self.model.path.is_file() {
            result.add_error(
                "model.path",
                format!("Model path is not a file: {}", self.model.path.display()),
            );
        }

        result
    }

    /// Write configuration to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Application configuration directory
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("cabfare")
    }

    /// Default configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }
}

fn env_key(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn has_key(key: &Option<String>) -> bool {
    key.as_deref().is_some_and(|k| !k.trim().is_empty())
}

fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
    match Url::parse(url_str) {
        Ok(url) => {
            if url.scheme() != "http" && url.scheme() != "https" {
                result.add_error(
                    field_name,
                    format!("URL must use http or https scheme, got: {}", url.scheme()),
                );
            }
            if url.host().is_none() {
                result.add_error(field_name, "URL must have a host");
            }
        }
        Err(e) => {
            result.add_error(field_name, format!("Invalid URL: {}", e));
        }
    }
}
