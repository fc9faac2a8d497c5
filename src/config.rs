//! Configuration management for the runway wind checker
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::RunwayWindError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Report retrieval settings
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Report cache settings
    #[serde(default)]
    pub cache: CacheConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Wind evaluation settings
    #[serde(default)]
    pub evaluation: EvaluationConfig,
}

/// Report retrieval settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Raw METAR endpoint
    #[serde(default = "default_metar_url")]
    pub metar_url: String,
    /// Raw TAF endpoint
    #[serde(default = "default_taf_url")]
    pub taf_url: String,
    /// How far back to look for a METAR
    #[serde(default = "default_metar_hours")]
    pub metar_hours_before_now: u32,
    /// How far back to look for a TAF
    #[serde(default = "default_taf_hours")]
    pub taf_hours_before_now: u32,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for failed requests
    #[serde(default = "default_weather_max_retries")]
    pub max_retries: u32,
    /// User-Agent sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Report cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Disable to always fetch fresh reports
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    /// How long a fetched report stays fresh, seconds
    #[serde(default = "default_cache_ttl")]
    pub ttl_seconds: u64,
    /// Cache directory location
    #[serde(default = "default_cache_location")]
    pub location: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Wind evaluation settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Use reported gusts instead of sustained speed for every metric
    #[serde(default)]
    pub include_gusts: bool,
}

// Default value functions
fn default_metar_url() -> String {
    "https://aviationweather.gov/api/data/metar".to_string()
}

fn default_taf_url() -> String {
    "https://aviationweather.gov/api/data/taf".to_string()
}

fn default_metar_hours() -> u32 {
    2
}

fn default_taf_hours() -> u32 {
    3
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_weather_max_retries() -> u32 {
    3
}

fn default_user_agent() -> String {
    format!("runway-wind/{}", env!("CARGO_PKG_VERSION"))
}

fn default_cache_enabled() -> bool {
    true
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_cache_location() -> String {
    dirs::cache_dir()
        .map(|dir| dir.join("runway-wind"))
        .unwrap_or_else(|| PathBuf::from(".runway-wind-cache"))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            metar_url: default_metar_url(),
            taf_url: default_taf_url(),
            metar_hours_before_now: default_metar_hours(),
            taf_hours_before_now: default_taf_hours(),
            timeout_seconds: default_weather_timeout(),
            max_retries: default_weather_max_retries(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            ttl_seconds: default_cache_ttl(),
            location: default_cache_location(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl WeatherConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl AppConfig {
    /// Load configuration from the given file (or the default location) and
    /// `RUNWAYWIND_` environment variables, then validate it
    pub fn load(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // RUNWAYWIND_CACHE__TTL_SECONDS=60 overrides cache.ttl_seconds
        builder = builder.add_source(
            Environment::with_prefix("RUNWAYWIND")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: AppConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("runway-wind").join("config.toml"))
    }

    /// Apply default values to fields left empty or zero
    pub fn apply_defaults(&mut self) {
        if self.weather.metar_url.is_empty() {
            self.weather.metar_url = default_metar_url();
        }
        if self.weather.taf_url.is_empty() {
            self.weather.taf_url = default_taf_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.user_agent.is_empty() {
            self.weather.user_agent = default_user_agent();
        }
        if self.cache.location.is_empty() {
            self.cache.location = default_cache_location();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                RunwayWindError::config("Weather timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.weather.max_retries > 10 {
            return Err(RunwayWindError::config("Weather max retries cannot exceed 10").into());
        }

        for (name, hours) in [
            ("metar_hours_before_now", self.weather.metar_hours_before_now),
            ("taf_hours_before_now", self.weather.taf_hours_before_now),
        ] {
            if hours == 0 || hours > 48 {
                return Err(RunwayWindError::config(format!(
                    "weather.{name} must be between 1 and 48"
                ))
                .into());
            }
        }

        if self.cache.ttl_seconds > 3600 {
            return Err(RunwayWindError::config(
                "Cache TTL cannot exceed 3600 seconds; reports older than an hour are stale",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(RunwayWindError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(RunwayWindError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for url in [&self.weather.metar_url, &self.weather.taf_url] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(RunwayWindError::config(format!(
                    "Weather endpoint '{url}' must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        Ok(())
    }
}
