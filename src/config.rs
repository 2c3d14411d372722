//! Configuration management for the weather text job
//!
//! Handles loading configuration from an optional TOML file and environment
//! variables, and validates every setting before a run starts.

use crate::WeatherTextError;
use crate::summary::clock::ClockPolicy;
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use chrono_tz::Tz;
use config::{Config, Environment, File, FileFormat, Map};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Unprefixed variable names understood for compatibility with existing deployments.
const LEGACY_ENV_KEYS: [(&str, &str); 8] = [
    ("OPEN_WEATHER_MAP_API_KEY", "weather.api_key"),
    ("LATITUDE", "weather.latitude"),
    ("LONGITUDE", "weather.longitude"),
    ("TWILIO_ACCOUNT_SID", "notification.twilio_account_sid"),
    ("TWILIO_AUTH_TOKEN", "notification.twilio_auth_token"),
    ("TWILIO_FROM", "notification.from"),
    ("TWILIO_TO", "notification.to"),
    ("SNS_TOPIC", "notification.topic"),
];

/// Root configuration structure for the weather text job
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherTextConfig {
    /// Weather provider configuration
    #[serde(default)]
    pub weather: WeatherConfig,
    /// Outbound message configuration
    #[serde(default)]
    pub notification: NotificationConfig,
    /// Clock and calendar-day settings
    #[serde(default)]
    pub time: TimeConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Weather provider configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// OpenWeatherMap API key
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Unit system sent to the current conditions provider
    #[serde(default = "default_units")]
    pub units: String,
    /// Base URL for current conditions
    #[serde(default = "default_current_base_url")]
    pub current_base_url: String,
    /// Base URL for grid metadata lookups
    #[serde(default = "default_grid_base_url")]
    pub grid_base_url: String,
    /// api.weather.gov rejects requests without a user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_weather_timeout")]
    pub timeout_seconds: u32,
    /// Transport retries for failed GET requests
    #[serde(default)]
    pub max_retries: u32,
    /// Fetch the hourly forecast for today's high and low
    #[serde(default = "default_hourly")]
    pub hourly: bool,
}

/// Which channel delivers the message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    #[default]
    Sms,
    Email,
}

/// Outbound message settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub channel: ChannelKind,
    /// Sender phone number or email address
    #[serde(default)]
    pub from: String,
    /// Recipient phone number or email address
    #[serde(default)]
    pub to: String,
    /// Topic identifier for an alternate fan-out channel (logged only)
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub twilio_account_sid: Option<String>,
    #[serde(default)]
    pub twilio_auth_token: Option<String>,
    #[serde(default = "default_twilio_base_url")]
    pub twilio_base_url: String,
    #[serde(default)]
    pub smtp_relay: Option<String>,
    #[serde(default)]
    pub smtp_username: Option<String>,
    #[serde(default)]
    pub smtp_password: Option<String>,
}

/// Clock settings for sunrise/sunset rendering and for deciding what "today" is
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    /// Fixed offset from UTC, no daylight saving adjustment
    #[serde(default = "default_utc_offset")]
    pub utc_offset_hours: i32,
    #[serde(default)]
    pub clock: ClockPolicy,
    /// IANA zone used to compute today's date; process local time when unset
    #[serde(default)]
    pub timezone: Option<String>,
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

// Default value functions
fn default_units() -> String {
    "imperial".to_string()
}

fn default_current_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_grid_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_user_agent() -> String {
    format!("weather-text/{}", crate::VERSION)
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_hourly() -> bool {
    true
}

fn default_twilio_base_url() -> String {
    "https://api.twilio.com/2010-04-01".to_string()
}

fn default_utc_offset() -> i32 {
    -4
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
            api_key: String::new(),
            latitude: 0.0,
            longitude: 0.0,
            units: default_units(),
            current_base_url: default_current_base_url(),
            grid_base_url: default_grid_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_weather_timeout(),
            max_retries: 0,
            hourly: default_hourly(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            channel: ChannelKind::default(),
            from: String::new(),
            to: String::new(),
            topic: None,
            twilio_account_sid: None,
            twilio_auth_token: None,
            twilio_base_url: default_twilio_base_url(),
            smtp_relay: None,
            smtp_username: None,
            smtp_password: None,
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset(),
            clock: ClockPolicy::default(),
            timezone: None,
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

impl TimeConfig {
    /// Today's calendar date in the configured zone, or the process local clock
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        match self.timezone.as_deref().map(str::parse::<Tz>) {
            Some(Ok(tz)) => Utc::now().with_timezone(&tz).date_naive(),
            Some(Err(e)) => {
                tracing::warn!("Ignoring unparseable timezone: {}", e);
                Local::now().date_naive()
            }
            None => Local::now().date_naive(),
        }
    }
}

impl WeatherTextConfig {
    /// Load configuration from file and the process environment
    pub fn load() -> Result<Self> {
        let vars: Map<String, String> = std::env::vars().collect();
        let path = vars.get("WEATHER_TEXT_CONFIG").map(PathBuf::from);
        Self::load_from(path, &vars)
    }

    /// Load configuration from an optional file path and an explicit variable set
    pub fn load_from(config_path: Option<PathBuf>, vars: &Map<String, String>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("weather-text.toml"));
        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(FileFormat::Toml),
            );
        }

        // Environment variable overrides with WEATHER_TEXT_ prefix
        builder = builder.add_source(
            Environment::with_prefix("WEATHER_TEXT")
                .prefix_separator("_")
                .separator("__")
                .source(Some(vars.clone())),
        );

        for (var, key) in LEGACY_ENV_KEYS {
            builder = builder
                .set_override_option(key, vars.get(var).cloned())
                .with_context(|| format!("Failed to apply {var}"))?;
        }

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: WeatherTextConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to fields that were supplied empty
    pub fn apply_defaults(&mut self) {
        if self.weather.units.is_empty() {
            self.weather.units = default_units();
        }
        if self.weather.current_base_url.is_empty() {
            self.weather.current_base_url = default_current_base_url();
        }
        if self.weather.grid_base_url.is_empty() {
            self.weather.grid_base_url = default_grid_base_url();
        }
        if self.weather.user_agent.is_empty() {
            self.weather.user_agent = default_user_agent();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.notification.twilio_base_url.is_empty() {
            self.notification.twilio_base_url = default_twilio_base_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> crate::Result<()> {
        self.validate_weather()?;
        self.validate_notification()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_weather(&self) -> crate::Result<()> {
        if self.weather.api_key.trim().is_empty() {
            return Err(WeatherTextError::config(
                "OpenWeatherMap API key is required (OPEN_WEATHER_MAP_API_KEY)",
            ));
        }

        if !(-90.0..=90.0).contains(&self.weather.latitude) {
            return Err(WeatherTextError::config(format!(
                "Latitude {} is outside -90..90",
                self.weather.latitude
            )));
        }

        if !(-180.0..=180.0).contains(&self.weather.longitude) {
            return Err(WeatherTextError::config(format!(
                "Longitude {} is outside -180..180",
                self.weather.longitude
            )));
        }

        if self.weather.units != "imperial" {
            return Err(WeatherTextError::config(format!(
                "Unsupported unit system '{}'. Only 'imperial' is supported",
                self.weather.units
            )));
        }

        Ok(())
    }

    fn validate_notification(&self) -> crate::Result<()> {
        let notification = &self.notification;
        if notification.from.trim().is_empty() || notification.to.trim().is_empty() {
            return Err(WeatherTextError::config(
                "Both a sender and a recipient address are required",
            ));
        }

        match notification.channel {
            ChannelKind::Sms => {
                if is_blank(&notification.twilio_account_sid)
                    || is_blank(&notification.twilio_auth_token)
                {
                    return Err(WeatherTextError::config(
                        "SMS channel requires TWILIO_ACCOUNT_SID and TWILIO_AUTH_TOKEN",
                    ));
                }
            }
            ChannelKind::Email => {
                if is_blank(&notification.smtp_relay) {
                    return Err(WeatherTextError::config(
                        "Email channel requires an SMTP relay host",
                    ));
                }
            }
        }

        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> crate::Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(WeatherTextError::config(
                "Weather API timeout cannot exceed 300 seconds",
            ));
        }

        if self.weather.max_retries > 10 {
            return Err(WeatherTextError::config(
                "Weather API max retries cannot exceed 10",
            ));
        }

        if !(-12..=14).contains(&self.time.utc_offset_hours) {
            return Err(WeatherTextError::config(
                "UTC offset must be between -12 and +14 hours",
            ));
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> crate::Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherTextError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            )));
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherTextError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            )));
        }

        for url in [
            &self.weather.current_base_url,
            &self.weather.grid_base_url,
            &self.notification.twilio_base_url,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(WeatherTextError::config(format!(
                    "Base URL '{url}' must be a valid HTTP or HTTPS URL"
                )));
            }
        }

        if let Some(tz) = &self.time.timezone {
            tz.parse::<Tz>().map_err(|_| {
                WeatherTextError::config(format!("Unknown timezone '{tz}'"))
            })?;
        }

        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().is_none_or(|v| v.trim().is_empty())
}
