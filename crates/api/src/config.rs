use std::path::PathBuf;

use chrono_tz::Tz;
use homewatch_core::clock::{parse_timezone, DEFAULT_TIMEZONE};
use homewatch_core::rules::pass::{DEFAULT_FORECAST_LANGUAGE, DEFAULT_LOCATION};
use homewatch_core::rules::{DoorSchedule, EnvironmentThresholds, Location, PassSettings};
use homewatch_integrations::weather;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Rule settings and external integrations.
    pub monitoring: MonitoringConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    ///
    /// See [`MonitoringConfig::from_env`] for the rule settings.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            monitoring: MonitoringConfig::from_env(),
        }
    }
}

/// Forecast provider settings. Present only when an API key is configured.
#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
}

/// Spreadsheet settings. Present only when a spreadsheet ID is configured.
#[derive(Debug, Clone)]
pub struct SheetsConfig {
    pub spreadsheet_id: String,
    pub range: String,
    pub token_path: PathBuf,
}

/// Rule and integration settings.
#[derive(Debug, Clone)]
pub struct MonitoringConfig {
    pub timezone: Tz,
    pub location: Location,
    pub forecast_language: String,
    /// Door windows and delays.
    pub door_schedule: DoorSchedule,
    /// Seconds between door watch passes.
    pub door_watch_interval_secs: u64,
    /// Slack incoming webhook. Without it the door watch does not run.
    pub slack_url: Option<String>,
    pub weather: Option<WeatherConfig>,
    pub sheets: Option<SheetsConfig>,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            location: DEFAULT_LOCATION,
            forecast_language: DEFAULT_FORECAST_LANGUAGE.to_string(),
            door_schedule: DoorSchedule::default(),
            door_watch_interval_secs: 10,
            slack_url: None,
            weather: None,
            sheets: None,
        }
    }
}

/// Read an env var, treating blank values as unset.
fn optional_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl MonitoringConfig {
    /// Load rule settings from environment variables with defaults.
    ///
    /// | Env Var                    | Default                              |
    /// |----------------------------|--------------------------------------|
    /// | `TIMEZONE`                 | `Europe/Paris`                       |
    /// | `LOCATION_LATITUDE`        | `48.8589506`                         |
    /// | `LOCATION_LONGITUDE`       | `2.276848`                           |
    /// | `DOOR_WATCH_INTERVAL_SECS` | `10`                                 |
    /// | `SLACK_URL`                | unset (door watch disabled)          |
    /// | `WEATHER_API_KEY`          | unset (forecast rule skipped)        |
    /// | `WEATHER_BASE_URL`         | `https://api.darksky.net/forecast`   |
    /// | `WEATHER_LANGUAGE`         | `fr`                                 |
    /// | `SHEETS_SPREADSHEET_ID`    | unset (bulletin rule skipped)        |
    /// | `SHEETS_RANGE`             | `Messages!A2:B`                      |
    /// | `SHEETS_TOKEN_PATH`        | `res/credentials/token.json`         |
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let timezone = optional_env("TIMEZONE")
            .map(|name| parse_timezone(&name).expect("TIMEZONE must be an IANA zone name"))
            .unwrap_or(defaults.timezone);

        let latitude: f64 = optional_env("LOCATION_LATITUDE")
            .map(|v| v.parse().expect("LOCATION_LATITUDE must be a number"))
            .unwrap_or(defaults.location.latitude);

        let longitude: f64 = optional_env("LOCATION_LONGITUDE")
            .map(|v| v.parse().expect("LOCATION_LONGITUDE must be a number"))
            .unwrap_or(defaults.location.longitude);

        let door_watch_interval_secs: u64 = optional_env("DOOR_WATCH_INTERVAL_SECS")
            .map(|v| {
                v.parse()
                    .expect("DOOR_WATCH_INTERVAL_SECS must be a valid u64")
            })
            .unwrap_or(defaults.door_watch_interval_secs);

        let weather = optional_env("WEATHER_API_KEY").map(|api_key| WeatherConfig {
            api_key,
            base_url: optional_env("WEATHER_BASE_URL")
                .unwrap_or_else(|| weather::DEFAULT_BASE_URL.to_string()),
        });

        let sheets = optional_env("SHEETS_SPREADSHEET_ID").map(|spreadsheet_id| SheetsConfig {
            spreadsheet_id,
            range: optional_env("SHEETS_RANGE").unwrap_or_else(|| "Messages!A2:B".into()),
            token_path: optional_env("SHEETS_TOKEN_PATH")
                .unwrap_or_else(|| "res/credentials/token.json".into())
                .into(),
        });

        Self {
            timezone,
            location: Location {
                latitude,
                longitude,
            },
            forecast_language: optional_env("WEATHER_LANGUAGE")
                .unwrap_or(defaults.forecast_language),
            door_schedule: defaults.door_schedule,
            door_watch_interval_secs: door_watch_interval_secs.max(1),
            slack_url: optional_env("SLACK_URL"),
            weather,
            sheets,
        }
    }

    /// Settings handed to the notification pass.
    pub fn pass_settings(&self) -> PassSettings {
        PassSettings {
            timezone: self.timezone,
            location: self.location,
            forecast_language: self.forecast_language.clone(),
            thresholds: EnvironmentThresholds::default(),
        }
    }
}
