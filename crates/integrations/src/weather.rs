//! Daily forecast client for a Dark Sky compatible API.
//!
//! Request shape: `GET {base}/{key}/{lat},{lon},{unix_time}?lang=..&units=si`.
//! Only the `daily` block is requested and only its first day is used.

use async_trait::async_trait;
use homewatch_core::rules::forecast::DailyForecast;
use homewatch_core::sources::{ForecastProvider, SourceError};
use homewatch_core::types::Timestamp;
use serde::Deserialize;

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://api.darksky.net/forecast";

/// Blocks excluded from the response; only `daily` is needed.
const EXCLUDED_BLOCKS: &str = "currently,minutely,hourly,alerts,flags";

/// Errors from the forecast API layer.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Weather API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Weather response has no daily data")]
    NoDailyData,
}

impl From<WeatherError> for SourceError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::Request(e) if e.is_decode() => SourceError::Malformed(e.to_string()),
            WeatherError::Request(e) => SourceError::Unavailable(e.to_string()),
            WeatherError::ApiError { status, body } => SourceError::Rejected {
                status,
                detail: body,
            },
            err @ WeatherError::NoDailyData => SourceError::Malformed(err.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    daily: Option<DailyBlock>,
}

#[derive(Debug, Deserialize)]
struct DailyBlock {
    #[serde(default)]
    data: Vec<DailyForecast>,
}

/// HTTP client for the forecast API.
#[derive(Clone)]
pub struct DarkSkyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl DarkSkyClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    /// Fetch the forecast for the day containing `at`.
    pub async fn fetch_daily(
        &self,
        latitude: f64,
        longitude: f64,
        at: Timestamp,
        language: &str,
    ) -> Result<DailyForecast, WeatherError> {
        let url = format!(
            "{}/{}/{latitude},{longitude},{}",
            self.base_url,
            self.api_key,
            at.timestamp()
        );

        let response = self
            .client
            .get(url)
            .query(&[
                ("lang", language),
                ("units", "si"),
                ("exclude", EXCLUDED_BLOCKS),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ForecastResponse = response.json().await?;
        parsed
            .daily
            .and_then(|block| block.data.into_iter().next())
            .ok_or(WeatherError::NoDailyData)
    }
}

#[async_trait]
impl ForecastProvider for DarkSkyClient {
    async fn daily_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        at: Timestamp,
        language: &str,
    ) -> Result<DailyForecast, SourceError> {
        self.fetch_daily(latitude, longitude, at, language)
            .await
            .map_err(SourceError::from)
    }
}
