use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::config::MonitoringConfig;
use crate::state::AppState;

/// Which monitoring pieces are wired in this process.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct MonitoringStatus {
    /// IANA zone the rules reason in.
    pub timezone: String,
    /// The door watch only runs with a Slack webhook.
    pub door_watch: bool,
    /// Forecast rule has an API key.
    pub weather: bool,
    /// Bulletin rule has a spreadsheet.
    pub sheets: bool,
}

impl From<&MonitoringConfig> for MonitoringStatus {
    fn from(config: &MonitoringConfig) -> Self {
        Self {
            timezone: config.timezone.name().to_string(),
            door_watch: config.slack_url.is_some(),
            weather: config.weather.is_some(),
            sheets: config.sheets.is_some(),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when readings cannot be stored.
    pub status: &'static str,
    pub db_healthy: bool,
    pub monitoring: MonitoringStatus,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = homewatch_db::health_check(&state.pool).await.is_ok();
    if !db_healthy {
        tracing::warn!("Health check could not reach the database");
    }

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        db_healthy,
        monitoring: MonitoringStatus::from(&state.config.monitoring),
    })
}

/// Mounted at the root, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SheetsConfig, WeatherConfig};

    #[test]
    fn status_reflects_configured_feeds() {
        let config = MonitoringConfig {
            slack_url: Some("https://hooks.slack.test/T/B/X".into()),
            weather: Some(WeatherConfig {
                api_key: "k".into(),
                base_url: "http://weather.test".into(),
            }),
            ..MonitoringConfig::default()
        };

        assert_eq!(
            MonitoringStatus::from(&config),
            MonitoringStatus {
                timezone: "Europe/Paris".into(),
                door_watch: true,
                weather: true,
                sheets: false,
            }
        );

        let config = MonitoringConfig {
            sheets: Some(SheetsConfig {
                spreadsheet_id: "sheet-1".into(),
                range: "Messages!A2:B".into(),
                token_path: "token.json".into(),
            }),
            ..MonitoringConfig::default()
        };
        let status = MonitoringStatus::from(&config);
        assert!(!status.door_watch);
        assert!(status.sheets);
    }
}
