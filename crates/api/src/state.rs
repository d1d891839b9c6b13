use std::sync::Arc;

use homewatch_core::rules::NotificationPass;
use homewatch_db::PgReadingStore;
use homewatch_integrations::oauth::TokenSource;
use homewatch_integrations::{DarkSkyClient, SheetsClient};

use crate::config::{MonitoringConfig, ServerConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: homewatch_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// On-demand rule pass behind `GET /notifications`.
    pub notifier: Arc<NotificationPass>,
}

/// Wire the notification pass to the database and whichever external feeds
/// are configured.
pub fn build_notification_pass(
    pool: homewatch_db::DbPool,
    config: &MonitoringConfig,
    http: &reqwest::Client,
) -> NotificationPass {
    let store = Arc::new(PgReadingStore::new(pool));
    let mut pass = NotificationPass::new(store, config.pass_settings());

    match &config.weather {
        Some(weather) => {
            pass = pass.with_forecast(Arc::new(DarkSkyClient::new(
                http.clone(),
                weather.base_url.clone(),
                weather.api_key.clone(),
            )));
        }
        None => tracing::info!("WEATHER_API_KEY not set, forecast rule disabled"),
    }

    match &config.sheets {
        Some(sheets) => {
            let tokens = TokenSource::new(http.clone(), sheets.token_path.clone());
            pass = pass.with_bulletin(Arc::new(SheetsClient::new(
                http.clone(),
                tokens,
                sheets.spreadsheet_id.clone(),
                sheets.range.clone(),
            )));
        }
        None => tracing::info!("SHEETS_SPREADSHEET_ID not set, bulletin rule disabled"),
    }

    pass
}
