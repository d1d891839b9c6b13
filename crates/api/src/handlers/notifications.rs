//! Handlers for the notification pull API.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/notifications
///
/// Run one notification pass and return what it produced. Failing sources
/// are logged and leave their rule silent; the request itself still succeeds.
///
/// The list is wrapped as `{"data": [...]}` like every other endpoint here.
/// Clients written against the older bare-array response must read `data`.
pub async fn list_notifications(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let now = state.notifier.now();
    let report = state.notifier.run(&now).await;

    for (rule, err) in report.failures() {
        tracing::warn!(?rule, error = %err, "Notification rule source failed");
    }

    tracing::debug!(count = report.notifications.len(), "Notification pass complete");

    Ok(Json(DataResponse {
        data: report.notifications,
    }))
}

/// POST /api/v1/notifications/expiration
pub async fn set_expiration() -> AppResult<impl IntoResponse> {
    Err::<(), _>(AppError::NotImplemented("Notification expiration"))
}
