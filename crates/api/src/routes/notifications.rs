//! Route definitions for the notification pull API.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notifications;
use crate::state::AppState;

/// Notification routes mounted at `/notifications`.
///
/// ```text
/// GET    /                  -> list_notifications
/// POST   /expiration        -> set_expiration (501)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notifications::list_notifications))
        .route("/expiration", post(notifications::set_expiration))
}
