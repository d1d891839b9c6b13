pub mod health;
pub mod notifications;
pub mod sensors;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /sensors                          list, create
/// /sensors/last                     latest reading (404 when none)
/// /sensors/range                    readings between two unix times
/// /sensors/{id}                     get, update, delete
///
/// /notifications                    run a notification pass
/// /notifications/expiration         not implemented (501)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/sensors", sensors::router())
        .nest("/notifications", notifications::router())
}
