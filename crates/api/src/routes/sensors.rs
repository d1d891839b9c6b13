//! Route definitions for sensor readings.

use axum::routing::get;
use axum::Router;

use crate::handlers::sensors;
use crate::state::AppState;

/// Sensor routes mounted at `/sensors`.
///
/// ```text
/// GET    /                  -> list_readings (?type=)
/// POST   /                  -> create_reading
/// GET    /last              -> latest_reading (?type=)
/// GET    /range             -> readings_in_range (?from=&to=&type=)
/// GET    /{id}              -> get_reading
/// PUT    /{id}              -> update_reading
/// DELETE /{id}              -> delete_reading
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(sensors::list_readings).post(sensors::create_reading))
        .route("/last", get(sensors::latest_reading))
        .route("/range", get(sensors::readings_in_range))
        .route(
            "/{id}",
            get(sensors::get_reading)
                .put(sensors::update_reading)
                .delete(sensors::delete_reading),
        )
}
