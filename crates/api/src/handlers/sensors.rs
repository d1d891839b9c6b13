//! Handlers for sensor readings.
//!
//! Readings are pushed by the door contacts and the environment sensors and
//! read back by the dashboard. Every list is ordered oldest first.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use homewatch_core::error::CoreError;
use homewatch_core::types::DbId;
use homewatch_db::models::sensor_reading::{
    CreateSensorReading, SensorRangeParams, SensorTypeParams, UpdateSensorReading,
};
use homewatch_db::repositories::SensorReadingRepo;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "SensorReading";

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: ENTITY, id })
}

// ---------------------------------------------------------------------------
// Collection
// ---------------------------------------------------------------------------

/// GET /api/v1/sensors
///
/// List readings, optionally filtered with `?type=`.
pub async fn list_readings(
    State(state): State<AppState>,
    Query(params): Query<SensorTypeParams>,
) -> AppResult<impl IntoResponse> {
    let readings = SensorReadingRepo::list(&state.pool, params.type_filter()).await?;

    Ok(Json(DataResponse { data: readings }))
}

/// POST /api/v1/sensors
///
/// Store a reading. `created` defaults to the current time.
pub async fn create_reading(
    State(state): State<AppState>,
    Json(input): Json<CreateSensorReading>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let reading = SensorReadingRepo::create(&state.pool, &input).await?;

    tracing::debug!(
        id = reading.id,
        sensor_type = %reading.sensor_type,
        value = %reading.value,
        "Sensor reading stored",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: reading })))
}

/// GET /api/v1/sensors/last
///
/// Most recent reading, optionally of one type. 404 when nothing matches.
pub async fn latest_reading(
    State(state): State<AppState>,
    Query(params): Query<SensorTypeParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.type_filter();
    let reading = SensorReadingRepo::latest(&state.pool, filter)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NoMatch {
                entity: ENTITY,
                filter: match filter {
                    Some(t) => format!("type '{t}'"),
                    None => "any type".to_string(),
                },
            })
        })?;

    Ok(Json(DataResponse { data: reading }))
}

/// GET /api/v1/sensors/range
///
/// Readings with `from <= created <= to`. Bounds are unix seconds and may
/// carry a fractional part.
pub async fn readings_in_range(
    State(state): State<AppState>,
    Query(params): Query<SensorRangeParams>,
) -> AppResult<impl IntoResponse> {
    let (from, to) = params.bounds()?;

    let readings = SensorReadingRepo::range(&state.pool, params.type_filter(), from, to).await?;

    Ok(Json(DataResponse { data: readings }))
}

// ---------------------------------------------------------------------------
// Single reading
// ---------------------------------------------------------------------------

/// GET /api/v1/sensors/{id}
pub async fn get_reading(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let reading = SensorReadingRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(DataResponse { data: reading }))
}

/// PUT /api/v1/sensors/{id}
///
/// Partial update: only the fields present in the body change.
pub async fn update_reading(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateSensorReading>,
) -> AppResult<impl IntoResponse> {
    input.validate()?;

    let reading = SensorReadingRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(id, "Sensor reading updated");

    Ok(Json(DataResponse { data: reading }))
}

/// DELETE /api/v1/sensors/{id}
pub async fn delete_reading(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = SensorReadingRepo::delete(&state.pool, id).await?;

    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(id, "Sensor reading deleted");

    Ok(StatusCode::NO_CONTENT)
}
