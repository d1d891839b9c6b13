//! Repository for the `sensor_readings` table (append-mostly time-series).

use homewatch_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::sensor_reading::{CreateSensorReading, SensorReading, UpdateSensorReading};

/// Column list for `sensor_readings` queries.
const COLUMNS: &str = "id, sensor_type, value, created";

/// Optional sensor type filter; `$1` binds to `Option<&str>`.
const TYPE_FILTER: &str = "($1::TEXT IS NULL OR sensor_type = $1)";

/// Provides CRUD and time-range queries for sensor readings.
pub struct SensorReadingRepo;

impl SensorReadingRepo {
    /// Insert a reading. A missing `created` is filled with `NOW()`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSensorReading,
    ) -> Result<SensorReading, sqlx::Error> {
        let query = format!(
            "INSERT INTO sensor_readings (sensor_type, value, created) \
             VALUES ($1, $2, COALESCE($3, NOW())) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(input.sensor_type.trim())
            .bind(&input.value)
            .bind(input.created)
            .fetch_one(pool)
            .await
    }

    /// Find a reading by its ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SensorReading>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sensor_readings WHERE id = $1");
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List readings, optionally of a single type, oldest first.
    pub async fn list(
        pool: &PgPool,
        sensor_type: Option<&str>,
    ) -> Result<Vec<SensorReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sensor_readings \
             WHERE {TYPE_FILTER} \
             ORDER BY created ASC, id ASC"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(sensor_type)
            .fetch_all(pool)
            .await
    }

    /// Most recent reading, optionally of a single type.
    ///
    /// Ties on `created` resolve to the highest ID (last inserted).
    pub async fn latest(
        pool: &PgPool,
        sensor_type: Option<&str>,
    ) -> Result<Option<SensorReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sensor_readings \
             WHERE {TYPE_FILTER} \
             ORDER BY created DESC, id DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(sensor_type)
            .fetch_optional(pool)
            .await
    }

    /// Readings with `from <= created <= to`, oldest first.
    pub async fn range(
        pool: &PgPool,
        sensor_type: Option<&str>,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<SensorReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sensor_readings \
             WHERE {TYPE_FILTER} AND created BETWEEN $2 AND $3 \
             ORDER BY created ASC, id ASC"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(sensor_type)
            .bind(from)
            .bind(to)
            .fetch_all(pool)
            .await
    }

    /// Patch a reading. Returns `None` when the ID does not exist.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateSensorReading,
    ) -> Result<Option<SensorReading>, sqlx::Error> {
        let query = format!(
            "UPDATE sensor_readings SET \
                sensor_type = COALESCE($2, sensor_type), \
                value = COALESCE($3, value), \
                created = COALESCE($4, created) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(id)
            .bind(input.sensor_type.as_deref().map(str::trim))
            .bind(&input.value)
            .bind(input.created)
            .fetch_optional(pool)
            .await
    }

    /// Delete a reading. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sensor_readings WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
