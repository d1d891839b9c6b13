//! [`ReadingStore`] backed by PostgreSQL.

use async_trait::async_trait;
use homewatch_core::sensor::Reading;
use homewatch_core::sources::{ReadingStore, SourceError};
use homewatch_core::types::Timestamp;

use crate::repositories::SensorReadingRepo;
use crate::DbPool;

/// Adapts [`SensorReadingRepo`] to the rules' query surface.
#[derive(Clone)]
pub struct PgReadingStore {
    pool: DbPool,
}

impl PgReadingStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn source_error(err: sqlx::Error) -> SourceError {
    tracing::debug!(error = %err, "Sensor store query failed");
    SourceError::Unavailable(err.to_string())
}

#[async_trait]
impl ReadingStore for PgReadingStore {
    async fn latest(&self, sensor_type: Option<&str>) -> Result<Option<Reading>, SourceError> {
        let row = SensorReadingRepo::latest(&self.pool, sensor_type)
            .await
            .map_err(source_error)?;
        Ok(row.map(Reading::from))
    }

    async fn range(
        &self,
        sensor_type: Option<&str>,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Reading>, SourceError> {
        let rows = SensorReadingRepo::range(&self.pool, sensor_type, from, to)
            .await
            .map_err(source_error)?;
        Ok(rows.into_iter().map(Reading::from).collect())
    }

    async fn all(&self, sensor_type: Option<&str>) -> Result<Vec<Reading>, SourceError> {
        let rows = SensorReadingRepo::list(&self.pool, sensor_type)
            .await
            .map_err(source_error)?;
        Ok(rows.into_iter().map(Reading::from).collect())
    }
}
