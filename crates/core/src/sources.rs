//! Trait seams between the rules and the outside world.
//!
//! The rules only see these traits. Production implementations live in
//! `homewatch-db` (sensor store) and `homewatch-integrations` (Slack,
//! weather, spreadsheet); tests plug in in-memory fakes.

use async_trait::async_trait;

use crate::rules::forecast::DailyForecast;
use crate::sensor::Reading;
use crate::types::Timestamp;

/// Failure of an external collaborator, as seen by the rules.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The collaborator could not be reached (network, DNS, pool exhausted).
    #[error("source unavailable: {0}")]
    Unavailable(String),

    /// The collaborator answered with a non-success status.
    #[error("source rejected the request with status {status}: {detail}")]
    Rejected { status: u16, detail: String },

    /// The collaborator answered with something we could not interpret.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Required credentials or settings are missing.
    #[error("source not configured: {0}")]
    NotConfigured(String),
}

/// Read-only query surface over stored sensor readings.
#[async_trait]
pub trait ReadingStore: Send + Sync {
    /// Most recent reading, optionally restricted to one sensor type.
    async fn latest(&self, sensor_type: Option<&str>) -> Result<Option<Reading>, SourceError>;

    /// Readings with `from <= created <= to`, oldest first.
    async fn range(
        &self,
        sensor_type: Option<&str>,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Reading>, SourceError>;

    /// Every reading, optionally restricted to one sensor type, oldest first.
    async fn all(&self, sensor_type: Option<&str>) -> Result<Vec<Reading>, SourceError>;
}

/// Weather forecast lookup.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    /// Daily forecast for the day containing `at` at the given coordinates.
    async fn daily_forecast(
        &self,
        latitude: f64,
        longitude: f64,
        at: Timestamp,
        language: &str,
    ) -> Result<DailyForecast, SourceError>;
}

/// Shared spreadsheet of free-form messages.
#[async_trait]
pub trait BulletinBoard: Send + Sync {
    /// All rows of the configured range, each with up to two cells.
    async fn rows(&self) -> Result<Vec<Vec<String>>, SourceError>;
}

/// Destination for human-readable push messages.
#[async_trait]
pub trait DeliverySink: Send + Sync {
    async fn deliver(&self, text: &str) -> Result<(), SourceError>;
}
