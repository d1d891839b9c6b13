//! Sensor reading entity model and DTOs.
//!
//! The JSON shape uses `type` for the sensor type, matching what the
//! ingestion devices already send.

use homewatch_core::error::CoreError;
use homewatch_core::sensor::{
    timestamp_from_unix_secs, validate_sensor_type, validate_time_range, validate_value, Reading,
};
use homewatch_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `sensor_readings` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SensorReading {
    pub id: DbId,
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub value: String,
    pub created: Timestamp,
}

/// DTO for inserting a new reading. `created` defaults to now.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSensorReading {
    #[serde(rename = "type")]
    pub sensor_type: String,
    pub value: String,
    pub created: Option<Timestamp>,
}

/// DTO for patching a reading. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSensorReading {
    #[serde(rename = "type")]
    pub sensor_type: Option<String>,
    pub value: Option<String>,
    pub created: Option<Timestamp>,
}

/// Query parameters for list and latest lookups.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SensorTypeParams {
    #[serde(rename = "type")]
    pub sensor_type: Option<String>,
}

/// Query parameters for range lookups. Bounds are unix seconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorRangeParams {
    pub from: f64,
    pub to: f64,
    #[serde(rename = "type")]
    pub sensor_type: Option<String>,
}

/// A blank `type` query parameter means "no filter".
fn type_filter(sensor_type: &Option<String>) -> Option<&str> {
    sensor_type.as_deref().map(str::trim).filter(|t| !t.is_empty())
}

impl SensorTypeParams {
    pub fn type_filter(&self) -> Option<&str> {
        type_filter(&self.sensor_type)
    }
}

impl SensorRangeParams {
    pub fn type_filter(&self) -> Option<&str> {
        type_filter(&self.sensor_type)
    }

    /// Validated `[from, to]` bounds.
    pub fn bounds(&self) -> Result<(Timestamp, Timestamp), CoreError> {
        let from = timestamp_from_unix_secs(self.from)?;
        let to = timestamp_from_unix_secs(self.to)?;
        validate_time_range(from, to)?;
        Ok((from, to))
    }
}

impl CreateSensorReading {
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_sensor_type(&self.sensor_type)?;
        validate_value(&self.value)
    }
}

impl UpdateSensorReading {
    pub fn validate(&self) -> Result<(), CoreError> {
        if let Some(sensor_type) = &self.sensor_type {
            validate_sensor_type(sensor_type)?;
        }
        if let Some(value) = &self.value {
            validate_value(value)?;
        }
        Ok(())
    }
}

impl From<SensorReading> for Reading {
    fn from(row: SensorReading) -> Self {
        Reading {
            sensor_type: row.sensor_type,
            value: row.value,
            created: row.created,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(from: f64, to: f64) -> SensorRangeParams {
        SensorRangeParams {
            from,
            to,
            sensor_type: None,
        }
    }

    #[test]
    fn range_bounds_accept_fractional_seconds() {
        let (from, to) = params(1_718_000_000.5, 1_718_000_100.0).bounds().unwrap();
        assert_eq!(from.timestamp_subsec_millis(), 500);
        assert_eq!(to.timestamp(), 1_718_000_100);
    }

    #[test]
    fn blank_type_is_no_filter() {
        let blank = SensorTypeParams {
            sensor_type: Some(" ".into()),
        };
        assert_eq!(blank.type_filter(), None);

        let humidity = SensorTypeParams {
            sensor_type: Some("humidity".into()),
        };
        assert_eq!(humidity.type_filter(), Some("humidity"));
    }

    #[test]
    fn range_bounds_reject_inverted_range() {
        assert!(matches!(
            params(200.0, 100.0).bounds(),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn update_validates_only_present_fields() {
        assert!(UpdateSensorReading::default().validate().is_ok());
        let blank = UpdateSensorReading {
            value: Some("  ".into()),
            ..UpdateSensorReading::default()
        };
        assert!(blank.validate().is_err());
    }
}
