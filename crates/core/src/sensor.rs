//! Sensor vocabulary shared by the store, the API and the rules.
//!
//! Readings are stored as opaque strings; the helpers here give them meaning
//! (contact state, numeric measurement) at the point of use.

use chrono::DateTime;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Door/window magnetic contact sensor.
pub const SENSOR_MAGNETIC_CONTACT: &str = "magnetic-contact";

/// Ambient temperature in degrees Celsius.
pub const SENSOR_TEMPERATURE: &str = "temperature";

/// Relative humidity in percent.
pub const SENSOR_HUMIDITY: &str = "humidity";

/// Contact sensor value reported when the door opens.
pub const CONTACT_OPEN: &str = "0";

/// Contact sensor value reported when the door closes.
pub const CONTACT_CLOSED: &str = "1";

/// Maximum length of a sensor type name (matches the column width).
pub const MAX_SENSOR_TYPE_LEN: usize = 64;

/// A single sensor reading as seen by the rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub sensor_type: String,
    pub value: String,
    pub created: Timestamp,
}

/// Decoded state of a magnetic contact reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactState {
    Open,
    Closed,
}

impl Reading {
    pub fn new(sensor_type: impl Into<String>, value: impl Into<String>, created: Timestamp) -> Self {
        Self {
            sensor_type: sensor_type.into(),
            value: value.into(),
            created,
        }
    }

    /// Contact state, if this is a magnetic contact reading with a known value.
    pub fn contact_state(&self) -> Option<ContactState> {
        if self.sensor_type != SENSOR_MAGNETIC_CONTACT {
            return None;
        }
        match self.value.trim() {
            CONTACT_OPEN => Some(ContactState::Open),
            CONTACT_CLOSED => Some(ContactState::Closed),
            _ => None,
        }
    }

    /// Numeric measurement, if the value parses as a finite number.
    pub fn measurement(&self) -> Option<f64> {
        self.value
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

/// Validate a sensor type name supplied by a client.
pub fn validate_sensor_type(sensor_type: &str) -> Result<(), CoreError> {
    let trimmed = sensor_type.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(
            "Sensor type must not be empty".to_string(),
        ));
    }
    if trimmed.len() > MAX_SENSOR_TYPE_LEN {
        return Err(CoreError::Validation(format!(
            "Sensor type must be at most {MAX_SENSOR_TYPE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a reading value supplied by a client.
pub fn validate_value(value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(
            "Sensor value must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Convert unix seconds (fractional allowed) into a timestamp.
pub fn timestamp_from_unix_secs(secs: f64) -> Result<Timestamp, CoreError> {
    if !secs.is_finite() {
        return Err(CoreError::Validation(format!(
            "Timestamp must be a finite number of seconds, got {secs}"
        )));
    }
    let whole = secs.floor();
    let nanos = ((secs - whole) * 1e9).round().min(999_999_999.0) as u32;
    // Out-of-range floats saturate on the cast and are rejected below.
    DateTime::from_timestamp(whole as i64, nanos)
        .ok_or_else(|| CoreError::Validation(format!("Timestamp {secs} is out of range")))
}

/// Validate an inclusive `[from, to]` time range.
pub fn validate_time_range(from: Timestamp, to: Timestamp) -> Result<(), CoreError> {
    if from > to {
        return Err(CoreError::Validation(format!(
            "Range start {from} is after range end {to}"
        )));
    }
    Ok(())
}
