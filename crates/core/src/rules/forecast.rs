//! Rain and full-moon warnings from tomorrow's daily forecast.

use chrono::{DateTime, Timelike};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::notification::Notification;

/// Minimum precipitation probability for a rain warning.
pub const RAIN_PROBABILITY_MIN: f64 = 0.45;

/// Precipitation intensity (mm/h) that must be exceeded for a rain warning.
pub const RAIN_INTENSITY_MIN: f64 = 0.5;

/// Moon phase range considered "full moon" (0.5 is exactly full).
pub const FULL_MOON_PHASE: (f64, f64) = (0.45, 0.55);

/// Message for a full moon tomorrow.
pub const FULL_MOON_MESSAGE: &str =
    "Demain c'est la pleine lune. N'oubliez pas votre appareil photo ;)";

/// One day of forecast data. Field names follow the provider's JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    #[serde(default)]
    pub precip_probability: Option<f64>,
    #[serde(default)]
    pub precip_type: Option<String>,
    #[serde(default)]
    pub precip_intensity_max: Option<f64>,
    /// Unix seconds of the peak precipitation intensity.
    #[serde(default)]
    pub precip_intensity_max_time: Option<i64>,
    #[serde(default)]
    pub moon_phase: Option<f64>,
}

/// Rain warning when tomorrow looks wet enough to need an umbrella.
pub fn rain_warning(forecast: &DailyForecast, tz: Tz) -> Option<Notification> {
    let probability = forecast.precip_probability?;
    let intensity = forecast.precip_intensity_max?;
    if probability < RAIN_PROBABILITY_MIN
        || forecast.precip_type.as_deref() != Some("rain")
        || intensity <= RAIN_INTENSITY_MIN
    {
        return None;
    }

    let peak = forecast
        .precip_intensity_max_time
        .and_then(|secs| DateTime::from_timestamp(secs, 0))?
        .with_timezone(&tz);

    Some(Notification::broadcast(format!(
        "Attention ! Demain il risque de pleuvoir aux alentours de {:02}h{:02} ! N'oubliez pas votre parapluie.",
        peak.hour(),
        peak.minute()
    )))
}

/// Full-moon reminder when tomorrow's moon phase is close to 0.5.
pub fn full_moon(forecast: &DailyForecast) -> Option<Notification> {
    let phase = forecast.moon_phase?;
    let (low, high) = FULL_MOON_PHASE;
    (low..=high)
        .contains(&phase)
        .then(|| Notification::broadcast(FULL_MOON_MESSAGE))
}
