//! Temperature and humidity comfort rules.
//!
//! Each rule looks at the latest reading of its metric only. A reading that
//! was not taken today is ignored, and there is no debouncing: every pass
//! re-emits while the value stays out of range.

use crate::clock::is_same_local_day;
use crate::notification::Notification;
use crate::sensor::Reading;
use crate::types::LocalTime;

/// Comfort thresholds for the environmental rules. Bounds are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentThresholds {
    pub temperature_high: f64,
    pub temperature_low: f64,
    pub humidity_high: f64,
    pub humidity_low: f64,
}

impl Default for EnvironmentThresholds {
    fn default() -> Self {
        Self {
            temperature_high: 25.0,
            temperature_low: 20.0,
            humidity_high: 80.0,
            humidity_low: 20.0,
        }
    }
}

/// Notifications for the latest temperature reading.
pub fn temperature_notifications(
    latest: Option<&Reading>,
    now: &LocalTime,
    thresholds: &EnvironmentThresholds,
) -> Vec<Notification> {
    let Some(value) = todays_measurement(latest, now) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    if value >= thresholds.temperature_high {
        out.push(Notification::broadcast(format!(
            "La temperature est de {value:.0}°C. Pensez à bien vous hydrater !"
        )));
    }
    if value <= thresholds.temperature_low {
        out.push(Notification::broadcast(format!(
            "La temperature est de {value:.0}°C. Pensez à bien vous couvrir et de boir un café bien chaud !"
        )));
    }
    out
}

/// Notifications for the latest humidity reading.
pub fn humidity_notifications(
    latest: Option<&Reading>,
    now: &LocalTime,
    thresholds: &EnvironmentThresholds,
) -> Vec<Notification> {
    let Some(value) = todays_measurement(latest, now) else {
        return Vec::new();
    };

    let shown = format_decimal(value);
    let mut out = Vec::new();
    if value >= thresholds.humidity_high {
        out.push(Notification::broadcast(format!(
            "L'humidité est de {shown}%. N'hésitez pas à vous dégourdir les jambes !"
        )));
    }
    if value <= thresholds.humidity_low {
        out.push(Notification::broadcast(format!(
            "L'humidité est de {shown}%. Hydratez vous bien la peau et aérez la pièce."
        )));
    }
    out
}

fn todays_measurement(latest: Option<&Reading>, now: &LocalTime) -> Option<f64> {
    let reading = latest?;
    if !is_same_local_day(reading.created, now) {
        return None;
    }
    reading.measurement()
}

/// Render a float with at least one decimal place (`85` -> `85.0`).
fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};
    use chrono_tz::Europe::Paris;

    use super::*;
    use crate::sensor::{SENSOR_HUMIDITY, SENSOR_TEMPERATURE};

    fn noon() -> LocalTime {
        Paris.with_ymd_and_hms(2024, 6, 12, 12, 0, 0).unwrap()
    }

    fn reading(sensor_type: &str, value: &str, when: LocalTime) -> Reading {
        Reading::new(sensor_type, value, when.with_timezone(&Utc))
    }

    #[test]
    fn hot_today_asks_to_hydrate() {
        let now = noon();
        let latest = reading(SENSOR_TEMPERATURE, "26.0", now - Duration::minutes(5));

        let out = temperature_notifications(Some(&latest), &now, &EnvironmentThresholds::default());

        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].data,
            "La temperature est de 26°C. Pensez à bien vous hydrater !"
        );
    }

    #[test]
    fn cold_today_suggests_coffee() {
        let now = noon();
        let latest = reading(SENSOR_TEMPERATURE, "18.4", now - Duration::minutes(5));

        let out = temperature_notifications(Some(&latest), &now, &EnvironmentThresholds::default());

        assert_eq!(out.len(), 1);
        assert!(out[0].data.starts_with("La temperature est de 18°C."));
    }

    #[test]
    fn comfortable_temperature_is_silent() {
        let now = noon();
        let latest = reading(SENSOR_TEMPERATURE, "22", now);
        assert!(temperature_notifications(Some(&latest), &now, &EnvironmentThresholds::default())
            .is_empty());
    }

    #[test]
    fn yesterday_reading_is_ignored() {
        let now = noon();
        let latest = reading(SENSOR_TEMPERATURE, "35", now - Duration::days(1));
        assert!(temperature_notifications(Some(&latest), &now, &EnvironmentThresholds::default())
            .is_empty());
    }

    #[test]
    fn missing_or_garbled_reading_is_ignored() {
        let now = noon();
        assert!(temperature_notifications(None, &now, &EnvironmentThresholds::default()).is_empty());

        let garbled = reading(SENSOR_TEMPERATURE, "hot", now);
        assert!(
            temperature_notifications(Some(&garbled), &now, &EnvironmentThresholds::default())
                .is_empty()
        );
    }

    #[test]
    fn humid_today_keeps_one_decimal() {
        let now = noon();
        let latest = reading(SENSOR_HUMIDITY, "85", now);

        let out = humidity_notifications(Some(&latest), &now, &EnvironmentThresholds::default());

        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].data,
            "L'humidité est de 85.0%. N'hésitez pas à vous dégourdir les jambes !"
        );
    }

    #[test]
    fn dry_today_recommends_airing() {
        let now = noon();
        let latest = reading(SENSOR_HUMIDITY, "15.5", now);

        let out = humidity_notifications(Some(&latest), &now, &EnvironmentThresholds::default());

        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].data,
            "L'humidité est de 15.5%. Hydratez vous bien la peau et aérez la pièce."
        );
    }

    #[test]
    fn custom_thresholds_apply() {
        let now = noon();
        let latest = reading(SENSOR_TEMPERATURE, "23", now);
        let thresholds = EnvironmentThresholds {
            temperature_high: 23.0,
            ..EnvironmentThresholds::default()
        };
        assert_eq!(temperature_notifications(Some(&latest), &now, &thresholds).len(), 1);
    }
}
