//! On-demand notification pass: environment, forecast and bulletin rules.
//!
//! A pass runs every sub-rule concurrently and never fails as a whole. Each
//! sub-rule reports a [`RuleOutcome`], so callers can tell "nothing to say"
//! apart from "could not ask" and decide what to log.

use std::sync::Arc;

use chrono::{Duration, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::clock::DEFAULT_TIMEZONE;
use crate::notification::Notification;
use crate::rules::bulletin::bulletin_notifications;
use crate::rules::environment::{
    humidity_notifications, temperature_notifications, EnvironmentThresholds,
};
use crate::rules::forecast::{full_moon, rain_warning};
use crate::sensor::{SENSOR_HUMIDITY, SENSOR_TEMPERATURE};
use crate::sources::{BulletinBoard, ForecastProvider, ReadingStore, SourceError};
use crate::types::LocalTime;

/// Geographic position of the monitored building.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

/// Paris, where the building is.
pub const DEFAULT_LOCATION: Location = Location {
    latitude: 48.8589506,
    longitude: 2.276848,
};

/// Language requested from the forecast provider.
pub const DEFAULT_FORECAST_LANGUAGE: &str = "fr";

/// Identifies a sub-rule in a [`PassReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleName {
    Temperature,
    Humidity,
    Forecast,
    Bulletin,
}

/// What happened to one sub-rule during a pass.
#[derive(Debug)]
pub enum RuleOutcome {
    /// The rule ran and produced this many notifications (possibly zero).
    Emitted(usize),
    /// The rule had no source configured.
    Skipped,
    /// The rule's source failed; the rule produced nothing.
    Failed(SourceError),
}

/// Result of one notification pass.
#[derive(Debug, Default)]
pub struct PassReport {
    pub notifications: Vec<Notification>,
    pub outcomes: Vec<(RuleName, RuleOutcome)>,
}

impl PassReport {
    /// Sub-rules whose source failed.
    pub fn failures(&self) -> impl Iterator<Item = (RuleName, &SourceError)> {
        self.outcomes.iter().filter_map(|(rule, outcome)| match outcome {
            RuleOutcome::Failed(err) => Some((*rule, err)),
            _ => None,
        })
    }

    fn record(&mut self, rule: RuleName, result: Result<Option<Vec<Notification>>, SourceError>) {
        let outcome = match result {
            Ok(Some(mut notes)) => {
                let count = notes.len();
                self.notifications.append(&mut notes);
                RuleOutcome::Emitted(count)
            }
            Ok(None) => RuleOutcome::Skipped,
            Err(err) => RuleOutcome::Failed(err),
        };
        self.outcomes.push((rule, outcome));
    }
}

/// Static settings for a [`NotificationPass`].
#[derive(Debug, Clone)]
pub struct PassSettings {
    pub timezone: Tz,
    pub location: Location,
    pub forecast_language: String,
    pub thresholds: EnvironmentThresholds,
}

impl Default for PassSettings {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE,
            location: DEFAULT_LOCATION,
            forecast_language: DEFAULT_FORECAST_LANGUAGE.to_string(),
            thresholds: EnvironmentThresholds::default(),
        }
    }
}

/// Evaluates the pull-based rules against the store and external feeds.
pub struct NotificationPass {
    store: Arc<dyn ReadingStore>,
    forecast: Option<Arc<dyn ForecastProvider>>,
    bulletin: Option<Arc<dyn BulletinBoard>>,
    settings: PassSettings,
}

impl NotificationPass {
    pub fn new(store: Arc<dyn ReadingStore>, settings: PassSettings) -> Self {
        Self {
            store,
            forecast: None,
            bulletin: None,
            settings,
        }
    }

    pub fn with_forecast(mut self, provider: Arc<dyn ForecastProvider>) -> Self {
        self.forecast = Some(provider);
        self
    }

    pub fn with_bulletin(mut self, board: Arc<dyn BulletinBoard>) -> Self {
        self.bulletin = Some(board);
        self
    }

    /// Current time in the configured zone.
    pub fn now(&self) -> LocalTime {
        Utc::now().with_timezone(&self.settings.timezone)
    }

    /// Run every sub-rule once.
    ///
    /// Notifications keep a stable order: temperature, humidity, rain,
    /// full moon, then spreadsheet rows.
    pub async fn run(&self, now: &LocalTime) -> PassReport {
        let (temperature, humidity, forecast, bulletin) = tokio::join!(
            self.temperature(now),
            self.humidity(now),
            self.forecast(now),
            self.bulletin(),
        );

        let mut report = PassReport::default();
        report.record(RuleName::Temperature, temperature);
        report.record(RuleName::Humidity, humidity);
        report.record(RuleName::Forecast, forecast);
        report.record(RuleName::Bulletin, bulletin);
        report
    }

    async fn temperature(&self, now: &LocalTime) -> Result<Option<Vec<Notification>>, SourceError> {
        let latest = self.store.latest(Some(SENSOR_TEMPERATURE)).await?;
        Ok(Some(temperature_notifications(
            latest.as_ref(),
            now,
            &self.settings.thresholds,
        )))
    }

    async fn humidity(&self, now: &LocalTime) -> Result<Option<Vec<Notification>>, SourceError> {
        let latest = self.store.latest(Some(SENSOR_HUMIDITY)).await?;
        Ok(Some(humidity_notifications(
            latest.as_ref(),
            now,
            &self.settings.thresholds,
        )))
    }

    async fn forecast(&self, now: &LocalTime) -> Result<Option<Vec<Notification>>, SourceError> {
        let Some(provider) = &self.forecast else {
            return Ok(None);
        };

        let tomorrow = (*now + Duration::days(1)).with_timezone(&Utc);
        let location = self.settings.location;
        let daily = provider
            .daily_forecast(
                location.latitude,
                location.longitude,
                tomorrow,
                &self.settings.forecast_language,
            )
            .await?;

        let notes = rain_warning(&daily, self.settings.timezone)
            .into_iter()
            .chain(full_moon(&daily))
            .collect();
        Ok(Some(notes))
    }

    async fn bulletin(&self) -> Result<Option<Vec<Notification>>, SourceError> {
        let Some(board) = &self.bulletin else {
            return Ok(None);
        };
        let rows = board.rows().await?;
        Ok(Some(bulletin_notifications(&rows)))
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use chrono_tz::Europe::Paris;

    use super::*;
    use crate::rules::forecast::DailyForecast;
    use crate::sensor::Reading;
    use crate::types::Timestamp;

    struct MemoryStore(Vec<Reading>);

    #[async_trait]
    impl ReadingStore for MemoryStore {
        async fn latest(&self, sensor_type: Option<&str>) -> Result<Option<Reading>, SourceError> {
            Ok(self
                .0
                .iter()
                .filter(|r| sensor_type.map_or(true, |t| r.sensor_type == t))
                .max_by_key(|r| r.created)
                .cloned())
        }

        async fn range(
            &self,
            sensor_type: Option<&str>,
            from: Timestamp,
            to: Timestamp,
        ) -> Result<Vec<Reading>, SourceError> {
            Ok(self
                .0
                .iter()
                .filter(|r| sensor_type.map_or(true, |t| r.sensor_type == t))
                .filter(|r| r.created >= from && r.created <= to)
                .cloned()
                .collect())
        }

        async fn all(&self, sensor_type: Option<&str>) -> Result<Vec<Reading>, SourceError> {
            self.range(sensor_type, Timestamp::MIN_UTC, Timestamp::MAX_UTC)
                .await
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl ReadingStore for BrokenStore {
        async fn latest(&self, _: Option<&str>) -> Result<Option<Reading>, SourceError> {
            Err(SourceError::Unavailable("pool closed".into()))
        }

        async fn range(
            &self,
            _: Option<&str>,
            _: Timestamp,
            _: Timestamp,
        ) -> Result<Vec<Reading>, SourceError> {
            Err(SourceError::Unavailable("pool closed".into()))
        }

        async fn all(&self, _: Option<&str>) -> Result<Vec<Reading>, SourceError> {
            Err(SourceError::Unavailable("pool closed".into()))
        }
    }

    struct FixedForecast(DailyForecast);

    #[async_trait]
    impl ForecastProvider for FixedForecast {
        async fn daily_forecast(
            &self,
            _: f64,
            _: f64,
            _: Timestamp,
            _: &str,
        ) -> Result<DailyForecast, SourceError> {
            Ok(self.0.clone())
        }
    }

    struct DownForecast;

    #[async_trait]
    impl ForecastProvider for DownForecast {
        async fn daily_forecast(
            &self,
            _: f64,
            _: f64,
            _: Timestamp,
            _: &str,
        ) -> Result<DailyForecast, SourceError> {
            Err(SourceError::Unavailable("timed out".into()))
        }
    }

    struct FixedBulletin(Vec<Vec<String>>);

    #[async_trait]
    impl BulletinBoard for FixedBulletin {
        async fn rows(&self) -> Result<Vec<Vec<String>>, SourceError> {
            Ok(self.0.clone())
        }
    }

    fn noon() -> LocalTime {
        Paris.with_ymd_and_hms(2024, 6, 12, 12, 0, 0).unwrap()
    }

    fn hot_store(now: &LocalTime) -> Arc<dyn ReadingStore> {
        Arc::new(MemoryStore(vec![
            Reading::new(SENSOR_TEMPERATURE, "26.0", now.with_timezone(&Utc)),
            Reading::new(SENSOR_HUMIDITY, "50", now.with_timezone(&Utc)),
        ]))
    }

    fn bulletin() -> Arc<dyn BulletinBoard> {
        Arc::new(FixedBulletin(vec![vec![
            "Apéro vendredi".to_string(),
            "Sam".to_string(),
        ]]))
    }

    #[tokio::test]
    async fn collects_notifications_in_rule_order() {
        let now = noon();
        let forecast = DailyForecast {
            moon_phase: Some(0.5),
            ..DailyForecast::default()
        };
        let pass = NotificationPass::new(hot_store(&now), PassSettings::default())
            .with_forecast(Arc::new(FixedForecast(forecast)))
            .with_bulletin(bulletin());

        let report = pass.run(&now).await;

        let texts: Vec<&str> = report.notifications.iter().map(|n| n.data.as_str()).collect();
        assert_eq!(
            texts,
            vec![
                "La temperature est de 26°C. Pensez à bien vous hydrater !",
                "Demain c'est la pleine lune. N'oubliez pas votre appareil photo ;)",
                "Sam : Apéro vendredi",
            ]
        );
        assert_eq!(report.failures().count(), 0);
    }

    #[tokio::test]
    async fn forecast_failure_keeps_other_rules() {
        let now = noon();
        let pass = NotificationPass::new(hot_store(&now), PassSettings::default())
            .with_forecast(Arc::new(DownForecast))
            .with_bulletin(bulletin());

        let report = pass.run(&now).await;

        assert_eq!(report.notifications.len(), 2);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].0, RuleName::Forecast);
        assert_matches!(failures[0].1, SourceError::Unavailable(_));
    }

    #[tokio::test]
    async fn unconfigured_feeds_are_skipped() {
        let now = noon();
        let pass = NotificationPass::new(hot_store(&now), PassSettings::default());

        let report = pass.run(&now).await;

        assert_eq!(report.notifications.len(), 1);
        assert_matches!(
            report.outcomes.as_slice(),
            [
                (RuleName::Temperature, RuleOutcome::Emitted(1)),
                (RuleName::Humidity, RuleOutcome::Emitted(0)),
                (RuleName::Forecast, RuleOutcome::Skipped),
                (RuleName::Bulletin, RuleOutcome::Skipped),
            ]
        );
    }

    #[tokio::test]
    async fn store_failure_is_reported_per_metric() {
        let now = noon();
        let pass = NotificationPass::new(Arc::new(BrokenStore), PassSettings::default())
            .with_bulletin(bulletin());

        let report = pass.run(&now).await;

        assert_eq!(report.notifications.len(), 1);
        let failed: Vec<RuleName> = report.failures().map(|(rule, _)| rule).collect();
        assert_eq!(failed, vec![RuleName::Temperature, RuleName::Humidity]);
    }
}
