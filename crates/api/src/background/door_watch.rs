//! Periodic door open/close announcements.
//!
//! Every interval the task loads recent contact readings, asks the
//! [`DoorWatch`] which events are due and posts their messages to the
//! delivery sink. The task owns the watch, so passes never overlap and the
//! "already announced today" state has a single writer.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use chrono_tz::Tz;
use homewatch_core::rules::DoorWatch;
use homewatch_core::sensor::SENSOR_MAGNETIC_CONTACT;
use homewatch_core::sources::{DeliverySink, ReadingStore};
use homewatch_core::types::LocalTime;
use tokio_util::sync::CancellationToken;

/// Owns the door watch state and its collaborators.
pub struct DoorWatchTask {
    store: Arc<dyn ReadingStore>,
    sink: Arc<dyn DeliverySink>,
    watch: DoorWatch,
    timezone: Tz,
    interval: Duration,
}

impl DoorWatchTask {
    pub fn new(
        store: Arc<dyn ReadingStore>,
        sink: Arc<dyn DeliverySink>,
        watch: DoorWatch,
        timezone: Tz,
        interval: Duration,
    ) -> Self {
        Self {
            store,
            sink,
            watch,
            timezone,
            interval,
        }
    }

    pub fn watch(&self) -> &DoorWatch {
        &self.watch
    }

    /// Run one pass at `now`. Returns the number of messages delivered.
    pub async fn tick(&mut self, now: &LocalTime) -> usize {
        let from = self.watch.lookback_start(now);
        let to = now.with_timezone(&Utc);

        let contacts = match self
            .store
            .range(Some(SENSOR_MAGNETIC_CONTACT), from, to)
            .await
        {
            Ok(contacts) => contacts,
            Err(e) => {
                tracing::error!(error = %e, "Door watch: loading contact readings failed");
                return 0;
            }
        };

        let mut delivered = 0;
        for event in self.watch.evaluate(now, &contacts) {
            match self.sink.deliver(event.message()).await {
                Ok(()) => {
                    tracing::info!(?event, "Door watch: announcement sent");
                    delivered += 1;
                }
                Err(e) => {
                    tracing::warn!(?event, error = %e, "Door watch: announcement not delivered");
                }
            }
        }
        delivered
    }

    /// Run passes until `cancel` is triggered.
    pub async fn run(mut self, cancel: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            timezone = %self.timezone,
            "Door watch started"
        );

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Door watch stopping");
                    break;
                }
                _ = interval.tick() => {
                    let now = Utc::now().with_timezone(&self.timezone);
                    self.tick(&now).await;
                }
            }
        }
    }
}
