//! Door opening/closing detection from magnetic contact readings.
//!
//! The watch fires at most one "opened" message per local calendar day and
//! at most one "closed" message per evening. Re-arming is by calendar date:
//! once a rule has fired on a date it stays quiet until the date changes.

use chrono::{Duration, NaiveDate, Timelike, Utc};

use crate::clock::at_local_hour;
use crate::error::CoreError;
use crate::sensor::{ContactState, Reading};
use crate::types::{LocalTime, Timestamp};

/// Message posted when the door is considered open for the day.
pub const OPENED_MESSAGE: &str = "Beaubourg est ouvert ! :door:";

/// Message posted when the door is considered closed for the night.
pub const CLOSED_MESSAGE: &str = "Bonne nuit les suricats :night_with_stars:";

/// Time windows and settle delays for the door rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoorSchedule {
    /// First hour (local) at which an opening counts.
    pub opening_start_hour: u32,
    /// Last hour (local) at which an opening counts, same day.
    pub opening_end_hour: u32,
    /// How long the door must stay open before the opening is announced.
    pub opening_delay: Duration,
    /// First hour (local) at which a closing counts.
    pub closing_start_hour: u32,
    /// Last hour (local) at which a closing counts. When it is not after
    /// `closing_start_hour` the window ends on the following day.
    pub closing_end_hour: u32,
    /// How long the door must stay closed before the closing is announced.
    pub closing_delay: Duration,
}

impl Default for DoorSchedule {
    fn default() -> Self {
        Self {
            opening_start_hour: 6,
            opening_end_hour: 10,
            opening_delay: Duration::minutes(5),
            closing_start_hour: 18,
            closing_end_hour: 2,
            closing_delay: Duration::minutes(15),
        }
    }
}

impl DoorSchedule {
    /// Check that hours are on the clock and delays are positive.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, hour) in [
            ("opening_start_hour", self.opening_start_hour),
            ("opening_end_hour", self.opening_end_hour),
            ("closing_start_hour", self.closing_start_hour),
            ("closing_end_hour", self.closing_end_hour),
        ] {
            if hour > 23 {
                return Err(CoreError::Validation(format!(
                    "{name} must be between 0 and 23, got {hour}"
                )));
            }
        }
        if self.opening_end_hour <= self.opening_start_hour {
            return Err(CoreError::Validation(
                "opening window must end after it starts".to_string(),
            ));
        }
        if self.opening_delay <= Duration::zero() || self.closing_delay <= Duration::zero() {
            return Err(CoreError::Validation(
                "door delays must be positive".to_string(),
            ));
        }
        Ok(())
    }

    fn closing_wraps_midnight(&self) -> bool {
        self.closing_end_hour <= self.closing_start_hour
    }
}

/// A door transition worth announcing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoorEvent {
    Opened,
    Closed,
}

impl DoorEvent {
    pub fn message(self) -> &'static str {
        match self {
            DoorEvent::Opened => OPENED_MESSAGE,
            DoorEvent::Closed => CLOSED_MESSAGE,
        }
    }
}

/// Dates on which each rule last fired.
///
/// `last_closing` holds the date the evening window *started* on, so a
/// closing announced at 01:00 is filed under the previous day.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DoorWatchState {
    pub last_opening: Option<NaiveDate>,
    pub last_closing: Option<NaiveDate>,
}

/// Stateful door rule evaluator.
///
/// Owned by exactly one task; [`DoorWatch::evaluate`] takes `&mut self`, so
/// the re-arming state has a single writer.
#[derive(Debug, Clone)]
pub struct DoorWatch {
    schedule: DoorSchedule,
    state: DoorWatchState,
}

impl DoorWatch {
    pub fn new(schedule: DoorSchedule) -> Self {
        Self::with_state(schedule, DoorWatchState::default())
    }

    pub fn with_state(schedule: DoorSchedule, state: DoorWatchState) -> Self {
        Self { schedule, state }
    }

    pub fn state(&self) -> &DoorWatchState {
        &self.state
    }

    /// Earliest instant a contact reading can matter for a pass at `now`.
    ///
    /// Callers fetch contact readings from here up to `now`.
    pub fn lookback_start(&self, now: &LocalTime) -> Timestamp {
        let (opening_start, _) = self.opening_window(now.date_naive(), now);
        let (closing_start, _) = self.closing_window(self.evening_of(now), now);
        opening_start.min(closing_start)
    }

    /// Run both rules against the contact readings seen so far.
    ///
    /// Returns the events to announce and records them in the state.
    pub fn evaluate(&mut self, now: &LocalTime, contacts: &[Reading]) -> Vec<DoorEvent> {
        let mut events = Vec::new();

        if self.opening_due(now, contacts) {
            self.state.last_opening = Some(now.date_naive());
            events.push(DoorEvent::Opened);
        }

        if let Some(evening) = self.closing_due(now, contacts) {
            self.state.last_closing = Some(evening);
            events.push(DoorEvent::Closed);
        }

        events
    }

    fn opening_due(&self, now: &LocalTime, contacts: &[Reading]) -> bool {
        let today = now.date_naive();
        if self.state.last_opening.is_some_and(|d| d >= today) {
            return false;
        }

        let now_utc = now.with_timezone(&Utc);
        let delay = self.schedule.opening_delay;
        let (start, end) = self.opening_window(today, now);
        if now_utc > end + delay {
            return false;
        }

        let Some(anchor) = last_in_window(contacts, ContactState::Open, start, end) else {
            return false;
        };
        let settle = anchor + delay;
        if now_utc < settle {
            return false;
        }

        !any_in_window(contacts, ContactState::Closed, anchor, settle)
    }

    fn closing_due(&self, now: &LocalTime, contacts: &[Reading]) -> Option<NaiveDate> {
        let evening = self.evening_of(now);
        if self.state.last_closing.is_some_and(|d| d >= evening) {
            return None;
        }

        let now_utc = now.with_timezone(&Utc);
        let delay = self.schedule.closing_delay;
        let (start, end) = self.closing_window(evening, now);
        if now_utc > end + delay {
            return None;
        }

        let anchor = last_in_window(contacts, ContactState::Closed, start, end)?;
        let settle = anchor + delay;
        if now_utc < settle {
            return None;
        }

        if any_in_window(contacts, ContactState::Open, anchor, settle) {
            return None;
        }
        Some(evening)
    }

    /// The evening whose closing window `now` belongs to.
    fn evening_of(&self, now: &LocalTime) -> NaiveDate {
        let today = now.date_naive();
        if now.hour() >= self.schedule.closing_start_hour || !self.schedule.closing_wraps_midnight()
        {
            today
        } else {
            today.pred_opt().unwrap_or(today)
        }
    }

    fn opening_window(&self, date: NaiveDate, now: &LocalTime) -> (Timestamp, Timestamp) {
        let tz = now.timezone();
        let start = at_local_hour(tz, date, self.schedule.opening_start_hour);
        let end = at_local_hour(tz, date, self.schedule.opening_end_hour);
        (start.with_timezone(&Utc), end.with_timezone(&Utc))
    }

    fn closing_window(&self, evening: NaiveDate, now: &LocalTime) -> (Timestamp, Timestamp) {
        let tz = now.timezone();
        let end_date = if self.schedule.closing_wraps_midnight() {
            evening.succ_opt().unwrap_or(evening)
        } else {
            evening
        };
        let start = at_local_hour(tz, evening, self.schedule.closing_start_hour);
        let end = at_local_hour(tz, end_date, self.schedule.closing_end_hour);
        (start.with_timezone(&Utc), end.with_timezone(&Utc))
    }
}

/// Latest reading in `[from, to]` with the given contact state.
fn last_in_window(
    contacts: &[Reading],
    state: ContactState,
    from: Timestamp,
    to: Timestamp,
) -> Option<Timestamp> {
    contacts
        .iter()
        .filter(|r| r.contact_state() == Some(state))
        .map(|r| r.created)
        .filter(|created| *created >= from && *created <= to)
        .max()
}

fn any_in_window(contacts: &[Reading], state: ContactState, from: Timestamp, to: Timestamp) -> bool {
    last_in_window(contacts, state, from, to).is_some()
}
