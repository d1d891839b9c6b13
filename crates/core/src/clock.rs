//! Local calendar helpers.
//!
//! Rules reason in the building's local time zone (windows like "06:00 to
//! 10:00", "today"), while the store records UTC. These helpers do the
//! conversions in one place, including DST gaps and overlaps.

use chrono::{Duration, LocalResult, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use crate::error::CoreError;
use crate::types::{LocalTime, Timestamp};

/// Default time zone of the monitored building.
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::Europe::Paris;

/// Parse an IANA time zone name such as `Europe/Paris`.
pub fn parse_timezone(name: &str) -> Result<Tz, CoreError> {
    name.trim()
        .parse::<Tz>()
        .map_err(|e| CoreError::Validation(format!("Unknown time zone '{name}': {e}")))
}

/// The instant at `hour:00` local time on `date`.
///
/// An ambiguous local time (DST fall-back) resolves to the earlier instant.
/// A skipped local time (DST spring-forward) resolves to the first instant
/// after the gap, so 02:00 on a Paris spring-forward night is 03:00 CEST.
pub fn at_local_hour(tz: Tz, date: NaiveDate, hour: u32) -> LocalTime {
    let time = NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or(NaiveTime::MIN);
    let naive = date.and_time(time);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(t) => t,
        LocalResult::Ambiguous(earliest, _) => earliest,
        // Gaps are whole hours in every zone we care about; step past them.
        LocalResult::None => (1..=3)
            .find_map(|h| tz.from_local_datetime(&(naive + Duration::hours(h))).earliest())
            .unwrap_or_else(|| tz.from_utc_datetime(&naive)),
    }
}

/// Midnight at the start of the local day containing `now`.
pub fn start_of_day(now: &LocalTime) -> LocalTime {
    at_local_hour(now.timezone(), now.date_naive(), 0)
}

/// Whether `ts` falls on the same local calendar date as `now`.
pub fn is_same_local_day(ts: Timestamp, now: &LocalTime) -> bool {
    ts.with_timezone(&now.timezone()).date_naive() == now.date_naive()
}
