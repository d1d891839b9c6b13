/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// A timestamp expressed in the configured local time zone.
pub type LocalTime = chrono::DateTime<chrono_tz::Tz>;
