//! Notification rules.
//!
//! - [`door`]: stateful open/close detection, driven by a periodic task.
//! - [`environment`], [`forecast`], [`bulletin`]: stateless rules evaluated
//!   on demand by a [`pass::NotificationPass`].

pub mod bulletin;
pub mod door;
pub mod environment;
pub mod forecast;
pub mod pass;

pub use door::{DoorEvent, DoorSchedule, DoorWatch, DoorWatchState};
pub use environment::EnvironmentThresholds;
pub use forecast::DailyForecast;
pub use pass::{
    Location, NotificationPass, PassReport, PassSettings, RuleName, RuleOutcome,
};
