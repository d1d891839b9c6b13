//! Notifications produced by a rule pass.
//!
//! Notifications are ephemeral: every pass builds a fresh list and nothing
//! is persisted.

use serde::{Deserialize, Serialize};

/// Audience used by every rule today.
pub const TARGET_ALL: &str = "all";

/// Kind of notification payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    /// A plain human-readable message.
    Message,
}

/// A single notification as exposed to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub target: String,
    pub data: String,
}

impl Notification {
    /// A message addressed to everyone.
    pub fn broadcast(data: impl Into<String>) -> Self {
        Self {
            kind: NotificationKind::Message,
            target: TARGET_ALL.to_string(),
            data: data.into(),
        }
    }
}
