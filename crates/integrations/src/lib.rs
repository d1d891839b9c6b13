//! Outbound HTTP integrations.
//!
//! - [`slack::SlackWebhook`]: posts door messages to a Slack incoming webhook.
//! - [`weather::DarkSkyClient`]: daily forecast lookups.
//! - [`sheets::SheetsClient`]: reads the shared message spreadsheet, with
//!   [`oauth::TokenSource`] keeping its access token fresh.
//!
//! Every client implements the matching trait from
//! [`homewatch_core::sources`] and maps its own error type into
//! [`homewatch_core::sources::SourceError`].

use std::time::Duration;

pub mod oauth;
pub mod sheets;
pub mod slack;
pub mod weather;

pub use sheets::SheetsClient;
pub use slack::SlackWebhook;
pub use weather::DarkSkyClient;

/// HTTP request timeout for a single outbound call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the shared HTTP client used by every integration.
pub fn http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()
}
