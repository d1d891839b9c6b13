//! Slack incoming-webhook delivery.
//!
//! [`SlackWebhook`] posts `{"text": ...}` to a fixed webhook URL. A single
//! attempt is made; the caller decides what to do with a failure.

use async_trait::async_trait;
use homewatch_core::sources::{DeliverySink, SourceError};

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum SlackError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Slack returned a non-2xx status code.
    #[error("Webhook returned HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },
}

impl From<SlackError> for SourceError {
    fn from(err: SlackError) -> Self {
        match err {
            SlackError::Request(e) => SourceError::Unavailable(e.to_string()),
            SlackError::HttpStatus { status, body } => SourceError::Rejected {
                status,
                detail: body,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// SlackWebhook
// ---------------------------------------------------------------------------

/// Posts plain-text messages to a Slack incoming webhook.
#[derive(Clone)]
pub struct SlackWebhook {
    client: reqwest::Client,
    url: String,
}

impl SlackWebhook {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Send one message. The JSON body sets `Content-Type: application/json`.
    pub async fn post(&self, text: &str) -> Result<(), SlackError> {
        let payload = serde_json::json!({ "text": text });
        let response = self.client.post(&self.url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl DeliverySink for SlackWebhook {
    async fn deliver(&self, text: &str) -> Result<(), SourceError> {
        self.post(text).await.map_err(SourceError::from)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
