//! Google Sheets reader for the shared message board.
//!
//! Reads one fixed range with `spreadsheets.values.get` and returns the rows
//! as strings.

use async_trait::async_trait;
use homewatch_core::sources::{BulletinBoard, SourceError};
use serde::Deserialize;

use crate::oauth::{OAuthError, TokenSource};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Errors from the Sheets API layer.
#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    #[error("OAuth error: {0}")]
    Auth(#[from] OAuthError),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Sheets API error ({status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("Invalid Sheets base URL: {0}")]
    InvalidUrl(String),
}

impl From<SheetsError> for SourceError {
    fn from(err: SheetsError) -> Self {
        match err {
            SheetsError::Auth(OAuthError::Io { .. } | OAuthError::Parse(_)) => {
                SourceError::NotConfigured(err.to_string())
            }
            SheetsError::Auth(OAuthError::Refused { status, body }) => {
                SourceError::Rejected { status, detail: body }
            }
            SheetsError::Request(e) if e.is_decode() => SourceError::Malformed(e.to_string()),
            SheetsError::ApiError { status, body } => SourceError::Rejected {
                status,
                detail: body,
            },
            SheetsError::InvalidUrl(url) => SourceError::NotConfigured(url),
            other => SourceError::Unavailable(other.to_string()),
        }
    }
}

/// Subset of the `ValueRange` resource.
#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Reads a fixed range of a spreadsheet.
pub struct SheetsClient {
    client: reqwest::Client,
    tokens: TokenSource,
    base_url: String,
    spreadsheet_id: String,
    range: String,
}

impl SheetsClient {
    pub fn new(
        client: reqwest::Client,
        tokens: TokenSource,
        spreadsheet_id: impl Into<String>,
        range: impl Into<String>,
    ) -> Self {
        Self {
            client,
            tokens,
            base_url: DEFAULT_BASE_URL.to_string(),
            spreadsheet_id: spreadsheet_id.into(),
            range: range.into(),
        }
    }

    /// Point the client at another API root (used by tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn values_url(&self) -> Result<reqwest::Url, SheetsError> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| SheetsError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        url.path_segments_mut()
            .map_err(|()| SheetsError::InvalidUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend([
                "v4",
                "spreadsheets",
                self.spreadsheet_id.as_str(),
                "values",
                self.range.as_str(),
            ]);
        Ok(url)
    }

    /// Fetch every row of the configured range.
    pub async fn fetch_rows(&self) -> Result<Vec<Vec<String>>, SheetsError> {
        let url = self.values_url()?;
        let token = self.tokens.access_token().await?;

        let response = self.client.get(url).bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        let range: ValueRange = response.json().await?;
        Ok(range.values)
    }
}

#[async_trait]
impl BulletinBoard for SheetsClient {
    async fn rows(&self) -> Result<Vec<Vec<String>>, SourceError> {
        self.fetch_rows().await.map_err(SourceError::from)
    }
}
