//! OAuth access tokens for Google APIs, from an authorized-user token file.
//!
//! The token file is the JSON written by Google's client libraries after the
//! one-time consent flow (either the `oauth2client` or the `google-auth`
//! field names). The consent flow itself is not run here: the file must
//! already hold a refresh token. Refreshed tokens are written back so
//! restarts reuse them.

use std::path::{Path, PathBuf};

use chrono::{Duration, Utc};
use homewatch_core::types::Timestamp;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Google's token endpoint, used when the file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens this close to expiry are refreshed early.
const EXPIRY_MARGIN_SECS: i64 = 60;

#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
    #[error("Cannot read token file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid token file: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Token refresh request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Token endpoint refused refresh ({status}): {body}")]
    Refused { status: u16, body: String },
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Contents of an authorized-user token file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorizedUser {
    #[serde(default, alias = "token")]
    pub access_token: Option<String>,
    pub refresh_token: String,
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default, alias = "expiry")]
    pub token_expiry: Option<Timestamp>,
}

impl AuthorizedUser {
    /// Whether the cached access token can still be used at `now`.
    pub fn is_fresh(&self, now: Timestamp) -> bool {
        match (&self.access_token, self.token_expiry) {
            (Some(_), Some(expiry)) => expiry - Duration::seconds(EXPIRY_MARGIN_SECS) > now,
            _ => false,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Hands out valid access tokens, refreshing them when needed.
///
/// Concurrent callers serialize on an async mutex so a single refresh is in
/// flight at a time.
pub struct TokenSource {
    client: reqwest::Client,
    path: PathBuf,
    cached: Mutex<Option<AuthorizedUser>>,
}

impl TokenSource {
    pub fn new(client: reqwest::Client, path: impl Into<PathBuf>) -> Self {
        Self {
            client,
            path: path.into(),
            cached: Mutex::new(None),
        }
    }

    /// A bearer token valid for at least the next minute.
    pub async fn access_token(&self) -> Result<String, OAuthError> {
        let mut cached = self.cached.lock().await;

        let creds = match cached.take() {
            Some(creds) => creds,
            None => load(&self.path).await?,
        };

        let creds = if creds.is_fresh(Utc::now()) {
            creds
        } else {
            self.refresh(creds).await?
        };

        let token = creds.access_token.clone().unwrap_or_default();
        *cached = Some(creds);
        Ok(token)
    }

    async fn refresh(&self, mut creds: AuthorizedUser) -> Result<AuthorizedUser, OAuthError> {
        tracing::debug!(token_uri = %creds.token_uri, "Refreshing OAuth access token");

        let response = self
            .client
            .post(&creds.token_uri)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", creds.refresh_token.as_str()),
                ("client_id", creds.client_id.as_str()),
                ("client_secret", creds.client_secret.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OAuthError::Refused {
                status: status.as_u16(),
                body,
            });
        }

        let refreshed: RefreshResponse = response.json().await?;
        creds.access_token = Some(refreshed.access_token);
        creds.token_expiry = refreshed
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));

        if let Err(e) = store(&self.path, &creds).await {
            tracing::warn!(path = %self.path.display(), error = %e, "Could not persist refreshed token");
        }

        Ok(creds)
    }
}

async fn load(path: &Path) -> Result<AuthorizedUser, OAuthError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| OAuthError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn store(path: &Path, creds: &AuthorizedUser) -> Result<(), OAuthError> {
    let json = serde_json::to_vec_pretty(creds)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|source| OAuthError::Io {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds(expiry: Option<Timestamp>) -> AuthorizedUser {
        AuthorizedUser {
            access_token: Some("abc".into()),
            refresh_token: "r".into(),
            client_id: "c".into(),
            client_secret: "s".into(),
            token_uri: DEFAULT_TOKEN_URI.into(),
            token_expiry: expiry,
        }
    }

    #[test]
    fn freshness_respects_margin() {
        let now = Utc::now();
        assert!(creds(Some(now + Duration::minutes(10))).is_fresh(now));
        assert!(!creds(Some(now + Duration::seconds(30))).is_fresh(now));
        assert!(!creds(None).is_fresh(now));
    }

    #[test]
    fn parses_google_auth_field_names() {
        let parsed: AuthorizedUser = serde_json::from_str(
            r#"{"token":"t","refresh_token":"r","client_id":"c","client_secret":"s",
                "expiry":"2030-01-01T00:00:00Z"}"#,
        )
        .unwrap();
        assert_eq!(parsed.access_token.as_deref(), Some("t"));
        assert_eq!(parsed.token_uri, DEFAULT_TOKEN_URI);
        assert!(parsed.token_expiry.is_some());
    }

    #[tokio::test]
    async fn missing_file_is_an_io_error() {
        let source = TokenSource::new(reqwest::Client::new(), "/nonexistent/token.json");
        let err = source.access_token().await.unwrap_err();
        assert!(matches!(err, OAuthError::Io { .. }));
    }
}
