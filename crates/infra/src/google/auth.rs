//! OAuth token management for the Google adapter
//!
//! Holds the current credentials behind an async lock, refreshes them when
//! expired, and hands rotated credentials to a caller-supplied persistence
//! callback. The adapter itself persists nothing; the interactive consent
//! flow that mints the first credentials lives outside this crate.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use slotwise_domain::{Result, SlotwiseError};

use crate::errors::InfraError;

/// Margin subtracted from the stored expiry so a token that is about to
/// expire mid-request is refreshed up front
const EXPIRY_SKEW_SECS: i64 = 60;

/// Stored provider credentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarCredentials {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl CalendarCredentials {
    /// True when the access token is past (or within the skew margin of) its
    /// recorded expiry. Tokens without a recorded expiry are assumed live.
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at
            .is_some_and(|expiry| now + Duration::seconds(EXPIRY_SKEW_SECS) >= expiry)
    }
}

/// Callback invoked with rotated credentials so the caller can persist them
pub type PersistCredentials = Arc<dyn Fn(CalendarCredentials) + Send + Sync>;

/// Async token store with refresh
pub struct TokenManager {
    token_url: String,
    client_id: String,
    client_secret: String,
    http: Client,
    credentials: RwLock<Option<CalendarCredentials>>,
    on_rotate: Option<PersistCredentials>,
}

impl TokenManager {
    /// Create a manager with no stored credentials
    pub fn new(
        token_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            token_url: token_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            http,
            credentials: RwLock::new(None),
            on_rotate: None,
        }
    }

    /// Seed stored credentials
    pub fn with_credentials(mut self, credentials: CalendarCredentials) -> Self {
        self.credentials = RwLock::new(Some(credentials));
        self
    }

    /// Register the persistence callback for rotated credentials
    pub fn with_persistence(mut self, callback: PersistCredentials) -> Self {
        self.on_rotate = Some(callback);
        self
    }

    /// Replace the stored credentials (e.g. after an external consent flow)
    pub async fn set_credentials(&self, credentials: CalendarCredentials) {
        *self.credentials.write().await = Some(credentials);
    }

    /// Current access token, refreshing first when expired
    ///
    /// # Errors
    /// `NotConnected` when no credentials are stored at all; `AuthExpired`
    /// when the token is stale and can not be refreshed.
    pub async fn access_token(&self) -> Result<String> {
        let (token, expired) = {
            let guard = self.credentials.read().await;
            match guard.as_ref() {
                None => {
                    return Err(SlotwiseError::NotConnected(
                        "no calendar credentials stored".into(),
                    ))
                }
                Some(creds) => (creds.access_token.clone(), creds.is_expired(Utc::now())),
            }
        };

        if !expired {
            return Ok(token);
        }

        debug!("access token expired, refreshing");
        self.force_refresh().await
    }

    /// Refresh unconditionally and return the new access token
    ///
    /// Used by the client's 401 retry path; a 401 means the provider already
    /// rejected the current token regardless of its recorded expiry.
    pub async fn force_refresh(&self) -> Result<String> {
        let refresh_token = {
            let guard = self.credentials.read().await;
            match guard.as_ref() {
                None => {
                    return Err(SlotwiseError::NotConnected(
                        "no calendar credentials stored".into(),
                    ))
                }
                Some(creds) => creds.refresh_token.clone().ok_or_else(|| {
                    SlotwiseError::AuthExpired(
                        "access token expired and no refresh token is stored".into(),
                    )
                })?,
            }
        };

        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token.as_str()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|e| {
                SlotwiseError::AuthExpired(format!("token refresh request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_else(|_| "unknown error".to_string());
            warn!(status = status.as_u16(), "token refresh rejected");
            return Err(SlotwiseError::AuthExpired(format!(
                "token refresh failed ({status}): {body}"
            )));
        }

        let refreshed: TokenRefreshResponse =
            response.json().await.map_err(|e| SlotwiseError::from(InfraError::from(e)))?;

        let rotated = CalendarCredentials {
            access_token: refreshed.access_token.clone(),
            refresh_token: Some(refresh_token),
            expires_at: Some(Utc::now() + Duration::seconds(refreshed.expires_in)),
        };

        *self.credentials.write().await = Some(rotated.clone());
        if let Some(persist) = &self.on_rotate {
            persist(rotated);
        }

        debug!("access token refreshed");
        Ok(refreshed.access_token)
    }
}

#[derive(Debug, Deserialize)]
struct TokenRefreshResponse {
    access_token: String,
    expires_in: i64,
}
