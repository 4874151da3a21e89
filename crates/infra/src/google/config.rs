//! Google Calendar adapter configuration
//!
//! ## Environment Variables
//! - `SLOTWISE_GOOGLE_CLIENT_ID`: OAuth client id
//! - `SLOTWISE_GOOGLE_CLIENT_SECRET`: OAuth client secret
//! - `SLOTWISE_CALENDAR_ID`: calendar to operate on (defaults to `primary`)

use std::time::Duration;

use slotwise_domain::{Result, SlotwiseError};

const GOOGLE_CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const DEFAULT_CALENDAR_ID: &str = "primary";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Adapter configuration
///
/// `Default` points at the production Google endpoints; tests override
/// `api_base` and `token_url` with a mock server.
#[derive(Debug, Clone)]
pub struct GoogleCalendarConfig {
    /// Calendar REST API base, no trailing slash
    pub api_base: String,
    /// OAuth token endpoint used for refresh
    pub token_url: String,
    pub client_id: String,
    pub client_secret: String,
    /// Calendar the adapter operates on
    pub calendar_id: String,
    /// Per-request HTTP timeout
    pub timeout: Duration,
}

impl Default for GoogleCalendarConfig {
    fn default() -> Self {
        Self {
            api_base: GOOGLE_CALENDAR_API_BASE.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            client_id: String::new(),
            client_secret: String::new(),
            calendar_id: DEFAULT_CALENDAR_ID.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GoogleCalendarConfig {
    /// Load credentials from the environment
    ///
    /// # Errors
    /// Returns `SlotwiseError::Config` when a required variable is missing
    /// or empty.
    pub fn from_env() -> Result<Self> {
        let client_id = env_var("SLOTWISE_GOOGLE_CLIENT_ID")?;
        let client_secret = env_var("SLOTWISE_GOOGLE_CLIENT_SECRET")?;
        let calendar_id = std::env::var("SLOTWISE_CALENDAR_ID")
            .unwrap_or_else(|_| DEFAULT_CALENDAR_ID.to_string());

        Ok(Self { client_id, client_secret, calendar_id, ..Self::default() })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }
}

fn env_var(name: &str) -> Result<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SlotwiseError::Config(format!("{name} is not set"))),
    }
}
