//! Error types used throughout the engine

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for Slotwise
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum SlotwiseError {
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Availability query failed: {0}")]
    AvailabilityQueryFailed(String),

    #[error("Calendar authorization expired: {0}")]
    AuthExpired(String),

    #[error("Calendar not connected: {0}")]
    NotConnected(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Calendar provider error: {0}")]
    Provider(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Slotwise operations
pub type Result<T> = std::result::Result<T, SlotwiseError>;
