//! # Slotwise Infrastructure
//!
//! Provider-side implementation of the core calendar port.
//!
//! This crate contains:
//! - The Google Calendar REST adapter
//! - OAuth token management with refresh-and-retry-once
//! - Wire DTOs and error conversions
//!
//! ## Architecture
//! - Implements `slotwise_core::CalendarPort`
//! - Depends on `slotwise-domain` and `slotwise-core`
//! - Contains all HTTP/I-O code; nothing here is consulted by the scanner

pub mod errors;
pub mod google;

// Re-export commonly used items
pub use errors::InfraError;
pub use google::{
    CalendarCredentials, GoogleCalendarClient, GoogleCalendarConfig, PersistCredentials,
    TokenManager,
};
