//! Google Calendar adapter: configuration, token management, wire DTOs, and
//! the `CalendarPort` implementation.

pub mod auth;
pub mod client;
pub mod config;
pub mod models;

pub use auth::{CalendarCredentials, PersistCredentials, TokenManager};
pub use client::GoogleCalendarClient;
pub use config::GoogleCalendarConfig;
