//! Shared test fixtures for core integration tests.

mod calendar;

pub use calendar::MockCalendarPort;
