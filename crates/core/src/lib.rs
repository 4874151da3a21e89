//! # Slotwise Core
//!
//! Pure availability-engine logic - no infrastructure dependencies.
//!
//! This crate contains:
//! - Wall-clock conversions for arbitrary IANA timezones
//! - The constraint normalizer and the cursor-based slot scanner
//! - Availability and meeting services
//! - The `CalendarPort` trait the provider adapter implements
//!
//! ## Architecture Principles
//! - Only depends on `slotwise-domain`
//! - No HTTP or provider code
//! - All external interaction via the port trait
//! - The clock is an explicit parameter; nothing here reads system time

pub mod availability;
pub mod meetings;
pub mod normalize;
pub mod ports;
pub mod scanner;
pub mod wallclock;

// Re-export specific items to avoid ambiguity
pub use availability::AvailabilityService;
pub use meetings::MeetingService;
pub use normalize::normalize;
pub use ports::CalendarPort;
pub use scanner::{scan, ScanState, SkipReason, Transition};
