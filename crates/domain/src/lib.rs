//! # Slotwise Domain
//!
//! Business domain types and models for the Slotwise availability engine.
//!
//! This crate contains:
//! - Interval and slot types used by the scanner
//! - Search request/constraint models
//! - Meeting, event, and partial-update models
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Slotwise crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod constraints;
pub mod errors;
pub mod event;
pub mod interval;
pub mod meeting;

// Re-export commonly used items
pub use constraints::*;
pub use errors::*;
pub use event::*;
pub use interval::*;
pub use meeting::*;
