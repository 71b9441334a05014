//! Shared test utilities for remora
//!
//! This crate provides common test helpers that can be used across
//! multiple test modules without circular dependencies.
//!
//! ## Modules
//!
//! - [`aws`]: AWS region and profile detection for integration tests
//! - [`catalogue`]: Builders for raw pricing catalogue entries

pub mod aws;
pub mod catalogue;

// Re-export commonly used items
pub use aws::{get_test_profile, get_test_region};
pub use catalogue::EntryBuilder;
