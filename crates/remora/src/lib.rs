//! remora - AWS region access and pricing resolution
//!
//! This crate finds the regions and profiles the current credentials can
//! reach, translates region codes to pricing catalogue location names, and
//! serves normalized catalogue offers from a read-through cache.

pub mod aws;
pub mod config;
pub mod error;
pub mod pages;
pub mod pricing;
pub mod regions;

#[cfg(test)]
mod testing;

pub use config::PricingConfig;
pub use error::PricingError;
