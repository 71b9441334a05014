//! remora-common - Shared types and reference data
//!
//! This crate provides the pieces of remora that need no AWS SDK:
//!
//! ## Modules
//!
//! - [`defaults`]: Default configuration values
//! - [`endpoints`]: Bundled region/partition reference table
//! - [`region_map`]: Bidirectional region code <-> catalogue name map
//! - [`resource_kind`]: Closed registry of priceable resource types

pub mod defaults;
pub mod endpoints;
pub mod region_map;
pub mod resource_kind;

// Re-export commonly used types
pub use endpoints::{EndpointError, EndpointTable};
pub use region_map::RegionMap;
pub use resource_kind::{ResourceKey, ResourceKind, UndefinedResourceKey};
