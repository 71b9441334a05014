//! Region accessibility and naming
//!
//! - [`prober`]: one identity probe, classified into accessible/unreachable/fatal
//! - [`resolver`]: bounded concurrent probing of regions and profiles
//! - [`translator`]: region code <-> catalogue location name map

pub mod prober;
pub mod resolver;
pub mod translator;

pub use prober::{ProbeOutcome, classify_probe, probe_region};
pub use resolver::RegionAccessResolver;
pub use translator::RegionNameTranslator;
