//! Catalogue pricing
//!
//! - [`normalizer`]: raw catalogue entry -> [`Offer`]
//! - [`cache`]: read-through offer store per resource kind
//! - [`filter`]: attribute filtering and price tables over cached offers
//! - [`session`]: ties a catalogue source, region map and caches together

pub mod cache;
pub mod filter;
pub mod normalizer;
pub mod offer;
pub mod session;

pub use cache::OfferCache;
pub use filter::{filter, prices_by_key};
pub use normalizer::{NormalizeError, normalize, normalize_value};
pub use offer::Offer;
pub use session::{PRICING_SERVICE, PricingSession, ensure_service_region};
