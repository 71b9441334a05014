//! AWS client modules
//!
//! This module provides the capability traits the core logic is written
//! against, and their implementations over the AWS SDK:
//! - STS: Caller identity probes (per region, per profile)
//! - Pricing: Catalogue products and attribute values
//! - SSM: Region codes and long names from the public parameter hierarchy
//! - EC2: Enabled regions

pub mod account;
pub mod context;
pub mod ec2;
pub mod error;
pub mod operations;
pub mod pricing;
pub mod ssm;

// Core clients
pub use account::{AccountId, AwsProfiles, CallerIdentity, StsIdentityProbe};
pub use context::{AwsContext, FromAwsContext};
pub use ec2::Ec2Client;
pub use pricing::PricingClient;
pub use ssm::SsmClient;

// Capability traits
pub use operations::{
    AttributeSource, CatalogueQuery, CatalogueSource, IdentityProbe, Page, Parameter,
    ParameterSource, ProfileProbe, ProfileProbes, RegionSource, TermMatch,
};

// Error handling
pub use error::{ErrorClass, ServiceError, classify_code};
