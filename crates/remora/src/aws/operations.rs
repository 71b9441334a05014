//! Capability traits for the AWS services remora consumes
//!
//! Region probing, region naming and the offer cache are written against
//! these traits rather than SDK clients, so the logic can be unit tested
//! with in-memory fakes. Paginated operations return one [`Page`] per call;
//! draining is done by the caller (see [`crate::pages::drain_pages`]).

use super::account::CallerIdentity;
use super::error::ServiceError;
use crate::error::PricingError;
use std::future::Future;

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Continuation token; `None` on the last page
    pub next_token: Option<String>,
}

/// Exact-match constraint on one catalogue attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TermMatch {
    pub field: String,
    pub value: String,
}

/// A catalogue product query: service code plus ANDed exact-match filters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueQuery {
    pub service_code: String,
    pub filters: Vec<TermMatch>,
}

impl CatalogueQuery {
    pub fn new(service_code: &str) -> Self {
        Self {
            service_code: service_code.to_string(),
            filters: Vec::new(),
        }
    }

    /// Add an exact-match filter.
    pub fn term_match(mut self, field: &str, value: &str) -> Self {
        self.filters.push(TermMatch {
            field: field.to_string(),
            value: value.to_string(),
        });
        self
    }
}

/// A parameter-store entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub value: String,
}

/// STS GetCallerIdentity against a region-scoped endpoint.
pub trait IdentityProbe: Send + Sync {
    fn get_caller_identity(
        &self,
        region: &str,
    ) -> impl Future<Output = Result<CallerIdentity, ServiceError>> + Send;
}

/// An identity probe bound to a named credential profile.
#[derive(Debug, Clone)]
pub struct ProfileProbe<P> {
    pub profile: String,
    pub probe: P,
    /// Region to probe: the requested one, else the profile's default
    pub region: Option<String>,
}

/// Builds identity probes for named credential profiles.
pub trait ProfileProbes: Send + Sync {
    type Probe: IdentityProbe;

    /// Names of every profile in the shared config and credentials files.
    fn configured_profiles(
        &self,
    ) -> impl Future<Output = Result<Vec<String>, PricingError>> + Send;

    fn connect(
        &self,
        profile: &str,
        region: Option<&str>,
    ) -> impl Future<Output = ProfileProbe<Self::Probe>> + Send;
}

/// Pricing GetProducts.
pub trait CatalogueSource: Send + Sync {
    /// Fetch one page of raw JSON price-list entries.
    fn get_products(
        &self,
        query: &CatalogueQuery,
        next_token: Option<String>,
    ) -> impl Future<Output = Result<Page<String>, ServiceError>> + Send;
}

/// Pricing GetAttributeValues.
pub trait AttributeSource: Send + Sync {
    fn get_attribute_values(
        &self,
        service_code: &str,
        attribute_name: &str,
        next_token: Option<String>,
    ) -> impl Future<Output = Result<Page<String>, ServiceError>> + Send;
}

/// SSM parameter hierarchy reads.
pub trait ParameterSource: Send + Sync {
    fn get_parameters_by_path(
        &self,
        path: &str,
        next_token: Option<String>,
    ) -> impl Future<Output = Result<Page<Parameter>, ServiceError>> + Send;

    /// Value of a single parameter, `None` if it does not exist.
    fn get_parameter(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<String>, ServiceError>> + Send;
}

/// EC2 DescribeRegions.
pub trait RegionSource: Send + Sync {
    fn describe_regions(&self) -> impl Future<Output = Result<Vec<String>, ServiceError>> + Send;
}
