//! Configuration types for pricing and region resolution

use remora_common::defaults::{
    DEFAULT_CURRENCY, DEFAULT_MAX_CONCURRENCY, DEFAULT_PARTITION, DEFAULT_PRICING_REGION,
};
use remora_common::endpoints::EndpointTable;

/// Partition `region` belongs to in the bundled table, `aws` when unknown.
pub fn partition_for_region(region: &str) -> String {
    EndpointTable::bundled()
        .ok()
        .and_then(|table| table.partition_of(region))
        .unwrap_or(DEFAULT_PARTITION)
        .to_string()
}

/// Settings for a pricing session and the probes around it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    /// Region hosting the pricing endpoint
    pub region: String,
    /// AWS profile name (overrides default credential resolution)
    pub profile: Option<String>,
    /// Currency prices are extracted in
    pub currency: String,
    /// Partition whose bundled region names seed the translator
    pub partition: String,
    /// Maximum probes in flight at once
    pub max_concurrency: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_PRICING_REGION.to_string(),
            profile: None,
            currency: DEFAULT_CURRENCY.to_string(),
            partition: DEFAULT_PARTITION.to_string(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }
}

impl PricingConfig {
    /// Defaults for a pricing endpoint in `region`, in that region's partition.
    pub fn for_region(region: impl Into<String>) -> Self {
        let region = region.into();
        Self {
            partition: partition_for_region(&region),
            region,
            ..Self::default()
        }
    }

    pub fn with_profile(mut self, profile: Option<String>) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = partition.into();
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }
}
