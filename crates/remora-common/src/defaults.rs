//! Default configuration values shared across remora components

/// Region the pricing client connects to by default
pub const DEFAULT_PRICING_REGION: &str = "us-east-1";

/// Currency prices are extracted in
pub const DEFAULT_CURRENCY: &str = "USD";

/// Partition whose bundled region table seeds the translator
pub const DEFAULT_PARTITION: &str = "aws";

/// Maximum number of region/profile probes in flight at once
pub const DEFAULT_MAX_CONCURRENCY: usize = 16;

/// Pricing term type used when building price tables
pub const DEFAULT_TERM_TYPE: &str = "OnDemand";

/// SSM parameter hierarchy listing every public region code
pub const REGION_PARAMETER_PATH: &str = "/aws/service/global-infrastructure/regions";

/// SSM parameter holding the long name of a region
pub fn region_long_name_parameter(short_code: &str) -> String {
    format!("{REGION_PARAMETER_PATH}/{short_code}/longName")
}
