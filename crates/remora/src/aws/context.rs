//! Shared AWS configuration context
//!
//! Provides `AwsContext` for loading AWS SDK configuration once and
//! creating multiple service clients from the same config.

use aws_config::{BehaviorVersion, Region, SdkConfig};
use std::sync::Arc;

/// Shared AWS configuration context for creating service clients.
///
/// This struct holds a loaded AWS SDK config and provides methods
/// to create service clients without re-loading configuration.
///
/// # Example
/// ```ignore
/// let aws = AwsContext::new("us-east-1").await;
///
/// // Create multiple clients from the same config
/// let pricing = PricingClient::from_context(&aws);
/// let ssm = SsmClient::from_context(&aws);
/// ```
#[derive(Clone)]
pub struct AwsContext {
    config: Arc<SdkConfig>,
    profile: Option<String>,
}

/// Types that can be constructed from a loaded [`AwsContext`].
pub trait FromAwsContext {
    fn from_context(ctx: &AwsContext) -> Self;
}

impl AwsContext {
    /// Load AWS configuration for the specified region.
    ///
    /// This loads credentials, region configuration, and other AWS SDK
    /// settings from the environment, config files, and IAM roles.
    pub async fn new(region: &str) -> Self {
        Self::with_profile(Some(region), None).await
    }

    /// Load AWS configuration for an optional region and named profile.
    ///
    /// With no region, the profile's (or environment's) default region is
    /// used, if any.
    pub async fn with_profile(region: Option<&str>, profile: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }
        let config = loader.load().await;

        Self {
            config: Arc::new(config),
            profile: profile.map(str::to_string),
        }
    }

    /// Get the underlying SDK config for direct client construction.
    pub fn sdk_config(&self) -> &SdkConfig {
        &self.config
    }

    /// Resolved region, if the environment or profile provided one.
    pub fn region(&self) -> Option<&str> {
        self.config.region().map(|r| r.as_ref())
    }

    /// Profile this context was loaded for, if explicitly named.
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }

    /// Create a Pricing client from this context.
    pub fn pricing_client(&self) -> aws_sdk_pricing::Client {
        aws_sdk_pricing::Client::new(self.sdk_config())
    }

    /// Create an SSM client from this context.
    pub fn ssm_client(&self) -> aws_sdk_ssm::Client {
        aws_sdk_ssm::Client::new(self.sdk_config())
    }

    /// Create an EC2 client from this context.
    pub fn ec2_client(&self) -> aws_sdk_ec2::Client {
        aws_sdk_ec2::Client::new(self.sdk_config())
    }

    /// Create an STS client bound to `region`, overriding the context region.
    pub fn sts_client_for(&self, region: &str) -> aws_sdk_sts::Client {
        let conf = aws_sdk_sts::config::Builder::from(self.sdk_config())
            .region(Region::new(region.to_string()))
            .build();
        aws_sdk_sts::Client::from_conf(conf)
    }
}

impl std::fmt::Debug for AwsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsContext")
            .field("region", &self.region())
            .field("profile", &self.profile)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: These tests require AWS credentials and are marked as integration tests
    // They are skipped in regular test runs

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_context_creation() {
        let ctx = AwsContext::new("us-east-1").await;
        assert_eq!(ctx.region(), Some("us-east-1"));
        assert_eq!(ctx.profile(), None);
    }

    #[tokio::test]
    #[ignore = "requires AWS credentials"]
    async fn test_context_clone() {
        let ctx1 = AwsContext::new("eu-central-1").await;
        let ctx2 = ctx1.clone();

        // Both should point to the same Arc'd config
        assert!(Arc::ptr_eq(&ctx1.config, &ctx2.config));
    }
}
