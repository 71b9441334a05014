//! EC2 region listing

use super::context::{AwsContext, FromAwsContext};
use super::error::ServiceError;
use super::operations::RegionSource;
use aws_sdk_ec2::Client;
use std::collections::BTreeSet;
use tokio::sync::OnceCell;
use tracing::debug;

/// EC2 client for DescribeRegions
pub struct Ec2Client {
    client: Client,
    profile: Option<String>,
    enabled: OnceCell<BTreeSet<String>>,
}

impl FromAwsContext for Ec2Client {
    fn from_context(ctx: &AwsContext) -> Self {
        Self {
            client: ctx.ec2_client(),
            profile: ctx.profile().map(str::to_string),
            enabled: OnceCell::new(),
        }
    }
}

impl Ec2Client {
    /// Regions enabled for this account, fetched once per client.
    pub async fn enabled_regions(&self) -> Result<&BTreeSet<String>, ServiceError> {
        self.enabled
            .get_or_try_init(|| async {
                let regions: BTreeSet<String> = self.describe_regions().await?.into_iter().collect();
                debug!(
                    profile = ?self.profile,
                    regions = ?regions,
                    "Account has enabled EC2 regions"
                );
                Ok(regions)
            })
            .await
    }
}

impl RegionSource for Ec2Client {
    async fn describe_regions(&self) -> Result<Vec<String>, ServiceError> {
        let response = self
            .client
            .describe_regions()
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(&e))?;

        Ok(response
            .regions()
            .iter()
            .filter_map(|r| r.region_name())
            .map(str::to_string)
            .collect())
    }
}
