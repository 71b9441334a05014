//! AWS caller identity and region-scoped identity probes

use super::context::{AwsContext, FromAwsContext};
use super::error::ServiceError;
use super::operations::{IdentityProbe, ProfileProbe, ProfileProbes};
use crate::error::PricingError;
use aws_runtime::env_config::file::EnvConfigFiles;
use aws_types::os_shim_internal::{Env, Fs};
use tracing::debug;

/// Strongly-typed AWS account ID (12-digit string)
///
/// This newtype prevents accidentally mixing account IDs with other strings
/// and ensures account validation happens at specific points in the code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, derive_more::Deref)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(s: impl Into<String>) -> Self {
        AccountId(s.into())
    }
}

/// Identity payload returned by a successful GetCallerIdentity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub account: AccountId,
    /// Principal ARN
    pub arn: String,
}

/// Identity probe backed by STS, one region-scoped client per call.
#[derive(Clone)]
pub struct StsIdentityProbe {
    ctx: AwsContext,
}

impl FromAwsContext for StsIdentityProbe {
    fn from_context(ctx: &AwsContext) -> Self {
        Self { ctx: ctx.clone() }
    }
}

impl IdentityProbe for StsIdentityProbe {
    async fn get_caller_identity(&self, region: &str) -> Result<CallerIdentity, ServiceError> {
        let sts = self.ctx.sts_client_for(region);
        let identity = sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| ServiceError::from_sdk(&e))?;

        debug!(region = %region, arn = ?identity.arn(), "Caller identity resolved");

        Ok(CallerIdentity {
            account: AccountId::new(identity.account().unwrap_or_default()),
            arn: identity.arn().unwrap_or_default().to_string(),
        })
    }
}

/// Loads a fresh AWS context per named profile and probes it with STS.
#[derive(Debug, Clone, Copy, Default)]
pub struct AwsProfiles;

impl ProfileProbes for AwsProfiles {
    type Probe = StsIdentityProbe;

    async fn configured_profiles(&self) -> Result<Vec<String>, PricingError> {
        let profiles = aws_config::profile::load(
            &Fs::real(),
            &Env::real(),
            &EnvConfigFiles::default(),
            None,
        )
        .await
        .map_err(|e| PricingError::ProfileFiles { source: Box::new(e) })?;

        let mut names: Vec<String> = profiles.profiles().map(str::to_string).collect();
        names.sort();
        debug!(count = names.len(), "Loaded configured profiles");
        Ok(names)
    }

    async fn connect(&self, profile: &str, region: Option<&str>) -> ProfileProbe<StsIdentityProbe> {
        let ctx = AwsContext::with_profile(region, Some(profile)).await;
        ProfileProbe {
            profile: profile.to_string(),
            region: ctx.region().map(str::to_string),
            probe: StsIdentityProbe::from_context(&ctx),
        }
    }
}
