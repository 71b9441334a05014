//! Concurrent region and profile accessibility checks
//!
//! Fans [`probe_region`] out over many regions or profiles with a bounded
//! number of probes in flight. Unreachable regions and unauthenticated
//! profiles are simply left out of the result; a fatal credential error
//! aborts the batch.

use super::prober::{ProbeOutcome, probe_region};
use crate::aws::{IdentityProbe, ProfileProbe, ProfileProbes};
use crate::error::PricingError;
use futures::stream::{self, StreamExt};
use remora_common::defaults::DEFAULT_MAX_CONCURRENCY;
use std::collections::BTreeSet;
use tracing::{debug, error, info, warn};

/// Bounded fan-out over region/profile probes.
#[derive(Debug, Clone, Copy)]
pub struct RegionAccessResolver {
    max_concurrency: usize,
}

impl Default for RegionAccessResolver {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CONCURRENCY)
    }
}

impl RegionAccessResolver {
    /// `max_concurrency` is clamped to at least 1.
    pub fn new(max_concurrency: usize) -> Self {
        Self {
            max_concurrency: max_concurrency.max(1),
        }
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Regions among `candidates` that answer an identity probe.
    ///
    /// An empty result is logged as an error (most likely a credential or
    /// network problem) but returned normally; callers decide if it is fatal.
    pub async fn accessible_regions<P: IdentityProbe>(
        &self,
        probe: &P,
        candidates: &[String],
    ) -> Result<BTreeSet<String>, PricingError> {
        let mut outcomes = stream::iter(candidates)
            .map(|region| async move { (region, probe_region(probe, region).await) })
            .buffer_unordered(self.max_concurrency);

        let mut accessible = BTreeSet::new();
        while let Some((region, outcome)) = outcomes.next().await {
            match outcome {
                ProbeOutcome::Accessible(_) => {
                    accessible.insert(region.clone());
                }
                ProbeOutcome::Unreachable { .. } => {}
                ProbeOutcome::Fatal(source) => {
                    return Err(PricingError::InvalidCredentials {
                        region: region.clone(),
                        profile: None,
                        source,
                    });
                }
            }
        }

        if accessible.is_empty() {
            error!(
                candidates = candidates.len(),
                "Access to all regions failed. There may be a credential or network issue."
            );
        } else {
            debug!(accessible = ?accessible, "Resolved accessible regions");
        }

        Ok(accessible)
    }

    /// Profiles among `candidates` that authenticate, in input order.
    ///
    /// With no candidates, every configured profile is checked. Requested
    /// names absent from the config files are dropped with a warning.
    ///
    /// Each profile is probed in `region`, or in its own default region when
    /// `region` is `None`. A profile with neither is dropped with a warning.
    pub async fn authenticated_profiles<F: ProfileProbes>(
        &self,
        profiles: &F,
        candidates: Option<&[String]>,
        region: Option<&str>,
    ) -> Result<Vec<String>, PricingError> {
        let configured = profiles.configured_profiles().await?;
        let candidates: Vec<String> = match candidates {
            Some(names) => names
                .iter()
                .filter(|name| {
                    let found = configured.contains(*name);
                    if !found {
                        warn!(profile = %name, "Profile was not found");
                    }
                    found
                })
                .cloned()
                .collect(),
            None => {
                info!(count = configured.len(), "Checking all configured profiles");
                configured
            }
        };

        let mut outcomes = stream::iter(&candidates)
            .map(|name| async move {
                let ProfileProbe {
                    profile,
                    probe,
                    region: resolved,
                } = profiles.connect(name, region).await;
                match resolved {
                    Some(r) => {
                        debug!(profile = %profile, region = %r, "Checking profile can access region");
                        let outcome = probe_region(&probe, &r).await;
                        (profile, Some((r, outcome)))
                    }
                    None => (profile, None),
                }
            })
            .buffered(self.max_concurrency);

        let mut authenticated = Vec::new();
        while let Some((profile, probed)) = outcomes.next().await {
            match probed {
                Some((_, ProbeOutcome::Accessible(identity))) => {
                    info!(profile = %profile, account_id = %identity.account, "Profile authenticated");
                    authenticated.push(profile);
                }
                Some((region, ProbeOutcome::Unreachable { code })) => {
                    warn!(
                        profile = %profile,
                        region = %region,
                        code = ?code,
                        "Profile could not reach region"
                    );
                }
                Some((region, ProbeOutcome::Fatal(source))) => {
                    return Err(PricingError::InvalidCredentials {
                        region,
                        profile: Some(profile),
                        source,
                    });
                }
                None => {
                    warn!(profile = %profile, "Profile has no region configured, skipping");
                }
            }
        }

        Ok(authenticated)
    }
}
