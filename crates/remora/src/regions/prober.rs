//! Single-region reachability probe

use crate::aws::{CallerIdentity, IdentityProbe, ServiceError};
use tracing::debug;

/// Outcome of probing one region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The region answered; identity attached for reuse
    Accessible(CallerIdentity),
    /// Disabled, not opted in, or not reachable over the network
    Unreachable { code: Option<String> },
    /// The credentials themselves are bad; must not be read as "unreachable"
    Fatal(ServiceError),
}

/// Classify a GetCallerIdentity result.
pub fn classify_probe(region: &str, result: Result<CallerIdentity, ServiceError>) -> ProbeOutcome {
    match result {
        Ok(identity) => ProbeOutcome::Accessible(identity),
        Err(err) if err.is_fatal() => ProbeOutcome::Fatal(err),
        Err(err) => {
            debug!(region = %region, error = %err, "Unable to access region");
            ProbeOutcome::Unreachable { code: err.code }
        }
    }
}

/// Probe one region with a minimal identity call.
pub async fn probe_region<P: IdentityProbe>(probe: &P, region: &str) -> ProbeOutcome {
    classify_probe(region, probe.get_caller_identity(region).await)
}
