//! Library error type
//!
//! Expected negative outcomes (a disabled region, an unauthenticated profile)
//! are not errors; they show up as absent set members. Everything here
//! indicates misconfiguration, bad credentials, or a catalogue entry the
//! normalizer cannot read, and carries the context needed to diagnose it.

use crate::aws::error::ServiceError;
use crate::pricing::NormalizeError;
use remora_common::{EndpointError, ResourceKind, UndefinedResourceKey};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PricingError {
    /// Resource-type name not in the registry
    #[error(transparent)]
    UndefinedResourceKey(#[from] UndefinedResourceKey),

    /// Credentials are expired or revoked; never reported as "unreachable"
    #[error(
        "Invalid credentials{} probing region {region}: {source}",
        profile.as_ref().map(|p| format!(" for profile {p}")).unwrap_or_default()
    )]
    InvalidCredentials {
        region: String,
        profile: Option<String>,
        #[source]
        source: ServiceError,
    },

    /// The service has no endpoint in the requested region
    #[error("Service {service} is not available in region {region}")]
    ServiceUnavailableInRegion { service: String, region: String },

    /// Region short code unknown to the region translator
    #[error("Region {region} has no catalogue location name")]
    UnknownRegion { region: String },

    /// One or more entries of a catalogue fetch failed to normalize
    #[error(
        "{} of the {resource} offers for {key} in {region} failed to normalize: {}",
        failures.len(),
        failures.iter().map(|f| f.to_string()).collect::<Vec<_>>().join("; ")
    )]
    Normalization {
        resource: ResourceKind,
        region: String,
        key: String,
        failures: Vec<NormalizeError>,
    },

    /// A paginated listing was interrupted; nothing from it was kept
    #[error("{operation} failed after {pages_read} page(s): {source}")]
    Pagination {
        operation: &'static str,
        pages_read: usize,
        #[source]
        source: ServiceError,
    },

    /// A single (non-paginated) service call failed
    #[error("{operation} failed: {source}")]
    Upstream {
        operation: &'static str,
        #[source]
        source: ServiceError,
    },

    /// The shared AWS config or credentials files could not be read
    #[error("Failed to load AWS profile files: {source}")]
    ProfileFiles {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Bundled region data unavailable or partition unknown
    #[error(transparent)]
    Endpoints(#[from] EndpointError),
}

impl PricingError {
    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PricingError::Pagination { .. } | PricingError::Upstream { .. }
        )
    }

    /// Get a user-friendly suggestion for resolving this error, if available.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            PricingError::InvalidCredentials { source, .. }
            | PricingError::Pagination { source, .. }
            | PricingError::Upstream { source, .. } => source.suggestion(),
            PricingError::ServiceUnavailableInRegion { .. } => {
                Some("The pricing endpoint exists only in a few regions; try us-east-1.")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_variants() {
        let source = ServiceError::new(None, "connection reset");
        assert!(
            PricingError::Pagination {
                operation: "GetProducts",
                pages_read: 2,
                source: source.clone(),
            }
            .is_retryable()
        );
        assert!(
            PricingError::Upstream {
                operation: "GetParameters",
                source,
            }
            .is_retryable()
        );
        assert!(!PricingError::UnknownRegion { region: "x".into() }.is_retryable());
    }

    #[test]
    fn test_invalid_credentials_message() {
        let err = PricingError::InvalidCredentials {
            region: "eu-west-1".into(),
            profile: Some("dev".into()),
            source: ServiceError::new(Some("ExpiredToken"), "token expired"),
        };
        assert_eq!(
            err.to_string(),
            "Invalid credentials for profile dev probing region eu-west-1: ExpiredToken: token expired"
        );
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_undefined_resource_key_is_transparent() {
        let err: PricingError = UndefinedResourceKey("RDS".into()).into();
        assert_eq!(err.to_string(), "RDS is not a defined ResourceKey");
    }
}
