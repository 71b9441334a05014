//! AWS error classification
//!
//! Service failures cross the capability traits as a [`ServiceError`] carrying
//! the AWS error code (from `ProvideErrorMetadata::code()`) and a message.
//! [`classify_code`] sorts codes into the categories the probing and retry
//! logic cares about.

use aws_sdk_sts::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// A failed AWS service call, reduced to its error code and message.
///
/// `code` is `None` for failures that never reached the service
/// (DNS, connection refused, timeouts).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", self.describe())]
pub struct ServiceError {
    pub code: Option<String>,
    pub message: String,
}

/// Error categories for probing and retry logic
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The credentials themselves are expired or revoked
    InvalidCredentials,
    /// Region disabled or not opted in for this account
    RegionUnavailable,
    /// Rate limit exceeded (retryable with backoff)
    Throttled,
    /// No service response at all (network failure)
    Transport,
    /// Anything else
    Other,
}

/// Codes meaning the credentials are bad everywhere, not just in one region
const INVALID_CREDENTIAL_CODES: &[&str] = &[
    "ExpiredToken",
    "ExpiredTokenException",
    "RequestExpired",
    "TokenRefreshRequired",
];

/// Codes returned by STS/EC2 for regions the account cannot use
const REGION_UNAVAILABLE_CODES: &[&str] = &[
    "OptInRequired",
    "InvalidClientTokenId",
    "AuthFailure",
    "UnrecognizedClientException",
];

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &[
    "Throttling",
    "ThrottlingException",
    "RequestLimitExceeded",
    "TooManyRequestsException",
];

/// Classify an AWS error code.
pub fn classify_code(code: Option<&str>) -> ErrorClass {
    match code {
        None => ErrorClass::Transport,
        Some(c) if INVALID_CREDENTIAL_CODES.contains(&c) => ErrorClass::InvalidCredentials,
        Some(c) if REGION_UNAVAILABLE_CODES.contains(&c) => ErrorClass::RegionUnavailable,
        Some(c) if THROTTLING_CODES.contains(&c) => ErrorClass::Throttled,
        Some(_) => ErrorClass::Other,
    }
}

impl ServiceError {
    pub fn new(code: Option<&str>, message: impl Into<String>) -> Self {
        Self {
            code: code.map(str::to_string),
            message: message.into(),
        }
    }

    /// Reduce an SDK error to its code and message.
    pub fn from_sdk<E, R>(err: &SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + 'static,
        R: std::fmt::Debug,
    {
        let message = match err.message() {
            Some(m) => m.to_string(),
            None => DisplayErrorContext(err).to_string(),
        };
        Self {
            code: err.code().map(str::to_string),
            message,
        }
    }

    pub fn class(&self) -> ErrorClass {
        classify_code(self.code.as_deref())
    }

    pub fn is_throttled(&self) -> bool {
        self.class() == ErrorClass::Throttled
    }

    /// Whether the credentials are unusable in every region.
    pub fn is_fatal(&self) -> bool {
        self.class() == ErrorClass::InvalidCredentials
    }

    /// Get a user-friendly suggestion for resolving this error, if available.
    pub fn suggestion(&self) -> Option<&'static str> {
        suggestion_for_code(self.code.as_deref()?)
    }

    fn describe(&self) -> String {
        match &self.code {
            Some(code) => format!("{code}: {}", self.message),
            None => self.message.clone(),
        }
    }
}

/// Error code to user-friendly suggestion mapping
const SUGGESTIONS: &[(&str, &str)] = &[
    (
        "ExpiredToken",
        "Refresh your credentials (e.g. `aws sso login`) and retry.",
    ),
    (
        "ExpiredTokenException",
        "Refresh your credentials (e.g. `aws sso login`) and retry.",
    ),
    (
        "RequestExpired",
        "Check the system clock; request signatures are only valid for a few minutes.",
    ),
    (
        "OptInRequired",
        "Enable the region for this account in the AWS account settings.",
    ),
    (
        "InvalidClientTokenId",
        "The region may be disabled for this account, or the access key is unknown.",
    ),
    (
        "Throttling",
        "AWS API rate limit hit. The operation will be retried automatically.",
    ),
    (
        "ThrottlingException",
        "AWS API rate limit hit. The operation will be retried automatically.",
    ),
];

fn suggestion_for_code(code: &str) -> Option<&'static str> {
    SUGGESTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, s)| *s)
}
