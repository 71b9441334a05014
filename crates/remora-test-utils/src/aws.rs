//! AWS test utilities
//!
//! Provides region and profile detection for AWS integration tests.

/// Get the AWS region for tests.
///
/// Checks environment variables in order:
/// 1. AWS_REGION
/// 2. AWS_DEFAULT_REGION
/// 3. Falls back to us-east-1 (where the pricing endpoint lives)
///
/// # Example
///
/// ```
/// use remora_test_utils::aws::get_test_region;
///
/// let region = get_test_region();
/// assert!(!region.is_empty());
/// ```
pub fn get_test_region() -> String {
    std::env::var("AWS_REGION")
        .or_else(|_| std::env::var("AWS_DEFAULT_REGION"))
        .unwrap_or_else(|_| "us-east-1".to_string())
}

/// Get the AWS profile for tests, if one is configured.
pub fn get_test_profile() -> Option<String> {
    std::env::var("AWS_PROFILE").ok().filter(|p| !p.is_empty())
}

/// Profiles to probe in profile-discovery tests.
///
/// Reads a comma-separated list from `REMORA_TEST_PROFILES`, falling back to
/// the single configured test profile.
pub fn get_test_profiles() -> Vec<String> {
    match std::env::var("REMORA_TEST_PROFILES") {
        Ok(list) => list
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Err(_) => get_test_profile().into_iter().collect(),
    }
}
