//! Region and profile accessibility tests - actually call AWS APIs
//!
//! These tests are marked `#[ignore]` and only run with:
//! ```
//! AWS_PROFILE=your_profile cargo test --test aws_regions_integration -- --ignored
//! ```
//!
//! `REMORA_TEST_PROFILES` (comma-separated) selects the profiles probed by
//! the profile test.

use remora::aws::{
    AwsContext, AwsProfiles, Ec2Client, FromAwsContext, ProfileProbes, SsmClient, StsIdentityProbe,
};
use remora::regions::{RegionAccessResolver, RegionNameTranslator};
use remora_common::endpoints::EndpointTable;
use remora_test_utils::aws::get_test_profiles;
use remora_test_utils::{get_test_profile, get_test_region};

async fn test_context() -> AwsContext {
    AwsContext::with_profile(Some(&get_test_region()), get_test_profile().as_deref()).await
}

/// The test region itself must be reachable with working credentials
#[tokio::test]
#[ignore]
async fn test_accessible_regions_include_test_region() {
    let ctx = test_context().await;
    let candidates = EndpointTable::bundled()
        .unwrap()
        .service_regions("sts", Some("aws"))
        .unwrap();

    let accessible = RegionAccessResolver::default()
        .accessible_regions(&StsIdentityProbe::from_context(&ctx), &candidates)
        .await
        .expect("AWS credentials required - set AWS_PROFILE or AWS_ACCESS_KEY_ID");

    assert!(
        accessible.contains(&get_test_region()),
        "test region should be accessible, got: {accessible:?}"
    );
    assert!(accessible.iter().all(|r| candidates.contains(r)));
}

/// Every enabled EC2 region is known to the bundled table or SSM
#[tokio::test]
#[ignore]
async fn test_enabled_regions_have_long_names() {
    let ctx = test_context().await;
    let ec2 = Ec2Client::from_context(&ctx);
    let enabled = ec2.enabled_regions().await.expect("DescribeRegions failed");
    assert!(!enabled.is_empty());

    let translator = RegionNameTranslator::new(SsmClient::from_context(&ctx), None).unwrap();
    let map = translator.resolve().await.expect("region name resolution failed");
    for region in enabled {
        let long = map.long_name(region).unwrap_or_else(|| panic!("{region} has no long name"));
        assert_eq!(map.short_code(long), Some(region.as_str()));
    }
}

/// Configured test profiles authenticate and keep their order
#[tokio::test]
#[ignore]
async fn test_authenticated_profiles() {
    let profiles = get_test_profiles();
    if profiles.is_empty() {
        eprintln!("No test profiles configured, skipping");
        return;
    }

    let region = get_test_region();
    let kept = RegionAccessResolver::default()
        .authenticated_profiles(&AwsProfiles, Some(profiles.as_slice()), Some(&region))
        .await
        .expect("profile probing failed");

    let expected: Vec<_> = profiles.iter().filter(|p| kept.contains(p)).cloned().collect();
    assert_eq!(kept, expected);
}

/// With no names given, only configured profiles are considered
#[tokio::test]
#[ignore]
async fn test_authenticated_profiles_default_to_configured() {
    let configured = AwsProfiles
        .configured_profiles()
        .await
        .expect("failed to read AWS config files");

    let kept = RegionAccessResolver::default()
        .authenticated_profiles(&AwsProfiles, None, Some(&get_test_region()))
        .await
        .expect("profile probing failed");

    assert!(kept.iter().all(|p| configured.contains(p)));
}
