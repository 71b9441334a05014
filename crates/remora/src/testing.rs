//! In-memory fakes of the AWS capability traits for unit tests.
//!
//! Paginated fakes hand out page indexes as continuation tokens and count
//! every call so tests can assert how often "upstream" was hit.

use crate::aws::{
    AccountId, AttributeSource, CallerIdentity, CatalogueQuery, CatalogueSource, IdentityProbe,
    Page, Parameter, ParameterSource, ProfileProbe, ProfileProbes, ServiceError,
};
use crate::error::PricingError;
use remora_common::defaults::REGION_PARAMETER_PATH;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

fn page_index(token: Option<String>) -> usize {
    token.and_then(|t| t.parse().ok()).unwrap_or(0)
}

fn paged<T: Clone>(pages: &[Vec<T>], idx: usize) -> Page<T> {
    Page {
        items: pages.get(idx).cloned().unwrap_or_default(),
        next_token: (idx + 1 < pages.len()).then(|| (idx + 1).to_string()),
    }
}

/// Identity probe answering per region from a fixed table.
///
/// Regions not in the table fail without an error code, like a network
/// failure would.
#[derive(Clone, Default)]
pub struct FakeIdentity {
    outcomes: HashMap<String, Result<CallerIdentity, ServiceError>>,
    calls: Arc<AtomicUsize>,
}

impl FakeIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accessible(mut self, region: &str) -> Self {
        self.outcomes.insert(
            region.to_string(),
            Ok(CallerIdentity {
                account: AccountId::new("123456789012"),
                arn: "arn:aws:iam::123456789012:user/tester".to_string(),
            }),
        );
        self
    }

    pub fn failing(mut self, region: &str, code: &str) -> Self {
        self.outcomes.insert(
            region.to_string(),
            Err(ServiceError::new(Some(code), format!("{code} in {region}"))),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl IdentityProbe for FakeIdentity {
    async fn get_caller_identity(&self, region: &str) -> Result<CallerIdentity, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        self.outcomes
            .get(region)
            .cloned()
            .unwrap_or_else(|| Err(ServiceError::new(None, "dispatch failure")))
    }
}

/// Named profiles, each with an optional default region and its own probe.
#[derive(Default)]
pub struct FakeProfiles {
    profiles: HashMap<String, (Option<String>, FakeIdentity)>,
    unreadable: bool,
    connected: Mutex<Vec<String>>,
}

impl FakeProfiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn profile(mut self, name: &str, default_region: Option<&str>, probe: FakeIdentity) -> Self {
        self.profiles
            .insert(name.to_string(), (default_region.map(str::to_string), probe));
        self
    }

    /// Fail to list configured profiles, as if the config files were corrupt.
    pub fn unreadable(mut self) -> Self {
        self.unreadable = true;
        self
    }

    /// Profiles a probe was built for, sorted.
    pub fn connected(&self) -> Vec<String> {
        let mut names = self.connected.lock().unwrap().clone();
        names.sort();
        names
    }
}

impl ProfileProbes for FakeProfiles {
    type Probe = FakeIdentity;

    async fn configured_profiles(&self) -> Result<Vec<String>, PricingError> {
        if self.unreadable {
            return Err(PricingError::ProfileFiles {
                source: "unexpected section header".into(),
            });
        }
        let mut names: Vec<String> = self.profiles.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    async fn connect(&self, profile: &str, region: Option<&str>) -> ProfileProbe<FakeIdentity> {
        self.connected.lock().unwrap().push(profile.to_string());
        let (default_region, probe) = self
            .profiles
            .get(profile)
            .cloned()
            .unwrap_or_else(|| (None, FakeIdentity::new()));
        ProfileProbe {
            profile: profile.to_string(),
            probe,
            region: region.map(str::to_string).or(default_region),
        }
    }
}

/// Parameter store with a paged region listing and long-name parameters.
#[derive(Default)]
pub struct FakeParameters {
    pages: Vec<Vec<Parameter>>,
    long_names: HashMap<String, String>,
    fail_page: Mutex<Option<usize>>,
    fail_lookup: Mutex<Option<String>>,
    path_calls: AtomicUsize,
    lookups: Mutex<Vec<String>>,
}

impl FakeParameters {
    /// Region codes split into pages of `page_size`.
    pub fn with_regions(codes: &[&str], page_size: usize) -> Self {
        let pages = codes
            .chunks(page_size.max(1))
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|code| Parameter {
                        name: format!("{REGION_PARAMETER_PATH}/{code}"),
                        value: code.to_string(),
                    })
                    .collect()
            })
            .collect();
        Self {
            pages,
            ..Self::default()
        }
    }

    pub fn long_name(mut self, code: &str, name: &str) -> Self {
        self.long_names.insert(
            remora_common::defaults::region_long_name_parameter(code),
            name.to_string(),
        );
        self
    }

    /// Fail the listing once when page `idx` is requested.
    pub fn fail_once_at(self, idx: usize) -> Self {
        *self.fail_page.lock().unwrap() = Some(idx);
        self
    }

    /// Fail the first lookup of `code`'s long name, once.
    pub fn fail_lookup_once(self, code: &str) -> Self {
        *self.fail_lookup.lock().unwrap() =
            Some(remora_common::defaults::region_long_name_parameter(code));
        self
    }

    pub fn path_calls(&self) -> usize {
        self.path_calls.load(Ordering::SeqCst)
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

impl ParameterSource for FakeParameters {
    async fn get_parameters_by_path(
        &self,
        _path: &str,
        next_token: Option<String>,
    ) -> Result<Page<Parameter>, ServiceError> {
        self.path_calls.fetch_add(1, Ordering::SeqCst);
        let idx = page_index(next_token);
        {
            let mut fail = self.fail_page.lock().unwrap();
            if *fail == Some(idx) {
                *fail = None;
                return Err(ServiceError::new(Some("InternalServerError"), "page lost"));
            }
        }
        Ok(paged(&self.pages, idx))
    }

    async fn get_parameter(&self, name: &str) -> Result<Option<String>, ServiceError> {
        self.lookups.lock().unwrap().push(name.to_string());
        {
            let mut fail = self.fail_lookup.lock().unwrap();
            if fail.as_deref() == Some(name) {
                *fail = None;
                return Err(ServiceError::new(Some("ThrottlingException"), "rate exceeded"));
            }
        }
        Ok(self.long_names.get(name).cloned())
    }
}

/// Matching catalogue entries per GetProducts page.
const PRODUCT_PAGE_SIZE: usize = 2;

/// Pricing catalogue answering queries by matching filters against entries.
///
/// Each query's matches are paged two at a time.
pub struct FakeCatalogue {
    entries: Vec<String>,
    attribute_pages: Vec<Vec<String>>,
    delay: Option<Duration>,
    fail_page: Mutex<Option<usize>>,
    product_calls: AtomicUsize,
    attribute_calls: AtomicUsize,
    queries: Mutex<Vec<CatalogueQuery>>,
}

impl FakeCatalogue {
    pub fn new(entries: Vec<String>) -> Self {
        Self {
            entries,
            attribute_pages: Vec::new(),
            delay: None,
            fail_page: Mutex::new(None),
            product_calls: AtomicUsize::new(0),
            attribute_calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn attribute_pages(mut self, pages: Vec<Vec<&str>>) -> Self {
        self.attribute_pages = pages
            .into_iter()
            .map(|p| p.into_iter().map(str::to_string).collect())
            .collect();
        self
    }

    /// Sleep before answering each page, to interleave concurrent callers.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Fail the next request for product page `idx`, once.
    pub fn fail_once_at(&self, idx: usize) {
        *self.fail_page.lock().unwrap() = Some(idx);
    }

    /// Number of GetProducts page requests.
    pub fn product_calls(&self) -> usize {
        self.product_calls.load(Ordering::SeqCst)
    }

    pub fn attribute_calls(&self) -> usize {
        self.attribute_calls.load(Ordering::SeqCst)
    }

    /// Queries that started a listing (first-page requests).
    pub fn queries(&self) -> Vec<CatalogueQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn matches(entry: &serde_json::Value, query: &CatalogueQuery) -> bool {
        let product = &entry["product"];
        entry["serviceCode"] == query.service_code.as_str()
            && query.filters.iter().all(|f| {
                let actual = if f.field == "productFamily" {
                    &product["productFamily"]
                } else {
                    &product["attributes"][&f.field]
                };
                actual == f.value.as_str()
            })
    }
}

impl CatalogueSource for FakeCatalogue {
    async fn get_products(
        &self,
        query: &CatalogueQuery,
        next_token: Option<String>,
    ) -> Result<Page<String>, ServiceError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.product_calls.fetch_add(1, Ordering::SeqCst);
        if next_token.is_none() {
            self.queries.lock().unwrap().push(query.clone());
        }
        let idx = page_index(next_token);
        {
            let mut fail = self.fail_page.lock().unwrap();
            if *fail == Some(idx) {
                *fail = None;
                return Err(ServiceError::new(None, "connection reset by peer"));
            }
        }

        let matching: Vec<String> = self
            .entries
            .iter()
            .filter(|raw| {
                serde_json::from_str::<serde_json::Value>(raw)
                    .map(|v| Self::matches(&v, query))
                    .unwrap_or(true)
            })
            .cloned()
            .collect();
        let pages: Vec<Vec<String>> = matching
            .chunks(PRODUCT_PAGE_SIZE)
            .map(<[String]>::to_vec)
            .collect();
        Ok(paged(&pages, idx))
    }
}

impl AttributeSource for FakeCatalogue {
    async fn get_attribute_values(
        &self,
        _service_code: &str,
        _attribute_name: &str,
        next_token: Option<String>,
    ) -> Result<Page<String>, ServiceError> {
        self.attribute_calls.fetch_add(1, Ordering::SeqCst);
        Ok(paged(&self.attribute_pages, page_index(next_token)))
    }
}
