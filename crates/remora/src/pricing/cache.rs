//! Read-through cache of normalized offers
//!
//! Offers are stored per `(region, attribute value)` leaf. A leaf is filled
//! from one complete catalogue listing or not at all; once filled it is
//! served without touching the catalogue again for the life of the cache.
//! Concurrent callers on the same cold leaf wait on a single fetch.

use super::filter::filter;
use super::normalizer::normalize;
use super::offer::Offer;
use crate::aws::{AttributeSource, CatalogueQuery, CatalogueSource, ParameterSource};
use crate::error::PricingError;
use crate::pages::drain_pages;
use crate::regions::RegionNameTranslator;
use remora_common::{RegionMap, ResourceKind};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

type Leaf = Arc<OnceCell<Arc<[Offer]>>>;

/// Offer store for one resource kind.
pub struct OfferCache<S, P> {
    kind: ResourceKind,
    currency: String,
    source: Arc<S>,
    translator: Arc<RegionNameTranslator<P>>,
    leaves: Mutex<HashMap<(String, String), Leaf>>,
    keys: OnceCell<Vec<String>>,
}

impl<S, P> OfferCache<S, P>
where
    S: CatalogueSource + AttributeSource,
    P: ParameterSource,
{
    pub fn new(
        kind: ResourceKind,
        currency: &str,
        source: Arc<S>,
        translator: Arc<RegionNameTranslator<P>>,
    ) -> Self {
        Self {
            kind,
            currency: currency.to_string(),
            source,
            translator,
            leaves: Mutex::new(HashMap::new()),
            keys: OnceCell::new(),
        }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    /// Offers for `key` (e.g. an instance type) in `region`.
    ///
    /// A region the translator cannot name fails with
    /// [`PricingError::UnknownRegion`] before any catalogue call.
    pub async fn get_offers(&self, region: &str, key: &str) -> Result<Arc<[Offer]>, PricingError> {
        let regions = self.translator.resolve().await?;
        let location = regions
            .long_name(region)
            .ok_or_else(|| PricingError::UnknownRegion {
                region: region.to_string(),
            })?;

        let leaf = self.leaf(region, key);
        let offers = leaf
            .get_or_try_init(|| self.fetch(regions, region, location, key))
            .await?;
        Ok(Arc::clone(offers))
    }

    /// Offers for `key` in `region` matching every constraint.
    pub async fn get_filtered_offers(
        &self,
        region: &str,
        key: &str,
        constraints: &BTreeMap<String, String>,
    ) -> Result<Vec<Offer>, PricingError> {
        let offers = self.get_offers(region, key).await?;
        Ok(filter(&offers, constraints))
    }

    /// Every value of the resource's attribute key, in first-seen order.
    pub async fn available_keys(&self) -> Result<&[String], PricingError> {
        let keys = self
            .keys
            .get_or_try_init(|| async {
                let rk = self.kind.key();
                let values = drain_pages("GetAttributeValues", |token| {
                    self.source
                        .get_attribute_values(rk.service_code, rk.attribute_key, token)
                })
                .await?;

                let mut seen = HashSet::new();
                let keys: Vec<String> = values
                    .into_iter()
                    .filter(|v| seen.insert(v.clone()))
                    .collect();
                debug!(resource = %self.kind, keys = keys.len(), "Listed attribute values");
                Ok::<_, PricingError>(keys)
            })
            .await?;
        Ok(keys.as_slice())
    }

    /// Whether the leaf for `(region, key)` has been filled.
    pub fn is_cached(&self, region: &str, key: &str) -> bool {
        self.leaves
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(region.to_string(), key.to_string()))
            .is_some_and(|leaf| leaf.initialized())
    }

    fn leaf(&self, region: &str, key: &str) -> Leaf {
        let mut leaves = self.leaves.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            leaves
                .entry((region.to_string(), key.to_string()))
                .or_default(),
        )
    }

    async fn fetch(
        &self,
        regions: &RegionMap,
        region: &str,
        location: &str,
        key: &str,
    ) -> Result<Arc<[Offer]>, PricingError> {
        let rk = self.kind.key();
        let query = CatalogueQuery::new(rk.service_code)
            .term_match("productFamily", rk.product_family)
            .term_match(rk.attribute_key, key)
            .term_match("location", location);
        debug!(resource = %self.kind, region, key, location, "Fetching offers from catalogue");

        let entries = drain_pages("GetProducts", |token| self.source.get_products(&query, token)).await?;

        let mut offers = Vec::with_capacity(entries.len());
        let mut failures = Vec::new();
        for entry in &entries {
            match normalize(entry, &self.currency, regions) {
                Ok(offer) => offers.push(offer),
                Err(e) => {
                    warn!(resource = %self.kind, region, key, error = %e, "Failed to normalize catalogue entry");
                    failures.push(e);
                }
            }
        }

        if !failures.is_empty() {
            return Err(PricingError::Normalization {
                resource: self.kind,
                region: region.to_string(),
                key: key.to_string(),
                failures,
            });
        }

        info!(resource = %self.kind, region, key, offers = offers.len(), "Cached offers");
        Ok(offers.into())
    }
}
