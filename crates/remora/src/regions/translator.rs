//! Region short code <-> catalogue long name translation
//!
//! The bundled endpoints table covers the regions known when it was
//! generated. Regions launched since then are discovered from the public SSM
//! parameter hierarchy, and only those missing from the table have their long
//! name looked up.

use crate::aws::ParameterSource;
use crate::error::PricingError;
use crate::pages::drain_pages;
use remora_common::RegionMap;
use remora_common::defaults::{REGION_PARAMETER_PATH, region_long_name_parameter};
use remora_common::endpoints::EndpointTable;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

/// Builds and memoizes the [`RegionMap`] for one pricing session.
pub struct RegionNameTranslator<P> {
    params: P,
    static_table: BTreeMap<String, String>,
    map: OnceCell<RegionMap>,
}

impl<P: ParameterSource> RegionNameTranslator<P> {
    /// Seed from the bundled table for `partition` (`None` for all partitions).
    pub fn new(params: P, partition: Option<&str>) -> Result<Self, PricingError> {
        let static_table = EndpointTable::bundled()?.region_descriptions(partition)?;
        Ok(Self::with_static_table(params, static_table))
    }

    pub fn with_static_table(params: P, static_table: BTreeMap<String, String>) -> Self {
        Self {
            params,
            static_table,
            map: OnceCell::new(),
        }
    }

    /// The merged map, built on first call.
    ///
    /// A failed build leaves nothing cached, so the next call starts over.
    pub async fn resolve(&self) -> Result<&RegionMap, PricingError> {
        self.map.get_or_try_init(|| self.build()).await
    }

    /// Long catalogue name for `short_code`, resolving the map if needed.
    pub async fn long_name(&self, short_code: &str) -> Result<Option<&str>, PricingError> {
        Ok(self.resolve().await?.long_name(short_code))
    }

    /// Short code for a catalogue long name, resolving the map if needed.
    pub async fn short_code(&self, long_name: &str) -> Result<Option<&str>, PricingError> {
        Ok(self.resolve().await?.short_code(long_name))
    }

    async fn build(&self) -> Result<RegionMap, PricingError> {
        let live = drain_pages("GetParametersByPath", |token| {
            self.params.get_parameters_by_path(REGION_PARAMETER_PATH, token)
        })
        .await?;

        let mut forward = self.static_table.clone();
        let missing: BTreeSet<String> = live
            .into_iter()
            .map(|p| p.value)
            .filter(|code| !code.is_empty() && !forward.contains_key(code))
            .collect();

        for code in missing {
            let name = region_long_name_parameter(&code);
            let long_name = self
                .params
                .get_parameter(&name)
                .await
                .map_err(|source| PricingError::Upstream {
                    operation: "GetParameter",
                    source,
                })?;
            match long_name {
                Some(long_name) => {
                    debug!(region = %code, long_name = %long_name, "Added region from parameter store");
                    forward.insert(code, long_name);
                }
                None => warn!(region = %code, "No long name published for region, skipping"),
            }
        }

        info!(
            regions = forward.len(),
            bundled = self.static_table.len(),
            "Resolved region names"
        );
        Ok(RegionMap::new(forward))
    }
}
