//! Bundled, versioned region reference data
//!
//! `data/endpoints.json` ships with the crate and lists, per AWS partition,
//! every region code with its human-readable description, plus the regions
//! in which services with restricted availability (e.g. `pricing`) are
//! offered. Services not listed are assumed to be offered in every region
//! of the partition.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;

const BUNDLED_JSON: &str = include_str!("../data/endpoints.json");

static BUNDLED: LazyLock<Result<EndpointTable, String>> =
    LazyLock::new(|| EndpointTable::from_json(BUNDLED_JSON).map_err(|e| e.to_string()));

/// Errors reading the endpoint table
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    /// The bundled data file failed to parse
    #[error("Bundled endpoints data is invalid: {0}")]
    InvalidBundle(String),

    /// Partition name not present in the table
    #[error("Unknown partition '{0}'")]
    UnknownPartition(String),
}

#[derive(Debug, Clone, Deserialize)]
struct RegionEntry {
    description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct Partition {
    partition: String,
    regions: BTreeMap<String, RegionEntry>,
    #[serde(default)]
    services: BTreeMap<String, Vec<String>>,
}

/// Static region table grouped by partition.
#[derive(Debug, Clone, Deserialize)]
pub struct EndpointTable {
    version: String,
    partitions: Vec<Partition>,
}

impl EndpointTable {
    /// Parse a table from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The table bundled with this crate.
    pub fn bundled() -> Result<&'static EndpointTable, EndpointError> {
        BUNDLED
            .as_ref()
            .map_err(|e| EndpointError::InvalidBundle(e.clone()))
    }

    /// Version string of the data.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Names of all partitions in table order.
    pub fn partitions(&self) -> impl Iterator<Item = &str> {
        self.partitions.iter().map(|p| p.partition.as_str())
    }

    fn selected(&self, partition: Option<&str>) -> Result<Vec<&Partition>, EndpointError> {
        match partition {
            None => Ok(self.partitions.iter().collect()),
            Some(name) => self
                .partitions
                .iter()
                .find(|p| p.partition == name)
                .map(|p| vec![p])
                .ok_or_else(|| EndpointError::UnknownPartition(name.to_string())),
        }
    }

    /// Region code -> description for one partition, or all partitions.
    ///
    /// When several partitions list the same code, the first one wins.
    pub fn region_descriptions(
        &self,
        partition: Option<&str>,
    ) -> Result<BTreeMap<String, String>, EndpointError> {
        let mut out = BTreeMap::new();
        for p in self.selected(partition)? {
            for (code, entry) in &p.regions {
                out.entry(code.clone())
                    .or_insert_with(|| entry.description.clone());
            }
        }
        Ok(out)
    }

    /// Regions in which `service` is offered.
    pub fn service_regions(
        &self,
        service: &str,
        partition: Option<&str>,
    ) -> Result<Vec<String>, EndpointError> {
        let mut out = Vec::new();
        for p in self.selected(partition)? {
            match p.services.get(service) {
                Some(regions) => out.extend(regions.iter().cloned()),
                None => out.extend(p.regions.keys().cloned()),
            }
        }
        out.sort();
        out.dedup();
        Ok(out)
    }

    /// Whether `service` is offered in `region`.
    pub fn is_service_available(&self, service: &str, region: &str) -> bool {
        self.partitions.iter().any(|p| match p.services.get(service) {
            Some(regions) => regions.iter().any(|r| r == region),
            None => p.regions.contains_key(region),
        })
    }

    /// Partition that contains `region`.
    pub fn partition_of(&self, region: &str) -> Option<&str> {
        self.partitions
            .iter()
            .find(|p| p.regions.contains_key(region))
            .map(|p| p.partition.as_str())
    }
}
