//! Normalized catalogue offer

use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// One priced line item for a resource in a region.
///
/// Built only by the normalizer and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Offer {
    pub(crate) sku: String,
    pub(crate) service_code: String,
    pub(crate) product_family: String,
    pub(crate) region: String,
    pub(crate) unit: String,
    pub(crate) description: String,
    pub(crate) currency: String,
    pub(crate) attributes: BTreeMap<String, String>,
    /// Term type -> unit price
    pub(crate) prices: BTreeMap<String, f64>,
    /// The catalogue's nested `terms` object, untouched
    pub(crate) terms: Value,
}

impl Offer {
    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn service_code(&self) -> &str {
        &self.service_code
    }

    pub fn product_family(&self) -> &str {
        &self.product_family
    }

    /// Region short code.
    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn prices(&self) -> &BTreeMap<String, f64> {
        &self.prices
    }

    /// Unit price for a term type (`OnDemand`, `Reserved`, ...).
    pub fn price(&self, term_type: &str) -> Option<f64> {
        self.prices.get(term_type).copied()
    }

    pub fn terms(&self) -> &Value {
        &self.terms
    }
}
