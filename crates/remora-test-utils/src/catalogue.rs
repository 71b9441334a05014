//! Builders for raw pricing catalogue entries
//!
//! Produces JSON in the shape returned by the Pricing `GetProducts` API so
//! tests can exercise the normalizer and cache without calling AWS.

use serde_json::{Map, Value, json};

/// Builder for one raw catalogue entry.
///
/// # Example
///
/// ```
/// use remora_test_utils::catalogue::EntryBuilder;
///
/// let entry = EntryBuilder::ec2("SKU1", "m5.large", "US West (Oregon)")
///     .on_demand("Hrs", "0.096")
///     .build();
/// assert_eq!(entry["product"]["attributes"]["instanceType"], "m5.large");
/// ```
#[derive(Debug, Clone)]
pub struct EntryBuilder {
    sku: String,
    service_code: String,
    product_family: String,
    attributes: Map<String, Value>,
    terms: Map<String, Value>,
}

impl EntryBuilder {
    /// Empty entry with the given SKU.
    pub fn new(sku: &str) -> Self {
        Self {
            sku: sku.to_string(),
            service_code: "AmazonEC2".to_string(),
            product_family: "Compute Instance".to_string(),
            attributes: Map::new(),
            terms: Map::new(),
        }
    }

    /// EC2 compute instance entry at a catalogue location.
    pub fn ec2(sku: &str, instance_type: &str, location: &str) -> Self {
        Self::new(sku)
            .attribute("instanceType", instance_type)
            .attribute("location", location)
            .attribute("operatingSystem", "Linux")
            .attribute("tenancy", "Shared")
    }

    /// EBS storage entry at a catalogue location.
    pub fn ebs(sku: &str, volume_type: &str, location: &str) -> Self {
        Self::new(sku)
            .product_family("Storage")
            .attribute("volumeType", volume_type)
            .attribute("location", location)
    }

    pub fn service_code(mut self, code: &str) -> Self {
        self.service_code = code.to_string();
        self
    }

    pub fn product_family(mut self, family: &str) -> Self {
        self.product_family = family.to_string();
        self
    }

    /// Set a product attribute.
    pub fn attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes
            .insert(key.to_string(), Value::String(value.to_string()));
        self
    }

    /// Remove a product attribute.
    pub fn without_attribute(mut self, key: &str) -> Self {
        self.attributes.remove(key);
        self
    }

    /// Add one price dimension under `term_type` / `offer_term` / `dimension`.
    pub fn dimension(
        mut self,
        term_type: &str,
        offer_term: &str,
        dimension: &str,
        unit: &str,
        currency: &str,
        price: &str,
    ) -> Self {
        let offer_term_code = format!("{}.{}", self.sku, offer_term);
        let dimension_code = format!("{offer_term_code}.{dimension}");
        let offer_terms = self
            .terms
            .entry(term_type.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        let term = offer_terms
            .as_object_mut()
            .map(|m| {
                m.entry(offer_term_code.clone()).or_insert_with(|| {
                    json!({
                        "offerTermCode": offer_term,
                        "sku": self.sku,
                        "priceDimensions": {}
                    })
                })
            })
            .and_then(|t| t.get_mut("priceDimensions"))
            .and_then(Value::as_object_mut);
        if let Some(dimensions) = term {
            dimensions.insert(
                dimension_code.clone(),
                json!({
                    "rateCode": dimension_code,
                    "unit": unit,
                    "description": format!("{price} {currency} per {unit}"),
                    "pricePerUnit": { currency: price }
                }),
            );
        }
        self
    }

    /// Add a single OnDemand USD price.
    pub fn on_demand(self, unit: &str, price: &str) -> Self {
        self.dimension("OnDemand", "JRTCKXETXF", "6YS6EN2CT7", unit, "USD", price)
    }

    /// Replace a whole term type with an arbitrary value.
    pub fn raw_term(mut self, term_type: &str, value: Value) -> Self {
        self.terms.insert(term_type.to_string(), value);
        self
    }

    /// Finish as a JSON value.
    pub fn build(self) -> Value {
        json!({
            "product": {
                "productFamily": self.product_family,
                "attributes": self.attributes,
                "sku": self.sku,
            },
            "serviceCode": self.service_code,
            "terms": self.terms,
            "version": "20241201000000",
            "publicationDate": "2024-12-01T00:00:00Z"
        })
    }

    /// Finish as a JSON string, as the Pricing API returns entries.
    pub fn to_json(self) -> String {
        self.build().to_string()
    }
}
