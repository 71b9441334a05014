//! Flattening raw catalogue entries into [`Offer`]s
//!
//! A raw entry nests prices as
//! `terms -> term type -> offer term -> priceDimensions -> dimension -> pricePerUnit -> currency`.
//! Neither the number of offer terms nor of dimensions is fixed, so every
//! level is walked in sorted key order. When a term type carries more than
//! one priced dimension, the last one walked wins and the extras are logged.

use super::offer::Offer;
use remora_common::RegionMap;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

const UNKNOWN_SKU: &str = "<unknown>";

/// Why one catalogue entry could not be normalized
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// The entry's location has no short code in the region map
    #[error("{sku}: catalogue location '{location}' is not a known region")]
    UnknownCatalogueRegion { location: String, sku: String },

    /// A term type has no dimension priced in the requested currency
    #[error("{sku}: no {term_type} price in {currency}")]
    IncompleteTermData {
        term_type: String,
        currency: String,
        sku: String,
    },

    /// The entry is not shaped like a catalogue entry
    #[error("{sku}: malformed catalogue entry: {reason}")]
    MalformedEntry { sku: String, reason: String },
}

struct PricedDimension<'a> {
    price: f64,
    unit: &'a str,
    description: &'a str,
}

fn sorted(map: &Map<String, Value>) -> Vec<(&String, &Value)> {
    let mut entries: Vec<_> = map.iter().collect();
    entries.sort_by(|a, b| a.0.cmp(b.0));
    entries
}

fn parse_price(raw: &Value) -> Option<f64> {
    let price = match raw {
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    price.is_finite().then_some(price)
}

/// Normalize one entry as returned by the Pricing API (a JSON string).
pub fn normalize(raw: &str, currency: &str, regions: &RegionMap) -> Result<Offer, NormalizeError> {
    let entry: Value = serde_json::from_str(raw).map_err(|e| NormalizeError::MalformedEntry {
        sku: UNKNOWN_SKU.to_string(),
        reason: format!("not valid JSON: {e}"),
    })?;
    normalize_value(&entry, currency, regions)
}

/// Normalize one already-parsed entry.
pub fn normalize_value(
    entry: &Value,
    currency: &str,
    regions: &RegionMap,
) -> Result<Offer, NormalizeError> {
    let product = &entry["product"];
    let sku = product["sku"].as_str().unwrap_or(UNKNOWN_SKU).to_string();
    let malformed = |reason: &str| NormalizeError::MalformedEntry {
        sku: sku.clone(),
        reason: reason.to_string(),
    };

    let attributes: BTreeMap<String, String> = product["attributes"]
        .as_object()
        .ok_or_else(|| malformed("product.attributes is not an object"))?
        .iter()
        .map(|(k, v)| {
            let value = v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string());
            (k.clone(), value)
        })
        .collect();

    let location = attributes
        .get("location")
        .ok_or_else(|| malformed("product has no location attribute"))?;
    let region = regions
        .short_code(location)
        .ok_or_else(|| NormalizeError::UnknownCatalogueRegion {
            location: location.clone(),
            sku: sku.clone(),
        })?
        .to_string();

    let terms = entry
        .get("terms")
        .and_then(Value::as_object)
        .ok_or_else(|| malformed("terms is missing or not an object"))?;
    if terms.is_empty() {
        warn!(sku = %sku, "Entry has no term types, offer carries no prices");
    }

    let mut prices = BTreeMap::new();
    let mut last_priced: Option<PricedDimension<'_>> = None;

    for (term_type, offer_terms) in sorted(terms) {
        let mut priced = Vec::new();

        match offer_terms.as_object() {
            Some(offer_terms) => {
                for (offer_term, term) in sorted(offer_terms) {
                    let Some(dimensions) = term.get("priceDimensions").and_then(Value::as_object)
                    else {
                        warn!(sku = %sku, term_type = %term_type, offer_term = %offer_term, "Offer term has no priceDimensions, skipping");
                        continue;
                    };
                    for (dimension, dim) in sorted(dimensions) {
                        let Some(per_unit) = dim.get("pricePerUnit").and_then(Value::as_object)
                        else {
                            warn!(sku = %sku, term_type = %term_type, dimension = %dimension, "Price dimension has no pricePerUnit, skipping");
                            continue;
                        };
                        let Some(raw_price) = per_unit.get(currency) else {
                            debug!(sku = %sku, dimension = %dimension, currency, "Dimension not priced in currency");
                            continue;
                        };
                        let price = parse_price(raw_price).ok_or_else(|| {
                            malformed(&format!("{term_type} price {raw_price} is not a number"))
                        })?;
                        priced.push(PricedDimension {
                            price,
                            unit: dim["unit"].as_str().unwrap_or_default(),
                            description: dim["description"].as_str().unwrap_or_default(),
                        });
                    }
                }
            }
            None => {
                warn!(sku = %sku, term_type = %term_type, "Term type is not an object, skipping");
            }
        }

        if priced.len() > 1 {
            warn!(
                sku = %sku,
                term_type = %term_type,
                dimensions = priced.len(),
                "Multiple priced dimensions for one term type, keeping the last"
            );
        }
        let Some(chosen) = priced.pop() else {
            return Err(NormalizeError::IncompleteTermData {
                term_type: term_type.clone(),
                currency: currency.to_string(),
                sku: sku.clone(),
            });
        };
        prices.insert(term_type.clone(), chosen.price);
        last_priced = Some(chosen);
    }

    let (unit, description) = last_priced
        .map(|d| (d.unit.to_string(), d.description.to_string()))
        .unwrap_or_default();

    Ok(Offer {
        service_code: entry["serviceCode"].as_str().unwrap_or_default().to_string(),
        product_family: product["productFamily"]
            .as_str()
            .unwrap_or_default()
            .to_string(),
        sku,
        region,
        unit,
        description,
        currency: currency.to_string(),
        attributes,
        prices,
        terms: Value::Object(terms.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use remora_test_utils::EntryBuilder;
    use serde_json::json;

    fn regions() -> RegionMap {
        [
            ("us-west-2", "US West (Oregon)"),
            ("eu-west-1", "Europe (Ireland)"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    #[test]
    fn test_m5_large_on_demand() {
        let raw = EntryBuilder::ec2("SKU1", "m5.large", "US West (Oregon)")
            .on_demand("Hrs", "0.096")
            .to_json();

        let offer = normalize(&raw, "USD", &regions()).unwrap();
        assert_eq!(offer.prices().len(), 1);
        assert_eq!(offer.price("OnDemand"), Some(0.096));
        assert_eq!(offer.region(), "us-west-2");
        assert_eq!(offer.unit(), "Hrs");
        assert_eq!(offer.sku(), "SKU1");
        assert_eq!(offer.service_code(), "AmazonEC2");
        assert_eq!(offer.product_family(), "Compute Instance");
        assert_eq!(offer.currency(), "USD");
        assert_eq!(offer.attribute("instanceType"), Some("m5.large"));
        assert_eq!(offer.description(), "0.096 USD per Hrs");
    }

    #[test]
    fn test_empty_terms_yield_unpriced_offer() {
        let raw = EntryBuilder::ec2("BARE", "m5.large", "US West (Oregon)").to_json();

        let offer = normalize(&raw, "USD", &regions()).unwrap();
        assert!(offer.prices().is_empty());
        assert_eq!(offer.price("OnDemand"), None);
        assert_eq!(offer.unit(), "");
        assert_eq!(offer.description(), "");
        assert_eq!(offer.region(), "us-west-2");
    }

    #[test]
    fn test_one_price_per_term_type() {
        let raw = EntryBuilder::ec2("S", "t3.micro", "Europe (Ireland)")
            .on_demand("Hrs", "0.0114")
            .dimension("Reserved", "1YR", "HRS", "Hrs", "USD", "0.0071")
            .to_json();

        let offer = normalize(&raw, "USD", &regions()).unwrap();
        assert_eq!(offer.price("OnDemand"), Some(0.0114));
        assert_eq!(offer.price("Reserved"), Some(0.0071));
        // "Reserved" sorts after "OnDemand"
        assert_eq!(offer.description(), "0.0071 USD per Hrs");
    }

    #[test]
    fn test_last_priced_dimension_wins() {
        let raw = EntryBuilder::ec2("S", "m5.large", "US West (Oregon)")
            .dimension("Reserved", "T1", "A", "Quantity", "USD", "500")
            .dimension("Reserved", "T1", "B", "Hrs", "USD", "0.02")
            .to_json();

        let offer = normalize(&raw, "USD", &regions()).unwrap();
        assert_eq!(offer.price("Reserved"), Some(0.02));
        assert_eq!(offer.unit(), "Hrs");
    }

    #[test]
    fn test_missing_currency_is_incomplete() {
        let raw = EntryBuilder::ec2("S", "m5.large", "US West (Oregon)")
            .dimension("OnDemand", "T", "D", "Hrs", "CNY", "0.5")
            .to_json();

        assert_eq!(
            normalize(&raw, "USD", &regions()).unwrap_err(),
            NormalizeError::IncompleteTermData {
                term_type: "OnDemand".into(),
                currency: "USD".into(),
                sku: "S".into(),
            }
        );
    }

    #[test]
    fn test_other_currency_dimension_is_ignored() {
        let raw = EntryBuilder::ec2("S", "m5.large", "US West (Oregon)")
            .dimension("OnDemand", "T", "A", "Hrs", "USD", "0.1")
            .dimension("OnDemand", "T", "B", "Hrs", "CNY", "0.7")
            .to_json();

        let offer = normalize(&raw, "USD", &regions()).unwrap();
        assert_eq!(offer.price("OnDemand"), Some(0.1));
    }

    #[test]
    fn test_structural_drift_is_skipped() {
        let raw = EntryBuilder::ec2("S", "m5.large", "US West (Oregon)")
            .on_demand("Hrs", "0.096")
            .raw_term(
                "Reserved",
                json!({
                    "S.A": { "priceDimensions": "gone" },
                    "S.B": { "priceDimensions": { "S.B.1": { "unit": "Hrs" } } },
                    "S.C": { "priceDimensions": { "S.C.1": { "unit": "Hrs", "pricePerUnit": { "USD": "0.05" } } } }
                }),
            )
            .to_json();

        let offer = normalize(&raw, "USD", &regions()).unwrap();
        assert_eq!(offer.price("Reserved"), Some(0.05));
    }

    #[test]
    fn test_drift_leaving_no_price_is_incomplete() {
        let raw = EntryBuilder::ec2("S", "m5.large", "US West (Oregon)")
            .raw_term("OnDemand", json!("not an object"))
            .to_json();

        assert!(matches!(
            normalize(&raw, "USD", &regions()),
            Err(NormalizeError::IncompleteTermData { .. })
        ));
    }

    #[test]
    fn test_unparsable_price() {
        let raw = EntryBuilder::ec2("S", "m5.large", "US West (Oregon)")
            .on_demand("Hrs", "free")
            .to_json();

        assert!(matches!(
            normalize(&raw, "USD", &regions()),
            Err(NormalizeError::MalformedEntry { ref sku, .. }) if sku == "S"
        ));

        let raw = EntryBuilder::ec2("S", "m5.large", "US West (Oregon)")
            .on_demand("Hrs", "NaN")
            .to_json();
        assert!(matches!(
            normalize(&raw, "USD", &regions()),
            Err(NormalizeError::MalformedEntry { .. })
        ));
    }

    #[test]
    fn test_unknown_location() {
        let raw = EntryBuilder::ec2("S", "m5.large", "Moon (Tranquility)")
            .on_demand("Hrs", "1")
            .to_json();

        assert_eq!(
            normalize(&raw, "USD", &regions()).unwrap_err(),
            NormalizeError::UnknownCatalogueRegion {
                location: "Moon (Tranquility)".into(),
                sku: "S".into(),
            }
        );
    }

    #[test]
    fn test_missing_location_is_malformed() {
        let raw = EntryBuilder::ec2("S", "m5.large", "US West (Oregon)")
            .without_attribute("location")
            .on_demand("Hrs", "1")
            .to_json();

        assert!(matches!(
            normalize(&raw, "USD", &regions()),
            Err(NormalizeError::MalformedEntry { .. })
        ));
    }

    #[test]
    fn test_invalid_json() {
        let err = normalize("{not json", "USD", &regions()).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedEntry { ref sku, .. } if sku == UNKNOWN_SKU));
    }

    #[test]
    fn test_raw_terms_are_kept() {
        let entry = EntryBuilder::ebs("V", "gp3", "Europe (Ireland)")
            .on_demand("GB-Mo", "0.088")
            .build();

        let offer = normalize_value(&entry, "USD", &regions()).unwrap();
        assert_eq!(offer.terms(), &entry["terms"]);
        assert_eq!(offer.product_family(), "Storage");
        assert_eq!(offer.region(), "eu-west-1");
    }
}
