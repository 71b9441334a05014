//! Post-hoc filtering and tabulation of cached offers

use super::offer::Offer;
use std::collections::BTreeMap;

/// Offers whose attributes equal every constraint.
///
/// Fails closed: no constraints selects nothing, and an offer without
/// attributes never matches.
pub fn filter(offers: &[Offer], constraints: &BTreeMap<String, String>) -> Vec<Offer> {
    if constraints.is_empty() {
        return Vec::new();
    }
    offers
        .iter()
        .filter(|offer| {
            !offer.attributes.is_empty()
                && constraints
                    .iter()
                    .all(|(k, v)| offer.attributes.get(k) == Some(v))
        })
        .cloned()
        .collect()
}

/// Region -> attribute value -> price for one term type.
///
/// Offers without `attribute_key` or without a `term_type` price are left out.
/// When two offers share region and attribute value, the later one wins.
pub fn prices_by_key(
    offers: &[Offer],
    attribute_key: &str,
    term_type: &str,
) -> BTreeMap<String, BTreeMap<String, f64>> {
    let mut table: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();
    for offer in offers {
        let (Some(key), Some(price)) = (offer.attribute(attribute_key), offer.price(term_type))
        else {
            continue;
        };
        table
            .entry(offer.region.clone())
            .or_default()
            .insert(key.to_string(), price);
    }
    table
}
