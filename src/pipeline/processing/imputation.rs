//! Deductive imputation of unknown items.
//!
//! When every known sale at a given price is the same item, an `Unknown`
//! item sold at that price must be that item. Prices shared by two or more
//! distinct known items are left out of the lookup entirely, so an ambiguous
//! price never produces an assignment.
//!
//! Prices are keyed in whole cents so that values such as `3.0` and
//! `2.9999999999` land on the same key.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};
use tracing::{info, instrument};

use crate::types::Transaction;

/// A price expressed in integer cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PriceKey(i64);

impl PriceKey {
    pub fn from_price(price: f64) -> Self {
        Self((price * 100.0).round() as i64)
    }

    pub fn cents(&self) -> i64 {
        self.0
    }
}

/// Read-only lookup from an unambiguous price to the single item sold at it
#[derive(Debug, Clone, Default)]
pub struct PriceItemMap {
    entries: HashMap<PriceKey, String>,
    ambiguous_prices: usize,
}

impl PriceItemMap {
    /// Build the lookup from every record whose item is known
    pub fn build(records: &[Transaction]) -> Self {
        let mut observed: HashMap<PriceKey, BTreeSet<&str>> = HashMap::new();
        for record in records.iter().filter(|r| !r.has_unknown_item()) {
            observed
                .entry(PriceKey::from_price(record.price_per_unit))
                .or_default()
                .insert(record.item.as_str());
        }

        let mut ambiguous_prices = 0;
        let mut entries = HashMap::with_capacity(observed.len());
        for (price, items) in observed {
            if items.len() == 1 {
                if let Some(item) = items.into_iter().next() {
                    entries.insert(price, item.to_string());
                }
            } else {
                ambiguous_prices += 1;
            }
        }

        Self {
            entries,
            ambiguous_prices,
        }
    }

    pub fn get(&self, price: f64) -> Option<&str> {
        self.entries.get(&PriceKey::from_price(price)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ambiguous_prices(&self) -> usize {
        self.ambiguous_prices
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImputationReport {
    pub unknown_before: usize,
    pub unknown_after: usize,
    pub recovered: usize,
    pub mapped_prices: usize,
    pub ambiguous_prices: usize,
}

/// Replace an unknown item with the mapped item for its price, if any.
/// Only the item field is ever changed.
pub fn fill_unknown_item(record: Transaction, map: &PriceItemMap) -> Transaction {
    if !record.has_unknown_item() {
        return record;
    }
    match map.get(record.price_per_unit) {
        Some(item) => Transaction {
            item: item.to_string(),
            ..record
        },
        None => record,
    }
}

/// Apply the lookup to every record
#[instrument(skip(records, map), fields(count = records.len(), mapped_prices = map.len()))]
pub fn impute_items(
    records: Vec<Transaction>,
    map: &PriceItemMap,
) -> (Vec<Transaction>, ImputationReport) {
    let unknown_before = count_unknown(&records);
    let imputed: Vec<Transaction> = records
        .into_iter()
        .map(|record| fill_unknown_item(record, map))
        .collect();
    let unknown_after = count_unknown(&imputed);

    let report = ImputationReport {
        unknown_before,
        unknown_after,
        recovered: unknown_before - unknown_after,
        mapped_prices: map.len(),
        ambiguous_prices: map.ambiguous_prices(),
    };

    info!(
        "Unknown items: {} before, {} after ({} recovered)",
        report.unknown_before, report.unknown_after, report.recovered
    );
    crate::metrics::cleaning::imputation(report.unknown_before, report.recovered);
    (imputed, report)
}

/// Build the lookup from `records` and immediately apply it
pub fn deductive_imputation(records: Vec<Transaction>) -> (Vec<Transaction>, ImputationReport) {
    let map = PriceItemMap::build(&records);
    impute_items(records, &map)
}

fn count_unknown(records: &[Transaction]) -> usize {
    records.iter().filter(|r| r.has_unknown_item()).count()
}
