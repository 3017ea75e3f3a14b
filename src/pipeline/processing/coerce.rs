use chrono::{Datelike, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::constants::{DATETIME_FORMATS, DATE_FORMATS};
use crate::types::{CoercedTransaction, RawTransaction};

static CURRENCY_NOISE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[$,]").unwrap());

/// Cells that held text but could not be coerced
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CoercionStats {
    pub invalid_quantity: usize,
    pub invalid_price_per_unit: usize,
    pub invalid_total_spent: usize,
    pub invalid_transaction_date: usize,
}

impl CoercionStats {
    pub fn total(&self) -> usize {
        self.invalid_quantity
            + self.invalid_price_per_unit
            + self.invalid_total_spent
            + self.invalid_transaction_date
    }
}

/// Parse a numeric cell, ignoring `$`, `,` and surrounding whitespace.
/// Anything that is not a finite number becomes `None`.
pub fn coerce_numeric(raw: Option<&str>) -> Option<f64> {
    let cleaned = CURRENCY_NOISE.replace_all(raw?, "");
    cleaned.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Years a spreadsheet date cell can hold
const DATE_YEARS: std::ops::RangeInclusive<i32> = 1900..=9999;

/// Parse a date cell using the accepted layouts; time-of-day is discarded
pub fn coerce_date(raw: Option<&str>) -> Option<NaiveDate> {
    let text = raw?.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
                .map(|dt| dt.date())
        })
        .filter(|date| DATE_YEARS.contains(&date.year()))
}

pub fn coerce_record(raw: RawTransaction) -> CoercedTransaction {
    CoercedTransaction {
        quantity: coerce_numeric(raw.quantity.as_deref()),
        price_per_unit: coerce_numeric(raw.price_per_unit.as_deref()),
        total_spent: coerce_numeric(raw.total_spent.as_deref()),
        transaction_date: coerce_date(raw.transaction_date.as_deref()),
        transaction_id: raw.transaction_id,
        item: raw.item,
        payment_method: raw.payment_method,
        location: raw.location,
    }
}

/// Coerce every record, counting cells whose text was discarded
#[instrument(skip(records), fields(count = records.len()))]
pub fn coerce_all(records: Vec<RawTransaction>) -> (Vec<CoercedTransaction>, CoercionStats) {
    let mut stats = CoercionStats::default();

    let coerced = records
        .into_iter()
        .map(|raw| {
            let had_quantity = raw.quantity.is_some();
            let had_price = raw.price_per_unit.is_some();
            let had_total = raw.total_spent.is_some();
            let had_date = raw.transaction_date.is_some();

            let record = coerce_record(raw);

            if had_quantity && record.quantity.is_none() {
                stats.invalid_quantity += 1;
            }
            if had_price && record.price_per_unit.is_none() {
                stats.invalid_price_per_unit += 1;
            }
            if had_total && record.total_spent.is_none() {
                stats.invalid_total_spent += 1;
            }
            if had_date && record.transaction_date.is_none() {
                stats.invalid_transaction_date += 1;
            }
            record
        })
        .collect();

    debug!("Coercion discarded {} cells", stats.total());
    (coerced, stats)
}
