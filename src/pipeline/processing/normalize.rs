use serde::Serialize;
use tracing::{debug, instrument};

use crate::constants::{ERROR_TOKENS, SENTINEL};
use crate::types::Transaction;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationStats {
    /// Labels that were changed by title-casing or token remapping
    pub labels_changed: usize,
    /// Error markers folded into the sentinel
    pub error_tokens_remapped: usize,
}

/// Title-case text: a letter following a letter is lower-cased, any other
/// letter is upper-cased ("credit card" -> "Credit Card", "in-store" -> "In-Store").
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_letter = false;
    for c in text.chars() {
        if prev_is_letter {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_is_letter = c.is_alphabetic();
    }
    out
}

/// Title-case a label and collapse error markers into the sentinel
pub fn normalize_label(text: &str) -> String {
    let titled = title_case(text);
    if ERROR_TOKENS.contains(&titled.as_str()) {
        SENTINEL.to_string()
    } else {
        titled
    }
}

fn normalize_field(value: String, stats: &mut NormalizationStats) -> String {
    let normalized = normalize_label(&value);
    if normalized != value {
        stats.labels_changed += 1;
    }
    if normalized == SENTINEL && title_case(&value) != SENTINEL {
        stats.error_tokens_remapped += 1;
    }
    normalized
}

/// Normalize item, payment method and location on every record
#[instrument(skip(records), fields(count = records.len()))]
pub fn normalize_text(records: Vec<Transaction>) -> (Vec<Transaction>, NormalizationStats) {
    let mut stats = NormalizationStats::default();
    let normalized = records
        .into_iter()
        .map(|record| Transaction {
            item: normalize_field(record.item, &mut stats),
            payment_method: normalize_field(record.payment_method, &mut stats),
            location: normalize_field(record.location, &mut stats),
            ..record
        })
        .collect();

    debug!(
        "Text normalization changed {} labels ({} error markers)",
        stats.labels_changed, stats.error_tokens_remapped
    );
    (normalized, stats)
}
