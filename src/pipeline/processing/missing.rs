use serde::Serialize;
use tracing::{info, instrument};

use crate::constants::SENTINEL;
use crate::types::{CoercedTransaction, Transaction};

/// What the resolver filled and dropped.
///
/// `missing_*` counts are per field, so a row lacking two critical fields
/// contributes to both while `dropped_rows` counts it once.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MissingValueStats {
    pub filled_item: usize,
    pub filled_payment_method: usize,
    pub filled_location: usize,
    pub missing_quantity: usize,
    pub missing_price_per_unit: usize,
    pub missing_total_spent: usize,
    pub missing_transaction_date: usize,
    pub dropped_rows: usize,
    pub retained_rows: usize,
}

fn fill_categorical(value: Option<String>, counter: &mut usize) -> String {
    value.unwrap_or_else(|| {
        *counter += 1;
        SENTINEL.to_string()
    })
}

/// Fill categorical gaps with the sentinel and drop rows missing any
/// quantity, price, total or date.
#[instrument(skip(records), fields(count = records.len()))]
pub fn resolve_missing(records: Vec<CoercedTransaction>) -> (Vec<Transaction>, MissingValueStats) {
    let mut stats = MissingValueStats::default();
    let mut retained = Vec::with_capacity(records.len());

    for record in records {
        let item = fill_categorical(record.item, &mut stats.filled_item);
        let payment_method = fill_categorical(record.payment_method, &mut stats.filled_payment_method);
        let location = fill_categorical(record.location, &mut stats.filled_location);

        stats.missing_quantity += record.quantity.is_none() as usize;
        stats.missing_price_per_unit += record.price_per_unit.is_none() as usize;
        stats.missing_total_spent += record.total_spent.is_none() as usize;
        stats.missing_transaction_date += record.transaction_date.is_none() as usize;

        match (
            record.quantity,
            record.price_per_unit,
            record.total_spent,
            record.transaction_date,
        ) {
            (Some(quantity), Some(price_per_unit), Some(total_spent), Some(transaction_date)) => {
                retained.push(Transaction {
                    transaction_id: record.transaction_id,
                    item,
                    quantity,
                    price_per_unit,
                    total_spent,
                    payment_method,
                    location,
                    transaction_date,
                });
            }
            _ => stats.dropped_rows += 1,
        }
    }

    stats.retained_rows = retained.len();
    info!(
        "Dropped {} rows with missing critical fields; {} rows remain",
        stats.dropped_rows, stats.retained_rows
    );
    crate::metrics::cleaning::rows_dropped(stats.dropped_rows);
    crate::metrics::cleaning::rows_retained(stats.retained_rows);

    (retained, stats)
}
