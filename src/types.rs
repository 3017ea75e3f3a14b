use chrono::NaiveDate;
use serde::Serialize;

use crate::constants::SENTINEL;

/// One row of the input as text, looked up by canonical column name.
/// `None` means the cell was empty or a recognised null token.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTransaction {
    pub transaction_id: Option<String>,
    pub item: Option<String>,
    pub quantity: Option<String>,
    pub price_per_unit: Option<String>,
    pub total_spent: Option<String>,
    pub payment_method: Option<String>,
    pub location: Option<String>,
    pub transaction_date: Option<String>,
}

/// A row after numeric and date coercion; anything unparseable is `None`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoercedTransaction {
    pub transaction_id: Option<String>,
    pub item: Option<String>,
    pub quantity: Option<f64>,
    pub price_per_unit: Option<f64>,
    pub total_spent: Option<f64>,
    pub payment_method: Option<String>,
    pub location: Option<String>,
    pub transaction_date: Option<NaiveDate>,
}

/// A cleaned transaction. Numeric and date fields are always present and
/// categorical fields hold either a real value or the sentinel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    pub transaction_id: Option<String>,
    pub item: String,
    pub quantity: f64,
    pub price_per_unit: f64,
    pub total_spent: f64,
    pub payment_method: String,
    pub location: String,
    pub transaction_date: NaiveDate,
}

impl Transaction {
    pub fn has_unknown_item(&self) -> bool {
        self.item == SENTINEL
    }

    pub fn calculated_total(&self) -> f64 {
        self.quantity * self.price_per_unit
    }
}
