use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::types::Transaction;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemQuantity {
    pub item: String,
    pub quantity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentAverage {
    pub payment_method: String,
    pub average_total_spent: f64,
    pub transactions: usize,
}

/// Headline aggregates over the cleaned table
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SalesSummary {
    pub row_count: usize,
    pub total_revenue: f64,
    pub top_items: Vec<ItemQuantity>,
    pub average_spend_by_payment: Vec<PaymentAverage>,
}

pub fn total_revenue(records: &[Transaction]) -> f64 {
    records.iter().map(|r| r.total_spent).sum()
}

/// Items ranked by summed quantity, highest first. Ties keep the order in
/// which the items first appear in `records`.
pub fn top_items_by_quantity(records: &[Transaction], limit: usize) -> Vec<ItemQuantity> {
    let mut position: HashMap<&str, usize> = HashMap::new();
    let mut totals: Vec<ItemQuantity> = Vec::new();

    for record in records {
        match position.get(record.item.as_str()) {
            Some(&idx) => totals[idx].quantity += record.quantity,
            None => {
                position.insert(record.item.as_str(), totals.len());
                totals.push(ItemQuantity {
                    item: record.item.clone(),
                    quantity: record.quantity,
                });
            }
        }
    }

    // sort_by is stable, which preserves first-seen order among equal totals
    totals.sort_by(|a, b| b.quantity.total_cmp(&a.quantity));
    totals.truncate(limit);
    totals
}

/// Mean total_spent per payment method, ordered by method name
pub fn average_spend_by_payment(records: &[Transaction]) -> Vec<PaymentAverage> {
    let mut groups: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for record in records {
        let entry = groups.entry(record.payment_method.as_str()).or_insert((0.0, 0));
        entry.0 += record.total_spent;
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(method, (sum, count))| PaymentAverage {
            payment_method: method.to_string(),
            average_total_spent: sum / count as f64,
            transactions: count,
        })
        .collect()
}

pub fn summarize(records: &[Transaction], top_n: usize) -> SalesSummary {
    SalesSummary {
        row_count: records.len(),
        total_revenue: total_revenue(records),
        top_items: top_items_by_quantity(records, top_n),
        average_spend_by_payment: average_spend_by_payment(records),
    }
}

/// Format an amount as dollars with thousands separators ("$12,345.60")
pub fn format_currency(amount: f64) -> String {
    let fixed = format!("{:.2}", amount.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

/// Render the first `limit` cleaned rows as an aligned text table
pub fn render_preview(records: &[Transaction], limit: usize) -> String {
    let mut out = format!(
        "{:<12} {:<10} {:>8} {:>8} {:>9} {:<15} {:<10} {:<10}\n",
        "id", "item", "qty", "price", "total", "payment", "location", "date"
    );
    for record in records.iter().take(limit) {
        out.push_str(&format!(
            "{:<12} {:<10} {:>8} {:>8.2} {:>9.2} {:<15} {:<10} {:<10}\n",
            record.transaction_id.as_deref().unwrap_or("-"),
            record.item,
            record.quantity,
            record.price_per_unit,
            record.total_spent,
            record.payment_method,
            record.location,
            record.transaction_date,
        ));
    }
    out
}

impl fmt::Display for SalesSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total Revenue: {}", format_currency(self.total_revenue))?;
        writeln!(f, "\nTop {} Items by Quantity:", self.top_items.len())?;
        for entry in &self.top_items {
            writeln!(f, "   {:<15} {}", entry.item, entry.quantity)?;
        }
        write!(f, "\nAverage Spend by Payment Method:")?;
        for entry in &self.average_spend_by_payment {
            write!(
                f,
                "\n   {:<15} {:>8.2} ({} transactions)",
                entry.payment_method, entry.average_total_spent, entry.transactions
            )?;
        }
        Ok(())
    }
}
