use serde::Serialize;
use tracing::{info, instrument};

use crate::constants::{DEFAULT_MISMATCH_SAMPLE, DEFAULT_TOLERANCE};
use crate::types::Transaction;

/// A row whose recorded total disagrees with quantity * price_per_unit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MathMismatch {
    pub transaction_id: Option<String>,
    pub quantity: f64,
    pub price_per_unit: f64,
    pub total_spent: f64,
    pub calculated_total: f64,
    pub difference: f64,
}

/// Outcome of the arithmetic check over a batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MathCheckReport {
    pub checked: usize,
    pub flagged: usize,
    pub tolerance: f64,
    /// The first flagged rows, bounded by the configured sample size
    pub sample: Vec<MathMismatch>,
}

/// Trait for diagnostics that inspect clean records without changing them
pub trait QualityGate {
    fn assess(&self, records: &[Transaction]) -> MathCheckReport;
}

#[derive(Debug, Clone)]
pub struct QualityGateConfig {
    /// Largest accepted absolute difference
    pub tolerance: f64,
    /// How many flagged rows to keep for display
    pub sample_size: usize,
}

impl Default for QualityGateConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            sample_size: DEFAULT_MISMATCH_SAMPLE,
        }
    }
}

/// Recomputes quantity * price_per_unit and compares it with total_spent
pub struct ArithmeticValidator {
    pub config: QualityGateConfig,
}

impl ArithmeticValidator {
    pub fn new() -> Self {
        Self {
            config: QualityGateConfig::default(),
        }
    }

    pub fn with_config(config: QualityGateConfig) -> Self {
        Self { config }
    }

    pub fn check_record(&self, record: &Transaction) -> Option<MathMismatch> {
        let calculated_total = record.calculated_total();
        let difference = (record.total_spent - calculated_total).abs();
        if difference > self.config.tolerance {
            Some(MathMismatch {
                transaction_id: record.transaction_id.clone(),
                quantity: record.quantity,
                price_per_unit: record.price_per_unit,
                total_spent: record.total_spent,
                calculated_total,
                difference,
            })
        } else {
            None
        }
    }
}

impl Default for ArithmeticValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl QualityGate for ArithmeticValidator {
    #[instrument(skip(self, records), fields(count = records.len()))]
    fn assess(&self, records: &[Transaction]) -> MathCheckReport {
        let mut report = MathCheckReport {
            checked: records.len(),
            tolerance: self.config.tolerance,
            ..Default::default()
        };

        for mismatch in records.iter().filter_map(|r| self.check_record(r)) {
            report.flagged += 1;
            if report.sample.len() < self.config.sample_size {
                report.sample.push(mismatch);
            }
        }

        info!("Arithmetic check flagged {} of {} rows", report.flagged, report.checked);
        crate::metrics::cleaning::math_mismatches(report.flagged);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(quantity: f64, price: f64, total: f64) -> Transaction {
        Transaction {
            transaction_id: Some("TXN".to_string()),
            item: "Coffee".to_string(),
            quantity,
            price_per_unit: price,
            total_spent: total,
            payment_method: "Cash".to_string(),
            location: "Takeaway".to_string(),
            transaction_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
        }
    }

    #[test]
    fn test_consistent_row_not_flagged() {
        let validator = ArithmeticValidator::new();
        assert!(validator.check_record(&record(2.0, 3.0, 6.0)).is_none());
    }

    #[test]
    fn test_inconsistent_row_flagged() {
        let validator = ArithmeticValidator::new();
        let mismatch = validator.check_record(&record(2.0, 3.0, 7.0)).unwrap();
        assert_eq!(mismatch.calculated_total, 6.0);
        assert!((mismatch.difference - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_float_noise_within_tolerance() {
        let validator = ArithmeticValidator::new();
        // 3 * 1.1 is 3.3000000000000003 in binary floating point
        assert!(validator.check_record(&record(3.0, 1.1, 3.3)).is_none());
        assert!(validator.check_record(&record(1.0, 1.0, 1.005)).is_none());
    }

    #[test]
    fn test_assess_counts_and_bounds_sample() {
        let validator = ArithmeticValidator::with_config(QualityGateConfig {
            tolerance: 0.01,
            sample_size: 2,
        });
        let records = vec![
            record(2.0, 3.0, 6.0),
            record(2.0, 3.0, 7.0),
            record(1.0, 4.0, 5.0),
            record(5.0, 1.0, 1.0),
        ];

        let report = validator.assess(&records);
        assert_eq!(report.checked, 4);
        assert_eq!(report.flagged, 3);
        assert_eq!(report.sample.len(), 2);
        assert_eq!(report.sample[0].total_spent, 7.0);
    }

    #[test]
    fn test_assess_does_not_modify_records() {
        let records = vec![record(2.0, 3.0, 7.0)];
        let before = records.clone();
        ArithmeticValidator::new().assess(&records);
        assert_eq!(records, before);
    }
}
