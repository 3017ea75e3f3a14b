use csv::WriterBuilder;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::ports::{ExportLayout, ExportPort};
use crate::error::Result;
use crate::types::Transaction;

/// Writes the cleaned table as a header-first CSV with no index column
pub struct CsvExportAdapter {
    path: PathBuf,
}

impl CsvExportAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Floats keep a decimal point even when integral ("2" -> "2.0")
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

fn to_row(record: &Transaction, layout: ExportLayout) -> Vec<String> {
    let mut row = Vec::with_capacity(8);
    if layout.include_transaction_id {
        row.push(record.transaction_id.clone().unwrap_or_default());
    }
    row.push(record.item.clone());
    row.push(format_number(record.quantity));
    row.push(format_number(record.price_per_unit));
    row.push(format_number(record.total_spent));
    row.push(record.payment_method.clone());
    row.push(record.location.clone());
    row.push(record.transaction_date.format("%Y-%m-%d").to_string());
    row
}

impl ExportPort for CsvExportAdapter {
    fn format(&self) -> &'static str {
        "csv"
    }

    fn export(&self, records: &[Transaction], layout: ExportLayout) -> Result<PathBuf> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let mut writer = WriterBuilder::new().has_headers(false).from_path(&self.path)?;
        writer.write_record(layout.columns())?;
        for record in records {
            writer.write_record(to_row(record, layout))?;
        }
        writer.flush()?;

        info!("Wrote {} rows to {}", records.len(), self.path.display());
        Ok(self.path.clone())
    }
}
