use chrono::Datelike;
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::app::ports::{ExportLayout, ExportPort};
use crate::constants;
use crate::error::{CleanerError, Result};
use crate::types::Transaction;

const SHEET_NAME: &str = "cafe_sales";

/// Writes the cleaned table to a single-sheet Excel workbook.
///
/// Numbers are stored as numeric cells and dates as real Excel dates, which
/// keeps decimal handling intact in spreadsheet and BI tools.
pub struct XlsxExportAdapter {
    path: PathBuf,
}

impl XlsxExportAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportPort for XlsxExportAdapter {
    fn format(&self) -> &'static str {
        "xlsx"
    }

    fn export(&self, records: &[Transaction], layout: ExportLayout) -> Result<PathBuf> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let header_format = Format::new().set_bold();
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let columns = layout.columns();

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(SHEET_NAME)?;

        for (col, name) in columns.iter().enumerate() {
            worksheet.write_string_with_format(0, col as u16, *name, &header_format)?;
        }

        for (i, record) in records.iter().enumerate() {
            let row = (i + 1) as u32;
            for (col, name) in columns.iter().enumerate() {
                let col = col as u16;
                match *name {
                    constants::TRANSACTION_ID => {
                        if let Some(id) = &record.transaction_id {
                            worksheet.write_string(row, col, id.as_str())?;
                        }
                    }
                    constants::ITEM => {
                        worksheet.write_string(row, col, record.item.as_str())?;
                    }
                    constants::QUANTITY => {
                        worksheet.write_number(row, col, record.quantity)?;
                    }
                    constants::PRICE_PER_UNIT => {
                        worksheet.write_number(row, col, record.price_per_unit)?;
                    }
                    constants::TOTAL_SPENT => {
                        worksheet.write_number(row, col, record.total_spent)?;
                    }
                    constants::PAYMENT_METHOD => {
                        worksheet.write_string(row, col, record.payment_method.as_str())?;
                    }
                    constants::LOCATION => {
                        worksheet.write_string(row, col, record.location.as_str())?;
                    }
                    constants::TRANSACTION_DATE => {
                        let date = record.transaction_date;
                        let year = u16::try_from(date.year())
                            .map_err(|_| CleanerError::DateOutOfRange { date })?;
                        let excel_date =
                            ExcelDateTime::from_ymd(year, date.month() as u8, date.day() as u8)
                                .map_err(|_| CleanerError::DateOutOfRange { date })?;
                        worksheet.write_datetime_with_format(row, col, &excel_date, &date_format)?;
                    }
                    _ => {}
                }
            }
        }

        workbook.save(&self.path)?;
        info!("Wrote {} rows to {}", records.len(), self.path.display());
        Ok(self.path.clone())
    }
}
