use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

use crate::constants::{self, normalize_header, is_null_token};
use crate::error::{CleanerError, Result};
use crate::types::RawTransaction;

/// The input file held in memory: canonical headers plus rows of optional
/// cell text. Rows always have exactly `headers.len()` cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RawTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Fail with the first required column the table lacks
    pub fn require_columns(&self) -> Result<()> {
        for column in constants::REQUIRED_COLUMNS {
            if !self.has_column(column) {
                return Err(CleanerError::MissingColumn(column.to_string()));
            }
        }
        Ok(())
    }

    /// Convert rows into records keyed by canonical column name
    pub fn to_transactions(&self) -> Result<Vec<RawTransaction>> {
        self.require_columns()?;

        let idx = |name: &str| self.column_index(name);
        let id_col = idx(constants::TRANSACTION_ID);
        let item_col = idx(constants::ITEM);
        let quantity_col = idx(constants::QUANTITY);
        let price_col = idx(constants::PRICE_PER_UNIT);
        let total_col = idx(constants::TOTAL_SPENT);
        let payment_col = idx(constants::PAYMENT_METHOD);
        let location_col = idx(constants::LOCATION);
        let date_col = idx(constants::TRANSACTION_DATE);

        let cell = |row: &[Option<String>], col: Option<usize>| -> Option<String> {
            col.and_then(|c| row.get(c).cloned().flatten())
        };

        Ok(self
            .rows
            .iter()
            .map(|row| {
                let row = row.as_slice();
                RawTransaction {
                    transaction_id: cell(row, id_col),
                    item: cell(row, item_col),
                    quantity: cell(row, quantity_col),
                    price_per_unit: cell(row, price_col),
                    total_spent: cell(row, total_col),
                    payment_method: cell(row, payment_col),
                    location: cell(row, location_col),
                    transaction_date: cell(row, date_col),
                }
            })
            .collect())
    }
}

/// Load a CSV file from disk
#[instrument]
pub fn load_csv(path: &Path) -> Result<RawTable> {
    let file = File::open(path).map_err(|e| CleanerError::Input {
        message: format!("cannot open '{}': {}", path.display(), e),
    })?;
    let table = read_csv(file)?;
    info!(
        rows = table.row_count(),
        columns = table.column_count(),
        "Loaded {}",
        path.display()
    );
    Ok(table)
}

/// Read CSV data from any reader, normalizing headers and null tokens
pub fn read_csv<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
    if headers.iter().all(|h| h.is_empty()) {
        return Err(CleanerError::Input {
            message: "input has no header row".to_string(),
        });
    }
    debug!("Normalized headers: {:?}", headers);

    let width = headers.len();
    let mut rows = Vec::new();
    let mut ragged = 0usize;

    for result in rdr.records() {
        let record = result?;
        if record.len() != width {
            ragged += 1;
        }
        let mut row: Vec<Option<String>> = record
            .iter()
            .take(width)
            .map(|cell| {
                if is_null_token(cell) {
                    None
                } else {
                    Some(cell.to_string())
                }
            })
            .collect();
        row.resize(width, None);
        rows.push(row);
    }

    if ragged > 0 {
        warn!("{} rows had a field count different from the header; padded or truncated", ragged);
    }

    crate::metrics::ingestion::rows_loaded(rows.len());
    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
Transaction ID,Item,Quantity,Price Per Unit,Total Spent,Payment Method,Location,Transaction Date
TXN_1,Coffee,2,2.0,4.0,Credit Card,Takeaway,2023-09-08
TXN_2,,ERROR,1.5,,UNKNOWN,,2023-05-16
";

    #[test]
    fn test_read_csv_normalizes_headers() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            table.headers,
            vec![
                "transaction_id",
                "item",
                "quantity",
                "price_per_unit",
                "total_spent",
                "payment_method",
                "location",
                "transaction_date"
            ]
        );
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_empty_cells_become_none() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        let row = &table.rows[1];
        assert_eq!(row[1], None);
        assert_eq!(row[2].as_deref(), Some("ERROR"));
        assert_eq!(row[4], None);
        assert_eq!(row[5].as_deref(), Some("UNKNOWN"));
    }

    #[test]
    fn test_to_transactions_maps_columns() {
        let table = read_csv(SAMPLE.as_bytes()).unwrap();
        let records = table.to_transactions().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].transaction_id.as_deref(), Some("TXN_1"));
        assert_eq!(records[0].item.as_deref(), Some("Coffee"));
        assert_eq!(records[0].payment_method.as_deref(), Some("Credit Card"));
        assert_eq!(records[1].location, None);
    }

    #[test]
    fn test_missing_required_column() {
        let data = "Item,Quantity\nCoffee,1\n";
        let table = read_csv(data.as_bytes()).unwrap();
        match table.to_transactions() {
            Err(CleanerError::MissingColumn(col)) => assert_eq!(col, "price_per_unit"),
            other => panic!("expected missing column error, got {:?}", other),
        }
    }

    #[test]
    fn test_transaction_id_is_optional() {
        let data = "Item,Quantity,Price Per Unit,Total Spent,Payment Method,Location,Transaction Date\n\
                    Tea,1,1.5,1.5,Cash,In-store,2023-01-01\n";
        let table = read_csv(data.as_bytes()).unwrap();
        let records = table.to_transactions().unwrap();
        assert_eq!(records[0].transaction_id, None);
        assert_eq!(records[0].item.as_deref(), Some("Tea"));
    }

    #[test]
    fn test_short_rows_are_padded() {
        let data = "Item,Quantity,Price Per Unit\nCake,1\n";
        let table = read_csv(data.as_bytes()).unwrap();
        assert_eq!(table.rows[0], vec![Some("Cake".to_string()), Some("1".to_string()), None]);
    }

    #[test]
    fn test_load_missing_file_is_fatal() {
        let result = load_csv(Path::new("/no/such/dirty_cafe_sales.csv"));
        assert!(matches!(result, Err(CleanerError::Input { .. })));
    }
}
