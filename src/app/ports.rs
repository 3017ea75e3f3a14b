use std::path::PathBuf;

use crate::constants;
use crate::error::Result;
use crate::types::Transaction;

/// Column layout of an exported table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportLayout {
    /// Emit the transaction_id column (only when the input carried one)
    pub include_transaction_id: bool,
}

impl ExportLayout {
    pub fn columns(&self) -> Vec<&'static str> {
        let mut columns = Vec::with_capacity(8);
        if self.include_transaction_id {
            columns.push(constants::TRANSACTION_ID);
        }
        columns.extend([
            constants::ITEM,
            constants::QUANTITY,
            constants::PRICE_PER_UNIT,
            constants::TOTAL_SPENT,
            constants::PAYMENT_METHOD,
            constants::LOCATION,
            constants::TRANSACTION_DATE,
        ]);
        columns
    }
}

/// Destination for the cleaned table
pub trait ExportPort {
    /// Short format name used in logs ("csv", "xlsx")
    fn format(&self) -> &'static str;

    /// Write every record and return the path written
    fn export(&self, records: &[Transaction], layout: ExportLayout) -> Result<PathBuf>;
}
