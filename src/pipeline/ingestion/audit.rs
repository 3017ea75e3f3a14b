//! Initial inspection of the raw table before any cleaning.

use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

use super::loader::RawTable;

/// Missing-cell count for one column
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// Snapshot of the raw input's shape and quality
#[derive(Debug, Clone, Serialize)]
pub struct AuditReport {
    pub row_count: usize,
    pub column_count: usize,
    pub missing_by_column: Vec<ColumnMissing>,
    /// Rows identical to an earlier row in every cell
    pub duplicate_rows: usize,
    #[serde(skip)]
    pub headers: Vec<String>,
    #[serde(skip)]
    pub head: Vec<Vec<Option<String>>>,
}

impl AuditReport {
    pub fn total_missing(&self) -> usize {
        self.missing_by_column.iter().map(|c| c.missing).sum()
    }
}

pub fn audit(table: &RawTable, head_rows: usize) -> AuditReport {
    let missing_by_column = table
        .headers
        .iter()
        .enumerate()
        .map(|(col, name)| ColumnMissing {
            column: name.clone(),
            missing: table.rows.iter().filter(|row| row[col].is_none()).count(),
        })
        .collect();

    let mut seen: HashSet<&Vec<Option<String>>> = HashSet::with_capacity(table.rows.len());
    let duplicate_rows = table.rows.iter().filter(|row| !seen.insert(*row)).count();
    crate::metrics::ingestion::duplicates_found(duplicate_rows);

    AuditReport {
        row_count: table.row_count(),
        column_count: table.column_count(),
        missing_by_column,
        duplicate_rows,
        headers: table.headers.clone(),
        head: table.rows.iter().take(head_rows).cloned().collect(),
    }
}

impl fmt::Display for AuditReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Rows: {}  Columns: {}", self.row_count, self.column_count)?;
        writeln!(f, "\nHead:")?;
        writeln!(f, "   {}", self.headers.join(" | "))?;
        for row in &self.head {
            let cells: Vec<&str> = row.iter().map(|c| c.as_deref().unwrap_or("NaN")).collect();
            writeln!(f, "   {}", cells.join(" | "))?;
        }
        writeln!(f, "\nMissing values:")?;
        for column in &self.missing_by_column {
            writeln!(f, "   {:<20} {}", column.column, column.missing)?;
        }
        write!(f, "\nDuplicate rows: {}", self.duplicate_rows)
    }
}
