// Pipeline ingestion: reading the export and inspecting it before cleaning

pub mod audit;
pub mod loader;

pub use audit::{audit, AuditReport, ColumnMissing};
pub use loader::{load_csv, read_csv, RawTable};
