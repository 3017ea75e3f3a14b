pub mod csv_export_adapter;
pub mod xlsx_export_adapter;

pub use csv_export_adapter::CsvExportAdapter;
pub use xlsx_export_adapter::XlsxExportAdapter;
