use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanerError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Excel export failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Date {date} cannot be written to a spreadsheet")]
    DateOutOfRange { date: chrono::NaiveDate },

    #[error("Input error: {message}")]
    Input { message: String },
}

pub type Result<T> = std::result::Result<T, CleanerError>;
