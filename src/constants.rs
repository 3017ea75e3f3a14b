/// Column and label constants shared across the cleaning stages.
/// Header names are the canonical (normalized) forms.

// Canonical column names
pub const TRANSACTION_ID: &str = "transaction_id";
pub const ITEM: &str = "item";
pub const QUANTITY: &str = "quantity";
pub const PRICE_PER_UNIT: &str = "price_per_unit";
pub const TOTAL_SPENT: &str = "total_spent";
pub const PAYMENT_METHOD: &str = "payment_method";
pub const LOCATION: &str = "location";
pub const TRANSACTION_DATE: &str = "transaction_date";

/// Columns the loader refuses to run without
pub const REQUIRED_COLUMNS: [&str; 7] = [
    ITEM,
    QUANTITY,
    PRICE_PER_UNIT,
    TOTAL_SPENT,
    PAYMENT_METHOD,
    LOCATION,
    TRANSACTION_DATE,
];

/// Label for a missing or unrecoverable categorical value
pub const SENTINEL: &str = "Unknown";

/// Literal values collapsed into the sentinel after title-casing
pub const ERROR_TOKENS: [&str; 4] = ["Error", "ERROR", "Unknown", "unknown"];

/// Cell contents read as null at load time
pub const NULL_TOKENS: [&str; 19] = [
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>",
    "#N/A", "#N/A N/A", "#NA", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

/// Accepted transaction date layouts, tried in order
pub const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
pub const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

// Defaults
pub const DEFAULT_INPUT_PATH: &str = "dirty_cafe_sales.csv";
pub const DEFAULT_CSV_FILE: &str = "cafe_sales_clean.csv";
pub const DEFAULT_XLSX_FILE: &str = "cafe_sales_final.xlsx";
pub const SUMMARY_JSON_FILE: &str = "cleaning_summary.json";
pub const DEFAULT_TOLERANCE: f64 = 0.01;
pub const DEFAULT_MISMATCH_SAMPLE: usize = 5;
pub const DEFAULT_TOP_ITEMS: usize = 5;
pub const DEFAULT_PREVIEW_ROWS: usize = 10;
pub const AUDIT_HEAD_ROWS: usize = 5;

/// Normalize a raw header to snake case ("Price Per Unit" -> "price_per_unit")
pub fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim()
        .chars()
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect::<String>()
        .to_lowercase()
}

/// Whether a raw cell should be treated as missing
pub fn is_null_token(cell: &str) -> bool {
    NULL_TOKENS.contains(&cell.trim())
}
