use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::error::{CleanerError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub validation: ValidationConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub csv_file: String,
    pub xlsx_file: String,
    pub write_xlsx: bool,
    pub summary_json: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Largest accepted gap between total_spent and quantity * price_per_unit
    pub tolerance: f64,
    pub mismatch_sample: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub top_items: usize,
    pub preview_rows: usize,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(constants::DEFAULT_INPUT_PATH),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            csv_file: constants::DEFAULT_CSV_FILE.to_string(),
            xlsx_file: constants::DEFAULT_XLSX_FILE.to_string(),
            write_xlsx: true,
            summary_json: false,
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            tolerance: constants::DEFAULT_TOLERANCE,
            mismatch_sample: constants::DEFAULT_MISMATCH_SAMPLE,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_items: constants::DEFAULT_TOP_ITEMS,
            preview_rows: constants::DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            CleanerError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if !self.validation.tolerance.is_finite() || self.validation.tolerance < 0.0 {
            return Err(CleanerError::Config(format!(
                "validation.tolerance must be a non-negative number, got {}",
                self.validation.tolerance
            )));
        }
        if self.output.csv_file.trim().is_empty() {
            return Err(CleanerError::Config("output.csv_file must not be empty".to_string()));
        }
        if self.output.write_xlsx && self.output.xlsx_file.trim().is_empty() {
            return Err(CleanerError::Config("output.xlsx_file must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn csv_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.csv_file)
    }

    pub fn xlsx_path(&self) -> PathBuf {
        self.output.dir.join(&self.output.xlsx_file)
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output.dir.join(constants::SUMMARY_JSON_FILE)
    }
}
