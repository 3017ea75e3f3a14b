use serde::Serialize;
use std::fmt;
use std::fs;
use std::time::Instant;
use tracing::{info, instrument};

use crate::app::ports::{ExportLayout, ExportPort};
use crate::config::Config;
use crate::constants;
use crate::error::Result;
use crate::infra::{CsvExportAdapter, XlsxExportAdapter};
use crate::pipeline::ingestion::{audit, load_csv, AuditReport, RawTable};
use crate::pipeline::processing::{
    coerce_all, impute_items, normalize_text, resolve_missing, ArithmeticValidator,
    CoercionStats, ImputationReport, MathCheckReport, MissingValueStats, NormalizationStats,
    PriceItemMap, QualityGate, QualityGateConfig,
};
use crate::pipeline::report::{self, format_currency, SalesSummary};
use crate::types::Transaction;

/// Everything a run produced: stage figures, aggregates and the clean rows
#[derive(Debug, Serialize)]
pub struct PipelineResult {
    pub input_path: String,
    pub audit: AuditReport,
    pub coercion: CoercionStats,
    pub missing: MissingValueStats,
    pub normalization: NormalizationStats,
    pub math_check: MathCheckReport,
    pub imputation: ImputationReport,
    pub summary: SalesSummary,
    pub output_files: Vec<String>,
    pub duration_secs: f64,
    #[serde(skip)]
    pub records: Vec<Transaction>,
    #[serde(skip)]
    pub layout: ExportLayout,
}

pub struct Pipeline {
    config: Config,
    exporters: Vec<Box<dyn ExportPort>>,
}

impl Pipeline {
    /// Create a pipeline exporting to the CSV (and optionally Excel) paths in `config`
    pub fn new(config: Config) -> Self {
        let mut exporters: Vec<Box<dyn ExportPort>> =
            vec![Box::new(CsvExportAdapter::new(config.csv_path()))];
        if config.output.write_xlsx {
            exporters.push(Box::new(XlsxExportAdapter::new(config.xlsx_path())));
        }
        Self { config, exporters }
    }

    pub fn with_exporters(config: Config, exporters: Vec<Box<dyn ExportPort>>) -> Self {
        Self { config, exporters }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the configured input, clean it, and write every export
    #[instrument(skip(self), fields(input = %self.config.input.path.display()))]
    pub fn run(&self) -> Result<PipelineResult> {
        let t_run = Instant::now();

        // Step 1: Load
        let table = load_csv(&self.config.input.path)?;

        // Steps 2-6: Clean, validate, impute, summarize
        let mut result = self.process_table(table)?;
        result.input_path = self.config.input.path.display().to_string();

        // Step 7: Export
        result.output_files = self.export(&result.records, result.layout)?;

        result.duration_secs = t_run.elapsed().as_secs_f64();
        crate::metrics::run_duration(result.duration_secs);

        if self.config.output.summary_json {
            let summary_file = self.persist_summary(&result)?;
            result.output_files.push(summary_file);
        }

        info!("Pipeline finished in {:.3}s", result.duration_secs);
        Ok(result)
    }

    /// Run every cleaning stage over an already-loaded table. Performs no I/O.
    pub fn process_table(&self, table: RawTable) -> Result<PipelineResult> {
        let audit = audit(&table, constants::AUDIT_HEAD_ROWS);
        let layout = ExportLayout {
            include_transaction_id: table.has_column(constants::TRANSACTION_ID),
        };
        let raw = table.to_transactions()?;
        drop(table);

        let (coerced, coercion) = coerce_all(raw);
        let (resolved, missing) = resolve_missing(coerced);
        let (normalized, normalization) = normalize_text(resolved);

        let validator = ArithmeticValidator::with_config(QualityGateConfig {
            tolerance: self.config.validation.tolerance,
            sample_size: self.config.validation.mismatch_sample,
        });
        let math_check = validator.assess(&normalized);

        let (records, imputation) = {
            let price_map = PriceItemMap::build(&normalized);
            impute_items(normalized, &price_map)
        };

        let summary = report::summarize(&records, self.config.report.top_items);

        Ok(PipelineResult {
            input_path: String::new(),
            audit,
            coercion,
            missing,
            normalization,
            math_check,
            imputation,
            summary,
            output_files: Vec::new(),
            duration_secs: 0.0,
            records,
            layout,
        })
    }

    fn export(&self, records: &[Transaction], layout: ExportLayout) -> Result<Vec<String>> {
        let mut written = Vec::with_capacity(self.exporters.len());
        for exporter in &self.exporters {
            let path = exporter.export(records, layout)?;
            info!(format = exporter.format(), "Saved {}", path.display());
            written.push(path.display().to_string());
        }
        Ok(written)
    }

    /// Persist the run figures as pretty JSON next to the exports
    fn persist_summary(&self, result: &PipelineResult) -> Result<String> {
        fs::create_dir_all(&self.config.output.dir)?;
        let filepath = self.config.summary_path();
        let json_content = serde_json::to_string_pretty(result)?;
        fs::write(&filepath, json_content)?;
        Ok(filepath.display().to_string())
    }
}

impl PipelineResult {
    /// Human-readable report of every stage, in run order
    pub fn render(&self, preview_rows: usize) -> String {
        RunReport {
            result: self,
            preview_rows,
        }
        .to_string()
    }
}

/// Display adapter pairing a result with the number of rows to preview
struct RunReport<'a> {
    result: &'a PipelineResult,
    preview_rows: usize,
}

impl fmt::Display for RunReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.result;

        writeln!(f, "--- 1. INITIAL DATA INSPECTION ---")?;
        writeln!(f, "{}", r.audit)?;

        writeln!(f, "\n--- 2. DATA CLEANING ---")?;
        writeln!(
            f,
            "Unparseable values nulled: quantity {}, price_per_unit {}, total_spent {}, transaction_date {}",
            r.coercion.invalid_quantity,
            r.coercion.invalid_price_per_unit,
            r.coercion.invalid_total_spent,
            r.coercion.invalid_transaction_date
        )?;
        writeln!(
            f,
            "Filled with '{}': item {}, payment_method {}, location {}",
            constants::SENTINEL,
            r.missing.filled_item,
            r.missing.filled_payment_method,
            r.missing.filled_location
        )?;
        writeln!(f, "Rows dropped (missing critical fields): {}", r.missing.dropped_rows)?;
        writeln!(f, "Valid rows after basic cleaning: {}", r.missing.retained_rows)?;

        writeln!(f, "\n--- 3. TEXT HANDLING ---")?;
        writeln!(
            f,
            "Labels standardized: {} ({} error markers -> '{}')",
            r.normalization.labels_changed,
            r.normalization.error_tokens_remapped,
            constants::SENTINEL
        )?;

        writeln!(f, "\n--- 4. VALIDATION & RECOVERY ---")?;
        writeln!(
            f,
            "Math check - transactions off by more than {}: {}",
            r.math_check.tolerance, r.math_check.flagged
        )?;
        for mismatch in &r.math_check.sample {
            writeln!(
                f,
                "   {} qty {} x {} = {} (recorded {})",
                mismatch.transaction_id.as_deref().unwrap_or("-"),
                mismatch.quantity,
                mismatch.price_per_unit,
                format_currency(mismatch.calculated_total),
                format_currency(mismatch.total_spent)
            )?;
        }
        writeln!(f, "Unknown items before: {}", r.imputation.unknown_before)?;
        writeln!(f, "Unknown items after:  {}", r.imputation.unknown_after)?;
        writeln!(f, "Rows recovered: {}", r.imputation.recovered)?;

        writeln!(f, "\n--- 5. FINAL REPORT & EXPORT ---")?;
        writeln!(f, "{}", r.summary)?;
        for file in &r.output_files {
            writeln!(f, "Saved: {}", file)?;
        }
        writeln!(f, "\nSample of final data:")?;
        f.write_str(&report::render_preview(&r.records, self.preview_rows))
    }
}
