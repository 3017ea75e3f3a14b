use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};

use cafe_sales_cleaner::config::Config;
use cafe_sales_cleaner::logging;
use cafe_sales_cleaner::pipeline::Pipeline;

#[derive(Parser)]
#[command(name = "cafe_sales_cleaner")]
#[command(about = "Clean, validate and export café point-of-sale transactions")]
#[command(version = "0.1.0")]
struct Cli {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Input CSV (overrides input.path)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory for cleaned outputs (overrides output.dir)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Skip the Excel export
    #[arg(long)]
    no_xlsx: bool,

    /// Also write cleaning_summary.json
    #[arg(long)]
    summary_json: bool,

    /// Directory for rotating log files
    #[arg(long, default_value = "logs")]
    log_dir: PathBuf,
}

fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };

    if let Some(input) = &cli.input {
        config.input.path = input.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.dir = dir.clone();
    }
    if cli.no_xlsx {
        config.output.write_xlsx = false;
    }
    if cli.summary_json {
        config.output.summary_json = true;
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let _log_guard = logging::init_logging(&cli.log_dir);

    let config = build_config(&cli)?;
    let preview_rows = config.report.preview_rows;
    info!("Cleaning {}", config.input.path.display());

    let pipeline = Pipeline::new(config);
    let result = match pipeline.run() {
        Ok(result) => result,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return Err(e).with_context(|| {
                format!("cleaning {}", pipeline.config().input.path.display())
            });
        }
    };

    println!("{}", result.render(preview_rows));
    Ok(())
}
