//! CLI entry point for the powerlifting percentile generator.
//!
//! Downloads the OpenPowerlifting export, buckets every entry by sex, weight
//! class and age bracket, and writes the percentile lookup table as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use powerlifting_percentiles::{
    analyzers::analyzer::analyze,
    archive::load_csv,
    config::{BucketConfig, OPL_URL},
    fetch::load_source,
    output::{Summary, gzip_path, s3, write_gzip, write_table},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "powerlifting_percentiles")]
#[command(about = "Generate percentile lookup tables from OpenPowerlifting data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the dataset and write the percentile table
    Generate {
        /// URL or local path of the zip archive (a local .csv is also accepted)
        #[arg(short, long, default_value = OPL_URL)]
        source: String,

        /// JSON file to write the table to
        #[arg(short, long, default_value = "Resources/powerlifting_percentiles.json")]
        output: PathBuf,

        /// Optional JSON file overriding weight classes, age brackets and thresholds
        #[arg(short, long)]
        config: Option<String>,

        /// Write compact JSON instead of indented
        #[arg(long, default_value_t = false)]
        compact: bool,

        /// Also write a gzip-compressed copy next to the output
        #[arg(long, default_value_t = false)]
        gzip: bool,

        /// Optional: S3 bucket to upload the table to (e.g., "my-bucket")
        #[arg(long)]
        s3_bucket: Option<String>,

        /// Object key used with --s3-bucket
        #[arg(long, default_value = "powerlifting_percentiles.json")]
        s3_key: String,
    },
    /// Print the weight-class summary of an existing table
    Summary {
        /// Path to a generated table
        #[arg(value_name = "TABLE")]
        table: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/powerlifting_percentiles.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("powerlifting_percentiles.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            source,
            output,
            config,
            compact,
            gzip,
            s3_bucket,
            s3_key,
        } => {
            let config = match config {
                Some(path) => BucketConfig::load(&path)?,
                None => BucketConfig::default(),
            };

            generate(&source, &output, &config, !compact, gzip).await?;

            if let Some(bucket) = s3_bucket {
                let table = std::fs::read(&output)
                    .with_context(|| format!("reading '{}'", output.display()))?;
                s3::publish(&bucket, &s3_key, table).await?;
            } else {
                info!("S3 bucket not specified, skipping upload");
            }
        }
        Commands::Summary { table } => {
            let content = std::fs::read_to_string(&table)
                .with_context(|| format!("reading '{}'", table.display()))?;
            let value: serde_json::Value = serde_json::from_str(&content)
                .with_context(|| format!("parsing '{}'", table.display()))?;
            Summary::from_json(&value)?.log();
        }
    }

    Ok(())
}

/// Runs the full pipeline: load source, extract CSV, aggregate, write.
#[tracing::instrument(skip(config, output), fields(output = %output.display()))]
async fn generate(
    source: &str,
    output: &Path,
    config: &BucketConfig,
    pretty: bool,
    gzip: bool,
) -> Result<()> {
    let bytes = match load_source(source).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "Error downloading data");
            error!(url = OPL_URL, "You can manually download the archive and pass it with --source");
            return Err(e);
        }
    };

    let payload = load_csv(source, &bytes)?;
    drop(bytes);
    info!(file = %payload.name, bytes = payload.data.len(), "Processing CSV");

    let (table, _stats) = analyze(payload.data.as_slice(), config)?;

    let written = write_table(output, &table, pretty)?;
    info!(
        path = %output.display(),
        size_kb = %format!("{:.1}", written as f64 / 1024.0),
        "Saved table"
    );

    if gzip {
        let gz = gzip_path(output);
        let compressed = write_gzip(&gz, &table)?;
        info!(
            path = %gz.display(),
            size_kb = %format!("{:.1}", compressed as f64 / 1024.0),
            "Saved gzip copy"
        );
    }

    Summary::of(&table).log();
    Ok(())
}
