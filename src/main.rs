//! customer-upload - bulk customer migration
//!
//! Loads the cleaned records, uploads every record that has no customer id
//! yet, and writes the annotated list to the results file.

#![allow(missing_docs)]

use anyhow::Context;
use clap::Parser;
use customer_uploader::utils::logging::init_tracing;
use customer_uploader::{BatchUploader, Config, ResultPersister, build_info, load_records};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{debug, error, info, warn};

/// Upload cleaned customer records to the customer-management API
#[derive(Parser, Debug)]
#[command(name = "customer-upload")]
#[command(version, about)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long, env = "UPLOADER_CONFIG")]
    config: Option<PathBuf>,

    /// Cleaned records file (overrides CLEAN_DATA_DIR/CLEAN_DATA_FILE_NAME)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Results file (overrides RESULTS_DIR/RESULTS_FILE_NAME)
    #[arg(short, long)]
    results: Option<PathBuf>,

    /// API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Maximum records uploaded at the same time
    #[arg(long)]
    concurrency: Option<usize>,

    /// Post custom fields as well
    #[arg(long)]
    upload_custom_fields: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    /// Load and partition the records without contacting the API
    #[arg(long)]
    dry_run: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(input) = &self.input {
            config.paths.input = input.clone();
        }
        if let Some(results) = &self.results {
            config.paths.results = results.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.api.timeout = timeout;
        }
        if let Some(concurrency) = self.concurrency {
            config.upload.concurrency = Some(concurrency);
        }
        if self.upload_custom_fields {
            config.upload.upload_custom_fields = true;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.json_logs);

    match dotenv {
        Ok(path) => debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => debug!("No .env file found"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    }

    let info = build_info();
    info!("customer-upload {} ({})", info.version, info.git_hash);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())
        .await
        .context("failed to load configuration")?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    debug!(config = ?config, "Effective configuration");

    let mut records = load_records(&config.paths.input).context("failed to load records")?;

    if cli.dry_run {
        let pending = records.iter().filter(|r| !r.is_created()).count();
        info!(
            total = records.len(),
            pending,
            skipped = records.len() - pending,
            "Dry run: {} records would be uploaded",
            pending
        );
        return Ok(());
    }

    let summary = BatchUploader::from_config(&config.upload)
        .with_persister(ResultPersister::new(&config.paths.results))
        .run(&config.api, &mut records)
        .await?;

    if !summary.nothing_to_upload() && !summary.persisted() {
        warn!("Upload finished but the results file could not be written");
    }
    Ok(())
}
