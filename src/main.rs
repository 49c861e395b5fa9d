use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use catalog_ingest::config::{IngestConfig, StoreConfig};
use catalog_ingest::pipeline::run_pipeline;
use catalog_ingest::reader::read_source;
use catalog_ingest::storage::{batch_write, DocumentStore, MemoryStore};

struct CliArgs {
    source: PathBuf,
    seller_id: Option<String>,
    config_path: String,
    out_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    let args = parse_args().context(
        "Usage: catalog-ingest <file.csv|file.xlsx|file.json> --seller <id> \
         [--config <path>] [--out <path>]",
    )?;

    info!("🚀 Starting catalog ingestion for {}", args.source.display());

    // Load ingest configuration, falling back to defaults when absent
    let config = if Path::new(&args.config_path).exists() {
        let config = IngestConfig::from_file(&args.config_path)?;
        info!("Loaded ingest config from {}", args.config_path);
        config
    } else {
        warn!(
            "Config file not found at {}, using defaults",
            args.config_path
        );
        IngestConfig::default()
    };
    config.validate()?;

    // A reachable document store is optional: without one the run is a
    // dry-run against the in-memory store, which --out can dump.
    match StoreConfig::from_file(&args.config_path) {
        Ok(store_config) => {
            store_config.validate()?;
            info!(
                "Document store target: {}/{}",
                store_config.project_id,
                store_config.get_database()
            );
        }
        Err(e) => {
            warn!("No document store configured ({}), writing to memory", e);
        }
    }

    let seller_id = args
        .seller_id
        .or(config.default_seller_id.clone())
        .context("No seller id: pass --seller or set default_seller_id in the config")?;

    // Parse the source file; any failure here aborts the whole batch
    let row_set = read_source(&args.source)
        .with_context(|| format!("Failed to parse source file: {}", args.source.display()))?;
    info!(
        "Read {} rows with {} columns ({:?})",
        row_set.rows.len(),
        row_set.columns.len(),
        row_set.source
    );

    if row_set.is_empty() {
        warn!("Source file contained no data rows");
        return Ok(());
    }

    // Run the transform
    let output = run_pipeline(&row_set, &seller_id)?;
    info!(
        "Built {} product drafts ({} rows skipped)",
        output.drafts.len(),
        output.skipped_rows
    );

    // Commit in independent batches and report partial progress
    let documents: Vec<serde_json::Value> = output
        .drafts
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<_, _>>()?;

    let store = MemoryStore::new();
    let report = batch_write(&store, &config.collection, &documents, config.batch_size).await;

    info!(
        "Batch write summary: {} attempted, {} succeeded, {} failed",
        report.attempted, report.succeeded, report.failed
    );
    for error in &report.errors {
        warn!("Batch error: {}", error);
    }

    if let Some(out_path) = args.out_path {
        let stored = store.list_documents(&config.collection).await?;
        let json = serde_json::to_string_pretty(&stored)?;
        std::fs::write(&out_path, json)
            .with_context(|| format!("Failed to write output file: {}", out_path.display()))?;
        info!("Wrote {} documents to {}", stored.len(), out_path.display());
    }

    if report.failed == 0 {
        info!("✅ Ingestion completed successfully");
    } else {
        warn!(
            "⚠️ Ingestion completed with {} failed documents",
            report.failed
        );
    }

    Ok(())
}

fn parse_args() -> Result<CliArgs> {
    let mut source = None;
    let mut seller_id = None;
    let mut config_path = "configs/ingest.toml".to_string();
    let mut out_path = None;

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--seller" | "-s" => {
                seller_id = Some(args.next().context("--seller requires a value")?);
            }
            "--config" | "-c" => {
                config_path = args.next().context("--config requires a value")?;
            }
            "--out" | "-o" => {
                out_path = Some(PathBuf::from(
                    args.next().context("--out requires a value")?,
                ));
            }
            other => {
                source = Some(PathBuf::from(other));
            }
        }
    }

    Ok(CliArgs {
        source: source.context("Missing source file argument")?,
        seller_id,
        config_path,
        out_path,
    })
}
