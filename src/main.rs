mod console;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use estoque_app::Workflow;
use estoque_client::{HttpStore, StoreConfig};

use crate::console::ConsoleShell;

/// Stock-count console: register products, look one up, record counts
/// against it, and follow the aggregated summary.
#[derive(Debug, Parser)]
#[command(name = "estoque", version)]
struct Cli {
    /// Base URL of the inventory API.
    #[arg(long, default_value = "http://localhost:5000/api")]
    base_url: String,

    /// Directory where exported reports are written.
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

// The workflow is event-driven and single-threaded: one command, one
// suspend/resume unit.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    tracing::info!(base_url = %cli.base_url, "starting stock-count console");

    let store = Arc::new(HttpStore::new(StoreConfig {
        base_url: cli.base_url,
        ..StoreConfig::default()
    }));
    let shell = Arc::new(ConsoleShell);
    let workflow = Workflow::new(store, shell, cli.output_dir);

    console::run(&workflow).await
}
