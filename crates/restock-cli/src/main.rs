//! CLI application for distributor invoice ingestion.

mod commands;
mod input;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{backfill, cache, order, scan, shops};

/// Ingest distributor invoices and create purchase orders
#[derive(Parser)]
#[command(name = "restock")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a single invoice document
    Scan(scan::ScanArgs),

    /// Parse invoices, reconcile against the catalog, and create a purchase order
    Order(order::OrderArgs),

    /// Manage the local catalog cache
    Cache(cache::CacheArgs),

    /// Create catalog entries for queued unmatched items
    Backfill(backfill::BackfillArgs),

    /// List the account's shops
    Shops,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    match cli.command {
        Commands::Scan(args) => scan::run(args).await,
        Commands::Order(args) => order::run(args, cli.config.as_deref()).await,
        Commands::Cache(args) => cache::run(args, cli.config.as_deref()).await,
        Commands::Backfill(args) => backfill::run(args, cli.config.as_deref()).await,
        Commands::Shops => shops::run(cli.config.as_deref()).await,
    }
}
