//! Backfill command - create catalog entries for queued unmatched
//! identifiers.

use std::time::Duration;

use clap::Args;
use console::style;

use restock_api::{BackfillOptions, create_missing_items};
use restock_core::reconcile::UnmatchedQueue;

use super::{build_client, load_config, persist_credentials};

/// Arguments for the backfill command.
#[derive(Args)]
pub struct BackfillArgs {
    /// Vendor assigned to created items
    #[arg(long)]
    vendor_id: Option<i64>,

    /// Category assigned to created items
    #[arg(long)]
    category_id: Option<i64>,

    /// Truncate the queue after a fully successful run
    #[arg(long)]
    clear: bool,
}

pub async fn run(args: BackfillArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let records = UnmatchedQueue::read_all(&config.files.unmatched_file)?;
    if records.is_empty() {
        println!(
            "{} queue {} is empty, nothing to create",
            style("✓").green(),
            config.files.unmatched_file.display()
        );
        return Ok(());
    }
    println!("Processing {} queued item(s)...", records.len());

    let mut client = build_client(&config)?;
    let options = BackfillOptions {
        vendor_id: args.vendor_id,
        category_id: args.category_id,
        pacing: Duration::from_millis(config.order.line_delay_ms),
    };
    let report = create_missing_items(&mut client, &records, &[], &options).await?;
    persist_credentials(&client, &config);

    println!(
        "{} {} entry(ies) created",
        style("✓").green(),
        report.created.len()
    );
    for (identifier, item_id) in &report.created {
        println!("    {identifier} → item {item_id}");
    }
    if !report.failed.is_empty() {
        eprintln!("{} {} failed:", style("✗").red(), report.failed.len());
        for (identifier, error) in &report.failed {
            eprintln!("    {identifier}: {error}");
        }
    }

    if args.clear {
        if report.failed.is_empty() {
            UnmatchedQueue::clear(&config.files.unmatched_file)?;
            println!("{} queue cleared", style("✓").green());
        } else {
            eprintln!(
                "{} queue left in place because some creations failed",
                style("!").yellow()
            );
        }
    }

    Ok(())
}
