//! Order command - parse invoices, reconcile, and create a purchase
//! order in the remote service.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use console::style;
use rust_decimal::Decimal;
use tracing::warn;

use restock_api::OrderSubmitter;
use restock_core::models::catalog::CatalogCache;
use restock_core::reconcile::{self, UnmatchedQueue};
use restock_core::parsers;

use super::{build_client, load_config, persist_credentials};
use crate::input;

/// Arguments for the order command.
#[derive(Args)]
pub struct OrderArgs {
    /// Invoice documents (PDF or extracted text)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Vendor the purchase order is for
    #[arg(long)]
    vendor_id: i64,

    /// Shop receiving the order (default from config)
    #[arg(long)]
    shop_id: Option<i64>,

    /// Shipping cost on the order header (default from config)
    #[arg(long)]
    ship_cost: Option<Decimal>,

    /// Reference number stored on the order header
    #[arg(long)]
    reference: Option<String>,

    /// Reconcile and print the order without any remote calls
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(args: OrderArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    // Parse every document; unrecognized or empty ones are reported and
    // skipped, they never abort the batch.
    let mut all_items = Vec::new();
    for path in &args.inputs {
        let text = input::read_document(path)?;
        match parsers::parse_document(&text) {
            Ok(record) => {
                if record.items.is_empty() {
                    warn!("{}: no items found, skipping", path.display());
                    continue;
                }
                println!(
                    "{} {}: {} item(s) ({})",
                    style("✓").green(),
                    path.display(),
                    record.items.len(),
                    record.distributor
                );
                all_items.extend(record.items);
            }
            Err(e) => {
                eprintln!("{} {}: {e}", style("✗").red(), path.display());
            }
        }
    }
    if all_items.is_empty() {
        anyhow::bail!("no actionable items in any input document");
    }

    let parsed_count = all_items.len();
    let merged = reconcile::merge(all_items);
    println!(
        "{} {} line item(s) merged into {}",
        style("✓").green(),
        parsed_count,
        merged.len()
    );

    let cache = CatalogCache::load(&config.catalog.cache_file)
        .context("catalog cache missing or unreadable; run `restock cache build` first")?;

    let mut queue = UnmatchedQueue::open(&config.files.unmatched_file)?;
    let outcome = reconcile::reconcile(merged, &cache, &mut queue)?;

    if !outcome.unmatched.is_empty() {
        println!(
            "{} {} item(s) missing from the catalog, queued to {}:",
            style("!").yellow(),
            outcome.unmatched.len(),
            config.files.unmatched_file.display()
        );
        for item in &outcome.unmatched {
            println!("    {} {}", item.merge_key().unwrap_or("?"), item.name);
        }
    }
    if !outcome.skipped.is_empty() {
        println!(
            "{} {} item(s) carry no identifier and were skipped",
            style("!").yellow(),
            outcome.skipped.len()
        );
    }
    if outcome.matched.is_empty() {
        anyhow::bail!("no items resolved against the catalog; nothing to order");
    }

    if args.dry_run {
        println!("\nDry run; order that would be created:");
        for matched in &outcome.matched {
            println!(
                "  {:>6} x [{}] {:<40} @ {}",
                matched.item.quantity, matched.item_id, matched.item.name, matched.item.unit_price
            );
        }
        return Ok(());
    }

    let shop_id = args.shop_id.unwrap_or(config.order.shop_id);
    let ship_cost = args.ship_cost.unwrap_or(config.order.ship_cost);

    let mut client = build_client(&config)?;
    let mut submitter =
        OrderSubmitter::new(&mut client, Duration::from_millis(config.order.line_delay_ms));
    let report = submitter
        .submit(
            args.vendor_id,
            shop_id,
            ship_cost,
            args.reference.as_deref(),
            &outcome.matched,
        )
        .await?;
    persist_credentials(&client, &config);

    println!(
        "{} Purchase order {} created with {} line(s)",
        style("✓").green(),
        report.order_id,
        report.submitted.len()
    );
    if !report.failed.is_empty() {
        eprintln!("{} {} line(s) failed:", style("✗").red(), report.failed.len());
        for (item_id, error) in &report.failed {
            eprintln!("    item {item_id}: {error}");
        }
        anyhow::bail!("order {} is incomplete", report.order_id);
    }

    Ok(())
}
