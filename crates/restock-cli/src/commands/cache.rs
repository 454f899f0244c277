//! Cache command - build and inspect the local catalog cache.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use restock_api::{FetchOptions, fetch_all};
use restock_core::models::catalog::CatalogCache;

use super::{build_client, load_config, persist_credentials};

/// Arguments for the cache command.
#[derive(Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    command: CacheCommand,
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Fetch the full remote catalog and rewrite the cache file
    Build(BuildArgs),

    /// Show cache file statistics
    Status,

    /// Look a single UPC up on the live service, bypassing the cache
    Lookup(LookupArgs),
}

#[derive(Args)]
struct BuildArgs {
    /// Write to this path instead of the configured cache file
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Args)]
struct LookupArgs {
    /// UPC to look up
    upc: String,
}

pub async fn run(args: CacheArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    match args.command {
        CacheCommand::Build(build_args) => {
            let mut client = build_client(&config)?;
            let options = FetchOptions {
                page_size: config.catalog.page_size,
                page_delay: Duration::from_millis(config.catalog.page_delay_ms),
                max_retries: config.catalog.max_retries,
                backoff: Duration::from_millis(config.catalog.backoff_ms),
            };

            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap(),
            );

            let outcome = fetch_all(&mut client, &options, |page, entries| {
                pb.set_message(format!("page {page}, {entries} entries"));
                pb.tick();
            })
            .await?;
            pb.finish_and_clear();
            persist_credentials(&client, &config);

            if !outcome.complete {
                eprintln!(
                    "{} fetch aborted by rate limiting; the cache is partial and provisional",
                    style("!").yellow()
                );
            }

            let path = build_args.output.unwrap_or(config.catalog.cache_file);
            outcome.cache.save(&path, config.catalog.backup_on_save)?;

            println!(
                "{} {} entries over {} page(s) saved to {} ({} dropped without internal id)",
                style("✓").green(),
                outcome.cache.len(),
                outcome.pages,
                path.display(),
                outcome.dropped
            );
        }
        CacheCommand::Status => {
            let cache = CatalogCache::load(&config.catalog.cache_file)?;
            let synthetic = cache
                .iter()
                .filter(|(key, _)| key.starts_with("ITEM_"))
                .count();
            println!("Cache file: {}", config.catalog.cache_file.display());
            println!("Entries: {}", cache.len());
            println!("  keyed by UPC: {}", cache.len() - synthetic);
            println!("  without UPC:  {synthetic}");
        }
        CacheCommand::Lookup(lookup_args) => {
            let mut client = build_client(&config)?;
            let items = client.find_item_by_upc(&lookup_args.upc).await?;
            persist_credentials(&client, &config);

            if items.is_empty() {
                println!("No item with UPC {}", lookup_args.upc);
                return Ok(());
            }
            for item in items {
                if let Some((_, entry)) = item.into_entry() {
                    println!(
                        "item {}: {} (sku {}, cost {})",
                        entry.item_id,
                        entry.description,
                        entry.sku.as_deref().unwrap_or("-"),
                        entry
                            .cost
                            .map(|c| c.to_string())
                            .unwrap_or_else(|| "-".to_string())
                    );
                }
            }
        }
    }

    Ok(())
}
