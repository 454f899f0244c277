//! Shops command - list the account's shops.
//!
//! Useful before ordering: archived shops cannot take purchase orders.

use super::{build_client, load_config, persist_credentials};

pub async fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let mut client = build_client(&config)?;

    let shops = client.list_shops().await?;
    persist_credentials(&client, &config);

    if shops.is_empty() {
        println!("No shops on this account");
        return Ok(());
    }
    for shop in shops {
        println!(
            "Shop {}: {}{}",
            shop.shop_id.as_deref().unwrap_or("?"),
            shop.name.as_deref().unwrap_or("(unnamed)"),
            if shop.is_archived() { " [archived]" } else { "" }
        );
    }

    Ok(())
}
