//! Backfill creation of catalog entries for unmatched identifiers.

use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::sleep;
use tracing::{info, warn};

use restock_core::models::invoice::LineItem;
use restock_core::reconcile::UnmatchedRecord;

use crate::client::ApiClient;
use crate::error::Result;
use crate::wire::{CreateItem, CreateTag, CreateTags};

/// Settings for the backfill pass.
#[derive(Debug, Clone, Default)]
pub struct BackfillOptions {
    /// Vendor assigned to created items.
    pub vendor_id: Option<i64>,
    /// Category assigned to created items.
    pub category_id: Option<i64>,
    /// Pause between successful creations.
    pub pacing: Duration,
}

/// Outcome of one backfill pass.
#[derive(Debug, Default)]
pub struct BackfillReport {
    /// Identifier and new internal id of each created entry.
    pub created: Vec<(String, i64)>,
    /// Identifiers whose creation failed, with the error text.
    pub failed: Vec<(String, String)>,
}

/// Create one catalog item per queued record, sequentially.
///
/// SKU-shaped identifiers land in the manufacturer-SKU field, UPCs in
/// the UPC field. When the caller still holds the parsed line items,
/// they seed the description and cost; otherwise the queued display
/// name is all there is. A failed creation is recorded and the pass
/// continues.
pub async fn create_missing_items(
    client: &mut ApiClient,
    records: &[UnmatchedRecord],
    parsed: &[LineItem],
    options: &BackfillOptions,
) -> Result<BackfillReport> {
    let mut report = BackfillReport::default();

    for record in records {
        let source = parsed.iter().find(|item| {
            if record.is_sku() {
                item.sku.as_deref() == Some(record.identifier.as_str())
            } else {
                item.upc.as_deref() == Some(record.identifier.as_str())
            }
        });
        let description = source
            .map(|item| item.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| record.display_name.clone());
        let cost = source.map(|item| item.unit_price).unwrap_or(Decimal::ZERO);

        let (upc, manufacturer_sku) = if record.is_sku() {
            (None, Some(record.identifier.clone()))
        } else {
            (Some(record.identifier.clone()), None)
        };

        let request = CreateItem {
            description,
            default_cost: cost.to_string(),
            upc,
            manufacturer_sku,
            discountable: true,
            tax: true,
            item_type: "default".to_string(),
            serialized: false,
            publish_to_ecom: false,
            category_id: options.category_id,
            tax_class_id: 1,
            default_vendor_id: options.vendor_id,
            tags: CreateTags {
                tag: vec![CreateTag {
                    name: "New".to_string(),
                }],
            },
        };

        match client.create_item(&request).await {
            Ok(item_id) => {
                info!(identifier = %record.identifier, item_id, "catalog entry created");
                report.created.push((record.identifier.clone(), item_id));
                sleep(options.pacing).await;
            }
            Err(e) => {
                warn!(identifier = %record.identifier, error = %e, "item creation failed");
                report.failed.push((record.identifier.clone(), e.to_string()));
            }
        }
    }

    Ok(report)
}
