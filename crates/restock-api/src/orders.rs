//! Purchase-order submission.

use std::time::Duration;

use rust_decimal::Decimal;
use tokio::time::sleep;
use tracing::{info, warn};

use restock_core::reconcile::MatchedItem;

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::wire::{CreateOrder, CreateOrderLine};

/// Outcome of one submission run.
#[derive(Debug, Default)]
pub struct OrderReport {
    pub order_id: i64,
    /// Catalog item ids whose lines were created.
    pub submitted: Vec<i64>,
    /// Lines that failed, with the error text.
    pub failed: Vec<(i64, String)>,
}

/// Creates the order header, then one line per matched item, strictly in
/// sequence with a fixed pacing delay between successful submissions.
pub struct OrderSubmitter<'a> {
    client: &'a mut ApiClient,
    pacing: Duration,
}

impl<'a> OrderSubmitter<'a> {
    pub fn new(client: &'a mut ApiClient, pacing: Duration) -> Self {
        Self { client, pacing }
    }

    /// Submit a reconciled item set as one purchase order.
    ///
    /// A header failure aborts the whole run. A line failure (including
    /// an auth failure that survived its one refresh-and-retry) aborts
    /// only that line; it is recorded in the report and submission moves
    /// on. External effects are at-least-once: a partially created order
    /// stays as-is.
    pub async fn submit(
        &mut self,
        vendor_id: i64,
        shop_id: i64,
        ship_cost: Decimal,
        reference: Option<&str>,
        items: &[MatchedItem],
    ) -> Result<OrderReport> {
        let shop = self.client.get_shop(shop_id).await?;
        if shop.is_archived() {
            return Err(ApiError::ShopArchived(shop_id));
        }

        let order_id = self
            .client
            .create_order(&CreateOrder {
                vendor_id,
                shop_id,
                ship_cost,
                reference,
            })
            .await?;
        info!(order_id, vendor_id, "purchase order created");

        let mut report = OrderReport {
            order_id,
            ..Default::default()
        };
        for (index, matched) in items.iter().enumerate() {
            let line = CreateOrderLine {
                quantity: matched.item.quantity,
                price: matched.item.unit_price,
                original_price: matched.item.unit_price,
                num_received: 0,
                item_id: matched.item_id,
                order_id,
            };
            match self.client.create_order_line(&line).await {
                Ok(_) => {
                    info!(
                        item_id = matched.item_id,
                        "order line {}/{} created",
                        index + 1,
                        items.len()
                    );
                    report.submitted.push(matched.item_id);
                    if index + 1 < items.len() {
                        sleep(self.pacing).await;
                    }
                }
                Err(e) => {
                    warn!(item_id = matched.item_id, error = %e, "order line failed");
                    report.failed.push((matched.item_id, e.to_string()));
                }
            }
        }
        Ok(report)
    }
}
