//! Reconciliation engine: cross-invoice merging and catalog resolution.

mod unmatched;

pub use unmatched::{UnmatchedQueue, UnmatchedRecord};

use indexmap::IndexMap;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::catalog::CatalogCache;
use crate::models::invoice::LineItem;

/// Deduplicated item set spanning one or more invoices. Iteration order
/// is input order.
#[derive(Debug, Default)]
pub struct MergedOrder {
    items: IndexMap<String, LineItem>,
}

impl MergedOrder {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&LineItem> {
        self.items.get(key)
    }

    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.items.values()
    }

    pub fn into_items(self) -> Vec<LineItem> {
        self.items.into_values().collect()
    }
}

/// Merge duplicate line items across documents.
///
/// Exact merge-key collisions sum their quantities; the first occurrence
/// keeps its descriptive fields. Items with no identifier get a
/// positional key and never merge with anything. Deterministic: output
/// order follows first appearance in the input.
pub fn merge<I>(items: I) -> MergedOrder
where
    I: IntoIterator<Item = LineItem>,
{
    let mut merged: IndexMap<String, LineItem> = IndexMap::new();
    for (position, item) in items.into_iter().enumerate() {
        let key = match item.merge_key() {
            Some(k) => k.to_string(),
            None => format!("__unkeyed_{position}"),
        };
        match merged.entry(key) {
            indexmap::map::Entry::Occupied(mut e) => {
                e.get_mut().quantity += item.quantity;
            }
            indexmap::map::Entry::Vacant(e) => {
                e.insert(item);
            }
        }
    }
    debug!(items = merged.len(), "merge complete");
    MergedOrder { items: merged }
}

/// Which identifier drove a catalog lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierKind {
    Upc,
    Sku,
}

/// Outcome of resolving one item against the catalog.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Internal id when the catalog knows the item.
    pub item_id: Option<i64>,
    /// Which identifier was consulted.
    pub kind: IdentifierKind,
    /// The identifier value itself.
    pub identifier: String,
}

/// Resolve an item's catalog identity.
///
/// A UPC is authoritative: when present, the lookup is UPC-only and a
/// miss is terminal for the item: it never falls back to the SKU even
/// if the SKU would match. SKU resolution scans entry SKU fields, since
/// the cache is keyed by UPC and internal id only. Returns `None` for
/// items carrying no identifier at all.
pub fn resolve(item: &LineItem, catalog: &CatalogCache) -> Option<Resolution> {
    if let Some(upc) = item.upc.as_deref().filter(|u| !u.is_empty()) {
        return Some(Resolution {
            item_id: catalog.get_upc(upc).map(|e| e.item_id),
            kind: IdentifierKind::Upc,
            identifier: upc.to_string(),
        });
    }
    if let Some(sku) = item.sku.as_deref().filter(|s| !s.is_empty()) {
        return Some(Resolution {
            item_id: catalog.find_by_sku(sku).map(|e| e.item_id),
            kind: IdentifierKind::Sku,
            identifier: sku.to_string(),
        });
    }
    None
}

/// A merged item bound to its catalog identity.
#[derive(Debug, Clone)]
pub struct MatchedItem {
    pub item_id: i64,
    pub item: LineItem,
}

/// Partition produced by [`reconcile`].
#[derive(Debug, Default)]
pub struct Reconciliation {
    /// Items the catalog knows; these drive order lines.
    pub matched: Vec<MatchedItem>,
    /// Items with an identifier the catalog misses; queued for backfill.
    pub unmatched: Vec<LineItem>,
    /// Items with no identifier at all; nothing can be done with them.
    pub skipped: Vec<LineItem>,
}

/// Resolve every merged item, queueing misses for deferred creation.
///
/// The queue deduplicates within this run only; the file itself
/// accumulates across runs until the caller clears it.
pub fn reconcile(
    order: MergedOrder,
    catalog: &CatalogCache,
    queue: &mut UnmatchedQueue,
) -> Result<Reconciliation> {
    let mut outcome = Reconciliation::default();

    for item in order.into_items() {
        match resolve(&item, catalog) {
            Some(Resolution {
                item_id: Some(id), ..
            }) => {
                outcome.matched.push(MatchedItem { item_id: id, item });
            }
            Some(resolution) => {
                queue.record(&resolution.identifier, &item.name)?;
                debug!(identifier = %resolution.identifier, "catalog miss, queued");
                outcome.unmatched.push(item);
            }
            None => {
                warn!(name = %item.name, "item has no identifier, skipped");
                outcome.skipped.push(item);
            }
        }
    }

    info!(
        matched = outcome.matched.len(),
        unmatched = outcome.unmatched.len(),
        skipped = outcome.skipped.len(),
        "reconciliation complete"
    );
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::catalog::CatalogEntry;
    use crate::parsers::parse_document;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn item(sku: Option<&str>, upc: Option<&str>, name: &str, qty: i64, price: &str) -> LineItem {
        LineItem {
            sku: sku.map(str::to_string),
            upc: upc.map(str::to_string),
            name: name.to_string(),
            quantity: Decimal::from(qty),
            unit_price: Decimal::from_str(price).unwrap(),
            ..Default::default()
        }
    }

    fn entry(item_id: i64, manufacturer_sku: Option<&str>) -> CatalogEntry {
        CatalogEntry {
            item_id,
            description: String::new(),
            cost: None,
            price: None,
            sku: None,
            manufacturer_sku: manufacturer_sku.map(str::to_string),
            category_id: None,
            archived: false,
            tags: Vec::new(),
        }
    }

    #[test]
    fn test_merge_sums_quantities_first_wins() {
        let merged = merge(vec![
            item(Some("AAA-1"), None, "Widget", 3, "10.00"),
            item(Some("AAA-1"), None, "Widget encore", 2, "12.00"),
        ]);

        assert_eq!(merged.len(), 1);
        let m = merged.get("AAA-1").unwrap();
        assert_eq!(m.quantity, Decimal::from(5));
        assert_eq!(m.name, "Widget");
        assert_eq!(m.unit_price, Decimal::from_str("10.00").unwrap());
    }

    #[test]
    fn test_merge_key_prefers_sku_over_upc() {
        let merged = merge(vec![
            item(Some("AAA-1"), Some("111111111111"), "First", 1, "1.00"),
            item(Some("AAA-1"), Some("222222222222"), "Second", 1, "1.00"),
        ]);
        // Same SKU merges even though the UPCs differ.
        assert_eq!(merged.len(), 1);
        assert_eq!(merged.get("AAA-1").unwrap().quantity, Decimal::from(2));
    }

    #[test]
    fn test_unkeyed_items_never_merge() {
        let merged = merge(vec![
            item(None, None, "Mystery", 1, "1.00"),
            item(None, None, "Mystery", 1, "1.00"),
        ]);
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn test_merge_preserves_input_order() {
        let merged = merge(vec![
            item(Some("B"), None, "b", 1, "1.00"),
            item(Some("A"), None, "a", 1, "1.00"),
            item(Some("B"), None, "b again", 1, "1.00"),
        ]);
        let names: Vec<_> = merged.items().map(|i| i.sku.clone().unwrap()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_upc_miss_never_falls_back_to_sku() {
        let mut catalog = CatalogCache::new();
        // The SKU would match this entry's manufacturer SKU...
        catalog.insert(Some("111111111111".to_string()), entry(7, Some("AAA-1")));

        // ...but the item's UPC is absent from the cache.
        let it = item(Some("AAA-1"), Some("999999999999"), "Widget", 1, "1.00");
        let resolution = resolve(&it, &catalog).unwrap();

        assert_eq!(resolution.kind, IdentifierKind::Upc);
        assert_eq!(resolution.item_id, None);
    }

    #[test]
    fn test_upc_hit_resolves() {
        let mut catalog = CatalogCache::new();
        catalog.insert(Some("111111111111".to_string()), entry(7, None));

        let it = item(None, Some("111111111111"), "Widget", 1, "1.00");
        assert_eq!(resolve(&it, &catalog).unwrap().item_id, Some(7));
    }

    #[test]
    fn test_sku_resolution_scans_manufacturer_sku() {
        let mut catalog = CatalogCache::new();
        catalog.insert(None, entry(42, Some("LKY AME-R02-FR")));

        let it = item(Some("LKY AME-R02-FR"), None, "Widget", 1, "1.00");
        let resolution = resolve(&it, &catalog).unwrap();
        assert_eq!(resolution.kind, IdentifierKind::Sku);
        assert_eq!(resolution.item_id, Some(42));
    }

    #[test]
    fn test_reconcile_partitions_and_queues() {
        let dir = tempfile::tempdir().unwrap();
        let queue_path = dir.path().join("unmatched.tsv");

        let mut catalog = CatalogCache::new();
        catalog.insert(None, entry(5, Some("KNOWN-1")));

        let merged = merge(vec![
            item(Some("KNOWN-1"), None, "Known game", 2, "10.00"),
            item(Some("GHOST-9"), None, "Unknown game", 1, "5.00"),
            item(None, None, "No identifier", 1, "1.00"),
        ]);

        let mut queue = UnmatchedQueue::open(&queue_path).unwrap();
        let outcome = reconcile(merged, &catalog, &mut queue).unwrap();

        assert_eq!(outcome.matched.len(), 1);
        assert_eq!(outcome.matched[0].item_id, 5);
        assert_eq!(outcome.unmatched.len(), 1);
        assert_eq!(outcome.skipped.len(), 1);

        let written = std::fs::read_to_string(&queue_path).unwrap();
        assert_eq!(written, "GHOST-9\tUnknown game\n");
    }

    // Three documents for one vendor: a SKU shared across two of them
    // plus a unique one; the merged order holds exactly two items.
    #[test]
    fn test_end_to_end_cross_document_merge() {
        let doc1 = "Groupe Randolph Inc.\n[AAA-1] Widget\n4,00\n10,0000\n";
        let doc2 = "Groupe Randolph Inc.\n[AAA-1] Widget encore\n1,00\n12,0000\n";
        let doc3 = "Groupe Randolph Inc.\n[BBB-2] Gadget\n2,00\n5,0000\n";

        let mut all_items = Vec::new();
        for doc in [doc1, doc2, doc3] {
            let record = parse_document(doc).unwrap();
            assert_eq!(record.items.len(), 1);
            all_items.extend(record.items);
        }

        let merged = merge(all_items);
        assert_eq!(merged.len(), 2);

        let shared = merged.get("AAA-1").unwrap();
        assert_eq!(shared.quantity, Decimal::from(5));
        assert_eq!(shared.name, "Widget");
        assert_eq!(shared.unit_price, Decimal::from_str("10.0").unwrap());

        assert_eq!(merged.get("BBB-2").unwrap().quantity, Decimal::from(2));
    }
}
