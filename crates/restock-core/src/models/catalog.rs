//! Locally cached catalog: identifier-keyed entries mirrored from the
//! remote inventory service.

use std::collections::HashMap;
use std::path::Path;

use chrono::Local;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CatalogError, Result};

/// One catalog item as cached locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Internal id assigned by the inventory service.
    pub item_id: i64,

    /// Item description.
    #[serde(default)]
    pub description: String,

    /// Default purchase cost.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<Decimal>,

    /// Retail price.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,

    /// Canonical store SKU (custom SKU when set, system SKU otherwise).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// SKU assigned by the manufacturer; distributor invoices without
    /// UPCs resolve through this field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_sku: Option<String>,

    /// Category id within the inventory service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,

    /// Archived items stay in the cache but should not drive new orders.
    #[serde(default)]
    pub archived: bool,

    /// Tag names attached to the item.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

/// Cache key for entries with no UPC; keeps them reachable by SKU scan.
pub fn synthetic_key(item_id: i64) -> String {
    format!("ITEM_{item_id}")
}

/// In-memory map from identifier (UPC, or synthetic `ITEM_<id>` key for
/// UPC-less entries) to catalog entry. Built by a bulk remote fetch and
/// persisted wholesale to a JSON file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogCache {
    entries: HashMap<String, CatalogEntry>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Insert under the UPC when present, else under the synthetic key.
    pub fn insert(&mut self, upc: Option<String>, entry: CatalogEntry) {
        let key = match upc {
            Some(u) if !u.is_empty() => u,
            _ => synthetic_key(entry.item_id),
        };
        self.entries.insert(key, entry);
    }

    /// Direct lookup by UPC.
    pub fn get_upc(&self, upc: &str) -> Option<&CatalogEntry> {
        self.entries.get(upc)
    }

    /// Linear scan over entry SKU fields. The cache is keyed by UPC and
    /// internal id only, so SKU resolution is O(cache size).
    pub fn find_by_sku(&self, sku: &str) -> Option<&CatalogEntry> {
        self.entries
            .values()
            .find(|e| e.manufacturer_sku.as_deref() == Some(sku))
            .or_else(|| self.entries.values().find(|e| e.sku.as_deref() == Some(sku)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &CatalogEntry)> {
        self.entries.iter()
    }

    /// Load a previously saved cache file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Load(format!("{}: {e}", path.display())))?;
        let cache: Self = serde_json::from_str(&content)
            .map_err(|e| CatalogError::Load(format!("{}: {e}", path.display())))?;
        info!(entries = cache.len(), "catalog cache loaded from {}", path.display());
        Ok(cache)
    }

    /// Overwrite the cache file wholesale. When `backup` is set and a
    /// previous file exists, it is copied aside under a timestamped name
    /// first.
    pub fn save(&self, path: &Path, backup: bool) -> Result<()> {
        if backup && path.exists() {
            let backup_path = backup_path_for(path);
            std::fs::copy(path, &backup_path)
                .map_err(|e| CatalogError::Save(format!("backing up previous cache: {e}")))?;
            info!("previous cache backed up to {}", backup_path.display());
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| CatalogError::Save(e.to_string()))?;
        std::fs::write(path, content)
            .map_err(|e| CatalogError::Save(format!("{}: {e}", path.display())))?;
        info!(entries = self.len(), "catalog cache saved to {}", path.display());
        Ok(())
    }
}

fn backup_path_for(path: &Path) -> std::path::PathBuf {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("catalog_cache");
    let timestamp = Local::now().format("%Y%m%d_%H%M%S");
    path.with_file_name(format!("{stem}_backup_{timestamp}.json"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn entry(item_id: i64, manufacturer_sku: Option<&str>, sku: Option<&str>) -> CatalogEntry {
        CatalogEntry {
            item_id,
            description: format!("item {item_id}"),
            cost: Some(Decimal::from_str("12.50").unwrap()),
            price: Some(Decimal::from_str("24.99").unwrap()),
            sku: sku.map(str::to_string),
            manufacturer_sku: manufacturer_sku.map(str::to_string),
            category_id: Some(17),
            archived: false,
            tags: vec!["New".to_string()],
        }
    }

    #[test]
    fn test_insert_keys_by_upc_or_synthetic() {
        let mut cache = CatalogCache::new();
        cache.insert(Some("012345678905".to_string()), entry(1, None, None));
        cache.insert(None, entry(2, None, None));
        cache.insert(Some(String::new()), entry(3, None, None));

        assert_eq!(cache.get_upc("012345678905").unwrap().item_id, 1);
        assert_eq!(cache.get_upc("ITEM_2").unwrap().item_id, 2);
        assert_eq!(cache.get_upc("ITEM_3").unwrap().item_id, 3);
    }

    #[test]
    fn test_find_by_sku_prefers_manufacturer_sku() {
        let mut cache = CatalogCache::new();
        cache.insert(None, entry(10, Some("MFG-1"), None));
        cache.insert(None, entry(11, None, Some("MFG-1")));

        // The manufacturer-SKU match wins over the canonical-SKU match.
        assert_eq!(cache.find_by_sku("MFG-1").unwrap().item_id, 10);
        assert!(cache.find_by_sku("MISSING").is_none());
    }

    #[test]
    fn test_upc_less_entries_stay_discoverable_by_sku() {
        let mut cache = CatalogCache::new();
        cache.insert(None, entry(42, Some("LKY AME-R02-FR"), None));
        assert_eq!(cache.find_by_sku("LKY AME-R02-FR").unwrap().item_id, 42);
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = CatalogCache::new();
        cache.insert(Some("889696012345".to_string()), entry(5, Some("UNI-5"), Some("S-5")));
        cache.insert(None, entry(6, None, None));

        cache.save(&path, false).unwrap();
        let reloaded = CatalogCache::load(&path).unwrap();

        assert_eq!(reloaded, cache);
    }

    #[test]
    fn test_save_backs_up_previous_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.json");

        let mut cache = CatalogCache::new();
        cache.insert(None, entry(1, None, None));
        cache.save(&path, true).unwrap();
        cache.insert(None, entry(2, None, None));
        cache.save(&path, true).unwrap();

        let backups: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().starts_with("cache_backup_"))
            .collect();
        assert_eq!(backups.len(), 1);
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(CatalogCache::load(&dir.path().join("absent.json")).is_err());
    }
}
