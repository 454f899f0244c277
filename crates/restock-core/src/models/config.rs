//! Configuration for ingestion runs and the remote service connection.

use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main configuration for the restock pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RestockConfig {
    /// Remote service connection.
    pub api: ApiConfig,

    /// Purchase-order submission.
    pub order: OrderConfig,

    /// Catalog fetch and cache persistence.
    pub catalog: CatalogConfig,

    /// Local state files.
    pub files: FileConfig,
}

/// Remote inventory service connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base API URL, up to but not including `/Account`.
    pub base_url: String,

    /// Account id inserted into resource paths.
    pub account_id: String,

    /// OAuth token-exchange endpoint.
    pub token_url: String,

    /// OAuth client id.
    pub client_id: String,

    /// OAuth client secret.
    pub client_secret: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.lightspeedapp.com/API/V3".to_string(),
            account_id: String::new(),
            token_url: "https://cloud.lightspeedapp.com/oauth/access_token.php".to_string(),
            client_id: String::new(),
            client_secret: String::new(),
        }
    }
}

/// Purchase-order submission settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderConfig {
    /// Shop receiving created purchase orders.
    pub shop_id: i64,

    /// Default shipping cost on the order header.
    pub ship_cost: Decimal,

    /// Pause between successful order-line submissions, to respect the
    /// remote service's rate limit.
    pub line_delay_ms: u64,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            shop_id: 1,
            ship_cost: Decimal::ZERO,
            line_delay_ms: 500,
        }
    }
}

/// Catalog fetch and cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Items requested per page of the bulk fetch.
    pub page_size: u32,

    /// Pause between page requests.
    pub page_delay_ms: u64,

    /// Retries allowed per page when rate limited.
    pub max_retries: u32,

    /// Fixed backoff after a rate-limit response.
    pub backoff_ms: u64,

    /// Path of the persisted cache file.
    pub cache_file: PathBuf,

    /// Copy the previous cache file aside before overwriting.
    pub backup_on_save: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            page_delay_ms: 200,
            max_retries: 3,
            backoff_ms: 2000,
            cache_file: PathBuf::from("catalog_cache.json"),
            backup_on_save: true,
        }
    }
}

/// Paths of local state files.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Persisted bearer credentials.
    pub tokens_file: PathBuf,

    /// Append-only queue of identifiers that failed catalog resolution.
    pub unmatched_file: PathBuf,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            tokens_file: PathBuf::from("tokens.json"),
            unmatched_file: PathBuf::from("unmatched_items.tsv"),
        }
    }
}

impl RestockConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
