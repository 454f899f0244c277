//! Remote inventory-service client.
//!
//! This crate provides:
//! - Bearer-credential handling with in-place token refresh
//! - Paginated catalog retrieval with rate-limit backoff
//! - Purchase-order and order-line creation with pacing
//! - Backfill creation of missing catalog entries
//!
//! Every call is issued sequentially: one response is fully consumed
//! before the next request goes out.

pub mod auth;
pub mod catalog;
pub mod client;
pub mod error;
pub mod items;
pub mod orders;
pub mod wire;

pub use auth::{Credentials, TokenEndpoint};
pub use catalog::{FetchOptions, FetchOutcome, fetch_all};
pub use client::ApiClient;
pub use error::{ApiError, Result};
pub use items::{BackfillOptions, BackfillReport, create_missing_items};
pub use orders::{OrderReport, OrderSubmitter};
