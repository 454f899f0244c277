//! Core library for distributor invoice ingestion.
//!
//! This crate provides:
//! - Distributor detection and per-vendor invoice parsing
//! - Cross-invoice line-item merging and catalog reconciliation
//! - The locally persisted catalog cache
//! - Run configuration

pub mod error;
pub mod models;
pub mod parsers;
pub mod reconcile;
pub mod text;

pub use error::{RestockError, Result};
pub use models::catalog::{CatalogCache, CatalogEntry};
pub use models::config::RestockConfig;
pub use models::invoice::{Distributor, InvoiceRecord, LineItem};
pub use parsers::{InvoiceParser, detect, parse_document};
pub use reconcile::{
    MatchedItem, MergedOrder, Reconciliation, UnmatchedQueue, UnmatchedRecord, merge, reconcile,
    resolve,
};
