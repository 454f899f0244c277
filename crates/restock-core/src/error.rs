//! Error types for the restock-core library.

use thiserror::Error;

/// Main error type for the core library.
#[derive(Error, Debug)]
pub enum RestockError {
    /// Document parsing error.
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// Catalog cache error.
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to document parsing.
///
/// Malformed item blocks inside a document are not errors; parsers skip
/// them and keep scanning. Only document-level conditions surface here.
#[derive(Error, Debug)]
pub enum ParseError {
    /// No distributor marker was found; the document must be skipped.
    #[error("no known distributor marker in document text")]
    UnknownDistributor,

    /// The document parsed but yielded no line items.
    #[error("document contains no line items")]
    NoItems,
}

/// Errors related to the catalog cache file.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Failed to read or decode the cache file.
    #[error("failed to load catalog cache: {0}")]
    Load(String),

    /// Failed to encode or write the cache file.
    #[error("failed to save catalog cache: {0}")]
    Save(String),
}

/// Result type for the core library.
pub type Result<T> = std::result::Result<T, RestockError>;
