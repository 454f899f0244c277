//! Error types for the remote service client.

use thiserror::Error;

/// Main error type for remote operations.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The credential was rejected again after a refresh; this request's
    /// scope is aborted.
    #[error("authorization failed after token refresh")]
    Unauthorized,

    /// Rate limited and the bounded retries ran out.
    #[error("rate limited after {retries} retries")]
    RateLimited { retries: u32 },

    /// The target shop is archived and cannot take purchase orders.
    #[error("shop {0} is archived")]
    ShopArchived(i64),

    /// Non-success response, surfaced with its body.
    #[error("remote service returned {status}: {body}")]
    Remote { status: u16, body: String },

    /// A success response that does not decode as expected.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Token exchange failed.
    #[error("token exchange failed: {0}")]
    Token(String),

    /// Transport-level HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// I/O error (token file handling).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for remote operations.
pub type Result<T> = std::result::Result<T, ApiError>;
