//! Paginated catalog retrieval.

use std::time::Duration;

use reqwest::StatusCode;
use tokio::time::sleep;
use tracing::{info, warn};

use restock_core::models::catalog::CatalogCache;

use crate::client::ApiClient;
use crate::error::{ApiError, Result};
use crate::wire::ItemPage;

/// Tuning knobs for the bulk fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Items per page.
    pub page_size: u32,
    /// Pause between page requests.
    pub page_delay: Duration,
    /// Retries allowed per page when rate limited.
    pub max_retries: u32,
    /// Fixed backoff after a rate-limit response.
    pub backoff: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            page_size: 100,
            page_delay: Duration::from_millis(200),
            max_retries: 3,
            backoff: Duration::from_secs(2),
        }
    }
}

/// Result of a bulk fetch. When `complete` is false, rate-limit retries
/// ran out mid-listing and the cache holds only what was accumulated;
/// callers must treat it as provisional.
#[derive(Debug)]
pub struct FetchOutcome {
    pub cache: CatalogCache,
    pub complete: bool,
    pub pages: u32,
    /// Entries discarded for lacking an internal id.
    pub dropped: u32,
}

/// Retrieve the whole catalog, page by page, following the service's
/// next-page links. Entries without a UPC are stored under their
/// synthetic key so SKU resolution can still reach them.
pub async fn fetch_all<F>(
    client: &mut ApiClient,
    options: &FetchOptions,
    mut on_page: F,
) -> Result<FetchOutcome>
where
    F: FnMut(u32, usize),
{
    let mut cache = CatalogCache::new();
    let mut pages = 0u32;
    let mut dropped = 0u32;
    let mut url = client.first_items_page_url(options.page_size);

    loop {
        let page = match fetch_page_with_retry(client, &url, options).await {
            Ok(page) => page,
            Err(ApiError::RateLimited { retries }) => {
                warn!(retries, "rate-limit retries exhausted, returning partial cache");
                return Ok(FetchOutcome {
                    cache,
                    complete: false,
                    pages,
                    dropped,
                });
            }
            Err(e) => return Err(e),
        };
        pages += 1;

        let ItemPage { attributes, items } = page;
        for item in items.into_vec() {
            match item.into_entry() {
                Some((upc, entry)) => cache.insert(upc, entry),
                None => dropped += 1,
            }
        }
        on_page(pages, cache.len());

        match attributes.next {
            Some(next) if !next.is_empty() => {
                url = next;
                sleep(options.page_delay).await;
            }
            _ => break,
        }
    }

    info!(entries = cache.len(), pages, dropped, "catalog fetch complete");
    Ok(FetchOutcome {
        cache,
        complete: true,
        pages,
        dropped,
    })
}

async fn fetch_page_with_retry(
    client: &mut ApiClient,
    url: &str,
    options: &FetchOptions,
) -> Result<ItemPage> {
    let mut attempts = 0u32;
    loop {
        let response = client.get_items_page(url).await?;
        if response.status() == StatusCode::TOO_MANY_REQUESTS {
            attempts += 1;
            if attempts > options.max_retries {
                return Err(ApiError::RateLimited {
                    retries: options.max_retries,
                });
            }
            warn!(attempt = attempts, "rate limited, backing off");
            sleep(options.backoff).await;
            continue;
        }
        let response = ApiClient::expect_success(response).await?;
        return Ok(response.json().await?);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_match_service_limits() {
        let options = FetchOptions::default();
        assert_eq!(options.page_size, 100);
        assert_eq!(options.max_retries, 3);
        assert_eq!(options.backoff, Duration::from_secs(2));
    }
}
