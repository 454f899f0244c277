//! CLI subcommands.

pub mod backfill;
pub mod cache;
pub mod order;
pub mod scan;
pub mod shops;

use std::path::Path;

use anyhow::Context;

use restock_api::{ApiClient, Credentials, TokenEndpoint};
use restock_core::RestockConfig;

pub(crate) fn load_config(path: Option<&str>) -> anyhow::Result<RestockConfig> {
    match path {
        Some(p) => RestockConfig::from_file(Path::new(p)).with_context(|| format!("loading config {p}")),
        None => Ok(RestockConfig::default()),
    }
}

pub(crate) fn build_client(config: &RestockConfig) -> anyhow::Result<ApiClient> {
    let credentials = Credentials::load(&config.files.tokens_file).with_context(|| {
        format!(
            "loading credentials from {} (copy a token file there or point the config at one)",
            config.files.tokens_file.display()
        )
    })?;
    let endpoint = TokenEndpoint {
        url: config.api.token_url.clone(),
        client_id: config.api.client_id.clone(),
        client_secret: config.api.client_secret.clone(),
    };
    Ok(ApiClient::new(
        config.api.base_url.clone(),
        config.api.account_id.clone(),
        endpoint,
        credentials,
    ))
}

/// The token may have been refreshed mid-run; write it back so the next
/// run starts with a working credential.
pub(crate) fn persist_credentials(client: &ApiClient, config: &RestockConfig) {
    if let Err(e) = client.credentials().save(&config.files.tokens_file) {
        tracing::warn!(error = %e, "could not persist refreshed credentials");
    }
}
