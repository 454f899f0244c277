//! HTTP client for the remote inventory service.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::auth::{Credentials, TokenEndpoint};
use crate::error::{ApiError, Result};
use crate::wire::{
    CreateItem, CreateOrder, CreateOrderLine, ItemEnvelope, ItemPage, OrderEnvelope,
    OrderLineEnvelope, RemoteItem, RemoteOrderLine, RemoteShop, ShopEnvelope, ShopPage,
};

/// Client over the inventory service's JSON endpoints.
///
/// Holds the refreshable credential: the first 401 of any request
/// triggers one in-place token refresh and a single replay; a second
/// 401 aborts that request's scope. All calls are sequential.
pub struct ApiClient {
    http: Client,
    base_url: String,
    account_id: String,
    endpoint: TokenEndpoint,
    credentials: Credentials,
}

impl ApiClient {
    pub fn new(
        base_url: impl Into<String>,
        account_id: impl Into<String>,
        endpoint: TokenEndpoint,
        credentials: Credentials,
    ) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            account_id: account_id.into(),
            endpoint,
            credentials,
        }
    }

    /// Current credential state, for persisting after a run.
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn account_url(&self, resource: &str) -> String {
        format!("{}/Account/{}/{resource}", self.base_url, self.account_id)
    }

    /// Send an authorized request; on 401, refresh the token once and
    /// replay the request.
    async fn send<F>(&mut self, build: F) -> Result<Response>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let response = build(&self.http)
            .bearer_auth(&self.credentials.access_token)
            .send()
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        warn!("credential rejected, refreshing token and retrying once");
        self.credentials.refresh(&self.http, &self.endpoint).await?;

        let retry = build(&self.http)
            .bearer_auth(&self.credentials.access_token)
            .send()
            .await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        Ok(retry)
    }

    /// 2xx passes through; anything else becomes a `Remote` error
    /// carrying the response body.
    pub(crate) async fn expect_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Remote {
            status: status.as_u16(),
            body,
        })
    }

    /// URL of the first item-listing page.
    pub fn first_items_page_url(&self, page_size: u32) -> String {
        format!("{}?limit={page_size}", self.account_url("Item.json"))
    }

    /// Fetch one item-listing page. `page_url` is either the first-page
    /// URL or a `next` link from a previous page. The raw response is
    /// returned so the caller can drive rate-limit retries.
    pub async fn get_items_page(&mut self, page_url: &str) -> Result<Response> {
        let url = page_url.to_string();
        debug!(url = %url, "fetching item page");
        self.send(|c| c.get(url.as_str())).await
    }

    /// Live lookup of a single item by UPC.
    pub async fn find_item_by_upc(&mut self, upc: &str) -> Result<Vec<RemoteItem>> {
        let url = self.account_url("Item.json");
        let response = self
            .send(|c| c.get(url.as_str()).query(&[("upc", upc)]))
            .await?;
        let response = Self::expect_success(response).await?;
        let page: ItemPage = response.json().await?;
        Ok(page.items.into_vec())
    }

    /// List all shops on the account.
    pub async fn list_shops(&mut self) -> Result<Vec<RemoteShop>> {
        let url = self.account_url("Shop.json");
        let response = self.send(|c| c.get(url.as_str())).await?;
        let response = Self::expect_success(response).await?;
        let page: ShopPage = response.json().await?;
        Ok(page.shops.into_vec())
    }

    /// Fetch one shop, for the archived guard.
    pub async fn get_shop(&mut self, shop_id: i64) -> Result<RemoteShop> {
        let url = self.account_url(&format!("Shop/{shop_id}.json"));
        let response = self.send(|c| c.get(url.as_str())).await?;
        let response = Self::expect_success(response).await?;
        let envelope: ShopEnvelope = response.json().await?;
        Ok(envelope.shop)
    }

    /// Create a purchase-order header; returns the new order id.
    pub async fn create_order(&mut self, order: &CreateOrder<'_>) -> Result<i64> {
        let url = self.account_url("Order.json");
        let response = self.send(|c| c.post(url.as_str()).json(order)).await?;
        let response = Self::expect_success(response).await?;
        let envelope: OrderEnvelope = response.json().await?;
        envelope
            .order
            .order_id
            .trim()
            .parse()
            .map_err(|_| ApiError::Malformed(format!("orderID '{}'", envelope.order.order_id)))
    }

    /// Create one order line on an existing order.
    pub async fn create_order_line(&mut self, line: &CreateOrderLine) -> Result<RemoteOrderLine> {
        let url = self.account_url("OrderLine.json");
        let response = self.send(|c| c.post(url.as_str()).json(line)).await?;
        let response = Self::expect_success(response).await?;
        let envelope: OrderLineEnvelope = response.json().await?;
        Ok(envelope.order_line)
    }

    /// Create a catalog item; returns the new item id.
    pub async fn create_item(&mut self, item: &CreateItem) -> Result<i64> {
        let url = self.account_url("Item.json");
        let response = self.send(|c| c.post(url.as_str()).json(item)).await?;
        let response = Self::expect_success(response).await?;
        let envelope: ItemEnvelope = response.json().await?;
        envelope
            .item
            .item_id
            .as_deref()
            .and_then(|id| id.trim().parse().ok())
            .ok_or_else(|| ApiError::Malformed("itemID missing from creation response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> ApiClient {
        ApiClient::new(
            "https://api.example/API/V3",
            "266086",
            TokenEndpoint {
                url: "https://auth.example/token".to_string(),
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
            },
            Credentials {
                access_token: "t".to_string(),
                refresh_token: "r".to_string(),
                expires_in: None,
            },
        )
    }

    #[test]
    fn test_account_url_shape() {
        let client = test_client();
        assert_eq!(
            client.account_url("Order.json"),
            "https://api.example/API/V3/Account/266086/Order.json"
        );
    }

    #[test]
    fn test_first_items_page_url() {
        let client = test_client();
        assert_eq!(
            client.first_items_page_url(100),
            "https://api.example/API/V3/Account/266086/Item.json?limit=100"
        );
    }
}
