//! Wire types for the remote inventory service.
//!
//! The service envelopes payloads under resource-name keys, returns a
//! lone object where a one-element list would be expected, reports
//! pagination under `@attributes`, and sends numeric ids as strings.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use restock_core::models::catalog::CatalogEntry;

/// Lists with a single result arrive as a bare object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(v) => v,
            OneOrMany::One(x) => vec![x],
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

/// Pagination metadata riding under `@attributes`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageAttributes {
    #[serde(default)]
    pub count: Option<String>,

    /// Absolute URL of the next page, absent on the last one.
    #[serde(default)]
    pub next: Option<String>,
}

/// One page of the item listing.
#[derive(Debug, Deserialize)]
pub struct ItemPage {
    #[serde(rename = "@attributes", default)]
    pub attributes: PageAttributes,

    #[serde(rename = "Item", default)]
    pub items: OneOrMany<RemoteItem>,
}

/// An inventory item as the service returns it.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteItem {
    #[serde(rename = "itemID", default)]
    pub item_id: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub upc: Option<String>,

    #[serde(rename = "customSku", default)]
    pub custom_sku: Option<String>,

    #[serde(rename = "systemSku", default)]
    pub system_sku: Option<String>,

    #[serde(rename = "manufacturerSku", default)]
    pub manufacturer_sku: Option<String>,

    #[serde(rename = "defaultCost", default)]
    pub default_cost: Option<String>,

    #[serde(default)]
    pub price: Option<String>,

    #[serde(rename = "categoryID", default)]
    pub category_id: Option<String>,

    #[serde(default)]
    pub archived: Option<String>,

    #[serde(rename = "ItemShops", default)]
    pub item_shops: Option<ItemShops>,

    #[serde(rename = "Tags", default)]
    pub tags: Option<TagList>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ItemShops {
    #[serde(rename = "ItemShop", default)]
    pub item_shop: Option<OneOrMany<ItemShop>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemShop {
    #[serde(default)]
    pub price: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagList {
    #[serde(rename = "Tag", default)]
    pub tag: Option<OneOrMany<Tag>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    #[serde(default)]
    pub name: Option<String>,
}

impl RemoteItem {
    /// The retail price: top-level when present, else the first shop's.
    fn resolved_price(&self) -> Option<Decimal> {
        if let Some(price) = self.price.as_deref().and_then(parse_decimal) {
            return Some(price);
        }
        self.item_shops
            .as_ref()?
            .item_shop
            .clone()?
            .into_vec()
            .into_iter()
            .find_map(|s| s.price.as_deref().and_then(parse_decimal))
    }

    /// Convert to a cache entry, keyed by UPC when the item has one.
    /// Items without an internal id are useless and yield `None`.
    pub fn into_entry(self) -> Option<(Option<String>, CatalogEntry)> {
        let item_id = self.item_id.as_deref()?.trim().parse::<i64>().ok()?;
        let price = self.resolved_price();
        let cost = self.default_cost.as_deref().and_then(parse_decimal);
        let category_id = self.category_id.as_deref().and_then(|s| s.parse().ok());
        let archived = flag(self.archived.as_deref());
        let tags = self
            .tags
            .and_then(|t| t.tag)
            .map(|t| t.into_vec().into_iter().filter_map(|t| t.name).collect())
            .unwrap_or_default();

        let entry = CatalogEntry {
            item_id,
            description: self.description.unwrap_or_default(),
            cost,
            price,
            sku: self.custom_sku.or(self.system_sku),
            manufacturer_sku: self.manufacturer_sku,
            category_id,
            archived,
            tags,
        };
        Some((self.upc.filter(|u| !u.is_empty()), entry))
    }
}

fn parse_decimal(s: &str) -> Option<Decimal> {
    s.trim().parse().ok()
}

/// The service sends booleans as strings.
fn flag(s: Option<&str>) -> bool {
    matches!(s, Some("true") | Some("True") | Some("1"))
}

/// Purchase-order creation request.
#[derive(Debug, Serialize)]
pub struct CreateOrder<'a> {
    #[serde(rename = "vendorID")]
    pub vendor_id: i64,

    #[serde(rename = "shopID")]
    pub shop_id: i64,

    #[serde(rename = "shipCost")]
    pub ship_cost: Decimal,

    #[serde(rename = "refNum", skip_serializing_if = "Option::is_none")]
    pub reference: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
pub struct OrderEnvelope {
    #[serde(rename = "Order")]
    pub order: RemoteOrder,
}

#[derive(Debug, Deserialize)]
pub struct RemoteOrder {
    #[serde(rename = "orderID")]
    pub order_id: String,
}

/// Order-line creation request.
#[derive(Debug, Serialize)]
pub struct CreateOrderLine {
    pub quantity: Decimal,

    pub price: Decimal,

    #[serde(rename = "originalPrice")]
    pub original_price: Decimal,

    #[serde(rename = "numReceived")]
    pub num_received: u32,

    #[serde(rename = "itemID")]
    pub item_id: i64,

    #[serde(rename = "orderID")]
    pub order_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct OrderLineEnvelope {
    #[serde(rename = "OrderLine")]
    pub order_line: RemoteOrderLine,
}

#[derive(Debug, Deserialize)]
pub struct RemoteOrderLine {
    #[serde(rename = "orderLineID", default)]
    pub order_line_id: Option<String>,
}

/// Item creation request, for the unmatched-queue backfill.
#[derive(Debug, Serialize)]
pub struct CreateItem {
    pub description: String,

    #[serde(rename = "defaultCost")]
    pub default_cost: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub upc: Option<String>,

    #[serde(rename = "manufacturerSku", skip_serializing_if = "Option::is_none")]
    pub manufacturer_sku: Option<String>,

    pub discountable: bool,

    pub tax: bool,

    #[serde(rename = "itemType")]
    pub item_type: String,

    pub serialized: bool,

    #[serde(rename = "publishToEcom")]
    pub publish_to_ecom: bool,

    #[serde(rename = "categoryID", skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,

    #[serde(rename = "taxClassID")]
    pub tax_class_id: i64,

    #[serde(rename = "defaultVendorID", skip_serializing_if = "Option::is_none")]
    pub default_vendor_id: Option<i64>,

    #[serde(rename = "Tags")]
    pub tags: CreateTags,
}

#[derive(Debug, Serialize)]
pub struct CreateTags {
    #[serde(rename = "Tag")]
    pub tag: Vec<CreateTag>,
}

#[derive(Debug, Serialize)]
pub struct CreateTag {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ItemEnvelope {
    #[serde(rename = "Item")]
    pub item: RemoteItem,
}

/// Shop listing, for the archived-shop guard.
#[derive(Debug, Deserialize)]
pub struct ShopPage {
    #[serde(rename = "Shop", default)]
    pub shops: OneOrMany<RemoteShop>,
}

#[derive(Debug, Deserialize)]
pub struct ShopEnvelope {
    #[serde(rename = "Shop")]
    pub shop: RemoteShop,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteShop {
    #[serde(rename = "shopID", default)]
    pub shop_id: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub archived: Option<String>,
}

impl RemoteShop {
    pub fn is_archived(&self) -> bool {
        flag(self.archived.as_deref())
    }
}
