//! Invoice data models shared by the distributor parsers.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Distributors with a dedicated invoice layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Distributor {
    /// Asmodee Canada (French-language layout, vertical item blocks).
    Asmodee,
    /// Universal Distribution (UPC-keyed blocks, one field per line).
    Universal,
    /// ÎLO (single-row items, partial-fulfillment columns).
    Ilo,
    /// Groupe Randolph Inc. (bracketed codes, French decimals).
    Randolph,
    /// Quad Source Canada (part-number blocks with a numeric tail line).
    QuadSource,
}

impl Distributor {
    /// Name as printed on the vendor's letterhead.
    pub fn display_name(&self) -> &'static str {
        match self {
            Distributor::Asmodee => "Asmodee Canada",
            Distributor::Universal => "Universal Distribution",
            Distributor::Ilo => "ÎLO",
            Distributor::Randolph => "Groupe Randolph Inc.",
            Distributor::QuadSource => "Quad Source",
        }
    }
}

impl std::fmt::Display for Distributor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A single line item extracted from an invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineItem {
    /// Vendor- or store-assigned stock keeping unit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// 12-13 digit universal product code.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upc: Option<String>,

    /// Product description, unwrapped to a single line.
    pub name: String,

    /// Quantity on the invoice. Fractional for vendors that print
    /// quantities as decimals.
    pub quantity: Decimal,

    /// Unit price in invoice currency.
    pub unit_price: Decimal,

    /// Quantity originally ordered, for vendors that report it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_ordered: Option<u32>,

    /// Quantity actually shipped, for vendors with partial fulfillment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_shipped: Option<u32>,

    /// Quantity placed on backorder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_backordered: Option<u32>,
}

impl LineItem {
    /// An item can drive catalog resolution only if it carries an
    /// identifier.
    pub fn is_actionable(&self) -> bool {
        self.sku.as_deref().is_some_and(|s| !s.is_empty())
            || self.upc.as_deref().is_some_and(|u| !u.is_empty())
    }

    /// Key used to deduplicate items across documents: SKU when
    /// present, UPC otherwise.
    pub fn merge_key(&self) -> Option<&str> {
        self.sku
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.upc.as_deref().filter(|u| !u.is_empty()))
    }
}

/// Structured result of parsing one invoice document. Immutable once
/// produced by a parser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Which distributor's layout produced this record.
    pub distributor: Distributor,

    /// Invoice number as printed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Invoice date, normalized to ISO-8601.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_date: Option<NaiveDate>,

    /// Purchase order reference, for vendors that echo it back.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub po_number: Option<String>,

    /// Line items in document order.
    pub items: Vec<LineItem>,
}

impl InvoiceRecord {
    /// A fresh record for one document, header fields unset.
    pub fn new(distributor: Distributor) -> Self {
        Self {
            distributor,
            invoice_number: None,
            invoice_date: None,
            po_number: None,
            items: Vec::new(),
        }
    }

    /// Data issues worth reporting before the record drives an order.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.invoice_number.is_none() {
            issues.push("Missing invoice number".to_string());
        }

        if self.items.is_empty() {
            issues.push("No line items".to_string());
        }

        let unidentified = self.items.iter().filter(|i| !i.is_actionable()).count();
        if unidentified > 0 {
            issues.push(format!("{} item(s) carry neither SKU nor UPC", unidentified));
        }

        let unpriced = self
            .items
            .iter()
            .filter(|i| i.unit_price == Decimal::ZERO)
            .count();
        if unpriced > 0 {
            issues.push(format!("{} item(s) have no unit price", unpriced));
        }

        issues
    }
}
