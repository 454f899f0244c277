//! Asmodee Canada invoice layout.
//!
//! Items print as a vertical block: a bare quantity line, the "EA" unit
//! marker, the SKU, wrapped description lines, then a price column and
//! an optional UPC further down. Column misalignment in the extracted
//! text makes the block boundaries heuristic, so every numeric field is
//! searched within a bounded window from the block start.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::invoice::{Distributor, InvoiceRecord, LineItem};
use crate::text;

use super::InvoiceParser;
use super::numeric::dotted_decimal;
use super::patterns::{
    ASMODEE_INVOICE_DATE, ASMODEE_INVOICE_NO, ASMODEE_PO_NUMBER, DOLLAR_PRICE, QUANTITY_LINE,
    UPC_LINE,
};

/// Offsets relative to the quantity line that opens a block.
const DESCRIPTION_START: usize = 3;
const MAX_DESCRIPTION_LINES: usize = 4;
const PRICE_WINDOW_END: usize = 10;
const UPC_WINDOW_END: usize = 15;

pub struct AsmodeeParser;

impl InvoiceParser for AsmodeeParser {
    fn distributor(&self) -> Distributor {
        Distributor::Asmodee
    }

    fn parse(&self, text: &str) -> InvoiceRecord {
        let mut record = InvoiceRecord::new(Distributor::Asmodee);
        record.invoice_number = ASMODEE_INVOICE_NO.captures(text).map(|c| c[1].to_string());
        record.invoice_date = ASMODEE_INVOICE_DATE
            .captures(text)
            .and_then(|c| c[1].parse().ok());
        record.po_number = ASMODEE_PO_NUMBER.captures(text).map(|c| c[1].to_string());

        let lines = text::lines(text);
        let mut i = 0;
        while i < lines.len() {
            if !block_starts_at(&lines, i) {
                i += 1;
                continue;
            }
            match scan_block(&lines, i) {
                Some((item, resume)) => {
                    debug!(
                        sku = item.sku.as_deref().unwrap_or(""),
                        quantity = %item.quantity,
                        "parsed item block"
                    );
                    record.items.push(item);
                    i = resume;
                }
                None => {
                    warn!(line = i, "skipping malformed item block");
                    i += 1;
                }
            }
        }
        record
    }
}

/// SeekingItemStart predicate: a bare quantity line followed by the
/// unit-of-measure marker opens a block.
fn block_starts_at(lines: &[&str], i: usize) -> bool {
    QUANTITY_LINE.is_match(lines[i]) && lines.get(i + 1).copied() == Some("EA")
}

/// Consume one item block starting at `start`. Returns the item and the
/// cursor position to resume scanning from.
fn scan_block(lines: &[&str], start: usize) -> Option<(LineItem, usize)> {
    let quantity: Decimal = lines[start].parse().ok()?;
    let sku = lines.get(start + 2)?.to_string();

    // ConsumingDescription: wrapped lines until the price column starts.
    let desc_start = start + DESCRIPTION_START;
    let desc_limit = (desc_start + MAX_DESCRIPTION_LINES).min(lines.len());
    let mut name_parts = Vec::new();
    for line in &lines[desc_start.min(lines.len())..desc_limit] {
        if line.starts_with('$') {
            break;
        }
        name_parts.push(*line);
    }
    let desc_end = desc_start + name_parts.len();
    let name = name_parts.join(" ").replace("  ", " ").trim().to_string();

    // ExtractingNumericFields: the first line-leading $n.nn token is the
    // unit price. Blocks with no visible price still emit at 0.
    let price_limit = (start + PRICE_WINDOW_END).min(lines.len());
    let mut unit_price = Decimal::ZERO;
    let mut price_idx = None;
    for j in desc_end..price_limit {
        if let Some(caps) = DOLLAR_PRICE.captures(lines[j]) {
            unit_price = dotted_decimal(&caps[1])?;
            price_idx = Some(j);
            break;
        }
    }

    // The first standalone 12-13 digit line after the price is the UPC.
    // UPCs are optional on this layout.
    let upc_from = price_idx.map(|j| j + 1).unwrap_or(desc_end);
    let upc_limit = (start + UPC_WINDOW_END).min(lines.len());
    let mut upc = None;
    let mut upc_idx = None;
    for j in upc_from..upc_limit {
        if UPC_LINE.is_match(lines[j]) {
            upc = Some(lines[j].to_string());
            upc_idx = Some(j);
            break;
        }
    }

    let resume = upc_idx
        .map(|j| j + 1)
        .or(price_idx.map(|j| j + 1))
        .unwrap_or(desc_end);

    let item = LineItem {
        sku: Some(sku),
        upc,
        name,
        quantity,
        unit_price,
        ..Default::default()
    };
    Some((item, resume))
}
