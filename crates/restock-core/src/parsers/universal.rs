//! Universal Distribution invoice layout.
//!
//! Item blocks are keyed by a standalone UPC line. The numeric tail
//! prints one field per line: tax rate, unit marker, quantity, unit
//! price, extended total. Any predicate failing mid-block abandons the
//! block and scanning resumes on the line after the UPC.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::invoice::{Distributor, InvoiceRecord, LineItem};
use crate::text;

use super::InvoiceParser;
use super::numeric::dotted_decimal;
use super::patterns::{
    DOLLAR_AMOUNT_LINE, QUANTITY_LINE, TAX_RATE_LINE, UNIVERSAL_INVOICE_DATE,
    UNIVERSAL_INVOICE_NO, UPC_LINE,
};

const MAX_DESCRIPTION_LINES: usize = 5;
const UNIT_MARKER: &str = "UNIT";

pub struct UniversalParser;

impl InvoiceParser for UniversalParser {
    fn distributor(&self) -> Distributor {
        Distributor::Universal
    }

    fn parse(&self, text: &str) -> InvoiceRecord {
        let mut record = InvoiceRecord::new(Distributor::Universal);
        record.invoice_number = UNIVERSAL_INVOICE_NO.captures(text).map(|c| c[1].to_string());
        record.invoice_date = UNIVERSAL_INVOICE_DATE
            .captures(text)
            .and_then(|c| c[1].parse().ok());

        let lines = text::lines(text);
        let mut i = 0;
        while i < lines.len() {
            if !UPC_LINE.is_match(lines[i]) {
                i += 1;
                continue;
            }
            match scan_block(&lines, i) {
                Some((item, resume)) => {
                    debug!(upc = lines[i], quantity = %item.quantity, "parsed item block");
                    record.items.push(item);
                    i = resume;
                }
                None => {
                    warn!(line = i, upc = lines[i], "abandoning malformed item block");
                    i += 1;
                }
            }
        }
        record
    }
}

/// Consume one UPC-keyed block. Returns the item and the position after
/// the extended-total line.
fn scan_block(lines: &[&str], start: usize) -> Option<(LineItem, usize)> {
    let upc = lines[start].to_string();

    // The SKU prints alone on the line after the UPC.
    let sku = *lines.get(start + 1)?;
    if sku.contains(char::is_whitespace) {
        return None;
    }

    // ConsumingDescription: wrapped lines until the tax-rate field opens
    // the numeric tail. Running into another UPC means the tail never
    // came and the block is bad.
    let mut j = start + 2;
    let mut name_parts: Vec<&str> = Vec::new();
    loop {
        let line = *lines.get(j)?;
        if TAX_RATE_LINE.is_match(line) {
            break;
        }
        if UPC_LINE.is_match(line) || name_parts.len() >= MAX_DESCRIPTION_LINES {
            return None;
        }
        name_parts.push(line);
        j += 1;
    }
    let name = name_parts.join(" ").trim().to_string();

    // ExtractingNumericFields: unit marker, quantity, unit price, total,
    // each on its own line.
    j += 1; // past the tax rate
    if *lines.get(j)? != UNIT_MARKER {
        return None;
    }
    j += 1;
    let quantity_line = *lines.get(j)?;
    if !QUANTITY_LINE.is_match(quantity_line) {
        return None;
    }
    let quantity: Decimal = quantity_line.parse().ok()?;
    j += 1;
    let unit_price = dotted_decimal(&DOLLAR_AMOUNT_LINE.captures(lines.get(j)?)?[1])?;
    j += 1;
    // Extended total: consumed so the cursor clears the block, not used.
    if lines.get(j).is_some_and(|l| DOLLAR_AMOUNT_LINE.is_match(l)) {
        j += 1;
    }

    let item = LineItem {
        sku: Some(sku.to_string()),
        upc: Some(upc),
        name,
        quantity,
        unit_price,
        ..Default::default()
    };
    Some((item, j))
}
