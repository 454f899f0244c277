//! Quad Source Canada invoice layout.
//!
//! Items open with a part-number token at the start of a line. The
//! description wraps across following lines (serial numbers included)
//! until a strict four-field numeric line closes the block: quantity,
//! backorder, unit price, extended price. The first summary keyword
//! anywhere ends scanning for the whole document.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::invoice::{Distributor, InvoiceRecord, LineItem};
use crate::text;

use super::InvoiceParser;
use super::numeric::dotted_decimal;
use super::patterns::{QUAD_INVOICE_DATE, QUAD_INVOICE_NO, QUAD_NUMERIC_FIELDS, QUAD_PART_NUMBER};

/// Any of these anywhere in a line means the totals section started.
const STOP_KEYWORDS: [&str; 7] = [
    "SUBTOTAL", "TOTAL", "BALANCE", "HST", "GST", "CANADIAN", "FREIGHT",
];

/// Line-leading tokens that are layout furniture, never items.
const SKIP_PREFIXES: [&str; 15] = [
    "INVOICE",
    "NUMBER",
    "CUSTOMER",
    "QUAD SOURCE",
    "HTTP",
    "BILL TO",
    "SHIP TO",
    "DATE",
    "ORDER",
    "REQ.",
    "BO",
    "PRICE",
    "EXTENDED",
    "PART NUMBER",
    "DESCRIPTION",
];

/// How far past a part number the numeric line may trail.
const LOOKAHEAD_LIMIT: usize = 10;

pub struct QuadSourceParser;

impl InvoiceParser for QuadSourceParser {
    fn distributor(&self) -> Distributor {
        Distributor::QuadSource
    }

    fn parse(&self, text: &str) -> InvoiceRecord {
        let mut record = InvoiceRecord::new(Distributor::QuadSource);
        record.invoice_number = QUAD_INVOICE_NO.captures(text).map(|c| c[1].to_string());
        record.invoice_date = QUAD_INVOICE_DATE
            .captures(text)
            .and_then(|c| parse_long_date(&c[1]));

        let lines = text::lines(text);
        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];
            let upper = line.to_uppercase();

            if STOP_KEYWORDS.iter().any(|k| upper.contains(k)) {
                debug!(line = i, "summary section reached, scan stopped");
                break;
            }
            if SKIP_PREFIXES.iter().any(|p| upper.starts_with(p)) {
                i += 1;
                continue;
            }
            let Some(part_number) = part_number(line) else {
                i += 1;
                continue;
            };

            // ConsumingDescription: accumulate wrapped lines until the
            // numeric fields close the block. Lines shaped like a new
            // part number are never description text.
            let mut name_parts: Vec<&str> = Vec::new();
            let rest = line[part_number.len()..].trim();
            if !rest.is_empty() {
                name_parts.push(rest);
            }

            let mut numeric = None;
            let mut j = 1;
            while i + j < lines.len() && j < LOOKAHEAD_LIMIT {
                let next = lines[i + j];
                if let Some(caps) = QUAD_NUMERIC_FIELDS.captures(next) {
                    numeric = extract_numeric_fields(&caps);
                    break;
                }
                if !QUAD_PART_NUMBER.is_match(next) {
                    name_parts.push(next);
                }
                j += 1;
            }

            let name = name_parts.join(" ").trim().to_string();
            match numeric {
                Some((quantity, backordered, unit_price)) if !name.is_empty() => {
                    debug!(part_number, quantity, "parsed item block");
                    record.items.push(LineItem {
                        sku: Some(part_number.to_string()),
                        upc: None,
                        name,
                        quantity: Decimal::from(quantity),
                        unit_price,
                        quantity_backordered: Some(backordered),
                        ..Default::default()
                    });
                }
                _ => warn!(part_number, "no numeric fields for part, block dropped"),
            }
            i += j + 1;
        }
        record
    }
}

/// A part number leads the line, is at least five characters of
/// uppercase alphanumerics, and must contain a letter plus a digit or
/// hyphen; bare words and bare numbers are not products.
fn part_number(line: &str) -> Option<&str> {
    let caps = QUAD_PART_NUMBER.captures(line)?;
    let token = caps.get(1)?.as_str();
    let has_letter = token.chars().any(|c| c.is_ascii_uppercase());
    let has_digit_or_dash = token.chars().any(|c| c.is_ascii_digit() || c == '-');
    (has_letter && has_digit_or_dash).then_some(token)
}

fn extract_numeric_fields(caps: &regex::Captures<'_>) -> Option<(u32, u32, Decimal)> {
    let quantity = caps[1].parse().ok()?;
    let backordered = caps[2].parse().ok()?;
    let unit_price = dotted_decimal(&caps[3])?;
    Some((quantity, backordered, unit_price))
}

fn parse_long_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%B %d, %Y")
        .or_else(|_| NaiveDate::parse_from_str(s, "%b %d, %Y"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const FIXTURE: &str = "\
QUAD SOURCE CANADA INC.
http://www.quadsource.example
NUMBER 0000244392
DATE July 30, 2025
BILL TO 1234 Main St
PART NUMBER DESCRIPTION
SNK-NG2025 NEO GEO MINI CONSOLE
with Arcade Stick Bundle
2 0 89.99 179.98
CBL-HD20A HDMI CABLE 2M
1 1 9.99 9.99
SUBTOTAL 189.97
GHO-ST999 NEVER PARSED
3 0 1.00 3.00
";

    #[test]
    fn test_fixture_items() {
        let record = QuadSourceParser.parse(FIXTURE);

        assert_eq!(record.invoice_number.as_deref(), Some("0000244392"));
        assert_eq!(record.invoice_date.unwrap().to_string(), "2025-07-30");

        assert_eq!(record.items.len(), 2);

        let first = &record.items[0];
        assert_eq!(first.sku.as_deref(), Some("SNK-NG2025"));
        assert_eq!(first.name, "NEO GEO MINI CONSOLE with Arcade Stick Bundle");
        assert_eq!(first.quantity, Decimal::from(2));
        assert_eq!(first.quantity_backordered, Some(0));
        assert_eq!(first.unit_price, Decimal::from_str("89.99").unwrap());

        let second = &record.items[1];
        assert_eq!(second.sku.as_deref(), Some("CBL-HD20A"));
        assert_eq!(second.quantity_backordered, Some(1));
    }

    #[test]
    fn test_scan_stops_at_summary_keyword() {
        let record = QuadSourceParser.parse(FIXTURE);
        assert!(!record.items.iter().any(|i| i.sku.as_deref() == Some("GHO-ST999")));
    }

    #[test]
    fn test_bare_word_is_not_a_part_number() {
        assert!(part_number("INTERNATIONAL EDITION").is_none());
        assert!(part_number("12345 67").is_none());
        assert_eq!(part_number("ABC-1 desc"), Some("ABC-1"));
        assert_eq!(part_number("AB123X"), Some("AB123X"));
    }

    #[test]
    fn test_abbreviated_month_date() {
        assert_eq!(parse_long_date("Jul 30, 2025").unwrap().to_string(), "2025-07-30");
        assert!(parse_long_date("garbage").is_none());
    }

    #[test]
    fn test_part_without_numeric_line_dropped() {
        let text = "ZZZ-11 LOST ITEM\nno numbers here at all\n";
        let record = QuadSourceParser.parse(text);
        assert!(record.items.is_empty());
    }
}
