//! Groupe Randolph invoice layout.
//!
//! Product codes print in brackets with the description on the same
//! line; the quantity and unit price follow on the next two lines in
//! French decimal format. Freight lines carry a bracketed code too and
//! must not become order items.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::models::invoice::{Distributor, InvoiceRecord, LineItem};
use crate::text;

use super::InvoiceParser;
use super::numeric::comma_decimal;
use super::patterns::{
    RANDOLPH_CODE, RANDOLPH_INVOICE_DATE, RANDOLPH_INVOICE_NO, RANDOLPH_QUANTITY,
    RANDOLPH_UNIT_PRICE,
};

/// Bracket codes with this prefix are delivery fees, not products.
const FREIGHT_PREFIX: &str = "Frais";

pub struct RandolphParser;

impl InvoiceParser for RandolphParser {
    fn distributor(&self) -> Distributor {
        Distributor::Randolph
    }

    fn parse(&self, text: &str) -> InvoiceRecord {
        let mut record = InvoiceRecord::new(Distributor::Randolph);
        record.invoice_number = RANDOLPH_INVOICE_NO.captures(text).map(|c| c[1].to_string());
        record.invoice_date = RANDOLPH_INVOICE_DATE
            .captures(text)
            .and_then(|c| c[1].parse().ok());

        let lines = text::lines(text);
        let mut i = 0;
        while i < lines.len() {
            let line = lines[i];

            if let Some(caps) = RANDOLPH_CODE.captures(line) {
                let sku = caps[1].trim().to_string();
                let name = line[caps.get(0).unwrap().end()..].trim().to_string();

                // Quantity prints on the following line as "2,00"; an
                // unparsable line falls back to a single unit.
                let quantity = lines
                    .get(i + 1)
                    .and_then(|l| RANDOLPH_QUANTITY.captures(l))
                    .and_then(|c| comma_decimal(&c[1]))
                    .unwrap_or(Decimal::ONE);

                // Unit price two lines down, first comma-decimal token
                // only; a trailing MSRP value shares the line.
                let unit_price = lines
                    .get(i + 2)
                    .and_then(|l| RANDOLPH_UNIT_PRICE.captures(l))
                    .and_then(|c| comma_decimal(&c[1]))
                    .unwrap_or(Decimal::ZERO);

                if !sku.is_empty() && !sku.starts_with(FREIGHT_PREFIX) {
                    debug!(sku = %sku, quantity = %quantity, "parsed item line");
                    record.items.push(LineItem {
                        sku: Some(sku),
                        upc: None,
                        name,
                        quantity,
                        unit_price,
                        ..Default::default()
                    });
                } else {
                    warn!(code = %sku, "excluding non-product line");
                }
            }

            // Everything below the totals section is summary noise.
            if line.contains("Sous-total") || line.contains("Total") {
                break;
            }
            i += 1;
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    const FIXTURE: &str = "\
Groupe Randolph Inc.
Facture : INV/2025/06/1087
Date de la facture : 2025-06-26

[LKY AME-R02-FR] Améliorations Roll Player
2,00
27,0000 MSRP 39,99
[Frais Livraison] Livraison standard
1,00
15,0000
Sous-total
[GHO STL-01] Jamais atteint
9,00
99,0000
";

    #[test]
    fn test_single_item_fixture() {
        let record = RandolphParser.parse(FIXTURE);

        assert_eq!(record.invoice_number.as_deref(), Some("INV/2025/06/1087"));
        assert_eq!(record.invoice_date.unwrap().to_string(), "2025-06-26");

        // The freight line is excluded and scanning stops at the totals.
        assert_eq!(record.items.len(), 1);
        let item = &record.items[0];
        assert_eq!(item.sku.as_deref(), Some("LKY AME-R02-FR"));
        assert_eq!(item.upc, None);
        assert_eq!(item.name, "Améliorations Roll Player");
        assert_eq!(item.quantity, Decimal::from_str("2.00").unwrap());
        assert_eq!(item.unit_price, Decimal::from_str("27.0").unwrap());
    }

    #[test]
    fn test_french_quantity_parses_to_two() {
        let record = RandolphParser.parse("[AAA-1] Jeu\n2,00\n10,0000\n");
        assert_eq!(record.items[0].quantity, Decimal::from(2));
    }

    #[test]
    fn test_price_takes_leading_token_only() {
        let record = RandolphParser.parse("[AAA-1] Jeu\n1,00\n27,0000 MSRP 39,99\n");
        assert_eq!(record.items[0].unit_price, Decimal::from_str("27.0").unwrap());
    }

    #[test]
    fn test_freight_code_excluded() {
        let record = RandolphParser.parse("[Frais Livraison] Livraison\n1,00\n15,0000\n");
        assert!(record.items.is_empty());
    }

    #[test]
    fn test_missing_quantity_defaults_to_one() {
        let record = RandolphParser.parse("[BBB-2] Jeu sans compte\npas un nombre\n12,0000\n");
        assert_eq!(record.items[0].quantity, Decimal::ONE);
    }

    #[test]
    fn test_stops_at_totals_marker() {
        let record = RandolphParser.parse(FIXTURE);
        assert!(!record.items.iter().any(|i| i.sku.as_deref() == Some("GHO STL-01")));
    }
}
