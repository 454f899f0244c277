//! ÎLO invoice layout.
//!
//! Items print one per row, so a single accent-aware pattern pulls the
//! whole line apart. The ordered/shipped/backordered triplet reports
//! partial fulfillment; rows with nothing shipped are dropped and the
//! shipped count becomes the order quantity.

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::invoice::{Distributor, InvoiceRecord, LineItem};

use super::InvoiceParser;
use super::numeric::comma_decimal;
use super::patterns::{ILO_INVOICE_DATE, ILO_INVOICE_NO, ILO_ITEM, ILO_PO_NUMBER};

pub struct IloParser;

impl InvoiceParser for IloParser {
    fn distributor(&self) -> Distributor {
        Distributor::Ilo
    }

    fn parse(&self, text: &str) -> InvoiceRecord {
        let mut record = InvoiceRecord::new(Distributor::Ilo);
        record.invoice_number = ILO_INVOICE_NO.captures(text).map(|c| c[1].to_string());
        record.invoice_date = ILO_INVOICE_DATE
            .captures(text)
            .and_then(|c| c[1].parse().ok());
        record.po_number = ILO_PO_NUMBER.captures(text).map(|c| c[1].to_string());

        for caps in ILO_ITEM.captures_iter(text) {
            let (Ok(ordered), Ok(shipped), Ok(backordered)) = (
                caps["ordered"].parse::<u32>(),
                caps["shipped"].parse::<u32>(),
                caps["backordered"].parse::<u32>(),
            ) else {
                continue;
            };
            let Some(unit_price) = comma_decimal(&caps["unit_price"]) else {
                continue;
            };

            // Backordered-only rows ship nothing and must not be ordered.
            if shipped == 0 {
                debug!(sku = &caps["sku"], "dropping row with zero shipped");
                continue;
            }

            record.items.push(LineItem {
                sku: Some(caps["sku"].to_string()),
                upc: None,
                name: caps["name"].trim().to_string(),
                quantity: Decimal::from(shipped),
                unit_price,
                quantity_ordered: Some(ordered),
                quantity_shipped: Some(shipped),
                quantity_backordered: Some(backordered),
            });
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
ÎLO jeux et jouets
ilo307.com
Facture -
FC3301
Date
2025-04-22
Votre nº de commande WEB-1203

Code Description Prix Qté Exp. B.O. Prix unitaire
PLG1234 Pillards de la Mer du Nord 45.99 3 3 0 27,99
ABC-99 Jeu Épique : Forteresse 12.00 2 0 2 15,50
";

    #[test]
    fn test_single_shipped_item() {
        let record = IloParser.parse(FIXTURE);

        assert_eq!(record.invoice_number.as_deref(), Some("FC3301"));
        assert_eq!(record.invoice_date.unwrap().to_string(), "2025-04-22");
        assert_eq!(record.po_number.as_deref(), Some("WEB-1203"));

        // The backordered-only row is excluded.
        assert_eq!(record.items.len(), 1);
        let item = &record.items[0];
        assert_eq!(item.sku.as_deref(), Some("PLG1234"));
        assert_eq!(item.name, "Pillards de la Mer du Nord");
        assert_eq!(item.quantity, Decimal::from(3));
        assert_eq!(item.quantity_ordered, Some(3));
        assert_eq!(item.quantity_shipped, Some(3));
        assert_eq!(item.quantity_backordered, Some(0));
        assert_eq!(item.unit_price, Decimal::from_str("27.99").unwrap());
    }

    #[test]
    fn test_shipped_zero_always_excluded() {
        for (ordered, shipped, backordered) in [(2, 0, 2), (5, 0, 5), (1, 0, 1)] {
            let row = format!("SKU-1 Jeu Test 10.00 {ordered} {shipped} {backordered} 9,99\n");
            let record = IloParser.parse(&row);
            assert!(record.items.is_empty(), "shipped=0 row must be dropped");
        }
    }

    #[test]
    fn test_shipped_positive_included_with_parsed_value() {
        for shipped in [1u32, 2, 7] {
            let row = format!("SKU-1 Jeu Test 10.00 8 {shipped} 0 9,99\n");
            let record = IloParser.parse(&row);
            assert_eq!(record.items.len(), 1);
            assert_eq!(record.items[0].quantity_shipped, Some(shipped));
            assert_eq!(record.items[0].quantity, Decimal::from(shipped));
        }
    }

    #[test]
    fn test_comma_decimal_price() {
        let record = IloParser.parse("GME-7 Jeu du Phare 30.00 1 1 0 102,50\n");
        assert_eq!(
            record.items[0].unit_price,
            Decimal::from_str("102.50").unwrap()
        );
    }

    #[test]
    fn test_partial_shipment_quantity_uses_shipped() {
        let record = IloParser.parse("GME-8 Aventure Nordique 20.00 6 4 2 18,25\n");
        let item = &record.items[0];
        assert_eq!(item.quantity, Decimal::from(4));
        assert_eq!(item.quantity_ordered, Some(6));
        assert_eq!(item.quantity_backordered, Some(2));
    }
}
