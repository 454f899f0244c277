//! Regex patterns for distributor invoice extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Shared line-shape predicates
    pub static ref QUANTITY_LINE: Regex = Regex::new(r"^\d+$").unwrap();

    pub static ref UPC_LINE: Regex = Regex::new(r"^\d{12,13}$").unwrap();

    pub static ref DOLLAR_PRICE: Regex = Regex::new(r"^\$(\d+\.\d{2})").unwrap();

    pub static ref DOLLAR_AMOUNT_LINE: Regex = Regex::new(r"^\$?(\d+\.\d{2})$").unwrap();

    pub static ref TAX_RATE_LINE: Regex = Regex::new(r"^\d+\.\d{2}$").unwrap();

    // Asmodee headers (French layout)
    pub static ref ASMODEE_INVOICE_NO: Regex = Regex::new(
        r"N\s*[°o]*\s*de\s*facture\s*\n?(\S+)"
    ).unwrap();

    pub static ref ASMODEE_INVOICE_DATE: Regex = Regex::new(
        r"Date de facture\s*\n?(\d{4}-\d{2}-\d{2})"
    ).unwrap();

    pub static ref ASMODEE_PO_NUMBER: Regex = Regex::new(
        r"# de bon de Commande\s*(\S+)"
    ).unwrap();

    // Universal headers
    pub static ref UNIVERSAL_INVOICE_NO: Regex = Regex::new(
        r"Invoice\s*No[:\s]*\n?(SINV-\d+)"
    ).unwrap();

    pub static ref UNIVERSAL_INVOICE_DATE: Regex = Regex::new(
        r"Date[:\s]*\n?(\d{4}-\d{2}-\d{2})"
    ).unwrap();

    // ÎLO headers and item rows (accent-aware)
    pub static ref ILO_INVOICE_NO: Regex = Regex::new(
        r"Facture\s*-\s*\n?(FC\d+)"
    ).unwrap();

    pub static ref ILO_INVOICE_DATE: Regex = Regex::new(
        r"Date\s*\n?(\d{4}-\d{2}-\d{2})"
    ).unwrap();

    pub static ref ILO_PO_NUMBER: Regex = Regex::new(
        r"Votre n[ºo°]\s*de commande\s*(\S+)"
    ).unwrap();

    // SKU, name, throwaway decimal, ordered/shipped/backordered triplet,
    // comma-decimal unit price.
    pub static ref ILO_ITEM: Regex = Regex::new(
        r"(?P<sku>[A-Z0-9\-]+)\s+(?P<name>[A-Za-z0-9 :\-\(\)\[\]'/éÉèÈàÀêÊçÇ]+)\s+\d+\.\d{2}\s+(?P<ordered>\d+)\s+(?P<shipped>\d+)\s+(?P<backordered>\d+)\s+(?P<unit_price>\d{1,3},\d{2})"
    ).unwrap();

    // Randolph headers and item lines (French decimals)
    pub static ref RANDOLPH_INVOICE_NO: Regex = Regex::new(
        r"Facture\s*:\s*(INV/\d{4}/\d{2}/\d+)"
    ).unwrap();

    pub static ref RANDOLPH_INVOICE_DATE: Regex = Regex::new(
        r"Date de la facture\s*:\s*(\d{4}-\d{2}-\d{2})"
    ).unwrap();

    pub static ref RANDOLPH_CODE: Regex = Regex::new(
        r"\[([A-Za-z0-9\s\-]+)\]"
    ).unwrap();

    pub static ref RANDOLPH_QUANTITY: Regex = Regex::new(
        r"^(\d+,\d{2})$"
    ).unwrap();

    // Only the leading token counts; an MSRP value may share the line.
    pub static ref RANDOLPH_UNIT_PRICE: Regex = Regex::new(
        r"^(\d+,\d{4})"
    ).unwrap();

    // Quad Source headers and item lines
    pub static ref QUAD_INVOICE_NO: Regex = Regex::new(
        r"NUMBER\s+(\d+)"
    ).unwrap();

    pub static ref QUAD_INVOICE_DATE: Regex = Regex::new(
        r"DATE\s+([A-Za-z]+\s+\d+,\s+\d{4})"
    ).unwrap();

    pub static ref QUAD_PART_NUMBER: Regex = Regex::new(
        r"^([A-Z0-9\-\.]{5,})"
    ).unwrap();

    // Quantity, backorder, unit price, extended price on one line.
    pub static ref QUAD_NUMERIC_FIELDS: Regex = Regex::new(
        r"^\s*(\d+)\s+(\d+)\s+(\d+\.\d{1,2})\s+(\d+\.\d{1,2})\s*$"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_shapes() {
        assert!(QUANTITY_LINE.is_match("3"));
        assert!(!QUANTITY_LINE.is_match("3 EA"));
        assert!(UPC_LINE.is_match("889696012345"));
        assert!(UPC_LINE.is_match("3770010764014"));
        assert!(!UPC_LINE.is_match("12345"));
        assert!(DOLLAR_PRICE.is_match("$26.99"));
        assert!(!DOLLAR_PRICE.is_match("26.99"));
    }

    #[test]
    fn test_asmodee_headers_span_newlines() {
        let text = "N° de facture\nINV-889001\nDate de facture\n2025-06-01";
        assert_eq!(&ASMODEE_INVOICE_NO.captures(text).unwrap()[1], "INV-889001");
        assert_eq!(&ASMODEE_INVOICE_DATE.captures(text).unwrap()[1], "2025-06-01");
    }

    #[test]
    fn test_randolph_price_ignores_trailing_msrp() {
        let caps = RANDOLPH_UNIT_PRICE.captures("27,0000 MSRP 39,99").unwrap();
        assert_eq!(&caps[1], "27,0000");
    }

    #[test]
    fn test_quad_numeric_fields() {
        let caps = QUAD_NUMERIC_FIELDS.captures("2 0 89.99 179.98").unwrap();
        assert_eq!(&caps[1], "2");
        assert_eq!(&caps[2], "0");
        assert_eq!(&caps[3], "89.99");
        assert!(!QUAD_NUMERIC_FIELDS.is_match("2 0 89.99 179.98 extra"));
    }
}
