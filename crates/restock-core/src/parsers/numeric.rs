//! Locale-tolerant numeric parsing for vendor invoices.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Parse a comma-decimal amount as printed on French-locale invoices
/// ("2,00" → 2.00, "27,0000" → 27.0).
pub fn comma_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(&s.trim().replace(',', ".")).ok()
}

/// Parse a plain dotted decimal.
pub fn dotted_decimal(s: &str) -> Option<Decimal> {
    Decimal::from_str(s.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_decimal() {
        assert_eq!(comma_decimal("2,00"), Some(Decimal::from(2)));
        assert_eq!(comma_decimal("27,0000"), Some(Decimal::from(27)));
        assert_eq!(
            comma_decimal("15,50"),
            Some(Decimal::from_str("15.5").unwrap())
        );
        assert_eq!(comma_decimal("abc"), None);
    }

    #[test]
    fn test_dotted_decimal() {
        assert_eq!(dotted_decimal(" 31.50 "), Some(Decimal::from_str("31.5").unwrap()));
        assert_eq!(dotted_decimal(""), None);
    }
}
