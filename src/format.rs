//! Formatting helpers for price and location lines

/// Shown when every address component is empty
pub const LOCATION_FALLBACK: &str = "Location not specified";

const DEFAULT_CURRENCY: &str = "Dollar";

/// Format a price as "<currency> <amount>" with thousands separators.
///
/// The amount is rounded to a whole number; an empty currency code falls
/// back to the service default.
pub fn format_price(amount: f64, currency: &str) -> String {
    let currency = currency.trim();
    let currency = if currency.is_empty() { DEFAULT_CURRENCY } else { currency };

    let rounded = amount.round() as i64;
    let negative = rounded < 0;
    let digits = rounded.unsigned_abs().to_string();

    // Insert a separator every three digits from the least-significant end
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("{} -{}", currency, grouped)
    } else {
        format!("{} {}", currency, grouped)
    }
}

/// Join the non-empty address parts with ", ", or fall back to a fixed
/// placeholder when everything is empty.
pub fn format_location(address: &str, city: &str, state: &str, zip: &str) -> String {
    let parts: Vec<&str> = [address, city, state, zip]
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect();

    if parts.is_empty() {
        LOCATION_FALLBACK.to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_with_separator() {
        assert_eq!(format_price(550000.0, "Dollar"), "Dollar 550,000");
        assert_eq!(format_price(1250000.0, "AED"), "AED 1,250,000");
    }

    #[test]
    fn test_price_short() {
        assert_eq!(format_price(999.0, "Dollar"), "Dollar 999");
        assert_eq!(format_price(0.0, "Dollar"), "Dollar 0");
    }

    #[test]
    fn test_price_rounds() {
        assert_eq!(format_price(549999.6, "Dollar"), "Dollar 550,000");
    }

    #[test]
    fn test_price_default_currency() {
        assert_eq!(format_price(1000.0, ""), "Dollar 1,000");
        assert_eq!(format_price(1000.0, "  "), "Dollar 1,000");
    }

    #[test]
    fn test_location_skips_empty_parts() {
        assert_eq!(
            format_location("123 Main St", "Springfield", "", "12345"),
            "123 Main St, Springfield, 12345"
        );
    }

    #[test]
    fn test_location_all_empty() {
        assert_eq!(format_location("", "", "", ""), LOCATION_FALLBACK);
        assert_eq!(format_location(" ", "", "  ", ""), LOCATION_FALLBACK);
    }

    #[test]
    fn test_location_full() {
        assert_eq!(
            format_location("1 Harbor Rd", "Dubai", "Dubai", "00000"),
            "1 Harbor Rd, Dubai, Dubai, 00000"
        );
    }
}
