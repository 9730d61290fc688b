//! Decimal formatting and parsing for displayed prices and sizes.

use std::str::FromStr;

use rust_decimal::Decimal;

/// Formats `value` with `precision` decimal places and `,` thousands separators.
pub fn format_decimal(value: Decimal, precision: u32) -> String {
    let rounded = value.round_dp(precision);
    let text = format!("{:.*}", precision as usize, rounded.abs());
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(text.len() + int_part.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

/// Parses a displayed number, ignoring thousands separators and padding.
///
/// # Errors
///
/// Returns [`DeskError::InvalidInput`](crate::DeskError::InvalidInput) if the
/// text is not a number or is negative.
pub fn parse_displayed(text: &str) -> crate::Result<Decimal> {
    let cleaned: String = text.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    let value = Decimal::from_str(&cleaned)
        .map_err(|e| crate::DeskError::InvalidInput(format!("{text:?} is not a number: {e}")))?;
    if value.is_sign_negative() && !value.is_zero() {
        return Err(crate::DeskError::InvalidInput(format!(
            "{text:?} must not be negative"
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_decimal(dec!(42150.5), 2), "42,150.50");
        assert_eq!(format_decimal(dec!(1234567), 0), "1,234,567");
        assert_eq!(format_decimal(dec!(999.999), 2), "1,000.00");
        assert_eq!(format_decimal(dec!(12), 3), "12.000");
    }

    #[test]
    fn keeps_sign() {
        assert_eq!(format_decimal(dec!(-1500.25), 1), "-1,500.2");
        assert_eq!(format_decimal(dec!(-0.001), 2), "0.00");
    }

    #[test]
    fn parses_with_separators() {
        assert_eq!(parse_displayed("42,150.50").unwrap(), dec!(42150.50));
        assert_eq!(parse_displayed(" 1,000 ").unwrap(), dec!(1000));
    }

    #[test]
    fn rejects_garbage_and_negatives() {
        assert!(parse_displayed("abc").is_err());
        assert!(parse_displayed("").is_err());
        assert!(parse_displayed("-5").is_err());
    }
}
