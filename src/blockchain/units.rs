use std::num::IntErrorKind;

use thiserror::Error;

/// Number of wei in one ether
pub const WEI_PER_ETHER: f64 = 1e18;

#[derive(Error, Debug, PartialEq)]
pub enum ConversionError {
    #[error("Invalid hex quantity '{value}': {reason}")]
    InvalidHex { value: String, reason: String },
}

/// Parse a hex wei quantity into a signed 64-bit integer.
///
/// Quantities above `i64::MAX` saturate at `i64::MAX` (and below `i64::MIN`
/// at `i64::MIN`). This is a precision ceiling of the conversion, not an
/// error: transfers larger than roughly 9.22 ether are reported as 9.22.
pub fn parse_wei_hex(wei_hex: &str) -> Result<i64, ConversionError> {
    let digits = wei_hex.strip_prefix("0x").unwrap_or(wei_hex);

    match i64::from_str_radix(digits, 16) {
        Ok(wei) => Ok(wei),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Ok(i64::MAX),
            IntErrorKind::NegOverflow => Ok(i64::MIN),
            _ => Err(ConversionError::InvalidHex {
                value: wei_hex.to_string(),
                reason: e.to_string(),
            }),
        },
    }
}

/// Convert a hex wei quantity to a decimal ether string with six fractional digits.
pub fn wei_hex_to_ether(wei_hex: &str) -> Result<String, ConversionError> {
    let wei = parse_wei_hex(wei_hex)?;
    Ok(format_ether(wei))
}

pub fn format_ether(wei: i64) -> String {
    format!("{:.6}", wei as f64 / WEI_PER_ETHER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_ether() {
        assert_eq!(wei_hex_to_ether("0xde0b6b3a7640000").unwrap(), "1.000000");
        assert_eq!(wei_hex_to_ether("0x1bc16d674ec80000").unwrap(), "2.000000");
    }

    #[test]
    fn test_fractional_ether() {
        assert_eq!(wei_hex_to_ether("0xf3dbb76162000").unwrap(), "0.004290");
        assert_eq!(wei_hex_to_ether("0x2386f26fc10000").unwrap(), "0.010000");
    }

    #[test]
    fn test_zero_and_dust() {
        assert_eq!(wei_hex_to_ether("0x0").unwrap(), "0.000000");
        assert_eq!(wei_hex_to_ether("0x75bcd15").unwrap(), "0.000000");
    }

    #[test]
    fn test_uppercase_digits_and_missing_prefix() {
        assert_eq!(wei_hex_to_ether("0xDE0B6B3A7640000").unwrap(), "1.000000");
        assert_eq!(wei_hex_to_ether("de0b6b3a7640000").unwrap(), "1.000000");
    }

    #[test]
    fn test_overflow_saturates() {
        assert_eq!(parse_wei_hex("0xffffffffffffffffffff").unwrap(), i64::MAX);
        assert_eq!(wei_hex_to_ether("0xffffffffffffffffffff").unwrap(), "9.223372");
    }

    #[test]
    fn test_invalid_hex() {
        assert!(matches!(wei_hex_to_ether("0xzz"), Err(ConversionError::InvalidHex { .. })));
        assert!(wei_hex_to_ether("0x").is_err());
        assert!(wei_hex_to_ether("").is_err());
    }

    #[test]
    fn test_matches_decimal_division() {
        for wei in [1u64, 999, 1_000_000_000_000, 123_456_789_000_000_000, 5_000_000_000_000_000_000] {
            let hex = format!("0x{:x}", wei);
            let expected = format!("{:.6}", wei as f64 / 1e18);
            assert_eq!(wei_hex_to_ether(&hex).unwrap(), expected, "wei {}", wei);
        }
    }
}
