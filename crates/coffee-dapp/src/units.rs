//! Conversion between decimal ether amounts and wei.
//!
//! Thin layer over `alloy::primitives::utils`: input is checked for plain
//! decimal notation first, then scaled by `parse_units`. No `f64` anywhere.

use alloy::primitives::utils::{format_units, parse_units};
use alloy::primitives::U256;

use crate::constants::ETHER_DECIMALS;
use crate::DappError;

/// Parse a user-entered ether amount (e.g. "0.5") into wei.
///
/// Accepts plain decimal notation only. Fractional digits beyond 18 round
/// half up on the first dropped digit. The result must be strictly positive.
pub fn parse_ether(input: &str) -> Result<U256, DappError> {
    let trimmed = input.trim();
    let not_a_number = || DappError::InvalidAmount(format!("'{input}' is not a number"));

    let (integer_part, fractional_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    if integer_part.is_empty() && fractional_part.is_empty() {
        return Err(not_a_number());
    }
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if !all_digits(integer_part) || !all_digits(fractional_part) {
        return Err(not_a_number());
    }

    let mut wei = parse_units(trimmed, ETHER_DECIMALS as u8)
        .map_err(|e| DappError::InvalidAmount(format!("'{input}': {e}")))?
        .get_absolute();

    if fractional_part
        .as_bytes()
        .get(ETHER_DECIMALS)
        .is_some_and(|d| *d >= b'5')
    {
        wei = wei
            .checked_add(U256::from(1))
            .ok_or_else(|| DappError::InvalidAmount(format!("'{input}' is too large")))?;
    }

    if wei.is_zero() {
        return Err(DappError::InvalidAmount(format!(
            "'{input}' must be greater than zero"
        )));
    }
    Ok(wei)
}

/// Format wei as a decimal ether string without trailing zeros.
pub fn format_ether(wei: U256) -> String {
    let Ok(formatted) = format_units(wei, ETHER_DECIMALS as u8) else {
        return wei.to_string();
    };
    match formatted.split_once('.') {
        Some((integer, fraction)) => {
            let fraction = fraction.trim_end_matches('0');
            if fraction.is_empty() {
                integer.to_string()
            } else {
                format!("{integer}.{fraction}")
            }
        }
        None => formatted,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eth(n: u64) -> U256 {
        U256::from(n) * U256::from(10u64).pow(U256::from(ETHER_DECIMALS))
    }

    #[test]
    fn test_parse_whole_ether() {
        assert_eq!(parse_ether("1").unwrap(), eth(1));
        assert_eq!(parse_ether(" 3 ").unwrap(), eth(3));
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_ether("0.5").unwrap(), eth(1) / U256::from(2));
        assert_eq!(parse_ether(".001").unwrap(), U256::from(1_000_000_000_000_000u64));
        assert_eq!(parse_ether("2.").unwrap(), eth(2));
    }

    #[test]
    fn test_parse_smallest_unit() {
        assert_eq!(parse_ether("0.000000000000000001").unwrap(), U256::from(1));
    }

    #[test]
    fn test_parse_rounds_beyond_decimals() {
        assert_eq!(parse_ether("0.0000000000000000014").unwrap(), U256::from(1));
        assert_eq!(parse_ether("0.0000000000000000015").unwrap(), U256::from(2));
        assert_eq!(parse_ether("0.0000000000000000005").unwrap(), U256::from(1));
        assert_eq!(parse_ether("1.0000000000000000009999").unwrap(), eth(1) + U256::from(1));
    }

    #[test]
    fn test_parse_rejects_non_positive_and_garbage() {
        for input in [
            "", "   ", "0", "0.0", "-1", "+1", "abc", "1e3", "1.2.3", ".", "0x10",
            "0.0000000000000000004",
        ] {
            assert!(
                matches!(parse_ether(input), Err(DappError::InvalidAmount(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn test_parse_overflow_fails() {
        let huge = "9".repeat(80);
        assert!(matches!(parse_ether(&huge), Err(DappError::InvalidAmount(_))));
    }

    #[test]
    fn test_format_ether() {
        assert_eq!(format_ether(U256::ZERO), "0");
        assert_eq!(format_ether(eth(1)), "1");
        assert_eq!(format_ether(eth(1) / U256::from(4)), "0.25");
        assert_eq!(format_ether(U256::from(1)), "0.000000000000000001");
        assert_eq!(format_ether(eth(12) + U256::from(5)), "12.000000000000000005");
    }

    #[test]
    fn test_round_trip_representative_values() {
        for input in ["1", "0.5", "0.001", "42.125", "0.000000000000000001"] {
            assert_eq!(format_ether(parse_ether(input).unwrap()), input);
        }
    }
}
