use {
    crate::{U256, u256_ext::U256Ext},
    anyhow::{Context, Result, ensure},
    bigdecimal::BigDecimal,
    num::{BigInt, One},
    std::str::FromStr,
};

/// Converts a fixed-point decimal into its human readable value by shifting
/// the decimal point `decimals` places to the left, e.g. `1500000` with 6
/// decimals becomes `1.5`. The conversion is exact.
pub fn descale(value: &BigDecimal, decimals: u8) -> BigDecimal {
    value * BigDecimal::new(BigInt::one(), i64::from(decimals))
}

/// Like [`descale`] for raw on-chain amounts.
pub fn u256_descale(amount: &U256, decimals: u8) -> BigDecimal {
    BigDecimal::new(amount.to_big_int(), i64::from(decimals))
}

/// Strictly parses a fixed-point decimal string such as `"-1"`, `"1000"` or
/// `"0.5"`.
///
/// Unlike [`BigDecimal::from_str`] this rejects exponents, surrounding
/// whitespace, explicit `+` signs and empty integer or fractional parts, so
/// that anything other than a plain decimal literal is reported as malformed.
pub fn decimal_from_str(s: &str) -> Result<BigDecimal> {
    let digits = s.strip_prefix('-').unwrap_or(s);
    let (integer, fraction) = match digits.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (digits, None),
    };
    ensure!(
        !integer.is_empty() && integer.bytes().all(|b| b.is_ascii_digit()),
        "invalid integer part in {s:?}"
    );
    if let Some(fraction) = fraction {
        ensure!(
            !fraction.is_empty() && fraction.bytes().all(|b| b.is_ascii_digit()),
            "invalid fractional part in {s:?}"
        );
    }
    BigDecimal::from_str(s).with_context(|| format!("unable to parse {s:?} as decimal"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn descale_shifts_decimal_point() {
        assert_eq!(descale(&dec("1500000"), 6), dec("1.5"));
        assert_eq!(descale(&dec("1300000000"), 6), dec("1300"));
        assert_eq!(descale(&dec("42"), 0), dec("42"));
        assert_eq!(descale(&dec("1"), 18), dec("0.000000000000000001"));
    }

    #[test]
    fn u256_descale_matches_descale() {
        let amount = U256::from(123_456_789_u64);
        assert_eq!(u256_descale(&amount, 3), dec("123456.789"));
        assert_eq!(
            u256_descale(&amount, 3),
            descale(&BigDecimal::from(123_456_789), 3)
        );
    }

    #[test]
    fn decimal_from_str_accepts_plain_literals() {
        assert_eq!(decimal_from_str("0").unwrap(), dec("0"));
        assert_eq!(decimal_from_str("-1").unwrap(), dec("-1"));
        assert_eq!(decimal_from_str("300").unwrap(), dec("300"));
        assert_eq!(decimal_from_str("0.125").unwrap(), dec("0.125"));
        assert_eq!(
            decimal_from_str("340282366920938463463374607431768211456").unwrap(),
            dec("340282366920938463463374607431768211456")
        );
    }

    #[test]
    fn decimal_from_str_rejects_malformed() {
        for s in [
            "", "-", ".5", "1.", "1e5", " 1", "1 ", "+1", "0x10", "NaN", "1.2.3", "--1", "abc",
        ] {
            assert!(decimal_from_str(s).is_err(), "{s:?} should be rejected");
        }
    }
}
