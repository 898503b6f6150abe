//! Extension trait for converting on-chain amounts into big numbers.

use {
    crate::U256,
    bigdecimal::BigDecimal,
    num::{BigInt, BigUint},
};

/// Extension trait for U256 to add conversion methods.
pub trait U256Ext: Sized {
    /// Convert to BigInt.
    fn to_big_int(&self) -> BigInt;

    /// Convert to BigUint.
    fn to_big_uint(&self) -> BigUint;

    /// Convert to an integral BigDecimal.
    fn to_big_decimal(&self) -> BigDecimal;
}

impl U256Ext for U256 {
    fn to_big_int(&self) -> BigInt {
        BigInt::from_biguint(num::bigint::Sign::Plus, self.to_big_uint())
    }

    fn to_big_uint(&self) -> BigUint {
        BigUint::from_bytes_be(self.to_be_bytes::<32>().as_slice())
    }

    fn to_big_decimal(&self) -> BigDecimal {
        BigDecimal::from(self.to_big_int())
    }
}
