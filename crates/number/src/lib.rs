//! Arbitrary precision helpers for on-chain fixed-point amounts.

pub mod conversions;
pub mod decimal;
pub mod serialization;
pub mod u256_ext;

pub use {decimal::Decimal, ruint::aliases::U256};

/// Number of decimals used by on-chain fixed-point fractions such as asset
/// caps, i.e. `10^18` represents `1`.
pub const FIXED_POINT_DECIMALS: u8 = 18;

/// The fixed-point representation of `1` at [`FIXED_POINT_DECIMALS`].
pub fn fixed_point_one() -> U256 {
    U256::from(10_u128.pow(FIXED_POINT_DECIMALS as u32))
}
