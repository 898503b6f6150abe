//! Which assets can pay transaction fees.

use {
    super::AssetId,
    serde::{Deserialize, Serialize},
};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct AcceptedCurrency {
    pub id: AssetId,
    pub accepted: bool,
}

/// The native asset always pays fees. Any other asset only if the chain lists
/// it as an accepted currency.
pub fn accepted_currency(id: AssetId, native: AssetId, listed: bool) -> AcceptedCurrency {
    AcceptedCurrency {
        id,
        accepted: id == native || listed,
    }
}

/// Accounts that never picked a fee currency pay in the native asset.
pub fn account_currency(explicit: Option<AssetId>, native: AssetId) -> AssetId {
    explicit.unwrap_or(native)
}
