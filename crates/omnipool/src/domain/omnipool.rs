//! Chain state of the omnipool as consumed by the views.

use {
    super::AssetId,
    number::{U256, serialization::HexOrDecimalU256},
    serde::{Deserialize, Serialize},
    serde_with::serde_as,
};

/// The chain's designated hub asset and reference stablecoin.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiIds {
    pub hub_id: AssetId,
    pub stable_coin_id: AssetId,
}

/// Per-asset omnipool state.
#[serde_as]
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OmnipoolAssetState {
    pub id: AssetId,
    /// Hub asset reserve backing this asset in the pool.
    #[serde_as(as = "HexOrDecimalU256")]
    pub hub_reserve: U256,
    /// Maximum share of the total hub reserve this asset may hold, as a
    /// fixed-point fraction with 18 decimals.
    #[serde_as(as = "HexOrDecimalU256")]
    pub cap: U256,
}

impl OmnipoolAssetState {
    /// Whether the asset cap is exactly 100%, in which case the asset is
    /// only bounded by the global TVL cap.
    pub fn is_cap_100_percent(&self) -> bool {
        self.cap == number::fixed_point_one()
    }
}

/// Balance of one asset held by an account.
#[serde_as]
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    pub asset_id: AssetId,
    /// Free balance.
    #[serde_as(as = "HexOrDecimalU256")]
    pub balance: U256,
    /// Free and reserved balance.
    #[serde_as(as = "HexOrDecimalU256")]
    pub total: U256,
}

/// Global ceiling on the value locked in the omnipool, in stablecoin
/// fixed-point units.
#[serde_as]
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize, derive_more::From)]
#[serde(transparent)]
pub struct TvlCap(#[serde_as(as = "HexOrDecimalU256")] pub U256);

#[cfg(test)]
mod tests {
    use {super::*, serde_json::json};

    #[test]
    fn deserializes_chain_json() {
        let state: OmnipoolAssetState = serde_json::from_value(json!({
            "id": 5,
            "hubReserve": "500000000000",
            "cap": "0x0de0b6b3a7640000",
        }))
        .unwrap();
        assert_eq!(state.id, AssetId(5));
        assert_eq!(state.hub_reserve, U256::from(500_000_000_000_u64));
        assert!(state.is_cap_100_percent());

        let ids: ApiIds = serde_json::from_value(json!({
            "hubId": 1,
            "stableCoinId": 2,
        }))
        .unwrap();
        assert_eq!(ids.hub_id, AssetId(1));
        assert_eq!(ids.stable_coin_id, AssetId(2));

        let cap: TvlCap = serde_json::from_value(json!("1000")).unwrap();
        assert_eq!(cap, TvlCap(U256::from(1000_u64)));
    }

    #[test]
    fn cap_below_100_percent() {
        let state = OmnipoolAssetState {
            id: AssetId(5),
            hub_reserve: U256::ZERO,
            cap: U256::from(500_000_000_000_000_000_u64),
        };
        assert!(!state.is_cap_100_percent());
    }
}
