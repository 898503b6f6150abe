//! How much more of an asset the omnipool accepts before a cap is hit.
//!
//! Every asset in the omnipool is bounded by its own cap, a fraction of the
//! total hub reserve. Assets whose cap is 100% are additionally bounded by the
//! global TVL cap. The headroom left by either cap is computed by [`CapMath`],
//! which works on fixed-point decimal strings; this module only wires the chain
//! state into it and turns the result into displayable numbers.

use {
    super::{ApiIds, AssetId, AssetMeta, OmnipoolAssetState, TokenBalance, TvlCap},
    bigdecimal::BigDecimal,
    number::{Decimal, conversions, u256_ext::U256Ext},
};

/// Value returned by [`CapMath`] when an asset is at or beyond its cap.
pub const NO_CAPACITY: &str = "-1";

/// Omnipool cap arithmetic. All arguments and results are fixed-point decimal
/// strings in the units of the respective asset.
#[mockall::automock]
pub trait CapMath: Send + Sync {
    /// The amount of the asset that can still be added before its per-asset
    /// cap is reached, or [`NO_CAPACITY`].
    fn cap_difference(
        &self,
        asset_reserve: &str,
        asset_hub_reserve: &str,
        asset_cap: &str,
        total_hub_reserve: &str,
    ) -> String;

    /// The amount of the asset that can still be added before the global TVL
    /// cap is reached, or [`NO_CAPACITY`].
    fn tvl_cap_difference(
        &self,
        asset_reserve: &str,
        asset_hub_reserve: &str,
        stable_asset_reserve: &str,
        stable_asset_hub_reserve: &str,
        tvl_cap: &str,
        total_hub_reserve: &str,
    ) -> String;
}

/// Filled and total capacity of an asset in the omnipool, in asset units.
///
/// All numbers are `NaN` when the capacity cannot be determined, either
/// because chain data is missing or because the asset is at its cap.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Capacity {
    pub capacity: Decimal,
    pub filled: Decimal,
    pub filled_percent: Decimal,
    pub symbol: String,
}

impl Capacity {
    pub fn unavailable(symbol: impl Into<String>) -> Self {
        Self {
            capacity: Decimal::nan(),
            filled: Decimal::nan(),
            filled_percent: Decimal::nan(),
            symbol: symbol.into(),
        }
    }

    pub fn is_available(&self) -> bool {
        !self.capacity.is_nan()
    }
}

/// Chain state a capacity is computed from. Balances are those of the
/// omnipool account.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub api_ids: &'a ApiIds,
    pub tvl_cap: &'a TvlCap,
    pub omnipool_assets: &'a [OmnipoolAssetState],
    pub balances: &'a [TokenBalance],
}

impl Snapshot<'_> {
    fn state(&self, id: AssetId) -> Option<&OmnipoolAssetState> {
        self.omnipool_assets.iter().find(|state| state.id == id)
    }

    fn balance(&self, id: AssetId) -> Option<&TokenBalance> {
        self.balances.iter().find(|balance| balance.asset_id == id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{function} returned malformed fixed-point value {value:?}: {reason}")]
    MalformedNumber {
        function: &'static str,
        value: String,
        reason: String,
    },
}

/// Computes the capacity of `asset` in the omnipool.
///
/// Missing chain data is not an error: the result is then
/// [`Capacity::unavailable`]. An error is only returned if [`CapMath`]
/// produces something that is not a fixed-point number.
pub fn resolve(
    asset: &AssetMeta,
    snapshot: &Snapshot,
    math: &dyn CapMath,
) -> Result<Capacity, Error> {
    let api_ids = snapshot.api_ids;
    let (Some(state), Some(stable_state), Some(asset_balance), Some(hub_balance), Some(stable_balance)) = (
        snapshot.state(asset.id),
        snapshot.state(api_ids.stable_coin_id),
        snapshot.balance(asset.id),
        snapshot.balance(api_ids.hub_id),
        snapshot.balance(api_ids.stable_coin_id),
    ) else {
        tracing::trace!(asset = %asset.id, "incomplete omnipool data");
        return Ok(Capacity::unavailable(&asset.symbol));
    };

    let asset_reserve = asset_balance.balance.to_string();
    let asset_hub_reserve = state.hub_reserve.to_string();
    let total_hub_reserve = hub_balance.total.to_string();

    let mut difference = Difference {
        function: "cap_difference",
        value: math.cap_difference(
            &asset_reserve,
            &asset_hub_reserve,
            &state.cap.to_string(),
            &total_hub_reserve,
        ),
    };

    if state.is_cap_100_percent() {
        let tvl_difference = Difference {
            function: "tvl_cap_difference",
            value: math.tvl_cap_difference(
                &asset_reserve,
                &asset_hub_reserve,
                &stable_balance.balance.to_string(),
                &stable_state.hub_reserve.to_string(),
                &snapshot.tvl_cap.0.to_string(),
                &total_hub_reserve,
            ),
        };
        // The tighter of the two caps binds.
        if tvl_difference.parse()? < difference.parse()? {
            difference = tvl_difference;
        }
    }

    if difference.value == NO_CAPACITY {
        tracing::trace!(asset = %asset.id, "asset is at its cap");
        return Ok(Capacity::unavailable(&asset.symbol));
    }

    let balance = asset_balance.balance.to_big_decimal();
    let capacity = Decimal::from(conversions::descale(
        &(balance + difference.parse()?),
        asset.decimals,
    ));
    let filled = Decimal::from(conversions::u256_descale(
        &asset_balance.balance,
        asset.decimals,
    ));
    let filled_percent = &(&filled / &capacity) * &Decimal::from(100);

    Ok(Capacity {
        capacity,
        filled,
        filled_percent,
        symbol: asset.symbol.clone(),
    })
}

/// A cap difference together with the function that computed it.
struct Difference {
    function: &'static str,
    value: String,
}

impl Difference {
    fn parse(&self) -> Result<BigDecimal, Error> {
        conversions::decimal_from_str(&self.value).map_err(|err| Error::MalformedNumber {
            function: self.function,
            value: self.value.clone(),
            reason: format!("{err:#}"),
        })
    }
}
