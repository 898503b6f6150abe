//! Bond prices relative to their underlying asset.

use {
    super::{AssetId, AssetRegistry},
    number::{Decimal, U256, conversions, serialization::HexOrDecimalU256},
    serde::{Deserialize, Serialize},
    serde_with::serde_as,
};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PricingKind {
    /// The bond trades below its underlying asset.
    Discount,
    /// The bond trades at or above its underlying asset.
    Premium,
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BondPricing {
    pub kind: PricingKind,
    /// Relative price difference in percent.
    pub percent: Decimal,
}

/// Compares the spot price of the underlying asset with the price of its
/// bond. Prices that are not known yet are assumed to be 1.
pub fn pricing(spot_price: Option<Decimal>, bond_price: Option<Decimal>) -> BondPricing {
    let spot = spot_price.unwrap_or_else(Decimal::one);
    let bond = bond_price.unwrap_or_else(Decimal::one);
    let hundred = Decimal::from(100);

    if spot.gt(&bond) {
        BondPricing {
            kind: PricingKind::Discount,
            percent: &(&(&spot - &bond) / &spot) * &hundred,
        }
    } else {
        BondPricing {
            kind: PricingKind::Premium,
            percent: &(&(&bond - &spot) / &bond) * &hundred,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub enum BondEventKind {
    #[serde(rename = "LBP.BuyExecuted")]
    Buy,
    #[serde(rename = "LBP.SellExecuted")]
    Sell,
}

/// A trade against the liquidity bootstrapping pool a bond is sold through.
#[serde_as]
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BondEvent {
    pub kind: BondEventKind,
    pub asset_in: AssetId,
    pub asset_out: AssetId,
    #[serde_as(as = "HexOrDecimalU256")]
    pub amount: U256,
    /// Amount received. Named buy price on buys and sale price on sells.
    #[serde_as(as = "HexOrDecimalU256")]
    pub price: U256,
}

/// Average price paid for the bond across `events`, denominated in the asset
/// traded against it. `NaN` if there are no events.
pub fn average_purchase_price(
    bond: AssetId,
    events: &[BondEvent],
    registry: &AssetRegistry,
) -> Decimal {
    let total = events.iter().fold(Decimal::zero(), |acc, event| {
        let amount_in = Decimal::from(conversions::u256_descale(
            &event.amount,
            registry.get(event.asset_in).decimals,
        ));
        let amount_out = Decimal::from(conversions::u256_descale(
            &event.price,
            registry.get(event.asset_out).decimals,
        ));
        let price = if event.asset_out != bond {
            &amount_out / &amount_in
        } else {
            &amount_in / &amount_out
        };
        &acc + &price
    });
    let count = i64::try_from(events.len()).unwrap_or(i64::MAX);
    &total / &Decimal::from(count)
}
