//! Liquidity mining farms and the deposits that joined them.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Farm {
    pub global_farm_id: u32,
    pub yield_farm_id: u32,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YieldFarmEntry {
    pub global_farm_id: u32,
    pub yield_farm_id: u32,
}

/// Pool shares locked in liquidity mining, possibly in several farms at once.
#[derive(Clone, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    pub shares: u128,
    pub yield_farm_entries: Vec<YieldFarmEntry>,
}

pub fn is_joined(deposit: &Deposit, farm: &Farm) -> bool {
    deposit.yield_farm_entries.iter().any(|entry| {
        entry.global_farm_id == farm.global_farm_id && entry.yield_farm_id == farm.yield_farm_id
    })
}

/// Splits `farms` into those the deposit joined and those it can still join.
pub fn partition<'a>(
    farms: impl IntoIterator<Item = &'a Farm>,
    deposit: &Deposit,
) -> (Vec<Farm>, Vec<Farm>) {
    farms
        .into_iter()
        .copied()
        .partition(|farm| is_joined(deposit, farm))
}
