pub mod asset;
pub mod bond;
pub mod capacity;
pub mod farm;
pub mod fee;
pub mod omnipool;

pub use {
    asset::{AccountId, AssetId, AssetMeta, AssetRegistry},
    capacity::{CapMath, Capacity, MockCapMath},
    omnipool::{ApiIds, OmnipoolAssetState, TokenBalance, TvlCap},
};
