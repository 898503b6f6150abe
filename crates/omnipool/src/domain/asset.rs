use {
    serde::{Deserialize, Serialize},
    std::{collections::HashMap, num::ParseIntError, str::FromStr},
};

/// Identifier of a fungible asset registered on chain.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Deserialize,
    Serialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct AssetId(pub u32);

impl FromStr for AssetId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse().map(Self)
    }
}

/// An account address in its SS58 text form.
#[derive(
    Clone, Debug, Eq, Hash, PartialEq, Deserialize, Serialize, derive_more::Display, derive_more::From,
)]
#[serde(transparent)]
pub struct AccountId(pub String);

impl From<&str> for AccountId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

/// Static metadata of an asset. Unlike balances and pool state it never
/// changes and is known without querying the chain.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct AssetMeta {
    pub id: AssetId,
    pub symbol: String,
    pub decimals: u8,
}

/// Lookup of [`AssetMeta`] by id.
#[derive(Clone, Debug, Default)]
pub struct AssetRegistry(HashMap<AssetId, AssetMeta>);

impl AssetRegistry {
    /// Symbol reported for assets missing from the registry.
    pub const UNKNOWN_SYMBOL: &'static str = "N/A";
    /// Decimals assumed for assets missing from the registry.
    pub const DEFAULT_DECIMALS: u8 = 12;

    pub fn new(assets: impl IntoIterator<Item = AssetMeta>) -> Self {
        Self(assets.into_iter().map(|meta| (meta.id, meta)).collect())
    }

    /// Returns the metadata of the asset, falling back to a placeholder for
    /// unknown ids so that views always have a symbol and a scale to work
    /// with.
    pub fn get(&self, id: AssetId) -> AssetMeta {
        self.0.get(&id).cloned().unwrap_or_else(|| AssetMeta {
            id,
            symbol: Self::UNKNOWN_SYMBOL.to_owned(),
            decimals: Self::DEFAULT_DECIMALS,
        })
    }
}
