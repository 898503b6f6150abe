use {
    crate::domain::{AccountId, ApiIds, AssetId, OmnipoolAssetState, TokenBalance, TvlCap},
    anyhow::Result,
};

/// Read access to the chain state the views are computed from.
#[mockall::automock]
#[async_trait::async_trait]
pub trait ChainReading: Send + Sync + 'static {
    /// Number of the best (not necessarily finalized) block.
    async fn best_block_number(&self) -> Result<u64>;

    /// The hub asset and the reference stablecoin of the omnipool.
    async fn api_ids(&self) -> Result<ApiIds>;

    async fn tvl_cap(&self) -> Result<TvlCap>;

    /// State of every asset in the omnipool.
    async fn omnipool_assets(&self) -> Result<Vec<OmnipoolAssetState>>;

    async fn token_balance(&self, account: AccountId, asset: AssetId) -> Result<TokenBalance>;

    /// Whether `asset` is listed as a fee payment currency. The native asset
    /// is never listed.
    async fn accepted_currency(&self, asset: AssetId) -> Result<bool>;

    /// The fee payment currency the account picked, if any.
    async fn account_currency(&self, account: AccountId) -> Result<Option<AssetId>>;
}
