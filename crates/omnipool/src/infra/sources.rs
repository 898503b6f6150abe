//! [`Fetching`] implementations backed by the chain.

use {
    super::{ChainReading, Fetching},
    crate::domain::{
        AccountId,
        ApiIds,
        AssetId,
        OmnipoolAssetState,
        TokenBalance,
        TvlCap,
        fee::{self, AcceptedCurrency},
    },
    anyhow::Result,
    std::sync::Arc,
};

/// Singleton queries are keyed by the unit type.
pub type Singleton = ();

#[derive(Clone)]
pub struct ChainSource {
    chain: Arc<dyn ChainReading>,
    native_asset: AssetId,
}

impl ChainSource {
    pub fn new(chain: Arc<dyn ChainReading>, native_asset: AssetId) -> Self {
        Self {
            chain,
            native_asset,
        }
    }
}

#[async_trait::async_trait]
impl Fetching<Singleton, ApiIds> for ChainSource {
    async fn fetch(&self, _: Singleton) -> Result<ApiIds> {
        self.chain.api_ids().await
    }
}

#[async_trait::async_trait]
impl Fetching<Singleton, TvlCap> for ChainSource {
    async fn fetch(&self, _: Singleton) -> Result<TvlCap> {
        self.chain.tvl_cap().await
    }
}

#[async_trait::async_trait]
impl Fetching<Singleton, Arc<Vec<OmnipoolAssetState>>> for ChainSource {
    async fn fetch(&self, _: Singleton) -> Result<Arc<Vec<OmnipoolAssetState>>> {
        self.chain.omnipool_assets().await.map(Arc::new)
    }
}

#[async_trait::async_trait]
impl Fetching<(AccountId, AssetId), TokenBalance> for ChainSource {
    async fn fetch(&self, (account, asset): (AccountId, AssetId)) -> Result<TokenBalance> {
        self.chain.token_balance(account, asset).await
    }
}

#[async_trait::async_trait]
impl Fetching<AssetId, AcceptedCurrency> for ChainSource {
    async fn fetch(&self, asset: AssetId) -> Result<AcceptedCurrency> {
        // The native asset is accepted without asking the chain.
        let listed = asset != self.native_asset && self.chain.accepted_currency(asset).await?;
        Ok(fee::accepted_currency(asset, self.native_asset, listed))
    }
}

#[async_trait::async_trait]
impl Fetching<AccountId, AssetId> for ChainSource {
    async fn fetch(&self, account: AccountId) -> Result<AssetId> {
        let explicit = self.chain.account_currency(account).await?;
        Ok(fee::account_currency(explicit, self.native_asset))
    }
}

#[cfg(test)]
mod tests {
    use {super::*, crate::infra::MockChainReading, mockall::predicate::eq};

    #[tokio::test]
    async fn native_asset_is_accepted_without_query() {
        let mut chain = MockChainReading::new();
        chain.expect_accepted_currency().never();
        let source = ChainSource::new(Arc::new(chain), AssetId(0));

        let currency: AcceptedCurrency = source.fetch(AssetId(0)).await.unwrap();
        assert!(currency.accepted);
    }

    #[tokio::test]
    async fn listed_assets_are_accepted() {
        let mut chain = MockChainReading::new();
        chain
            .expect_accepted_currency()
            .with(eq(AssetId(5)))
            .returning(|_| Ok(true));
        chain
            .expect_accepted_currency()
            .with(eq(AssetId(6)))
            .returning(|_| Ok(false));
        let source = ChainSource::new(Arc::new(chain), AssetId(0));

        let listed: AcceptedCurrency = source.fetch(AssetId(5)).await.unwrap();
        assert!(listed.accepted);
        let unlisted: AcceptedCurrency = source.fetch(AssetId(6)).await.unwrap();
        assert!(!unlisted.accepted);
    }

    #[tokio::test]
    async fn account_currency_defaults_to_native() {
        let mut chain = MockChainReading::new();
        chain
            .expect_account_currency()
            .with(eq(AccountId::from("alice")))
            .returning(|_| Ok(None));
        chain
            .expect_account_currency()
            .with(eq(AccountId::from("bob")))
            .returning(|_| Ok(Some(AssetId(2))));
        let source = ChainSource::new(Arc::new(chain), AssetId(0));

        let alice: AssetId = source.fetch(AccountId::from("alice")).await.unwrap();
        assert_eq!(alice, AssetId(0));
        let bob: AssetId = source.fetch(AccountId::from("bob")).await.unwrap();
        assert_eq!(bob, AssetId(2));
    }

    #[tokio::test]
    async fn errors_are_propagated() {
        let mut chain = MockChainReading::new();
        chain
            .expect_api_ids()
            .returning(|| Err(anyhow::anyhow!("timeout")));
        let source = ChainSource::new(Arc::new(chain), AssetId(0));
        let result = Fetching::<Singleton, ApiIds>::fetch(&source, ()).await;
        assert!(result.is_err());
    }
}
