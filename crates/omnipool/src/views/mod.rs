//! Views combine cached chain queries into the values the front-end shows.

use {
    crate::{
        domain::{
            AccountId,
            ApiIds,
            AssetId,
            CapMath,
            OmnipoolAssetState,
            TokenBalance,
            TvlCap,
            fee::AcceptedCurrency,
        },
        infra::{self, ChainReading, ChainSource, Config, CurrentBlockWatcher, Fetching, QueryCache},
    },
    anyhow::Result,
    std::{
        collections::HashMap,
        fmt::Debug,
        hash::Hash,
        sync::{Arc, Mutex},
    },
};

pub mod capacity;
pub mod payments;

pub use capacity::PoolCapacity;

pub struct Views {
    config: Config,
    math: Arc<dyn CapMath>,
    api_ids: QueryCache<(), ApiIds>,
    tvl_cap: QueryCache<(), TvlCap>,
    omnipool_assets: QueryCache<(), Arc<Vec<OmnipoolAssetState>>>,
    balances: QueryCache<(AccountId, AssetId), TokenBalance>,
    accepted_currencies: QueryCache<AssetId, AcceptedCurrency>,
    account_currencies: QueryCache<AccountId, AssetId>,
    capacities: Mutex<HashMap<AssetId, capacity::Memo>>,
}

impl Views {
    /// Creates the views without refreshing them in the background. Cached
    /// values are then only refetched when they are read after becoming
    /// stale.
    pub fn new(
        config: Config,
        chain: Arc<dyn ChainReading>,
        math: Arc<dyn CapMath>,
        blocks: CurrentBlockWatcher,
    ) -> Self {
        let source = Arc::new(ChainSource::new(chain, config.native_asset));
        Self {
            api_ids: cached(&config, &source, &blocks, "api_ids"),
            tvl_cap: cached(&config, &source, &blocks, "tvl_cap"),
            omnipool_assets: cached(&config, &source, &blocks, "omnipool_assets"),
            balances: cached(&config, &source, &blocks, "token_balances"),
            accepted_currencies: cached(&config, &source, &blocks, "accepted_currencies"),
            account_currencies: cached(&config, &source, &blocks, "account_currencies"),
            capacities: Default::default(),
            config,
            math,
        }
    }

    /// Starts watching the chain for new blocks and keeps recently read
    /// values up to date.
    pub async fn start(
        config: Config,
        chain: Arc<dyn ChainReading>,
        math: Arc<dyn CapMath>,
    ) -> Result<Self> {
        tracing::info!(account = %config.omnipool_account, "starting omnipool views");
        let blocks =
            infra::blocks::current_block_stream(chain.clone(), config.block_poll_interval).await?;
        let views = Self::new(config, chain, math, blocks);
        views.spawn_background_tasks();
        Ok(views)
    }

    pub fn spawn_background_tasks(&self) {
        self.api_ids.spawn_background_task();
        self.tvl_cap.spawn_background_task();
        self.omnipool_assets.spawn_background_task();
        self.balances.spawn_background_task();
        self.accepted_currencies.spawn_background_task();
        self.account_currencies.spawn_background_task();
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

fn cached<K, V>(
    config: &Config,
    source: &Arc<ChainSource>,
    blocks: &CurrentBlockWatcher,
    label: &'static str,
) -> QueryCache<K, V>
where
    K: Clone + Debug + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    ChainSource: Fetching<K, V>,
{
    let fetcher: Arc<dyn Fetching<K, V>> = source.clone();
    QueryCache::new(config.cache, fetcher, blocks.clone(), label)
}
