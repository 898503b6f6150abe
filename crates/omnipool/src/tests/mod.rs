//! End-to-end scenarios of the views against a mocked chain.

use {
    crate::{
        Views,
        domain::{
            AccountId,
            ApiIds,
            AssetId,
            AssetMeta,
            AssetRegistry,
            MockCapMath,
            OmnipoolAssetState,
            TokenBalance,
            TvlCap,
        },
        infra::{BlockInfo, CacheConfig, ChainReading, Config, MockChainReading},
    },
    number::U256,
    std::{
        collections::HashMap,
        sync::{Arc, Mutex},
        time::Duration,
    },
    tokio::sync::watch,
};

mod payments;

pub const NATIVE: AssetId = AssetId(0);
pub const HUB: AssetId = AssetId(1);
pub const STABLE: AssetId = AssetId(2);
pub const DOT: AssetId = AssetId(5);

pub const OMNIPOOL_ACCOUNT: &str = "7L53bUTBbfuj14UpdCNPwmgzzHSsrsTWBHX5pys32mVWM3C1";

pub fn config() -> Config {
    Config {
        omnipool_account: AccountId::from(OMNIPOOL_ACCOUNT),
        native_asset: NATIVE,
        cache: CacheConfig {
            max_retries: 0,
            ..Default::default()
        },
        block_poll_interval: Duration::from_secs(6),
        assets: AssetRegistry::new([
            meta(NATIVE, "HDX", 12),
            meta(HUB, "H2O", 12),
            meta(STABLE, "DAI", 18),
            meta(DOT, "DOT", 6),
        ]),
    }
}

fn meta(id: AssetId, symbol: &str, decimals: u8) -> AssetMeta {
    AssetMeta {
        id,
        symbol: symbol.to_owned(),
        decimals,
    }
}

/// Chain state the mocked chain serves.
#[derive(Clone)]
pub struct ChainState {
    pub api_ids: ApiIds,
    pub tvl_cap: TvlCap,
    pub omnipool_assets: Vec<OmnipoolAssetState>,
    /// Balances of the omnipool account.
    pub balances: HashMap<AssetId, TokenBalance>,
}

impl ChainState {
    /// DOT holds 1000 tokens (6 decimals) in a pool with a 50% cap.
    pub fn example() -> Self {
        let half = U256::from(500_000_000_000_000_000_u64);
        Self {
            api_ids: ApiIds {
                hub_id: HUB,
                stable_coin_id: STABLE,
            },
            tvl_cap: TvlCap(U256::from(222_u64)),
            omnipool_assets: vec![state(DOT, 500, half), state(STABLE, 700, half)],
            balances: [
                balance(HUB, 1_900, 2_000),
                balance(STABLE, 800, 800),
                balance(DOT, 1_000_000_000, 1_000_000_000),
            ]
            .into_iter()
            .map(|balance| (balance.asset_id, balance))
            .collect(),
        }
    }

    pub fn with_cap(mut self, asset: AssetId, cap: U256) -> Self {
        for state in &mut self.omnipool_assets {
            if state.id == asset {
                state.cap = cap;
            }
        }
        self
    }

    /// A chain that serves this state for every request. Balances missing
    /// from the state fail to be fetched.
    pub fn into_mock(self) -> MockChainReading {
        self.into_shared_mock().0
    }

    /// Like [`ChainState::into_mock`] but the served state can be changed
    /// later through the returned handle.
    pub fn into_shared_mock(self) -> (MockChainReading, Arc<Mutex<ChainState>>) {
        let state = Arc::new(Mutex::new(self));
        let mut chain = MockChainReading::new();
        chain.expect_best_block_number().returning(|| Ok(10));
        chain.expect_api_ids().returning({
            let state = state.clone();
            move || Ok(state.lock().unwrap().api_ids)
        });
        chain.expect_tvl_cap().returning({
            let state = state.clone();
            move || Ok(state.lock().unwrap().tvl_cap)
        });
        chain.expect_omnipool_assets().returning({
            let state = state.clone();
            move || Ok(state.lock().unwrap().omnipool_assets.clone())
        });
        chain.expect_token_balance().returning({
            let state = state.clone();
            move |account, asset| {
                assert_eq!(account, AccountId::from(OMNIPOOL_ACCOUNT));
                state
                    .lock()
                    .unwrap()
                    .balances
                    .get(&asset)
                    .cloned()
                    .ok_or_else(|| anyhow::anyhow!("no balance for asset {asset}"))
            }
        });
        (chain, state)
    }
}

pub fn state(id: AssetId, hub_reserve: u64, cap: U256) -> OmnipoolAssetState {
    OmnipoolAssetState {
        id,
        hub_reserve: U256::from(hub_reserve),
        cap,
    }
}

pub fn balance(asset_id: AssetId, balance: u64, total: u64) -> TokenBalance {
    TokenBalance {
        asset_id,
        balance: U256::from(balance),
        total: U256::from(total),
    }
}

/// Views over the given chain at block 10. The returned sender advances the
/// block.
pub fn views(chain: MockChainReading, math: MockCapMath) -> (Views, watch::Sender<BlockInfo>) {
    views_over(Arc::new(chain), math)
}

pub fn views_over(
    chain: Arc<dyn ChainReading>,
    math: MockCapMath,
) -> (Views, watch::Sender<BlockInfo>) {
    observe::tracing::initialize_reentrant("omnipool=debug");
    let (sender, blocks) = watch::channel(BlockInfo { number: 10 });
    let views = Views::new(config(), chain, Arc::new(math), blocks);
    (views, sender)
}
