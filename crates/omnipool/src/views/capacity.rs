use {
    super::Views,
    crate::{
        domain::{
            AccountId,
            ApiIds,
            AssetId,
            OmnipoolAssetState,
            TokenBalance,
            TvlCap,
            capacity::{self, Capacity, Snapshot},
        },
        infra::Query,
    },
    std::sync::Arc,
    tracing::instrument,
};

/// Capacity of an asset in the omnipool as shown to the user.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolCapacity {
    /// `None` until every piece of chain data the capacity depends on is
    /// available.
    pub data: Option<Capacity>,
    /// Some of that data is still being fetched for the first time.
    pub is_loading: bool,
}

/// The last capacity computed for an asset and the versions of the queries
/// it was computed from.
pub(super) struct Memo {
    versions: Vec<u64>,
    capacity: Capacity,
}

struct Sources {
    api_ids: Query<ApiIds>,
    tvl_cap: Query<TvlCap>,
    omnipool_assets: Query<Arc<Vec<OmnipoolAssetState>>>,
    /// Omnipool account balances of the hub asset, the stablecoin and the
    /// asset. Empty as long as the api ids are unknown.
    balances: Vec<Query<TokenBalance>>,
}

impl Sources {
    fn is_loading(&self) -> bool {
        self.api_ids.is_loading
            || self.tvl_cap.is_loading
            || self.omnipool_assets.is_loading
            || self.balances.iter().any(|balance| balance.is_loading)
    }

    fn versions(&self) -> Vec<u64> {
        [
            self.api_ids.version,
            self.tvl_cap.version,
            self.omnipool_assets.version,
        ]
        .into_iter()
        .chain(self.balances.iter().map(|balance| balance.version))
        .collect()
    }
}

impl Views {
    /// Returns the capacity of `asset` from whatever chain data is cached
    /// right now, scheduling fetches for data that is missing or stale.
    ///
    /// The result is recomputed only when some of the underlying data
    /// changed.
    pub fn pool_capacity(&self, asset: AssetId) -> Result<PoolCapacity, capacity::Error> {
        let api_ids = self.api_ids.get(());
        let balances = match api_ids.value {
            Some(ids) => self
                .balance_keys(ids, asset)
                .map(|key| self.balances.get(key))
                .collect(),
            None => Vec::new(),
        };
        self.combine(
            asset,
            Sources {
                api_ids,
                tvl_cap: self.tvl_cap.get(()),
                omnipool_assets: self.omnipool_assets.get(()),
                balances,
            },
        )
    }

    /// Like [`Views::pool_capacity`] but waits for missing or stale chain
    /// data to be fetched first.
    #[instrument(skip(self))]
    pub async fn load_pool_capacity(
        &self,
        asset: AssetId,
    ) -> Result<PoolCapacity, capacity::Error> {
        let (api_ids, tvl_cap, omnipool_assets) = futures::join!(
            self.api_ids.fetch(()),
            self.tvl_cap.fetch(()),
            self.omnipool_assets.fetch(()),
        );
        // Which balances are needed is only known once the api ids are.
        let balances = match api_ids.value {
            Some(ids) => {
                futures::future::join_all(
                    self.balance_keys(ids, asset)
                        .map(|key| self.balances.fetch(key)),
                )
                .await
            }
            None => Vec::new(),
        };
        self.combine(
            asset,
            Sources {
                api_ids,
                tvl_cap,
                omnipool_assets,
                balances,
            },
        )
    }

    fn balance_keys(
        &self,
        ids: ApiIds,
        asset: AssetId,
    ) -> impl Iterator<Item = (AccountId, AssetId)> + '_ {
        [ids.hub_id, ids.stable_coin_id, asset]
            .into_iter()
            .map(|id| (self.config.omnipool_account.clone(), id))
    }

    fn combine(&self, asset: AssetId, sources: Sources) -> Result<PoolCapacity, capacity::Error> {
        let is_loading = sources.is_loading();
        let pending = PoolCapacity {
            data: None,
            is_loading,
        };

        let (Some(api_ids), Some(tvl_cap), Some(omnipool_assets)) = (
            &sources.api_ids.value,
            &sources.tvl_cap.value,
            &sources.omnipool_assets.value,
        ) else {
            return Ok(pending);
        };
        let Some(balances) = sources
            .balances
            .iter()
            .map(|balance| balance.value.clone())
            .collect::<Option<Vec<_>>>()
        else {
            return Ok(pending);
        };

        let versions = sources.versions();
        // Held while resolving so concurrent readers compute a result once.
        let mut capacities = self.capacities.lock().unwrap();
        if let Some(memo) = capacities
            .get(&asset)
            .filter(|memo| memo.versions == versions)
        {
            return Ok(PoolCapacity {
                data: Some(memo.capacity.clone()),
                is_loading,
            });
        }

        let capacity = capacity::resolve(
            &self.config.assets.get(asset),
            &Snapshot {
                api_ids,
                tvl_cap,
                omnipool_assets,
                balances: &balances,
            },
            self.math.as_ref(),
        )?;
        tracing::debug!(
            %asset,
            capacity = %capacity.capacity,
            filled = %capacity.filled,
            "computed pool capacity"
        );
        capacities.insert(
            asset,
            Memo {
                versions,
                capacity: capacity.clone(),
            },
        );
        Ok(PoolCapacity {
            data: Some(capacity),
            is_loading,
        })
    }
}
