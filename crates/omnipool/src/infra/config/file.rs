use {
    crate::{
        domain::{AccountId, AssetId, AssetMeta, AssetRegistry},
        infra::query::CacheConfig,
    },
    serde::Deserialize,
    std::{collections::HashSet, path::Path, time::Duration},
    tokio::fs,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Config {
    /// Account holding the omnipool reserves. Capacities are computed from
    /// its balances.
    omnipool_account: AccountId,

    /// The chain's own token. It always pays transaction fees and is the fee
    /// currency of accounts that never picked one.
    #[serde(default)]
    native_asset: AssetId,

    #[serde(default)]
    cache: Cache,

    /// Static metadata of the assets views are computed for. Assets missing
    /// here are displayed with a placeholder symbol.
    #[serde(default)]
    assets: Vec<Asset>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Cache {
    #[serde(default = "default_stale_after_blocks")]
    stale_after_blocks: u64,

    #[serde(default = "default_eviction_blocks")]
    eviction_blocks: u64,

    #[serde(default = "default_max_retries")]
    max_retries: u32,

    #[serde(with = "humantime_serde", default = "default_delay_between_retries")]
    delay_between_retries: Duration,

    /// How often the node is asked for the best block.
    #[serde(with = "humantime_serde", default = "default_block_poll_interval")]
    block_poll_interval: Duration,
}

impl Default for Cache {
    fn default() -> Self {
        Self {
            stale_after_blocks: default_stale_after_blocks(),
            eviction_blocks: default_eviction_blocks(),
            max_retries: default_max_retries(),
            delay_between_retries: default_delay_between_retries(),
            block_poll_interval: default_block_poll_interval(),
        }
    }
}

fn default_stale_after_blocks() -> u64 {
    1
}

fn default_eviction_blocks() -> u64 {
    5
}

fn default_max_retries() -> u32 {
    2
}

fn default_delay_between_retries() -> Duration {
    Duration::from_millis(500)
}

fn default_block_poll_interval() -> Duration {
    Duration::from_secs(6)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct Asset {
    id: AssetId,
    symbol: String,
    decimals: u8,
}

/// Load the configuration from a TOML file.
///
/// # Panics
///
/// This method panics if the config is invalid or on I/O errors.
pub async fn load(path: &Path) -> super::Config {
    let data = fs::read_to_string(path)
        .await
        .unwrap_or_else(|e| panic!("I/O error while reading {path:?}: {e:?}"));
    parse(&data, path)
}

fn parse(data: &str, path: &Path) -> super::Config {
    let config: Config = super::unwrap_or_log(toml::de::from_str(data), &path);

    let mut seen = HashSet::new();
    for asset in &config.assets {
        assert!(
            seen.insert(asset.id),
            "invalid configuration: asset {} is listed more than once",
            asset.id
        );
    }

    super::Config {
        omnipool_account: config.omnipool_account,
        native_asset: config.native_asset,
        cache: CacheConfig {
            stale_after_blocks: config.cache.stale_after_blocks,
            eviction_blocks: config.cache.eviction_blocks,
            max_retries: config.cache.max_retries,
            delay_between_retries: config.cache.delay_between_retries,
        },
        block_poll_interval: config.cache.block_poll_interval,
        assets: AssetRegistry::new(config.assets.into_iter().map(|asset| AssetMeta {
            id: asset.id,
            symbol: asset.symbol,
            decimals: asset.decimals,
        })),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        omnipool-account = "7L53bUTBbfuj14UpdCNPwmgzzHSsrsTWBHX5pys32mVWM3C1"
        native-asset = 0

        [cache]
        stale-after-blocks = 2
        eviction-blocks = 10
        max-retries = 3
        delay-between-retries = "1s"
        block-poll-interval = "12s"

        [[assets]]
        id = 0
        symbol = "HDX"
        decimals = 12

        [[assets]]
        id = 5
        symbol = "DOT"
        decimals = 10
    "#;

    #[test]
    fn parses_full_config() {
        let config = parse(FULL, Path::new("omnipool.toml"));
        assert_eq!(
            config.omnipool_account,
            AccountId::from("7L53bUTBbfuj14UpdCNPwmgzzHSsrsTWBHX5pys32mVWM3C1")
        );
        assert_eq!(config.native_asset, AssetId(0));
        assert_eq!(config.cache.stale_after_blocks, 2);
        assert_eq!(config.cache.eviction_blocks, 10);
        assert_eq!(config.cache.max_retries, 3);
        assert_eq!(config.cache.delay_between_retries, Duration::from_secs(1));
        assert_eq!(config.block_poll_interval, Duration::from_secs(12));
        assert_eq!(config.assets.get(AssetId(0)).symbol, "HDX");
        assert_eq!(config.assets.get(AssetId(5)).symbol, "DOT");
        assert_eq!(config.assets.get(AssetId(5)).decimals, 10);
    }

    #[test]
    fn applies_defaults() {
        let config = parse(r#"omnipool-account = "omnipool""#, Path::new("omnipool.toml"));
        assert_eq!(config.native_asset, AssetId(0));
        assert_eq!(config.cache.stale_after_blocks, 1);
        assert_eq!(config.cache.eviction_blocks, 5);
        assert_eq!(config.cache.max_retries, 2);
        assert_eq!(
            config.cache.delay_between_retries,
            Duration::from_millis(500)
        );
        assert_eq!(config.block_poll_interval, Duration::from_secs(6));
        assert_eq!(
            config.assets.get(AssetId(0)).symbol,
            AssetRegistry::UNKNOWN_SYMBOL
        );
    }

    #[test]
    #[should_panic(expected = "failed to parse TOML config")]
    fn rejects_unknown_fields() {
        parse(
            r#"
            omnipool-account = "omnipool"
            omnipool-acount = "typo"
            "#,
            Path::new("omnipool.toml"),
        );
    }

    #[test]
    #[should_panic(expected = "listed more than once")]
    fn rejects_duplicate_assets() {
        parse(
            r#"
            omnipool-account = "omnipool"

            [[assets]]
            id = 1
            symbol = "A"
            decimals = 12

            [[assets]]
            id = 1
            symbol = "B"
            decimals = 12
            "#,
            Path::new("omnipool.toml"),
        );
    }

    #[tokio::test]
    async fn loads_from_disk() {
        let path = std::env::temp_dir().join(format!("omnipool-config-{}.toml", std::process::id()));
        fs::write(&path, FULL).await.unwrap();
        let config = load(&path).await;
        fs::remove_file(&path).await.unwrap();
        assert_eq!(config.assets.get(AssetId(0)).symbol, "HDX");
    }
}
