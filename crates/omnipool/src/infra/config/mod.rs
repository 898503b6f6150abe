use {
    crate::{
        domain::{AccountId, AssetId, AssetRegistry},
        infra::query::CacheConfig,
    },
    std::{fmt::Debug, time::Duration},
};

pub mod file;

#[derive(Clone, Debug)]
pub struct Config {
    /// Account holding the omnipool reserves.
    pub omnipool_account: AccountId,
    pub native_asset: AssetId,
    pub cache: CacheConfig,
    pub block_poll_interval: Duration,
    pub assets: AssetRegistry,
}

/// Unwraps result or logs a `TOML` parsing error.
fn unwrap_or_log<T, E, P>(result: Result<T, E>, path: &P) -> T
where
    E: Debug,
    P: Debug,
{
    result.unwrap_or_else(|err| {
        if std::env::var("TOML_TRACE_ERROR").is_ok_and(|v| v == "1") {
            panic!("failed to parse TOML config at {path:?}: {err:#?}")
        } else {
            panic!(
                "failed to parse TOML config at: {path:?}. Set TOML_TRACE_ERROR=1 to print \
                 parsing error but this may leak secrets."
            )
        }
    })
}
