pub mod blocks;
pub mod chain;
pub mod config;
pub mod query;
pub mod sources;

pub use {
    blocks::{BlockInfo, CurrentBlockWatcher},
    chain::{ChainReading, MockChainReading},
    config::Config,
    query::{CacheConfig, Fetching, Query, QueryCache},
    sources::ChainSource,
};
