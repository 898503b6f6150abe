//! Fetch-with-cache access to chain data.
//!
//! Views never wait for chain data. They ask a [`QueryCache`] for a [`Query`]
//! snapshot, which tells them whether a value is there, whether it is out of
//! date and whether a fetch is under way. Fetches run in the background and
//! the next snapshot picks up their result.

pub mod cache;

pub use cache::{CacheConfig, Fetching, QueryCache};

/// Snapshot of one cached value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Query<T> {
    pub value: Option<T>,
    /// Identifies the stored value. Changes whenever a new value is stored
    /// and is unique within a cache, so equal versions imply equal values.
    pub version: u64,
    /// The value was fetched too many blocks ago or was invalidated.
    pub is_stale: bool,
    /// There is no value yet and a fetch is in flight.
    pub is_loading: bool,
}

impl<T> Query<T> {
    /// Query that settled without a value.
    pub fn idle() -> Self {
        Self {
            value: None,
            version: 0,
            is_stale: false,
            is_loading: false,
        }
    }

    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::idle()
        }
    }

    pub fn ready(value: T, version: u64) -> Self {
        Self {
            value: Some(value),
            version,
            ..Self::idle()
        }
    }

    pub fn is_ready(&self) -> bool {
        self.value.is_some()
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Query<U> {
        Query {
            value: self.value.map(f),
            version: self.version,
            is_stale: self.is_stale,
            is_loading: self.is_loading,
        }
    }
}
