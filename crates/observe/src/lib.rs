//! This crate is intended to contain code that is required to provide or
//! improve the observability of the omnipool view services. That includes
//! initialization logic for metrics and logging as well as helpers to measure
//! asynchronous work.
pub mod config;
pub mod future;
pub mod metrics;
pub mod tracing;

pub use config::Config;
