//! TTL Cache - An in-process key-value cache
//!
//! Provides lock-protected storage of arbitrary values keyed by strings, with
//! per-entry TTL expiration and a background sweeper.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{CacheStore, Expiration, DEFAULT_EXPIRATION, NO_EXPIRATION};
pub use config::Config;
pub use error::CacheError;
