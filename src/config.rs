//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

/// Default TTL applied to entries stored with `Expiration::Default` (30 minutes)
pub const DEFAULT_TTL_SECS: u64 = 1800;

/// Default period between sweeper runs
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 1;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// TTL for entries stored with the default expiration
    pub default_ttl: Duration,
    /// Period between background sweeps of expired entries
    pub sweep_interval: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 1800, 0 = never expire)
    /// - `SWEEP_INTERVAL` - Sweep frequency in seconds (default: 1, must be > 0)
    pub fn from_env() -> Self {
        let default_ttl = env::var("DEFAULT_TTL")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECS);
        let sweep_interval = env::var("SWEEP_INTERVAL")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|secs: &u64| *secs > 0)
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

        Self {
            default_ttl: Duration::from_secs(default_ttl),
            sweep_interval: Duration::from_secs(sweep_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }
}
