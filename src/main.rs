//! TTL Cache demo
//!
//! Exercises the cache API: set, lazy expiry on get, add conflicts, and
//! background reclamation by the sweeper.

use std::time::Duration;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::{CacheStore, Config, DEFAULT_EXPIRATION, NO_EXPIRATION};

/// Main entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Create the cache store (starts the sweeper)
/// 4. Walk through set / get / add / expiry
/// 5. Stop the sweeper and print final statistics
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: default_ttl={}s, sweep_interval={}s",
        config.default_ttl.as_secs(),
        config.sweep_interval.as_secs()
    );

    let cache: CacheStore<String> =
        CacheStore::from_config(&config).context("failed to create cache store")?;

    cache.set("k1", "qwertyuiop".to_string(), Duration::from_secs(5));
    tokio::time::sleep(Duration::from_secs(2)).await;
    info!("get k1 after 2s: {:?}", cache.get("k1"));

    if let Err(err) = cache.add("k1", "dummy".to_string(), DEFAULT_EXPIRATION) {
        warn!("add k1: {}", err);
    }

    cache.set("k1", "dummy dummy".to_string(), Duration::from_secs(1));
    info!("get k1 after overwrite: {:?}", cache.get("k1"));

    cache.set("k2", "x".to_string(), NO_EXPIRATION);

    tokio::time::sleep(Duration::from_secs(3)).await;
    info!("get k1 after 3s: {:?}", cache.get("k1"));
    info!("get k2 after 3s: {:?}", cache.get("k2"));
    info!("entries left in storage: {}", cache.len());

    cache.stop_sweeper();
    cache.join_sweeper().await;

    let stats = serde_json::to_string_pretty(&cache.stats())?;
    info!("final stats:\n{}", stats);

    Ok(())
}
