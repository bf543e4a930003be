//! Cache Module
//!
//! Provides an in-memory key-value store with per-entry TTL expiration.

mod entry;
mod expiration;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use expiration::Expiration;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Requests the store's default TTL
pub const DEFAULT_EXPIRATION: Expiration = Expiration::Default;

/// Requests an entry that never expires
pub const NO_EXPIRATION: Expiration = Expiration::Never;
