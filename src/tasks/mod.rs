//! Background Tasks Module
//!
//! Contains background tasks that run periodically alongside a cache store.
//!
//! # Tasks
//! - Expiration Sweeper: Removes expired cache entries at a fixed interval

mod sweeper;

pub use sweeper::Sweeper;
