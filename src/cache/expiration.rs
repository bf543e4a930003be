//! Expiration Policy Module
//!
//! Describes how long a stored entry should live.

use std::time::Duration;

use tokio::time::Instant;

// == Expiration ==
/// TTL argument accepted by `set` and `add`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expiration {
    /// Use the store's configured default TTL
    #[default]
    Default,
    /// Never expire, regardless of the default TTL
    Never,
    /// Expire after the given duration; a zero duration means `Default`
    After(Duration),
}

impl Expiration {
    /// Resolves this policy into an absolute expiration instant.
    ///
    /// Returns `None` when the entry must never expire: either `Never` was
    /// requested, or the effective TTL (after substituting the default) is zero.
    pub fn deadline(self, default_ttl: Duration, now: Instant) -> Option<Instant> {
        let ttl = match self {
            Expiration::Never => return None,
            Expiration::Default => default_ttl,
            Expiration::After(ttl) if ttl.is_zero() => default_ttl,
            Expiration::After(ttl) => ttl,
        };

        if ttl.is_zero() {
            return None;
        }
        // An unrepresentable deadline is as good as never.
        now.checked_add(ttl)
    }
}

impl From<Duration> for Expiration {
    fn from(ttl: Duration) -> Self {
        Expiration::After(ttl)
    }
}

impl From<Option<Duration>> for Expiration {
    /// `None` selects the default TTL.
    fn from(ttl: Option<Duration>) -> Self {
        ttl.map_or(Expiration::Default, Expiration::After)
    }
}
