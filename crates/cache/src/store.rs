use crate::{CacheError, Clock, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A stored value with its absolute expiry time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry<V> {
    pub value: V,
    /// Milliseconds since the Unix epoch.
    pub expires: u64,
}

impl<V> Entry<V> {
    /// Creates an entry that expires `ttl` after the clock's current time.
    ///
    /// Fails when the expiry cannot be represented.
    pub fn new(value: V, ttl: Duration, clock: &dyn Clock) -> Result<Self> {
        let ttl_millis = u64::try_from(ttl.as_millis())
            .map_err(|_| CacheError::InvalidTtl(format!("{ttl:?} is too large")))?;
        let expires = clock
            .now_millis()
            .checked_add(ttl_millis)
            .ok_or_else(|| CacheError::InvalidTtl(format!("{ttl:?} overflows the clock")))?;
        Ok(Self { value, expires })
    }

    /// An entry read strictly after its expiry time is gone.
    #[must_use]
    pub const fn is_expired(&self, now_millis: u64) -> bool {
        now_millis > self.expires
    }
}

/// Expiring key-value store for JSON values.
///
/// Reads of missing or expired keys return `None`; expired entries are
/// evicted by the read that finds them.
pub trait Cache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;

    fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<()>;

    fn has(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Drops every entry.
    fn clear(&self) -> Result<()>;
}

/// Typed access on top of any [`Cache`].
pub trait CacheExt: Cache {
    /// Reads and decodes a value. Entries that no longer decode read as misses.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        let Some(value) = self.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(decoded) => Ok(Some(decoded)),
            Err(e) => {
                tracing::debug!(key, error = %e, "Ignoring undecodable cache entry");
                Ok(None)
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        self.set(key, serde_json::to_value(value)?, ttl)
    }
}

impl<C: Cache + ?Sized> CacheExt for C {}

impl<C: Cache + ?Sized> Cache for std::sync::Arc<C> {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<()> {
        (**self).set(key, value, ttl)
    }

    fn has(&self, key: &str) -> Result<bool> {
        (**self).has(key)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
