use crate::{Cache, Clock, Entry, Result, SystemClock};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// In-process store. Values of any cloneable type can be kept; the
/// [`Cache`] implementation covers JSON values.
#[derive(Debug)]
pub struct MemoryCache<V = serde_json::Value> {
    entries: Mutex<HashMap<String, Entry<V>>>,
    clock: Arc<dyn Clock>,
}

impl<V> Default for MemoryCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> MemoryCache<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    /// Stores `value` and drops every entry that has already expired, so
    /// keys that are never read again do not accumulate.
    pub fn insert(&self, key: &str, value: V, ttl: Duration) -> Result<()> {
        let now = self.clock.now_millis();
        let entry = Entry::new(value, ttl, self.clock.as_ref())?;
        let mut entries = self.entries.lock();
        entries.retain(|_, existing| !existing.is_expired(now));
        entries.insert(key.to_string(), entry);
        Ok(())
    }

    pub fn remove_all(&self) {
        self.entries.lock().clear();
    }

    /// Number of stored entries, expired ones included until the next read
    /// of their key or the next insert.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> MemoryCache<V> {
    /// Returns a live value, evicting it if it has expired.
    pub fn lookup(&self, key: &str) -> Option<V> {
        let now = self.clock.now_millis();
        let mut entries = self.entries.lock();
        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }
}

impl Cache for MemoryCache<serde_json::Value> {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(self.lookup(key))
    }

    fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<()> {
        self.insert(key, value, ttl)
    }

    fn clear(&self) -> Result<()> {
        self.remove_all();
        Ok(())
    }
}
