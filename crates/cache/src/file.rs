use crate::{Cache, CacheError, Clock, Entry, Result, SystemClock};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

type Entries = BTreeMap<String, Entry<serde_json::Value>>;

/// Store persisted to a single JSON file, so entries survive restarts.
///
/// The file is re-read on every access; a missing or unreadable file is an
/// empty cache.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    lock: Mutex<()>,
}

impl FileCache {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    #[must_use]
    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
            lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> Result<Entries> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Entries::new()),
            Err(source) => {
                return Err(CacheError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        match serde_json::from_str(&contents) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt cache file");
                Ok(Entries::new())
            }
        }
    }

    fn write(&self, entries: &Entries) -> Result<()> {
        let io_error = |source| CacheError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        // write-then-rename so readers never see a partial file
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, serde_json::to_vec(entries)?).map_err(io_error)?;
        std::fs::rename(&tmp, &self.path).map_err(io_error)
    }
}

impl Cache for FileCache {
    #[tracing::instrument(skip(self), level = "debug")]
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>> {
        let _guard = self.lock.lock();
        let mut entries = self.read()?;
        let now = self.clock.now_millis();

        match entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                entries.remove(key);
                self.write(&entries)?;
                tracing::debug!("Evicted expired entry");
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    #[tracing::instrument(skip(self, value), level = "debug")]
    fn set(&self, key: &str, value: serde_json::Value, ttl: Duration) -> Result<()> {
        let now = self.clock.now_millis();
        let entry = Entry::new(value, ttl, self.clock.as_ref())?;
        let _guard = self.lock.lock();
        let mut entries = self.read()?;
        entries.retain(|_, existing| !existing.is_expired(now));
        entries.insert(key.to_string(), entry);
        self.write(&entries)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.lock.lock();
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(CacheError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ManualClock;
    use serde_json::json;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Arc<ManualClock>, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cache.json");
        (dir, Arc::new(ManualClock::new(0)), path)
    }

    #[test]
    fn test_entries_survive_reopen() {
        let (_dir, clock, path) = setup();
        FileCache::with_clock(&path, clock.clone())
            .set("types:root", json!({ "name": "Query" }), Duration::from_secs(60))
            .unwrap();

        let reopened = FileCache::with_clock(&path, clock);
        assert_eq!(
            reopened.get("types:root").unwrap(),
            Some(json!({ "name": "Query" }))
        );
    }

    #[test]
    fn test_expired_entry_is_removed_from_file() {
        let (_dir, clock, path) = setup();
        let cache = FileCache::with_clock(&path, clock.clone());
        cache.set("k", json!(1), Duration::ZERO).unwrap();

        clock.advance(Duration::from_millis(1));
        assert_eq!(cache.get("k").unwrap(), None);

        let on_disk: Entries =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(on_disk.is_empty());
    }

    #[test]
    fn test_set_drops_expired_entries_from_file() {
        let (_dir, clock, path) = setup();
        let cache = FileCache::with_clock(&path, clock.clone());
        cache.set("old", json!(1), Duration::from_secs(1)).unwrap();
        cache.set("also_old", json!(2), Duration::from_secs(1)).unwrap();

        clock.advance(Duration::from_secs(2));
        cache.set("new", json!(3), Duration::from_secs(60)).unwrap();

        let on_disk: Entries =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(on_disk.keys().collect::<Vec<_>>(), vec!["new"]);
    }

    #[test]
    fn test_missing_and_corrupt_files_are_empty() {
        let (_dir, clock, path) = setup();
        let cache = FileCache::with_clock(&path, clock);
        assert!(!cache.has("k").unwrap());

        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "not json").unwrap();
        assert!(!cache.has("k").unwrap());

        cache.set("k", json!(true), Duration::from_secs(1)).unwrap();
        assert!(cache.has("k").unwrap());
    }

    #[test]
    fn test_clear_removes_file() {
        let (_dir, clock, path) = setup();
        let cache = FileCache::with_clock(&path, clock);
        cache.set("k", json!(1), Duration::from_secs(1)).unwrap();
        assert!(path.exists());

        cache.clear().unwrap();
        assert!(!path.exists());
        cache.clear().unwrap();
    }
}
