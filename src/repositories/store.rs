use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{debug, instrument};

use crate::models::{RepositoryError, RepositoryResult};

/// Origin-scoped string key-value store the cart is persisted in
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` when the key has never been written
    fn get(&self, key: &str) -> RepositoryResult<Option<String>>;

    /// Write a value, overwriting any prior one
    fn set(&self, key: &str, value: &str) -> RepositoryResult<()>;
}

/// Process-local store, used by tests and by embedders that persist elsewhere
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding one value
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut values = HashMap::new();
        values.insert(key.to_string(), value.to_string());
        Self {
            values: RwLock::new(values),
        }
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// File-backed store holding one JSON object per origin under a storage directory.
///
/// Writes go to a temporary file that is renamed over the origin file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: RwLock<()>,
}

impl FileStore {
    pub fn new(storage_dir: impl AsRef<Path>, origin: &str) -> Self {
        let path = storage_dir
            .as_ref()
            .join(format!("{}.json", sanitize_origin(origin)));
        Self {
            path,
            lock: RwLock::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> RepositoryResult<HashMap<String, String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(HashMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write_all(&self, values: &HashMap<String, String>) -> RepositoryResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let serialized = serde_json::to_string_pretty(values)?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, serialized).map_err(|e| self.io_error(e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| self.io_error(e))?;
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> RepositoryError {
        RepositoryError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    fn get(&self, key: &str) -> RepositoryResult<Option<String>> {
        let _guard = self.lock.read().map_err(|_| RepositoryError::LockPoisoned)?;
        let values = self.read_all()?;
        debug!(found = values.contains_key(key), "Read store key");
        Ok(values.get(key).cloned())
    }

    #[instrument(skip(self, value), fields(path = %self.path.display(), bytes = value.len()))]
    fn set(&self, key: &str, value: &str) -> RepositoryResult<()> {
        let _guard = self
            .lock
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;

        // An unreadable file is replaced rather than blocking writes
        let mut values = self.read_all().unwrap_or_default();
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)?;
        debug!("Wrote store key");
        Ok(())
    }
}

/// Map an origin such as `https://example.com:8080` to a file-name-safe stem
fn sanitize_origin(origin: &str) -> String {
    let sanitized: String = origin
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
        .collect();

    if sanitized.is_empty() {
        "default".to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_get_set() {
        let store = InMemoryStore::new();

        assert_eq!(store.get("cart").unwrap(), None);

        store.set("cart", "[]").unwrap();
        assert_eq!(store.get("cart").unwrap(), Some("[]".to_string()));

        store.set("cart", "[1]").unwrap();
        assert_eq!(store.get("cart").unwrap(), Some("[1]".to_string()));
    }

    #[test]
    fn test_in_memory_with_value() {
        let store = InMemoryStore::with_value("cart", "garbage");
        assert_eq!(store.get("cart").unwrap(), Some("garbage".to_string()));
        assert_eq!(store.get("other").unwrap(), None);
    }

    #[test]
    fn test_sanitize_origin() {
        assert_eq!(sanitize_origin("localhost"), "localhost");
        assert_eq!(
            sanitize_origin("https://shop.example.com:8080"),
            "https___shop.example.com_8080"
        );
        assert_eq!(sanitize_origin("   "), "default");
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "localhost");

        assert_eq!(store.get("cart").unwrap(), None);

        store.set("cart", r#"[{"id":"a","qty":1}]"#).unwrap();
        store.set("other", "x").unwrap();

        let reopened = FileStore::new(dir.path(), "localhost");
        assert_eq!(
            reopened.get("cart").unwrap(),
            Some(r#"[{"id":"a","qty":1}]"#.to_string())
        );
        assert_eq!(reopened.get("other").unwrap(), Some("x".to_string()));
    }

    #[test]
    fn test_file_store_scoped_per_origin() {
        let dir = tempfile::tempdir().unwrap();
        let first = FileStore::new(dir.path(), "https://a.example");
        let second = FileStore::new(dir.path(), "https://b.example");

        first.set("cart", "[]").unwrap();

        assert_eq!(second.get("cart").unwrap(), None);
        assert_ne!(first.path(), second.path());
    }

    #[test]
    fn test_file_store_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path(), "localhost");
        std::fs::write(store.path(), "{broken").unwrap();

        assert!(store.get("cart").is_err());

        store.set("cart", "[]").unwrap();
        assert_eq!(store.get("cart").unwrap(), Some("[]".to_string()));
    }
}
