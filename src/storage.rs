//! Tiny key-value persistence used for the best time.
//!
//! Browser builds write to `localStorage`; native builds keep a JSON object
//! in the user's local data directory.

use std::collections::HashMap;
use std::fmt;

/// Errors from a storage backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    Io(String),
    Encode(String),
    #[cfg(target_arch = "wasm32")]
    Unavailable,
    #[cfg(target_arch = "wasm32")]
    Rejected(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "Storage I/O failed: {}", e),
            StorageError::Encode(e) => write!(f, "Could not encode stored data: {}", e),
            #[cfg(target_arch = "wasm32")]
            StorageError::Unavailable => write!(f, "Storage is unavailable"),
            #[cfg(target_arch = "wasm32")]
            StorageError::Rejected(e) => write!(f, "Storage rejected the write: {}", e),
        }
    }
}

/// String key-value store
pub trait KeyValueStore: fmt::Debug + Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Process-local store (tests, or when nothing durable is available)
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use native::FileStore;

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{KeyValueStore, StorageError};
    use std::collections::BTreeMap;
    use std::fs;
    use std::path::{Path, PathBuf};

    const APP_DIR: &str = "tile_shuffle";
    const STORE_FILE: &str = "store.json";

    /// JSON object on disk, rewritten on every set
    #[derive(Debug)]
    pub struct FileStore {
        path: PathBuf,
        entries: BTreeMap<String, String>,
    }

    impl FileStore {
        /// `<local data dir>/tile_shuffle/store.json`
        pub fn default_path() -> Option<PathBuf> {
            dirs::data_local_dir().map(|base| base.join(APP_DIR).join(STORE_FILE))
        }

        /// Open (or start) a store at `path`. Unreadable contents start empty.
        pub fn open(path: impl AsRef<Path>) -> Self {
            let path = path.as_ref().to_path_buf();
            let entries = match fs::read_to_string(&path) {
                Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                    log::warn!("Ignoring corrupt store {}: {}", path.display(), e);
                    BTreeMap::new()
                }),
                Err(_) => BTreeMap::new(),
            };
            FileStore { path, entries }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn flush(&self) -> Result<(), StorageError> {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
            }
            let raw = serde_json::to_string_pretty(&self.entries)
                .map_err(|e| StorageError::Encode(e.to_string()))?;
            fs::write(&self.path, raw).map_err(|e| StorageError::Io(e.to_string()))
        }
    }

    impl KeyValueStore for FileStore {
        fn get(&self, key: &str) -> Option<String> {
            self.entries.get(key).cloned()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            self.entries.insert(key.to_string(), value.to_string());
            self.flush()
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStorage;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::{KeyValueStore, StorageError};
    use wasm_bindgen::JsValue;

    /// `window.localStorage`, looked up on every call (the handle is not `Send`)
    #[derive(Debug, Default)]
    pub struct LocalStorage;

    fn storage() -> Option<web_sys::Storage> {
        web_sys::window().and_then(|window| window.local_storage().ok().flatten())
    }

    fn js_err(err: JsValue) -> StorageError {
        StorageError::Rejected(format!("{:?}", err))
    }

    impl KeyValueStore for LocalStorage {
        fn get(&self, key: &str) -> Option<String> {
            storage()?.get_item(key).ok().flatten()
        }

        fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
            let storage = storage().ok_or(StorageError::Unavailable)?;
            storage.set_item(key, value).map_err(js_err)
        }
    }
}

/// The durable store for this platform, or memory if none can be found
pub fn default_store() -> Box<dyn KeyValueStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Box::new(LocalStorage)
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let store: Box<dyn KeyValueStore> = match FileStore::default_path() {
            Some(path) => {
                let store = FileStore::open(path);
                log::info!("Best time stored in {}", store.path().display());
                Box::new(store)
            }
            None => {
                log::warn!("No local data directory; best time will not persist");
                Box::new(MemoryStore::new())
            }
        };
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let mut store = MemoryStore::new();
        assert_eq!(store.get("bestTime"), None);
        store.set("bestTime", "42").unwrap();
        assert_eq!(store.get("bestTime").as_deref(), Some("42"));
        store.set("bestTime", "30").unwrap();
        assert_eq!(store.get("bestTime").as_deref(), Some("30"));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_survives_reopen() {
        let dir = std::env::temp_dir().join(format!("tile_shuffle_test_{}", std::process::id()));
        let path = dir.join("nested").join("store.json");
        let _ = std::fs::remove_dir_all(&dir);

        let mut store = FileStore::open(&path);
        assert_eq!(store.get("bestTime"), None);
        store.set("bestTime", "17").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get("bestTime").as_deref(), Some("17"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_file_store_ignores_corrupt_file() {
        let dir = std::env::temp_dir().join(format!("tile_shuffle_corrupt_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("store.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get("bestTime"), None);
        assert_eq!(store.path(), path.as_path());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
