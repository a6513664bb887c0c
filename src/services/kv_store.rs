// Key-Value Store Service
// Durable string storage shared by the token store, registry and org sync

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Storage keys used by the engine
pub mod keys {
    pub const THEME: &str = "theme";
    pub const BRAND: &str = "brand";
    pub const ORG_ID: &str = "orgId";
    pub const ORG_MAP: &str = "orgMap";
    pub const CUSTOM_PRESETS: &str = "brandPresets";
    pub const HIDDEN_BUILTINS: &str = "brandBuiltinsHidden";
    pub const PRIMARY: &str = "primary";
    pub const PRIMARY_FOREGROUND: &str = "primary-foreground";
    pub const AUTH_TOKEN: &str = "token";
}

const STORAGE_FILE_NAME: &str = "storage.json";

/// Synchronous string storage that survives restarts.
///
/// Writes are infallible from the caller's point of view; backends log
/// persistence problems instead of surfacing them.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid storage file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Decode a JSON value stored under `key`, falling back to `T::default()`
/// when the key is missing or the payload does not decode.
pub fn load_json<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let Some(raw) = store.get(key) else {
        return T::default();
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            log::warn!("Discarding unreadable value under '{key}': {e}");
            T::default()
        }
    }
}

pub fn save_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) {
    match serde_json::to_string(value) {
        Ok(encoded) => store.set(key, &encoded),
        Err(e) => log::error!("Failed to encode value for '{key}': {e}"),
    }
}

/// In-memory store, used in tests and for ephemeral sessions
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut values) = self.values.write() {
            values.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut values) = self.values.write() {
            values.remove(key);
        }
    }
}

/// Store backed by a single JSON document in the app data directory.
///
/// The document is read once on open and rewritten after every mutation.
pub struct FileStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Open (or create) `storage.json` inside `app_data_dir`
    pub fn open(app_data_dir: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(app_data_dir)?;
        let path = app_data_dir.join(STORAGE_FILE_NAME);

        let values = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                HashMap::new()
            } else {
                serde_json::from_str(&content)?
            }
        } else {
            HashMap::new()
        };

        log::info!("FileStore: opened {:?} ({} keys)", path, values.len());
        Ok(Self {
            path,
            cache: RwLock::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &HashMap<String, String>) {
        let content = match serde_json::to_string_pretty(values) {
            Ok(content) => content,
            Err(e) => {
                log::error!("Failed to serialize storage: {e}");
                return;
            }
        };
        if let Err(e) = std::fs::write(&self.path, content) {
            log::warn!("Failed to write storage {:?}: {e}", self.path);
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.read().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(key.to_string(), value.to_string());
            self.persist(&cache);
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut cache) = self.cache.write() {
            if cache.remove(key).is_some() {
                self.persist(&cache);
            }
        }
    }
}
