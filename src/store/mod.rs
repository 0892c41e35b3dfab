//! Object store for fitted artifacts
//!
//! Training persists fitted transformers and the encoded-column schema;
//! inference retrieves them via keys carried in [`ModelInfo`]. The store
//! is an explicitly injected collaborator, never ambient global state.
//!
//! Keys are constructed as `"{name}_{timestamp}"`; the stored object adds
//! a `.json` suffix. Model Info carries the extension-less key.

use crate::error::{PrepError, Result};
use parking_lot::RwLock;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

/// Narrow persistence interface over the remote object store.
pub trait ObjectStore {
    /// Store raw bytes under a key, overwriting any existing object.
    fn put(&self, key: &str, payload: &[u8]) -> Result<()>;

    /// Fetch the bytes stored under a key.
    fn get(&self, key: &str) -> Result<Vec<u8>>;
}

/// Serialize an artifact and store it under `"{name}_{timestamp}"`.
///
/// Returns the extension-less key for embedding in Model Info.
pub fn save_object<T: Serialize>(
    store: &dyn ObjectStore,
    obj: &T,
    name: &str,
    timestamp: i64,
) -> Result<String> {
    let key = format!("{name}_{timestamp}");
    let payload = serde_json::to_vec(obj)?;
    store.put(&storage_key(&key), &payload)?;
    Ok(key)
}

/// Fetch and deserialize an artifact by its extension-less key.
pub fn get_object<T: DeserializeOwned>(store: &dyn ObjectStore, key: &str) -> Result<T> {
    let payload = store.get(&storage_key(key))?;
    Ok(serde_json::from_slice(&payload)?)
}

fn storage_key(key: &str) -> String {
    format!("{key}.json")
}

/// Seconds since the epoch, for keying a training run's artifacts.
pub fn timestamp_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Description of a deployed model's persisted artifacts.
///
/// `objects` maps logical artifact names (`encoders`, `imputer`,
/// optionally `scaler`) to their store keys.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelInfo {
    pub objects: HashMap<String, String>,
}

impl ModelInfo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(mut self, name: impl Into<String>, key: impl Into<String>) -> Self {
        self.objects.insert(name.into(), key.into());
        self
    }

    /// Look up the store key for a logical artifact name.
    pub fn object_key(&self, name: &str) -> Result<&str> {
        self.objects
            .get(name)
            .map(|k| k.as_str())
            .ok_or_else(|| PrepError::ArtifactNotFound(name.to_string()))
    }
}

/// Directory-backed store, one file per object.
pub struct LocalStore {
    base_dir: PathBuf,
}

impl LocalStore {
    pub fn new(base_dir: PathBuf) -> Self {
        let _ = fs::create_dir_all(&base_dir);
        Self { base_dir }
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(key)
    }
}

impl ObjectStore for LocalStore {
    fn put(&self, key: &str, payload: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.base_dir)?;
        fs::write(self.object_path(key), payload)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(key);
        if !path.exists() {
            return Err(PrepError::ArtifactNotFound(key.to_string()));
        }
        Ok(fs::read(path)?)
    }
}

/// In-memory store for tests and single-process runs.
#[derive(Default)]
pub struct MemoryStore {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ObjectStore for MemoryStore {
    fn put(&self, key: &str, payload: &[u8]) -> Result<()> {
        self.objects
            .write()
            .insert(key.to_string(), payload.to_vec());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        self.objects
            .read()
            .get(key)
            .cloned()
            .ok_or_else(|| PrepError::ArtifactNotFound(key.to_string()))
    }
}
