//! Key-value persistence seam
//!
//! Every store reads and writes JSON values under a fixed key. The backend is
//! injected as a [`KeyValueStore`] so the same code runs against the SQLite
//! file (`Database`) or an in-process map (`MemoryStore`).

use std::collections::BTreeMap;
use std::sync::RwLock;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};

pub const TRANSACTIONS_KEY: &str = "transactions";
pub const BUDGETS_KEY: &str = "budgets";
pub const OBJECTIVES_KEY: &str = "objectifs";
pub const LEARN_MAP_KEY: &str = "ai_learn_map_v1";
pub const THEME_KEY: &str = "theme";

/// String-keyed storage of raw values
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn keys(&self) -> Result<Vec<String>>;
}

/// Load a JSON value, falling back to `T::default()` when the key is missing,
/// the backend fails, or the stored text does not parse.
pub fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read stored value, using default");
            return T::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "Stored value is not valid JSON, using default");
            T::default()
        }
    }
}

/// Serialize `value` as JSON and write it under `key`
pub fn save_json<T>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store
        .set(key, &raw)
        .map_err(|e| Error::Persistence(format!("failed to write '{}': {}", key, e)))?;
    debug!(key, bytes = raw.len(), "Saved value");
    Ok(())
}

/// In-process store, used by tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| Error::Persistence("memory store lock poisoned".into()))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::Persistence("memory store lock poisoned".into()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|_| Error::Persistence("memory store lock poisoned".into()))?;
        values.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let values = self
            .values
            .read()
            .map_err(|_| Error::Persistence("memory store lock poisoned".into()))?;
        Ok(values.keys().cloned().collect())
    }
}
