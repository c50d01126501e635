//! User-confirmed token → category associations

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::storage::{self, KeyValueStore, LEARN_MAP_KEY};

/// Last-write-wins map from normalized token to category name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnedTokens {
    map: BTreeMap<String, String>,
}

impl LearnedTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from the store; unreadable data yields an empty map
    pub fn load(store: &dyn KeyValueStore) -> Self {
        storage::load_or_default(store, LEARN_MAP_KEY)
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<()> {
        storage::save_json(store, LEARN_MAP_KEY, self)
    }

    pub fn get(&self, token: &str) -> Option<&str> {
        self.map.get(token).map(String::as_str)
    }

    pub fn insert(&mut self, token: impl Into<String>, category: impl Into<String>) {
        self.map.insert(token.into(), category.into());
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn test_last_write_wins() {
        let mut learned = LearnedTokens::new();
        learned.insert("netflix", "Loisirs");
        learned.insert("netflix", "Abonnements");
        assert_eq!(learned.get("netflix"), Some("Abonnements"));
        assert_eq!(learned.len(), 1);
    }

    #[test]
    fn test_persists_as_flat_object() {
        let store = MemoryStore::new();
        let mut learned = LearnedTokens::new();
        learned.insert("iga", "Alimentation");
        learned.save(&store).unwrap();

        let raw = store.get(LEARN_MAP_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"iga":"Alimentation"}"#);

        let loaded = LearnedTokens::load(&store);
        assert_eq!(loaded, learned);
    }

    #[test]
    fn test_load_malformed_is_empty() {
        let store = MemoryStore::new();
        store.set(LEARN_MAP_KEY, "[1,2").unwrap();
        assert!(LearnedTokens::load(&store).is_empty());
    }
}
