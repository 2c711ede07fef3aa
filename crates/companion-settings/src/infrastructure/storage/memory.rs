//! In-memory settings backend.
//!
//! Used directly by tests and as the cache behind [`super::toml_file::TomlFileBackend`].

use std::collections::BTreeMap;

use super::normalize_key;
use crate::domain::store::{SettingsBackend, StoreError};
use crate::domain::value::SettingValue;

/// A [`SettingsBackend`] that keeps every key in a sorted map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryBackend {
    entries: BTreeMap<String, SettingValue>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with `entries`.
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, SettingValue)>,
    {
        Self {
            entries: entries.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    /// Read-only view of every stored key and value.
    pub fn entries(&self) -> &BTreeMap<String, SettingValue> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts without validation; returns `true` if the stored value changed.
    pub(crate) fn insert(&mut self, key: &str, value: SettingValue) -> bool {
        if self.entries.get(key) == Some(&value) {
            return false;
        }
        self.entries.insert(key.to_string(), value);
        true
    }

    /// Removes `key` and its sub-keys, returning how many values were dropped.
    pub(crate) fn remove_tree(&mut self, key: &str) -> usize {
        let prefix = format!("{key}/");
        let before = self.entries.len();
        self.entries
            .retain(|k, _| k.as_str() != key && !k.starts_with(&prefix));
        before - self.entries.len()
    }
}

impl SettingsBackend for MemoryBackend {
    fn value(&self, key: &str) -> Result<Option<SettingValue>, StoreError> {
        let key = normalize_key(key)?;
        Ok(self.entries.get(key).cloned())
    }

    fn set_value(&mut self, key: &str, value: SettingValue) -> Result<(), StoreError> {
        let key = normalize_key(key)?;
        self.insert(key, value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let key = normalize_key(key)?;
        self.remove_tree(key);
        Ok(())
    }

    fn all_keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.keys().cloned().collect())
    }
}
