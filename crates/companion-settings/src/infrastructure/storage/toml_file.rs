//! TOML-file settings backend.
//!
//! Hierarchical keys map onto nested TOML tables, so a store holding
//! `settings_version`, `Profiles/profile2/Name` and `JsCalibration/stick0_axe`
//! is written as:
//!
//! ```toml
//! settings_version = "220"
//!
//! [JsCalibration]
//! stick0_axe = 3
//!
//! [Profiles.profile2]
//! Name = "Heli"
//! ```
//!
//! # Value encoding
//!
//! | `SettingValue` | TOML |
//! |----------------|------|
//! | `String`       | string |
//! | `Int`          | integer |
//! | `Bool`         | boolean |
//! | `List`         | array of strings |
//! | `Bytes`        | string `"@ByteArray(<base64>)"` |
//!
//! A key that is both a value and a group (`a` and `a/b`) keeps its own value
//! under the empty key `""` of the group's table.
//!
//! # Write-through
//!
//! The whole file is read once in [`TomlFileBackend::open`].  Every mutation
//! that changes the contents rewrites the file immediately, so there is no
//! `sync()` step to forget.  A file that does not exist opens as an empty
//! store and is only created by the first write.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use toml::{Table, Value};
use tracing::{debug, warn};

use super::memory::MemoryBackend;
use super::normalize_key;
use crate::domain::store::{SettingsBackend, StoreError};
use crate::domain::value::SettingValue;

const BYTE_ARRAY_PREFIX: &str = "@ByteArray(";
const BYTE_ARRAY_SUFFIX: &str = ")";

/// Key under which a group's own value is stored in the group's table.
const GROUP_VALUE_KEY: &str = "";

/// A [`SettingsBackend`] persisted as a single TOML file.
#[derive(Debug)]
pub struct TomlFileBackend {
    path: PathBuf,
    cache: MemoryBackend,
}

impl TomlFileBackend {
    /// Opens the store at `path`, reading it if it exists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] for file-system errors other than
    /// "not found", and [`StoreError::Parse`] if the file is not valid TOML.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let cache = match std::fs::read_to_string(&path) {
            Ok(content) => {
                let table: Table = toml::from_str(&content).map_err(|e| StoreError::Parse {
                    path: path.clone(),
                    message: e.to_string(),
                })?;
                let mut cache = MemoryBackend::new();
                flatten(&table, "", &mut cache);
                debug!(path = %path.display(), keys = cache.len(), "loaded settings store");
                cache
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => MemoryBackend::new(),
            Err(source) => return Err(StoreError::Unavailable { path, source }),
        };
        Ok(Self { path, cache })
    }

    /// Location of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rewrites the backing file from the in-memory contents.
    fn flush(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| StoreError::Unavailable {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let table = nest(&self.cache);
        let content =
            toml::to_string_pretty(&table).map_err(|e| StoreError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|source| StoreError::Unavailable {
            path: self.path.clone(),
            source,
        })
    }
}

impl SettingsBackend for TomlFileBackend {
    fn value(&self, key: &str) -> Result<Option<SettingValue>, StoreError> {
        self.cache.value(key)
    }

    fn set_value(&mut self, key: &str, value: SettingValue) -> Result<(), StoreError> {
        let key = normalize_key(key)?;
        if self.cache.insert(key, value) {
            self.flush()?;
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        let key = normalize_key(key)?;
        if self.cache.remove_tree(key) > 0 {
            self.flush()?;
        }
        Ok(())
    }

    fn all_keys(&self) -> Result<Vec<String>, StoreError> {
        self.cache.all_keys()
    }
}

// ── TOML <-> flat key conversion ──────────────────────────────────────────────

fn flatten(table: &Table, prefix: &str, out: &mut MemoryBackend) {
    for (name, value) in table {
        let key = match (prefix.is_empty(), name.as_str()) {
            (true, _) => name.clone(),
            (false, GROUP_VALUE_KEY) => prefix.to_string(),
            (false, _) => format!("{prefix}/{name}"),
        };
        match value {
            Value::Table(sub) => flatten(sub, &key, out),
            other => {
                let Ok(normalized) = normalize_key(&key) else {
                    warn!(key = %key, "skipping settings value with invalid key");
                    continue;
                };
                match from_toml(other) {
                    Some(v) => {
                        out.insert(normalized, v);
                    }
                    None => warn!(key = %key, "skipping settings value with unsupported TOML type"),
                }
            }
        }
    }
}

fn nest(cache: &MemoryBackend) -> Table {
    let mut root = Table::new();
    for (key, value) in cache.entries() {
        let mut segments: Vec<&str> = key.split('/').collect();
        let leaf = segments.pop().unwrap_or_default();

        let mut table = &mut root;
        for segment in segments {
            let slot = table
                .entry(segment.to_string())
                .or_insert(Value::Table(Table::new()));
            if !slot.is_table() {
                // the group also has a value of its own; keep it under ""
                let own = std::mem::replace(slot, Value::Table(Table::new()));
                if let Value::Table(t) = slot {
                    t.insert(GROUP_VALUE_KEY.to_string(), own);
                }
            }
            table = match slot {
                Value::Table(t) => t,
                _ => unreachable!("slot was just made a table"),
            };
        }

        match table.get_mut(leaf) {
            Some(Value::Table(group)) => {
                group.insert(GROUP_VALUE_KEY.to_string(), to_toml(value));
            }
            _ => {
                table.insert(leaf.to_string(), to_toml(value));
            }
        }
    }
    root
}

fn to_toml(value: &SettingValue) -> Value {
    match value {
        SettingValue::String(s) => Value::String(s.clone()),
        SettingValue::Int(i) => Value::Integer(*i),
        SettingValue::Bool(b) => Value::Boolean(*b),
        SettingValue::List(items) => {
            Value::Array(items.iter().cloned().map(Value::String).collect())
        }
        SettingValue::Bytes(bytes) => Value::String(format!(
            "{BYTE_ARRAY_PREFIX}{}{BYTE_ARRAY_SUFFIX}",
            BASE64.encode(bytes)
        )),
    }
}

fn from_toml(value: &Value) -> Option<SettingValue> {
    match value {
        Value::String(s) => Some(decode_string(s)),
        Value::Integer(i) => Some(SettingValue::Int(*i)),
        Value::Boolean(b) => Some(SettingValue::Bool(*b)),
        Value::Float(f) => Some(SettingValue::String(f.to_string())),
        Value::Datetime(d) => Some(SettingValue::String(d.to_string())),
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .map(SettingValue::List),
        Value::Table(_) => None,
    }
}

fn decode_string(s: &str) -> SettingValue {
    let encoded = s
        .strip_prefix(BYTE_ARRAY_PREFIX)
        .and_then(|rest| rest.strip_suffix(BYTE_ARRAY_SUFFIX));
    match encoded.map(|e| BASE64.decode(e)) {
        Some(Ok(bytes)) => SettingValue::Bytes(bytes),
        _ => SettingValue::String(s.to_string()),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
