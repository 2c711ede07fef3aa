//! Typed property store: load/store/clear over hierarchical keys.
//!
//! # Two pieces (for beginners)
//!
//! - [`SettingsStore`] is a cheap, cloneable handle to the one backing store
//!   of a settings context.  Every profile, joystick and the facade itself hold
//!   a clone, the way each settings object in a desktop app holds its own
//!   handle to the same settings file.
//! - [`Namespaced`] is implemented by every entity that owns settings.  It
//!   says *where* the entity's keys live ([`Namespaced::settings_path`]) and
//!   provides the typed primitives on top of that location.
//!
//! # Path join rule
//!
//! `path_for_key(key, group)` uses the entity's settings path when `group` is
//! empty and `group` verbatim otherwise, with exactly one `/` between the
//! group and the key:
//!
//! ```text
//! settings_path = "Profiles/profile2/", key = "Name"  ->  "Profiles/profile2/Name"
//! group = "FwRevisions",                key = "opentx-x9d" -> "FwRevisions/opentx-x9d"
//! settings_path = "",                   key = "theme" ->  "theme"
//! ```
//!
//! # Default omission
//!
//! [`Namespaced::write_property`] removes the key when the new value equals
//! the property's default instead of writing it.  A store therefore only ever
//! contains values the user actually changed, and "absent" reads back exactly
//! like "set to default".

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::domain::store::{SettingsBackend, StoreError};
use crate::domain::value::{SettingType, SettingValue};

/// Shared handle to the backing store of one settings context.
///
/// Single-threaded: the handle is `Rc`-based and not `Send`.
#[derive(Clone)]
pub struct SettingsStore {
    backend: Rc<RefCell<Box<dyn SettingsBackend>>>,
}

impl SettingsStore {
    /// Wraps `backend` in a shareable handle.
    pub fn new(backend: impl SettingsBackend + 'static) -> Self {
        Self::from_boxed(Box::new(backend))
    }

    pub fn from_boxed(backend: Box<dyn SettingsBackend>) -> Self {
        Self {
            backend: Rc::new(RefCell::new(backend)),
        }
    }

    /// Raw read of the value at the fully qualified `key`.
    pub fn value(&self, key: &str) -> Result<Option<SettingValue>, StoreError> {
        self.backend.borrow().value(key)
    }

    /// Raw write of `value` at the fully qualified `key`.
    pub fn set_value(&self, key: &str, value: SettingValue) -> Result<(), StoreError> {
        debug!(key, value = %value, "store");
        self.backend.borrow_mut().set_value(key, value)
    }

    /// Removes `key` and everything below it.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        debug!(key, "clear");
        self.backend.borrow_mut().remove(key)
    }

    pub fn contains(&self, key: &str) -> Result<bool, StoreError> {
        self.backend.borrow().contains(key)
    }

    pub fn all_keys(&self) -> Result<Vec<String>, StoreError> {
        self.backend.borrow().all_keys()
    }

    /// Copies every key and value out of the store.
    pub fn snapshot(&self) -> Result<BTreeMap<String, SettingValue>, StoreError> {
        let backend = self.backend.borrow();
        let mut entries = BTreeMap::new();
        for key in backend.all_keys()? {
            if let Some(value) = backend.value(&key)? {
                entries.insert(key, value);
            }
        }
        Ok(entries)
    }

    /// Typed read of a fully qualified key; `default` on absence or type mismatch.
    pub fn load<T: SettingType>(&self, key: &str, default: T) -> Result<T, StoreError> {
        match self.value(key)? {
            None => Ok(default),
            Some(raw) => match T::from_setting(&raw) {
                Some(value) => Ok(value),
                None => {
                    warn!(key, stored = raw.kind(), "stored value has unexpected type, using default");
                    Ok(default)
                }
            },
        }
    }
}

impl fmt::Debug for SettingsStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingsStore")
            .field("handles", &Rc::strong_count(&self.backend))
            .finish()
    }
}

/// An entity whose settings live under one path of the shared store.
pub trait Namespaced {
    /// The store this entity reads and writes.
    fn settings_store(&self) -> &SettingsStore;

    /// Group used when a primitive is called with an empty group.
    fn settings_path(&self) -> String {
        String::new()
    }

    /// Maps a declared property name to its storage key.
    ///
    /// Most entities use the name unchanged; entities that encode their index
    /// in the key (rather than in the path) override this.
    fn property_key<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(name)
    }

    /// Fully qualified storage path for `key` in `group`.
    fn path_for_key(&self, key: &str, group: &str) -> String {
        let mut path = if group.is_empty() {
            self.settings_path()
        } else {
            group.to_string()
        };
        if !path.is_empty() && !path.ends_with('/') {
            path.push('/');
        }
        path.push_str(key);
        path
    }

    /// Reads `key`, falling back to `default` when absent or mistyped.
    fn load<T: SettingType>(&self, key: &str, group: &str, default: T) -> Result<T, StoreError> {
        self.settings_store()
            .load(&self.path_for_key(key, group), default)
    }

    /// Writes `value` at `key` unconditionally.
    fn store<T: SettingType>(&self, value: &T, key: &str, group: &str) -> Result<(), StoreError> {
        self.settings_store()
            .set_value(&self.path_for_key(key, group), value.to_setting())
    }

    /// Deletes `key` (and anything below it).
    fn clear(&self, key: &str, group: &str) -> Result<(), StoreError> {
        self.settings_store().remove(&self.path_for_key(key, group))
    }

    /// Loads `key` and writes the result back, materialising the default.
    fn getset<T: SettingType>(&self, key: &str, group: &str, default: T) -> Result<T, StoreError> {
        let value = self.load(key, group, default)?;
        self.store(&value, key, group)?;
        Ok(value)
    }

    /// Persists a property under the default-omission rule.
    fn write_property<T: SettingType>(&self, key: &str, value: &T, default: &T) -> Result<(), StoreError> {
        if value == default {
            self.clear(key, "")
        } else {
            self.store(value, key, "")
        }
    }
}
