//! Abstractions over the backing key-value store.
//!
//! The settings engine never touches a file, registry hive or database
//! directly.  It talks to a [`SettingsBackend`], and it finds the stores of
//! earlier installations through a [`StoreLocator`].  Concrete
//! implementations live in `infrastructure::storage`.
//!
//! # Keys
//!
//! Keys are hierarchical, `/`-separated strings such as
//! `Profiles/profile2/Name`.  A key may have sub-keys; removing a key also
//! removes every key below it, which is how a whole profile is deleted in one
//! call.

use std::path::PathBuf;

use thiserror::Error;

use super::value::SettingValue;

/// Error type for backing store operations.
///
/// Type mismatches are *not* errors; they are resolved by the typed layer.
/// Everything here means the store itself could not be used.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be read from or written to.
    #[error("persistence unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The store exists but its contents could not be parsed.
    #[error("failed to parse settings store {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The in-memory contents could not be encoded for writing.
    #[error("failed to serialize settings store: {0}")]
    Serialize(String),

    /// The key is empty or cannot be represented by this store.
    #[error("invalid settings key {0:?}")]
    InvalidKey(String),
}

/// An untyped hierarchical key-value store.
///
/// Implementations are used from a single thread.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsBackend {
    /// Returns the value stored at `key`, or `None` if absent.
    fn value(&self, key: &str) -> Result<Option<SettingValue>, StoreError>;

    /// Writes `value` at `key`, replacing any previous value.
    fn set_value(&mut self, key: &str, value: SettingValue) -> Result<(), StoreError>;

    /// Removes `key` and every key below it.  Removing an absent key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Returns `true` if a value is stored at `key`.
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.value(key)?.is_some())
    }

    /// Returns every key that holds a value, in ascending order.
    fn all_keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Opens settings stores by their organization/product identity.
///
/// Used by the migration engine to find the stores of earlier installations.
#[cfg_attr(test, mockall::automock)]
pub trait StoreLocator {
    /// Opens the store for `organization`/`product`.
    ///
    /// A store that does not exist yet opens as empty; opening must not create it.
    fn open(&self, organization: &str, product: &str)
        -> Result<Box<dyn SettingsBackend>, StoreError>;
}
