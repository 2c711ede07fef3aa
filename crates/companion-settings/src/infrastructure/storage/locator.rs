//! Store locators: map an organization/product pair to a backend.
//!
//! Each installation of the application keeps its settings in a store named
//! after the organization and product, the same way the platform settings
//! APIs do (`~/.config/OpenTX/Companion 2.2.conf` and friends).  Knowing the
//! identities of earlier products is all the migration engine needs to find
//! their stores.
//!
//! | Locator | Store location |
//! |---------|----------------|
//! | [`TomlStoreLocator`]   | `<root>/<organization>/<product>.toml` |
//! | [`MemoryStoreLocator`] | in-process map, for tests |

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::debug;

use super::memory::MemoryBackend;
use super::toml_file::TomlFileBackend;
use crate::domain::store::{SettingsBackend, StoreError, StoreLocator};

/// Locates TOML stores below a root directory.
#[derive(Debug, Clone)]
pub struct TomlStoreLocator {
    root: PathBuf,
}

impl TomlStoreLocator {
    /// Creates a locator rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Creates a locator rooted at the platform config directory.
    ///
    /// Returns `None` when the platform config directory cannot be determined
    /// (e.g. `HOME` unset in a stripped container).
    pub fn platform_default() -> Option<Self> {
        dirs::config_dir().map(Self::new)
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// Path of the store file for `organization`/`product`.
    pub fn store_path(&self, organization: &str, product: &str) -> PathBuf {
        self.root
            .join(organization)
            .join(format!("{product}.toml"))
    }

    /// Opens the store as its concrete type.
    pub fn open_toml(&self, organization: &str, product: &str) -> Result<TomlFileBackend, StoreError> {
        let path = self.store_path(organization, product);
        debug!(path = %path.display(), "opening settings store");
        TomlFileBackend::open(path)
    }
}

impl StoreLocator for TomlStoreLocator {
    fn open(
        &self,
        organization: &str,
        product: &str,
    ) -> Result<Box<dyn SettingsBackend>, StoreError> {
        Ok(Box::new(self.open_toml(organization, product)?))
    }
}

/// Serves snapshots of in-memory stores registered up front.
///
/// [`StoreLocator::open`] returns a copy, so the migration engine can read a
/// registered store but never modify it.
#[derive(Debug, Clone, Default)]
pub struct MemoryStoreLocator {
    stores: HashMap<(String, String), MemoryBackend>,
}

impl MemoryStoreLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `backend` as the store of `organization`/`product`.
    pub fn insert(&mut self, organization: &str, product: &str, backend: MemoryBackend) {
        self.stores
            .insert((organization.to_string(), product.to_string()), backend);
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with_store(mut self, organization: &str, product: &str, backend: MemoryBackend) -> Self {
        self.insert(organization, product, backend);
        self
    }
}

impl StoreLocator for MemoryStoreLocator {
    fn open(
        &self,
        organization: &str,
        product: &str,
    ) -> Result<Box<dyn SettingsBackend>, StoreError> {
        let backend = self
            .stores
            .get(&(organization.to_string(), product.to_string()))
            .cloned()
            .unwrap_or_default();
        Ok(Box::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::SettingValue;
    use uuid::Uuid;

    #[test]
    fn test_store_path_joins_organization_and_product() {
        let locator = TomlStoreLocator::new("/tmp/settings");
        assert_eq!(
            locator.store_path("OpenTX", "Companion 2.1"),
            PathBuf::from("/tmp/settings/OpenTX/Companion 2.1.toml")
        );
    }

    #[test]
    fn test_toml_locator_reads_what_was_written() {
        // Arrange
        let root = std::env::temp_dir().join(format!("companion_locator_{}", Uuid::new_v4()));
        let locator = TomlStoreLocator::new(&root);
        let mut store = locator.open("OpenTX", "Companion 2.0").unwrap();
        store
            .set_value("settings_version", SettingValue::String("200".into()))
            .unwrap();

        // Act
        let reopened = locator.open("OpenTX", "Companion 2.0").unwrap();

        // Assert
        assert!(reopened.contains("settings_version").unwrap());
        assert!(root.join("OpenTX").join("Companion 2.0.toml").exists());

        std::fs::remove_dir_all(&root).ok();
    }

    #[test]
    fn test_memory_locator_opens_unknown_store_as_empty() {
        let locator = MemoryStoreLocator::new();
        let store = locator.open("OpenTX", "Companion 2.1").unwrap();
        assert!(store.all_keys().unwrap().is_empty());
    }

    #[test]
    fn test_memory_locator_returns_a_copy() {
        // Arrange
        let locator = MemoryStoreLocator::new().with_store(
            "OpenTX",
            "Companion 2.1",
            MemoryBackend::from_entries([("theme", SettingValue::Int(2))]),
        );

        // Act
        let mut first = locator.open("OpenTX", "Companion 2.1").unwrap();
        first.remove("theme").unwrap();
        let second = locator.open("OpenTX", "Companion 2.1").unwrap();

        // Assert
        assert!(second.contains("theme").unwrap());
    }
}
