//! Migration engine: cleanup of the current store and import from older ones.
//!
//! Two independent halves:
//!
//! 1. [`AppSettings::convert_settings`] runs on every `init()`, before any
//!    field is read.  It translates keys whose meaning changed and removes
//!    keys no version reads any more.  Running it twice changes nothing.
//! 2. [`AppSettings::find_previous_version_settings`] and
//!    [`AppSettings::import_settings`] run on demand, typically when
//!    [`AppSettings::is_first_use`] is true.  They locate the store of an
//!    earlier product generation and copy its keys over.
//!
//! Import is additive: keys already in the current store are overwritten by
//! the imported value, keys only in the current store are kept.

use tracing::{debug, info, warn};

use super::app_settings::{AppSettings, SettingsError};
use super::property_store::Namespaced;
use crate::domain::schema::{
    self, PreviousVersion, DEPRECATED_KEYS, INSTALL_SPECIFIC_KEYS, NON_PORTABLE_KEYS,
    PREVIOUS_VERSIONS, SETTINGS_VERSION_KEY,
};
use crate::domain::store::StoreError;

/// Boolean predecessor of `newModelAction`.
const USE_WIZARD_KEY: &str = "useWizard";
const NEW_MODEL_ACTION_KEY: &str = "newModelAction";
const WARNING_ID_KEY: &str = "warningId";

/// `warningId` value written by pre-release builds with a different meaning.
const STALE_WARNING_ID: i32 = 7;

/// Which keys [`AppSettings::import_settings`] refuses to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportPolicy {
    /// Skip tool locations and installer keys that point into a previous
    /// installation's directory.
    pub exclude_install_specific: bool,
}

impl Default for ImportPolicy {
    /// Tool locations are install-specific on Windows only.
    fn default() -> Self {
        Self {
            exclude_install_specific: cfg!(target_os = "windows"),
        }
    }
}

impl ImportPolicy {
    /// `true` iff `key` must not be imported.
    pub fn is_excluded(&self, key: &str) -> bool {
        DEPRECATED_KEYS.contains(&key)
            || NON_PORTABLE_KEYS.contains(&key)
            || (self.exclude_install_specific && INSTALL_SPECIFIC_KEYS.contains(&key))
    }
}

impl AppSettings {
    /// Translates and purges outdated keys in the current store.
    pub fn convert_settings(&mut self) -> Result<(), StoreError> {
        if self.handle.contains(USE_WIZARD_KEY)? {
            if !self.handle.contains(NEW_MODEL_ACTION_KEY)? {
                let use_wizard: bool = self.load(USE_WIZARD_KEY, "", false)?;
                let action: u32 = if use_wizard { 1 } else { 2 };
                debug!(use_wizard, action, "converting useWizard");
                self.set_new_model_action(action)?;
            }
            self.clear(USE_WIZARD_KEY, "")?;
        }

        if self.handle.contains(WARNING_ID_KEY)? {
            let warning_id: i32 = self.load(WARNING_ID_KEY, "", 0)?;
            if warning_id == STALE_WARNING_ID {
                self.reset_warning_id()?;
            }
        }

        for key in DEPRECATED_KEYS {
            if self.handle.contains(key)? {
                debug!(key, "removing deprecated key");
                self.clear(key, "")?;
            }
        }
        Ok(())
    }

    /// Newest earlier version whose store carries a version marker.
    pub fn find_previous_version_settings(
        &self,
    ) -> Result<Option<&'static PreviousVersion>, StoreError> {
        for version in PREVIOUS_VERSIONS {
            if self.has_version_marker(version)? {
                debug!(label = version.label, "found previous settings");
                return Ok(Some(version));
            }
        }
        Ok(None)
    }

    /// Every earlier version with a store, newest first.
    pub fn previous_versions(&self) -> Result<Vec<&'static PreviousVersion>, StoreError> {
        let mut found = Vec::new();
        for version in PREVIOUS_VERSIONS {
            if self.has_version_marker(version)? {
                found.push(version);
            }
        }
        Ok(found)
    }

    /// Copies the keys of the store written by version `label` into the
    /// current store, then re-runs `init()`.
    ///
    /// Returns `Ok(false)` without touching anything when `label` is unknown.
    pub fn import_settings(&mut self, label: &str) -> Result<bool, SettingsError> {
        self.upgrade_from_version.clear();

        let Some(version) = schema::previous_version(label) else {
            warn!(label, "unknown settings version, nothing imported");
            return Ok(false);
        };

        let source = self.locator.open(version.organization, version.product)?;
        let mut copied = 0usize;
        let mut skipped = Vec::new();
        for key in source.all_keys()? {
            if self.import_policy.is_excluded(&key) {
                skipped.push(key);
                continue;
            }
            if let Some(value) = source.value(&key)? {
                self.handle.set_value(&key, value)?;
                copied += 1;
            }
        }
        info!(
            from = version.label,
            copied,
            skipped = ?skipped,
            "imported settings"
        );

        self.upgrade_from_version = version.label.to_string();
        self.init()?;
        Ok(true)
    }

    /// An unreadable store counts as having no marker so older stores are
    /// still probed.  I/O failures other than parsing are reported.
    fn has_version_marker(&self, version: &PreviousVersion) -> Result<bool, StoreError> {
        match self.locator.open(version.organization, version.product) {
            Ok(store) => store.contains(SETTINGS_VERSION_KEY),
            Err(StoreError::Parse { path, message }) => {
                warn!(
                    label = version.label,
                    path = %path.display(),
                    %message,
                    "skipping unreadable previous settings store"
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
