//! Last known firmware revision per firmware type.
//!
//! Stored flat under `FwRevisions/`, one integer per firmware type string,
//! e.g. `FwRevisions/opentx-x9d+ = 2201`.  Older stores hold the revision as a
//! decimal string; reads accept both.

use std::collections::BTreeMap;

use tracing::debug;

use super::property_store::{Namespaced, SettingsStore};
use crate::domain::schema;
use crate::domain::store::StoreError;

/// Revision reported for a firmware type that was never recorded.
const UNKNOWN_REVISION: i32 = 0;

/// Table of firmware revisions keyed by firmware type.
#[derive(Debug, Clone)]
pub struct FwRevision {
    handle: SettingsStore,
}

impl Namespaced for FwRevision {
    fn settings_store(&self) -> &SettingsStore {
        &self.handle
    }

    fn settings_path(&self) -> String {
        format!("{}/", schema::FW_REVISIONS_GROUP)
    }
}

impl FwRevision {
    pub(crate) fn new(handle: SettingsStore) -> Self {
        Self { handle }
    }

    /// Revision recorded for `fw_type`; 0 when absent or not numeric.
    pub fn get(&self, fw_type: &str) -> Result<i32, StoreError> {
        self.load(fw_type, "", UNKNOWN_REVISION)
    }

    /// Records `revision` for `fw_type`.  Recording 0 clears the entry.
    pub fn set(&self, fw_type: &str, revision: i32) -> Result<(), StoreError> {
        debug!(fw_type, revision, "recording firmware revision");
        self.write_property(fw_type, &revision, &UNKNOWN_REVISION)
    }

    /// Forgets the revision of `fw_type`.
    pub fn remove(&self, fw_type: &str) -> Result<(), StoreError> {
        self.clear(fw_type, "")
    }

    /// Every recorded revision, keyed by firmware type.
    pub fn all(&self) -> Result<BTreeMap<String, i32>, StoreError> {
        let prefix = self.settings_path();
        let mut revisions = BTreeMap::new();
        for key in self.handle.all_keys()? {
            let Some(fw_type) = key.strip_prefix(&prefix) else {
                continue;
            };
            if fw_type.contains('/') {
                continue;
            }
            revisions.insert(fw_type.to_string(), self.get(fw_type)?);
        }
        Ok(revisions)
    }
}
