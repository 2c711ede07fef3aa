//! Fixed facts about the persisted key schema.
//!
//! Everything in this file must stay bit-for-bit compatible with stores that
//! already exist on users' machines.  Change a key here and existing settings
//! silently stop loading.

/// Organization half of the store identity.
pub const COMPANY: &str = "OpenTX";

/// Product half of the store identity for the current schema generation.
pub const PRODUCT: &str = "Companion 2.2";

/// Number of radio profile slots.
pub const MAX_PROFILES: usize = 15;

/// Number of joystick calibration slots.
pub const MAX_JOYSTICKS: usize = 8;

/// Key of the schema version marker.
pub const SETTINGS_VERSION_KEY: &str = "settings_version";

/// Value written to [`SETTINGS_VERSION_KEY`] by this schema generation.
///
/// Only bump this together with a new [`PRODUCT`] and a new entry in
/// [`PREVIOUS_VERSIONS`].
pub const SETTINGS_VERSION: &str = "220";

/// Key of the persisted (last user-selected) profile index.
pub const PROFILE_ID_KEY: &str = "profileId";

/// Group holding one sub-group per profile.
pub const PROFILES_GROUP: &str = "Profiles";

/// Group holding the joystick calibration keys.
pub const JOYSTICK_GROUP: &str = "JsCalibration";

/// Group holding one integer revision per firmware type.
pub const FW_REVISIONS_GROUP: &str = "FwRevisions";

/// Keys that are unused and are removed on every load and never imported.
///
/// Update this list whenever [`PRODUCT`] changes.
pub const DEPRECATED_KEYS: &[&str] = &[
    // renamed to avrdudeLocation long ago, but old stores keep re-importing it
    "avrdude_location",
    // removed in 2.1
    "last_simulator",
    // removed in 2.2
    "companionBranch",
    "useCompanionNightlyBuilds",
    "useFirmwareNightlyBuilds",
];

/// Keys never imported from a previous installation.
pub const NON_PORTABLE_KEYS: &[&str] = &["compilation-server"];

/// Keys only imported when tool locations are portable between installs.
///
/// On Windows the tools ship with each Companion install, and `"."` and
/// `"Start Menu Folder"` are written by the installer.
pub const INSTALL_SPECIFIC_KEYS: &[&str] = &[
    "avrdude_location",
    "avrdudeLocation",
    "dfu_location",
    "Start Menu Folder",
    ".",
];

/// A settings store written by an earlier application version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviousVersion {
    /// Label shown to the user and accepted by `import_settings`.
    pub label: &'static str,
    pub organization: &'static str,
    pub product: &'static str,
}

/// Earlier stores, most recent first.  Probing stops at the first hit.
pub const PREVIOUS_VERSIONS: &[PreviousVersion] = &[
    PreviousVersion {
        label: "2.1",
        organization: "OpenTX",
        product: "Companion 2.1",
    },
    PreviousVersion {
        label: "2.0",
        organization: "OpenTX",
        product: "Companion 2.0",
    },
    PreviousVersion {
        label: "1.x",
        organization: "OpenTX",
        product: "OpenTX Companion",
    },
];

/// Looks up a previous version by its label.
pub fn previous_version(label: &str) -> Option<&'static PreviousVersion> {
    PREVIOUS_VERSIONS.iter().find(|v| v.label == label)
}

/// Storage path of profile `index`, e.g. `Profiles/profile2/`.
pub fn profile_path(index: usize) -> String {
    format!("{PROFILES_GROUP}/profile{index}/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_path_matches_existing_layout() {
        assert_eq!(profile_path(0), "Profiles/profile0/");
        assert_eq!(profile_path(14), "Profiles/profile14/");
    }

    #[test]
    fn test_previous_versions_are_probed_newest_first() {
        let labels: Vec<_> = PREVIOUS_VERSIONS.iter().map(|v| v.label).collect();
        assert_eq!(labels, ["2.1", "2.0", "1.x"]);
    }

    #[test]
    fn test_previous_version_lookup() {
        assert_eq!(previous_version("2.0").map(|v| v.product), Some("Companion 2.0"));
        assert!(previous_version("2.2").is_none());
    }
}
