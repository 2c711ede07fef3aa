//! Integration tests for the settings engine.
//!
//! These tests drive `AppSettings` end-to-end against real TOML stores in a
//! temporary directory, reopening the store between steps to prove that what
//! the facade reports is what was persisted.

use std::path::{Path, PathBuf};

use companion_settings::{
    AppSettings, ImportPolicy, SettingValue, SimulatorOptions, StartupDataType,
    StoreError, StoreLocator, TomlStoreLocator, MAX_PROFILES,
};
use uuid::Uuid;

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Temporary store root, removed on drop.
struct TempRoot(PathBuf);

impl TempRoot {
    fn new() -> Self {
        Self(std::env::temp_dir().join(format!("companion_settings_it_{}", Uuid::new_v4())))
    }

    fn locator(&self) -> TomlStoreLocator {
        TomlStoreLocator::new(&self.0)
    }

    fn path(&self) -> &Path {
        &self.0
    }

    /// Writes raw TOML as the store of `organization`/`product`.
    fn seed(&self, organization: &str, product: &str, content: &str) {
        let path = self.locator().store_path(organization, product);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content).unwrap();
    }

    fn open(&self) -> AppSettings {
        AppSettings::open(self.locator()).expect("store must open")
    }

    fn raw_keys(&self) -> Vec<String> {
        self.locator()
            .open("OpenTX", "Companion 2.2")
            .unwrap()
            .all_keys()
            .unwrap()
    }

    fn raw_value(&self, key: &str) -> Option<SettingValue> {
        self.locator()
            .open("OpenTX", "Companion 2.2")
            .unwrap()
            .value(key)
            .unwrap()
    }
}

impl Drop for TempRoot {
    fn drop(&mut self) {
        std::fs::remove_dir_all(&self.0).ok();
    }
}

// ── First use ─────────────────────────────────────────────────────────────────

#[test]
fn test_first_use_on_empty_store() {
    // Arrange
    let root = TempRoot::new();

    // Act
    let settings = root.open();

    // Assert
    assert!(settings.is_first_use());
    assert!(settings.active_profiles().unwrap().is_empty());
    assert_eq!(settings.current_profile().index(), 0);
    assert_eq!(settings.previous_version(), "");
    assert_eq!(root.raw_keys(), vec!["settings_version".to_string()]);
    assert_eq!(
        root.raw_value("settings_version"),
        Some(SettingValue::String("220".into()))
    );
}

#[test]
fn test_second_open_is_not_first_use() {
    let root = TempRoot::new();
    drop(root.open());

    let settings = root.open();

    assert!(!settings.is_first_use());
    assert!(settings.has_current_settings().unwrap());
}

#[test]
fn test_existing_store_lists_named_profile() {
    // Arrange
    let root = TempRoot::new();
    root.seed(
        "OpenTX",
        "Companion 2.2",
        "settings_version = \"220\"\n\n[Profiles.profile2]\nName = \"Heli\"\n",
    );

    // Act
    let settings = root.open();

    // Assert
    let active = settings.active_profiles().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active.get(&2).map(String::as_str), Some("Heli"));
    assert!(!settings.is_first_use());
}

// ── Default omission ──────────────────────────────────────────────────────────

#[test]
fn test_default_values_are_never_written() {
    // Arrange
    let root = TempRoot::new();
    let mut settings = root.open();

    // Act: set every type to a non-default, then back to the default
    settings.set_history_size(25).unwrap();
    settings.set_show_splash(false).unwrap();
    settings.set_mcu("m2560").unwrap();
    settings.set_main_win_geo(vec![1u8, 2, 3]).unwrap();
    settings.profile_mut(4).set_volume_gain(3).unwrap();

    settings.set_history_size(10).unwrap();
    settings.set_show_splash(true).unwrap();
    settings.reset_mcu().unwrap();
    settings.set_main_win_geo(Vec::new()).unwrap();
    settings.profile_mut(4).reset_volume_gain().unwrap();

    // Assert
    assert_eq!(root.raw_keys(), vec!["settings_version".to_string()]);
}

#[test]
fn test_non_default_values_survive_reopen() {
    // Arrange
    let root = TempRoot::new();
    let mut settings = root.open();
    settings.set_history_size(25).unwrap();
    settings.set_recent_files(vec!["a.otx".to_string()]).unwrap();
    settings.set_compare_win_geo(vec![0u8, 255, 7]).unwrap();
    settings.set_opentx_branch(1u32).unwrap();
    settings.joystick_mut(2).unwrap().set_stick_axe(1).unwrap();

    // Act
    let reopened = root.open();

    // Assert
    assert_eq!(reopened.history_size(), 25);
    assert_eq!(reopened.recent_files(), vec!["a.otx".to_string()]);
    assert_eq!(reopened.compare_win_geo(), vec![0u8, 255, 7]);
    assert_eq!(reopened.opentx_branch(), 1);
    assert!(reopened.joystick(2).unwrap().exists_on_disk().unwrap());
    assert_eq!(reopened.joystick(2).unwrap().stick_axe(), 1);
}

// ── Profiles ──────────────────────────────────────────────────────────────────

#[test]
fn test_profile_round_trip_including_simulator_options() {
    // Arrange
    let root = TempRoot::new();
    let mut settings = root.open();
    let options = SimulatorOptions {
        startup_data_type: StartupDataType::DataFolder,
        firmware_id: "opentx-x9d+".to_string(),
        data_folder: "/home/pilot/models".to_string(),
        window_geometry: vec![9, 8, 7],
        ..SimulatorOptions::default()
    };
    {
        let profile = settings.profile_mut(6);
        profile.set_name("Plane").unwrap();
        profile.set_fw_type("opentx-x9d+").unwrap();
        profile.set_burn_firmware(true).unwrap();
        profile.set_simulator_options(options.clone()).unwrap();
    }

    // Act
    let reopened = root.open();

    // Assert
    let profile = reopened.profile(6);
    assert_eq!(profile.name(), "Plane");
    assert_eq!(profile.fw_type(), "opentx-x9d+");
    assert!(profile.burn_firmware());
    assert_eq!(profile.simulator_options(), options);
    assert_eq!(profile.volume_gain(), 10);
    assert_eq!(reopened.profile(5).name(), "");
}

#[test]
fn test_removed_profile_is_gone_after_reopen() {
    // Arrange
    let root = TempRoot::new();
    let mut settings = root.open();
    settings.profile_mut(1).set_name("Quad").unwrap();
    settings.profile_mut(1).set_sd_path("/media/sd").unwrap();
    settings.profile_mut(2).set_name("Heli").unwrap();

    // Act
    settings.profile_mut(1).remove().unwrap();
    let reopened = root.open();

    // Assert
    let active = reopened.active_profiles().unwrap();
    assert_eq!(active.keys().copied().collect::<Vec<_>>(), vec![2]);
    assert!(!root
        .raw_keys()
        .iter()
        .any(|k| k.starts_with("Profiles/profile1/")));
}

#[test]
fn test_copy_profile_persists_under_target_path() {
    let root = TempRoot::new();
    let mut settings = root.open();
    settings.profile_mut(0).set_name("Source").unwrap();
    settings.profile_mut(0).set_channel_order(2).unwrap();

    settings.copy_profile(0, MAX_PROFILES - 1).unwrap();

    let reopened = root.open();
    assert_eq!(reopened.profile(14).name(), "Source");
    assert_eq!(reopened.profile(14).channel_order(), 2);
    assert_eq!(reopened.profile(14).index(), 14);
}

// ── Selection ─────────────────────────────────────────────────────────────────

#[test]
fn test_persisted_and_session_ids() {
    // Arrange
    let root = TempRoot::new();
    let mut settings = root.open();

    // Act
    settings.set_profile_id(3).unwrap();
    settings.set_session_id(7);

    // Assert
    assert_eq!(settings.current_profile().index(), 7);
    assert_eq!(settings.profile_id(), 3);
    let reopened = root.open();
    assert_eq!(reopened.profile_id(), 3);
    assert_eq!(reopened.session_id(), 3);
}

// ── Migration ─────────────────────────────────────────────────────────────────

const V21_STORE: &str = r#"
settings_version = "210"
theme = 2
last_simulator = "x9d"
useWizard = true
compilation-server = "http://builds.example"
avrdudeLocation = "C:/Program Files/avrdude"

[Profiles.profile2]
Name = "Heli"
fwType = "opentx-x9d+"

[FwRevisions]
"opentx-x9d+" = 2201
"#;

#[test]
fn test_previous_version_is_found_and_imported() {
    // Arrange
    let root = TempRoot::new();
    root.seed("OpenTX", "Companion 2.1", V21_STORE);
    root.seed("OpenTX", "OpenTX Companion", "settings_version = \"160\"\n");
    let settings = root.open();
    let mut settings = settings.with_import_policy(ImportPolicy {
        exclude_install_specific: true,
    });
    assert!(settings.is_first_use());

    // Act
    let previous = settings.find_previous_version_settings().unwrap();
    let label = previous.map(|v| v.label).unwrap();
    let imported = settings.import_settings(label).unwrap();

    // Assert
    assert!(imported);
    assert_eq!(label, "2.1");
    assert_eq!(settings.previous_version(), "2.1");
    assert_eq!(settings.theme(), 2);
    assert_eq!(settings.new_model_action(), 1);
    assert_eq!(settings.profile(2).name(), "Heli");
    assert_eq!(settings.fw_revision().get("opentx-x9d+").unwrap(), 2201);
    let keys = root.raw_keys();
    for excluded in [
        "last_simulator",
        "useWizard",
        "compilation-server",
        "avrdudeLocation",
    ] {
        assert!(!keys.contains(&excluded.to_string()), "{excluded} must not be imported");
    }
    assert!(settings.is_first_use());
}

#[test]
fn test_probing_does_not_create_missing_stores() {
    let root = TempRoot::new();
    let settings = root.open();

    assert_eq!(settings.find_previous_version_settings().unwrap(), None);
    assert!(settings.previous_versions().unwrap().is_empty());
    assert!(!root.path().join("OpenTX").join("Companion 2.1.toml").exists());
}

#[test]
fn test_unknown_import_label_is_rejected() {
    let root = TempRoot::new();
    let mut settings = root.open();

    assert!(!settings.import_settings("9.9").unwrap());
    assert_eq!(settings.previous_version(), "");
    assert_eq!(root.raw_keys(), vec!["settings_version".to_string()]);
}

#[test]
fn test_corrupt_previous_store_is_skipped_and_not_imported() {
    // Arrange
    let root = TempRoot::new();
    root.seed("OpenTX", "Companion 2.1", "settings_version = [unterminated\n");
    root.seed("OpenTX", "Companion 2.0", "settings_version = \"200\"\ntheme = 3\n");
    let mut settings = root.open();

    // Act
    let found = settings.find_previous_version_settings().unwrap();
    let failed = settings.import_settings("2.1");

    // Assert
    assert_eq!(found.map(|v| v.label), Some("2.0"));
    assert!(failed.is_err());
    assert_eq!(settings.previous_version(), "");
    assert!(settings.import_settings("2.0").unwrap());
    assert_eq!(settings.previous_version(), "2.0");
    assert_eq!(settings.theme(), 3);
}

#[test]
fn test_deprecated_keys_are_purged_on_open() {
    let root = TempRoot::new();
    root.seed(
        "OpenTX",
        "Companion 2.2",
        "settings_version = \"220\"\ncompanionBranch = 1\nwarningId = 7\nhistory_size = 12\n",
    );

    let settings = root.open();

    assert_eq!(settings.history_size(), 12);
    assert_eq!(settings.warning_id(), 0);
    assert_eq!(
        root.raw_keys(),
        vec!["history_size".to_string(), "settings_version".to_string()]
    );
}

// ── Failures ──────────────────────────────────────────────────────────────────

#[test]
fn test_malformed_store_is_reported() {
    let root = TempRoot::new();
    root.seed("OpenTX", "Companion 2.2", "settings_version = [unterminated\n");

    let result = AppSettings::open(root.locator());

    assert!(matches!(
        result,
        Err(companion_settings::SettingsError::Store(StoreError::Parse { .. }))
    ));
}
