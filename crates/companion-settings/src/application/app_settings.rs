//! Settings facade: one object owning every persisted setting of a context.
//!
//! [`AppSettings`] ties the pieces together:
//!
//! - the [`MAX_PROFILES`] radio profiles and [`MAX_JOYSTICKS`] joystick
//!   calibrations, all sharing one [`SettingsStore`];
//! - the firmware revision table;
//! - the flat global options (window geometry, tool locations, UI choices);
//! - profile selection: a *persisted* id that survives restarts and a
//!   *session* id that only lives as long as this object.
//!
//! # Lifecycle (for beginners)
//!
//! ```text
//! AppSettings::open(locator)      AppSettings::new(store, locator)
//!          │                                 │
//!          └──── init() ◄────────────────────┘   (open calls it for you)
//!                  │
//!                  ├─ first_use = store has no settings_version (first call only)
//!                  ├─ convert_settings()      purge / translate old keys
//!                  ├─ profiles[i].init()      i in 0..15
//!                  ├─ joysticks[i].init()     i in 0..8
//!                  ├─ getset(settings_version, "220")
//!                  ├─ load profileId, copy it to the session id
//!                  └─ load every global option
//! ```
//!
//! There is no process-wide instance.  The application creates one
//! `AppSettings` and passes it (or borrows of it) to whoever needs settings.

use std::fmt;

use thiserror::Error;
use tracing::{info, warn};

use super::fw_revision::FwRevision;
use super::joystick::JoystickCalibration;
use super::migration::ImportPolicy;
use super::profile::Profile;
use super::properties::settings_properties;
use super::property_store::{Namespaced, SettingsStore};
use crate::domain::schema::{
    COMPANY, MAX_JOYSTICKS, MAX_PROFILES, PRODUCT, PROFILE_ID_KEY, SETTINGS_VERSION,
    SETTINGS_VERSION_KEY,
};
use crate::domain::store::{StoreError, StoreLocator};

/// Error type for facade operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("{kind} index {index} out of range (max {max})")]
    IndexOutOfRange {
        kind: &'static str,
        index: usize,
        max: usize,
    },
}

// ── Download branch ───────────────────────────────────────────────────────────

/// Release channel used when checking for firmware and application updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DownloadBranch {
    ReleaseStable = 0,
    RcTesting = 1,
    NightlyUnstable = 2,
}

impl DownloadBranch {
    /// Highest branch this build may offer.
    pub const MAX: DownloadBranch = if cfg!(feature = "allow-nightly-builds") {
        DownloadBranch::NightlyUnstable
    } else {
        DownloadBranch::RcTesting
    };

    /// Maps a stored branch number to a branch this build supports.
    pub fn bounded(raw: u32) -> Self {
        let branch = match raw {
            0 => DownloadBranch::ReleaseStable,
            1 => DownloadBranch::RcTesting,
            _ => DownloadBranch::NightlyUnstable,
        };
        branch.min(Self::MAX)
    }
}

// ── Global options ────────────────────────────────────────────────────────────

fn default_app_logs_dir() -> String {
    dirs::document_dir()
        .map(|dir| dir.join("OpenTX").join("DebugLogs"))
        .map(|dir| dir.to_string_lossy().into_owned())
        .unwrap_or_default()
}

settings_properties! {
    /// In-memory values of the flat global options.
    pub struct GlobalValues for AppSettings {
        recent_files, set_recent_files, reset_recent_files, recent_files_default: Vec<String> = ("recentFileList", Vec::new());
        simu_dbg_filters, set_simu_dbg_filters, reset_simu_dbg_filters, simu_dbg_filters_default: Vec<String> = ("simuDbgFilters", Vec::new());

        main_win_geo, set_main_win_geo, reset_main_win_geo, main_win_geo_default: Vec<u8> = ("mainWindowGeometry", Vec::new());
        main_win_state, set_main_win_state, reset_main_win_state, main_win_state_default: Vec<u8> = ("mainWindowState", Vec::new());
        model_edit_geo, set_model_edit_geo, reset_model_edit_geo, model_edit_geo_default: Vec<u8> = ("modelEditGeometry", Vec::new());
        mdi_win_geo, set_mdi_win_geo, reset_mdi_win_geo, mdi_win_geo_default: Vec<u8> = ("mdiWinGeo", Vec::new());
        mdi_win_state, set_mdi_win_state, reset_mdi_win_state, mdi_win_state_default: Vec<u8> = ("mdiWinState", Vec::new());
        compare_win_geo, set_compare_win_geo, reset_compare_win_geo, compare_win_geo_default: Vec<u8> = ("compareWinGeo", Vec::new());

        arm_mcu, set_arm_mcu, reset_arm_mcu, arm_mcu_default: String = ("arm_mcu", "at91sam3s4-9x".to_string());
        avr_arguments, set_avr_arguments, reset_avr_arguments, avr_arguments_default: String = ("avr_arguments", String::new());
        avr_port, set_avr_port, reset_avr_port, avr_port_default: String = ("avr_port", String::new());
        avrdude_location, set_avrdude_location, reset_avrdude_location, avrdude_location_default: String = ("avrdudeLocation", String::new());
        dfu_arguments, set_dfu_arguments, reset_dfu_arguments, dfu_arguments_default: String = ("dfu_arguments", "-a 0".to_string());
        dfu_location, set_dfu_location, reset_dfu_location, dfu_location_default: String = ("dfu_location", String::new());
        samba_location, set_samba_location, reset_samba_location, samba_location_default: String = ("samba_location", String::new());
        samba_port, set_samba_port, reset_samba_port, samba_port_default: String = ("samba_port", "\\USBserial\\COM23".to_string());

        backup_dir, set_backup_dir, reset_backup_dir, backup_dir_default: String = ("backupPath", String::new());
        /// Last directory used for model files.
        eeprom_dir, set_eeprom_dir, reset_eeprom_dir, eeprom_dir_default: String = ("lastDir", String::new());
        flash_dir, set_flash_dir, reset_flash_dir, flash_dir_default: String = ("lastFlashDir", String::new());
        images_dir, set_images_dir, reset_images_dir, images_dir_default: String = ("lastImagesDir", String::new());
        log_dir, set_log_dir, reset_log_dir, log_dir_default: String = ("lastLogDir", String::new());
        lib_dir, set_lib_dir, reset_lib_dir, lib_dir_default: String = ("libraryPath", String::new());
        snapshot_dir, set_snapshot_dir, reset_snapshot_dir, snapshot_dir_default: String = ("snapshotpath", String::new());
        updates_dir, set_updates_dir, reset_updates_dir, updates_dir_default: String = ("lastUpdatesDir", String::new());
        locale, set_locale, reset_locale, locale_default: String = ("locale", String::new());
        /// Google Earth executable.
        ge_path, set_ge_path, reset_ge_path, ge_path_default: String = ("gePath", String::new());
        mcu, set_mcu, reset_mcu, mcu_default: String = ("mcu", "m64".to_string());
        programmer, set_programmer, reset_programmer, programmer_default: String = ("programmer", "usbasp".to_string());
        app_logs_dir, set_app_logs_dir, reset_app_logs_dir, app_logs_dir_default: String = ("appLogsDir", default_app_logs_dir());

        /// Raw stored branch; use [`AppSettings::bounded_opentx_branch`] to act on it.
        opentx_branch, set_opentx_branch, reset_opentx_branch, opentx_branch_default: u32 = ("OpenTxBranch", 0);
        /// What "new model" does: 0 nothing, 1 open the wizard, 2 open the editor.
        new_model_action, set_new_model_action, reset_new_model_action, new_model_action_default: u32 = ("newModelAction", 1);

        embed_splashes, set_embed_splashes, reset_embed_splashes, embed_splashes_default: i32 = ("embedded_splashes", 0);
        fw_server_fails, set_fw_server_fails, reset_fw_server_fails, fw_server_fails_default: i32 = ("fwserver", 0);
        icon_size, set_icon_size, reset_icon_size, icon_size_default: i32 = ("icon_size", 2);
        js_ctrl, set_js_ctrl, reset_js_ctrl, js_ctrl_default: i32 = ("js_ctrl", 0);
        history_size, set_history_size, reset_history_size, history_size_default: i32 = ("history_size", 10);
        general_edit_tab, set_general_edit_tab, reset_general_edit_tab, general_edit_tab_default: i32 = ("generalEditTab", 0);
        theme, set_theme, reset_theme, theme_default: i32 = ("theme", 1);
        warning_id, set_warning_id, reset_warning_id, warning_id_default: i32 = ("warningId", 0);
        back_light, set_back_light, reset_back_light, back_light_default: i32 = ("backLight", 0);
        simu_last_prof_id, set_simu_last_prof_id, reset_simu_last_prof_id, simu_last_prof_id_default: i32 = ("simuLastProfId", -1);

        js_support, set_js_support, reset_js_support, js_support_default: bool = ("js_support", false);
        show_splash, set_show_splash, reset_show_splash, show_splash_default: bool = ("show_splash", true);
        snapshot_to_clipboard, set_snapshot_to_clipboard, reset_snapshot_to_clipboard, snapshot_to_clipboard_default: bool =
            ("snapshot_to_clipboard", false);
        auto_check_app, set_auto_check_app, reset_auto_check_app, auto_check_app_default: bool = ("startup_check_companion", true);
        auto_check_fw, set_auto_check_fw, reset_auto_check_fw, auto_check_fw_default: bool = ("startup_check_fw", true);
        enable_backup, set_enable_backup, reset_enable_backup, enable_backup_default: bool = ("enableBackup", false);
        backup_on_flash, set_backup_on_flash, reset_backup_on_flash, backup_on_flash_default: bool = ("backupOnFlash", true);
        output_display_details, set_output_display_details, reset_output_display_details, output_display_details_default: bool =
            ("outputDisplayDetails", false);
        check_hardware_compatibility, set_check_hardware_compatibility, reset_check_hardware_compatibility, check_hardware_compatibility_default: bool =
            ("checkHardwareCompatibility", true);
        remove_model_slots, set_remove_model_slots, reset_remove_model_slots, remove_model_slots_default: bool = ("removeModelSlots", true);
        maximized, set_maximized, reset_maximized, maximized_default: bool = ("maximized", false);
        tabbed_mdi, set_tabbed_mdi, reset_tabbed_mdi, tabbed_mdi_default: bool = ("tabbedMdi", false);
        app_debug_log, set_app_debug_log, reset_app_debug_log, app_debug_log_default: bool = ("appDebugLog", false);
        fw_trace_log, set_fw_trace_log, reset_fw_trace_log, fw_trace_log_default: bool = ("fwTraceLog", false);
        simu_sw, set_simu_sw, reset_simu_sw, simu_sw_default: bool = ("simuSW", true);
    }
}

// ── Facade ────────────────────────────────────────────────────────────────────

/// Every persisted setting of one settings context.
pub struct AppSettings {
    pub(super) handle: SettingsStore,
    pub(super) locator: Box<dyn StoreLocator>,
    pub(super) import_policy: ImportPolicy,
    profiles: [Profile; MAX_PROFILES],
    joysticks: [JoystickCalibration; MAX_JOYSTICKS],
    fw_revision: FwRevision,
    values: GlobalValues,
    settings_version: String,
    profile_id: usize,
    session_id: usize,
    first_use: Option<bool>,
    pub(super) upgrade_from_version: String,
}

impl Namespaced for AppSettings {
    fn settings_store(&self) -> &SettingsStore {
        &self.handle
    }
}

impl AppSettings {
    /// Builds a context over `store` without reading anything yet.
    ///
    /// `locator` is only used to find the stores of previous versions.
    pub fn new(store: SettingsStore, locator: impl StoreLocator + 'static) -> Self {
        Self {
            profiles: std::array::from_fn(|i| Profile::new(store.clone(), i)),
            joysticks: std::array::from_fn(|i| JoystickCalibration::new(store.clone(), i)),
            fw_revision: FwRevision::new(store.clone()),
            handle: store,
            locator: Box::new(locator),
            import_policy: ImportPolicy::default(),
            values: GlobalValues::default(),
            settings_version: String::new(),
            profile_id: 0,
            session_id: 0,
            first_use: None,
            upgrade_from_version: String::new(),
        }
    }

    /// Opens the current product's store through `locator` and initialises it.
    pub fn open(locator: impl StoreLocator + 'static) -> Result<Self, SettingsError> {
        let backend = locator.open(COMPANY, PRODUCT)?;
        let mut settings = Self::new(SettingsStore::from_boxed(backend), locator);
        settings.init()?;
        Ok(settings)
    }

    /// Replaces the import policy (builder style).
    pub fn with_import_policy(mut self, policy: ImportPolicy) -> Self {
        self.import_policy = policy;
        self
    }

    pub fn import_policy(&self) -> &ImportPolicy {
        &self.import_policy
    }

    /// Runs the initialization sequence described in the module docs.
    ///
    /// Safe to call again: the import path does so to pick up imported keys.
    pub fn init(&mut self) -> Result<(), SettingsError> {
        let first_use = !self.has_current_settings()?;
        let first_use = *self.first_use.get_or_insert(first_use);
        info!(first_use, "initialising settings");

        self.convert_settings()?;

        for profile in self.profiles.iter_mut() {
            profile.init()?;
        }
        for joystick in self.joysticks.iter_mut() {
            joystick.init()?;
        }

        // version marker; only changes together with the product name
        self.settings_version =
            self.getset(SETTINGS_VERSION_KEY, "", SETTINGS_VERSION.to_string())?;

        let stored: i32 = self.load(PROFILE_ID_KEY, "", 0)?;
        self.profile_id = match usize::try_from(stored) {
            Ok(id) if id < MAX_PROFILES => id,
            _ => {
                warn!(stored, "stored profile id out of range, using 0");
                0
            }
        };
        self.session_id = self.profile_id;

        self.values = GlobalValues::load(&*self)?;
        Ok(())
    }

    /// Shared store handle, for raw access.
    pub fn store_handle(&self) -> &SettingsStore {
        &self.handle
    }

    pub fn values(&self) -> &GlobalValues {
        &self.values
    }

    // ── Status ───────────────────────────────────────────────────────────────

    /// `true` iff the store carries a settings version marker.
    pub fn has_current_settings(&self) -> Result<bool, StoreError> {
        self.handle.contains(SETTINGS_VERSION_KEY)
    }

    /// `true` iff the store had no version marker when first initialised.
    ///
    /// `false` before [`init`](Self::init) has run.
    pub fn is_first_use(&self) -> bool {
        self.first_use.unwrap_or(false)
    }

    /// Label of the version settings were imported from, or `""`.
    pub fn previous_version(&self) -> &str {
        &self.upgrade_from_version
    }

    /// Version marker read during the last [`init`](Self::init).
    pub fn settings_version(&self) -> &str {
        &self.settings_version
    }

    /// Stored update branch clamped to what this build supports.
    pub fn bounded_opentx_branch(&self) -> DownloadBranch {
        DownloadBranch::bounded(self.opentx_branch())
    }

    // ── Selection ────────────────────────────────────────────────────────────

    /// Persisted (last user-selected) profile index.
    pub fn profile_id(&self) -> usize {
        self.profile_id
    }

    /// Selects `index` persistently and for this session.
    ///
    /// Out-of-range indices are ignored.
    pub fn set_profile_id(&mut self, index: usize) -> Result<(), StoreError> {
        if index >= MAX_PROFILES {
            return Ok(());
        }
        let stored = index as i32;
        self.store(&stored, PROFILE_ID_KEY, "")?;
        self.profile_id = index;
        self.session_id = index;
        Ok(())
    }

    /// Profile index used by this session.
    pub fn session_id(&self) -> usize {
        self.session_id
    }

    /// Selects `index` for this session only.  Out-of-range indices are ignored.
    pub fn set_session_id(&mut self, index: usize) {
        if index < MAX_PROFILES {
            self.session_id = index;
        }
    }

    // ── Profiles ─────────────────────────────────────────────────────────────

    /// Profile selected for this session.
    pub fn current_profile(&self) -> &Profile {
        self.profile(self.session_id)
    }

    pub fn current_profile_mut(&mut self) -> &mut Profile {
        let index = self.session_id;
        self.profile_mut(index)
    }

    /// Profile `index`, or profile 0 when `index` is out of range.
    pub fn profile(&self, index: usize) -> &Profile {
        let index = if index < MAX_PROFILES { index } else { 0 };
        &self.profiles[index]
    }

    /// Mutable variant of [`profile`](Self::profile), with the same fallback.
    pub fn profile_mut(&mut self, index: usize) -> &mut Profile {
        let index = if index < MAX_PROFILES { index } else { 0 };
        &mut self.profiles[index]
    }

    /// Profile `index`, or [`SettingsError::IndexOutOfRange`].
    pub fn try_profile(&self, index: usize) -> Result<&Profile, SettingsError> {
        self.profiles
            .get(index)
            .ok_or_else(|| out_of_range("profile", index, MAX_PROFILES))
    }

    pub fn try_profile_mut(&mut self, index: usize) -> Result<&mut Profile, SettingsError> {
        self.profiles
            .get_mut(index)
            .ok_or_else(|| out_of_range("profile", index, MAX_PROFILES))
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    /// Configured profiles (those with a stored name), keyed by index.
    pub fn active_profiles(&self) -> Result<std::collections::BTreeMap<usize, String>, StoreError> {
        let mut active = std::collections::BTreeMap::new();
        for profile in &self.profiles {
            if profile.exists_on_disk()? {
                active.insert(profile.index(), profile.name());
            }
        }
        Ok(active)
    }

    /// Copies every field of profile `from` into profile `to`.
    pub fn copy_profile(&mut self, from: usize, to: usize) -> Result<(), SettingsError> {
        let values = self.try_profile(from)?.values().clone();
        self.try_profile_mut(to)?.assign_from_values(&values)?;
        Ok(())
    }

    // ── Joysticks / firmware ─────────────────────────────────────────────────

    /// Joystick calibration `index`, or [`SettingsError::IndexOutOfRange`].
    pub fn joystick(&self, index: usize) -> Result<&JoystickCalibration, SettingsError> {
        self.joysticks
            .get(index)
            .ok_or_else(|| out_of_range("joystick", index, MAX_JOYSTICKS))
    }

    pub fn joystick_mut(&mut self, index: usize) -> Result<&mut JoystickCalibration, SettingsError> {
        self.joysticks
            .get_mut(index)
            .ok_or_else(|| out_of_range("joystick", index, MAX_JOYSTICKS))
    }

    pub fn joysticks(&self) -> &[JoystickCalibration] {
        &self.joysticks
    }

    pub fn fw_revision(&self) -> &FwRevision {
        &self.fw_revision
    }
}

fn out_of_range(kind: &'static str, index: usize, max: usize) -> SettingsError {
    SettingsError::IndexOutOfRange { kind, index, max }
}

impl fmt::Debug for AppSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppSettings")
            .field("settings_version", &self.settings_version)
            .field("profile_id", &self.profile_id)
            .field("session_id", &self.session_id)
            .field("first_use", &self.first_use)
            .field("upgrade_from_version", &self.upgrade_from_version)
            .finish_non_exhaustive()
    }
}
