//! Radio profiles: independently keyed configuration sets.
//!
//! A profile bundles everything Companion needs to know about one physical
//! radio: which firmware it runs, where its SD card image lives, calibration
//! strings copied from the radio, and the simulator's startup options.
//!
//! # Namespacing
//!
//! Profile `N` keeps all of its keys under `Profiles/profile<N>/`.  The path
//! depends only on the index, and the index is fixed when the profile is
//! created, so two profiles can never write to each other's keys even though
//! they share one store.
//!
//! # Existence
//!
//! A slot is "configured" iff its `Name` key is present in the store.  All
//! other fields may be absent (at their defaults) in a configured profile.

use tracing::info;

use super::properties::settings_properties;
use super::property_store::{Namespaced, SettingsStore};
use crate::domain::schema;
use crate::domain::simulator::SimulatorOptions;
use crate::domain::store::StoreError;

/// Key whose presence marks a profile slot as configured.
const NAME_KEY: &str = "Name";

/// One radio profile slot.
#[derive(Debug)]
pub struct Profile {
    index: usize,
    handle: SettingsStore,
    values: ProfileValues,
}

settings_properties! {
    /// In-memory values of a [`Profile`].
    pub struct ProfileValues for Profile {
        /// Display name; setting any name marks the slot as configured.
        name, set_name, reset_name, name_default: String = ("Name", String::new());
        splash_file, set_splash_file, reset_splash_file, splash_file_default: String = ("SplashFileName", String::new());
        fw_name, set_fw_name, reset_fw_name, fw_name_default: String = ("fwName", String::new());
        /// Firmware type identifier, e.g. `opentx-x9d+`.
        fw_type, set_fw_type, reset_fw_type, fw_type_default: String = ("fwType", String::new());
        sd_path, set_sd_path, reset_sd_path, sd_path_default: String = ("sdPath", String::new());
        backup_dir, set_backup_dir, reset_backup_dir, backup_dir_default: String = ("pBackupDir", String::new());

        channel_order, set_channel_order, reset_channel_order, channel_order_default: i32 = ("default_channel_order", 0);
        default_mode, set_default_mode, reset_default_mode, default_mode_default: i32 = ("default_mode", 1);
        volume_gain, set_volume_gain, reset_volume_gain, volume_gain_default: i32 = ("volumeGain", 10);

        rename_fw_files, set_rename_fw_files, reset_rename_fw_files, rename_fw_files_default: bool = ("rename_firmware_files", false);
        burn_firmware, set_burn_firmware, reset_burn_firmware, burn_firmware_default: bool = ("burnFirmware", false);
        /// Per-profile model backups.
        enable_backup, set_enable_backup, reset_enable_backup, enable_backup_default: bool = ("penableBackup", false);

        simulator_options, set_simulator_options, reset_simulator_options, simulator_options_default: SimulatorOptions =
            ("simulatorOptions", SimulatorOptions::default());

        beeper, set_beeper, reset_beeper, beeper_default: String = ("Beeper", String::new());
        country_code, set_country_code, reset_country_code, country_code_default: String = ("countryCode", String::new());
        display, set_display, reset_display, display_default: String = ("Display", String::new());
        haptic, set_haptic, reset_haptic, haptic_default: String = ("Haptic", String::new());
        speaker, set_speaker, reset_speaker, speaker_default: String = ("Speaker", String::new());
        stick_pot_calib, set_stick_pot_calib, reset_stick_pot_calib, stick_pot_calib_default: String = ("StickPotCalib", String::new());
        time_stamp, set_time_stamp, reset_time_stamp, time_stamp_default: String = ("TimeStamp", String::new());
        trainer_calib, set_trainer_calib, reset_trainer_calib, trainer_calib_default: String = ("TrainerCalib", String::new());
        control_types, set_control_types, reset_control_types, control_types_default: String = ("ControlTypes", String::new());
        control_names, set_control_names, reset_control_names, control_names_default: String = ("ControlNames", String::new());

        gs_stick_mode, set_gs_stick_mode, reset_gs_stick_mode, gs_stick_mode_default: i32 = ("GSStickMode", 0);
        ppm_multiplier, set_ppm_multiplier, reset_ppm_multiplier, ppm_multiplier_default: i32 = ("PPM_Multiplier", 0);
        vbat_warn, set_vbat_warn, reset_vbat_warn, vbat_warn_default: i32 = ("vBatWarn", 0);
        vbat_min, set_vbat_min, reset_vbat_min, vbat_min_default: i32 = ("VbatMin", 0);
        vbat_max, set_vbat_max, reset_vbat_max, vbat_max_default: i32 = ("VbatMax", 0);
        tx_current_calibration, set_tx_current_calibration, reset_tx_current_calibration, tx_current_calibration_default: i32 =
            ("currentCalib", 0);
        tx_voltage_calibration, set_tx_voltage_calibration, reset_tx_voltage_calibration, tx_voltage_calibration_default: i32 =
            ("VbatCalib", 0);
    }
}

impl Namespaced for Profile {
    fn settings_store(&self) -> &SettingsStore {
        &self.handle
    }

    fn settings_path(&self) -> String {
        schema::profile_path(self.index)
    }
}

impl Profile {
    /// Creates slot `index` with every field at its default.  Call [`init`](Self::init)
    /// before use to pull saved values from the store.
    pub(crate) fn new(handle: SettingsStore, index: usize) -> Self {
        Self {
            index,
            handle,
            values: ProfileValues::default(),
        }
    }

    /// Loads every field from the store, using defaults for absent keys.
    pub fn init(&mut self) -> Result<(), StoreError> {
        self.values = ProfileValues::load(&*self)?;
        Ok(())
    }

    /// The slot index; never changes after creation.
    pub fn index(&self) -> usize {
        self.index
    }

    /// All in-memory values.
    pub fn values(&self) -> &ProfileValues {
        &self.values
    }

    /// Mutable access to the in-memory values *without* persisting anything.
    ///
    /// Use this for edits that must not reach the store (e.g. a dialog that
    /// may still be cancelled).  Use the `set_*` methods to persist.
    pub fn values_mut(&mut self) -> &mut ProfileValues {
        &mut self.values
    }

    /// `true` iff the slot's `Name` key is present in the store.
    pub fn exists_on_disk(&self) -> Result<bool, StoreError> {
        self.handle.contains(&self.path_for_key(NAME_KEY, ""))
    }

    /// Deletes every stored key of this slot and resets memory to defaults.
    pub fn remove(&mut self) -> Result<(), StoreError> {
        info!(index = self.index, "removing profile");
        self.handle.remove(&self.settings_path())?;
        self.init()
    }

    /// Resets only the fields that depend on the target firmware.
    ///
    /// Used when the user switches firmware but keeps the profile.
    pub fn reset_fw_variables(&mut self) -> Result<(), StoreError> {
        self.reset_beeper()?;
        self.reset_country_code()?;
        self.reset_display()?;
        self.reset_haptic()?;
        self.reset_speaker()?;
        self.reset_stick_pot_calib()?;
        self.reset_time_stamp()?;
        self.reset_trainer_calib()?;
        self.reset_control_types()?;
        self.reset_control_names()?;
        self.reset_gs_stick_mode()?;
        self.reset_ppm_multiplier()?;
        self.reset_vbat_warn()?;
        self.reset_vbat_min()?;
        self.reset_vbat_max()?;
        self.reset_tx_current_calibration()?;
        self.reset_tx_voltage_calibration()?;
        Ok(())
    }

    /// Copies every field value of `other` into this profile through the
    /// setters, so the copy is persisted under *this* profile's path.
    ///
    /// The index is never copied: assigning profile 3 into profile 5 leaves a
    /// profile 5 whose fields equal profile 3's.
    pub fn assign_from(&mut self, other: &Profile) -> Result<(), StoreError> {
        self.assign_from_values(&other.values)
    }

    /// Same as [`assign_from`](Self::assign_from), from a detached set of values.
    pub fn assign_from_values(&mut self, values: &ProfileValues) -> Result<(), StoreError> {
        self.assign_values(values)
    }
}
