//! Per-profile simulator options.
//!
//! The simulator front-end stores its startup choices as one structured value
//! inside the owning profile.  The whole struct is persisted as a single
//! opaque blob (`bincode`-encoded bytes), so adding a field is a schema
//! change: old blobs fail to decode and the profile falls back to
//! [`SimulatorOptions::default`].

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::value::{SettingType, SettingValue};

/// Where the simulator loads its radio data from on startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StartupDataType {
    /// Use the profile's SD card image directory.
    #[default]
    SdPath,
    /// Load a single radio data file.
    DataFile,
    /// Load models and settings from a folder.
    DataFolder,
}

/// Structured simulator settings stored under a profile's `simulatorOptions` key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SimulatorOptions {
    pub startup_data_type: StartupDataType,
    /// Identifier of the firmware build the simulator runs.
    pub firmware_id: String,
    pub data_file: String,
    pub data_folder: String,
    pub sd_path: String,
    /// Saved window geometry of the simulator window.
    pub window_geometry: Vec<u8>,
    /// Saved state of the virtual radio controls.
    pub controls_state: Vec<u8>,
    /// LCD background colour, as `#RRGGBB`; empty for the radio's default.
    pub lcd_color: String,
}

impl SettingType for SimulatorOptions {
    fn to_setting(&self) -> SettingValue {
        // Serializing a plain struct of strings and byte vectors cannot fail.
        SettingValue::Bytes(bincode::serialize(self).unwrap_or_default())
    }

    fn from_setting(value: &SettingValue) -> Option<Self> {
        let SettingValue::Bytes(bytes) = value else {
            return None;
        };
        match bincode::deserialize(bytes) {
            Ok(options) => Some(options),
            Err(e) => {
                warn!("stored simulator options could not be decoded: {e}");
                None
            }
        }
    }
}
