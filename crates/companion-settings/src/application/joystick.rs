//! Joystick calibration records.
//!
//! Unlike profiles, all joysticks share the `JsCalibration/` group and encode
//! their index in the key name instead: joystick 3's minimum lives at
//! `JsCalibration/stick3_min`.

use std::borrow::Cow;

use super::properties::settings_properties;
use super::property_store::{Namespaced, SettingsStore};
use crate::domain::schema;
use crate::domain::store::StoreError;

/// Calibration of one joystick axis slot.
#[derive(Debug)]
pub struct JoystickCalibration {
    index: usize,
    handle: SettingsStore,
    values: JoystickValues,
}

settings_properties! {
    /// In-memory values of a [`JoystickCalibration`].
    pub struct JoystickValues for JoystickCalibration {
        /// Host axis mapped to this slot; `-1` means unassigned.
        stick_axe, set_stick_axe, reset_stick_axe, stick_axe_default: i32 = ("axe", -1);
        stick_min, set_stick_min, reset_stick_min, stick_min_default: i32 = ("min", -32767);
        stick_med, set_stick_med, reset_stick_med, stick_med_default: i32 = ("med", 0);
        stick_max, set_stick_max, reset_stick_max, stick_max_default: i32 = ("max", 32767);
        /// Non-zero when the axis is inverted.
        stick_inv, set_stick_inv, reset_stick_inv, stick_inv_default: i32 = ("inv", 0);
    }
}

impl Namespaced for JoystickCalibration {
    fn settings_store(&self) -> &SettingsStore {
        &self.handle
    }

    fn settings_path(&self) -> String {
        format!("{}/", schema::JOYSTICK_GROUP)
    }

    fn property_key<'a>(&self, name: &'a str) -> Cow<'a, str> {
        Cow::Owned(format!("stick{}_{}", self.index, name))
    }
}

impl JoystickCalibration {
    pub(crate) fn new(handle: SettingsStore, index: usize) -> Self {
        Self {
            index,
            handle,
            values: JoystickValues::default(),
        }
    }

    /// Loads every field from the store.
    pub fn init(&mut self) -> Result<(), StoreError> {
        self.values = JoystickValues::load(&*self)?;
        Ok(())
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn values(&self) -> &JoystickValues {
        &self.values
    }

    /// `true` iff a non-negative axis is stored for this slot.
    pub fn exists_on_disk(&self) -> Result<bool, StoreError> {
        let key = self.property_key("axe");
        let axe: i32 = self.load(&key, "", -1)?;
        Ok(axe > -1)
    }

    /// Resets every field to its default, clearing the stored keys.
    pub fn reset(&mut self) -> Result<(), StoreError> {
        self.reset_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value::SettingValue;
    use crate::infrastructure::storage::memory::MemoryBackend;

    fn joystick(index: usize) -> (SettingsStore, JoystickCalibration) {
        let store = SettingsStore::new(MemoryBackend::new());
        let mut js = JoystickCalibration::new(store.clone(), index);
        js.init().unwrap();
        (store, js)
    }

    #[test]
    fn test_defaults() {
        let (_, js) = joystick(0);
        assert_eq!(js.stick_axe(), -1);
        assert_eq!(js.stick_min(), -32767);
        assert_eq!(js.stick_med(), 0);
        assert_eq!(js.stick_max(), 32767);
        assert_eq!(js.stick_inv(), 0);
    }

    #[test]
    fn test_keys_embed_index() {
        // Arrange
        let (store, mut js) = joystick(3);

        // Act
        js.set_stick_min(-30000).unwrap();
        js.set_stick_axe(2).unwrap();

        // Assert
        assert_eq!(
            store.value("JsCalibration/stick3_min").unwrap(),
            Some(SettingValue::Int(-30000))
        );
        assert_eq!(
            store.all_keys().unwrap(),
            vec!["JsCalibration/stick3_axe", "JsCalibration/stick3_min"]
        );
    }

    #[test]
    fn test_exists_on_disk_requires_non_negative_axe() {
        let (store, mut js) = joystick(1);
        assert!(!js.exists_on_disk().unwrap());

        js.set_stick_axe(0).unwrap();
        assert!(js.exists_on_disk().unwrap());

        // an explicitly stored -1 is "unassigned"
        store
            .set_value("JsCalibration/stick1_axe", SettingValue::Int(-1))
            .unwrap();
        assert!(!js.exists_on_disk().unwrap());
    }

    #[test]
    fn test_reset_clears_only_own_keys() {
        // Arrange
        let store = SettingsStore::new(MemoryBackend::new());
        let mut first = JoystickCalibration::new(store.clone(), 0);
        let mut second = JoystickCalibration::new(store.clone(), 1);
        first.set_stick_axe(4).unwrap();
        second.set_stick_axe(5).unwrap();
        second.set_stick_inv(1).unwrap();

        // Act
        second.reset().unwrap();

        // Assert
        assert_eq!(second.values(), &JoystickValues::default());
        assert_eq!(store.all_keys().unwrap(), vec!["JsCalibration/stick0_axe"]);
        assert!(first.exists_on_disk().unwrap());
    }

    #[test]
    fn test_init_reads_stored_values() {
        let (store, _) = joystick(7);
        store
            .set_value("JsCalibration/stick7_max", SettingValue::String("30500".into()))
            .unwrap();
        let mut js = JoystickCalibration::new(store, 7);

        js.init().unwrap();

        assert_eq!(js.stick_max(), 30500);
        assert_eq!(js.index(), 7);
    }
}
