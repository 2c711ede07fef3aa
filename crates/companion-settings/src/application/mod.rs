//! Application layer: typed settings entities over a shared store.
//!
//! Nothing here touches the file system.  Every entity reads and writes
//! through a [`property_store::SettingsStore`] handle, whose backend the
//! caller supplies.
//!
//! # Sub-modules
//!
//! - **`property_store`** – the shared store handle and the `Namespaced`
//!   load/store/clear primitives with the default-omission rule.
//! - **`properties`** – the `settings_properties!` table macro that turns a
//!   list of (field, key, type, default) rows into getters and setters.
//! - **`profile`** – the fifteen radio profiles.
//! - **`joystick`** – the eight joystick calibrations.
//! - **`fw_revision`** – last known revision per firmware type.
//! - **`app_settings`** – the facade owning all of the above plus the global
//!   options and profile selection.
//! - **`migration`** – cleanup on load and import from earlier versions.

mod properties;

pub mod app_settings;
pub mod fw_revision;
pub mod joystick;
pub mod migration;
pub mod profile;
pub mod property_store;
