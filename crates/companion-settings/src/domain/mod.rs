//! Domain types for the settings engine.
//!
//! This module contains the vocabulary shared by every other layer and no
//! file-system code:
//!
//! - **`value`** – the untyped [`value::SettingValue`] held by a store and the
//!   [`value::SettingType`] conversions that give it a typed face.
//! - **`simulator`** – the structured per-profile simulator options.
//! - **`schema`** – key names, slot counts, deprecated keys and the table of
//!   earlier installations.  These are compatibility contracts.
//! - **`store`** – the [`store::SettingsBackend`] and [`store::StoreLocator`]
//!   traits that infrastructure implements.

pub mod schema;
pub mod simulator;
pub mod store;
pub mod value;
