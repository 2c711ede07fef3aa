//! Typed, versioned persistent settings for OpenTX Companion.
//!
//! The crate exposes strongly typed accessors over an untyped hierarchical
//! key-value store.  Profiles, joystick calibrations and global options all
//! share one store without key collisions, a value equal to its default is
//! never written, and stores written by earlier application versions can be
//! detected and imported.
//!
//! ```no_run
//! use companion_settings::{AppSettings, TomlStoreLocator};
//!
//! # fn main() -> Result<(), companion_settings::SettingsError> {
//! let locator = TomlStoreLocator::new("/tmp/companion-settings");
//! let mut settings = AppSettings::open(locator)?;
//! if settings.is_first_use() {
//!     if let Some(previous) = settings.find_previous_version_settings()? {
//!         settings.import_settings(previous.label)?;
//!     }
//! }
//! settings.current_profile_mut().set_name("Taranis")?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::app_settings::{AppSettings, DownloadBranch, GlobalValues, SettingsError};
pub use application::fw_revision::FwRevision;
pub use application::joystick::{JoystickCalibration, JoystickValues};
pub use application::migration::ImportPolicy;
pub use application::profile::{Profile, ProfileValues};
pub use application::property_store::{Namespaced, SettingsStore};
pub use domain::schema::{PreviousVersion, MAX_JOYSTICKS, MAX_PROFILES};
pub use domain::simulator::{SimulatorOptions, StartupDataType};
pub use domain::store::{SettingsBackend, StoreError, StoreLocator};
pub use domain::value::{SettingType, SettingValue};
pub use infrastructure::storage::locator::{MemoryStoreLocator, TomlStoreLocator};
pub use infrastructure::storage::memory::MemoryBackend;
pub use infrastructure::storage::toml_file::TomlFileBackend;
