//! Storage infrastructure: concrete settings backends.
//!
//! - **`memory`**    – [`memory::MemoryBackend`], a sorted in-memory map.
//! - **`toml_file`** – [`toml_file::TomlFileBackend`], a write-through TOML file.
//! - **`locator`**   – finds stores by organization/product, for the current
//!   installation and for earlier ones.
//!
//! Swapping the on-disk format (an INI file, the Windows registry) only means
//! adding another [`SettingsBackend`](crate::domain::store::SettingsBackend)
//! implementation here; nothing above this layer changes.

pub mod locator;
pub mod memory;
pub mod toml_file;

use crate::domain::store::StoreError;

/// Strips leading/trailing separators and rejects empty keys or empty segments.
pub(crate) fn normalize_key(key: &str) -> Result<&str, StoreError> {
    let trimmed = key.trim_matches('/');
    if trimmed.is_empty() || trimmed.split('/').any(str::is_empty) {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_trims_separators() {
        assert_eq!(normalize_key("Profiles/profile3/").unwrap(), "Profiles/profile3");
        assert_eq!(normalize_key("/theme").unwrap(), "theme");
    }

    #[test]
    fn test_normalize_key_rejects_empty_segments() {
        assert!(normalize_key("").is_err());
        assert!(normalize_key("Profiles//Name").is_err());
    }
}
