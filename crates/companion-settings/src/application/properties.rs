//! Declarative property tables.
//!
//! Every settings entity has many fields that follow the same contract: a
//! storage key, a type, a default, an in-memory value, a getter, a persisting
//! setter and a reset.  Writing those by hand for ~90 fields would be a lot
//! of near-identical code where one typo in a key silently breaks
//! compatibility, so the fields are declared once in a table and
//! [`settings_properties!`] expands it.
//!
//! # Example
//!
//! ```ignore
//! settings_properties! {
//!     /// In-memory values of a profile.
//!     pub struct ProfileValues for Profile {
//!         /// Display name.
//!         name, set_name, reset_name, name_default: String = ("Name", String::new());
//!     }
//! }
//! ```
//!
//! expands to:
//!
//! - `pub struct ProfileValues { pub name: String }` plus `Default` (every
//!   field at its declared default) and `ProfileValues::KEYS`;
//! - `ProfileValues::load(&entity)`, which reads every field through the
//!   entity's [`Namespaced`](super::property_store::Namespaced) primitives;
//! - on `Profile`: `name()`, `set_name(..)`, `reset_name()`, the associated
//!   `Profile::name_default()`, plus `assign_values(&other)` and `reset_all()`.
//!
//! The entity must have a `values` field of the generated type and implement
//! `Namespaced`.  Keys go through `Namespaced::property_key`, so an entity can
//! turn the declared name into its real key (joysticks prefix their index).

macro_rules! settings_properties {
    (
        $(#[$meta:meta])*
        $vis:vis struct $values:ident for $entity:ident {
            $(
                $(#[$fmeta:meta])*
                $field:ident, $setter:ident, $reset:ident, $default_fn:ident : $ty:ty = ($key:literal, $default:expr);
            )*
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $values {
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )*
        }

        impl Default for $values {
            fn default() -> Self {
                Self {
                    $( $field: $entity::$default_fn(), )*
                }
            }
        }

        impl $values {
            /// Declared property names, in declaration order.
            pub const KEYS: &'static [&'static str] = &[$($key),*];

            /// Reads every property, substituting defaults for absent or mistyped keys.
            pub(crate) fn load(
                entity: &impl $crate::application::property_store::Namespaced,
            ) -> Result<Self, $crate::domain::store::StoreError> {
                let defaults = Self::default();
                Ok(Self {
                    $( $field: entity.load(&entity.property_key($key), "", defaults.$field)?, )*
                })
            }
        }

        impl $entity {
            $(
                $(#[$fmeta])*
                pub fn $field(&self) -> $ty {
                    self.values.$field.clone()
                }

                /// Declared default of the property.
                pub fn $default_fn() -> $ty {
                    $default
                }

                /// Sets the value and persists it; a value equal to the default clears the key.
                pub fn $setter(
                    &mut self,
                    value: impl Into<$ty>,
                ) -> Result<(), $crate::domain::store::StoreError> {
                    use $crate::application::property_store::Namespaced;
                    let value: $ty = value.into();
                    let default = Self::$default_fn();
                    self.write_property(&self.property_key($key), &value, &default)?;
                    self.values.$field = value;
                    Ok(())
                }

                /// Restores the default and clears the stored key.
                pub fn $reset(&mut self) -> Result<(), $crate::domain::store::StoreError> {
                    self.$setter(Self::$default_fn())
                }
            )*

            /// Copies every value of `other` through the matching setter.
            #[allow(dead_code)]
            pub(crate) fn assign_values(
                &mut self,
                other: &$values,
            ) -> Result<(), $crate::domain::store::StoreError> {
                $( self.$setter(other.$field.clone())?; )*
                Ok(())
            }

            /// Resets every property to its default and clears the stored keys.
            pub fn reset_all(&mut self) -> Result<(), $crate::domain::store::StoreError> {
                $( self.$reset()?; )*
                Ok(())
            }
        }
    };
}

pub(crate) use settings_properties;
