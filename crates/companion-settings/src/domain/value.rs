//! Untyped setting values and the typed view over them.
//!
//! The backing store only knows about [`SettingValue`], a small closed set of
//! representations that every store format can hold.  Typed code never
//! touches `SettingValue` directly; it goes through [`SettingType`], which
//! converts a Rust type to and from the untyped form.
//!
//! # Coercion (for beginners)
//!
//! Text-based stores (INI, TOML written by hand, registry strings) often hold
//! a number as `"10"` or a boolean as `"true"`.  `from_setting` therefore
//! accepts a few lossless cross-representation reads:
//!
//! | Requested | Also accepted from |
//! |-----------|--------------------|
//! | `String`  | `Int`, `Bool`, UTF-8 `Bytes`, a list of at most one item |
//! | `i32`/`u32` | numeric `String`, `Bool` (0/1) |
//! | `bool`    | `Int` (non-zero = true), `"true"`/`"false"`/`"1"`/`"0"` |
//! | `Vec<String>` | a single `String` |
//! | `Vec<u8>` | `String` (its UTF-8 bytes) |
//!
//! Anything else is a *type mismatch*: `from_setting` returns `None` and the
//! caller substitutes its default.

use std::fmt;

/// A value as held by the backing store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingValue {
    String(String),
    Int(i64),
    Bool(bool),
    /// Opaque binary data (window geometry blobs, encoded structs).
    Bytes(Vec<u8>),
    /// An ordered list of strings (recent files, debug filters).
    List(Vec<String>),
}

impl SettingValue {
    /// Short name of the representation, used in log messages.
    pub fn kind(&self) -> &'static str {
        match self {
            SettingValue::String(_) => "string",
            SettingValue::Int(_) => "int",
            SettingValue::Bool(_) => "bool",
            SettingValue::Bytes(_) => "bytes",
            SettingValue::List(_) => "list",
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::String(s) => write!(f, "{s:?}"),
            SettingValue::Int(i) => write!(f, "{i}"),
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            SettingValue::List(items) => write!(f, "{items:?}"),
        }
    }
}

/// A Rust type that can be persisted as a [`SettingValue`].
///
/// `PartialEq` is required because the default-omission rule compares the
/// value being stored against the property's declared default.
pub trait SettingType: Clone + PartialEq + Sized {
    /// Converts the value into its stored representation.
    fn to_setting(&self) -> SettingValue;

    /// Reads the value back, returning `None` on a type mismatch.
    fn from_setting(value: &SettingValue) -> Option<Self>;
}

impl SettingType for String {
    fn to_setting(&self) -> SettingValue {
        SettingValue::String(self.clone())
    }

    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::String(s) => Some(s.clone()),
            SettingValue::Int(i) => Some(i.to_string()),
            SettingValue::Bool(b) => Some(b.to_string()),
            SettingValue::Bytes(b) => String::from_utf8(b.clone()).ok(),
            SettingValue::List(items) if items.len() <= 1 => {
                Some(items.first().cloned().unwrap_or_default())
            }
            SettingValue::List(_) => None,
        }
    }
}

impl SettingType for i32 {
    fn to_setting(&self) -> SettingValue {
        SettingValue::Int(i64::from(*self))
    }

    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Int(i) => i32::try_from(*i).ok(),
            SettingValue::String(s) => s.trim().parse().ok(),
            SettingValue::Bool(b) => Some(i32::from(*b)),
            _ => None,
        }
    }
}

impl SettingType for u32 {
    fn to_setting(&self) -> SettingValue {
        SettingValue::Int(i64::from(*self))
    }

    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Int(i) => u32::try_from(*i).ok(),
            SettingValue::String(s) => s.trim().parse().ok(),
            SettingValue::Bool(b) => Some(u32::from(*b)),
            _ => None,
        }
    }
}

impl SettingType for bool {
    fn to_setting(&self) -> SettingValue {
        SettingValue::Bool(*self)
    }

    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Bool(b) => Some(*b),
            SettingValue::Int(i) => Some(*i != 0),
            SettingValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => Some(true),
                "false" | "0" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }
}

impl SettingType for Vec<u8> {
    fn to_setting(&self) -> SettingValue {
        SettingValue::Bytes(self.clone())
    }

    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::Bytes(b) => Some(b.clone()),
            SettingValue::String(s) => Some(s.as_bytes().to_vec()),
            _ => None,
        }
    }
}

impl SettingType for Vec<String> {
    fn to_setting(&self) -> SettingValue {
        SettingValue::List(self.clone())
    }

    fn from_setting(value: &SettingValue) -> Option<Self> {
        match value {
            SettingValue::List(items) => Some(items.clone()),
            SettingValue::String(s) if s.is_empty() => Some(Vec::new()),
            SettingValue::String(s) => Some(vec![s.clone()]),
            _ => None,
        }
    }
}
