//! Infrastructure layer: file-system adapters for the settings engine.
//!
//! **Dependency rule**: this layer implements traits from `domain`; neither
//! `domain` nor `application` imports from here.

pub mod storage;
