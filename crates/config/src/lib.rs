//! Configuration management for alias-history
//!
//! This crate handles:
//! - Settings loading, saving and editing
//! - Settings file locations inside a vault
//! - Logging initialization

pub mod dirs;
pub mod logging;
pub mod settings;

// Re-export error types from core
pub use alias_history_core::{Error, Result};

// Re-export main types
pub use dirs::{default_settings_file, plugin_settings_file, resolve_settings_file};
pub use settings::{SETTING_KEYS, Settings};
