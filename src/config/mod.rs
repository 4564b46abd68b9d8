//! Configuration module for SaveWarden
//!
//! This module provides configuration management including:
//! - Application data path resolution
//! - Per-OS live save locations
//! - User settings persistence

pub mod paths;
pub mod platform;
pub mod settings;

pub use paths::AppPaths;
pub use platform::{resolve_locator, LiveSaveLocator};
pub use settings::Settings;
