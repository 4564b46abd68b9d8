//! SaveWarden - back up, restore and prune game save files
//!
//! This library provides the core of the SaveWarden save manager. It keeps
//! timestamped copies of a game's live save files for up to four profiles,
//! restores any copy over the live save, and removes copies past a
//! configured age.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Path resolution, live save locations and user settings
//! - `error`: Custom error types
//! - `models`: Profiles and backup metadata
//! - `storage`: Atomic file I/O
//! - `backup`: Backup creation, listing, restore, retention and watching
//! - `cli`: Command handlers for the `savewarden` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use savewarden::config::{AppPaths, Settings};
//!
//! let paths = AppPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! ```

pub mod backup;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use error::{SaveError, SaveResult};
pub use models::{Profile, SaveFileInfo};
