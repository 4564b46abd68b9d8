//! Backup system for SaveWarden
//!
//! Takes timestamped snapshots of a game's live save files, lists and
//! restores them, and prunes old ones.
//!
//! # Architecture
//!
//! - `PathResolver`: where backups are stored and where live saves live
//! - `naming`: the `profile{N}_{yyyyMMdd}_{HHmmss}.{ext}` filename codec
//! - `BackupCatalog`: lists backups by scanning the backup directory
//! - `BackupManager`: creates, restores and deletes backups
//! - `RetentionPolicy`: removes backups older than a maximum age
//! - `LiveFileWatcher`: notifies when the game rewrites a live save
//! - `AsyncBackupManager`: runs the above off the caller's thread
//!
//! # Example
//!
//! ```rust,ignore
//! use savewarden::backup::{BackupManager, PathResolver, RetentionPolicy};
//! use savewarden::config::{AppPaths, Settings};
//!
//! let paths = AppPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let resolver = PathResolver::detect(paths, settings.live_save_dir.clone())?;
//! let manager = BackupManager::new(resolver, settings.backup_extension.clone())?;
//!
//! let profile = settings.profile()?;
//! let backup = manager.create_backup(profile)?;
//! RetentionPolicy::new(&manager).prune_older_than(profile, settings.retention_max_age())?;
//! ```

pub mod catalog;
pub mod clock;
pub mod disk;
pub mod manager;
pub mod naming;
pub mod resolver;
pub mod retention;
pub mod tasks;
pub mod watcher;

pub use catalog::BackupCatalog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use disk::{FixedSpaceProbe, SpaceProbe, SystemSpaceProbe};
pub use manager::{BackupManager, DEFAULT_EXTENSION};
pub use resolver::PathResolver;
pub use retention::{FailedDeletion, PruneReport, RetentionPolicy};
pub use tasks::AsyncBackupManager;
pub use watcher::LiveFileWatcher;
