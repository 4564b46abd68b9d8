//! Backup CLI commands
//!
//! Implements CLI commands for backup management.

use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::time::{Duration as StdDuration, Instant};

use clap::Subcommand;

use crate::backup::{naming, BackupManager, LiveFileWatcher, RetentionPolicy};
use crate::config::settings::Settings;
use crate::error::{SaveError, SaveResult};
use crate::models::{Profile, SaveFileInfo};

/// Minimum gap between automatic backups while watching
const WATCH_BACKUP_DEBOUNCE: StdDuration = StdDuration::from_secs(2);

/// Backup subcommands
#[derive(Subcommand)]
pub enum BackupCommands {
    /// Back up the live save of a profile
    Create {
        /// Profile number (defaults to the selected profile)
        #[arg(short, long)]
        profile: Option<u8>,
    },

    /// List backups, newest first
    List {
        /// Profile number (defaults to the selected profile)
        #[arg(short, long)]
        profile: Option<u8>,

        /// List backups of every profile
        #[arg(short, long, conflicts_with = "profile")]
        all: bool,

        /// Show detailed information
        #[arg(short, long)]
        verbose: bool,
    },

    /// Restore a backup over the live save
    Restore {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Profile number (defaults to the selected profile)
        #[arg(short, long)]
        profile: Option<u8>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete a single backup
    Delete {
        /// Backup filename or path (use 'latest' for most recent)
        backup: String,

        /// Profile the backup must belong to (defaults to the selected profile)
        #[arg(short, long)]
        profile: Option<u8>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Delete backups older than the retention age
    Prune {
        /// Profile number (defaults to the selected profile)
        #[arg(short, long)]
        profile: Option<u8>,

        /// Prune every profile
        #[arg(short, long, conflicts_with = "profile")]
        all: bool,

        /// Override the configured retention age
        #[arg(long)]
        max_age_days: Option<u32>,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Report changes to the live save as the game writes it
    Watch {
        /// Profile number (defaults to the selected profile)
        #[arg(short, long)]
        profile: Option<u8>,

        /// Take a backup on every change
        #[arg(short, long)]
        backup: bool,
    },
}

/// Handle a backup command
pub fn handle_backup_command(
    manager: &BackupManager,
    settings: &Settings,
    cmd: BackupCommands,
) -> SaveResult<()> {
    match cmd {
        BackupCommands::Create { profile } => {
            let profile = select_profile(settings, profile)?;
            println!("Backing up profile {}...", profile);
            let backup = manager.create_backup(profile)?;
            println!("Backup created: {}", backup.file_name());
            println!("Location: {}", backup.path.display());
            println!("Size: {}", format_size(backup.file_size));

            if settings.prune_after_backup {
                let report = RetentionPolicy::new(manager)
                    .prune_older_than(profile, settings.retention_max_age())?;
                if !report.deleted.is_empty() {
                    println!("Pruned {} old backup(s).", report.deleted.len());
                }
                print_failures(&report.failed);
            }
        }

        BackupCommands::List {
            profile,
            all,
            verbose,
        } => {
            let backups = if all {
                manager.catalog().list_all()?
            } else {
                manager.list_backups(select_profile(settings, profile)?)?
            };

            if backups.is_empty() {
                println!("No backups found.");
                println!("Create one with: savewarden create");
                return Ok(());
            }

            println!("Available Backups");
            println!("=================");
            println!();

            let now = manager.clock().now();
            for (i, backup) in backups.iter().enumerate() {
                let age_str = format_duration(now.signed_duration_since(backup.timestamp));

                if verbose {
                    println!(
                        "{}. {}\n   Profile: {}\n   Created: {}\n   Size: {}\n   Age: {}\n",
                        i + 1,
                        backup.file_name(),
                        backup.profile,
                        backup.timestamp.format("%Y-%m-%d %H:%M:%S"),
                        format_size(backup.file_size),
                        age_str,
                    );
                } else {
                    println!(
                        "  {}. {} ({} ago, {})",
                        i + 1,
                        backup.file_name(),
                        age_str,
                        format_size(backup.file_size),
                    );
                }
            }

            println!();
            println!("Total: {} backup(s)", backups.len());
        }

        BackupCommands::Restore {
            backup,
            profile,
            force,
        } => {
            let profile = select_profile(settings, profile)?;
            let backup_path = resolve_backup_path(manager, profile, &backup)?;
            let live_path = manager.resolver().live_save_path(profile)?;

            println!("Restore");
            println!("=======");
            println!("Backup:    {}", backup_path.display());
            println!("Live save: {}", live_path.display());
            println!();

            if !force {
                println!("WARNING: This will overwrite the current live save of profile {}!", profile);
                println!("To proceed, run again with --force flag:");
                println!("  savewarden restore {} --profile {} --force", backup, profile);
                return Ok(());
            }

            let restored = manager.restore_backup(profile, &backup_path)?;
            println!(
                "Restored profile {} from backup taken {}.",
                profile,
                restored.timestamp.format("%Y-%m-%d %H:%M:%S")
            );
        }

        BackupCommands::Delete {
            backup,
            profile,
            force,
        } => {
            let profile = select_profile(settings, profile)?;
            let backup_path = resolve_backup_path(manager, profile, &backup)?;
            ensure_backup_of(&backup_path, profile)?;

            if !force {
                println!("This will permanently delete {}", backup_path.display());
                println!("To proceed, run again with --force flag:");
                println!("  savewarden delete {} --profile {} --force", backup, profile);
                return Ok(());
            }

            manager.delete_backup(&backup_path)?;
            println!("Deleted {}", backup_path.display());
        }

        BackupCommands::Prune {
            profile,
            all,
            max_age_days,
            force,
        } => {
            let max_age = max_age_days
                .map(|days| chrono::Duration::days(i64::from(days)))
                .unwrap_or_else(|| settings.retention_max_age());
            let policy = RetentionPolicy::new(manager);
            let profiles: Vec<Profile> = if all {
                Profile::all().collect()
            } else {
                vec![select_profile(settings, profile)?]
            };

            let mut stale: Vec<SaveFileInfo> = Vec::new();
            for p in &profiles {
                stale.extend(policy.stale_backups(*p, max_age)?);
            }

            if stale.is_empty() {
                println!("No backups to prune.");
                println!(
                    "Current retention policy: keep backups newer than {}",
                    format_duration(max_age)
                );
                return Ok(());
            }

            println!("Prune Summary");
            println!("=============");
            println!(
                "Retention policy: keep backups newer than {}",
                format_duration(max_age)
            );
            println!("Cutoff: {}", policy.cutoff(max_age).format("%Y-%m-%d %H:%M:%S"));
            println!("To be deleted: {} backup(s)", stale.len());
            for backup in &stale {
                println!("  {}", backup.file_name());
            }
            println!();

            if !force {
                println!("To delete old backups, run again with --force flag:");
                println!("  savewarden prune --force");
                return Ok(());
            }

            let report = if all {
                policy.prune_all(max_age)?
            } else {
                policy.prune_older_than(profiles[0], max_age)?
            };
            println!("Deleted {} backup(s).", report.deleted.len());
            print_failures(&report.failed);
        }

        BackupCommands::Watch { profile, backup } => {
            let profile = select_profile(settings, profile)?;
            watch_live_save(manager, profile, backup)?;
        }
    }

    Ok(())
}

/// Block printing live save changes until the process is interrupted
fn watch_live_save(manager: &BackupManager, profile: Profile, auto_backup: bool) -> SaveResult<()> {
    let (tx, rx) = mpsc::channel();
    let mut watcher = LiveFileWatcher::new(manager.resolver().clone());

    let started = watcher.watch(profile, move || {
        let _ = tx.send(());
    })?;

    let live_path = manager.resolver().live_save_path(profile)?;
    if !started {
        println!("Could not watch {}", live_path.display());
        println!("The game may not have created its save directory yet.");
        return Ok(());
    }

    println!("Watching {} (Ctrl-C to stop)", live_path.display());

    let mut last_backup: Option<Instant> = None;
    for () in rx {
        println!(
            "[{}] Live save changed",
            manager.clock().now().format("%H:%M:%S")
        );

        if !auto_backup {
            continue;
        }
        if last_backup.is_some_and(|at| at.elapsed() < WATCH_BACKUP_DEBOUNCE) {
            continue;
        }

        match manager.create_backup(profile) {
            Ok(backup) => println!("  Backed up to {}", backup.file_name()),
            Err(e) => eprintln!("  Backup failed: {}", e),
        }
        last_backup = Some(Instant::now());
    }

    Ok(())
}

/// Use the given profile, falling back to the one in settings
fn select_profile(settings: &Settings, explicit: Option<u8>) -> SaveResult<Profile> {
    match explicit {
        Some(number) => Profile::new(number),
        None => settings.profile(),
    }
}

/// Resolve a backup identifier to a full path
fn resolve_backup_path(
    manager: &BackupManager,
    profile: Profile,
    backup: &str,
) -> SaveResult<PathBuf> {
    // Handle "latest" keyword
    if backup.eq_ignore_ascii_case("latest") {
        return manager
            .latest_backup(profile)?
            .map(|b| b.path)
            .ok_or_else(|| SaveError::BackupNotFound(PathBuf::from("latest")));
    }

    // Check if it's a full path
    let path = PathBuf::from(backup);
    if path.is_file() {
        return Ok(path);
    }

    // Check if it's a filename in the backup directory
    let backup_path = manager.resolver().paths().backup_dir().join(backup);
    if backup_path.is_file() {
        return Ok(backup_path);
    }

    // Try adding the configured extension
    let with_ext = manager
        .resolver()
        .paths()
        .backup_dir()
        .join(format!("{}.{}", backup, manager.extension()));
    if with_ext.is_file() {
        return Ok(with_ext);
    }

    Err(SaveError::BackupNotFound(PathBuf::from(backup)))
}

/// Check that `path` is named as a backup of `profile`
fn ensure_backup_of(path: &Path, profile: Profile) -> SaveResult<()> {
    let decoded = path
        .file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| naming::decode(n).ok())
        .ok_or_else(|| SaveError::BackupNotFound(path.to_path_buf()))?;

    if decoded.profile != profile {
        return Err(SaveError::ProfileMismatch {
            expected: profile,
            found: decoded.profile,
        });
    }
    Ok(())
}

fn print_failures(failed: &[crate::backup::FailedDeletion]) {
    for failure in failed {
        eprintln!(
            "Could not delete {}: {}",
            failure.backup.file_name(),
            failure.error
        );
    }
}

/// Format a duration in human-readable form
///
/// Negative durations, from timestamps ahead of the clock, show as zero.
pub fn format_duration(duration: chrono::Duration) -> String {
    let total_seconds = duration.num_seconds().max(0);

    if total_seconds < 60 {
        return format!("{}s", total_seconds);
    }

    let minutes = total_seconds / 60;
    if minutes < 60 {
        return format!("{}m", minutes);
    }

    let hours = minutes / 60;
    if hours < 24 {
        return format!("{}h", hours);
    }

    let days = hours / 24;
    if days < 30 {
        return format!("{}d", days);
    }

    let months = days / 30;
    format!("{}mo", months)
}

/// Format a file size in human-readable form
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
