use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use savewarden::backup::{BackupManager, PathResolver};
use savewarden::cli::{handle_backup_command, BackupCommands};
use savewarden::config::{paths::AppPaths, settings::Settings};
use savewarden::Profile;

#[derive(Parser)]
#[command(
    name = "savewarden",
    version,
    about = "Back up, restore and prune game save files",
    long_about = "SaveWarden keeps timestamped copies of a game's live save files \
                  for up to four profiles. It restores any copy over the live save \
                  and removes copies older than the configured retention age."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Backup(BackupCommands),

    /// Show current configuration and paths
    Config,

    /// Change the profile used when a command doesn't name one
    SetProfile {
        /// Profile number (1-4)
        profile: u8,
    },

    /// Change how many days backups are kept
    SetRetention {
        /// Maximum backup age in days
        days: u32,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = AppPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Some(Commands::Backup(cmd)) => {
            let resolver = PathResolver::detect(paths, settings.live_save_dir.clone())?;
            let manager = BackupManager::new(resolver, settings.backup_extension.clone())?;
            handle_backup_command(&manager, &settings, cmd)?;
        }
        Some(Commands::Config) => {
            println!("SaveWarden Configuration");
            println!("========================");
            println!("Data directory:   {}", paths.base_dir().display());
            println!("Backup directory: {}", paths.backup_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            match PathResolver::detect(paths.clone(), settings.live_save_dir.clone())
                .and_then(|r| r.resolve_live_save_dir())
            {
                Ok(dir) => println!("Live save dir:    {}", dir.display()),
                Err(e) => println!("Live save dir:    unavailable ({})", e),
            }
            println!();
            println!("Settings:");
            println!("  Selected profile:   {}", settings.selected_profile);
            println!("  Retention:          {} days", settings.retention_max_age_days);
            println!("  Backup extension:   {}", settings.backup_extension);
            println!("  Prune after backup: {}", settings.prune_after_backup);
        }
        Some(Commands::SetProfile { profile }) => {
            let profile = Profile::new(profile)?;
            settings.selected_profile = profile.number();
            settings.save(&paths)?;
            println!("Selected profile {}", profile);
        }
        Some(Commands::SetRetention { days }) => {
            settings.retention_max_age_days = days;
            settings.save(&paths)?;
            println!("Backups older than {} days will be pruned", days);
        }
        None => {
            println!("SaveWarden - game save backups");
            println!();
            println!("Run 'savewarden --help' for usage information.");
            println!("Run 'savewarden create' to back up the selected profile.");
        }
    }

    Ok(())
}
