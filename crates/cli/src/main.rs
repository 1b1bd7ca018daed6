use anyhow::Result;
use clap::{Parser, Subcommand};
use pbxsync::commands::{id_command, init_command, plan_command, sync_command};
use pbxsync::init_logging;

/// Registers new source files in an Xcode project manifest.
///
/// This CLI is a thin wrapper around `pbxsync-core`. All substantive logic
/// lives in the library so it can be tested thoroughly.
#[derive(Parser, Debug)]
#[command(
    name = "pbxsync",
    version,
    about = "Keep project.pbxproj in sync with the source files on disk",
    long_about = None
)]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add every unregistered source file to the manifest.
    ///
    /// This will:
    /// - Discover source files under the root.
    /// - Skip files the config marks as known or the manifest already declares.
    /// - Insert declarations, build entries, and group members for the rest.
    Sync {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Config file (.json, .yaml, .yml), relative to the root. Defaults to `.pbxsync/config.json` if present.
        #[arg(long)]
        config: Option<String>,

        /// Manifest path, overriding the config.
        #[arg(long)]
        manifest: Option<String>,

        /// Report what would change without writing the manifest.
        #[arg(long, default_value_t = false)]
        dry_run: bool,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// List the files a sync would add, with their identifiers and groups.
    Plan {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Config file (.json, .yaml, .yml), relative to the root.
        #[arg(long)]
        config: Option<String>,

        /// Manifest path, overriding the config.
        #[arg(long)]
        manifest: Option<String>,

        /// Emit JSON instead of human-readable text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Write the default config to `.pbxsync/config.json`.
    Init {
        /// Project root directory. Defaults to the current working directory.
        #[arg(long, default_value = ".")]
        root: String,

        /// Manifest path to record in the config.
        #[arg(long)]
        manifest: Option<String>,

        /// Overwrite an existing config.
        #[arg(long, default_value_t = false)]
        force: bool,
    },

    /// Print the identifier generated for a seed string.
    Id {
        /// Seed, usually a relative source path.
        seed: String,

        /// Role tag mixed into the seed (e.g. `build`).
        #[arg(long)]
        role: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Default to a sync of the current directory if no command is provided.
    let command = cli.command.unwrap_or(Command::Sync {
        root: ".".to_string(),
        config: None,
        manifest: None,
        dry_run: false,
        json: false,
    });

    match command {
        Command::Sync { root, config, manifest, dry_run, json } => {
            sync_command(&root, config.as_deref(), manifest.as_deref(), dry_run, json)?
        }
        Command::Plan { root, config, manifest, json } => {
            plan_command(&root, config.as_deref(), manifest.as_deref(), json)?
        }
        Command::Init { root, manifest, force } => init_command(&root, manifest, force)?,
        Command::Id { seed, role } => id_command(&seed, role.as_deref())?,
    }

    Ok(())
}
