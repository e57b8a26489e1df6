//! tilegrid CLI - Inspect tile catalogs and exercise group previews
//!
//! This is the main entry point for the tilegrid command-line tool, which provides:
//! - Catalog browsing (`groups`, `group`, `item`)
//! - Edit-script replay against a group's items with live preview output (`replay`)
//! - Config management (`config`)

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tilegrid_core::{Catalog, TileConfig};
use tracing::{debug, warn};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "tilegrid",
    author,
    version,
    about = "Browse tile catalogs and replay edits against bounded group previews",
    long_about = "Load a catalog of groups and items, show each group's preview of its first \
                  items, and replay NDJSON edit scripts while the preview is kept in sync \
                  incrementally."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Config file (default: $TILEGRID_CONFIG or ~/.tilegrid/config.toml)
    #[arg(long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Preview size override (default: config preview.capacity, then 12)
    #[arg(long, value_name = "N", global = true)]
    capacity: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all groups with item and preview counts
    Groups(commands::catalog::GroupsArgs),
    /// Show one group's preview (or all of its items)
    Group(commands::catalog::GroupArgs),
    /// Show a single item by id
    Item(commands::catalog::ItemArgs),
    /// Apply an NDJSON edit script to a group and print the preview after each edit
    Replay(commands::replay::ReplayArgs),
    /// Manage tilegrid configuration (init, show, path)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

impl Commands {
    /// False for commands that must work without a readable config file
    fn reads_config(&self) -> bool {
        match self {
            Commands::Config(args) => args.command.reads_config(),
            Commands::Completions(_) => false,
            _ => true,
        }
    }
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

/// Resolved runtime settings: config file merged with global flags
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: TileConfig,
    pub config_path: PathBuf,
    pub capacity: usize,
}

impl Settings {
    fn resolve(cli: &Cli) -> Result<Self> {
        let (config, config_path) = match &cli.config {
            Some(path) => (TileConfig::load_from(path)?, path.clone()),
            None => (TileConfig::load_or_default()?, TileConfig::config_path()),
        };
        Self::with_config(cli, config, config_path)
    }

    /// Settings for commands that write or locate the config file without
    /// reading it, so a missing or broken file does not get in the way
    fn unloaded(cli: &Cli) -> Result<Self> {
        let config_path = cli.config.clone().unwrap_or_else(TileConfig::config_path);
        Self::with_config(cli, TileConfig::default(), config_path)
    }

    fn with_config(cli: &Cli, config: TileConfig, config_path: PathBuf) -> Result<Self> {
        let capacity = cli.capacity.unwrap_or(config.preview.capacity);
        if capacity == 0 {
            anyhow::bail!("--capacity must be at least 1");
        }

        Ok(Self {
            config,
            config_path,
            capacity,
        })
    }

    /// Catalog path from the flag, falling back to config catalog.path
    pub fn catalog_path(&self, flag: Option<&PathBuf>) -> Result<PathBuf> {
        flag.cloned()
            .or_else(|| self.config.catalog.path.clone())
            .context(
                "No catalog given.\n\nPass --catalog <PATH> or set catalog.path in the config file",
            )
    }

    pub fn load_catalog(&self, flag: Option<&PathBuf>) -> Result<Catalog> {
        let path = self.catalog_path(flag)?;
        debug!(path = %path.display(), capacity = self.capacity, "loading catalog");
        Catalog::load(&path, self.capacity)
            .with_context(|| format!("Failed to load catalog {}", path.display()))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = if cli.command.reads_config() {
        Settings::resolve(&cli)?
    } else {
        Settings::unloaded(&cli)?
    };

    let tracing_config = tracing_setup::TracingConfig {
        debug: cli.debug,
        level: settings.config.logging.as_ref().map(|l| l.level.clone()),
    };
    if let Err(err) = tracing_setup::init(&tracing_config) {
        eprintln!("tracing already initialized: {}", err);
    }

    if cli.capacity.is_some() && cli.capacity != Some(settings.config.preview.capacity) {
        warn!(
            capacity = settings.capacity,
            configured = settings.config.preview.capacity,
            "preview capacity overridden on the command line"
        );
    }

    match cli.command {
        Commands::Groups(args) => commands::run_groups(args, &settings)?,
        Commands::Group(args) => commands::run_group(args, &settings)?,
        Commands::Item(args) => commands::run_item(args, &settings)?,
        Commands::Replay(args) => commands::run_replay(args, &settings)?,
        Commands::Config(args) => config::run_config(args, &settings)?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
