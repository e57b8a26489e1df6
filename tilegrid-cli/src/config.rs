use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tilegrid_core::config::{CatalogConfig, LoggingConfig, PreviewConfig};
use tilegrid_core::TileConfig;

use crate::Settings;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a starter config file
    Init(InitArgs),
    /// Print the effective config as TOML
    Show,
    /// Show config file path
    Path,
}

impl ConfigCommands {
    /// Only `show` needs the file parsed; `init` and `path` just locate it
    pub fn reads_config(&self) -> bool {
        matches!(self, ConfigCommands::Show)
    }
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,

    /// Default catalog file to record in the config
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<std::path::PathBuf>,
}

pub fn run_config(args: ConfigArgs, settings: &Settings) -> Result<()> {
    match args.command {
        ConfigCommands::Init(args) => run_init(args, settings),
        ConfigCommands::Show => run_show(settings),
        ConfigCommands::Path => run_path(settings),
    }
}

fn run_init(args: InitArgs, settings: &Settings) -> Result<()> {
    let config_path = &settings.config_path;

    if config_path.exists() && !args.force {
        return Err(anyhow::anyhow!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        ));
    }

    let config = TileConfig {
        preview: PreviewConfig {
            capacity: settings.capacity,
        },
        catalog: CatalogConfig { path: args.catalog },
        logging: Some(LoggingConfig {
            level: "info".to_string(),
        }),
    };

    config
        .save_to(config_path)
        .context("Failed to write starter config")?;

    println!("Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Edit the config: $EDITOR {:?}", config_path);
    println!("  2. Point catalog.path at your catalog file");
    println!("  3. Run: tilegrid groups");

    Ok(())
}

fn run_show(settings: &Settings) -> Result<()> {
    let mut effective = settings.config.clone();
    effective.preview.capacity = settings.capacity;

    let toml_str =
        toml::to_string_pretty(&effective).context("Failed to serialize config to TOML")?;

    println!("{}", toml_str);

    Ok(())
}

fn run_path(settings: &Settings) -> Result<()> {
    println!("{}", settings.config_path.display());
    Ok(())
}
