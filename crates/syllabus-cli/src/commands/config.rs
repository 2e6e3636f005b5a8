//! Config command for managing CLI configuration

use clap::{Args, Subcommand};

use crate::config::{config_file_path, Config};

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print one config value
    Get {
        /// Config key name
        key: String,
    },
    /// Change one config value and save the file
    Set {
        /// Config key name
        key: String,
        /// New value (relations take a comma-separated list)
        value: String,
    },
    /// List every config value
    List,
    /// Show the config file path
    Path,
    /// Write a config file with default values
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(args: &ConfigArgs, config: &Config) -> anyhow::Result<()> {
    match &args.command {
        ConfigCommands::Get { key } => {
            let Some(value) = config.get(key) else {
                anyhow::bail!(
                    "Unknown config key: {} (available: {})",
                    key,
                    Config::keys().join(", ")
                );
            };
            println!("{}", value);
        }
        ConfigCommands::Set { key, value } => {
            let mut updated = config.clone();
            updated.set(key, value)?;
            updated.save()?;
            tracing::info!("Config {} set to {}", key, value);
            println!("Set {} = {}", key, value);
        }
        ConfigCommands::List => {
            println!("Config file: {}", config_file_path().display());
            println!();
            for key in Config::keys() {
                let value = config.get(key).unwrap_or_default();
                println!("{} = {}", key, value);
            }
        }
        ConfigCommands::Path => println!("{}", config_file_path().display()),
        ConfigCommands::Init { force } => {
            let path = config_file_path();
            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at {}. Use --force to overwrite.",
                    path.display()
                );
            }
            Config::default().save()?;
            println!("Created config file at {}", path.display());
        }
    }
    Ok(())
}
