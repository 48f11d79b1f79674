use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;
use rxlint_config::{ConfigError, ConfigManager, CONFIG_FILE_NAME};
use std::path::{Path, PathBuf};

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a .rxlint.toml listing every rule at its default level
    Init {
        /// Directory to create the file in (defaults to the current directory)
        #[arg(value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Show the config file that applies to the current directory
    Path,

    /// Validate the config file
    Validate {
        /// Config file to validate (defaults to the discovered one)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub fn handle_config_command(cmd: ConfigCommand, working_dir: &Path) -> Result<()> {
    match cmd {
        ConfigCommand::Init { dir } => {
            let dir = dir.unwrap_or_else(|| working_dir.to_path_buf());
            init_config(&dir.join(CONFIG_FILE_NAME))
        }
        ConfigCommand::Path => show_config_path(working_dir),
        ConfigCommand::Validate { config } => validate_config(working_dir, config.as_deref()),
    }
}

fn init_config(path: &Path) -> Result<()> {
    match ConfigManager::init_at(path) {
        Ok(_) => {
            println!("{} Initialized config at: {}", "✓".green(), path.display());
            Ok(())
        }
        Err(ConfigError::ConfigExists(existing)) => {
            println!("Config already exists at: {}", existing.display());
            println!("To reinitialize, please delete the existing config first.");
            Ok(())
        }
        Err(e) => Err(e).context("Failed to write config"),
    }
}

fn show_config_path(working_dir: &Path) -> Result<()> {
    match ConfigManager::find_config(working_dir) {
        Some(path) => println!("{}", path.display()),
        None => println!("No {} found; built-in defaults apply.", CONFIG_FILE_NAME),
    }
    Ok(())
}

fn validate_config(working_dir: &Path, config: Option<&Path>) -> Result<()> {
    let manager = match config {
        Some(path) => ConfigManager::load_from(&working_dir.join(path))
            .with_context(|| format!("Invalid config {}", path.display()))?,
        None => {
            let path = ConfigManager::find_config(working_dir).with_context(|| {
                format!("No {} found. Run 'rxlint config init' first.", CONFIG_FILE_NAME)
            })?;
            ConfigManager::load_from(&path)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
    };

    let config = manager.config();
    let enabled = config.rule_configs();

    // Options are checked against each rule's schema only when the rule is built.
    for rule in &enabled {
        if let Some(entry) = rxlint_rule_engine::find_rule(&rule.name) {
            entry
                .create(&rule.options)
                .with_context(|| format!("Invalid options for rule '{}'", rule.name))?;
        }
    }

    println!("{} Config is valid", "✓".green());
    if let Some(path) = manager.path() {
        println!("  File: {}", path.display());
    }
    println!("  Type information: {}", config.type_information);
    println!("  Ignore patterns: {}", config.ignore.len());
    println!("  Rules enabled: {}", enabled.len());

    Ok(())
}
