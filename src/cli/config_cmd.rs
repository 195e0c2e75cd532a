//! Configuration management CLI commands
//!
//! Provides commands for managing ~/.zentra/smoke.toml (or the file named by
//! `--config`).

use anyhow::{Context, Result};
use clap::Subcommand;
use std::path::{Path, PathBuf};

use super::config::SmokeConfig;
use super::output;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize configuration file with default values
    Init {
        /// Overwrite existing configuration file
        #[arg(short, long)]
        force: bool,
    },

    /// Show current configuration
    Show {
        /// Output format (json, yaml, or table)
        #[arg(short, long, default_value = "yaml")]
        output: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key (base_url, timeout, or password)
        key: String,

        /// Configuration value
        value: String,
    },

    /// Get configuration file path
    Path,
}

/// Handle config commands against `path`, or the default location
pub fn handle_config_command(command: ConfigCommands, path: Option<PathBuf>) -> Result<()> {
    let path = match path {
        Some(path) => path,
        None => SmokeConfig::config_path()?,
    };

    match command {
        ConfigCommands::Init { force } => init_config(&path, force)?,
        ConfigCommands::Show { output } => show_config(&path, &output)?,
        ConfigCommands::Set { key, value } => set_config(&path, &key, &value)?,
        ConfigCommands::Path => println!("{}", path.display()),
    }

    Ok(())
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Configuration file already exists at: {}\nUse --force to overwrite",
            path.display()
        );
    }

    SmokeConfig::default().save_to_path(path)?;

    println!("✅ Configuration file created at: {}", path.display());
    println!("\nYou can now set values using:");
    println!("  zentra-smoke config set base_url <api-url>");
    println!("  zentra-smoke config set timeout <seconds>");
    println!("  zentra-smoke config set password <password>");

    Ok(())
}

fn show_config(path: &Path, output_format: &str) -> Result<()> {
    if !path.exists() {
        println!("No configuration file found at: {}", path.display());
        println!("\nRun 'zentra-smoke config init' to create one");
        return Ok(());
    }

    let config = SmokeConfig::load_from_path(path)?;

    if output_format == "table" {
        print_config_table(&config, path);
    } else {
        let masked = SmokeConfig { password: config.password.as_ref().map(|_| mask()), ..config };
        output::print_output(&masked, output_format)?;
    }

    Ok(())
}

/// Apply `key = value` to `config`, returning a confirmation line
fn apply_setting(config: &mut SmokeConfig, key: &str, value: &str) -> Result<String> {
    match key {
        "base_url" => {
            url::Url::parse(value).with_context(|| format!("Invalid base URL: {}", value))?;
            config.base_url = Some(value.to_string());
            Ok(format!("✅ Base URL set to: {}", value))
        }
        "timeout" => {
            let timeout: u64 =
                value.parse().context("Invalid timeout value. Must be a number in seconds")?;
            config.timeout = Some(timeout);
            Ok(format!("✅ Timeout set to: {} seconds", timeout))
        }
        "password" => {
            config.password = Some(value.to_string());
            Ok("✅ Password set successfully".to_string())
        }
        _ => anyhow::bail!(
            "Unknown configuration key: '{}'. Valid keys: base_url, timeout, password",
            key
        ),
    }
}

fn set_config(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut config = SmokeConfig::load_from_path(path).unwrap_or_default();

    let message = apply_setting(&mut config, key, value)?;
    config.save_to_path(path)?;

    println!("{}", message);
    println!("Configuration saved to: {}", path.display());

    Ok(())
}

fn mask() -> String {
    "********".to_string()
}

fn print_config_table(config: &SmokeConfig, path: &Path) {
    println!();
    println!("{:<15} {:<50}", "Key", "Value");
    output::print_separator(65);

    println!("{:<15} {}", "base_url", config.base_url.as_deref().unwrap_or("<not set>"));
    println!(
        "{:<15} {}",
        "timeout",
        config.timeout.map(|t| format!("{} seconds", t)).unwrap_or_else(|| "<not set>".to_string())
    );
    println!(
        "{:<15} {}",
        "password",
        config.password.as_ref().map(|_| mask()).unwrap_or_else(|| "<not set>".to_string())
    );

    println!();
    println!("Config file: {}", path.display());
    println!();
}
