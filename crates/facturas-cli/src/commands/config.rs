//! Config command - inspect and edit the JSON settings file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Args, Subcommand};
use console::style;
use serde_json::Value;

use facturas_core::FacturasConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print the effective configuration
    Show,

    /// Write a configuration file with default values
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print one value (e.g. "export.sheet_name")
    Get { key: String },

    /// Change one value; bare words are stored as strings
    Set { key: String, value: String },

    /// Print the configuration file location
    Path,
}

pub fn run(args: ConfigArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let path = config_path
        .map(PathBuf::from)
        .unwrap_or_else(default_config_path);

    match args.command {
        ConfigCommand::Show => {
            if !path.exists() {
                println!("{} {} does not exist, showing defaults.", style("ℹ").blue(), path.display());
            }
            println!("{}", serde_json::to_string_pretty(&load_or_default(&path)?)?);
        }
        ConfigCommand::Init { force } => {
            if path.exists() && !force {
                anyhow::bail!("{} already exists. Use --force to overwrite.", path.display());
            }
            write_config(&path, &FacturasConfig::default())?;
            println!("{} Created {}", style("✓").green(), path.display());
        }
        ConfigCommand::Get { key } => {
            let json = serde_json::to_value(load_or_default(&path)?)?;
            println!("{}", serde_json::to_string_pretty(lookup(&json, &key)?)?);
        }
        ConfigCommand::Set { key, value } => {
            let mut json = serde_json::to_value(load_or_default(&path)?)?;
            let value = parse_value(&value);
            assign(&mut json, &key, value.clone())?;

            let config: FacturasConfig = serde_json::from_value(json)
                .with_context(|| format!("Invalid value for {}", key))?;
            config.validate()?;
            write_config(&path, &config)?;
            println!("{} {} = {}", style("✓").green(), key, value);
        }
        ConfigCommand::Path => {
            let status = if path.exists() {
                style("exists").green()
            } else {
                style("not created, run 'facturas config init'").yellow()
            };
            println!("{} ({})", path.display(), status);
        }
    }

    Ok(())
}

/// `<config dir>/facturas/config.json`, or the working directory when the
/// platform has no config dir.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("facturas")
        .join("config.json")
}

fn load_or_default(path: &Path) -> anyhow::Result<FacturasConfig> {
    if path.exists() {
        Ok(FacturasConfig::from_file(path)?)
    } else {
        Ok(FacturasConfig::default())
    }
}

fn write_config(path: &Path, config: &FacturasConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(path)?;
    Ok(())
}

fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Follow a dotted key through nested objects.
fn lookup<'a>(json: &'a Value, key: &str) -> anyhow::Result<&'a Value> {
    key.split('.')
        .try_fold(json, |node, part| node.get(part))
        .with_context(|| format!("Configuration key not found: {}", key))
}

/// Replace the value at an existing dotted key. New keys are rejected.
fn assign(json: &mut Value, key: &str, value: Value) -> anyhow::Result<()> {
    let slot = key
        .split('.')
        .try_fold(json, |node, part| node.get_mut(part))
        .with_context(|| format!("Configuration key not found: {}", key))?;

    if slot.is_object() {
        anyhow::bail!("{} is a section, set one of its keys instead", key);
    }
    *slot = value;
    Ok(())
}
