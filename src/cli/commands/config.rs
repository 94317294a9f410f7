//! `inv config` command - Configuration inspection
//!
//! Config files are edited by hand; this command shows what the merged
//! result looks like and where each layer lives.

use clap::Subcommand;
use console::style;
use miette::Result;
use std::path::Path;

use crate::cli::helpers::load_config;
use crate::cli::GlobalOpts;
use crate::core::config::{CONFIG_KEYS, LOCAL_CONFIG_FILE};
use crate::core::Config;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration values
    Show {
        /// Show only this key's value
        key: Option<String>,
    },

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show { key } => run_show(key.as_deref(), global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(key: Option<&str>, global: &GlobalOpts) -> Result<()> {
    let config = load_config(global);

    if let Some(key) = key {
        if !CONFIG_KEYS.iter().any(|(k, _)| *k == key) {
            return Err(miette::miette!(
                "Unknown key '{}' (see `inv config keys`)",
                key
            ));
        }
        match config_value(&config, key) {
            Some(v) => println!("{}", v),
            None => return Err(miette::miette!("Key '{}' is not set", key)),
        }
        return Ok(());
    }

    println!("{}", style("Effective Configuration").bold().underlined());
    println!();
    for (key, _) in CONFIG_KEYS {
        print_config_value(key, config_value(&config, key).as_deref());
    }

    println!();
    println!("  {}: {}", style("inventory path").cyan(), config.inventory_path().display());
    println!("  {}: {}", style("locations path").cyan(), config.locations_path().display());

    println!();
    println!("{}", style("Config Sources (in priority order):").dim());
    println!("  1. Command line (--data-dir, --format)");
    println!("  2. Environment variables (INV_DATA_DIR, INV_FORMAT)");
    println!("  3. Local config (./{})", LOCAL_CONFIG_FILE);
    println!("  4. Global config (~/.config/inv/config.yaml)");
    Ok(())
}

fn run_path() -> Result<()> {
    println!("{}", style("Configuration file paths:").bold());
    println!();

    match Config::global_config_path() {
        Some(path) => print_path("Global:", &path),
        None => println!(
            "  {} {}",
            style("Global:").cyan(),
            style("(no home directory)").dim()
        ),
    }
    println!();
    print_path("Local:", Path::new(LOCAL_CONFIG_FILE));
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in CONFIG_KEYS {
        println!("  {:<20} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style(format!("Set keys in ./{} or the global config file.", LOCAL_CONFIG_FILE)).dim()
    );
    Ok(())
}

fn config_value(config: &Config, key: &str) -> Option<String> {
    match key {
        "data_dir" => config.data_dir.as_ref().map(|p| p.display().to_string()),
        "inventory_file" => config.inventory_file.clone(),
        "locations_file" => config.locations_file.clone(),
        "default_format" => config.default_format.clone(),
        "default_sort" => config.default_sort.clone(),
        "theme" => config.theme.clone(),
        _ => None,
    }
}

fn print_config_value(key: &str, value: Option<&str>) {
    if let Some(v) = value {
        println!("  {}: {}", style(key).cyan(), style(v).yellow());
    } else {
        println!("  {}: {}", style(key).cyan(), style("(not set)").dim());
    }
}

fn print_path(label: &str, path: &Path) {
    println!("  {} {}", style(label).cyan(), path.display());
    if path.exists() {
        println!("         {}", style("(exists)").green());
    } else {
        println!("         {}", style("(not created)").dim());
    }
}
