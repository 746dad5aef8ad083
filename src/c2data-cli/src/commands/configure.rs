//! Configuration command handlers
//!
//! Handles the `configure` subcommand for showing and creating the
//! c2data config file.

use crate::config::Config;
use anyhow::{Context, Result};
use std::path::Path;

/// Handle the configure command
///
/// # Arguments
/// * `explicit` - Config path given with `--config`, if any
/// * `show` - Print the effective configuration
/// * `init` - Write a default config file when none exists
pub fn handle(explicit: Option<&Path>, show: bool, init: bool) -> Result<()> {
    let path = Config::resolve_path(explicit)?;

    if init {
        return init_config(&path);
    }

    if show {
        let config = Config::load(explicit)?;
        return show_config(&config, &path);
    }

    show_usage();
    Ok(())
}

/// Display current configuration
fn show_config(config: &Config, path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config file: {}", path.display());
    } else {
        println!("Config file: {} (not created, showing defaults)", path.display());
    }
    println!();

    let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;
    if contents.trim().is_empty() {
        println!("(empty)");
    } else {
        print!("{}", contents);
    }

    Ok(())
}

fn init_config(path: &Path) -> Result<()> {
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    Config::default().save(path)?;
    println!("Config saved to: {}", path.display());
    Ok(())
}

/// Show usage help for the configure command
fn show_usage() {
    println!("Usage: c2data configure --show");
    println!("   or: c2data configure --init");
    println!();
    println!("Keys: sources = [{{ path, locale }}], output, skip_errors, validate,");
    println!("      legacy_zero_defaults, [sprite] sheet_prefix, preferred_frame, atlas_dir");
}
