//! Init command - write a default `.loggenrc.json` into the working directory.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use colored::Colorize;

use super::super::{exit_status::ExitStatus, report::SUCCESS_MARK};
use crate::config::{CONFIG_FILE_NAME, Config, default_config_json};

pub fn init() -> Result<ExitStatus> {
    let config_path = Path::new(CONFIG_FILE_NAME);
    if config_path.exists() {
        eprintln!("Error: {} already exists", CONFIG_FILE_NAME);
        return Ok(ExitStatus::Failure);
    }

    let json = default_config_json()?;
    fs::write(config_path, json + "\n")
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;
    tracing::debug!(path = CONFIG_FILE_NAME, "Wrote default configuration");

    println!(
        "{} {}",
        SUCCESS_MARK.green(),
        format!("Created {}", CONFIG_FILE_NAME).green()
    );
    println!(
        "Export a program snapshot to {}, then run {}.",
        Config::default().snapshot,
        "loggen check".cyan()
    );

    Ok(ExitStatus::Success)
}
