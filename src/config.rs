use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Ok, Result, bail};
use glob::Pattern;
use serde::{Deserialize, Serialize};

use crate::core::{RewriteOptions, RewriteStrategy};

pub const CONFIG_FILE_NAME: &str = ".loggenrc.json";

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Program snapshot exported by the host, relative to the working directory.
    #[serde(default = "default_snapshot")]
    pub snapshot: String,
    #[serde(default)]
    pub strategy: RewriteStrategy,
    #[serde(default = "default_log_class_name")]
    pub log_class_name: String,
    #[serde(default = "default_logging_namespace")]
    pub logging_namespace: String,
    /// Glob patterns over document paths excluded from checks and fixes.
    #[serde(default)]
    pub ignores: Vec<String>,
}

fn default_snapshot() -> String {
    "./loggen.snapshot.json".to_string()
}

fn default_log_class_name() -> String {
    RewriteOptions::default().log_class_name
}

fn default_logging_namespace() -> String {
    RewriteOptions::default().logging_namespace
}

impl Default for Config {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot(),
            strategy: RewriteStrategy::default(),
            log_class_name: default_log_class_name(),
            logging_namespace: default_logging_namespace(),
            ignores: Vec::new(),
        }
    }
}

impl Config {
    /// Validate configuration values.
    ///
    /// Returns an error if any glob pattern in `ignores` is invalid or if
    /// `logClassName` is not a valid identifier.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.ignores {
            Pattern::new(pattern)
                .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))?;
        }

        if !is_identifier(&self.log_class_name) {
            bail!(
                "Invalid 'logClassName': \"{}\" is not an identifier",
                self.log_class_name
            );
        }

        if self.logging_namespace.trim().is_empty() {
            bail!("'loggingNamespace' must not be empty");
        }

        Ok(())
    }

    pub fn ignore_patterns(&self) -> Result<Vec<Pattern>> {
        self.ignores
            .iter()
            .map(|pattern| {
                Pattern::new(pattern)
                    .with_context(|| format!("Invalid glob pattern in 'ignores': \"{}\"", pattern))
            })
            .collect()
    }

    pub fn rewrite_options(&self) -> RewriteOptions {
        RewriteOptions {
            log_class_name: self.log_class_name.clone(),
            logging_namespace: self.logging_namespace.clone(),
        }
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_alphabetic() || first == '_')
        && chars.all(|c| c.is_alphanumeric() || c == '_')
}

pub fn default_config_json() -> Result<String> {
    let config = Config::default();
    serde_json::to_string_pretty(&config).context("Failed to generate default config.")
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if current.join(".git").exists() {
            return None;
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Result of loading configuration.
pub struct ConfigLoadResult {
    pub config: Config,
    /// True if config was loaded from a file, false if using defaults.
    pub from_file: bool,
}

pub fn load_config(start_dir: &Path) -> Result<ConfigLoadResult> {
    match find_config_file(start_dir) {
        Some(path) => {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {:?}", path))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", path))?;
            config.validate()?;
            Ok(ConfigLoadResult {
                config,
                from_file: true,
            })
        }
        None => Ok(ConfigLoadResult {
            config: Config::default(),
            from_file: false,
        }),
    }
}
