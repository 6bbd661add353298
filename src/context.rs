//! Check context shared by the `check` and `fix` commands.
//!
//! # Configuration Priority
//!
//! 1. CLI arguments (e.g. `--snapshot build/app.snapshot.json`)
//! 2. `.loggenrc.json` config file
//! 3. Built-in defaults

use std::{
    cell::OnceCell,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context as _, Result};
use glob::Pattern;

use crate::{
    cli::args::CommonArgs,
    config::{Config, ConfigLoadResult, load_config},
    core::{Program, RewriteOptions},
    issues::LogCallIssue,
    rules::log_call::check_log_call_issues,
};

pub struct CheckContext {
    /// Merged configuration (CLI args > config file > defaults).
    pub config: Config,
    /// Working directory; relative paths resolve against it.
    pub root_dir: PathBuf,
    /// Resolved location of the program snapshot.
    pub snapshot_path: PathBuf,
    pub verbose: bool,
    program: Program,
    ignore_patterns: Vec<Pattern>,
    /// Computed on first call to `issues()`.
    issues: OnceCell<Vec<LogCallIssue>>,
}

impl CheckContext {
    pub fn new(args: &CommonArgs) -> Result<Self> {
        let root_dir = std::env::current_dir().context("Failed to read working directory")?;
        Self::from_dir(&root_dir, args)
    }

    pub fn from_dir(root_dir: &Path, args: &CommonArgs) -> Result<Self> {
        let ConfigLoadResult {
            mut config,
            from_file,
        } = load_config(root_dir)?;
        if let Some(snapshot) = &args.snapshot {
            config.snapshot = snapshot.to_string_lossy().into_owned();
        }
        tracing::debug!(from_file, snapshot = %config.snapshot, "Loaded configuration");

        let snapshot_path = root_dir.join(&config.snapshot);
        let program = load_snapshot(&snapshot_path)?;
        let ignore_patterns = config.ignore_patterns()?;

        Ok(Self {
            config,
            root_dir: root_dir.to_path_buf(),
            snapshot_path,
            verbose: args.verbose,
            program,
            ignore_patterns,
            issues: OnceCell::new(),
        })
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn ignore_patterns(&self) -> &[Pattern] {
        &self.ignore_patterns
    }

    pub fn rewrite_options(&self) -> RewriteOptions {
        self.config.rewrite_options()
    }

    /// Templated log call issues, computed once.
    pub fn issues(&self) -> &[LogCallIssue] {
        self.issues.get_or_init(|| check_log_call_issues(self))
    }

    pub fn document_count(&self) -> usize {
        self.program.documents.len()
    }
}

pub fn load_snapshot(path: &Path) -> Result<Program> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
    Program::from_json(&content)
        .with_context(|| format!("Failed to parse snapshot: {}", path.display()))
}

pub fn write_snapshot(path: &Path, program: &Program) -> Result<()> {
    let json = program
        .to_json()
        .context("Failed to serialize snapshot")?;
    fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write snapshot: {}", path.display()))
}
