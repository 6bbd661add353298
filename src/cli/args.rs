//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `check`: Report templated log calls that can use generated logging methods
//! - `fix`: Rewrite those calls to `[LoggerMessage]` methods in the snapshot
//! - `init`: Initialize loggen configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::core::{FixAllScope, RewriteStrategy};

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Check(cmd)) => cmd.args.common.verbose,
            Some(Command::Fix(cmd)) => cmd.args.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by all commands.
#[derive(Debug, Clone, Default, Args)]
pub struct CommonArgs {
    /// Program snapshot path (overrides config file)
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Parser)]
pub struct CheckArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[command(flatten)]
    pub args: CheckArgs,
}

#[derive(Debug, Parser)]
pub struct FixArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Actually write the rewritten snapshot (default is dry-run)
    #[arg(long)]
    pub apply: bool,

    /// Rewrite strategy (overrides config file)
    #[arg(long, value_enum)]
    pub strategy: Option<RewriteStrategy>,

    /// Only rewrite calls in the document with this path
    #[arg(long, conflicts_with = "type_name")]
    pub document: Option<String>,

    /// Only rewrite calls enclosed by this fully qualified type
    #[arg(long = "type")]
    pub type_name: Option<String>,
}

impl FixArgs {
    pub fn scope(&self) -> FixAllScope {
        match (&self.document, &self.type_name) {
            (Some(path), _) => FixAllScope::Document(path.clone()),
            (None, Some(name)) => FixAllScope::Type(name.clone()),
            (None, None) => FixAllScope::Program,
        }
    }
}

#[derive(Debug, Args)]
pub struct FixCommand {
    #[command(flatten)]
    pub args: FixArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Report templated ILogger.LogXxx calls
    Check(CheckCommand),
    /// Rewrite templated log calls to generated LoggerMessage methods
    Fix(FixCommand),
    /// Initialize a new .loggenrc.json configuration file
    Init,
}
