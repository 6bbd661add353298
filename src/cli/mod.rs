//! Command-line interface layer.
//!
//! ## Module Structure
//!
//! - `args`: clap argument definitions
//! - `commands`: `check`, `fix` and `init`
//! - `exit_status`: process exit codes
//! - `logging`: tracing subscriber setup
//! - `report`: cargo-style issue output

use std::process::ExitCode;

use anyhow::Result;

pub mod args;
mod commands;
mod exit_status;
pub mod logging;
pub mod report;

pub use args::{Arguments, Command};
pub use exit_status::ExitStatus;

use commands::{check::check, fix::fix, init::init};

pub fn run_cli(args: Arguments) -> Result<ExitCode> {
    logging::init_tracing(args.verbose());

    let Some(Arguments {
        command: Some(command),
    }) = args.with_command_or_help()
    else {
        return Ok(ExitStatus::Success.into());
    };

    let status = match command {
        Command::Check(cmd) => check(cmd)?,
        Command::Fix(cmd) => fix(cmd)?,
        Command::Init => init()?,
    };
    Ok(status.into())
}
