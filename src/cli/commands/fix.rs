//! Fix command - rewrite templated log calls to generated logging methods.
//!
//! Every reported call inside the selected scope (`--document`, `--type`, or
//! the whole program) is rewritten in one atomic batch. Either the whole batch
//! is committed or the snapshot is left untouched.
//!
//! Use `--apply` to write the rewritten snapshot (default is dry-run mode).

use anyhow::{Result, anyhow};
use colored::Colorize;

use super::super::{
    args::FixCommand,
    exit_status::ExitStatus,
    report::{self, rewrite_summary},
};
use crate::{
    context::{CheckContext, write_snapshot},
    core::{CallSiteHandle, RewriteEngine, RewriteOutcome, UnchangedReason},
};

pub fn fix(cmd: FixCommand) -> Result<ExitStatus> {
    let args = &cmd.args;
    let ctx = CheckContext::new(&args.common)?;
    let scope = args.scope();
    let strategy = args.strategy.unwrap_or(ctx.config.strategy);

    let sites: Vec<CallSiteHandle> = ctx
        .issues()
        .iter()
        .filter(|issue| scope.matches(issue.context.file_path(), issue.scope.as_deref()))
        .map(|issue| issue.site)
        .collect();
    tracing::debug!(?scope, ?strategy, targets = sites.len(), "Selected call sites");

    if sites.is_empty() {
        report::print_success(ctx.document_count());
        return Ok(ExitStatus::Success);
    }

    let program = ctx.program();
    let engine = RewriteEngine::new(&program.types, ctx.rewrite_options());

    match engine.try_rewrite_batch(program, &sites, strategy) {
        RewriteOutcome::Rewritten {
            program: rewritten,
            stats,
        } => {
            if args.apply {
                write_snapshot(&ctx.snapshot_path, &rewritten)?;
                println!("{} {}.", "Rewrote".green().bold(), rewrite_summary(&stats));
                print_skipped(stats.skipped);
                Ok(ExitStatus::Success)
            } else {
                report::print_rewrite_preview(program, &rewritten, &mut std::io::stdout().lock());
                println!(
                    "{} {}.",
                    "Would rewrite".yellow().bold(),
                    rewrite_summary(&stats)
                );
                print_skipped(stats.skipped);
                println!("Run with {} to write the snapshot.", "--apply".cyan());
                Ok(ExitStatus::Failure)
            }
        }
        RewriteOutcome::Unchanged {
            reason: UnchangedReason::Aborted(err),
        } => Err(anyhow!("Rewrite aborted, snapshot left unchanged: {}", err)),
        RewriteOutcome::Unchanged { reason } => {
            tracing::debug!(?reason, "Nothing rewritten");
            println!(
                "{} {} call site(s) could not be rewritten.",
                "Note:".bold(),
                sites.len()
            );
            Ok(ExitStatus::Success)
        }
    }
}

fn print_skipped(skipped: usize) {
    if skipped > 0 {
        println!("  - skipped: {} call site(s)", skipped);
    }
}
