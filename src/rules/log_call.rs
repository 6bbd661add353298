//! Templated log call detection rule.
//!
//! Reports every `LogXxx` call with a message template that the rewrite engine
//! can turn into a `[LoggerMessage]` method, except in ignored documents.

use glob::Pattern;

use crate::{
    context::CheckContext,
    core::{Program, TypeOracle, scan_program},
    issues::LogCallIssue,
};

pub fn check_log_call_issues(ctx: &CheckContext) -> Vec<LogCallIssue> {
    let program = ctx.program();
    check_log_calls(program, &program.types, ctx.ignore_patterns())
}

/// Scan `program` and convert findings outside ignored documents into issues,
/// sorted by location.
pub fn check_log_calls<O>(program: &Program, oracle: &O, ignores: &[Pattern]) -> Vec<LogCallIssue>
where
    O: TypeOracle + ?Sized,
{
    let mut issues: Vec<LogCallIssue> = scan_program(program, oracle)
        .into_iter()
        .filter(|finding| {
            !ignores
                .iter()
                .any(|pattern| pattern.matches(&finding.location.file_path))
        })
        .map(LogCallIssue::from)
        .collect();
    issues.sort();
    issues
}
