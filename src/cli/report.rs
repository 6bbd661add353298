//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format. Writers are generic so that
//! output can be captured in tests.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use crate::core::{Program, RewriteStats, syntax::render_document};
use crate::issues::LogCallIssue;

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

pub fn report(issues: &[LogCallIssue]) {
    report_to(issues, &mut io::stdout().lock());
}

pub fn report_to<W: Write>(issues: &[LogCallIssue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    let max_line_width = sorted
        .iter()
        .map(|issue| issue.context.line())
        .max()
        .map_or(1, |n| n.to_string().len());

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

pub fn print_success(documents: usize) {
    print_success_to(documents, &mut io::stdout().lock());
}

pub fn print_success_to<W: Write>(documents: usize, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} {}",
        SUCCESS_MARK.green(),
        format!(
            "Checked {} {} - no templated log calls found",
            documents,
            plural(documents, "document", "documents")
        )
        .green()
    );
}

/// Print every document that differs between `before` and `after`.
pub fn print_rewrite_preview<W: Write>(before: &Program, after: &Program, writer: &mut W) {
    for (index, document) in after.documents.iter().enumerate() {
        if before.documents.get(index) == Some(document) {
            continue;
        }
        let _ = writeln!(writer, "{} {}", "rewrite:".bold().cyan(), document.path);
        for line in render_document(document).lines() {
            let _ = writeln!(writer, "  {} {}", "|".blue(), line);
        }
        let _ = writeln!(writer);
    }
}

pub fn rewrite_summary(stats: &RewriteStats) -> String {
    format!(
        "{} log call(s) with {} generated method(s) in {} document(s)",
        stats.rewritten, stats.declarations, stats.documents
    )
}

fn print_issue<W: Write>(issue: &LogCallIssue, writer: &mut W, max_line_width: usize) {
    let severity_str = LogCallIssue::severity().to_string().bold().yellow();

    let _ = writeln!(
        writer,
        "{}: \"{}\"  {}",
        severity_str,
        issue.message(),
        LogCallIssue::rule().to_string().dimmed().cyan()
    );

    let ctx = &issue.context;
    let _ = writeln!(
        writer,
        "  {} {}:{}:{}",
        "-->".blue(),
        ctx.file_path(),
        ctx.line(),
        ctx.col()
    );

    let _ = writeln!(
        writer,
        "{:>width$} {}",
        "",
        "|".blue(),
        width = max_line_width
    );
    let _ = writeln!(
        writer,
        "{:>width$} {} {}",
        ctx.line().to_string().blue(),
        "|".blue(),
        ctx.source_line,
        width = max_line_width
    );

    // Caret under the method name (1-based)
    let col = issue.method_col();
    let prefix: String = ctx.source_line.chars().take(col.saturating_sub(1)).collect();
    let _ = writeln!(
        writer,
        "{:>width$} {} {:>padding$}{}",
        "",
        "|".blue(),
        "",
        "^".yellow(),
        width = max_line_width,
        padding = UnicodeWidthStr::width(prefix.as_str())
    );

    let note = match &issue.scope {
        Some(scope) => format!("{} in {}", issue.code, scope),
        None => issue.code.to_string(),
    };
    let _ = writeln!(
        writer,
        "{:>width$} {} {} {}",
        "",
        "=".blue(),
        "note:".bold(),
        note,
        width = max_line_width
    );

    let _ = writeln!(writer);
}

fn print_summary<W: Write>(issues: &[LogCallIssue], writer: &mut W) {
    // Every finding is a warning; the error count stays in the summary.
    let total_warnings = issues.len();

    let _ = writeln!(
        writer,
        "{} {} problems ({} {}, {} {})",
        FAILURE_MARK.red(),
        total_warnings,
        0,
        "errors".red(),
        total_warnings,
        plural(total_warnings, "warning", "warnings").yellow()
    );
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 { one } else { many }
}
