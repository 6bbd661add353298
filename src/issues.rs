//! Issue types for log call analysis results.
//!
//! Each issue is self-contained with everything needed by:
//! - Reporter: to display the issue to users
//! - Fix command: to target the call site for rewriting

use crate::core::{CallSiteHandle, Finding, SourceContext};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue. Templated log calls are style findings, so
/// warning is the only level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    TemplatedLogCall,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::TemplatedLogCall => write!(f, "templated-log-call"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Templated `LogXxx` call that can use a generated logging method instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCallIssue {
    pub context: SourceContext,
    /// Fixed diagnostic code (`LGEN001`).
    pub code: &'static str,
    /// The matched method, e.g. `LogInformation`.
    pub method_name: String,
    pub site: CallSiteHandle,
    /// Fully qualified name of the enclosing type.
    pub scope: Option<String>,
}

impl LogCallIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::TemplatedLogCall
    }

    pub fn message(&self) -> String {
        format!(
            "Use a generated LoggerMessage method instead of '{}'",
            self.method_name
        )
    }

    /// Character offset of the method name within the source line.
    pub fn method_col(&self) -> usize {
        let needle = format!(".{}(", self.method_name);
        self.context
            .source_line
            .find(&needle)
            .map_or(1, |pos| self.context.source_line[..pos].chars().count() + 2)
    }
}

impl From<Finding> for LogCallIssue {
    fn from(finding: Finding) -> Self {
        Self {
            context: SourceContext::new(finding.location, finding.snippet),
            code: finding.code,
            method_name: finding.method_name,
            site: finding.site,
            scope: finding.scope,
        }
    }
}

impl Ord for LogCallIssue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.context
            .location
            .cmp(&other.context.location)
            .then_with(|| self.site.cmp(&other.site))
    }
}

impl PartialOrd for LogCallIssue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
