use std::fmt;

use crate::core::syntax::{Expr, NodeId};

/// Severity of a log call, derived from the `LogXxx` method name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogLevel {
    Trace,
    Debug,
    Information,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Trace,
        LogLevel::Debug,
        LogLevel::Information,
        LogLevel::Warning,
        LogLevel::Error,
        LogLevel::Critical,
    ];

    /// The extension method that logs at this level (`LogInformation`).
    pub fn method_name(self) -> &'static str {
        match self {
            LogLevel::Trace => "LogTrace",
            LogLevel::Debug => "LogDebug",
            LogLevel::Information => "LogInformation",
            LogLevel::Warning => "LogWarning",
            LogLevel::Error => "LogError",
            LogLevel::Critical => "LogCritical",
        }
    }

    /// Exact lookup; `None` for anything outside the six `LogXxx` methods.
    pub fn from_method_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|level| level.method_name() == name)
    }

    /// Severity for an already-classified call. Unknown names fall back to
    /// `Information`.
    pub fn for_method(name: &str) -> Self {
        Self::from_method_name(name).unwrap_or(LogLevel::Information)
    }

    /// Member name on the `LogLevel` enum of the logging library.
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "Trace",
            LogLevel::Debug => "Debug",
            LogLevel::Information => "Information",
            LogLevel::Warning => "Warning",
            LogLevel::Error => "Error",
            LogLevel::Critical => "Critical",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One parameter of the generated method, bound to the argument it replaces.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterInfo {
    pub name: String,
    /// Minimally-qualified type name (`int`, `User`, `object` when unknown).
    pub ty: String,
    /// The original argument expression, re-emitted unchanged at the call site.
    pub source_expr: Expr,
}

/// A log call reduced to what the rewrite strategies need.
#[derive(Debug, Clone, PartialEq)]
pub struct LogCallInfo {
    pub call: NodeId,
    pub level: LogLevel,
    /// Template exactly as written, or synthesized from an interpolated string.
    pub message_template: String,
    /// The logger expression the call was made on.
    pub receiver: Expr,
    pub exception: Option<Expr>,
    pub parameters: Vec<ParameterInfo>,
}
