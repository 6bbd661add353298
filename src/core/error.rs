//! Engine error and skip types.

use std::fmt;

use thiserror::Error;

use crate::core::syntax::{NodeId, ScopeKey};

/// Why a targeted call site was left untouched. Skips never abort a batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The handle does not point at a call expression in this snapshot.
    UnknownCallSite,
    /// The call failed classification.
    NotALogCall,
    /// No string literal or interpolated string where the template belongs.
    MissingTemplate,
    /// The call is not inside any type declaration.
    NoEnclosingType,
    /// The generated name is already taken in the target type by a method
    /// with a different level, message or parameter list.
    NameConflict { name: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnknownCallSite => write!(f, "call site not found in snapshot"),
            SkipReason::NotALogCall => write!(f, "not a templated log call"),
            SkipReason::MissingTemplate => write!(f, "no message template argument"),
            SkipReason::NoEnclosingType => write!(f, "no enclosing type"),
            SkipReason::NameConflict { name } => {
                write!(f, "'{}' already declared with a different signature", name)
            }
        }
    }
}

/// Structural failure while committing edits. Fatal to the whole batch: the
/// caller gets the original snapshot back.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("Call expression {call} not found in document {document}")]
    CallNotFound { document: usize, call: NodeId },

    #[error("Scope {} not found in document {}", .scope.path, .scope.document)]
    ScopeNotFound { scope: ScopeKey },

    #[error("Document index {0} out of range")]
    DocumentNotFound(usize),

    #[error("No node ids left to allocate for generated code")]
    IdSpaceExhausted,

    #[error("Rewrite cancelled")]
    Cancelled,
}
