//! Core rewrite engine.
//!
//! Turns templated `ILogger.LogXxx(...)` calls into calls to generated
//! `[LoggerMessage]` methods. The engine reads a program snapshot and a type
//! oracle and produces a new snapshot; it never parses or writes source text.
//!
//! Pipeline: classify → extract → strategy → (batch) plan → commit.
//!
//! ## Module Structure
//!
//! - `syntax`: program snapshot model, traversal and printer
//! - `oracle`: type oracle trait, capabilities and the serde-backed `TypeTable`
//! - `template`: message template parser
//! - `naming`: method, parameter and placeholder identifiers
//! - `classify`: log call detection
//! - `extract`: `LogCallInfo` extraction
//! - `strategy`: instance-method and shared `Log` class rewrites
//! - `mutate`: tree edits (call replacement, declarations, usings)
//! - `batch`: atomic single and fix-all rewrites
//! - `scan`: findings over a whole program
//! - `data`: shared records
//! - `error`: skip reasons and commit errors

pub mod batch;
pub mod classify;
pub mod data;
pub mod error;
pub mod extract;
pub mod mutate;
pub mod naming;
pub mod oracle;
pub mod scan;
pub mod strategy;
pub mod syntax;
pub mod template;

#[cfg(test)]
pub mod testing;

pub use batch::{
    CallSiteHandle, EditPlan, RewriteEngine, RewriteOutcome, RewriteStats, UnchangedReason,
};
pub use data::{LogCallInfo, LogLevel, ParameterInfo, SourceContext, SourceLocation};
pub use error::{RewriteError, SkipReason};
pub use oracle::{Capability, TypeOracle, TypeRef, TypeTable};
pub use scan::{FINDING_CODE, Finding, FindingSink, FixAllScope, scan_program};
pub use strategy::{RewriteOptions, RewriteStrategy};
pub use syntax::{NodeId, Program};
