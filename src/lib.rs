//! Loggen - LoggerMessage rewriter for Microsoft.Extensions.Logging
//!
//! Loggen finds `ILogger.LogXxx("template {Placeholder}", args)` calls in a
//! program snapshot and rewrites them to calls of source-generated
//! `[LoggerMessage]` methods, either as partial instance methods on the
//! enclosing type or as static methods in a shared nested `Log` class.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `context`: Snapshot and configuration loaded for one run
//! - `core`: Detection and rewrite engine
//! - `issues`: Issue type definitions
//! - `rules`: Detection rules

pub mod cli;
pub mod config;
pub mod context;
pub mod core;
pub mod issues;
pub mod rules;
