//! Core data types shared by the classifier, extractor and rewrite strategies.
//!
//! ## Module Structure
//!
//! - `log_call`: normalized log call records (LogCallInfo, ParameterInfo, LogLevel)
//! - `source`: source location types used in findings (SourceContext, SourceLocation)

pub mod log_call;
pub mod source;

pub use log_call::{LogCallInfo, LogLevel, ParameterInfo};
pub use source::{SourceContext, SourceLocation};
