//! Rule implementations for loggen.
//!
//! Rules are pure functions that take only the inputs they need and return a
//! specific issue type.
//!
//! ## Module Structure
//!
//! - `log_call`: templated log calls that can use generated logging methods

pub mod log_call;
