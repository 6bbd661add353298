//! Call-site classification.
//!
//! Decides whether one call expression is a templated log call the engine can
//! rewrite. Classification only reads the tree and the oracle, so it is safe to
//! run on many call sites in parallel.

use crate::core::data::LogLevel;
use crate::core::oracle::{Capability, TypeOracle};
use crate::core::syntax::Expr;

/// A call that passed every classification check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogCallMatch {
    /// `LogInformation`, `LogError`, ...; shown in findings.
    pub method_name: String,
    pub level: LogLevel,
}

/// Classify `call` against the log call contract:
///
/// 1. shape `receiver.Method(...)`
/// 2. `Method` is one of the six `LogXxx` extension methods
/// 3. the call binds to a method symbol
/// 4. the receiver type or the declaring type is a logger
/// 5. at least one argument is a string literal or interpolated string
pub fn classify<O>(call: &Expr, oracle: &O) -> Option<LogCallMatch>
where
    O: TypeOracle + ?Sized,
{
    let Expr::Call {
        id, callee, args, ..
    } = call
    else {
        return None;
    };
    let Expr::Member { target, name, .. } = callee.as_ref() else {
        return None;
    };

    let level = LogLevel::from_method_name(name)?;
    let symbol = oracle.resolve_method(*id)?;

    let receiver_is_logger = oracle
        .type_of(target.id())
        .is_some_and(|ty| oracle.is_assignable_to(&ty, Capability::Logger));
    if !receiver_is_logger && !oracle.is_assignable_to(&symbol.declaring_type, Capability::Logger)
    {
        return None;
    }

    if !args.iter().any(Expr::is_template_carrier) {
        return None;
    }

    Some(LogCallMatch {
        method_name: name.clone(),
        level,
    })
}
