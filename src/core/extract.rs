//! Call info extraction.
//!
//! Reduces a classified log call to a [`LogCallInfo`]: severity, message
//! template, optional exception argument and the ordered parameters of the
//! method that will replace it.

use crate::core::data::{LogCallInfo, LogLevel, ParameterInfo};
use crate::core::error::SkipReason;
use crate::core::naming::{parameter_name, placeholder_for_hole};
use crate::core::oracle::{Capability, FALLBACK_TYPE_NAME, TypeOracle};
use crate::core::syntax::{Expr, InterpolationPart};
use crate::core::template::{self, Placeholder};

/// Extract the log call info of `call`, which must already have passed
/// classification.
///
/// Literal templates pair placeholders with the trailing arguments by
/// position. When the counts differ the extra placeholders or arguments are
/// dropped, so the result has `min(placeholders, arguments)` parameters.
pub fn extract<O>(call: &Expr, oracle: &O) -> Result<LogCallInfo, SkipReason>
where
    O: TypeOracle + ?Sized,
{
    let Expr::Call {
        id, callee, args, ..
    } = call
    else {
        return Err(SkipReason::NotALogCall);
    };
    let Expr::Member { target, name, .. } = callee.as_ref() else {
        return Err(SkipReason::NotALogCall);
    };

    let exception = args
        .first()
        .filter(|first| is_exception(first, oracle))
        .cloned();
    let cursor = usize::from(exception.is_some());

    let carrier = args.get(cursor).ok_or(SkipReason::MissingTemplate)?;
    let (message_template, parameters) = match carrier {
        Expr::Str { value, .. } => {
            let placeholders = template::parse(value);
            let parameters = zip_parameters(&placeholders, &args[cursor + 1..], oracle);
            (value.clone(), parameters)
        }
        Expr::Interpolated { parts, .. } => interpolated_template(parts, oracle),
        _ => return Err(SkipReason::MissingTemplate),
    };

    Ok(LogCallInfo {
        call: *id,
        level: LogLevel::for_method(name),
        message_template,
        receiver: target.as_ref().clone(),
        exception,
        parameters,
    })
}

fn is_exception<O>(expr: &Expr, oracle: &O) -> bool
where
    O: TypeOracle + ?Sized,
{
    oracle
        .type_of(expr.id())
        .is_some_and(|ty| oracle.is_assignable_to(&ty, Capability::Exception))
}

fn type_name<O>(expr: &Expr, oracle: &O) -> String
where
    O: TypeOracle + ?Sized,
{
    oracle
        .type_of(expr.id())
        .map(|ty| ty.minimal_name())
        .unwrap_or_else(|| FALLBACK_TYPE_NAME.to_string())
}

fn zip_parameters<O>(placeholders: &[Placeholder], args: &[Expr], oracle: &O) -> Vec<ParameterInfo>
where
    O: TypeOracle + ?Sized,
{
    placeholders
        .iter()
        .zip(args)
        .map(|(placeholder, arg)| ParameterInfo {
            name: parameter_name(&placeholder.name),
            ty: type_name(arg, oracle),
            source_expr: arg.clone(),
        })
        .collect()
}

/// Rebuild a message template from an interpolated string: text is copied
/// (re-escaped so literal braces stay literal) and each hole becomes a named
/// placeholder bound to the hole's own expression.
fn interpolated_template<O>(
    parts: &[InterpolationPart],
    oracle: &O,
) -> (String, Vec<ParameterInfo>)
where
    O: TypeOracle + ?Sized,
{
    let mut message = String::new();
    let mut parameters = Vec::new();
    let mut hole_index = 0;

    for part in parts {
        match part {
            InterpolationPart::Text { text } => {
                message.push_str(&text.replace('{', "{{").replace('}', "}}"));
            }
            InterpolationPart::Hole { expr, format } => {
                let placeholder =
                    Placeholder::new(placeholder_for_hole(expr, hole_index), format.clone());
                message.push_str(&placeholder.to_string());
                parameters.push(ParameterInfo {
                    name: parameter_name(&placeholder.name),
                    ty: type_name(expr, oracle),
                    source_expr: expr.clone(),
                });
                hole_index += 1;
            }
        }
    }
    (message, parameters)
}
