//! Identifier synthesis for generated methods, parameters and placeholders.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::syntax::{Expr, render_expr};

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\{[^}]*\}").unwrap());

/// Name used when a template has no words left after removing its placeholders.
pub const FALLBACK_METHOD_NAME: &str = "Message";

/// Prefix of instance-style generated methods.
pub const INSTANCE_METHOD_PREFIX: &str = "Log";

/// `UserId` -> `userId`. Only the first character changes.
pub fn parameter_name(placeholder: &str) -> String {
    let mut chars = placeholder.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `"User {UserId} logged in"` -> `UserLoggedIn`.
///
/// Placeholders are dropped, the rest is split on runs of non-alphanumeric
/// characters and each word is title-cased. A name that would start with a
/// digit is prefixed with `Message` (`"404 not found"` -> `Message404NotFound`),
/// and a template with no words at all yields `Message`.
pub fn method_name(template: &str) -> String {
    let stripped = PLACEHOLDER_REGEX.replace_all(template, " ");
    let name: String = stripped
        .split(|c: char| !c.is_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(title_case)
        .collect();

    if name.is_empty() {
        FALLBACK_METHOD_NAME.to_string()
    } else if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{}{}", FALLBACK_METHOD_NAME, name)
    } else {
        name
    }
}

/// `"User {UserId} logged in"` -> `LogUserLoggedIn`.
pub fn prefixed_method_name(template: &str) -> String {
    format!("{}{}", INSTANCE_METHOD_PREFIX, method_name(template))
}

/// Placeholder name for the `index`-th hole of an interpolated string.
///
/// - member access chains concatenate their title-cased segments: `user.Id` -> `UserId`
/// - element access keeps the index inline: `items[0]` -> `Items0`
/// - anything else keeps only its alphanumeric characters: `a + b` -> `Ab`
/// - when nothing usable is left, or what is left starts with a digit
///   (`42` -> `Value0`), the name is `Value{index}`
pub fn placeholder_for_hole(expr: &Expr, index: usize) -> String {
    let name = match member_chain_segments(expr) {
        Some(segments) => segments
            .iter()
            .map(|segment| capitalize(&alphanumeric(segment)))
            .collect(),
        None => capitalize(&alphanumeric(&render_expr(expr))),
    };

    if name.starts_with(|c: char| c.is_alphabetic() || c == '_') {
        name
    } else {
        format!("Value{}", index)
    }
}

/// `a.b[0].c` -> `["a", "b[0]", "c"]`; `None` when the expression is not a
/// pure chain of names, member accesses and element accesses.
fn member_chain_segments(expr: &Expr) -> Option<Vec<String>> {
    match expr {
        Expr::Ident { name, .. } => Some(vec![name.clone()]),
        Expr::Member { target, name, .. } => {
            let mut segments = member_chain_segments(target)?;
            segments.push(name.clone());
            Some(segments)
        }
        Expr::Index { target, index, .. } => {
            let mut segments = member_chain_segments(target)?;
            let last = segments.last_mut()?;
            last.push('[');
            last.push_str(&render_expr(index));
            last.push(']');
            Some(segments)
        }
        _ => None,
    }
}

fn alphanumeric(text: &str) -> String {
    text.chars().filter(|c| c.is_alphanumeric()).collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
