//! Message template parsing.
//!
//! A message template is free text with named holes: `"User {UserId} took {Elapsed:N2} ms"`.
//! Doubled braces (`{{`, `}}`) are escapes, never holes.

use std::fmt;

/// One named hole in a message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub name: String,
    /// Everything between the first `:` and the closing `}`, kept verbatim.
    pub format: Option<String>,
}

impl Placeholder {
    pub fn new(name: impl Into<String>, format: Option<String>) -> Self {
        Self {
            name: name.into(),
            format,
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.format {
            Some(format) => write!(f, "{{{}:{}}}", self.name, format),
            None => write!(f, "{{{}}}", self.name),
        }
    }
}

/// A template split into literal text and placeholders, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSegment {
    /// Literal text exactly as written, escapes included.
    Text(String),
    Placeholder(Placeholder),
}

/// Split a template into text and placeholder segments. Never fails; text
/// that does not form a valid placeholder stays literal.
pub fn parse_segments(template: &str) -> Vec<TemplateSegment> {
    let bytes = template.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'{' if bytes.get(i + 1) == Some(&b'{') => i += 2,
            b'}' if bytes.get(i + 1) == Some(&b'}') => i += 2,
            b'{' => {
                let rest = &template[i + 1..];
                let Some(rel) = rest.find(['{', '}']) else {
                    break;
                };
                if rest.as_bytes()[rel] == b'{' {
                    // `{a{b}`: the outer brace is literal, rescan from the inner one.
                    i += 1 + rel;
                    continue;
                }

                let inner = &rest[..rel];
                let (name, format) = match inner.split_once(':') {
                    Some((name, format)) => (name, Some(format.to_string())),
                    None => (inner, None),
                };
                if name.is_empty() {
                    i += 1;
                    continue;
                }

                if text_start < i {
                    segments.push(TemplateSegment::Text(template[text_start..i].to_string()));
                }
                segments.push(TemplateSegment::Placeholder(Placeholder::new(name, format)));
                i += rel + 2;
                text_start = i;
            }
            _ => i += 1,
        }
    }

    if text_start < template.len() {
        segments.push(TemplateSegment::Text(template[text_start..].to_string()));
    }
    segments
}

/// Placeholders of a template in order of appearance. A name used twice
/// appears twice.
pub fn parse(template: &str) -> Vec<Placeholder> {
    parse_segments(template)
        .into_iter()
        .filter_map(|segment| match segment {
            TemplateSegment::Placeholder(placeholder) => Some(placeholder),
            TemplateSegment::Text(_) => None,
        })
        .collect()
}

/// Inverse of [`parse_segments`].
pub fn render_segments(segments: &[TemplateSegment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            TemplateSegment::Text(text) => text.clone(),
            TemplateSegment::Placeholder(placeholder) => placeholder.to_string(),
        })
        .collect()
}
