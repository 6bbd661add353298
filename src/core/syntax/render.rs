//! Source printer for program snapshots.
//!
//! Output is deterministic: four-space indentation, one blank line between
//! members, attributes on their own line, `using` directives first. Previews,
//! report snippets and snapshot comparisons all go through this printer.

use std::fmt::Write as _;

use super::{
    Attribute, CatchClause, Document, Expr, FieldDecl, InterpolationPart, Member, MethodDecl,
    Modifier, Stmt, TypeDecl,
};

const INDENT: &str = "    ";

pub fn render_document(document: &Document) -> String {
    let mut out = String::new();
    for using in &document.usings {
        let _ = writeln!(out, "using {};", using);
    }

    let base = match &document.namespace {
        Some(ns) => {
            if !document.usings.is_empty() {
                out.push('\n');
            }
            let _ = writeln!(out, "namespace {}", ns);
            out.push_str("{\n");
            1
        }
        None => 0,
    };

    for (i, ty) in document.types.iter().enumerate() {
        if i > 0 || (base == 0 && !document.usings.is_empty()) {
            out.push('\n');
        }
        render_type(&mut out, ty, base);
    }

    if document.namespace.is_some() {
        out.push_str("}\n");
    }
    out
}

pub fn render_expr(expr: &Expr) -> String {
    let mut out = String::new();
    write_expr(&mut out, expr);
    out
}

/// A single method declaration at top level, attributes included.
pub fn render_method(method: &MethodDecl) -> String {
    let mut out = String::new();
    render_method_at(&mut out, method, 0);
    out
}

/// Quote `value` as a regular string literal.
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    push_escaped(&mut out, value, false);
    out.push('"');
    out
}

fn push_escaped(out: &mut String, value: &str, in_interpolation: bool) {
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '{' if in_interpolation => out.push_str("{{"),
            '}' if in_interpolation => out.push_str("}}"),
            c => out.push(c),
        }
    }
}

fn indent(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str(INDENT);
    }
}

fn push_modifiers(out: &mut String, modifiers: &[Modifier]) {
    for modifier in modifiers {
        out.push_str(modifier.keyword());
        out.push(' ');
    }
}

fn render_type(out: &mut String, ty: &TypeDecl, level: usize) {
    indent(out, level);
    push_modifiers(out, &ty.modifiers);
    let _ = writeln!(out, "{} {}", ty.kind.keyword(), ty.name);
    indent(out, level);
    out.push_str("{\n");
    for (i, member) in ty.members.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        match member {
            Member::Field(field) => render_field(out, field, level + 1),
            Member::Method(method) => render_method_at(out, method, level + 1),
            Member::Type(nested) => render_type(out, nested, level + 1),
        }
    }
    indent(out, level);
    out.push_str("}\n");
}

fn render_field(out: &mut String, field: &FieldDecl, level: usize) {
    indent(out, level);
    push_modifiers(out, &field.modifiers);
    let _ = write!(out, "{} {}", field.ty, field.name);
    if let Some(init) = &field.initializer {
        out.push_str(" = ");
        write_expr(out, init);
    }
    out.push_str(";\n");
}

fn render_attribute(out: &mut String, attribute: &Attribute, level: usize) {
    indent(out, level);
    out.push('[');
    out.push_str(&attribute.name);
    if !attribute.args.is_empty() {
        let args: Vec<String> = attribute
            .args
            .iter()
            .map(|arg| match &arg.name {
                Some(name) => format!("{} = {}", name, arg.value),
                None => arg.value.clone(),
            })
            .collect();
        let _ = write!(out, "({})", args.join(", "));
    }
    out.push_str("]\n");
}

fn render_method_at(out: &mut String, method: &MethodDecl, level: usize) {
    for attribute in &method.attributes {
        render_attribute(out, attribute, level);
    }
    indent(out, level);
    push_modifiers(out, &method.modifiers);
    let params: Vec<String> = method
        .params
        .iter()
        .map(|param| format!("{} {}", param.ty, param.name))
        .collect();
    let _ = write!(
        out,
        "{} {}({})",
        method.return_type,
        method.name,
        params.join(", ")
    );
    match &method.body {
        None => out.push_str(";\n"),
        Some(body) => {
            out.push('\n');
            render_block(out, body, level);
        }
    }
}

fn render_block(out: &mut String, body: &[Stmt], level: usize) {
    indent(out, level);
    out.push_str("{\n");
    for stmt in body {
        render_stmt(out, stmt, level + 1);
    }
    indent(out, level);
    out.push_str("}\n");
}

fn render_stmt(out: &mut String, stmt: &Stmt, level: usize) {
    match stmt {
        Stmt::Expr { expr } => {
            indent(out, level);
            write_expr(out, expr);
            out.push_str(";\n");
        }
        Stmt::Local { ty, name, init } => {
            indent(out, level);
            let _ = write!(out, "{} {}", ty.as_deref().unwrap_or("var"), name);
            if let Some(init) = init {
                out.push_str(" = ");
                write_expr(out, init);
            }
            out.push_str(";\n");
        }
        Stmt::Return { value } => {
            indent(out, level);
            match value {
                Some(value) => {
                    out.push_str("return ");
                    write_expr(out, value);
                    out.push_str(";\n");
                }
                None => out.push_str("return;\n"),
            }
        }
        Stmt::Block { body } => render_block(out, body, level),
        Stmt::Try { body, catches } => {
            indent(out, level);
            out.push_str("try\n");
            render_block(out, body, level);
            for catch in catches {
                render_catch(out, catch, level);
            }
        }
        Stmt::Raw { text } => {
            indent(out, level);
            out.push_str(text);
            out.push('\n');
        }
    }
}

fn render_catch(out: &mut String, catch: &CatchClause, level: usize) {
    indent(out, level);
    out.push_str("catch");
    match (&catch.ty, &catch.name) {
        (Some(ty), Some(name)) => {
            let _ = write!(out, " ({} {})", ty, name);
        }
        (Some(ty), None) => {
            let _ = write!(out, " ({})", ty);
        }
        _ => {}
    }
    out.push('\n');
    render_block(out, &catch.body, level);
}

fn write_expr(out: &mut String, expr: &Expr) {
    match expr {
        Expr::Ident { name, .. } => out.push_str(name),
        Expr::Member { target, name, .. } => {
            write_expr(out, target);
            out.push('.');
            out.push_str(name);
        }
        Expr::Index { target, index, .. } => {
            write_expr(out, target);
            out.push('[');
            write_expr(out, index);
            out.push(']');
        }
        Expr::Call { callee, args, .. } => {
            write_expr(out, callee);
            out.push('(');
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_expr(out, arg);
            }
            out.push(')');
        }
        Expr::Str { value, .. } => out.push_str(&string_literal(value)),
        Expr::Interpolated { parts, .. } => {
            out.push_str("$\"");
            for part in parts {
                match part {
                    InterpolationPart::Text { text } => push_escaped(out, text, true),
                    InterpolationPart::Hole { expr, format } => {
                        out.push('{');
                        write_expr(out, expr);
                        if let Some(format) = format {
                            out.push(':');
                            out.push_str(format);
                        }
                        out.push('}');
                    }
                }
            }
            out.push('"');
        }
        Expr::Raw { text, .. } => out.push_str(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_render_document_with_namespace_and_usings() {
        let mut doc = document(
            "src/UserService.cs",
            vec![class(
                1,
                "UserService",
                vec![
                    field(2, "ILogger<UserService>", "_logger"),
                    method(
                        3,
                        "Login",
                        vec![expr_stmt(log_call(
                            10,
                            ident(11, "_logger"),
                            "LogInformation",
                            vec![
                                str_lit(12, "User {UserId} logged in"),
                                member(13, ident(14, "user"), "Id"),
                            ],
                        ))],
                    ),
                ],
            )],
        );
        doc.usings.push("Microsoft.Extensions.Logging".to_string());

        let expected = r#"using Microsoft.Extensions.Logging;

namespace Demo
{
    public class UserService
    {
        private readonly ILogger<UserService> _logger;

        public void Login()
        {
            _logger.LogInformation("User {UserId} logged in", user.Id);
        }
    }
}
"#;
        assert_eq!(render_document(&doc), expected);
    }

    #[test]
    fn test_render_try_catch_and_partial_method() {
        let mut doc = document(
            "a.cs",
            vec![class(
                1,
                "A",
                vec![method(
                    2,
                    "M",
                    vec![Stmt::Try {
                        body: vec![Stmt::Raw {
                            text: "Run();".to_string(),
                        }],
                        catches: vec![CatchClause {
                            ty: Some("Exception".to_string()),
                            name: Some("ex".to_string()),
                            body: vec![],
                        }],
                    }],
                )],
            )],
        );
        doc.namespace = None;

        let expected = "public class A\n{\n    public void M()\n    {\n        try\n        {\n            Run();\n        }\n        catch (Exception ex)\n        {\n        }\n    }\n}\n";
        assert_eq!(render_document(&doc), expected);
    }

    #[test]
    fn test_render_interpolated_escapes_braces_and_keeps_format() {
        let expr = interpolated(
            1,
            vec![
                text("Took {ms} "),
                hole(ident(2, "elapsed"), Some("N2")),
                text(" \"ok\""),
            ],
        );
        assert_eq!(
            render_expr(&expr),
            r#"$"Took {{ms}} {elapsed:N2} \"ok\"""#
        );
    }

    #[test]
    fn test_string_literal_escapes() {
        assert_eq!(string_literal("a \"b\"\n"), r#""a \"b\"\n""#);
        assert_eq!(string_literal("{X}"), "\"{X}\"");
    }
}
