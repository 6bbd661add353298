//! Scope mutation primitives.
//!
//! These are the only functions that change a tree. They operate on a working
//! copy owned by the batch engine; the snapshot the caller passed in is never
//! touched.

use std::collections::HashMap;

use crate::core::error::RewriteError;
use crate::core::syntax::{
    Document, Expr, IdAllocator, Member, MethodDecl, Modifier, NodeId, Stmt, TypeDecl, TypeKind,
};

/// Replace every call listed in `replacements` in a single pass over
/// `document`. Replacements are consumed as they are applied; a call still
/// left in the map afterwards was not found and fails the whole pass.
///
/// The pass descends into each replacement, so a log call nested inside the
/// arguments of another replaced call is rewritten as well.
pub fn replace_calls(
    document_index: usize,
    document: &mut Document,
    mut replacements: HashMap<NodeId, Expr>,
) -> Result<(), RewriteError> {
    for ty in &mut document.types {
        replace_in_type(ty, &mut replacements);
    }

    match replacements.keys().min() {
        Some(&call) => Err(RewriteError::CallNotFound {
            document: document_index,
            call,
        }),
        None => Ok(()),
    }
}

fn replace_in_type(ty: &mut TypeDecl, replacements: &mut HashMap<NodeId, Expr>) {
    for member in &mut ty.members {
        if replacements.is_empty() {
            return;
        }
        match member {
            Member::Field(field) => {
                if let Some(init) = &mut field.initializer {
                    replace_in_expr(init, replacements);
                }
            }
            Member::Method(method) => {
                for stmt in method.body.iter_mut().flatten() {
                    replace_in_stmt(stmt, replacements);
                }
            }
            Member::Type(nested) => replace_in_type(nested, replacements),
        }
    }
}

fn replace_in_stmt(stmt: &mut Stmt, replacements: &mut HashMap<NodeId, Expr>) {
    match stmt {
        Stmt::Expr { expr } => replace_in_expr(expr, replacements),
        Stmt::Local { init, .. } => {
            if let Some(init) = init {
                replace_in_expr(init, replacements);
            }
        }
        Stmt::Return { value } => {
            if let Some(value) = value {
                replace_in_expr(value, replacements);
            }
        }
        Stmt::Block { body } => {
            for stmt in body {
                replace_in_stmt(stmt, replacements);
            }
        }
        Stmt::Try { body, catches } => {
            for stmt in body {
                replace_in_stmt(stmt, replacements);
            }
            for catch in catches {
                for stmt in &mut catch.body {
                    replace_in_stmt(stmt, replacements);
                }
            }
        }
        Stmt::Raw { .. } => {}
    }
}

fn replace_in_expr(expr: &mut Expr, replacements: &mut HashMap<NodeId, Expr>) {
    if matches!(expr, Expr::Call { .. }) {
        if let Some(replacement) = replacements.remove(&expr.id()) {
            *expr = replacement;
        }
    }
    for child in expr.children_mut() {
        replace_in_expr(child, replacements);
    }
}

/// Mark `ty` as `partial`. Returns whether the modifier was added.
pub fn ensure_partial(ty: &mut TypeDecl) -> bool {
    if ty.is_partial() {
        return false;
    }
    ty.modifiers.push(Modifier::Partial);
    true
}

/// Append `method` unless a method with the same name already exists.
/// Returns whether it was inserted.
pub fn insert_method_if_absent(ty: &mut TypeDecl, method: MethodDecl) -> bool {
    if ty.has_method(&method.name) {
        return false;
    }
    ty.members.push(Member::Method(method));
    true
}

/// The nested container `name` of `ty`, created as a
/// `private static partial class` when absent. An existing container is made
/// `partial` if it is not already. Fails only when a new container needs an
/// id and none is left.
pub fn ensure_container<'a>(
    ty: &'a mut TypeDecl,
    name: &str,
    ids: &mut IdAllocator,
) -> Result<&'a mut TypeDecl, RewriteError> {
    let position = ty
        .members
        .iter()
        .position(|member| matches!(member, Member::Type(nested) if nested.name == name));

    let position = match position {
        Some(position) => position,
        None => {
            ty.members.push(Member::Type(TypeDecl {
                id: ids.next_id()?,
                kind: TypeKind::Class,
                name: name.to_string(),
                modifiers: vec![Modifier::Private, Modifier::Static, Modifier::Partial],
                members: Vec::new(),
            }));
            ty.members.len() - 1
        }
    };

    match &mut ty.members[position] {
        Member::Type(container) => {
            ensure_partial(container);
            Ok(container)
        }
        _ => unreachable!("position was found or pushed as Member::Type"),
    }
}

/// Add `using <namespace>;` to `document` if missing. Returns whether it was added.
pub fn ensure_using(document: &mut Document, namespace: &str) -> bool {
    if document.usings.iter().any(|using| using == namespace) {
        return false;
    }
    document.usings.push(namespace.to_string());
    true
}
