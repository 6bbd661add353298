//! Snapshot builders shared by unit tests.

use crate::core::oracle::TypeTable;
use crate::core::syntax::{
    Document, Expr, FieldDecl, InterpolationPart, Member, MethodDecl, Modifier, NodeId, Program,
    Span, Stmt, TypeDecl, TypeKind,
};

pub const LOGGER_OF_USER_SERVICE: &str = "Microsoft.Extensions.Logging.ILogger<Demo.UserService>";
pub const LOGGER_EXTENSIONS: &str = "Microsoft.Extensions.Logging.LoggerExtensions";

/// Offset for callee ids synthesized by [`log_call`].
const CALLEE_ID_OFFSET: u32 = 100_000;

pub fn program(documents: Vec<Document>) -> Program {
    Program {
        documents,
        types: TypeTable::default(),
    }
}

/// Document in namespace `Demo` without usings.
pub fn document(path: &str, types: Vec<TypeDecl>) -> Document {
    Document {
        path: path.to_string(),
        usings: Vec::new(),
        namespace: Some("Demo".to_string()),
        types,
    }
}

/// `public class <name>`.
pub fn class(id: u32, name: &str, members: Vec<Member>) -> TypeDecl {
    TypeDecl {
        id: NodeId(id),
        kind: TypeKind::Class,
        name: name.to_string(),
        modifiers: vec![Modifier::Public],
        members,
    }
}

/// `public void <name>()` with `body`.
pub fn method(id: u32, name: &str, body: Vec<Stmt>) -> Member {
    Member::Method(MethodDecl {
        id: NodeId(id),
        attributes: Vec::new(),
        modifiers: vec![Modifier::Public],
        return_type: "void".to_string(),
        name: name.to_string(),
        params: Vec::new(),
        body: Some(body),
    })
}

/// `private readonly <ty> <name>;`.
pub fn field(id: u32, ty: &str, name: &str) -> Member {
    Member::Field(FieldDecl {
        id: NodeId(id),
        modifiers: vec![Modifier::Private, Modifier::Readonly],
        ty: ty.to_string(),
        name: name.to_string(),
        initializer: None,
    })
}

pub fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr { expr }
}

/// `receiver.method(args)`; the callee gets id `id + 100_000` and the call a
/// span on line `id`.
pub fn log_call(id: u32, receiver: Expr, method: &str, args: Vec<Expr>) -> Expr {
    Expr::Call {
        id: NodeId(id),
        callee: Box::new(member(id + CALLEE_ID_OFFSET, receiver, method)),
        args,
        span: Some(Span {
            line: id as usize,
            col: 13,
        }),
    }
}

pub fn call(id: u32, callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call {
        id: NodeId(id),
        callee: Box::new(callee),
        args,
        span: None,
    }
}

pub fn ident(id: u32, name: &str) -> Expr {
    Expr::Ident {
        id: NodeId(id),
        name: name.to_string(),
    }
}

pub fn member(id: u32, target: Expr, name: &str) -> Expr {
    Expr::Member {
        id: NodeId(id),
        target: Box::new(target),
        name: name.to_string(),
    }
}

pub fn index(id: u32, target: Expr, index: Expr) -> Expr {
    Expr::Index {
        id: NodeId(id),
        target: Box::new(target),
        index: Box::new(index),
    }
}

pub fn str_lit(id: u32, value: &str) -> Expr {
    Expr::Str {
        id: NodeId(id),
        value: value.to_string(),
    }
}

pub fn raw(id: u32, text: &str) -> Expr {
    Expr::Raw {
        id: NodeId(id),
        text: text.to_string(),
    }
}

pub fn interpolated(id: u32, parts: Vec<InterpolationPart>) -> Expr {
    Expr::Interpolated {
        id: NodeId(id),
        parts,
    }
}

pub fn text(text: &str) -> InterpolationPart {
    InterpolationPart::Text {
        text: text.to_string(),
    }
}

pub fn hole(expr: Expr, format: Option<&str>) -> InterpolationPart {
    InterpolationPart::Hole {
        expr,
        format: format.map(str::to_string),
    }
}

/// The logging interfaces and a small exception hierarchy.
pub fn logging_types() -> TypeTable {
    let mut table = TypeTable::default();
    table
        .declare("Microsoft.Extensions.Logging.ILogger", None, &[])
        .declare(
            "Microsoft.Extensions.Logging.ILogger<TCategoryName>",
            None,
            &["Microsoft.Extensions.Logging.ILogger"],
        )
        .declare(
            LOGGER_OF_USER_SERVICE,
            None,
            &["Microsoft.Extensions.Logging.ILogger"],
        )
        .declare(LOGGER_EXTENSIONS, Some("System.Object"), &[])
        .declare("System.Exception", Some("System.Object"), &[])
        .declare("System.SystemException", Some("System.Exception"), &[])
        .declare(
            "System.InvalidOperationException",
            Some("System.SystemException"),
            &[],
        );
    table
}

/// A `UserService` class with a logger field and one method per statement
/// list in `bodies` (`M0`, `M1`, ...). Ids: class 1, field 2, methods 3...
pub fn user_service(bodies: Vec<Vec<Stmt>>) -> TypeDecl {
    let mut members = vec![field(2, "ILogger<UserService>", "_logger")];
    for (i, body) in bodies.into_iter().enumerate() {
        members.push(method(3 + i as u32, &format!("M{}", i), body));
    }
    class(1, "UserService", members)
}

/// `_logger.<method>("<template>", args...)` on a logger of
/// `Demo.UserService`, registered in `table`.
///
/// Ids: call `id`, receiver `id + 1`, template `id + 2`. Arguments keep
/// their own ids.
pub fn bound_log_call(
    table: &mut TypeTable,
    id: u32,
    method: &str,
    template: &str,
    args: Vec<Expr>,
) -> Stmt {
    table
        .set_type(NodeId(id + 1), LOGGER_OF_USER_SERVICE)
        .bind_method(NodeId(id), LOGGER_EXTENSIONS, method);
    let mut all_args = vec![str_lit(id + 2, template)];
    all_args.extend(args);
    expr_stmt(log_call(id, ident(id + 1, "_logger"), method, all_args))
}
