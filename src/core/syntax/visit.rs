use std::fmt;

use super::{Document, Expr, Member, NodeId, Span, Stmt, TypeDecl};

/// Names of the enclosing types, outermost first (`["Outer", "Inner"]`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct ScopePath(Vec<String>);

impl ScopePath {
    pub fn new(names: Vec<String>) -> Self {
        Self(names)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn child(&self, name: &str) -> Self {
        let mut names = self.0.clone();
        names.push(name.to_string());
        Self(names)
    }

    /// Fully qualified name, e.g. `Demo.Services.UserService.Inner`.
    pub fn qualified_name(&self, namespace: Option<&str>) -> String {
        let path = self.0.join(".");
        match namespace {
            Some(ns) if !ns.is_empty() => format!("{}.{}", ns, path),
            _ => path,
        }
    }
}

impl fmt::Display for ScopePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("."))
    }
}

/// Identity of a type-like scope within a program: the document holding the
/// declaration plus the type's name path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeKey {
    pub document: usize,
    pub path: ScopePath,
}

/// One candidate call expression, borrowed from the snapshot it was found in.
#[derive(Debug, Clone)]
pub struct CallSite<'a> {
    pub document: usize,
    pub expr: &'a Expr,
    /// Innermost enclosing type; empty when the call sits outside any type.
    pub scope: ScopePath,
}

impl<'a> CallSite<'a> {
    pub fn id(&self) -> NodeId {
        self.expr.id()
    }

    pub fn span(&self) -> Option<Span> {
        self.expr.span()
    }

    /// `receiver` in `receiver.Method(...)`.
    pub fn receiver(&self) -> Option<&'a Expr> {
        match self.expr {
            Expr::Call { callee, .. } => match callee.as_ref() {
                Expr::Member { target, .. } => Some(target.as_ref()),
                _ => None,
            },
            _ => None,
        }
    }

    /// `Method` in `receiver.Method(...)`, or the bare name of `Method(...)`.
    pub fn method_name(&self) -> Option<&'a str> {
        match self.expr {
            Expr::Call { callee, .. } => match callee.as_ref() {
                Expr::Member { name, .. } | Expr::Ident { name, .. } => Some(name.as_str()),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn scope_key(&self) -> Option<ScopeKey> {
        if self.scope.is_empty() {
            return None;
        }
        Some(ScopeKey {
            document: self.document,
            path: self.scope.clone(),
        })
    }
}

/// Every call expression in `document`, in source order, including calls
/// nested inside other calls' arguments.
pub fn collect_call_sites(document_index: usize, document: &Document) -> Vec<CallSite<'_>> {
    let mut collector = CallCollector {
        document: document_index,
        sites: Vec::new(),
    };
    for ty in &document.types {
        collector.visit_type(ty, &ScopePath::default());
    }
    collector.sites
}

struct CallCollector<'a> {
    document: usize,
    sites: Vec<CallSite<'a>>,
}

impl<'a> CallCollector<'a> {
    fn visit_type(&mut self, ty: &'a TypeDecl, outer: &ScopePath) {
        let scope = outer.child(&ty.name);
        for member in &ty.members {
            match member {
                Member::Field(field) => {
                    if let Some(init) = &field.initializer {
                        self.visit_expr(init, &scope);
                    }
                }
                Member::Method(method) => {
                    for stmt in method.body.iter().flatten() {
                        self.visit_stmt(stmt, &scope);
                    }
                }
                Member::Type(nested) => self.visit_type(nested, &scope),
            }
        }
    }

    fn visit_stmt(&mut self, stmt: &'a Stmt, scope: &ScopePath) {
        match stmt {
            Stmt::Expr { expr } => self.visit_expr(expr, scope),
            Stmt::Local { init, .. } => {
                if let Some(init) = init {
                    self.visit_expr(init, scope);
                }
            }
            Stmt::Return { value } => {
                if let Some(value) = value {
                    self.visit_expr(value, scope);
                }
            }
            Stmt::Block { body } => body.iter().for_each(|stmt| self.visit_stmt(stmt, scope)),
            Stmt::Try { body, catches } => {
                body.iter().for_each(|stmt| self.visit_stmt(stmt, scope));
                for catch in catches {
                    catch
                        .body
                        .iter()
                        .for_each(|stmt| self.visit_stmt(stmt, scope));
                }
            }
            Stmt::Raw { .. } => {}
        }
    }

    fn visit_expr(&mut self, expr: &'a Expr, scope: &ScopePath) {
        if matches!(expr, Expr::Call { .. }) {
            self.sites.push(CallSite {
                document: self.document,
                expr,
                scope: scope.clone(),
            });
        }
        for child in expr.children() {
            self.visit_expr(child, scope);
        }
    }
}
