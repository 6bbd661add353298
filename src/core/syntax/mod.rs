//! Program snapshot model.
//!
//! The rewrite engine never parses source text. A host exports each program as
//! a serde-serializable tree: documents contain type declarations, type
//! declarations contain members, method bodies contain statements and
//! expressions. Every expression and declaration carries a [`NodeId`] that is
//! unique within one [`Program`], so a call site found in one pass can be
//! located again in a cloned working tree.
//!
//! ## Module Structure
//!
//! - `visit`: read-only traversal (call sites with their enclosing type)
//! - `render`: deterministic C#-flavoured source printer

pub mod render;
pub mod visit;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::RewriteError;
use crate::core::oracle::TypeTable;

pub use render::{render_document, render_expr, render_method, string_literal};
pub use visit::{CallSite, ScopeKey, ScopePath, collect_call_sites};

/// Identity of a node within one program snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out ids for synthesized nodes, starting past the snapshot's maximum.
///
/// Ids never wrap: once `u32::MAX` has been handed out (or is already taken
/// by the snapshot) every further request fails.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    /// `None` when the id space is used up.
    next: Option<u32>,
}

impl IdAllocator {
    pub fn after(program: &Program) -> Self {
        Self {
            next: program
                .max_node_id()
                .map_or(Some(1), |id| id.0.checked_add(1)),
        }
    }

    pub fn next_id(&mut self) -> Result<NodeId, RewriteError> {
        let id = self.next.ok_or(RewriteError::IdSpaceExhausted)?;
        self.next = id.checked_add(1);
        Ok(NodeId(id))
    }
}

/// Source position of a call expression (1-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    pub col: usize,
}

/// A whole program: every document plus the type information for its nodes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default)]
    pub types: TypeTable,
}

impl Program {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Largest id used anywhere in the tree.
    pub fn max_node_id(&self) -> Option<NodeId> {
        let mut max = None;
        for doc in &self.documents {
            for ty in &doc.types {
                ty.max_id_into(&mut max);
            }
        }
        max
    }
}

/// One source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub path: String,
    #[serde(default)]
    pub usings: Vec<String>,
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl Document {
    /// Find a (possibly nested) type declaration by its name path.
    pub fn type_at(&self, path: &ScopePath) -> Option<&TypeDecl> {
        let (first, rest) = path.names().split_first()?;
        let mut current = self.types.iter().find(|ty| &ty.name == first)?;
        for name in rest {
            current = current.nested_type(name)?;
        }
        Some(current)
    }

    pub fn type_at_mut(&mut self, path: &ScopePath) -> Option<&mut TypeDecl> {
        let (first, rest) = path.names().split_first()?;
        let mut current = self.types.iter_mut().find(|ty| &ty.name == first)?;
        for name in rest {
            current = current.nested_type_mut(name)?;
        }
        Some(current)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    #[default]
    Class,
    Struct,
    Record,
    Interface,
}

impl TypeKind {
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Struct => "struct",
            TypeKind::Record => "record",
            TypeKind::Interface => "interface",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Private,
    Protected,
    Internal,
    Static,
    Partial,
    Sealed,
    Abstract,
    Readonly,
    Async,
    Virtual,
    Override,
}

impl Modifier {
    pub fn keyword(self) -> &'static str {
        match self {
            Modifier::Public => "public",
            Modifier::Private => "private",
            Modifier::Protected => "protected",
            Modifier::Internal => "internal",
            Modifier::Static => "static",
            Modifier::Partial => "partial",
            Modifier::Sealed => "sealed",
            Modifier::Abstract => "abstract",
            Modifier::Readonly => "readonly",
            Modifier::Async => "async",
            Modifier::Virtual => "virtual",
            Modifier::Override => "override",
        }
    }
}

/// A class, struct, record or interface declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeDecl {
    pub id: NodeId,
    #[serde(default)]
    pub kind: TypeKind,
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl TypeDecl {
    pub fn is_partial(&self) -> bool {
        self.modifiers.contains(&Modifier::Partial)
    }

    pub fn nested_type(&self, name: &str) -> Option<&TypeDecl> {
        self.members.iter().find_map(|member| match member {
            Member::Type(ty) if ty.name == name => Some(ty),
            _ => None,
        })
    }

    pub fn nested_type_mut(&mut self, name: &str) -> Option<&mut TypeDecl> {
        self.members.iter_mut().find_map(|member| match member {
            Member::Type(ty) if ty.name == name => Some(ty),
            _ => None,
        })
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.members
            .iter()
            .any(|member| matches!(member, Member::Method(method) if method.name == name))
    }

    fn max_id_into(&self, max: &mut Option<NodeId>) {
        bump(max, self.id);
        for member in &self.members {
            match member {
                Member::Field(field) => {
                    bump(max, field.id);
                    if let Some(init) = &field.initializer {
                        init.max_id_into(max);
                    }
                }
                Member::Method(method) => {
                    bump(max, method.id);
                    for stmt in method.body.iter().flatten() {
                        stmt.max_id_into(max);
                    }
                }
                Member::Type(ty) => ty.max_id_into(max),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "member", rename_all = "lowercase")]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Type(TypeDecl),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub id: NodeId,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
    #[serde(default)]
    pub initializer: Option<Expr>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDecl {
    pub id: NodeId,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    pub return_type: String,
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    /// `None` for declarations without a body (`partial`, `abstract`, interface members).
    #[serde(default)]
    pub body: Option<Vec<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    #[serde(rename = "type")]
    pub ty: String,
    pub name: String,
}

impl Param {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub args: Vec<AttributeArg>,
}

/// `Name = value` or a positional value; `value` is source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeArg {
    #[serde(default)]
    pub name: Option<String>,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stmt", rename_all = "lowercase")]
pub enum Stmt {
    Expr {
        expr: Expr,
    },
    Local {
        #[serde(default, rename = "type")]
        ty: Option<String>,
        name: String,
        #[serde(default)]
        init: Option<Expr>,
    },
    Return {
        #[serde(default)]
        value: Option<Expr>,
    },
    Block {
        body: Vec<Stmt>,
    },
    Try {
        body: Vec<Stmt>,
        #[serde(default)]
        catches: Vec<CatchClause>,
    },
    /// Opaque statement text the engine never looks into.
    Raw {
        text: String,
    },
}

impl Stmt {
    fn max_id_into(&self, max: &mut Option<NodeId>) {
        match self {
            Stmt::Expr { expr } => expr.max_id_into(max),
            Stmt::Local { init, .. } => {
                if let Some(init) = init {
                    init.max_id_into(max);
                }
            }
            Stmt::Return { value } => {
                if let Some(value) = value {
                    value.max_id_into(max);
                }
            }
            Stmt::Block { body } => body.iter().for_each(|stmt| stmt.max_id_into(max)),
            Stmt::Try { body, catches } => {
                body.iter().for_each(|stmt| stmt.max_id_into(max));
                for catch in catches {
                    catch.body.iter().for_each(|stmt| stmt.max_id_into(max));
                }
            }
            Stmt::Raw { .. } => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    #[serde(default, rename = "type")]
    pub ty: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "expr", rename_all = "lowercase")]
pub enum Expr {
    Ident {
        id: NodeId,
        name: String,
    },
    Member {
        id: NodeId,
        target: Box<Expr>,
        name: String,
    },
    Index {
        id: NodeId,
        target: Box<Expr>,
        index: Box<Expr>,
    },
    Call {
        id: NodeId,
        callee: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
        #[serde(default)]
        span: Option<Span>,
    },
    /// Regular string literal; `value` is the unescaped content.
    Str {
        id: NodeId,
        value: String,
    },
    Interpolated {
        id: NodeId,
        parts: Vec<InterpolationPart>,
    },
    /// Any other expression, kept as source text.
    Raw {
        id: NodeId,
        text: String,
    },
}

impl Expr {
    pub fn id(&self) -> NodeId {
        match self {
            Expr::Ident { id, .. }
            | Expr::Member { id, .. }
            | Expr::Index { id, .. }
            | Expr::Call { id, .. }
            | Expr::Str { id, .. }
            | Expr::Interpolated { id, .. }
            | Expr::Raw { id, .. } => *id,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Expr::Call { span, .. } => *span,
            _ => None,
        }
    }

    /// String literal or interpolated string: the only shapes that carry a message template.
    pub fn is_template_carrier(&self) -> bool {
        matches!(self, Expr::Str { .. } | Expr::Interpolated { .. })
    }

    /// Direct child expressions, in source order.
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Ident { .. } | Expr::Str { .. } | Expr::Raw { .. } => Vec::new(),
            Expr::Member { target, .. } => vec![target.as_ref()],
            Expr::Index { target, index, .. } => vec![target.as_ref(), index.as_ref()],
            Expr::Call { callee, args, .. } => {
                let mut children = vec![callee.as_ref()];
                children.extend(args.iter());
                children
            }
            Expr::Interpolated { parts, .. } => parts
                .iter()
                .filter_map(|part| match part {
                    InterpolationPart::Hole { expr, .. } => Some(expr),
                    InterpolationPart::Text { .. } => None,
                })
                .collect(),
        }
    }

    pub fn children_mut(&mut self) -> Vec<&mut Expr> {
        match self {
            Expr::Ident { .. } | Expr::Str { .. } | Expr::Raw { .. } => Vec::new(),
            Expr::Member { target, .. } => vec![target.as_mut()],
            Expr::Index { target, index, .. } => vec![target.as_mut(), index.as_mut()],
            Expr::Call { callee, args, .. } => {
                let mut children = vec![callee.as_mut()];
                children.extend(args.iter_mut());
                children
            }
            Expr::Interpolated { parts, .. } => parts
                .iter_mut()
                .filter_map(|part| match part {
                    InterpolationPart::Hole { expr, .. } => Some(expr),
                    InterpolationPart::Text { .. } => None,
                })
                .collect(),
        }
    }

    fn max_id_into(&self, max: &mut Option<NodeId>) {
        bump(max, self.id());
        for child in self.children() {
            child.max_id_into(max);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "part", rename_all = "lowercase")]
pub enum InterpolationPart {
    /// Literal text, unescaped (a `{{` in source is a single `{` here).
    Text { text: String },
    Hole {
        expr: Expr,
        #[serde(default)]
        format: Option<String>,
    },
}

fn bump(max: &mut Option<NodeId>, id: NodeId) {
    if max.is_none_or(|current| id > current) {
        *max = Some(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::*;

    #[test]
    fn test_id_allocator_starts_past_max() {
        let snapshot = program(vec![document("a.cs", vec![class(41, "A", vec![])])]);
        let mut ids = IdAllocator::after(&snapshot);
        assert_eq!(ids.next_id(), Ok(NodeId(42)));
        assert_eq!(ids.next_id(), Ok(NodeId(43)));
        assert_eq!(IdAllocator::after(&Program::default()).next_id(), Ok(NodeId(1)));
    }

    #[test]
    fn test_id_allocator_never_wraps() {
        let snapshot = program(vec![document("a.cs", vec![class(u32::MAX, "A", vec![])])]);
        let mut ids = IdAllocator::after(&snapshot);
        assert_eq!(ids.next_id(), Err(RewriteError::IdSpaceExhausted));

        let snapshot = program(vec![document("a.cs", vec![class(u32::MAX - 1, "A", vec![])])]);
        let mut ids = IdAllocator::after(&snapshot);
        assert_eq!(ids.next_id(), Ok(NodeId(u32::MAX)));
        assert_eq!(ids.next_id(), Err(RewriteError::IdSpaceExhausted));
    }
}
