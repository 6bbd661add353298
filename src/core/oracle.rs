//! Type oracle: the engine's only window into semantic information.
//!
//! The engine asks three questions: what is the static type of this
//! expression, which method does this call bind to, and is this type
//! assignable to a well-known capability (the logging interface, the exception
//! base type). [`TypeTable`] answers them from data exported by the host
//! alongside the syntax tree.

use std::collections::{BTreeMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::syntax::NodeId;

/// A fully qualified type name, e.g. `Microsoft.Extensions.Logging.ILogger<Demo.UserService>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(String);

/// Keyword aliases for well-known `System` types.
const KEYWORD_ALIASES: &[(&str, &str)] = &[
    ("System.Boolean", "bool"),
    ("System.Byte", "byte"),
    ("System.SByte", "sbyte"),
    ("System.Char", "char"),
    ("System.Decimal", "decimal"),
    ("System.Double", "double"),
    ("System.Single", "float"),
    ("System.Int16", "short"),
    ("System.Int32", "int"),
    ("System.Int64", "long"),
    ("System.UInt16", "ushort"),
    ("System.UInt32", "uint"),
    ("System.UInt64", "ulong"),
    ("System.Object", "object"),
    ("System.String", "string"),
];

/// Type used for a parameter whose argument type cannot be resolved.
pub const FALLBACK_TYPE_NAME: &str = "object";

impl TypeRef {
    pub fn new(full_name: impl Into<String>) -> Self {
        Self(full_name.into())
    }

    pub fn full_name(&self) -> &str {
        &self.0
    }

    /// Qualified name without generic arguments or array/nullable suffix.
    pub fn definition_name(&self) -> &str {
        split_type_name(&self.0).head
    }

    /// `ILogger` for `Microsoft.Extensions.Logging.ILogger<Demo.UserService>`.
    pub fn simple_name(&self) -> &str {
        let head = self.definition_name();
        head.rsplit_once('.').map_or(head, |(_, name)| name)
    }

    /// `Microsoft.Extensions.Logging` for `Microsoft.Extensions.Logging.ILogger<T>`.
    pub fn namespace(&self) -> Option<&str> {
        self.definition_name().rsplit_once('.').map(|(ns, _)| ns)
    }

    /// The shortest spelling that reads naturally in generated code:
    /// namespaces dropped (also inside generic arguments) and well-known
    /// primitives written as keywords.
    pub fn minimal_name(&self) -> String {
        minimal_name(&self.0)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

struct TypeNameParts<'a> {
    head: &'a str,
    args: Vec<&'a str>,
    suffix: &'a str,
}

fn split_type_name(name: &str) -> TypeNameParts<'_> {
    let name = name.trim();
    let Some(open) = name.find('<') else {
        let end = name.find(['[', '?']).unwrap_or(name.len());
        return TypeNameParts {
            head: &name[..end],
            args: Vec::new(),
            suffix: &name[end..],
        };
    };

    let mut depth = 0usize;
    let mut start = open + 1;
    let mut args = Vec::new();
    for (offset, c) in name[open..].char_indices() {
        let i = open + offset;
        match c {
            '<' => depth += 1,
            '>' => {
                depth -= 1;
                if depth == 0 {
                    args.push(name[start..i].trim());
                    return TypeNameParts {
                        head: &name[..open],
                        args,
                        suffix: &name[i + 1..],
                    };
                }
            }
            ',' if depth == 1 => {
                args.push(name[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }

    // Unbalanced brackets: treat the whole text as an opaque name.
    TypeNameParts {
        head: name,
        args: Vec::new(),
        suffix: "",
    }
}

fn minimal_name(name: &str) -> String {
    let parts = split_type_name(name);
    if parts.args.is_empty() {
        if let Some((_, keyword)) = KEYWORD_ALIASES.iter().find(|(full, _)| *full == parts.head) {
            return format!("{}{}", keyword, parts.suffix);
        }
    }

    let simple = parts
        .head
        .rsplit_once('.')
        .map_or(parts.head, |(_, simple)| simple);
    if parts.args.is_empty() {
        format!("{}{}", simple, parts.suffix)
    } else {
        let args: Vec<String> = parts.args.iter().map(|arg| minimal_name(arg)).collect();
        format!("{}<{}>{}", simple, args.join(", "), parts.suffix)
    }
}

/// Well-known capabilities the engine needs to recognize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// The logging interface log calls are made on.
    Logger,
    /// The base type of every exception.
    Exception,
}

/// How a capability is recognized: simple name plus declaring namespace.
/// Generic arguments are ignored, so `ILogger<T>` matches `ILogger`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapabilityId {
    pub simple_name: &'static str,
    pub namespace: &'static str,
}

impl Capability {
    pub fn id(self) -> CapabilityId {
        match self {
            Capability::Logger => CapabilityId {
                simple_name: "ILogger",
                namespace: "Microsoft.Extensions.Logging",
            },
            Capability::Exception => CapabilityId {
                simple_name: "Exception",
                namespace: "System",
            },
        }
    }

    fn matches(self, ty: &TypeRef) -> bool {
        let id = self.id();
        ty.simple_name() == id.simple_name && ty.namespace() == Some(id.namespace)
    }
}

/// The method a call expression binds to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub name: String,
    pub declaring_type: TypeRef,
}

/// Read-only semantic service. Implementations must be safe to query from
/// several threads at once; the scanner classifies documents in parallel.
pub trait TypeOracle: Sync {
    /// Static type of an expression, if known.
    fn type_of(&self, expr: NodeId) -> Option<TypeRef>;

    /// Target method of a call expression, if it resolves.
    fn resolve_method(&self, call: NodeId) -> Option<MethodSymbol>;

    /// Whether `ty` is, inherits from, or implements `capability`.
    fn is_assignable_to(&self, ty: &TypeRef, capability: Capability) -> bool;
}

/// Declared shape of one type: its base type and implemented interfaces.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeInfo {
    #[serde(default)]
    pub base: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
}

/// Semantic data exported by the host for one program snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TypeTable {
    /// Declared types keyed by fully qualified name.
    #[serde(default)]
    pub types: BTreeMap<String, TypeInfo>,
    /// Static type of each expression node.
    #[serde(default)]
    pub expressions: BTreeMap<NodeId, TypeRef>,
    /// Resolved target of each call expression node.
    #[serde(default)]
    pub methods: BTreeMap<NodeId, MethodSymbol>,
}

impl TypeTable {
    pub fn declare(&mut self, name: &str, base: Option<&str>, interfaces: &[&str]) -> &mut Self {
        self.types.insert(
            name.to_string(),
            TypeInfo {
                base: base.map(TypeRef::new),
                interfaces: interfaces.iter().map(|i| TypeRef::new(*i)).collect(),
            },
        );
        self
    }

    pub fn set_type(&mut self, expr: NodeId, ty: &str) -> &mut Self {
        self.expressions.insert(expr, TypeRef::new(ty));
        self
    }

    pub fn bind_method(&mut self, call: NodeId, declaring_type: &str, name: &str) -> &mut Self {
        self.methods.insert(
            call,
            MethodSymbol {
                name: name.to_string(),
                declaring_type: TypeRef::new(declaring_type),
            },
        );
        self
    }

    fn info(&self, ty: &TypeRef) -> Option<&TypeInfo> {
        self.types
            .get(ty.full_name())
            .or_else(|| self.types.get(ty.definition_name()))
    }
}

impl TypeOracle for TypeTable {
    fn type_of(&self, expr: NodeId) -> Option<TypeRef> {
        self.expressions.get(&expr).cloned()
    }

    fn resolve_method(&self, call: NodeId) -> Option<MethodSymbol> {
        self.methods.get(&call).cloned()
    }

    fn is_assignable_to(&self, ty: &TypeRef, capability: Capability) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut pending: Vec<&TypeRef> = vec![ty];

        while let Some(current) = pending.pop() {
            if !visited.insert(current.full_name()) {
                continue;
            }
            if capability.matches(current) {
                return true;
            }
            if let Some(info) = self.info(current) {
                pending.extend(info.interfaces.iter());
                pending.extend(info.base.iter());
            }
        }
        false
    }
}
