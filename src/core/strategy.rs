//! Rewrite strategies.
//!
//! A strategy turns one [`LogCallInfo`] into a replacement call expression and
//! the declaration of the generated method that call now targets:
//!
//! - [`RewriteStrategy::InstanceMethod`]: `LogUserLoggedIn(userId)` calling a
//!   `private partial void LogUserLoggedIn(int userId);` on the enclosing type
//! - [`RewriteStrategy::SharedLogClass`]: `Log.UserLoggedIn(_logger, userId)`
//!   calling a `public static partial` method inside a nested `Log` class

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::data::{LogCallInfo, LogLevel};
use crate::core::error::RewriteError;
use crate::core::naming::{method_name, prefixed_method_name};
use crate::core::syntax::{
    Attribute, AttributeArg, Expr, IdAllocator, MethodDecl, Modifier, NodeId, Param,
    string_literal,
};

/// Attribute read by the downstream source generator.
pub const LOGGER_MESSAGE_ATTRIBUTE: &str = "LoggerMessage";
const LEVEL_ARG: &str = "Level";
const MESSAGE_ARG: &str = "Message";
/// Parameter type of the exception argument.
pub const EXCEPTION_TYPE: &str = "Exception";
pub const EXCEPTION_PARAM: &str = "exception";
/// Parameter type and name of the logger argument in shared-style methods.
pub const LOGGER_TYPE: &str = "ILogger";
pub const LOGGER_PARAM: &str = "logger";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ValueEnum)]
pub enum RewriteStrategy {
    /// Partial instance method on the enclosing type.
    #[value(name = "instance")]
    #[serde(rename = "instance")]
    InstanceMethod,
    /// Static partial method in a nested `Log` class.
    #[default]
    #[value(name = "shared")]
    #[serde(rename = "shared")]
    SharedLogClass,
}

/// Naming conventions shared by both strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteOptions {
    /// Name of the nested container used by the shared strategy.
    pub log_class_name: String,
    /// Namespace providing the logging and `LoggerMessage` vocabulary.
    pub logging_namespace: String,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            log_class_name: "Log".to_string(),
            logging_namespace: "Microsoft.Extensions.Logging".to_string(),
        }
    }
}

/// Where a generated declaration lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerTarget {
    /// Directly in the call's enclosing type.
    Enclosing,
    /// In a nested container type with this name.
    Nested(String),
}

/// A generated method to be inserted.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDeclaration {
    pub name: String,
    pub level: LogLevel,
    pub template: String,
    pub has_exception: bool,
    /// `(type, name)` pairs after the logger and exception parameters.
    pub parameters: Vec<Param>,
    pub container: ContainerTarget,
    pub strategy: RewriteStrategy,
}

impl GeneratedDeclaration {
    /// Bodiless `partial` method carrying `[LoggerMessage(...)]`.
    pub fn to_method(&self, id: NodeId) -> MethodDecl {
        let modifiers = match self.strategy {
            RewriteStrategy::InstanceMethod => vec![Modifier::Private, Modifier::Partial],
            RewriteStrategy::SharedLogClass => {
                vec![Modifier::Public, Modifier::Static, Modifier::Partial]
            }
        };

        MethodDecl {
            id,
            attributes: vec![self.attribute()],
            modifiers,
            return_type: "void".to_string(),
            name: self.name.clone(),
            params: self.params(),
            body: None,
        }
    }

    pub fn shape(&self) -> DeclarationShape {
        DeclarationShape::from_parts(&self.attribute(), &self.params())
    }

    fn attribute(&self) -> Attribute {
        Attribute {
            name: LOGGER_MESSAGE_ATTRIBUTE.to_string(),
            args: vec![
                AttributeArg {
                    name: Some(LEVEL_ARG.to_string()),
                    value: format!("LogLevel.{}", self.level.as_str()),
                },
                AttributeArg {
                    name: Some(MESSAGE_ARG.to_string()),
                    value: string_literal(&self.template),
                },
            ],
        }
    }

    /// Logger (shared style only), then exception, then template parameters.
    fn params(&self) -> Vec<Param> {
        let mut params = Vec::with_capacity(self.parameters.len() + 2);
        if self.strategy == RewriteStrategy::SharedLogClass {
            params.push(Param::new(LOGGER_TYPE, LOGGER_PARAM));
        }
        if self.has_exception {
            params.push(Param::new(EXCEPTION_TYPE, EXCEPTION_PARAM));
        }
        params.extend(self.parameters.iter().cloned());
        params
    }
}

/// The parts of a logging method a call site depends on: the
/// `[LoggerMessage]` level and message, and the parameter types in order.
/// Two call sites can share one generated method only if their shapes are
/// equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclarationShape {
    pub level: Option<String>,
    pub message: Option<String>,
    pub param_types: Vec<String>,
}

impl DeclarationShape {
    /// Shape of an already declared method; `None` without a
    /// `[LoggerMessage]` attribute.
    pub fn of_method(method: &MethodDecl) -> Option<Self> {
        let attribute = method
            .attributes
            .iter()
            .find(|attribute| attribute.name == LOGGER_MESSAGE_ATTRIBUTE)?;
        Some(Self::from_parts(attribute, &method.params))
    }

    fn from_parts(attribute: &Attribute, params: &[Param]) -> Self {
        let named = |name: &str| {
            attribute
                .args
                .iter()
                .find(|arg| arg.name.as_deref() == Some(name))
                .map(|arg| arg.value.clone())
        };
        Self {
            level: named(LEVEL_ARG),
            message: named(MESSAGE_ARG),
            param_types: params.iter().map(|param| param.ty.clone()).collect(),
        }
    }
}

/// The per-call-site result of running a strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct RewriteEdit {
    /// Call expression to replace.
    pub call: NodeId,
    pub replacement: Expr,
    pub declaration: GeneratedDeclaration,
}

impl RewriteStrategy {
    /// Name of the generated method for `template`.
    pub fn generated_name(self, template: &str) -> String {
        match self {
            RewriteStrategy::InstanceMethod => prefixed_method_name(template),
            RewriteStrategy::SharedLogClass => method_name(template),
        }
    }

    pub fn container(self, options: &RewriteOptions) -> ContainerTarget {
        match self {
            RewriteStrategy::InstanceMethod => ContainerTarget::Enclosing,
            RewriteStrategy::SharedLogClass => {
                ContainerTarget::Nested(options.log_class_name.clone())
            }
        }
    }

    /// Build the replacement call and the declaration for one call site.
    pub fn plan(
        self,
        info: &LogCallInfo,
        options: &RewriteOptions,
        ids: &mut IdAllocator,
    ) -> Result<RewriteEdit, RewriteError> {
        let name = self.generated_name(&info.message_template);

        let mut args = Vec::with_capacity(info.parameters.len() + 2);
        if self == RewriteStrategy::SharedLogClass {
            args.push(info.receiver.clone());
        }
        args.extend(info.exception.iter().cloned());
        args.extend(info.parameters.iter().map(|p| p.source_expr.clone()));

        let callee = match self {
            RewriteStrategy::InstanceMethod => Expr::Ident {
                id: ids.next_id()?,
                name: name.clone(),
            },
            RewriteStrategy::SharedLogClass => Expr::Member {
                id: ids.next_id()?,
                target: Box::new(Expr::Ident {
                    id: ids.next_id()?,
                    name: options.log_class_name.clone(),
                }),
                name: name.clone(),
            },
        };

        Ok(RewriteEdit {
            call: info.call,
            replacement: Expr::Call {
                id: ids.next_id()?,
                callee: Box::new(callee),
                args,
                span: None,
            },
            declaration: GeneratedDeclaration {
                name,
                level: info.level,
                template: info.message_template.clone(),
                has_exception: info.exception.is_some(),
                parameters: info
                    .parameters
                    .iter()
                    .map(|p| Param::new(p.ty.clone(), p.name.clone()))
                    .collect(),
                container: self.container(options),
                strategy: self,
            },
        })
    }
}
