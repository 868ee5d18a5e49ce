//! Structural matching of program elements against binding shapes.

use super::parser::Binding;
use crate::config::CompilerConfig;
use crate::element::{Element, ElementKind, Signature, TypeRef};

/// Type names the binder matches signatures against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Shapes {
    pub context: String,
    pub sender: String,
    pub builder: String,
    pub future: String,
    pub argument_type: String,
    pub command: String,
    pub predicate: String,
    pub provider: String,
    /// The only checked exception a bound method may declare.
    pub exception: String,
}

impl Default for Shapes {
    fn default() -> Self {
        Self::from(&CompilerConfig::default())
    }
}

impl From<&CompilerConfig> for Shapes {
    fn from(config: &CompilerConfig) -> Self {
        Self {
            context: config.context_type.clone(),
            sender: config.sender_type.clone(),
            builder: config.builder_type.clone(),
            future: config.future_type.clone(),
            argument_type: config.argument_type.clone(),
            command: config.command_type.clone(),
            predicate: config.predicate_type.clone(),
            provider: config.provider_type.clone(),
            exception: config.exception_type.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    /// Modules, packages and types cannot be bound.
    NotAMember,
    /// Matches no shape.
    Signature,
    /// Matches a shape but declares an unsanctioned exception.
    Throws(TypeRef),
}

impl Shapes {
    pub fn resolve(&self, element: &Element) -> Result<Binding, Mismatch> {
        match element.kind() {
            ElementKind::Module | ElementKind::Package | ElementKind::Type => {
                Err(Mismatch::NotAMember)
            }
            ElementKind::Executable(signature) => {
                let binding = self.executable(signature).ok_or(Mismatch::Signature)?;
                match signature.throws.iter().find(|ty| !ty.is(&self.exception)) {
                    Some(exception) => Err(Mismatch::Throws(exception.clone())),
                    None => Ok(binding),
                }
            }
            ElementKind::Variable { ty, .. } => self.variable(ty).ok_or(Mismatch::Signature),
        }
    }

    fn executable(&self, signature: &Signature) -> Option<Binding> {
        let returns = &signature.returns;
        match signature.parameters.as_slice() {
            [context] if context.is(&self.context) && (returns.is_void() || is_int(returns)) => {
                Some(Binding::Command)
            }
            [sender] if sender.is(&self.sender) && is_boolean(returns) => {
                Some(Binding::Requirement)
            }
            [context, builder]
                if context.is(&self.context)
                    && builder.is(&self.builder)
                    && returns.is(&self.future) =>
            {
                Some(Binding::Suggestions)
            }
            _ => None,
        }
    }

    fn variable(&self, ty: &TypeRef) -> Option<Binding> {
        if ty.is(&self.argument_type) {
            Some(Binding::Type)
        } else if ty.is(&self.command) {
            Some(Binding::Command)
        } else if ty.is(&self.predicate) {
            Some(Binding::Requirement)
        } else if ty.is(&self.provider) {
            Some(Binding::Suggestions)
        } else {
            None
        }
    }

    /// Human readable list of every accepted shape.
    pub fn describe(&self) -> String {
        [
            format!("\"int|void name({})\"", self.context),
            format!("\"boolean name({})\"", self.sender),
            format!(
                "\"{} name({}, {})\"",
                self.future, self.context, self.builder
            ),
            format!("a field of type {}", self.argument_type),
            format!("a field of type {}", self.command),
            format!("a field of type {}", self.predicate),
            format!("a field of type {}", self.provider),
        ]
        .join(", ")
    }
}

fn is_int(ty: &TypeRef) -> bool {
    ty.is("int") || ty.is("Integer")
}

fn is_boolean(ty: &TypeRef) -> bool {
    ty.is("boolean") || ty.is("Boolean")
}
