//! Program elements handed to the compiler by an annotation scanner.

use std::fmt;
use std::iter::Peekable;
use std::str::{CharIndices, FromStr};
use thiserror::Error;

/// A (possibly generic) type reference such as `CompletableFuture<Suggestions>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub name: String,
    pub arguments: Vec<TypeRef>,
}

impl TypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>, arguments: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }

    pub fn void() -> Self {
        Self::new("void")
    }

    /// The erased name without its package, `java.util.List<String>` -> `List`.
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Compares erased simple names, so `a.b.Command` matches `Command`.
    pub fn is(&self, name: &str) -> bool {
        let name = name.rsplit('.').next().unwrap_or(name);
        self.simple_name() == name
    }

    pub fn is_void(&self) -> bool {
        self.is("void") || self.is("Void")
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.arguments.is_empty() {
            write!(f, "<")?;
            for (i, argument) in self.arguments.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", argument)?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeParseError {
    #[error("expected a type name at offset {0}")]
    ExpectedName(usize),
    #[error("unexpected character '{found}' at offset {offset}")]
    Unexpected { found: char, offset: usize },
    #[error("unclosed type argument list")]
    Unclosed,
    #[error("type arguments nested too deeply at offset {offset}")]
    TooDeep { offset: usize },
}

/// Deepest `<` nesting accepted in a type reference.
const MAX_TYPE_DEPTH: usize = 64;

struct TypeParser<'a> {
    src: &'a str,
    chars: Peekable<CharIndices<'a>>,
}

impl<'a> TypeParser<'a> {
    fn skip_whitespace(&mut self) {
        while let Some((_, c)) = self.chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            self.chars.next();
        }
    }

    fn offset(&mut self) -> usize {
        self.chars.peek().map_or(self.src.len(), |(i, _)| *i)
    }

    fn read_name(&mut self) -> Result<String, TypeParseError> {
        self.skip_whitespace();
        let start = self.offset();
        let mut name = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if !(c.is_alphanumeric() || matches!(c, '_' | '$' | '.' | '?' | '[' | ']')) {
                break;
            }
            name.push(c);
            self.chars.next();
        }
        if name.is_empty() {
            return Err(TypeParseError::ExpectedName(start));
        }
        Ok(name)
    }

    fn read_type(&mut self, depth: usize) -> Result<TypeRef, TypeParseError> {
        let name = self.read_name()?;
        let mut arguments = Vec::new();
        self.skip_whitespace();
        if let Some(&(offset, '<')) = self.chars.peek() {
            if depth == MAX_TYPE_DEPTH {
                return Err(TypeParseError::TooDeep { offset });
            }
            self.chars.next();
            loop {
                arguments.push(self.read_type(depth + 1)?);
                self.skip_whitespace();
                match self.chars.next() {
                    Some((_, ',')) => continue,
                    Some((_, '>')) => break,
                    Some((offset, found)) => {
                        return Err(TypeParseError::Unexpected { found, offset })
                    }
                    None => return Err(TypeParseError::Unclosed),
                }
            }
        }
        Ok(TypeRef { name, arguments })
    }
}

impl FromStr for TypeRef {
    type Err = TypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = TypeParser {
            src: s,
            chars: s.char_indices().peekable(),
        };
        let ty = parser.read_type(0)?;
        parser.skip_whitespace();
        match parser.chars.next() {
            Some((offset, found)) => Err(TypeParseError::Unexpected { found, offset }),
            None => Ok(ty),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub parameters: Vec<TypeRef>,
    pub returns: TypeRef,
    pub throws: Vec<TypeRef>,
}

impl Signature {
    pub fn new(parameters: Vec<TypeRef>, returns: TypeRef) -> Self {
        Self {
            parameters,
            returns,
            throws: Vec::new(),
        }
    }

    pub fn throws(mut self, exception: TypeRef) -> Self {
        self.throws.push(exception);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ElementKind {
    Module,
    Package,
    Type,
    Executable(Signature),
    Variable {
        ty: TypeRef,
        /// Source text of the initializer, if the scanner captured one.
        initializer: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub(crate) name: String,
    pub(crate) enclosing: Option<String>,
    pub(crate) kind: ElementKind,
    pub(crate) commands: Vec<String>,
    pub(crate) bindings: Vec<String>,
}

impl Element {
    fn new(name: impl Into<String>, enclosing: Option<String>, kind: ElementKind) -> Self {
        Self {
            name: name.into(),
            enclosing,
            kind,
            commands: Vec::new(),
            bindings: Vec::new(),
        }
    }

    pub fn module(name: impl Into<String>) -> Self {
        Self::new(name, None, ElementKind::Module)
    }

    pub fn package(name: impl Into<String>) -> Self {
        Self::new(name, None, ElementKind::Package)
    }

    pub fn ty(name: impl Into<String>) -> Self {
        Self::new(name, None, ElementKind::Type)
    }

    pub fn method(
        enclosing: impl Into<String>,
        name: impl Into<String>,
        signature: Signature,
    ) -> Self {
        Self::new(
            name,
            Some(enclosing.into()),
            ElementKind::Executable(signature),
        )
    }

    pub fn field(enclosing: impl Into<String>, name: impl Into<String>, ty: TypeRef) -> Self {
        Self::new(
            name,
            Some(enclosing.into()),
            ElementKind::Variable {
                ty,
                initializer: None,
            },
        )
    }

    /// Adds an `@Command` grammar.
    pub fn command(mut self, grammar: impl Into<String>) -> Self {
        self.commands.push(grammar.into());
        self
    }

    /// Adds a `@Bind` pattern.
    pub fn bind(mut self, pattern: impl Into<String>) -> Self {
        self.bindings.push(pattern.into());
        self
    }

    pub fn initializer(mut self, source: impl Into<String>) -> Self {
        if let ElementKind::Variable { initializer, .. } = &mut self.kind {
            *initializer = Some(source.into());
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &ElementKind {
        &self.kind
    }

    pub fn enclosing(&self) -> Option<&str> {
        self.enclosing.as_deref()
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }

    pub fn bindings(&self) -> &[String] {
        &self.bindings
    }

    /// Qualified path, `Tell::tell` for a member of `Tell`.
    pub fn path(&self) -> String {
        match &self.enclosing {
            Some(enclosing) => format!("{}::{}", enclosing, self.name),
            None => self.name.clone(),
        }
    }

    /// Path of the type whose command tree this element contributes to.
    pub fn owner(&self) -> Option<String> {
        match self.kind {
            ElementKind::Module | ElementKind::Package => None,
            ElementKind::Type => Some(self.path()),
            ElementKind::Executable(_) | ElementKind::Variable { .. } => self.enclosing.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_nested_generics() {
        let ty: TypeRef = "java.util.Map<String, List<Integer>>".parse().unwrap();
        assert_eq!(
            ty,
            TypeRef::generic(
                "java.util.Map",
                vec![
                    TypeRef::new("String"),
                    TypeRef::generic("List", vec![TypeRef::new("Integer")]),
                ]
            )
        );
        assert_eq!(ty.simple_name(), "Map");
        assert_eq!(ty.to_string(), "java.util.Map<String, List<Integer>>");
    }

    #[test]
    fn parse_wildcard() {
        let ty: TypeRef = "ArgumentType<?>".parse().unwrap();
        assert!(ty.is("com.mojang.brigadier.arguments.ArgumentType"));
        assert_eq!(ty.arguments, vec![TypeRef::new("?")]);
    }

    #[test]
    fn parse_errors() {
        assert_eq!("".parse::<TypeRef>(), Err(TypeParseError::ExpectedName(0)));
        assert_eq!("List<String".parse::<TypeRef>(), Err(TypeParseError::Unclosed));
        assert_eq!(
            "List<String> x".parse::<TypeRef>(),
            Err(TypeParseError::Unexpected {
                found: 'x',
                offset: 13
            })
        );
    }

    #[test]
    fn deeply_nested_arguments_are_rejected() {
        let nested = "A<".repeat(5_000);
        assert_eq!(
            nested.parse::<TypeRef>(),
            Err(TypeParseError::TooDeep {
                offset: 2 * MAX_TYPE_DEPTH + 1
            })
        );

        let limit = format!("{}A{}", "A<".repeat(MAX_TYPE_DEPTH), ">".repeat(MAX_TYPE_DEPTH));
        assert!(limit.parse::<TypeRef>().is_ok());
    }

    #[test]
    fn owner_of_members_is_enclosing_type() {
        let method = Element::method("Tell", "tell", Signature::new(vec![], TypeRef::void()));
        assert_eq!(method.path(), "Tell::tell");
        assert_eq!(method.owner().as_deref(), Some("Tell"));
        assert_eq!(Element::ty("Tell").owner().as_deref(), Some("Tell"));
        assert_eq!(Element::package("commands").owner(), None);
    }
}
