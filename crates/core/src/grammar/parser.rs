//! Grammar tree built from `@Command` declarations.

use super::identity::{Identity, Kind, Token};
use crate::diagnostics::Logger;
use crate::element::Element;
use indexmap::map::Entry;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IdentifierType {
    Root,
    Literal,
    Argument,
}

impl From<Kind> for IdentifierType {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Literal => IdentifierType::Literal,
            Kind::Argument => IdentifierType::Argument,
        }
    }
}

impl fmt::Display for IdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierType::Root => write!(f, "root"),
            IdentifierType::Literal => write!(f, "literal"),
            IdentifierType::Argument => write!(f, "argument"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Binding {
    Command,
    Requirement,
    Suggestions,
    Type,
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Command => write!(f, "Command"),
            Binding::Requirement => write!(f, "requirement"),
            Binding::Suggestions => write!(f, "SuggestionProvider"),
            Binding::Type => write!(f, "ArgumentType"),
        }
    }
}

/// A node of the grammar tree.
#[derive(Clone, Debug)]
pub struct Identifier {
    ty: IdentifierType,
    location: String,
    name: String,
    identity: Option<Rc<Identity>>,
    aliases: Vec<String>,
    children: IndexMap<String, Identifier>,
    bindings: IndexMap<Binding, Element>,
}

impl Identifier {
    pub fn root(location: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            ty: IdentifierType::Root,
            location: location.into(),
            name: name.into(),
            identity: None,
            aliases: Vec::new(),
            children: IndexMap::new(),
            bindings: IndexMap::new(),
        }
    }

    fn from_token(location: &str, token: &Token) -> Self {
        Self {
            ty: token.kind().into(),
            location: location.to_string(),
            name: token.name().to_string(),
            identity: Some(token.identity().clone()),
            aliases: token.aliases().to_vec(),
            children: IndexMap::new(),
            bindings: IndexMap::new(),
        }
    }

    /// Returns the child named like `token`, creating it if needed.
    ///
    /// Aliases of an existing literal are extended with the token's aliases.
    /// A child of the other kind with the same name is returned as `Err`.
    pub fn add(&mut self, location: &str, token: &Token) -> Result<&mut Identifier, &Identifier> {
        match self.children.entry(token.name().to_string()) {
            Entry::Occupied(entry) => {
                let child = entry.into_mut();
                if child.ty != IdentifierType::from(token.kind()) {
                    return Err(child);
                }
                for alias in token.aliases() {
                    if !child.aliases.contains(alias) {
                        child.aliases.push(alias.clone());
                    }
                }
                Ok(child)
            }
            Entry::Vacant(entry) => Ok(entry.insert(Identifier::from_token(location, token))),
        }
    }

    /// Binds `element` unless a binding of that kind exists, which is returned instead.
    pub fn bind(&mut self, binding: Binding, element: &Element) -> Result<(), &Element> {
        match self.bindings.entry(binding) {
            Entry::Occupied(entry) => Err(entry.into_mut()),
            Entry::Vacant(entry) => {
                entry.insert(element.clone());
                Ok(())
            }
        }
    }

    pub fn ty(&self) -> IdentifierType {
        self.ty
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn identity(&self) -> Option<&Rc<Identity>> {
        self.identity.as_ref()
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn child(&self, name: &str) -> Option<&Identifier> {
        self.children.get(name)
    }

    pub fn children(&self) -> impl Iterator<Item = &Identifier> {
        self.children.values()
    }

    pub fn binding(&self, binding: Binding) -> Option<&Element> {
        self.bindings.get(&binding)
    }

    pub fn bindings(&self) -> impl Iterator<Item = (Binding, &Element)> {
        self.bindings.iter().map(|(binding, element)| (*binding, element))
    }

    /// Follows `path` of child names.
    pub fn descend(&self, path: &[String]) -> Option<&Identifier> {
        path.iter()
            .try_fold(self, |node, name| node.children.get(name))
    }

    pub fn descend_mut(&mut self, path: &[String]) -> Option<&mut Identifier> {
        path.iter()
            .try_fold(self, |node, name| node.children.get_mut(name))
    }
}

pub struct Parser<'a> {
    logger: &'a mut dyn Logger,
}

impl<'a> Parser<'a> {
    pub fn new(logger: &'a mut dyn Logger) -> Self {
        Self { logger }
    }

    /// Checks that `tokens` can start a command.
    pub fn valid(&mut self, location: &str, tokens: &[Token]) -> bool {
        let Some(first) = tokens.first() else {
            return false;
        };

        if first.kind() == Kind::Argument {
            self.logger.error_with(
                location,
                first.lexeme(),
                "is in an invalid position",
                "a command should not start with an argument",
            );
            return false;
        }

        true
    }

    /// Inserts the chain `tokens` under `root`, reusing existing nodes.
    pub fn parse(&mut self, location: &str, root: &mut Identifier, tokens: &[Token]) {
        let mut node = root;
        for token in tokens {
            match node.add(location, token) {
                Ok(child) => node = child,
                Err(existing) => {
                    let reason = format!(
                        "is already declared as an {} at {}",
                        existing.ty(),
                        existing.location()
                    );
                    self.logger.error_with(
                        location,
                        token.lexeme(),
                        &reason,
                        "a literal and an argument should not share a name",
                    );
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostics;
    use crate::grammar::identity::Memoizer;
    use crate::grammar::lexer::Lexer;

    fn tokens(memoizer: &mut Memoizer, line: &str) -> Vec<Token> {
        let mut diagnostics = Diagnostics::new();
        let tokens = Lexer::new(memoizer, &mut diagnostics).lex("Test", line);
        assert!(diagnostics.is_empty());
        tokens
    }

    #[test]
    fn valid_requires_leading_literal() {
        let mut memoizer = Memoizer::new();
        let mut diagnostics = Diagnostics::new();

        assert!(!Parser::new(&mut diagnostics).valid("Test", &[]));
        assert!(diagnostics.is_empty());

        let argument_first = tokens(&mut memoizer, "<a> b");
        assert!(!Parser::new(&mut diagnostics).valid("Test", &argument_first));
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.lexeme, "<a>");
        assert_eq!(
            diagnostic.resolution.as_deref(),
            Some("a command should not start with an argument")
        );

        diagnostics.clear();
        let literal_first = tokens(&mut memoizer, "b <a>");
        assert!(Parser::new(&mut diagnostics).valid("Test", &literal_first));
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn parse_reuses_existing_nodes() {
        let mut memoizer = Memoizer::new();
        let mut diagnostics = Diagnostics::new();
        let mut root = Identifier::root("Test", "Test");

        let first = tokens(&mut memoizer, "tell <players> <message>");
        let second = tokens(&mut memoizer, "tell|t <players> all");
        let mut parser = Parser::new(&mut diagnostics);
        parser.parse("Test", &mut root, &first);
        parser.parse("Test", &mut root, &second);

        assert!(diagnostics.is_empty());
        assert_eq!(root.children().count(), 1);

        let tell = root.child("tell").unwrap();
        assert_eq!(tell.ty(), IdentifierType::Literal);
        assert_eq!(tell.aliases(), ["t"]);

        let players = tell.child("players").unwrap();
        assert_eq!(players.ty(), IdentifierType::Argument);
        let names: Vec<_> = players.children().map(Identifier::name).collect();
        assert_eq!(names, ["message", "all"]);
    }

    #[test]
    fn parse_rejects_kind_collision() {
        let mut memoizer = Memoizer::new();
        let mut diagnostics = Diagnostics::new();
        let mut root = Identifier::root("Test", "Test");

        let first = tokens(&mut memoizer, "give <item>");
        let second = tokens(&mut memoizer, "give item amount");
        let mut parser = Parser::new(&mut diagnostics);
        parser.parse("Test", &mut root, &first);
        parser.parse("Other", &mut root, &second);

        assert_eq!(diagnostics.error_count(), 1);
        let diagnostic = diagnostics.iter().next().unwrap();
        assert_eq!(diagnostic.location, "Other");
        assert_eq!(diagnostic.lexeme, "item");

        let item = root.descend(&["give".into(), "item".into()]).unwrap();
        assert_eq!(item.ty(), IdentifierType::Argument);
        assert_eq!(item.children().count(), 0);
    }

    #[test]
    fn bind_keeps_first() {
        use crate::element::{Signature, TypeRef};

        let mut root = Identifier::root("Test", "Test");
        let first = Element::method("Test", "a", Signature::new(vec![], TypeRef::void()));
        let second = Element::method("Test", "b", Signature::new(vec![], TypeRef::void()));

        assert!(root.bind(Binding::Command, &first).is_ok());
        let existing = root.bind(Binding::Command, &second).unwrap_err();
        assert_eq!(existing.name(), "a");
        assert_eq!(root.binding(Binding::Command).unwrap().name(), "a");
    }
}
