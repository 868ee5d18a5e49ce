use super::binder::{Mismatch, Shapes};
use super::identity::{Memoizer, Token};
use super::lexer::Lexer;
use super::parser::{Binding, Identifier, IdentifierType, Parser};
use crate::diagnostics::Logger;
use crate::element::Element;
use indexmap::IndexMap;
use std::rc::Rc;
use tracing::{debug, trace};

/// State of one compilation: interned identities, a grammar tree per
/// declaring type and the diagnostics sink.
pub struct CompilationSession<L: Logger> {
    shapes: Shapes,
    memoizer: Memoizer,
    roots: IndexMap<String, Identifier>,
    logger: L,
}

impl<L: Logger> CompilationSession<L> {
    pub fn new(logger: L) -> Self {
        Self {
            shapes: Shapes::default(),
            memoizer: Memoizer::new(),
            roots: IndexMap::new(),
            logger,
        }
    }

    pub fn with_shapes(mut self, shapes: Shapes) -> Self {
        self.shapes = shapes;
        self
    }

    /// Declares every command of every element, binds them, then checks the
    /// resulting trees.
    pub fn process(&mut self, elements: &[Element]) {
        for element in elements {
            self.declare(element);
        }
        for element in elements {
            self.bind(element);
        }
        self.verify();
        debug!(
            roots = self.roots.len(),
            identities = self.memoizer.len(),
            errors = self.logger.error_count(),
            "processed elements"
        );
    }

    /// Adds the `@Command` grammars of `element` to the tree of its type.
    pub fn declare(&mut self, element: &Element) {
        if element.commands().is_empty() {
            return;
        }

        let location = element.path();
        let Some(owner) = element.owner() else {
            for grammar in element.commands() {
                self.logger.error_with(
                    &location,
                    grammar,
                    "is declared on a module or package",
                    "a command should be declared on a type or its members",
                );
            }
            return;
        };

        let root = self
            .roots
            .entry(owner.clone())
            .or_insert_with(|| Identifier::root(owner.clone(), owner));

        for grammar in element.commands() {
            let tokens = Lexer::new(&mut self.memoizer, &mut self.logger).lex(&location, grammar);
            let mut parser = Parser::new(&mut self.logger);
            if parser.valid(&location, &tokens) {
                trace!(location = %location, grammar = %grammar, "declaring command");
                parser.parse(&location, root, &tokens);
            }
        }
    }

    /// Binds `element` to every node matched by its `@Bind` patterns.
    pub fn bind(&mut self, element: &Element) {
        if element.bindings().is_empty() {
            return;
        }

        let location = element.path();
        let binding = match self.shapes.resolve(element) {
            Ok(binding) => binding,
            Err(mismatch) => {
                self.mismatch(&location, element, mismatch);
                return;
            }
        };

        for pattern in element.bindings() {
            let tokens =
                Lexer::single(&mut self.memoizer, &mut self.logger).lex(&location, pattern);
            if tokens.is_empty() {
                continue;
            }

            let Some(root) = element.owner().and_then(|owner| self.roots.get_mut(&owner)) else {
                self.logger.error_with(
                    &location,
                    pattern,
                    "has no enclosing command",
                    "the enclosing type should declare a command",
                );
                continue;
            };

            let mut matches = Vec::new();
            suffix_matches(root, &tokens, &mut Vec::new(), &mut matches);
            if matches.is_empty() {
                self.logger.error_with(
                    &location,
                    pattern,
                    "does not match any command",
                    "a binding should name the end of a declared command",
                );
                continue;
            }

            for path in matches {
                let Some(node) = root.descend_mut(&path) else {
                    continue;
                };
                if node.ty() == IdentifierType::Literal
                    && matches!(binding, Binding::Type | Binding::Suggestions)
                {
                    self.logger.error_with(
                        &location,
                        pattern,
                        &format!("cannot bind a {} to a literal", binding),
                        "bind it to an argument instead",
                    );
                    continue;
                }
                if let Err(existing) = node.bind(binding, element) {
                    let reason = format!("is already bound to {}", existing.path());
                    let resolution = format!("only one {} should be declared", binding);
                    self.logger
                        .error_with(&location, pattern, &reason, &resolution);
                }
            }
        }
    }

    fn mismatch(&mut self, location: &str, element: &Element, mismatch: Mismatch) {
        match mismatch {
            Mismatch::NotAMember => self.logger.error_with(
                location,
                element.name(),
                "cannot be bound",
                "only methods and fields can be bound",
            ),
            Mismatch::Signature => {
                let resolution = format!("should be one of {}", self.shapes.describe());
                self.logger.error_with(
                    location,
                    element.name(),
                    "matches no bindable signature",
                    &resolution,
                )
            }
            Mismatch::Throws(exception) => {
                let resolution = format!("only {} may be thrown", self.shapes.exception);
                self.logger.error_with(
                    location,
                    &exception.to_string(),
                    "is not an allowed exception",
                    &resolution,
                )
            }
        }
    }

    /// Reports arguments without a type and leaves without a command.
    pub fn verify(&mut self) {
        for root in self.roots.values() {
            for child in root.children() {
                verify_node(child, &mut self.logger);
            }
        }
    }

    pub fn roots(&self) -> impl Iterator<Item = &Identifier> {
        self.roots.values()
    }

    pub fn root(&self, owner: &str) -> Option<&Identifier> {
        self.roots.get(owner)
    }

    pub fn logger(&self) -> &L {
        &self.logger
    }

    pub fn logger_mut(&mut self) -> &mut L {
        &mut self.logger
    }

    pub fn into_logger(self) -> L {
        self.logger
    }

    /// Drops every tree and interned identity. Diagnostics are kept.
    pub fn clear(&mut self) {
        self.roots.clear();
        self.memoizer.clear();
    }
}

/// Collects the child-name paths of every node whose trailing identities are `tokens`.
/// Recursion depth is the depth of the grammar tree, one level per grammar token.
fn suffix_matches<'t>(
    node: &'t Identifier,
    tokens: &[Token],
    ancestors: &mut Vec<&'t Identifier>,
    matches: &mut Vec<Vec<String>>,
) {
    for child in node.children() {
        ancestors.push(child);
        if ancestors.len() >= tokens.len()
            && ancestors[ancestors.len() - tokens.len()..]
                .iter()
                .zip(tokens)
                .all(|(identifier, token)| same_identity(identifier, token))
        {
            matches.push(ancestors.iter().map(|a| a.name().to_string()).collect());
        }
        suffix_matches(child, tokens, ancestors, matches);
        ancestors.pop();
    }
}

fn same_identity(identifier: &Identifier, token: &Token) -> bool {
    identifier
        .identity()
        .is_some_and(|identity| Rc::ptr_eq(identity, token.identity()))
}

/// Recurses once per grammar level.
fn verify_node(identifier: &Identifier, logger: &mut impl Logger) {
    if identifier.ty() == IdentifierType::Argument
        && identifier.binding(Binding::Type).is_none()
    {
        logger.error_with(
            identifier.location(),
            &format!("<{}>", identifier.name()),
            "has no argument type",
            "an argument should be bound to an ArgumentType field",
        );
    }

    if identifier.children().next().is_none() && identifier.binding(Binding::Command).is_none() {
        logger.warn(
            identifier.location(),
            identifier.name(),
            "has no command",
            "a command should be bound to the end of each declared command",
        );
    }

    for child in identifier.children() {
        verify_node(child, logger);
    }
}
