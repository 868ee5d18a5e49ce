//! Turns grammar trees with resolved bindings into a runtime command tree.

use super::argument::ArgumentType;
use super::node::{
    Command, CommandNode, CommandTree, Executor, NodeId, Requirement, Suggester, Suggestions,
};
use crate::element::{Element, ElementKind};
use crate::grammar::{Binding, Identifier, IdentifierType};
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

/// Handler tables keyed by element path (`Tell::tell`).
#[derive(Default)]
pub struct Linker {
    executors: FxHashMap<String, Executor>,
    requirements: FxHashMap<String, Requirement>,
    suggesters: FxHashMap<String, Suggester>,
    argument_types: FxHashMap<String, ArgumentType>,
}

impl Linker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn executor(mut self, handler: impl Into<String>, executor: Executor) -> Self {
        self.executors.insert(handler.into(), executor);
        self
    }

    pub fn requirement(mut self, handler: impl Into<String>, requirement: Requirement) -> Self {
        self.requirements.insert(handler.into(), requirement);
        self
    }

    pub fn suggester(mut self, handler: impl Into<String>, suggester: Suggester) -> Self {
        self.suggesters.insert(handler.into(), suggester);
        self
    }

    pub fn argument_type(mut self, handler: impl Into<String>, arg_type: ArgumentType) -> Self {
        self.argument_types.insert(handler.into(), arg_type);
        self
    }

    /// Links every root into one tree. A command declared by two roots keeps
    /// the later declaration.
    pub fn link<'s>(&self, roots: impl IntoIterator<Item = &'s Identifier>) -> CommandTree {
        let mut tree = CommandTree::new();
        let root = tree.root();
        for identifier in roots {
            for child in identifier.children() {
                if let Some(previous) = tree.child(root, child.name()) {
                    warn!(
                        command = child.name(),
                        replaced = ?previous,
                        location = identifier.location(),
                        "command declared by more than one type"
                    );
                }
                self.build(&mut tree, root, child);
            }
        }
        tree
    }

    fn build(&self, tree: &mut CommandTree, parent: NodeId, identifier: &Identifier) {
        let mut pending = vec![(parent, identifier)];
        while let Some((parent, identifier)) = pending.pop() {
            let id = tree.insert(parent, self.node(identifier));
            // Reversed so siblings are inserted in declaration order.
            let children: Vec<_> = identifier.children().map(|child| (id, child)).collect();
            pending.extend(children.into_iter().rev());
        }
    }

    fn node(&self, identifier: &Identifier) -> CommandNode {
        let mut node = match identifier.ty() {
            IdentifierType::Argument => {
                let mut node =
                    CommandNode::argument(identifier.name(), self.argument_type_of(identifier));
                if let Some(element) = identifier.binding(Binding::Suggestions) {
                    node = node.suggests(self.suggestions(element));
                }
                node
            }
            IdentifierType::Literal | IdentifierType::Root => identifier
                .aliases()
                .iter()
                .fold(CommandNode::literal(identifier.name()), |node, alias| {
                    node.alias(alias.clone())
                }),
        };

        if let Some(element) = identifier.binding(Binding::Command) {
            node = node.executes(self.command(element));
        }
        if let Some(element) = identifier.binding(Binding::Requirement) {
            node = node.requires(self.requirement_of(element));
        }
        node
    }

    fn command(&self, element: &Element) -> Command {
        let handler = element.path();
        match self.executors.get(&handler) {
            Some(&executor) => Command::new(handler, executor),
            None => {
                debug!(handler = %handler, "command handler is not linked");
                Command::unlinked(handler)
            }
        }
    }

    fn requirement_of(&self, element: &Element) -> Requirement {
        let handler = element.path();
        self.requirements
            .get(&handler)
            .cloned()
            .unwrap_or_else(|| Requirement::Check {
                handler: handler.into(),
                predicate: None,
            })
    }

    fn suggestions(&self, element: &Element) -> Suggestions {
        let handler = element.path();
        match self.suggesters.get(&handler) {
            Some(&suggester) => Suggestions::new(handler, suggester),
            None => Suggestions::unlinked(handler),
        }
    }

    fn argument_type_of(&self, identifier: &Identifier) -> ArgumentType {
        let Some(element) = identifier.binding(Binding::Type) else {
            return ArgumentType::String;
        };

        let handler = element.path();
        if let Some(arg_type) = self.argument_types.get(&handler) {
            return arg_type.clone();
        }

        match element.kind() {
            ElementKind::Variable {
                initializer: Some(initializer),
                ..
            } => initializer.parse().unwrap_or_else(|err| {
                warn!(handler = %handler, %err, "falling back to a string argument");
                ArgumentType::String
            }),
            _ => ArgumentType::String,
        }
    }
}
