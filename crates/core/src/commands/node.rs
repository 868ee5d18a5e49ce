use crate::commands::{
    argument::ArgumentType,
    context::CommandContext,
    error::{CommandResult, InternalError},
    CommandSender,
};
use indexmap::IndexMap;
use std::fmt;
use std::ops::Index;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

pub type Executor = fn(&mut CommandContext<'_>) -> CommandResult<i32>;
pub type Predicate = fn(&CommandSender) -> bool;
pub type Suggester = fn(&CommandContext<'_>, &str) -> Vec<String>;

/// Command callback, labelled with the handler it was bound from.
#[derive(Clone, Debug)]
pub struct Command {
    handler: Arc<str>,
    executor: Option<Executor>,
}

impl Command {
    pub fn new(handler: impl Into<Arc<str>>, executor: Executor) -> Self {
        Self {
            handler: handler.into(),
            executor: Some(executor),
        }
    }

    pub fn unlinked(handler: impl Into<Arc<str>>) -> Self {
        Self {
            handler: handler.into(),
            executor: None,
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn is_linked(&self) -> bool {
        self.executor.is_some()
    }

    pub fn run(&self, ctx: &mut CommandContext<'_>) -> CommandResult<i32> {
        match self.executor {
            Some(executor) => executor(ctx),
            None => Err(InternalError::Unlinked {
                handler: self.handler.to_string(),
            }
            .into()),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub enum Requirement {
    #[default]
    Always,
    Never,
    Permission(String),
    Check {
        handler: Arc<str>,
        predicate: Option<Predicate>,
    },
}

impl Requirement {
    pub fn check(handler: impl Into<Arc<str>>, predicate: Predicate) -> Self {
        Requirement::Check {
            handler: handler.into(),
            predicate: Some(predicate),
        }
    }

    pub fn can_use(&self, sender: &CommandSender) -> bool {
        match self {
            Requirement::Always => true,
            Requirement::Never => false,
            Requirement::Permission(permission) => sender.has_permission(permission),
            // Unlinked checks deny everyone.
            Requirement::Check { predicate, .. } => predicate.is_some_and(|check| check(sender)),
        }
    }

    /// Whether no sender can ever satisfy this requirement.
    pub fn is_statically_false(&self) -> bool {
        matches!(self, Requirement::Never)
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Requirement::Always => write!(f, "always"),
            Requirement::Never => write!(f, "never"),
            Requirement::Permission(permission) => write!(f, "permission({})", permission),
            Requirement::Check { handler, .. } => write!(f, "check({})", handler),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Suggestions {
    handler: Arc<str>,
    suggester: Option<Suggester>,
}

impl Suggestions {
    pub fn new(handler: impl Into<Arc<str>>, suggester: Suggester) -> Self {
        Self {
            handler: handler.into(),
            suggester: Some(suggester),
        }
    }

    pub fn unlinked(handler: impl Into<Arc<str>>) -> Self {
        Self {
            handler: handler.into(),
            suggester: None,
        }
    }

    pub fn handler(&self) -> &str {
        &self.handler
    }

    pub fn suggest(&self, ctx: &CommandContext<'_>, remaining: &str) -> Vec<String> {
        self.suggester
            .map(|suggester| suggester(ctx, remaining))
            .unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TreeId(u64);

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(0);

impl TreeId {
    fn next() -> Self {
        TreeId(NEXT_TREE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A node in some tree. Redirects may point across trees.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub tree: TreeId,
    pub node: NodeId,
}

#[derive(Clone, Debug)]
pub enum NodeType {
    Root,
    Literal {
        name: String,
        aliases: Vec<String>,
    },
    Argument {
        name: String,
        arg_type: ArgumentType,
        suggestions: Option<Suggestions>,
    },
}

#[derive(Clone, Debug)]
pub struct CommandNode {
    pub(super) node_type: NodeType,
    pub(super) children: IndexMap<String, NodeId>,
    pub(super) command: Option<Command>,
    pub(super) requirement: Requirement,
    pub(super) redirect: Option<NodeRef>,
}

impl CommandNode {
    fn new(node_type: NodeType) -> Self {
        Self {
            node_type,
            children: IndexMap::new(),
            command: None,
            requirement: Requirement::Always,
            redirect: None,
        }
    }

    pub fn root() -> Self {
        Self::new(NodeType::Root)
    }

    pub fn literal(name: impl Into<String>) -> Self {
        Self::new(NodeType::Literal {
            name: name.into(),
            aliases: Vec::new(),
        })
    }

    pub fn argument(name: impl Into<String>, arg_type: impl Into<ArgumentType>) -> Self {
        Self::new(NodeType::Argument {
            name: name.into(),
            arg_type: arg_type.into(),
            suggestions: None,
        })
    }

    pub fn executes(mut self, command: Command) -> Self {
        self.command = Some(command);
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        let NodeType::Literal { aliases, .. } = &mut self.node_type else {
            panic!("Can not create alias for non-literal command nodes")
        };
        aliases.push(alias.into());
        self
    }

    pub fn requires(mut self, requirement: Requirement) -> Self {
        self.requirement = requirement;
        self
    }

    pub fn require_permission(self, permission: impl Into<String>) -> Self {
        self.requires(Requirement::Permission(permission.into()))
    }

    pub fn suggests(mut self, provider: Suggestions) -> Self {
        let NodeType::Argument { suggestions, .. } = &mut self.node_type else {
            panic!("Can not add suggestions to non-argument command nodes")
        };
        *suggestions = Some(provider);
        self
    }

    /// Copy without children or redirect.
    pub(super) fn detached(&self) -> Self {
        Self {
            node_type: self.node_type.clone(),
            children: IndexMap::new(),
            command: self.command.clone(),
            requirement: self.requirement.clone(),
            redirect: None,
        }
    }

    pub fn node_type(&self) -> &NodeType {
        &self.node_type
    }

    pub fn name(&self) -> &str {
        match &self.node_type {
            NodeType::Root => "",
            NodeType::Literal { name, .. } | NodeType::Argument { name, .. } => name,
        }
    }

    pub fn aliases(&self) -> &[String] {
        match &self.node_type {
            NodeType::Literal { aliases, .. } => aliases,
            _ => &[],
        }
    }

    pub fn argument_type(&self) -> Option<&ArgumentType> {
        match &self.node_type {
            NodeType::Argument { arg_type, .. } => Some(arg_type),
            _ => None,
        }
    }

    pub fn suggestions(&self) -> Option<&Suggestions> {
        match &self.node_type {
            NodeType::Argument { suggestions, .. } => suggestions.as_ref(),
            _ => None,
        }
    }

    pub fn command(&self) -> Option<&Command> {
        self.command.as_ref()
    }

    pub fn requirement(&self) -> &Requirement {
        &self.requirement
    }

    pub fn redirect(&self) -> Option<NodeRef> {
        self.redirect
    }

    pub fn can_use(&self, sender: &CommandSender) -> bool {
        self.requirement.can_use(sender)
    }
}

/// Arena of command nodes. Index 0 is the root.
///
/// Every tree gets a process-unique [`TreeId`] so that [`NodeRef`]s held in
/// redirects can tell which tree they point into.
#[derive(Debug)]
pub struct CommandTree {
    id: TreeId,
    nodes: Vec<CommandNode>,
}

impl Default for CommandTree {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandTree {
    pub fn new() -> Self {
        Self {
            id: TreeId::next(),
            nodes: vec![CommandNode::root()],
        }
    }

    pub fn id(&self) -> TreeId {
        self.id
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> Option<&CommandNode> {
        self.nodes.get(id.index())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut CommandNode> {
        self.nodes.get_mut(id.index())
    }

    /// Adds a node without attaching it anywhere.
    pub fn add(&mut self, node: CommandNode) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Attaches `child` under `parent`, returning a replaced same-name child.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        let name = self.nodes[child.index()].name().to_string();
        self.nodes[parent.index()].children.insert(name, child)
    }

    pub fn insert(&mut self, parent: NodeId, node: CommandNode) -> NodeId {
        let id = self.add(node);
        self.attach(parent, id);
        id
    }

    /// Detaches the child called `name`. The node itself stays in the arena.
    pub fn remove(&mut self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[parent.index()].children.shift_remove(name)
    }

    pub fn child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.nodes[parent.index()].children.get(name).copied()
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes[parent.index()].children.values().copied()
    }

    /// Follows child names from the root, without following redirects.
    pub fn find(&self, path: &[&str]) -> Option<NodeId> {
        path.iter()
            .try_fold(self.root(), |node, name| self.child(node, name))
    }

    pub fn reference(&self, node: NodeId) -> NodeRef {
        NodeRef {
            tree: self.id,
            node,
        }
    }

    /// Resolves a reference into this tree.
    pub fn resolve(&self, reference: NodeRef) -> Option<NodeId> {
        (reference.tree == self.id && reference.node.index() < self.nodes.len())
            .then_some(reference.node)
    }

    pub fn set_redirect(&mut self, node: NodeId, target: Option<NodeRef>) {
        self.nodes[node.index()].redirect = target;
    }

    pub fn redirect_to(&mut self, node: NodeId, target: NodeId) {
        let target = self.reference(target);
        self.set_redirect(node, Some(target));
    }

    /// Redirect target of `node` if it lives in this tree.
    pub fn redirect_target(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.index()]
            .redirect
            .and_then(|target| self.resolve(target))
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Number of nodes in the arena, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the root has no commands.
    pub fn is_empty(&self) -> bool {
        self.nodes[0].children.is_empty()
    }
}

impl Index<NodeId> for CommandTree {
    type Output = CommandNode;

    fn index(&self, id: NodeId) -> &CommandNode {
        &self.nodes[id.index()]
    }
}
