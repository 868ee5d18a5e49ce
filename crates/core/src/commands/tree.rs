//! Merging a compiled command tree into a live one.
//!
//! The merge is prune-then-graft. Destination commands not superseded by the
//! source are remapped into a fresh tree first, then the source commands are
//! remapped on top. Neither input is mutated.
//!
//! Remapping goes through a `visited` map keyed by the original node, so a
//! node reached along several paths (as a child and as a redirect target, or
//! through a redirect cycle) becomes exactly one node in the output. The map
//! lives for one merge only.

use super::node::{CommandNode, CommandTree, NodeId, NodeRef, NodeType, TreeId};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Default graft filter: drops nodes nobody can ever use.
pub fn usable(node: &CommandNode) -> bool {
    !node.requirement().is_statically_false()
}

fn qualify(path: &str, name: &str) -> String {
    if path.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", path, name)
    }
}

pub struct TreeWalker<'a, F> {
    destination: &'a CommandTree,
    source: &'a CommandTree,
    keep: F,
    output: CommandTree,
    visited: FxHashMap<NodeRef, Option<NodeId>>,
}

impl<'a, F> TreeWalker<'a, F>
where
    F: FnMut(&CommandNode) -> bool,
{
    /// `keep` is asked about every source node reached while grafting.
    pub fn new(destination: &'a CommandTree, source: &'a CommandTree, keep: F) -> Self {
        let output = CommandTree::new();
        let mut visited = FxHashMap::default();
        // Both roots collapse onto the output root, so redirects to either
        // root (`execute run ...`) land on the merged root.
        visited.insert(destination.reference(destination.root()), Some(output.root()));
        visited.insert(source.reference(source.root()), Some(output.root()));
        Self {
            destination,
            source,
            keep,
            output,
            visited,
        }
    }

    /// Remaps every destination command except those named in `superseded`.
    pub fn prune(&mut self, superseded: &[&str], prefix: &str) {
        let destination = self.destination;
        let root = self.output.root();
        for (name, &child) in &destination[destination.root()].children {
            let path = qualify(prefix, name);
            if superseded.contains(&name.as_str()) {
                trace!(command = %path, "superseded by source");
                continue;
            }
            if let Some(mapped) = self.map(destination.reference(child), &path) {
                self.output.attach(root, mapped);
            }
        }
    }

    /// Remaps `commands` of the source tree onto the output root, in order.
    pub fn graft(&mut self, commands: &[NodeId], prefix: &str) {
        let source = self.source;
        let root = self.output.root();
        for &command in commands {
            let Some(node) = source.get(command) else {
                debug!(?command, "graft of a node outside the source tree");
                continue;
            };
            let path = qualify(prefix, node.name());
            if let Some(mapped) = self.map(source.reference(command), &path) {
                self.output.attach(root, mapped);
            }
        }
    }

    pub fn finish(self) -> CommandTree {
        self.output
    }

    fn lookup(&self, tree: TreeId) -> Option<&'a CommandTree> {
        if tree == self.source.id() {
            Some(self.source)
        } else if tree == self.destination.id() {
            Some(self.destination)
        } else {
            None
        }
    }

    /// Remaps `original` and everything reachable from it.
    ///
    /// Nodes are created and attached in child order, then expanded from an
    /// explicit work stack, so deep trees do not grow the call stack.
    fn map(&mut self, original: NodeRef, path: &str) -> Option<NodeId> {
        let mut pending = Vec::new();
        let mapped = self.visit(original, path.to_string(), false, &mut pending);
        while let Some((original, mapped, path)) = pending.pop() {
            self.expand(original, mapped, &path, &mut pending);
        }
        mapped
    }

    /// Maps a single node, queueing it for expansion if it is new.
    ///
    /// Roots are only valid as redirect targets, where the seeded `visited`
    /// entries send them to the output root.
    fn visit(
        &mut self,
        original: NodeRef,
        path: String,
        redirect: bool,
        pending: &mut Vec<(NodeRef, NodeId, String)>,
    ) -> Option<NodeId> {
        let tree = self.lookup(original.tree);
        let node = tree.and_then(|tree| tree.get(original.node));

        if !redirect && matches!(node.map(CommandNode::node_type), Some(NodeType::Root)) {
            panic!(
                "Unsupported command node '{}': a root node can only be remapped as the tree root",
                path
            );
        }

        if let Some(mapped) = self.visited.get(&original) {
            return *mapped;
        }

        let node = node?;
        if original.tree == self.source.id() && !(self.keep)(node) {
            trace!(command = %path, requirement = %node.requirement(), "excluded");
            self.visited.insert(original, None);
            return None;
        }

        let mapped = self.output.add(node.detached());
        self.visited.insert(original, Some(mapped));
        pending.push((original, mapped, path));
        Some(mapped)
    }

    /// Attaches the remapped children of `original` to `mapped`, then its redirect.
    fn expand(
        &mut self,
        original: NodeRef,
        mapped: NodeId,
        path: &str,
        pending: &mut Vec<(NodeRef, NodeId, String)>,
    ) {
        let Some(node) = self
            .lookup(original.tree)
            .and_then(|tree| tree.get(original.node))
        else {
            return;
        };

        for (name, &child) in &node.children {
            let child = NodeRef {
                tree: original.tree,
                node: child,
            };
            if let Some(child) = self.visit(child, qualify(path, name), false, pending) {
                self.output.attach(mapped, child);
            }
        }

        if let Some(target) = node.redirect() {
            let resolved = self.visit(target, format!("{} ->", path), true, pending);
            if resolved.is_none() {
                debug!(command = path, "dropping unresolvable redirect");
            }
            let reference = resolved.map(|id| self.output.reference(id));
            self.output.set_redirect(mapped, reference);
        }
    }
}

/// Overlays `commands` of `source` onto `destination`.
///
/// Destination commands sharing a name with any of `commands` are dropped,
/// whether or not `keep` later excludes the source command.
pub fn merge<F>(
    destination: &CommandTree,
    source: &CommandTree,
    commands: &[NodeId],
    prefix: &str,
    keep: F,
) -> CommandTree
where
    F: FnMut(&CommandNode) -> bool,
{
    let superseded: Vec<&str> = commands
        .iter()
        .filter_map(|&id| source.get(id))
        .map(CommandNode::name)
        .collect();

    let mut walker = TreeWalker::new(destination, source, keep);
    walker.prune(&superseded, prefix);
    walker.graft(commands, prefix);
    walker.finish()
}

/// Overlays every top-level command of `source` onto `destination`.
pub fn merge_all<F>(destination: &CommandTree, source: &CommandTree, keep: F) -> CommandTree
where
    F: FnMut(&CommandNode) -> bool,
{
    let commands: Vec<NodeId> = source.children(source.root()).collect();
    merge(destination, source, &commands, "", keep)
}

/// Copy of `tree` without the top-level commands in `names`.
pub fn truncate(tree: &CommandTree, names: &[&str]) -> CommandTree {
    let empty = CommandTree::new();
    let mut walker = TreeWalker::new(tree, &empty, |_: &CommandNode| true);
    walker.prune(names, "");
    walker.finish()
}
