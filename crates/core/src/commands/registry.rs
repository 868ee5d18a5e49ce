use super::node::{CommandNode, CommandTree, NodeId};
use super::tree;
use tracing::debug;

/// Holds the live command tree.
///
/// Installing replaces the live tree with a merged copy. Callers sharing a
/// registry across threads must serialize installs themselves.
pub struct CommandRegistry {
    tree: CommandTree,
    prune_unusable: bool,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            tree: CommandTree::new(),
            prune_unusable: true,
        }
    }

    /// Keep commands whose requirement can never pass when installing.
    pub fn keep_unusable(mut self) -> Self {
        self.prune_unusable = false;
        self
    }

    pub fn register(&mut self, command: CommandNode) -> NodeId {
        let root = self.tree.root();
        self.tree.insert(root, command)
    }

    pub fn tree(&self) -> &CommandTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut CommandTree {
        &mut self.tree
    }

    /// Merges every top-level command of `source` into the live tree.
    pub fn install(&mut self, source: &CommandTree) {
        let commands: Vec<NodeId> = source.children(source.root()).collect();
        self.install_commands(source, &commands, "");
    }

    pub fn install_commands(&mut self, source: &CommandTree, commands: &[NodeId], prefix: &str) {
        let prune_unusable = self.prune_unusable;
        self.tree = tree::merge(&self.tree, source, commands, prefix, |node: &CommandNode| {
            !prune_unusable || tree::usable(node)
        });
        debug!(
            installed = commands.len(),
            nodes = self.tree.len(),
            "installed commands"
        );
    }

    /// Removes top-level commands by name.
    pub fn uninstall(&mut self, names: &[&str]) {
        self.tree = tree::truncate(&self.tree, names);
    }
}
