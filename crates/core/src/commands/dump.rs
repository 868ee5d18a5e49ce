use super::node::{CommandNode, CommandTree, NodeId, NodeType};
use rustc_hash::FxHashMap;
use std::collections::VecDeque;
use std::fmt;

/// Qualified path of every node reachable from the root through children.
fn node_paths(tree: &CommandTree) -> FxHashMap<NodeId, String> {
    let mut paths = FxHashMap::default();
    let mut queue = VecDeque::new();
    paths.insert(tree.root(), "/".to_string());
    queue.push_back(tree.root());

    while let Some(node) = queue.pop_front() {
        for child in tree.children(node) {
            if paths.contains_key(&child) {
                continue;
            }
            let parent = &paths[&node];
            let name = display_name(&tree[child]);
            let path = if node == tree.root() {
                format!("/{}", name)
            } else {
                format!("{} {}", parent, name)
            };
            paths.insert(child, path);
            queue.push_back(child);
        }
    }
    paths
}

fn display_name(node: &CommandNode) -> String {
    match node.node_type() {
        NodeType::Root => "/".to_string(),
        NodeType::Literal { name, .. } => name.clone(),
        NodeType::Argument { name, .. } => format!("<{}>", name),
    }
}

fn dump_node(
    f: &mut fmt::Formatter<'_>,
    tree: &CommandTree,
    paths: &FxHashMap<NodeId, String>,
    node: &CommandNode,
) -> fmt::Result {
    match node.node_type() {
        NodeType::Root => write!(f, "/")?,
        NodeType::Literal { name, aliases } => {
            write!(f, "{}", name)?;
            if !aliases.is_empty() {
                write!(f, " ({})", aliases.join(", "))?;
            }
        }
        NodeType::Argument {
            name,
            arg_type,
            suggestions,
        } => {
            write!(f, "<{}: {}>", name, arg_type)?;
            if let Some(suggestions) = suggestions {
                write!(f, " suggests={}", suggestions.handler())?;
            }
        }
    }

    if let Some(command) = node.command() {
        write!(f, " run={}", command.handler())?;
    }

    if !matches!(node.requirement(), super::Requirement::Always) {
        write!(f, " requires={}", node.requirement())?;
    }

    if let Some(target) = node.redirect() {
        match tree.resolve(target) {
            Some(id) => match paths.get(&id) {
                Some(path) => write!(f, " -> {}", path)?,
                None => write!(f, " -> (detached {})", display_name(&tree[id]))?,
            },
            None => write!(f, " -> (foreign)")?,
        }
    }

    Ok(())
}

/// Renders a tree as one indented line per node.
pub struct TreeDumper<'a> {
    tree: &'a CommandTree,
}

impl<'a> TreeDumper<'a> {
    pub fn new(tree: &'a CommandTree) -> Self {
        Self { tree }
    }

    /// Recurses once per level, so the call stack grows with the tree depth.
    fn dump_children(
        &self,
        f: &mut fmt::Formatter<'_>,
        paths: &FxHashMap<NodeId, String>,
        node: NodeId,
        ancestors: &mut Vec<NodeId>,
    ) -> fmt::Result {
        ancestors.push(node);
        for child in self.tree.children(node) {
            write!(f, "{:indent$}", "", indent = ancestors.len() * 2)?;
            if ancestors.contains(&child) {
                writeln!(f, "{} (cycle)", display_name(&self.tree[child]))?;
                continue;
            }
            dump_node(f, self.tree, paths, &self.tree[child])?;
            writeln!(f)?;
            self.dump_children(f, paths, child, ancestors)?;
        }
        ancestors.pop();
        Ok(())
    }
}

impl<'a> fmt::Display for TreeDumper<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let paths = node_paths(self.tree);
        let root = self.tree.root();
        dump_node(f, self.tree, &paths, &self.tree[root])?;
        writeln!(f)?;
        self.dump_children(f, &paths, root, &mut Vec::new())
    }
}

pub trait DumpTree {
    fn dump_to_string(&self) -> String;
}

impl DumpTree for CommandTree {
    fn dump_to_string(&self) -> String {
        format!("{}", TreeDumper::new(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{
        argument::ArgumentType,
        context::CommandContext,
        error::CommandResult,
        node::{Command, Requirement, Suggestions},
    };

    fn exec_noop(_: &mut CommandContext<'_>) -> CommandResult<i32> {
        Ok(1)
    }

    #[test]
    fn dump_tree() {
        let mut tree = CommandTree::new();
        let tell = tree.insert(
            tree.root(),
            CommandNode::literal("tell")
                .alias("t")
                .require_permission("tell.use"),
        );
        tree.insert(
            tell,
            CommandNode::argument("players", ArgumentType::player())
                .suggests(Suggestions::unlinked("Tell::online"))
                .executes(Command::new("Tell::tell", exec_noop)),
        );
        let msg = tree.insert(
            tree.root(),
            CommandNode::literal("msg").requires(Requirement::Never),
        );
        tree.redirect_to(msg, tell);

        let expected = "\
/
  tell (t) requires=permission(tell.use)
    <players: player> suggests=Tell::online run=Tell::tell
  msg requires=never -> /tell
";
        assert_eq!(tree.dump_to_string(), expected);
    }

    #[test]
    fn dump_detached_and_foreign_redirects() {
        let foreign = CommandTree::new();
        let mut tree = CommandTree::new();
        let detached = tree.add(CommandNode::literal("gone"));
        let a = tree.insert(tree.root(), CommandNode::literal("a"));
        let b = tree.insert(tree.root(), CommandNode::literal("b"));
        tree.redirect_to(a, detached);
        tree.set_redirect(b, Some(foreign.reference(foreign.root())));

        let expected = "\
/
  a -> (detached gone)
  b -> (foreign)
";
        assert_eq!(tree.dump_to_string(), expected);
    }
}
