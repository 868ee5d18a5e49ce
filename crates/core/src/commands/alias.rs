use super::node::{CommandNode, CommandTree, NodeId, NodeType};
use tracing::warn;

/// Materializes literal aliases as sibling literals redirecting to the
/// canonical node, the way clients expect aliases to be declared.
///
/// Returns the number of alias nodes added. An alias whose name is already
/// taken by a sibling is skipped.
pub fn expand_aliases(tree: &mut CommandTree) -> usize {
    let mut added = 0;
    let parents: Vec<NodeId> = tree.ids().collect();
    for parent in parents {
        let children: Vec<NodeId> = tree.children(parent).collect();
        for canonical in children {
            let node = &tree[canonical];
            let NodeType::Literal { name, aliases } = node.node_type() else {
                continue;
            };
            if aliases.is_empty() {
                continue;
            }

            let name = name.clone();
            let aliases = aliases.clone();
            let command = node.command.clone();
            let requirement = node.requirement.clone();

            for alias in aliases {
                if tree.child(parent, &alias).is_some() {
                    warn!(alias = %alias, command = %name, "alias is already taken by a sibling");
                    continue;
                }

                let mut alias_node = CommandNode::literal(alias).requires(requirement.clone());
                alias_node.command = command.clone();
                let id = tree.insert(parent, alias_node);
                tree.redirect_to(id, canonical);
                added += 1;
            }
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::node::Requirement;

    #[test]
    fn aliases_redirect_to_canonical() {
        let mut tree = CommandTree::new();
        let tell = tree.insert(
            tree.root(),
            CommandNode::literal("tell")
                .alias("t")
                .alias("msg")
                .require_permission("tell.use"),
        );

        assert_eq!(expand_aliases(&mut tree), 2);
        for alias in ["t", "msg"] {
            let id = tree.find(&[alias]).unwrap();
            assert_eq!(tree.redirect_target(id), Some(tell));
            assert!(matches!(
                tree[id].requirement(),
                Requirement::Permission(permission) if permission == "tell.use"
            ));
        }
    }

    #[test]
    fn taken_names_are_skipped() {
        let mut tree = CommandTree::new();
        tree.insert(tree.root(), CommandNode::literal("tell").alias("t"));
        let t = tree.insert(tree.root(), CommandNode::literal("t"));

        assert_eq!(expand_aliases(&mut tree), 0);
        assert_eq!(tree.find(&["t"]), Some(t));
        assert_eq!(tree.redirect_target(t), None);
    }
}
