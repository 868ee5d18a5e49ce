mod common;

use cmdtree_core::commands::dump::DumpTree;
use cmdtree_core::commands::tree::{merge, merge_all, usable};
use cmdtree_core::commands::{Command, CommandNode, CommandTree, NodeId, Requirement};
use common::exec_noop;
use proptest::prelude::*;
use proptest::sample::Index;

fn build(nodes: &[(Index, String)], redirects: &[(Index, Index)]) -> CommandTree {
    let mut tree = CommandTree::new();
    let mut ids = vec![tree.root()];
    for (parent, name) in nodes {
        let parent = ids[parent.index(ids.len())];
        let id = tree.insert(
            parent,
            CommandNode::literal(name.as_str()).executes(Command::new(name.as_str(), exec_noop)),
        );
        ids.push(id);
    }
    for (from, to) in redirects {
        let from = ids[from.index(ids.len())];
        if from != tree.root() {
            let to = ids[to.index(ids.len())];
            tree.redirect_to(from, to);
        }
    }
    tree
}

proptest! {
    #[test]
    fn empty_source_preserves_destination(
        nodes in proptest::collection::vec((any::<Index>(), "[a-d]"), 0..24),
        redirects in proptest::collection::vec((any::<Index>(), any::<Index>()), 0..6),
    ) {
        let destination = build(&nodes, &redirects);
        let merged = merge(&destination, &CommandTree::new(), &[], "", usable);
        prop_assert_eq!(merged.dump_to_string(), destination.dump_to_string());
    }

    #[test]
    fn merging_into_empty_copies_source(
        nodes in proptest::collection::vec((any::<Index>(), "[a-d]"), 0..24),
    ) {
        let source = build(&nodes, &[]);
        let merged = merge_all(&CommandTree::new(), &source, usable);
        prop_assert_eq!(merged.dump_to_string(), source.dump_to_string());
    }
}

#[test]
fn source_wins_on_name_collision() {
    let mut destination = CommandTree::new();
    let a = destination.insert(destination.root(), CommandNode::literal("a"));
    destination.insert(a, CommandNode::literal("old"));

    let mut source = CommandTree::new();
    let a = source.insert(source.root(), CommandNode::literal("a"));
    source.insert(a, CommandNode::literal("new"));

    let merged = merge_all(&destination, &source, usable);
    assert!(merged.find(&["a", "new"]).is_some());
    assert!(merged.find(&["a", "old"]).is_none());
}

#[test]
fn redirects_converge_on_one_node() {
    let mut destination = CommandTree::new();
    let target = destination.insert(destination.root(), CommandNode::literal("target"));

    let mut source = CommandTree::new();
    let x = source.insert(source.root(), CommandNode::literal("x"));
    let y = source.insert(source.root(), CommandNode::literal("y"));
    let nested = source.insert(y, CommandNode::literal("nested"));
    let target_ref = destination.reference(target);
    for id in [x, nested] {
        source.set_redirect(id, Some(target_ref));
    }

    let merged = merge_all(&destination, &source, usable);
    let x: NodeId = merged.find(&["x"]).unwrap();
    let nested = merged.find(&["y", "nested"]).unwrap();
    let target = merged.find(&["target"]).unwrap();
    assert_eq!(merged.redirect_target(x), Some(target));
    assert_eq!(merged.redirect_target(nested), Some(target));
}

#[test]
fn excluded_nodes_disappear_from_redirects() {
    let mut source = CommandTree::new();
    let hidden = source.insert(
        source.root(),
        CommandNode::literal("hidden").requires(Requirement::Never),
    );
    let alias = source.insert(source.root(), CommandNode::literal("alias"));
    source.redirect_to(alias, hidden);

    let merged = merge_all(&CommandTree::new(), &source, usable);
    assert!(merged.find(&["hidden"]).is_none());
    let alias = merged.find(&["alias"]).unwrap();
    assert_eq!(merged[alias].redirect(), None);
    assert!(merged.ids().all(|id| merged[id].name() != "hidden"));
}
