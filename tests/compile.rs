mod common;

use cmdtree::{compile, overlay};
use cmdtree_core::commands::link::Linker;
use cmdtree_core::commands::{ArgumentType, CommandNode, CommandTree, Requirement};
use cmdtree_core::config::CompilerConfig;
use cmdtree_core::diagnostics::{Diagnostics, Logger};
use common::{exec_noop, manifest, requirement_method, tell};

#[test]
fn tell_end_to_end() {
    let config = CompilerConfig::default();
    let linker = Linker::new().executor("Tell::tell", exec_noop);
    let compiled = compile(&tell(), &config, &linker, Diagnostics::new());
    assert!(compiled.logger.is_empty());

    let merged = overlay(&CommandTree::new(), &compiled.tree, &config);
    let root = merged.root();
    assert_eq!(merged.children(root).count(), 1);

    let tell = merged.child(root, "tell").unwrap();
    assert_eq!(merged[tell].aliases(), ["t"]);
    assert_eq!(merged.children(tell).count(), 1);

    let players = merged.child(tell, "players").unwrap();
    assert_eq!(merged[players].argument_type(), Some(&ArgumentType::Player));
    let command = merged[players].command().unwrap();
    assert_eq!(command.handler(), "Tell::tell");
    assert!(command.is_linked());
}

#[test]
fn manifest_end_to_end() {
    let elements = manifest(
        r#"
[[element]]
kind = "type"
name = "Give"
command = ["give <item> <count>"]

[[element]]
kind = "field"
enclosing = "Give"
name = "item"
type = "ArgumentType<String>"
value = "string"
bind = ["<item>"]

[[element]]
kind = "field"
enclosing = "Give"
name = "count"
type = "ArgumentType<Integer>"
value = "integer(1, 64)"
bind = ["<count>"]

[[element]]
kind = "method"
enclosing = "Give"
name = "give"
parameters = ["CommandContext<CommandSender>"]
returns = "int"
bind = ["<count>"]
"#,
    );
    let config = CompilerConfig::default();
    let compiled = compile(&elements, &config, &Linker::new(), Diagnostics::new());
    assert!(compiled.logger.is_empty());

    let count = compiled.tree.find(&["give", "item", "count"]).unwrap();
    assert_eq!(
        compiled.tree[count].argument_type(),
        Some(&ArgumentType::integer(1, 64))
    );
    assert!(!compiled.tree[count].command().unwrap().is_linked());
}

#[test]
fn errors_are_all_reported() {
    let mut elements = tell();
    elements.push(cmdtree_core::element::Element::ty("Broken").command("<first> second"));
    elements.push(cmdtree_core::element::Element::ty("Bad").command("ok <a|b> <>"));

    let compiled = compile(
        &elements,
        &CompilerConfig::default(),
        &Linker::new(),
        Diagnostics::new(),
    );
    let lexemes: Vec<_> = compiled.logger.errors().map(|d| d.lexeme.as_str()).collect();
    assert_eq!(lexemes, ["<first>", "<a|b>", "<>"]);
    assert!(compiled.tree.find(&["tell", "players"]).is_some());
}

#[test]
fn statically_false_commands_are_pruned() {
    let mut elements = tell();
    elements.push(requirement_method("Tell", "never").bind("tell"));
    let linker = Linker::new().requirement("Tell::never", Requirement::Never);

    let mut config = CompilerConfig::default();
    let compiled = compile(&elements, &config, &linker, Diagnostics::new());
    assert!(!compiled.logger.has_errors());
    let merged = overlay(&CommandTree::new(), &compiled.tree, &config);
    assert!(merged.is_empty());

    config.prune_unusable = false;
    let merged = overlay(&CommandTree::new(), &compiled.tree, &config);
    assert!(merged.find(&["tell", "players"]).is_some());
}

#[test]
fn expanded_aliases_survive_merge() {
    let config = CompilerConfig {
        expand_aliases: true,
        ..CompilerConfig::default()
    };
    let compiled = compile(&tell(), &config, &Linker::new(), Diagnostics::new());

    let mut live = CommandTree::new();
    live.insert(live.root(), CommandNode::literal("t"));
    live.insert(live.root(), CommandNode::literal("help"));

    let merged = overlay(&live, &compiled.tree, &config);
    let names: Vec<_> = merged
        .children(merged.root())
        .map(|id| merged[id].name())
        .collect();
    assert_eq!(names, ["help", "tell", "t"]);

    let tell = merged.find(&["tell"]).unwrap();
    let t = merged.find(&["t"]).unwrap();
    assert_eq!(merged.redirect_target(t), Some(tell));
}
