#![allow(dead_code)]

use cmdtree_core::commands::{CommandContext, CommandResult};
use cmdtree_core::element::{Element, Signature, TypeRef};
use cmdtree_core::manifest::Manifest;

pub fn exec_noop(_: &mut CommandContext<'_>) -> CommandResult<i32> {
    Ok(1)
}

pub fn command_method(enclosing: &str, name: &str) -> Element {
    Element::method(
        enclosing,
        name,
        Signature::new(
            vec!["CommandContext<CommandSender>".parse().unwrap()],
            TypeRef::void(),
        ),
    )
}

pub fn requirement_method(enclosing: &str, name: &str) -> Element {
    Element::method(
        enclosing,
        name,
        Signature::new(
            vec!["CommandSender".parse().unwrap()],
            "boolean".parse().unwrap(),
        ),
    )
}

pub fn argument_field(enclosing: &str, name: &str) -> Element {
    Element::field(enclosing, name, "ArgumentType<?>".parse().unwrap())
}

/// `tell|t <players>` with a command handler and an argument type.
pub fn tell() -> Vec<Element> {
    vec![
        Element::ty("Tell").command("tell|t <players>"),
        command_method("Tell", "tell").bind("<players>"),
        argument_field("Tell", "players")
            .initializer("player")
            .bind("<players>"),
    ]
}

pub fn manifest(source: &str) -> Vec<Element> {
    Manifest::from_toml_str(source)
        .unwrap()
        .into_elements()
        .unwrap()
}
