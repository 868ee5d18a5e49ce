//! Runtime command-node trees and the engine that merges them.

pub mod alias;
pub mod argument;
pub mod context;
pub mod dump;
pub mod error;
pub mod link;
pub mod node;
pub mod registry;
pub mod tree;

pub use argument::ArgumentType;
pub use context::CommandContext;
pub use error::{CommandError, CommandResult};
pub use node::{
    Command, CommandNode, CommandTree, Executor, NodeId, NodeRef, NodeType, Predicate,
    Requirement, Suggester, Suggestions, TreeId,
};
pub use registry::CommandRegistry;

#[derive(Clone, Debug)]
pub enum CommandSender {
    Player {
        name: String,
        permissions: Vec<String>,
    },
    Console,
}

impl CommandSender {
    pub fn player<I, S>(name: impl Into<String>, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CommandSender::Player {
            name: name.into(),
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        match self {
            CommandSender::Player { permissions, .. } => {
                permissions.iter().any(|p| p == permission || p == "*")
            }
            CommandSender::Console => true,
        }
    }
}
