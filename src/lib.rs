//! Compile pipeline shared by the `cmdtree` binary and its tests.

use cmdtree_core::commands::alias::expand_aliases;
use cmdtree_core::commands::link::Linker;
use cmdtree_core::commands::{tree, CommandNode, CommandTree};
use cmdtree_core::config::CompilerConfig;
use cmdtree_core::diagnostics::Logger;
use cmdtree_core::element::Element;
use cmdtree_core::grammar::{CompilationSession, Shapes};
use tracing::debug;

pub struct Compiled<L> {
    pub tree: CommandTree,
    pub logger: L,
}

/// Processes `elements` and links the resulting grammar trees.
pub fn compile<L: Logger>(
    elements: &[Element],
    config: &CompilerConfig,
    linker: &Linker,
    logger: L,
) -> Compiled<L> {
    let mut session = CompilationSession::new(logger).with_shapes(Shapes::from(config));
    session.process(elements);

    let mut tree = linker.link(session.roots());
    if config.expand_aliases {
        let added = expand_aliases(&mut tree);
        debug!(added, "expanded aliases");
    }

    Compiled {
        tree,
        logger: session.into_logger(),
    }
}

/// Merges every command of `source` over `destination`.
pub fn overlay(
    destination: &CommandTree,
    source: &CommandTree,
    config: &CompilerConfig,
) -> CommandTree {
    let prune = config.prune_unusable;
    tree::merge_all(destination, source, |node: &CommandNode| {
        !prune || tree::usable(node)
    })
}
