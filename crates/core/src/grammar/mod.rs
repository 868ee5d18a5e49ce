//! Compile-time side: lexing `@Command` grammars, building the grammar tree
//! and binding program elements to its nodes.

pub mod binder;
pub mod identity;
pub mod lexer;
pub mod parser;
pub mod session;

pub use binder::{Mismatch, Shapes};
pub use identity::{Identity, Kind, Memoizer, Token};
pub use lexer::{Lexer, LiteralPolicy};
pub use parser::{Binding, Identifier, IdentifierType, Parser};
pub use session::CompilationSession;
