use rustc_hash::FxHashMap;
use std::fmt;
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    Literal,
    Argument,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Literal => write!(f, "literal"),
            Kind::Argument => write!(f, "argument"),
        }
    }
}

/// Interned `(kind, name)` of a grammar symbol.
///
/// Identities are shared through [`Rc`], so two tokens refer to the same
/// symbol exactly when [`Token::shares_identity`] holds.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Identity {
    kind: Kind,
    name: String,
}

impl Identity {
    pub fn kind(&self) -> Kind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[derive(Clone, Debug)]
pub struct Token {
    identity: Rc<Identity>,
    lexeme: String,
    aliases: Vec<String>,
}

impl Token {
    pub fn identity(&self) -> &Rc<Identity> {
        &self.identity
    }

    pub fn kind(&self) -> Kind {
        self.identity.kind
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    /// Source text the token was lexed from.
    pub fn lexeme(&self) -> &str {
        &self.lexeme
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn shares_identity(&self, other: &Token) -> bool {
        Rc::ptr_eq(&self.identity, &other.identity)
    }
}

/// Interns identities for one compilation session.
///
/// The key is `(kind, name)`: a literal and an argument spelled the same are
/// different symbols. Two siblings that collide this way are rejected by the
/// parser.
#[derive(Debug, Default)]
pub struct Memoizer {
    identities: FxHashMap<(Kind, String), Rc<Identity>>,
}

impl Memoizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn argument(&mut self, name: &str, lexeme: &str) -> Token {
        Token {
            identity: self.identity(Kind::Argument, name),
            lexeme: lexeme.to_string(),
            aliases: Vec::new(),
        }
    }

    pub fn literal(&mut self, name: &str, lexeme: &str, aliases: Vec<String>) -> Token {
        Token {
            identity: self.identity(Kind::Literal, name),
            lexeme: lexeme.to_string(),
            aliases,
        }
    }

    fn identity(&mut self, kind: Kind, name: &str) -> Rc<Identity> {
        self.identities
            .entry((kind, name.to_string()))
            .or_insert_with(|| {
                Rc::new(Identity {
                    kind,
                    name: name.to_string(),
                })
            })
            .clone()
    }

    pub fn len(&self) -> usize {
        self.identities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.identities.is_empty()
    }

    pub fn clear(&mut self) {
        self.identities.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_name_shares_identity() {
        let mut memoizer = Memoizer::new();
        let a = memoizer.literal("tell", "tell|t", vec!["t".to_string()]);
        let b = memoizer.literal("tell", "tell", Vec::new());

        assert!(a.shares_identity(&b));
        assert_eq!(a.lexeme(), "tell|t");
        assert_eq!(b.aliases(), &[] as &[String]);
        assert_eq!(memoizer.len(), 1);
    }

    #[test]
    fn kind_is_part_of_the_key() {
        let mut memoizer = Memoizer::new();
        let literal = memoizer.literal("players", "players", Vec::new());
        let argument = memoizer.argument("players", "<players>");

        assert!(!literal.shares_identity(&argument));
        assert_eq!(literal.kind(), Kind::Literal);
        assert_eq!(argument.kind(), Kind::Argument);
        assert_eq!(memoizer.len(), 2);
    }

    #[test]
    fn clear_forgets_identities() {
        let mut memoizer = Memoizer::new();
        let before = memoizer.argument("x", "<x>");
        memoizer.clear();
        let after = memoizer.argument("x", "<x>");

        assert!(!before.shares_identity(&after));
        assert_eq!(before.identity(), after.identity());
    }
}
