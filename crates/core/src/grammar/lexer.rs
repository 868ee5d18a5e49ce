//! Lexer for command grammars such as `tell|t <players>`.
//!
//! Words are separated by whitespace. A word starting with `<` is an argument,
//! anything else is a literal. Malformed words are reported and dropped; the
//! remaining words are still lexed.

use super::identity::{Memoizer, Token};
use crate::diagnostics::Logger;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LiteralPolicy {
    /// `name|alias|alias`
    Aliasable,
    /// Aliases are rejected.
    Single,
}

pub struct Lexer<'a> {
    memoizer: &'a mut Memoizer,
    logger: &'a mut dyn Logger,
    policy: LiteralPolicy,
}

impl<'a> Lexer<'a> {
    pub fn new(memoizer: &'a mut Memoizer, logger: &'a mut dyn Logger) -> Self {
        Self {
            memoizer,
            logger,
            policy: LiteralPolicy::Aliasable,
        }
    }

    pub fn single(memoizer: &'a mut Memoizer, logger: &'a mut dyn Logger) -> Self {
        Self {
            memoizer,
            logger,
            policy: LiteralPolicy::Single,
        }
    }

    pub fn lex(&mut self, location: &str, line: &str) -> Vec<Token> {
        if line.trim().is_empty() {
            self.logger
                .error_with(location, line, "is blank", "a command should not be blank");
            return Vec::new();
        }

        line.split_whitespace()
            .filter_map(|word| {
                if word.starts_with('<') {
                    self.argument(location, word)
                } else {
                    self.literal(location, word)
                }
            })
            .collect()
    }

    pub fn argument(&mut self, location: &str, lexeme: &str) -> Option<Token> {
        if !lexeme.starts_with('<') || !lexeme.ends_with('>') || lexeme.len() < 2 {
            self.logger.error_with(
                location,
                lexeme,
                "is an invalid argument",
                "an argument should be enclosed by \"<\" and \">\"",
            );
            return None;
        }

        if lexeme.contains('|') {
            self.logger.error_with(
                location,
                lexeme,
                "contains \"|\"",
                "an argument should not have aliases",
            );
            return None;
        }

        let name = &lexeme[1..lexeme.len() - 1];
        if name.trim().is_empty() {
            self.logger.error_with(
                location,
                lexeme,
                "is empty",
                "an argument should not be blank",
            );
            return None;
        }

        if name.contains(['<', '>']) {
            self.logger.error_with(
                location,
                lexeme,
                "contains nested \"<\"s or \">\"s",
                "an argument should be enclosed by exactly one \"<\" and \">\"",
            );
            return None;
        }

        Some(self.memoizer.argument(name, lexeme))
    }

    pub fn literal(&mut self, location: &str, lexeme: &str) -> Option<Token> {
        if self.policy == LiteralPolicy::Single && lexeme.contains('|') {
            self.logger.error_with(
                location,
                lexeme,
                "contains \"|\"",
                "aliases are not allowed here",
            );
            return None;
        }

        if lexeme.contains(['<', '>']) {
            self.logger.error_with(
                location,
                lexeme,
                "contains \"<\"s or \">\"s",
                "a literal should not contain \"<\" or \">\"",
            );
            return None;
        }

        let mut segments = lexeme.split('|');
        let name = segments.next().unwrap_or_default();
        if name.trim().is_empty() {
            self.logger.error_with(
                location,
                lexeme,
                "contains a blank name",
                "a literal should not be blank",
            );
            return None;
        }

        let mut aliases: Vec<String> = Vec::new();
        for alias in segments {
            if alias.trim().is_empty() {
                self.logger.error_with(
                    location,
                    lexeme,
                    "contains a blank alias",
                    "an alias should not be blank",
                );
                return None;
            }

            if alias == name {
                self.logger.error_with(
                    location,
                    lexeme,
                    &format!("contains an alias \"{}\" identical to its name", alias),
                    "a literal should not alias itself",
                );
                return None;
            }

            if aliases.iter().any(|existing| existing == alias) {
                self.logger.warn(
                    location,
                    lexeme,
                    &format!("contains a duplicate alias \"{}\"", alias),
                    "the duplicate is ignored",
                );
                continue;
            }

            aliases.push(alias.to_string());
        }

        Some(self.memoizer.literal(name, lexeme, aliases))
    }
}
