//! Diagnostics produced while compiling command grammars.
//!
//! Lexing, parsing and binding never fail fast. Every problem is reported to a
//! [`Logger`] and processing carries on, so one build surfaces all errors.

use std::fmt;
use tracing::{error, warn};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    /// Qualified path of the program element the problem was found on.
    pub location: String,
    pub lexeme: String,
    pub reason: String,
    pub resolution: Option<String>,
}

impl Diagnostic {
    pub fn error(location: &str, lexeme: &str, reason: &str, resolution: Option<&str>) -> Self {
        Self::new(Severity::Error, location, lexeme, reason, resolution)
    }

    pub fn warning(location: &str, lexeme: &str, reason: &str, resolution: Option<&str>) -> Self {
        Self::new(Severity::Warning, location, lexeme, reason, resolution)
    }

    fn new(
        severity: Severity,
        location: &str,
        lexeme: &str,
        reason: &str,
        resolution: Option<&str>,
    ) -> Self {
        Self {
            severity,
            location: location.to_string(),
            lexeme: lexeme.to_string(),
            reason: reason.to_string(),
            resolution: resolution.map(str::to_string),
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: \"{}\" {}", self.location, self.lexeme, self.reason)?;
        if let Some(resolution) = &self.resolution {
            write!(f, ", {}", resolution)?;
        }
        Ok(())
    }
}

/// Sink for compile diagnostics.
pub trait Logger {
    fn report(&mut self, diagnostic: Diagnostic);

    /// Number of error-level diagnostics reported so far.
    fn error_count(&self) -> usize;

    fn error(&mut self, location: &str, lexeme: &str, reason: &str) {
        self.report(Diagnostic::error(location, lexeme, reason, None));
    }

    fn error_with(&mut self, location: &str, lexeme: &str, reason: &str, resolution: &str) {
        self.report(Diagnostic::error(location, lexeme, reason, Some(resolution)));
    }

    fn warn(&mut self, location: &str, lexeme: &str, reason: &str, resolution: &str) {
        self.report(Diagnostic::warning(
            location,
            lexeme,
            reason,
            Some(resolution),
        ));
    }

    fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

impl<L: Logger + ?Sized> Logger for &mut L {
    fn report(&mut self, diagnostic: Diagnostic) {
        (**self).report(diagnostic);
    }

    fn error_count(&self) -> usize {
        (**self).error_count()
    }
}

/// Collects diagnostics in the order they were reported.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().filter(|d| !d.is_error())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Logger for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default)]
pub struct TracingLogger {
    errors: usize,
    warnings: usize,
}

impl TracingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings
    }
}

impl Logger for TracingLogger {
    fn report(&mut self, diagnostic: Diagnostic) {
        let resolution = diagnostic.resolution.as_deref().unwrap_or_default();
        match diagnostic.severity {
            Severity::Error => {
                self.errors += 1;
                error!(
                    location = %diagnostic.location,
                    lexeme = %diagnostic.lexeme,
                    resolution,
                    "{}",
                    diagnostic.reason
                );
            }
            Severity::Warning => {
                self.warnings += 1;
                warn!(
                    location = %diagnostic.location,
                    lexeme = %diagnostic.lexeme,
                    resolution,
                    "{}",
                    diagnostic.reason
                );
            }
        }
    }

    fn error_count(&self) -> usize {
        self.errors
    }
}
