//! Positioned diagnostics collected across every compile phase.

use crate::error::CompileError;
use crate::lexer::SourcePos;
use serde::Serialize;
use std::fmt;

/// Number of diagnostics rendered in full before the summary line.
pub const DEFAULT_MAX_ERRORS: usize = 2;

/// Diagnostic severity. Only errors are produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Error,
}

/// One positioned compile-time message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub pos: SourcePos,
    pub error: CompileError,
}

impl Diagnostic {
    pub fn error(pos: SourcePos, error: CompileError) -> Self {
        Self {
            severity: Severity::Error,
            pos,
            error,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.pos, self.error)
    }
}

/// Diagnostic accumulator, kept in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Record an error at `pos`.
    pub fn error(&mut self, pos: SourcePos, error: CompileError) {
        self.push(Diagnostic::error(pos, error));
    }

    pub fn append(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.items.iter()
    }

    /// Render the first `max` diagnostics, one `file:line:col: message` per
    /// line, followed by a summary line when more remain.
    pub fn render(&self, max: usize) -> String {
        let mut out = String::new();
        for diagnostic in self.items.iter().take(max) {
            out.push_str(&diagnostic.to_string());
            out.push('\n');
        }
        if self.items.len() > max {
            out.push_str(&format!(
                "... too many errors ({} more)\n",
                self.items.len() - max
            ));
        }
        out
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_MAX_ERRORS))
    }
}

impl std::error::Error for Diagnostics {}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
