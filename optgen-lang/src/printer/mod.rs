//! Printers for compiled nodes.
//!
//! - [`canonical`]: indented S-expression rendering used by tests and the CLI
//! - [`source`]: renders a compiled `Root` back to `.opt` text

pub mod canonical;
pub mod source;

pub use canonical::{format, FormatOptions};
pub use source::{round_trip, to_source};

/// Escape a string for inclusion between double quotes. Only the escapes
/// the lexer understands are produced.
pub(crate) fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\t', "\\t")
}

/// Quote and escape a string literal.
pub fn quote(s: &str) -> String {
    format!("\"{}\"", escape_string(s))
}
