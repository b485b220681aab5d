//! Lexer token types

use crate::error::CompileError;
use serde::Serialize;
use std::fmt;

// ============================================================================
// LEXER TYPES
// ============================================================================

/// Token kinds for the optgen language.
///
/// `define` is not a keyword at the lexical level: it is an identifier that
/// the parser recognizes at statement position, so defines and fields may
/// still use it as a name elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TokenKind {
    // Delimiters
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Colon,
    Comma,
    Dollar,
    Arrow,
    Pipe,
    Ampersand,
    Caret,
    Asterisk,
    Ellipses,

    // Literals
    Identifier(String),
    String(String),
    Number(i64),

    // Trivia
    Comment(String),

    // Special
    Eof,
    Error(CompileError),
}

impl TokenKind {
    /// True for tokens the parser never sees.
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment(_))
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::LBrace => f.write_str("'{'"),
            TokenKind::RBrace => f.write_str("'}'"),
            TokenKind::LParen => f.write_str("'('"),
            TokenKind::RParen => f.write_str("')'"),
            TokenKind::LBracket => f.write_str("'['"),
            TokenKind::RBracket => f.write_str("']'"),
            TokenKind::Colon => f.write_str("':'"),
            TokenKind::Comma => f.write_str("','"),
            TokenKind::Dollar => f.write_str("'$'"),
            TokenKind::Arrow => f.write_str("'=>'"),
            TokenKind::Pipe => f.write_str("'|'"),
            TokenKind::Ampersand => f.write_str("'&'"),
            TokenKind::Caret => f.write_str("'^'"),
            TokenKind::Asterisk => f.write_str("'*'"),
            TokenKind::Ellipses => f.write_str("'...'"),
            TokenKind::Identifier(name) => write!(f, "'{}'", name),
            TokenKind::String(_) => f.write_str("string literal"),
            TokenKind::Number(n) => write!(f, "'{}'", n),
            TokenKind::Comment(_) => f.write_str("comment"),
            TokenKind::Eof => f.write_str("end of file"),
            TokenKind::Error(err) => write!(f, "invalid token ({})", err),
        }
    }
}

/// Source location span within a single source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: usize,
    pub column: usize,
}

impl Default for Span {
    fn default() -> Self {
        Self {
            start: 0,
            end: 0,
            line: 1,
            column: 1,
        }
    }
}

impl Span {
    /// Attach a file name, producing the position carried by AST and
    /// compiled nodes.
    pub fn at(&self, file: &str) -> SourcePos {
        SourcePos {
            file: file.to_string(),
            line: self.line,
            col: self.column,
        }
    }
}

/// A token with its kind and source location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// File-qualified source position, rendered as `file:line:col`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SourcePos {
    pub file: String,
    pub line: usize,
    pub col: usize,
}

impl SourcePos {
    pub fn new(file: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            file: file.into(),
            line,
            col,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}
