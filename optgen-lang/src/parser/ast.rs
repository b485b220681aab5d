//! AST type definitions

use crate::diagnostics::Diagnostics;
use crate::error::CompileError;
use crate::lexer::{Lexer, SourcePos, Token, TokenKind};
use serde::Serialize;

// ============================================================================
// AST TYPES
// ============================================================================

/// An identifier together with where it was written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Name {
    pub text: String,
    pub pos: SourcePos,
}

impl Name {
    pub fn new(text: impl Into<String>, pos: SourcePos) -> Self {
        Self {
            text: text.into(),
            pos,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }
}

/// A top-level statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Statement {
    Define(DefineStmt),
    Rule(RuleStmt),
}

/// `[Tags] define Name { Field Type ... }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefineStmt {
    pub tags: Vec<Name>,
    pub name: Name,
    pub fields: Vec<FieldStmt>,
    /// Position of the `define` keyword.
    pub pos: SourcePos,
}

impl DefineStmt {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.text == tag)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldStmt {
    pub name: Name,
    pub typ: Name,
    pub pos: SourcePos,
}

/// `[Name, Tags...] (match) => replace`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleStmt {
    pub name: Name,
    pub tags: Vec<Name>,
    pub pattern: Pattern,
    pub replace: Replace,
    /// Position of the opening `[`.
    pub pos: SourcePos,
}

/// Match-side pattern as written. Function patterns are not yet resolved
/// into operator matches or predicate invocations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Pattern {
    Func {
        names: Vec<Name>,
        args: Vec<Pattern>,
        pos: SourcePos,
    },
    And {
        left: Box<Pattern>,
        right: Box<Pattern>,
        pos: SourcePos,
    },
    Not {
        input: Box<Pattern>,
        pos: SourcePos,
    },
    Any {
        pos: SourcePos,
    },
    List {
        item: Box<Pattern>,
        pos: SourcePos,
    },
    Bind {
        label: Name,
        target: Box<Pattern>,
        pos: SourcePos,
    },
    Ref {
        label: Name,
        pos: SourcePos,
    },
    String {
        value: String,
        pos: SourcePos,
    },
    Number {
        value: i64,
        pos: SourcePos,
    },
}

impl Pattern {
    pub fn pos(&self) -> &SourcePos {
        match self {
            Pattern::Func { pos, .. }
            | Pattern::And { pos, .. }
            | Pattern::Not { pos, .. }
            | Pattern::Any { pos }
            | Pattern::List { pos, .. }
            | Pattern::Bind { pos, .. }
            | Pattern::Ref { pos, .. }
            | Pattern::String { pos, .. }
            | Pattern::Number { pos, .. } => pos,
        }
    }
}

/// Replace-side expression as written.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Replace {
    Construct {
        name: Name,
        args: Vec<Replace>,
        pos: SourcePos,
    },
    List {
        items: Vec<Replace>,
        pos: SourcePos,
    },
    Ref {
        label: Name,
        pos: SourcePos,
    },
    String {
        value: String,
        pos: SourcePos,
    },
    Number {
        value: i64,
        pos: SourcePos,
    },
}

/// Result of parsing one source file.
#[derive(Debug, Clone, Default)]
pub struct ParsedFile {
    pub statements: Vec<Statement>,
    pub diagnostics: Diagnostics,
    /// Set when at least one `define` statement was abandoned, which leaves
    /// the define table incomplete.
    pub define_failed: bool,
}

// ============================================================================
// PARSE ERROR
// ============================================================================

/// A syntax error at a single position. The parser turns each one into a
/// diagnostic and resynchronizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub error: CompileError,
    pub line: usize,
    pub column: usize,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.line, self.column, self.error)
    }
}

impl std::error::Error for ParseError {}

// ============================================================================
// PARSER
// ============================================================================

/// Deepest nesting of patterns and replace expressions the parser accepts.
pub const MAX_NESTING: usize = 256;

/// Recursive-descent parser for optgen source files.
pub struct Parser {
    pub(crate) file: String,
    pub(crate) tokens: Vec<Token>,
    pub(crate) pos: usize,
    pub(crate) diagnostics: Diagnostics,
    pub(crate) define_failed: bool,
    /// True once the statement being parsed has seen its `define` keyword.
    pub(crate) in_define: bool,
    /// Current pattern or replace nesting depth.
    pub(crate) depth: usize,
}

impl Parser {
    /// Create a new parser from a token vector. Comment tokens are dropped
    /// and a trailing `Eof` is guaranteed.
    pub fn new(file: impl Into<String>, tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| !t.kind.is_trivia())
            .collect();
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or_default();
            tokens.push(Token {
                kind: TokenKind::Eof,
                span,
            });
        }
        Self {
            file: file.into(),
            tokens,
            pos: 0,
            diagnostics: Diagnostics::new(),
            define_failed: false,
            in_define: false,
            depth: 0,
        }
    }

    /// Parse every statement in the file, recovering after syntax errors.
    pub fn parse(mut self) -> ParsedFile {
        let mut statements = Vec::new();

        while !self.is_at_end() {
            let start = self.pos;
            self.in_define = false;
            self.depth = 0;
            match self.parse_statement() {
                Ok(stmt) => statements.push(stmt),
                Err(err) => {
                    if self.in_define {
                        self.define_failed = true;
                    }
                    let pos = SourcePos::new(self.file.clone(), err.line, err.column);
                    self.diagnostics.error(pos, err.error);
                    if matches!(self.current().kind, TokenKind::Error(_)) {
                        self.advance();
                    }
                    self.synchronize(start);
                }
            }
        }

        tracing::trace!(
            file = %self.file,
            statements = statements.len(),
            errors = self.diagnostics.len(),
            "parsed file"
        );

        ParsedFile {
            statements,
            diagnostics: self.diagnostics,
            define_failed: self.define_failed,
        }
    }
}

/// Lex and parse a single source text.
pub fn parse_file(file: &str, source: &str) -> ParsedFile {
    let tokens = Lexer::new(source).tokenize();
    Parser::new(file, tokens).parse()
}
