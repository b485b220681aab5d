//! OPTGEN - Rewrite-Rule Definition Language Compiler
//!
//! This crate parses `.opt` definition files describing the node types
//! (`define` statements) and rewrite rules of a relational-expression tree,
//! validates them, and compiles them into the representation a matching and
//! construction engine consumes.
//!
//! Architecture:
//! ```text
//! Source (.opt files)
//!     ↓
//! Lexer (tokens, comments kept as trivia)
//!     ↓
//! Parser (statements, recovery at statement boundaries)
//!     ↓
//! Validator (define table, field placement, shape tags)
//!     ↓
//! Rule Compiler (name resolution, bind/ref scoping)
//!     ↓
//! Root  or  Diagnostics
//!     ↓
//! Canonical / Source Printers
//! ```
//!
//! ```
//! use optgen_lang::{compile, printer::{format, FormatOptions}};
//!
//! let root = compile("test.opt", "define Not { Input Expr }\n").unwrap();
//! assert!(format(&root, &FormatOptions::default()).starts_with("(Root"));
//! ```

pub mod compiler;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod expr;
pub mod lexer;
pub mod parser;
pub mod printer;

// Re-export key types for convenience
pub use compiler::{compile, compile_files, Compiler};
pub use config::CompileConfig;
pub use diagnostics::{Diagnostic, Diagnostics, Severity, DEFAULT_MAX_ERRORS};
pub use error::{CompileError, ErrorCategory};
pub use expr::{Node, NodeKind, NodeShape, Root};
pub use lexer::{Lexer, SourcePos, Token, TokenKind};
pub use parser::{parse_file, ParsedFile};
pub use printer::{format, round_trip, to_source, FormatOptions};
