//! Error types for optgen compilation

use serde::Serialize;
use thiserror::Error;

/// Every problem the pipeline can report about its input.
///
/// Errors never abort a compile: each one is wrapped in a positioned
/// [`Diagnostic`](crate::diagnostics::Diagnostic) and collected.
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize)]
pub enum CompileError {
    // Lexical
    #[error("unterminated string literal")]
    UnterminatedString,

    #[error("unrecognized character '{ch}'")]
    UnrecognizedChar { ch: char },

    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String },

    // Syntax
    #[error("expected {expected}, found {found}")]
    Expected { expected: String, found: String },

    #[error("expression nested more than {limit} levels deep")]
    NestingTooDeep { limit: usize },

    // Structural
    #[error("duplicate '{name}' define statement")]
    DuplicateDefine { name: String },

    #[error("private field '{field}' is not the last field in '{define}'")]
    PrivateFieldNotLast { field: String, define: String },

    #[error("list field '{field}' is not the last non-private field in '{define}'")]
    ListFieldNotLast { field: String, define: String },

    #[error("{tag} define '{define}' must have exactly one field")]
    ShapeFieldCount { tag: String, define: String },

    #[error("define '{define}' cannot be both Value and Slice")]
    ConflictingShape { define: String },

    #[error("duplicate '{name}' rule")]
    DuplicateRule { name: String },

    #[error("duplicate bind label '{label}'")]
    DuplicateBind { label: String },

    // Resolution
    #[error("unrecognized match name '{name}'")]
    UnrecognizedMatchName { name: String },

    #[error("unrecognized construct name '{name}'")]
    UnrecognizedConstructName { name: String },

    #[error("unrecognized variable name '{label}'")]
    UnrecognizedVariable { label: String },
}

/// Which pipeline phase an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorCategory {
    Lexical,
    Syntax,
    Structural,
    Resolution,
}

impl CompileError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompileError::UnterminatedString
            | CompileError::UnrecognizedChar { .. }
            | CompileError::InvalidNumber { .. } => ErrorCategory::Lexical,
            CompileError::Expected { .. } | CompileError::NestingTooDeep { .. } => {
                ErrorCategory::Syntax
            }
            CompileError::DuplicateDefine { .. }
            | CompileError::PrivateFieldNotLast { .. }
            | CompileError::ListFieldNotLast { .. }
            | CompileError::ShapeFieldCount { .. }
            | CompileError::ConflictingShape { .. }
            | CompileError::DuplicateRule { .. }
            | CompileError::DuplicateBind { .. } => ErrorCategory::Structural,
            CompileError::UnrecognizedMatchName { .. }
            | CompileError::UnrecognizedConstructName { .. }
            | CompileError::UnrecognizedVariable { .. } => ErrorCategory::Resolution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = CompileError::PrivateFieldNotLast {
            field: "Private".to_string(),
            define: "Scan".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "private field 'Private' is not the last field in 'Scan'"
        );

        let err = CompileError::Expected {
            expected: "'{'".to_string(),
            found: "end of file".to_string(),
        };
        assert_eq!(err.to_string(), "expected '{', found end of file");
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            CompileError::UnterminatedString.category(),
            ErrorCategory::Lexical
        );
        assert_eq!(
            CompileError::DuplicateRule {
                name: "R".to_string()
            }
            .category(),
            ErrorCategory::Structural
        );
        assert_eq!(
            CompileError::UnrecognizedVariable {
                label: "x".to_string()
            }
            .category(),
            ErrorCategory::Resolution
        );
    }
}
