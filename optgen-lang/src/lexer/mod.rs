//! Lexer module for the optgen language

pub mod token;
pub mod scanner;

pub use token::*;
pub use scanner::*;
