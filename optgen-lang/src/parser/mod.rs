//! Parser module for the optgen language

pub mod ast;
pub mod parser;

pub use ast::*;
