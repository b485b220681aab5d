//! Optgen Compiler - Transform statements into the compiled `Root`
//!
//! # Pipeline
//!
//! ```text
//! source files → Lexer → Parser → statements ─┬→ Validator (defines) → DefineSet
//!                                              └→ RuleCompiler (rules) → RuleSet
//!                                                          ↓
//!                                        Root  or  Diagnostics (never both)
//! ```
//!
//! Defines are validated before any rule is resolved, so rules may refer to
//! defines declared later or in another file. When a define statement failed
//! to parse the define table is incomplete and rule resolution is skipped.

pub mod rules;
pub mod validator;

pub use rules::RuleCompiler;
pub use validator::{validate, DefineTable};

use crate::diagnostics::Diagnostics;
use crate::expr::Root;
use crate::parser::ast::{DefineStmt, RuleStmt, Statement};
use crate::parser::parse_file;
use tracing::debug;

/// Batch compiler over one or more named sources.
///
/// # Example
///
/// ```
/// use optgen_lang::compiler::Compiler;
///
/// let mut compiler = Compiler::new();
/// compiler.add_source("ops.opt", "define Not { Input Expr }\n");
/// compiler.add_source("rules.opt", "[EliminateNot]\n(Not (Not $x:*)) => $x\n");
/// let root = compiler.finish().unwrap();
/// assert_eq!(root.rules.0.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Compiler {
    defines: Vec<DefineStmt>,
    rules: Vec<RuleStmt>,
    diagnostics: Diagnostics,
    define_failed: bool,
}

impl Compiler {
    /// Create a new compiler instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lex and parse one source, appending its statements after those of
    /// earlier sources.
    pub fn add_source(&mut self, file: &str, source: &str) {
        let parsed = parse_file(file, source);
        debug!(
            file,
            statements = parsed.statements.len(),
            errors = parsed.diagnostics.len(),
            "parsed source"
        );

        for statement in parsed.statements {
            match statement {
                Statement::Define(define) => self.defines.push(define),
                Statement::Rule(rule) => self.rules.push(rule),
            }
        }
        self.diagnostics.append(parsed.diagnostics);
        self.define_failed |= parsed.define_failed;
    }

    /// Validate defines, resolve rules and produce the compiled `Root`.
    pub fn finish(self) -> Result<Root, Diagnostics> {
        let Compiler {
            defines,
            rules,
            mut diagnostics,
            define_failed,
        } = self;

        let (define_set, table) = validate(&defines, &mut diagnostics);
        debug!(defines = define_set.0.len(), errors = diagnostics.len(), "validated defines");

        let rule_set = if define_failed {
            debug!("skipping rule resolution: a define statement failed to parse");
            Default::default()
        } else {
            let rule_set = RuleCompiler::new(&table, &mut diagnostics).compile(&rules);
            debug!(rules = rule_set.0.len(), errors = diagnostics.len(), "compiled rules");
            rule_set
        };

        if !diagnostics.is_empty() {
            return Err(diagnostics);
        }

        Ok(Root {
            defines: define_set,
            rules: rule_set,
            src: None,
        })
    }
}

/// Compile a single source text.
pub fn compile(file: &str, source: &str) -> Result<Root, Diagnostics> {
    compile_files([(file, source)])
}

/// Compile several named sources as one unit, in the given order.
pub fn compile_files<'a, I>(sources: I) -> Result<Root, Diagnostics>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut compiler = Compiler::new();
    for (file, source) in sources {
        compiler.add_source(file, source);
    }
    compiler.finish()
}
