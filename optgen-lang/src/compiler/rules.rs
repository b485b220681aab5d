//! Rule compilation: name resolution and bind/ref scoping

use super::validator::DefineTable;
use crate::diagnostics::Diagnostics;
use crate::error::CompileError;
use crate::expr::*;
use crate::lexer::SourcePos;
use crate::parser::ast::{Name, Pattern, Replace, RuleStmt};
use std::collections::HashSet;

/// Compiles rule statements against a complete define table.
pub struct RuleCompiler<'a> {
    table: &'a DefineTable,
    diagnostics: &'a mut Diagnostics,
    /// Labels bound so far in the current rule.
    bound: HashSet<String>,
}

impl<'a> RuleCompiler<'a> {
    pub fn new(table: &'a DefineTable, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            table,
            diagnostics,
            bound: HashSet::new(),
        }
    }

    /// Compile every rule in declaration order. Rules with a duplicate name
    /// are still checked but left out of the result.
    pub fn compile(&mut self, rules: &[RuleStmt]) -> RuleSet {
        let mut names = HashSet::new();
        let mut compiled = Vec::with_capacity(rules.len());

        for rule in rules {
            let unique = names.insert(rule.name.text.as_str());
            if !unique {
                self.diagnostics.error(
                    rule.pos.clone(),
                    CompileError::DuplicateRule {
                        name: rule.name.text.clone(),
                    },
                );
            }

            let rule = self.compile_rule(rule);
            if unique {
                compiled.push(rule);
            }
        }

        RuleSet(compiled)
    }

    fn compile_rule(&mut self, rule: &RuleStmt) -> Rule {
        self.bound.clear();
        // The root of a rule must match operators, never a predicate.
        let pattern = match &rule.pattern {
            Pattern::Func { names, args, pos } => self.compile_operators(names, args, pos),
            other => self.compile_match(other),
        };
        let replace = self.compile_construct(&rule.replace);

        Rule {
            name: StringExpr(rule.name.text.clone()),
            tags: Tags(rule.tags.iter().map(|t| Tag(t.text.clone())).collect()),
            pattern,
            replace,
            src: Some(rule.pos.clone()),
        }
    }

    fn compile_match(&mut self, pattern: &Pattern) -> MatchExpr {
        match pattern {
            Pattern::Func { names, args, pos } => self.compile_func(names, args, pos),
            Pattern::And { left, right, pos } => MatchExpr::And(MatchAnd {
                left: Box::new(self.compile_match(left)),
                right: Box::new(self.compile_match(right)),
                src: Some(pos.clone()),
            }),
            Pattern::Not { input, pos } => MatchExpr::Not(MatchNot {
                input: Box::new(self.compile_match(input)),
                src: Some(pos.clone()),
            }),
            Pattern::Any { pos } => MatchExpr::Any(MatchAny {
                src: Some(pos.clone()),
            }),
            Pattern::List { item, pos } => MatchExpr::List(MatchList {
                item: Box::new(self.compile_match(item)),
                src: Some(pos.clone()),
            }),
            Pattern::Bind { label, target, pos } => {
                let target = self.compile_match(target);
                if !self.bound.insert(label.text.clone()) {
                    self.diagnostics.error(
                        pos.clone(),
                        CompileError::DuplicateBind {
                            label: label.text.clone(),
                        },
                    );
                }
                MatchExpr::Bind(Bind {
                    label: StringExpr(label.text.clone()),
                    target: Box::new(target),
                    src: Some(pos.clone()),
                })
            }
            Pattern::Ref { label, pos } => MatchExpr::Ref(self.compile_ref(label, pos)),
            Pattern::String { value, .. } => MatchExpr::String(StringExpr(value.clone())),
            Pattern::Number { value, .. } => MatchExpr::Number(NumberExpr(*value)),
        }
    }

    /// A function pattern is an operator match when its names resolve to
    /// defines. A single unknown name is an external predicate.
    fn compile_func(&mut self, names: &[Name], args: &[Pattern], pos: &SourcePos) -> MatchExpr {
        if let [name] = names {
            if self.table.resolve(&name.text).is_none() {
                let args = args.iter().map(|a| self.compile_match(a)).collect();
                return MatchExpr::Invoke(MatchInvoke {
                    func_name: StringExpr(name.text.clone()),
                    args: MatchArgs(args),
                    src: Some(pos.clone()),
                });
            }
        }

        self.compile_operators(names, args, pos)
    }

    /// Resolve every name to operators, reporting those that are neither
    /// defines nor tags.
    fn compile_operators(
        &mut self,
        names: &[Name],
        args: &[Pattern],
        pos: &SourcePos,
    ) -> MatchExpr {
        let mut op_names: Vec<OpName> = Vec::new();
        for name in names {
            match self.table.resolve(&name.text) {
                Some(resolved) => {
                    for op in resolved {
                        if !op_names.contains(&op) {
                            op_names.push(op);
                        }
                    }
                }
                None => self.diagnostics.error(
                    name.pos.clone(),
                    CompileError::UnrecognizedMatchName {
                        name: name.text.clone(),
                    },
                ),
            }
        }

        let args = args.iter().map(|a| self.compile_match(a)).collect();
        MatchExpr::Match(Match {
            names: OpNames(op_names),
            args: MatchArgs(args),
            src: Some(pos.clone()),
        })
    }

    fn compile_construct(&mut self, replace: &Replace) -> ConstructExpr {
        match replace {
            Replace::Construct { name, args, pos } => {
                if !self.table.contains(&name.text) {
                    self.diagnostics.error(
                        name.pos.clone(),
                        CompileError::UnrecognizedConstructName {
                            name: name.text.clone(),
                        },
                    );
                }
                let args = args.iter().map(|a| self.compile_construct(a)).collect();
                ConstructExpr::Construct(Construct {
                    op_name: OpName(name.text.clone()),
                    args: ConstructArgs(args),
                    src: Some(pos.clone()),
                })
            }
            Replace::List { items, pos } => {
                let items = items.iter().map(|i| self.compile_construct(i)).collect();
                ConstructExpr::List(ConstructList {
                    items: ConstructArgs(items),
                    src: Some(pos.clone()),
                })
            }
            Replace::Ref { label, pos } => ConstructExpr::Ref(self.compile_ref(label, pos)),
            Replace::String { value, .. } => ConstructExpr::String(StringExpr(value.clone())),
            Replace::Number { value, .. } => ConstructExpr::Number(NumberExpr(*value)),
        }
    }

    fn compile_ref(&mut self, label: &Name, pos: &SourcePos) -> Ref {
        if !self.bound.contains(&label.text) {
            self.diagnostics.error(
                pos.clone(),
                CompileError::UnrecognizedVariable {
                    label: label.text.clone(),
                },
            );
        }
        Ref {
            label: StringExpr(label.text.clone()),
            src: Some(pos.clone()),
        }
    }
}
