//! Symbol and field validation for define statements

use crate::diagnostics::Diagnostics;
use crate::error::CompileError;
use crate::expr::*;
use crate::parser::ast::{DefineStmt, FieldStmt};
use std::collections::{HashMap, HashSet};

/// Primitive type name of list-typed fields.
pub const LIST_TYPE: &str = "ExprList";

/// Suffix and tag that mark a field as private.
pub const PRIVATE_TAG: &str = "Private";

pub const VALUE_TAG: &str = "Value";
pub const SLICE_TAG: &str = "Slice";

/// Names known to the rule compiler: every define, and for every tag the
/// defines carrying it in declaration order.
#[derive(Debug, Clone, Default)]
pub struct DefineTable {
    defines: HashSet<String>,
    tags: HashMap<String, Vec<String>>,
}

impl DefineTable {
    pub fn contains(&self, name: &str) -> bool {
        self.defines.contains(name)
    }

    /// Defines carrying `tag`, in declaration order.
    pub fn tagged(&self, tag: &str) -> &[String] {
        self.tags.get(tag).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Resolve a match name to operator names: a define resolves to itself,
    /// a tag to every define carrying it.
    pub fn resolve(&self, name: &str) -> Option<Vec<OpName>> {
        if self.contains(name) {
            return Some(vec![OpName(name.to_string())]);
        }
        let tagged = self.tagged(name);
        if tagged.is_empty() {
            None
        } else {
            Some(tagged.iter().map(|n| OpName(n.clone())).collect())
        }
    }

    pub fn len(&self) -> usize {
        self.defines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }

    fn register(&mut self, define: &DefineStmt) -> bool {
        if !self.defines.insert(define.name.text.clone()) {
            return false;
        }
        let mut seen = HashSet::new();
        for tag in &define.tags {
            if seen.insert(tag.text.as_str()) {
                self.tags
                    .entry(tag.text.clone())
                    .or_default()
                    .push(define.name.text.clone());
            }
        }
        true
    }
}

/// Validate defines in declaration order, returning the compiled define
/// set and the lookup table for rule resolution.
pub fn validate(defines: &[DefineStmt], diagnostics: &mut Diagnostics) -> (DefineSet, DefineTable) {
    let private_defines: HashSet<&str> = defines
        .iter()
        .filter(|d| d.has_tag(PRIVATE_TAG))
        .map(|d| d.name.text.as_str())
        .collect();

    let mut table = DefineTable::default();
    let mut compiled = Vec::with_capacity(defines.len());

    for define in defines {
        if !table.register(define) {
            diagnostics.error(
                define.pos.clone(),
                CompileError::DuplicateDefine {
                    name: define.name.text.clone(),
                },
            );
            continue;
        }

        check_shape(define, diagnostics);
        check_fields(define, &private_defines, diagnostics);
        compiled.push(compile_define(define));
    }

    (DefineSet(compiled), table)
}

fn check_shape(define: &DefineStmt, diagnostics: &mut Diagnostics) {
    let is_value = define.has_tag(VALUE_TAG);
    let is_slice = define.has_tag(SLICE_TAG);

    if is_value && is_slice {
        diagnostics.error(
            define.pos.clone(),
            CompileError::ConflictingShape {
                define: define.name.text.clone(),
            },
        );
        return;
    }

    let tag = match (is_value, is_slice) {
        (true, _) => VALUE_TAG,
        (_, true) => SLICE_TAG,
        _ => return,
    };
    if define.fields.len() != 1 {
        diagnostics.error(
            define.pos.clone(),
            CompileError::ShapeFieldCount {
                tag: tag.to_string(),
                define: define.name.text.clone(),
            },
        );
    }
}

fn check_fields(
    define: &DefineStmt,
    private_defines: &HashSet<&str>,
    diagnostics: &mut Diagnostics,
) {
    let is_private = |field: &FieldStmt| {
        let typ = field.typ.text.as_str();
        typ.ends_with(PRIVATE_TAG) || private_defines.contains(typ)
    };

    let last = define.fields.len().saturating_sub(1);
    if let Some((_, field)) = define
        .fields
        .iter()
        .enumerate()
        .find(|(i, f)| is_private(*f) && *i != last)
    {
        diagnostics.error(
            field.pos.clone(),
            CompileError::PrivateFieldNotLast {
                field: field.name.text.clone(),
                define: define.name.text.clone(),
            },
        );
    }

    let last_public = define.fields.iter().rposition(|f| !is_private(f));
    if let Some((_, field)) = define
        .fields
        .iter()
        .enumerate()
        .find(|(i, f)| f.typ.text == LIST_TYPE && Some(*i) != last_public)
    {
        diagnostics.error(
            field.pos.clone(),
            CompileError::ListFieldNotLast {
                field: field.name.text.clone(),
                define: define.name.text.clone(),
            },
        );
    }
}

fn compile_define(define: &DefineStmt) -> Define {
    Define {
        tags: Tags(define.tags.iter().map(|t| Tag(t.text.clone())).collect()),
        name: StringExpr(define.name.text.clone()),
        fields: DefineFields(
            define
                .fields
                .iter()
                .map(|f| DefineField {
                    name: StringExpr(f.name.text.clone()),
                    typ: StringExpr(f.typ.text.clone()),
                    src: Some(f.pos.clone()),
                })
                .collect(),
        ),
        src: Some(define.pos.clone()),
    }
}
