//! Compiled node types

use super::{impl_ref_node, impl_slice_node, impl_value_node, Literal, Node, NodeKind, NodeShape};
use crate::lexer::SourcePos;
use serde::Serialize;
use std::borrow::Cow;

/// Suffix appended to define names when they appear as operator names.
pub const OP_SUFFIX: &str = "Op";

// ============================================================================
// VALUE NODES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Tag(pub String);

/// A resolved operator name. Holds the define name; renders with the
/// `Op` suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct OpName(pub String);

impl OpName {
    pub fn define_name(&self) -> &str {
        &self.0
    }

    pub fn op_name(&self) -> String {
        format!("{}{}", self.0, OP_SUFFIX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct StringExpr(pub String);

impl StringExpr {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NumberExpr(pub i64);

impl_value_node!(Tag, Tag, |this| Literal::Bare(Cow::Borrowed(this.0.as_str())));
impl_value_node!(OpName, OpName, |this| Literal::Bare(Cow::Owned(this.op_name())));
impl_value_node!(StringExpr, String, |this| Literal::Quoted(this.0.as_str()));
impl_value_node!(NumberExpr, Number, |this| Literal::Bare(Cow::Owned(
    this.0.to_string()
)));

// ============================================================================
// SLICE NODES
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DefineSet(pub Vec<Define>);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DefineFields(pub Vec<DefineField>);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Tags(pub Vec<Tag>);

impl Tags {
    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t.0 == tag)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RuleSet(pub Vec<Rule>);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OpNames(pub Vec<OpName>);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchArgs(pub Vec<MatchExpr>);

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConstructArgs(pub Vec<ConstructExpr>);

impl_slice_node!(DefineSet, DefineSet);
impl_slice_node!(DefineFields, DefineFields);
impl_slice_node!(Tags, Tags);
impl_slice_node!(RuleSet, RuleSet);
impl_slice_node!(OpNames, OpNames);
impl_slice_node!(MatchArgs, MatchArgs);
impl_slice_node!(ConstructArgs, ConstructArgs);

// ============================================================================
// DEFINES AND RULES
// ============================================================================

/// The compiled unit: every define and every rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Root {
    pub defines: DefineSet,
    pub rules: RuleSet,
    #[serde(skip)]
    pub src: Option<SourcePos>,
}

impl Root {
    pub fn define(&self, name: &str) -> Option<&Define> {
        self.defines.0.iter().find(|d| d.name.0 == name)
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.0.iter().find(|r| r.name.0 == name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Define {
    pub tags: Tags,
    pub name: StringExpr,
    pub fields: DefineFields,
    pub src: Option<SourcePos>,
}

impl Define {
    /// Shape of the nodes this define describes, from its tags.
    pub fn shape(&self) -> NodeShape {
        if self.tags.contains("Value") {
            NodeShape::Value
        } else if self.tags.contains("Slice") {
            NodeShape::Slice
        } else {
            NodeShape::Ref
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DefineField {
    pub name: StringExpr,
    pub typ: StringExpr,
    pub src: Option<SourcePos>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rule {
    pub name: StringExpr,
    pub tags: Tags,
    pub pattern: MatchExpr,
    pub replace: ConstructExpr,
    pub src: Option<SourcePos>,
}

impl_ref_node!(Root, Root, [defines, rules]);
impl_ref_node!(Define, Define, [tags, name, fields]);
impl_ref_node!(DefineField, DefineField, [name, typ]);
impl_ref_node!(Rule, Rule, [name, tags, pattern, replace]);

// ============================================================================
// MATCH EXPRESSIONS
// ============================================================================

/// Operator match: the node's operator is one of `names` and its children
/// match `args` positionally.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    pub names: OpNames,
    pub args: MatchArgs,
    pub src: Option<SourcePos>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchAnd {
    pub left: Box<MatchExpr>,
    pub right: Box<MatchExpr>,
    pub src: Option<SourcePos>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchNot {
    pub input: Box<MatchExpr>,
    pub src: Option<SourcePos>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchAny {
    pub src: Option<SourcePos>,
}

/// Matches a list containing at least one item that matches `item`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchList {
    pub item: Box<MatchExpr>,
    pub src: Option<SourcePos>,
}

/// Call to an externally defined predicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchInvoke {
    pub func_name: StringExpr,
    pub args: MatchArgs,
    pub src: Option<SourcePos>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bind {
    pub label: StringExpr,
    pub target: Box<MatchExpr>,
    pub src: Option<SourcePos>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ref {
    pub label: StringExpr,
    pub src: Option<SourcePos>,
}

impl_ref_node!(Match, Match, [names, args]);
impl_ref_node!(MatchAnd, MatchAnd, [left, right]);
impl_ref_node!(MatchNot, MatchNot, [input]);
impl_ref_node!(MatchAny, MatchAny, []);
impl_ref_node!(MatchList, MatchList, [item]);
impl_ref_node!(MatchInvoke, MatchInvoke, [func_name, args]);
impl_ref_node!(Bind, Bind, [label, target]);
impl_ref_node!(Ref, Ref, [label]);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MatchExpr {
    Match(Match),
    And(MatchAnd),
    Not(MatchNot),
    Any(MatchAny),
    List(MatchList),
    Invoke(MatchInvoke),
    Bind(Bind),
    Ref(Ref),
    String(StringExpr),
    Number(NumberExpr),
}

impl MatchExpr {
    fn as_node(&self) -> &dyn Node {
        match self {
            MatchExpr::Match(e) => e,
            MatchExpr::And(e) => e,
            MatchExpr::Not(e) => e,
            MatchExpr::Any(e) => e,
            MatchExpr::List(e) => e,
            MatchExpr::Invoke(e) => e,
            MatchExpr::Bind(e) => e,
            MatchExpr::Ref(e) => e,
            MatchExpr::String(e) => e,
            MatchExpr::Number(e) => e,
        }
    }
}

// ============================================================================
// CONSTRUCT EXPRESSIONS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Construct {
    pub op_name: OpName,
    pub args: ConstructArgs,
    pub src: Option<SourcePos>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstructList {
    pub items: ConstructArgs,
    pub src: Option<SourcePos>,
}

impl_ref_node!(Construct, Construct, [op_name, args]);
impl_ref_node!(ConstructList, ConstructList, [items]);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ConstructExpr {
    Construct(Construct),
    List(ConstructList),
    Ref(Ref),
    String(StringExpr),
    Number(NumberExpr),
}

impl ConstructExpr {
    fn as_node(&self) -> &dyn Node {
        match self {
            ConstructExpr::Construct(e) => e,
            ConstructExpr::List(e) => e,
            ConstructExpr::Ref(e) => e,
            ConstructExpr::String(e) => e,
            ConstructExpr::Number(e) => e,
        }
    }
}

macro_rules! impl_enum_node {
    ($type:ty) => {
        impl Node for $type {
            fn kind(&self) -> NodeKind {
                self.as_node().kind()
            }

            fn child_count(&self) -> usize {
                self.as_node().child_count()
            }

            fn child(&self, n: usize) -> Option<&dyn Node> {
                self.as_node().child(n)
            }

            fn child_name(&self, n: usize) -> &'static str {
                self.as_node().child_name(n)
            }

            fn value(&self) -> Option<Literal<'_>> {
                self.as_node().value()
            }

            fn source(&self) -> Option<&SourcePos> {
                self.as_node().source()
            }
        }
    };
}

impl_enum_node!(MatchExpr);
impl_enum_node!(ConstructExpr);

#[cfg(test)]
mod tests {
    use super::*;

    fn pos() -> Option<SourcePos> {
        Some(SourcePos::new("test.opt", 1, 1))
    }

    #[test]
    fn test_op_name_suffix() {
        let name = OpName("Not".to_string());
        assert_eq!(name.value(), Some(Literal::Bare(Cow::Owned("NotOp".to_string()))));
        assert_eq!(name.define_name(), "Not");
    }

    #[test]
    fn test_ref_node_children() {
        let bind = Bind {
            label: StringExpr("input".to_string()),
            target: Box::new(MatchExpr::Any(MatchAny { src: pos() })),
            src: pos(),
        };
        assert_eq!(bind.kind(), NodeKind::Bind);
        assert_eq!(bind.child_count(), 2);
        assert_eq!(bind.child_name(0), "Label");
        assert_eq!(bind.child(0).map(|c| c.kind()), Some(NodeKind::String));
        assert_eq!(bind.child(1).map(|c| c.kind()), Some(NodeKind::MatchAny));
        assert!(bind.child(2).is_none());
        assert!(bind.source().is_some());
    }

    #[test]
    fn test_enum_delegates_to_variant() {
        let expr = MatchExpr::Number(NumberExpr(5));
        assert_eq!(expr.kind(), NodeKind::Number);
        assert_eq!(expr.shape(), NodeShape::Value);
        assert_eq!(expr.value().map(|v| v.to_string()), Some("5".to_string()));
    }

    #[test]
    fn test_slice_children_have_no_names() {
        let names = OpNames(vec![OpName("Eq".to_string()), OpName("Ne".to_string())]);
        assert_eq!(names.child_count(), 2);
        assert_eq!(names.child_name(1), "");
        assert_eq!(
            names.child(1).and_then(|c| c.value()).map(|v| v.to_string()),
            Some("NeOp".to_string())
        );
    }

    #[test]
    fn test_define_shape_from_tags() {
        let define = Define {
            tags: Tags(vec![Tag("Slice".to_string())]),
            name: StringExpr("OpNames".to_string()),
            fields: DefineFields::default(),
            src: None,
        };
        assert_eq!(define.shape(), NodeShape::Slice);
    }
}
