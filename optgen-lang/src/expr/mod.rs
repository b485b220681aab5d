//! Compiled node model.
//!
//! Every compiled node has one of three shapes:
//!
//! ```text
//! Ref    identity node with named fields     (Define Name="Not" ...)
//! Value  wrapped primitive, compared by value  "Not"  NotOp  42
//! Slice  ordered homogeneous sequence        (OpNames NotOp NeOp)
//! ```
//!
//! The shape is a property of the [`NodeKind`], so consumers such as the
//! canonical printer are written once against the [`Node`] trait and
//! dispatch on [`NodeKind::shape`].

pub mod nodes;

pub use nodes::*;

use crate::lexer::SourcePos;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// Structural category of a compiled node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NodeShape {
    Ref,
    Value,
    Slice,
}

/// Closed list of compiled node types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum NodeKind {
    Root,
    DefineSet,
    Define,
    DefineFields,
    DefineField,
    Tags,
    Tag,
    RuleSet,
    Rule,
    Match,
    OpNames,
    OpName,
    MatchArgs,
    MatchAnd,
    MatchNot,
    MatchAny,
    MatchList,
    MatchInvoke,
    Bind,
    Ref,
    Construct,
    ConstructArgs,
    ConstructList,
    String,
    Number,
}

impl NodeKind {
    pub const ALL: [NodeKind; 25] = [
        NodeKind::Root,
        NodeKind::DefineSet,
        NodeKind::Define,
        NodeKind::DefineFields,
        NodeKind::DefineField,
        NodeKind::Tags,
        NodeKind::Tag,
        NodeKind::RuleSet,
        NodeKind::Rule,
        NodeKind::Match,
        NodeKind::OpNames,
        NodeKind::OpName,
        NodeKind::MatchArgs,
        NodeKind::MatchAnd,
        NodeKind::MatchNot,
        NodeKind::MatchAny,
        NodeKind::MatchList,
        NodeKind::MatchInvoke,
        NodeKind::Bind,
        NodeKind::Ref,
        NodeKind::Construct,
        NodeKind::ConstructArgs,
        NodeKind::ConstructList,
        NodeKind::String,
        NodeKind::Number,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::DefineSet => "DefineSet",
            NodeKind::Define => "Define",
            NodeKind::DefineFields => "DefineFields",
            NodeKind::DefineField => "DefineField",
            NodeKind::Tags => "Tags",
            NodeKind::Tag => "Tag",
            NodeKind::RuleSet => "RuleSet",
            NodeKind::Rule => "Rule",
            NodeKind::Match => "Match",
            NodeKind::OpNames => "OpNames",
            NodeKind::OpName => "OpName",
            NodeKind::MatchArgs => "MatchArgs",
            NodeKind::MatchAnd => "MatchAnd",
            NodeKind::MatchNot => "MatchNot",
            NodeKind::MatchAny => "MatchAny",
            NodeKind::MatchList => "MatchList",
            NodeKind::MatchInvoke => "MatchInvoke",
            NodeKind::Bind => "Bind",
            NodeKind::Ref => "Ref",
            NodeKind::Construct => "Construct",
            NodeKind::ConstructArgs => "ConstructArgs",
            NodeKind::ConstructList => "ConstructList",
            NodeKind::String => "String",
            NodeKind::Number => "Number",
        }
    }

    pub fn shape(self) -> NodeShape {
        match self {
            NodeKind::Tag | NodeKind::OpName | NodeKind::String | NodeKind::Number => {
                NodeShape::Value
            }
            NodeKind::DefineSet
            | NodeKind::DefineFields
            | NodeKind::Tags
            | NodeKind::RuleSet
            | NodeKind::OpNames
            | NodeKind::MatchArgs
            | NodeKind::ConstructArgs => NodeShape::Slice,
            _ => NodeShape::Ref,
        }
    }

    /// Named fields of a Ref-shaped kind, in print order. Empty for the
    /// other shapes.
    pub fn field_names(self) -> &'static [&'static str] {
        match self {
            NodeKind::Root => &["Defines", "Rules"],
            NodeKind::Define => &["Tags", "Name", "Fields"],
            NodeKind::DefineField => &["Name", "Type"],
            NodeKind::Rule => &["Name", "Tags", "Match", "Replace"],
            NodeKind::Match => &["Names", "Args"],
            NodeKind::MatchAnd => &["Left", "Right"],
            NodeKind::MatchNot => &["Input"],
            NodeKind::MatchAny => &[],
            NodeKind::MatchList => &["MatchItem"],
            NodeKind::MatchInvoke => &["FuncName", "Args"],
            NodeKind::Bind => &["Label", "Target"],
            NodeKind::Ref => &["Label"],
            NodeKind::Construct => &["OpName", "Args"],
            NodeKind::ConstructList => &["Items"],
            _ => &[],
        }
    }

    pub fn from_name(name: &str) -> Option<NodeKind> {
        NodeKind::ALL.iter().copied().find(|k| k.name() == name)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Printable payload of a Value-shaped node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal<'a> {
    /// Rendered quoted and escaped.
    Quoted(&'a str),
    /// Rendered as-is.
    Bare(Cow<'a, str>),
}

impl fmt::Display for Literal<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Quoted(s) => f.write_str(&crate::printer::quote(s)),
            Literal::Bare(s) => f.write_str(s),
        }
    }
}

/// Uniform read-only view over compiled nodes.
pub trait Node: fmt::Debug {
    fn kind(&self) -> NodeKind;

    fn child_count(&self) -> usize {
        self.kind().field_names().len()
    }

    fn child(&self, n: usize) -> Option<&dyn Node>;

    /// Field name of child `n`; empty for slice elements.
    fn child_name(&self, n: usize) -> &'static str {
        self.kind().field_names().get(n).copied().unwrap_or("")
    }

    fn value(&self) -> Option<Literal<'_>> {
        None
    }

    fn source(&self) -> Option<&SourcePos> {
        None
    }

    fn shape(&self) -> NodeShape {
        self.kind().shape()
    }
}

impl<T: Node + ?Sized> Node for Box<T> {
    fn kind(&self) -> NodeKind {
        (**self).kind()
    }

    fn child_count(&self) -> usize {
        (**self).child_count()
    }

    fn child(&self, n: usize) -> Option<&dyn Node> {
        (**self).child(n)
    }

    fn child_name(&self, n: usize) -> &'static str {
        (**self).child_name(n)
    }

    fn value(&self) -> Option<Literal<'_>> {
        (**self).value()
    }

    fn source(&self) -> Option<&SourcePos> {
        (**self).source()
    }
}

/// Implement [`Node`] for a Value-shaped newtype.
macro_rules! impl_value_node {
    ($type:ty, $kind:ident, |$this:ident| $literal:expr) => {
        impl $crate::expr::Node for $type {
            fn kind(&self) -> $crate::expr::NodeKind {
                $crate::expr::NodeKind::$kind
            }

            fn child_count(&self) -> usize {
                0
            }

            fn child(&self, _n: usize) -> Option<&dyn $crate::expr::Node> {
                None
            }

            fn value(&self) -> Option<$crate::expr::Literal<'_>> {
                let $this = self;
                Some($literal)
            }
        }
    };
}

/// Implement [`Node`] for a Slice-shaped newtype over `Vec<T>`.
macro_rules! impl_slice_node {
    ($type:ty, $kind:ident) => {
        impl $crate::expr::Node for $type {
            fn kind(&self) -> $crate::expr::NodeKind {
                $crate::expr::NodeKind::$kind
            }

            fn child_count(&self) -> usize {
                self.0.len()
            }

            fn child(&self, n: usize) -> Option<&dyn $crate::expr::Node> {
                self.0.get(n).map(|c| c as &dyn $crate::expr::Node)
            }
        }
    };
}

/// Implement [`Node`] for a Ref-shaped struct. Fields are listed in the
/// order of [`NodeKind::field_names`].
macro_rules! impl_ref_node {
    ($type:ty, $kind:ident, [$($field:ident),*]) => {
        impl $crate::expr::Node for $type {
            fn kind(&self) -> $crate::expr::NodeKind {
                $crate::expr::NodeKind::$kind
            }

            #[allow(unused_variables)]
            fn child(&self, n: usize) -> Option<&dyn $crate::expr::Node> {
                let children: &[&dyn $crate::expr::Node] =
                    &[$(&self.$field as &dyn $crate::expr::Node),*];
                children.get(n).copied()
            }

            fn source(&self) -> Option<&$crate::lexer::SourcePos> {
                self.src.as_ref()
            }
        }
    };
}

pub(crate) use impl_ref_node;
pub(crate) use impl_slice_node;
pub(crate) use impl_value_node;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names_round_trip() {
        for kind in NodeKind::ALL {
            assert_eq!(NodeKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(NodeKind::from_name("Nope"), None);
    }

    #[test]
    fn test_only_ref_kinds_have_fields() {
        for kind in NodeKind::ALL {
            if kind.shape() != NodeShape::Ref {
                assert!(kind.field_names().is_empty(), "{kind}");
            }
        }
        assert_eq!(NodeKind::MatchAny.field_names().len(), 0);
        assert_eq!(NodeKind::Rule.field_names()[2], "Match");
    }

    #[test]
    fn test_literal_display() {
        assert_eq!(Literal::Quoted("a\"b").to_string(), "\"a\\\"b\"");
        assert_eq!(Literal::Bare(Cow::Borrowed("NotOp")).to_string(), "NotOp");
    }
}
