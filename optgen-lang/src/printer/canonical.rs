//! Canonical S-expression printer
//!
//! ```text
//! (Define
//! 	Tags=(Tags)
//! 	Name="Not"
//! 	Fields=(DefineFields
//! 		(DefineField Name="Input" Type="Expr")
//! 	)
//! )
//! ```
//!
//! A node prints on one line when all of its children are flat: values,
//! slices holding only values, and field-less nodes. Anything else is split
//! one child per line, indented with tabs.

use crate::expr::{Node, NodeShape};
use serde::Serialize;
use std::fmt::Write;

/// Printer switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FormatOptions {
    /// Append `Src=<file:line:col>` to nodes that carry a position.
    pub positions: bool,
}

impl FormatOptions {
    pub fn with_positions() -> Self {
        Self { positions: true }
    }
}

/// Render `node` and its subtree. The result has no trailing newline.
pub fn format(node: &dyn Node, options: &FormatOptions) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0, options);
    out
}

fn write_node(out: &mut String, node: &dyn Node, indent: usize, options: &FormatOptions) {
    match node.shape() {
        NodeShape::Value => {
            if let Some(value) = node.value() {
                let _ = write!(out, "{}", value);
            }
        }
        NodeShape::Slice => write_slice(out, node, indent, options),
        NodeShape::Ref => write_ref(out, node, indent, options),
    }
}

fn write_slice(out: &mut String, node: &dyn Node, indent: usize, options: &FormatOptions) {
    out.push('(');
    out.push_str(node.kind().name());

    if children(node).all(|c| c.shape() == NodeShape::Value) {
        for child in children(node) {
            out.push(' ');
            write_node(out, child, indent, options);
        }
        out.push(')');
        return;
    }

    for child in children(node) {
        newline(out, indent + 1);
        write_node(out, child, indent + 1, options);
    }
    newline(out, indent);
    out.push(')');
}

fn write_ref(out: &mut String, node: &dyn Node, indent: usize, options: &FormatOptions) {
    out.push('(');
    out.push_str(node.kind().name());

    let src = if options.positions {
        node.source()
    } else {
        None
    };

    if children(node).all(is_flat) {
        for (n, child) in children(node).enumerate() {
            let _ = write!(out, " {}=", node.child_name(n));
            write_node(out, child, indent, options);
        }
        if let Some(src) = src {
            let _ = write!(out, " Src=<{}>", src);
        }
        out.push(')');
        return;
    }

    for (n, child) in children(node).enumerate() {
        newline(out, indent + 1);
        let _ = write!(out, "{}=", node.child_name(n));
        write_node(out, child, indent + 1, options);
    }
    if let Some(src) = src {
        newline(out, indent + 1);
        let _ = write!(out, "Src=<{}>", src);
    }
    newline(out, indent);
    out.push(')');
}

/// True when `node` renders on a single line in every context.
fn is_flat(node: &dyn Node) -> bool {
    match node.shape() {
        NodeShape::Value => true,
        NodeShape::Slice => children(node).all(|c| c.shape() == NodeShape::Value),
        NodeShape::Ref => node.child_count() == 0,
    }
}

fn children(node: &dyn Node) -> impl Iterator<Item = &dyn Node> + '_ {
    (0..node.child_count()).filter_map(move |n| node.child(n))
}

fn newline(out: &mut String, indent: usize) {
    out.push('\n');
    for _ in 0..indent {
        out.push('\t');
    }
}
