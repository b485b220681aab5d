//! Source printer: compiled `Root` back to `.opt` text.

use super::quote;
use crate::compiler::compile;
use crate::diagnostics::Diagnostics;
use crate::expr::*;

/// Render `root` as optgen source. Compiling the result yields a tree with
/// the same canonical rendering, positions aside.
pub fn to_source(root: &Root) -> String {
    let mut output = String::new();

    for define in &root.defines.0 {
        print_define(&mut output, define);
        output.push('\n');
    }

    for rule in &root.rules.0 {
        print_tags(&mut output, &rule.name.0, &rule.tags);
        output.push_str(&print_match(&rule.pattern));
        output.push_str("\n=> ");
        output.push_str(&print_construct(&rule.replace));
        output.push_str("\n\n");
    }

    output.truncate(output.trim_end().len());
    output.push('\n');
    output
}

/// Compile `source` and print it back (for round-trip testing).
pub fn round_trip(source: &str) -> Result<String, Diagnostics> {
    let root = compile("round_trip.opt", source)?;
    Ok(to_source(&root))
}

fn print_define(output: &mut String, define: &Define) {
    if !define.tags.0.is_empty() {
        let tags: Vec<&str> = define.tags.0.iter().map(|t| t.0.as_str()).collect();
        output.push_str(&format!("[{}]\n", tags.join(", ")));
    }

    if define.fields.0.is_empty() {
        output.push_str(&format!("define {} {{}}\n", define.name.0));
        return;
    }

    output.push_str(&format!("define {} {{\n", define.name.0));
    for field in &define.fields.0 {
        output.push_str(&format!("    {} {}\n", field.name.0, field.typ.0));
    }
    output.push_str("}\n");
}

fn print_tags(output: &mut String, name: &str, tags: &Tags) {
    output.push('[');
    output.push_str(name);
    for tag in &tags.0 {
        output.push_str(", ");
        output.push_str(&tag.0);
    }
    output.push_str("]\n");
}

fn print_match(expr: &MatchExpr) -> String {
    match expr {
        MatchExpr::Match(m) => {
            let names: Vec<&str> = m.names.0.iter().map(OpName::define_name).collect();
            print_call(&names.join(" | "), m.args.0.iter().map(print_match))
        }
        MatchExpr::Invoke(m) => print_call(&m.func_name.0, m.args.0.iter().map(print_match)),
        MatchExpr::And(m) => format!("{} & {}", print_match(&m.left), print_match(&m.right)),
        MatchExpr::Not(m) => format!("^{}", print_match(&m.input)),
        MatchExpr::Any(_) => "*".to_string(),
        MatchExpr::List(m) => format!("[ ... {} ... ]", print_match(&m.item)),
        MatchExpr::Bind(m) => format!("${}:{}", m.label.0, print_match(&m.target)),
        MatchExpr::Ref(m) => format!("${}", m.label.0),
        MatchExpr::String(s) => quote(&s.0),
        MatchExpr::Number(n) => n.0.to_string(),
    }
}

fn print_construct(expr: &ConstructExpr) -> String {
    match expr {
        ConstructExpr::Construct(c) => {
            print_call(c.op_name.define_name(), c.args.0.iter().map(print_construct))
        }
        ConstructExpr::List(c) => {
            let items: Vec<String> = c.items.0.iter().map(print_construct).collect();
            format!("[{}]", items.join(" "))
        }
        ConstructExpr::Ref(r) => format!("${}", r.label.0),
        ConstructExpr::String(s) => quote(&s.0),
        ConstructExpr::Number(n) => n.0.to_string(),
    }
}

fn print_call(head: &str, args: impl Iterator<Item = String>) -> String {
    let mut out = format!("({}", head);
    for arg in args {
        out.push(' ');
        out.push_str(&arg);
    }
    out.push(')');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::printer::{format, FormatOptions};

    const SOURCE: &str = r#"
# Scalar operators
[Scalar, Boolean]
define And {
    Left  ScalarExpr
    Right ScalarExpr
}

[Scalar, Boolean]
define Or {
    Left  ScalarExpr
    Right ScalarExpr
}

define Const {
    Value Datum
}

define Not { Input ScalarExpr }

[SimplifyBoolean, Normalize]
(Boolean $left:(Const) & ^(Not) $right:[ ... "x" ... ]) => (Not (And $left [$right 1 "two"]))

[FoldNot]
(Not (Not $x:*) & (IsConst $x)) => $x
"#;

    #[test]
    fn test_to_source_shape() {
        let printed = round_trip("[T]\ndefine Lt {}\n[R] (Lt) => (Lt)\n").unwrap();
        assert_eq!(printed, "[T]\ndefine Lt {}\n\n[R]\n(Lt)\n=> (Lt)\n");
    }

    #[test]
    fn test_tag_expansion_prints_define_names() {
        let printed = round_trip(SOURCE).unwrap();
        assert!(printed.contains("(And | Or $left:(Const) & ^(Not)"), "{printed}");
        assert!(printed.contains("(IsConst $x)"), "{printed}");
    }

    #[test]
    fn test_round_trip_preserves_canonical_form() {
        let options = FormatOptions::default();
        let first = compile("a.opt", SOURCE).unwrap();
        let printed = to_source(&first);
        let second = compile("b.opt", &printed).unwrap();
        assert_eq!(format(&first, &options), format(&second, &options));
        assert_eq!(round_trip(&printed).unwrap(), printed);
    }
}
