//! End-to-end compilation tests: source text in, canonical tree out.

use optgen_lang::expr::{ConstructExpr, MatchExpr};
use optgen_lang::{compile, compile_files, format, FormatOptions, NodeKind, NodeShape};
use optgen_test_utils::fixtures::{ELIMINATE_NOT, ELIMINATE_NOT_CANONICAL, SCALAR_OPS};

const LANG: &str = include_str!("../lang.opt");

#[test]
fn eliminate_not_canonical_output() {
    let root = compile("test.opt", ELIMINATE_NOT).expect("compile EliminateNot");
    assert_eq!(format(&root, &FormatOptions::default()), ELIMINATE_NOT_CANONICAL);
}

#[test]
fn eliminate_not_structure() {
    let root = compile("test.opt", ELIMINATE_NOT).expect("compile EliminateNot");
    let rule = root.rule("EliminateNot").expect("rule present");

    let MatchExpr::Match(outer) = &rule.pattern else {
        panic!("expected Match, got {:?}", rule.pattern);
    };
    assert_eq!(outer.names.0[0].op_name(), "NotOp");
    let MatchExpr::Match(inner) = &outer.args.0[0] else {
        panic!("expected nested Match, got {:?}", outer.args.0[0]);
    };
    let MatchExpr::Bind(bind) = &inner.args.0[0] else {
        panic!("expected Bind, got {:?}", inner.args.0[0]);
    };
    assert_eq!(bind.label.as_str(), "input");
    assert!(matches!(*bind.target, MatchExpr::Any(_)));

    let ConstructExpr::Ref(reference) = &rule.replace else {
        panic!("expected Ref, got {:?}", rule.replace);
    };
    assert_eq!(reference.label.as_str(), "input");
}

#[test]
fn positions_are_rendered() {
    let root = compile("test.opt", "define Not {\n    Input Expr\n}\n").expect("compile");
    assert_eq!(
        format(&root, &FormatOptions::with_positions()),
        "(Root
\tDefines=(DefineSet
\t\t(Define
\t\t\tTags=(Tags)
\t\t\tName=\"Not\"
\t\t\tFields=(DefineFields
\t\t\t\t(DefineField Name=\"Input\" Type=\"Expr\" Src=<test.opt:2:5>)
\t\t\t)
\t\t\tSrc=<test.opt:1:1>
\t\t)
\t)
\tRules=(RuleSet)
)"
    );
}

#[test]
fn output_is_deterministic() {
    let options = FormatOptions::with_positions();
    let first = format(&compile("ops.opt", SCALAR_OPS).expect("compile"), &options);
    let second = format(&compile("ops.opt", SCALAR_OPS).expect("compile"), &options);
    assert_eq!(first, second);
}

#[test]
fn whitespace_and_comments_do_not_change_output() {
    let spaced = "# leading comment\n\ndefine   Not {\n\n    Input    Expr   # trailing\n}\n\n\n[EliminateNot]\n(Not\n    (Not $input:*))\n    => $input\n";
    let options = FormatOptions::default();
    assert_eq!(
        format(&compile("a.opt", spaced).expect("compile spaced"), &options),
        format(&compile("b.opt", ELIMINATE_NOT).expect("compile compact"), &options)
    );
}

#[test]
fn tags_expand_in_declaration_order() {
    let root = compile("ops.opt", SCALAR_OPS).expect("compile");
    let rule = root.rule("NegateComparison").expect("rule present");
    let MatchExpr::Match(m) = &rule.pattern else {
        panic!("expected Match, got {:?}", rule.pattern);
    };
    let names: Vec<String> = m.names.0.iter().map(|n| n.op_name()).collect();
    assert_eq!(names, vec!["NotOp"]);

    let MatchExpr::And(and) = &m.args.0[0] else {
        panic!("expected MatchAnd, got {:?}", m.args.0[0]);
    };
    let MatchExpr::Bind(bind) = &*and.left else {
        panic!("expected Bind, got {:?}", and.left);
    };
    let MatchExpr::Match(boolean) = &*bind.target else {
        panic!("expected Match, got {:?}", bind.target);
    };
    let names: Vec<String> = boolean.names.0.iter().map(|n| n.op_name()).collect();
    assert_eq!(names, vec!["AndOp", "OrOp", "NotOp"]);
    assert!(matches!(&*and.right, MatchExpr::Not(_)));
}

#[test]
fn rule_tags_are_kept_in_order() {
    let root = compile("ops.opt", SCALAR_OPS).expect("compile");
    let rule = root.rule("SimplifyTrueAnd").expect("rule present");
    assert_eq!(format(&rule.tags, &FormatOptions::default()), "(Tags Normalize)");
}

#[test]
fn multiple_files_compile_as_one_unit() {
    let ops = include_str!("../testdata/ops.opt");
    let rules = include_str!("../testdata/rules.opt");
    let root = compile_files([("ops.opt", ops), ("rules.opt", rules)]).expect("compile");

    assert_eq!(root.defines.0.len(), 2);
    assert_eq!(root.rules.0.len(), 2);
    let rule = root.rule("FoldNotConst").expect("rule present");
    assert_eq!(rule.src.as_ref().map(|p| p.to_string()), Some("rules.opt:4:1".to_string()));
}

#[test]
fn self_hosting_definitions_match_node_kinds() {
    let root = compile("lang.opt", LANG).expect("compile lang.opt");
    assert_eq!(root.defines.0.len(), NodeKind::ALL.len());

    for define in &root.defines.0 {
        let kind = NodeKind::from_name(define.name.as_str())
            .unwrap_or_else(|| panic!("no node kind for define '{}'", define.name.as_str()));
        assert_eq!(define.shape(), kind.shape(), "shape of {}", kind);

        if kind.shape() == NodeShape::Ref {
            let fields: Vec<&str> = define.fields.0.iter().map(|f| f.name.as_str()).collect();
            assert_eq!(fields, kind.field_names(), "fields of {}", kind);
        } else {
            assert_eq!(define.fields.0.len(), 1, "fields of {}", kind);
        }
    }
}

#[test]
fn self_hosting_rules_compile() {
    let root = compile("lang.opt", LANG).expect("compile lang.opt");
    let names: Vec<&str> = root.rules.0.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "FoldDoubleNot",
            "FoldAndAnyRight",
            "FoldAndAnyLeft",
            "DropUnusedLiteralBind"
        ]
    );

    let rule = root.rule("DropUnusedLiteralBind").expect("rule present");
    let rendered = format(&rule.pattern, &FormatOptions::default());
    assert!(rendered.contains("Names=(OpNames StringOp NumberOp)"), "{}", rendered);
    assert!(rendered.contains("(MatchInvoke"), "{}", rendered);
}
