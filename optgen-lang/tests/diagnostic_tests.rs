//! Diagnostic tests: message text, positions, ordering, and the error cap.

use optgen_lang::{compile, CompileError, Diagnostics, ErrorCategory};
use optgen_test_utils::assertions::{assert_rendered_lines, assert_summary};
use optgen_test_utils::fixtures::duplicate_defines;

fn compile_err(source: &str) -> Diagnostics {
    match compile("test.opt", source) {
        Ok(root) => panic!("expected diagnostics, compiled {:?}", root),
        Err(diagnostics) => diagnostics,
    }
}

fn messages(source: &str) -> Vec<String> {
    compile_err(source).iter().map(|d| d.to_string()).collect()
}

// ============================================================================
// DEFINE VALIDATION
// ============================================================================

#[test]
fn duplicate_define_reported_at_second_occurrence() {
    assert_eq!(
        messages("define Lt {}\ndefine Lt {}"),
        vec!["test.opt:2:1: duplicate 'Lt' define statement"]
    );
}

#[test]
fn private_field_must_be_last() {
    assert_eq!(
        messages("define Scan {\n    Private ScanPrivate\n    Table Expr\n}\n"),
        vec!["test.opt:2:5: private field 'Private' is not the last field in 'Scan'"]
    );
}

#[test]
fn private_field_reported_once_per_define() {
    let source = "define A {\n    P APrivate\n    Q BPrivate\n    X Expr\n}\n\
                  define B {\n    P BPrivate\n    X Expr\n}\n";
    assert_eq!(
        messages(source),
        vec![
            "test.opt:2:5: private field 'P' is not the last field in 'A'",
            "test.opt:7:5: private field 'P' is not the last field in 'B'",
        ]
    );
}

#[test]
fn list_field_must_be_last_public_field() {
    assert_eq!(
        messages("define Project {\n    Items ExprList\n    Input Expr\n}\n"),
        vec!["test.opt:2:5: list field 'Items' is not the last non-private field in 'Project'"]
    );
}

#[test]
fn two_list_fields_report_the_first() {
    assert_eq!(
        messages("define Values {\n    Rows ExprList\n    Cols ExprList\n}\n"),
        vec!["test.opt:2:5: list field 'Rows' is not the last non-private field in 'Values'"]
    );
}

#[test]
fn list_before_private_is_accepted() {
    let root = compile(
        "test.opt",
        "define Project {\n    Input Expr\n    Items ExprList\n    Private ProjectPrivate\n}\n",
    )
    .expect("list then private field");
    assert_eq!(root.defines.0[0].fields.0.len(), 3);
}

// ============================================================================
// RULE RESOLUTION
// ============================================================================

const NOT: &str = "define Not {\n    Input Expr\n}\n";

#[test]
fn unrecognized_variable_at_dollar() {
    assert_eq!(
        messages(&format!("{}[R]\n(Not $x:*) => $y\n", NOT)),
        vec!["test.opt:5:15: unrecognized variable name 'y'"]
    );
}

#[test]
fn duplicate_bind_label() {
    assert_eq!(
        messages(&format!("{}[R]\n(Not $x:* $x:*) => $x\n", NOT)),
        vec!["test.opt:5:11: duplicate bind label 'x'"]
    );
}

#[test]
fn unrecognized_name_in_alternation() {
    assert_eq!(
        messages(&format!("{}[R]\n(Not | Nope) => (Not)\n", NOT)),
        vec!["test.opt:5:8: unrecognized match name 'Nope'"]
    );
}

#[test]
fn unrecognized_construct_name() {
    assert_eq!(
        messages(&format!("{}[R]\n(Not) => (Gone)\n", NOT)),
        vec!["test.opt:5:11: unrecognized construct name 'Gone'"]
    );
}

#[test]
fn duplicate_rule_at_bracket() {
    assert_eq!(
        messages(&format!("{}[R]\n(Not) => (Not)\n[R]\n(Not) => (Not)\n", NOT)),
        vec!["test.opt:6:1: duplicate 'R' rule"]
    );
}

// ============================================================================
// SYNTAX ERRORS
// ============================================================================

#[test]
fn unterminated_define_reports_end_of_file() {
    assert_eq!(
        messages("define Not { Input Expr\n"),
        vec!["test.opt:2:1: expected define field name, found end of file"]
    );
}

#[test]
fn lexical_errors_are_categorized() {
    let diagnostics = compile_err("define A { X \"abc\n}\n");
    let first = diagnostics.iter().next().expect("one diagnostic");
    assert_eq!(first.error, CompileError::UnterminatedString);
    assert_eq!(first.error.category(), ErrorCategory::Lexical);
}

#[test]
fn deep_nesting_is_reported_not_fatal() {
    let source = format!(
        "{}[R]\n(Not {}*) => (Not)\n",
        NOT,
        "^".repeat(100_000)
    );
    let diagnostics = compile_err(&source);
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics.iter().next().map(|d| d.error.category()),
        Some(ErrorCategory::Syntax)
    );
}

#[test]
fn nesting_below_the_limit_compiles() {
    let depth = 100;
    let source = format!(
        "{}[R]\n(Not {}$x:*{}) => {}$x{}\n",
        NOT,
        "(Not ".repeat(depth),
        ")".repeat(depth),
        "(Not ".repeat(depth),
        ")".repeat(depth)
    );
    let root = compile("test.opt", &source).expect("nesting within the limit");
    let printed = optgen_lang::format(&root, &optgen_lang::FormatOptions::default());
    assert_eq!(printed.matches("(Construct\n").count(), depth);
}

// ============================================================================
// ERROR CAP
// ============================================================================

#[test]
fn cap_shows_first_two_and_summary() {
    let diagnostics = compile_err(&duplicate_defines(5));
    assert_eq!(diagnostics.len(), 5);
    assert_rendered_lines(
        &diagnostics.to_string(),
        &[
            "test.opt:6:1: duplicate 'D0' define statement",
            "test.opt:7:1: duplicate 'D1' define statement",
            "... too many errors (3 more)",
        ],
    );
}

#[test]
fn no_summary_at_exactly_two() {
    let diagnostics = compile_err(&duplicate_defines(2));
    assert_rendered_lines(
        &diagnostics.to_string(),
        &[
            "test.opt:3:1: duplicate 'D0' define statement",
            "test.opt:4:1: duplicate 'D1' define statement",
        ],
    );
}

#[test]
fn custom_cap() {
    let diagnostics = compile_err(&duplicate_defines(4));
    let rendered = diagnostics.render(1);
    assert_eq!(rendered.lines().count(), 2);
    assert_summary(&rendered, 3);

    let all = diagnostics.render(10);
    assert_eq!(all.lines().count(), 4);
    assert!(!all.contains("too many errors"));
}

#[test]
fn discovery_order_across_phases() {
    let source = "define A {}\n)\ndefine A {}\n[R]\n(Missing | A) => (A)\n";
    assert_eq!(
        messages(source),
        vec![
            "test.opt:2:1: expected define or rule statement, found ')'",
            "test.opt:3:1: duplicate 'A' define statement",
            "test.opt:5:2: unrecognized match name 'Missing'",
        ]
    );
}
