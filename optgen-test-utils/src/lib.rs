//! Optgen Test Utilities
//!
//! Shared test infrastructure for the optgen workspace:
//! - Proptest generators producing well-formed `.opt` sources
//! - Source fixtures with their expected compiled rendering
//! - Assertions over rendered diagnostic output
//!
//! The generators work on source text only, so this crate does not depend
//! on the compiler it is used to test.

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for generating optgen sources.

    use proptest::prelude::*;
    use std::fmt::Write;

    /// Tags attached to generated defines. None of them collides with a
    /// generated define name, which always ends in a digit.
    pub const TAGS: [&str; 3] = ["Scalar", "Boolean", "Relational"];

    /// Predicate names used for external invocations.
    pub const PREDICATES: [&str; 3] = ["IsConst", "HasFlag", "CanFold"];

    /// Primitive field types.
    pub const PRIMITIVES: [&str; 4] = ["Expr", "ScalarExpr", "string", "int64"];

    /// A generated source with the names it declares.
    #[derive(Debug, Clone)]
    pub struct GeneratedSource {
        pub text: String,
        pub define_names: Vec<String>,
        pub rule_names: Vec<String>,
    }

    /// Generated define: base name, tag mask and field type choices.
    #[derive(Debug, Clone)]
    pub struct DefineGen {
        pub base: String,
        pub tags: [bool; 3],
        pub fields: Vec<usize>,
    }

    /// Operator reference at the head of a match.
    #[derive(Debug, Clone)]
    pub enum OpGen {
        Define(usize),
        Tag(usize),
        Alternation(Vec<usize>),
    }

    /// Match-side pattern. Define and tag indices are reduced modulo the
    /// number of generated defines when rendered.
    #[derive(Debug, Clone)]
    pub enum PatternGen {
        Any,
        Str(String),
        Num(u32),
        Op(OpGen, Vec<PatternGen>),
        Invoke(usize, Vec<PatternGen>),
        Not(Box<PatternGen>),
        List(Box<PatternGen>),
        Bind(Box<PatternGen>),
        And(Box<PatternGen>, Box<PatternGen>),
    }

    /// Replace-side expression. `Ref` picks one of the labels bound by the
    /// match side, or renders a literal when there is none.
    #[derive(Debug, Clone)]
    pub enum ReplaceGen {
        Str(String),
        Num(u32),
        Ref(usize),
        Construct(usize, Vec<ReplaceGen>),
        List(Vec<ReplaceGen>),
    }

    #[derive(Debug, Clone)]
    pub struct RuleGen {
        pub head: OpGen,
        pub args: Vec<PatternGen>,
        pub replace: ReplaceGen,
        pub tags: [bool; 3],
    }

    /// Generate a capitalized identifier base.
    pub fn arb_base_name() -> impl Strategy<Value = String> {
        "[A-Z][a-z]{0,5}"
    }

    /// Generate string literal contents, including characters that need
    /// escaping.
    pub fn arb_string_value() -> impl Strategy<Value = String> {
        "[a-z \"\\\\]{0,6}"
    }

    pub fn arb_define_gen() -> impl Strategy<Value = DefineGen> {
        (
            arb_base_name(),
            any::<[bool; 3]>(),
            prop::collection::vec(0usize..8, 0..4),
        )
            .prop_map(|(base, tags, fields)| DefineGen { base, tags, fields })
    }

    pub fn arb_op_gen() -> impl Strategy<Value = OpGen> {
        prop_oneof![
            3 => any::<usize>().prop_map(OpGen::Define),
            1 => any::<usize>().prop_map(OpGen::Tag),
            1 => prop::collection::vec(any::<usize>(), 2..4).prop_map(OpGen::Alternation),
        ]
    }

    /// Generate a match pattern tree.
    pub fn arb_pattern() -> impl Strategy<Value = PatternGen> {
        let leaf = prop_oneof![
            3 => Just(PatternGen::Any),
            1 => arb_string_value().prop_map(PatternGen::Str),
            1 => any::<u32>().prop_map(PatternGen::Num),
            2 => arb_op_gen().prop_map(|op| PatternGen::Op(op, Vec::new())),
        ];

        leaf.prop_recursive(4, 24, 3, |inner| {
            prop_oneof![
                (arb_op_gen(), prop::collection::vec(inner.clone(), 0..3))
                    .prop_map(|(op, args)| PatternGen::Op(op, args)),
                (any::<usize>(), prop::collection::vec(inner.clone(), 0..2))
                    .prop_map(|(p, args)| PatternGen::Invoke(p, args)),
                inner.clone().prop_map(|p| PatternGen::Not(Box::new(p))),
                inner.clone().prop_map(|p| PatternGen::List(Box::new(p))),
                inner.clone().prop_map(|p| PatternGen::Bind(Box::new(p))),
                (inner.clone(), inner)
                    .prop_map(|(l, r)| PatternGen::And(Box::new(l), Box::new(r))),
            ]
        })
    }

    /// Generate a replace expression tree.
    pub fn arb_replace() -> impl Strategy<Value = ReplaceGen> {
        let leaf = prop_oneof![
            3 => any::<usize>().prop_map(ReplaceGen::Ref),
            1 => arb_string_value().prop_map(ReplaceGen::Str),
            1 => any::<u32>().prop_map(ReplaceGen::Num),
            1 => any::<usize>().prop_map(|d| ReplaceGen::Construct(d, Vec::new())),
        ];

        leaf.prop_recursive(3, 16, 3, |inner| {
            prop_oneof![
                (any::<usize>(), prop::collection::vec(inner.clone(), 0..3))
                    .prop_map(|(d, args)| ReplaceGen::Construct(d, args)),
                prop::collection::vec(inner, 0..3).prop_map(ReplaceGen::List),
            ]
        })
    }

    pub fn arb_rule_gen() -> impl Strategy<Value = RuleGen> {
        (
            arb_op_gen(),
            prop::collection::vec(arb_pattern(), 0..3),
            arb_replace(),
            any::<[bool; 3]>(),
        )
            .prop_map(|(head, args, replace, tags)| RuleGen {
                head,
                args,
                replace,
                tags,
            })
    }

    /// Generate a complete, valid source: unique defines, then unique rules
    /// whose names, binds and refs all resolve.
    pub fn arb_source() -> impl Strategy<Value = GeneratedSource> {
        (
            prop::collection::vec(arb_define_gen(), 1..6),
            prop::collection::vec(arb_rule_gen(), 0..5),
        )
            .prop_map(|(defines, rules)| render_source(&defines, &rules))
    }

    /// Render generated declarations as source text.
    pub fn render_source(defines: &[DefineGen], rules: &[RuleGen]) -> GeneratedSource {
        let define_names: Vec<String> = defines
            .iter()
            .enumerate()
            .map(|(i, d)| format!("{}{}", d.base, i))
            .collect();

        let used_tags: Vec<&str> = TAGS
            .iter()
            .enumerate()
            .filter(|(t, _)| defines.iter().any(|d| d.tags[*t]))
            .map(|(_, tag)| *tag)
            .collect();

        let mut text = String::from("# generated\n\n");
        for (define, name) in defines.iter().zip(&define_names) {
            render_tags(&mut text, None, &define.tags);
            let _ = write!(text, "define {} {{", name);
            for (j, typ) in define.fields.iter().enumerate() {
                let typ = if *typ < PRIMITIVES.len() {
                    PRIMITIVES[*typ]
                } else {
                    define_names[*typ % define_names.len()].as_str()
                };
                let _ = write!(text, "\n    F{} {}", j, typ);
            }
            if define.fields.is_empty() {
                text.push_str("}\n\n");
            } else {
                text.push_str("\n}\n\n");
            }
        }

        let mut rule_names = Vec::new();
        for (i, rule) in rules.iter().enumerate() {
            let name = format!("Rule{}", i);
            let mut ctx = RenderContext {
                defines: &define_names,
                tags: &used_tags,
                labels: Vec::new(),
            };

            render_tags(&mut text, Some(&name), &rule.tags);
            let mut pattern = format!("({}", ctx.op(&rule.head));
            for arg in &rule.args {
                pattern.push(' ');
                pattern.push_str(&ctx.arg(arg));
            }
            pattern.push(')');
            let replace = ctx.replace(&rule.replace);
            let _ = write!(text, "{}\n=> {}\n\n", pattern, replace);
            rule_names.push(name);
        }

        GeneratedSource {
            text,
            define_names,
            rule_names,
        }
    }

    fn render_tags(text: &mut String, name: Option<&str>, mask: &[bool; 3]) {
        let mut items: Vec<&str> = name.into_iter().collect();
        items.extend(TAGS.iter().zip(mask).filter(|(_, on)| **on).map(|(t, _)| *t));
        if !items.is_empty() {
            let _ = writeln!(text, "[{}]", items.join(", "));
        }
    }

    fn quote(s: &str) -> String {
        format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
    }

    struct RenderContext<'a> {
        defines: &'a [String],
        tags: &'a [&'a str],
        labels: Vec<String>,
    }

    impl RenderContext<'_> {
        fn define(&self, n: usize) -> &str {
            &self.defines[n % self.defines.len()]
        }

        fn op(&self, op: &OpGen) -> String {
            match op {
                OpGen::Define(n) => self.define(*n).to_string(),
                OpGen::Tag(n) if !self.tags.is_empty() => self.tags[n % self.tags.len()].to_string(),
                OpGen::Tag(n) => self.define(*n).to_string(),
                OpGen::Alternation(ns) => ns
                    .iter()
                    .map(|n| self.define(*n))
                    .collect::<Vec<_>>()
                    .join(" | "),
            }
        }

        /// Argument position: the only place a conjunction may appear.
        fn arg(&mut self, p: &PatternGen) -> String {
            match p {
                PatternGen::And(l, r) => {
                    let l = self.unary(l);
                    let r = self.unary(r);
                    format!("{} & {}", l, r)
                }
                other => self.unary(other),
            }
        }

        /// Unary position. A conjunction here collapses to its left operand.
        fn unary(&mut self, p: &PatternGen) -> String {
            match p {
                PatternGen::Any => "*".to_string(),
                PatternGen::Str(s) => quote(s),
                PatternGen::Num(n) => n.to_string(),
                PatternGen::Op(op, args) => {
                    let mut out = format!("({}", self.op(op));
                    for a in args {
                        out.push(' ');
                        out.push_str(&self.arg(a));
                    }
                    out.push(')');
                    out
                }
                PatternGen::Invoke(n, args) => {
                    let mut out = format!("({}", PREDICATES[n % PREDICATES.len()]);
                    for a in args {
                        out.push(' ');
                        out.push_str(&self.arg(a));
                    }
                    out.push(')');
                    out
                }
                PatternGen::Not(inner) => format!("^{}", self.unary(inner)),
                PatternGen::List(inner) => format!("[ ... {} ... ]", self.arg(inner)),
                PatternGen::Bind(inner) => {
                    let target = self.unary(inner);
                    let label = format!("v{}", self.labels.len());
                    self.labels.push(label.clone());
                    format!("${}:{}", label, target)
                }
                PatternGen::And(l, _) => self.unary(l),
            }
        }

        fn replace(&self, r: &ReplaceGen) -> String {
            match r {
                ReplaceGen::Str(s) => quote(s),
                ReplaceGen::Num(n) => n.to_string(),
                ReplaceGen::Ref(n) if !self.labels.is_empty() => {
                    format!("${}", self.labels[n % self.labels.len()])
                }
                ReplaceGen::Ref(n) => (n % 1000).to_string(),
                ReplaceGen::Construct(d, args) => {
                    let mut out = format!("({}", self.define(*d));
                    for a in args {
                        out.push(' ');
                        out.push_str(&self.replace(a));
                    }
                    out.push(')');
                    out
                }
                ReplaceGen::List(items) => {
                    let items: Vec<String> = items.iter().map(|i| self.replace(i)).collect();
                    format!("[{}]", items.join(" "))
                }
            }
        }
    }
}

// ============================================================================
// TEST FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built sources for common testing scenarios.

    /// The double-negation rule over a single `Not` define.
    pub const ELIMINATE_NOT: &str = "define Not {\n    Input Expr\n}\n\n[EliminateNot]\n(Not (Not $input:*)) => $input\n";

    /// Canonical rendering of [`ELIMINATE_NOT`] without positions.
    pub const ELIMINATE_NOT_CANONICAL: &str = "(Root
\tDefines=(DefineSet
\t\t(Define
\t\t\tTags=(Tags)
\t\t\tName=\"Not\"
\t\t\tFields=(DefineFields
\t\t\t\t(DefineField Name=\"Input\" Type=\"Expr\")
\t\t\t)
\t\t)
\t)
\tRules=(RuleSet
\t\t(Rule
\t\t\tName=\"EliminateNot\"
\t\t\tTags=(Tags)
\t\t\tMatch=(Match
\t\t\t\tNames=(OpNames NotOp)
\t\t\t\tArgs=(MatchArgs
\t\t\t\t\t(Match
\t\t\t\t\t\tNames=(OpNames NotOp)
\t\t\t\t\t\tArgs=(MatchArgs
\t\t\t\t\t\t\t(Bind Label=\"input\" Target=(MatchAny))
\t\t\t\t\t\t)
\t\t\t\t\t)
\t\t\t\t)
\t\t\t)
\t\t\tReplace=(Ref Label=\"input\")
\t\t)
\t)
)";

    /// `count` empty defines named `D0`..`Dn`, each declared twice, so the
    /// source yields exactly `count` duplicate diagnostics.
    pub fn duplicate_defines(count: usize) -> String {
        let mut text = String::new();
        for i in 0..count {
            text.push_str(&format!("define D{} {{}}\n", i));
        }
        for i in 0..count {
            text.push_str(&format!("define D{} {{}}\n", i));
        }
        text
    }

    /// A relational and scalar operator set with tag-driven rules.
    pub const SCALAR_OPS: &str = r#"
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

[Scalar]
define Const {
    Value Datum
}

[Scalar, Boolean]
define Not {
    Input ScalarExpr
}

define Project {
    Input       RelExpr
    Projections ExprList
    Private     ProjectPrivate
}

[SimplifyTrueAnd, Normalize]
(And (Const "true") $right:*) => $right

[NegateComparison, Normalize]
(Not $input:(Boolean) & ^(IsConst $input)) => (Not $input)

[FoldConstList]
(Project $input:* $items:[ ... (Const) ... ]) => (Project $input [$items "folded" 0])
"#;
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions over rendered diagnostic output.

    /// Assert that rendered diagnostics consist of exactly `expected` lines.
    #[track_caller]
    pub fn assert_rendered_lines(rendered: &str, expected: &[&str]) {
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, expected, "rendered diagnostics:\n{}", rendered);
    }

    /// Assert that rendered diagnostics end with the summary line for
    /// `hidden` elided diagnostics.
    #[track_caller]
    pub fn assert_summary(rendered: &str, hidden: usize) {
        let expected = format!("... too many errors ({} more)", hidden);
        assert_eq!(
            rendered.lines().last(),
            Some(expected.as_str()),
            "rendered diagnostics:\n{}",
            rendered
        );
    }
}

#[cfg(test)]
mod tests {
    use super::generators::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_generated_names_are_unique(source in arb_source()) {
            let mut names = source.define_names.clone();
            names.sort();
            names.dedup();
            prop_assert_eq!(names.len(), source.define_names.len());
            prop_assert!(source.text.starts_with("# generated"));
        }
    }

    #[test]
    fn test_render_binds_before_refs() {
        let defines = vec![DefineGen {
            base: "Not".to_string(),
            tags: [false; 3],
            fields: vec![0],
        }];
        let rules = vec![RuleGen {
            head: OpGen::Define(0),
            args: vec![PatternGen::Bind(Box::new(PatternGen::Any))],
            replace: ReplaceGen::Ref(7),
            tags: [true, false, false],
        }];
        let source = render_source(&defines, &rules);
        assert_eq!(
            source.text,
            "# generated\n\ndefine Not0 {\n    F0 Expr\n}\n\n[Rule0, Scalar]\n(Not0 $v0:*)\n=> $v0\n\n"
        );
    }
}
