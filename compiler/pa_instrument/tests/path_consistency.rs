//! Paths written by the instrumenter must name nodes the diagram matcher
//! will find when it re-parses the printed statement.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::collections::BTreeSet;

use pa_instrument::{instrument_source, InstrumentConfig};
use pa_ir::traverse::walk_expr_mut;
use pa_ir::{walk_paths, Expr, ExprKind, Literal, StmtKind, StructuralPath, VisitorMut};
use pa_parse::{parse_snippet, SnippetContext};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[derive(Default)]
struct CapturePaths(Vec<String>);

impl VisitorMut for CapturePaths {
    fn visit_expr(&mut self, expr: &mut Expr) {
        walk_expr_mut(self, expr);
        let ExprKind::Call { callee, arguments } = &expr.kind else {
            return;
        };
        let is_capture = matches!(
            &callee.kind,
            ExprKind::Member { property, .. }
                if matches!(&property.kind, ExprKind::Ident(name) if name == "capture")
        );
        if let (true, Some(ExprKind::Literal(Literal::Str(path)))) =
            (is_capture, arguments.get(1).map(|a| &a.kind))
        {
            self.0.push(path.clone());
        }
    }
}

fn captured_paths(source: &str) -> Vec<String> {
    let out = instrument_source(source, "/t/p.test.js", &InstrumentConfig::default()).unwrap();
    let mut program = pa_parse::parse_program(&out).unwrap();
    let mut paths = CapturePaths::default();
    for stmt in &mut program.body {
        paths.visit_stmt(stmt);
    }
    paths.0
}

fn matcher_paths(source: &str) -> BTreeSet<String> {
    let program = pa_parse::parse_program(source).unwrap();
    let content = pa_fmt::print_snippet(&program.body[0]);
    let ctx = SnippetContext {
        is_async: true,
        is_generator: false,
    };
    let parsed = parse_snippet(&content, ctx).unwrap();
    let StmtKind::Expr(Expr {
        kind: ExprKind::Call { arguments, .. },
        ..
    }) = &parsed.stmt.kind
    else {
        panic!("snippet is not a call");
    };
    let mut paths = BTreeSet::new();
    for (i, argument) in arguments.iter().enumerate() {
        walk_paths(argument, &StructuralPath::argument(i), &mut |path, _| {
            paths.insert(path.to_string());
        });
    }
    paths
}

#[test]
fn scenario_paths() {
    assert_eq!(
        captured_paths("assert(x[y] === 2);"),
        vec![
            "arguments/0/left/object",
            "arguments/0/left/property",
            "arguments/0/left",
            "arguments/0",
        ]
    );
    assert_eq!(captured_paths("assert(await x);"), vec!["arguments/0"]);
}

fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[a-e]".prop_map(String::from),
        (0u8..10).prop_map(|n| n.to_string()),
        Just("\"s\"".to_string()),
        Just("true".to_string()),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a} + {b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a} === {b})")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a} && {b})")),
            inner.clone().prop_map(|a| format!("!{a}")),
            inner.clone().prop_map(|a| format!("({a}).p")),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a})[{b}]")),
            prop::collection::vec(inner.clone(), 0..3)
                .prop_map(|args| format!("f({})", args.join(", "))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}).m({b})")),
            prop::collection::vec(inner.clone(), 0..3)
                .prop_map(|items| format!("[{}]", items.join(", "))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("{{ k: {a}, [c]: {b} }}")),
            inner.clone().prop_map(|a| format!("(await {a})")),
            (inner.clone(), inner.clone(), inner).prop_map(|(a, b, c)| format!("({a} ? {b} : {c})")),
        ]
    })
}

proptest! {
    #[test]
    fn instrumenter_and_matcher_agree(
        args in prop::collection::vec(expression(), 1..3),
    ) {
        let source = format!("assert({});", args.join(", "));
        let known = matcher_paths(&source);
        let captured = captured_paths(&source);
        for path in &captured {
            prop_assert!(known.contains(path), "{path} missing from {source}");
        }
        let unique: BTreeSet<&String> = captured.iter().collect();
        prop_assert_eq!(unique.len(), captured.len(), "duplicate path in {}", source);
    }
}
