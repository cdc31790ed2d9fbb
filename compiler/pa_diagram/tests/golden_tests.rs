//! Golden diagrams for complete assertion contexts.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pa_diagram::render_diagram;
use pa_ir::{format_number, Literal};
use pa_runtime::{assemble, CapturedValue, Recorder, SourceSnippet};
use pretty_assertions::assert_eq;

#[derive(Clone, Debug, PartialEq)]
enum Val {
    Num(f64),
    Str(String),
    Bool(bool),
    Object(Vec<(String, Val)>),
}

impl CapturedValue for Val {
    fn from_literal(literal: &Literal) -> Self {
        match literal {
            Literal::Number(n) => Val::Num(*n),
            Literal::Str(s) => Val::Str(s.clone()),
            Literal::Bool(b) => Val::Bool(*b),
            Literal::Null | Literal::RegExp { .. } => Val::Object(Vec::new()),
        }
    }

    fn dump(&self) -> String {
        match self {
            Val::Num(n) => format_number(*n),
            Val::Str(s) => format!("\"{s}\""),
            Val::Bool(b) => b.to_string(),
            Val::Object(props) => {
                let body: Vec<String> = props
                    .iter()
                    .map(|(k, v)| format!("{k}:{}", v.dump()))
                    .collect();
                format!("Object{{{}}}", body.join(","))
            }
        }
    }
}

fn snippet(content: &str) -> SourceSnippet {
    SourceSnippet {
        content: content.to_string(),
        filepath: "/work/sample.test.js".to_string(),
        line: 7,
        is_async: false,
        is_generator: false,
    }
}

#[test]
fn equal_with_two_arguments() {
    let snippet = snippet("equal(x, 2)");
    let mut rec1 = Recorder::new();
    let mut rec2 = Recorder::new();

    let x = rec1.capture(Val::Num(1.0), "arguments/0");
    let first = rec1.expr(x, snippet.clone());
    let two = rec2.capture(Val::Num(2.0), "arguments/1");
    let second = rec2.expr(two, snippet);

    let ctx = assemble([first, second]).unwrap();
    assert_eq!(
        render_diagram(&ctx).unwrap(),
        "equal(x, 2)\n      |  | \n      1  2 "
    );
}

#[test]
fn computed_member_access() {
    let x = Val::Object(vec![("a".to_string(), Val::Num(1.0))]);
    let y = Val::Str("a".to_string());
    let mut rec = Recorder::new();

    // Evaluation order of `x[y] === 2` with every non-literal node wrapped.
    let object = rec.capture(x, "arguments/0/left/object");
    let property = rec.capture(y, "arguments/0/left/property");
    assert_eq!(object.dump(), "Object{a:1}");
    assert_eq!(property.dump(), "\"a\"");
    let member = rec.capture(Val::Num(1.0), "arguments/0/left");
    let result = rec.capture(Val::Bool(member == Val::Num(2.0)), "arguments/0");
    let recorded = rec.expr(result, snippet("assert(x[y] === 2)"));

    let ctx = assemble([recorded]).unwrap();
    let expected = [
        "assert(x[y] === 2)",
        "       |||  |     ",
        "       |||  false ",
        "       ||\"a\"      ",
        "       |1         ",
        "       Object{a:1}",
    ]
    .join("\n");
    assert_eq!(render_diagram(&ctx).unwrap(), expected);
}

#[test]
fn wide_script_word_counts_double() {
    let snippet = snippet("equal(\"名前\", s);");
    let mut rec1 = Recorder::new();
    let mut rec2 = Recorder::new();
    // A stale value for a literal is replaced by the literal itself.
    let name = rec1.capture(Val::Str("stale".to_string()), "arguments/0");
    let first = rec1.expr(name, snippet.clone());
    let s = rec2.capture(Val::Num(1.0), "arguments/1");
    let second = rec2.expr(s, snippet);

    let ctx = assemble([first, second]).unwrap();
    assert_eq!(
        render_diagram(&ctx).unwrap(),
        "equal(\"名前\", s);\n      |       |  \n      \"名前\"  1  "
    );
}
