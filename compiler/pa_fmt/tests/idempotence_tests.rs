//! Printing is a fixed point: printed output re-parses and prints the same.
//!
//! Diagram text is printed once at instrumentation time and parsed again by
//! the matcher at run time, so print(parse(print(x))) must equal print(x).

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use pa_fmt::{print_program, print_snippet};
use pa_parse::parse_program;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn assert_idempotent(source: &str) {
    let first = print_program(&parse_program(source).unwrap());
    let second = print_program(&parse_program(&first).unwrap());
    assert_eq!(first, second);
}

#[test]
fn realistic_test_file() {
    assert_idempotent(
        r#"
import { assert, assertEquals } from "power-assert";
import * as helpers from "./helpers.js";

const items = [1, 2, 3];
let total = 0;
for (const item of items) {
    total += item;
}

test("sum", () => {
    assertEquals(total, 6);
    assert(items.includes(2) && !items.includes(9));
});

test("async", async () => {
    const value = await Promise.resolve({ a: 1, b: [1, "two"] });
    assert(value.a === 1, "message");
});

function* gen() {
    yield 1;
    yield* [2, 3];
}

try {
    helpers.run(x => x * 2, ...items);
} catch (e) {
    console.log(e.message);
} finally {
    total = -total;
}
"#,
    );
}

fn expr_source() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        "[a-e]".prop_map(String::from),
        (0u32..1000).prop_map(|n| n.to_string()),
        "[a-z ]{0,4}".prop_map(|s| format!("\"{s}\"")),
        Just("true".to_string()),
        Just("null".to_string()),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        let op = prop_oneof![
            Just("+"),
            Just("-"),
            Just("*"),
            Just("**"),
            Just("==="),
            Just("<"),
            Just("&&"),
            Just("||"),
            Just("??"),
        ];
        prop_oneof![
            (inner.clone(), op, inner.clone()).prop_map(|(l, op, r)| format!("({l} {op} {r})")),
            inner.clone().prop_map(|e| format!("(!{e})")),
            inner.clone().prop_map(|e| format!("(-{e})")),
            inner.clone().prop_map(|e| format!("({e}).p")),
            (inner.clone(), inner.clone()).prop_map(|(o, p)| format!("({o})[{p}]")),
            prop::collection::vec(inner.clone(), 0..3)
                .prop_map(|args| format!("f({})", args.join(", "))),
            prop::collection::vec(inner.clone(), 0..3)
                .prop_map(|items| format!("[{}]", items.join(", "))),
            (inner.clone(), inner.clone(), inner)
                .prop_map(|(t, c, a)| format!("({t} ? {c} : {a})")),
        ]
    })
}

proptest! {
    #[test]
    fn printed_expressions_are_fixed_points(expr in expr_source()) {
        let source = format!("assert({expr});");
        let program = parse_program(&source).unwrap();
        let first = print_snippet(&program.body[0]);
        let reparsed = parse_program(&first).unwrap();
        let second = print_snippet(&reparsed.body[0]);
        prop_assert_eq!(first, second);
    }
}
