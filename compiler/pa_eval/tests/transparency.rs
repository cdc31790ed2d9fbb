//! Captures are transparent: an instrumented file computes exactly what the
//! original computes.

#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::path::Path;

use pa_eval::{EvalError, Interpreter, PrintHandler};
use pa_instrument::{instrument_source, InstrumentConfig};
use proptest::prelude::*;

const PRELUDE: &str = r#"import { assert } from "power-assert";
const a = 3;
const b = "s";
const xs = [1, 2];
const o = { k: 5, m: (x) => [x] };
let seen = null;
function keep(v) { seen = v; return true; }
"#;

fn evaluate(source: &str) -> (Result<(), EvalError>, String) {
    let program = pa_parse::parse_program(source).unwrap();
    let mut interp = Interpreter::new().with_output(PrintHandler::buffer());
    let result = interp.run_main(&program, Path::new("/t/transparent.test.js"));
    (result, interp.output())
}

fn expression() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("a".to_string()),
        Just("b".to_string()),
        Just("xs".to_string()),
        Just("o.k".to_string()),
        Just("seen".to_string()),
        (0u8..10).prop_map(|n| n.to_string()),
        Just("\"t\"".to_string()),
        Just("true".to_string()),
        Just("null".to_string()),
    ];
    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l} + {r})")),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l} * {r})")),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l} === {r})")),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l} < {r})")),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l} || {r})")),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l} ?? {r})")),
            inner.clone().prop_map(|x| format!("!({x})")),
            inner.clone().prop_map(|x| format!("typeof ({x})")),
            inner.clone().prop_map(|x| format!("o.m({x})")),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| format!("({l})[{r}]")),
            prop::collection::vec(inner.clone(), 0..3)
                .prop_map(|items| format!("[{}]", items.join(", "))),
            inner.clone().prop_map(|x| format!("{{ k: {x} }}")),
            (inner.clone(), inner.clone(), inner)
                .prop_map(|(c, t, e)| format!("({c} ? {t} : {e})")),
        ]
    })
}

proptest! {
    #[test]
    fn instrumented_file_behaves_like_the_original(expr in expression()) {
        let source = format!("{PRELUDE}assert(keep({expr}));\nconsole.log(seen);\n");
        let instrumented =
            instrument_source(&source, "/t/transparent.test.js", &InstrumentConfig::default())
                .unwrap();
        let original = evaluate(&source);
        let rewritten = evaluate(&instrumented);
        prop_assert_eq!(original, rewritten, "for {}", expr);
    }
}
