#![expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]

use std::path::Path;

use pa_parse::parse_program;
use pretty_assertions::assert_eq;

use super::Interpreter;
use crate::errors::EvalError;
use crate::print_handler::PrintHandler;

fn eval(source: &str) -> (Interpreter, Result<(), EvalError>) {
    let program = parse_program(source).unwrap();
    let mut interp = Interpreter::new().with_output(PrintHandler::buffer());
    let result = interp.run_main(&program, Path::new("/virtual/main.test.js"));
    (interp, result)
}

fn output(source: &str) -> String {
    let (interp, result) = eval(source);
    result.unwrap();
    interp.output()
}

#[test]
fn console_log_formats_values() {
    assert_eq!(
        output(r#"console.log(1 + 2, "a" + 1, [1, "x"], { a: 1 }, null);"#),
        "3 a1 [1,\"x\"] Object{a:1} null\n"
    );
}

#[test]
fn closures_share_their_scope() {
    let source = "
        function counter() {
            let n = 0;
            return () => { n += 1; return n; };
        }
        const next = counter();
        next();
        console.log(next());
    ";
    assert_eq!(output(source), "2\n");
}

#[test]
fn function_declarations_are_hoisted() {
    assert_eq!(output("console.log(f(2));\nfunction f(x) { return x * 3; }"), "6\n");
}

#[test]
fn const_cannot_be_reassigned() {
    let source = "
        const c = 1;
        try { c = 2; } catch (e) { console.log(e.name); }
    ";
    assert_eq!(output(source), "TypeError\n");
}

#[test]
fn loops_with_break_and_continue() {
    let source = "
        let total = 0;
        for (let i = 0; i < 10; i++) {
            if (i === 2) continue;
            if (i === 5) break;
            total += i;
        }
        let j = 0;
        while (j < 3) j++;
        for (const ch of \"ab\") console.log(ch);
        console.log(total, j);
    ";
    assert_eq!(output(source), "a\nb\n8 3\n");
}

#[test]
fn finally_runs_after_catch() {
    let source = "
        try {
            throw new Error(\"boom\");
        } catch (e) {
            console.log(\"caught\", e.message);
        } finally {
            console.log(\"finally\");
        }
    ";
    assert_eq!(output(source), "caught boom\nfinally\n");
}

#[test]
fn await_unwraps_settled_promises() {
    let source = "
        async function one() { return 1; }
        const v = await one();
        try {
            await Promise.reject(new Error(\"no\"));
        } catch (e) {
            console.log(v, e.message);
        }
    ";
    assert_eq!(output(source), "1 no\n");
}

#[test]
fn builtin_constructors_carry_static_members() {
    let source = r#"
        console.log(typeof Promise, Promise.name, Object.keys({ a: 1 }), Array.isArray(Array(2)));
        console.log(Array(2).length, Array(1, 2), Object(null));
        console.log(Promise.resolve(1) instanceof Promise, [] instanceof Array, {} instanceof Object);
        try { new Promise(() => {}); } catch (e) { console.log(e.name); }
    "#;
    assert_eq!(
        output(source),
        "function Promise [\"a\"] true\n2 [1,2] Object{}\ntrue true true\nTypeError\n"
    );
}

#[test]
fn async_throw_becomes_rejection() {
    let source = "
        async function bad() { throw new TypeError(\"x\"); }
        const p = bad();
        console.log(p);
        p.catch((e) => console.log(e instanceof TypeError, e instanceof Error));
    ";
    assert_eq!(
        output(source),
        "Promise{rejected:#Error#}\ntrue true\n"
    );
}

#[test]
fn array_and_string_methods() {
    let source = r#"
        console.log([1, 2, 3].map((x) => x * 2).filter((x) => x > 2).join("-"));
        console.log("Hello".toUpperCase(), "a,b".split(","), "abc".slice(-2));
        const xs = [];
        xs.push(1, 2);
        console.log(xs.length, xs.includes(2), xs.indexOf(3));
    "#;
    assert_eq!(output(source), "4-6\nHELLO [\"a\",\"b\"] bc\n2 true -1\n");
}

#[test]
fn member_assignment_and_updates() {
    let source = r#"
        const o = {};
        o.a = 1;
        o["b"] = 2;
        o.a += 5;
        let i = 0;
        i++;
        ++i;
        console.log(o, i, typeof nope);
    "#;
    assert_eq!(output(source), "Object{a:6,b:2} 2 undefined\n");
}

#[test]
fn spread_in_calls_and_arrays() {
    let source = "
        function sum(a, b, ...rest) { return a + b + rest.length; }
        const xs = [1, 2];
        console.log(sum(...xs, 9, 9), [0, ...xs]);
    ";
    assert_eq!(output(source), "5 [0,1,2]\n");
}

#[test]
fn uncaught_errors_surface_as_eval_errors() {
    let (_, result) = eval("missing + 1;");
    assert_eq!(
        result,
        Err(EvalError::Uncaught(
            "ReferenceError: missing is not defined".to_string()
        ))
    );
}

#[test]
fn generators_are_unsupported() {
    let (_, result) = eval("function* g() {}\ng();");
    assert_eq!(
        result,
        Err(EvalError::Unsupported {
            construct: "generator functions"
        })
    );
}

#[test]
fn runaway_recursion_throws_range_error() {
    let source = "
        function f() { return f(); }
        try { f(); } catch (e) { console.log(e.name); }
    ";
    assert_eq!(output(source), "RangeError\n");
}

#[test]
fn registered_tests_run_in_order() {
    let source = r#"
        import { assert } from "power-assert";
        test("passes", () => {});
        test("throws", () => { throw new Error("boom"); });
        test("asserts", () => assert(false, "nope"));
        test("rejects", async () => { throw new Error("later"); });
    "#;
    let (mut interp, result) = eval(source);
    result.unwrap();
    let tests = interp.tests().to_vec();
    let names: Vec<&str> = tests.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["passes", "throws", "asserts", "rejects"]);

    let results: Vec<Result<(), EvalError>> = tests.iter().map(|t| interp.run_test(t)).collect();
    assert_eq!(
        results,
        vec![
            Ok(()),
            Err(EvalError::Uncaught("Error: boom".to_string())),
            Err(EvalError::Uncaught("AssertionError: nope".to_string())),
            Err(EvalError::Uncaught("Error: later".to_string())),
        ]
    );
}

#[test]
fn unknown_bare_module_is_fatal() {
    let (_, result) = eval(r#"import { x } from "left-pad";"#);
    assert_eq!(
        result,
        Err(EvalError::ModuleNotFound {
            specifier: "left-pad".to_string()
        })
    );
}

#[test]
fn missing_export_is_fatal() {
    let (_, result) = eval(r#"import { nope } from "power-assert";"#);
    assert!(matches!(result, Err(EvalError::MissingExport { .. })));
}

#[test]
fn dynamic_import_of_missing_file_rejects() {
    let source = r#"
        const p = import("./nowhere.js");
        p.catch((e) => console.log(e.name));
    "#;
    assert_eq!(output(source), "Error\n");
}
