//! Nodes the instrumenter adds to the tree. None of them has source text,
//! except that wrapper calls borrow the span of the node they wrap.

use pa_ir::{
    Declarator, Expr, ExprKind, ImportDecl, ImportSpecifier, Literal, Property, Span, Stmt,
    StmtKind, VarDecl, VarKind,
};
use pa_runtime::SourceSnippet;

pub(crate) const CAPTURE: &str = "capture";
pub(crate) const EXPR: &str = "expr";

const RECORDER_PREFIX: &str = "_rec";
const RECORDER_CLASS: &str = "_PowerAssertRecorder";
const RECORDER_EXPORT: &str = "PowerAssertRecorder";

/// Module that provides the recorder class at run time.
pub const RECORDER_MODULE: &str = "power-assert/recorder";

pub(crate) fn recorder_name(id: u32) -> String {
    format!("{RECORDER_PREFIX}{id}")
}

/// Recorder id of a `_recN` identifier.
pub(crate) fn recorder_id(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(RECORDER_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `_recN.method(arguments)`
pub(crate) fn recorder_call(id: u32, method: &str, arguments: Vec<Expr>, span: Span) -> Expr {
    let callee = Expr::new(
        ExprKind::Member {
            object: Box::new(Expr::ident(recorder_name(id), span)),
            property: Box::new(Expr::ident(method, span)),
            computed: false,
        },
        span,
    );
    Expr::new(
        ExprKind::Call {
            callee: Box::new(callee),
            arguments,
        },
        span,
    )
}

/// `const _recN = new _PowerAssertRecorder();`
pub(crate) fn recorder_decl(id: u32) -> Stmt {
    let construct = Expr::new(
        ExprKind::New {
            callee: Box::new(Expr::ident(RECORDER_CLASS, Span::DUMMY)),
            arguments: Vec::new(),
        },
        Span::DUMMY,
    );
    Stmt::new(
        StmtKind::Var(VarDecl {
            kind: VarKind::Const,
            declarations: vec![Declarator {
                name: recorder_name(id),
                init: Some(construct),
            }],
        }),
        Span::DUMMY,
    )
}

/// `import { PowerAssertRecorder as _PowerAssertRecorder } from "power-assert/recorder";`
pub(crate) fn recorder_import() -> Stmt {
    Stmt::new(
        StmtKind::Import(ImportDecl {
            specifiers: vec![ImportSpecifier::Named {
                imported: RECORDER_EXPORT.to_string(),
                local: RECORDER_CLASS.to_string(),
            }],
            source: RECORDER_MODULE.to_string(),
            source_span: Span::DUMMY,
        }),
        Span::DUMMY,
    )
}

/// `{ content: "...", filepath: "...", line: 3 }`, plus `async: true` and
/// `generator: true` when they hold.
pub(crate) fn snippet_object(snippet: &SourceSnippet) -> Expr {
    let mut properties = vec![
        property("content", Expr::string(snippet.content.as_str(), Span::DUMMY)),
        property("filepath", Expr::string(snippet.filepath.as_str(), Span::DUMMY)),
        property("line", literal(Literal::Number(f64::from(snippet.line)))),
    ];
    if snippet.is_async {
        properties.push(property("async", literal(Literal::Bool(true))));
    }
    if snippet.is_generator {
        properties.push(property("generator", literal(Literal::Bool(true))));
    }
    Expr::new(ExprKind::Object(properties), Span::DUMMY)
}

fn property(key: &str, value: Expr) -> Property {
    Property {
        key: Expr::ident(key, Span::DUMMY),
        value,
        computed: false,
        shorthand: false,
        method: false,
    }
}

fn literal(lit: Literal) -> Expr {
    Expr::new(ExprKind::Literal(lit), Span::DUMMY)
}
