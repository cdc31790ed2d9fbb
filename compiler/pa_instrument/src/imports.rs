//! Import specifier rewriting.
//!
//! Instrumented files are evaluated from wherever the runner lives, so
//! relative specifiers are pinned to the directory of the original file.
//! Bare names (`power-assert`), absolute paths and URLs pass through.

use pa_ir::traverse::{walk_expr_mut, walk_stmt_mut};
use pa_ir::{Expr, ExprKind, Literal, Program, Stmt, StmtKind, VisitorMut};

use crate::InstrumentError;

/// Absolute form of a `./` or `../` specifier imported from `filepath`.
/// `None` when the specifier is not relative.
pub fn resolve_specifier(specifier: &str, filepath: &str) -> Option<String> {
    let mut dirs: Vec<&str> = filepath.split('/').collect();
    dirs.pop();

    if let Some(rest) = specifier.strip_prefix("./") {
        return Some(format!("{}/{rest}", dirs.join("/")));
    }
    if !specifier.starts_with("../") {
        return None;
    }

    let mut rest = specifier;
    while let Some(stripped) = rest.strip_prefix("../") {
        dirs.pop();
        rest = stripped;
    }
    Some(format!("{}/{rest}", dirs.join("/")))
}

/// Rewrite every relative static and dynamic import of `program`.
pub fn rewrite_imports(
    program: &mut Program,
    source: &str,
    filepath: &str,
) -> Result<(), InstrumentError> {
    let mut rewriter = ImportRewriter {
        source,
        filepath,
        rewritten: 0,
        failure: None,
    };
    for stmt in &mut program.body {
        rewriter.visit_stmt(stmt);
    }
    if let Some(err) = rewriter.failure {
        return Err(err);
    }
    tracing::debug!(rewritten = rewriter.rewritten, "resolved import specifiers");
    Ok(())
}

struct ImportRewriter<'a> {
    source: &'a str,
    filepath: &'a str,
    rewritten: usize,
    failure: Option<InstrumentError>,
}

impl ImportRewriter<'_> {
    fn resolve(&mut self, specifier: &mut String) {
        if let Some(absolute) = resolve_specifier(specifier, self.filepath) {
            tracing::trace!(from = %specifier, to = %absolute, "import");
            *specifier = absolute;
            self.rewritten += 1;
        }
    }
}

impl VisitorMut for ImportRewriter<'_> {
    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        if self.failure.is_some() {
            return;
        }
        if let StmtKind::Import(decl) = &mut stmt.kind {
            self.resolve(&mut decl.source);
        } else {
            walk_stmt_mut(self, stmt);
        }
    }

    fn visit_expr(&mut self, expr: &mut Expr) {
        if self.failure.is_some() {
            return;
        }
        let ExprKind::Import(specifier) = &mut expr.kind else {
            walk_expr_mut(self, expr);
            return;
        };
        match &mut specifier.kind {
            ExprKind::Literal(Literal::Str(value)) => self.resolve(value),
            _ => {
                self.failure = Some(InstrumentError::DynamicImport {
                    line: expr.span.line_in(self.source),
                    span: expr.span,
                });
            }
        }
    }
}
