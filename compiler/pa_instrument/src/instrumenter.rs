//! The two instrumentation passes.
//!
//! Pass one walks every statement list of the file. Each expression
//! statement calling a recognized assertion, directly or under `await`, has
//! its arguments rewritten by [`ArgumentRewriter`], one recorder per
//! argument, and the recorder declarations are hoisted to the top of the
//! list. The printed statement is stored against each recorder id.
//!
//! Pass two finds every `_recN.expr(arg)` call and appends the stored
//! snippet as an object literal.

use std::mem;

use pa_fmt::{print_expr, print_snippet};
use pa_ir::traverse::{walk_expr_mut, walk_stmt_mut};
use pa_ir::{
    walk_paths, Expr, ExprKind, Function, FunctionBody, Program, Stmt, StmtKind,
    StructuralPath, VisitorMut,
};
use pa_runtime::SourceSnippet;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::rules::ArgumentRewriter;
use crate::synth::{recorder_decl, recorder_id, recorder_import, snippet_object, EXPR};
use crate::{InstrumentConfig, InstrumentError};

/// `async` / generator state of the innermost enclosing function.
#[derive(Copy, Clone, Debug)]
struct FunctionFlags {
    is_async: bool,
    is_generator: bool,
}

/// Module top level allows `await`.
const TOP_LEVEL: FunctionFlags = FunctionFlags {
    is_async: true,
    is_generator: false,
};

/// One instrumentation run over one file.
///
/// Owns the recorder counter and the id-to-snippet side table. Both live
/// exactly as long as the run.
pub struct Instrumenter<'a> {
    source: &'a str,
    filepath: &'a str,
    config: &'a InstrumentConfig,
    last_recorder: u32,
    snippets: FxHashMap<u32, SourceSnippet>,
    flags: FunctionFlags,
    failure: Option<InstrumentError>,
}

impl<'a> Instrumenter<'a> {
    pub fn new(source: &'a str, filepath: &'a str, config: &'a InstrumentConfig) -> Self {
        Instrumenter {
            source,
            filepath,
            config,
            last_recorder: 0,
            snippets: FxHashMap::default(),
            flags: TOP_LEVEL,
            failure: None,
        }
    }

    /// Rewrite `program` in place. Returns the number of recorders created.
    #[tracing::instrument(level = "debug", skip_all, fields(file = self.filepath))]
    pub fn run(mut self, program: &mut Program) -> Result<u32, InstrumentError> {
        self.block(&mut program.body);
        if let Some(err) = self.failure.take() {
            return Err(err);
        }
        if self.last_recorder == 0 {
            tracing::debug!("no assertions");
            return Ok(0);
        }

        let mut splicer = SnippetSplicer {
            snippets: &self.snippets,
            failure: None,
        };
        for stmt in &mut program.body {
            splicer.visit_stmt(stmt);
        }
        if let Some(err) = splicer.failure {
            return Err(err);
        }

        let at = leading_imports(&program.body);
        program.body.insert(at, recorder_import());
        tracing::debug!(recorders = self.last_recorder, "instrumented");
        Ok(self.last_recorder)
    }

    fn block(&mut self, body: &mut Vec<Stmt>) {
        let mut hoisted = Vec::new();
        for stmt in body.iter_mut() {
            if self.failure.is_some() {
                return;
            }
            if is_assertion(stmt, self.config) {
                if let Err(err) = self.assertion(stmt, &mut hoisted) {
                    self.failure = Some(err);
                    return;
                }
                // Function arguments hold assertions of their own.
                walk_stmt_mut(self, stmt);
            } else {
                self.visit_stmt(stmt);
            }
        }
        if !hoisted.is_empty() {
            let at = leading_imports(body);
            body.splice(at..at, hoisted);
        }
    }

    fn assertion(&mut self, stmt: &mut Stmt, hoisted: &mut Vec<Stmt>) -> Result<(), InstrumentError> {
        let line = stmt.span.line_in(self.source);
        if stmt.span.is_empty() {
            return Err(InstrumentError::MissingPosition { line });
        }
        let content = match &stmt.kind {
            StmtKind::Expr(Expr {
                kind: ExprKind::Await(call),
                ..
            }) => print_expr(call),
            _ => print_snippet(stmt),
        };
        let snippet = SourceSnippet {
            content,
            filepath: self.filepath.to_string(),
            line,
            is_async: self.flags.is_async,
            is_generator: self.flags.is_generator,
        };
        tracing::trace!(line, content = %snippet.content, "assertion");

        let Some(arguments) = call_arguments(stmt) else {
            return Ok(());
        };
        let original = arguments.clone();
        for (index, argument) in arguments.iter_mut().enumerate() {
            self.last_recorder += 1;
            let id = self.last_recorder;
            let mut rewriter = ArgumentRewriter::new(id, line);
            rewriter.rewrite_argument(argument, index)?;
            check_paths(&original[index], index, &rewriter.wrapped, line)?;
            hoisted.push(recorder_decl(id));
            self.snippets.insert(id, snippet.clone());
        }
        Ok(())
    }
}

impl VisitorMut for Instrumenter<'_> {
    fn visit_stmt(&mut self, stmt: &mut Stmt) {
        if self.failure.is_some() {
            return;
        }
        // A lone body statement (`if (c) assert(x);`) becomes a block so its
        // recorders have a list to be hoisted into.
        if is_assertion(stmt, self.config) {
            let span = stmt.span;
            let inner = mem::replace(stmt, Stmt::new(StmtKind::Empty, span));
            let mut body = vec![inner];
            self.block(&mut body);
            *stmt = Stmt::new(StmtKind::Block(body), span);
            return;
        }
        match &mut stmt.kind {
            StmtKind::Block(body) => self.block(body),
            StmtKind::Try {
                block,
                handler,
                finalizer,
            } => {
                self.block(block);
                if let Some(handler) = handler {
                    self.block(&mut handler.body);
                }
                if let Some(finalizer) = finalizer {
                    self.block(finalizer);
                }
            }
            _ => walk_stmt_mut(self, stmt),
        }
    }

    fn visit_function(&mut self, func: &mut Function) {
        if self.failure.is_some() {
            return;
        }
        let outer = mem::replace(
            &mut self.flags,
            FunctionFlags {
                is_async: func.is_async,
                is_generator: func.is_generator,
            },
        );
        match &mut func.body {
            FunctionBody::Block(body) => self.block(body),
            FunctionBody::Expr(body) => self.visit_expr(body),
        }
        self.flags = outer;
    }
}

/// `name(...);` or `await name(...);` with `name` a recognized assertion.
fn is_assertion(stmt: &Stmt, config: &InstrumentConfig) -> bool {
    let StmtKind::Expr(expr) = &stmt.kind else {
        return false;
    };
    let call = match &expr.kind {
        ExprKind::Await(inner) => inner.as_ref(),
        _ => expr,
    };
    matches!(
        &call.kind,
        ExprKind::Call { callee, .. }
            if matches!(&callee.kind, ExprKind::Ident(name) if config.is_assertion(name))
    )
}

fn call_arguments(stmt: &mut Stmt) -> Option<&mut Vec<Expr>> {
    let StmtKind::Expr(expr) = &mut stmt.kind else {
        return None;
    };
    match &mut expr.kind {
        ExprKind::Call { arguments, .. } => Some(arguments),
        ExprKind::Await(inner) => match &mut inner.kind {
            ExprKind::Call { arguments, .. } => Some(arguments),
            _ => None,
        },
        _ => None,
    }
}

/// Every wrapped path must name a node of the argument as written.
fn check_paths(
    original: &Expr,
    index: usize,
    wrapped: &[StructuralPath],
    line: u32,
) -> Result<(), InstrumentError> {
    let mut known = FxHashSet::default();
    walk_paths(original, &StructuralPath::argument(index), &mut |path, _| {
        known.insert(path.clone());
    });
    match wrapped.iter().find(|path| !known.contains(*path)) {
        Some(path) => Err(InstrumentError::ArgumentNotFound {
            path: path.to_string(),
            line,
        }),
        None => Ok(()),
    }
}

fn leading_imports(body: &[Stmt]) -> usize {
    body.iter()
        .take_while(|stmt| matches!(stmt.kind, StmtKind::Import(_)))
        .count()
}

/// Second pass: `_recN.expr(arg)` gains its snippet argument.
struct SnippetSplicer<'a> {
    snippets: &'a FxHashMap<u32, SourceSnippet>,
    failure: Option<InstrumentError>,
}

impl VisitorMut for SnippetSplicer<'_> {
    fn visit_expr(&mut self, expr: &mut Expr) {
        if self.failure.is_some() {
            return;
        }
        walk_expr_mut(self, expr);

        let ExprKind::Call { callee, arguments } = &mut expr.kind else {
            return;
        };
        let Some(id) = expr_call_recorder(callee) else {
            return;
        };
        if arguments.len() != 1 {
            return;
        }
        match self.snippets.get(&id) {
            Some(snippet) => arguments.push(snippet_object(snippet)),
            None => self.failure = Some(InstrumentError::MissingSnippet { recorder: id }),
        }
    }
}

/// Recorder id when `callee` is `_recN.expr`.
fn expr_call_recorder(callee: &Expr) -> Option<u32> {
    let ExprKind::Member {
        object,
        property,
        computed: false,
    } = &callee.kind
    else {
        return None;
    };
    match (&object.kind, &property.kind) {
        (ExprKind::Ident(object), ExprKind::Ident(method)) if method == EXPR => recorder_id(object),
        _ => None,
    }
}
