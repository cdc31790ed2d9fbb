//! Capture rules for assertion arguments.
//!
//! Paths are spelled with the child keys of [`pa_ir::keys`], the ones the
//! diagram matcher walks when it rebuilds them. A node is wrapped as `_recN.capture(node, "path")` after its own children, so the
//! recorder sees values in evaluation order. Literals below the top level are
//! never wrapped.

use std::mem;

use pa_ir::{keys, Expr, ExprKind, Span, StructuralPath};
use pa_stack::ensure_sufficient_stack;

use crate::synth::{recorder_call, CAPTURE, EXPR};
use crate::InstrumentError;

/// Rewrites the arguments of one assertion statement for one recorder.
pub(crate) struct ArgumentRewriter {
    recorder: u32,
    line: u32,
    /// Every path wrapped so far, in wrapping order.
    pub(crate) wrapped: Vec<StructuralPath>,
}

impl ArgumentRewriter {
    pub(crate) fn new(recorder: u32, line: u32) -> Self {
        ArgumentRewriter {
            recorder,
            line,
            wrapped: Vec::new(),
        }
    }

    /// Turn the `index`-th argument into `_recN.expr(_recN.capture(arg, "arguments/index"))`.
    pub(crate) fn rewrite_argument(
        &mut self,
        argument: &mut Expr,
        index: usize,
    ) -> Result<(), InstrumentError> {
        if matches!(argument.kind, ExprKind::Spread(_)) {
            return Err(self.structural("a spread assertion argument", argument.span));
        }
        self.wrap(argument, &StructuralPath::argument(index))?;
        let span = argument.span;
        let captured = mem::replace(argument, placeholder(span));
        *argument = recorder_call(self.recorder, EXPR, vec![captured], span);
        Ok(())
    }

    fn wrap(&mut self, expr: &mut Expr, path: &StructuralPath) -> Result<(), InstrumentError> {
        if expr.span.is_empty() {
            return Err(InstrumentError::MissingPosition { line: self.line });
        }
        self.children(expr, path)?;

        let span = expr.span;
        let inner = mem::replace(expr, placeholder(span));
        let path_literal = Expr::string(path.to_string(), span);
        *expr = recorder_call(self.recorder, CAPTURE, vec![inner, path_literal], span);
        self.wrapped.push(path.clone());
        Ok(())
    }

    fn wrap_unless_literal(
        &mut self,
        expr: &mut Expr,
        path: &StructuralPath,
    ) -> Result<(), InstrumentError> {
        if expr.is_literal() {
            return Ok(());
        }
        self.wrap(expr, path)
    }

    fn children(&mut self, expr: &mut Expr, path: &StructuralPath) -> Result<(), InstrumentError> {
        ensure_sufficient_stack(|| self.children_inner(expr, path))
    }

    fn children_inner(
        &mut self,
        expr: &mut Expr,
        path: &StructuralPath,
    ) -> Result<(), InstrumentError> {
        let span = expr.span;
        match &mut expr.kind {
            ExprKind::Call { callee, arguments } => {
                match &mut callee.kind {
                    ExprKind::Member { object, .. } => {
                        let at = path.key(keys::CALLEE).key(keys::OBJECT);
                        self.wrap_unless_literal(object, &at)?;
                    }
                    ExprKind::Ident(_) | ExprKind::Function(_) => {}
                    _ => return Err(self.structural("a call through a computed callee", span)),
                }
                for (i, argument) in arguments.iter_mut().enumerate() {
                    let at = path.key(keys::ARGUMENTS).index(i);
                    match &mut argument.kind {
                        ExprKind::Spread(inner) => {
                            self.wrap_unless_literal(inner, &at.key(keys::ARGUMENT))?;
                        }
                        _ => self.wrap_unless_literal(argument, &at)?,
                    }
                }
            }
            ExprKind::Object(properties) => {
                for (i, prop) in properties.iter_mut().enumerate() {
                    let at = path.key(keys::PROPERTIES).index(i);
                    if prop.computed {
                        self.wrap_unless_literal(&mut prop.key, &at.key(keys::KEY))?;
                    }
                    if !prop.value.is_literal() && !prop.value.is_function() {
                        self.wrap(&mut prop.value, &at.key(keys::VALUE))?;
                        prop.shorthand = false;
                    }
                }
            }
            ExprKind::Array(elements) => {
                for (i, element) in elements.iter_mut().enumerate() {
                    let at = path.key(keys::ELEMENTS).index(i);
                    match &mut element.kind {
                        ExprKind::Spread(inner) => {
                            self.wrap_unless_literal(inner, &at.key(keys::ARGUMENT))?;
                        }
                        _ => self.wrap_unless_literal(element, &at)?,
                    }
                }
            }
            ExprKind::Member {
                object,
                property,
                computed,
            } => {
                self.wrap_unless_literal(object, &path.key(keys::OBJECT))?;
                if *computed {
                    self.wrap_unless_literal(property, &path.key(keys::PROPERTY))?;
                }
            }
            ExprKind::Unary { argument, .. } => {
                self.wrap_unless_literal(argument, &path.key(keys::ARGUMENT))?;
            }
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                self.wrap_unless_literal(left, &path.key(keys::LEFT))?;
                self.wrap_unless_literal(right, &path.key(keys::RIGHT))?;
            }
            // The target stays a plain reference.
            ExprKind::Assign { right, .. } => {
                self.wrap_unless_literal(right, &path.key(keys::RIGHT))?;
            }
            // The awaited value is captured at the `await` node; only the
            // operand's own children are wrapped.
            ExprKind::Await(operand) => {
                self.children(operand, &path.key(keys::ARGUMENT))?;
            }
            ExprKind::Literal(_)
            | ExprKind::Ident(_)
            | ExprKind::Function(_)
            | ExprKind::New { .. }
            | ExprKind::Update { .. }
            | ExprKind::Conditional { .. }
            | ExprKind::Sequence(_)
            | ExprKind::Yield { .. }
            | ExprKind::Spread(_)
            | ExprKind::Import(_) => {}
        }
        Ok(())
    }

    fn structural(&self, construct: &'static str, span: Span) -> InstrumentError {
        InstrumentError::Structural {
            construct,
            line: self.line,
            span,
        }
    }
}

fn placeholder(span: Span) -> Expr {
    Expr::new(ExprKind::Sequence(Vec::new()), span)
}
