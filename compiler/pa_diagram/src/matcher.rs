//! Capture-to-column resolution.
//!
//! The snippet text is parsed again and each argument is walked with
//! [`walk_paths`], the same traversal the instrumenter's paths are written
//! against. A node whose path was captured becomes one display event at the
//! column its operator or property starts.

use pa_ir::{Expr, ExprKind, Span, StmtKind, StructuralPath, Token, TokenKind};
use pa_parse::{parse_snippet, ParseError, ParsedSnippet, SnippetContext};
use pa_runtime::{ArgumentRecord, AssertionContext, CapturedValue};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::width::text_width;

/// A captured value placed at a display column of the snippet line.
#[derive(Clone, Debug, PartialEq)]
pub struct CapturedDisplayEvent<V> {
    pub value: V,
    pub column: usize,
}

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum MatchError {
    #[error("cannot re-parse assertion snippet: {0}")]
    Reparse(#[from] ParseError),
    /// Instrumentation and matching disagree about the statement's shape.
    #[error("capture addressing drifted for `{content}`: {detail}")]
    InvariantViolation { content: String, detail: String },
}

/// Resolves the captures of one [`AssertionContext`] to display columns.
pub struct PathMatcher<'ctx, V> {
    ctx: &'ctx AssertionContext<V>,
}

impl<'ctx, V: CapturedValue> PathMatcher<'ctx, V> {
    pub fn new(ctx: &'ctx AssertionContext<V>) -> Self {
        PathMatcher { ctx }
    }

    /// Display events in argument order, then traversal order.
    #[tracing::instrument(level = "debug", skip_all, fields(line = self.ctx.source.line))]
    pub fn resolve(&self) -> Result<Vec<CapturedDisplayEvent<V>>, MatchError> {
        let source = &self.ctx.source;
        let snippet_ctx = SnippetContext {
            is_async: source.is_async,
            is_generator: source.is_generator,
        };
        let parsed = parse_snippet(&source.content, snippet_ctx)?;
        let arguments = match &parsed.stmt.kind {
            StmtKind::Expr(Expr {
                kind: ExprKind::Call { arguments, .. },
                ..
            }) => arguments,
            _ => return Err(self.violation("snippet is not a call statement".to_string())),
        };

        let mut events = Vec::new();
        for (index, record) in self.ctx.args.iter().enumerate() {
            let Some(argument) = arguments.get(index) else {
                return Err(self.violation(format!(
                    "{} recorded arguments, {} in source",
                    self.ctx.args.len(),
                    arguments.len()
                )));
            };
            self.resolve_argument(&parsed, index, argument, record, &mut events)?;
        }
        tracing::debug!(count = events.len(), "resolved captures");
        Ok(events)
    }

    fn resolve_argument(
        &self,
        parsed: &ParsedSnippet,
        index: usize,
        argument: &Expr,
        record: &ArgumentRecord<V>,
        events: &mut Vec<CapturedDisplayEvent<V>>,
    ) -> Result<(), MatchError> {
        // Later captures of the same path overwrite earlier ones.
        let mut by_path: FxHashMap<&str, &V> = FxHashMap::default();
        for event in &record.events {
            by_path.insert(event.path.as_str(), &event.value);
        }

        let mut seen: FxHashSet<String> = FxHashSet::default();
        let mut failure = None;
        pa_ir::walk_paths(argument, &StructuralPath::argument(index), &mut |path, node| {
            if failure.is_some() {
                return;
            }
            let key = path.to_string();
            let Some(captured) = by_path.get(key.as_str()) else {
                return;
            };
            let value = match node.as_literal() {
                Some(literal) => V::from_literal(literal),
                None => (*captured).clone(),
            };
            match self.column_of(node, &parsed.tokens) {
                Ok(column) => events.push(CapturedDisplayEvent { value, column }),
                Err(err) => failure = Some(err),
            }
            seen.insert(key);
        });
        if let Some(err) = failure {
            return Err(err);
        }

        if let Some(orphan) = by_path.keys().find(|path| !seen.contains(**path)) {
            return Err(self.violation(format!("captured path `{orphan}` names no node")));
        }
        Ok(())
    }

    fn column_of(&self, node: &Expr, tokens: &[Token]) -> Result<usize, MatchError> {
        if node.span.is_empty() {
            return Err(self.violation(format!("node at {} has no extent", node.span)));
        }
        let byte = match &node.kind {
            ExprKind::Member { .. } => member_start(node, tokens),
            ExprKind::Call { callee, .. } if matches!(callee.kind, ExprKind::Member { .. }) => {
                member_start(callee, tokens)
            }
            ExprKind::Binary { op, left, right } => {
                operator_start(&self.ctx.source.content, tokens, left, right, op.as_symbol())
            }
            ExprKind::Logical { op, left, right } => {
                operator_start(&self.ctx.source.content, tokens, left, right, op.as_symbol())
            }
            ExprKind::Assign { op, left, right } => {
                operator_start(&self.ctx.source.content, tokens, left, right, op.as_symbol())
            }
            _ => node.span.start,
        };
        let content = &self.ctx.source.content;
        let prefix = usize::try_from(byte)
            .ok()
            .and_then(|byte| content.get(..byte))
            .ok_or_else(|| self.violation(format!("offset {byte} is outside the snippet")))?;
        Ok(text_width(prefix))
    }

    fn violation(&self, detail: String) -> MatchError {
        MatchError::InvariantViolation {
            content: self.ctx.source.content.clone(),
            detail,
        }
    }
}

/// Start of the property of a member access, or of the `[` opening a
/// computed one.
fn member_start(member: &Expr, tokens: &[Token]) -> u32 {
    let ExprKind::Member {
        property, computed, ..
    } = &member.kind
    else {
        return member.span.start;
    };
    let property_start = property.span.start;
    if !*computed {
        return property_start;
    }
    tokens
        .windows(2)
        .find(|pair| {
            pair[1].span.start == property_start && matches!(pair[0].kind, TokenKind::LBracket)
        })
        .map_or(property_start, |pair| pair[0].span.start)
}

/// Start of the first operator token between `left` and `right`, or of
/// `left` when none is found.
fn operator_start(content: &str, tokens: &[Token], left: &Expr, right: &Expr, symbol: &str) -> u32 {
    let between = Span::new(left.span.end, right.span.start);
    tokens
        .iter()
        .find(|token| {
            between.start <= token.span.start
                && token.span.end <= between.end
                && content.get(token.span.to_range()) == Some(symbol)
        })
        .map_or(left.span.start, |token| token.span.start)
}
