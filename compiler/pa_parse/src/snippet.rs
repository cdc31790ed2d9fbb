//! Standalone re-parse of one printed statement.
//!
//! A statement lifted out of an `async` or generator function may use
//! `await`/`yield`, which only parse inside such a function. The text is
//! therefore wrapped in a matching function shell, lexed with spans rebased
//! to the start of the text, and the statement is taken back out of the
//! shell's body. Shell tokens are dropped from the returned token stream.

use pa_ir::{FunctionBody, Stmt, StmtKind, Token};
use pa_lexer::Lexer;

use crate::parser::Parser;
use crate::ParseError;

/// Function context the statement was printed from.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SnippetContext {
    pub is_async: bool,
    pub is_generator: bool,
}

impl SnippetContext {
    fn shell_prefix(self) -> &'static str {
        match (self.is_async, self.is_generator) {
            (false, false) => "function wrapper() { ",
            (true, false) => "async function wrapper() { ",
            (false, true) => "function *wrapper() { ",
            (true, true) => "async function *wrapper() { ",
        }
    }
}

/// A re-parsed statement with spans relative to the first byte of its text.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedSnippet {
    pub stmt: Stmt,
    /// Tokens of the statement text only, in source order, without `Eof`.
    pub tokens: Vec<Token>,
}

/// Parse `text` as a single statement in the given function context.
#[tracing::instrument(level = "trace", skip(text), fields(len = text.len()))]
pub fn parse_snippet(text: &str, ctx: SnippetContext) -> Result<ParsedSnippet, ParseError> {
    let prefix = ctx.shell_prefix();
    let source = format!("{prefix}{text} }}");
    let base = u32::try_from(prefix.len()).unwrap_or(u32::MAX);
    let text_end = u32::try_from(text.len()).unwrap_or(u32::MAX);

    let all_tokens = Lexer::new(&source).with_base(base).tokenize()?;
    let tokens: Vec<Token> = all_tokens
        .iter()
        .filter(|token| !token.span.is_empty() && token.span.end <= text_end)
        .cloned()
        .collect();

    let program = Parser::new(all_tokens).parse_program()?;
    let stmt = program
        .body
        .into_iter()
        .next()
        .and_then(|shell| match shell.kind {
            StmtKind::Function(func) => match &func.body {
                FunctionBody::Block(body) => body.first().cloned(),
                FunctionBody::Expr(_) => None,
            },
            _ => None,
        })
        .ok_or(ParseError::EmptySnippet)?;

    Ok(ParsedSnippet { stmt, tokens })
}
