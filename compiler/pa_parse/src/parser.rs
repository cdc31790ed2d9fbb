//! Parser state and token cursor.
//!
//! Statement and expression productions live in the `stmt` and `expr`
//! submodules as further `impl Parser` blocks.

mod expr;
mod stmt;

use std::mem::discriminant;

use pa_ir::{Program, Span, Token, TokenKind};

use crate::ParseError;

pub(crate) type ParseResult<T> = Result<T, ParseError>;

/// Recursive-descent parser over a token vector ending in `Eof`.
pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    /// `await` is an operator (inside async functions and at module level).
    in_async: bool,
    /// `yield` is an operator (inside generator functions).
    in_generator: bool,
}

impl Parser {
    pub(crate) fn new(tokens: Vec<Token>) -> Self {
        Parser {
            tokens,
            pos: 0,
            in_async: false,
            in_generator: false,
        }
    }

    /// Treat the top level as a module body, where `await` is allowed.
    pub(crate) fn module(mut self) -> Self {
        self.in_async = true;
        self
    }

    pub(crate) fn parse_program(mut self) -> ParseResult<Program> {
        let mut body = Vec::new();
        while !self.at_end() {
            body.push(self.parse_statement()?);
        }
        Ok(Program { body })
    }

    // Token access

    pub(super) fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(super) fn kind(&self) -> &TokenKind {
        &self.current().kind
    }

    pub(super) fn peek(&self, offset: usize) -> &Token {
        &self.tokens[(self.pos + offset).min(self.tokens.len() - 1)]
    }

    pub(super) fn at_end(&self) -> bool {
        matches!(self.kind(), TokenKind::Eof)
    }

    pub(super) fn advance(&mut self) -> Token {
        let token = self.current().clone();
        if !self.at_end() {
            self.pos += 1;
        }
        token
    }

    /// Whether the current token has the same kind as `kind`, ignoring payloads.
    pub(super) fn check(&self, kind: &TokenKind) -> bool {
        discriminant(self.kind()) == discriminant(kind)
    }

    pub(super) fn check_ident(&self, word: &str) -> bool {
        self.kind().is_ident(word)
    }

    pub(super) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(super) fn expect(&mut self, kind: &TokenKind, expected: &'static str) -> ParseResult<Span> {
        if self.check(kind) {
            Ok(self.advance().span)
        } else {
            Err(self.unexpected(expected))
        }
    }

    #[cold]
    pub(super) fn unexpected(&self, expected: &'static str) -> ParseError {
        ParseError::Expected {
            expected,
            found: self.kind().to_string(),
            span: self.current().span,
        }
    }

    /// End offset of the most recently consumed token.
    pub(super) fn prev_end(&self) -> u32 {
        if self.pos == 0 {
            return 0;
        }
        self.tokens[self.pos - 1].span.end
    }

    pub(super) fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.prev_end().max(start))
    }

    /// Consume a statement terminator, applying automatic semicolon insertion.
    pub(super) fn consume_semicolon(&mut self) -> ParseResult<()> {
        if self.eat(&TokenKind::Semicolon) {
            return Ok(());
        }
        if matches!(self.kind(), TokenKind::RBrace | TokenKind::Eof) || self.current().newline_before
        {
            return Ok(());
        }
        Err(self.unexpected("`;`"))
    }

    /// Identifier name, allowing keywords (property names, import names).
    pub(super) fn identifier_name(&mut self) -> ParseResult<(String, Span)> {
        let token = self.current().clone();
        let name = match &token.kind {
            TokenKind::Ident(name) => name.clone(),
            other => match other.keyword_text() {
                Some(text) => text.to_string(),
                None => return Err(self.unexpected("a property name")),
            },
        };
        self.advance();
        Ok((name, token.span))
    }

    /// Binding identifier (not a keyword).
    pub(super) fn binding_name(&mut self) -> ParseResult<(String, Span)> {
        match self.kind() {
            TokenKind::Ident(name) => {
                let name = name.clone();
                let span = self.advance().span;
                Ok((name, span))
            }
            _ => Err(self.unexpected("an identifier")),
        }
    }

    /// Run `f` with the given function context, restoring the outer one after.
    pub(super) fn with_context<T>(
        &mut self,
        is_async: bool,
        is_generator: bool,
        f: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        let outer = (self.in_async, self.in_generator);
        self.in_async = is_async;
        self.in_generator = is_generator;
        let result = f(self);
        (self.in_async, self.in_generator) = outer;
        result
    }
}
