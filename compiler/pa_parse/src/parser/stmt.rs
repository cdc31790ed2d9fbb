//! Statement productions.

use std::rc::Rc;

use pa_ir::{
    CatchClause, Declarator, ForInit, Function, FunctionBody, ImportDecl, ImportSpecifier, Param,
    Stmt, StmtKind, TokenKind, VarDecl, VarKind,
};
use pa_stack::ensure_sufficient_stack;

use super::{ParseResult, Parser};
use crate::ParseError;

impl Parser {
    pub(super) fn parse_statement(&mut self) -> ParseResult<Stmt> {
        ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> ParseResult<Stmt> {
        let start = self.current().span.start;
        let kind = match self.kind() {
            TokenKind::LBrace => StmtKind::Block(self.parse_block()?),
            TokenKind::Semicolon => {
                self.advance();
                StmtKind::Empty
            }
            TokenKind::Import if !matches!(self.peek(1).kind, TokenKind::LParen) => {
                StmtKind::Import(self.parse_import()?)
            }
            TokenKind::Export => {
                self.advance();
                let inner = self.parse_declaration()?;
                StmtKind::Export(Box::new(inner))
            }
            TokenKind::Const | TokenKind::Let | TokenKind::Var => {
                let decl = self.parse_var_decl()?;
                self.consume_semicolon()?;
                StmtKind::Var(decl)
            }
            TokenKind::Function => StmtKind::Function(self.parse_function_decl(false)?),
            TokenKind::Ident(name)
                if name == "async"
                    && matches!(self.peek(1).kind, TokenKind::Function)
                    && !self.peek(1).newline_before =>
            {
                self.advance();
                StmtKind::Function(self.parse_function_decl(true)?)
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.at_statement_end() {
                    None
                } else {
                    Some(self.parse_expression()?)
                };
                self.consume_semicolon()?;
                StmtKind::Return(value)
            }
            TokenKind::If => self.parse_if()?,
            TokenKind::While => {
                self.advance();
                self.expect(&TokenKind::LParen, "`(`")?;
                let test = self.parse_expression()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                let body = Box::new(self.parse_statement()?);
                StmtKind::While { test, body }
            }
            TokenKind::For => self.parse_for()?,
            TokenKind::Break => {
                self.advance();
                self.consume_semicolon()?;
                StmtKind::Break
            }
            TokenKind::Continue => {
                self.advance();
                self.consume_semicolon()?;
                StmtKind::Continue
            }
            TokenKind::Throw => {
                self.advance();
                let value = self.parse_expression()?;
                self.consume_semicolon()?;
                StmtKind::Throw(value)
            }
            TokenKind::Try => self.parse_try()?,
            _ => {
                let expr = self.parse_expression()?;
                self.consume_semicolon()?;
                StmtKind::Expr(expr)
            }
        };
        Ok(Stmt::new(kind, self.span_from(start)))
    }

    fn at_statement_end(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Semicolon | TokenKind::RBrace | TokenKind::Eof
        ) || self.current().newline_before
    }

    pub(super) fn parse_block(&mut self) -> ParseResult<Vec<Stmt>> {
        self.expect(&TokenKind::LBrace, "`{`")?;
        let mut body = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            if self.at_end() {
                return Err(self.unexpected("`}`"));
            }
            body.push(self.parse_statement()?);
        }
        self.advance();
        Ok(body)
    }

    /// The declaration after `export`.
    fn parse_declaration(&mut self) -> ParseResult<Stmt> {
        match self.kind() {
            TokenKind::Function | TokenKind::Const | TokenKind::Let | TokenKind::Var => {
                self.parse_statement()
            }
            TokenKind::Ident(name) if name == "async" => self.parse_statement(),
            _ => Err(self.unexpected("a declaration after `export`")),
        }
    }

    fn parse_import(&mut self) -> ParseResult<ImportDecl> {
        self.expect(&TokenKind::Import, "`import`")?;
        let mut specifiers = Vec::new();

        if !matches!(self.kind(), TokenKind::Str(_)) {
            if let TokenKind::Ident(_) = self.kind() {
                let (local, _) = self.binding_name()?;
                specifiers.push(ImportSpecifier::Default(local));
                if !self.eat(&TokenKind::Comma) {
                    return self.finish_import(specifiers);
                }
            }
            if self.eat(&TokenKind::Star) {
                self.expect_word("as")?;
                let (local, _) = self.binding_name()?;
                specifiers.push(ImportSpecifier::Namespace(local));
            } else if self.eat(&TokenKind::LBrace) {
                while !self.eat(&TokenKind::RBrace) {
                    let (imported, _) = self.identifier_name()?;
                    let local = if self.check_ident("as") {
                        self.advance();
                        self.binding_name()?.0
                    } else {
                        imported.clone()
                    };
                    specifiers.push(ImportSpecifier::Named { imported, local });
                    if !self.eat(&TokenKind::Comma) {
                        self.expect(&TokenKind::RBrace, "`}`")?;
                        break;
                    }
                }
            }
        }
        self.finish_import(specifiers)
    }

    fn finish_import(&mut self, specifiers: Vec<ImportSpecifier>) -> ParseResult<ImportDecl> {
        if !specifiers.is_empty() {
            self.expect_word("from")?;
        }
        let token = self.advance();
        let TokenKind::Str(source) = token.kind else {
            return Err(ParseError::Expected {
                expected: "a module specifier string",
                found: token.kind.to_string(),
                span: token.span,
            });
        };
        self.consume_semicolon()?;
        Ok(ImportDecl {
            specifiers,
            source,
            source_span: token.span,
        })
    }

    fn expect_word(&mut self, word: &'static str) -> ParseResult<()> {
        if self.check_ident(word) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(word))
        }
    }

    /// `const a = 1, b` without the terminator.
    pub(super) fn parse_var_decl(&mut self) -> ParseResult<VarDecl> {
        let kind = match self.advance().kind {
            TokenKind::Const => VarKind::Const,
            TokenKind::Let => VarKind::Let,
            _ => VarKind::Var,
        };
        let mut declarations = Vec::new();
        loop {
            let (name, _) = self.binding_name()?;
            let init = if self.eat(&TokenKind::Eq) {
                Some(self.parse_assignment()?)
            } else {
                None
            };
            declarations.push(Declarator { name, init });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        Ok(VarDecl { kind, declarations })
    }

    /// `function [*] name(params) { body }`, after any `async`.
    fn parse_function_decl(&mut self, is_async: bool) -> ParseResult<Rc<Function>> {
        self.expect(&TokenKind::Function, "`function`")?;
        let is_generator = self.eat(&TokenKind::Star);
        let (name, _) = self.binding_name()?;
        let function = self.parse_function_rest(Some(name), is_async, is_generator)?;
        Ok(Rc::new(function))
    }

    /// Parameter list and block body of a non-arrow function.
    pub(super) fn parse_function_rest(
        &mut self,
        name: Option<String>,
        is_async: bool,
        is_generator: bool,
    ) -> ParseResult<Function> {
        let params = self.parse_params()?;
        let body = self.with_context(is_async, is_generator, Parser::parse_block)?;
        Ok(Function {
            name,
            params,
            body: FunctionBody::Block(body),
            is_async,
            is_generator,
            is_arrow: false,
        })
    }

    pub(super) fn parse_params(&mut self) -> ParseResult<Vec<Param>> {
        self.expect(&TokenKind::LParen, "`(`")?;
        let mut params = Vec::new();
        while !self.eat(&TokenKind::RParen) {
            let rest = self.eat(&TokenKind::Ellipsis);
            let (name, span) = self.binding_name()?;
            if self.check(&TokenKind::Eq) {
                return Err(ParseError::Unsupported {
                    construct: "default parameter values",
                    span,
                });
            }
            params.push(Param { name, rest });
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RParen, "`)`")?;
                break;
            }
        }
        Ok(params)
    }

    fn parse_if(&mut self) -> ParseResult<StmtKind> {
        self.expect(&TokenKind::If, "`if`")?;
        self.expect(&TokenKind::LParen, "`(`")?;
        let test = self.parse_expression()?;
        self.expect(&TokenKind::RParen, "`)`")?;
        let consequent = Box::new(self.parse_statement()?);
        let alternate = if self.eat(&TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };
        Ok(StmtKind::If {
            test,
            consequent,
            alternate,
        })
    }

    fn parse_for(&mut self) -> ParseResult<StmtKind> {
        self.expect(&TokenKind::For, "`for`")?;
        self.expect(&TokenKind::LParen, "`(`")?;

        let is_decl = matches!(
            self.kind(),
            TokenKind::Const | TokenKind::Let | TokenKind::Var
        );
        if is_decl && self.peek(2).kind.is_ident("of") {
            let kind = match self.advance().kind {
                TokenKind::Const => VarKind::Const,
                TokenKind::Let => VarKind::Let,
                _ => VarKind::Var,
            };
            let (name, _) = self.binding_name()?;
            self.advance();
            let iterable = self.parse_assignment()?;
            self.expect(&TokenKind::RParen, "`)`")?;
            let body = Box::new(self.parse_statement()?);
            return Ok(StmtKind::ForOf {
                kind,
                name,
                iterable,
                body,
            });
        }

        let init = if self.check(&TokenKind::Semicolon) {
            None
        } else if is_decl {
            Some(ForInit::Var(self.parse_var_decl()?))
        } else {
            Some(ForInit::Expr(self.parse_expression()?))
        };
        self.expect(&TokenKind::Semicolon, "`;`")?;
        let test = if self.check(&TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::Semicolon, "`;`")?;
        let update = if self.check(&TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect(&TokenKind::RParen, "`)`")?;
        let body = Box::new(self.parse_statement()?);
        Ok(StmtKind::For {
            init,
            test,
            update,
            body,
        })
    }

    fn parse_try(&mut self) -> ParseResult<StmtKind> {
        self.expect(&TokenKind::Try, "`try`")?;
        let block = self.parse_block()?;
        let handler = if self.eat(&TokenKind::Catch) {
            let param = if self.eat(&TokenKind::LParen) {
                let (name, _) = self.binding_name()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                Some(name)
            } else {
                None
            };
            let body = self.parse_block()?;
            Some(CatchClause { param, body })
        } else {
            None
        };
        let finalizer = if self.eat(&TokenKind::Finally) {
            Some(self.parse_block()?)
        } else {
            None
        };
        if handler.is_none() && finalizer.is_none() {
            return Err(self.unexpected("`catch` or `finally`"));
        }
        Ok(StmtKind::Try {
            block,
            handler,
            finalizer,
        })
    }
}
