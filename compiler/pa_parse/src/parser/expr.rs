//! Expression productions, from sequence down to primary.
//!
//! Binary and logical operators share one precedence-climbing loop; the
//! levels come from `pa_ir::ops::prec`.

use std::rc::Rc;

use pa_ir::ops::prec;
use pa_ir::{
    AssignOp, BinaryOp, Expr, ExprKind, Function, FunctionBody, Literal, LogicalOp, Param,
    Property, TokenKind, UnaryOp, UpdateOp,
};
use pa_stack::ensure_sufficient_stack;

use super::{ParseResult, Parser};
use crate::ParseError;

/// An infix operator found at the cursor.
#[derive(Copy, Clone)]
enum Infix {
    Binary(BinaryOp),
    Logical(LogicalOp),
}

impl Infix {
    fn precedence(self) -> u8 {
        match self {
            Infix::Binary(op) => op.precedence(),
            Infix::Logical(op) => op.precedence(),
        }
    }

    fn is_right_associative(self) -> bool {
        matches!(self, Infix::Binary(op) if op.is_right_associative())
    }
}

fn infix_op(kind: &TokenKind) -> Option<Infix> {
    let op = match kind {
        TokenKind::QuestionQuestion => return Some(Infix::Logical(LogicalOp::Nullish)),
        TokenKind::PipePipe => return Some(Infix::Logical(LogicalOp::Or)),
        TokenKind::AmpAmp => return Some(Infix::Logical(LogicalOp::And)),
        TokenKind::EqEq => BinaryOp::LooseEq,
        TokenKind::NotEq => BinaryOp::LooseNotEq,
        TokenKind::EqEqEq => BinaryOp::StrictEq,
        TokenKind::NotEqEq => BinaryOp::StrictNotEq,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::InstanceOf => BinaryOp::InstanceOf,
        TokenKind::In => BinaryOp::In,
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        TokenKind::StarStar => BinaryOp::Exp,
        _ => return None,
    };
    Some(Infix::Binary(op))
}

fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    Some(match kind {
        TokenKind::Eq => AssignOp::Assign,
        TokenKind::PlusEq => AssignOp::AddAssign,
        TokenKind::MinusEq => AssignOp::SubAssign,
        TokenKind::StarEq => AssignOp::MulAssign,
        TokenKind::SlashEq => AssignOp::DivAssign,
        TokenKind::PercentEq => AssignOp::RemAssign,
        _ => return None,
    })
}

impl Parser {
    /// Comma-separated sequence.
    pub(crate) fn parse_expression(&mut self) -> ParseResult<Expr> {
        let first = self.parse_assignment()?;
        if !self.check(&TokenKind::Comma) {
            return Ok(first);
        }
        let start = first.span.start;
        let mut expressions = vec![first];
        while self.eat(&TokenKind::Comma) {
            expressions.push(self.parse_assignment()?);
        }
        Ok(Expr::new(
            ExprKind::Sequence(expressions),
            self.span_from(start),
        ))
    }

    pub(super) fn parse_assignment(&mut self) -> ParseResult<Expr> {
        ensure_sufficient_stack(|| self.parse_assignment_inner())
    }

    fn parse_assignment_inner(&mut self) -> ParseResult<Expr> {
        let start = self.current().span.start;

        if self.in_generator && self.check_ident("yield") {
            return self.parse_yield();
        }
        if let Some(is_async) = self.arrow_ahead() {
            return self.parse_arrow(is_async);
        }

        let left = self.parse_conditional()?;
        let Some(op) = assign_op(self.kind()) else {
            return Ok(left);
        };
        if !matches!(left.kind, ExprKind::Ident(_) | ExprKind::Member { .. }) {
            return Err(ParseError::InvalidAssignmentTarget { span: left.span });
        }
        self.advance();
        let right = self.parse_assignment()?;
        Ok(Expr::new(
            ExprKind::Assign {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            self.span_from(start),
        ))
    }

    fn parse_yield(&mut self) -> ParseResult<Expr> {
        let start = self.advance().span.start;
        let delegate = self.eat(&TokenKind::Star);
        let ends = matches!(
            self.kind(),
            TokenKind::RParen
                | TokenKind::RBracket
                | TokenKind::RBrace
                | TokenKind::Comma
                | TokenKind::Semicolon
                | TokenKind::Colon
                | TokenKind::Eof
        ) || self.current().newline_before;
        let argument = if ends && !delegate {
            None
        } else {
            Some(Box::new(self.parse_assignment()?))
        };
        Ok(Expr::new(
            ExprKind::Yield { argument, delegate },
            self.span_from(start),
        ))
    }

    /// If an arrow function starts at the cursor, whether it is async.
    fn arrow_ahead(&self) -> Option<bool> {
        let (is_async, offset) = if self.check_ident("async")
            && !self.peek(1).newline_before
            && matches!(self.peek(1).kind, TokenKind::Ident(_) | TokenKind::LParen)
        {
            (true, 1)
        } else {
            (false, 0)
        };
        match &self.peek(offset).kind {
            TokenKind::Ident(_) => {
                matches!(self.peek(offset + 1).kind, TokenKind::Arrow).then_some(is_async)
            }
            TokenKind::LParen => {
                let mut depth = 0usize;
                let mut i = offset;
                loop {
                    match self.peek(i).kind {
                        TokenKind::LParen => depth += 1,
                        TokenKind::RParen => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        TokenKind::Eof => return None,
                        _ => {}
                    }
                    i += 1;
                }
                matches!(self.peek(i + 1).kind, TokenKind::Arrow).then_some(is_async)
            }
            _ => None,
        }
    }

    fn parse_arrow(&mut self, is_async: bool) -> ParseResult<Expr> {
        let start = self.current().span.start;
        if is_async {
            self.advance();
        }
        let params = if self.check(&TokenKind::LParen) {
            self.parse_params()?
        } else {
            let (name, _) = self.binding_name()?;
            vec![Param { name, rest: false }]
        };
        self.expect(&TokenKind::Arrow, "`=>`")?;
        let body = if self.check(&TokenKind::LBrace) {
            FunctionBody::Block(self.with_context(is_async, false, Parser::parse_block)?)
        } else {
            let expr = self.with_context(is_async, false, Parser::parse_assignment)?;
            FunctionBody::Expr(Box::new(expr))
        };
        let function = Function {
            name: None,
            params,
            body,
            is_async,
            is_generator: false,
            is_arrow: true,
        };
        Ok(Expr::new(
            ExprKind::Function(Rc::new(function)),
            self.span_from(start),
        ))
    }

    fn parse_conditional(&mut self) -> ParseResult<Expr> {
        let start = self.current().span.start;
        let test = self.parse_binary(prec::OR)?;
        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let consequent = self.parse_assignment()?;
        self.expect(&TokenKind::Colon, "`:`")?;
        let alternate = self.parse_assignment()?;
        Ok(Expr::new(
            ExprKind::Conditional {
                test: Box::new(test),
                consequent: Box::new(consequent),
                alternate: Box::new(alternate),
            },
            self.span_from(start),
        ))
    }

    fn parse_binary(&mut self, min_prec: u8) -> ParseResult<Expr> {
        let start = self.current().span.start;
        let unary_operand = self.at_unary_operator();
        let mut left = self.parse_unary()?;
        // Logical operators joined at this level; `??` never mixes with the others.
        let mut logical: Option<LogicalOp> = None;
        while let Some(op) = infix_op(self.kind()) {
            let level = op.precedence();
            if level < min_prec {
                break;
            }
            match op {
                Infix::Binary(BinaryOp::Exp)
                    if unary_operand
                        && matches!(left.kind, ExprKind::Unary { .. } | ExprKind::Await(_)) =>
                {
                    return Err(ParseError::UnparenthesizedExponent {
                        span: self.span_from(start),
                    });
                }
                Infix::Logical(op) => {
                    let nullish = op == LogicalOp::Nullish;
                    let mixed = logical.is_some_and(|prev| (prev == LogicalOp::Nullish) != nullish);
                    if mixed {
                        return Err(ParseError::MixedCoalesce {
                            span: self.current().span,
                        });
                    }
                    logical = Some(op);
                }
                Infix::Binary(_) => {}
            }
            self.advance();
            let next_min = match op {
                // Stop before `&&` so it surfaces here and is rejected.
                Infix::Logical(LogicalOp::Nullish) => prec::AND + 1,
                _ if op.is_right_associative() => level,
                _ => level + 1,
            };
            let right = ensure_sufficient_stack(|| self.parse_binary(next_min))?;
            let kind = match op {
                Infix::Binary(op) => ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                Infix::Logical(op) => ExprKind::Logical {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
            };
            left = Expr::new(kind, self.span_from(start));
        }
        Ok(left)
    }

    /// Whether the cursor is on a prefix operator that `parse_unary` folds
    /// into a `Unary` or `Await` node.
    fn at_unary_operator(&self) -> bool {
        matches!(
            self.kind(),
            TokenKind::Bang | TokenKind::Minus | TokenKind::Plus | TokenKind::TypeOf | TokenKind::Void
        ) || (self.in_async && self.check_ident("await"))
    }

    fn parse_unary(&mut self) -> ParseResult<Expr> {
        ensure_sufficient_stack(|| self.parse_unary_inner())
    }

    fn parse_unary_inner(&mut self) -> ParseResult<Expr> {
        let start = self.current().span.start;
        let op = match self.kind() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::TypeOf => Some(UnaryOp::TypeOf),
            TokenKind::Void => Some(UnaryOp::Void),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let argument = Box::new(self.parse_unary()?);
            return Ok(Expr::new(
                ExprKind::Unary { op, argument },
                self.span_from(start),
            ));
        }

        let update = match self.kind() {
            TokenKind::PlusPlus => Some(UpdateOp::Increment),
            TokenKind::MinusMinus => Some(UpdateOp::Decrement),
            _ => None,
        };
        if let Some(op) = update {
            self.advance();
            let argument = Box::new(self.parse_unary()?);
            return Ok(Expr::new(
                ExprKind::Update {
                    op,
                    prefix: true,
                    argument,
                },
                self.span_from(start),
            ));
        }

        if self.in_async && self.check_ident("await") {
            self.advance();
            let argument = Box::new(self.parse_unary()?);
            return Ok(Expr::new(ExprKind::Await(argument), self.span_from(start)));
        }

        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> ParseResult<Expr> {
        let start = self.current().span.start;
        let expr = self.parse_call_member()?;
        let op = match self.kind() {
            TokenKind::PlusPlus => UpdateOp::Increment,
            TokenKind::MinusMinus => UpdateOp::Decrement,
            _ => return Ok(expr),
        };
        if self.current().newline_before {
            return Ok(expr);
        }
        self.advance();
        Ok(Expr::new(
            ExprKind::Update {
                op,
                prefix: false,
                argument: Box::new(expr),
            },
            self.span_from(start),
        ))
    }

    fn parse_call_member(&mut self) -> ParseResult<Expr> {
        let start = self.current().span.start;
        let mut expr = if self.check(&TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        loop {
            match self.kind() {
                TokenKind::Dot | TokenKind::LBracket => {
                    expr = self.parse_member_suffix(expr, start)?;
                }
                TokenKind::LParen => {
                    let arguments = self.parse_arguments()?;
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            arguments,
                        },
                        self.span_from(start),
                    );
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_member_suffix(&mut self, object: Expr, start: u32) -> ParseResult<Expr> {
        let (property, computed) = if self.eat(&TokenKind::Dot) {
            let (name, span) = self.identifier_name()?;
            (Expr::ident(name, span), false)
        } else {
            self.expect(&TokenKind::LBracket, "`[`")?;
            let property = self.parse_expression()?;
            self.expect(&TokenKind::RBracket, "`]`")?;
            (property, true)
        };
        Ok(Expr::new(
            ExprKind::Member {
                object: Box::new(object),
                property: Box::new(property),
                computed,
            },
            self.span_from(start),
        ))
    }

    /// `new Callee.path(args)`; the argument list is optional.
    fn parse_new(&mut self) -> ParseResult<Expr> {
        let start = self.expect(&TokenKind::New, "`new`")?.start;
        let callee_start = self.current().span.start;
        let mut callee = if self.check(&TokenKind::New) {
            self.parse_new()?
        } else {
            self.parse_primary()?
        };
        while matches!(self.kind(), TokenKind::Dot | TokenKind::LBracket) {
            callee = self.parse_member_suffix(callee, callee_start)?;
        }
        let arguments = if self.check(&TokenKind::LParen) {
            self.parse_arguments()?
        } else {
            Vec::new()
        };
        Ok(Expr::new(
            ExprKind::New {
                callee: Box::new(callee),
                arguments,
            },
            self.span_from(start),
        ))
    }

    fn parse_arguments(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect(&TokenKind::LParen, "`(`")?;
        let mut arguments = Vec::new();
        while !self.eat(&TokenKind::RParen) {
            arguments.push(self.parse_spread_or_assignment()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RParen, "`)`")?;
                break;
            }
        }
        Ok(arguments)
    }

    fn parse_spread_or_assignment(&mut self) -> ParseResult<Expr> {
        let start = self.current().span.start;
        if self.eat(&TokenKind::Ellipsis) {
            let argument = Box::new(self.parse_assignment()?);
            return Ok(Expr::new(ExprKind::Spread(argument), self.span_from(start)));
        }
        self.parse_assignment()
    }

    fn parse_primary(&mut self) -> ParseResult<Expr> {
        let token = self.current().clone();
        let start = token.span.start;
        let literal = match &token.kind {
            TokenKind::Number(n) => Some(Literal::Number(*n)),
            TokenKind::Str(s) => Some(Literal::Str(s.clone())),
            TokenKind::Regex { pattern, flags } => Some(Literal::RegExp {
                pattern: pattern.clone(),
                flags: flags.clone(),
            }),
            TokenKind::True => Some(Literal::Bool(true)),
            TokenKind::False => Some(Literal::Bool(false)),
            TokenKind::Null => Some(Literal::Null),
            _ => None,
        };
        if let Some(literal) = literal {
            self.advance();
            return Ok(Expr::new(ExprKind::Literal(literal), token.span));
        }

        match token.kind {
            TokenKind::Ident(name) => {
                if name == "async"
                    && matches!(self.peek(1).kind, TokenKind::Function)
                    && !self.peek(1).newline_before
                {
                    self.advance();
                    return self.parse_function_expr(start, true);
                }
                self.advance();
                Ok(Expr::ident(name, token.span))
            }
            TokenKind::Function => self.parse_function_expr(start, false),
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                Ok(inner)
            }
            TokenKind::LBracket => self.parse_array(),
            TokenKind::LBrace => self.parse_object(),
            TokenKind::Import => {
                self.advance();
                self.expect(&TokenKind::LParen, "`(`")?;
                let source = self.parse_assignment()?;
                self.expect(&TokenKind::RParen, "`)`")?;
                Ok(Expr::new(
                    ExprKind::Import(Box::new(source)),
                    self.span_from(start),
                ))
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn parse_function_expr(&mut self, start: u32, is_async: bool) -> ParseResult<Expr> {
        self.expect(&TokenKind::Function, "`function`")?;
        let is_generator = self.eat(&TokenKind::Star);
        let name = match self.kind() {
            TokenKind::Ident(_) => Some(self.binding_name()?.0),
            _ => None,
        };
        let function = self.parse_function_rest(name, is_async, is_generator)?;
        Ok(Expr::new(
            ExprKind::Function(Rc::new(function)),
            self.span_from(start),
        ))
    }

    fn parse_array(&mut self) -> ParseResult<Expr> {
        let start = self.expect(&TokenKind::LBracket, "`[`")?.start;
        let mut elements = Vec::new();
        while !self.eat(&TokenKind::RBracket) {
            if self.check(&TokenKind::Comma) {
                return Err(ParseError::Unsupported {
                    construct: "array holes",
                    span: self.current().span,
                });
            }
            elements.push(self.parse_spread_or_assignment()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBracket, "`]`")?;
                break;
            }
        }
        Ok(Expr::new(ExprKind::Array(elements), self.span_from(start)))
    }

    fn parse_object(&mut self) -> ParseResult<Expr> {
        let start = self.expect(&TokenKind::LBrace, "`{`")?.start;
        let mut properties = Vec::new();
        while !self.eat(&TokenKind::RBrace) {
            properties.push(self.parse_property()?);
            if !self.eat(&TokenKind::Comma) {
                self.expect(&TokenKind::RBrace, "`}`")?;
                break;
            }
        }
        Ok(Expr::new(ExprKind::Object(properties), self.span_from(start)))
    }

    fn parse_property(&mut self) -> ParseResult<Property> {
        if self.check(&TokenKind::Ellipsis) {
            return Err(ParseError::Unsupported {
                construct: "object spread",
                span: self.current().span,
            });
        }

        let is_async = self.check_ident("async")
            && !matches!(
                self.peek(1).kind,
                TokenKind::Colon | TokenKind::LParen | TokenKind::Comma | TokenKind::RBrace
            );
        if is_async {
            self.advance();
        }
        let is_generator = self.eat(&TokenKind::Star);
        let (key, computed) = self.parse_property_key()?;

        if is_async || is_generator || self.check(&TokenKind::LParen) {
            let start = key.span.start;
            let name = match &key.kind {
                ExprKind::Ident(name) => Some(name.clone()),
                _ => None,
            };
            let function = self.parse_function_rest(name, is_async, is_generator)?;
            let value = Expr::new(
                ExprKind::Function(Rc::new(function)),
                self.span_from(start),
            );
            return Ok(Property {
                key,
                value,
                computed,
                shorthand: false,
                method: true,
            });
        }

        if self.eat(&TokenKind::Colon) {
            let value = self.parse_assignment()?;
            return Ok(Property {
                key,
                value,
                computed,
                shorthand: false,
                method: false,
            });
        }

        match &key.kind {
            ExprKind::Ident(_) if !computed => Ok(Property {
                value: key.clone(),
                key,
                computed: false,
                shorthand: true,
                method: false,
            }),
            _ => Err(self.unexpected("`:`")),
        }
    }

    fn parse_property_key(&mut self) -> ParseResult<(Expr, bool)> {
        let token = self.current().clone();
        match token.kind {
            TokenKind::LBracket => {
                self.advance();
                let key = self.parse_assignment()?;
                self.expect(&TokenKind::RBracket, "`]`")?;
                Ok((key, true))
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok((Expr::string(s, token.span), false))
            }
            TokenKind::Number(n) => {
                self.advance();
                Ok((
                    Expr::new(ExprKind::Literal(Literal::Number(n)), token.span),
                    false,
                ))
            }
            _ => {
                let (name, span) = self.identifier_name()?;
                Ok((Expr::ident(name, span), false))
            }
        }
    }
}

