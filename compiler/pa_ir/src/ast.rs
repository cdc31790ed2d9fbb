//! Syntax tree for the host grammar.
//!
//! The tree is owned and boxed rather than arena-allocated: the instrumenter
//! rewrites argument expressions in place, replacing a node with a call that
//! wraps it. Node and child names follow ESTree, since structural paths are
//! spelled with ESTree child keys.

use std::rc::Rc;

use crate::ops::{prec, AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};
use crate::Span;

/// A parsed source file.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Program {
    pub body: Vec<Stmt>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    #[inline]
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum StmtKind {
    Import(ImportDecl),
    /// `export` in front of a declaration.
    Export(Box<Stmt>),
    Var(VarDecl),
    Function(Rc<Function>),
    Return(Option<Expr>),
    If {
        test: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    Block(Vec<Stmt>),
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    For {
        init: Option<ForInit>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    /// `for (const name of iterable) body`
    ForOf {
        kind: VarKind,
        name: String,
        iterable: Expr,
        body: Box<Stmt>,
    },
    Break,
    Continue,
    Throw(Expr),
    Try {
        block: Vec<Stmt>,
        handler: Option<CatchClause>,
        finalizer: Option<Vec<Stmt>>,
    },
    Expr(Expr),
    Empty,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImportDecl {
    pub specifiers: Vec<ImportSpecifier>,
    pub source: String,
    pub source_span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ImportSpecifier {
    /// `import name from "m"`
    Default(String),
    /// `import * as name from "m"`
    Namespace(String),
    /// `import { imported as local } from "m"`
    Named { imported: String, local: String },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum VarKind {
    Const,
    Let,
    Var,
}

impl VarKind {
    pub fn as_str(self) -> &'static str {
        match self {
            VarKind::Const => "const",
            VarKind::Let => "let",
            VarKind::Var => "var",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct VarDecl {
    pub kind: VarKind,
    pub declarations: Vec<Declarator>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Declarator {
    pub name: String,
    pub init: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ForInit {
    Var(VarDecl),
    Expr(Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatchClause {
    pub param: Option<String>,
    pub body: Vec<Stmt>,
}

/// Function declarations, function expressions and arrows.
#[derive(Clone, Debug, PartialEq)]
pub struct Function {
    pub name: Option<String>,
    pub params: Vec<Param>,
    pub body: FunctionBody,
    pub is_async: bool,
    pub is_generator: bool,
    pub is_arrow: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    pub name: String,
    pub rest: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FunctionBody {
    Block(Vec<Stmt>),
    /// Concise arrow body: `x => x + 1`.
    Expr(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Ident(String),
    Array(Vec<Expr>),
    Object(Vec<Property>),
    Function(Rc<Function>),
    Call {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    New {
        callee: Box<Expr>,
        arguments: Vec<Expr>,
    },
    /// `object.property` or `object[property]`. A non-computed property is
    /// an `Ident` node carrying the name's span.
    Member {
        object: Box<Expr>,
        property: Box<Expr>,
        computed: bool,
    },
    Unary {
        op: UnaryOp,
        argument: Box<Expr>,
    },
    Update {
        op: UpdateOp,
        prefix: bool,
        argument: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    Sequence(Vec<Expr>),
    Await(Box<Expr>),
    Yield {
        argument: Option<Box<Expr>>,
        delegate: bool,
    },
    /// `...argument` inside an array literal or an argument list.
    Spread(Box<Expr>),
    /// Dynamic `import(source)`.
    Import(Box<Expr>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Property {
    pub key: Expr,
    pub value: Expr,
    pub computed: bool,
    pub shorthand: bool,
    pub method: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Literal {
    Number(f64),
    Str(String),
    Bool(bool),
    Null,
    RegExp { pattern: String, flags: String },
}

impl Expr {
    #[inline]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }

    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        Expr::new(ExprKind::Ident(name.into()), span)
    }

    pub fn string(value: impl Into<String>, span: Span) -> Self {
        Expr::new(ExprKind::Literal(Literal::Str(value.into())), span)
    }

    pub fn is_literal(&self) -> bool {
        matches!(self.kind, ExprKind::Literal(_))
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, ExprKind::Function(_))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match &self.kind {
            ExprKind::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Binding strength of the node's outermost operator.
    pub fn precedence(&self) -> u8 {
        match &self.kind {
            ExprKind::Sequence(_) => prec::SEQUENCE,
            ExprKind::Assign { .. } | ExprKind::Yield { .. } => prec::ASSIGN,
            ExprKind::Function(func) if func.is_arrow => prec::ASSIGN,
            ExprKind::Conditional { .. } => prec::CONDITIONAL,
            ExprKind::Logical { op, .. } => op.precedence(),
            ExprKind::Binary { op, .. } => op.precedence(),
            ExprKind::Unary { .. } | ExprKind::Await(_) | ExprKind::Spread(_) => prec::UNARY,
            ExprKind::Update { .. } => prec::UPDATE,
            ExprKind::Call { .. }
            | ExprKind::New { .. }
            | ExprKind::Member { .. }
            | ExprKind::Import(_) => prec::CALL,
            ExprKind::Literal(_)
            | ExprKind::Ident(_)
            | ExprKind::Array(_)
            | ExprKind::Object(_)
            | ExprKind::Function(_) => prec::PRIMARY,
        }
    }
}
