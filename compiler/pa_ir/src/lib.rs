//! Shared syntax definitions for the power-assert passes.
//!
//! Every other crate in the workspace speaks in these types: the lexer emits
//! [`Token`]s, the parser builds a [`Program`], the instrumenter rewrites it,
//! and the diagram matcher walks a fresh parse with [`walk_paths`] to rebuild
//! the [`StructuralPath`] of each recorded value.

pub mod ast;
pub mod number;
pub mod ops;
pub mod path;
mod span;
pub mod token;
pub mod traverse;

pub use ast::{
    CatchClause, Declarator, Expr, ExprKind, ForInit, Function, FunctionBody, ImportDecl,
    ImportSpecifier, Literal, Param, Program, Property, Stmt, StmtKind, VarDecl, VarKind,
};
pub use number::format_number;
pub use ops::{AssignOp, BinaryOp, LogicalOp, UnaryOp, UpdateOp};
pub use path::{keys, PathSegment, StructuralPath};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use traverse::{walk_paths, VisitorMut};
