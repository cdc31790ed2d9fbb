//! Printer for the power-assert host grammar.
//!
//! Two layouts over one printer:
//!
//! - [`print_program`]: rewritten test files, 4-space indented blocks.
//! - [`print_snippet`] / [`print_expr`]: a single statement or expression on
//!   one line. This is the text shown in diagrams and re-parsed by the
//!   diagram matcher, so it is the only source of statement text.

pub mod emitter;
pub mod printer;
mod quote;

pub use emitter::{Emitter, StringEmitter};
pub use printer::{Layout, Printer};
pub use quote::quote_string;

use pa_ir::{Expr, Program, Stmt};

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Print a whole file, one top-level statement per line.
pub fn print_program(program: &Program) -> String {
    let mut printer = Printer::new(StringEmitter::new(), Layout::Block);
    printer.program(program);
    let mut out = printer.into_inner();
    out.ensure_trailing_newline();
    out.output()
}

/// Print one statement on a single line.
pub fn print_snippet(stmt: &Stmt) -> String {
    let mut printer = Printer::new(StringEmitter::new(), Layout::Inline);
    printer.stmt(stmt);
    printer.into_inner().output()
}

/// Print one expression on a single line.
pub fn print_expr(expr: &Expr) -> String {
    let mut printer = Printer::new(StringEmitter::new(), Layout::Inline);
    printer.expr(expr);
    printer.into_inner().output()
}
