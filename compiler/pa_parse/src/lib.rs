//! Recursive descent parser for the power-assert host grammar.
//!
//! Produces the boxed ESTree-shaped tree of `pa_ir`. Two entry points:
//! [`parse_program`] for whole test files (module context, top-level `await`
//! allowed) and [`parse_snippet`] for re-parsing one printed statement.

mod error;
mod parser;
mod snippet;

pub use error::ParseError;
pub use snippet::{parse_snippet, ParsedSnippet, SnippetContext};

use pa_ir::Program;
use pa_lexer::lex;

use crate::parser::Parser;

/// Parse a whole source file.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    let tokens = lex(source)?;
    let program = Parser::new(tokens).module().parse_program()?;
    tracing::debug!(statements = program.body.len(), "parsed");
    Ok(program)
}
