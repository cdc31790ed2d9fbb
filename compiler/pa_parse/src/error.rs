//! Parse errors.

use pa_ir::Span;
use pa_lexer::LexError;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error("expected {expected}, found {found}")]
    Expected {
        expected: &'static str,
        found: String,
        span: Span,
    },
    #[error("invalid assignment target")]
    InvalidAssignmentTarget { span: Span },
    #[error("unary operator before `**` needs parentheses")]
    UnparenthesizedExponent { span: Span },
    #[error("`??` cannot be mixed with `||` or `&&` without parentheses")]
    MixedCoalesce { span: Span },
    #[error("{construct} is not supported")]
    Unsupported { construct: &'static str, span: Span },
    #[error("snippet contains no statement")]
    EmptySnippet,
}

impl ParseError {
    /// Source location of the error, when it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::Lex(err) => Some(err.span()),
            ParseError::Expected { span, .. }
            | ParseError::InvalidAssignmentTarget { span }
            | ParseError::UnparenthesizedExponent { span }
            | ParseError::MixedCoalesce { span }
            | ParseError::Unsupported { span, .. } => Some(*span),
            ParseError::EmptySnippet => None,
        }
    }
}
