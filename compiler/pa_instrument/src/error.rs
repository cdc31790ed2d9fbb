//! Instrumentation errors. All of them abort the file.

use pa_ir::Span;
use pa_parse::ParseError;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InstrumentError {
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// An expression shape the capture rules cannot rewrite.
    #[error("line {line}: cannot instrument {construct}")]
    Structural {
        construct: &'static str,
        line: u32,
        span: Span,
    },
    #[error("line {line}: assertion argument has no source position")]
    MissingPosition { line: u32 },
    /// A rewritten node has no counterpart in the original argument.
    #[error("line {line}: no node at `{path}` in the original argument")]
    ArgumentNotFound { path: String, line: u32 },
    #[error("line {line}: dynamic import() needs a string literal specifier")]
    DynamicImport { line: u32, span: Span },
    #[error("recorder _rec{recorder} has no source snippet")]
    MissingSnippet { recorder: u32 },
}

impl InstrumentError {
    /// Source location of the error, when it has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            InstrumentError::Parse(err) => err.span(),
            InstrumentError::Structural { span, .. } | InstrumentError::DynamicImport { span, .. } => {
                Some(*span)
            }
            InstrumentError::MissingPosition { .. }
            | InstrumentError::ArgumentNotFound { .. }
            | InstrumentError::MissingSnippet { .. } => None,
        }
    }
}
