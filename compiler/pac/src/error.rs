//! Driver errors.

use std::io;
use std::path::PathBuf;

use pa_eval::EvalError;
use pa_instrument::InstrumentError;
use pa_parse::ParseError;

use crate::report;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("path not found: {}", .0.display())]
    PathNotFound(PathBuf),
    #[error("failed to read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write `{}`: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    /// The test file could not be instrumented. `text` is the file content.
    #[error("{}: {error}", path.display())]
    Instrument {
        path: PathBuf,
        text: String,
        #[source]
        error: InstrumentError,
    },
    /// The instrumented output did not parse. `text` is the rewritten source.
    #[error("{}: instrumented source does not parse: {error}", path.display())]
    Parse {
        path: PathBuf,
        text: String,
        #[source]
        error: ParseError,
    },
    #[error("{}: {error}", path.display())]
    Eval {
        path: PathBuf,
        #[source]
        error: EvalError,
    },
}

impl CommandError {
    /// Render for the terminal, with a source excerpt when the error has a
    /// location.
    pub fn render(&self, color: bool) -> String {
        match self {
            CommandError::Instrument { path, text, error } => {
                report::render(path, text, &error.to_string(), error.span(), color)
            }
            CommandError::Parse { path, text, error } => report::render(
                path,
                text,
                &format!("instrumented source does not parse: {error}"),
                error.span(),
                color,
            ),
            _ => format!("error: {self}"),
        }
    }
}
