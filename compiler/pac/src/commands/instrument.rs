//! The `instrument` command: print or write a file's rewritten source.

use std::fs;
use std::path::Path;

use pa_instrument::{instrument_source, InstrumentConfig};

use crate::error::CommandError;

/// Instrument the file at `path` with the default configuration.
pub fn instrument_file(path: &Path) -> Result<String, CommandError> {
    let text = fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let absolute = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());

    match instrument_source(&text, &absolute.display().to_string(), &InstrumentConfig::default()) {
        Ok(instrumented) => Ok(instrumented),
        Err(error) => Err(CommandError::Instrument {
            path: path.to_path_buf(),
            text,
            error,
        }),
    }
}

/// Write the instrumented source to `out`, or print it when `out` is `None`.
pub fn write_instrumented(path: &Path, out: Option<&Path>) -> Result<(), CommandError> {
    let instrumented = instrument_file(path)?;
    match out {
        Some(out) => fs::write(out, instrumented).map_err(|source| CommandError::Write {
            path: out.to_path_buf(),
            source,
        }),
        None => {
            print!("{instrumented}");
            Ok(())
        }
    }
}
