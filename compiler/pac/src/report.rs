//! Source-labelled error reports.

use std::ops::Range;
use std::path::Path;

use ariadne::{Config, Label, Report, ReportKind, Source};
use pa_ir::Span;

/// Render `message` for the file at `path`, pointing at `span` in `text`.
/// Falls back to a single line when there is no span.
pub(crate) fn render(
    path: &Path,
    text: &str,
    message: &str,
    span: Option<Span>,
    color: bool,
) -> String {
    let name = path.display().to_string();
    let Some(span) = span else {
        return format!("error: {name}: {message}");
    };

    let range = char_range(text, span);
    let mut out = Vec::new();
    let written = Report::build(ReportKind::Error, name.clone(), range.start)
        .with_config(Config::default().with_color(color))
        .with_message(message)
        .with_label(Label::new((name.clone(), range)).with_message("here"))
        .finish()
        .write((name.clone(), Source::from(text)), &mut out);

    match written {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => format!("error: {name}: {message}"),
    }
}

/// Ariadne counts characters; spans count bytes.
fn char_range(text: &str, span: Span) -> Range<usize> {
    let to_chars = |offset: u32| {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        text.char_indices()
            .take_while(|(index, _)| *index < offset)
            .count()
    };
    let start = to_chars(span.start);
    let end = to_chars(span.end).max(start + 1);
    start..end
}
