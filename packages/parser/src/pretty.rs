//! Pretty terminal rendering of parse errors (feature `pretty-errors`).

use ariadne::{Color, Label, Report, ReportKind, Source};
use mapwright_common::ParseError;

/// Render an error as an underlined source report. Falls back to the
/// plain message when the error carries no line information.
pub fn render_error(error: &ParseError, source: &str) -> String {
    let Some(line_number) = error.line else {
        return error.to_string();
    };

    let Some((offset, line_len)) = line_span(source, line_number) else {
        return error.to_string();
    };
    let span = offset..offset + line_len.max(1);

    let mut buffer = Vec::new();
    let report = Report::build(ReportKind::Error, (), offset)
        .with_message(&error.message)
        .with_label(
            Label::new(span)
                .with_message(format!("{} error", error.category))
                .with_color(Color::Red),
        )
        .finish();

    match report.write(Source::from(source), &mut buffer) {
        Ok(()) => String::from_utf8_lossy(&buffer).into_owned(),
        Err(_) => error.to_string(),
    }
}

/// Byte offset and length of a 1-based line.
fn line_span(source: &str, line_number: usize) -> Option<(usize, usize)> {
    let mut offset = 0;
    for (idx, line) in source.split('\n').enumerate() {
        if idx + 1 == line_number {
            return Some((offset, line.len()));
        }
        offset += line.len() + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_a_located_error() {
        let source = "component A [0.5, 0.5]\ncomponent \"broken [0.1, 0.2]";
        let error = ParseError::syntax("unclosed quote").at_line(2, "component \"broken [0.1, 0.2]");
        let rendered = render_error(&error, source);
        assert!(rendered.contains("unclosed quote"));
    }

    #[test]
    fn falls_back_to_plain_message_without_location() {
        let error = ParseError::critical("document unreadable");
        let rendered = render_error(&error, "whatever");
        assert_eq!(rendered, "critical error: document unreadable");
    }

    #[test]
    fn out_of_range_line_falls_back() {
        let error = ParseError::syntax("oops").at_line(99, "x");
        let rendered = render_error(&error, "one line only");
        assert_eq!(rendered, "syntax error: oops");
    }
}
