//! Whole-document loading recovery.
//!
//! Wraps a caller-supplied document parser in a ladder of repairs, each
//! more invasive than the last: parse as-is, balance quotes, clean up
//! encoding damage, and finally replace individually unparseable lines
//! with a visible marker comment instead of dropping them. Later rungs
//! build on the text the earlier rungs produced.

use mapwright_common::{ParseError, ParseWarning};
use serde::{Deserialize, Serialize};

/// Which rung of the repair ladder produced the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LoadStrategy {
    Direct,
    QuoteRepair,
    EncodingCleanup,
    LineSkip,
    Failed,
}

/// Outcome of a recovering load. `text` is the (possibly repaired)
/// document the successful parse actually saw; callers that persist the
/// repair write it back.
#[derive(Debug, Clone)]
pub struct LoadOutcome<T> {
    pub value: Option<T>,
    pub text: String,
    pub recovered: bool,
    pub notices: Vec<ParseWarning>,
    pub errors: Vec<ParseError>,
    pub strategy: LoadStrategy,
}

impl<T> LoadOutcome<T> {
    pub fn is_success(&self) -> bool {
        self.value.is_some()
    }
}

/// Marker prefix for lines the line-skipping rung had to neutralize.
pub const UNPARSEABLE_MARKER: &str = "// unparseable: ";

/// Load a document through the repair ladder. The parser is whatever the
/// caller uses to turn text into a document; the handler only pre- and
/// post-processes the raw text around it.
pub fn load_with_recovery<T, F>(text: &str, parse: F) -> LoadOutcome<T>
where
    F: Fn(&str) -> Result<T, ParseError>,
{
    let mut notices = Vec::new();

    // Rung 1: as-is.
    match parse(text) {
        Ok(value) => {
            return LoadOutcome {
                value: Some(value),
                text: text.to_string(),
                recovered: false,
                notices,
                errors: Vec::new(),
                strategy: LoadStrategy::Direct,
            }
        }
        Err(err) => {
            tracing::debug!(%err, "direct parse failed; starting recovery");
        }
    }

    // Rung 2: balance quotes line by line.
    let (repaired, repaired_lines) = balance_quotes(text);
    if !repaired_lines.is_empty() {
        for line in &repaired_lines {
            notices.push(ParseWarning::at_line("appended a missing closing quote", *line));
        }
        if let Ok(value) = parse(&repaired) {
            return LoadOutcome {
                value: Some(value),
                text: repaired,
                recovered: true,
                notices,
                errors: Vec::new(),
                strategy: LoadStrategy::QuoteRepair,
            };
        }
    }

    // Rung 3: strip encoding damage from the quote-balanced text.
    let cleaned = clean_encoding(&repaired);
    if cleaned != repaired {
        notices.push(ParseWarning::new(
            "removed byte-order marks and control characters",
        ));
        if let Ok(value) = parse(&cleaned) {
            return LoadOutcome {
                value: Some(value),
                text: cleaned,
                recovered: true,
                notices,
                errors: Vec::new(),
                strategy: LoadStrategy::EncodingCleanup,
            };
        }
    }

    // Rung 4: neutralize unparseable lines one at a time, driven by the
    // line numbers the parser reports. Bounded by the line count.
    let mut current = cleaned;
    let line_count = current.split('\n').count();
    let mut last_error = None;
    for _ in 0..line_count {
        match parse(&current) {
            Ok(value) => {
                return LoadOutcome {
                    value: Some(value),
                    text: current,
                    recovered: true,
                    notices,
                    errors: Vec::new(),
                    strategy: LoadStrategy::LineSkip,
                };
            }
            Err(err) => {
                let Some(bad_line) = err.line else {
                    last_error = Some(err);
                    break;
                };
                let mut lines: Vec<String> =
                    current.split('\n').map(|l| l.to_string()).collect();
                let Some(slot) = bad_line.checked_sub(1).and_then(|i| lines.get_mut(i)) else {
                    last_error = Some(err);
                    break;
                };
                if slot.starts_with(UNPARSEABLE_MARKER) {
                    // The parser keeps rejecting a line we already
                    // neutralized; repair cannot converge.
                    last_error = Some(err);
                    break;
                }
                tracing::warn!(line = bad_line, "replacing unparseable line with marker");
                notices.push(ParseWarning::at_line(
                    format!("line replaced with marker comment: {}", slot.trim()),
                    bad_line,
                ));
                *slot = format!("{}{}", UNPARSEABLE_MARKER, slot);
                current = lines.join("\n");
                last_error = Some(err);
            }
        }
    }

    let mut errors = vec![ParseError::critical(
        "document could not be loaded by any recovery strategy",
    )];
    if let Some(err) = last_error {
        errors.push(err);
    }
    LoadOutcome {
        value: None,
        text: current,
        recovered: false,
        notices,
        errors,
        strategy: LoadStrategy::Failed,
    }
}

/// Append a closing quote to every line with an odd count of unescaped
/// quotes. Returns the repaired text and the 1-based lines touched.
fn balance_quotes(text: &str) -> (String, Vec<usize>) {
    let mut repaired_lines = Vec::new();
    let lines: Vec<String> = text
        .split('\n')
        .enumerate()
        .map(|(idx, raw_line)| {
            let (body, cr) = match raw_line.strip_suffix('\r') {
                Some(body) => (body, "\r"),
                None => (raw_line, ""),
            };
            if unescaped_quote_count(body) % 2 == 1 {
                repaired_lines.push(idx + 1);
                format!("{}\"{}", body, cr)
            } else {
                raw_line.to_string()
            }
        })
        .collect();
    (lines.join("\n"), repaired_lines)
}

fn unescaped_quote_count(line: &str) -> usize {
    let mut count = 0;
    let mut escaped = false;
    for ch in line.chars() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => escaped = true,
            '"' => count += 1,
            _ => {}
        }
    }
    count
}

/// Drop byte-order marks, NUL bytes, and C0/C1 control characters other
/// than tab, newline, and carriage return.
fn clean_encoding(text: &str) -> String {
    text.chars()
        .filter(|ch| {
            let code = *ch as u32;
            if *ch == '\u{feff}' {
                return false;
            }
            if matches!(ch, '\t' | '\n' | '\r') {
                return true;
            }
            !(code < 0x20 || code == 0x7f || (0x80..=0x9f).contains(&code))
        })
        .collect()
}
