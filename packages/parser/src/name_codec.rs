//! Raw ↔ source encoding of element names.
//!
//! A name as the UI holds it ("raw") may contain newlines, quotes, or
//! arrows; embedded in a map-text line ("source") those would break the
//! line grammar, so the codec quotes and escapes them. The two directions
//! are exact inverses for any raw name free of NUL bytes.

use mapwright_common::ParseError;

/// True when a raw name cannot be embedded bare: it contains a character
/// the line grammars treat as structure, or would lose leading/trailing
/// whitespace to trimming.
pub fn needs_quoting(raw: &str) -> bool {
    raw.contains(['\n', '\r', '\t', '"', '\\', '[', ']'])
        || raw.contains("->")
        || raw.contains("+>")
        || raw != raw.trim()
}

/// Encode a raw name for embedding in a line. Names that need no quoting
/// pass through unchanged; everything else is escaped and wrapped in
/// double quotes.
pub fn escape_for_source(raw: &str) -> String {
    if !needs_quoting(raw) {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len() + 2);
    out.push('"');
    for ch in raw.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Decode a source-form name back to raw text: strip one layer of
/// surrounding quotes if present, then undo the escapes. Unknown escape
/// sequences are dropped silently; strict callers use
/// [`unescape_strict`] instead.
pub fn unescape_from_source(source: &str) -> String {
    let inner = strip_quotes(source);
    unescape_lenient(inner).0
}

/// Remove exactly one layer of surrounding double quotes, if both are
/// present.
pub fn strip_quotes(source: &str) -> &str {
    if source.len() >= 2 && source.starts_with('"') && source.ends_with('"') {
        &source[1..source.len() - 1]
    } else {
        source
    }
}

/// Undo escapes, erroring on any sequence outside `\n \r \t \" \\`.
///
/// A single pass keeps `\\n` (escaped backslash, then a literal 'n')
/// distinct from `\n` (newline), which ordered find-and-replace cannot.
pub fn unescape_strict(inner: &str) -> Result<String, ParseError> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                return Err(ParseError::syntax(format!(
                    "unrecognized escape sequence '\\{}'",
                    other
                )))
            }
            None => return Err(ParseError::syntax("dangling backslash at end of name")),
        }
    }
    Ok(out)
}

/// Undo escapes, dropping anything unrecognized. Returns the decoded text
/// and how many sequences were dropped (for recovery warnings).
pub fn unescape_lenient(inner: &str) -> (String, usize) {
    let mut out = String::with_capacity(inner.len());
    let mut dropped = 0usize;
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(_) | None => dropped += 1,
        }
    }
    (out, dropped)
}
