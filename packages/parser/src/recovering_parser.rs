//! Quoted-name extraction with a cascade of recovery strategies.
//!
//! Given a line fragment that starts (or should start) with a double
//! quote, the parser runs an ordered list of strategies, strictest first,
//! and returns the first result. Every tier past the strict parse marks
//! the outcome recovered and says which strategy ran, so callers can show
//! a non-blocking notice. For string input the cascade is total: the last
//! tiers always produce something.

use mapwright_common::{ParseError, ParseOutcome, ParseStrategy, ParseWarning};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::name_codec::{unescape_lenient, unescape_strict};

/// Substituted by the last-resort tier when nothing usable remains after
/// the opening quote.
pub const RECOVERED_COMPONENT: &str = "Recovered Component";

/// Substituted by the absolute fallback when there is no input at all.
pub const FALLBACK_COMPONENT: &str = "Component";

/// A name pulled out of a line fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedName {
    pub value: String,
    /// Bytes of the input fragment covered by the name source text,
    /// including quotes. Grammars continue parsing from here.
    pub consumed: usize,
}

struct NameParseContext<'a> {
    input: &'a str,
    line_number: usize,
}

type Strategy = fn(&NameParseContext) -> Option<ParseOutcome<ParsedName>>;

/// Ordered strictest to most permissive; the driver takes the first hit.
const STRATEGIES: [Strategy; 4] = [
    strict_parse,
    lenient_parse,
    heuristic_recovery,
    last_resort_extraction,
];

/// Parse a quoted name from the start of `input`.
///
/// `None` models an absent value at an untyped boundary and takes the
/// absolute fallback. Everything else flows through the strategy cascade.
pub fn parse_quoted_name(input: Option<&str>, line_number: usize) -> ParseOutcome<ParsedName> {
    let Some(raw) = input else {
        return absolute_fallback(line_number, "no input");
    };
    if raw.trim().is_empty() {
        return absolute_fallback(line_number, "empty input");
    }

    let ctx = NameParseContext {
        input: raw,
        line_number,
    };
    for strategy in STRATEGIES {
        if let Some(outcome) = strategy(&ctx) {
            return outcome;
        }
    }

    // The last-resort tier accepts any non-empty string; reaching this
    // point means the input defeated every tier, which only absent input
    // should be able to do.
    ParseOutcome::failure(
        ParseError::critical("no parsing strategy produced a value").at_line(line_number, raw),
    )
}

fn absolute_fallback(line_number: usize, reason: &str) -> ParseOutcome<ParsedName> {
    ParseOutcome::recovered(
        ParsedName {
            value: FALLBACK_COMPONENT.to_string(),
            consumed: 0,
        },
        ParseStrategy::Fallback,
    )
    .with_warning(ParseWarning::at_line(
        format!("{}; substituted \"{}\"", reason, FALLBACK_COMPONENT),
        line_number,
    ))
}

/// Find the closing quote matching the opener at byte 0. A quote is real
/// when preceded by an even run of backslashes.
fn find_closing_quote(input: &str) -> Option<usize> {
    let bytes = input.as_bytes();
    let mut i = 1;
    while i < bytes.len() {
        if bytes[i] == b'"' {
            let mut backslashes = 0;
            let mut j = i;
            while j > 1 && bytes[j - 1] == b'\\' {
                backslashes += 1;
                j -= 1;
            }
            if backslashes % 2 == 0 {
                return Some(i);
            }
        }
        i += 1;
    }
    None
}

/// Tier 1: a well-formed quote pair with only recognized escapes.
fn strict_parse(ctx: &NameParseContext) -> Option<ParseOutcome<ParsedName>> {
    if !ctx.input.starts_with('"') {
        return None;
    }
    let close = find_closing_quote(ctx.input)?;
    let inner = &ctx.input[1..close];
    let value = unescape_strict(inner).ok()?;
    if value.trim().is_empty() {
        return None;
    }
    Some(ParseOutcome::success(ParsedName {
        value,
        consumed: close + 1,
    }))
}

static MISSING_CLOSE_BEFORE_BRACKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"([^"\[]*?)\s*\["#).expect("static pattern"));
static CLOSED_WITH_BAD_ESCAPES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"((?:[^"\\]|\\.)*)"\s*"#).expect("static pattern"));

/// Tier 2: pattern-matched repair of common damage: a closing quote that
/// exists but guards broken escapes, or a close that was dropped just
/// before the coordinate block. Unrecognized escapes are dropped with a
/// warning.
fn lenient_parse(ctx: &NameParseContext) -> Option<ParseOutcome<ParsedName>> {
    if !ctx.input.starts_with('"') {
        return None;
    }

    if let Some(captures) = CLOSED_WITH_BAD_ESCAPES.captures(ctx.input) {
        let inner = captures.get(1).expect("group 1").as_str();
        let (value, dropped) = unescape_lenient(inner);
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            let consumed = captures.get(1).expect("group 1").end() + 1;
            let mut outcome = ParseOutcome::recovered(
                ParsedName {
                    value: trimmed.to_string(),
                    consumed,
                },
                ParseStrategy::Lenient,
            );
            if dropped > 0 {
                outcome = outcome.with_warning(ParseWarning::at_line(
                    format!("dropped {} unrecognized escape sequence(s)", dropped),
                    ctx.line_number,
                ));
            }
            return Some(outcome.with_warning(ParseWarning::at_line(
                "name parsed leniently",
                ctx.line_number,
            )));
        }
    }

    if let Some(captures) = MISSING_CLOSE_BEFORE_BRACKET.captures(ctx.input) {
        let group = captures.get(1).expect("group 1");
        let (value, _) = unescape_lenient(group.as_str());
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(
                ParseOutcome::recovered(
                    ParsedName {
                        value: trimmed.to_string(),
                        consumed: group.end(),
                    },
                    ParseStrategy::Lenient,
                )
                .with_warning(ParseWarning::at_line(
                    "closing quote missing before coordinate block",
                    ctx.line_number,
                )),
            );
        }
    }

    None
}

/// Tier 3: no quote pair at all. Guess the end boundary as the earliest of
/// `[`, a line break, a comment marker, or end-of-input, and strip any
/// dangling quotes or backslashes from the extracted content.
fn heuristic_recovery(ctx: &NameParseContext) -> Option<ParseOutcome<ParsedName>> {
    let body_start = usize::from(ctx.input.starts_with('"'));
    let body = &ctx.input[body_start..];

    let mut boundary = body.len();
    for marker in ["[", "\n", "//"] {
        if let Some(pos) = body.find(marker) {
            boundary = boundary.min(pos);
        }
    }

    let content = body[..boundary]
        .trim()
        .trim_matches(|c| c == '"' || c == '\\')
        .trim();
    if content.is_empty() {
        return None;
    }

    Some(
        ParseOutcome::recovered(
            ParsedName {
                value: content.to_string(),
                consumed: body_start + boundary,
            },
            ParseStrategy::Heuristic,
        )
        .with_warning(ParseWarning::at_line(
            "no quote pair found; name boundary was guessed",
            ctx.line_number,
        )),
    )
}

/// Tier 4: take everything after the opening quote up to the first `[`,
/// and substitute a placeholder if that leaves nothing.
fn last_resort_extraction(ctx: &NameParseContext) -> Option<ParseOutcome<ParsedName>> {
    let body_start = usize::from(ctx.input.starts_with('"'));
    let body = &ctx.input[body_start..];
    let boundary = body.find('[').unwrap_or(body.len());

    let content = body[..boundary].trim();
    let value = if content.is_empty() {
        RECOVERED_COMPONENT.to_string()
    } else {
        content.to_string()
    };

    Some(
        ParseOutcome::recovered(
            ParsedName {
                value,
                consumed: body_start + boundary,
            },
            ParseStrategy::LastResort,
        )
        .with_warning(ParseWarning::at_line(
            "name extracted by last-resort recovery",
            ctx.line_number,
        )),
    )
}
