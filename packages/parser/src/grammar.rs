//! One parse function per line grammar.
//!
//! Each grammar (component, anchor, note, evolve, link, pipeline, PST
//! attitude, title) is isolated behind its own function returning a typed
//! declaration, so callers dispatch on variants instead of re-deriving
//! intent from substring checks. [`classify_line`] decides which grammar a
//! line belongs to.
//!
//! Grammars are recovery-first: a damaged name flows through the
//! recovering string parser, missing coordinates fall back to defaults
//! with a warning, and only structurally hopeless lines (a link with no
//! endpoint, an attitude without a box) fail outright.

use mapwright_common::{ParseError, ParseOutcome, ParseStrategy, ParseWarning};

use crate::ast::{
    AnchorDecl, Attitude, AttitudeDecl, ComponentClass, ComponentDecl, DeliveryMethod, EvolveDecl,
    LabelOffset, LinkDecl, LinkKind, MapElement, NoteDecl, PipelineBlock, PipelineComponent, Span,
    TitleDecl,
};
use crate::name_validator::RECOVERED_NAME_FALLBACK;
use crate::recovering_parser::parse_quoted_name;
use crate::tokenizer::{tokenize, Token};
use once_cell::sync::Lazy;
use regex::Regex;

/// Default position for a component or anchor whose coordinate block is
/// missing or damaged: top-left of the value chain, genesis side.
const DEFAULT_VISIBILITY: f64 = 0.9;
const DEFAULT_MATURITY: f64 = 0.1;
/// Default maturity for a damaged evolve statement or pipeline component.
const DEFAULT_EVOLVE_MATURITY: f64 = 0.85;
const DEFAULT_PIPELINE_MATURITY: f64 = 0.5;

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Blank,
    Comment,
    Component,
    Anchor,
    Note,
    Evolve,
    Pipeline,
    Attitude(Attitude),
    Title,
    Link(LinkKind),
    BlockClose,
    Unknown,
}

/// Decide which grammar a line belongs to. Keyword heads win over link
/// arrows; arrows are only honored outside quoted names.
pub fn classify_line(line: &str) -> LineKind {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineKind::Blank;
    }
    if trimmed.starts_with("//") {
        return LineKind::Comment;
    }
    if trimmed == "}" {
        return LineKind::BlockClose;
    }

    let first_word = trimmed.split_whitespace().next().unwrap_or("");
    match first_word {
        "component" => LineKind::Component,
        "anchor" => LineKind::Anchor,
        "note" => LineKind::Note,
        "evolve" => LineKind::Evolve,
        "pipeline" => LineKind::Pipeline,
        "pioneers" => LineKind::Attitude(Attitude::Pioneers),
        "settlers" => LineKind::Attitude(Attitude::Settlers),
        "townplanners" => LineKind::Attitude(Attitude::Townplanners),
        "title" => LineKind::Title,
        _ => match find_link_arrow(line) {
            Some((_, kind)) => LineKind::Link(kind),
            None => LineKind::Unknown,
        },
    }
}

/// Find the first link arrow outside quoted regions. `->>` outranks `->`
/// at the same position.
pub fn find_link_arrow(line: &str) -> Option<(usize, LinkKind)> {
    let mut in_quote = false;
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        if in_quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_quote = false;
            }
            continue;
        }
        match ch {
            '"' => in_quote = true,
            _ => {
                let rest = &line[i..];
                if rest.starts_with("->>") {
                    return Some((i, LinkKind::Flow));
                }
                if rest.starts_with("->") {
                    return Some((i, LinkKind::Dependency));
                }
                if rest.starts_with("+>") {
                    return Some((i, LinkKind::ValueFlow));
                }
            }
        }
    }
    None
}

/// Find `needle` in `line[from..]` skipping quoted regions; returns an
/// absolute byte index.
fn find_outside_quotes(line: &str, from: usize, needle: char) -> Option<usize> {
    let mut in_quote = false;
    let mut escaped = false;
    for (i, ch) in line[from..].char_indices() {
        if in_quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_quote = false;
            }
            continue;
        }
        if ch == '"' {
            in_quote = true;
        } else if ch == needle {
            return Some(from + i);
        }
    }
    None
}

fn is_outside_quotes(line: &str, pos: usize) -> bool {
    let mut in_quote = false;
    let mut escaped = false;
    for (i, ch) in line.char_indices() {
        if i >= pos {
            break;
        }
        if in_quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_quote = false;
            }
        } else if ch == '"' {
            in_quote = true;
        }
    }
    !in_quote
}

/// Diagnostics collector threaded through a single line parse.
#[derive(Debug, Default)]
struct Diag {
    errors: Vec<ParseError>,
    warnings: Vec<ParseWarning>,
    recovered: bool,
    strategy: Option<ParseStrategy>,
}

impl Diag {
    fn absorb<T>(&mut self, outcome: ParseOutcome<T>) -> Option<T> {
        self.errors.extend(outcome.errors);
        self.warnings.extend(outcome.warnings);
        if outcome.recovered {
            self.recovered = true;
            if self.strategy.is_none() {
                self.strategy = Some(outcome.strategy);
            }
        }
        outcome.value
    }

    fn warn(&mut self, message: impl Into<String>, line_number: usize) {
        self.warnings
            .push(ParseWarning::at_line(message, line_number));
    }

    fn recover(&mut self, strategy: ParseStrategy, message: impl Into<String>, line_number: usize) {
        self.recovered = true;
        if self.strategy.is_none() {
            self.strategy = Some(strategy);
        }
        self.warn(message, line_number);
    }

    fn finish<T>(self, value: T) -> ParseOutcome<T> {
        ParseOutcome {
            value: Some(value),
            errors: self.errors,
            warnings: self.warnings,
            recovered: self.recovered,
            strategy: self.strategy.unwrap_or(ParseStrategy::Strict),
        }
    }

    fn fail<T>(mut self, error: ParseError) -> ParseOutcome<T> {
        self.errors.push(error);
        ParseOutcome {
            value: None,
            errors: self.errors,
            warnings: self.warnings,
            recovered: self.recovered,
            strategy: self.strategy.unwrap_or(ParseStrategy::Strict),
        }
    }
}

/// Byte range of the keyword head (assumes the classifier matched it).
fn keyword_bounds(line: &str, keyword: &str) -> (usize, usize) {
    let start = line.len() - line.trim_start().len();
    (start, start + keyword.len())
}

/// Parse a name that runs from `start` to the first of `boundary_chars`
/// (bare form) or through the quoted-name cascade (quoted form).
fn parse_name_region(
    line: &str,
    start: usize,
    boundary_chars: &[char],
    line_number: usize,
    diag: &mut Diag,
) -> (String, Span) {
    let region = &line[start..];
    let s0 = start + (region.len() - region.trim_start().len());

    if s0 >= line.len() {
        diag.recover(
            ParseStrategy::Fallback,
            format!("missing name replaced with \"{}\"", RECOVERED_NAME_FALLBACK),
            line_number,
        );
        return (
            RECOVERED_NAME_FALLBACK.to_string(),
            Span::new(line.len(), line.len()),
        );
    }

    if line[s0..].starts_with('"') {
        let outcome = parse_quoted_name(Some(&line[s0..]), line_number);
        let consumed = outcome.value.as_ref().map(|n| n.consumed).unwrap_or(0);
        let value = diag
            .absorb(outcome)
            .map(|n| n.value)
            .unwrap_or_else(|| RECOVERED_NAME_FALLBACK.to_string());
        let end = (s0 + consumed.max(1)).min(line.len());
        return (value, Span::new(s0, end));
    }

    let boundary = line[s0..]
        .char_indices()
        .find(|(_, ch)| boundary_chars.contains(ch))
        .map(|(i, _)| s0 + i)
        .unwrap_or(line.len());
    let src = line[s0..boundary].trim_end();
    if src.is_empty() {
        diag.recover(
            ParseStrategy::Fallback,
            format!("missing name replaced with \"{}\"", RECOVERED_NAME_FALLBACK),
            line_number,
        );
        return (RECOVERED_NAME_FALLBACK.to_string(), Span::new(s0, s0));
    }
    (src.to_string(), Span::new(s0, s0 + src.len()))
}

/// Parse a name out of an explicitly bounded slice (evolve and link
/// segments, where structure, not a bracket, ends the name).
fn parse_name_slice(
    line: &str,
    start: usize,
    end: usize,
    line_number: usize,
    diag: &mut Diag,
) -> Option<(String, Span)> {
    let region = &line[start..end];
    let s0 = start + (region.len() - region.trim_start().len());
    if s0 >= end {
        return None;
    }

    if line[s0..end].starts_with('"') {
        let outcome = parse_quoted_name(Some(&line[s0..end]), line_number);
        let consumed = outcome.value.as_ref().map(|n| n.consumed).unwrap_or(0);
        let value = diag.absorb(outcome).map(|n| n.value)?;
        let span_end = (s0 + consumed.max(1)).min(end);
        return Some((value, Span::new(s0, span_end)));
    }

    let src = line[s0..end].trim_end();
    if src.is_empty() {
        return None;
    }
    Some((src.to_string(), Span::new(s0, s0 + src.len())))
}

/// Parse a `[n, n, ...]` block at or after `from`. Returns the numbers and
/// the span covering both brackets. A missing closing bracket is repaired
/// with a warning; a wrong number count is a miss (caller decides whether
/// that means defaults or an error).
fn parse_coord_block(
    line: &str,
    from: usize,
    expect: usize,
    line_number: usize,
    diag: &mut Diag,
) -> Option<(Vec<f64>, Span)> {
    let bracket = from + line[from..].find('[')?;
    let (inner_end, span_end) = match line[bracket..].find(']') {
        Some(rel) => (bracket + rel, bracket + rel + 1),
        None => {
            diag.recover(
                ParseStrategy::Heuristic,
                "coordinate block missing its closing bracket",
                line_number,
            );
            (line.len(), line.len())
        }
    };

    let inner = &line[bracket + 1..inner_end];
    let mut numbers = Vec::new();
    for (token, _) in tokenize(inner) {
        if let Token::Number(text) = token {
            match text.parse::<f64>() {
                Ok(value) => numbers.push(value),
                Err(_) => diag.warn(format!("unreadable number '{}' ignored", text), line_number),
            }
        }
    }

    if numbers.len() < expect {
        diag.errors.push(
            ParseError::syntax(format!(
                "coordinate block has {} number(s); expected {}",
                numbers.len(),
                expect
            ))
            .at_line(line_number, line),
        );
        return None;
    }
    if numbers.len() > expect {
        diag.warn(
            format!(
                "coordinate block has {} numbers; extra values ignored",
                numbers.len()
            ),
            line_number,
        );
        numbers.truncate(expect);
    }

    Some((numbers, Span::new(bracket, span_end)))
}

/// Walk the decorator tail after the coordinate block: `inertia`,
/// `(buy|build|outsource)`, `(market|ecosystem)`, `label [dx, dy]`.
#[allow(clippy::type_complexity)]
fn parse_decorator_tail(
    tail: &str,
    line_number: usize,
    diag: &mut Diag,
) -> (
    bool,
    Option<DeliveryMethod>,
    Option<ComponentClass>,
    Option<LabelOffset>,
) {
    let tokens = tokenize(tail);
    let mut inertia = false;
    let mut method = None;
    let mut class = None;
    let mut label = None;
    let mut unknown = false;

    let mut i = 0;
    while i < tokens.len() {
        match &tokens[i].0 {
            Token::Inertia => inertia = true,
            Token::Label => {
                let mut numbers = Vec::new();
                let mut j = i + 1;
                while j < tokens.len() {
                    match &tokens[j].0 {
                        Token::RBracket => break,
                        Token::Number(text) => {
                            if let Ok(value) = text.parse::<f64>() {
                                numbers.push(value);
                            }
                        }
                        _ => {}
                    }
                    j += 1;
                }
                if numbers.len() == 2 {
                    label = Some(LabelOffset {
                        dx: numbers[0],
                        dy: numbers[1],
                    });
                } else {
                    diag.warn("label block needs exactly two offsets", line_number);
                }
                i = j;
            }
            Token::LParen => {
                if let Some((Token::Ident(word), _)) = tokens.get(i + 1) {
                    match *word {
                        "buy" => method = Some(DeliveryMethod::Buy),
                        "build" => method = Some(DeliveryMethod::Build),
                        "outsource" => method = Some(DeliveryMethod::Outsource),
                        "market" => class = Some(ComponentClass::Market),
                        "ecosystem" => class = Some(ComponentClass::Ecosystem),
                        other => {
                            diag.warn(format!("unknown decorator '({})'", other), line_number)
                        }
                    }
                }
                while i < tokens.len() && tokens[i].0 != Token::RParen {
                    i += 1;
                }
            }
            _ => unknown = true,
        }
        i += 1;
    }

    if unknown {
        diag.warn("unrecognized trailing tokens ignored", line_number);
    }

    (inertia, method, class, label)
}

/// `component <Name> [<visibility>, <maturity>] [inertia] [(...)] [label [..]]`
pub fn parse_component_line(line: &str, line_number: usize) -> ParseOutcome<ComponentDecl> {
    let mut diag = Diag::default();
    let (_, kw_end) = keyword_bounds(line, "component");

    let (name, name_span) = parse_name_region(line, kw_end, &['['], line_number, &mut diag);

    let coords = parse_coord_block(line, name_span.end, 2, line_number, &mut diag);
    let (visibility, maturity, coords_span) = match coords {
        Some((numbers, span)) => (numbers[0], numbers[1], Some(span)),
        None => {
            diag.recover(
                ParseStrategy::Heuristic,
                "coordinates missing; component placed at the default position",
                line_number,
            );
            (DEFAULT_VISIBILITY, DEFAULT_MATURITY, None)
        }
    };

    let tail_start = coords_span.map(|s| s.end).unwrap_or(name_span.end);
    let (inertia, method, class, label) =
        parse_decorator_tail(&line[tail_start.min(line.len())..], line_number, &mut diag);

    diag.finish(ComponentDecl {
        name,
        name_span,
        visibility,
        maturity,
        coords_span,
        inertia,
        method,
        class,
        label,
        line: line_number,
    })
}

/// `anchor <Name> [<visibility>, <maturity>] [label [<dx>, <dy>]]`
pub fn parse_anchor_line(line: &str, line_number: usize) -> ParseOutcome<AnchorDecl> {
    let mut diag = Diag::default();
    let (_, kw_end) = keyword_bounds(line, "anchor");

    let (name, name_span) = parse_name_region(line, kw_end, &['['], line_number, &mut diag);

    let coords = parse_coord_block(line, name_span.end, 2, line_number, &mut diag);
    let (visibility, maturity, coords_span) = match coords {
        Some((numbers, span)) => (numbers[0], numbers[1], Some(span)),
        None => {
            diag.recover(
                ParseStrategy::Heuristic,
                "coordinates missing; anchor placed at the default position",
                line_number,
            );
            (DEFAULT_VISIBILITY, DEFAULT_MATURITY, None)
        }
    };

    let tail_start = coords_span.map(|s| s.end).unwrap_or(name_span.end);
    let (_, _, _, label) =
        parse_decorator_tail(&line[tail_start.min(line.len())..], line_number, &mut diag);

    diag.finish(AnchorDecl {
        name,
        name_span,
        visibility,
        maturity,
        coords_span,
        label,
        line: line_number,
    })
}

/// `note <Text> [<visibility>, <maturity>]`
pub fn parse_note_line(line: &str, line_number: usize) -> ParseOutcome<NoteDecl> {
    let mut diag = Diag::default();
    let (_, kw_end) = keyword_bounds(line, "note");

    let (text, text_span) = parse_name_region(line, kw_end, &['['], line_number, &mut diag);

    let coords = parse_coord_block(line, text_span.end, 2, line_number, &mut diag);
    let (visibility, maturity, coords_span) = match coords {
        Some((numbers, span)) => (numbers[0], numbers[1], Some(span)),
        None => {
            diag.recover(
                ParseStrategy::Heuristic,
                "coordinates missing; note placed at the default position",
                line_number,
            );
            (DEFAULT_VISIBILITY, DEFAULT_MATURITY, None)
        }
    };

    diag.finish(NoteDecl {
        text,
        text_span,
        visibility,
        maturity,
        coords_span,
        line: line_number,
    })
}

/// `title <text>`
pub fn parse_title_line(line: &str, line_number: usize) -> ParseOutcome<TitleDecl> {
    let mut diag = Diag::default();
    let (_, kw_end) = keyword_bounds(line, "title");
    let text = line[kw_end.min(line.len())..].trim().to_string();
    if text.is_empty() {
        diag.warn("title has no text", line_number);
    }
    diag.finish(TitleDecl {
        text,
        line: line_number,
    })
}

static LABEL_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"label\s*\[\s*(-?[0-9]*\.?[0-9]+)\s*,\s*(-?[0-9]*\.?[0-9]+)\s*\]\s*$")
        .expect("static pattern")
});

/// `evolve <Name>[-><Override>] <maturity> [label [<dx>, <dy>]]`
pub fn parse_evolve_line(line: &str, line_number: usize) -> ParseOutcome<EvolveDecl> {
    let mut diag = Diag::default();
    let (_, kw_end) = keyword_bounds(line, "evolve");

    // Peel the optional label suffix off the right edge first.
    let mut effective_end = line.trim_end().len();
    let mut label = None;
    if let Some(captures) = LABEL_SUFFIX.captures(&line[..effective_end]) {
        let mat = captures.get(0).expect("whole match");
        if mat.start() >= kw_end && is_outside_quotes(line, mat.start()) {
            let dx = captures[1].parse::<f64>().ok();
            let dy = captures[2].parse::<f64>().ok();
            if let (Some(dx), Some(dy)) = (dx, dy) {
                label = Some(LabelOffset { dx, dy });
            }
            effective_end = mat.start();
        }
    }

    // The trailing whitespace-delimited token is the maturity.
    let region = line[kw_end.min(effective_end)..effective_end].trim_end();
    let region_end = kw_end + region.len();
    let (maturity, name_end) = match region.rsplit_once(char::is_whitespace) {
        Some((head, tail)) if is_outside_quotes(line, region_end - tail.len()) => {
            match tail.parse::<f64>() {
                Ok(value) => (value, kw_end + head.trim_end().len()),
                Err(_) => {
                    diag.recover(
                        ParseStrategy::Heuristic,
                        "evolve maturity missing or unreadable; defaulted",
                        line_number,
                    );
                    (DEFAULT_EVOLVE_MATURITY, region_end)
                }
            }
        }
        _ => {
            diag.recover(
                ParseStrategy::Heuristic,
                "evolve maturity missing or unreadable; defaulted",
                line_number,
            );
            (DEFAULT_EVOLVE_MATURITY, region_end)
        }
    };

    // Optional rename arrow inside the name region.
    let arrow = find_link_arrow(&line[..name_end]).filter(|(pos, kind)| {
        *pos >= kw_end && *kind == LinkKind::Dependency && is_outside_quotes(line, *pos)
    });

    let (name, name_span, override_name, override_span) = match arrow {
        Some((pos, _)) => {
            let head = parse_name_slice(line, kw_end, pos, line_number, &mut diag);
            let tail = parse_name_slice(line, pos + 2, name_end, line_number, &mut diag);
            let (name, name_span) = match head {
                Some(pair) => pair,
                None => {
                    diag.recover(
                        ParseStrategy::Fallback,
                        format!("missing name replaced with \"{}\"", RECOVERED_NAME_FALLBACK),
                        line_number,
                    );
                    (RECOVERED_NAME_FALLBACK.to_string(), Span::new(kw_end, kw_end))
                }
            };
            match tail {
                Some((override_name, override_span)) => {
                    (name, name_span, Some(override_name), Some(override_span))
                }
                None => {
                    diag.warn("evolve override name is empty; ignored", line_number);
                    (name, name_span, None, None)
                }
            }
        }
        None => match parse_name_slice(line, kw_end, name_end, line_number, &mut diag) {
            Some((name, name_span)) => (name, name_span, None, None),
            None => {
                diag.recover(
                    ParseStrategy::Fallback,
                    format!("missing name replaced with \"{}\"", RECOVERED_NAME_FALLBACK),
                    line_number,
                );
                (
                    RECOVERED_NAME_FALLBACK.to_string(),
                    Span::new(kw_end.min(line.len()), kw_end.min(line.len())),
                    None,
                    None,
                )
            }
        },
    };

    diag.finish(EvolveDecl {
        name,
        name_span,
        override_name,
        override_span,
        maturity,
        label,
        line: line_number,
    })
}

/// `<Name>-><Name>`, `<Name>->><Name>`, `<Name>+><Name>`, optionally
/// `;<context>` suffixed.
pub fn parse_link_line(line: &str, line_number: usize) -> ParseOutcome<LinkDecl> {
    let mut diag = Diag::default();

    let Some((arrow_pos, kind)) = find_link_arrow(line) else {
        return diag.fail(ParseError::syntax("no link arrow found").at_line(line_number, line));
    };
    let arrow_end = arrow_pos + kind.arrow().len();

    let mut end_limit = line.trim_end().len();
    let mut context = None;
    if let Some(semi) = find_outside_quotes(line, arrow_end, ';') {
        let text = line[semi + 1..].trim();
        if !text.is_empty() {
            context = Some(text.to_string());
        }
        end_limit = semi;
    }

    let start = parse_name_slice(line, 0, arrow_pos, line_number, &mut diag);
    let Some((start, start_span)) = start else {
        return diag
            .fail(ParseError::syntax("link start name is empty").at_line(line_number, line));
    };

    let end = parse_name_slice(line, arrow_end, end_limit, line_number, &mut diag);
    let Some((end, end_span)) = end else {
        return diag.fail(ParseError::syntax("link end name is empty").at_line(line_number, line));
    };

    diag.finish(LinkDecl {
        start,
        start_span,
        end,
        end_span,
        kind,
        context,
        line: line_number,
    })
}

/// `pioneers|settlers|townplanners [<visTop>, <matLeft>, <visBottom>,
/// <matRight>] [<Name>]`
pub fn parse_attitude_line(
    line: &str,
    line_number: usize,
    attitude: Attitude,
) -> ParseOutcome<AttitudeDecl> {
    let mut diag = Diag::default();
    let (_, kw_end) = keyword_bounds(line, attitude.keyword());

    let Some((numbers, coords_span)) = parse_coord_block(line, kw_end, 4, line_number, &mut diag)
    else {
        return diag.fail(
            ParseError::syntax(format!(
                "{} region needs a [visTop, matLeft, visBottom, matRight] block",
                attitude.keyword()
            ))
            .at_line(line_number, line),
        );
    };

    let (name, name_span) = match parse_name_slice(
        line,
        coords_span.end,
        line.trim_end().len().max(coords_span.end),
        line_number,
        &mut diag,
    ) {
        Some((name, span)) => (Some(name), Some(span)),
        None => (None, None),
    };

    diag.finish(AttitudeDecl {
        attitude,
        vis_top: numbers[0],
        mat_left: numbers[1],
        vis_bottom: numbers[2],
        mat_right: numbers[3],
        coords_span,
        name,
        name_span,
        line: line_number,
    })
}

/// `pipeline <Name>` with either a legacy `[<m1>, <m2>]` range, a `{`
/// opening a component block, or both.
pub fn parse_pipeline_header(line: &str, line_number: usize) -> ParseOutcome<PipelineBlock> {
    let mut diag = Diag::default();
    let (_, kw_end) = keyword_bounds(line, "pipeline");

    let (name, name_span) = parse_name_region(line, kw_end, &['[', '{'], line_number, &mut diag);

    let braced = find_outside_quotes(line, name_span.end, '{').is_some();
    let errors_before = diag.errors.len();
    let (low, high) = match parse_coord_block(line, name_span.end, 2, line_number, &mut diag) {
        Some((numbers, _)) => (Some(numbers[0]), Some(numbers[1])),
        None => {
            // A braced pipeline needs no maturity range; drop the
            // missing-block error the coordinate parser just pushed.
            if braced {
                diag.errors.truncate(errors_before);
            }
            (None, None)
        }
    };

    if !braced && low.is_none() {
        diag.recover(
            ParseStrategy::Heuristic,
            "pipeline has neither a maturity range nor a block",
            line_number,
        );
    }

    diag.finish(PipelineBlock {
        name,
        name_span,
        low,
        high,
        components: Vec::new(),
        braced,
        line: line_number,
    })
}

/// `component <Name> [<maturity>]` inside a pipeline block.
pub fn parse_pipeline_component(line: &str, line_number: usize) -> ParseOutcome<PipelineComponent> {
    let mut diag = Diag::default();
    let (_, kw_end) = keyword_bounds(line, "component");

    let (name, name_span) = parse_name_region(line, kw_end, &['['], line_number, &mut diag);

    let maturity = match parse_coord_block(line, name_span.end, 1, line_number, &mut diag) {
        Some((numbers, _)) => numbers[0],
        None => {
            diag.recover(
                ParseStrategy::Heuristic,
                "pipeline component maturity missing; defaulted",
                line_number,
            );
            DEFAULT_PIPELINE_MATURITY
        }
    };

    diag.finish(PipelineComponent {
        name,
        name_span,
        maturity,
        line: line_number,
    })
}

/// Parse one standalone line into an element. Returns `None` for lines
/// that carry no element (blank, comment, block close) and for
/// unrecognized lines; the document parser decides what those mean.
pub fn parse_line(line: &str, line_number: usize) -> Option<ParseOutcome<MapElement>> {
    match classify_line(line) {
        LineKind::Blank | LineKind::Comment | LineKind::BlockClose | LineKind::Unknown => None,
        LineKind::Component => {
            Some(parse_component_line(line, line_number).map(MapElement::Component))
        }
        LineKind::Anchor => Some(parse_anchor_line(line, line_number).map(MapElement::Anchor)),
        LineKind::Note => Some(parse_note_line(line, line_number).map(MapElement::Note)),
        LineKind::Evolve => Some(parse_evolve_line(line, line_number).map(MapElement::Evolve)),
        LineKind::Title => Some(parse_title_line(line, line_number).map(MapElement::Title)),
        LineKind::Link(_) => Some(parse_link_line(line, line_number).map(MapElement::Link)),
        LineKind::Attitude(attitude) => {
            Some(parse_attitude_line(line, line_number, attitude).map(MapElement::Attitude))
        }
        LineKind::Pipeline => {
            Some(parse_pipeline_header(line, line_number).map(MapElement::Pipeline))
        }
    }
}
