//! Whole-document parsing: map text in, typed elements out.
//!
//! Built on the per-line grammars; the only cross-line state is the
//! currently open pipeline block. Parsing never throws away a line
//! silently; anything it cannot type becomes a warning.

use mapwright_common::{ParseError, ParseOutcome, ParseWarning};

use crate::ast::{MapElement, PipelineBlock};
use crate::grammar::{
    classify_line, parse_anchor_line, parse_attitude_line, parse_component_line, parse_evolve_line,
    parse_link_line, parse_note_line, parse_pipeline_component, parse_pipeline_header,
    parse_title_line, LineKind,
};

/// Advisory threshold; documents beyond this still parse fully.
const LARGE_DOCUMENT_LINES: usize = 10_000;

/// Result of parsing a full document.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedMap {
    pub elements: Vec<MapElement>,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
    pub recovered: bool,
}

impl ParsedMap {
    fn absorb<T>(&mut self, outcome: ParseOutcome<T>) -> Option<T> {
        self.errors.extend(outcome.errors);
        self.warnings.extend(outcome.warnings);
        self.recovered |= outcome.recovered;
        outcome.value
    }
}

/// Parse a map document. Total: every line either contributes an element,
/// a diagnostic, or both.
pub fn parse_map(text: &str) -> ParsedMap {
    let mut map = ParsedMap::default();
    let lines: Vec<&str> = text.split('\n').collect();

    if lines.len() > LARGE_DOCUMENT_LINES {
        tracing::warn!(lines = lines.len(), "parsing a very large map document");
        map.warnings.push(ParseWarning::new(format!(
            "document has {} lines; expect slow edits",
            lines.len()
        )));
    }

    let mut open_pipeline: Option<PipelineBlock> = None;

    for (idx, raw_line) in lines.iter().enumerate() {
        let line_number = idx + 1;
        let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);
        let kind = classify_line(line);

        if open_pipeline.is_some() {
            match kind {
                LineKind::Blank | LineKind::Comment => continue,
                LineKind::BlockClose => {
                    if let Some(block) = open_pipeline.take() {
                        map.elements.push(MapElement::Pipeline(block));
                    }
                    continue;
                }
                LineKind::Component => {
                    if let Some(component) =
                        map.absorb(parse_pipeline_component(line, line_number))
                    {
                        if let Some(block) = open_pipeline.as_mut() {
                            block.components.push(component);
                        }
                    }
                    continue;
                }
                _ => {
                    // Anything else implicitly closes the block so the
                    // line can be parsed normally instead of vanishing.
                    map.warnings.push(ParseWarning::at_line(
                        "pipeline block closed implicitly by a non-component line",
                        line_number,
                    ));
                    map.recovered = true;
                    if let Some(block) = open_pipeline.take() {
                        map.elements.push(MapElement::Pipeline(block));
                    }
                }
            }
        }

        match kind {
            LineKind::Blank | LineKind::Comment => {}
            LineKind::BlockClose => {
                map.warnings.push(ParseWarning::at_line(
                    "stray closing brace ignored",
                    line_number,
                ));
            }
            LineKind::Unknown => {
                map.warnings.push(ParseWarning::at_line(
                    format!("unrecognized line ignored: {}", line.trim()),
                    line_number,
                ));
            }
            LineKind::Component => {
                if let Some(decl) = map.absorb(parse_component_line(line, line_number)) {
                    map.elements.push(MapElement::Component(decl));
                }
            }
            LineKind::Anchor => {
                if let Some(decl) = map.absorb(parse_anchor_line(line, line_number)) {
                    map.elements.push(MapElement::Anchor(decl));
                }
            }
            LineKind::Note => {
                if let Some(decl) = map.absorb(parse_note_line(line, line_number)) {
                    map.elements.push(MapElement::Note(decl));
                }
            }
            LineKind::Evolve => {
                if let Some(decl) = map.absorb(parse_evolve_line(line, line_number)) {
                    map.elements.push(MapElement::Evolve(decl));
                }
            }
            LineKind::Title => {
                if let Some(decl) = map.absorb(parse_title_line(line, line_number)) {
                    map.elements.push(MapElement::Title(decl));
                }
            }
            LineKind::Link(_) => {
                if let Some(decl) = map.absorb(parse_link_line(line, line_number)) {
                    map.elements.push(MapElement::Link(decl));
                }
            }
            LineKind::Attitude(attitude) => {
                if let Some(decl) = map.absorb(parse_attitude_line(line, line_number, attitude)) {
                    map.elements.push(MapElement::Attitude(decl));
                }
            }
            LineKind::Pipeline => {
                if let Some(block) = map.absorb(parse_pipeline_header(line, line_number)) {
                    if block.braced {
                        open_pipeline = Some(block);
                    } else {
                        map.elements.push(MapElement::Pipeline(block));
                    }
                }
            }
        }
    }

    if let Some(block) = open_pipeline.take() {
        map.warnings.push(ParseWarning::at_line(
            "pipeline block never closed",
            block.line,
        ));
        map.recovered = true;
        map.elements.push(MapElement::Pipeline(block));
    }

    map
}
