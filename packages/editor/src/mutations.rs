//! # Text Mutations
//!
//! High-level semantic operations on map documents.
//!
//! ## Design Principles
//!
//! 1. **Intent-preserving**: each mutation represents one user-visible
//!    operation (rename, reposition, insert, connect)
//! 2. **Validated**: every mutation re-derives the current state and
//!    refuses to clobber a concurrent edit
//! 3. **Pure**: `apply` maps the current text to a new text; a failure
//!    returns the error and nothing else
//!
//! ## Mutation Semantics
//!
//! ### Rename
//! - Rewrites the declaration line and every link/evolve reference
//! - Re-applies quoting rules independently at each occurrence
//! - Fails on a stale `expected_name` (modified by another operation)
//!
//! ### UpdatePstCoordinates
//! - Atomic replacement of the four numbers, two-decimal formatted
//! - Spacing inside the bracket block is preserved
//!
//! ### InsertPipelineComponent / AddLink
//! - Insertion only; existing lines are never reflowed

use mapwright_geometry::{clamp_coordinates, PstCoordinates};
use mapwright_parser::{
    classify_line, escape_for_source, grammar, names_match, parse_map, tokenize, LineKind,
    LinkKind, MapElement, Token,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::rename::{rename_element, RenameTarget};

/// Semantic mutations (intent-preserving operations). Line numbers are
/// 1-based, matching what the editor surface shows.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Mutation {
    /// Rename a component declaration and every reference to it
    RenameComponent {
        line: usize,
        expected_name: String,
        new_name: String,
    },

    /// Rename an anchor declaration and every reference to it
    RenameAnchor {
        line: usize,
        expected_name: String,
        new_name: String,
    },

    /// Rewrite a note's text (notes are not link endpoints)
    RenameNote {
        line: usize,
        expected_text: String,
        new_text: String,
    },

    /// Replace the coordinate block of a PST attitude region
    UpdatePstCoordinates {
        line: usize,
        expected: PstCoordinates,
        updated: PstCoordinates,
    },

    /// Insert a component into a pipeline block
    InsertPipelineComponent {
        line: usize,
        expected_pipeline: String,
        component: String,
        maturity: f64,
    },

    /// Append a link line connecting two elements
    AddLink {
        start: String,
        end: String,
        kind: LinkKind,
    },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MutationError {
    #[error("line {line} is out of bounds; the document has {len} lines")]
    LineOutOfBounds { line: usize, len: usize },

    #[error("line {line} was modified by another operation: expected {expected:?}, found {found:?}")]
    Conflict {
        line: usize,
        expected: String,
        found: String,
    },

    #[error("line {line} is not a {expected} declaration")]
    WrongElementKind { line: usize, expected: &'static str },

    #[error("new name is empty")]
    EmptyName,

    #[error("link {start:?} {arrow} {end:?} already exists")]
    DuplicateLink {
        start: String,
        end: String,
        arrow: &'static str,
    },
}

/// Two-decimal coordinate formatting, matching what the map text renders.
pub(crate) fn format_coord(value: f64) -> String {
    format!("{:.2}", value)
}

/// Split keeping any trailing `\r` attached, so untouched lines survive
/// byte-for-byte on CRLF documents.
pub(crate) fn split_lines(source: &str) -> Vec<&str> {
    source.split('\n').collect()
}

/// The parseable body of a raw line (trailing `\r` stripped).
pub(crate) fn line_body(raw: &str) -> &str {
    raw.strip_suffix('\r').unwrap_or(raw)
}

/// Replace `span` of a line body with `replacement`, re-attaching the
/// carriage return if the raw line carried one.
pub(crate) fn splice(raw: &str, start: usize, end: usize, replacement: &str) -> String {
    let body = line_body(raw);
    let cr = if raw.len() != body.len() { "\r" } else { "" };
    format!("{}{}{}{}", &body[..start], replacement, &body[end..], cr)
}

pub(crate) fn check_bounds(line: usize, len: usize) -> Result<(), MutationError> {
    if line == 0 || line > len {
        return Err(MutationError::LineOutOfBounds { line, len });
    }
    Ok(())
}

impl Mutation {
    /// Check whether the mutation would apply cleanly, without producing
    /// the new text. `apply` is pure, so this is exactly `apply` with the
    /// result discarded.
    pub fn validate(&self, source: &str) -> Result<(), MutationError> {
        self.apply(source).map(|_| ())
    }

    /// Apply the mutation, returning the new document text. On error the
    /// caller's text is untouched by construction.
    pub fn apply(&self, source: &str) -> Result<String, MutationError> {
        match self {
            Mutation::RenameComponent {
                line,
                expected_name,
                new_name,
            } => rename_element(source, *line, expected_name, new_name, RenameTarget::Component),

            Mutation::RenameAnchor {
                line,
                expected_name,
                new_name,
            } => rename_element(source, *line, expected_name, new_name, RenameTarget::Anchor),

            Mutation::RenameNote {
                line,
                expected_text,
                new_text,
            } => rename_element(source, *line, expected_text, new_text, RenameTarget::Note),

            Mutation::UpdatePstCoordinates {
                line,
                expected,
                updated,
            } => apply_update_pst(source, *line, expected, updated),

            Mutation::InsertPipelineComponent {
                line,
                expected_pipeline,
                component,
                maturity,
            } => apply_insert_pipeline_component(source, *line, expected_pipeline, component, *maturity),

            Mutation::AddLink { start, end, kind } => apply_add_link(source, start, end, *kind),
        }
    }
}

/// DSL order of a PST block: `[visTop, matLeft, visBottom, matRight]`.
fn coords_in_source_order(coords: &PstCoordinates) -> [f64; 4] {
    [
        coords.visibility1,
        coords.maturity1,
        coords.visibility2,
        coords.maturity2,
    ]
}

fn apply_update_pst(
    source: &str,
    line: usize,
    expected: &PstCoordinates,
    updated: &PstCoordinates,
) -> Result<String, MutationError> {
    let mut lines: Vec<String> = split_lines(source).iter().map(|l| l.to_string()).collect();
    check_bounds(line, lines.len())?;
    let raw = lines[line - 1].clone();
    let body = line_body(&raw);

    let LineKind::Attitude(attitude) = classify_line(body) else {
        return Err(MutationError::WrongElementKind {
            line,
            expected: "attitude region",
        });
    };
    let decl = grammar::parse_attitude_line(body, line, attitude)
        .value
        .ok_or(MutationError::WrongElementKind {
            line,
            expected: "attitude region",
        })?;

    // Exact comparison: the values round-trip through the UI unchanged,
    // so any difference means another edit landed first.
    let found = [decl.vis_top, decl.mat_left, decl.vis_bottom, decl.mat_right];
    let wanted = coords_in_source_order(expected);
    if found != wanted {
        return Err(MutationError::Conflict {
            line,
            expected: format!("{:?}", wanted),
            found: format!("{:?}", found),
        });
    }

    // Replace the four numbers in place, keeping the block's spacing.
    let clamped = clamp_coordinates(updated);
    let new_values = coords_in_source_order(&clamped);
    let span = decl.coords_span;
    let inner_start = span.start + 1;
    let inner_end = if body[span.start..span.end].ends_with(']') {
        span.end - 1
    } else {
        span.end
    };
    let inner = &body[inner_start..inner_end];

    let number_ranges: Vec<std::ops::Range<usize>> = tokenize(inner)
        .into_iter()
        .filter_map(|(token, range)| match token {
            Token::Number(_) => Some(range),
            _ => None,
        })
        .take(4)
        .collect();
    if number_ranges.len() != 4 {
        return Err(MutationError::WrongElementKind {
            line,
            expected: "attitude region",
        });
    }

    let mut new_inner = inner.to_string();
    for (range, value) in number_ranges.iter().zip(new_values.iter()).rev() {
        new_inner.replace_range(range.clone(), &format_coord(*value));
    }

    lines[line - 1] = splice(&raw, inner_start, inner_end, &new_inner);
    Ok(lines.join("\n"))
}

fn apply_insert_pipeline_component(
    source: &str,
    line: usize,
    expected_pipeline: &str,
    component: &str,
    maturity: f64,
) -> Result<String, MutationError> {
    if component.trim().is_empty() {
        return Err(MutationError::EmptyName);
    }

    let mut lines: Vec<String> = split_lines(source).iter().map(|l| l.to_string()).collect();
    check_bounds(line, lines.len())?;
    let raw = lines[line - 1].clone();
    let body = line_body(&raw);

    if classify_line(body) != LineKind::Pipeline {
        return Err(MutationError::WrongElementKind {
            line,
            expected: "pipeline",
        });
    }
    let header = grammar::parse_pipeline_header(body, line)
        .value
        .ok_or(MutationError::WrongElementKind {
            line,
            expected: "pipeline",
        })?;

    if !names_match(&header.name, expected_pipeline) {
        return Err(MutationError::Conflict {
            line,
            expected: expected_pipeline.to_string(),
            found: header.name,
        });
    }

    let cr = if raw.len() != body.len() { "\r" } else { "" };
    let header_indent: String = body.chars().take_while(|c| c.is_whitespace()).collect();
    let component_line = format!(
        "{}  component {} [{}]{}",
        header_indent,
        escape_for_source(component),
        format_coord(maturity),
        cr
    );

    if header.braced {
        // Match the indentation already used inside the block, if any.
        let inner_indent = lines.get(line).map(|next| line_body(next)).and_then(|next| {
            (classify_line(next) == LineKind::Component).then(|| {
                next.chars()
                    .take_while(|c| c.is_whitespace())
                    .collect::<String>()
            })
        });
        let component_line = match inner_indent {
            Some(indent) => format!(
                "{}component {} [{}]{}",
                indent,
                escape_for_source(component),
                format_coord(maturity),
                cr
            ),
            None => component_line,
        };
        lines.insert(line, component_line);
    } else {
        // Legacy single-line pipeline: open a block for the component.
        tracing::debug!(line, "opening a block on a legacy pipeline header");
        lines[line - 1] = format!("{} {{{}", body.trim_end(), cr);
        lines.insert(line, component_line);
        lines.insert(line + 1, format!("{}}}{}", header_indent, cr));
    }

    Ok(lines.join("\n"))
}

fn apply_add_link(
    source: &str,
    start: &str,
    end: &str,
    kind: LinkKind,
) -> Result<String, MutationError> {
    if start.trim().is_empty() || end.trim().is_empty() {
        return Err(MutationError::EmptyName);
    }

    let map = parse_map(source);
    let duplicate = map.elements.iter().any(|element| match element {
        MapElement::Link(link) => {
            link.kind == kind && names_match(&link.start, start) && names_match(&link.end, end)
        }
        _ => false,
    });
    if duplicate {
        return Err(MutationError::DuplicateLink {
            start: start.to_string(),
            end: end.to_string(),
            arrow: kind.arrow(),
        });
    }

    let eol = if source.contains("\r\n") { "\r\n" } else { "\n" };
    let link_line = format!(
        "{}{}{}",
        escape_for_source(start),
        kind.arrow(),
        escape_for_source(end)
    );

    if source.is_empty() {
        return Ok(link_line);
    }
    if source.ends_with('\n') {
        Ok(format!("{}{}{}", source, link_line, eol))
    } else {
        Ok(format!("{}{}{}", source, eol, link_line))
    }
}
