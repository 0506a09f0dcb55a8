//! Rename rewriting.
//!
//! A rename touches the declaration line and every other line that
//! references the old name as a link endpoint or inside an evolve
//! statement. Each occurrence is spliced at its span and re-quoted
//! independently, since the same name can be bare in one line and
//! quoted in another.

use mapwright_parser::{
    classify_line, escape_for_source, grammar, names_match, LineKind, Span,
};

use crate::mutations::{check_bounds, line_body, split_lines, splice, MutationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RenameTarget {
    Component,
    Anchor,
    Note,
}

impl RenameTarget {
    fn keyword(self) -> &'static str {
        match self {
            RenameTarget::Component => "component",
            RenameTarget::Anchor => "anchor",
            RenameTarget::Note => "note",
        }
    }

    fn matches(self, kind: LineKind) -> bool {
        matches!(
            (self, kind),
            (RenameTarget::Component, LineKind::Component)
                | (RenameTarget::Anchor, LineKind::Anchor)
                | (RenameTarget::Note, LineKind::Note)
        )
    }

    /// Notes are not link endpoints; only components and anchors drag
    /// their references along.
    fn rewrites_references(self) -> bool {
        !matches!(self, RenameTarget::Note)
    }
}

pub(crate) fn rename_element(
    source: &str,
    line: usize,
    expected: &str,
    new_name: &str,
    target: RenameTarget,
) -> Result<String, MutationError> {
    if new_name.trim().is_empty() {
        return Err(MutationError::EmptyName);
    }

    let mut lines: Vec<String> = split_lines(source).iter().map(|l| l.to_string()).collect();
    check_bounds(line, lines.len())?;
    let raw = lines[line - 1].clone();
    let body = line_body(&raw);

    if !target.matches(classify_line(body)) {
        return Err(MutationError::WrongElementKind {
            line,
            expected: target.keyword(),
        });
    }

    let (current, name_span) = declaration_name(body, line, target)?;

    // Conflict detection: the caller tells us what it believes the line
    // says; a mismatch means a stale edit and nothing is written.
    if !names_match(&current, expected) {
        return Err(MutationError::Conflict {
            line,
            expected: expected.to_string(),
            found: current,
        });
    }

    let encoded = escape_for_source(new_name);
    lines[line - 1] = splice(&raw, name_span.start, name_span.end, &encoded);

    if target.rewrites_references() {
        for (idx, entry) in lines.iter_mut().enumerate() {
            if idx == line - 1 {
                continue;
            }
            rewrite_references(entry, idx + 1, &current, new_name);
        }
    }

    Ok(lines.join("\n"))
}

fn declaration_name(
    body: &str,
    line: usize,
    target: RenameTarget,
) -> Result<(String, Span), MutationError> {
    let wrong_kind = MutationError::WrongElementKind {
        line,
        expected: target.keyword(),
    };
    match target {
        RenameTarget::Component => grammar::parse_component_line(body, line)
            .value
            .map(|decl| (decl.name, decl.name_span))
            .ok_or(wrong_kind),
        RenameTarget::Anchor => grammar::parse_anchor_line(body, line)
            .value
            .map(|decl| (decl.name, decl.name_span))
            .ok_or(wrong_kind),
        RenameTarget::Note => grammar::parse_note_line(body, line)
            .value
            .map(|decl| (decl.text, decl.text_span))
            .ok_or(wrong_kind),
    }
}

/// Rewrite link endpoints and evolve references to `old_name` on one
/// line, re-encoding the new name at each occurrence.
fn rewrite_references(entry: &mut String, line_number: usize, old_name: &str, new_name: &str) {
    let body = line_body(entry).to_string();

    let mut spans: Vec<Span> = Vec::new();
    match classify_line(&body) {
        LineKind::Link(_) => {
            if let Some(link) = grammar::parse_link_line(&body, line_number).value {
                if names_match(&link.start, old_name) {
                    spans.push(link.start_span);
                }
                if names_match(&link.end, old_name) {
                    spans.push(link.end_span);
                }
            }
        }
        LineKind::Evolve => {
            if let Some(evolve) = grammar::parse_evolve_line(&body, line_number).value {
                if names_match(&evolve.name, old_name) {
                    spans.push(evolve.name_span);
                }
                if let (Some(override_name), Some(override_span)) =
                    (&evolve.override_name, evolve.override_span)
                {
                    if names_match(override_name, old_name) {
                        spans.push(override_span);
                    }
                }
            }
        }
        _ => return,
    }

    if spans.is_empty() {
        return;
    }

    // Right-to-left so earlier spans stay valid.
    spans.sort_by_key(|span| span.start);
    let encoded = escape_for_source(new_name);
    let mut updated = entry.clone();
    for span in spans.iter().rev() {
        updated = splice(&updated, span.start, span.end, &encoded);
    }
    *entry = updated;
}

#[cfg(test)]
mod tests {
    use crate::mutations::{Mutation, MutationError};

    #[test]
    fn rename_rewrites_declaration_and_references() {
        let source = "component Old [0.5, 0.5]\nOld->Target";
        let mutation = Mutation::RenameComponent {
            line: 1,
            expected_name: "Old".to_string(),
            new_name: "New".to_string(),
        };
        assert_eq!(
            mutation.apply(source).unwrap(),
            "component New [0.5, 0.5]\nNew->Target"
        );
    }

    #[test]
    fn rename_rewrites_both_endpoints_and_evolve_lines() {
        let source = "component Kettle [0.5, 0.5]\n\
            Kettle->Kettle\n\
            evolve Kettle->Electric 0.8\n\
            evolve Stove->Kettle 0.6";
        let mutation = Mutation::RenameComponent {
            line: 1,
            expected_name: "Kettle".to_string(),
            new_name: "Pot".to_string(),
        };
        let result = mutation.apply(source).unwrap();
        assert_eq!(
            result,
            "component Pot [0.5, 0.5]\n\
             Pot->Pot\n\
             evolve Pot->Electric 0.8\n\
             evolve Stove->Pot 0.6"
        );
    }

    #[test]
    fn rename_requotes_each_occurrence_independently() {
        let source = "component \"Hot Water\" [0.5, 0.5]\n\"Hot Water\"->Kettle";
        let mutation = Mutation::RenameComponent {
            line: 1,
            expected_name: "Hot Water".to_string(),
            new_name: "Steam\nSupply".to_string(),
        };
        let result = mutation.apply(source).unwrap();
        assert_eq!(
            result,
            "component \"Steam\\nSupply\" [0.5, 0.5]\n\"Steam\\nSupply\"->Kettle"
        );
    }

    #[test]
    fn rename_preserves_indentation_and_tail_formatting() {
        let source = "  component Old [0.50,   0.35] inertia (buy)";
        let mutation = Mutation::RenameComponent {
            line: 1,
            expected_name: "Old".to_string(),
            new_name: "New".to_string(),
        };
        assert_eq!(
            mutation.apply(source).unwrap(),
            "  component New [0.50,   0.35] inertia (buy)"
        );
    }

    #[test]
    fn stale_expected_name_never_mutates() {
        let source = "component Current [0.5, 0.5]\nCurrent->Target";
        let mutation = Mutation::RenameComponent {
            line: 1,
            expected_name: "Stale".to_string(),
            new_name: "New".to_string(),
        };
        let err = mutation.apply(source).unwrap_err();
        assert!(matches!(
            err,
            MutationError::Conflict { line: 1, .. }
        ));
    }

    #[test]
    fn expected_name_matches_via_normalization() {
        let source = "component \"Hot\\nWater\" [0.5, 0.5]";
        let mutation = Mutation::RenameComponent {
            line: 1,
            expected_name: "hot water".to_string(),
            new_name: "Steam".to_string(),
        };
        assert_eq!(
            mutation.apply(source).unwrap(),
            "component Steam [0.5, 0.5]"
        );
    }

    #[test]
    fn empty_new_name_is_rejected_before_any_write() {
        let mutation = Mutation::RenameComponent {
            line: 1,
            expected_name: "A".to_string(),
            new_name: "   ".to_string(),
        };
        assert_eq!(
            mutation.apply("component A [0.5, 0.5]"),
            Err(MutationError::EmptyName)
        );
    }

    #[test]
    fn renaming_a_link_line_as_component_is_wrong_kind() {
        let mutation = Mutation::RenameComponent {
            line: 1,
            expected_name: "A".to_string(),
            new_name: "B".to_string(),
        };
        let err = mutation.apply("A->B").unwrap_err();
        assert_eq!(
            err,
            MutationError::WrongElementKind {
                line: 1,
                expected: "component"
            }
        );
    }

    #[test]
    fn anchor_rename_follows_links() {
        let source = "anchor Business [0.95, 0.63]\nBusiness->Cup of Tea";
        let mutation = Mutation::RenameAnchor {
            line: 1,
            expected_name: "Business".to_string(),
            new_name: "Customer".to_string(),
        };
        assert_eq!(
            mutation.apply(source).unwrap(),
            "anchor Customer [0.95, 0.63]\nCustomer->Cup of Tea"
        );
    }

    #[test]
    fn note_rename_leaves_similar_links_alone() {
        let source = "note Kettle [0.4, 0.8]\nKettle->Power";
        let mutation = Mutation::RenameNote {
            line: 1,
            expected_text: "Kettle".to_string(),
            new_text: "Teapot".to_string(),
        };
        assert_eq!(
            mutation.apply(source).unwrap(),
            "note Teapot [0.4, 0.8]\nKettle->Power"
        );
    }

    #[test]
    fn crlf_line_endings_survive_renames() {
        let source = "component Old [0.5, 0.5]\r\nOld->Target\r\n";
        let mutation = Mutation::RenameComponent {
            line: 1,
            expected_name: "Old".to_string(),
            new_name: "New".to_string(),
        };
        assert_eq!(
            mutation.apply(source).unwrap(),
            "component New [0.5, 0.5]\r\nNew->Target\r\n"
        );
    }

    #[test]
    fn rename_to_name_needing_quotes_in_links() {
        let source = "component Plain [0.5, 0.5]\nPlain->Power\nA->Plain";
        let mutation = Mutation::RenameComponent {
            line: 1,
            expected_name: "Plain".to_string(),
            new_name: "arrow -> name".to_string(),
        };
        let result = mutation.apply(source).unwrap();
        assert_eq!(
            result,
            "component \"arrow -> name\" [0.5, 0.5]\n\"arrow -> name\"->Power\nA->\"arrow -> name\""
        );
    }
}
