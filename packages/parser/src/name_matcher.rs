//! Name equivalence and lookup.
//!
//! Multi-line and quoted names mean the same component can be written
//! several ways; matching folds the differences that are formatting-only.
//! Normalized forms are for comparison exclusively; display and storage
//! always use the raw name.

use crate::ast::MapElement;

/// Fold line breaks to spaces, collapse whitespace runs, trim, lowercase.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Equivalence test: exact equality first (fast path), then normalized
/// equality, which never matches on empty normals.
pub fn names_match(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    let normalized = normalize_name(a);
    !normalized.is_empty() && normalized == normalize_name(b)
}

/// Find an element by name. Exact matches win over normalized matches:
/// two distinctly-formatted names can normalize identically, and the one
/// the user typed verbatim must not be shadowed.
pub fn find_by_name<'a>(elements: &'a [MapElement], target: &str) -> Option<&'a MapElement> {
    elements
        .iter()
        .find(|e| e.name() == Some(target))
        .or_else(|| {
            let normalized = normalize_name(target);
            if normalized.is_empty() {
                return None;
            }
            elements
                .iter()
                .find(|e| e.name().is_some_and(|n| normalize_name(n) == normalized))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ComponentDecl, Span};

    fn component(name: &str, line: usize) -> MapElement {
        MapElement::Component(ComponentDecl {
            name: name.to_string(),
            name_span: Span::new(10, 10 + name.len()),
            visibility: 0.5,
            maturity: 0.5,
            coords_span: None,
            inertia: false,
            method: None,
            class: None,
            label: None,
            line,
        })
    }

    #[test]
    fn normalize_folds_breaks_case_and_runs() {
        assert_eq!(normalize_name("Hot\nWater   Service"), "hot water service");
        assert_eq!(normalize_name("  KETTLE  "), "kettle");
    }

    #[test]
    fn normalize_is_idempotent() {
        for name in ["Hot\nWater", "  A   B  ", "plain", "\t\r\n"] {
            let once = normalize_name(name);
            assert_eq!(normalize_name(&once), once);
        }
    }

    #[test]
    fn matching_is_symmetric() {
        let pairs = [
            ("Kettle", "kettle"),
            ("Hot\nWater", "hot water"),
            ("a", "b"),
            ("", ""),
            ("", "x"),
        ];
        for (a, b) in pairs {
            assert_eq!(names_match(a, b), names_match(b, a), "{:?} vs {:?}", a, b);
        }
    }

    #[test]
    fn empty_names_only_match_exactly() {
        assert!(names_match("", ""));
        assert!(!names_match("", "   "));
        assert!(!names_match("   ", "\n"));
    }

    #[test]
    fn exact_match_wins_over_normalized() {
        let elements = vec![component("hot water", 1), component("Hot Water", 2)];
        // "Hot Water" exists verbatim at line 2; the normalized twin at
        // line 1 must not shadow it.
        let found = find_by_name(&elements, "Hot Water").unwrap();
        assert_eq!(found.line(), 2);

        // Purely normalized lookups take the first hit.
        let found = find_by_name(&elements, "HOT WATER").unwrap();
        assert_eq!(found.line(), 1);
    }

    #[test]
    fn unknown_names_return_none() {
        let elements = vec![component("Kettle", 1)];
        assert!(find_by_name(&elements, "Teapot").is_none());
        assert!(find_by_name(&elements, "").is_none());
    }
}
