//! # Document Handle
//!
//! An in-memory map document plus the version counter the UI uses to
//! order undo snapshots. The text is the single source of truth; parsing
//! is cheap and total, so no parsed state is cached here.

use mapwright_parser::{parse_map, ParsedMap};

use crate::{EditorError, Mutation};

/// Editable map document (memory-backed; persistence belongs to the
/// caller).
#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    source: String,
    version: u64,
}

/// Result of applying a mutation through the document handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOutcome {
    /// New version number
    pub version: u64,
}

impl MapDocument {
    /// Create a document from source text.
    pub fn from_source(source: String) -> Self {
        Self { source, version: 0 }
    }

    /// Current document text. Undo layers snapshot this.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Current version; increments once per successfully applied
    /// mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Parse the current text into elements.
    pub fn parse(&self) -> ParsedMap {
        parse_map(&self.source)
    }

    /// Apply a mutation. On failure the document is untouched and the
    /// version does not move.
    pub fn apply(&mut self, mutation: &Mutation) -> Result<MutationOutcome, EditorError> {
        let updated = mutation.apply(&self.source)?;
        self.source = updated;
        self.version += 1;
        Ok(MutationOutcome {
            version: self.version,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MutationError;

    #[test]
    fn version_increments_only_on_success() {
        let mut doc = MapDocument::from_source("component A [0.5, 0.5]".to_string());
        assert_eq!(doc.version(), 0);

        let ok = Mutation::RenameComponent {
            line: 1,
            expected_name: "A".to_string(),
            new_name: "B".to_string(),
        };
        let outcome = doc.apply(&ok).unwrap();
        assert_eq!(outcome.version, 1);
        assert_eq!(doc.source(), "component B [0.5, 0.5]");

        let stale = Mutation::RenameComponent {
            line: 1,
            expected_name: "A".to_string(),
            new_name: "C".to_string(),
        };
        let err = doc.apply(&stale).unwrap_err();
        assert!(matches!(
            err,
            EditorError::Mutation(MutationError::Conflict { .. })
        ));
        assert_eq!(doc.version(), 1);
        assert_eq!(doc.source(), "component B [0.5, 0.5]");
    }

    #[test]
    fn parse_reflects_latest_text() {
        let mut doc = MapDocument::from_source("component A [0.5, 0.5]".to_string());
        doc.apply(&Mutation::AddLink {
            start: "A".to_string(),
            end: "B".to_string(),
            kind: mapwright_parser::LinkKind::Dependency,
        })
        .unwrap();

        let map = doc.parse();
        assert_eq!(map.elements.len(), 2);
    }
}
