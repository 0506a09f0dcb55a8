use serde::{Deserialize, Serialize};

use crate::error::{ParseError, ParseWarning};

/// Which tier of the recovery cascade produced a value.
///
/// Ordered strictest to most permissive; everything past `Strict` marks the
/// outcome as recovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ParseStrategy {
    /// Exact parse, no tolerance.
    Strict,
    /// Pattern-based parse tolerating minor damage (missing close quote,
    /// stray whitespace).
    Lenient,
    /// Boundary-guessing extraction when no well-formed token exists.
    Heuristic,
    /// Take whatever is there and substitute a placeholder if empty.
    LastResort,
    /// No usable input at all; a literal default was substituted.
    Fallback,
}

/// Result envelope for recovering parse operations.
///
/// `value` is `None` only when every strategy, including the absolute
/// fallback, failed, which for string input never happens. Callers branch
/// on [`ParseOutcome::success`] and surface `warnings` as non-blocking
/// notices when `recovered` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseOutcome<T> {
    pub value: Option<T>,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
    pub recovered: bool,
    pub strategy: ParseStrategy,
}

impl<T> ParseOutcome<T> {
    /// A clean, strict success.
    pub fn success(value: T) -> Self {
        Self {
            value: Some(value),
            errors: Vec::new(),
            warnings: Vec::new(),
            recovered: false,
            strategy: ParseStrategy::Strict,
        }
    }

    /// A success produced by a recovery tier.
    pub fn recovered(value: T, strategy: ParseStrategy) -> Self {
        Self {
            value: Some(value),
            errors: Vec::new(),
            warnings: Vec::new(),
            recovered: true,
            strategy,
        }
    }

    /// A hard failure: no strategy produced a value.
    pub fn failure(error: ParseError) -> Self {
        Self {
            value: None,
            errors: vec![error],
            warnings: Vec::new(),
            recovered: false,
            strategy: ParseStrategy::Fallback,
        }
    }

    pub fn is_success(&self) -> bool {
        self.value.is_some()
    }

    pub fn with_warning(mut self, warning: ParseWarning) -> Self {
        self.warnings.push(warning);
        self
    }

    pub fn with_error(mut self, error: ParseError) -> Self {
        self.errors.push(error);
        self
    }

    /// Map the carried value, keeping diagnostics intact.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<U> {
        ParseOutcome {
            value: self.value.map(f),
            errors: self.errors,
            warnings: self.warnings,
            recovered: self.recovered,
            strategy: self.strategy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_is_strict_and_clean() {
        let outcome = ParseOutcome::success("Kettle");
        assert!(outcome.is_success());
        assert!(!outcome.recovered);
        assert_eq!(outcome.strategy, ParseStrategy::Strict);
    }

    #[test]
    fn recovered_outcome_keeps_warnings() {
        let outcome = ParseOutcome::recovered("Kettle", ParseStrategy::Heuristic)
            .with_warning(ParseWarning::new("guessed name boundary"));
        assert!(outcome.is_success());
        assert!(outcome.recovered);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn map_preserves_diagnostics() {
        let outcome = ParseOutcome::recovered("a", ParseStrategy::Lenient)
            .with_warning(ParseWarning::new("dropped escape"));
        let mapped = outcome.map(|s| s.len());
        assert_eq!(mapped.value, Some(1));
        assert_eq!(mapped.warnings.len(), 1);
        assert!(mapped.recovered);
    }
}
