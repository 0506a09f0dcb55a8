//! Structural validation of element names, with a three-tier recovery
//! policy: accept → sanitize → fall back to a safe literal.
//!
//! Hard errors (emptiness, size limits, syntax-breaking or control
//! characters) fail validation; warnings (bidi overrides, unwieldy shapes)
//! never do.

use mapwright_common::{ParseError, ParseWarning};
use serde::{Deserialize, Serialize};

/// Substituted when neither the original nor the sanitized name survives
/// validation.
pub const RECOVERED_NAME_FALLBACK: &str = "Recovered Component Name";

/// Characters that would be parsed as line structure if embedded in a name.
const SYNTAX_BREAKING: [char; 6] = ['[', ']', '{', '}', '(', ')'];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameValidationOptions {
    pub max_length: usize,
    pub max_lines: usize,
    pub max_line_length: usize,
    pub allow_empty_lines: bool,
}

impl Default for NameValidationOptions {
    fn default() -> Self {
        Self {
            max_length: 500,
            max_lines: 5,
            max_line_length: 100,
            allow_empty_lines: false,
        }
    }
}

/// Outcome of [`validate_name`]. `is_valid` is false only on hard errors;
/// `sanitized` carries the cleaned-up candidate when validation failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ParseError>,
    pub warnings: Vec<ParseWarning>,
    pub sanitized: Option<String>,
}

/// Result of the full accept → sanitize → fallback cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecoveredName {
    pub name: String,
    pub was_recovered: bool,
    pub recovery_message: Option<String>,
}

fn is_disallowed_control(ch: char) -> bool {
    let code = ch as u32;
    let keep = matches!(ch, '\n' | '\r' | '\t');
    !keep && (code < 0x20 || code == 0x7f || (0x80..=0x9f).contains(&code))
}

fn is_bidi_control(ch: char) -> bool {
    matches!(ch, '\u{200e}' | '\u{200f}' | '\u{202a}'..='\u{202e}' | '\u{2066}'..='\u{2069}')
}

/// Validate a name against structural limits.
pub fn validate_name(name: &str, options: &NameValidationOptions) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if name.trim().is_empty() {
        errors.push(ParseError::validation("name is empty"));
        return ValidationResult {
            is_valid: false,
            errors,
            warnings,
            sanitized: Some(sanitize_name(name)),
        };
    }

    let char_count = name.chars().count();
    if char_count > options.max_length {
        errors.push(ParseError::overflow(format!(
            "name is {} characters; the limit is {}",
            char_count, options.max_length
        )));
    }

    let lines: Vec<&str> = name.lines().collect();
    if lines.len() > options.max_lines {
        errors.push(ParseError::overflow(format!(
            "name spans {} lines; the limit is {}",
            lines.len(),
            options.max_lines
        )));
    }
    for line in &lines {
        let line_len = line.chars().count();
        if line_len > options.max_line_length {
            errors.push(ParseError::overflow(format!(
                "name line is {} characters; the per-line limit is {}",
                line_len, options.max_line_length
            )));
        }
        if line.trim().is_empty() && !options.allow_empty_lines {
            errors.push(ParseError::validation("name contains an empty line"));
        }
    }

    let breaking: Vec<char> = name
        .chars()
        .filter(|ch| SYNTAX_BREAKING.contains(ch))
        .collect();
    if !breaking.is_empty() {
        errors.push(ParseError::syntax(format!(
            "name contains syntax-breaking characters: {:?}",
            breaking
        )));
    }

    if name.chars().any(is_disallowed_control) {
        errors.push(ParseError::encoding(
            "name contains control characters other than line breaks and tabs",
        ));
    }

    if name.chars().any(is_bidi_control) {
        warnings.push(ParseWarning::new(
            "name contains bidirectional control characters",
        ));
    }
    if name.split_whitespace().any(|word| word.chars().count() > 50) {
        warnings.push(ParseWarning::new("name contains a word over 50 characters"));
    }
    if name != name.trim() {
        warnings.push(ParseWarning::new("name has leading or trailing whitespace"));
    }
    if char_count > 300 && char_count <= options.max_length {
        warnings.push(ParseWarning::new("name is very long"));
    }
    if lines.len() > 3 && lines.len() <= options.max_lines {
        warnings.push(ParseWarning::new("name spans many lines"));
    }

    let is_valid = errors.is_empty();
    ValidationResult {
        is_valid,
        sanitized: if is_valid {
            None
        } else {
            Some(sanitize_name(name))
        },
        errors,
        warnings,
    }
}

/// Clean a name without changing its intent: trim, strip disallowed
/// control characters (line breaks stay), collapse intra-line whitespace,
/// and drop empty lines. Idempotent.
pub fn sanitize_name(name: &str) -> String {
    name.lines()
        .map(|line| {
            line.chars()
                .filter(|ch| !is_disallowed_control(*ch))
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Accept → sanitize → fallback. Always yields a non-empty, syntactically
/// safe name; `was_recovered` tells the caller to surface a notice.
/// `None` input (absent value at an untyped boundary) goes straight to the
/// fallback.
pub fn validate_and_recover(name: Option<&str>) -> RecoveredName {
    let options = NameValidationOptions::default();

    let Some(raw) = name else {
        return RecoveredName {
            name: RECOVERED_NAME_FALLBACK.to_string(),
            was_recovered: true,
            recovery_message: Some("missing name replaced with a safe default".to_string()),
        };
    };

    if validate_name(raw, &options).is_valid {
        return RecoveredName {
            name: raw.to_string(),
            was_recovered: false,
            recovery_message: None,
        };
    }

    let sanitized = sanitize_name(raw);
    if validate_name(&sanitized, &options).is_valid {
        return RecoveredName {
            name: sanitized,
            was_recovered: true,
            recovery_message: Some("name was sanitized to parse safely".to_string()),
        };
    }

    RecoveredName {
        name: RECOVERED_NAME_FALLBACK.to_string(),
        was_recovered: true,
        recovery_message: Some("name could not be repaired and was replaced".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapwright_common::ErrorCategory;

    #[test]
    fn plain_name_is_valid() {
        let result = validate_name("Hot Water Service", &NameValidationOptions::default());
        assert!(result.is_valid);
        assert!(result.errors.is_empty());
        assert!(result.sanitized.is_none());
    }

    #[test]
    fn empty_name_is_a_hard_error() {
        let result = validate_name("   ", &NameValidationOptions::default());
        assert!(!result.is_valid);
        assert_eq!(result.errors[0].category, ErrorCategory::Validation);
    }

    #[test]
    fn oversized_name_is_overflow() {
        let long = "x".repeat(501);
        let result = validate_name(&long, &NameValidationOptions::default());
        assert!(!result.is_valid);
        assert!(result
            .errors
            .iter()
            .any(|e| e.category == ErrorCategory::Overflow));
    }

    #[test]
    fn brackets_are_syntax_errors_and_controls_are_encoding_errors() {
        let result = validate_name("bad [name]", &NameValidationOptions::default());
        assert!(result
            .errors
            .iter()
            .any(|e| e.category == ErrorCategory::Syntax));

        let result = validate_name("bad\u{7}name", &NameValidationOptions::default());
        assert!(result
            .errors
            .iter()
            .any(|e| e.category == ErrorCategory::Encoding));
    }

    #[test]
    fn tabs_and_line_breaks_are_not_encoding_errors() {
        let result = validate_name("two\nlines\twith tab", &NameValidationOptions::default());
        assert!(result.is_valid);
    }

    #[test]
    fn bidi_and_long_words_warn_without_failing() {
        let result = validate_name("safe \u{202e}name", &NameValidationOptions::default());
        assert!(result.is_valid);
        assert!(!result.warnings.is_empty());

        let word = "w".repeat(51);
        let result = validate_name(&word, &NameValidationOptions::default());
        assert!(result.is_valid);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn sanitize_is_idempotent() {
        let cases = [
            "  spaced   out  ",
            "keep\n\n\nlines",
            "ctrl\u{1}chars\u{9f}here",
            "mixed \t tabs",
            "",
        ];
        for case in cases {
            let once = sanitize_name(case);
            assert_eq!(sanitize_name(&once), once, "not idempotent for {:?}", case);
        }
    }

    #[test]
    fn sanitize_keeps_line_breaks_but_drops_empty_lines() {
        assert_eq!(sanitize_name("a\n\n  \nb"), "a\nb");
        assert_eq!(sanitize_name("  a   b  "), "a b");
    }

    #[test]
    fn recover_accepts_valid_names_untouched() {
        let recovered = validate_and_recover(Some("Kettle"));
        assert_eq!(recovered.name, "Kettle");
        assert!(!recovered.was_recovered);
        assert!(recovered.recovery_message.is_none());
    }

    #[test]
    fn recover_sanitizes_fixable_names() {
        let recovered = validate_and_recover(Some("  messy \u{1} name  "));
        assert_eq!(recovered.name, "messy name");
        assert!(recovered.was_recovered);
        assert!(recovered.recovery_message.is_some());
    }

    #[test]
    fn recover_falls_back_on_hopeless_input() {
        for input in [Some(""), Some("   "), None, Some("[only brackets]")] {
            let recovered = validate_and_recover(input);
            assert!(recovered.was_recovered || !recovered.name.is_empty());
            if recovered.was_recovered && recovered.name == RECOVERED_NAME_FALLBACK {
                assert!(recovered.recovery_message.is_some());
            }
        }
        let recovered = validate_and_recover(Some(""));
        assert_eq!(recovered.name, RECOVERED_NAME_FALLBACK);
        assert!(recovered.was_recovered);

        let long = "x".repeat(501);
        let recovered = validate_and_recover(Some(&long));
        assert_eq!(recovered.name, RECOVERED_NAME_FALLBACK);
    }
}
