use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification for every error the engine reports.
///
/// - `Syntax`: malformed token or line structure
/// - `Validation`: a semantic rule violated (name too long, empty, ...)
/// - `Overflow`: size or line-count limits exceeded
/// - `Encoding`: control characters or invalid text content
/// - `Critical`: non-recoverable (unreadable document, missing input)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Syntax,
    Validation,
    Overflow,
    Encoding,
    Critical,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorCategory::Syntax => "syntax",
            ErrorCategory::Validation => "validation",
            ErrorCategory::Overflow => "overflow",
            ErrorCategory::Encoding => "encoding",
            ErrorCategory::Critical => "critical",
        };
        write!(f, "{}", name)
    }
}

/// A categorized parse error carrying its source location.
///
/// `line` is 1-based (user-facing); `line_text` holds the full offending
/// line so diagnostics can be rendered without re-reading the document.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("{category} error: {message}")]
pub struct ParseError {
    pub category: ErrorCategory,
    pub message: String,
    pub line: Option<usize>,
    pub line_text: Option<String>,
}

impl ParseError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            line: None,
            line_text: None,
        }
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Syntax, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Validation, message)
    }

    pub fn overflow(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Overflow, message)
    }

    pub fn encoding(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Encoding, message)
    }

    pub fn critical(message: impl Into<String>) -> Self {
        Self::new(ErrorCategory::Critical, message)
    }

    /// Attach the 1-based line number and the full line text.
    pub fn at_line(mut self, line: usize, text: impl Into<String>) -> Self {
        self.line = Some(line);
        self.line_text = Some(text.into());
        self
    }
}

/// A non-blocking notice. Warnings never fail an operation; the UI is
/// expected to surface them and move on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParseWarning {
    pub message: String,
    pub line: Option<usize>,
}

impl ParseWarning {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
        }
    }

    pub fn at_line(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line: Some(line),
        }
    }
}

impl std::fmt::Display for ParseWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "line {}: {}", line, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}
