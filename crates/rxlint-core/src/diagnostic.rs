//! Findings emitted by rules.

use crate::{Location, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How seriously a finding should be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warn => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A single textual replacement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    pub span: Span,
    pub replacement: String,
}

impl Fix {
    pub fn replace(span: Span, replacement: impl Into<String>) -> Self {
        Self {
            span,
            replacement: replacement.into(),
        }
    }
}

/// An alternative fix the user may choose. Never applied automatically.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub message_id: String,
    pub message: String,
    pub fix: Fix,
}

/// A finding produced by one rule for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Name of the rule that reported this finding.
    pub rule: String,
    pub message_id: String,
    /// Message text after template substitution.
    pub message: String,
    pub severity: Severity,
    pub span: Span,
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<Suggestion>,
}

impl Diagnostic {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_display() {
        assert_eq!(Severity::Warn.to_string(), "warning");
        assert_eq!(Severity::Error.to_string(), "error");
    }

    #[test]
    fn test_diagnostic_serialization_omits_empty_fixes() {
        let diagnostic = Diagnostic {
            rule: "no-nested-subscribe".to_string(),
            message_id: "forbidden".to_string(),
            message: "Nested subscribe calls are forbidden.".to_string(),
            severity: Severity::Error,
            span: Span::new(19, 28),
            location: Location {
                line: 1,
                column: 20,
                end_line: 1,
                end_column: 29,
            },
            fix: None,
            suggestions: Vec::new(),
        };

        let json = serde_json::to_value(&diagnostic).unwrap();
        assert_eq!(json["severity"], "error");
        assert!(json.get("fix").is_none());
        assert!(json.get("suggestions").is_none());
        assert!(diagnostic.is_error());
    }
}
