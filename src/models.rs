//! Core data models shared by rules, the rule list and reporters

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::stream::Toi;
use crate::token::TokenKind;

/// Repair action recorded with a violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Insert a blank line at the start of the span
    InsertBlankLine,
    /// Remove the whole span
    Remove,
    /// Make the whitespace between the span's first and last token this wide
    Spacing { spaces: usize },
    /// Move the span's last token so it starts at this 1-based column
    Align { column: usize },
    /// Start a new line at the span's last token, indented this many spaces
    BreakLine { indent: usize },
    /// Insert a keyword after the span's first token
    InsertKeyword { keyword: String, kind: TokenKind },
    /// Replace the text of the span's single token
    Rewrite { text: String },
}

/// A violation detected by a rule
#[derive(Debug, Clone)]
pub struct Violation {
    pub rule_id: String,
    /// Reporting anchor, not necessarily the first line of the span
    pub line: usize,
    pub toi: Toi,
    pub solution: String,
    pub severity: Severity,
    pub action: Option<Action>,
}

impl Violation {
    pub fn new(line: usize, toi: Toi, solution: impl Into<String>) -> Self {
        Self {
            rule_id: String::new(),
            line,
            toi,
            solution: solution.into(),
            severity: Severity::Error,
            action: None,
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }
}

/// Severity level of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}

/// What a reporter needs to know about one violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportedViolation {
    pub rule_id: String,
    pub line: usize,
    pub solution: String,
    pub severity: Severity,
}

impl From<&Violation> for ReportedViolation {
    fn from(v: &Violation) -> Self {
        Self {
            rule_id: v.rule_id.clone(),
            line: v.line,
            solution: v.solution.clone(),
            severity: v.severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_round_trip_through_text() {
        assert_eq!("Warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!(Severity::Error.to_string(), "error");
        assert!("fatal".parse::<Severity>().is_err());
    }
}
