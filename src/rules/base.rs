//! Contract every style rule implements
//!
//! A rule owns a [`RuleBase`] holding its identity and the universal options,
//! detects violations against a read-only [`TokenStream`] and repairs them by
//! turning each violation's [`Action`] into an [`Edit`]. All edits for one
//! rule are applied as a single batch.

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{expect_bool, expect_string, expect_usize, ConfigurationError, RuleOptions};
use crate::models::{Action, Severity, Violation};
use crate::rule_list::MAX_PHASE;
use crate::stream::{Edit, EditError, Toi, TokenStream};
use crate::token::Token;

/// Failure of a single rule; never fatal for the run
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("rule {rule}: {source}")]
    Edit { rule: String, source: EditError },
    #[error("rule {rule}: violation at line {line} carries a token range the fix cannot use")]
    InvalidToi { rule: String, line: usize },
    #[error("rule {rule} still reports {remaining} violation(s) after fixing")]
    NotIdempotent { rule: String, remaining: usize },
}

/// Identity, ordering and universal options shared by all rules
#[derive(Debug, Clone)]
pub struct RuleBase {
    /// Rule group, e.g. `architecture`
    pub name: &'static str,
    /// Identifier within the group, e.g. `010`
    pub identifier: &'static str,
    pub id: String,
    pub phase: u8,
    pub subphase: u8,
    pub disable: bool,
    pub fixable: bool,
    pub severity: Severity,
    pub solution: String,
    pub indent_size: usize,
    pub groups: Vec<&'static str>,
}

impl RuleBase {
    pub fn new(name: &'static str, identifier: &'static str, phase: u8, solution: &str) -> Self {
        Self {
            name,
            identifier,
            id: format!("{}_{}", name, identifier),
            phase,
            subphase: 1,
            disable: false,
            fixable: true,
            severity: Severity::Error,
            solution: solution.to_string(),
            indent_size: 2,
            groups: Vec::new(),
        }
    }

    pub fn with_subphase(mut self, subphase: u8) -> Self {
        self.subphase = subphase;
        self
    }

    pub fn with_groups(mut self, groups: &[&'static str]) -> Self {
        self.groups = groups.to_vec();
        self
    }

    /// Build a violation stamped with this rule's id, solution and severity
    pub fn violation(&self, line: usize, toi: Toi, action: Action) -> Violation {
        let mut violation = Violation::new(line, toi, self.solution.clone()).with_action(action);
        violation.rule_id = self.id.clone();
        violation.severity = self.severity;
        violation
    }

    /// Apply a universal option; `Ok(false)` when the key is not one
    pub fn configure_option(&mut self, key: &str, value: &Value) -> Result<bool, ConfigurationError> {
        match key {
            "disable" => self.disable = expect_bool(&self.id, key, value)?,
            "fixable" => self.fixable = expect_bool(&self.id, key, value)?,
            "phase" => self.phase = phase_value(&self.id, key, value, MAX_PHASE)?,
            "subphase" => self.subphase = phase_value(&self.id, key, value, u8::MAX)?,
            "indentSize" | "indent_size" => self.indent_size = expect_usize(&self.id, key, value)?,
            "solution" => self.solution = expect_string(&self.id, key, value)?.to_string(),
            "severity" => {
                let text = expect_string(&self.id, key, value)?;
                self.severity = text
                    .parse()
                    .map_err(|reason: String| ConfigurationError::invalid(&self.id, key, reason))?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

/// A phase or subphase in `1..=max`
fn phase_value(rule: &str, option: &str, value: &Value, max: u8) -> Result<u8, ConfigurationError> {
    let number = expect_usize(rule, option, value)?;
    match u8::try_from(number) {
        Ok(n) if (1..=max).contains(&n) => Ok(n),
        _ => Err(ConfigurationError::invalid(
            rule,
            option,
            format!("{} is not a valid {} (expected 1 to {})", number, option, max),
        )),
    }
}

/// Base trait for all style rules
pub trait LintRule: Send + Sync {
    fn base(&self) -> &RuleBase;

    fn base_mut(&mut self) -> &mut RuleBase;

    /// The unique identifier for this rule (e.g., "architecture_010")
    fn rule_id(&self) -> &str {
        &self.base().id
    }

    /// Check if this rule is enabled
    fn is_enabled(&self) -> bool {
        !self.base().disable
    }

    /// Get the rule description
    fn description(&self) -> &str {
        &self.base().solution
    }

    /// Apply a rule-specific option; `Ok(false)` when the key is unknown
    fn configure_option(&mut self, _key: &str, _value: &Value) -> Result<bool, ConfigurationError> {
        Ok(false)
    }

    /// Apply one configuration block, returning the options that were rejected
    ///
    /// Unknown keys are ignored. A rejected value leaves the option unchanged.
    fn configure(&mut self, options: &RuleOptions) -> Vec<ConfigurationError> {
        let mut errors = Vec::new();
        for (key, value) in options {
            let applied = match self.base_mut().configure_option(key, value) {
                Ok(false) => self.configure_option(key, value),
                other => other,
            };
            match applied {
                Ok(true) => {}
                Ok(false) => debug!(rule = self.rule_id(), option = %key, "ignoring unknown option"),
                Err(e) => {
                    warn!("{}", e);
                    errors.push(e);
                }
            }
        }
        errors
    }

    /// Detect violations in the current state of the stream
    fn analyze(&self, stream: &TokenStream) -> Result<Vec<Violation>, RuleError>;

    /// Turn one violation into an edit of the stream it was detected in
    fn fix_violation(&self, stream: &TokenStream, violation: &Violation) -> Result<Option<Edit>, RuleError> {
        match &violation.action {
            Some(action) => action_edit(self.rule_id(), stream, violation, action).map(Some),
            None => Ok(None),
        }
    }

    /// Repair all violations from the preceding analysis as one batch
    fn fix(&self, stream: &mut TokenStream, violations: &[Violation]) -> Result<usize, RuleError> {
        let mut edits = Vec::new();
        for violation in violations {
            if let Some(edit) = self.fix_violation(stream, violation)? {
                edits.push(edit);
            }
        }
        stream.apply_edits(edits).map_err(|source| RuleError::Edit {
            rule: self.rule_id().to_string(),
            source,
        })
    }
}

/// Translate a repair action into a concrete edit
pub fn action_edit(
    rule: &str,
    stream: &TokenStream,
    violation: &Violation,
    action: &Action,
) -> Result<Edit, RuleError> {
    let toi = &violation.toi;
    let invalid = || RuleError::InvalidToi {
        rule: rule.to_string(),
        line: violation.line,
    };
    if toi.end > stream.len() || toi.start > toi.end || toi.tokens.len() != toi.len() {
        return Err(invalid());
    }

    let edit = match action {
        Action::InsertBlankLine => Edit::insert(
            toi,
            toi.start,
            vec![Token::blank_line(), Token::carriage_return(stream.newline())],
        ),
        Action::Remove => Edit::remove(toi),
        Action::Spacing { spaces } => {
            if toi.len() < 2 {
                return Err(invalid());
            }
            Edit::replace_inner(toi, whitespace(*spaces))
        }
        Action::Align { column } => {
            let first = toi.first().filter(|_| toi.len() >= 2).ok_or_else(invalid)?;
            let end_of_first = first.column + first.width();
            let spaces = column.saturating_sub(end_of_first).max(1);
            Edit::replace_inner(toi, whitespace(spaces))
        }
        Action::BreakLine { indent } => {
            if toi.len() < 2 {
                return Err(invalid());
            }
            let mut tokens = vec![Token::carriage_return(stream.newline())];
            tokens.extend(whitespace(*indent));
            Edit::replace_inner(toi, tokens)
        }
        Action::InsertKeyword { keyword, kind } => {
            if toi.is_empty() {
                return Err(invalid());
            }
            Edit::insert(
                toi,
                toi.start + 1,
                vec![Token::whitespace(1), Token::new(*kind, keyword.as_str())],
            )
        }
        Action::Rewrite { text } => {
            let first = toi.first().filter(|_| toi.len() == 1).ok_or_else(invalid)?;
            Edit::replace(toi, vec![Token::new(first.kind, text.as_str())])
        }
    };
    Ok(edit)
}

fn whitespace(spaces: usize) -> Vec<Token> {
    if spaces == 0 {
        Vec::new()
    } else {
        vec![Token::whitespace(spaces)]
    }
}
