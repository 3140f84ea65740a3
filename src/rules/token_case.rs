//! Letter case of keywords and names

use serde_json::Value;

use super::base::{LintRule, RuleBase, RuleError};
use crate::config::{expect_choice, ConfigurationError};
use crate::models::{Action, Violation};
use crate::stream::TokenStream;
use crate::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Lower,
    Upper,
}

impl Case {
    pub const CHOICES: [&'static str; 2] = ["lower", "upper"];

    pub fn from_choice(choice: &str) -> Self {
        match choice {
            "upper" => Case::Upper,
            _ => Case::Lower,
        }
    }

    pub fn apply(self, text: &str) -> String {
        match self {
            Case::Lower => text.to_ascii_lowercase(),
            Case::Upper => text.to_ascii_uppercase(),
        }
    }
}

/// Parse the `case` option shared by every rule that writes keywords
pub fn case_option(rule: &str, key: &str, value: &Value) -> Result<Case, ConfigurationError> {
    expect_choice(rule, key, value, &Case::CHOICES).map(|choice| Case::from_choice(&choice))
}

pub struct TokenCaseRule {
    base: RuleBase,
    kinds: Vec<TokenKind>,
    case: Case,
}

impl TokenCaseRule {
    pub fn new(base: RuleBase, kinds: &[TokenKind]) -> Self {
        Self {
            base: base.with_groups(&["case"]),
            kinds: kinds.to_vec(),
            case: Case::Lower,
        }
    }
}

impl LintRule for TokenCaseRule {
    fn base(&self) -> &RuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RuleBase {
        &mut self.base
    }

    fn configure_option(&mut self, key: &str, value: &Value) -> Result<bool, ConfigurationError> {
        if key != "case" {
            return Ok(false);
        }
        self.case = case_option(&self.base.id, key, value)?;
        Ok(true)
    }

    fn analyze(&self, stream: &TokenStream) -> Result<Vec<Violation>, RuleError> {
        let mut violations = Vec::new();
        for index in stream.indices_of(&self.kinds) {
            let token = &stream.tokens()[index];
            let expected = self.case.apply(&token.text);
            if expected != token.text {
                let toi = stream.toi(index..index + 1);
                violations.push(self.base.violation(toi.line, toi, Action::Rewrite { text: expected }));
            }
        }
        Ok(violations)
    }
}
