//! Horizontal whitespace rules

use serde_json::Value;

use super::base::{LintRule, RuleBase, RuleError};
use crate::config::{expect_usize, ConfigurationError};
use crate::models::{Action, Violation};
use crate::stream::TokenStream;
use crate::token::TokenKind;

/// Exact number of spaces between two adjacent token kinds on one line
pub struct TokenPairSpacingRule {
    base: RuleBase,
    pairs: Vec<(TokenKind, TokenKind)>,
    number_of_spaces: usize,
}

impl TokenPairSpacingRule {
    pub fn new(base: RuleBase, pairs: &[(TokenKind, TokenKind)]) -> Self {
        Self {
            base: base.with_groups(&["whitespace"]),
            pairs: pairs.to_vec(),
            number_of_spaces: 1,
        }
    }
}

impl LintRule for TokenPairSpacingRule {
    fn base(&self) -> &RuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RuleBase {
        &mut self.base
    }

    fn configure_option(&mut self, key: &str, value: &Value) -> Result<bool, ConfigurationError> {
        if key != "number_of_spaces" {
            return Ok(false);
        }
        self.number_of_spaces = expect_usize(&self.base.id, key, value)?;
        Ok(true)
    }

    fn analyze(&self, stream: &TokenStream) -> Result<Vec<Violation>, RuleError> {
        let expected = " ".repeat(self.number_of_spaces);
        Ok(stream
            .token_pairs(&self.pairs)
            .into_iter()
            .filter(|toi| inner_text(toi) != expected)
            .map(|toi| {
                let line = toi.line;
                self.base.violation(line, toi, Action::Spacing { spaces: self.number_of_spaces })
            })
            .collect())
    }
}

/// Exactly one space after a token, unless it ends its line
pub struct SpaceAfterTokenRule {
    base: RuleBase,
    kinds: Vec<TokenKind>,
}

impl SpaceAfterTokenRule {
    pub fn new(base: RuleBase, kinds: &[TokenKind]) -> Self {
        Self {
            base: base.with_groups(&["whitespace"]),
            kinds: kinds.to_vec(),
        }
    }
}

impl LintRule for SpaceAfterTokenRule {
    fn base(&self) -> &RuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RuleBase {
        &mut self.base
    }

    fn analyze(&self, stream: &TokenStream) -> Result<Vec<Violation>, RuleError> {
        let mut violations = Vec::new();
        for index in stream.indices_of(&self.kinds) {
            let Some(next) = stream.next_non_whitespace(index) else {
                continue;
            };
            if matches!(
                stream.tokens()[next].kind,
                TokenKind::CarriageReturn | TokenKind::Comment
            ) {
                continue;
            }
            let toi = stream.toi(index..next + 1);
            if inner_text(&toi) != " " {
                violations.push(self.base.violation(toi.line, toi, Action::Spacing { spaces: 1 }));
            }
        }
        Ok(violations)
    }
}

/// At least one whitespace character in front of a token
///
/// A token starting its line satisfies the rule; wider runs are accepted.
pub struct WhitespaceBeforeTokenRule {
    base: RuleBase,
    kinds: Vec<TokenKind>,
}

impl WhitespaceBeforeTokenRule {
    pub fn new(base: RuleBase, kinds: &[TokenKind]) -> Self {
        Self {
            base: base.with_groups(&["whitespace"]),
            kinds: kinds.to_vec(),
        }
    }
}

impl LintRule for WhitespaceBeforeTokenRule {
    fn base(&self) -> &RuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RuleBase {
        &mut self.base
    }

    fn analyze(&self, stream: &TokenStream) -> Result<Vec<Violation>, RuleError> {
        let tokens = stream.tokens();
        Ok(stream
            .indices_of(&self.kinds)
            .into_iter()
            .filter(|&index| {
                index > 0
                    && !matches!(
                        tokens[index - 1].kind,
                        TokenKind::Whitespace | TokenKind::CarriageReturn
                    )
            })
            .map(|index| {
                let toi = stream.toi(index - 1..index + 1);
                self.base.violation(toi.line, toi, Action::Spacing { spaces: 1 })
            })
            .collect())
    }
}

/// Text strictly between the first and last token of a span
fn inner_text(toi: &crate::stream::Toi) -> String {
    match toi.tokens.len() {
        0..=2 => String::new(),
        n => toi.tokens[1..n - 1].iter().map(|t| t.text.as_str()).collect(),
    }
}
