//! Closing `end` statements that must repeat their construct's keyword

use serde_json::Value;

use super::base::{LintRule, RuleBase, RuleError};
use super::token_case::{case_option, Case};
use crate::config::ConfigurationError;
use crate::models::{Action, Violation};
use crate::stream::TokenStream;
use crate::token::TokenKind;

pub struct EndKeywordRule {
    base: RuleBase,
    end: TokenKind,
    keyword_kind: TokenKind,
    keyword: &'static str,
    /// Case of the inserted keyword
    case: Case,
}

impl EndKeywordRule {
    pub fn new(base: RuleBase, end: TokenKind, keyword_kind: TokenKind, keyword: &'static str) -> Self {
        Self {
            base: base.with_groups(&["structure"]),
            end,
            keyword_kind,
            keyword,
            case: Case::Lower,
        }
    }
}

impl LintRule for EndKeywordRule {
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
        for index in stream.indices_of(&[self.end]) {
            let present = stream
                .next_significant(index)
                .is_some_and(|next| stream.tokens()[next].kind == self.keyword_kind);
            if !present {
                let toi = stream.toi(index..index + 1);
                let action = Action::InsertKeyword {
                    keyword: self.case.apply(self.keyword),
                    kind: self.keyword_kind,
                };
                violations.push(self.base.violation(toi.line, toi, action));
            }
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify_source, ClassifierOptions};
    use crate::token::Architecture;
    use pretty_assertions::assert_eq;

    fn rule() -> EndKeywordRule {
        EndKeywordRule::new(
            RuleBase::new("test", "010", 1, "Add architecture keyword."),
            TokenKind::Architecture(Architecture::EndKeyword),
            TokenKind::Architecture(Architecture::EndArchitectureKeyword),
            "architecture",
        )
    }

    #[test]
    fn test_inserts_missing_keyword() {
        let source = "architecture rtl of e is\nbegin\nend rtl;\n";
        let mut s = classify_source(source, &ClassifierOptions::default()).unwrap();
        let rule = rule();

        let violations = rule.analyze(&s).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 3);

        rule.fix(&mut s, &violations).unwrap();
        assert_eq!(s.text(), "architecture rtl of e is\nbegin\nend architecture rtl;\n");
        assert!(rule.analyze(&s).unwrap().is_empty());
    }

    #[test]
    fn test_keyword_present() {
        let source = "architecture rtl of e is\nbegin\nend architecture rtl;\n";
        let s = classify_source(source, &ClassifierOptions::default()).unwrap();
        assert!(rule().analyze(&s).unwrap().is_empty());
    }
}
