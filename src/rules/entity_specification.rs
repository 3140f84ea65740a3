//! Rules for entity specifications inside attribute specifications

use super::base::{LintRule, RuleBase};
use super::spacing::WhitespaceBeforeTokenRule;
use crate::token::{EntitySpecification, TokenKind};

/// Whitespace in front of the colon
pub fn rule_101() -> WhitespaceBeforeTokenRule {
    WhitespaceBeforeTokenRule::new(
        RuleBase::new("entity_specification", "101", 2, "Add a space before the colon."),
        &[TokenKind::EntitySpecification(EntitySpecification::Colon)],
    )
}

pub fn rules() -> Vec<Box<dyn LintRule>> {
    vec![Box::new(rule_101())]
}
