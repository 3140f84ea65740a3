//! Rules for loop iteration schemes

use super::base::{LintRule, RuleBase};
use super::spacing::SpaceAfterTokenRule;
use crate::token::{IterationScheme, TokenKind};

pub fn rule_100() -> SpaceAfterTokenRule {
    SpaceAfterTokenRule::new(
        RuleBase::new("iteration_scheme", "100", 2, "Ensure a single space after while keyword."),
        &[TokenKind::IterationScheme(IterationScheme::WhileKeyword)],
    )
}

pub fn rule_101() -> SpaceAfterTokenRule {
    SpaceAfterTokenRule::new(
        RuleBase::new("iteration_scheme", "101", 2, "Ensure a single space after for keyword."),
        &[TokenKind::IterationScheme(IterationScheme::ForKeyword)],
    )
}

pub fn rules() -> Vec<Box<dyn LintRule>> {
    vec![Box::new(rule_100()), Box::new(rule_101())]
}
