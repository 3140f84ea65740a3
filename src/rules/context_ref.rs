//! Rules for context references

use super::base::{LintRule, RuleBase};
use super::spacing::TokenPairSpacingRule;
use super::token_case::TokenCaseRule;
use crate::token::{ContextReference, TokenKind};

fn kind(part: ContextReference) -> TokenKind {
    TokenKind::ContextReference(part)
}

/// Spaces between the `context` keyword and the selected name
pub fn rule_002() -> TokenPairSpacingRule {
    TokenPairSpacingRule::new(
        RuleBase::new(
            "context_ref",
            "002",
            2,
            "Reduce spaces between *context* keyword and selected_name.",
        ),
        &[
            (kind(ContextReference::Keyword), kind(ContextReference::LibraryName)),
            (kind(ContextReference::Keyword), kind(ContextReference::ContextName)),
        ],
    )
}

pub fn rule_004() -> TokenCaseRule {
    TokenCaseRule::new(
        RuleBase::new("context_ref", "004", 6, "Change \"context\" keyword to the configured case."),
        &[kind(ContextReference::Keyword)],
    )
}

pub fn rules() -> Vec<Box<dyn LintRule>> {
    vec![Box::new(rule_002()), Box::new(rule_004())]
}
