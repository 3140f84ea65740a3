//! Rules for entity declarations

use super::base::{LintRule, RuleBase};
use super::end_keyword::EndKeywordRule;
use super::token_case::TokenCaseRule;
use crate::token::{Entity, TokenKind};

fn kind(part: Entity) -> TokenKind {
    TokenKind::Entity(part)
}

pub fn rule_004() -> TokenCaseRule {
    TokenCaseRule::new(
        RuleBase::new("entity", "004", 6, "Change \"entity\" keyword to the configured case."),
        &[kind(Entity::EntityKeyword), kind(Entity::EndEntityKeyword)],
    )
}

pub fn rule_010() -> EndKeywordRule {
    EndKeywordRule::new(
        RuleBase::new("entity", "010", 1, "Add \"entity\" keyword after \"end\" keyword."),
        kind(Entity::EndKeyword),
        kind(Entity::EndEntityKeyword),
        "entity",
    )
}

pub fn rules() -> Vec<Box<dyn LintRule>> {
    vec![Box::new(rule_004()), Box::new(rule_010())]
}
