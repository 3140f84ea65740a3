//! Rules for architecture bodies

use super::base::{LintRule, RuleBase};
use super::blank_line::BlankLineBelowRule;
use super::end_keyword::EndKeywordRule;
use super::token_case::TokenCaseRule;
use crate::token::{Architecture, TokenKind};

fn kind(part: Architecture) -> TokenKind {
    TokenKind::Architecture(part)
}

/// Case of the `architecture` keywords
pub fn rule_004() -> TokenCaseRule {
    TokenCaseRule::new(
        RuleBase::new("architecture", "004", 6, "Change \"architecture\" keyword to the configured case."),
        &[
            kind(Architecture::ArchitectureKeyword),
            kind(Architecture::EndArchitectureKeyword),
        ],
    )
}

/// `end` of an architecture must be followed by `architecture`
pub fn rule_010() -> EndKeywordRule {
    EndKeywordRule::new(
        RuleBase::new("architecture", "010", 1, "Add \"architecture\" keyword after \"end\" keyword."),
        kind(Architecture::EndKeyword),
        kind(Architecture::EndArchitectureKeyword),
        "architecture",
    )
}

/// Blank line below the `is` keyword, unless `begin` follows directly
pub fn rule_015() -> BlankLineBelowRule {
    BlankLineBelowRule::new(
        RuleBase::new("architecture", "015", 3, "Add a blank line below the \"is\" keyword."),
        &[kind(Architecture::IsKeyword)],
    )
    .allowing(&[kind(Architecture::BeginKeyword)])
}

/// Blank line below the closing semicolon
pub fn rule_200() -> BlankLineBelowRule {
    BlankLineBelowRule::new(
        RuleBase::new("architecture", "200", 3, "Add a blank line below the end of the architecture."),
        &[kind(Architecture::Semicolon)],
    )
}

pub fn rules() -> Vec<Box<dyn LintRule>> {
    vec![
        Box::new(rule_004()),
        Box::new(rule_010()),
        Box::new(rule_015()),
        Box::new(rule_200()),
    ]
}
