//! Rules for process statements

use super::alignment::CommentAlignmentRule;
use super::base::{LintRule, RuleBase};
use super::blank_line::BlankLineBelowRule;
use super::token_case::TokenCaseRule;
use crate::token::{Process, TokenKind};

fn kind(part: Process) -> TokenKind {
    TokenKind::Process(part)
}

pub fn rule_004() -> TokenCaseRule {
    TokenCaseRule::new(
        RuleBase::new("process", "004", 6, "Change \"process\" keyword to the configured case."),
        &[kind(Process::ProcessKeyword), kind(Process::EndProcessKeyword)],
    )
}

/// Blank line below `begin`
pub fn rule_022() -> BlankLineBelowRule {
    BlankLineBelowRule::new(
        RuleBase::new("process", "022", 3, "Add a blank line below the \"begin\" keyword."),
        &[kind(Process::BeginKeyword)],
    )
    .within(kind(Process::ProcessKeyword), kind(Process::Semicolon))
}

/// Inline comments between `begin` and `end process` are aligned
pub fn rule_035() -> CommentAlignmentRule {
    CommentAlignmentRule::new(
        RuleBase::new("process", "035", 5, "Align inline comments in the process body.")
            .with_subphase(2),
        kind(Process::BeginKeyword),
        kind(Process::EndKeyword),
    )
}

pub fn rules() -> Vec<Box<dyn LintRule>> {
    vec![Box::new(rule_004()), Box::new(rule_022()), Box::new(rule_035())]
}
