//! Rules for component and entity instantiations

use super::alignment::CommentAlignmentRule;
use super::base::{LintRule, RuleBase};
use super::spacing::SpaceAfterTokenRule;
use super::split_line::SplitLineRule;
use crate::token::{Instantiation, MapAspect, TokenKind};

fn kind(part: Instantiation) -> TokenKind {
    TokenKind::Instantiation(part)
}

pub fn rule_012() -> SplitLineRule {
    SplitLineRule::new(
        RuleBase::new(
            "instantiation",
            "012",
            1,
            "Place \"generic map\" keywords on the next line by itself",
        ),
        TokenKind::GenericMap(MapAspect::Keyword),
        kind(Instantiation::LabelColon),
        kind(Instantiation::Semicolon),
    )
}

pub fn rule_013() -> SplitLineRule {
    SplitLineRule::new(
        RuleBase::new(
            "instantiation",
            "013",
            1,
            "Place \"port map\" keywords on the next line by itself",
        ),
        TokenKind::PortMap(MapAspect::Keyword),
        kind(Instantiation::LabelColon),
        kind(Instantiation::Semicolon),
    )
}

/// Inline comments of instantiations are aligned
pub fn rule_029() -> CommentAlignmentRule {
    CommentAlignmentRule::new(
        RuleBase::new("instantiation", "029", 5, "Align comment.").with_subphase(3),
        kind(Instantiation::Label),
        kind(Instantiation::Semicolon),
    )
}

/// Single space after the label colon
pub fn rule_101() -> SpaceAfterTokenRule {
    SpaceAfterTokenRule::new(
        RuleBase::new("instantiation", "101", 2, "Ensure a single space after the label colon."),
        &[kind(Instantiation::LabelColon)],
    )
}

pub fn rules() -> Vec<Box<dyn LintRule>> {
    vec![
        Box::new(rule_012()),
        Box::new(rule_013()),
        Box::new(rule_029()),
        Box::new(rule_101()),
    ]
}
