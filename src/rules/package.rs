//! Rules for package declarations

use super::base::{LintRule, RuleBase};
use super::end_keyword::EndKeywordRule;
use crate::token::{Package, TokenKind};

pub fn rule_008() -> EndKeywordRule {
    EndKeywordRule::new(
        RuleBase::new("package", "008", 1, "Add \"package\" keyword after \"end\" keyword."),
        TokenKind::Package(Package::EndKeyword),
        TokenKind::Package(Package::EndPackageKeyword),
        "package",
    )
}

pub fn rules() -> Vec<Box<dyn LintRule>> {
    vec![Box::new(rule_008())]
}
