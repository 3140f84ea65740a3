//! Tokens that must start their own line inside a region

use super::base::{LintRule, RuleBase, RuleError};
use crate::models::{Action, Violation};
use crate::stream::TokenStream;
use crate::token::TokenKind;

pub struct SplitLineRule {
    base: RuleBase,
    target: TokenKind,
    start: TokenKind,
    end: TokenKind,
}

impl SplitLineRule {
    pub fn new(base: RuleBase, target: TokenKind, start: TokenKind, end: TokenKind) -> Self {
        Self {
            base: base.with_groups(&["structure"]),
            target,
            start,
            end,
        }
    }
}

impl LintRule for SplitLineRule {
    fn base(&self) -> &RuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RuleBase {
        &mut self.base
    }

    fn analyze(&self, stream: &TokenStream) -> Result<Vec<Violation>, RuleError> {
        let tokens = stream.tokens();
        let mut violations = Vec::new();
        for region in stream.tokens_bounded_by(self.start, self.end) {
            let indent = stream.indentation(region.line).chars().count() + self.base.indent_size;
            for index in region.start..region.end {
                if tokens[index].kind != self.target {
                    continue;
                }
                let Some(previous) = stream.previous_non_whitespace(index) else {
                    continue;
                };
                if tokens[previous].is_carriage_return() {
                    continue;
                }
                let toi = stream.toi(previous..index + 1);
                violations.push(self.base.violation(
                    tokens[index].line,
                    toi,
                    Action::BreakLine { indent },
                ));
            }
        }
        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify_source, ClassifierOptions};
    use crate::token::{Instantiation, MapAspect};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_breaks_before_port_map() {
        let source = "architecture rtl of e is\nbegin\n  u0 : entity work.a port map (x => y);\nend;\n";
        let mut s = classify_source(source, &ClassifierOptions::default()).unwrap();
        let rule = SplitLineRule::new(
            RuleBase::new("test", "013", 1, "Move port map to its own line."),
            TokenKind::PortMap(MapAspect::Keyword),
            TokenKind::Instantiation(Instantiation::LabelColon),
            TokenKind::Instantiation(Instantiation::Semicolon),
        );

        let violations = rule.analyze(&s).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 3);

        rule.fix(&mut s, &violations).unwrap();
        assert_eq!(
            s.lines(),
            vec![
                "architecture rtl of e is",
                "begin",
                "  u0 : entity work.a",
                "    port map (x => y);",
                "end;",
            ]
        );
        assert!(rule.analyze(&s).unwrap().is_empty());
    }
}
