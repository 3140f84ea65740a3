//! Blank line placement below lines ending with given tokens

use serde_json::Value;

use super::base::{LintRule, RuleBase, RuleError};
use crate::config::{expect_choice, ConfigurationError};
use crate::models::{Action, Violation};
use crate::stream::TokenStream;
use crate::token::TokenKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlankLineStyle {
    RequireBlankLine,
    NoBlankLine,
}

impl BlankLineStyle {
    const CHOICES: [&'static str; 2] = ["require_blank_line", "no_blank_line"];

    fn from_choice(choice: &str) -> Self {
        match choice {
            "no_blank_line" => BlankLineStyle::NoBlankLine,
            _ => BlankLineStyle::RequireBlankLine,
        }
    }
}

pub struct BlankLineBelowRule {
    base: RuleBase,
    kinds: Vec<TokenKind>,
    /// Only lines inside these start/end kinds are considered
    limits: Option<(TokenKind, TokenKind)>,
    /// A line below holding any of these kinds is left alone
    allow: Vec<TokenKind>,
    style: BlankLineStyle,
}

impl BlankLineBelowRule {
    pub fn new(base: RuleBase, kinds: &[TokenKind]) -> Self {
        Self {
            base: base.with_groups(&["blank_line"]),
            kinds: kinds.to_vec(),
            limits: None,
            allow: Vec::new(),
            style: BlankLineStyle::RequireBlankLine,
        }
    }

    pub fn within(mut self, start: TokenKind, end: TokenKind) -> Self {
        self.limits = Some((start, end));
        self
    }

    pub fn allowing(mut self, kinds: &[TokenKind]) -> Self {
        self.allow = kinds.to_vec();
        self
    }

    pub fn with_style(mut self, style: BlankLineStyle) -> Self {
        self.style = style;
        self
    }

    pub fn style(&self) -> BlankLineStyle {
        self.style
    }

    fn missing_blank_lines(&self, stream: &TokenStream) -> Vec<Violation> {
        stream
            .line_below_line_ending_with(&self.kinds, self.limits)
            .into_iter()
            .filter(|toi| !matches!(toi.tokens.as_slice(), [t] if t.kind == TokenKind::BlankLine))
            .filter(|toi| !toi.contains_kind(&self.allow))
            .map(|toi| {
                let line = toi.line;
                self.base.violation(line, toi, Action::InsertBlankLine)
            })
            .collect()
    }

    fn extra_blank_lines(&self, stream: &TokenStream) -> Vec<Violation> {
        stream
            .blank_lines_below_line_ending_with(&self.kinds, self.limits)
            .into_iter()
            .map(|toi| {
                let line = toi.line;
                self.base.violation(line, toi, Action::Remove)
            })
            .collect()
    }
}

impl LintRule for BlankLineBelowRule {
    fn base(&self) -> &RuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RuleBase {
        &mut self.base
    }

    fn configure_option(&mut self, key: &str, value: &Value) -> Result<bool, ConfigurationError> {
        if key != "style" {
            return Ok(false);
        }
        let choice = expect_choice(&self.base.id, key, value, &BlankLineStyle::CHOICES)?;
        self.style = BlankLineStyle::from_choice(&choice);
        Ok(true)
    }

    fn analyze(&self, stream: &TokenStream) -> Result<Vec<Violation>, RuleError> {
        Ok(match self.style {
            BlankLineStyle::RequireBlankLine => self.missing_blank_lines(stream),
            BlankLineStyle::NoBlankLine => self.extra_blank_lines(stream),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify_source, ClassifierOptions};
    use crate::token::{Architecture, LibraryClause, ObjectClass, ObjectPart, Process};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn stream(source: &str) -> TokenStream {
        classify_source(source, &ClassifierOptions::default()).unwrap()
    }

    fn library_rule() -> BlankLineBelowRule {
        BlankLineBelowRule::new(
            RuleBase::new("test", "200", 3, "Add a blank line below."),
            &[TokenKind::LibraryClause(LibraryClause::Semicolon)],
        )
    }

    #[test]
    fn test_require_blank_line() {
        let mut s = stream("library ieee;\nuse ieee.std_logic_1164.all;\n");
        let rule = library_rule();

        let violations = rule.analyze(&s).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 2);

        rule.fix(&mut s, &violations).unwrap();
        assert_eq!(s.text(), "library ieee;\n\nuse ieee.std_logic_1164.all;\n");
        assert!(rule.analyze(&s).unwrap().is_empty());
    }

    #[test]
    fn test_no_blank_line_removes_runs() {
        let mut s = stream("library ieee;\n\n  \nuse ieee.std_logic_1164.all;\n");
        let mut rule = library_rule();
        let options = [("style".to_string(), json!("no_blank_line"))].into_iter().collect();
        assert!(rule.configure(&options).is_empty());
        assert_eq!(rule.style(), BlankLineStyle::NoBlankLine);

        let violations = rule.analyze(&s).unwrap();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line, 2);

        rule.fix(&mut s, &violations).unwrap();
        assert_eq!(s.text(), "library ieee;\nuse ieee.std_logic_1164.all;\n");
    }

    #[test]
    fn test_invalid_style_keeps_default() {
        let mut rule = library_rule();
        let options = [("style".to_string(), json!("sometimes"))].into_iter().collect();
        assert_eq!(rule.configure(&options).len(), 1);
        assert_eq!(rule.style(), BlankLineStyle::RequireBlankLine);
    }

    #[test]
    fn test_allowed_tokens_skip_the_line() {
        let s = stream("architecture rtl of e is\nbegin\nend architecture;\n");
        let rule = BlankLineBelowRule::new(
            RuleBase::new("test", "015", 3, "Add a blank line below is."),
            &[TokenKind::Architecture(Architecture::IsKeyword)],
        )
        .allowing(&[TokenKind::Architecture(Architecture::BeginKeyword)]);

        assert!(rule.analyze(&s).unwrap().is_empty());
    }

    #[test]
    fn test_hierarchy_limits() {
        let source = "architecture rtl of e is\n  signal a : bit;\n  signal b : bit;\nbegin\n  process\n    variable v : bit;\n    variable w : bit;\n  begin\n    wait;\n  end process;\nend architecture;\n";
        let semicolons = [
            TokenKind::Object(ObjectClass::Signal, ObjectPart::Semicolon),
            TokenKind::Object(ObjectClass::Variable, ObjectPart::Semicolon),
        ];
        let rule = BlankLineBelowRule::new(RuleBase::new("test", "300", 3, "Add a blank line."), &semicolons)
            .within(
                TokenKind::Process(Process::ProcessKeyword),
                TokenKind::Process(Process::BeginKeyword),
            );

        let violations = rule.analyze(&stream(source)).unwrap();
        let lines: Vec<_> = violations.iter().map(|v| v.line).collect();
        assert_eq!(lines, vec![7, 8]);
    }
}
