//! Inline comment alignment across a bounded region
//!
//! Regions on consecutive lines form one alignment group, so a run of
//! statements shares a single comment column. A blank line ends a group.
//! Lines that start with a comment are never moved.

use serde_json::Value;

use super::base::{LintRule, RuleBase, RuleError};
use crate::config::{expect_bool, ConfigurationError};
use crate::models::{Action, Violation};
use crate::stream::TokenStream;
use crate::token::TokenKind;

pub struct CommentAlignmentRule {
    base: RuleBase,
    start: TokenKind,
    end: TokenKind,
    /// Align one space after the longest line instead of at the rightmost comment
    compact_alignment: bool,
}

/// Code/comment pair of one line in an alignment group
struct InlineComment {
    line: usize,
    code: usize,
    comment: usize,
}

impl CommentAlignmentRule {
    pub fn new(base: RuleBase, start: TokenKind, end: TokenKind) -> Self {
        Self {
            base: base.with_groups(&["alignment"]),
            start,
            end,
            compact_alignment: false,
        }
    }

    /// Line spans of the regions, with adjacent spans merged
    fn groups(&self, stream: &TokenStream) -> Vec<(usize, usize)> {
        let mut groups: Vec<(usize, usize)> = Vec::new();
        for region in stream.tokens_bounded_by(self.start, self.end) {
            let first = region.line;
            let last = stream.line_of(region.end.saturating_sub(1));
            match groups.last_mut() {
                Some(group) if first <= group.1 + 1 => group.1 = group.1.max(last),
                _ => groups.push((first, last)),
            }
        }
        groups
    }

    fn inline_comments(stream: &TokenStream, first: usize, last: usize) -> Vec<InlineComment> {
        let tokens = stream.tokens();
        (first..=last)
            .filter_map(|line| {
                let leading = stream.first_significant_on_line(line)?;
                if tokens[leading].is_comment() {
                    return None;
                }
                let comment = stream.line_range(line)?.last().filter(|&i| tokens[i].is_comment())?;
                let code = stream.last_code_on_line(line).filter(|&i| i < comment)?;
                Some(InlineComment { line, code, comment })
            })
            .collect()
    }
}

impl LintRule for CommentAlignmentRule {
    fn base(&self) -> &RuleBase {
        &self.base
    }

    fn base_mut(&mut self) -> &mut RuleBase {
        &mut self.base
    }

    fn configure_option(&mut self, key: &str, value: &Value) -> Result<bool, ConfigurationError> {
        if key != "compact_alignment" {
            return Ok(false);
        }
        self.compact_alignment = expect_bool(&self.base.id, key, value)?;
        Ok(true)
    }

    fn analyze(&self, stream: &TokenStream) -> Result<Vec<Violation>, RuleError> {
        let tokens = stream.tokens();
        let mut violations = Vec::new();
        for (first, last) in self.groups(stream) {
            let comments = Self::inline_comments(stream, first, last);
            let column = if self.compact_alignment {
                comments
                    .iter()
                    .map(|c| tokens[c.code].column + tokens[c.code].width() + 1)
                    .max()
            } else {
                comments.iter().map(|c| tokens[c.comment].column).max()
            };
            let Some(column) = column else {
                continue;
            };
            for c in comments {
                if tokens[c.comment].column != column {
                    let toi = stream.toi(c.code..c.comment + 1);
                    violations.push(self.base.violation(c.line, toi, Action::Align { column }));
                }
            }
        }
        Ok(violations)
    }
}
