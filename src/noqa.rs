//! Support for comment directives that suppress rule violations
//!
//! Supports the following formats:
//! - `-- vsg_off` - suppress all rules until `-- vsg_on`
//! - `-- vsg_off architecture_010 process_022` - suppress only those rules
//! - `-- vsg_on` - end every suppressed region
//! - `-- vsg_on process_022` - end suppression of the named rules only
//!
//! A region without a closing directive runs to the end of the file.

use std::collections::HashSet;

use crate::models::Violation;
use crate::stream::TokenStream;

/// Lines covered by one suppression directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressedRegion {
    /// Line of the opening directive (1-based)
    pub start: usize,
    /// Line of the closing directive, inclusive
    pub end: usize,
    /// Rule IDs to suppress (empty means suppress all)
    pub rule_ids: HashSet<String>,
}

impl SuppressedRegion {
    fn covers(&self, line: usize, rule_id: &str) -> bool {
        (self.start..=self.end).contains(&line)
            && (self.rule_ids.is_empty() || self.rule_ids.contains(rule_id))
    }
}

enum Directive {
    Off(HashSet<String>),
    On(HashSet<String>),
}

/// Parse the directive of a single comment, if any
fn parse_directive(comment: &str) -> Option<Directive> {
    let body = comment.strip_prefix("--")?;
    let mut words = body.split_whitespace();
    let keyword = words.next()?.to_ascii_lowercase();
    let rule_ids = words.map(|w| w.to_ascii_lowercase()).collect();
    match keyword.as_str() {
        "vsg_off" => Some(Directive::Off(rule_ids)),
        "vsg_on" => Some(Directive::On(rule_ids)),
        _ => None,
    }
}

/// Collect suppressed regions from the comments of a stream
pub fn parse_suppressions(stream: &TokenStream) -> Vec<SuppressedRegion> {
    let mut closed = Vec::new();
    let mut open: Vec<(usize, HashSet<String>)> = Vec::new();

    for token in stream.tokens().iter().filter(|t| t.is_comment()) {
        match parse_directive(&token.text) {
            Some(Directive::Off(rule_ids)) => open.push((token.line, rule_ids)),
            Some(Directive::On(rule_ids)) => {
                for (start, suppressed) in std::mem::take(&mut open) {
                    if rule_ids.is_empty() {
                        closed.push(region(start, token.line, suppressed));
                        continue;
                    }
                    if suppressed.is_empty() {
                        // A partial vsg_on ends a blanket region
                        closed.push(region(start, token.line, suppressed));
                        continue;
                    }
                    let remaining: HashSet<String> =
                        suppressed.difference(&rule_ids).cloned().collect();
                    if remaining.len() == suppressed.len() {
                        open.push((start, suppressed));
                        continue;
                    }
                    closed.push(region(start, token.line, suppressed));
                    if !remaining.is_empty() {
                        open.push((token.line, remaining));
                    }
                }
            }
            None => {}
        }
    }

    let last_line = stream.line_count();
    closed.extend(
        open.into_iter()
            .map(|(start, rule_ids)| region(start, last_line, rule_ids)),
    );
    closed
}

fn region(start: usize, end: usize, rule_ids: HashSet<String>) -> SuppressedRegion {
    SuppressedRegion { start, end, rule_ids }
}

/// Check if a violation at a specific line is suppressed by a region
pub fn is_violation_suppressed(line: usize, rule_id: &str, regions: &[SuppressedRegion]) -> bool {
    regions.iter().any(|r| r.covers(line, rule_id))
}

/// Drop the violations that fall inside a suppressed region
pub fn retain_unsuppressed(violations: &mut Vec<Violation>, regions: &[SuppressedRegion]) {
    if regions.is_empty() {
        return;
    }
    violations.retain(|v| !is_violation_suppressed(v.line, &v.rule_id, regions));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn regions(source: &str) -> Vec<SuppressedRegion> {
        parse_suppressions(&TokenStream::new(tokenize(source)))
    }

    #[test]
    fn test_parse_generic_region() {
        let regions = regions("a;\n-- vsg_off\nb;\n-- vsg_on\nc;\n");
        assert_eq!(regions.len(), 1);
        assert_eq!((regions[0].start, regions[0].end), (2, 4));
        assert!(regions[0].rule_ids.is_empty());

        assert!(is_violation_suppressed(3, "process_022", &regions));
        assert!(!is_violation_suppressed(5, "process_022", &regions));
    }

    #[test]
    fn test_parse_specific_rules() {
        let regions = regions("-- vsg_off Architecture_010 process_022\nb;\n");
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].end, 2); // Runs to the end of the file
        assert!(is_violation_suppressed(2, "architecture_010", &regions));
        assert!(is_violation_suppressed(2, "process_022", &regions));
        assert!(!is_violation_suppressed(2, "entity_010", &regions));
    }

    #[test]
    fn test_partial_vsg_on() {
        let regions = regions("-- vsg_off a_001 b_002\nx;\n-- vsg_on a_001\ny;\n");
        assert!(is_violation_suppressed(2, "a_001", &regions));
        assert!(!is_violation_suppressed(4, "a_001", &regions));
        assert!(is_violation_suppressed(4, "b_002", &regions));
    }

    #[test]
    fn test_ordinary_comments_are_ignored() {
        assert!(regions("a; -- vsg is a tool\n-- note: vsg_off later\n").is_empty());
    }
}
