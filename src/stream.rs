//! Classified token stream for one source file
//!
//! Tokens live in a single index-addressed vector. Rules read it through the
//! query methods, which return [`Toi`] snapshots, and change it only through
//! [`TokenStream::apply_edits`], which splices a whole batch at once and then
//! recomputes line and column numbers.

use std::collections::HashMap;
use std::ops::Range;

use thiserror::Error;

use crate::lexer::number_tokens;
use crate::token::{Token, TokenKind};

/// Token range of interest: a contiguous span implicated by a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toi {
    /// Index of the first token of the span
    pub start: usize,
    /// Index one past the last token of the span
    pub end: usize,
    /// Line of the first token, or of the insertion point for empty spans
    pub line: usize,
    /// Stream revision the span was taken from
    pub revision: u64,
    pub tokens: Vec<Token>,
}

impl Toi {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn first(&self) -> Option<&Token> {
        self.tokens.first()
    }

    pub fn contains_kind(&self, kinds: &[TokenKind]) -> bool {
        self.tokens.iter().any(|t| kinds.contains(&t.kind))
    }

    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}

/// Replacement of the token range `start..end` with new tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub revision: u64,
    pub replacement: Vec<Token>,
}

impl Edit {
    pub fn replace(toi: &Toi, replacement: Vec<Token>) -> Self {
        Self {
            start: toi.start,
            end: toi.end,
            revision: toi.revision,
            replacement,
        }
    }

    pub fn remove(toi: &Toi) -> Self {
        Self::replace(toi, Vec::new())
    }

    /// Insert tokens in front of index `at` of the span's revision
    pub fn insert(toi: &Toi, at: usize, tokens: Vec<Token>) -> Self {
        Self {
            start: at,
            end: at,
            revision: toi.revision,
            replacement: tokens,
        }
    }

    /// Replace the tokens strictly between the span's first and last token
    pub fn replace_inner(toi: &Toi, tokens: Vec<Token>) -> Self {
        Self {
            start: toi.start + 1,
            end: toi.end.saturating_sub(1).max(toi.start + 1),
            revision: toi.revision,
            replacement: tokens,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("edit was computed against revision {edit} but the stream is at revision {stream}")]
    Stale { edit: u64, stream: u64 },
    #[error("edit range {start}..{end} is outside the stream of {len} tokens")]
    OutOfRange { start: usize, end: usize, len: usize },
    #[error("edits overlap at token {index}")]
    Overlapping { index: usize },
}

#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
    /// Index of the first token of each line
    line_starts: Vec<usize>,
    revision: u64,
}

impl TokenStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        number_tokens(&mut tokens);
        let mut stream = Self {
            tokens,
            line_starts: Vec::new(),
            revision: 0,
        };
        stream.index_lines();
        stream
    }

    fn index_lines(&mut self) {
        self.line_starts.clear();
        if self.tokens.is_empty() {
            return;
        }
        self.line_starts.push(0);
        for (i, token) in self.tokens.iter().enumerate() {
            if token.is_carriage_return() && i + 1 < self.tokens.len() {
                self.line_starts.push(i + 1);
            }
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Token indices of a 1-based line, excluding its line terminator
    pub fn line_range(&self, line: usize) -> Option<Range<usize>> {
        if line == 0 || line > self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[line - 1];
        let mut end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.tokens.len());
        if end > start && self.tokens[end - 1].is_carriage_return() {
            end -= 1;
        }
        Some(start..end)
    }

    pub fn line_tokens(&self, line: usize) -> &[Token] {
        self.line_range(line).map_or(&[], |range| &self.tokens[range])
    }

    /// 1-based line holding the token at `index`
    pub fn line_of(&self, index: usize) -> usize {
        match self.line_starts.binary_search(&index) {
            Ok(line) => line + 1,
            Err(line) => line,
        }
    }

    pub fn is_blank_line(&self, line: usize) -> bool {
        matches!(self.line_tokens(line), [t] if t.kind == TokenKind::BlankLine)
    }

    /// Line terminator used by the file, `\n` when it has none
    pub fn newline(&self) -> &str {
        self.tokens
            .iter()
            .find(|t| t.is_carriage_return())
            .map_or("\n", |t| t.text.as_str())
    }

    /// Leading whitespace of a line
    pub fn indentation(&self, line: usize) -> &str {
        match self.line_tokens(line).first() {
            Some(t) if t.kind == TokenKind::Whitespace => &t.text,
            _ => "",
        }
    }

    /// Index of the first token of the line that is not whitespace
    pub fn first_significant_on_line(&self, line: usize) -> Option<usize> {
        let range = self.line_range(line)?;
        range
            .into_iter()
            .find(|&i| self.tokens[i].kind != TokenKind::Whitespace)
    }

    /// Index of the last token of the line that is neither whitespace nor a comment
    pub fn last_code_on_line(&self, line: usize) -> Option<usize> {
        let range = self.line_range(line)?;
        range.into_iter().rev().find(|&i| {
            !matches!(
                self.tokens[i].kind,
                TokenKind::Whitespace | TokenKind::Comment | TokenKind::BlankLine
            )
        })
    }

    /// Next token index after `index` that is not whitespace, on any line
    pub fn next_non_whitespace(&self, index: usize) -> Option<usize> {
        (index + 1..self.tokens.len()).find(|&i| self.tokens[i].kind != TokenKind::Whitespace)
    }

    /// Previous token index before `index` that is not whitespace
    pub fn previous_non_whitespace(&self, index: usize) -> Option<usize> {
        (0..index)
            .rev()
            .find(|&i| self.tokens[i].kind != TokenKind::Whitespace)
    }

    /// Next token index after `index` that is not trivia, on any line
    pub fn next_significant(&self, index: usize) -> Option<usize> {
        (index + 1..self.tokens.len()).find(|&i| !self.tokens[i].is_trivia())
    }

    pub fn toi(&self, range: Range<usize>) -> Toi {
        let line = if range.start < self.tokens.len() {
            self.line_of(range.start)
        } else {
            self.line_count()
        };
        Toi {
            start: range.start,
            end: range.end,
            line,
            revision: self.revision,
            tokens: self.tokens[range].to_vec(),
        }
    }

    /// Indices of every token whose kind is one of `kinds`
    pub fn indices_of(&self, kinds: &[TokenKind]) -> Vec<usize> {
        self.tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| kinds.contains(&t.kind))
            .map(|(i, _)| i)
            .collect()
    }

    /// Regions starting at a `start` kind and ending at the next `end` kind, inclusive
    pub fn tokens_bounded_by(&self, start: TokenKind, end: TokenKind) -> Vec<Toi> {
        let mut regions = Vec::new();
        let mut open: Option<usize> = None;
        for (i, token) in self.tokens.iter().enumerate() {
            if token.kind == start && open.is_none() {
                open = Some(i);
            } else if token.kind == end {
                if let Some(first) = open.take() {
                    regions.push(self.toi(first..i + 1));
                }
            }
        }
        regions
    }

    /// Token index ranges that lie inside `limits`, or the whole stream when there are none
    fn hierarchy_ranges(&self, limits: Option<(TokenKind, TokenKind)>) -> Vec<Range<usize>> {
        match limits {
            None => vec![0..self.tokens.len()],
            Some((start, end)) => self
                .tokens_bounded_by(start, end)
                .into_iter()
                .map(|toi| toi.start..toi.end)
                .collect(),
        }
    }

    /// Lines whose last code token is one of `kinds`, optionally restricted to a hierarchy
    pub fn lines_ending_with(
        &self,
        kinds: &[TokenKind],
        limits: Option<(TokenKind, TokenKind)>,
    ) -> Vec<usize> {
        let ranges = self.hierarchy_ranges(limits);
        (1..=self.line_count())
            .filter(|&line| {
                self.last_code_on_line(line).is_some_and(|i| {
                    kinds.contains(&self.tokens[i].kind) && ranges.iter().any(|r| r.contains(&i))
                })
            })
            .collect()
    }

    /// The line below each line ending with one of `kinds`, without its terminator
    pub fn line_below_line_ending_with(
        &self,
        kinds: &[TokenKind],
        limits: Option<(TokenKind, TokenKind)>,
    ) -> Vec<Toi> {
        self.lines_ending_with(kinds, limits)
            .into_iter()
            .filter_map(|line| self.line_range(line + 1))
            .map(|range| self.toi(range))
            .collect()
    }

    /// Runs of blank lines, terminators included, below lines ending with one of `kinds`
    pub fn blank_lines_below_line_ending_with(
        &self,
        kinds: &[TokenKind],
        limits: Option<(TokenKind, TokenKind)>,
    ) -> Vec<Toi> {
        let mut tois = Vec::new();
        for line in self.lines_ending_with(kinds, limits) {
            let mut last = line;
            while last < self.line_count() && self.is_blank_line(last + 1) {
                last += 1;
            }
            if last == line {
                continue;
            }
            let Some(start) = self.line_range(line + 1).map(|r| r.start) else {
                continue;
            };
            let end = self
                .line_starts
                .get(last)
                .copied()
                .unwrap_or(self.tokens.len());
            tois.push(self.toi(start..end));
        }
        tois
    }

    /// Spans from a left kind to an adjacent right kind on the same line
    ///
    /// Only whitespace may separate the pair; the span covers both tokens.
    pub fn token_pairs(&self, pairs: &[(TokenKind, TokenKind)]) -> Vec<Toi> {
        let mut tois = Vec::new();
        for (i, token) in self.tokens.iter().enumerate() {
            if !pairs.iter().any(|(left, _)| *left == token.kind) {
                continue;
            }
            let Some(j) = self.next_non_whitespace(i) else {
                continue;
            };
            let right = self.tokens[j].kind;
            if pairs.iter().any(|p| *p == (token.kind, right)) {
                tois.push(self.toi(i..j + 1));
            }
        }
        tois
    }

    /// Splice a batch of edits into the stream
    ///
    /// Edits must come from the current revision and must not overlap. They
    /// are applied from the highest index down so earlier indices stay valid.
    pub fn apply_edits(&mut self, mut edits: Vec<Edit>) -> Result<usize, EditError> {
        if edits.is_empty() {
            return Ok(0);
        }
        for edit in &edits {
            if edit.revision != self.revision {
                return Err(EditError::Stale {
                    edit: edit.revision,
                    stream: self.revision,
                });
            }
            if edit.start > edit.end || edit.end > self.tokens.len() {
                return Err(EditError::OutOfRange {
                    start: edit.start,
                    end: edit.end,
                    len: self.tokens.len(),
                });
            }
        }

        edits.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));
        for pair in edits.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            if b.start < a.end || (a.start == b.start && a.start == a.end && b.start == b.end) {
                return Err(EditError::Overlapping { index: b.start });
            }
        }

        let applied = edits.len();
        for edit in edits.into_iter().rev() {
            self.tokens.splice(edit.start..edit.end, edit.replacement);
        }
        number_tokens(&mut self.tokens);
        self.index_lines();
        self.revision += 1;
        Ok(applied)
    }

    /// Render the stream as text lines without terminators
    pub fn lines(&self) -> Vec<String> {
        (1..=self.line_count())
            .map(|line| self.line_tokens(line).iter().map(|t| t.text.as_str()).collect())
            .collect()
    }

    /// Concatenate all token text
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Count of tokens per kind, used in debug logging
    pub fn kind_histogram(&self) -> HashMap<TokenKind, usize> {
        let mut histogram = HashMap::new();
        for token in &self.tokens {
            *histogram.entry(token.kind).or_insert(0) += 1;
        }
        histogram
    }
}
