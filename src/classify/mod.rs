//! Grammar classification of the raw token list
//!
//! Every production has a `classify` function taking the cursor index of the
//! first token it may own and returning the index just past the last token it
//! assigned (or the index of the terminator it stopped at, for productions
//! that do not own their terminator). Productions never backtrack: ambiguous
//! spots are resolved by peeking at most a few significant tokens ahead and,
//! for interface elements, by a general fallback production.

pub mod concurrent;
pub mod declaration;
pub mod design_unit;
pub mod expression;
pub mod interface;
pub mod sequential;
pub mod subprogram;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::lexer::{is_reserved_word, tokenize};
use crate::stream::TokenStream;
use crate::token::{Token, TokenKind};

pub use interface::{FallbackPolicy, InterfaceContext};

/// Classification failure; fatal for the file being classified
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClassificationError {
    #[error("line {line}, column {column}: expected {expected} but found '{found}'")]
    UnexpectedToken {
        expected: String,
        found: String,
        line: usize,
        column: usize,
    },
    #[error("unexpected end of file while looking for {expected}")]
    UnexpectedEnd { expected: String },
    #[error("line {line}, column {column}: {clause} is not permitted in a {context} interface declaration")]
    ClauseNotPermitted {
        clause: String,
        context: String,
        line: usize,
        column: usize,
    },
    #[error("line {line}, column {column}: {construct} is not supported")]
    Unsupported {
        construct: String,
        line: usize,
        column: usize,
    },
}

impl ClassificationError {
    /// Line the failure points at, if any
    pub fn line(&self) -> Option<usize> {
        match self {
            ClassificationError::UnexpectedToken { line, .. }
            | ClassificationError::ClauseNotPermitted { line, .. }
            | ClassificationError::Unsupported { line, .. } => Some(*line),
            ClassificationError::UnexpectedEnd { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClassificationError>;

/// Acceptance boundary of the unknown-declaration fallback per interface context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierOptions {
    pub generic: FallbackPolicy,
    pub port: FallbackPolicy,
    pub parameter: FallbackPolicy,
}

impl Default for ClassifierOptions {
    fn default() -> Self {
        Self {
            generic: FallbackPolicy {
                allow_mode: true,
                allow_bus: false,
                allow_default: true,
            },
            port: FallbackPolicy {
                allow_mode: true,
                allow_bus: true,
                allow_default: true,
            },
            parameter: FallbackPolicy {
                allow_mode: true,
                allow_bus: false,
                allow_default: true,
            },
        }
    }
}

impl ClassifierOptions {
    pub fn policy(&self, context: InterfaceContext) -> FallbackPolicy {
        match context {
            InterfaceContext::Generic => self.generic,
            InterfaceContext::Port => self.port,
            InterfaceContext::Parameter => self.parameter,
        }
    }
}

/// Lex and classify a complete source file
pub fn classify_source(source: &str, options: &ClassifierOptions) -> Result<TokenStream> {
    classify_tokens(tokenize(source), options)
}

/// Classify a lexed token list into a stream
pub fn classify_tokens(mut tokens: Vec<Token>, options: &ClassifierOptions) -> Result<TokenStream> {
    crate::lexer::number_tokens(&mut tokens);
    let mut cx = Context::new(&mut tokens, options);
    design_unit::classify_design_file(&mut cx)?;
    debug!(tokens = tokens.len(), "classified design file");
    Ok(TokenStream::new(tokens))
}

/// Cursor helpers over the token list being classified
pub struct Context<'a> {
    tokens: &'a mut [Token],
    options: &'a ClassifierOptions,
}

impl<'a> Context<'a> {
    pub fn new(tokens: &'a mut [Token], options: &'a ClassifierOptions) -> Self {
        Self { tokens, options }
    }

    pub fn options(&self) -> &ClassifierOptions {
        self.options
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn token(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// Index of the first significant token at or after `current`
    pub fn next_index(&self, current: usize) -> Option<usize> {
        (current..self.tokens.len()).find(|&i| !self.tokens[i].is_trivia())
    }

    /// Index of the n-th (0-based) significant token at or after `current`
    pub fn peek_index(&self, current: usize, n: usize) -> Option<usize> {
        let mut index = self.next_index(current)?;
        for _ in 0..n {
            index = self.next_index(index + 1)?;
        }
        Some(index)
    }

    pub fn peek_text(&self, current: usize, n: usize) -> Option<&str> {
        self.peek_index(current, n)
            .map(|i| self.tokens[i].text.as_str())
    }

    pub fn next_text(&self, current: usize) -> Option<&str> {
        self.peek_text(current, 0)
    }

    pub fn is_next(&self, current: usize, text: &str) -> bool {
        self.next_text(current)
            .is_some_and(|t| t.eq_ignore_ascii_case(text))
    }

    pub fn is_next_one_of(&self, current: usize, texts: &[&str]) -> bool {
        self.next_text(current)
            .is_some_and(|t| texts.iter().any(|x| t.eq_ignore_ascii_case(x)))
    }

    pub fn is_peek(&self, current: usize, n: usize, text: &str) -> bool {
        self.peek_text(current, n)
            .is_some_and(|t| t.eq_ignore_ascii_case(text))
    }

    /// True when the next significant token is a plain or extended identifier
    pub fn is_next_identifier(&self, current: usize) -> bool {
        self.next_text(current).is_some_and(is_identifier)
    }

    /// True when an identifier followed by a colon starts at `current`
    pub fn has_label(&self, current: usize) -> bool {
        self.is_next_identifier(current) && self.is_peek(current, 1, ":")
    }

    /// Assign an optional `label :` prefix
    pub fn assign_label(&mut self, current: usize, label: TokenKind, colon: TokenKind) -> Result<usize> {
        if self.has_label(current) {
            let current = self.assign_next(current, label)?;
            self.assign_next_required(current, ":", colon)
        } else {
            Ok(current)
        }
    }

    /// Give a token its grammar kind
    ///
    /// Tokens are classified exactly once; an already classified token keeps
    /// its first kind.
    pub fn assign(&mut self, index: usize, kind: TokenKind) {
        let token = &mut self.tokens[index];
        if token.kind == TokenKind::Unclassified {
            token.kind = kind;
        } else {
            debug!(index, text = %token.text, "token already classified");
        }
    }

    pub fn error_at(&self, index: usize, expected: &str) -> ClassificationError {
        match self.tokens.get(index) {
            Some(token) => ClassificationError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.text.clone(),
                line: token.line,
                column: token.column,
            },
            None => ClassificationError::UnexpectedEnd {
                expected: expected.to_string(),
            },
        }
    }

    /// Error for whatever significant token follows `current`
    pub fn error_next(&self, current: usize, expected: &str) -> ClassificationError {
        match self.next_index(current) {
            Some(index) => self.error_at(index, expected),
            None => ClassificationError::UnexpectedEnd {
                expected: expected.to_string(),
            },
        }
    }

    /// Assign the next significant token whatever its text
    pub fn assign_next(&mut self, current: usize, kind: TokenKind) -> Result<usize> {
        let index = self
            .next_index(current)
            .ok_or_else(|| ClassificationError::UnexpectedEnd {
                expected: format!("{:?}", kind),
            })?;
        self.assign(index, kind);
        Ok(index + 1)
    }

    /// Assign the next significant token, which must read `text`
    pub fn assign_next_required(
        &mut self,
        current: usize,
        text: &str,
        kind: TokenKind,
    ) -> Result<usize> {
        match self.next_index(current) {
            Some(index) if self.tokens[index].matches(text) => {
                self.assign(index, kind);
                Ok(index + 1)
            }
            Some(index) => Err(self.error_at(index, &format!("'{}'", text))),
            None => Err(ClassificationError::UnexpectedEnd {
                expected: format!("'{}'", text),
            }),
        }
    }

    /// Assign the next significant token only if it reads `text`
    pub fn assign_next_if(&mut self, current: usize, text: &str, kind: TokenKind) -> usize {
        match self.next_index(current) {
            Some(index) if self.tokens[index].matches(text) => {
                self.assign(index, kind);
                index + 1
            }
            _ => current,
        }
    }

    /// Assign the next significant token only if it reads one of `texts`
    pub fn assign_next_if_one_of(
        &mut self,
        current: usize,
        texts: &[&str],
        kind: TokenKind,
    ) -> usize {
        if self.is_next_one_of(current, texts) {
            self.assign_next(current, kind).unwrap_or(current)
        } else {
            current
        }
    }

    /// Assign the next identifier unless the next token is one of `stops`
    pub fn assign_next_identifier_if_not(
        &mut self,
        current: usize,
        stops: &[&str],
        kind: TokenKind,
    ) -> usize {
        if self.is_next_one_of(current, stops) || !self.is_next_identifier(current) {
            current
        } else {
            self.assign_next(current, kind).unwrap_or(current)
        }
    }

    /// Assign every significant token up to a terminator at parenthesis depth zero
    ///
    /// Returns the index of the terminator, or the end of the list.
    pub fn assign_tokens_until(
        &mut self,
        current: usize,
        terminators: &[&str],
        kind: TokenKind,
    ) -> usize {
        self.classify_until(current, terminators, |_, _| kind)
    }

    /// Walk significant tokens up to a terminator at depth zero, assigning the
    /// kind chosen by `choose` for each one
    ///
    /// A closing parenthesis at depth zero always stops the walk.
    pub fn classify_until<F>(&mut self, current: usize, terminators: &[&str], choose: F) -> usize
    where
        F: Fn(&Token, usize) -> TokenKind,
    {
        let mut depth = 0usize;
        let mut index = current;
        while let Some(i) = self.next_index(index) {
            let token = &self.tokens[i];
            if depth == 0
                && (terminators.iter().any(|t| token.matches(t)) || token.text == ")")
            {
                return i;
            }
            let kind = choose(token, depth);
            if token.text == "(" {
                depth += 1;
            } else if token.text == ")" {
                depth -= 1;
            }
            self.assign(i, kind);
            index = i + 1;
        }
        self.tokens.len()
    }

    /// Scan ahead without assigning: is `word` found before any of `stops` at depth zero?
    pub fn find_before(&self, current: usize, word: &str, stops: &[&str]) -> bool {
        let mut depth = 0usize;
        let mut index = current;
        while let Some(i) = self.next_index(index) {
            let token = &self.tokens[i];
            if depth == 0 {
                if token.matches(word) {
                    return true;
                }
                if stops.iter().any(|s| token.matches(s)) || token.text == ")" {
                    return false;
                }
            }
            if token.text == "(" {
                depth += 1;
            } else if token.text == ")" {
                depth -= 1;
            }
            index = i + 1;
        }
        false
    }
}

/// Plain identifiers that are not reserved words, and extended identifiers
pub fn is_identifier(text: &str) -> bool {
    match text.chars().next() {
        Some('\\') => true,
        Some(c) if c.is_ascii_alphabetic() => !text.contains('"') && !is_reserved_word(text),
        _ => false,
    }
}
