//! Turns VHDL source text into a flat list of untyped tokens
//!
//! The output covers every byte of the input: whitespace runs, comments,
//! line terminators and blank lines are tokens too, so the classified stream
//! can be rendered back to the exact original text.

use once_cell::sync::Lazy;
use std::collections::HashSet;

use crate::token::{Token, TokenKind};

static RESERVED_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "abs", "access", "after", "alias", "all", "and", "architecture", "array", "assert",
        "assume", "attribute", "begin", "block", "body", "buffer", "bus", "case", "component",
        "configuration", "constant", "context", "cover", "default", "disconnect", "downto",
        "else", "elsif", "end", "entity", "exit", "fairness", "file", "for", "force",
        "function", "generate", "generic", "group", "guarded", "if", "impure", "in",
        "inertial", "inout", "is", "label", "library", "linkage", "literal", "loop", "map",
        "mod", "nand", "new", "next", "nor", "not", "null", "of", "on", "open", "or", "others",
        "out", "package", "parameter", "port", "postponed", "procedure", "process", "property",
        "protected", "pure", "range", "record", "register", "reject", "release", "rem",
        "report", "restrict", "return", "rol", "ror", "select", "sequence", "severity",
        "signal", "shared", "sla", "sll", "sra", "srl", "strong", "subtype", "then", "to",
        "transport", "type", "unaffected", "units", "until", "use", "variable", "vmode",
        "vprop", "vunit", "wait", "when", "while", "with", "xnor", "xor",
    ]
    .into_iter()
    .collect()
});

const THREE_CHAR_DELIMITERS: [&str; 3] = ["?/=", "?<=", "?>="];

const TWO_CHAR_DELIMITERS: [&str; 14] = [
    "=>", "**", ":=", "/=", ">=", "<=", "<>", "??", "?=", "?<", "?>", "<<", ">>", "!=",
];

/// Check if a word is a VHDL reserved word
pub fn is_reserved_word(word: &str) -> bool {
    RESERVED_WORDS.contains(word.to_ascii_lowercase().as_str())
}

/// Tokenize a complete source file
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::default();
    let mut rest = source;

    while !rest.is_empty() {
        let (content, newline, remainder) = match rest.find('\n') {
            Some(pos) if pos > 0 && rest.as_bytes()[pos - 1] == b'\r' => {
                (&rest[..pos - 1], &rest[pos - 1..=pos], &rest[pos + 1..])
            }
            Some(pos) => (&rest[..pos], &rest[pos..=pos], &rest[pos + 1..]),
            None => (rest, "", ""),
        };

        lexer.line(content);
        if !newline.is_empty() {
            lexer.push(TokenKind::CarriageReturn, newline);
        }
        rest = remainder;
    }

    let mut tokens = lexer.tokens;
    number_tokens(&mut tokens);
    tokens
}

/// Assign 1-based line and column numbers from token text
pub fn number_tokens(tokens: &mut [Token]) {
    let mut line = 1;
    let mut column = 1;
    for token in tokens.iter_mut() {
        token.line = line;
        token.column = column;
        if token.is_carriage_return() {
            line += 1;
            column = 1;
        } else {
            column += token.width();
        }
    }
}

#[derive(Default)]
struct Lexer {
    tokens: Vec<Token>,
    in_block_comment: bool,
}

impl Lexer {
    fn push(&mut self, kind: TokenKind, text: &str) {
        self.tokens.push(Token::new(kind, text));
    }

    fn line(&mut self, content: &str) {
        if content.trim().is_empty() {
            self.push(TokenKind::BlankLine, content);
            return;
        }

        let chars: Vec<(usize, char)> = content.char_indices().collect();
        let byte_at = |i: usize| chars.get(i).map_or(content.len(), |(b, _)| *b);
        let char_at = |i: usize| chars.get(i).map(|(_, c)| *c);
        let mut i = 0;

        while i < chars.len() {
            let start = i;
            let c = chars[i].1;

            if self.in_block_comment {
                while i < chars.len() {
                    if char_at(i) == Some('*') && char_at(i + 1) == Some('/') {
                        i += 2;
                        self.in_block_comment = false;
                        break;
                    }
                    i += 1;
                }
                self.push(TokenKind::Comment, &content[byte_at(start)..byte_at(i)]);
                continue;
            }

            if c == ' ' || c == '\t' || c == '\r' || c == '\u{c}' {
                while matches!(char_at(i), Some(' ' | '\t' | '\r' | '\u{c}')) {
                    i += 1;
                }
                self.push(TokenKind::Whitespace, &content[byte_at(start)..byte_at(i)]);
            } else if c == '-' && char_at(i + 1) == Some('-') {
                self.push(TokenKind::Comment, &content[byte_at(start)..]);
                i = chars.len();
            } else if c == '/' && char_at(i + 1) == Some('*') {
                self.in_block_comment = true;
                i += 2;
                while i < chars.len() {
                    if char_at(i) == Some('*') && char_at(i + 1) == Some('/') {
                        i += 2;
                        self.in_block_comment = false;
                        break;
                    }
                    i += 1;
                }
                self.push(TokenKind::Comment, &content[byte_at(start)..byte_at(i)]);
            } else if c.is_ascii_alphabetic() {
                while matches!(char_at(i), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
                    i += 1;
                }
                if char_at(i) == Some('"') && is_base_specifier(&content[byte_at(start)..byte_at(i)])
                {
                    i = scan_string(&chars, i);
                }
                self.push(TokenKind::Unclassified, &content[byte_at(start)..byte_at(i)]);
            } else if c == '\\' {
                i += 1;
                while let Some(ch) = char_at(i) {
                    i += 1;
                    if ch == '\\' {
                        if char_at(i) == Some('\\') {
                            i += 1;
                        } else {
                            break;
                        }
                    }
                }
                self.push(TokenKind::Unclassified, &content[byte_at(start)..byte_at(i)]);
            } else if c.is_ascii_digit() {
                i = scan_number(&chars, i);
                self.push(TokenKind::Unclassified, &content[byte_at(start)..byte_at(i)]);
            } else if c == '"' {
                i = scan_string(&chars, i);
                self.push(TokenKind::Unclassified, &content[byte_at(start)..byte_at(i)]);
            } else if c == '\'' && char_at(i + 2) == Some('\'') && !self.tick_is_attribute() {
                i += 3;
                self.push(TokenKind::Unclassified, &content[byte_at(start)..byte_at(i)]);
            } else {
                let remaining = &content[byte_at(start)..];
                let width = THREE_CHAR_DELIMITERS
                    .iter()
                    .chain(TWO_CHAR_DELIMITERS.iter())
                    .find(|d| remaining.starts_with(**d))
                    .map_or(1, |d| d.chars().count());
                i += width;
                self.push(TokenKind::Unclassified, &content[byte_at(start)..byte_at(i)]);
            }
        }
    }

    /// A tick directly after a name or a closing bracket starts an attribute
    fn tick_is_attribute(&self) -> bool {
        let Some(previous) = self.tokens.last() else {
            return false;
        };
        if previous.kind != TokenKind::Unclassified {
            return false;
        }
        let text = previous.text.as_str();
        if text == ")" || text == "]" {
            return true;
        }
        let first = text.chars().next().unwrap_or(' ');
        (first.is_ascii_alphabetic() && !is_reserved_word(text)) || first == '\\'
    }
}

fn is_base_specifier(word: &str) -> bool {
    matches!(
        word.to_ascii_lowercase().as_str(),
        "b" | "o" | "x" | "d" | "ub" | "uo" | "ux" | "sb" | "so" | "sx"
    )
}

/// Scan a string literal starting at the opening quote
fn scan_string(chars: &[(usize, char)], mut i: usize) -> usize {
    i += 1;
    while i < chars.len() {
        if chars[i].1 == '"' {
            if chars.get(i + 1).map(|(_, c)| *c) == Some('"') {
                i += 2;
                continue;
            }
            return i + 1;
        }
        i += 1;
    }
    i
}

/// Scan an abstract literal, a based literal or a sized bit string literal
fn scan_number(chars: &[(usize, char)], mut i: usize) -> usize {
    let char_at = |i: usize| chars.get(i).map(|(_, c)| *c);
    let digits = |mut i: usize| {
        while matches!(char_at(i), Some(c) if c.is_ascii_digit() || c == '_') {
            i += 1;
        }
        i
    };

    i = digits(i);

    if char_at(i) == Some('#') {
        i += 1;
        while matches!(char_at(i), Some(c) if c.is_ascii_alphanumeric() || c == '_' || c == '.') {
            i += 1;
        }
        if char_at(i) == Some('#') {
            i += 1;
        }
    } else {
        if char_at(i) == Some('.') && matches!(char_at(i + 1), Some(c) if c.is_ascii_digit()) {
            i = digits(i + 1);
        }
        // Sized bit string literal such as 8x"FF"
        let mut j = i;
        while matches!(char_at(j), Some(c) if c.is_ascii_alphabetic()) && j - i < 2 {
            j += 1;
        }
        if j > i && char_at(j) == Some('"') {
            let spec: String = chars[i..j].iter().map(|(_, c)| *c).collect();
            if is_base_specifier(&spec) {
                return scan_string(chars, j);
            }
        }
    }

    if matches!(char_at(i), Some('e' | 'E'))
        && (matches!(char_at(i + 1), Some(c) if c.is_ascii_digit())
            || (matches!(char_at(i + 1), Some('+' | '-'))
                && matches!(char_at(i + 2), Some(c) if c.is_ascii_digit())))
    {
        i = digits(i + 2);
    }

    i
}
