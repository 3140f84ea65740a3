//! Expressions, subtype indications, identifier lists and modes

use super::{is_identifier, Context, Result};
use crate::lexer::is_reserved_word;
use crate::token::{Expression, Mode, SubtypeIndication, Token, TokenKind};

const OPERATOR_WORDS: [&str; 16] = [
    "and", "or", "nand", "nor", "xor", "xnor", "not", "abs", "mod", "rem", "sll", "srl", "sla",
    "sra", "rol", "ror",
];

fn is_operator_word(text: &str) -> bool {
    OPERATOR_WORDS.iter().any(|w| text.eq_ignore_ascii_case(w))
}

fn is_literal(text: &str) -> bool {
    match text.chars().next() {
        Some(c) if c.is_ascii_digit() => true,
        Some('"') | Some('\'') => true,
        Some(c) if c.is_ascii_alphabetic() => text.contains('"'),
        _ => false,
    }
}

/// Role of one token inside an expression
pub fn expression_kind(token: &Token) -> TokenKind {
    let text = token.text.as_str();
    let kind = match text {
        "(" => Expression::OpenParenthesis,
        ")" => Expression::CloseParenthesis,
        "," => Expression::Comma,
        "'" => Expression::Tick,
        "." => Expression::Dot,
        "=>" => Expression::Association,
        _ if is_literal(text) => Expression::Literal,
        _ if is_operator_word(text) => Expression::Operator,
        _ if is_reserved_word(text) => Expression::Keyword,
        _ if is_identifier(text) => Expression::Name,
        _ => Expression::Operator,
    };
    TokenKind::Expression(kind)
}

/// Classify an expression up to (not including) a terminator at depth zero
pub fn classify_until(cx: &mut Context, current: usize, terminators: &[&str]) -> usize {
    cx.classify_until(current, terminators, |token, _| expression_kind(token))
}

/// Classify a required expression; at least one token must precede the terminator
pub fn classify_required_until(
    cx: &mut Context,
    current: usize,
    terminators: &[&str],
) -> Result<usize> {
    let start = cx.next_index(current);
    let stop = classify_until(cx, current, terminators);
    match start {
        Some(start) if start < stop => Ok(stop),
        _ => Err(cx.error_next(current, "expression")),
    }
}

/// Classify a subtype indication up to a terminator at depth zero
///
/// `[resolution_function] type_mark [range constraint | (index constraint) ...]`
pub fn classify_subtype_indication(
    cx: &mut Context,
    current: usize,
    terminators: &[&str],
) -> Result<usize> {
    let index = match cx.next_index(current) {
        Some(i) if !is_terminator(cx, i, terminators) => i,
        _ => return Err(cx.error_next(current, "subtype indication")),
    };

    let mut current = index;
    if cx.is_next_identifier(current)
        && cx.peek_text(current, 1).is_some_and(is_identifier)
    {
        current = cx.assign_next(current, subtype(SubtypeIndication::ResolutionFunction))?;
    }

    current = classify_selected_name(cx, current, subtype(SubtypeIndication::TypeMark))?;

    if cx.is_next(current, "range") {
        current = cx.assign_next(current, subtype(SubtypeIndication::RangeKeyword))?;
        current = cx.classify_until(current, terminators, constraint_kind);
    }

    while cx.is_next(current, "(") {
        current = cx.assign_next(current, subtype(SubtypeIndication::OpenParenthesis))?;
        current = cx.classify_until(current, &[], constraint_kind);
        current =
            cx.assign_next_required(current, ")", subtype(SubtypeIndication::CloseParenthesis))?;
    }

    Ok(classify_until(cx, current, terminators))
}

fn subtype(part: SubtypeIndication) -> TokenKind {
    TokenKind::SubtypeIndication(part)
}

fn constraint_kind(token: &Token, _depth: usize) -> TokenKind {
    if token.matches("to") || token.matches("downto") {
        TokenKind::SubtypeIndication(SubtypeIndication::Direction)
    } else {
        expression_kind(token)
    }
}

fn is_terminator(cx: &Context, index: usize, terminators: &[&str]) -> bool {
    cx.token(index)
        .is_some_and(|t| t.text == ")" || terminators.iter().any(|x| t.matches(x)))
}

/// Classify `name { . name }` with a single kind
pub fn classify_selected_name(cx: &mut Context, current: usize, kind: TokenKind) -> Result<usize> {
    let mut current = cx.assign_next(current, kind)?;
    while cx.is_next(current, ".") && cx.peek_index(current, 1).is_some() {
        current = cx.assign_next(current, kind)?;
        current = cx.assign_next(current, kind)?;
    }
    Ok(current)
}

/// Classify `identifier { , identifier }` up to a terminator
///
/// A `;` or `)` also ends the list. Returns the index of the terminator.
pub fn classify_identifier_list(
    cx: &mut Context,
    current: usize,
    terminators: &[&str],
    identifier: TokenKind,
    comma: TokenKind,
) -> Result<usize> {
    let mut current = current;
    loop {
        let index = match cx.next_index(current) {
            Some(i) => i,
            None => return Err(cx.error_next(current, "identifier")),
        };
        if is_terminator(cx, index, terminators) || cx.token(index).is_some_and(|t| t.text == ";") {
            return Ok(index);
        }
        let kind = if cx.token(index).is_some_and(|t| t.text == ",") {
            comma
        } else {
            identifier
        };
        cx.assign(index, kind);
        current = index + 1;
    }
}

/// Classify an optional mode keyword
pub fn classify_mode(cx: &mut Context, current: usize) -> usize {
    match cx.next_text(current).and_then(Mode::from_text) {
        Some(mode) => cx.assign_next(current, TokenKind::Mode(mode)).unwrap_or(current),
        None => current,
    }
}
