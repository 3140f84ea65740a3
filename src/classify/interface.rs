//! Generic, port and parameter interface lists
//!
//! An interface element that starts with an object class keyword, `type`,
//! `package` or a subprogram keyword is classified by the production for
//! that keyword. Anything else goes through the unknown-declaration fallback:
//!
//! ```text
//! identifier_list : [ mode ] subtype_indication [ bus ] [ := expression ]
//! ```
//!
//! The fallback never assigns the element terminator. It returns the cursor
//! at the `;` separating elements or at the `)` closing the list, and the
//! enclosing list production decides what that token is.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::concurrent::classify_map_aspect;
use super::expression::{
    classify_identifier_list, classify_mode, classify_selected_name, classify_subtype_indication,
    classify_until,
};
use super::subprogram::classify_interface_subprogram;
use super::{ClassificationError, Context, Result};
use crate::token::{InterfaceClass, InterfaceClause, InterfacePart, Mode, TokenKind};

/// Grammar context an interface list appears in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InterfaceContext {
    Generic,
    Port,
    Parameter,
}

impl fmt::Display for InterfaceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterfaceContext::Generic => write!(f, "generic"),
            InterfaceContext::Port => write!(f, "port"),
            InterfaceContext::Parameter => write!(f, "parameter"),
        }
    }
}

/// Optional clauses the fallback accepts in one context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPolicy {
    pub allow_mode: bool,
    pub allow_bus: bool,
    pub allow_default: bool,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            allow_mode: true,
            allow_bus: true,
            allow_default: true,
        }
    }
}

const ELEMENT_TERMINATORS: [&str; 1] = [";"];

/// `generic ( interface_list ) ;`
pub fn classify_generic_clause(cx: &mut Context, current: usize) -> Result<usize> {
    classify_clause(cx, current, "generic", InterfaceContext::Generic, TokenKind::GenericClause)
}

/// `port ( interface_list ) ;`
pub fn classify_port_clause(cx: &mut Context, current: usize) -> Result<usize> {
    classify_clause(cx, current, "port", InterfaceContext::Port, TokenKind::PortClause)
}

fn classify_clause(
    cx: &mut Context,
    current: usize,
    keyword: &str,
    context: InterfaceContext,
    wrap: fn(InterfaceClause) -> TokenKind,
) -> Result<usize> {
    let current = cx.assign_next_required(current, keyword, wrap(InterfaceClause::Keyword))?;
    let current = cx.assign_next_required(current, "(", wrap(InterfaceClause::OpenParenthesis))?;
    let close =
        classify_interface_list(cx, current, context, wrap(InterfaceClause::ElementSemicolon))?;
    cx.assign(close, wrap(InterfaceClause::CloseParenthesis));
    cx.assign_next_required(close + 1, ";", wrap(InterfaceClause::Semicolon))
}

/// Classify the elements of an interface list after its opening parenthesis
///
/// Element separators get the `separator` kind. Returns the index of the
/// closing parenthesis, which the caller assigns.
pub fn classify_interface_list(
    cx: &mut Context,
    current: usize,
    context: InterfaceContext,
    separator: TokenKind,
) -> Result<usize> {
    let mut current = current;
    loop {
        let index = classify_interface_element(cx, current, context)?;
        if cx.token(index).is_some_and(|t| t.text == ";") {
            cx.assign(index, separator);
            current = index + 1;
        } else {
            return Ok(index);
        }
    }
}

/// Classify one interface element, returning the index of its terminator
///
/// Elements with a leading keyword go to the production for that keyword.
/// Everything else is offered to the unknown-declaration fallback.
pub fn classify_interface_element(
    cx: &mut Context,
    current: usize,
    context: InterfaceContext,
) -> Result<usize> {
    let word = match cx.next_text(current) {
        Some(text) => text.to_ascii_lowercase(),
        None => return Err(cx.error_next(current, "interface declaration")),
    };
    let class = match word.as_str() {
        "signal" => InterfaceClass::Signal,
        "constant" => InterfaceClass::Constant,
        "variable" => InterfaceClass::Variable,
        "file" => InterfaceClass::File,
        "type" => return classify_interface_type(cx, current),
        "package" => return classify_interface_package(cx, current),
        "function" | "procedure" | "pure" | "impure" => {
            return classify_interface_subprogram(cx, current)
        }
        _ => {
            return match classify_unknown_declaration(cx, current, context)? {
                Some(index) => Ok(index),
                None => Err(cx.error_next(current, "interface declaration")),
            }
        }
    };

    let current = cx.assign_next(current, interface(class, InterfacePart::ClassKeyword))?;
    classify_object(cx, current, class, explicit_policy(class), context)
}

/// Detect and classify an interface element that has no object class keyword
///
/// Returns the index of the `;` or `)` that ends the element, or `None`
/// without assigning anything when the element does not start with an
/// identifier and so belongs to another production.
pub fn classify_unknown_declaration(
    cx: &mut Context,
    current: usize,
    context: InterfaceContext,
) -> Result<Option<usize>> {
    if !cx.is_next_identifier(current) {
        return Ok(None);
    }
    let policy = cx.options().policy(context);
    classify_object(cx, current, InterfaceClass::Unknown, policy, context).map(Some)
}

/// `type identifier`
fn classify_interface_type(cx: &mut Context, current: usize) -> Result<usize> {
    let class = InterfaceClass::Type;
    let current = cx.assign_next(current, interface(class, InterfacePart::ClassKeyword))?;
    if !cx.is_next_identifier(current) {
        return Err(cx.error_next(current, "identifier"));
    }
    let current = cx.assign_next(current, interface(class, InterfacePart::Identifier))?;
    element_end(cx, current)
}

/// `package identifier is new uninstantiated_name generic map ( ... )`
fn classify_interface_package(cx: &mut Context, current: usize) -> Result<usize> {
    let class = InterfaceClass::Package;
    let mut current = cx.assign_next(current, interface(class, InterfacePart::ClassKeyword))?;
    current = cx.assign_next(current, interface(class, InterfacePart::Identifier))?;
    current = cx.assign_next_required(current, "is", interface(class, InterfacePart::IsKeyword))?;
    current = cx.assign_next_required(current, "new", interface(class, InterfacePart::NewKeyword))?;
    current = classify_selected_name(cx, current, interface(class, InterfacePart::UninstantiatedName))?;
    current = classify_map_aspect(cx, current, "generic", TokenKind::GenericMap)?;
    element_end(cx, current)
}

/// Index of the `;` or `)` that must follow an element
fn element_end(cx: &Context, current: usize) -> Result<usize> {
    match cx.next_index(current) {
        Some(index) if cx.is_next_one_of(current, &[";", ")"]) => Ok(index),
        _ => Err(cx.error_next(current, "';' or ')'")),
    }
}

fn classify_object(
    cx: &mut Context,
    current: usize,
    class: InterfaceClass,
    policy: FallbackPolicy,
    context: InterfaceContext,
) -> Result<usize> {
    let current = classify_identifier_list(
        cx,
        current,
        &[":"],
        interface(class, InterfacePart::Identifier),
        interface(class, InterfacePart::Comma),
    )?;
    let mut current = cx.assign_next_required(current, ":", interface(class, InterfacePart::Colon))?;

    if let Some(mode) = cx.next_text(current).and_then(Mode::from_text) {
        if !policy.allow_mode || (class == InterfaceClass::Constant && mode != Mode::In) {
            return Err(not_permitted(cx, current, "mode", context));
        }
        current = classify_mode(cx, current);
    }

    current = classify_subtype_indication(cx, current, &[";", "bus", ":="])?;

    if cx.is_next(current, "bus") {
        if !policy.allow_bus {
            return Err(not_permitted(cx, current, "bus", context));
        }
        current = cx.assign_next(current, interface(class, InterfacePart::BusKeyword))?;
    }

    if cx.is_next(current, ":=") {
        if !policy.allow_default {
            return Err(not_permitted(cx, current, "default value", context));
        }
        current = cx.assign_next(current, interface(class, InterfacePart::Assignment))?;
        current = classify_until(cx, current, &ELEMENT_TERMINATORS);
    }

    element_end(cx, current)
}

/// The language fixes which clauses each explicit class may carry
fn explicit_policy(class: InterfaceClass) -> FallbackPolicy {
    FallbackPolicy {
        allow_mode: class != InterfaceClass::File,
        allow_bus: class == InterfaceClass::Signal,
        allow_default: class != InterfaceClass::File,
    }
}

fn interface(class: InterfaceClass, part: InterfacePart) -> TokenKind {
    TokenKind::Interface(class, part)
}

fn not_permitted(
    cx: &Context,
    current: usize,
    clause: &str,
    context: InterfaceContext,
) -> ClassificationError {
    let (line, column) = position(cx, current);
    ClassificationError::ClauseNotPermitted {
        clause: clause.to_string(),
        context: context.to_string(),
        line,
        column,
    }
}

fn position(cx: &Context, current: usize) -> (usize, usize) {
    cx.next_index(current)
        .and_then(|i| cx.token(i))
        .map_or((0, 0), |t| (t.line, t.column))
}
