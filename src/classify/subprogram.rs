//! Subprogram declarations and bodies

use super::declaration::classify_declarative_part;
use super::interface::{classify_interface_list, InterfaceContext};
use super::sequential::classify_sequential_statements;
use super::{Context, Result};
use crate::token::{Subprogram, TokenKind};

/// `[pure|impure] function designator [(params)] return type_mark (; | is body)`
/// or `procedure designator [(params)] (; | is body)`
pub fn classify_subprogram(cx: &mut Context, current: usize) -> Result<usize> {
    let current = classify_subprogram_specification(cx, current)?;

    if cx.is_next(current, ";") {
        return cx.assign_next(current, part(Subprogram::Semicolon));
    }

    let mut current = cx.assign_next_required(current, "is", part(Subprogram::IsKeyword))?;
    current = classify_declarative_part(cx, current, &["begin"])?;
    current = cx.assign_next_required(current, "begin", part(Subprogram::BeginKeyword))?;
    current = classify_sequential_statements(cx, current, &["end"])?;
    current = cx.assign_next_required(current, "end", part(Subprogram::EndKeyword))?;
    current = cx.assign_next_if_one_of(current, &["function", "procedure"], part(Subprogram::EndSubprogramKind));
    if !cx.is_next(current, ";") {
        current = cx.assign_next(current, part(Subprogram::EndDesignator))?;
    }
    cx.assign_next_required(current, ";", part(Subprogram::Semicolon))
}

/// `subprogram_specification [is (<> | name)]` inside a generic list
///
/// Returns the index of the `;` or `)` ending the element.
pub fn classify_interface_subprogram(cx: &mut Context, current: usize) -> Result<usize> {
    let mut current = classify_subprogram_specification(cx, current)?;
    if cx.is_next(current, "is") {
        current = cx.assign_next(current, part(Subprogram::IsKeyword))?;
        let start = current;
        current = cx.assign_tokens_until(current, &[";"], part(Subprogram::InterfaceDefault));
        if cx.next_index(start) == Some(current) {
            return Err(cx.error_next(start, "'<>' or subprogram name"));
        }
    }
    match cx.next_index(current) {
        Some(index) if cx.is_next_one_of(current, &[";", ")"]) => Ok(index),
        _ => Err(cx.error_next(current, "';' or ')'")),
    }
}

/// Everything up to the `is` or `;` that follows the designator, parameters
/// and return type
fn classify_subprogram_specification(cx: &mut Context, current: usize) -> Result<usize> {
    let mut current = cx.assign_next_if_one_of(current, &["pure", "impure"], part(Subprogram::Purity));
    let is_function = cx.is_next(current, "function");
    current = if is_function {
        cx.assign_next(current, part(Subprogram::FunctionKeyword))?
    } else {
        cx.assign_next_required(current, "procedure", part(Subprogram::ProcedureKeyword))?
    };
    current = cx.assign_next(current, part(Subprogram::Designator))?;

    if cx.is_next(current, "(") {
        current = cx.assign_next(current, part(Subprogram::OpenParenthesis))?;
        let close = classify_interface_list(
            cx,
            current,
            InterfaceContext::Parameter,
            part(Subprogram::ParameterSemicolon),
        )?;
        cx.assign(close, part(Subprogram::CloseParenthesis));
        current = close + 1;
    }

    if is_function {
        current = cx.assign_next_required(current, "return", part(Subprogram::ReturnKeyword))?;
        current = cx.assign_tokens_until(current, &["is", ";"], part(Subprogram::ReturnTypeMark));
    }
    Ok(current)
}

fn part(part: Subprogram) -> TokenKind {
    TokenKind::Subprogram(part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierOptions;
    use crate::lexer::tokenize;
    use crate::token::{InterfaceClass, InterfacePart, Token};

    fn classify(source: &str) -> Vec<Token> {
        let options = ClassifierOptions::default();
        let mut tokens = tokenize(source);
        let end = {
            let mut cx = Context::new(&mut tokens, &options);
            classify_subprogram(&mut cx, 0).unwrap()
        };
        assert_eq!(end, tokens.len());
        tokens.into_iter().filter(|t| !t.is_trivia()).collect()
    }

    #[test]
    fn test_function_declaration() {
        let tokens = classify("pure function add(a, b : integer) return integer;");
        assert_eq!(tokens[0].kind, part(Subprogram::Purity));
        assert_eq!(tokens[4].kind, TokenKind::Interface(InterfaceClass::Unknown, InterfacePart::Identifier));
        assert_eq!(tokens[9].kind, part(Subprogram::CloseParenthesis));
        assert_eq!(tokens[11].kind, part(Subprogram::ReturnTypeMark));
        assert_eq!(tokens[12].kind, part(Subprogram::Semicolon));
    }

    #[test]
    fn test_procedure_body() {
        let tokens = classify(
            "procedure reset(signal s : out bit) is\n  variable v : bit;\nbegin\n  s <= '0';\nend procedure reset;",
        );
        let end = tokens.iter().position(|t| t.matches("end")).unwrap();
        assert_eq!(tokens[end + 1].kind, part(Subprogram::EndSubprogramKind));
        assert_eq!(tokens[end + 2].kind, part(Subprogram::EndDesignator));
    }
}
