//! Sequential statements

use super::concurrent::{classify_assertion, classify_procedure_call, classify_signal_assignment};
use super::expression::{classify_required_until, classify_until};
use super::{is_identifier, Context, Result};
use crate::token::{
    CaseStatement, IfStatement, IterationScheme, LoopStatement, SimpleStatement, TokenKind,
    VariableAssignment,
};

/// Classify sequential statements until one of `terminators` is next
///
/// Returns the cursor in front of the terminator.
pub fn classify_sequential_statements(
    cx: &mut Context,
    current: usize,
    terminators: &[&str],
) -> Result<usize> {
    let mut current = current;
    loop {
        if cx.next_index(current).is_none() {
            return Err(cx.error_next(current, "'end'"));
        }
        if cx.is_next_one_of(current, terminators) {
            return Ok(current);
        }
        current = classify_sequential_statement(cx, current)?;
    }
}

fn classify_sequential_statement(cx: &mut Context, current: usize) -> Result<usize> {
    let offset = if cx.has_label(current) { 2 } else { 0 };
    let word = cx
        .peek_text(current, offset)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match word.as_str() {
        "if" => classify_if(cx, current),
        "case" => classify_case(cx, current),
        "for" | "while" | "loop" => classify_loop(cx, current),
        "wait" | "return" | "null" | "exit" | "next" | "report" => classify_simple(cx, current),
        "assert" => classify_assertion(cx, current),
        _ if word != "(" && !is_identifier(&word) => Err(cx.error_at(
            cx.peek_index(current, offset).unwrap_or(cx.len()),
            "sequential statement",
        )),
        _ if cx.find_before(current, ":=", &[";"]) => classify_variable_assignment(cx, current),
        _ if cx.find_before(current, "<=", &[";"]) => {
            classify_signal_assignment(cx, current, TokenKind::SequentialAssignment)
        }
        _ => classify_procedure_call(cx, current),
    }
}

/// `[label :] if cond then stmts {elsif cond then stmts} [else stmts] end if [label] ;`
pub fn classify_if(cx: &mut Context, current: usize) -> Result<usize> {
    let k = TokenKind::IfStatement;
    let mut current = cx.assign_label(current, k(IfStatement::Label), k(IfStatement::LabelColon))?;
    current = cx.assign_next_required(current, "if", k(IfStatement::IfKeyword))?;
    current = classify_required_until(cx, current, &["then"])?;
    current = cx.assign_next_required(current, "then", k(IfStatement::ThenKeyword))?;
    current = classify_sequential_statements(cx, current, &["elsif", "else", "end"])?;
    while cx.is_next(current, "elsif") {
        current = cx.assign_next(current, k(IfStatement::ElsifKeyword))?;
        current = classify_required_until(cx, current, &["then"])?;
        current = cx.assign_next_required(current, "then", k(IfStatement::ThenKeyword))?;
        current = classify_sequential_statements(cx, current, &["elsif", "else", "end"])?;
    }
    if cx.is_next(current, "else") {
        current = cx.assign_next(current, k(IfStatement::ElseKeyword))?;
        current = classify_sequential_statements(cx, current, &["end"])?;
    }
    current = cx.assign_next_required(current, "end", k(IfStatement::EndKeyword))?;
    current = cx.assign_next_required(current, "if", k(IfStatement::EndIfKeyword))?;
    current = cx.assign_next_identifier_if_not(current, &[";"], k(IfStatement::EndLabel));
    cx.assign_next_required(current, ";", k(IfStatement::Semicolon))
}

/// `[label :] case expr is {when choices => stmts} end case [label] ;`
pub fn classify_case(cx: &mut Context, current: usize) -> Result<usize> {
    let k = TokenKind::CaseStatement;
    let mut current =
        cx.assign_label(current, k(CaseStatement::Label), k(CaseStatement::LabelColon))?;
    current = cx.assign_next_required(current, "case", k(CaseStatement::CaseKeyword))?;
    current = classify_required_until(cx, current, &["is"])?;
    current = cx.assign_next_required(current, "is", k(CaseStatement::IsKeyword))?;
    while cx.is_next(current, "when") {
        current = cx.assign_next(current, k(CaseStatement::WhenKeyword))?;
        current = classify_required_until(cx, current, &["=>"])?;
        current = cx.assign_next_required(current, "=>", k(CaseStatement::Arrow))?;
        current = classify_sequential_statements(cx, current, &["when", "end"])?;
    }
    current = cx.assign_next_required(current, "end", k(CaseStatement::EndKeyword))?;
    current = cx.assign_next_required(current, "case", k(CaseStatement::EndCaseKeyword))?;
    current = cx.assign_next_identifier_if_not(current, &[";"], k(CaseStatement::EndLabel));
    cx.assign_next_required(current, ";", k(CaseStatement::Semicolon))
}

/// `[label :] [while cond | for param in range] loop stmts end loop [label] ;`
pub fn classify_loop(cx: &mut Context, current: usize) -> Result<usize> {
    let k = TokenKind::LoopStatement;
    let scheme = TokenKind::IterationScheme;
    let mut current =
        cx.assign_label(current, k(LoopStatement::Label), k(LoopStatement::LabelColon))?;
    if cx.is_next(current, "while") {
        current = cx.assign_next(current, scheme(IterationScheme::WhileKeyword))?;
        current = classify_required_until(cx, current, &["loop"])?;
    } else if cx.is_next(current, "for") {
        current = cx.assign_next(current, scheme(IterationScheme::ForKeyword))?;
        current = cx.assign_next(current, scheme(IterationScheme::ParameterName))?;
        current = cx.assign_next_required(current, "in", scheme(IterationScheme::InKeyword))?;
        current = classify_required_until(cx, current, &["loop"])?;
    }
    current = cx.assign_next_required(current, "loop", k(LoopStatement::LoopKeyword))?;
    current = classify_sequential_statements(cx, current, &["end"])?;
    current = cx.assign_next_required(current, "end", k(LoopStatement::EndKeyword))?;
    current = cx.assign_next_required(current, "loop", k(LoopStatement::EndLoopKeyword))?;
    current = cx.assign_next_identifier_if_not(current, &[";"], k(LoopStatement::EndLabel));
    cx.assign_next_required(current, ";", k(LoopStatement::Semicolon))
}

/// `wait`, `return`, `null`, `exit`, `next` and `report` statements
pub fn classify_simple(cx: &mut Context, current: usize) -> Result<usize> {
    let k = TokenKind::SimpleStatement;
    let mut current =
        cx.assign_label(current, k(SimpleStatement::Label), k(SimpleStatement::LabelColon))?;
    let keyword = cx
        .next_text(current)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    current = cx.assign_next(current, k(SimpleStatement::Keyword))?;

    let clauses: &[&str] = match keyword.as_str() {
        "wait" => &["on", "until", "for"],
        "exit" | "next" => {
            current = cx.assign_next_identifier_if_not(current, &["when"], k(SimpleStatement::LoopLabel));
            &["when"]
        }
        "report" => &["severity"],
        _ => &[],
    };

    let mut terminators = clauses.to_vec();
    terminators.push(";");
    loop {
        current = classify_until(cx, current, &terminators);
        if cx.is_next_one_of(current, clauses) {
            current = cx.assign_next(current, k(SimpleStatement::ClauseKeyword))?;
        } else {
            break;
        }
    }
    cx.assign_next_required(current, ";", k(SimpleStatement::Semicolon))
}

/// `[label :] target := expression ;`
pub fn classify_variable_assignment(cx: &mut Context, current: usize) -> Result<usize> {
    let k = TokenKind::VariableAssignment;
    let mut current = cx.assign_label(
        current,
        k(VariableAssignment::Label),
        k(VariableAssignment::LabelColon),
    )?;
    current = cx.assign_tokens_until(current, &[":="], k(VariableAssignment::Target));
    current = cx.assign_next_required(current, ":=", k(VariableAssignment::Assignment))?;
    current = classify_required_until(cx, current, &[";"])?;
    cx.assign_next_required(current, ";", k(VariableAssignment::Semicolon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierOptions;
    use crate::lexer::tokenize;
    use crate::token::{SignalAssignment, Token};

    fn classify(source: &str) -> Vec<Token> {
        let options = ClassifierOptions::default();
        let mut tokens = tokenize(&format!("{}\nend", source));
        {
            let mut cx = Context::new(&mut tokens, &options);
            classify_sequential_statements(&mut cx, 0, &["end"]).unwrap();
        }
        tokens.into_iter().filter(|t| !t.is_trivia()).collect()
    }

    fn kinds_of(tokens: &[Token], text: &str) -> Vec<TokenKind> {
        tokens.iter().filter(|t| t.matches(text)).map(|t| t.kind).collect()
    }

    #[test]
    fn test_if_elsif_else() {
        let tokens = classify(
            "if a = '1' then\n  x := 1;\nelsif b then\n  y <= c;\nelse\n  null;\nend if;",
        );
        assert_eq!(tokens[0].kind, TokenKind::IfStatement(IfStatement::IfKeyword));
        assert_eq!(kinds_of(&tokens, "x")[0], TokenKind::VariableAssignment(VariableAssignment::Target));
        assert_eq!(kinds_of(&tokens, "y")[0], TokenKind::SequentialAssignment(SignalAssignment::Target));
        assert_eq!(kinds_of(&tokens, "elsif")[0], TokenKind::IfStatement(IfStatement::ElsifKeyword));
        assert_eq!(kinds_of(&tokens, "null")[0], TokenKind::SimpleStatement(SimpleStatement::Keyword));
        assert_eq!(
            kinds_of(&tokens, "if"),
            vec![
                TokenKind::IfStatement(IfStatement::IfKeyword),
                TokenKind::IfStatement(IfStatement::EndIfKeyword),
            ]
        );
    }

    #[test]
    fn test_case_with_alternatives() {
        let tokens = classify(
            "case state is\n  when idle =>\n    state <= run;\n  when others =>\n    null;\nend case;",
        );
        assert_eq!(
            kinds_of(&tokens, "when"),
            vec![TokenKind::CaseStatement(CaseStatement::WhenKeyword); 2]
        );
        assert_eq!(kinds_of(&tokens, "=>")[1], TokenKind::CaseStatement(CaseStatement::Arrow));
    }

    #[test]
    fn test_for_loop_and_exit() {
        let tokens = classify("lp : for i in 0 to 7 loop\n  exit lp when i = 3;\nend loop lp;");
        assert_eq!(tokens[2].kind, TokenKind::IterationScheme(IterationScheme::ForKeyword));
        assert_eq!(tokens[3].kind, TokenKind::IterationScheme(IterationScheme::ParameterName));
        assert_eq!(
            kinds_of(&tokens, "lp"),
            vec![
                TokenKind::LoopStatement(LoopStatement::Label),
                TokenKind::SimpleStatement(SimpleStatement::LoopLabel),
                TokenKind::LoopStatement(LoopStatement::EndLabel),
            ]
        );
        assert_eq!(kinds_of(&tokens, "when")[0], TokenKind::SimpleStatement(SimpleStatement::ClauseKeyword));
    }

    #[test]
    fn test_wait_clauses() {
        let tokens = classify("wait until rising_edge(clk) for 10 ns;");
        assert_eq!(
            kinds_of(&tokens, "until")[0],
            TokenKind::SimpleStatement(SimpleStatement::ClauseKeyword)
        );
        assert_eq!(
            kinds_of(&tokens, "for")[0],
            TokenKind::SimpleStatement(SimpleStatement::ClauseKeyword)
        );
    }
}
