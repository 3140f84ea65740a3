//! Concurrent statements
//!
//! Statement kind is decided from at most four significant tokens: an
//! optional `label :` and the word after it, plus one more for component
//! instantiations written without the `component` keyword.

use super::declaration::{classify_declarative_part, DECLARATION_STARTS};
use super::expression::{classify_required_until, classify_selected_name, classify_until};
use super::sequential::classify_sequential_statements;
use super::{is_identifier, Context, Result};
use crate::token::{
    Assertion, Block, Generate, Instantiation, MapAspect, Process, ProcedureCall,
    SelectedAssignment, SignalAssignment, TokenKind,
};

/// Classify concurrent statements until one of `terminators` is next
///
/// Returns the cursor in front of the terminator.
pub fn classify_concurrent_statements(
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
        current = classify_concurrent_statement(cx, current)?;
    }
}

fn classify_concurrent_statement(cx: &mut Context, current: usize) -> Result<usize> {
    let offset = if cx.has_label(current) { 2 } else { 0 };
    let word = cx
        .peek_text(current, offset)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let after = cx
        .peek_text(current, offset + 1)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match word.as_str() {
        "process" => classify_process(cx, current),
        "postponed" if after == "process" => classify_process(cx, current),
        "postponed" if after == "assert" => classify_assertion(cx, current),
        "postponed" => classify_signal_assignment(cx, current, TokenKind::ConcurrentAssignment),
        "block" => classify_block(cx, current),
        "for" | "if" if offset == 2 => classify_generate(cx, current),
        "entity" | "component" | "configuration" if offset == 2 => {
            classify_instantiation(cx, current)
        }
        "assert" => classify_assertion(cx, current),
        "with" => classify_selected_assignment(cx, current),
        _ if offset == 2
            && is_identifier(&word)
            && matches!(after.as_str(), "generic" | "port" | ";") =>
        {
            classify_instantiation(cx, current)
        }
        _ if word != "(" && !is_identifier(&word) => {
            Err(cx.error_at(
                cx.peek_index(current, offset).unwrap_or(cx.len()),
                "concurrent statement",
            ))
        }
        _ if cx.find_before(current, "<=", &[";"]) => {
            classify_signal_assignment(cx, current, TokenKind::ConcurrentAssignment)
        }
        _ => classify_procedure_call(cx, current),
    }
}

/// `[label :] [postponed] process [(sensitivity)] [is] declarations begin statements end [postponed] process [label] ;`
pub fn classify_process(cx: &mut Context, current: usize) -> Result<usize> {
    let p = TokenKind::Process;
    let mut current = cx.assign_label(current, p(Process::Label), p(Process::LabelColon))?;
    current = cx.assign_next_if(current, "postponed", p(Process::PostponedKeyword));
    current = cx.assign_next_required(current, "process", p(Process::ProcessKeyword))?;
    if cx.is_next(current, "(") {
        current = cx.assign_next(current, p(Process::OpenParenthesis))?;
        current = cx.classify_until(current, &[], |token, _| {
            if token.text == "," {
                p(Process::SensitivityComma)
            } else {
                p(Process::SensitivityName)
            }
        });
        current = cx.assign_next_required(current, ")", p(Process::CloseParenthesis))?;
    }
    current = cx.assign_next_if(current, "is", p(Process::IsKeyword));
    current = classify_declarative_part(cx, current, &["begin"])?;
    current = cx.assign_next_required(current, "begin", p(Process::BeginKeyword))?;
    current = classify_sequential_statements(cx, current, &["end"])?;
    current = cx.assign_next_required(current, "end", p(Process::EndKeyword))?;
    current = cx.assign_next_if(current, "postponed", p(Process::EndPostponedKeyword));
    current = cx.assign_next_required(current, "process", p(Process::EndProcessKeyword))?;
    current = cx.assign_next_identifier_if_not(current, &[";"], p(Process::EndLabel));
    cx.assign_next_required(current, ";", p(Process::Semicolon))
}

/// `label : block [(guard)] [is] declarations begin statements end block [label] ;`
pub fn classify_block(cx: &mut Context, current: usize) -> Result<usize> {
    let b = TokenKind::Block;
    let mut current = cx.assign_next(current, b(Block::Label))?;
    current = cx.assign_next_required(current, ":", b(Block::LabelColon))?;
    current = cx.assign_next_required(current, "block", b(Block::BlockKeyword))?;
    if cx.is_next(current, "(") {
        current = cx.assign_next(current, b(Block::OpenParenthesis))?;
        current = classify_until(cx, current, &[]);
        current = cx.assign_next_required(current, ")", b(Block::CloseParenthesis))?;
    }
    current = cx.assign_next_if(current, "is", b(Block::IsKeyword));
    current = classify_declarative_part(cx, current, &["begin"])?;
    current = cx.assign_next_required(current, "begin", b(Block::BeginKeyword))?;
    current = classify_concurrent_statements(cx, current, &["end"])?;
    current = cx.assign_next_required(current, "end", b(Block::EndKeyword))?;
    current = cx.assign_next_required(current, "block", b(Block::EndBlockKeyword))?;
    current = cx.assign_next_identifier_if_not(current, &[";"], b(Block::EndLabel));
    cx.assign_next_required(current, ";", b(Block::Semicolon))
}

/// `label : [component|entity|configuration] name [(arch)] [generic map (...)] [port map (...)] ;`
pub fn classify_instantiation(cx: &mut Context, current: usize) -> Result<usize> {
    let i = TokenKind::Instantiation;
    let mut current = cx.assign_next(current, i(Instantiation::Label))?;
    current = cx.assign_next_required(current, ":", i(Instantiation::LabelColon))?;
    current = cx.assign_next_if_one_of(
        current,
        &["component", "entity", "configuration"],
        i(Instantiation::UnitKeyword),
    );
    current = classify_selected_name(cx, current, i(Instantiation::UnitName))?;
    if cx.is_next(current, "(") {
        current = cx.assign_next(current, i(Instantiation::ArchitectureOpenParenthesis))?;
        current = cx.assign_next(current, i(Instantiation::ArchitectureName))?;
        current =
            cx.assign_next_required(current, ")", i(Instantiation::ArchitectureCloseParenthesis))?;
    }
    if cx.is_next(current, "generic") {
        current = classify_map_aspect(cx, current, "generic", TokenKind::GenericMap)?;
    }
    if cx.is_next(current, "port") {
        current = classify_map_aspect(cx, current, "port", TokenKind::PortMap)?;
    }
    cx.assign_next_required(current, ";", i(Instantiation::Semicolon))
}

/// `generic map ( associations )` or `port map ( associations )`
pub fn classify_map_aspect(
    cx: &mut Context,
    current: usize,
    keyword: &str,
    wrap: fn(MapAspect) -> TokenKind,
) -> Result<usize> {
    let current = cx.assign_next_required(current, keyword, wrap(MapAspect::Keyword))?;
    let current = cx.assign_next_required(current, "map", wrap(MapAspect::MapKeyword))?;
    let current = cx.assign_next_required(current, "(", wrap(MapAspect::OpenParenthesis))?;
    let current = classify_until(cx, current, &[]);
    cx.assign_next_required(current, ")", wrap(MapAspect::CloseParenthesis))
}

/// `label : for param in range generate body end generate [label] ;` or
/// `label : if [alt :] condition generate body` followed by any number of
/// `elsif [alt :] condition generate body`, an optional
/// `else [alt :] generate body` and `end generate [label] ;`
pub fn classify_generate(cx: &mut Context, current: usize) -> Result<usize> {
    let g = TokenKind::Generate;
    let mut current = cx.assign_next(current, g(Generate::Label))?;
    current = cx.assign_next_required(current, ":", g(Generate::LabelColon))?;
    if cx.is_next(current, "for") {
        current = cx.assign_next(current, g(Generate::ForKeyword))?;
        current = cx.assign_next(current, g(Generate::ParameterName))?;
        current = cx.assign_next_required(current, "in", g(Generate::InKeyword))?;
        current = classify_required_until(cx, current, &["generate"])?;
        current = cx.assign_next_required(current, "generate", g(Generate::GenerateKeyword))?;
        current = classify_generate_body(cx, current)?;
    } else {
        current = cx.assign_next_required(current, "if", g(Generate::IfKeyword))?;
        current = classify_generate_alternative(cx, current, true)?;
        while cx.is_next(current, "elsif") {
            current = cx.assign_next(current, g(Generate::ElsifKeyword))?;
            current = classify_generate_alternative(cx, current, true)?;
        }
        if cx.is_next(current, "else") {
            current = cx.assign_next(current, g(Generate::ElseKeyword))?;
            current = classify_generate_alternative(cx, current, false)?;
        }
    }
    current = cx.assign_next_required(current, "end", g(Generate::EndKeyword))?;
    current = cx.assign_next_required(current, "generate", g(Generate::EndGenerateKeyword))?;
    current = cx.assign_next_identifier_if_not(current, &[";"], g(Generate::EndLabel));
    cx.assign_next_required(current, ";", g(Generate::Semicolon))
}

/// `[alt :] [condition] generate body` after `if`, `elsif` or `else`
fn classify_generate_alternative(cx: &mut Context, current: usize, conditional: bool) -> Result<usize> {
    let g = TokenKind::Generate;
    let mut current = cx.assign_label(
        current,
        g(Generate::AlternativeLabel),
        g(Generate::AlternativeLabelColon),
    )?;
    if conditional {
        current = classify_required_until(cx, current, &["generate"])?;
    }
    current = cx.assign_next_required(current, "generate", g(Generate::GenerateKeyword))?;
    classify_generate_body(cx, current)
}

/// `[declarations begin] statements [end [alt] ;]`
///
/// Stops before `elsif`, `else` or `end generate`.
fn classify_generate_body(cx: &mut Context, current: usize) -> Result<usize> {
    let g = TokenKind::Generate;
    let mut current = current;
    if cx.is_next(current, "begin") || cx.is_next_one_of(current, &DECLARATION_STARTS) {
        current = classify_declarative_part(cx, current, &["begin"])?;
        current = cx.assign_next(current, g(Generate::BeginKeyword))?;
    }
    current = classify_concurrent_statements(cx, current, &["end", "elsif", "else"])?;
    if cx.is_next(current, "end") && !cx.is_peek(current, 1, "generate") {
        current = cx.assign_next(current, g(Generate::AlternativeEndKeyword))?;
        current = cx.assign_next_identifier_if_not(current, &[";"], g(Generate::AlternativeEndLabel));
        current = cx.assign_next_required(current, ";", g(Generate::AlternativeSemicolon))?;
    }
    Ok(current)
}

/// `[label :] [postponed] target <= [guarded] [delay] waveform ;`
///
/// Shared by concurrent and sequential signal assignments; `wrap` picks which.
pub fn classify_signal_assignment(
    cx: &mut Context,
    current: usize,
    wrap: fn(SignalAssignment) -> TokenKind,
) -> Result<usize> {
    let mut current = cx.assign_label(
        current,
        wrap(SignalAssignment::Label),
        wrap(SignalAssignment::LabelColon),
    )?;
    current = cx.assign_next_if(current, "postponed", wrap(SignalAssignment::PostponedKeyword));
    current = cx.assign_tokens_until(current, &["<="], wrap(SignalAssignment::Target));
    current = cx.assign_next_required(current, "<=", wrap(SignalAssignment::Assignment))?;
    current = cx.assign_next_if(current, "guarded", wrap(SignalAssignment::DelayMechanism));
    if cx.is_next(current, "reject") {
        current = cx.assign_next(current, wrap(SignalAssignment::DelayMechanism))?;
        current = classify_required_until(cx, current, &["inertial"])?;
        current = cx.assign_next_required(current, "inertial", wrap(SignalAssignment::DelayMechanism))?;
    } else {
        current = cx.assign_next_if_one_of(
            current,
            &["transport", "inertial", "force"],
            wrap(SignalAssignment::DelayMechanism),
        );
    }
    current = classify_required_until(cx, current, &[";"])?;
    cx.assign_next_required(current, ";", wrap(SignalAssignment::Semicolon))
}

/// `[label :] with expression select target <= waveform when choices {, ...} ;`
pub fn classify_selected_assignment(cx: &mut Context, current: usize) -> Result<usize> {
    let s = TokenKind::SelectedAssignment;
    let mut current = cx.assign_label(
        current,
        s(SelectedAssignment::Label),
        s(SelectedAssignment::LabelColon),
    )?;
    current = cx.assign_next_required(current, "with", s(SelectedAssignment::WithKeyword))?;
    current = classify_required_until(cx, current, &["select"])?;
    current = cx.assign_next_required(current, "select", s(SelectedAssignment::SelectKeyword))?;
    current = cx.assign_tokens_until(current, &["<="], s(SelectedAssignment::Target));
    current = cx.assign_next_required(current, "<=", s(SelectedAssignment::Assignment))?;
    current = classify_required_until(cx, current, &[";"])?;
    cx.assign_next_required(current, ";", s(SelectedAssignment::Semicolon))
}

/// `[label :] [postponed] assert condition [report expression] [severity expression] ;`
pub fn classify_assertion(cx: &mut Context, current: usize) -> Result<usize> {
    let a = TokenKind::Assertion;
    let mut current = cx.assign_label(current, a(Assertion::Label), a(Assertion::LabelColon))?;
    current = cx.assign_next_if(current, "postponed", a(Assertion::PostponedKeyword));
    current = cx.assign_next_required(current, "assert", a(Assertion::AssertKeyword))?;
    current = classify_required_until(cx, current, &["report", "severity", ";"])?;
    if cx.is_next(current, "report") {
        current = cx.assign_next(current, a(Assertion::ReportKeyword))?;
        current = classify_required_until(cx, current, &["severity", ";"])?;
    }
    if cx.is_next(current, "severity") {
        current = cx.assign_next(current, a(Assertion::SeverityKeyword))?;
        current = classify_required_until(cx, current, &[";"])?;
    }
    cx.assign_next_required(current, ";", a(Assertion::Semicolon))
}

/// `[label :] name [(arguments)] ;`
pub fn classify_procedure_call(cx: &mut Context, current: usize) -> Result<usize> {
    let c = TokenKind::ProcedureCall;
    let mut current =
        cx.assign_label(current, c(ProcedureCall::Label), c(ProcedureCall::LabelColon))?;
    current = classify_selected_name(cx, current, c(ProcedureCall::ProcedureName))?;
    current = classify_until(cx, current, &[";"]);
    cx.assign_next_required(current, ";", c(ProcedureCall::Semicolon))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassifierOptions;
    use crate::lexer::tokenize;
    use crate::token::Token;

    fn classify(source: &str) -> Vec<Token> {
        let options = ClassifierOptions::default();
        let mut tokens = tokenize(&format!("{}\nend", source));
        {
            let mut cx = Context::new(&mut tokens, &options);
            classify_concurrent_statements(&mut cx, 0, &["end"]).unwrap();
        }
        tokens.into_iter().filter(|t| !t.is_trivia()).collect()
    }

    fn kind_of(tokens: &[Token], text: &str) -> TokenKind {
        tokens
            .iter()
            .find(|t| t.matches(text))
            .map(|t| t.kind)
            .unwrap_or(TokenKind::Unclassified)
    }

    #[test]
    fn test_process_with_sensitivity_list() {
        let tokens = classify(
            "proc : process (clk, rst) is\nbegin\n  q <= d;\nend process proc;",
        );
        assert_eq!(tokens[0].kind, TokenKind::Process(Process::Label));
        assert_eq!(tokens[4].kind, TokenKind::Process(Process::SensitivityName));
        assert_eq!(tokens[5].kind, TokenKind::Process(Process::SensitivityComma));
        assert_eq!(kind_of(&tokens, "q"), TokenKind::SequentialAssignment(SignalAssignment::Target));
        let end = tokens.iter().position(|t| t.matches("end")).unwrap();
        assert_eq!(tokens[end + 1].kind, TokenKind::Process(Process::EndProcessKeyword));
        assert_eq!(tokens[end + 2].kind, TokenKind::Process(Process::EndLabel));
    }

    #[test]
    fn test_instantiations() {
        let tokens = classify(
            "u0 : entity work.fifo(rtl)\n  generic map (depth => 4)\n  port map (clk => clk);\nu1 : counter port map (clk);",
        );
        assert_eq!(tokens[2].kind, TokenKind::Instantiation(Instantiation::UnitKeyword));
        assert_eq!(tokens[5].kind, TokenKind::Instantiation(Instantiation::UnitName));
        assert_eq!(tokens[7].kind, TokenKind::Instantiation(Instantiation::ArchitectureName));
        assert_eq!(kind_of(&tokens, "generic"), TokenKind::GenericMap(MapAspect::Keyword));
        assert_eq!(kind_of(&tokens, "depth"), TokenKind::Expression(crate::token::Expression::Name));
        assert_eq!(kind_of(&tokens, "counter"), TokenKind::Instantiation(Instantiation::UnitName));
    }

    #[test]
    fn test_assignments_and_calls() {
        let tokens = classify(
            "a <= b when c = '1' else d;\nwith sel select y <= p when '0', q when others;\ncheck(a);\nassert a report \"x\" severity note;",
        );
        assert_eq!(tokens[0].kind, TokenKind::ConcurrentAssignment(SignalAssignment::Target));
        assert_eq!(tokens[1].kind, TokenKind::ConcurrentAssignment(SignalAssignment::Assignment));
        assert_eq!(kind_of(&tokens, "with"), TokenKind::SelectedAssignment(SelectedAssignment::WithKeyword));
        assert_eq!(kind_of(&tokens, "check"), TokenKind::ProcedureCall(ProcedureCall::ProcedureName));
        assert_eq!(kind_of(&tokens, "severity"), TokenKind::Assertion(Assertion::SeverityKeyword));
    }

    #[test]
    fn test_generate_with_declarations() {
        let tokens = classify(
            "gen : for i in 0 to 3 generate\n  signal s : bit;\nbegin\n  s <= '1';\nend generate gen;",
        );
        assert_eq!(tokens[2].kind, TokenKind::Generate(Generate::ForKeyword));
        assert_eq!(tokens[3].kind, TokenKind::Generate(Generate::ParameterName));
        assert_eq!(kind_of(&tokens, "begin"), TokenKind::Generate(Generate::BeginKeyword));
        assert_eq!(kind_of(&tokens, "gen"), TokenKind::Generate(Generate::Label));
    }

    #[test]
    fn test_if_generate_with_alternatives() {
        let tokens = classify(
            "g : if wide generate
  a <= b;
elsif narrow : w = 1 generate
  signal t : bit;
begin
  a <= c;
end narrow;
else generate
  a <= '0';
end generate g;",
        );
        assert_eq!(kind_of(&tokens, "elsif"), TokenKind::Generate(Generate::ElsifKeyword));
        assert_eq!(kind_of(&tokens, "narrow"), TokenKind::Generate(Generate::AlternativeLabel));
        assert_eq!(kind_of(&tokens, "else"), TokenKind::Generate(Generate::ElseKeyword));
        assert_eq!(kind_of(&tokens, "begin"), TokenKind::Generate(Generate::BeginKeyword));

        let ends: Vec<TokenKind> = tokens.iter().filter(|t| t.matches("end")).map(|t| t.kind).collect();
        assert_eq!(
            ends,
            vec![
                TokenKind::Generate(Generate::AlternativeEndKeyword),
                TokenKind::Generate(Generate::EndKeyword),
                TokenKind::Unclassified,
            ]
        );
        let generates = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Generate(Generate::GenerateKeyword))
            .count();
        assert_eq!(generates, 3);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Unclassified));
    }

    #[test]
    fn test_reserved_word_cannot_start_a_statement() {
        let options = ClassifierOptions::default();
        let mut tokens = tokenize("elsif x;\nend");
        let mut cx = Context::new(&mut tokens, &options);
        assert!(classify_concurrent_statements(&mut cx, 0, &["end"]).is_err());
    }
}
