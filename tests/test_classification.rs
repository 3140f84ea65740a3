use pretty_assertions::assert_eq;
use vhdl_style_linter::check_source;
use vhdl_style_linter::classify::{classify_source, ClassificationError, ClassifierOptions};
use vhdl_style_linter::config::Config;
use vhdl_style_linter::rule_list::RuleList;
use vhdl_style_linter::token::{
    Entity, Generate, InterfaceClass, InterfaceClause, InterfacePart, Mode, SubtypeIndication,
    TokenKind,
};

const FIFO: &str = "\
library ieee;
use ieee.std_logic_1164.all;

entity fifo is
  generic (
    depth : integer := 4
  );
  port (
    clk : in std_logic;  -- clock
    q   : out std_logic
  );
end entity fifo;
";

fn significant(source: &str, options: &ClassifierOptions) -> Vec<(String, TokenKind)> {
    classify_source(source, options)
        .unwrap()
        .tokens()
        .iter()
        .filter(|t| !t.is_trivia())
        .map(|t| (t.text.clone(), t.kind))
        .collect()
}

fn kind_of(tokens: &[(String, TokenKind)], text: &str) -> TokenKind {
    tokens
        .iter()
        .find(|(t, _)| t == text)
        .map(|(_, k)| *k)
        .unwrap_or(TokenKind::Unclassified)
}

#[test]
fn test_port_without_class_keyword_uses_fallback() {
    let tokens = significant(FIFO, &ClassifierOptions::default());

    assert_eq!(
        kind_of(&tokens, "clk"),
        TokenKind::Interface(InterfaceClass::Unknown, InterfacePart::Identifier)
    );
    assert_eq!(kind_of(&tokens, "in"), TokenKind::Mode(Mode::In));
    assert_eq!(kind_of(&tokens, "out"), TokenKind::Mode(Mode::Out));
    assert_eq!(
        kind_of(&tokens, "std_logic"),
        TokenKind::SubtypeIndication(SubtypeIndication::TypeMark)
    );
    assert_eq!(kind_of(&tokens, "port"), TokenKind::PortClause(InterfaceClause::Keyword));
    assert_eq!(kind_of(&tokens, "fifo"), TokenKind::Entity(Entity::Identifier));
}

#[test]
fn test_every_token_is_classified() {
    let stream = classify_source(FIFO, &ClassifierOptions::default()).unwrap();
    let unclassified: Vec<_> = stream
        .tokens()
        .iter()
        .filter(|t| t.kind == TokenKind::Unclassified)
        .map(|t| t.text.clone())
        .collect();
    assert!(unclassified.is_empty(), "unclassified: {:?}", unclassified);
}

#[test]
fn test_classification_preserves_text() {
    let stream = classify_source(FIFO, &ClassifierOptions::default()).unwrap();
    assert_eq!(stream.text(), FIFO);
    assert_eq!(stream.line_count(), FIFO.lines().count());
}

#[test]
fn test_crlf_text_is_preserved() {
    let source = FIFO.replace('\n', "\r\n");
    let stream = classify_source(&source, &ClassifierOptions::default()).unwrap();
    assert_eq!(stream.text(), source);
    assert_eq!(stream.newline(), "\r\n");
}

#[test]
fn test_missing_semicolon_is_a_classification_error() {
    let err = classify_source("entity e is\n  port (a : in bit)\nend;\n", &ClassifierOptions::default())
        .unwrap_err();
    assert!(
        matches!(err, ClassificationError::UnexpectedToken { line: 3, column: 1, .. }),
        "{:?}",
        err
    );
}

#[test]
fn test_truncated_file_is_a_classification_error() {
    let err = classify_source("entity e is\n  port (\n", &ClassifierOptions::default()).unwrap_err();
    assert!(matches!(err, ClassificationError::UnexpectedEnd { .. }));
    assert_eq!(err.line(), None);
}

#[test]
fn test_fallback_policy_is_configurable_per_context() {
    let source = "entity e is\n  generic (g : in integer := 1);\nend;\n";
    assert!(classify_source(source, &ClassifierOptions::default()).is_ok());

    let mut strict = ClassifierOptions::default();
    strict.generic.allow_mode = false;
    let err = classify_source(source, &strict).unwrap_err();
    assert!(matches!(err, ClassificationError::ClauseNotPermitted { line: 2, .. }));

    // Ports keep their own policy
    let ports = "entity e is\n  port (p : in bit);\nend;\n";
    assert!(classify_source(ports, &strict).is_ok());
}

#[test]
fn test_type_generic_beside_fallback_generic() {
    let source = "entity e is\n  generic (type t; W : integer := 8);\nend entity e;\n";
    let tokens = significant(source, &ClassifierOptions::default());

    assert_eq!(
        kind_of(&tokens, "type"),
        TokenKind::Interface(InterfaceClass::Type, InterfacePart::ClassKeyword)
    );
    assert_eq!(
        kind_of(&tokens, "t"),
        TokenKind::Interface(InterfaceClass::Type, InterfacePart::Identifier)
    );
    assert_eq!(
        kind_of(&tokens, "W"),
        TokenKind::Interface(InterfaceClass::Unknown, InterfacePart::Identifier)
    );
    assert_eq!(
        kind_of(&tokens, ";"),
        TokenKind::GenericClause(InterfaceClause::ElementSemicolon)
    );
    assert!(tokens.iter().all(|(_, k)| *k != TokenKind::Unclassified));

    let report = check_source(source, &RuleList::new(), &Config::default()).unwrap();
    assert!(report.violations.is_empty(), "{:?}", report.violations);
}

#[test]
fn test_if_generate_with_else_branch() {
    let source = "\
architecture rtl of e is
begin
  g : if wide generate
    a <= b;
  elsif c = '1' generate
    a <= c;
  else generate
    a <= '0';
  end generate g;
end architecture rtl;
";
    let tokens = significant(source, &ClassifierOptions::default());

    assert_eq!(kind_of(&tokens, "elsif"), TokenKind::Generate(Generate::ElsifKeyword));
    assert_eq!(kind_of(&tokens, "else"), TokenKind::Generate(Generate::ElseKeyword));
    assert_eq!(kind_of(&tokens, "g"), TokenKind::Generate(Generate::Label));
    assert!(tokens.iter().all(|(_, k)| *k != TokenKind::Unclassified));
}

#[test]
fn test_interface_element_without_colon_fails_at_its_semicolon() {
    let err = classify_source("entity e is\n  port (a; b : in bit);\nend;\n", &ClassifierOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        ClassificationError::UnexpectedToken {
            expected: "':'".to_string(),
            found: ";".to_string(),
            line: 2,
            column: 10,
        }
    );
}
