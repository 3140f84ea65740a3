//! Design file, context items and primary/secondary units

use super::concurrent::classify_concurrent_statements;
use super::declaration::classify_declarative_part;
use super::interface::{classify_generic_clause, classify_port_clause};
use super::{Context, Result};
use crate::token::{
    Architecture, ContextDeclaration, ContextReference, Entity, LibraryClause, Package,
    PackageBody, TokenKind, UseClause,
};

/// Classify every design unit of a file
pub fn classify_design_file(cx: &mut Context) -> Result<()> {
    let mut current = 0;
    while let Some(index) = cx.next_index(current) {
        let word = cx
            .token(index)
            .map(|t| t.text.to_ascii_lowercase())
            .unwrap_or_default();
        current = match word.as_str() {
            "library" => classify_library_clause(cx, index)?,
            "use" => classify_use_clause(cx, index)?,
            "context" if cx.is_peek(index, 2, "is") => classify_context_declaration(cx, index)?,
            "context" => classify_context_reference(cx, index)?,
            "entity" => classify_entity(cx, index)?,
            "architecture" => classify_architecture(cx, index)?,
            "package" if cx.is_peek(index, 1, "body") => classify_package_body(cx, index)?,
            "package" => classify_package(cx, index)?,
            _ => return Err(cx.error_at(index, "design unit")),
        };
    }
    Ok(())
}

/// `library name {, name} ;`
pub fn classify_library_clause(cx: &mut Context, current: usize) -> Result<usize> {
    let current = cx.assign_next_required(current, "library", library(LibraryClause::Keyword))?;
    let current = super::expression::classify_identifier_list(
        cx,
        current,
        &[";"],
        library(LibraryClause::LogicalName),
        library(LibraryClause::Comma),
    )?;
    cx.assign_next_required(current, ";", library(LibraryClause::Semicolon))
}

/// `use selected_name {, selected_name} ;`
pub fn classify_use_clause(cx: &mut Context, current: usize) -> Result<usize> {
    let current = cx.assign_next_required(current, "use", TokenKind::UseClause(UseClause::Keyword))?;
    let current = cx.classify_until(current, &[";"], |token, _| {
        if token.text == "," {
            TokenKind::UseClause(UseClause::Comma)
        } else {
            TokenKind::UseClause(UseClause::SelectedName)
        }
    });
    cx.assign_next_required(current, ";", TokenKind::UseClause(UseClause::Semicolon))
}

/// `context lib.name {, lib.name} ;`
///
/// Every prefix of a selected name is a library name; the last piece is the
/// context name.
pub fn classify_context_reference(cx: &mut Context, current: usize) -> Result<usize> {
    let mut current =
        cx.assign_next_required(current, "context", reference(ContextReference::Keyword))?;
    loop {
        let mut pieces = Vec::new();
        while let Some(index) = cx.next_index(current) {
            match cx.token(index).map(|t| t.text.clone()).as_deref() {
                Some(";") | Some(",") => break,
                Some(".") => cx.assign(index, reference(ContextReference::Dot)),
                _ => pieces.push(index),
            }
            current = index + 1;
        }
        if pieces.is_empty() {
            return Err(cx.error_next(current, "context name"));
        }
        if let Some((last, prefix)) = pieces.split_last() {
            for &index in prefix {
                cx.assign(index, reference(ContextReference::LibraryName));
            }
            cx.assign(*last, reference(ContextReference::ContextName));
        }
        if cx.is_next(current, ",") {
            current = cx.assign_next(current, reference(ContextReference::Comma))?;
        } else {
            return cx.assign_next_required(current, ";", reference(ContextReference::Semicolon));
        }
    }
}

/// `context name is {context item} end [context] [name] ;`
pub fn classify_context_declaration(cx: &mut Context, current: usize) -> Result<usize> {
    let mut current = cx.assign_next_required(
        current,
        "context",
        context_declaration(ContextDeclaration::ContextKeyword),
    )?;
    current = cx.assign_next(current, context_declaration(ContextDeclaration::Identifier))?;
    current =
        cx.assign_next_required(current, "is", context_declaration(ContextDeclaration::IsKeyword))?;
    loop {
        current = match cx.next_text(current).map(str::to_ascii_lowercase).as_deref() {
            Some("library") => classify_library_clause(cx, current)?,
            Some("use") => classify_use_clause(cx, current)?,
            Some("context") => classify_context_reference(cx, current)?,
            _ => break,
        };
    }
    current =
        cx.assign_next_required(current, "end", context_declaration(ContextDeclaration::EndKeyword))?;
    current = cx.assign_next_if(
        current,
        "context",
        context_declaration(ContextDeclaration::EndContextKeyword),
    );
    current = cx.assign_next_identifier_if_not(
        current,
        &[";"],
        context_declaration(ContextDeclaration::ContextSimpleName),
    );
    cx.assign_next_required(current, ";", context_declaration(ContextDeclaration::Semicolon))
}

/// `entity name is [generic] [port] declarations [begin statements] end [entity] [name] ;`
pub fn classify_entity(cx: &mut Context, current: usize) -> Result<usize> {
    let mut current = cx.assign_next_required(current, "entity", entity(Entity::EntityKeyword))?;
    current = cx.assign_next(current, entity(Entity::Identifier))?;
    current = cx.assign_next_required(current, "is", entity(Entity::IsKeyword))?;
    if cx.is_next(current, "generic") {
        current = classify_generic_clause(cx, current)?;
    }
    if cx.is_next(current, "port") {
        current = classify_port_clause(cx, current)?;
    }
    current = classify_declarative_part(cx, current, &["begin", "end"])?;
    if cx.is_next(current, "begin") {
        current = cx.assign_next(current, entity(Entity::BeginKeyword))?;
        current = classify_concurrent_statements(cx, current, &["end"])?;
    }
    current = cx.assign_next_required(current, "end", entity(Entity::EndKeyword))?;
    current = cx.assign_next_if(current, "entity", entity(Entity::EndEntityKeyword));
    current = cx.assign_next_identifier_if_not(current, &[";"], entity(Entity::EntitySimpleName));
    cx.assign_next_required(current, ";", entity(Entity::Semicolon))
}

/// `architecture name of entity is declarations begin statements end [architecture] [name] ;`
pub fn classify_architecture(cx: &mut Context, current: usize) -> Result<usize> {
    let mut current = cx.assign_next_required(
        current,
        "architecture",
        architecture(Architecture::ArchitectureKeyword),
    )?;
    current = cx.assign_next(current, architecture(Architecture::Identifier))?;
    current = cx.assign_next_required(current, "of", architecture(Architecture::OfKeyword))?;
    current = cx.assign_next(current, architecture(Architecture::EntityName))?;
    current = cx.assign_next_required(current, "is", architecture(Architecture::IsKeyword))?;
    current = classify_declarative_part(cx, current, &["begin"])?;
    current = cx.assign_next_required(current, "begin", architecture(Architecture::BeginKeyword))?;
    current = classify_concurrent_statements(cx, current, &["end"])?;
    current = cx.assign_next_required(current, "end", architecture(Architecture::EndKeyword))?;
    current = cx.assign_next_if(
        current,
        "architecture",
        architecture(Architecture::EndArchitectureKeyword),
    );
    current = cx.assign_next_identifier_if_not(
        current,
        &[";"],
        architecture(Architecture::ArchitectureSimpleName),
    );
    cx.assign_next_required(current, ";", architecture(Architecture::Semicolon))
}

/// `package name is declarations end [package] [name] ;`
pub fn classify_package(cx: &mut Context, current: usize) -> Result<usize> {
    let mut current = cx.assign_next_required(current, "package", package(Package::PackageKeyword))?;
    current = cx.assign_next(current, package(Package::Identifier))?;
    current = cx.assign_next_required(current, "is", package(Package::IsKeyword))?;
    current = classify_declarative_part(cx, current, &["end"])?;
    current = cx.assign_next_required(current, "end", package(Package::EndKeyword))?;
    current = cx.assign_next_if(current, "package", package(Package::EndPackageKeyword));
    current = cx.assign_next_identifier_if_not(current, &[";"], package(Package::PackageSimpleName));
    cx.assign_next_required(current, ";", package(Package::Semicolon))
}

/// `package body name is declarations end [package body] [name] ;`
pub fn classify_package_body(cx: &mut Context, current: usize) -> Result<usize> {
    let mut current =
        cx.assign_next_required(current, "package", body(PackageBody::PackageKeyword))?;
    current = cx.assign_next_required(current, "body", body(PackageBody::BodyKeyword))?;
    current = cx.assign_next(current, body(PackageBody::PackageSimpleName))?;
    current = cx.assign_next_required(current, "is", body(PackageBody::IsKeyword))?;
    current = classify_declarative_part(cx, current, &["end"])?;
    current = cx.assign_next_required(current, "end", body(PackageBody::EndKeyword))?;
    if cx.is_next(current, "package") {
        current = cx.assign_next(current, body(PackageBody::EndPackageKeyword))?;
        current = cx.assign_next_required(current, "body", body(PackageBody::EndBodyKeyword))?;
    }
    current =
        cx.assign_next_identifier_if_not(current, &[";"], body(PackageBody::EndPackageSimpleName));
    cx.assign_next_required(current, ";", body(PackageBody::Semicolon))
}

fn library(part: LibraryClause) -> TokenKind {
    TokenKind::LibraryClause(part)
}

fn reference(part: ContextReference) -> TokenKind {
    TokenKind::ContextReference(part)
}

fn context_declaration(part: ContextDeclaration) -> TokenKind {
    TokenKind::ContextDeclaration(part)
}

fn entity(part: Entity) -> TokenKind {
    TokenKind::Entity(part)
}

fn architecture(part: Architecture) -> TokenKind {
    TokenKind::Architecture(part)
}

fn package(part: Package) -> TokenKind {
    TokenKind::Package(part)
}

fn body(part: PackageBody) -> TokenKind {
    TokenKind::PackageBody(part)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{classify_source, ClassificationError, ClassifierOptions};
    use crate::token::Token;

    fn significant(source: &str) -> Vec<Token> {
        classify_source(source, &ClassifierOptions::default())
            .unwrap()
            .tokens()
            .iter()
            .filter(|t| !t.is_trivia())
            .cloned()
            .collect()
    }

    #[test]
    fn test_context_reference_pieces() {
        let tokens = significant("context lib.ctx, other;");
        let kinds: Vec<TokenKind> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                reference(ContextReference::Keyword),
                reference(ContextReference::LibraryName),
                reference(ContextReference::Dot),
                reference(ContextReference::ContextName),
                reference(ContextReference::Comma),
                reference(ContextReference::ContextName),
                reference(ContextReference::Semicolon),
            ]
        );
    }

    #[test]
    fn test_context_declaration_versus_reference() {
        let tokens = significant("context c is\n  library ieee;\nend context c;\ncontext work.c;");
        assert_eq!(tokens[0].kind, context_declaration(ContextDeclaration::ContextKeyword));
        assert_eq!(tokens[3].kind, library(LibraryClause::Keyword));
        assert_eq!(tokens[8].kind, context_declaration(ContextDeclaration::ContextSimpleName));
        assert_eq!(tokens[10].kind, reference(ContextReference::Keyword));
    }

    #[test]
    fn test_entity_with_ports_and_closing_name() {
        let tokens = significant(
            "entity fifo is\n  port (\n    clk : in std_logic\n  );\nend entity fifo;\n",
        );
        assert_eq!(tokens[0].kind, entity(Entity::EntityKeyword));
        assert_eq!(tokens[1].kind, entity(Entity::Identifier));
        let tail: Vec<TokenKind> = tokens[tokens.len() - 4..].iter().map(|t| t.kind).collect();
        assert_eq!(
            tail,
            vec![
                entity(Entity::EndKeyword),
                entity(Entity::EndEntityKeyword),
                entity(Entity::EntitySimpleName),
                entity(Entity::Semicolon),
            ]
        );
    }

    #[test]
    fn test_package_body_end() {
        let tokens = significant("package body p is\nend package body p;");
        assert_eq!(tokens[1].kind, body(PackageBody::BodyKeyword));
        assert_eq!(tokens[5].kind, body(PackageBody::EndPackageKeyword));
        assert_eq!(tokens[6].kind, body(PackageBody::EndBodyKeyword));
        assert_eq!(tokens[7].kind, body(PackageBody::EndPackageSimpleName));
    }

    #[test]
    fn test_unknown_design_unit_is_an_error() {
        let err = classify_source("signal s : bit;", &ClassifierOptions::default()).unwrap_err();
        assert!(matches!(err, ClassificationError::UnexpectedToken { line: 1, column: 1, .. }));
    }
}
