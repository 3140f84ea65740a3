//! Declarative parts and the declarations they contain

use super::design_unit::classify_use_clause;
use super::expression::{
    classify_identifier_list, classify_required_until, classify_subtype_indication,
    classify_until,
};
use super::interface::{classify_generic_clause, classify_port_clause};
use super::subprogram::classify_subprogram;
use super::{Context, Result};
use crate::token::{
    AliasDeclaration, AttributeDeclaration, AttributeSpecification, Component,
    EntitySpecification, ObjectClass, ObjectPart, SubtypeDeclaration, TokenKind,
    TypeDeclaration,
};

/// Classify declarations until one of `terminators` is next
///
/// Returns the cursor in front of the terminator.
pub fn classify_declarative_part(
    cx: &mut Context,
    current: usize,
    terminators: &[&str],
) -> Result<usize> {
    let mut current = current;
    loop {
        let word = match cx.next_text(current) {
            Some(text) => text.to_ascii_lowercase(),
            None => return Err(cx.error_next(current, &expected_terminator(terminators))),
        };
        if terminators.contains(&word.as_str()) {
            return Ok(current);
        }
        current = match word.as_str() {
            "signal" => classify_object(cx, current, ObjectClass::Signal)?,
            "constant" => classify_object(cx, current, ObjectClass::Constant)?,
            "variable" | "shared" => classify_object(cx, current, ObjectClass::Variable)?,
            "file" => classify_object(cx, current, ObjectClass::File)?,
            "type" => classify_type_declaration(cx, current)?,
            "subtype" => classify_subtype_declaration(cx, current)?,
            "alias" => classify_alias_declaration(cx, current)?,
            "component" => classify_component(cx, current)?,
            "attribute" if cx.is_peek(current, 2, "of") => {
                classify_attribute_specification(cx, current)?
            }
            "attribute" => classify_attribute_declaration(cx, current)?,
            "use" => classify_use_clause(cx, current)?,
            "function" | "procedure" | "pure" | "impure" => classify_subprogram(cx, current)?,
            _ => return Err(cx.error_next(current, "declaration")),
        };
    }
}

fn expected_terminator(terminators: &[&str]) -> String {
    let quoted: Vec<String> = terminators.iter().map(|t| format!("'{}'", t)).collect();
    quoted.join(" or ")
}

/// Words that open a declaration
pub const DECLARATION_STARTS: [&str; 15] = [
    "signal", "constant", "variable", "shared", "file", "type", "subtype", "alias", "component",
    "attribute", "use", "function", "procedure", "pure", "impure",
];

/// `[shared] class ids : subtype [register|bus] [:= expression] ;`
///
/// File objects take `[[open kind] is name]` instead of a default value.
pub fn classify_object(cx: &mut Context, current: usize, class: ObjectClass) -> Result<usize> {
    let part = |p: ObjectPart| TokenKind::Object(class, p);
    let mut current = cx.assign_next_if(current, "shared", part(ObjectPart::SharedKeyword));
    current = cx.assign_next(current, part(ObjectPart::ClassKeyword))?;
    current = classify_identifier_list(
        cx,
        current,
        &[":"],
        part(ObjectPart::Identifier),
        part(ObjectPart::Comma),
    )?;
    current = cx.assign_next_required(current, ":", part(ObjectPart::Colon))?;
    current = classify_subtype_indication(
        cx,
        current,
        &[";", ":=", "register", "bus", "open", "is"],
    )?;

    if class == ObjectClass::File {
        if cx.is_next(current, "open") {
            current = cx.assign_next(current, part(ObjectPart::OpenKeyword))?;
            current = classify_required_until(cx, current, &["is"])?;
        }
        if cx.is_next(current, "is") {
            current = cx.assign_next(current, part(ObjectPart::IsKeyword))?;
            current = classify_required_until(cx, current, &[";"])?;
        }
    } else {
        current = cx.assign_next_if_one_of(current, &["register", "bus"], part(ObjectPart::SignalKind));
        if cx.is_next(current, ":=") {
            current = cx.assign_next(current, part(ObjectPart::Assignment))?;
            current = classify_required_until(cx, current, &[";"])?;
        }
    }
    cx.assign_next_required(current, ";", part(ObjectPart::Semicolon))
}

/// Type declarations: incomplete, record, physical and all other definitions
pub fn classify_type_declaration(cx: &mut Context, current: usize) -> Result<usize> {
    let mut current = cx.assign_next_required(current, "type", ty(TypeDeclaration::TypeKeyword))?;
    current = cx.assign_next(current, ty(TypeDeclaration::Identifier))?;
    if cx.is_next(current, ";") {
        return cx.assign_next(current, ty(TypeDeclaration::Semicolon));
    }
    current = cx.assign_next_required(current, "is", ty(TypeDeclaration::IsKeyword))?;

    if cx.is_next(current, "protected") {
        let (line, column) = cx
            .next_index(current)
            .and_then(|i| cx.token(i))
            .map_or((0, 0), |t| (t.line, t.column));
        return Err(super::ClassificationError::Unsupported {
            construct: "protected type".to_string(),
            line,
            column,
        });
    }

    if cx.is_next(current, "record") {
        current = cx.assign_next(current, ty(TypeDeclaration::RecordKeyword))?;
        while !cx.is_next(current, "end") {
            current = classify_identifier_list(
                cx,
                current,
                &[":"],
                ty(TypeDeclaration::ElementIdentifier),
                ty(TypeDeclaration::ElementComma),
            )?;
            current = cx.assign_next_required(current, ":", ty(TypeDeclaration::ElementColon))?;
            current = classify_subtype_indication(cx, current, &[";"])?;
            current = cx.assign_next_required(current, ";", ty(TypeDeclaration::ElementSemicolon))?;
        }
        current = cx.assign_next(current, ty(TypeDeclaration::EndKeyword))?;
        current = cx.assign_next_required(current, "record", ty(TypeDeclaration::EndRecordKeyword))?;
    } else if cx.find_before(current, "units", &[";"]) {
        current = cx.assign_tokens_until(current, &["units"], ty(TypeDeclaration::Definition));
        current = cx.assign_next(current, ty(TypeDeclaration::UnitsKeyword))?;
        while !cx.is_next(current, "end") {
            current = cx.assign_next(current, ty(TypeDeclaration::UnitIdentifier))?;
            if cx.is_next(current, "=") {
                current = cx.assign_next(current, ty(TypeDeclaration::UnitEquals))?;
                current = cx.assign_tokens_until(current, &[";"], ty(TypeDeclaration::Definition));
            }
            current = cx.assign_next_required(current, ";", ty(TypeDeclaration::UnitSemicolon))?;
        }
        current = cx.assign_next(current, ty(TypeDeclaration::EndKeyword))?;
        current = cx.assign_next_required(current, "units", ty(TypeDeclaration::EndUnitsKeyword))?;
    } else {
        current = cx.assign_tokens_until(current, &[";"], ty(TypeDeclaration::Definition));
        return cx.assign_next_required(current, ";", ty(TypeDeclaration::Semicolon));
    }

    current = cx.assign_next_identifier_if_not(current, &[";"], ty(TypeDeclaration::SimpleName));
    cx.assign_next_required(current, ";", ty(TypeDeclaration::Semicolon))
}

/// `subtype name is subtype_indication ;`
pub fn classify_subtype_declaration(cx: &mut Context, current: usize) -> Result<usize> {
    let part = TokenKind::SubtypeDeclaration;
    let mut current =
        cx.assign_next_required(current, "subtype", part(SubtypeDeclaration::SubtypeKeyword))?;
    current = cx.assign_next(current, part(SubtypeDeclaration::Identifier))?;
    current = cx.assign_next_required(current, "is", part(SubtypeDeclaration::IsKeyword))?;
    current = classify_subtype_indication(cx, current, &[";"])?;
    cx.assign_next_required(current, ";", part(SubtypeDeclaration::Semicolon))
}

/// `alias designator [: subtype_indication] is name ;`
pub fn classify_alias_declaration(cx: &mut Context, current: usize) -> Result<usize> {
    let part = TokenKind::AliasDeclaration;
    let mut current = cx.assign_next_required(current, "alias", part(AliasDeclaration::AliasKeyword))?;
    current = cx.assign_next(current, part(AliasDeclaration::Designator))?;
    if cx.is_next(current, ":") {
        current = cx.assign_next(current, part(AliasDeclaration::Colon))?;
        current = classify_subtype_indication(cx, current, &["is"])?;
    }
    current = cx.assign_next_required(current, "is", part(AliasDeclaration::IsKeyword))?;
    current = cx.assign_tokens_until(current, &[";"], part(AliasDeclaration::Name));
    cx.assign_next_required(current, ";", part(AliasDeclaration::Semicolon))
}

/// `component name [is] [generic] [port] end component [name] ;`
pub fn classify_component(cx: &mut Context, current: usize) -> Result<usize> {
    let part = TokenKind::Component;
    let mut current =
        cx.assign_next_required(current, "component", part(Component::ComponentKeyword))?;
    current = cx.assign_next(current, part(Component::Identifier))?;
    current = cx.assign_next_if(current, "is", part(Component::IsKeyword));
    if cx.is_next(current, "generic") {
        current = classify_generic_clause(cx, current)?;
    }
    if cx.is_next(current, "port") {
        current = classify_port_clause(cx, current)?;
    }
    current = cx.assign_next_required(current, "end", part(Component::EndKeyword))?;
    current = cx.assign_next_required(current, "component", part(Component::EndComponentKeyword))?;
    current = cx.assign_next_identifier_if_not(current, &[";"], part(Component::ComponentSimpleName));
    cx.assign_next_required(current, ";", part(Component::Semicolon))
}

/// `attribute name : type_mark ;`
pub fn classify_attribute_declaration(cx: &mut Context, current: usize) -> Result<usize> {
    let part = TokenKind::AttributeDeclaration;
    let mut current =
        cx.assign_next_required(current, "attribute", part(AttributeDeclaration::AttributeKeyword))?;
    current = cx.assign_next(current, part(AttributeDeclaration::Identifier))?;
    current = cx.assign_next_required(current, ":", part(AttributeDeclaration::Colon))?;
    current = cx.assign_tokens_until(current, &[";"], part(AttributeDeclaration::TypeMark));
    cx.assign_next_required(current, ";", part(AttributeDeclaration::Semicolon))
}

/// `attribute designator of entity_specification is expression ;`
pub fn classify_attribute_specification(cx: &mut Context, current: usize) -> Result<usize> {
    let part = TokenKind::AttributeSpecification;
    let mut current = cx.assign_next_required(
        current,
        "attribute",
        part(AttributeSpecification::AttributeKeyword),
    )?;
    current = cx.assign_next(current, part(AttributeSpecification::AttributeDesignator))?;
    current = cx.assign_next_required(current, "of", part(AttributeSpecification::OfKeyword))?;
    current = classify_entity_specification(cx, current)?;
    current = cx.assign_next_required(current, "is", part(AttributeSpecification::IsKeyword))?;
    current = classify_until(cx, current, &[";"]);
    cx.assign_next_required(current, ";", part(AttributeSpecification::Semicolon))
}

/// `entity_name_list : entity_class`
pub fn classify_entity_specification(cx: &mut Context, current: usize) -> Result<usize> {
    let part = TokenKind::EntitySpecification;
    let current = cx.classify_until(current, &[":"], |token, _| {
        if token.text == "," {
            part(EntitySpecification::Comma)
        } else {
            part(EntitySpecification::EntityDesignator)
        }
    });
    let current = cx.assign_next_required(current, ":", part(EntitySpecification::Colon))?;
    cx.assign_next(current, part(EntitySpecification::EntityClass))
}

fn ty(part: TypeDeclaration) -> TokenKind {
    TokenKind::TypeDeclaration(part)
}
