//! JavaScript / TypeScript language support for Strata.
//!
//! One extractor serves the JavaScript, TypeScript and TSX families. The
//! grammars share node kinds for everything we read; TypeScript-only nodes
//! (interfaces, type annotations, abstract classes) simply never appear in
//! JavaScript trees.
//!
//! Only top-level statements are considered, after unwrapping a single
//! `export` / `export default` wrapper and a `declare` wrapper.

use tree_sitter::Node;

use super::SymbolExtractor;
use super::tree_sitter_utils::{
    annotation_text, children, field_text, first_child_of_kind, node_text,
};
use crate::types::{LanguageFamily, MethodRecord, SymbolKind, SymbolRecord};

/// Tree-sitter node kind constants shared by the JavaScript and TypeScript grammars.
mod node_kinds {
    // Top-level statements
    pub const EXPORT_STATEMENT: &str = "export_statement";
    pub const CLASS_DECLARATION: &str = "class_declaration";
    pub const CLASS: &str = "class";
    pub const ABSTRACT_CLASS_DECLARATION: &str = "abstract_class_declaration";
    pub const INTERFACE_DECLARATION: &str = "interface_declaration";
    pub const FUNCTION_DECLARATION: &str = "function_declaration";
    pub const GENERATOR_FUNCTION_DECLARATION: &str = "generator_function_declaration";
    pub const FUNCTION_EXPRESSION: &str = "function_expression";
    pub const FUNCTION: &str = "function";
    pub const GENERATOR_FUNCTION: &str = "generator_function";
    pub const LEXICAL_DECLARATION: &str = "lexical_declaration";
    pub const AMBIENT_DECLARATION: &str = "ambient_declaration";
    pub const FUNCTION_SIGNATURE: &str = "function_signature";
    pub const VARIABLE_DECLARATOR: &str = "variable_declarator";

    // Class structure
    pub const CLASS_HERITAGE: &str = "class_heritage";
    pub const EXTENDS_CLAUSE: &str = "extends_clause";
    pub const IMPLEMENTS_CLAUSE: &str = "implements_clause";
    pub const FIELD_DEFINITION: &str = "field_definition";
    pub const PUBLIC_FIELD_DEFINITION: &str = "public_field_definition";
    pub const METHOD_DEFINITION: &str = "method_definition";
    pub const METHOD_SIGNATURE: &str = "method_signature";
    pub const ABSTRACT_METHOD_SIGNATURE: &str = "abstract_method_signature";

    // Interface structure
    pub const EXTENDS_TYPE_CLAUSE: &str = "extends_type_clause";
    pub const PROPERTY_SIGNATURE: &str = "property_signature";

    /// Initializers that turn a `const`/`let` binding into a function.
    pub const FUNCTION_VALUES: &[&str] = &[
        "arrow_function",
        "function_expression",
        "function",
        "generator_function",
    ];
}

/// JavaScript / TypeScript extraction strategy.
pub struct JavaScriptExtractor;

impl SymbolExtractor for JavaScriptExtractor {
    fn families(&self) -> &[LanguageFamily] {
        &[
            LanguageFamily::JavaScript,
            LanguageFamily::TypeScript,
            LanguageFamily::Tsx,
        ]
    }

    fn extract(&self, tree: &tree_sitter::Tree, content: &[u8]) -> Vec<SymbolRecord> {
        children(&tree.root_node())
            .iter()
            .filter_map(|statement| {
                let declaration = unwrap_export(statement)?;
                if declaration.kind() == node_kinds::AMBIENT_DECLARATION {
                    extract_ambient(&declaration, content)
                } else {
                    extract_declaration(&declaration, content)
                }
            })
            .collect()
    }
}

/// Return the declaration wrapped by an `export` statement, or the node itself.
///
/// `export default class Foo {}` may surface as a class expression in the
/// `value` field. Re-exports (`export { a } from "./a"`) yield `None`.
fn unwrap_export<'tree>(node: &Node<'tree>) -> Option<Node<'tree>> {
    if node.kind() == node_kinds::EXPORT_STATEMENT {
        node.child_by_field_name("declaration")
            .or_else(|| node.child_by_field_name("value"))
    } else {
        Some(*node)
    }
}

/// `declare class D {}` and friends, as found in `.d.ts` files.
///
/// Ambient functions have no body and surface as a `function_signature`.
fn extract_ambient(node: &Node, content: &[u8]) -> Option<SymbolRecord> {
    let mut cursor = node.walk();
    let inner = node.named_children(&mut cursor).next()?;

    if inner.kind() == node_kinds::FUNCTION_SIGNATURE {
        field_text(&inner, "name", content).map(SymbolRecord::function)
    } else {
        extract_declaration(&inner, content)
    }
}

fn extract_declaration(node: &Node, content: &[u8]) -> Option<SymbolRecord> {
    use node_kinds::{
        ABSTRACT_CLASS_DECLARATION, CLASS, CLASS_DECLARATION, FUNCTION, FUNCTION_DECLARATION,
        FUNCTION_EXPRESSION, GENERATOR_FUNCTION, GENERATOR_FUNCTION_DECLARATION,
        INTERFACE_DECLARATION, LEXICAL_DECLARATION,
    };

    match node.kind() {
        CLASS_DECLARATION | ABSTRACT_CLASS_DECLARATION | CLASS => extract_class(node, content),
        INTERFACE_DECLARATION => extract_interface(node, content),
        // Expression kinds only arrive here as `export default` values.
        FUNCTION_DECLARATION
        | GENERATOR_FUNCTION_DECLARATION
        | FUNCTION_EXPRESSION
        | FUNCTION
        | GENERATOR_FUNCTION => field_text(node, "name", content).map(SymbolRecord::function),
        LEXICAL_DECLARATION => extract_function_binding(node, content),
        _ => None,
    }
}

/// Extract a class: name, first extends target, fields and methods.
fn extract_class(node: &Node, content: &[u8]) -> Option<SymbolRecord> {
    use node_kinds::{
        ABSTRACT_METHOD_SIGNATURE, CLASS_HERITAGE, FIELD_DEFINITION, METHOD_DEFINITION,
        METHOD_SIGNATURE, PUBLIC_FIELD_DEFINITION,
    };

    let name = field_text(node, "name", content)?;
    let mut record = SymbolRecord::container(name, SymbolKind::Class);

    record.supertype = first_child_of_kind(node, &[CLASS_HERITAGE])
        .and_then(|heritage| extract_heritage(&heritage, content));

    if let Some(body) = node.child_by_field_name("body") {
        let mut after_error = false;
        for member in children(&body) {
            // Error recovery can turn the tail of a broken member into a field.
            let follows_error = after_error;
            if member.is_named() {
                after_error = member.is_error();
            }

            match member.kind() {
                FIELD_DEFINITION | PUBLIC_FIELD_DEFINITION if !follows_error => {
                    if let Some(property) = extract_property(&member, content) {
                        record.properties.push(property);
                    }
                }
                METHOD_DEFINITION | METHOD_SIGNATURE | ABSTRACT_METHOD_SIGNATURE => {
                    if let Some(method) = extract_method(&member, content) {
                        record.methods.push(method);
                    }
                }
                _ => {}
            }
        }
    }

    Some(record)
}

/// First extends target of a `class_heritage` node.
///
/// TypeScript wraps the target in an `extends_clause`; JavaScript puts the
/// expression directly under the heritage node. `implements` is ignored.
fn extract_heritage(heritage: &Node, content: &[u8]) -> Option<String> {
    use node_kinds::{EXTENDS_CLAUSE, IMPLEMENTS_CLAUSE};

    let mut cursor = heritage.walk();
    let target = heritage
        .named_children(&mut cursor)
        .find(|child| child.kind() != IMPLEMENTS_CLAUSE)?;

    if target.kind() == EXTENDS_CLAUSE {
        target
            .child_by_field_name("value")
            .or_else(|| target.named_child(0))
            .and_then(|value| non_empty_text(&value, content))
    } else {
        non_empty_text(&target, content)
    }
}

fn non_empty_text(node: &Node, content: &[u8]) -> Option<String> {
    node_text(node, content).filter(|text| !text.is_empty())
}

/// Extract an interface: name, first extended type, property and method signatures.
fn extract_interface(node: &Node, content: &[u8]) -> Option<SymbolRecord> {
    use node_kinds::{EXTENDS_TYPE_CLAUSE, METHOD_SIGNATURE, PROPERTY_SIGNATURE};

    let name = field_text(node, "name", content)?;
    let mut record = SymbolRecord::container(name, SymbolKind::Interface);

    record.supertype = first_child_of_kind(node, &[EXTENDS_TYPE_CLAUSE]).and_then(|clause| {
        clause
            .child_by_field_name("type")
            .or_else(|| clause.named_child(0))
            .and_then(|ty| non_empty_text(&ty, content))
    });

    if let Some(body) = node.child_by_field_name("body") {
        for member in children(&body) {
            match member.kind() {
                PROPERTY_SIGNATURE => {
                    if let Some(property) = extract_property(&member, content) {
                        record.properties.push(property);
                    }
                }
                METHOD_SIGNATURE => {
                    if let Some(method) = extract_method(&member, content) {
                        record.methods.push(method);
                    }
                }
                _ => {}
            }
        }
    }

    Some(record)
}

/// A field or property signature as `name` or `name: type`.
///
/// TypeScript names the field `name`; the JavaScript grammar calls it `property`.
fn extract_property(node: &Node, content: &[u8]) -> Option<String> {
    let name =
        field_text(node, "name", content).or_else(|| field_text(node, "property", content))?;
    let declared_type = node
        .child_by_field_name("type")
        .and_then(|ty| annotation_text(&ty, content));

    Some(match declared_type {
        Some(ty) => format!("{name}: {ty}"),
        None => name,
    })
}

fn extract_method(node: &Node, content: &[u8]) -> Option<MethodRecord> {
    let name = field_text(node, "name", content)?;
    let return_type = node
        .child_by_field_name("return_type")
        .and_then(|ty| annotation_text(&ty, content));

    Some(MethodRecord::new(name, return_type))
}

/// `const handler = () => {}` or `let f = function () {}` as a named function.
///
/// Only the first declarator of the statement is inspected:
/// `const a = () => {}, b = () => {}` reports `a` alone.
fn extract_function_binding(node: &Node, content: &[u8]) -> Option<SymbolRecord> {
    use node_kinds::{FUNCTION_VALUES, VARIABLE_DECLARATOR};

    let declarator = first_child_of_kind(node, &[VARIABLE_DECLARATOR])?;
    let value = declarator.child_by_field_name("value")?;
    if !FUNCTION_VALUES.contains(&value.kind()) {
        return None;
    }

    let name_node = declarator.child_by_field_name("name")?;
    // Destructuring patterns have no single name.
    if name_node.kind() != "identifier" {
        return None;
    }
    non_empty_text(&name_node, content).map(SymbolRecord::function)
}
