//! PHP language support for Strata.
//!
//! Implements symbol extraction for PHP source files using tree-sitter-php.
//! Only classes declared at the top level of a file (or directly inside a
//! braced `namespace { ... }` block) are reported; nested and anonymous
//! classes are ignored.

use tree_sitter::Node;

use super::SymbolExtractor;
use super::tree_sitter_utils::{children, field_text, first_child_of_kind, node_text};
use crate::types::{LanguageFamily, MethodRecord, SymbolKind, SymbolRecord};

/// Tree-sitter node kind constants for the PHP grammar.
mod node_kinds {
    // Declarations
    pub const CLASS_DECLARATION: &str = "class_declaration";
    pub const NAMESPACE_DEFINITION: &str = "namespace_definition";

    // Class structure
    pub const BASE_CLAUSE: &str = "base_clause";
    pub const DECLARATION_LIST: &str = "declaration_list";
    pub const PROPERTY_DECLARATION: &str = "property_declaration";
    pub const PROPERTY_ELEMENT: &str = "property_element";
    pub const METHOD_DECLARATION: &str = "method_declaration";
    pub const VARIABLE_NAME: &str = "variable_name";

    // Names
    pub const NAME: &str = "name";
    pub const QUALIFIED_NAME: &str = "qualified_name";

    /// Node kinds that can appear as a property's declared type.
    pub const PROPERTY_TYPES: &[&str] = &[
        "named_type",
        "primitive_type",
        "optional_type",
        "union_type",
        "intersection_type",
    ];

    /// Node kinds that can appear as a method's return type.
    pub const RETURN_TYPES: &[&str] = &[
        "named_type",
        "primitive_type",
        "optional_type",
        "union_type",
        "intersection_type",
        "disjunctive_normal_form_type",
        "qualified_name",
        "bottom_type",
    ];
}

/// PHP extraction strategy.
pub struct PhpExtractor;

impl SymbolExtractor for PhpExtractor {
    fn families(&self) -> &[LanguageFamily] {
        &[LanguageFamily::Php]
    }

    fn extract(&self, tree: &tree_sitter::Tree, content: &[u8]) -> Vec<SymbolRecord> {
        let mut symbols = Vec::new();
        collect_classes(&tree.root_node(), content, &mut symbols);
        symbols
    }
}

/// Collect class declarations among a statement list's direct children.
fn collect_classes(parent: &Node, content: &[u8], symbols: &mut Vec<SymbolRecord>) {
    use node_kinds::{CLASS_DECLARATION, NAMESPACE_DEFINITION};

    for child in children(parent) {
        match child.kind() {
            CLASS_DECLARATION => {
                if let Some(record) = extract_class(&child, content) {
                    symbols.push(record);
                }
            }
            // `namespace Foo { ... }`; the `namespace Foo;` form has no body
            // and its classes are already siblings at the top level.
            NAMESPACE_DEFINITION => {
                if let Some(body) = child.child_by_field_name("body") {
                    collect_classes(&body, content, symbols);
                }
            }
            _ => {}
        }
    }
}

/// Extract one class declaration.
///
/// Returns `None` if the class name cannot be resolved.
fn extract_class(node: &Node, content: &[u8]) -> Option<SymbolRecord> {
    use node_kinds::{BASE_CLAUSE, DECLARATION_LIST, METHOD_DECLARATION, PROPERTY_DECLARATION};

    let name = field_text(node, "name", content)?;
    let mut record = SymbolRecord::container(name, SymbolKind::Class);

    for child in children(node) {
        match child.kind() {
            BASE_CLAUSE if record.supertype.is_none() => {
                record.supertype = extract_base_class(&child, content);
            }
            DECLARATION_LIST => {
                for member in children(&child) {
                    match member.kind() {
                        PROPERTY_DECLARATION => {
                            record
                                .properties
                                .extend(extract_properties(&member, content));
                        }
                        METHOD_DECLARATION => {
                            if let Some(method) = extract_method(&member, content) {
                                record.methods.push(method);
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    Some(record)
}

/// First class named in an `extends` clause.
fn extract_base_class(base_clause: &Node, content: &[u8]) -> Option<String> {
    use node_kinds::{NAME, QUALIFIED_NAME};

    first_child_of_kind(base_clause, &[NAME, QUALIFIED_NAME])
        .and_then(|target| node_text(&target, content))
}

/// Property names declared by one `property_declaration`.
///
/// `public $a, $b;` yields two properties. Typed declarations render as
/// `name: type`.
fn extract_properties(node: &Node, content: &[u8]) -> Vec<String> {
    use node_kinds::{PROPERTY_ELEMENT, VARIABLE_NAME};

    let declared_type = field_text(node, "type", content).or_else(|| {
        first_child_of_kind(node, node_kinds::PROPERTY_TYPES)
            .and_then(|ty| node_text(&ty, content))
    });

    children(node)
        .iter()
        .filter(|child| child.kind() == PROPERTY_ELEMENT)
        .filter_map(|element| {
            let variable = element
                .child_by_field_name("name")
                .or_else(|| first_child_of_kind(element, &[VARIABLE_NAME]))?;
            let text = node_text(&variable, content)?;
            let name = text.trim_start_matches('$');
            if name.is_empty() {
                return None;
            }
            Some(match &declared_type {
                Some(ty) => format!("{name}: {ty}"),
                None => name.to_string(),
            })
        })
        .collect()
}

/// Extract a method's name and return type.
fn extract_method(node: &Node, content: &[u8]) -> Option<MethodRecord> {
    let name = field_text(node, "name", content)?;
    let return_type = node
        .child_by_field_name("return_type")
        .or_else(|| first_child_of_kind(node, node_kinds::RETURN_TYPES))
        .and_then(|ty| node_text(&ty, content));

    Some(MethodRecord::new(name, return_type))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_php(code: &str) -> tree_sitter::Tree {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_php::LANGUAGE_PHP.into())
            .expect("tree-sitter-php language should be valid");
        parser
            .parse(code, None)
            .expect("parsing test code should succeed")
    }

    fn extract(code: &str) -> Vec<SymbolRecord> {
        let tree = parse_php(code);
        PhpExtractor.extract(&tree, code.as_bytes())
    }

    #[test]
    fn extracts_class_with_parent_property_and_method() {
        let symbols = extract(
            "<?php\nclass User extends Model { public $name; function getName(): string {} }",
        );

        assert_eq!(symbols.len(), 1);
        let user = &symbols[0];
        assert_eq!(user.name, "User");
        assert_eq!(user.kind, SymbolKind::Class);
        assert_eq!(user.supertype.as_deref(), Some("Model"));
        assert_eq!(user.properties, vec!["name".to_string()]);
        assert_eq!(
            user.methods,
            vec![MethodRecord::new("getName", Some("string".to_string()))]
        );
    }

    #[test]
    fn method_without_return_type_has_none() {
        let symbols = extract("<?php\nclass Job { public function handle() {} }");

        assert_eq!(symbols[0].methods, vec![MethodRecord::new("handle", None)]);
    }

    #[test]
    fn parameter_types_are_not_mistaken_for_return_types() {
        let symbols = extract("<?php\nclass Repo { public function find(int $id) {} }");

        assert_eq!(symbols[0].methods[0].return_type, None);
    }

    #[test]
    fn members_keep_source_order() {
        let symbols = extract(
            r"<?php
class Post {
    protected $title;
    public function publish(): void {}
    private $body, $slug;
    public function archive(): bool {}
}
",
        );

        let post = &symbols[0];
        assert_eq!(post.properties, vec!["title", "body", "slug"]);
        let names: Vec<_> = post.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["publish", "archive"]);
    }

    #[test]
    fn typed_property_includes_type() {
        let symbols = extract("<?php\nclass Order { private int $total; }");

        assert_eq!(symbols[0].properties, vec!["total: int".to_string()]);
    }

    #[test]
    fn qualified_parent_is_kept_verbatim() {
        let symbols =
            extract("<?php\nclass Kernel extends Illuminate\\Foundation\\Http\\Kernel {}");

        assert_eq!(
            symbols[0].supertype.as_deref(),
            Some("Illuminate\\Foundation\\Http\\Kernel")
        );
    }

    #[test]
    fn nullable_and_class_return_types() {
        let symbols = extract(
            r"<?php
class Users {
    public function first(): ?User {}
    public function query(): Builder {}
}
",
        );

        let returns: Vec<_> = symbols[0]
            .methods
            .iter()
            .map(|m| m.return_type.clone())
            .collect();
        assert_eq!(
            returns,
            vec![Some("?User".to_string()), Some("Builder".to_string())]
        );
    }

    #[test]
    fn multiple_classes_in_declaration_order() {
        let symbols = extract("<?php\nclass B {}\nclass A {}\n");

        let names: Vec<_> = symbols.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn classes_after_namespace_statement_are_found() {
        let symbols = extract("<?php\nnamespace App\\Models;\n\nclass Invoice {}\n");

        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "Invoice");
    }

    #[test]
    fn classes_inside_braced_namespace_are_found() {
        let symbols = extract("<?php\nnamespace App {\n    class Invoice {}\n}\n");

        assert_eq!(symbols.len(), 1);
        assert_eq!(symbols[0].name, "Invoice");
    }

    #[test]
    fn nested_classes_are_ignored() {
        let symbols = extract(
            "<?php\nif (true) { class Hidden {} }\nfunction make() { return new class {}; }\n",
        );

        assert!(symbols.is_empty());
    }

    #[test]
    fn functions_and_interfaces_are_not_reported() {
        let symbols = extract("<?php\nfunction helper() {}\ninterface Shape {}\n");

        assert!(symbols.is_empty());
    }

    #[test]
    fn empty_file_has_no_symbols() {
        assert!(extract("").is_empty());
        assert!(extract("<?php\n").is_empty());
    }
}
