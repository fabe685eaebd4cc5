//! Shared tree-sitter utilities for language support modules.
//!
//! Provides common functions for reading text out of tree-sitter nodes and
//! walking their children. Used by all family-specific extractors.

use tree_sitter::Node;

/// Get text content of a tree-sitter node.
///
/// Returns `None` if the node's byte range contains invalid UTF-8.
pub fn node_text(node: &Node, content: &[u8]) -> Option<String> {
    match std::str::from_utf8(&content[node.byte_range()]) {
        Ok(s) => Some(s.to_string()),
        Err(e) => {
            tracing::trace!(
                byte_range = ?node.byte_range(),
                error = %e,
                node_kind = %node.kind(),
                "Failed to decode node text as UTF-8"
            );
            None
        }
    }
}

/// Text of the node's `field` child, if present and non-empty.
pub fn field_text(node: &Node, field: &str, content: &[u8]) -> Option<String> {
    node.child_by_field_name(field)
        .and_then(|child| node_text(&child, content))
        .filter(|text| !text.is_empty())
}

/// Direct children of a node, in source order.
pub fn children<'tree>(node: &Node<'tree>) -> Vec<Node<'tree>> {
    let mut cursor = node.walk();
    let nodes = node.children(&mut cursor).collect();
    nodes
}

/// First direct child whose kind is one of `kinds`.
pub fn first_child_of_kind<'tree>(node: &Node<'tree>, kinds: &[&str]) -> Option<Node<'tree>> {
    let mut cursor = node.walk();
    let found = node
        .children(&mut cursor)
        .find(|child| kinds.contains(&child.kind()));
    found
}

/// Text of a `type_annotation`-style node without its leading colon.
///
/// `: number` becomes `number`. Falls back to trimming the raw text when the
/// annotation has no named child.
pub fn annotation_text(node: &Node, content: &[u8]) -> Option<String> {
    let mut cursor = node.walk();
    let inner = node.named_children(&mut cursor).next();
    let text = match inner {
        Some(ty) => node_text(&ty, content)?,
        None => node_text(node, content)?,
    };
    let text = text.trim_start_matches(':').trim();
    (!text.is_empty()).then(|| text.to_string())
}

/// Render a tree as an S-expression of its named nodes.
///
/// Leaves carry their trimmed source text as `(kind:'text')`; leaves with no
/// text render as the bare kind. Interior nodes render as `(kind child ...)`.
pub fn to_sexp(node: &Node, content: &[u8]) -> String {
    let mut out = String::new();
    write_sexp(node, content, &mut out);
    out
}

fn write_sexp(node: &Node, content: &[u8], out: &mut String) {
    let mut cursor = node.walk();
    let named: Vec<Node> = node.named_children(&mut cursor).collect();

    if named.is_empty() {
        let text = node_text(node, content).unwrap_or_default();
        let text = text.trim();
        if text.is_empty() {
            out.push_str(node.kind());
        } else {
            out.push('(');
            out.push_str(node.kind());
            out.push_str(":'");
            out.push_str(text);
            out.push_str("')");
        }
        return;
    }

    out.push('(');
    out.push_str(node.kind());
    for child in named {
        out.push(' ');
        write_sexp(&child, content, out);
    }
    out.push(')');
}
