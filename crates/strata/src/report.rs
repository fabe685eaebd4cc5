//! Text rendering of a project's symbols.
//!
//! Output is a pure function of the input slice: the caller supplies files in
//! relative-path order and nothing here iterates an unordered collection.

use std::fmt::Write;

use crate::types::{FileSymbols, SymbolRecord};

/// Return type shown for methods without an annotation.
pub const DEFAULT_RETURN_TYPE: &str = "void";

const RULE_WIDTH: usize = 80;

/// Render the project report.
///
/// Files without symbols are left out, and the header counts only the files
/// that remain.
#[must_use]
pub fn render_report(files: &[FileSymbols]) -> String {
    let files: Vec<&FileSymbols> = files.iter().filter(|file| !file.is_empty()).collect();

    let mut out = String::new();
    out.push_str("# Project Structure Analysis\n");
    let _ = writeln!(out, "Total files analyzed: {}", files.len());
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push_str("\n\n");

    for file in files {
        let _ = writeln!(out, "## File: {}", file.file);
        for symbol in &file.symbols {
            render_symbol(&mut out, symbol);
        }
        out.push_str(&"-".repeat(RULE_WIDTH));
        out.push_str("\n\n");
    }

    out
}

fn render_symbol(out: &mut String, symbol: &SymbolRecord) {
    let _ = write!(out, "\n### {}: {}", symbol.kind.label(), symbol.name);
    if let Some(supertype) = &symbol.supertype {
        let _ = write!(out, " extends {supertype}");
    }
    out.push('\n');

    if !symbol.properties.is_empty() {
        out.push_str("  **Properties:**\n");
        for property in &symbol.properties {
            let _ = writeln!(out, "    - {property}");
        }
    }

    if !symbol.methods.is_empty() {
        out.push_str("  **Methods:**\n");
        for method in &symbol.methods {
            let return_type = method.return_type.as_deref().unwrap_or(DEFAULT_RETURN_TYPE);
            let _ = writeln!(out, "    - {}(): {return_type}", method.name);
        }
    }

    out.push('\n');
}
