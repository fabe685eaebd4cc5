//! Family-specific symbol extraction.
//!
//! Each language family is handled by a type implementing [`SymbolExtractor`],
//! which turns a tree-sitter syntax tree into normalized [`SymbolRecord`]s.
//!
//! ## Adding a New Family
//!
//! 1. Add the variant to `LanguageFamily` in `types.rs`
//! 2. Register its grammar in `parser::grammar_for()`
//! 3. Create a module implementing `SymbolExtractor`
//! 4. Register it in `extractor_for()`
//!
//! ## Design
//!
//! Extractors are stateless and only read the tree, so a single static
//! instance per family is shared by every snapshot.

pub mod javascript;
pub mod php;
pub mod tree_sitter_utils;

use crate::types::{LanguageFamily, SymbolRecord};

/// Get the extraction strategy for a language family.
#[must_use]
pub fn extractor_for(family: LanguageFamily) -> &'static dyn SymbolExtractor {
    match family {
        LanguageFamily::Php => &php::PhpExtractor,
        LanguageFamily::JavaScript | LanguageFamily::TypeScript | LanguageFamily::Tsx => {
            &javascript::JavaScriptExtractor
        }
    }
}

/// Trait for family-specific symbol extraction.
///
/// Implementations must return records in declaration order and must never
/// emit a record (or member) whose name could not be resolved.
pub trait SymbolExtractor: Send + Sync {
    /// Families this extractor understands.
    fn families(&self) -> &[LanguageFamily];

    /// Extract top-level declarations from a parsed file.
    ///
    /// `content` must be the exact text the tree was parsed from.
    fn extract(&self, tree: &tree_sitter::Tree, content: &[u8]) -> Vec<SymbolRecord>;
}
