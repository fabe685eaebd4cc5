//! Tree-sitter parsing coordination.
//!
//! This module manages tree-sitter parsers for the supported language
//! families and turns source files into [`ParsedFile`]s.
//!
//! ## Responsibilities
//!
//! - Map each family to its grammar
//! - Keep one parser per family, built on first use and reused afterwards
//! - Read files, enforce UTF-8 and parse them into trees
//!
//! ## Design
//!
//! A [`ParsedFile`] owns both the tree and the exact text it was parsed from.
//! Node byte offsets only mean something against that text, so the two are
//! never handed out separately.
//!
//! `tree_sitter::Parser` is not `Sync`; a registry belongs to exactly one
//! engine (or one worker thread during a parallel build).

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, FileError, Result};
use crate::languages::extractor_for;
use crate::languages::tree_sitter_utils::to_sexp;
use crate::types::{FileSymbols, LanguageFamily};

/// Get the tree-sitter grammar for a language family.
#[must_use]
pub fn grammar_for(family: LanguageFamily) -> tree_sitter::Language {
    match family {
        LanguageFamily::Php => tree_sitter_php::LANGUAGE_PHP.into(),
        LanguageFamily::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
        LanguageFamily::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
        LanguageFamily::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
    }
}

/// A parsed source file: the syntax tree together with its source text.
#[derive(Debug)]
pub struct ParsedFile {
    relative_path: String,
    family: LanguageFamily,
    source: String,
    tree: tree_sitter::Tree,
}

impl ParsedFile {
    /// Path relative to the project root, POSIX separators.
    #[must_use]
    pub fn relative_path(&self) -> &str {
        &self.relative_path
    }

    /// Language family the file was parsed as.
    #[must_use]
    pub fn family(&self) -> LanguageFamily {
        self.family
    }

    /// The exact text the tree was built from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The syntax tree, borrowed together with its source text.
    #[must_use]
    pub fn tree(&self) -> (&tree_sitter::Tree, &[u8]) {
        (&self.tree, self.source.as_bytes())
    }

    /// Returns `true` if tree-sitter had to recover from syntax errors.
    #[must_use]
    pub fn has_syntax_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    /// Extract this file's top-level symbols with its family's extractor.
    #[must_use]
    pub fn extract(&self) -> FileSymbols {
        let symbols = extractor_for(self.family).extract(&self.tree, self.source.as_bytes());
        FileSymbols {
            file: self.relative_path.clone(),
            symbols,
        }
    }

    /// S-expression dump of the named nodes in the tree.
    #[must_use]
    pub fn to_sexp(&self) -> String {
        to_sexp(&self.tree.root_node(), self.source.as_bytes())
    }
}

/// Lazily built parsers, one per language family.
#[derive(Default)]
pub struct GrammarRegistry {
    parsers: HashMap<LanguageFamily, tree_sitter::Parser>,
}

impl std::fmt::Debug for GrammarRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut loaded: Vec<_> = self.parsers.keys().copied().collect();
        loaded.sort();
        f.debug_struct("GrammarRegistry")
            .field("loaded", &loaded)
            .finish()
    }
}

impl GrammarRegistry {
    /// Create an empty registry. No grammar is loaded until first use.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Families whose parser has been built so far.
    #[must_use]
    pub fn is_loaded(&self, family: LanguageFamily) -> bool {
        self.parsers.contains_key(&family)
    }

    /// Get the parser for a family, building it on first use.
    ///
    /// # Errors
    ///
    /// [`Error::Parser`] if the grammar is incompatible with the tree-sitter runtime.
    pub fn parser_for(&mut self, family: LanguageFamily) -> Result<&mut tree_sitter::Parser> {
        if !self.parsers.contains_key(&family) {
            let mut parser = tree_sitter::Parser::new();
            parser
                .set_language(&grammar_for(family))
                .map_err(|e| Error::Parser(format!("{family} grammar: {e}")))?;
            debug!(family = %family, "Loaded grammar");
            self.parsers.insert(family, parser);
        }

        self.parsers
            .get_mut(&family)
            .ok_or_else(|| Error::Parser(format!("{family} parser missing after load")))
    }

    /// Parse source text that is already in memory.
    ///
    /// A JavaScript file that does not parse cleanly is parsed again with the
    /// TSX grammar, which also accepts type annotations. The TSX tree is kept
    /// only if it has no errors.
    ///
    /// Returns `Ok(None)` if the grammar produced no tree.
    ///
    /// # Errors
    ///
    /// [`Error::Parser`] if a grammar cannot be loaded.
    pub fn parse_source(
        &mut self,
        family: LanguageFamily,
        relative_path: impl Into<String>,
        source: String,
    ) -> Result<Option<ParsedFile>> {
        let relative_path = relative_path.into();
        let Some(mut tree) = self.parse_with(family, &source)? else {
            return Ok(None);
        };

        if family == LanguageFamily::JavaScript && tree.root_node().has_error() {
            match self.parse_with(LanguageFamily::Tsx, &source)? {
                Some(annotated) if !annotated.root_node().has_error() => {
                    debug!(path = %relative_path, "Re-parsed JavaScript with the TSX grammar");
                    tree = annotated;
                }
                _ => {}
            }
        }

        Ok(Some(ParsedFile {
            relative_path,
            family,
            source,
            tree,
        }))
    }

    fn parse_with(
        &mut self,
        family: LanguageFamily,
        source: &str,
    ) -> Result<Option<tree_sitter::Tree>> {
        let parser = self.parser_for(family)?;
        let tree = parser.parse(source, None);
        if tree.is_none() {
            // A failed parse can leave the parser mid-document.
            parser.reset();
        }
        Ok(tree)
    }

    /// Read and parse one file.
    ///
    /// The outer `Result` carries infrastructure failures (grammar could not
    /// be loaded); the inner one carries problems with this particular file.
    ///
    /// # Errors
    ///
    /// [`Error::Parser`] if a grammar cannot be loaded.
    pub fn parse_file(
        &mut self,
        family: LanguageFamily,
        path: &Path,
        relative_path: &str,
    ) -> Result<std::result::Result<ParsedFile, FileError>> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => return Ok(Err(FileError::unreadable(path.to_path_buf(), &e))),
        };
        let Ok(source) = String::from_utf8(bytes) else {
            return Ok(Err(FileError::encoding(path.to_path_buf())));
        };

        Ok(self
            .parse_source(family, relative_path, source)?
            .ok_or_else(|| {
                FileError::parse_failed(path.to_path_buf(), "grammar produced no syntax tree")
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileErrorKind;

    #[test]
    fn every_family_grammar_loads() {
        let mut registry = GrammarRegistry::new();

        for family in LanguageFamily::ALL {
            assert!(
                registry.parser_for(family).is_ok(),
                "{family} grammar should load"
            );
        }
    }

    #[test]
    fn parsers_are_built_lazily() {
        let mut registry = GrammarRegistry::new();
        assert!(!registry.is_loaded(LanguageFamily::Php));

        registry
            .parse_source(LanguageFamily::Php, "a.php", "<?php\n".to_string())
            .expect("parse should not fail");

        assert!(registry.is_loaded(LanguageFamily::Php));
        assert!(!registry.is_loaded(LanguageFamily::TypeScript));
    }

    #[test]
    fn parsed_file_keeps_source_with_tree() {
        let mut registry = GrammarRegistry::new();
        let code = "class A {}";

        let parsed = registry
            .parse_source(LanguageFamily::JavaScript, "src/a.js", code.to_string())
            .expect("parse should not fail")
            .expect("tree should be produced");

        let (tree, source) = parsed.tree();
        assert_eq!(source, code.as_bytes());
        assert_eq!(tree.root_node().end_byte(), code.len());
        assert_eq!(parsed.relative_path(), "src/a.js");
        assert_eq!(parsed.family(), LanguageFamily::JavaScript);
        assert!(!parsed.has_syntax_errors());
    }

    #[test]
    fn extract_uses_the_family_extractor() {
        let mut registry = GrammarRegistry::new();

        let parsed = registry
            .parse_source(
                LanguageFamily::Php,
                "app/User.php",
                "<?php\nclass User extends Model {}".to_string(),
            )
            .expect("parse should not fail")
            .expect("tree should be produced");

        let symbols = parsed.extract();
        assert_eq!(symbols.file, "app/User.php");
        assert_eq!(symbols.symbols.len(), 1);
        assert_eq!(symbols.symbols[0].supertype.as_deref(), Some("Model"));
    }

    #[test]
    fn malformed_source_still_produces_a_tree_with_errors() {
        let mut registry = GrammarRegistry::new();

        let parsed = registry
            .parse_source(
                LanguageFamily::TypeScript,
                "bad.ts",
                "class { ((( ".to_string(),
            )
            .expect("parse should not fail")
            .expect("tree-sitter recovers from syntax errors");

        assert!(parsed.has_syntax_errors());
    }

    #[test]
    fn annotated_javascript_is_reparsed_with_tsx() {
        let mut registry = GrammarRegistry::new();

        let parsed = registry
            .parse_source(
                LanguageFamily::JavaScript,
                "foo.js",
                "export class Foo { bar: number; baz(): void {} }".to_string(),
            )
            .expect("parse should not fail")
            .expect("tree should be produced");

        assert!(!parsed.has_syntax_errors());
        assert_eq!(parsed.family(), LanguageFamily::JavaScript);
        assert!(registry.is_loaded(LanguageFamily::Tsx));
    }

    #[test]
    fn clean_javascript_does_not_load_tsx() {
        let mut registry = GrammarRegistry::new();

        registry
            .parse_source(LanguageFamily::JavaScript, "a.js", "class A {}".to_string())
            .expect("parse should not fail");

        assert!(!registry.is_loaded(LanguageFamily::Tsx));
    }

    #[test]
    fn broken_javascript_keeps_its_own_tree() {
        let mut registry = GrammarRegistry::new();

        let parsed = registry
            .parse_source(LanguageFamily::JavaScript, "bad.js", "class { (((".to_string())
            .expect("parse should not fail")
            .expect("tree-sitter recovers from syntax errors");

        assert!(parsed.has_syntax_errors());
        assert!(parsed.to_sexp().starts_with("(program"));
    }

    #[test]
    fn non_utf8_file_is_an_encoding_error() {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let path = dir.path().join("latin1.php");
        std::fs::write(&path, [0x3c, 0x3f, 0xff, 0xfe]).expect("failed to write file");
        let mut registry = GrammarRegistry::new();

        let result = registry
            .parse_file(LanguageFamily::Php, &path, "latin1.php")
            .expect("grammar should load");

        let err = result.expect_err("invalid UTF-8 should be rejected");
        assert_eq!(err.kind, FileErrorKind::Encoding);
    }

    #[test]
    fn missing_file_is_unreadable() {
        let mut registry = GrammarRegistry::new();

        let result = registry
            .parse_file(
                LanguageFamily::Php,
                Path::new("/nonexistent/file.php"),
                "file.php",
            )
            .expect("grammar should load");

        let err = result.expect_err("missing file should be reported");
        assert_eq!(err.kind, FileErrorKind::Unreadable);
    }
}
