//! Domain types for Strata symbol extraction.
//!
//! These types represent the core domain model:
//! - **Classification**: `LanguageFamily` (which grammar a file is parsed with)
//! - **Extraction output**: `SymbolRecord`, `MethodRecord`, `FileSymbols`
//! - **Results**: `SnapshotStats` (summary of a snapshot build)
//!
//! ## Design Decisions
//!
//! | Decision | Choice | Rationale |
//! |----------|--------|-----------|
//! | Language | Enum not String | Type-safe; adding a family requires an extractor |
//! | Record name | `String` not `Option` | Unresolved names are dropped during extraction |
//! | Member order | `Vec` | Source declaration order is part of the output |

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::FileError;

// ============================================================================
// Enums
// ============================================================================

/// Supported language families.
///
/// A family groups the file extensions that share one tree-sitter grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageFamily {
    /// PHP source files (`.php`)
    Php,
    /// JavaScript and JSX (`.js`, `.jsx`, `.mjs`, `.cjs`)
    JavaScript,
    /// TypeScript (`.ts`, `.mts`, `.cts`)
    TypeScript,
    /// TypeScript with JSX (`.tsx`)
    Tsx,
}

impl LanguageFamily {
    /// Every supported family, in a stable order.
    pub const ALL: [Self; 4] = [Self::Php, Self::JavaScript, Self::TypeScript, Self::Tsx];

    /// File extensions handled by this family.
    #[must_use]
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::Php => &["php"],
            Self::JavaScript => &["js", "jsx", "mjs", "cjs"],
            Self::TypeScript => &["ts", "mts", "cts"],
            Self::Tsx => &["tsx"],
        }
    }

    /// Detect the family from a file extension (without the dot).
    ///
    /// # Returns
    ///
    /// `None` if the extension is not recognized.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|family| family.extensions().contains(&ext.as_str()))
    }

    /// Short lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Php => "php",
            Self::JavaScript => "javascript",
            Self::TypeScript => "typescript",
            Self::Tsx => "tsx",
        }
    }
}

impl std::fmt::Display for LanguageFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbol kinds, normalized across language families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    /// Class declaration (PHP, JavaScript, TypeScript)
    Class,
    /// Interface declaration (TypeScript)
    Interface,
    /// Free function, including `const f = () => ...` bindings
    Function,
}

impl SymbolKind {
    /// Lowercase string form.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Function => "function",
        }
    }

    /// Capitalized label used in rendered reports.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Class => "Class",
            Self::Interface => "Interface",
            Self::Function => "Function",
        }
    }
}

// ============================================================================
// Extraction output
// ============================================================================

/// A method (or method signature) declared inside a class or interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodRecord {
    /// Method name
    pub name: String,
    /// Return type annotation as written in source, without the leading colon
    pub return_type: Option<String>,
}

impl MethodRecord {
    /// Create a method record.
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: Option<String>) -> Self {
        Self {
            name: name.into(),
            return_type,
        }
    }
}

/// A normalized, language-agnostic declaration.
///
/// Functions never carry properties or methods; use [`SymbolRecord::function`]
/// to build them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolRecord {
    /// Declared name
    pub name: String,
    /// What kind of declaration this is
    pub kind: SymbolKind,
    /// First extends target, if any
    pub supertype: Option<String>,
    /// Properties in source order, as `name` or `name: type`
    pub properties: Vec<String>,
    /// Methods in source order
    pub methods: Vec<MethodRecord>,
}

impl SymbolRecord {
    /// Create an empty class or interface record.
    #[must_use]
    pub fn container(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            supertype: None,
            properties: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Create a function record.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self::container(name, SymbolKind::Function)
    }
}

/// All symbols declared in one file, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSymbols {
    /// Path relative to the project root, POSIX separators
    pub file: String,
    /// Declared symbols
    pub symbols: Vec<SymbolRecord>,
}

impl FileSymbols {
    /// Returns `true` if the file declares nothing we recognize.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

// ============================================================================
// Results
// ============================================================================

/// Summary of a completed snapshot build.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStats {
    /// Files parsed and stored in the snapshot
    pub files_parsed: usize,
    /// Files skipped because their extension maps to no family
    pub files_skipped: usize,
    /// Directories pruned or files dropped by an exclusion rule
    pub entries_excluded: usize,
    /// Stored files whose tree contains recoverable syntax errors
    pub files_with_syntax_errors: usize,
    /// Time taken by the build
    pub duration: Duration,
    /// Files that could not be loaded (not part of the snapshot)
    pub errors: Vec<FileError>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::php("php", Some(LanguageFamily::Php))]
    #[case::js("js", Some(LanguageFamily::JavaScript))]
    #[case::jsx("jsx", Some(LanguageFamily::JavaScript))]
    #[case::ts("ts", Some(LanguageFamily::TypeScript))]
    #[case::tsx("tsx", Some(LanguageFamily::Tsx))]
    #[case::upper_case("PHP", Some(LanguageFamily::Php))]
    #[case::python("py", None)]
    #[case::empty("", None)]
    fn classifies_extensions(#[case] ext: &str, #[case] expected: Option<LanguageFamily>) {
        assert_eq!(LanguageFamily::from_extension(ext), expected);
    }

    #[test]
    fn every_listed_extension_round_trips_to_its_family() {
        for family in LanguageFamily::ALL {
            for ext in family.extensions() {
                assert_eq!(LanguageFamily::from_extension(ext), Some(family));
            }
        }
    }

    #[test]
    fn function_records_have_no_members() {
        let record = SymbolRecord::function("handler");

        assert_eq!(record.kind, SymbolKind::Function);
        assert!(record.properties.is_empty());
        assert!(record.methods.is_empty());
        assert!(record.supertype.is_none());
    }

    #[test]
    fn symbol_record_serializes_kind_lowercase() {
        let mut record = SymbolRecord::container("User", SymbolKind::Class);
        record.methods.push(MethodRecord::new("getName", Some("string".to_string())));

        let json = serde_json::to_value(&record).expect("record should serialize");

        assert_eq!(json["kind"], "class");
        assert_eq!(json["methods"][0]["return_type"], "string");
    }
}
