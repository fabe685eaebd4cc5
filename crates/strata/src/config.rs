//! Scan configuration.
//!
//! Controls which parts of a project tree are ignored and how strict parsing
//! is. Loadable from YAML; every field has a default, so a partial file (or
//! no file at all) is valid.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Directory entries excluded by default.
///
/// Entries may span several segments (`public/build`) and match only on
/// whole path segments.
pub const DEFAULT_EXCLUDED_DIRS: &[&str] = &[
    "vendor",
    "node_modules",
    ".git",
    "storage",
    "bootstrap/cache",
    "public/build",
    "dist",
    ".idea",
    ".vscode",
    ".cache",
    "coverage",
    "bootstrap",
];

/// Compound filename suffixes excluded by default.
pub const DEFAULT_EXCLUDED_SUFFIXES: &[&str] = &[".blade.php"];

/// Configuration for snapshot builds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory entries to prune (segment-aware, e.g. `vendor`, `public/build`)
    pub excluded_dirs: Vec<String>,

    /// Filename suffixes to skip regardless of directory (e.g. `.blade.php`)
    pub excluded_suffixes: Vec<String>,

    /// Treat files whose tree contains syntax errors as parse failures
    pub reject_syntax_errors: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            excluded_dirs: DEFAULT_EXCLUDED_DIRS.iter().map(ToString::to_string).collect(),
            excluded_suffixes: DEFAULT_EXCLUDED_SUFFIXES
                .iter()
                .map(ToString::to_string)
                .collect(),
            reject_syntax_errors: false,
        }
    }
}

impl ScanConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] if the file cannot be read, [`Error::Config`] if it is
    /// not valid configuration YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] if the text is not valid configuration YAML.
    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }
}
