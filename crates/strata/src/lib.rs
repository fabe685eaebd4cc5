//! # Strata: Multi-Language Source Symbol Extraction
//!
//! Strata walks a project directory, parses every PHP, JavaScript and
//! TypeScript file with tree-sitter, and produces a normalized,
//! language-agnostic inventory of the classes, interfaces and functions each
//! file declares. It is designed to feed code-understanding pipelines that
//! want a compact structural outline of a codebase.
//!
//! ## Design Philosophy
//!
//! - **Syntax, not semantics** - Strata reports what is declared; it never resolves types or references
//! - **Snapshots** - A whole project is parsed up front; queries run against the most recent complete snapshot
//! - **Best effort** - One bad file is reported and left out; it never sinks the build
//! - **Library first** - The `strata` binary is a thin wrapper over [`Strata`]
//!
//! ## Quick Start
//!
//! ```no_run
//! use strata::{ScanConfig, Strata};
//! use std::path::Path;
//!
//! let mut strata = Strata::new(ScanConfig::default());
//!
//! // Parse the project
//! let stats = strata.set_ast(Path::new("/path/to/project"))?;
//! println!("Parsed {} files", stats.files_parsed);
//!
//! // Symbols of one file
//! let symbols = strata.extract_symbols("app/Models/User.php")?;
//! println!("{} symbols", symbols.symbols.len());
//!
//! // Whole-project report
//! print!("{}", strata.extract_all_symbols()?);
//! # Ok::<(), strata::Error>(())
//! ```

mod config;
mod error;
mod languages;
mod parser;
mod report;
mod snapshot;
mod types;
mod walker;

pub use config::{DEFAULT_EXCLUDED_DIRS, DEFAULT_EXCLUDED_SUFFIXES, ScanConfig};
pub use error::{Error, FileError, FileErrorKind, Result};
pub use languages::{SymbolExtractor, extractor_for};
pub use parser::{GrammarRegistry, ParsedFile, grammar_for};
pub use report::{DEFAULT_RETURN_TYPE, render_report};
pub use snapshot::{BuildOptions, CancellationToken, ProjectSnapshot};
pub use types::{
    FileSymbols, LanguageFamily, MethodRecord, SnapshotStats, SymbolKind, SymbolRecord,
};
pub use walker::ExclusionRules;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

/// Symbol extraction engine for one project at a time.
///
/// `Strata` owns its parsers and the current [`ProjectSnapshot`]. Building a
/// new snapshot takes `&mut self`; the previous snapshot stays visible until
/// the new one is complete, and handles obtained from [`Strata::snapshot`]
/// keep the old one alive after it is replaced.
#[derive(Debug)]
pub struct Strata {
    config: ScanConfig,
    registry: GrammarRegistry,
    snapshot: Option<Arc<ProjectSnapshot>>,
}

impl Default for Strata {
    fn default() -> Self {
        Self::new(ScanConfig::default())
    }
}

impl Strata {
    /// Create an engine with no snapshot.
    ///
    /// No grammar is loaded until the first file of its family is parsed.
    #[must_use]
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            registry: GrammarRegistry::new(),
            snapshot: None,
        }
    }

    /// The configuration this engine was created with.
    #[must_use]
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Parse every supported file under `project_path` and publish the result
    /// as the current snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Path`] if the root does not exist or is not a
    /// directory. Per-file problems do not fail the build; they are listed in
    /// [`SnapshotStats::errors`].
    pub fn set_ast(&mut self, project_path: &Path) -> Result<SnapshotStats> {
        self.set_ast_with_options(project_path, &BuildOptions::default())
    }

    /// Like [`set_ast`](Self::set_ast), with control over parallelism and
    /// cancellation.
    ///
    /// # Errors
    ///
    /// In addition to the errors of [`set_ast`](Self::set_ast), returns
    /// [`Error::Cancelled`] if the token fires; the previous snapshot is then
    /// left untouched.
    pub fn set_ast_with_options(
        &mut self,
        project_path: &Path,
        options: &BuildOptions,
    ) -> Result<SnapshotStats> {
        let root = validate_root(project_path)?;
        info!(root = %root.display(), parallel = options.parallel, "Building snapshot");

        let (snapshot, stats) =
            snapshot::build(&root, &self.config, &mut self.registry, options)?;
        self.snapshot = Some(Arc::new(snapshot));

        Ok(stats)
    }

    /// Handle to the current snapshot, if a build has completed.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<ProjectSnapshot>> {
        self.snapshot.clone()
    }

    /// Symbols declared by one file of the current snapshot.
    ///
    /// `file_path` is relative to the project root with `/` separators, exactly
    /// as listed by [`ProjectSnapshot::files`].
    ///
    /// # Errors
    ///
    /// [`Error::EmptySnapshot`] before the first successful build,
    /// [`Error::NotFound`] if the path is not in the snapshot.
    pub fn extract_symbols(&self, file_path: &str) -> Result<FileSymbols> {
        let snapshot = self.current()?;
        let parsed = snapshot
            .get(file_path)
            .ok_or_else(|| Error::NotFound(file_path.to_string()))?;

        Ok(parsed.extract())
    }

    /// Symbols of every file that declares at least one, sorted by path.
    ///
    /// # Errors
    ///
    /// [`Error::EmptySnapshot`] before the first successful build.
    pub fn collect_symbols(&self) -> Result<Vec<FileSymbols>> {
        let snapshot = self.current()?;
        let files: Vec<FileSymbols> = snapshot
            .iter()
            .map(ParsedFile::extract)
            .filter(|symbols| !symbols.is_empty())
            .collect();

        debug!(
            files = snapshot.len(),
            with_symbols = files.len(),
            "Collected project symbols"
        );
        Ok(files)
    }

    /// Render the whole-project report.
    ///
    /// # Errors
    ///
    /// [`Error::EmptySnapshot`] before the first successful build. A snapshot
    /// that holds no files renders a report with zero files.
    pub fn extract_all_symbols(&self) -> Result<String> {
        Ok(render_report(&self.collect_symbols()?))
    }

    /// Parse and extract a single file outside the snapshot.
    ///
    /// The snapshot is not consulted or changed. The returned
    /// [`FileSymbols::file`] is `path` as given, with `/` separators.
    ///
    /// # Errors
    ///
    /// [`Error::File`] if the file has an unsupported extension, cannot be
    /// read, is not UTF-8 or yields no syntax tree.
    pub fn extract_from_path(&mut self, path: &Path) -> Result<FileSymbols> {
        let family = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(LanguageFamily::from_extension)
            .ok_or_else(|| FileError::unsupported_language(path.to_path_buf()))?;

        let display = path.to_string_lossy().replace('\\', "/");
        let parsed = self.registry.parse_file(family, path, &display)??;

        Ok(parsed.extract())
    }

    /// S-expression of the named nodes of one snapshot file.
    ///
    /// # Errors
    ///
    /// Same as [`extract_symbols`](Self::extract_symbols).
    pub fn dump_tree(&self, file_path: &str) -> Result<String> {
        let snapshot = self.current()?;
        let parsed = snapshot
            .get(file_path)
            .ok_or_else(|| Error::NotFound(file_path.to_string()))?;

        Ok(parsed.to_sexp())
    }

    fn current(&self) -> Result<&ProjectSnapshot> {
        self.snapshot.as_deref().ok_or(Error::EmptySnapshot)
    }
}

/// Canonicalize a project root, rejecting anything that is not a directory.
fn validate_root(project_path: &Path) -> Result<std::path::PathBuf> {
    let root = project_path.canonicalize().map_err(|e| Error::Path {
        path: project_path.to_path_buf(),
        reason: e.to_string(),
    })?;

    if !root.is_dir() {
        return Err(Error::Path {
            path: project_path.to_path_buf(),
            reason: "not a directory".to_string(),
        });
    }

    Ok(root)
}
