//! Project snapshots: every parsed file of a project at one point in time.
//!
//! A snapshot maps relative paths to [`ParsedFile`]s. It is built completely
//! before anyone can see it and never changes afterwards; a later build
//! produces a new snapshot that replaces the old one wholesale.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         build()                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Phase 1 (Sequential):  walkdir discovery + exclusion        │
//! │  Phase 2 (Sequential or rayon):  read + parse each file      │
//! │  Phase 3 (Sequential):  merge into the path-ordered map      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! In parallel mode each rayon worker owns its own [`GrammarRegistry`], since
//! tree-sitter parsers cannot be shared between threads.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::error::{Error, FileError, Result};
use crate::parser::{GrammarRegistry, ParsedFile};
use crate::types::SnapshotStats;
use crate::walker::{self, DiscoveredFile, ExclusionRules};

/// Cooperative cancellation flag for snapshot builds.
///
/// Clones share the same flag. Builds check it before each file.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that has not fired.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation of every build holding a clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Options for a snapshot build.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Parse files on the rayon thread pool
    pub parallel: bool,
    /// Abort the build when this token fires
    pub cancel: Option<CancellationToken>,
}

impl BuildOptions {
    /// Options for a parallel build.
    #[must_use]
    pub fn parallel() -> Self {
        Self {
            parallel: true,
            cancel: None,
        }
    }

    /// Attach a cancellation token.
    #[must_use]
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// An immutable relative-path → parsed-file mapping for one project.
#[derive(Debug)]
pub struct ProjectSnapshot {
    root: PathBuf,
    files: BTreeMap<String, ParsedFile>,
}

impl ProjectSnapshot {
    /// The canonical root the snapshot was built from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Look up a file by its relative path.
    #[must_use]
    pub fn get(&self, relative_path: &str) -> Option<&ParsedFile> {
        self.files.get(relative_path)
    }

    /// Relative paths of every file, sorted.
    pub fn files(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    /// Parsed files, sorted by relative path.
    pub fn iter(&self) -> impl Iterator<Item = &ParsedFile> {
        self.files.values()
    }

    /// Number of files in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns `true` if no file was accepted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Build a snapshot of `root`.
///
/// `root` must already be validated and canonical. `registry` is used for
/// sequential builds; parallel builds create one registry per worker.
pub(crate) fn build(
    root: &Path,
    config: &ScanConfig,
    registry: &mut GrammarRegistry,
    options: &BuildOptions,
) -> Result<(ProjectSnapshot, SnapshotStats)> {
    let start = Instant::now();
    let cancel = options.cancel.as_ref();
    let rules = ExclusionRules::from_config(config);

    let discovery = walker::discover(root, &rules, cancel)?;
    let mut stats = SnapshotStats {
        files_skipped: discovery.skipped,
        entries_excluded: discovery.excluded,
        errors: discovery.errors,
        ..SnapshotStats::default()
    };

    let outcomes = if options.parallel {
        discovery
            .files
            .par_iter()
            .map_init(GrammarRegistry::new, |registry, file| {
                load_file(registry, file, config, cancel)
            })
            .collect::<Result<Vec<_>>>()?
    } else {
        discovery
            .files
            .iter()
            .map(|file| load_file(registry, file, config, cancel))
            .collect::<Result<Vec<_>>>()?
    };

    let mut files = BTreeMap::new();
    for outcome in outcomes {
        match outcome {
            Ok(parsed) => {
                if parsed.has_syntax_errors() {
                    stats.files_with_syntax_errors += 1;
                }
                files.insert(parsed.relative_path().to_string(), parsed);
            }
            Err(error) => stats.errors.push(error),
        }
    }

    stats.files_parsed = files.len();
    stats.duration = start.elapsed();
    info!(
        root = %root.display(),
        parsed = stats.files_parsed,
        skipped = stats.files_skipped,
        excluded = stats.entries_excluded,
        syntax_errors = stats.files_with_syntax_errors,
        errors = stats.errors.len(),
        duration_ms = stats.duration.as_millis(),
        parallel = options.parallel,
        "Snapshot built"
    );

    Ok((
        ProjectSnapshot {
            root: root.to_path_buf(),
            files,
        },
        stats,
    ))
}

/// Read and parse one discovered file.
///
/// The inner error is a per-file failure to collect; the outer one aborts the
/// whole build.
fn load_file(
    registry: &mut GrammarRegistry,
    file: &DiscoveredFile,
    config: &ScanConfig,
    cancel: Option<&CancellationToken>,
) -> Result<std::result::Result<ParsedFile, FileError>> {
    if cancel.is_some_and(CancellationToken::is_cancelled) {
        return Err(Error::Cancelled);
    }

    let outcome = registry
        .parse_file(file.family, &file.absolute_path, &file.relative_path)?
        .and_then(|parsed| {
            if config.reject_syntax_errors && parsed.has_syntax_errors() {
                Err(FileError::parse_failed(
                    file.absolute_path.clone(),
                    "syntax tree contains errors",
                ))
            } else {
                Ok(parsed)
            }
        });

    match &outcome {
        Ok(parsed) => debug!(
            file = %file.relative_path,
            family = %file.family,
            syntax_errors = parsed.has_syntax_errors(),
            "Parsed file"
        ),
        Err(error) => warn!(
            file = %file.relative_path,
            error = %error,
            "Failed to load file, leaving it out of the snapshot"
        ),
    }

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FileErrorKind;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        for (path, content) in files {
            let full = dir.path().join(path);
            std::fs::create_dir_all(full.parent().expect("path has a parent"))
                .expect("failed to create dirs");
            std::fs::write(full, content).expect("failed to write file");
        }
        dir
    }

    fn build_default(
        root: &Path,
        options: &BuildOptions,
    ) -> Result<(ProjectSnapshot, SnapshotStats)> {
        build(
            root,
            &ScanConfig::default(),
            &mut GrammarRegistry::new(),
            options,
        )
    }

    #[test]
    fn cancellation_token_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert!(!clone.is_cancelled());

        token.cancel();

        assert!(clone.is_cancelled());
    }

    #[test]
    fn snapshot_files_are_sorted_by_relative_path() {
        let dir = project(&[
            ("b.ts", "class B {}"),
            ("a/z.js", "class Z {}"),
            ("a.php", "<?php class A {}"),
        ]);

        let (snapshot, stats) =
            build_default(dir.path(), &BuildOptions::default()).expect("build should succeed");

        let files: Vec<_> = snapshot.files().collect();
        assert_eq!(files, vec!["a.php", "a/z.js", "b.ts"]);
        assert_eq!(stats.files_parsed, 3);
        assert_eq!(snapshot.len(), 3);
    }

    #[test]
    fn syntax_errors_are_kept_and_counted() {
        let dir = project(&[("broken.ts", "class { ((( "), ("ok.ts", "class Ok {}")]);

        let (snapshot, stats) =
            build_default(dir.path(), &BuildOptions::default()).expect("build should succeed");

        assert_eq!(snapshot.len(), 2);
        assert_eq!(stats.files_with_syntax_errors, 1);
        assert!(stats.errors.is_empty());
    }

    #[test]
    fn syntax_errors_can_be_rejected() {
        let dir = project(&[("broken.ts", "class { ((( "), ("ok.ts", "class Ok {}")]);
        let config = ScanConfig {
            reject_syntax_errors: true,
            ..ScanConfig::default()
        };

        let (snapshot, stats) = build(
            dir.path(),
            &config,
            &mut GrammarRegistry::new(),
            &BuildOptions::default(),
        )
        .expect("build should succeed");

        assert_eq!(snapshot.files().collect::<Vec<_>>(), vec!["ok.ts"]);
        assert_eq!(stats.errors.len(), 1);
        assert_eq!(stats.errors[0].kind, FileErrorKind::ParseFailed);
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let files: Vec<(String, String)> = (0..40)
            .map(|i| (format!("src/m{i}.ts"), format!("export class C{i} {{}}")))
            .collect();
        let refs: Vec<(&str, &str)> = files
            .iter()
            .map(|(p, c)| (p.as_str(), c.as_str()))
            .collect();
        let dir = project(&refs);

        let (sequential, _) =
            build_default(dir.path(), &BuildOptions::default()).expect("build should succeed");
        let (parallel, _) =
            build_default(dir.path(), &BuildOptions::parallel()).expect("build should succeed");

        assert_eq!(
            sequential.files().collect::<Vec<_>>(),
            parallel.files().collect::<Vec<_>>()
        );
    }

    #[test]
    fn cancelled_build_fails() {
        let dir = project(&[("a.js", "class A {}")]);
        let token = CancellationToken::new();
        token.cancel();

        for options in [
            BuildOptions::default().with_cancel(token.clone()),
            BuildOptions::parallel().with_cancel(token.clone()),
        ] {
            let result = build_default(dir.path(), &options);
            assert!(matches!(result, Err(Error::Cancelled)));
        }
    }
}
