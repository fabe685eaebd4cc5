//! Project directory traversal and file classification.
//!
//! Walks a project root, prunes excluded directories, drops files matching an
//! excluded suffix and classifies the rest by language family. Per-entry
//! problems are logged and collected; they never abort the walk.
//!
//! Directory exclusion matches whole path segments: a `vendor` rule excludes
//! `src/vendor/x.php` but not `src/vendors/x.php` or `srcvendor/x.php`, and a
//! multi-segment rule such as `public/build` must appear contiguously.

use std::path::{Component, Path, PathBuf};

use tracing::{debug, trace, warn};
use walkdir::{DirEntry, WalkDir};

use crate::config::ScanConfig;
use crate::error::{Error, FileError, FileErrorKind, Result};
use crate::snapshot::CancellationToken;
use crate::types::LanguageFamily;

/// Compiled exclusion rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRules {
    /// Each rule split into its path segments.
    dir_rules: Vec<Vec<String>>,
    /// Lowercased filename suffixes.
    suffixes: Vec<String>,
}

impl ExclusionRules {
    /// Compile the exclusion settings of a configuration.
    ///
    /// Leading and trailing separators are ignored; rules that are empty once
    /// split are dropped.
    #[must_use]
    pub fn from_config(config: &ScanConfig) -> Self {
        let dir_rules = config
            .excluded_dirs
            .iter()
            .map(|rule| {
                rule.split('/')
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>()
            })
            .filter(|segments| !segments.is_empty())
            .collect();

        let suffixes = config
            .excluded_suffixes
            .iter()
            .filter(|suffix| !suffix.is_empty())
            .map(|suffix| suffix.to_ascii_lowercase())
            .collect();

        Self {
            dir_rules,
            suffixes,
        }
    }

    /// Returns `true` if any directory rule appears contiguously in `segments`.
    #[must_use]
    pub fn excludes_dir_segments<S: AsRef<str>>(&self, segments: &[S]) -> bool {
        self.dir_rules.iter().any(|rule| {
            segments.len() >= rule.len()
                && segments.windows(rule.len()).any(|window| {
                    window
                        .iter()
                        .zip(rule)
                        .all(|(segment, expected)| segment.as_ref() == expected)
                })
        })
    }

    /// Returns `true` if the file name ends with an excluded suffix.
    #[must_use]
    pub fn excludes_file_name(&self, file_name: &str) -> bool {
        let lowered = file_name.to_ascii_lowercase();
        self.suffixes.iter().any(|suffix| lowered.ends_with(suffix))
    }

    /// Check a file path relative to the project root (POSIX separators).
    ///
    /// Only the directory part is matched against directory rules; the file
    /// name is matched against suffix rules.
    #[must_use]
    pub fn excludes(&self, relative_path: &str) -> bool {
        let segments: Vec<&str> = relative_path
            .split('/')
            .filter(|segment| !segment.is_empty())
            .collect();
        let Some((file_name, dirs)) = segments.split_last() else {
            return false;
        };

        self.excludes_dir_segments(dirs) || self.excludes_file_name(file_name)
    }
}

/// A source file accepted by the walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Path relative to the root, POSIX separators
    pub relative_path: String,
    /// Absolute path on disk
    pub absolute_path: PathBuf,
    /// Family chosen from the extension
    pub family: LanguageFamily,
}

/// Result of walking a project root.
#[derive(Debug, Default)]
pub struct Discovery {
    /// Accepted files, in walk order (sorted by name within each directory)
    pub files: Vec<DiscoveredFile>,
    /// Files with an unrecognized extension
    pub skipped: usize,
    /// Directories pruned plus files dropped by a suffix rule
    pub excluded: usize,
    /// Entries that could not be read
    pub errors: Vec<FileError>,
}

/// Walk `root` and classify every regular file below it.
///
/// Symbolic links are not followed. Returns [`Error::Cancelled`] if the token
/// fires mid-walk.
pub fn discover(
    root: &Path,
    rules: &ExclusionRules,
    cancel: Option<&CancellationToken>,
) -> Result<Discovery> {
    let mut pruned = 0usize;
    let mut discovery = Discovery::default();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let segments = relative_segments(root, entry.path());
            let keep = !rules.excludes_dir_segments(segments.as_slice());
            if !keep {
                trace!(directory = %entry.path().display(), "Pruning excluded directory");
                pruned += 1;
            }
            keep
        });

    for entry in walker {
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(Error::Cancelled);
        }

        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                let path = e
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Cannot read directory entry, skipping"
                );
                discovery
                    .errors
                    .push(FileError::new(path, FileErrorKind::Unreadable, e.to_string()));
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        classify(root, &entry, rules, &mut discovery);
    }

    discovery.excluded += pruned;
    debug!(
        files = discovery.files.len(),
        skipped = discovery.skipped,
        excluded = discovery.excluded,
        errors = discovery.errors.len(),
        "Directory walk complete"
    );

    Ok(discovery)
}

fn classify(root: &Path, entry: &DirEntry, rules: &ExclusionRules, discovery: &mut Discovery) {
    let relative_path = relative_segments(root, entry.path()).join("/");
    let file_name = entry.file_name().to_string_lossy();

    if rules.excludes_file_name(&file_name) {
        trace!(file = %relative_path, "Excluded by filename suffix");
        discovery.excluded += 1;
        return;
    }

    let family = entry
        .path()
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(LanguageFamily::from_extension);
    let Some(family) = family else {
        debug!(file = %relative_path, "Unsupported extension, skipping");
        discovery.skipped += 1;
        return;
    };

    discovery.files.push(DiscoveredFile {
        relative_path,
        absolute_path: entry.path().to_path_buf(),
        family,
    });
}

/// Path segments of `path` below `root`.
fn relative_segments(root: &Path, path: &Path) -> Vec<String> {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .filter_map(|component| match component {
            Component::Normal(segment) => Some(segment.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect()
}
