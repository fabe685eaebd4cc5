//! Error types for Strata operations.
//!
//! Errors come in two tiers:
//!
//! - **`Error`**: operation-level failures returned to the caller (bad project
//!   root, unknown file, extraction before any snapshot exists, ...)
//! - **`FileError`**: a problem with one specific file. During a whole-project
//!   build these are collected and the file is left out of the snapshot; on a
//!   direct single-file request they surface as [`Error::File`].
//!
//! ## Error Philosophy
//!
//! Snapshot builds are "best effort":
//! - One unreadable or unparsable file never prevents the rest from loading
//! - Per-file problems are collected and reported, not thrown
//! - Only problems with the request itself (root path, cancellation) abort

use std::path::PathBuf;
use thiserror::Error;

/// Result type for Strata operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for Strata operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The project root does not exist or is not a directory
    #[error("invalid project root {}: {reason}", path.display())]
    Path {
        /// The path that was requested
        path: PathBuf,
        /// Why it was rejected
        reason: String,
    },

    /// The requested file is not part of the current snapshot
    #[error("file {0} not found in the current snapshot (run set_ast first)")]
    NotFound(String),

    /// Extraction was requested before any snapshot was built
    #[error("no project has been parsed yet (run set_ast first)")]
    EmptySnapshot,

    /// The snapshot build was cancelled before it completed
    #[error("snapshot build cancelled")]
    Cancelled,

    /// A direct single-file request failed
    #[error(transparent)]
    File(#[from] FileError),

    /// File system operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization of extraction output failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Tree-sitter parsing infrastructure failed
    #[error("parser error: {0}")]
    Parser(String),

    /// Invalid configuration
    #[error("configuration error: {0}")]
    Config(String),
}

/// Error encountered while loading a specific file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileError {
    /// Path to the file that failed
    pub path: PathBuf,
    /// Category of the error
    pub kind: FileErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: {} ({})",
            self.path.display(),
            self.message,
            self.kind
        )
    }
}

impl std::error::Error for FileError {}

/// Categorization of per-file errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileErrorKind {
    /// Could not read the file from disk (permissions, vanished, ...)
    Unreadable,

    /// File content is not valid UTF-8
    Encoding,

    /// The grammar produced no usable tree for the file
    ParseFailed,

    /// File extension does not map to any language family
    UnsupportedLanguage,
}

impl std::fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unreadable => write!(f, "unreadable file"),
            Self::Encoding => write!(f, "encoding error"),
            Self::ParseFailed => write!(f, "parse failed"),
            Self::UnsupportedLanguage => write!(f, "unsupported language"),
        }
    }
}

impl FileErrorKind {
    /// Returns `true` if the file could not be read at all.
    ///
    /// Encoding problems count as read failures: the bytes are there but
    /// cannot be turned into source text.
    #[must_use]
    pub fn is_read_error(&self) -> bool {
        matches!(self, Self::Unreadable | Self::Encoding)
    }
}

impl FileError {
    /// Create a new per-file error.
    #[must_use]
    pub fn new(path: PathBuf, kind: FileErrorKind, message: impl Into<String>) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
        }
    }

    /// Create an I/O error for a file.
    #[must_use]
    pub fn unreadable(path: PathBuf, error: &std::io::Error) -> Self {
        Self::new(path, FileErrorKind::Unreadable, error.to_string())
    }

    /// Create an encoding error for a file.
    #[must_use]
    pub fn encoding(path: PathBuf) -> Self {
        Self::new(path, FileErrorKind::Encoding, "file is not valid UTF-8")
    }

    /// Create a parse error for a file.
    #[must_use]
    pub fn parse_failed(path: PathBuf, message: impl Into<String>) -> Self {
        Self::new(path, FileErrorKind::ParseFailed, message)
    }

    /// Create an unsupported language error.
    #[must_use]
    pub fn unsupported_language(path: PathBuf) -> Self {
        let ext = path
            .extension()
            .map_or_else(|| "none".to_string(), |e| e.to_string_lossy().to_string());
        Self::new(
            path,
            FileErrorKind::UnsupportedLanguage,
            format!("unsupported extension: {ext}"),
        )
    }
}
