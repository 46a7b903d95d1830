//! Domain-specific errors.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use zip::result::ZipError;

/// Failure extracting placeholders from a single document.
///
/// Every variant is terminal for the document it names; callers record it and
/// move on to the next document.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("cannot read document archive {}: {source}", .path.display())]
    ArchiveUnreadable {
        path: PathBuf,
        #[source]
        source: ZipError,
    },
    #[error("document archive {} has no `{part}` part", .path.display())]
    PartMissing { path: PathBuf, part: String },
    #[error("malformed markup in {origin}: {source}")]
    MalformedMarkup {
        origin: String,
        path: Option<PathBuf>,
        #[source]
        source: roxmltree::Error,
    },
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ExtractError::ArchiveUnreadable { .. } => ErrorKind::ArchiveUnreadable,
            ExtractError::PartMissing { .. } => ErrorKind::PartMissing,
            ExtractError::MalformedMarkup { .. } => ErrorKind::MalformedMarkup,
        }
    }

    /// Path of the offending archive. `None` only for markup handed in directly.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ExtractError::ArchiveUnreadable { path, .. } | ExtractError::PartMissing { path, .. } => {
                Some(path)
            }
            ExtractError::MalformedMarkup { path, .. } => path.as_deref(),
        }
    }

    pub(crate) fn unreadable(path: &Path, source: impl Into<ZipError>) -> Self {
        ExtractError::ArchiveUnreadable {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}

/// Serializable discriminant of [`ExtractError`] used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    ArchiveUnreadable,
    PartMissing,
    MalformedMarkup,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::ArchiveUnreadable => "archive_unreadable",
            ErrorKind::PartMissing => "part_missing",
            ErrorKind::MalformedMarkup => "malformed_markup",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
