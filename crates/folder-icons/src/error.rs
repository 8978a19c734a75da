//! Error types for the folder icon core.

use std::path::{Path, PathBuf};

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Broad classification of a [`MetadataError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Directory or attribute missing.
    NotFound,
    /// The filesystem or metadata service cannot store attributes.
    Unsupported,
    /// A read or write failed.
    Io,
    /// The request was rejected before touching the directory.
    InvalidInput,
}

/// Errors surfaced by the metadata store, per directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetadataError {
    /// The directory does not exist.
    #[error("Directory '{path}' not found")]
    NotFound { path: PathBuf },

    /// The directory's filesystem does not support icon attributes.
    #[error("Attributes are not supported for '{path}': {message}")]
    Unsupported { path: PathBuf, message: String },

    /// Reading or writing an attribute failed.
    #[error("Failed to access '{attribute}' on '{path}': {message}")]
    Io {
        path: PathBuf,
        attribute: String,
        message: String,
    },

    /// The request itself is malformed, e.g. an empty icon name.
    #[error("Invalid request for '{path}': {message}")]
    InvalidInput { path: PathBuf, message: String },

    /// Several attribute writes on one directory failed.
    #[error("{} attribute write(s) failed on '{path}'", failures.len())]
    Partial {
        path: PathBuf,
        failures: Vec<MetadataError>,
    },
}

impl MetadataError {
    /// Create a not-found error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create an unsupported-filesystem error.
    pub fn unsupported(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Unsupported {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an I/O error for one attribute.
    pub fn io(
        path: impl Into<PathBuf>,
        attribute: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Io {
            path: path.into(),
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Create an invalid-input error.
    pub fn invalid_input(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Fold per-attribute failures of one directory into a single result.
    ///
    /// No failures is success; a single failure is returned unchanged.
    pub fn aggregate(path: &Path, mut failures: Vec<MetadataError>) -> Result<()> {
        match failures.len() {
            0 => Ok(()),
            1 => Err(failures.remove(0)),
            _ => Err(Self::Partial {
                path: path.to_path_buf(),
                failures,
            }),
        }
    }

    /// The broad kind of this error.
    ///
    /// A partial failure reports the kind of its first failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::Unsupported { .. } => ErrorKind::Unsupported,
            Self::Io { .. } => ErrorKind::Io,
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::Partial { failures, .. } => {
                failures.first().map_or(ErrorKind::Io, MetadataError::kind)
            }
        }
    }

    /// The directory this error concerns.
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound { path }
            | Self::Unsupported { path, .. }
            | Self::Io { path, .. }
            | Self::InvalidInput { path, .. }
            | Self::Partial { path, .. } => path,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate() {
        let dir = Path::new("/tmp/d");
        assert!(MetadataError::aggregate(dir, Vec::new()).is_ok());

        let single = MetadataError::aggregate(dir, vec![MetadataError::not_found(dir)]);
        assert!(matches!(single, Err(MetadataError::NotFound { .. })));

        let many = MetadataError::aggregate(
            dir,
            vec![
                MetadataError::unsupported(dir, "read-only"),
                MetadataError::io(dir, "metadata::symbolic-icon", "denied"),
            ],
        )
        .unwrap_err();
        assert_eq!(many.kind(), ErrorKind::Unsupported);
        assert_eq!(many.path(), dir);
        assert!(many.to_string().contains("2 attribute write(s)"));
    }
}
