//! Error types for the sync engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::store::RemoveError;

/// Errors that can occur while reconciling the catalog against local state.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Remote catalog call failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// An item in the listing carries no usable filename. This is a
    /// data-integrity problem and aborts the run.
    #[error("unable to get the file name for item {hub_id}")]
    MissingFilename {
        /// The hub id of the offending item.
        hub_id: String,
    },

    /// Local filesystem failure (cannot delete or write a file).
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl SyncError {
    /// Creates a missing-filename error.
    pub fn missing_filename(hub_id: impl Into<String>) -> Self {
        Self::MissingFilename {
            hub_id: hub_id.into(),
        }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<RemoveError> for SyncError {
    fn from(err: RemoveError) -> Self {
        Self::Io {
            path: err.path,
            source: err.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_filename_display() {
        let err = SyncError::missing_filename("42");
        let msg = err.to_string();
        assert!(msg.contains("unable to get the file name"), "got: {msg}");
        assert!(msg.contains("42"), "got: {msg}");
    }

    #[test]
    fn test_io_display_includes_path() {
        let source = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = SyncError::io("/tmp/mybook.epub", source);
        assert!(err.to_string().contains("/tmp/mybook.epub"));
    }

    #[test]
    fn test_catalog_error_passes_through_transparently() {
        let err: SyncError = CatalogError::AuthorizationRejected.into();
        assert!(err.to_string().contains("authorization failed"));
    }
}
