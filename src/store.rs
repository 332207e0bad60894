//! Local store inspection for already-downloaded files.
//!
//! The sync engine asks one question per item: does the target file exist,
//! and how big is it? State is read fresh at decision time; nothing is
//! cached and no other writers are assumed.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Observed state of a candidate local file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalFileState {
    /// Whether a file exists at the candidate path.
    pub exists: bool,
    /// Observed byte size; zero when the file does not exist.
    pub size: u64,
}

impl LocalFileState {
    /// State for a path with no file present.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            exists: false,
            size: 0,
        }
    }

    /// State for an existing file of the given size.
    #[must_use]
    pub fn present(size: u64) -> Self {
        Self { exists: true, size }
    }
}

/// Local filesystem failure while removing a stale file.
#[derive(Debug, Error)]
#[error("IO error removing {path}: {source}")]
pub struct RemoveError {
    /// The path that could not be removed.
    pub path: PathBuf,
    /// The underlying IO error.
    #[source]
    pub source: std::io::Error,
}

/// Reports whether a file exists at `path` and its size.
///
/// Never fails: absence is a normal outcome, and any metadata error
/// (permission denied, dangling link) is treated as absence as well.
pub async fn inspect(path: &Path) -> LocalFileState {
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => LocalFileState::present(meta.len()),
        _ => LocalFileState::absent(),
    }
}

/// Removes an existing file ahead of a re-download.
///
/// # Errors
///
/// Returns [`RemoveError`] when deletion is denied; this is surfaced to
/// the caller, never silently swallowed.
pub async fn remove(path: &Path) -> Result<(), RemoveError> {
    tokio::fs::remove_file(path)
        .await
        .map_err(|source| RemoveError {
            path: path.to_path_buf(),
            source,
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_inspect_missing_file_reports_absent() {
        let dir = TempDir::new().unwrap();
        let state = inspect(&dir.path().join("nope.epub")).await;
        assert_eq!(state, LocalFileState::absent());
    }

    #[tokio::test]
    async fn test_inspect_existing_file_reports_size() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("book.epub");
        std::fs::write(&path, vec![0u8; 100]).unwrap();

        let state = inspect(&path).await;
        assert_eq!(state, LocalFileState::present(100));
    }

    #[tokio::test]
    async fn test_inspect_directory_reports_absent() {
        // A directory at the candidate path is not a usable local file.
        let dir = TempDir::new().unwrap();
        let state = inspect(dir.path()).await;
        assert!(!state.exists);
    }

    #[tokio::test]
    async fn test_remove_deletes_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stale.epub");
        std::fs::write(&path, b"old bytes").unwrap();

        remove(&path).await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_remove_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("never-existed.epub");

        let err = remove(&path).await.unwrap_err();
        assert_eq!(err.path, path);
        assert!(err.to_string().contains("never-existed.epub"));
    }
}
