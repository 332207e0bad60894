//! Reconciliation policy: remote-declared state vs. local filesystem state.
//!
//! `decide` is a pure function so every rule can be tested without a
//! network or a filesystem. The engine owns all side effects.

use std::path::Path;

use crate::catalog::{Format, RemoteItem};
use crate::store::LocalFileState;

/// A remote item resolved against the requested format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetFile {
    /// Local filename: declared base name plus the format tag.
    pub file_name: String,
    /// Declared size of the requested variant; `None` when the item has
    /// no variant in that format, meaning the size is unknown.
    pub expected_size: Option<u64>,
}

impl TargetFile {
    /// Resolves the local target for `item` in `format`.
    ///
    /// Returns `None` when the item's declared filename is empty; the
    /// engine treats that as a fatal data error.
    #[must_use]
    pub fn resolve(item: &RemoteItem, format: Format) -> Option<TargetFile> {
        if item.filename.is_empty() {
            return None;
        }

        // "mybook.fb2" + epub -> "mybook.epub"; only the last extension
        // is replaced, matching the catalog's naming convention.
        let base = Path::new(&item.filename)
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or(item.filename.as_str());

        Some(TargetFile {
            file_name: format!("{base}.{format}"),
            expected_size: item.declared_size(format.as_str()),
        })
    }
}

/// Per-item action chosen by the reconciliation policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The local file is trusted; no network call is made for this item.
    Skip,
    /// The local file is stale; delete it, then fetch.
    ReplaceThenFetch,
    /// No usable local file; fetch fresh.
    Fetch,
}

/// Decides what to do with one item.
///
/// Rules, in order:
/// 1. no local file -> `Fetch`
/// 2. local file present, size checking off -> `Skip` (trust by name)
/// 3. local file present, size checking on:
///    - declared size unknown -> `Skip` (comparing against an unknown
///      size would force a spurious re-download; the engine logs a
///      warning for this case)
///    - observed == declared -> `Skip`
///    - otherwise -> `ReplaceThenFetch`
#[must_use]
pub fn decide(target: &TargetFile, local: LocalFileState, check_sizes: bool) -> Decision {
    if !local.exists {
        return Decision::Fetch;
    }
    if !check_sizes {
        return Decision::Skip;
    }
    match target.expected_size {
        None => Decision::Skip,
        Some(expected) if expected == local.size => Decision::Skip,
        Some(_) => Decision::ReplaceThenFetch,
    }
}
