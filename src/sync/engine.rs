//! Sync engine: reconciles the remote catalog against local state.
//!
//! The engine enumerates owned items once, applies the reconciliation
//! policy per item, streams downloads for items that need action, and
//! paces requests so the remote service is not hammered. Execution is
//! strictly sequential: one item is fully resolved before the next
//! begins, and progress lines follow catalog order.

use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::StreamExt;
use indicatif::ProgressBar;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};

use super::error::SyncError;
use super::policy::{self, Decision, TargetFile};
use super::progress;
use crate::catalog::{CatalogClient, Format, RemoteItem, Session};
use crate::store;

/// Page size for the bulk listing call. Large enough to fetch a whole
/// personal catalog in one page.
pub const PAGE_LIMIT: u64 = 1000;

/// Default pause between downloads, bounding the request rate.
pub const DEFAULT_PACING: Duration = Duration::from_secs(1);

/// Options controlling one sync run.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    /// The format to download every item in.
    pub format: Format,
    /// Compare local file sizes against declared sizes before skipping.
    pub check_sizes: bool,
    /// Directory downloads are written into.
    pub output_dir: PathBuf,
    /// Pause inserted after each item that touched the network.
    pub pacing: Duration,
    /// Render per-item progress bars.
    pub show_progress: bool,
}

impl SyncOptions {
    /// Options for the given format with reference defaults: no size
    /// checking, current directory, one-second pacing, visible progress.
    #[must_use]
    pub fn new(format: Format) -> Self {
        Self {
            format,
            check_sizes: false,
            output_dir: PathBuf::from("."),
            pacing: DEFAULT_PACING,
            show_progress: true,
        }
    }
}

/// Outcome counts for a completed run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Items downloaded successfully (including replacements).
    pub fetched: usize,
    /// Items skipped because a trusted local file already exists.
    pub skipped: usize,
    /// Stale local files deleted ahead of a re-download.
    pub replaced: usize,
    /// Items whose download failed; the run continued past them.
    pub failed: usize,
}

impl SyncReport {
    /// True when every item that needed action succeeded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Drives a sync run over the remote catalog.
pub struct SyncEngine {
    client: CatalogClient,
    options: SyncOptions,
}

impl SyncEngine {
    /// Creates an engine over an authenticated catalog client.
    #[must_use]
    pub fn new(client: CatalogClient, options: SyncOptions) -> Self {
        Self { client, options }
    }

    /// Runs the full reconciliation.
    ///
    /// Fatal conditions abort the run: listing failures, an item without
    /// a filename, and local filesystem failures. A single item's
    /// download transport failure is recoverable: the partial file is
    /// removed, the failure counted, and the run continues.
    ///
    /// # Errors
    ///
    /// `SyncError::Catalog` for listing failures, `MissingFilename` for
    /// unnameable items, `Io` for filesystem failures.
    #[instrument(skip(self, session), fields(format = %self.options.format))]
    pub async fn run(&self, session: &Session) -> Result<SyncReport, SyncError> {
        let page = self.client.list_owned_items(session, 0, PAGE_LIMIT).await?;
        info!(total = page.total, "fetched catalog listing");

        let mut report = SyncReport::default();

        for (index, item) in page.items.iter().enumerate() {
            let target = TargetFile::resolve(item, self.options.format)
                .ok_or_else(|| SyncError::missing_filename(&item.hub_id))?;
            let prefix = format!("({}/{}) {}", index + 1, page.total, target.file_name);
            let path = self.options.output_dir.join(&target.file_name);

            let local = store::inspect(&path).await;
            match policy::decide(&target, local, self.options.check_sizes) {
                Decision::Skip => {
                    if self.options.check_sizes && target.expected_size.is_none() {
                        warn!(
                            file = %target.file_name,
                            "no declared size for this format, skipping size check"
                        );
                    }
                    info!("{prefix}: already exists - skipping");
                    report.skipped += 1;
                    continue;
                }
                Decision::ReplaceThenFetch => {
                    info!(
                        local = local.size,
                        remote = target.expected_size.unwrap_or(0),
                        "{prefix}: file size is different, downloading again"
                    );
                    store::remove(&path).await?;
                    report.replaced += 1;
                }
                Decision::Fetch => {}
            }

            match self.fetch_item(session, item, &target, &path, &prefix).await {
                Ok(bytes) => {
                    debug!(file = %target.file_name, bytes, "download complete");
                    report.fetched += 1;
                }
                // Filesystem failures abort the run; a single item's
                // transport failure does not.
                Err(err @ (SyncError::Io { .. } | SyncError::MissingFilename { .. })) => {
                    return Err(err);
                }
                Err(SyncError::Catalog(err)) => {
                    warn!(file = %target.file_name, error = %err, "download failed, continuing");
                    report.failed += 1;
                }
            }

            if !self.options.pacing.is_zero() {
                tokio::time::sleep(self.options.pacing).await;
            }
        }

        info!(
            fetched = report.fetched,
            skipped = report.skipped,
            replaced = report.replaced,
            failed = report.failed,
            "sync finished"
        );
        Ok(report)
    }

    /// Streams one item to its target path, returning bytes written.
    async fn fetch_item(
        &self,
        session: &Session,
        item: &RemoteItem,
        target: &TargetFile,
        path: &Path,
        prefix: &str,
    ) -> Result<u64, SyncError> {
        let stream = self
            .client
            .open_download_stream(session, &item.hub_id, self.options.format)
            .await?;

        let bar =
            progress::item_progress_bar(prefix, target.expected_size, self.options.show_progress);

        let file = File::create(path)
            .await
            .map_err(|e| SyncError::io(path, e))?;

        let result = stream_to_file(file, stream, path, &bar).await;
        bar.finish();

        match result {
            Ok(bytes_written) => {
                if let Some(expected) = target.expected_size
                    && expected != bytes_written
                {
                    warn!(
                        file = %target.file_name,
                        expected,
                        actual = bytes_written,
                        "downloaded size differs from declared size"
                    );
                }
                Ok(bytes_written)
            }
            Err(err) => {
                // Never leave a torn file behind for later runs to trust.
                debug!(path = %path.display(), "cleaning up partial file after error");
                let _ = tokio::fs::remove_file(path).await;
                Err(err)
            }
        }
    }
}

/// Streams the download body into the file, returning bytes written.
///
/// Extracted so the caller can clean up the partial file on error.
async fn stream_to_file(
    file: File,
    stream: crate::catalog::DownloadStream,
    path: &Path,
    bar: &ProgressBar,
) -> Result<u64, SyncError> {
    let mut writer = BufWriter::new(file);
    let mut chunks = stream.into_chunks();
    let mut bytes_written: u64 = 0;

    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.map_err(SyncError::Catalog)?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| SyncError::io(path, e))?;
        bytes_written += chunk.len() as u64;
        progress::update_position(bar, bytes_written);
    }

    writer.flush().await.map_err(|e| SyncError::io(path, e))?;
    Ok(bytes_written)
}
