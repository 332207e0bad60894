//! Per-item progress reporting in fixed chunk units.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress/pacing granularity in bytes. A reporting choice, not a
/// protocol requirement: transport chunks can arrive in any size.
pub const CHUNK_SIZE: u64 = 1024;

/// Number of progress units for an expected size and chunk size.
///
/// Always at least one so a tiny file still renders a complete bar.
#[must_use]
pub fn chunk_units(expected_size: u64, chunk_size: u64) -> u64 {
    (expected_size / chunk_size).max(1)
}

/// Builds the progress indicator for one item.
///
/// A known expected size produces a determinate bar sized in
/// [`CHUNK_SIZE`] units; an unknown size falls back to a spinner rather
/// than dividing by zero. Hidden entirely when progress is disabled.
#[must_use]
pub fn item_progress_bar(prefix: &str, expected_size: Option<u64>, enabled: bool) -> ProgressBar {
    if !enabled {
        return ProgressBar::hidden();
    }

    let bar = match expected_size {
        Some(size) => {
            let bar = ProgressBar::new(chunk_units(size, CHUNK_SIZE));
            bar.set_style(
                ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len} kb")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        }
        None => {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} {msg} {pos} kb")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(100));
            bar
        }
    };
    bar.set_message(prefix.to_string());
    bar
}

/// Advances the bar to the position for `bytes_written` bytes.
pub fn update_position(bar: &ProgressBar, bytes_written: u64) {
    bar.set_position(bytes_written / CHUNK_SIZE);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_units_exact_multiple() {
        assert_eq!(chunk_units(204_800, 1024), 200);
    }

    #[test]
    fn test_chunk_units_rounds_down() {
        assert_eq!(chunk_units(2047, 1024), 1);
        assert_eq!(chunk_units(2048, 1024), 2);
        assert_eq!(chunk_units(2049, 1024), 2);
    }

    #[test]
    fn test_chunk_units_minimum_is_one() {
        assert_eq!(chunk_units(0, 1024), 1);
        assert_eq!(chunk_units(100, 1024), 1);
    }

    #[test]
    fn test_known_size_builds_determinate_bar() {
        let bar = item_progress_bar("(1/1) mybook.epub", Some(204_800), true);
        assert_eq!(bar.length(), Some(200));
    }

    #[test]
    fn test_unknown_size_builds_spinner() {
        let bar = item_progress_bar("(1/1) mybook.epub", None, true);
        assert_eq!(bar.length(), None);
    }

    #[test]
    fn test_disabled_progress_is_hidden() {
        let bar = item_progress_bar("(1/1) mybook.epub", Some(1024), false);
        assert!(bar.is_hidden());
    }
}
